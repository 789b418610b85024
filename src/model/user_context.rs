use serde::{Deserialize, Serialize};

use crate::model::{Id, User};

/// Identity proven by a bearer token, whether or not the user is registered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub user_id: Id,
}

impl Subject {
    pub fn new(user_id: impl Into<Id>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// A verified subject that also has a User record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caller {
    pub user: User,
}

impl Caller {
    pub fn new(user: User) -> Self {
        Self { user }
    }

    pub fn user_id(&self) -> &str {
        &self.user.user_id
    }

    /// True when `owner_id` names this caller
    pub fn owns(&self, owner_id: Option<&str>) -> bool {
        owner_id == Some(self.user_id())
    }
}
