use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{string_or_number, Id};

/// A registered API user. The id is the subject of the caller's identity token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "userID", deserialize_with = "string_or_number")]
    pub user_id: Id,
    #[serde(rename = "userStatus", default)]
    pub user_status: i32,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(user_id: Id) -> Self {
        Self {
            user_id,
            user_status: 0,
            created_at: None,
            updated_at: None,
        }
    }
}

/// Body accepted by `POST /user/`; the id itself always comes from the token
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    #[serde(rename = "userStatus", default)]
    pub user_status: Option<i32>,
}
