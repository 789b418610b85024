use crate::logic::dual_write::ExistingRecord;
use crate::model::Caller;

/// What a mutating request may do with a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// No record exists yet; the caller may create it
    Create,
    /// The caller owns the existing record
    Owner,
    /// The record belongs to someone else, or to no one
    Forbidden,
}

impl Access {
    pub fn is_permitted(&self) -> bool {
        !matches!(self, Access::Forbidden)
    }
}

/// Decide whether `caller` may create, replace or delete a resource whose
/// stored record is `existing`
pub fn check_mutation(caller: &Caller, existing: Option<&ExistingRecord>) -> Access {
    match existing {
        None => Access::Create,
        Some(record) if caller.owns(record.owner_id.as_deref()) => Access::Owner,
        Some(_) => Access::Forbidden,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::User;

    fn caller(id: &str) -> Caller {
        Caller::new(User::new(id.to_string()))
    }

    fn owned_by(owner: Option<&str>) -> ExistingRecord {
        ExistingRecord {
            owner_id: owner.map(str::to_string),
            created_at: None,
        }
    }

    #[test]
    fn test_new_resource_is_creatable() {
        assert_eq!(check_mutation(&caller("u1"), None), Access::Create);
    }

    #[test]
    fn test_owner_may_mutate() {
        let access = check_mutation(&caller("u1"), Some(&owned_by(Some("u1"))));
        assert_eq!(access, Access::Owner);
        assert!(access.is_permitted());
    }

    #[test]
    fn test_other_users_and_unowned_records_are_forbidden() {
        let access = check_mutation(&caller("u1"), Some(&owned_by(Some("u2"))));
        assert_eq!(access, Access::Forbidden);
        assert!(!access.is_permitted());

        assert_eq!(
            check_mutation(&caller("u1"), Some(&owned_by(None))),
            Access::Forbidden
        );
    }
}
