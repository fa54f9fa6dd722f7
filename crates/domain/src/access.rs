//! The ownership guard.
//!
//! A single pure predicate decides every Client and Order access: the
//! caller must be the recorded owner. There is no role hierarchy and no
//! admin bypass; an absent caller identity is always denied.

use common::SellerId;

use crate::error::{DomainError, Result};

/// Outcome of an ownership check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Denied,
}

/// Checks whether `caller` is the recorded owner of a resource.
pub fn check_owner(owner: SellerId, caller: Option<SellerId>) -> Access {
    match caller {
        Some(caller) if caller == owner => Access::Allowed,
        _ => Access::Denied,
    }
}

/// Like [`check_owner`], but maps `Denied` to [`DomainError::Forbidden`].
pub fn require_owner(owner: SellerId, caller: Option<SellerId>) -> Result<()> {
    match check_owner(owner, caller) {
        Access::Allowed => Ok(()),
        Access::Denied => Err(DomainError::Forbidden),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_is_allowed() {
        let owner = SellerId::new();
        assert_eq!(check_owner(owner, Some(owner)), Access::Allowed);
    }

    #[test]
    fn other_seller_is_denied() {
        let owner = SellerId::new();
        let other = SellerId::new();
        assert_eq!(check_owner(owner, Some(other)), Access::Denied);
    }

    #[test]
    fn anonymous_is_denied() {
        let owner = SellerId::new();
        assert_eq!(check_owner(owner, None), Access::Denied);
    }

    #[test]
    fn require_owner_maps_denied_to_forbidden() {
        let owner = SellerId::new();
        assert!(require_owner(owner, Some(owner)).is_ok());
        assert!(matches!(
            require_owner(owner, None),
            Err(DomainError::Forbidden)
        ));
    }
}
