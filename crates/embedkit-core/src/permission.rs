//! Permission tiers of the invoking user.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::{EmbedError, Result};

/// Ordered permission tiers, lowest first.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PermissionLevel {
    Regular,
    Supporter,
    Moderator,
    Administrator,
    Owner,
}

impl PermissionLevel {
    /// Fails with `PermissionDenied` unless `self` is at least `required`.
    pub fn require(self, required: PermissionLevel) -> Result<()> {
        if self >= required {
            Ok(())
        } else {
            Err(EmbedError::PermissionDenied {
                required,
                actual: self,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        assert!(PermissionLevel::Owner > PermissionLevel::Administrator);
        assert!(PermissionLevel::Moderator > PermissionLevel::Supporter);
        assert!(PermissionLevel::Regular < PermissionLevel::Supporter);
    }

    #[test]
    fn test_require() {
        assert!(PermissionLevel::Administrator
            .require(PermissionLevel::Moderator)
            .is_ok());
        assert!(PermissionLevel::Moderator
            .require(PermissionLevel::Moderator)
            .is_ok());
        let err = PermissionLevel::Regular
            .require(PermissionLevel::Moderator)
            .unwrap_err();
        assert!(err.is_authorization());
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(
            "Moderator".parse::<PermissionLevel>().unwrap(),
            PermissionLevel::Moderator
        );
        assert_eq!(PermissionLevel::Owner.to_string(), "owner");
    }
}
