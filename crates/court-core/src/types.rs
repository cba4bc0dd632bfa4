//! # Domain Enums and the Acting Principal
//!
//! Closed enums for user roles, submission lifecycle status, and vote
//! values. Wire strings are SCREAMING_SNAKE (`"PLAINTIFF"`, `"NOT_GUILTY"`)
//! and round-trip through `as_str`/`parse` for storage. No wildcard matches
//! anywhere — adding a variant forces a compile error at every decision
//! point instead of silently falling through.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The role a user holds, fixed at signup.
///
/// Roles are immutable after creation: no operation in the stack writes a
/// user's role after the initial insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Plaintiff,
    Defendant,
    Juror,
    Judge,
}

impl Role {
    /// All roles, for iteration (metrics, exhaustive tests).
    pub const ALL: [Role; 4] = [Role::Plaintiff, Role::Defendant, Role::Juror, Role::Judge];

    /// The canonical wire/storage string for this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plaintiff => "PLAINTIFF",
            Self::Defendant => "DEFENDANT",
            Self::Juror => "JUROR",
            Self::Judge => "JUDGE",
        }
    }

    /// Parse a storage string back into a role.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "PLAINTIFF" => Ok(Self::Plaintiff),
            "DEFENDANT" => Ok(Self::Defendant),
            "JUROR" => Ok(Self::Juror),
            "JUDGE" => Ok(Self::Judge),
            other => Err(ValidationError::UnknownRole(other.to_string())),
        }
    }

    /// Whether this is a litigant role (may submit cases).
    pub fn is_litigant(&self) -> bool {
        matches!(self, Self::Plaintiff | Self::Defendant)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle status of a case submission.
///
/// Starts `Pending`; a judge moves it to `Approved` or `Rejected`.
/// approve/reject re-assign the status without guarding on the current
/// value — an already-decided submission can be re-decided (see the
/// workflow store for the pinned behavior).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    /// All statuses, for iteration (metrics, exhaustive tests).
    pub const ALL: [SubmissionStatus; 3] = [
        SubmissionStatus::Pending,
        SubmissionStatus::Approved,
        SubmissionStatus::Rejected,
    ];

    /// The canonical wire/storage string for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Parse a storage string back into a status.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "APPROVED" => Ok(Self::Approved),
            "REJECTED" => Ok(Self::Rejected),
            other => Err(ValidationError::UnknownStatus(other.to_string())),
        }
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A juror's verdict on a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoteValue {
    Guilty,
    NotGuilty,
}

impl VoteValue {
    /// The canonical wire/storage string for this vote value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Guilty => "GUILTY",
            Self::NotGuilty => "NOT_GUILTY",
        }
    }

    /// Parse a storage string back into a vote value.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "GUILTY" => Ok(Self::Guilty),
            "NOT_GUILTY" => Ok(Self::NotGuilty),
            other => Err(ValidationError::UnknownVote(other.to_string())),
        }
    }
}

impl std::fmt::Display for VoteValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The authenticated principal performing an operation.
///
/// Carries only what the policy layer needs: the user id and the role
/// snapshot from the session token. Stores take an `Actor`, never a full
/// user record — relationships are foreign-key lookups, not live pointers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// The acting user's id.
    pub id: i64,
    /// The acting user's role.
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_storage_strings() {
        for role in Role::ALL {
            assert_eq!(Role::parse(role.as_str()).unwrap(), role);
        }
    }

    #[test]
    fn role_rejects_unknown_string() {
        assert!(matches!(
            Role::parse("BAILIFF"),
            Err(ValidationError::UnknownRole(_))
        ));
    }

    #[test]
    fn role_serde_uses_screaming_snake() {
        assert_eq!(serde_json::to_string(&Role::Plaintiff).unwrap(), "\"PLAINTIFF\"");
        assert_eq!(
            serde_json::from_str::<Role>("\"JUDGE\"").unwrap(),
            Role::Judge
        );
        assert!(serde_json::from_str::<Role>("\"judge\"").is_err());
    }

    #[test]
    fn status_round_trips_through_storage_strings() {
        for status in SubmissionStatus::ALL {
            assert_eq!(SubmissionStatus::parse(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn vote_value_wire_strings() {
        assert_eq!(
            serde_json::to_string(&VoteValue::NotGuilty).unwrap(),
            "\"NOT_GUILTY\""
        );
        assert_eq!(VoteValue::parse("GUILTY").unwrap(), VoteValue::Guilty);
        assert!(VoteValue::parse("ABSTAIN").is_err());
    }

    #[test]
    fn litigant_roles() {
        assert!(Role::Plaintiff.is_litigant());
        assert!(Role::Defendant.is_litigant());
        assert!(!Role::Juror.is_litigant());
        assert!(!Role::Judge.is_litigant());
    }
}
