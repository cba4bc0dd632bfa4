//! # Authorization Policy
//!
//! The single decision point for "may this role perform this action" and
//! "may this user see this submission". Pure functions over the acting
//! principal and the candidate record — no side effects, no store access.
//!
//! Callers must treat a deny as FORBIDDEN, distinct from NOT_FOUND: the
//! existence check happens in the store after the permission check.

use crate::types::{Role, SubmissionStatus};

/// Everything a user can attempt against the case and voting surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Create a new case submission.
    Submit,
    /// List submissions (visibility still filtered per role).
    View,
    /// Edit a submission's content fields.
    Edit,
    /// Approve a submission.
    Approve,
    /// Reject a submission.
    Reject,
    /// Delete a submission permanently.
    Delete,
    /// Filter approved submissions by party name.
    SearchByName,
    /// Cast a verdict on a case.
    CastVote,
    /// Read the vote tally for a case.
    ViewTally,
}

impl Action {
    /// Short verb phrase used in FORBIDDEN error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submit => "submit cases",
            Self::View => "view submissions",
            Self::Edit => "edit submissions",
            Self::Approve => "approve submissions",
            Self::Reject => "reject submissions",
            Self::Delete => "delete submissions",
            Self::SearchByName => "search submissions by name",
            Self::CastVote => "cast votes",
            Self::ViewTally => "view vote results",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The capability table: `{role × action} → permit/deny`.
///
/// One exhaustive match, consumed by the stores. Adding a role or action
/// forces every cell to be decided here rather than in scattered route
/// conditionals.
pub fn permits(role: Role, action: Action) -> bool {
    match (role, action) {
        // Litigants open cases; judges and jurors never do.
        (Role::Plaintiff | Role::Defendant, Action::Submit) => true,
        (Role::Juror | Role::Judge, Action::Submit) => false,

        // Everyone may list; what they see is filtered by `can_view`.
        (_, Action::View) => true,

        // Mutation of submissions is the judge's alone.
        (Role::Judge, Action::Edit | Action::Approve | Action::Reject | Action::Delete) => true,
        (
            Role::Plaintiff | Role::Defendant | Role::Juror,
            Action::Edit | Action::Approve | Action::Reject | Action::Delete,
        ) => false,

        // Name search is a juror-only view over approved submissions.
        (Role::Juror, Action::SearchByName) => true,
        (Role::Plaintiff | Role::Defendant | Role::Judge, Action::SearchByName) => false,

        // Voting is juror-only; tallies are visible to juror and judge.
        (Role::Juror, Action::CastVote) => true,
        (Role::Plaintiff | Role::Defendant | Role::Judge, Action::CastVote) => false,
        (Role::Juror | Role::Judge, Action::ViewTally) => true,
        (Role::Plaintiff | Role::Defendant, Action::ViewTally) => false,
    }
}

/// Visibility rule for a single submission.
///
/// - JUDGE sees everything.
/// - PLAINTIFF/DEFENDANT see their own submissions in any status, plus
///   everyone's APPROVED submissions.
/// - JUROR sees APPROVED submissions only.
pub fn can_view(
    role: Role,
    viewer_id: i64,
    submitted_by_user_id: i64,
    status: SubmissionStatus,
) -> bool {
    match role {
        Role::Judge => true,
        Role::Plaintiff | Role::Defendant => {
            viewer_id == submitted_by_user_id || status == SubmissionStatus::Approved
        }
        Role::Juror => status == SubmissionStatus::Approved,
    }
}

/// Case-insensitive substring match against either party name.
///
/// The pattern is trimmed of surrounding whitespace before matching.
pub fn name_matches(pattern: &str, plaintiff_name: &str, defendant_name: &str) -> bool {
    let needle = pattern.trim().to_lowercase();
    plaintiff_name.to_lowercase().contains(&needle)
        || defendant_name.to_lowercase().contains(&needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn only_litigants_submit() {
        assert!(permits(Role::Plaintiff, Action::Submit));
        assert!(permits(Role::Defendant, Action::Submit));
        assert!(!permits(Role::Juror, Action::Submit));
        assert!(!permits(Role::Judge, Action::Submit));
    }

    #[test]
    fn only_judges_mutate_submissions() {
        for action in [Action::Edit, Action::Approve, Action::Reject, Action::Delete] {
            for role in Role::ALL {
                assert_eq!(permits(role, action), role == Role::Judge, "{role} × {action}");
            }
        }
    }

    #[test]
    fn name_search_is_juror_only() {
        for role in Role::ALL {
            assert_eq!(permits(role, Action::SearchByName), role == Role::Juror);
        }
    }

    #[test]
    fn voting_is_juror_only_and_tally_includes_judge() {
        for role in Role::ALL {
            assert_eq!(permits(role, Action::CastVote), role == Role::Juror);
            assert_eq!(
                permits(role, Action::ViewTally),
                matches!(role, Role::Juror | Role::Judge)
            );
        }
    }

    #[test]
    fn everyone_may_list() {
        for role in Role::ALL {
            assert!(permits(role, Action::View));
        }
    }

    #[test]
    fn judge_sees_all_statuses() {
        for status in SubmissionStatus::ALL {
            assert!(can_view(Role::Judge, 1, 99, status));
        }
    }

    #[test]
    fn juror_sees_only_approved() {
        assert!(can_view(Role::Juror, 1, 99, SubmissionStatus::Approved));
        assert!(!can_view(Role::Juror, 1, 99, SubmissionStatus::Pending));
        assert!(!can_view(Role::Juror, 1, 99, SubmissionStatus::Rejected));
        // Even for a submission the juror somehow authored.
        assert!(!can_view(Role::Juror, 1, 1, SubmissionStatus::Pending));
    }

    #[test]
    fn litigants_see_own_in_any_status_plus_approved() {
        for role in [Role::Plaintiff, Role::Defendant] {
            for status in SubmissionStatus::ALL {
                assert!(can_view(role, 7, 7, status), "own submission, {status}");
            }
            assert!(can_view(role, 7, 8, SubmissionStatus::Approved));
            assert!(!can_view(role, 7, 8, SubmissionStatus::Pending));
            assert!(!can_view(role, 7, 8, SubmissionStatus::Rejected));
        }
    }

    #[test]
    fn name_match_is_case_insensitive_and_trimmed() {
        assert!(name_matches("smith", "John Smith", "Acme Corp"));
        assert!(name_matches("SMITH", "john smith", "Acme Corp"));
        assert!(name_matches("  acme  ", "John Smith", "Acme Corp"));
        assert!(!name_matches("jones", "John Smith", "Acme Corp"));
    }

    proptest! {
        // A pattern that is a literal substring of either name always matches,
        // regardless of casing.
        #[test]
        fn substring_always_matches(
            prefix in "[a-z]{0,6}",
            needle in "[a-zA-Z]{1,8}",
            suffix in "[a-z]{0,6}",
        ) {
            let plaintiff = format!("{prefix}{needle}{suffix}");
            prop_assert!(name_matches(&needle.to_uppercase(), &plaintiff, ""));
        }

        // Visibility for litigants is monotone: approval never hides a
        // submission that was visible before.
        #[test]
        fn approval_never_narrows_visibility(viewer in 1i64..100, owner in 1i64..100) {
            for role in Role::ALL {
                for status in SubmissionStatus::ALL {
                    if can_view(role, viewer, owner, status) && status == SubmissionStatus::Pending {
                        prop_assert!(can_view(role, viewer, owner, SubmissionStatus::Approved));
                    }
                }
            }
        }
    }
}
