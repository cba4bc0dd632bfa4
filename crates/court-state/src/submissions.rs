//! # Case Submission Workflow
//!
//! The submission arena plus the workflow operations over it: litigants
//! submit, judges edit/approve/reject/delete, and every read is filtered
//! through the visibility rule in `court-core`.
//!
//! Status transitions: `PENDING` initial; `approve`/`reject` assign
//! `APPROVED`/`REJECTED` **unconditionally** — an already-decided
//! submission can be re-decided or flipped with no history kept. That
//! matches the deployed behavior this service replaces and is pinned by
//! tests; do not add a status guard without a migration plan.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use thiserror::Error;

use court_core::{can_view, name_matches, permits, Action, Actor, Role, SubmissionStatus};

/// A case submission record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub id: i64,
    /// Case identifier — shared by related submissions and votes, not unique.
    pub case_id: String,
    pub submitted_by_user_id: i64,
    /// The creator's role at submission time.
    pub submitted_by_role: Role,
    pub plaintiff_name: String,
    pub defendant_name: String,
    pub argument_text: String,
    pub evidence_text: String,
    pub status: SubmissionStatus,
    pub judge_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Content of a new submission. Fields are validated at the API boundary.
#[derive(Debug, Clone)]
pub struct SubmissionDraft {
    pub case_id: String,
    pub plaintiff_name: String,
    pub defendant_name: String,
    pub argument_text: String,
    pub evidence_text: String,
}

/// Merge-patch for a judge edit: only fields present are changed, omitted
/// fields are left untouched. An all-`None` patch still bumps `updated_at`.
#[derive(Debug, Clone, Default)]
pub struct SubmissionPatch {
    pub plaintiff_name: Option<String>,
    pub defendant_name: Option<String>,
    pub argument_text: Option<String>,
    pub evidence_text: Option<String>,
    pub judge_notes: Option<String>,
}

/// Errors during submission workflow operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// The acting role lacks permission for this action.
    #[error("role {role} may not {action}")]
    Forbidden {
        /// The acting user's role.
        role: Role,
        /// The attempted action.
        action: Action,
    },
    /// The referenced submission does not exist.
    #[error("submission {id} not found")]
    NotFound {
        /// The missing submission id.
        id: i64,
    },
}

#[derive(Default)]
struct SubmissionArena {
    submissions: HashMap<i64, Submission>,
    next_id: i64,
}

/// The submission workflow store.
pub struct SubmissionStore {
    inner: RwLock<SubmissionArena>,
}

impl SubmissionStore {
    /// Create an empty store. Ids start at 1.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(SubmissionArena { next_id: 1, ..Default::default() }),
        }
    }

    fn check(actor: Actor, action: Action) -> Result<(), SubmissionError> {
        if !permits(actor.role, action) {
            return Err(SubmissionError::Forbidden { role: actor.role, action });
        }
        Ok(())
    }

    /// Create a new submission. Litigants only; always starts `PENDING`.
    ///
    /// Records the creator's id and a snapshot of their role — the snapshot
    /// stays meaningful even though roles are immutable today.
    pub fn submit(&self, actor: Actor, draft: SubmissionDraft) -> Result<Submission, SubmissionError> {
        Self::check(actor, Action::Submit)?;
        let now = Utc::now();
        let mut arena = self.inner.write();
        let id = arena.next_id;
        arena.next_id += 1;
        let submission = Submission {
            id,
            case_id: draft.case_id,
            submitted_by_user_id: actor.id,
            submitted_by_role: actor.role,
            plaintiff_name: draft.plaintiff_name,
            defendant_name: draft.defendant_name,
            argument_text: draft.argument_text,
            evidence_text: draft.evidence_text,
            status: SubmissionStatus::Pending,
            judge_notes: None,
            created_at: now,
            updated_at: now,
        };
        arena.submissions.insert(id, submission.clone());
        Ok(submission)
    }

    /// All submissions the actor may see, ordered by id.
    pub fn list_visible_to(&self, actor: Actor) -> Vec<Submission> {
        let arena = self.inner.read();
        let mut visible: Vec<Submission> = arena
            .submissions
            .values()
            .filter(|s| can_view(actor.role, actor.id, s.submitted_by_user_id, s.status))
            .cloned()
            .collect();
        visible.sort_by_key(|s| s.id);
        visible
    }

    /// Juror-only name search, scoped to `APPROVED` submissions.
    ///
    /// Case-insensitive substring match against plaintiff or defendant
    /// name; the pattern is trimmed before matching.
    pub fn search_by_name(
        &self,
        actor: Actor,
        pattern: &str,
    ) -> Result<Vec<Submission>, SubmissionError> {
        Self::check(actor, Action::SearchByName)?;
        let arena = self.inner.read();
        let mut matched: Vec<Submission> = arena
            .submissions
            .values()
            .filter(|s| s.status == SubmissionStatus::Approved)
            .filter(|s| name_matches(pattern, &s.plaintiff_name, &s.defendant_name))
            .cloned()
            .collect();
        matched.sort_by_key(|s| s.id);
        Ok(matched)
    }

    /// Fetch a submission by id, without visibility filtering. Callers
    /// outside tests should prefer [`Self::list_visible_to`].
    pub fn get(&self, id: i64) -> Option<Submission> {
        self.inner.read().submissions.get(&id).cloned()
    }

    /// Judge-only merge-patch edit.
    ///
    /// Permission is decided before existence: a non-judge probing a
    /// missing id learns FORBIDDEN, not NOT_FOUND.
    pub fn edit(
        &self,
        actor: Actor,
        id: i64,
        patch: SubmissionPatch,
    ) -> Result<Submission, SubmissionError> {
        Self::check(actor, Action::Edit)?;
        let mut arena = self.inner.write();
        let submission = arena
            .submissions
            .get_mut(&id)
            .ok_or(SubmissionError::NotFound { id })?;
        if let Some(v) = patch.plaintiff_name {
            submission.plaintiff_name = v;
        }
        if let Some(v) = patch.defendant_name {
            submission.defendant_name = v;
        }
        if let Some(v) = patch.argument_text {
            submission.argument_text = v;
        }
        if let Some(v) = patch.evidence_text {
            submission.evidence_text = v;
        }
        if let Some(v) = patch.judge_notes {
            submission.judge_notes = Some(v);
        }
        submission.updated_at = Utc::now();
        Ok(submission.clone())
    }

    /// Judge-only approval. Assigns `APPROVED` unconditionally (see module
    /// docs); notes overwrite only when provided.
    pub fn approve(
        &self,
        actor: Actor,
        id: i64,
        notes: Option<String>,
    ) -> Result<Submission, SubmissionError> {
        self.decide(actor, id, SubmissionStatus::Approved, Action::Approve, notes)
    }

    /// Judge-only rejection, symmetric to [`Self::approve`].
    pub fn reject(
        &self,
        actor: Actor,
        id: i64,
        notes: Option<String>,
    ) -> Result<Submission, SubmissionError> {
        self.decide(actor, id, SubmissionStatus::Rejected, Action::Reject, notes)
    }

    fn decide(
        &self,
        actor: Actor,
        id: i64,
        status: SubmissionStatus,
        action: Action,
        notes: Option<String>,
    ) -> Result<Submission, SubmissionError> {
        Self::check(actor, action)?;
        let mut arena = self.inner.write();
        let submission = arena
            .submissions
            .get_mut(&id)
            .ok_or(SubmissionError::NotFound { id })?;
        submission.status = status;
        if let Some(notes) = notes {
            submission.judge_notes = Some(notes);
        }
        submission.updated_at = Utc::now();
        Ok(submission.clone())
    }

    /// Judge-only permanent removal.
    pub fn delete(&self, actor: Actor, id: i64) -> Result<(), SubmissionError> {
        Self::check(actor, Action::Delete)?;
        let mut arena = self.inner.write();
        arena
            .submissions
            .remove(&id)
            .map(|_| ())
            .ok_or(SubmissionError::NotFound { id })
    }

    /// All submissions, unfiltered, ordered by id. Used by the metrics
    /// scrape handler and persistence hydration checks.
    pub fn list(&self) -> Vec<Submission> {
        let arena = self.inner.read();
        let mut all: Vec<Submission> = arena.submissions.values().cloned().collect();
        all.sort_by_key(|s| s.id);
        all
    }

    /// Number of submissions currently stored.
    pub fn len(&self) -> usize {
        self.inner.read().submissions.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Re-insert a persisted submission on boot, preserving its id.
    pub fn hydrate(&self, submission: Submission) {
        let mut arena = self.inner.write();
        arena.next_id = arena.next_id.max(submission.id + 1);
        arena.submissions.insert(submission.id, submission);
    }
}

impl Default for SubmissionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAINTIFF: Actor = Actor { id: 1, role: Role::Plaintiff };
    const DEFENDANT: Actor = Actor { id: 2, role: Role::Defendant };
    const JUROR: Actor = Actor { id: 3, role: Role::Juror };
    const JUDGE: Actor = Actor { id: 4, role: Role::Judge };

    fn draft(case_id: &str) -> SubmissionDraft {
        SubmissionDraft {
            case_id: case_id.into(),
            plaintiff_name: "John Smith".into(),
            defendant_name: "Acme Corp".into(),
            argument_text: "breach of contract".into(),
            evidence_text: "signed agreement".into(),
        }
    }

    #[test]
    fn submit_starts_pending_with_role_snapshot() {
        let store = SubmissionStore::new();
        let s = store.submit(PLAINTIFF, draft("CASE-1")).unwrap();
        assert_eq!(s.status, SubmissionStatus::Pending);
        assert_eq!(s.submitted_by_user_id, 1);
        assert_eq!(s.submitted_by_role, Role::Plaintiff);
        assert_eq!(s.judge_notes, None);
        assert_eq!(s.created_at, s.updated_at);
    }

    #[test]
    fn judges_and_jurors_cannot_submit() {
        let store = SubmissionStore::new();
        for actor in [JUDGE, JUROR] {
            let err = store.submit(actor, draft("CASE-1")).unwrap_err();
            assert_eq!(
                err,
                SubmissionError::Forbidden { role: actor.role, action: Action::Submit }
            );
        }
        assert!(store.is_empty());
    }

    #[test]
    fn juror_list_never_contains_pending_or_rejected() {
        let store = SubmissionStore::new();
        let a = store.submit(PLAINTIFF, draft("CASE-A")).unwrap();
        let b = store.submit(DEFENDANT, draft("CASE-B")).unwrap();
        store.submit(PLAINTIFF, draft("CASE-C")).unwrap();
        store.approve(JUDGE, a.id, None).unwrap();
        store.reject(JUDGE, b.id, None).unwrap();

        let visible = store.list_visible_to(JUROR);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, a.id);
    }

    #[test]
    fn litigant_always_sees_own_submissions() {
        let store = SubmissionStore::new();
        let own = store.submit(PLAINTIFF, draft("CASE-A")).unwrap();
        let other = store.submit(DEFENDANT, draft("CASE-B")).unwrap();
        store.reject(JUDGE, own.id, None).unwrap();

        let visible = store.list_visible_to(PLAINTIFF);
        // Own rejected submission is visible; the other's pending one is not.
        assert_eq!(visible.iter().map(|s| s.id).collect::<Vec<_>>(), vec![own.id]);

        store.approve(JUDGE, other.id, None).unwrap();
        let visible = store.list_visible_to(PLAINTIFF);
        assert_eq!(visible.len(), 2);
    }

    #[test]
    fn judge_sees_everything() {
        let store = SubmissionStore::new();
        store.submit(PLAINTIFF, draft("CASE-A")).unwrap();
        store.submit(DEFENDANT, draft("CASE-B")).unwrap();
        assert_eq!(store.list_visible_to(JUDGE).len(), 2);
    }

    #[test]
    fn search_is_juror_only_and_approved_scoped() {
        let store = SubmissionStore::new();
        let a = store.submit(PLAINTIFF, draft("CASE-A")).unwrap();
        store.submit(PLAINTIFF, draft("CASE-B")).unwrap(); // stays pending
        store.approve(JUDGE, a.id, None).unwrap();

        let hits = store.search_by_name(JUROR, "smith").unwrap();
        assert_eq!(hits.iter().map(|s| s.id).collect::<Vec<_>>(), vec![a.id]);

        let hits = store.search_by_name(JUROR, "ACME").unwrap();
        assert_eq!(hits.len(), 1);

        assert!(store.search_by_name(JUROR, "zzz").unwrap().is_empty());
        for actor in [PLAINTIFF, DEFENDANT, JUDGE] {
            assert!(matches!(
                store.search_by_name(actor, "smith"),
                Err(SubmissionError::Forbidden { .. })
            ));
        }
    }

    #[test]
    fn edit_applies_only_provided_fields() {
        let store = SubmissionStore::new();
        let s = store.submit(PLAINTIFF, draft("CASE-A")).unwrap();
        let patch = SubmissionPatch {
            defendant_name: Some("Acme Holdings".into()),
            judge_notes: Some("renamed defendant".into()),
            ..Default::default()
        };
        let edited = store.edit(JUDGE, s.id, patch).unwrap();
        assert_eq!(edited.defendant_name, "Acme Holdings");
        assert_eq!(edited.plaintiff_name, s.plaintiff_name);
        assert_eq!(edited.argument_text, s.argument_text);
        assert_eq!(edited.judge_notes.as_deref(), Some("renamed defendant"));
        assert_eq!(edited.status, SubmissionStatus::Pending);
    }

    #[test]
    fn empty_patch_touches_only_updated_at() {
        let store = SubmissionStore::new();
        let before = store.submit(PLAINTIFF, draft("CASE-A")).unwrap();
        let after = store.edit(JUDGE, before.id, SubmissionPatch::default()).unwrap();
        assert!(after.updated_at >= before.updated_at);
        assert_eq!(
            Submission { updated_at: before.updated_at, ..after },
            before
        );
    }

    #[test]
    fn edit_is_judge_only_and_checks_permission_before_existence() {
        let store = SubmissionStore::new();
        let err = store.edit(JUROR, 9999, SubmissionPatch::default()).unwrap_err();
        assert_eq!(err, SubmissionError::Forbidden { role: Role::Juror, action: Action::Edit });
        let err = store.edit(JUDGE, 9999, SubmissionPatch::default()).unwrap_err();
        assert_eq!(err, SubmissionError::NotFound { id: 9999 });
    }

    #[test]
    fn approve_sets_status_and_overwrites_notes_only_when_provided() {
        let store = SubmissionStore::new();
        let s = store.submit(PLAINTIFF, draft("CASE-A")).unwrap();
        let approved = store.approve(JUDGE, s.id, Some("ok".into())).unwrap();
        assert_eq!(approved.status, SubmissionStatus::Approved);
        assert_eq!(approved.judge_notes.as_deref(), Some("ok"));

        // No notes provided: previous notes preserved.
        let again = store.approve(JUDGE, s.id, None).unwrap();
        assert_eq!(again.judge_notes.as_deref(), Some("ok"));
    }

    #[test]
    fn decisions_are_unguarded_reassignments() {
        // Pinned quirk: re-deciding an already-decided submission succeeds
        // silently, including flipping APPROVED to REJECTED.
        let store = SubmissionStore::new();
        let s = store.submit(PLAINTIFF, draft("CASE-A")).unwrap();
        store.approve(JUDGE, s.id, Some("ok".into())).unwrap();
        let flipped = store.reject(JUDGE, s.id, None).unwrap();
        assert_eq!(flipped.status, SubmissionStatus::Rejected);
        assert_eq!(flipped.judge_notes.as_deref(), Some("ok"));
    }

    #[test]
    fn delete_removes_permanently() {
        let store = SubmissionStore::new();
        let s = store.submit(PLAINTIFF, draft("CASE-A")).unwrap();
        store.delete(JUDGE, s.id).unwrap();
        assert!(store.get(s.id).is_none());
        assert_eq!(store.delete(JUDGE, s.id).unwrap_err(), SubmissionError::NotFound { id: s.id });
    }

    #[test]
    fn delete_of_missing_id_changes_nothing() {
        let store = SubmissionStore::new();
        store.submit(PLAINTIFF, draft("CASE-A")).unwrap();
        assert!(matches!(
            store.delete(JUDGE, 9999),
            Err(SubmissionError::NotFound { id: 9999 })
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn case_ids_are_not_unique_across_submissions() {
        let store = SubmissionStore::new();
        let a = store.submit(PLAINTIFF, draft("CASE-A")).unwrap();
        let b = store.submit(DEFENDANT, draft("CASE-A")).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.case_id, b.case_id);
    }
}
