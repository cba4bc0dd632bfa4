//! # court-state — Arena Stores for the Court Stack
//!
//! In-memory stores keyed by monotonically assigned integer ids:
//!
//! - **Users** ([`users`]): the identity store. Emails are unique
//!   case-insensitively; roles are immutable after insert.
//! - **Submissions** ([`submissions`]): the case submission workflow
//!   (`PENDING → APPROVED | REJECTED`), with role-gated mutation and
//!   per-role visibility.
//! - **Votes** ([`votes`]): the voting ledger, enforcing at most one vote
//!   per `(case_id, juror)` pair inside its own write lock.
//!
//! ## Design Principle
//!
//! Relationships between records are explicit foreign-key lookups through
//! a store — never live object pointers. Every store method that mutates
//! takes the acting principal ([`court_core::Actor`]) and consults the
//! capability table in `court-core` before touching any record, so a
//! FORBIDDEN result is decided before existence is even checked.
//!
//! Each store serializes conflicting operations behind a single
//! `parking_lot::RwLock`. The vote-uniqueness constraint in particular is
//! checked and enforced under the ledger's write lock — concurrent casts
//! for the same pair cannot both succeed.

pub mod submissions;
pub mod users;
pub mod votes;

// Re-export primary types.
pub use submissions::{
    Submission, SubmissionDraft, SubmissionError, SubmissionPatch, SubmissionStore,
};
pub use users::{User, UserError, UserStore};
pub use votes::{Tally, Vote, VoteError, VoteLedger};
