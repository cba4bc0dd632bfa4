//! # Voting Ledger
//!
//! Append-only vote records with a uniqueness constraint on
//! `(case_id, juror_user_id)`, checked and enforced inside the ledger's
//! write lock — never in caller logic. Concurrent casts for the same pair
//! serialize on the lock; exactly one wins, the rest surface a conflict.
//!
//! Votes are never updated or retracted. A vote's `case_id` is a bare
//! string with no referential check against submissions: a vote may
//! reference a case with zero submissions, and tallies for unknown case
//! ids are simply all-zero.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use thiserror::Error;

use court_core::{permits, Action, Actor, Role, VoteValue};

/// A single cast vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    pub case_id: String,
    pub juror_user_id: i64,
    pub vote: VoteValue,
    pub created_at: DateTime<Utc>,
}

/// Aggregate counts for one case identifier. `total` is always
/// `guilty + not_guilty`; one vote is one unit, no weighting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally {
    pub case_id: String,
    pub guilty: u64,
    pub not_guilty: u64,
    pub total: u64,
}

/// Errors during voting ledger operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VoteError {
    /// The acting role lacks permission for this action.
    #[error("role {role} may not {action}")]
    Forbidden {
        /// The acting user's role.
        role: Role,
        /// The attempted action.
        action: Action,
    },
    /// The juror has already voted for this case.
    #[error("juror {juror_user_id} already voted for case {case_id}")]
    AlreadyVoted {
        /// The case identifier.
        case_id: String,
        /// The duplicate-voting juror.
        juror_user_id: i64,
    },
}

#[derive(Default)]
struct VoteArena {
    votes: Vec<Vote>,
    // Uniqueness index over (case_id, juror_user_id).
    cast: HashSet<(String, i64)>,
}

/// The voting ledger.
pub struct VoteLedger {
    inner: RwLock<VoteArena>,
}

impl VoteLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self { inner: RwLock::new(VoteArena::default()) }
    }

    /// Record a juror's vote for a case.
    ///
    /// All-or-nothing: the uniqueness check and the insert happen under
    /// one write lock, so a duplicate attempt leaves the ledger untouched.
    ///
    /// # Errors
    ///
    /// - [`VoteError::Forbidden`] unless the actor is a juror.
    /// - [`VoteError::AlreadyVoted`] if this juror already voted for this
    ///   case.
    pub fn cast(&self, actor: Actor, case_id: &str, vote: VoteValue) -> Result<Vote, VoteError> {
        if !permits(actor.role, Action::CastVote) {
            return Err(VoteError::Forbidden { role: actor.role, action: Action::CastVote });
        }
        let mut arena = self.inner.write();
        let key = (case_id.to_string(), actor.id);
        if arena.cast.contains(&key) {
            return Err(VoteError::AlreadyVoted {
                case_id: case_id.to_string(),
                juror_user_id: actor.id,
            });
        }
        let record = Vote {
            case_id: case_id.to_string(),
            juror_user_id: actor.id,
            vote,
            created_at: Utc::now(),
        };
        arena.cast.insert(key);
        arena.votes.push(record.clone());
        Ok(record)
    }

    /// Tally the votes for a case. Jurors and judges only.
    ///
    /// Case ids with no votes tally to all zeros — there is no notion of
    /// a "missing" case at the ledger level.
    pub fn tally(&self, actor: Actor, case_id: &str) -> Result<Tally, VoteError> {
        if !permits(actor.role, Action::ViewTally) {
            return Err(VoteError::Forbidden { role: actor.role, action: Action::ViewTally });
        }
        let arena = self.inner.read();
        let mut guilty = 0u64;
        let mut not_guilty = 0u64;
        for vote in arena.votes.iter().filter(|v| v.case_id == case_id) {
            match vote.vote {
                VoteValue::Guilty => guilty += 1,
                VoteValue::NotGuilty => not_guilty += 1,
            }
        }
        Ok(Tally {
            case_id: case_id.to_string(),
            guilty,
            not_guilty,
            total: guilty + not_guilty,
        })
    }

    /// All votes in cast order. Used by the metrics scrape handler and
    /// persistence.
    pub fn list(&self) -> Vec<Vote> {
        self.inner.read().votes.clone()
    }

    /// Number of votes in the ledger.
    pub fn len(&self) -> usize {
        self.inner.read().votes.len()
    }

    /// Whether the ledger is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Re-insert a persisted vote on boot. Duplicates (which the database
    /// constraint already prevents) are ignored rather than doubled.
    pub fn hydrate(&self, vote: Vote) {
        let mut arena = self.inner.write();
        let key = (vote.case_id.clone(), vote.juror_user_id);
        if arena.cast.insert(key) {
            arena.votes.push(vote);
        }
    }
}

impl Default for VoteLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const JUROR: Actor = Actor { id: 3, role: Role::Juror };
    const OTHER_JUROR: Actor = Actor { id: 5, role: Role::Juror };
    const JUDGE: Actor = Actor { id: 4, role: Role::Judge };
    const PLAINTIFF: Actor = Actor { id: 1, role: Role::Plaintiff };

    #[test]
    fn only_jurors_cast() {
        let ledger = VoteLedger::new();
        for actor in [PLAINTIFF, Actor { id: 2, role: Role::Defendant }, JUDGE] {
            assert!(matches!(
                ledger.cast(actor, "CASE-1", VoteValue::Guilty),
                Err(VoteError::Forbidden { .. })
            ));
        }
        assert!(ledger.is_empty());
    }

    #[test]
    fn second_vote_for_same_pair_conflicts_and_count_stays_one() {
        let ledger = VoteLedger::new();
        ledger.cast(JUROR, "CASE-1", VoteValue::Guilty).unwrap();
        let err = ledger.cast(JUROR, "CASE-1", VoteValue::NotGuilty).unwrap_err();
        assert_eq!(
            err,
            VoteError::AlreadyVoted { case_id: "CASE-1".into(), juror_user_id: JUROR.id }
        );
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.tally(JUDGE, "CASE-1").unwrap().total, 1);
        // The stored value is the first one; no update-in-place happened.
        assert_eq!(ledger.list()[0].vote, VoteValue::Guilty);
    }

    #[test]
    fn same_juror_may_vote_on_different_cases() {
        let ledger = VoteLedger::new();
        ledger.cast(JUROR, "CASE-1", VoteValue::Guilty).unwrap();
        ledger.cast(JUROR, "CASE-2", VoteValue::NotGuilty).unwrap();
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn tally_counts_per_case() {
        let ledger = VoteLedger::new();
        ledger.cast(JUROR, "CASE-1", VoteValue::Guilty).unwrap();
        ledger.cast(OTHER_JUROR, "CASE-1", VoteValue::NotGuilty).unwrap();
        ledger.cast(JUROR, "CASE-2", VoteValue::Guilty).unwrap();

        let tally = ledger.tally(JUROR, "CASE-1").unwrap();
        assert_eq!((tally.guilty, tally.not_guilty, tally.total), (1, 1, 2));
    }

    #[test]
    fn tally_for_unknown_case_is_all_zero() {
        let ledger = VoteLedger::new();
        let tally = ledger.tally(JUDGE, "NO-SUCH-CASE").unwrap();
        assert_eq!((tally.guilty, tally.not_guilty, tally.total), (0, 0, 0));
    }

    #[test]
    fn tally_is_forbidden_for_litigants() {
        let ledger = VoteLedger::new();
        assert!(matches!(
            ledger.tally(PLAINTIFF, "CASE-1"),
            Err(VoteError::Forbidden { .. })
        ));
    }

    #[test]
    fn votes_need_no_matching_submission() {
        // The ledger never consults the submission store.
        let ledger = VoteLedger::new();
        ledger.cast(JUROR, "ORPHAN-CASE", VoteValue::Guilty).unwrap();
        assert_eq!(ledger.tally(JUDGE, "ORPHAN-CASE").unwrap().total, 1);
    }

    #[test]
    fn hydrate_skips_duplicates() {
        let ledger = VoteLedger::new();
        let vote = Vote {
            case_id: "CASE-1".into(),
            juror_user_id: 3,
            vote: VoteValue::Guilty,
            created_at: Utc::now(),
        };
        ledger.hydrate(vote.clone());
        ledger.hydrate(vote);
        assert_eq!(ledger.len(), 1);
    }

    proptest! {
        // total == guilty + not_guilty for any mix of votes across jurors
        // and cases, including cases nobody voted on.
        #[test]
        fn tally_total_is_sum_of_parts(
            votes in proptest::collection::vec(
                (0i64..20, prop_oneof![Just(VoteValue::Guilty), Just(VoteValue::NotGuilty)], "C[12]"),
                0..40,
            )
        ) {
            let ledger = VoteLedger::new();
            for (juror, value, case_id) in votes {
                // Duplicate (case, juror) pairs conflict; that is fine here.
                let _ = ledger.cast(Actor { id: juror, role: Role::Juror }, &case_id, value);
            }
            for case_id in ["C1", "C2", "C3"] {
                let tally = ledger.tally(JUDGE, case_id).unwrap();
                prop_assert_eq!(tally.total, tally.guilty + tally.not_guilty);
            }
        }

        // After any sequence of casts, each (case, juror) pair holds at
        // most one vote.
        #[test]
        fn at_most_one_vote_per_pair(
            attempts in proptest::collection::vec((0i64..5, "C[13]"), 0..30)
        ) {
            let ledger = VoteLedger::new();
            for (juror, case_id) in attempts {
                let _ = ledger.cast(Actor { id: juror, role: Role::Juror }, &case_id, VoteValue::Guilty);
            }
            let votes = ledger.list();
            let mut pairs: Vec<(String, i64)> = votes
                .iter()
                .map(|v| (v.case_id.clone(), v.juror_user_id))
                .collect();
            let before = pairs.len();
            pairs.sort();
            pairs.dedup();
            prop_assert_eq!(before, pairs.len());
        }
    }
}
