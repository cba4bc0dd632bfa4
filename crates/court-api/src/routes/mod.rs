//! # API Route Modules
//!
//! - `auth` — signup and login (unauthenticated; issues bearer tokens).
//! - `cases` — case submission workflow: submit, role-filtered listing,
//!   juror name search, and judge-only edit/approve/reject/delete.
//! - `jury` — vote casting and tallies.

pub mod auth;
pub mod cases;
pub mod jury;
