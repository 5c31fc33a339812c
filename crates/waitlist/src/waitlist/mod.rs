//! Waitlist signups ranked by referrals.
//!
//! Entries live in an [`EntrySet`] behind a [`WaitlistRepository`]; the
//! [`WaitlistService`] runs the join workflow and re-ranks the whole set after
//! every signup, and [`waitlist_router`] exposes it over HTTP.

pub mod domain;
pub mod identity;
pub mod import;
pub mod ranking;
pub mod repository;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{EntryId, JoinRequest, ReferralCode, WaitlistEntry, WaitlistStats};
pub use identity::{IdentityGenerator, RandomIdentityGenerator, SequentialIdentityGenerator};
pub use import::{ReplayReport, SignupImportError, SignupImporter, SkippedSignup};
pub use repository::{InMemoryWaitlistRepository, RepositoryError, WaitlistRepository};
pub use router::{waitlist_router, JoinResponse, StatsResponse};
pub use service::{WaitlistError, WaitlistService, MAX_CODE_ATTEMPTS};
pub use store::{EntrySet, StoreError};
