//! Referral-ranked waitlist: entry store, ranking, join workflow, and HTTP router.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod waitlist;
