//! Core domain types for the garage coordination system.
//!
//! This crate contains the shared types and the stateless decision
//! logic used across all packages:
//! - Job and Bay records with their lifecycle statuses
//! - Notifications for targeted fan-out
//! - The slot calendar (availability search over bay commitments)
//! - The job lifecycle transition function

pub mod calendar;
pub mod catalog;
pub mod lifecycle;

mod bay;
mod job;
mod notification;
mod stats;

pub use bay::{Bay, BayId, BayStatus, TOTAL_BAYS};
pub use job::{Job, JobDraft, JobId, JobPatch, JobStatus};
pub use lifecycle::Transition;
pub use notification::{Notification, NotificationKind, UserRole};
pub use stats::GarageStats;
