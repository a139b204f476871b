//! Sync coordinator for the garage.
//!
//! This crate owns the authoritative in-memory copy of all jobs and
//! bays. It bridges to the remote store while that store is reachable
//! and degrades to a local snapshot plus a cross-process watcher when
//! it is not; either way every mutation fans out over the event bus.
//!
//! # Architecture
//!
//! - [`GarageActor`] - single-owner state actor; all commands, queries
//!   and sync signals go through its mailbox, one at a time
//! - [`Garage`] - the handle the rest of the application talks to
//! - [`EventBus`] - state-changed and notification channels
//!
//! # Usage
//!
//! ```ignore
//! use coordinator::{Garage, GarageConfig};
//!
//! let garage = Garage::start(GarageConfig::from_env()?).await?;
//! let mut changes = garage.subscribe_changes();
//! let jobs = garage.all_jobs().await?;
//! ```

mod config;
mod error;
mod events;
mod garage_actor;
mod messages;
mod seed;
mod service;

pub use config::GarageConfig;
pub use error::GarageError;
pub use events::{ChangeEvent, EventBus};
pub use garage_actor::{GarageActor, GarageArgs, SyncMode};
pub use messages::GarageMessage;
pub use service::Garage;

/// Re-export ractor types for convenience.
pub use ractor::{Actor, ActorRef, RpcReplyPort, concurrency};
