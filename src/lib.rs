// src/lib.rs
//! Client library for the Cari Magang internship job board: REST client,
//! session storage, listing query controller, auth and profile flows.

pub mod auth;
pub mod cli;
pub mod core;
pub mod environment;
pub mod error;
pub mod listing;
pub mod logging;
pub mod messages;
pub mod popular;
pub mod profile;
pub mod status;
pub mod types;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::{guard, AuthService, Route};
pub use self::core::{ApiClient, JobBoardApi, SessionContext};
pub use environment::ClientConfig;
pub use error::{ClientError, FlowError};
pub use listing::{ListingConfig, ListingController, ListingState};
pub use profile::ProfileEditor;
