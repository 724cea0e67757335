// src/core/mod.rs
//! Backend access and local session persistence

pub mod service_client;
pub mod session;

pub use service_client::{ApiClient, JobBoardApi};
pub use session::{FileSessionStore, MemorySessionStore, SessionContext, SessionStore, StorageKey};
