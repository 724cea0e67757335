// src/types/mod.rs
//! Wire and domain records exchanged with the job-board API

pub mod job;
pub mod query;
pub mod request;
pub mod response;
pub mod user;

pub use job::{Job, JobPage, Organization};
pub use query::{FilterField, Filters, ListingQuery, RemoteFilter};
pub use request::{LoginRequest, ProfileUpdate, RegisterRequest};
pub use response::{ApiResponse, ListPayload, LoginPayload, PaginationInfo};
pub use user::{Session, User};
