//! Core library for the agent dashboard
//!
//! This crate contains the derived-state logic behind the dashboard widgets:
//! - Agent progress and error panels
//! - Queue position and wait estimates
//! - Retry option composition
//! - Project settings validation

pub mod agent;
pub mod error;
pub mod project;
pub mod queue;
pub mod retry;

pub use error::{Error, ServiceError, ServiceErrorCode, ServiceErrorKind, ValidationErrors};
pub type Result<T> = std::result::Result<T, Error>;
