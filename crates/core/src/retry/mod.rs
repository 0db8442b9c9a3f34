//! Retry module
//!
//! Builds the retry request sent to the agent service when a failed run is
//! retried from the error panel.

mod composer;

pub use composer::*;
