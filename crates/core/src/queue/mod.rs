//! Queue module
//!
//! A queued task's position, the feed messages that move it, and the
//! waiting indicator rendered from them.

mod model;
mod wait;

pub use model::*;
pub use wait::{estimate_wait_ms, format_wait};
