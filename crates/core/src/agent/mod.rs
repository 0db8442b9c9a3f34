//! Agent module
//!
//! Display-side views of running and failed agent runs: turn progress for
//! the running list and the error panel for failed runs.

mod model;
mod progress;

pub use model::*;
pub use progress::*;
