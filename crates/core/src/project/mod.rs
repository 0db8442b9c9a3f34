//! Project module
//!
//! Project configuration and the settings form that edits it. Persistence
//! belongs to the project service; this module only validates.

mod model;
mod validator;

pub use model::*;
pub use validator::*;
