//! Filesystem and git probing
//!
//! Resolves whether candidate project paths exist and sit at the top of a
//! git working tree, then answers the settings validator's questions from
//! the resolved facts without further I/O.

mod commands;
mod error;
mod probe;

pub use error::{ProbeError, Result};
pub use probe::{GitProbe, PathFacts, PathProbe, ProbedPaths};
