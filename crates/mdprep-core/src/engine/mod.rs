//! # Engine Module
//!
//! The stateful layer of mdprep. It holds the pipeline configuration, the
//! error type shared by every step, progress reporting, and the tasks that
//! talk to the outside world: the RCSB download service, PDBFixer, and the
//! easy-md simulation driver.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Pipeline parameters and their validation
//! - **Error Handling** ([`error`]) - Engine-specific error types
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Tasks** ([`tasks`]) - Download, repair, and simulation collaborators

pub mod config;
pub mod error;
pub mod progress;
pub mod tasks;
