//! # Workflows Module
//!
//! High-level entry points that tie the [`engine`](crate::engine) tasks and
//! the [`core`](crate::core) filter together into complete procedures.
//!
//! - **Preparation Workflow** ([`prepare`]) - Acquire a structure, repair it,
//!   strip unwanted hetero groups, and hand it to a short MD run.

pub mod prepare;
