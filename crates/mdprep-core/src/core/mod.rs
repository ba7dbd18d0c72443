//! # Core Module
//!
//! Stateless building blocks of the preparation pipeline.
//!
//! - **File processing** ([`io`]) - fixed-column PDB record layout and the
//!   HETATM filter, usable on in-memory buffers or on files.
//! - **Value types** ([`models`]) - validated identifiers.
//!
//! Nothing here touches the network or spawns processes; those concerns live
//! in [`crate::engine::tasks`].

pub mod io;
pub mod models;
