//! # mdprep Core Library
//!
//! Prepares protein structures from the Protein Data Bank for molecular
//! dynamics: download, repair, removal of unwanted hetero groups, and a short
//! test simulation.
//!
//! ## Architecture
//!
//! - **[`core`]: The Foundation.** Stateless PDB record handling, residue
//!   presets, and the streaming HETATM filter.
//!
//! - **[`engine`]: The Logic Core.** Pipeline configuration, progress
//!   reporting, errors, and the collaborators that call out to the RCSB
//!   download service, PDBFixer, and easy-md.
//!
//! - **[`workflows`]: The Public API.** Runs the complete preparation
//!   pipeline against a set of collaborators.

pub mod core;
pub mod engine;
pub mod workflows;
