//! Provides line-oriented processing of PDB structure files.
//!
//! The [`pdb`] module names the fixed columns of coordinate records, the
//! [`hetatm`] module implements hetero-group stripping on top of them, and
//! [`traits`] supplies the stream and path entry points shared by filters.

pub mod hetatm;
pub mod pdb;
pub mod traits;
