//! Steps of the preparation pipeline that delegate to outside collaborators.
//!
//! Each step is expressed as a trait ([`download::StructureSource`],
//! [`repair::StructureRepairer`], [`simulate::SimulationRunner`]) with one
//! production implementation, so workflows can be exercised with test doubles.

pub mod command;
pub mod download;
pub mod repair;
pub mod simulate;
