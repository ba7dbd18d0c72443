//! Small value types shared by the pipeline stages.

pub mod ids;
