pub mod clean;
pub mod fetch;
pub mod repair;
pub mod run;
pub mod simulate;
