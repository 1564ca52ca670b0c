//! CLI command implementations

pub mod plan;
pub mod run;

pub use plan::execute as plan;
pub use run::execute as run;
