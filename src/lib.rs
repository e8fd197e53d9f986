pub mod config;
pub mod fetch;
pub mod process;
pub mod report;
pub mod run;

pub use config::Config;
pub use process::{Issue, ValidationError};
pub use run::{run, RunOutcome};
