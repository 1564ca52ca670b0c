//! Status output for the CI log
//!
//! Plain, line-oriented output with `console` styling. Colors are dropped
//! automatically when the log is not a terminal.

mod output;

pub use output::{done, key_value, section, step_ok, step_warn};
