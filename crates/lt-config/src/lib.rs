//! Log Triage configuration loading and validation.
//!
//! Configuration is resolved once at process start with a deterministic
//! order (CLI override → environment variable → built-in default) and
//! then passed by value into component constructors. Component logic
//! never consults the environment again after startup.

pub mod resolve;

pub use resolve::{Config, ConfigError, ConfigOverrides};
