//! Runtime configuration for the demo binary.

mod runtime;

pub use runtime::{load_config, parse_cli, AnalysisConfig, OutputConfig, RuntimeConfig};
