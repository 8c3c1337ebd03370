pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{cli::Command, CliConfig};

pub use crate::config::toml_config::NodeConfig;
pub use crate::core::{
    code_generator::{generate_code, CodeGenerator, DigestMode, DEFAULT_CODE_LENGTH},
    node::LoreNode,
    numeric::{fib_sequence, golden_ratio, is_fibonacci},
    ratio_planner::{build_plan, snap, PlanCache, RatioPlanner},
    usage::predict_usage,
};
pub use crate::domain::model::{Code, NodeReport, QuantumPulse, RatioPlan, UsageWindow};
pub use crate::utils::error::{LoreError, Result};
