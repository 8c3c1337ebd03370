pub mod code_generator;
pub mod node;
pub mod numeric;
pub mod ratio_planner;
pub mod usage;

pub use crate::domain::model::{Code, NodeReport, QuantumPulse, RatioPlan, UsageWindow};
pub use crate::domain::ports::{NativeCompute, QuantumBackend, StatusChecker};
pub use crate::utils::error::Result;
