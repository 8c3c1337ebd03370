// Adapters layer: concrete implementations of the domain ports.

pub mod http;
pub mod native;
pub mod quantum;

pub use http::{RepoStatusChecker, SkippedStatusCheck};
pub use native::NativeLibrary;
pub use quantum::{ExpectationSimulator, UnavailableQuantum};
