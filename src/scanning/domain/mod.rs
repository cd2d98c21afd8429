pub mod dependency;
pub mod scan_result;
pub mod vulnerability;

pub use dependency::{Dependency, Ecosystem};
pub use scan_result::{DependencyFinding, ScanResult};
pub use vulnerability::{Severity, Vulnerability};
