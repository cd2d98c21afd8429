pub mod report_surface;
pub mod vulnerability_source;

pub use report_surface::ReportSurface;
pub use vulnerability_source::VulnerabilitySource;
