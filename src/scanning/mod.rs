/// Scanning domain - dependency, vulnerability, and scan result models.
pub mod domain;
