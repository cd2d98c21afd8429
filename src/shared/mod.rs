pub mod error;
pub mod result;

pub use error::ScanError;
pub use result::Result;
