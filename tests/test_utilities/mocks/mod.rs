mod mock_source;
mod mock_surface;

pub use mock_source::MockSource;
pub use mock_surface::RecordingSurface;
