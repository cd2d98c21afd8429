/// Report rendering: layout policy plus the PDF page surface.
pub mod pdf;
pub mod renderer;

pub use pdf::PdfSurface;
pub use renderer::ReportRenderer;
