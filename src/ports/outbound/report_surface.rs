/// ReportSurface port - the drawing surface a report is written onto.
///
/// The renderer owns layout policy (what to write, where to break pages);
/// the surface owns presentation (how a line of text at a font size becomes
/// bytes). The vertical cursor grows downward from the top of the page, in
/// points, so the renderer can compare it against its page-break thresholds.
pub trait ReportSurface {
    /// Writes one line of text at the given font size and advances the cursor.
    fn write_line(&mut self, font_size: f32, text: &str);

    /// Advances the cursor by a multiple of the base line height.
    fn move_down(&mut self, lines: f32);

    /// Starts a new page and resets the cursor to the top margin.
    fn add_page(&mut self);

    /// Current vertical cursor position, in points from the page top.
    fn cursor(&self) -> f32;
}
