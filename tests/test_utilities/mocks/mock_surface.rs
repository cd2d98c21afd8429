use depscan::prelude::*;

/// Mock ReportSurface that records written lines per page, using the same
/// cursor arithmetic as the PDF surface (1.4 line spacing, 14pt base line
/// height, 72pt top margin).
pub struct RecordingSurface {
    pub lines: Vec<(usize, String)>,
    pub pages: usize,
    cursor: f32,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            pages: 1,
            cursor: 72.0,
        }
    }

    /// All recorded text joined with newlines, for content assertions.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|(_, line)| line.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportSurface for RecordingSurface {
    fn write_line(&mut self, font_size: f32, text: &str) {
        self.lines.push((self.pages, text.to_string()));
        self.cursor += font_size * 1.4;
    }

    fn move_down(&mut self, lines: f32) {
        self.cursor += lines * 14.0;
    }

    fn add_page(&mut self) {
        self.pages += 1;
        self.cursor = 72.0;
    }

    fn cursor(&self) -> f32 {
        self.cursor
    }
}
