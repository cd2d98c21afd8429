use crate::ports::outbound::ReportSurface;

/// PdfSurface - a minimal single-font PDF implementation of `ReportSurface`.
///
/// Emits US-Letter pages with uncompressed Helvetica text content streams
/// and a hand-built cross-reference table. Deliberately small: the renderer
/// only ever writes left-aligned lines at a handful of font sizes, so no
/// wrapping, styling, or font embedding is needed here.
pub struct PdfSurface {
    pages: Vec<String>,
    cursor: f32,
}

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const LEFT_MARGIN: f32 = 72.0;
const TOP_MARGIN: f32 = 72.0;

/// Vertical advance per written line, relative to its font size.
const LINE_SPACING: f32 = 1.4;

/// Advance of one `move_down(1.0)` step, in points.
const BASE_LINE_HEIGHT: f32 = 14.0;

impl PdfSurface {
    pub fn new() -> Self {
        Self {
            pages: vec![String::new()],
            cursor: TOP_MARGIN,
        }
    }

    /// Escapes a string for a PDF literal string object.
    fn escape(text: &str) -> String {
        let mut escaped = String::with_capacity(text.len());
        for c in text.chars() {
            match c {
                '\\' => escaped.push_str("\\\\"),
                '(' => escaped.push_str("\\("),
                ')' => escaped.push_str("\\)"),
                _ => escaped.push(c),
            }
        }
        escaped
    }

    /// Assembles the document: header, objects, xref table, trailer.
    ///
    /// Object layout: 1 catalog, 2 page tree, 3 font, then an alternating
    /// page/content pair per page.
    pub fn into_bytes(self) -> Vec<u8> {
        let page_count = self.pages.len();
        let object_count = 3 + 2 * page_count;

        let mut body = Vec::new();
        let mut offsets = Vec::with_capacity(object_count);
        body.extend_from_slice(b"%PDF-1.4\n");

        let push_object = |body: &mut Vec<u8>, offsets: &mut Vec<usize>, content: String| {
            offsets.push(body.len());
            body.extend_from_slice(content.as_bytes());
        };

        push_object(
            &mut body,
            &mut offsets,
            "1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n".to_string(),
        );

        let kids: Vec<String> = (0..page_count).map(|i| format!("{} 0 R", 4 + 2 * i)).collect();
        push_object(
            &mut body,
            &mut offsets,
            format!(
                "2 0 obj\n<< /Type /Pages /Kids [{}] /Count {} >>\nendobj\n",
                kids.join(" "),
                page_count
            ),
        );

        push_object(
            &mut body,
            &mut offsets,
            "3 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>\nendobj\n".to_string(),
        );

        for (i, content) in self.pages.iter().enumerate() {
            let page_id = 4 + 2 * i;
            let content_id = page_id + 1;
            push_object(
                &mut body,
                &mut offsets,
                format!(
                    "{} 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                     /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>\nendobj\n",
                    page_id, PAGE_WIDTH, PAGE_HEIGHT, content_id
                ),
            );
            push_object(
                &mut body,
                &mut offsets,
                format!(
                    "{} 0 obj\n<< /Length {} >>\nstream\n{}endstream\nendobj\n",
                    content_id,
                    content.len(),
                    content
                ),
            );
        }

        let xref_offset = body.len();
        let mut trailer = format!("xref\n0 {}\n0000000000 65535 f \n", object_count + 1);
        for offset in &offsets {
            trailer.push_str(&format!("{:010} 00000 n \n", offset));
        }
        trailer.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            object_count + 1,
            xref_offset
        ));
        body.extend_from_slice(trailer.as_bytes());
        body
    }
}

impl Default for PdfSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportSurface for PdfSurface {
    fn write_line(&mut self, font_size: f32, text: &str) {
        // PDF y-coordinates grow upward; the cursor grows downward from the
        // page top, so the baseline sits at cursor + font size from the top.
        let baseline = PAGE_HEIGHT - self.cursor - font_size;
        let content = self.pages.last_mut().expect("at least one page");
        content.push_str(&format!(
            "BT /F1 {} Tf 1 0 0 1 {} {} Tm ({}) Tj ET\n",
            font_size,
            LEFT_MARGIN,
            baseline,
            Self::escape(text)
        ));
        self.cursor += font_size * LINE_SPACING;
    }

    fn move_down(&mut self, lines: f32) {
        self.cursor += lines * BASE_LINE_HEIGHT;
    }

    fn add_page(&mut self) {
        self.pages.push(String::new());
        self.cursor = TOP_MARGIN;
    }

    fn cursor(&self) -> f32 {
        self.cursor
    }
}
