//! In-memory PDF rendering for attendance reports.
//!
//! Builds A4 documents with a centered heading block and, for teacher
//! reports, a zebra-striped roster table that flows across pages. The
//! finished document is returned as bytes for the HTTP response body.

use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};

const PAGE_W: f32 = 595.0;
const PAGE_H: f32 = 842.0;
const MARGIN: f32 = 50.0;
const ROW_H: f32 = 20.0;

pub struct ReportPdf {
    pdf: Pdf,
    catalog_id: Ref,
    pages_id: Ref,
    font_id: Ref,
    page_refs: Vec<Ref>,
    current_content_id: Option<Ref>,
    next_id: i32,
}

impl Default for ReportPdf {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPdf {
    pub fn new() -> Self {
        let mut pdf = Pdf::new();

        let catalog_id = Ref::new(1);
        let pages_id = Ref::new(2);
        let font_id = Ref::new(3);
        let next_id = 4;

        pdf.type1_font(font_id).base_font(Name(b"Helvetica"));

        Self {
            pdf,
            catalog_id,
            pages_id,
            font_id,
            page_refs: Vec::new(),
            current_content_id: None,
            next_id,
        }
    }

    /// Renders the teacher view: heading block plus the full student roster
    /// as `(name, roll number, status)` rows.
    pub fn teacher_report(
        teacher_name: &str,
        subject: &str,
        period: &str,
        roster: &[(String, String, String)],
    ) -> Vec<u8> {
        let mut doc = Self::new();

        let mut content = doc.new_page();
        let mut y = PAGE_H - MARGIN;
        y = doc.heading_line(&mut content, y, 24.0, "Attendance Report");
        y = doc.heading_line(&mut content, y, 18.0, &format!("Teacher: {teacher_name}"));
        y = doc.heading_line(&mut content, y, 16.0, &format!("Subject: {subject}"));
        y = doc.heading_line(&mut content, y, 16.0, &format!("Period: {period}"));
        y -= ROW_H;
        doc.draw_text(&mut content, MARGIN, y, 18.0, "Student Attendance:");
        y -= ROW_H * 1.5;

        let rows: Vec<Vec<String>> = roster
            .iter()
            .map(|(name, roll, status)| {
                vec![name.clone(), roll.clone(), status.clone()]
            })
            .collect();
        doc.write_table(content, y, &["Name", "Roll No", "Status"], &rows);

        doc.finish()
    }

    /// Renders the single-student view: heading block only.
    pub fn student_report(student_name: &str, period: &str) -> Vec<u8> {
        let mut doc = Self::new();

        let mut content = doc.new_page();
        let mut y = PAGE_H - MARGIN;
        y = doc.heading_line(&mut content, y, 24.0, "Attendance Report");
        y = doc.heading_line(&mut content, y, 18.0, &format!("Student: {student_name}"));
        doc.heading_line(&mut content, y, 16.0, &format!("Period: {period}"));
        doc.finalize_page(content);

        doc.finish()
    }

    fn fresh_ref(&mut self) -> Ref {
        let id = self.next_id;
        self.next_id += 1;
        Ref::new(id)
    }

    /// Opens a new page and returns its content stream.
    fn new_page(&mut self) -> Content {
        let page_id = self.fresh_ref();
        let content_id = self.fresh_ref();

        self.page_refs.push(page_id);

        let mut page = self.pdf.page(page_id);
        page.parent(self.pages_id)
            .media_box(Rect::new(0.0, 0.0, PAGE_W, PAGE_H))
            .contents(content_id);
        page.resources().fonts().pair(Name(b"F1"), self.font_id);

        self.current_content_id = Some(content_id);

        Content::new()
    }

    fn finalize_page(&mut self, content: Content) {
        if let Some(id) = self.current_content_id {
            self.pdf.stream(id, &content.finish());
        }
    }

    fn draw_text(&self, content: &mut Content, x: f32, y: f32, size: f32, text: &str) {
        content.begin_text();
        content.set_font(Name(b"F1"), size);
        content.set_text_matrix([1.0, 0.0, 0.0, 1.0, x, y]);
        content.show(Str(text.as_bytes()));
        content.end_text();
    }

    /// Draws one centered heading line and returns the y of the next line.
    fn heading_line(&self, content: &mut Content, y: f32, size: f32, text: &str) -> f32 {
        // Helvetica averages roughly half the em per glyph; close enough to
        // center headings of this length.
        let width = text.len() as f32 * size * 0.5;
        let x = ((PAGE_W - width) / 2.0).max(MARGIN);
        self.draw_text(content, x, y - size, size, text);
        y - size - ROW_H * 0.75
    }

    fn draw_cell_borders(&self, content: &mut Content, x: f32, y: f32, w: f32, h: f32) {
        content.save_state();
        content.set_stroke_rgb(0.65, 0.65, 0.65);
        content.rect(x, y, w, h);
        content.stroke();
        content.restore_state();
    }

    fn draw_row(&self, content: &mut Content, y: f32, col_widths: &[f32], row: &[String], size: f32) {
        let mut x = MARGIN;
        for (i, text) in row.iter().enumerate() {
            let w = col_widths[i];
            self.draw_text(content, x + 4.0, y + 5.0, size, text);
            self.draw_cell_borders(content, x, y, w, ROW_H);
            x += w;
        }
    }

    /// Sizes columns to header + content and scales them to the page width.
    fn compute_col_widths(&self, headers: &[&str], rows: &[Vec<String>]) -> Vec<f32> {
        let mut widths: Vec<f32> = headers.iter().map(|h| h.len() as f32 * 6.5).collect();

        for row in rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = (cell.len() as f32 * 6.2).max(widths[i]);
            }
        }

        let total: f32 = widths.iter().sum();
        let max = PAGE_W - 2.0 * MARGIN;
        if total > max {
            let scale = max / total;
            for w in &mut widths {
                *w *= scale;
            }
        }

        widths
    }

    /// Writes the roster table starting at `y` on the already-open page,
    /// flowing onto fresh pages as needed.
    fn write_table(&mut self, mut content: Content, mut y: f32, headers: &[&str], rows: &[Vec<String>]) {
        let col_widths = self.compute_col_widths(headers, rows);
        let header_row: Vec<String> = headers.iter().map(|s| s.to_string()).collect();

        self.shade_row(&mut content, y, &col_widths, 0.85, 0.87, 0.90);
        self.draw_row(&mut content, y, &col_widths, &header_row, 11.0);
        y -= ROW_H;

        let mut remaining = rows;
        loop {
            let mut consumed = 0;
            for (i, row) in remaining.iter().enumerate() {
                if y - ROW_H < MARGIN {
                    break;
                }
                if i % 2 == 0 {
                    self.shade_row(&mut content, y, &col_widths, 0.96, 0.96, 0.96);
                }
                self.draw_row(&mut content, y, &col_widths, row, 10.0);
                y -= ROW_H;
                consumed += 1;
            }

            self.finalize_page(content);
            remaining = &remaining[consumed..];
            if remaining.is_empty() {
                return;
            }

            content = self.new_page();
            y = PAGE_H - MARGIN - ROW_H;
            self.shade_row(&mut content, y, &col_widths, 0.85, 0.87, 0.90);
            self.draw_row(&mut content, y, &col_widths, &header_row, 11.0);
            y -= ROW_H;
        }
    }

    fn shade_row(&self, content: &mut Content, y: f32, col_widths: &[f32], r: f32, g: f32, b: f32) {
        content.save_state();
        content.set_fill_rgb(r, g, b);
        content.rect(MARGIN, y, col_widths.iter().sum(), ROW_H);
        content.fill_nonzero();
        content.restore_state();
    }

    /// Builds the catalog and page tree and returns the document bytes.
    fn finish(mut self) -> Vec<u8> {
        self.pdf.catalog(self.catalog_id).pages(self.pages_id);
        let mut pages = self.pdf.pages(self.pages_id);
        pages.count(self.page_refs.len() as i32);
        pages.kids(self.page_refs.clone());
        drop(pages);

        self.pdf.finish()
    }
}
