//! Box-drawn tables for list output.

use console::measure_text_width;

/// A simple table for formatted output.
///
/// Column widths are measured in display columns, so styled or non-ASCII
/// cells stay aligned.
#[derive(Debug)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    widths: Vec<usize>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        let headers: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
        let widths = headers.iter().map(|h| measure_text_width(h)).collect();

        Self {
            headers,
            rows: Vec::new(),
            widths,
        }
    }

    /// Add a row; extra cells beyond the header count are dropped.
    pub fn add_row<S: AsRef<str>>(&mut self, row: &[S]) {
        let row: Vec<String> = row
            .iter()
            .take(self.headers.len())
            .map(|s| s.as_ref().to_string())
            .collect();

        for (width, cell) in self.widths.iter_mut().zip(&row) {
            *width = (*width).max(measure_text_width(cell));
        }

        self.rows.push(row);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.rows.len() + 4);
        lines.push(self.border('┌', '┬', '┐'));
        lines.push(self.line(&self.headers));
        lines.push(self.border('├', '┼', '┤'));
        lines.extend(self.rows.iter().map(|row| self.line(row)));
        lines.push(self.border('└', '┴', '┘'));
        lines.join("\n")
    }

    fn border(&self, left: char, mid: char, right: char) -> String {
        let segments: Vec<String> = self.widths.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{}{}{}", left, segments.join(&mid.to_string()), right)
    }

    fn line(&self, row: &[String]) -> String {
        let mut s = String::from("│");
        for (i, width) in self.widths.iter().enumerate() {
            let cell = row.get(i).map(String::as_str).unwrap_or("");
            let pad = width.saturating_sub(measure_text_width(cell));
            s.push(' ');
            s.push_str(cell);
            s.push_str(&" ".repeat(pad));
            s.push_str(" │");
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table_renders_headers() {
        let table = Table::new(&["#", "Name"]);
        assert!(table.is_empty());
        let output = table.render();
        assert!(output.contains("Name"));
        assert_eq!(output.lines().count(), 4);
    }

    #[test]
    fn rows_are_aligned() {
        let mut table = Table::new(&["Name", "Type"]);
        table.add_row(&["react-button", "local"]);
        table.add_row(&["x", "remote"]);

        let output = table.render();
        let widths: Vec<usize> = output.lines().map(measure_text_width).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn missing_cells_render_blank() {
        let mut table = Table::new(&["A", "B", "C"]);
        table.add_row(&["only"]);
        assert!(table.render().contains("only"));
    }

    #[test]
    fn unicode_cells_keep_alignment() {
        let mut table = Table::new(&["Tags"]);
        table.add_row(&["ü, ö"]);
        table.add_row(&["plain"]);
        let output = table.render();
        let widths: Vec<usize> = output.lines().map(measure_text_width).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
    }
}
