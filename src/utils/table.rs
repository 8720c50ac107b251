//! Table rendering for CLI output. Column widths follow the content.

use crate::utils::formatting::visible_len;

pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn widths(&self) -> Vec<usize> {
        let mut w: Vec<usize> = self.headers.iter().map(|h| visible_len(h)).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate().take(w.len()) {
                w[i] = w[i].max(visible_len(cell));
            }
        }
        w
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let mut out = String::new();

        let line = |cells: &[String], out: &mut String| {
            for (i, width) in widths.iter().enumerate() {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                out.push_str(cell);
                out.push_str(&" ".repeat(width.saturating_sub(visible_len(cell)) + 1));
            }
            let trimmed = out.trim_end_matches(' ').len();
            out.truncate(trimmed);
            out.push('\n');
        };

        line(&self.headers[..], &mut out);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        line(&rule[..], &mut out);
        for row in &self.rows {
            line(&row[..], &mut out);
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_aligns_on_visible_width() {
        let mut t = Table::new(["date", "status"]);
        t.add_row(vec!["2025-03-10".into(), "\x1b[32mregular\x1b[0m".into()]);
        let out = t.render();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "date       status");
        assert_eq!(lines[1], "---------- -------");
        assert!(lines[2].starts_with("2025-03-10 "));
    }

    #[test]
    fn test_render_aligns_wide_and_combining_names() {
        let mut t = Table::new(["name", "id"]);
        t.add_row(vec!["Jose\u{301}".into(), "1".into()]);
        t.add_row(vec!["Joao".into(), "2".into()]);
        t.add_row(vec!["李明".into(), "3".into()]);
        let out = t.render();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[2], "Jose\u{301} 1");
        assert_eq!(lines[3], "Joao 2");
        assert_eq!(lines[4], "李明 3");
    }
}
