//! Painting laid-out pages for CLI output.
//!
//! Text output maps layout units onto a character grid: `x / char_width`
//! columns across, and one text line per distinct cell `y` (a band). Bottom
//! and top borders become `-` rules (`=` for double lines), left and right
//! borders become `|`. Bold and italic cells are styled with `console`,
//! which leaves the text plain when stdout is not a terminal.

use std::collections::BTreeMap;

use console::Style;
use serde::Serialize;
use wabitlib::{BorderEdge, BorderLine, Cell, HorizontalAlignment, MonospaceMetrics, Page};

/// JSON document for `--output json`
#[derive(Debug, Serialize)]
struct PagesOutput<'a> {
    page_count: usize,
    pages: Vec<PageOutput<'a>>,
}

#[derive(Debug, Serialize)]
struct PageOutput<'a> {
    number: usize,
    cells: &'a [Cell],
}

/// Serialize the pages and their cells as pretty JSON
pub fn render_json(pages: &[Page]) -> anyhow::Result<String> {
    let output = PagesOutput {
        page_count: pages.len(),
        pages: pages
            .iter()
            .enumerate()
            .map(|(i, page)| PageOutput {
                number: i + 1,
                cells: page.cells(),
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&output)? + "\n")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Emphasis {
    Plain,
    Bold,
    Italic,
    BoldItalic,
}

impl Emphasis {
    fn of(cell: &Cell) -> Self {
        match (cell.font().bold, cell.font().italic) {
            (false, false) => Emphasis::Plain,
            (true, false) => Emphasis::Bold,
            (false, true) => Emphasis::Italic,
            (true, true) => Emphasis::BoldItalic,
        }
    }

    fn style(self) -> Style {
        match self {
            Emphasis::Plain => Style::new(),
            Emphasis::Bold => Style::new().bold(),
            Emphasis::Italic => Style::new().italic(),
            Emphasis::BoldItalic => Style::new().bold().italic(),
        }
    }
}

/// One line of the character grid
struct Line {
    chars: Vec<char>,
    emphasis: Vec<Emphasis>,
}

impl Line {
    fn new() -> Self {
        Self {
            chars: Vec::new(),
            emphasis: Vec::new(),
        }
    }

    fn put(&mut self, at: usize, c: char, emphasis: Emphasis) {
        if self.chars.len() <= at {
            self.chars.resize(at + 1, ' ');
            self.emphasis.resize(at + 1, Emphasis::Plain);
        }
        self.chars[at] = c;
        self.emphasis[at] = emphasis;
    }

    fn is_blank(&self) -> bool {
        self.chars.iter().all(|c| *c == ' ')
    }

    /// Render with trailing spaces removed, styling runs of equal emphasis
    fn finish(&self) -> String {
        let end = self
            .chars
            .iter()
            .rposition(|c| *c != ' ')
            .map_or(0, |i| i + 1);

        let mut out = String::new();
        let mut start = 0;
        while start < end {
            let emphasis = self.emphasis[start];
            let run_end = (start..end)
                .find(|&i| self.emphasis[i] != emphasis)
                .unwrap_or(end);
            let text: String = self.chars[start..run_end].iter().collect();
            if emphasis == Emphasis::Plain {
                out.push_str(&text);
            } else {
                out.push_str(&emphasis.style().apply_to(text).to_string());
            }
            start = run_end;
        }
        out
    }
}

/// Character span `[start, end)` a cell covers
fn span(cell: &Cell, char_width: i32) -> (usize, usize) {
    let bounds = cell.bounds();
    let start = (bounds.x / char_width).max(0) as usize;
    let width = (bounds.width / char_width).max(0) as usize;
    (start, start + width)
}

/// Rule line for one horizontal edge of a band, if any cell draws it
fn rule(cells: &[&Cell], edge: BorderEdge, char_width: i32) -> Option<Line> {
    let mut line = Line::new();
    for cell in cells {
        let c = match cell.borders().edge(edge) {
            BorderLine::None => continue,
            BorderLine::Single => '-',
            BorderLine::Double => '=',
        };
        let (start, end) = span(cell, char_width);
        for at in start..end {
            line.put(at, c, Emphasis::Plain);
        }
    }
    (!line.is_blank()).then_some(line)
}

/// Write a cell's text and vertical borders into a line
fn paint_cell(line: &mut Line, cell: &Cell, (start, end): (usize, usize)) {
    let borders = cell.borders();
    let mut left = start;
    let mut right = end;
    if borders.has(BorderEdge::Left) {
        line.put(left, '|', Emphasis::Plain);
        left += 1;
    }
    if borders.has(BorderEdge::Right) && right > left {
        right -= 1;
        line.put(right, '|', Emphasis::Plain);
    }

    let available = right.saturating_sub(left);
    let text: Vec<char> = cell.text().chars().take(available).collect();
    let offset = match cell.alignment() {
        HorizontalAlignment::Left => 0,
        HorizontalAlignment::Right => available - text.len(),
        HorizontalAlignment::Center => (available - text.len()) / 2,
    };
    let emphasis = Emphasis::of(cell);
    for (i, c) in text.into_iter().enumerate() {
        line.put(left + offset + i, c, emphasis);
    }
}

/// The text lines of a band.
///
/// Cells that overlap an earlier cell of the band (a totals label running
/// across the total columns) move down to the next line.
fn text_lines(cells: &[&Cell], char_width: i32) -> Vec<Line> {
    let mut lines: Vec<(Line, Vec<(usize, usize)>)> = Vec::new();
    for cell in cells {
        let (start, end) = span(cell, char_width);
        if start == end {
            continue;
        }
        let free = lines
            .iter()
            .position(|(_, taken)| taken.iter().all(|&(s, e)| end <= s || start >= e));
        let index = match free {
            Some(index) => index,
            None => {
                lines.push((Line::new(), Vec::new()));
                lines.len() - 1
            }
        };
        let (line, taken) = &mut lines[index];
        paint_cell(line, cell, (start, end));
        taken.push((start, end));
    }
    lines.into_iter().map(|(line, _)| line).collect()
}

/// Paint one page as text lines
fn render_page(page: &Page, char_width: i32) -> Vec<String> {
    let mut bands: BTreeMap<i32, Vec<&Cell>> = BTreeMap::new();
    for cell in page.cells() {
        bands.entry(cell.bounds().y).or_default().push(cell);
    }

    let mut lines = Vec::new();
    for cells in bands.values() {
        if cells.iter().all(|c| span(c, char_width).0 == span(c, char_width).1) {
            continue;
        }
        if let Some(top) = rule(cells, BorderEdge::Top, char_width) {
            lines.push(top.finish());
        }
        lines.extend(text_lines(cells, char_width).iter().map(Line::finish));
        if let Some(bottom) = rule(cells, BorderEdge::Bottom, char_width) {
            lines.push(bottom.finish());
        }
    }
    lines
}

/// Paint every page as text, each under a page divider
pub fn render_text(pages: &[Page], metrics: &MonospaceMetrics) -> String {
    let divider = Style::new().dim();
    let mut out = String::new();
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(
            &divider
                .apply_to(format!("--- Page {} of {} ---", i + 1, pages.len()))
                .to_string(),
        );
        out.push('\n');
        for line in render_page(page, metrics.char_width) {
            out.push_str(&line);
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use wabitlib::{
        BorderStyle, CachedRowSet, ColumnSpec, LayoutOptions, ReportLayout, Value,
    };

    fn metrics() -> MonospaceMetrics {
        MonospaceMetrics::new(1, 1)
    }

    fn pages(columns: Vec<ColumnSpec>, rows: Vec<Vec<Value>>, options: LayoutOptions) -> Vec<Page> {
        let names = columns.iter().map(|c| c.name.clone()).collect();
        let cursor = CachedRowSet::new(names, rows).unwrap();
        ReportLayout::new(cursor, columns, options, metrics())
            .layout()
            .unwrap()
    }

    #[test]
    fn test_text_layout() {
        console::set_colors_enabled(false);
        let columns = vec![
            ColumnSpec::new("Region", 10).section_break(),
            ColumnSpec::new("City", 10),
            ColumnSpec::numeric("Sales", 8).subtotal(),
        ];
        let rows = vec![
            vec![Value::text("East"), Value::text("Boston"), Value::from(10)],
            vec![Value::text("East"), Value::text("Albany"), Value::from(5)],
        ];
        let text = render_text(&pages(columns, rows, LayoutOptions::new()), &metrics());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "--- Page 1 of 1 ---");
        assert_eq!(lines[1], "   Region: East");
        assert_eq!(lines[2], "------------------");
        assert_eq!(lines[3], "City         Sales");
        assert_eq!(lines[4], "Boston          10");
        assert_eq!(lines[5], "Albany           5");
        // the label overlaps the total column, so the total drops a line
        assert_eq!(lines[6], "Total:  Region: East");
        assert_eq!(lines[7], "                15");
    }

    #[test]
    fn test_vertical_borders() {
        console::set_colors_enabled(false);
        let columns = vec![ColumnSpec::new("A", 5), ColumnSpec::new("B", 5)];
        let rows = vec![vec![Value::text("x"), Value::text("y")]];
        let text = render_text(
            &pages(columns, rows, LayoutOptions::new().border_style(BorderStyle::Full)),
            &metrics(),
        );
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.last(), Some(&"----------"));
        assert!(lines.contains(&"|x  ||y  |"));
    }

    #[test]
    fn test_page_dividers() {
        console::set_colors_enabled(false);
        let columns = vec![ColumnSpec::new("A", 5)];
        let rows = vec![vec![Value::text("x")], vec![Value::text("y")]];
        let text = render_text(
            &pages(columns, rows, LayoutOptions::new().page_size(10, 7)),
            &metrics(),
        );
        assert!(text.contains("--- Page 1 of 2 ---"));
        assert!(text.contains("--- Page 2 of 2 ---"));
    }

    #[test]
    fn test_json_output() {
        let columns = vec![ColumnSpec::new("A", 5)];
        let rows = vec![vec![Value::text("x")]];
        let json = render_json(&pages(columns, rows, LayoutOptions::new())).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["page_count"], 1);
        let cells = parsed["pages"][0]["cells"].as_array().unwrap();
        assert_eq!(cells.last().unwrap()["text"], "x");
        assert_eq!(cells.last().unwrap()["bounds"]["y"], 3);
    }
}
