//! The report layout engine.
//!
//! [`ReportLayout`] walks a [`RowCursor`] once, from the first row to the
//! last, and turns it into pages of positioned [`Cell`]s:
//!
//! - a section header and a column-header row whenever the BREAK columns
//!   change,
//! - one cell per visible column for every data row, with repeated GROUP
//!   values collapsed,
//! - a totals line whenever a group or section closes,
//! - an optional grand-total line at the end.
//!
//! Every emitted batch goes through the [`Paginator`], so a logical row is
//! never split across pages. When a data row spills onto a new page the
//! current headers are repeated above it.
//!
//! ## Example
//!
//! ```rust
//! use wabitlib::{CachedRowSet, ColumnSpec, LayoutOptions, MonospaceMetrics, ReportLayout, Value};
//!
//! let columns = vec![
//!     ColumnSpec::new("Region", 80).section_break(),
//!     ColumnSpec::numeric("Sales", 60).subtotal(),
//! ];
//! let rows = CachedRowSet::new(
//!     vec!["Region".into(), "Sales".into()],
//!     vec![
//!         vec![Value::text("East"), Value::from(10)],
//!         vec![Value::text("West"), Value::from(5)],
//!     ],
//! )
//! .unwrap();
//!
//! let mut layout = ReportLayout::new(
//!     rows,
//!     columns,
//!     LayoutOptions::new().grand_totals(true),
//!     MonospaceMetrics::default(),
//! );
//! let pages = layout.layout().unwrap();
//! assert_eq!(pages.len(), 1);
//! ```

use crate::cell::{max_height, BorderEdge, BorderLine, Borders, Cell, Rect};
use crate::column::{visible_width, x_offset, ColumnSpec, HorizontalAlignment};
use crate::cursor::{Row, RowCursor};
use crate::error::LayoutError;
use crate::font::FontMetrics;
use crate::options::{BorderStyle, LayoutOptions, BORDER_LINE_SIZE};
use crate::page::{Page, Paginator};
use crate::section::{is_new_section, section_key_of, SectionDetector, SectionKey};
use crate::totals::{TotalsLine, TotalsTracker};
use crate::value::Value;
use crate::Result;

/// Where an engine is in its single permitted run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutState {
    NotStarted,
    InProgress,
    Completed,
}

/// A single-use layout of one result set.
///
/// Create a new engine for every layout; [`layout`](ReportLayout::layout)
/// fails with [`LayoutError::AlreadyLaidOut`] on a second call, even if the
/// first call failed.
#[derive(Debug)]
pub struct ReportLayout<C, M> {
    cursor: C,
    columns: Vec<ColumnSpec>,
    options: LayoutOptions,
    metrics: M,
    state: LayoutState,
}

impl<C: RowCursor, M: FontMetrics> ReportLayout<C, M> {
    pub fn new(cursor: C, columns: Vec<ColumnSpec>, options: LayoutOptions, metrics: M) -> Self {
        Self {
            cursor,
            columns,
            options,
            metrics,
            state: LayoutState::NotStarted,
        }
    }

    pub fn state(&self) -> LayoutState {
        self.state
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Give the cursor back, e.g. to reuse its rows for another layout.
    pub fn into_cursor(self) -> C {
        self.cursor
    }

    /// Lay out every row of the cursor into pages.
    ///
    /// The cursor is rewound first. Either the whole layout succeeds or an
    /// error is returned and no pages are produced.
    pub fn layout(&mut self) -> Result<Vec<Page>> {
        if self.state != LayoutState::NotStarted {
            return Err(LayoutError::AlreadyLaidOut);
        }
        self.state = LayoutState::InProgress;

        let expected = self.columns.len();
        let actual = self.cursor.column_count();
        if expected != actual {
            return Err(LayoutError::ColumnCountMismatch { expected, actual });
        }

        let renderer = CellRenderer::new(&self.columns, &self.options, &self.metrics);
        let pages = LayoutRun::new(&renderer).run(&mut self.cursor)?;

        self.state = LayoutState::Completed;
        Ok(pages)
    }
}

/// Builds the cells of each kind of report row.
///
/// The renderer is stateless: every method takes the y offset at which the
/// batch starts and returns new cells.
#[derive(Debug)]
pub struct CellRenderer<'a, M> {
    columns: &'a [ColumnSpec],
    options: &'a LayoutOptions,
    metrics: &'a M,
    first_visible: Option<usize>,
    last_visible: Option<usize>,
}

impl<'a, M: FontMetrics> CellRenderer<'a, M> {
    pub fn new(columns: &'a [ColumnSpec], options: &'a LayoutOptions, metrics: &'a M) -> Self {
        let mut visible = columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_visible())
            .map(|(i, _)| i);
        let first_visible = visible.next();
        let last_visible = visible.last().or(first_visible);
        Self {
            columns,
            options,
            metrics,
            first_visible,
            last_visible,
        }
    }

    fn style(&self) -> BorderStyle {
        self.options.border_style
    }

    fn visible_columns(&self) -> impl Iterator<Item = (usize, &'a ColumnSpec)> {
        let columns: &'a [ColumnSpec] = self.columns;
        columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_visible())
    }

    /// Native string of a value, or the null string.
    fn plain_text(&self, value: &Value) -> String {
        value
            .as_display()
            .unwrap_or_else(|| self.options.null_string.clone())
    }

    /// Display text of a data value: the column's formatter for non-null
    /// values, the native string otherwise.
    fn display_text(&self, column: &ColumnSpec, value: &Value) -> Result<String> {
        match &column.format {
            Some(format) if !value.is_null() => {
                format.format(value).map_err(|source| LayoutError::Format {
                    column: column.name.clone(),
                    source,
                })
            }
            _ => Ok(self.plain_text(value)),
        }
    }

    /// A single centred cell naming the section, bordered below.
    ///
    /// An all-null key yields an empty zero-size cell.
    pub fn section_header(&self, key: &SectionKey, y: i32) -> Cell {
        let text = key.header_text(self.columns);
        let font = &self.options.header_font;
        if text.trim().is_empty() {
            return Cell::new("", font.clone(), Rect::new(0, y, 0, 0));
        }

        let padding = self.style().padding(None);
        let width = visible_width(self.columns).min(self.options.available_width);
        let height = self.metrics.line_height(font) + padding.vertical() + BORDER_LINE_SIZE;
        Cell::new(text, font.clone(), Rect::new(0, y, width, height))
            .with_padding(padding)
            .with_alignment(HorizontalAlignment::Center)
            .with_borders(Borders::none().with_edge(BorderEdge::Bottom))
    }

    /// One header cell per visible column.
    pub fn column_header(&self, y: i32) -> Vec<Cell> {
        let font = &self.options.header_font;
        let line_height = self.metrics.line_height(font);
        self.visible_columns()
            .map(|(index, column)| {
                let padding = self.style().padding(Some(column));
                let text = if column.name.is_empty() {
                    self.options.null_string.clone()
                } else {
                    column.name.clone()
                };
                Cell::new(
                    text,
                    font.clone(),
                    Rect::new(
                        x_offset(self.columns, index),
                        y,
                        column.width,
                        line_height + padding.vertical(),
                    ),
                )
                .with_padding(padding)
                .with_alignment(column.alignment)
            })
            .collect()
    }

    /// Cells for one data row.
    ///
    /// `previous` is the prior row of the same section, if any. A GROUP value
    /// equal to the previous row's is blanked, or shown as `"(value)"` in the
    /// italic-toggled body font when `show_as_repeat` is set.
    pub fn data_row(
        &self,
        row: &[Value],
        previous: Option<&[Value]>,
        y: i32,
        show_as_repeat: bool,
    ) -> Result<Vec<Cell>> {
        let line_height = self.metrics.line_height(&self.options.body_font);
        let mut cells = Vec::with_capacity(self.columns.len());

        for (index, column) in self.visible_columns() {
            let value = &row[index];
            let mut text = self.display_text(column, value)?;
            let mut font = self.options.body_font.clone();

            let repeated = column.is_group() && previous.is_some_and(|prev| prev[index] == *value);
            if repeated {
                if show_as_repeat {
                    text = format!("({})", text);
                    font = font.italic_toggled();
                } else {
                    text.clear();
                }
            }

            let padding = self.style().padding(Some(column));
            cells.push(
                Cell::new(
                    text,
                    font,
                    Rect::new(
                        x_offset(self.columns, index),
                        y,
                        column.width,
                        line_height + padding.vertical(),
                    ),
                )
                .with_padding(padding)
                .with_alignment(column.alignment)
                .with_borders(self.data_borders(index)),
            );
        }
        Ok(cells)
    }

    /// Border edges of a data cell in column `index`.
    ///
    /// Outer verticals (left of the first visible column, right of the last)
    /// are only drawn by the OUTSIDE and FULL styles.
    fn data_borders(&self, index: usize) -> Borders {
        let style = self.style();
        let mut borders = Borders::none();
        if style.draws_horizontal() {
            borders = borders
                .with_edge(BorderEdge::Top)
                .with_edge(BorderEdge::Bottom);
        }

        let vertical = |outer: bool| {
            if outer {
                style.draws_outer_vertical()
            } else {
                style.draws_inner_vertical()
            }
        };
        if vertical(self.first_visible == Some(index)) {
            borders = borders.with_edge(BorderEdge::Left);
        }
        if vertical(self.last_visible == Some(index)) {
            borders = borders.with_edge(BorderEdge::Right);
        }
        borders
    }

    /// Cells for a totals line: a label anchored at the line's column and a
    /// bold cell for every visible column with a total.
    ///
    /// Returns no cells when the line holds no total at all.
    pub fn totals(&self, line: &TotalsLine, grand: bool, y: i32) -> Result<Vec<Cell>> {
        if !line.totals.has_totals() {
            return Ok(Vec::new());
        }

        let header_font = &self.options.header_font;
        let bold_body = self.options.body_font.bolded();
        let header_height = self.metrics.line_height(header_font);
        let row_height = self.metrics.line_height(&bold_body).max(header_height);

        let text = if grand {
            "Grand Total".to_string()
        } else {
            format!("Total: {}", line.label)
        };
        let insets = self.style().padding(None);
        let width = self.metrics.string_width(header_font, &text) + 1 + insets.horizontal();
        let mut height = header_height + insets.vertical() + header_height / 2;
        if grand {
            height += 2 * BORDER_LINE_SIZE;
        }

        let mut cells = vec![Cell::new(
            text,
            header_font.clone(),
            Rect::new(x_offset(self.columns, line.anchor_column), y, width, height),
        )
        .with_padding(insets)];

        for (index, column) in self.visible_columns() {
            let Some(total) = line.totals.get(index) else {
                continue;
            };
            let text = self.display_text(column, &Value::Number(total))?;

            let padding = self.style().padding(Some(column));
            let mut height = row_height + padding.vertical();
            let mut borders = Borders::none();
            if grand {
                height += 2 * BORDER_LINE_SIZE;
                borders = borders.with(BorderEdge::Top, BorderLine::Double);
            }

            cells.push(
                Cell::new(
                    text,
                    bold_body.clone(),
                    Rect::new(x_offset(self.columns, index), y, column.width, height),
                )
                .with_padding(padding)
                .with_alignment(column.alignment)
                .with_borders(borders),
            );
        }
        Ok(cells)
    }
}

/// Mutable state of one pass over the rows.
struct LayoutRun<'r, 'a, M> {
    renderer: &'r CellRenderer<'a, M>,
    tracker: TotalsTracker,
    detector: SectionDetector,
    pages: Paginator,
    section_header: Vec<Cell>,
    column_header: Vec<Cell>,
    previous: Option<Row>,
    rows: usize,
}

impl<'r, 'a, M: FontMetrics> LayoutRun<'r, 'a, M> {
    fn new(renderer: &'r CellRenderer<'a, M>) -> Self {
        let options = renderer.options;
        Self {
            renderer,
            tracker: TotalsTracker::new(renderer.columns, options.null_subtotals),
            detector: SectionDetector::new(),
            pages: Paginator::new(options.page_height),
            section_header: Vec::new(),
            column_header: Vec::new(),
            previous: None,
            rows: 0,
        }
    }

    fn run<C: RowCursor>(mut self, cursor: &mut C) -> Result<Vec<Page>> {
        let columns = self.renderer.columns;

        cursor.rewind();
        while cursor.advance() {
            self.rows += 1;
            let row = cursor.row()?;

            let key = section_key_of(&row, columns);
            if self
                .detector
                .observe(self.rows, cursor.is_first(), key.clone())?
            {
                self.start_section(&key);
            }

            self.place_row(&row)?;
            self.tracker.accumulate(&row, self.rows)?;

            match cursor.peek_next()? {
                Some(next) if !is_new_section(self.detector.current(), &section_key_of(&next, columns)) => {
                    for column in self.tracker.group_columns_desc() {
                        if row[column] != next[column] {
                            self.close_group(column, &row)?;
                        }
                    }
                }
                _ => self.close_section(&row)?,
            }

            self.previous = Some(row);
        }

        if self.renderer.options.grand_totals {
            let line = self.tracker.flush_grand();
            tracing::debug!(totals = ?line.totals.values(), "grand totals");
            let cells = self.renderer.totals(&line, true, self.pages.y())?;
            self.pages.append(cells);
        }

        let pages = self.pages.into_pages();
        tracing::info!(pages = pages.len(), rows = self.rows, "layout complete");
        Ok(pages)
    }

    fn start_section(&mut self, key: &SectionKey) {
        let header = self.renderer.section_header(key, self.pages.y());
        tracing::debug!(row = self.rows, header = header.text(), "section start");

        self.previous = None;
        self.section_header = vec![header];
        self.pages.append(self.section_header.clone());
        self.column_header = self.renderer.column_header(self.pages.y());
        self.pages.append(self.column_header.clone());
    }

    /// Place a data row, repeating the headers if it starts a new page.
    fn place_row(&mut self, row: &[Value]) -> Result<()> {
        let options = self.renderer.options;
        let previous = self.previous.as_deref();

        let cells = self.renderer.data_row(
            row,
            previous,
            self.pages.y(),
            options.show_groups_as_repeat,
        )?;
        if !self.pages.needs_break(max_height(&cells)) {
            self.pages.append(cells);
            tracing::trace!(row = self.rows, page = self.pages.current_page(), "row placed");
            return Ok(());
        }

        self.pages.new_page();
        if options.repeat_section_header {
            self.pages.append_copy(&self.section_header);
        }
        if options.repeat_column_header {
            self.pages.append_copy(&self.column_header);
        }
        let cells = self
            .renderer
            .data_row(row, previous, self.pages.y(), true)?;
        self.pages.append(cells);
        tracing::trace!(row = self.rows, page = self.pages.current_page(), "row placed after break");
        Ok(())
    }

    fn close_group(&mut self, column: usize, row: &[Value]) -> Result<()> {
        let label = format!(" {}", self.renderer.plain_text(&row[column]));
        if let Some(line) = self.tracker.flush_group(column, label) {
            tracing::debug!(row = self.rows, column, label = %line.label, "group totals");
            let cells = self.renderer.totals(&line, false, self.pages.y())?;
            self.pages.append(cells);
        }
        Ok(())
    }

    /// Close every group, innermost first, then the section itself.
    fn close_section(&mut self, row: &[Value]) -> Result<()> {
        for column in self.tracker.group_columns_desc() {
            self.close_group(column, row)?;
        }

        let label = self
            .detector
            .current()
            .map(|key| key.totals_label(self.renderer.columns))
            .unwrap_or_default();
        let line = self.tracker.flush_section(label);
        tracing::debug!(row = self.rows, label = %line.label, "section totals");
        let cells = self.renderer.totals(&line, false, self.pages.y())?;
        self.pages.append(cells);
        self.pages.skip(BORDER_LINE_SIZE);
        Ok(())
    }
}
