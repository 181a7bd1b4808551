//! Pages and page-break-aware placement of cell batches.

use serde::Serialize;

use crate::cell::{max_height, Cell};

/// An ordered sequence of cells in page-local coordinates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Page {
    cells: Vec<Cell>,
}

impl Page {
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Places batches of cells onto pages of a fixed content height.
///
/// A batch is one logical row (a header, a data row, a totals line). It is
/// placed atomically: either it fits below the current offset or it moves,
/// whole, to the top of a new page.
#[derive(Debug)]
pub struct Paginator {
    pages: Vec<Page>,
    y: i32,
    page_height: i32,
}

impl Paginator {
    /// Start with one empty page.
    pub fn new(page_height: i32) -> Self {
        Self {
            pages: vec![Page::default()],
            y: 0,
            page_height,
        }
    }

    /// Vertical offset where the next batch goes
    pub fn y(&self) -> i32 {
        self.y
    }

    /// Zero-based index of the page being filled
    pub fn current_page(&self) -> usize {
        self.pages.len() - 1
    }

    /// Check if a batch of `height` needs a new page.
    ///
    /// A batch fits when it ends strictly above the page height. A batch at
    /// the top of a page always stays there, however tall.
    pub fn needs_break(&self, height: i32) -> bool {
        self.y > 0 && self.y + height >= self.page_height
    }

    /// Close the current page and start filling a new one at offset 0.
    pub fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.y = 0;
        tracing::debug!(page = self.current_page(), "page break");
    }

    /// Move the offset down without placing anything.
    pub fn skip(&mut self, dy: i32) {
        self.y += dy;
    }

    /// Place a batch laid out at the current offset.
    ///
    /// Returns `true` if the batch went to a new page; its cells are then
    /// rebuilt at the new page's offset.
    pub fn append(&mut self, batch: Vec<Cell>) -> bool {
        if batch.is_empty() {
            return false;
        }
        let height = max_height(&batch);
        let broke = self.needs_break(height);
        let batch = if broke {
            let top = self.y;
            self.new_page();
            translate(&batch, top, 0)
        } else {
            batch
        };
        self.push(batch, height);
        broke
    }

    /// Place a copy of a previously emitted batch at the current offset,
    /// breaking the page first if it does not fit.
    pub fn append_copy(&mut self, batch: &[Cell]) -> bool {
        let Some(top) = batch.iter().map(|c| c.bounds().y).min() else {
            return false;
        };
        self.append(translate(batch, top, self.y))
    }

    fn push(&mut self, batch: Vec<Cell>, height: i32) {
        let index = self.pages.len() - 1;
        self.pages[index].cells.extend(batch);
        self.y += height;
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn into_pages(self) -> Vec<Page> {
        self.pages
    }
}

/// Copy a batch whose top edge is `from` so that its top edge is `to`.
fn translate(batch: &[Cell], from: i32, to: i32) -> Vec<Cell> {
    batch
        .iter()
        .map(|cell| cell.translated_to(cell.bounds().y - from + to))
        .collect()
}
