//! Plain-text tables filled cell by cell.
//!
//! Cells are appended left to right; a row is complete once it holds as many
//! cells as the table has columns. Column widths are the widest cell seen in
//! that column.

/// Horizontal alignment of a cell within its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// A single table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub align: Align,
}

#[derive(Debug, Clone)]
pub struct Table {
    columns: usize,
    separator: String,
    /// Row-major cells; `None` marks a skipped (blank) cell.
    cells: Vec<Option<Cell>>,
}

impl Table {
    /// Creates an empty table.
    ///
    /// # Panics
    ///
    /// Panics if `columns` is zero.
    pub fn new(columns: usize, separator: impl Into<String>) -> Self {
        assert!(columns > 0, "a table needs at least one column");
        Self {
            columns,
            separator: separator.into(),
            cells: Vec::new(),
        }
    }

    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Appends a left-aligned cell.
    pub fn cell_l(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(text.into(), Align::Left)
    }

    /// Appends a right-aligned cell.
    pub fn cell_r(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(text.into(), Align::Right)
    }

    /// Appends `n` blank cells.
    pub fn skip(&mut self, n: usize) -> &mut Self {
        self.cells.extend(std::iter::repeat_n(None, n));
        self
    }

    /// Iterates over rows; the last row may be incomplete.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<Cell>]> {
        self.cells.chunks(self.columns)
    }

    /// Renders all rows, one line each, with trailing whitespace removed.
    pub fn render(&self) -> String {
        let widths = self.widths();
        let mut out = String::new();
        for row in self.rows() {
            let line = widths
                .iter()
                .enumerate()
                .map(|(i, &width)| match row.get(i).and_then(Option::as_ref) {
                    Some(Cell {
                        text,
                        align: Align::Left,
                    }) => format!("{text:<width$}"),
                    Some(Cell {
                        text,
                        align: Align::Right,
                    }) => format!("{text:>width$}"),
                    None => " ".repeat(width),
                })
                .collect::<Vec<_>>()
                .join(&self.separator);
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }

    fn push(&mut self, text: String, align: Align) -> &mut Self {
        self.cells.push(Some(Cell { text, align }));
        self
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths = vec![0; self.columns];
        for row in self.rows() {
            for (width, cell) in widths.iter_mut().zip(row) {
                if let Some(cell) = cell {
                    *width = (*width).max(cell.text.chars().count());
                }
            }
        }
        widths
    }
}
