use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridConfigError {
    #[error("Grid must have at least one column")]
    NoColumns,

    #[error("Row height must be at least 1px")]
    ZeroRowHeight,

    #[error("Spacing ({spacing}px) must be smaller than the row height ({row_height}px)")]
    SpacingTooLarge { spacing: u16, row_height: u16 },
}

/// How many rows and columns a tile covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub rows: u16,
    pub cols: u16,
}

impl Span {
    pub const UNIT: Span = Span { rows: 1, cols: 1 };

    /// Zero extents are raised to 1.
    pub fn new(rows: u16, cols: u16) -> Self {
        Self {
            rows: rows.max(1),
            cols: cols.max(1),
        }
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::UNIT
    }
}

/// Position of a tile in grid units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub row: usize,
    pub col: usize,
    pub rows: usize,
    pub cols: usize,
}

impl Placement {
    pub fn contains_cell(&self, row: usize, col: usize) -> bool {
        row >= self.row && row < self.row + self.rows && col >= self.col && col < self.col + self.cols
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuiltConfig {
    pub columns: u16,
    pub row_height: u16,
    pub spacing: u16,
}

impl QuiltConfig {
    pub fn new(columns: u16, row_height: u16) -> Self {
        Self {
            columns,
            row_height,
            spacing: 4,
        }
    }

    pub fn with_spacing(mut self, spacing: u16) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn validate(&self) -> Result<(), GridConfigError> {
        if self.columns == 0 {
            return Err(GridConfigError::NoColumns);
        }

        if self.row_height == 0 {
            return Err(GridConfigError::ZeroRowHeight);
        }

        if self.spacing >= self.row_height {
            return Err(GridConfigError::SpacingTooLarge {
                spacing: self.spacing,
                row_height: self.row_height,
            });
        }

        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Width of a single column for the given container width.
    pub fn column_width(&self, container_width: f32) -> f32 {
        let cols = self.columns.max(1) as f32;
        let gaps = (cols - 1.0) * self.spacing as f32;
        ((container_width - gaps) / cols).max(0.0)
    }

    /// Pixel rectangle `(x, y, width, height)` of a placement, relative to the grid origin.
    pub fn placement_rect(&self, placement: &Placement, container_width: f32) -> (f32, f32, f32, f32) {
        let col_width = self.column_width(container_width);
        let spacing = self.spacing as f32;
        let row_height = self.row_height as f32;

        let x = placement.col as f32 * (col_width + spacing);
        let y = placement.row as f32 * (row_height + spacing);
        let width = placement.cols as f32 * col_width + (placement.cols.saturating_sub(1)) as f32 * spacing;
        let height =
            placement.rows as f32 * row_height + (placement.rows.saturating_sub(1)) as f32 * spacing;

        (x, y, width, height)
    }

    pub fn total_height(&self, row_count: usize) -> f32 {
        if row_count == 0 {
            return 0.0;
        }

        row_count as f32 * self.row_height as f32
            + (row_count - 1) as f32 * self.spacing as f32
    }
}

impl Default for QuiltConfig {
    fn default() -> Self {
        Self::new(5, 121)
    }
}

/// Tile positions for a quilted grid, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuiltLayout {
    pub placements: Vec<Placement>,
    pub rows: usize,
}

impl QuiltLayout {
    /// Sparse row-major auto-placement: each tile takes the first free area at or
    /// after the cursor, and the cursor never moves backwards. Column spans wider
    /// than the grid are clamped.
    pub fn place<I>(spans: I, columns: u16) -> Self
    where
        I: IntoIterator<Item = Span>,
    {
        let columns = columns.max(1) as usize;
        let mut occupied: Vec<Vec<bool>> = Vec::new();
        let mut placements = Vec::new();
        let (mut cursor_row, mut cursor_col) = (0usize, 0usize);

        for span in spans {
            let cols = (span.cols.max(1) as usize).min(columns);
            let rows = span.rows.max(1) as usize;

            loop {
                if cursor_col + cols > columns {
                    cursor_row += 1;
                    cursor_col = 0;
                    continue;
                }

                if area_is_free(&occupied, cursor_row, cursor_col, rows, cols) {
                    break;
                }

                cursor_col += 1;
            }

            mark_area(&mut occupied, columns, cursor_row, cursor_col, rows, cols);
            placements.push(Placement {
                row: cursor_row,
                col: cursor_col,
                rows,
                cols,
            });
            cursor_col += cols;
        }

        let rows = placements
            .iter()
            .map(|p| p.row + p.rows)
            .max()
            .unwrap_or(0);

        Self { placements, rows }
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Index of the tile covering a grid cell.
    pub fn tile_at_cell(&self, row: usize, col: usize) -> Option<usize> {
        self.placements
            .iter()
            .position(|placement| placement.contains_cell(row, col))
    }
}

fn area_is_free(occupied: &[Vec<bool>], row: usize, col: usize, rows: usize, cols: usize) -> bool {
    (row..row + rows).all(|r| {
        occupied
            .get(r)
            .map(|line| line[col..col + cols].iter().all(|cell| !cell))
            .unwrap_or(true)
    })
}

fn mark_area(
    occupied: &mut Vec<Vec<bool>>,
    columns: usize,
    row: usize,
    col: usize,
    rows: usize,
    cols: usize,
) {
    while occupied.len() < row + rows {
        occupied.push(vec![false; columns]);
    }

    for line in &mut occupied[row..row + rows] {
        for cell in &mut line[col..col + cols] {
            *cell = true;
        }
    }
}
