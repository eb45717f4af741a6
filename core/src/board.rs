use crate::error::{ProtocolError, Result};
use crate::types::{CellCount, Coord, Coord2, ToNdIndex};
use jiraigen_protocol::{CELL_FLAGGED, CELL_HIDDEN, CELL_MINE, CellCode, GameSnapshot};
use ndarray::Array2;

/// What one cell looks like on screen. The server has already applied every
/// game rule; this is a rendering vocabulary, nothing more.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CellView {
    Hidden,
    Flagged,
    /// A revealed mine, shown after a loss (or on any snapshot that
    /// contains one; terminal boards get no special casing).
    Mine,
    Revealed(u8),
}

impl CellView {
    /// Total over the contract's codes, `None` for everything else.
    pub const fn from_code(code: CellCode) -> Option<Self> {
        use CellView::*;
        match code {
            CELL_HIDDEN => Some(Hidden),
            CELL_FLAGGED => Some(Flagged),
            CELL_MINE => Some(Mine),
            0..=8 => Some(Revealed(code as u8)),
            _ => None,
        }
    }
}

/// Decoded, validated board grid. Building one is pure: the same snapshot
/// always yields an equal grid, which is what lets views skip re-rendering
/// unchanged boards.
#[derive(Clone, Debug, PartialEq)]
pub struct BoardView {
    cells: Array2<CellView>,
}

impl BoardView {
    pub fn from_snapshot(snapshot: &GameSnapshot) -> Result<Self> {
        let rows = snapshot.height as usize;
        let cols = snapshot.width as usize;

        if snapshot.board.len() != rows {
            return Err(ProtocolError::BoardShape {
                expected_rows: rows,
                expected_cols: cols,
                found_rows: snapshot.board.len(),
                found_cols: cols,
            }
            .into());
        }

        let mut cells = Array2::from_elem((rows, cols), CellView::Hidden);
        for (row, codes) in snapshot.board.iter().enumerate() {
            if codes.len() != cols {
                return Err(ProtocolError::BoardShape {
                    expected_rows: rows,
                    expected_cols: cols,
                    found_rows: snapshot.board.len(),
                    found_cols: codes.len(),
                }
                .into());
            }
            for (col, &code) in codes.iter().enumerate() {
                cells[(row, col)] =
                    CellView::from_code(code).ok_or(ProtocolError::UnknownCellCode {
                        code,
                        row: row as Coord,
                        col: col as Coord,
                    })?;
            }
        }

        Ok(Self { cells })
    }

    /// `(rows, cols)`.
    pub fn size(&self) -> Coord2 {
        let dim = self.cells.dim();
        (dim.0 as Coord, dim.1 as Coord)
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<CellView> {
        self.cells.get(coords.to_nd_index()).copied()
    }

    /// Flags currently shown on the board.
    pub fn flag_count(&self) -> CellCount {
        self.cells
            .iter()
            .filter(|&&cell| cell == CellView::Flagged)
            .count() as CellCount
    }
}
