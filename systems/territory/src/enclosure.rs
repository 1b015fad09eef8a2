//! Per-side leak field built with a multi-source breadth-first fill.

use std::collections::VecDeque;

use craftsmen_core::Position;

/// Dense reachability grid seeded from every leaking edge cell.
///
/// A cell is *enclosed* when no path of non-absorbing cells connects it to a
/// non-absorbing cell on the outer ring. Absorbing cells (the side's own
/// walls) are never reached and therefore always count as enclosed.
#[derive(Clone, Debug, Default)]
pub(crate) struct EnclosureField {
    width: u32,
    height: u32,
    reached: Vec<bool>,
    queue: VecDeque<Position>,
}

impl EnclosureField {
    /// Rebuilds the field for a `width` x `height` board.
    pub(crate) fn rebuild_with<F>(&mut self, width: u32, height: u32, mut is_absorbing: F)
    where
        F: FnMut(Position) -> bool,
    {
        let width_usize = usize::try_from(width).unwrap_or(0);
        let height_usize = usize::try_from(height).unwrap_or(0);
        let cell_count = width_usize.checked_mul(height_usize).unwrap_or(0);

        self.width = width;
        self.height = height;
        self.queue.clear();

        if cell_count == 0 {
            self.reached.clear();
            return;
        }

        if self.reached.len() != cell_count {
            self.reached = vec![false; cell_count];
        } else {
            self.reached.fill(false);
        }

        for cell in edge_cells(width, height) {
            if is_absorbing(cell) {
                continue;
            }
            let Some(offset) = index(width_usize, cell) else {
                continue;
            };
            if self.reached[offset] {
                continue;
            }
            self.reached[offset] = true;
            self.queue.push_back(cell);
        }

        while let Some(cell) = self.queue.pop_front() {
            for neighbor in cell.neighbors4(width, height) {
                let Some(offset) = index(width_usize, neighbor) else {
                    continue;
                };
                if self.reached[offset] || is_absorbing(neighbor) {
                    continue;
                }
                self.reached[offset] = true;
                self.queue.push_back(neighbor);
            }
        }
    }

    /// Reports whether the cell is cut off from the outside world.
    ///
    /// Positions outside the field count as leaks.
    #[must_use]
    pub(crate) fn is_enclosed(&self, cell: Position) -> bool {
        if cell.x() >= self.width || cell.y() >= self.height {
            return false;
        }
        let Ok(width) = usize::try_from(self.width) else {
            return false;
        };
        index(width, cell)
            .and_then(|offset| self.reached.get(offset).copied())
            .map_or(false, |reached| !reached)
    }
}

fn edge_cells(width: u32, height: u32) -> impl Iterator<Item = Position> {
    let last_column = width.saturating_sub(1);
    let last_row = height.saturating_sub(1);
    let rows = (0..width).flat_map(move |x| [Position::new(x, 0), Position::new(x, last_row)]);
    let columns =
        (0..height).flat_map(move |y| [Position::new(0, y), Position::new(last_column, y)]);
    rows.chain(columns)
}

fn index(width: usize, cell: Position) -> Option<usize> {
    let column = usize::try_from(cell.x()).ok()?;
    let row = usize::try_from(cell.y()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}
