// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed-size two dimensional container used for stones, markup and scoring

use crate::Coord;

/// One non-empty cell reported by [`Grid::all`] or [`Grid::compare`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridEntry<T> {
    pub x: u8,
    pub y: u8,
    pub value: T,
}

impl<T> GridEntry<T> {
    pub fn coord(&self) -> Coord {
        Coord::new(self.x, self.y)
    }
}

/// Minimal set of changes turning one grid into another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridDiff<T> {
    /// Cells that are set in the other grid and differ from this one
    pub add: Vec<GridEntry<T>>,
    /// Cells that are set in this grid and differ from the other one
    pub remove: Vec<GridEntry<T>>,
}

impl<T> Default for GridDiff<T> {
    fn default() -> Self {
        Self {
            add: Vec::new(),
            remove: Vec::new(),
        }
    }
}

impl<T> GridDiff<T> {
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }
}

/// A `width x height` grid holding either the `empty` sentinel or a value.
///
/// Reads outside the grid return the sentinel and writes outside it are
/// ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    width: u8,
    height: u8,
    cells: Vec<T>,
    empty: T,
}

impl<T: Clone + PartialEq> Grid<T> {
    /// Create a grid filled with `empty`
    pub fn new(width: u8, height: u8, empty: T) -> Self {
        let cells = vec![empty.clone(); width as usize * height as usize];
        Self {
            width,
            height,
            cells,
            empty,
        }
    }

    /// Resize the grid. Existing contents are discarded.
    pub fn set_size(&mut self, width: u8, height: u8) {
        self.width = width;
        self.height = height;
        self.cells = vec![self.empty.clone(); width as usize * height as usize];
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// The sentinel value
    pub fn empty_value(&self) -> &T {
        &self.empty
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.is_valid(self.width, self.height)
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        if self.contains(coord) {
            Some(coord.x as usize * self.height as usize + coord.y as usize)
        } else {
            None
        }
    }

    pub fn get(&self, coord: Coord) -> &T {
        match self.index(coord) {
            Some(idx) => &self.cells[idx],
            None => &self.empty,
        }
    }

    /// Write a value, returning false when the coordinate is off the grid
    pub fn set(&mut self, coord: Coord, value: T) -> bool {
        match self.index(coord) {
            Some(idx) => {
                self.cells[idx] = value;
                true
            }
            None => false,
        }
    }

    pub fn unset(&mut self, coord: Coord) {
        let empty = self.empty.clone();
        self.set(coord, empty);
    }

    /// True if the cell holds something other than the sentinel
    pub fn has(&self, coord: Coord) -> bool {
        self.index(coord)
            .map(|idx| self.cells[idx] != self.empty)
            .unwrap_or(false)
    }

    pub fn is(&self, coord: Coord, value: &T) -> bool {
        self.get(coord) == value
    }

    /// Raw backing storage, column by column
    pub fn raw(&self) -> &[T] {
        &self.cells
    }

    /// Every non-empty cell, ordered by `x` then `y`
    pub fn all(&self) -> Vec<GridEntry<T>> {
        let mut entries = Vec::new();
        for x in 0..self.width {
            for y in 0..self.height {
                let value = self.get(Coord::new(x, y));
                if *value != self.empty {
                    entries.push(GridEntry {
                        x,
                        y,
                        value: value.clone(),
                    });
                }
            }
        }
        entries
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|cell| *cell == self.empty)
    }

    /// Fill every cell with `value`
    pub fn populate(&mut self, value: T) {
        for cell in self.cells.iter_mut() {
            *cell = value.clone();
        }
    }

    /// Valid in-grid neighbors of `coord`
    pub fn neighbors(&self, coord: Coord) -> Vec<Coord> {
        coord
            .adjacent_coords()
            .into_iter()
            .filter(|c| self.contains(*c))
            .collect()
    }

    fn same_dimensions(&self, other: &Grid<T>) -> bool {
        if self.width != other.width || self.height != other.height {
            tracing::warn!(
                "Grid size mismatch: {}x{} vs {}x{}",
                self.width,
                self.height,
                other.width,
                other.height
            );
            return false;
        }
        true
    }

    /// Dimension and cell-by-cell equality
    pub fn is_same_as(&self, other: &Grid<T>) -> bool {
        self.same_dimensions(other) && self.cells == other.cells
    }

    /// Changes needed to turn this grid into `other`.
    ///
    /// Grids of different size yield an empty diff.
    pub fn compare(&self, other: &Grid<T>) -> GridDiff<T> {
        let mut diff = GridDiff::default();
        if !self.same_dimensions(other) {
            return diff;
        }

        for x in 0..self.width {
            for y in 0..self.height {
                let coord = Coord::new(x, y);
                let mine = self.get(coord);
                let theirs = other.get(coord);
                if mine == theirs {
                    continue;
                }
                if *theirs != other.empty {
                    diff.add.push(GridEntry {
                        x,
                        y,
                        value: theirs.clone(),
                    });
                }
                if *mine != self.empty {
                    diff.remove.push(GridEntry {
                        x,
                        y,
                        value: mine.clone(),
                    });
                }
            }
        }
        diff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_access() {
        let mut grid = Grid::new(3, 2, 0u8);
        assert!(!grid.set(Coord::new(3, 0), 7));
        assert_eq!(*grid.get(Coord::new(0, 2)), 0);
        assert!(!grid.has(Coord::new(9, 9)));
        assert!(grid.is_empty());
    }

    #[test]
    fn all_is_ordered_by_column() {
        let mut grid = Grid::new(3, 3, None);
        grid.set(Coord::new(2, 0), Some('a'));
        grid.set(Coord::new(0, 2), Some('b'));
        grid.set(Coord::new(0, 1), Some('c'));
        let coords: Vec<_> = grid.all().iter().map(|e| (e.x, e.y)).collect();
        assert_eq!(coords, vec![(0, 1), (0, 2), (2, 0)]);
    }

    #[test]
    fn set_size_clears() {
        let mut grid = Grid::new(2, 2, 0u8);
        grid.populate(1);
        grid.set_size(4, 1);
        assert_eq!(grid.raw().len(), 4);
        assert!(grid.is_empty());
    }
}
