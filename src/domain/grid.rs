/// The maze grid: a fixed `width × height` array of cell tags.
///
/// Coordinates are `(x, y)` with `x` growing right and `y` growing down.
/// Storage is row-major and flat, so `get`/`set` are O(1).
///
/// Two access styles:
///   - `get` / `set` — checked, return `GameError::OutOfBounds`
///   - `cell_at`     — total, anything outside the grid reads as `Wall`

use crate::domain::cell::Cell;
use crate::error::{GameError, Result};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    /// Where the player spawns and where carving starts.
    pub const START: Pos = Pos { x: 1, y: 1 };

    pub const fn new(x: usize, y: usize) -> Self {
        Pos { x, y }
    }
}

impl From<(usize, usize)> for Pos {
    fn from((x, y): (usize, usize)) -> Self {
        Pos { x, y }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Maze {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Maze {
    /// A solid block of walls.
    pub fn new(width: usize, height: usize) -> Self {
        Maze {
            width,
            height,
            cells: vec![Cell::Wall; width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    #[inline]
    fn index(&self, pos: Pos) -> Result<usize> {
        if self.in_bounds(pos) {
            Ok(pos.y * self.width + pos.x)
        } else {
            Err(GameError::OutOfBounds { pos, width: self.width, height: self.height })
        }
    }

    pub fn get(&self, pos: Pos) -> Result<Cell> {
        self.index(pos).map(|i| self.cells[i])
    }

    pub fn set(&mut self, pos: Pos, cell: Cell) -> Result<()> {
        let i = self.index(pos)?;
        self.cells[i] = cell;
        Ok(())
    }

    /// Query a cell, treating out of bounds as wall.
    #[inline]
    pub fn cell_at(&self, pos: Pos) -> Cell {
        self.get(pos).unwrap_or(Cell::Wall)
    }

    /// Rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width.max(1))
    }

    /// Every coordinate paired with its cell, row-major.
    pub fn positions(&self) -> impl Iterator<Item = (Pos, Cell)> + '_ {
        let w = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &c)| (Pos::new(i % w, i / w), c))
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    #[cfg(test)]
    pub fn find(&self, cell: Cell) -> Vec<Pos> {
        self.positions()
            .filter(|&(_, c)| c == cell)
            .map(|(p, _)| p)
            .collect()
    }

    /// Flood fill over walkable cells.
    #[cfg(test)]
    pub fn reachable_from(&self, start: Pos) -> std::collections::HashSet<Pos> {
        use std::collections::{HashSet, VecDeque};

        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(p) = queue.pop_front() {
            let around = [
                (p.x.wrapping_sub(1), p.y),
                (p.x + 1, p.y),
                (p.x, p.y.wrapping_sub(1)),
                (p.x, p.y + 1),
            ];
            for (x, y) in around {
                let n = Pos::new(x, y);
                if self.cell_at(n).is_walkable() && seen.insert(n) {
                    queue.push_back(n);
                }
            }
        }
        seen
    }

    /// Build a maze from a diagram (see `Cell::from_char` for the legend).
    /// Unknown characters become walls.
    #[cfg(test)]
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.chars().count());
        let mut maze = Maze::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                maze.cells[y * width + x] = Cell::from_char(ch).unwrap_or(Cell::Wall);
            }
        }
        maze
    }
}

impl std::fmt::Display for Maze {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.rows() {
            let line: String = row.iter().map(|c| c.to_char()).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
