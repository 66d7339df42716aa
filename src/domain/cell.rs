/// Cell tags and their properties.
/// Properties are queried via methods, not stored as flags,
/// so cell semantics are centralized here.

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Cell {
    #[default]
    Wall,
    Path,
    Key,   // Pickup, turns into Path
    Exit,  // Level gate
    Trap,  // Sends the player back to the start, re-triggerable
}

impl Cell {
    /// Can the player occupy this cell?
    pub fn is_walkable(self) -> bool {
        !matches!(self, Cell::Wall)
    }

    /// Was this cell carved by the generator (anything but a wall)?
    #[cfg(test)]
    pub fn is_carved(self) -> bool {
        self.is_walkable()
    }

    /// Key, exit or trap.
    #[cfg(test)]
    pub fn is_special(self) -> bool {
        matches!(self, Cell::Key | Cell::Exit | Cell::Trap)
    }

    /// Parse a single diagram character.
    ///
    /// Legend: `#`=Wall ` `=Path `k`=Key `E`=Exit `t`=Trap
    #[cfg(test)]
    pub fn from_char(ch: char) -> Option<Cell> {
        match ch {
            '#' => Some(Cell::Wall),
            ' ' | '.' => Some(Cell::Path),
            'k' => Some(Cell::Key),
            'E' => Some(Cell::Exit),
            't' => Some(Cell::Trap),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Cell::Wall => '#',
            Cell::Path => ' ',
            Cell::Key => 'k',
            Cell::Exit => 'E',
            Cell::Trap => 't',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_wall_blocks() {
        assert!(!Cell::Wall.is_walkable());
        for c in [Cell::Path, Cell::Key, Cell::Exit, Cell::Trap] {
            assert!(c.is_walkable(), "{c:?} should be walkable");
        }
    }

    #[test]
    fn special_cells() {
        assert!(Cell::Key.is_special());
        assert!(Cell::Exit.is_special());
        assert!(Cell::Trap.is_special());
        assert!(!Cell::Path.is_special());
        assert!(!Cell::Wall.is_special());
    }

    #[test]
    fn diagram_chars_are_consistent() {
        for c in [Cell::Wall, Cell::Path, Cell::Key, Cell::Exit, Cell::Trap] {
            assert_eq!(Cell::from_char(c.to_char()), Some(c));
        }
        assert_eq!(Cell::from_char('?'), None);
    }
}
