use std::sync::atomic::{AtomicU8, Ordering};

const EMPTY: u8 = 0;
const OCCUPIED: u8 = 1;

/// State of a single lattice cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellState {
    #[default]
    Empty,
    Occupied,
}

impl CellState {
    fn from_raw(raw: u8) -> Self {
        if raw == EMPTY {
            CellState::Empty
        } else {
            CellState::Occupied
        }
    }

    pub fn is_occupied(&self) -> bool {
        matches!(self, CellState::Occupied)
    }
}

/// Square N×N lattice shared by every worker of a run.
///
/// Each cell is its own atomic, so a single read or write is indivisible
/// without any lock. Nothing coarser than one cell is ever synchronised here;
/// callers bounds-check before touching a cell.
pub struct Lattice {
    size: usize,
    cells: Vec<AtomicU8>,
}

impl Lattice {
    /// Create a lattice with only the center cell occupied
    pub fn new(size: usize) -> Self {
        let cells = (0..size * size).map(|_| AtomicU8::new(EMPTY)).collect();
        let lattice = Self { size, cells };
        if size > 0 {
            let c = lattice.center();
            lattice.write(c, c, CellState::Occupied);
        }
        lattice
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Index of the center row/column, `N / 2`
    pub fn center(&self) -> usize {
        self.size / 2
    }

    /// Signed bounds test used by walkers that may step off the edge
    pub fn contains(&self, x: isize, y: isize) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.size && (y as usize) < self.size
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.size && y < self.size, "cell ({x}, {y}) out of range");
        x * self.size + y
    }

    /// Atomically read one cell
    #[inline]
    pub fn read(&self, x: usize, y: usize) -> CellState {
        CellState::from_raw(self.cells[self.index(x, y)].load(Ordering::Acquire))
    }

    /// Atomically write one cell. Occupied cells never revert, so writing
    /// `Empty` over an occupied cell is ignored.
    #[inline]
    pub fn write(&self, x: usize, y: usize, state: CellState) {
        if state.is_occupied() {
            self.cells[self.index(x, y)].store(OCCUPIED, Ordering::Release);
        }
    }

    /// Chebyshev distance of a cell from the center
    pub fn distance_from_center(&self, x: usize, y: usize) -> usize {
        let c = self.center();
        x.abs_diff(c).max(y.abs_diff(c))
    }

    pub fn occupied_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.load(Ordering::Acquire) != EMPTY)
            .count()
    }

    /// Copy the current cell states into a plain boolean grid
    pub fn snapshot(&self) -> LatticeSnapshot {
        let rows = (0..self.size)
            .map(|x| (0..self.size).map(|y| self.read(x, y).is_occupied()).collect())
            .collect();
        LatticeSnapshot { rows }
    }
}

/// Read-only copy of a lattice, row `x` holding the cells `(x, 0..N)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatticeSnapshot {
    pub rows: Vec<Vec<bool>>,
}

impl LatticeSnapshot {
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.rows
            .get(x)
            .and_then(|row| row.get(y))
            .copied()
            .unwrap_or(false)
    }

    pub fn occupied_count(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.iter().filter(|&&cell| cell).count())
            .sum()
    }

    /// Grid as 0/1 integers
    pub fn to_bits(&self) -> Vec<Vec<u8>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|&cell| cell as u8).collect())
            .collect()
    }
}
