use crate::lattice::Lattice;

/// The 3×3 block around a particle: its Moore neighborhood plus itself
const MOORE_BLOCK: [(isize, isize); 9] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1),  (0, 0),  (0, 1),
    (1, -1),  (1, 0),  (1, 1),
];

/// True when any in-bounds cell of the 3×3 block centered on `(x, y)` is occupied
pub fn should_stick(lattice: &Lattice, x: usize, y: usize) -> bool {
    MOORE_BLOCK.iter().any(|&(dx, dy)| {
        let nx = x as isize + dx;
        let ny = y as isize + dy;
        lattice.contains(nx, ny) && lattice.read(nx as usize, ny as usize).is_occupied()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::CellState;

    #[test]
    fn test_sticks_next_to_center() {
        let lattice = Lattice::new(5);
        for (x, y) in [(1, 1), (1, 2), (1, 3), (2, 1), (2, 3), (3, 1), (3, 2), (3, 3)] {
            assert!(should_stick(&lattice, x, y), "({x}, {y}) should stick");
        }
    }

    #[test]
    fn test_no_stick_far_from_crystal() {
        let lattice = Lattice::new(5);
        for (x, y) in [(0, 0), (0, 2), (4, 4), (2, 0), (4, 1)] {
            assert!(!should_stick(&lattice, x, y), "({x}, {y}) should not stick");
        }
    }

    #[test]
    fn test_edges_do_not_read_out_of_bounds() {
        let lattice = Lattice::new(3);
        lattice.write(0, 0, CellState::Occupied);
        assert!(should_stick(&lattice, 0, 1));
        assert!(should_stick(&lattice, 2, 2));
    }

    #[test]
    fn test_occupied_own_cell_sticks() {
        let lattice = Lattice::new(7);
        lattice.write(0, 0, CellState::Occupied);
        assert!(should_stick(&lattice, 0, 0));
        assert!(!should_stick(&lattice, 6, 0));
    }
}
