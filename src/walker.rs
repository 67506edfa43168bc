use crate::lattice::{CellState, Lattice};
use crate::stick::should_stick;
use rand::Rng;

/// Result of a single particle's walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkOutcome {
    /// The particle attached at this cell
    Stuck { x: usize, y: usize },
    /// The particle stepped off the lattice
    Escaped,
}

/// Draw one step with each component uniform in {-1, 0, 1}
#[inline]
fn next_move<R: Rng>(rng: &mut R) -> (isize, isize) {
    (rng.gen_range(-1..=1), rng.gen_range(-1..=1))
}

/// Walk a particle from `start` until it sticks to the crystal or leaves the
/// lattice. Steps onto occupied cells are redrawn; steps off the edge are
/// always taken. There is no step limit.
pub fn walk_particle<R: Rng>(rng: &mut R, lattice: &Lattice, start: (usize, usize)) -> WalkOutcome {
    let (mut x, mut y) = (start.0 as isize, start.1 as isize);
    let mut steps: u64 = 0;

    while lattice.contains(x, y) {
        let (ux, uy) = (x as usize, y as usize);
        if should_stick(lattice, ux, uy) {
            lattice.write(ux, uy, CellState::Occupied);
            log::trace!("particle stuck at ({ux}, {uy}) after {steps} steps");
            return WalkOutcome::Stuck { x: ux, y: uy };
        }

        let (nx, ny) = loop {
            let (dx, dy) = next_move(rng);
            let (nx, ny) = (x + dx, y + dy);
            if !lattice.contains(nx, ny) || !lattice.read(nx as usize, ny as usize).is_occupied() {
                break (nx, ny);
            }
        };
        x = nx;
        y = ny;
        steps += 1;
    }

    log::trace!("particle escaped after {steps} steps");
    WalkOutcome::Escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_start_next_to_crystal_sticks_immediately() {
        let lattice = Lattice::new(5);
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = walk_particle(&mut rng, &lattice, (1, 2));
        assert_eq!(outcome, WalkOutcome::Stuck { x: 1, y: 2 });
        assert!(lattice.read(1, 2).is_occupied());
        assert_eq!(lattice.occupied_count(), 2);
    }

    #[test]
    fn test_walk_ends_stuck_or_escaped() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let lattice = Lattice::new(5);
            match walk_particle(&mut rng, &lattice, (0, 0)) {
                WalkOutcome::Stuck { x, y } => {
                    assert_eq!(lattice.distance_from_center(x, y), 1);
                    assert_eq!(lattice.occupied_count(), 2);
                }
                WalkOutcome::Escaped => assert_eq!(lattice.occupied_count(), 1),
            }
        }
    }

    #[test]
    fn test_stuck_cell_touches_crystal() {
        let lattice = Lattice::new(41);
        let mut rng = StdRng::seed_from_u64(9);
        let mut stuck = 0;
        for i in 0..400 {
            let start = (22 + i % 3, 18 + i % 5);
            if lattice.read(start.0, start.1).is_occupied() {
                continue;
            }
            let before = lattice.snapshot();
            if let WalkOutcome::Stuck { x, y } = walk_particle(&mut rng, &lattice, start) {
                stuck += 1;
                let touches = (-1isize..=1).any(|dx| {
                    (-1isize..=1).any(|dy| {
                        let (nx, ny) = (x as isize + dx, y as isize + dy);
                        (dx, dy) != (0, 0)
                            && lattice.contains(nx, ny)
                            && before.get(nx as usize, ny as usize)
                    })
                });
                assert!(touches, "({x}, {y}) stuck without an occupied neighbor");
                assert!(lattice.occupied_count() <= before.occupied_count() + 1);
            }
        }
        assert!(stuck > 0);
    }
}
