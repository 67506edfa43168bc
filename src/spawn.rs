use crate::error::{DlaError, Result};
use crate::lattice::Lattice;
use crate::settings::PointStrategy;
use rand::Rng;
use std::sync::{Mutex, PoisonError};

/// Picks launch points by rejection sampling: uniform cells are drawn until
/// one lies outside the square of half-width `radius + 1` around the center
/// and is empty.
///
/// The loop terminates only while such a cell exists. Without an attempt cap
/// a lattice saturated within the search region makes it spin forever; the
/// scheduler's exhaustion check keeps runs away from that state in practice.
pub struct PointGenerator {
    strategy: PointStrategy,
    max_attempts: Option<u64>,
    search_lock: Mutex<()>,
}

impl PointGenerator {
    pub fn new(strategy: PointStrategy, max_attempts: Option<u64>) -> Self {
        Self {
            strategy,
            max_attempts,
            search_lock: Mutex::new(()),
        }
    }

    /// Draw a launch point for the given radius snapshot
    pub fn generate<R: Rng>(
        &self,
        rng: &mut R,
        lattice: &Lattice,
        radius: usize,
    ) -> Result<(usize, usize)> {
        match self.strategy {
            PointStrategy::FineGrained => self.search(rng, lattice, radius),
            PointStrategy::CoarseGrained => {
                let _guard = self
                    .search_lock
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                self.search(rng, lattice, radius)
            }
        }
    }

    fn search<R: Rng>(&self, rng: &mut R, lattice: &Lattice, radius: usize) -> Result<(usize, usize)> {
        let size = lattice.size();
        let center = lattice.center();
        let exclusion = radius + 1;
        let mut attempts: u64 = 0;

        loop {
            if let Some(max) = self.max_attempts {
                if attempts >= max {
                    return Err(DlaError::Saturated { attempts, radius });
                }
            }
            attempts += 1;

            let x = rng.gen_range(0..size);
            let y = rng.gen_range(0..size);
            let inside_ring = x.abs_diff(center) <= exclusion && y.abs_diff(center) <= exclusion;
            if !inside_ring && !lattice.read(x, y).is_occupied() {
                log::trace!("launch point ({x}, {y}) after {attempts} attempts");
                return Ok((x, y));
            }
        }
    }
}
