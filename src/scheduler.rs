use crate::error::Result;
use crate::lattice::Lattice;
use crate::radius::RadiusTracker;
use crate::settings::SchedulePolicy;
use crate::spawn::PointGenerator;
use crate::walker::{walk_particle, WalkOutcome};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by all workers of a run
#[derive(Debug, Default)]
pub struct RunStats {
    stuck: AtomicU64,
    escaped: AtomicU64,
}

impl RunStats {
    pub fn stuck(&self) -> u64 {
        self.stuck.load(Ordering::Relaxed)
    }

    pub fn escaped(&self) -> u64 {
        self.escaped.load(Ordering::Relaxed)
    }

    /// Particles that were launched and finished their walk
    pub fn processed(&self) -> u64 {
        self.stuck() + self.escaped()
    }
}

/// Everything a worker touches while processing particles
pub struct RunContext<'a> {
    pub lattice: &'a Lattice,
    pub radius: &'a RadiusTracker,
    pub points: &'a PointGenerator,
    pub stats: &'a RunStats,
    /// Radius at which workers stop launching particles
    pub exhaustion_radius: usize,
    pub seed: u64,
}

/// What happened to one unit of the particle budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleResult {
    /// The crystal already fills the lattice; nothing was launched
    Exhausted,
    Stuck { distance: usize },
    Escaped,
}

impl RunContext<'_> {
    /// Launch, walk and record a single particle
    pub fn process_particle<R: Rng>(&self, rng: &mut R) -> Result<ParticleResult> {
        let radius = self.radius.read();
        if radius >= self.exhaustion_radius {
            return Ok(ParticleResult::Exhausted);
        }

        let start = self.points.generate(rng, self.lattice, radius)?;
        match walk_particle(rng, self.lattice, start) {
            WalkOutcome::Stuck { x, y } => {
                let distance = self.lattice.distance_from_center(x, y);
                if self.radius.raise(distance) {
                    log::debug!("growth radius raised to {distance}");
                }
                self.stats.stuck.fetch_add(1, Ordering::Relaxed);
                Ok(ParticleResult::Stuck { distance })
            }
            WalkOutcome::Escaped => {
                self.stats.escaped.fetch_add(1, Ordering::Relaxed);
                Ok(ParticleResult::Escaped)
            }
        }
    }

    /// Independent generator for one worker
    pub fn worker_rng(&self, worker: usize) -> StdRng {
        StdRng::seed_from_u64(worker_seed(self.seed, worker))
    }
}

/// Mix the run seed with a worker index (splitmix64 finaliser)
pub fn worker_seed(seed: u64, worker: usize) -> u64 {
    let mut z = seed ^ (worker as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Split `budget` into `workers` contiguous ranges, the first
/// `budget % workers` ranges holding one extra unit
pub fn partition(budget: u64, workers: usize) -> Vec<Range<u64>> {
    let workers = workers.max(1) as u64;
    let base = budget / workers;
    let remainder = budget % workers;
    let mut start = 0;
    (0..workers)
        .map(|w| {
            let len = base + u64::from(w < remainder);
            let range = start..start + len;
            start += len;
            range
        })
        .collect()
}

/// Strategy for driving the particle budget through the workers
pub trait Scheduler: Send + Sync {
    fn policy(&self) -> SchedulePolicy;

    fn workers(&self) -> usize;

    fn run(&self, ctx: &RunContext<'_>, budget: u64) -> Result<()>;
}

/// Build the scheduler for a policy
pub fn scheduler_for(policy: SchedulePolicy, workers: usize) -> Box<dyn Scheduler> {
    match policy {
        SchedulePolicy::Sequential => Box::new(SequentialScheduler),
        SchedulePolicy::Dynamic => Box::new(DynamicScheduler::new(workers)),
        SchedulePolicy::Static => Box::new(StaticScheduler::new(workers)),
    }
}

fn build_pool(workers: usize) -> Result<rayon::ThreadPool> {
    Ok(rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("dla-worker-{i}"))
        .build()?)
}

/// Single worker, whole budget, no pool
pub struct SequentialScheduler;

impl Scheduler for SequentialScheduler {
    fn policy(&self) -> SchedulePolicy {
        SchedulePolicy::Sequential
    }

    fn workers(&self) -> usize {
        1
    }

    fn run(&self, ctx: &RunContext<'_>, budget: u64) -> Result<()> {
        let mut rng = ctx.worker_rng(0);
        for unit in 0..budget {
            if ctx.process_particle(&mut rng)? == ParticleResult::Exhausted {
                log::info!("lattice exhausted after {unit} of {budget} particles");
                break;
            }
        }
        Ok(())
    }
}

/// Workers pull one particle at a time from a shared counter
pub struct DynamicScheduler {
    workers: usize,
}

impl DynamicScheduler {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }
}

impl Scheduler for DynamicScheduler {
    fn policy(&self) -> SchedulePolicy {
        SchedulePolicy::Dynamic
    }

    fn workers(&self) -> usize {
        self.workers
    }

    fn run(&self, ctx: &RunContext<'_>, budget: u64) -> Result<()> {
        let next = AtomicU64::new(0);
        let pool = build_pool(self.workers)?;
        pool.install(|| {
            (0..self.workers).into_par_iter().try_for_each(|worker| -> Result<()> {
                let mut rng = ctx.worker_rng(worker);
                let mut handled = 0u64;
                loop {
                    let unit = next.fetch_add(1, Ordering::Relaxed);
                    if unit >= budget {
                        break;
                    }
                    if ctx.process_particle(&mut rng)? == ParticleResult::Exhausted {
                        log::debug!("worker {worker} stopping: lattice exhausted");
                        break;
                    }
                    handled += 1;
                }
                log::debug!("worker {worker} processed {handled} particles");
                Ok(())
            })
        })
    }
}

/// Each worker owns a precomputed contiguous share of the budget
pub struct StaticScheduler {
    workers: usize,
}

impl StaticScheduler {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }
}

impl Scheduler for StaticScheduler {
    fn policy(&self) -> SchedulePolicy {
        SchedulePolicy::Static
    }

    fn workers(&self) -> usize {
        self.workers
    }

    fn run(&self, ctx: &RunContext<'_>, budget: u64) -> Result<()> {
        let shares = partition(budget, self.workers);
        let pool = build_pool(self.workers)?;
        pool.install(|| {
            shares
                .into_par_iter()
                .enumerate()
                .try_for_each(|(worker, share)| -> Result<()> {
                    let mut rng = ctx.worker_rng(worker);
                    log::debug!("worker {worker} assigned particles {share:?}");
                    for unit in share {
                        if ctx.process_particle(&mut rng)? == ParticleResult::Exhausted {
                            log::debug!(
                                "worker {worker} stopping at particle {unit}: lattice exhausted"
                            );
                            break;
                        }
                    }
                    Ok(())
                })
        })
    }
}
