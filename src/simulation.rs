use crate::error::Result;
use crate::lattice::{Lattice, LatticeSnapshot};
use crate::radius::RadiusTracker;
use crate::scheduler::{scheduler_for, RunContext, RunStats};
use crate::settings::{PointStrategy, SchedulePolicy, SimulationSettings};
use crate::spawn::PointGenerator;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Summary of a finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub grid_size: usize,
    pub policy: SchedulePolicy,
    pub point_strategy: PointStrategy,
    pub workers: usize,
    pub seed: u64,
    /// Particles in the budget
    pub budget: u64,
    pub stuck: u64,
    pub escaped: u64,
    /// Budget units never launched because the lattice was exhausted
    pub skipped: u64,
    pub final_radius: usize,
    pub occupied: usize,
    pub elapsed_secs: f64,
}

/// DLA simulation state: the lattice and growth radius shared by the workers
pub struct DlaSimulation {
    settings: SimulationSettings,
    lattice: Lattice,
    radius: RadiusTracker,
    seed: u64,
}

impl DlaSimulation {
    /// Validate the settings and seed the crystal at the center
    pub fn new(settings: SimulationSettings) -> Result<Self> {
        settings.validate()?;
        let seed = settings.seed.unwrap_or_else(rand::random);
        Ok(Self {
            lattice: Lattice::new(settings.grid_size),
            radius: RadiusTracker::new(),
            settings,
            seed,
        })
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn radius(&self) -> usize {
        self.radius.read()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn snapshot(&self) -> LatticeSnapshot {
        self.lattice.snapshot()
    }

    /// Release the whole particle budget and report the outcome
    pub fn run(&mut self) -> Result<RunReport> {
        let budget = self.settings.num_particles;
        let workers = self.settings.effective_workers();
        let point_strategy = self.settings.effective_point_strategy();
        let scheduler = scheduler_for(self.settings.policy, workers);
        let points = PointGenerator::new(point_strategy, self.settings.max_spawn_attempts);
        let stats = RunStats::default();

        log::info!(
            "Running {} particles on a {n}x{n} lattice ({} policy, {} workers, {} spawn, seed {})",
            budget,
            scheduler.policy().name(),
            scheduler.workers(),
            point_strategy.name(),
            self.seed,
            n = self.settings.grid_size,
        );

        let ctx = RunContext {
            lattice: &self.lattice,
            radius: &self.radius,
            points: &points,
            stats: &stats,
            exhaustion_radius: self.settings.exhaustion_radius(),
            seed: self.seed,
        };

        let start = Instant::now();
        scheduler.run(&ctx, budget)?;
        let elapsed = start.elapsed();

        let report = RunReport {
            grid_size: self.settings.grid_size,
            policy: scheduler.policy(),
            point_strategy,
            workers: scheduler.workers(),
            seed: self.seed,
            budget,
            stuck: stats.stuck(),
            escaped: stats.escaped(),
            skipped: budget - stats.processed(),
            final_radius: self.radius.read(),
            occupied: self.lattice.occupied_count(),
            elapsed_secs: elapsed.as_secs_f64(),
        };
        log::info!(
            "Finished in {:.3} s: {} stuck, {} escaped, {} skipped, radius {}, {} cells occupied",
            report.elapsed_secs,
            report.stuck,
            report.escaped,
            report.skipped,
            report.final_radius,
            report.occupied,
        );
        Ok(report)
    }
}
