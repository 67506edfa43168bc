use crate::error::{DlaError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Parse a non-negative integer given as a plain run of ASCII digits.
/// Signs, whitespace and values that overflow `T` are rejected.
pub fn parse_count<T: FromStr>(name: &'static str, value: &str) -> Result<T> {
    let invalid = || DlaError::InvalidArgument {
        name,
        value: value.to_string(),
    };
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    value.parse().map_err(|_| invalid())
}

/// How the particle budget is divided between workers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SchedulePolicy {
    /// One worker processes the whole budget
    Sequential,
    /// Workers pull one particle at a time from a shared counter
    #[default]
    Dynamic,
    /// Each worker owns a contiguous, precomputed share of the budget
    Static,
}

impl SchedulePolicy {
    pub fn name(&self) -> &str {
        match self {
            SchedulePolicy::Sequential => "Sequential",
            SchedulePolicy::Dynamic => "Dynamic",
            SchedulePolicy::Static => "Static",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "sequential" | "seq" | "serial" => Ok(SchedulePolicy::Sequential),
            "dynamic" | "dyn" | "pull" => Ok(SchedulePolicy::Dynamic),
            "static" | "chunked" | "chunk" => Ok(SchedulePolicy::Static),
            _ => Err(DlaError::UnknownOption {
                kind: "policy",
                value: s.to_string(),
            }),
        }
    }

    /// Launch-point locking used when none is configured explicitly
    pub fn default_point_strategy(&self) -> PointStrategy {
        match self {
            SchedulePolicy::Static => PointStrategy::CoarseGrained,
            SchedulePolicy::Sequential | SchedulePolicy::Dynamic => PointStrategy::FineGrained,
        }
    }

    /// Default result file name, matching the sequential/parallel naming
    pub fn default_output(&self) -> &'static str {
        match self {
            SchedulePolicy::Sequential => "sequential_result.txt",
            SchedulePolicy::Dynamic | SchedulePolicy::Static => "parallel_result.txt",
        }
    }
}

/// Synchronisation used while searching for a launch point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PointStrategy {
    /// Per-cell atomic reads; two workers may pick the same cell
    #[default]
    FineGrained,
    /// The whole rejection loop runs under one lock
    CoarseGrained,
}

impl PointStrategy {
    pub fn name(&self) -> &str {
        match self {
            PointStrategy::FineGrained => "Fine",
            PointStrategy::CoarseGrained => "Coarse",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "fine" | "fine-grained" | "atomic" => Ok(PointStrategy::FineGrained),
            "coarse" | "coarse-grained" | "locked" | "lock" => Ok(PointStrategy::CoarseGrained),
            _ => Err(DlaError::UnknownOption {
                kind: "spawn strategy",
                value: s.to_string(),
            }),
        }
    }
}

/// All run parameters consolidated into one struct
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Lattice side length, must be odd
    pub grid_size: usize,
    /// Particles to release
    pub num_particles: u64,
    pub policy: SchedulePolicy,
    /// Worker threads; `None` uses the available parallelism
    pub workers: Option<usize>,
    /// Launch-point locking; `None` picks the policy default
    pub point_strategy: Option<PointStrategy>,
    /// Run seed; `None` draws one from the OS
    pub seed: Option<u64>,
    /// Diagnostic bound on launch-point attempts; `None` retries forever
    pub max_spawn_attempts: Option<u64>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            grid_size: 101,
            num_particles: 5000,
            policy: SchedulePolicy::default(),
            workers: None,
            point_strategy: None,
            seed: None,
            max_spawn_attempts: None,
        }
    }
}

impl SimulationSettings {
    pub fn new(grid_size: usize, num_particles: u64) -> Self {
        Self {
            grid_size,
            num_particles,
            ..Default::default()
        }
    }

    pub fn with_policy(mut self, policy: SchedulePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_point_strategy(mut self, strategy: PointStrategy) -> Self {
        self.point_strategy = Some(strategy);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid_size == 0 {
            return Err(DlaError::EmptyGrid);
        }
        if self.grid_size % 2 == 0 {
            return Err(DlaError::EvenGridSize(self.grid_size));
        }
        if self.workers == Some(0) {
            return Err(DlaError::InvalidWorkers);
        }
        Ok(())
    }

    /// Worker count actually used; sequential runs always use one
    pub fn effective_workers(&self) -> usize {
        match self.policy {
            SchedulePolicy::Sequential => 1,
            SchedulePolicy::Dynamic | SchedulePolicy::Static => self.workers.unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1)
            }),
        }
    }

    pub fn effective_point_strategy(&self) -> PointStrategy {
        self.point_strategy
            .unwrap_or_else(|| self.policy.default_point_strategy())
    }

    /// Radius at which the crystal has used all reachable growth room
    pub fn exhaustion_radius(&self) -> usize {
        (self.grid_size / 2).saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_count_accepts_digits() {
        assert_eq!(parse_count::<usize>("grid size", "101").unwrap(), 101);
        assert_eq!(parse_count::<u64>("particles", "0").unwrap(), 0);
        assert_eq!(parse_count::<u64>("particles", "007").unwrap(), 7);
    }

    #[test]
    fn test_parse_count_rejects_non_digits() {
        for bad in ["", "-5", "+5", "12a", " 3", "1.0", "abc"] {
            let err = parse_count::<u64>("particles", bad).unwrap_err();
            assert!(matches!(err, DlaError::InvalidArgument { name: "particles", .. }), "{bad}");
        }
    }

    #[test]
    fn test_parse_count_rejects_overflow() {
        assert!(parse_count::<u32>("grid size", "4294967296").is_err());
        assert!(parse_count::<u64>("particles", "99999999999999999999999").is_err());
    }

    #[test]
    fn test_validate_rejects_even_grid() {
        let err = SimulationSettings::new(4, 10).validate().unwrap_err();
        assert!(matches!(err, DlaError::EvenGridSize(4)));
    }

    #[test]
    fn test_validate_rejects_zero_grid() {
        assert!(matches!(
            SimulationSettings::new(0, 10).validate(),
            Err(DlaError::EmptyGrid)
        ));
    }

    #[test]
    fn test_validate_rejects_zero_workers() {
        let settings = SimulationSettings::new(5, 10).with_workers(0);
        assert!(matches!(settings.validate(), Err(DlaError::InvalidWorkers)));
    }

    #[test]
    fn test_validate_accepts_odd_grid_and_empty_budget() {
        assert!(SimulationSettings::new(1, 0).validate().is_ok());
        assert!(SimulationSettings::new(201, 0).validate().is_ok());
    }

    #[test]
    fn test_sequential_forces_one_worker() {
        let settings = SimulationSettings::new(5, 10)
            .with_policy(SchedulePolicy::Sequential)
            .with_workers(8);
        assert_eq!(settings.effective_workers(), 1);
    }

    #[test]
    fn test_point_strategy_defaults_follow_policy() {
        let dynamic = SimulationSettings::new(5, 1).with_policy(SchedulePolicy::Dynamic);
        let chunked = SimulationSettings::new(5, 1).with_policy(SchedulePolicy::Static);
        assert_eq!(dynamic.effective_point_strategy(), PointStrategy::FineGrained);
        assert_eq!(chunked.effective_point_strategy(), PointStrategy::CoarseGrained);
        let forced = chunked.with_point_strategy(PointStrategy::FineGrained);
        assert_eq!(forced.effective_point_strategy(), PointStrategy::FineGrained);
    }

    #[test]
    fn test_exhaustion_radius() {
        assert_eq!(SimulationSettings::new(1, 0).exhaustion_radius(), 0);
        assert_eq!(SimulationSettings::new(3, 0).exhaustion_radius(), 0);
        assert_eq!(SimulationSettings::new(5, 0).exhaustion_radius(), 1);
        assert_eq!(SimulationSettings::new(101, 0).exhaustion_radius(), 49);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(SchedulePolicy::parse("STATIC").unwrap(), SchedulePolicy::Static);
        assert_eq!(SchedulePolicy::parse("seq").unwrap(), SchedulePolicy::Sequential);
        assert!(SchedulePolicy::parse("round-robin").is_err());
        assert_eq!(PointStrategy::parse("coarse").unwrap(), PointStrategy::CoarseGrained);
        assert!(PointStrategy::parse("medium").is_err());
    }
}
