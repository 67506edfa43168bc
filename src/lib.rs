//! Concurrent diffusion-limited aggregation on a square lattice.

pub mod config;
pub mod error;
pub mod lattice;
pub mod output;
pub mod radius;
pub mod scheduler;
pub mod settings;
pub mod simulation;
pub mod spawn;
pub mod stick;
pub mod walker;

pub use error::{DlaError, Result};
pub use lattice::{CellState, Lattice, LatticeSnapshot};
pub use radius::RadiusTracker;
pub use settings::{PointStrategy, SchedulePolicy, SimulationSettings};
pub use simulation::{DlaSimulation, RunReport};
