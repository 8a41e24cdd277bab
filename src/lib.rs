pub mod analysis;
pub mod catalogue;
pub mod config;
pub mod coords;
pub mod drones;
pub mod engine;
pub mod hud;
pub mod locations;
pub mod pathfinding;
pub mod scheduler;
pub mod weather;

// Re-exports for convenience in tests and integration users.
pub use analysis::{AnalysisReport, MissionEvent, MissionObserver};
pub use catalogue::default_targets;
pub use config::{ConfigError, SimConfig};
pub use coords::Point2;
pub use drones::{DroneFuelState, DroneStatus, MAX_FUEL_CAPACITY};
pub use engine::{Engine, ExecutorState, MissionExecutor, SimSnapshot};
pub use hud::{PriorityTier, format_hud, format_side_panel, priority_tier};
pub use locations::{Base, City, GraphError, LocationGraph};
pub use pathfinding::{Path, shortest_path};
pub use scheduler::{Decision, MissionScheduler, MissionTarget, SetupError, SkipReason, TargetStatus};
pub use weather::{SimulatedWeather, WeatherSnapshot, WeatherSource};
