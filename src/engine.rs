use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::analysis::{MissionEvent, MissionObserver};
use crate::config::{ConfigError, SimConfig};
use crate::coords::{Point2, go_towards};
use crate::drones::{DroneFuelState, DroneStatus};
use crate::locations::{City, GraphError, LocationGraph};
use crate::pathfinding::Path;
use crate::scheduler::{Decision, MissionScheduler, MissionTarget, SetupError, Sortie, TargetStatus};
use crate::weather::WeatherSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutorState {
	Idle,
	Selecting,
	Moving,
	Arrived,
	ReturningHome,
	Complete,
}

impl ExecutorState {
	pub fn label(self) -> &'static str {
		match self {
			ExecutorState::Idle => "Idle",
			ExecutorState::Selecting => "Selecting",
			ExecutorState::Moving => "Moving",
			ExecutorState::Arrived => "Arrived",
			ExecutorState::ReturningHome => "Returning home",
			ExecutorState::Complete => "Complete",
		}
	}

	pub fn is_active(self) -> bool {
		!matches!(self, ExecutorState::Idle | ExecutorState::Complete)
	}
}

/// Everything one tick needs besides the executor itself.
pub struct TickContext<'a> {
	pub city: &'a City,
	pub drone: &'a mut DroneFuelState,
	pub weather: &'a WeatherSnapshot,
	pub config: &'a SimConfig,
	pub observer: &'a mut dyn MissionObserver,
	/// Seconds since the previous tick.
	pub dt: f32,
}

#[derive(Debug, Clone)]
struct ActiveSortie {
	sortie: Sortie,
	waypoints: Vec<Point2>,
	next: usize,
	fuel_used: f32,
}

#[derive(Debug, Clone)]
pub struct MissionExecutor {
	state: ExecutorState,
	scheduler: Option<MissionScheduler>,
	active: Option<ActiveSortie>,
	starting_fuel: f32,
}

impl Default for MissionExecutor {
	fn default() -> Self {
		Self::new()
	}
}

impl MissionExecutor {
	pub fn new() -> Self {
		Self { state: ExecutorState::Idle, scheduler: None, active: None, starting_fuel: 0.0 }
	}

	pub fn state(&self) -> ExecutorState {
		self.state
	}

	pub fn targets(&self) -> &[MissionTarget] {
		self.scheduler.as_ref().map(|s| s.targets()).unwrap_or(&[])
	}

	pub fn current_path(&self) -> Option<&Path> {
		self.active.as_ref().map(|a| &a.sortie.path)
	}

	pub fn current_target(&self) -> Option<&MissionTarget> {
		let slot = self.active.as_ref()?.sortie.slot;
		self.scheduler.as_ref()?.target(slot)
	}

	/// Remaining waypoints of the active path, next one first.
	pub fn remaining_waypoints(&self) -> &[Point2] {
		self.active.as_ref().map(|a| &a.waypoints[a.next.min(a.waypoints.len())..]).unwrap_or(&[])
	}

	pub fn starting_fuel(&self) -> f32 {
		self.starting_fuel
	}

	pub fn count(&self, status: TargetStatus) -> usize {
		self.scheduler.as_ref().map(|s| s.count(status)).unwrap_or(0)
	}

	/// Validates the selection and enters `Selecting`. Nothing is touched on error.
	pub fn start(&mut self, city: &City, selection: &[usize], drone: &DroneFuelState) -> Result<(), SetupError> {
		if self.state.is_active() {
			return Err(SetupError::MissionInProgress);
		}
		let scheduler = MissionScheduler::new(city, selection)?;
		info!("mission over {} with {} targets", city.name, scheduler.targets().len());
		self.scheduler = Some(scheduler);
		self.active = None;
		self.starting_fuel = drone.remaining_fuel();
		self.state = ExecutorState::Selecting;
		Ok(())
	}

	/// Back to `Idle`; fuel already spent stays spent.
	pub fn reset(&mut self) {
		*self = Self::new();
	}

	// Advances exactly one step of the mission state machine.
	pub fn tick(&mut self, ctx: &mut TickContext<'_>) -> Result<ExecutorState, GraphError> {
		match self.state {
			ExecutorState::Idle | ExecutorState::Complete => return Ok(self.state),
			ExecutorState::Selecting => self.select(ctx)?,
			ExecutorState::Moving => self.advance(ctx),
			ExecutorState::Arrived => self.strike(ctx),
			ExecutorState::ReturningHome => self.return_home(ctx),
		}
		ctx.observer.on_event(&MissionEvent::FuelSnapshot {
			starting: self.starting_fuel,
			current: ctx.drone.remaining_fuel(),
		});
		Ok(self.state)
	}

	fn select(&mut self, ctx: &mut TickContext<'_>) -> Result<(), GraphError> {
		let Some(scheduler) = self.scheduler.as_mut() else {
			self.state = ExecutorState::ReturningHome;
			return Ok(());
		};
		loop {
			match scheduler.next_decision(ctx.city.bases(), ctx.drone, ctx.weather)? {
				None => {
					info!("all targets processed, returning home");
					self.state = ExecutorState::ReturningHome;
					return Ok(());
				}
				Some(Decision::Skip { slot, reason }) => {
					let target = scheduler.targets()[slot].name.clone();
					ctx.observer.on_event(&MissionEvent::Assigned { target: target.clone() });
					ctx.observer.on_event(&MissionEvent::Failed { target, reason });
				}
				Some(Decision::Engage(sortie)) => {
					let target = scheduler.targets()[sortie.slot].name.clone();
					ctx.observer.on_event(&MissionEvent::Assigned { target });
					let waypoints = sortie
						.path
						.nodes
						.iter()
						.map(|&n| ctx.city.bases()[n].pos)
						.collect();
					let fuel_used = sortie.charged;
					self.active = Some(ActiveSortie { sortie, waypoints, next: 0, fuel_used });
					self.state = ExecutorState::Moving;
					return Ok(());
				}
			}
		}
	}

	fn advance(&mut self, ctx: &mut TickContext<'_>) {
		let Some(active) = self.active.as_mut() else {
			self.state = ExecutorState::Selecting;
			return;
		};
		let Some(&waypoint) = active.waypoints.get(active.next) else {
			self.state = ExecutorState::Arrived;
			return;
		};
		let (moved, reached) = fly(ctx, waypoint);
		active.fuel_used += moved;
		if reached {
			active.next += 1;
			debug!("waypoint {}/{} reached", active.next, active.waypoints.len());
			if active.next >= active.waypoints.len() {
				self.state = ExecutorState::Arrived;
			}
		}
	}

	fn strike(&mut self, ctx: &mut TickContext<'_>) {
		if let (Some(active), Some(scheduler)) = (self.active.take(), self.scheduler.as_mut()) {
			let slot = active.sortie.slot;
			scheduler.set_status(slot, TargetStatus::Destroyed);
			let target = scheduler.targets()[slot].name.clone();
			info!("{target} destroyed, {:.1} fuel used", active.fuel_used);
			ctx.drone.push_mission_log(target.clone(), active.fuel_used);
			ctx.observer.on_event(&MissionEvent::Completed { target, fuel_used: active.fuel_used });
		}
		self.state = ExecutorState::Selecting;
	}

	fn return_home(&mut self, ctx: &mut TickContext<'_>) {
		let home = ctx.drone.home();
		let (_, reached) = fly(ctx, home);
		if reached {
			let destroyed = self.count(TargetStatus::Destroyed);
			let skipped = self.count(TargetStatus::Skipped);
			info!("mission complete: {destroyed} destroyed, {skipped} skipped");
			ctx.observer.on_event(&MissionEvent::Finished { destroyed, skipped });
			self.state = ExecutorState::Complete;
		}
	}
}

/// One movement step toward `target`; returns the fuel burnt and whether it was reached.
fn fly(ctx: &mut TickContext<'_>, target: Point2) -> (f32, bool) {
	let step = ctx.config.drone_speed * ctx.dt.max(0.0);
	let (moved, reached) = go_towards(ctx.drone.position_mut(), target, step, ctx.config.arrival_epsilon);
	let wanted = moved * ctx.config.fuel_per_unit_distance;
	let burnt = ctx.drone.burn(wanted);
	if burnt < wanted {
		warn!("tank ran dry in flight ({:.2} of {:.2} fuel available)", burnt, wanted);
	}
	(burnt, reached)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetView {
	pub name: String,
	pub priority: u32,
	pub status: TargetStatus,
	pub pos: Point2,
}

/// Read-only view of the simulation handed to renderers after each tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimSnapshot {
	pub state: ExecutorState,
	pub city: Option<String>,
	pub position: Point2,
	pub home: Point2,
	pub path: Vec<Point2>,
	pub targets: Vec<TargetView>,
	pub fuel: f32,
	pub fuel_percent: f32,
	pub drone_status: DroneStatus,
	pub missions_completed: u32,
}

#[derive(Debug)]
pub struct Engine {
	pub graph: LocationGraph,
	pub config: SimConfig,
	pub drone: DroneFuelState,
	pub executor: MissionExecutor,
	city: Option<String>,
}

impl Engine {
	/// Fails if `config` does not pass `SimConfig::validate`.
	pub fn new(graph: LocationGraph, config: SimConfig) -> Result<Self, ConfigError> {
		config.validate()?;
		let drone = DroneFuelState::with_fuel(Point2::default(), config.starting_fuel);
		Ok(Self { graph, config, drone, executor: MissionExecutor::new(), city: None })
	}

	pub fn city(&self) -> Option<&City> {
		self.city.as_deref().and_then(|name| self.graph.city(name).ok())
	}

	pub fn start_mission(&mut self, city_name: &str, selection: &[usize]) -> Result<(), SetupError> {
		if self.executor.state().is_active() {
			return Err(SetupError::MissionInProgress);
		}
		let city = self.graph.city(city_name)?;
		let home = city.home_index()?;
		let home_pos = city.bases()[home].pos;
		let mut drone = self.drone.clone();
		drone.rehome(home_pos);
		self.executor.start(city, selection, &drone)?;
		self.drone = drone;
		self.city = Some(city_name.to_string());
		Ok(())
	}

	pub fn start_mission_by_name(&mut self, city_name: &str, targets: &[&str]) -> Result<(), SetupError> {
		let city = self.graph.city(city_name)?;
		let selection = targets
			.iter()
			.map(|name| city.index_of(name).ok_or_else(|| SetupError::UnknownTarget(name.to_string())))
			.collect::<Result<Vec<_>, _>>()?;
		self.start_mission(city_name, &selection)
	}

	pub fn tick(
		&mut self,
		dt: f32,
		weather: &WeatherSnapshot,
		observer: &mut dyn MissionObserver,
	) -> Result<ExecutorState, GraphError> {
		let Some(name) = self.city.as_deref() else {
			return Ok(self.executor.state());
		};
		let city = self.graph.city(name)?;
		let mut ctx = TickContext {
			city,
			drone: &mut self.drone,
			weather,
			config: &self.config,
			observer,
			dt,
		};
		self.executor.tick(&mut ctx)
	}

	/// Discards the mission and restores the drone to a full tank at home.
	pub fn reset(&mut self) {
		self.executor.reset();
		self.drone.reset();
	}

	pub fn snapshot(&self) -> SimSnapshot {
		let city = self.city();
		let targets = self
			.executor
			.targets()
			.iter()
			.map(|t| TargetView {
				name: t.name.clone(),
				priority: t.priority,
				status: t.status,
				pos: city
					.and_then(|c| c.bases().get(t.base))
					.map(|b| b.pos)
					.unwrap_or_default(),
			})
			.collect();
		SimSnapshot {
			state: self.executor.state(),
			city: self.city.clone(),
			position: self.drone.position(),
			home: self.drone.home(),
			path: self.executor.remaining_waypoints().to_vec(),
			targets,
			fuel: self.drone.remaining_fuel(),
			fuel_percent: self.drone.fuel_percentage(),
			drone_status: self.drone.status(),
			missions_completed: self.drone.missions_completed(),
		}
	}
}
