use std::collections::VecDeque;
use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::coords::Point2;

pub const MAX_FUEL_CAPACITY: f32 = 100.0;
pub const MIN_OPERATIONAL_FUEL: f32 = 10.0;
pub const FUEL_CONSUMPTION_BASE_RATE: f32 = 5.0;
pub const WIND_SPEED_FUEL_MULTIPLIER: f32 = 0.5;
pub const ALERT_FUEL_MULTIPLIER: f32 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DroneStatus {
	Operational,
	LowFuel,
	OutOfFuel,
}

impl DroneStatus {
	pub fn label(self) -> &'static str {
		match self {
			DroneStatus::Operational => "OPERATIONAL",
			DroneStatus::LowFuel => "LOW FUEL",
			DroneStatus::OutOfFuel => "OUT OF FUEL",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionLogEntry {
	pub target: String,
	pub fuel_consumed: f32,
	pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroneFuelState {
	fuel: f32,
	position: Point2,
	home: Point2,
	missions_completed: u32,
	history: VecDeque<MissionLogEntry>,
}

impl DroneFuelState {
	pub fn new(home: Point2) -> Self {
		Self::with_fuel(home, MAX_FUEL_CAPACITY)
	}

	pub fn with_fuel(home: Point2, fuel: f32) -> Self {
		Self {
			fuel: fuel.clamp(0.0, MAX_FUEL_CAPACITY),
			position: home,
			home,
			missions_completed: 0,
			history: VecDeque::new(),
		}
	}

	/// Rate charged per mission when weather conditions apply.
	pub fn consumption_rate(wind_speed: f32, has_alert: bool) -> f32 {
		let mut rate = FUEL_CONSUMPTION_BASE_RATE + wind_speed * WIND_SPEED_FUEL_MULTIPLIER;
		if has_alert {
			rate *= ALERT_FUEL_MULTIPLIER;
		}
		rate
	}

	/// Charges `amount`, or the weather rate instead of it when there is wind or an alert.
	/// Nothing is deducted if the tank cannot cover the charge or the charge is
	/// negative or not finite.
	pub fn consume_fuel(&mut self, amount: f32, wind_speed: f32, has_alert: bool) -> bool {
		let charge = if wind_speed > 0.0 || has_alert {
			Self::consumption_rate(wind_speed, has_alert)
		} else {
			amount
		};
		if !(charge >= 0.0 && charge.is_finite()) || self.fuel < charge {
			return false;
		}
		self.fuel -= charge;
		self.clamp_fuel();
		true
	}

	/// Burns up to `amount` and returns what was actually taken; the tank bottoms out at zero.
	pub fn burn(&mut self, amount: f32) -> f32 {
		let before = self.fuel;
		self.fuel -= amount.max(0.0);
		self.clamp_fuel();
		before - self.fuel
	}

	fn clamp_fuel(&mut self) {
		self.fuel = self.fuel.clamp(0.0, MAX_FUEL_CAPACITY);
	}

	pub fn estimate_fuel_for_mission(&self, distance: f32, wind_speed: f32) -> f32 {
		distance * FUEL_CONSUMPTION_BASE_RATE + distance * wind_speed * WIND_SPEED_FUEL_MULTIPLIER
	}

	pub fn remaining_fuel(&self) -> f32 {
		self.fuel
	}

	pub fn fuel_percentage(&self) -> f32 {
		self.fuel / MAX_FUEL_CAPACITY * 100.0
	}

	pub fn status(&self) -> DroneStatus {
		if self.fuel <= 0.0 {
			DroneStatus::OutOfFuel
		} else if self.fuel <= MIN_OPERATIONAL_FUEL {
			DroneStatus::LowFuel
		} else {
			DroneStatus::Operational
		}
	}

	pub fn is_operational(&self) -> bool {
		self.fuel > MIN_OPERATIONAL_FUEL
	}

	pub fn push_mission_log(&mut self, target: impl Into<String>, fuel_consumed: f32) {
		self.history.push_front(MissionLogEntry {
			target: target.into(),
			fuel_consumed,
			timestamp: Utc::now(),
		});
		self.missions_completed += 1;
	}

	pub fn last_mission(&self) -> Option<&MissionLogEntry> {
		self.history.front()
	}

	/// Most recent first.
	pub fn history(&self) -> impl Iterator<Item = &MissionLogEntry> {
		self.history.iter()
	}

	pub fn history_len(&self) -> usize {
		self.history.len()
	}

	pub fn clear_history(&mut self) {
		self.history.clear();
	}

	pub fn missions_completed(&self) -> u32 {
		self.missions_completed
	}

	pub fn position(&self) -> Point2 {
		self.position
	}

	pub fn home(&self) -> Point2 {
		self.home
	}

	pub fn set_position(&mut self, pos: Point2) {
		self.position = pos;
	}

	pub(crate) fn position_mut(&mut self) -> &mut Point2 {
		&mut self.position
	}

	/// Moves the home coordinate; the drone is parked there.
	pub fn rehome(&mut self, home: Point2) {
		self.home = home;
		self.position = home;
	}

	pub fn reset(&mut self) {
		self.fuel = MAX_FUEL_CAPACITY;
		self.position = self.home;
		self.missions_completed = 0;
		self.clear_history();
	}

	pub fn state_snapshot(&self) -> String {
		let mut out = String::new();
		let _ = writeln!(out, "=== DRONE STATE SNAPSHOT ===");
		let _ = writeln!(out, "Position: ({:.1}, {:.1})", self.position.x, self.position.y);
		let _ = writeln!(out, "Fuel: {:.1}%", self.fuel_percentage());
		let _ = writeln!(out, "Status: {}", self.status().label());
		let _ = writeln!(out, "Missions Completed: {}", self.missions_completed);
		let _ = writeln!(out, "History Size: {}", self.history.len());
		out
	}
}
