use crate::engine::SimSnapshot;
use crate::scheduler::TargetStatus;
use crate::weather::WeatherSnapshot;

pub const DRONE_PANEL_HEADING: &str = "Drone";
pub const WEATHER_PANEL_HEADING: &str = "Weather";
pub const TARGET_PANEL_HEADING: &str = "Targets";

pub fn status_label(status: TargetStatus) -> &'static str {
	match status {
		TargetStatus::Pending => "Pending",
		TargetStatus::Engaged => "Engaged",
		TargetStatus::Destroyed => "Destroyed",
		TargetStatus::Skipped => "Skipped",
	}
}

/// Colour class of a base marker on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityTier {
	Home,
	High,
	Medium,
	Low,
}

pub fn priority_tier(priority: u32, is_home: bool) -> PriorityTier {
	if is_home {
		return PriorityTier::Home;
	}
	match priority {
		5.. => PriorityTier::High,
		3 | 4 => PriorityTier::Medium,
		_ => PriorityTier::Low,
	}
}

pub fn format_hud(snapshot: &SimSnapshot, weather: &WeatherSnapshot) -> String {
	format!(
		"Fuel: {:.1}% ({}) | {} | Wind: {:.1} km/h | {}",
		snapshot.fuel_percent,
		snapshot.drone_status.label(),
		snapshot.state.label(),
		weather.wind_speed,
		weather.alert_text()
	)
}

pub fn format_side_panel(snapshot: &SimSnapshot, weather: &WeatherSnapshot) -> Vec<String> {
	let mut out = Vec::new();
	out.push(format!("[{}]", DRONE_PANEL_HEADING));
	out.push(format!("Position: ({:.1}, {:.1})", snapshot.position.x, snapshot.position.y));
	out.push(format!("Fuel: {:.1}% - {}", snapshot.fuel_percent, snapshot.drone_status.label()));
	out.push(format!("Missions completed: {}", snapshot.missions_completed));
	out.push(format!("[{}]", WEATHER_PANEL_HEADING));
	out.push(format!("Temperature: {:.1} °C", weather.temperature));
	out.push(format!("Wind: {:.1} km/h", weather.wind_speed));
	out.push(format!("Alert: {}", weather.alert_text()));
	out.push(format!("[{}]", TARGET_PANEL_HEADING));
	if snapshot.targets.is_empty() {
		out.push("None selected".to_string());
	}
	for t in &snapshot.targets {
		out.push(format!("{} (P{}) - {}", t.name, t.priority, status_label(t.status)));
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::coords::Point2;
	use crate::drones::DroneStatus;
	use crate::engine::{ExecutorState, TargetView};

	fn snapshot() -> SimSnapshot {
		SimSnapshot {
			state: ExecutorState::Moving,
			city: Some("Quetta".into()),
			position: Point2::new(6.5, 5.0),
			home: Point2::new(5.0, 5.0),
			path: vec![Point2::new(8.0, 7.0)],
			targets: vec![TargetView {
				name: "Quetta Base Alpha".into(),
				priority: 4,
				status: TargetStatus::Engaged,
				pos: Point2::new(8.0, 7.0),
			}],
			fuel: 95.5,
			fuel_percent: 95.5,
			drone_status: DroneStatus::Operational,
			missions_completed: 0,
		}
	}

	#[test]
	fn hud_format() {
		let s = format_hud(&snapshot(), &WeatherSnapshot::calm());
		assert!(s.contains("Fuel: 95.5%"));
		assert!(s.contains("OPERATIONAL"));
		assert!(s.contains("Moving"));
		assert!(s.contains("No alerts"));
	}

	#[test]
	fn priority_tiers() {
		assert_eq!(priority_tier(0, true), PriorityTier::Home);
		assert_eq!(priority_tier(5, false), PriorityTier::High);
		assert_eq!(priority_tier(9, false), PriorityTier::High);
		assert_eq!(priority_tier(4, false), PriorityTier::Medium);
		assert_eq!(priority_tier(3, false), PriorityTier::Medium);
		assert_eq!(priority_tier(2, false), PriorityTier::Low);
	}

	#[test]
	fn side_panel_lists_drone_weather_and_targets() {
		let lines = format_side_panel(&snapshot(), &WeatherSnapshot::calm());
		assert!(lines.iter().any(|l| l.contains("Drone")));
		assert!(lines.iter().any(|l| l.contains("Wind: 0.0 km/h")));
		assert!(lines.iter().any(|l| l.contains("Quetta Base Alpha (P4) - Engaged")));
	}
}
