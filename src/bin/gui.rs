use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPlugin, EguiPrimaryContextPass};
use dronestrike::catalogue::CITY_NAMES;
use dronestrike::hud::{status_label, TARGET_PANEL_HEADING};
use dronestrike::*;

// ---------- Constants ----------
const MAP_SCALE: f32 = 40.0;
const BASE_SIZE: f32 = 18.0;
const DRONE_SIZE: f32 = 10.0;
const PATH_DOT_SIZE: f32 = 4.0;
const SIM_SPEED: f32 = 1.0;
const CONFIG_PATH: &str = "dronestrike.json";

// ---------- Components ----------
#[derive(Component)]
struct BaseMarker {
	index: usize,
}

#[derive(Component)]
struct DroneMarker;

#[derive(Component)]
struct PathMarker; // Recreated every frame from the snapshot

// ---------- Resources ----------
#[derive(Resource)]
struct UiState {
	city: String,
	selected: Vec<bool>,
	console_log: Vec<String>,
	paused: bool,
	show_report: bool,
	request_rebuild_bases: bool,
	toast: Option<(String, f32)>, // (message, remaining_seconds)
}

#[derive(Resource)]
struct GameEngine {
	engine: Engine,
	report: AnalysisReport,
	weather: SimulatedWeather,
}

// ---------- Entry ----------
fn main() {
	let mut console_log = vec!["Select targets and press Start".to_string()];
	let config = match SimConfig::load(CONFIG_PATH) {
		Ok(c) => c,
		Err(e) => {
			console_log.push(format!("Using default config ({e})"));
			SimConfig::default()
		}
	};
	let graph = match default_targets() {
		Ok(g) => g,
		Err(e) => {
			eprintln!("built-in catalogue is invalid: {e}");
			return;
		}
	};
	let engine = match Engine::new(graph, config) {
		Ok(e) => e,
		Err(e) => {
			eprintln!("{e}");
			return;
		}
	};
	let city = CITY_NAMES[0].to_string();
	let base_count = engine.graph.bases_of(&city).map(|b| b.len()).unwrap_or(0);
	let weather = SimulatedWeather::new(&city, engine.config.weather_seed, engine.config.weather_refresh_secs);

	App::new()
		.add_plugins(DefaultPlugins.set(WindowPlugin {
			primary_window: Some(Window {
				title: "Dronestrike Mission Planner".to_string(),
				resolution: (1280, 800).into(),
				..Default::default()
			}),
			..Default::default()
		}))
		.add_plugins(EguiPlugin::default())
		// Resources
		.insert_resource(UiState {
			city,
			selected: vec![false; base_count],
			console_log,
			paused: false,
			show_report: false,
			request_rebuild_bases: true,
			toast: None,
		})
		.insert_resource(GameEngine {
			engine,
			report: AnalysisReport::new(),
			weather,
		})
		// Setup
		.add_systems(Startup, (setup_camera, spawn_drone))
		// Frame systems
		.add_systems(
			Update,
			(
				build_bases_when_needed,
				update_base_colors,
				tick_engine_when_running,
				update_drone_sprite,
				rebuild_path_markers,
				update_toast_timer,
			),
		)
		.add_systems(EguiPrimaryContextPass, draw_ui)
		.run();
}

// ---------- Setup ----------
fn setup_camera(mut commands: Commands) {
	commands.spawn((Camera2d, Transform::from_xyz(10.0 * MAP_SCALE, 10.0 * MAP_SCALE, 1000.0)));
}

fn spawn_drone(mut commands: Commands) {
	commands.spawn((
		Sprite::from_color(Color::WHITE, Vec2::splat(DRONE_SIZE)),
		Transform::from_translation(Vec3::new(0.0, 0.0, 20.0)),
		DroneMarker,
	));
}

// ---------- Utilities ----------
fn map_to_screen(p: Point2, z: f32) -> Vec3 {
	Vec3::new(p.x * MAP_SCALE, p.y * MAP_SCALE, z)
}

fn tier_color(tier: PriorityTier) -> Color {
	match tier {
		PriorityTier::Home => Color::srgb(0.2, 0.4, 0.95),
		PriorityTier::High => Color::srgb(0.9, 0.15, 0.15),
		PriorityTier::Medium => Color::srgb(0.95, 0.55, 0.1),
		PriorityTier::Low => Color::srgb(0.2, 0.75, 0.3),
	}
}

fn selected_indices(selected: &[bool]) -> Vec<usize> {
	selected.iter().enumerate().filter(|(_, on)| **on).map(|(i, _)| i).collect()
}

fn set_toast(ui: &mut UiState, msg: impl Into<String>) {
	ui.toast = Some((msg.into(), 2.0));
}

fn describe_event(event: &MissionEvent) -> Option<String> {
	match event {
		MissionEvent::Assigned { target } => Some(format!("Assigned {target}")),
		MissionEvent::Completed { target, fuel_used } => Some(format!("Destroyed {target} ({fuel_used:.1} fuel)")),
		MissionEvent::Failed { target, reason } => Some(format!("Skipped {target}: {}", reason.describe())),
		MissionEvent::Finished { destroyed, skipped } => {
			Some(format!("Mission complete: {destroyed} destroyed, {skipped} skipped"))
		}
		MissionEvent::FuelSnapshot { .. } => None,
	}
}

// ---------- Systems: Map Rendering ----------
fn build_bases_when_needed(
	mut commands: Commands,
	mut ui: ResMut<UiState>,
	eng: Res<GameEngine>,
	existing: Query<Entity, With<BaseMarker>>,
) {
	if !ui.request_rebuild_bases {
		return;
	}
	for e in &existing {
		commands.entity(e).despawn();
	}
	if let Ok(bases) = eng.engine.graph.bases_of(&ui.city) {
		for (index, base) in bases.iter().enumerate() {
			let color = tier_color(priority_tier(base.priority, base.is_home()));
			commands.spawn((
				Sprite::from_color(color, Vec2::splat(BASE_SIZE)),
				Transform::from_translation(map_to_screen(base.pos, 0.0)),
				BaseMarker { index },
			));
		}
	}
	ui.request_rebuild_bases = false;
}

// Destroyed targets go dark, skipped ones fade.
fn update_base_colors(eng: Res<GameEngine>, ui: Res<UiState>, mut q: Query<(&BaseMarker, &mut Sprite)>) {
	let Ok(bases) = eng.engine.graph.bases_of(&ui.city) else {
		return;
	};
	let targets = eng.engine.executor.targets();
	for (marker, mut sprite) in &mut q {
		let Some(base) = bases.get(marker.index) else {
			continue;
		};
		let base_color = tier_color(priority_tier(base.priority, base.is_home()));
		let status = targets.iter().find(|t| t.base == marker.index).map(|t| t.status);
		sprite.color = match status {
			Some(TargetStatus::Destroyed) => Color::srgb(0.15, 0.15, 0.15),
			Some(TargetStatus::Skipped) => base_color.with_alpha(0.35),
			_ => base_color,
		};
	}
}

fn update_drone_sprite(eng: Res<GameEngine>, mut q: Query<&mut Transform, With<DroneMarker>>) {
	for mut t in &mut q {
		t.translation = map_to_screen(eng.engine.drone.position(), 20.0);
	}
}

fn rebuild_path_markers(mut commands: Commands, eng: Res<GameEngine>, existing: Query<Entity, With<PathMarker>>) {
	for e in &existing {
		commands.entity(e).despawn();
	}
	for p in eng.engine.executor.remaining_waypoints() {
		commands.spawn((
			Sprite::from_color(Color::srgba(1.0, 1.0, 0.3, 0.8), Vec2::splat(PATH_DOT_SIZE)),
			Transform::from_translation(map_to_screen(*p, 10.0)),
			PathMarker,
		));
	}
}

// ---------- Systems: Engine ----------
fn tick_engine_when_running(time: Res<Time>, mut eng: ResMut<GameEngine>, mut ui: ResMut<UiState>) {
	if ui.paused || !eng.engine.executor.state().is_active() {
		return;
	}
	let dt = time.delta_secs() * SIM_SPEED;
	let game = &mut *eng;
	game.weather.update(dt);
	let mut events: Vec<MissionEvent> = Vec::new();
	if let Err(e) = game.engine.tick(dt, game.weather.current(), &mut events) {
		error!("mission aborted: {e}");
		ui.console_log.push(format!("Error: {e}"));
		game.engine.executor.reset();
		return;
	}
	for event in &events {
		game.report.on_event(event);
		if let Some(line) = describe_event(event) {
			ui.console_log.push(line);
		}
		if matches!(event, MissionEvent::Finished { .. }) {
			ui.show_report = true;
		}
	}
}

// ---------- Systems: Toast ----------
fn update_toast_timer(time: Res<Time>, mut ui: ResMut<UiState>) {
	if let Some((_, ref mut remaining)) = ui.toast {
		*remaining -= time.delta_secs();
		if *remaining <= 0.0 {
			ui.toast = None;
		}
	}
}

// ---------- Systems: UI ----------
fn draw_ui(mut egui_ctx: EguiContexts, ui: ResMut<UiState>, eng: ResMut<GameEngine>) {
	let Ok(ctx) = egui_ctx.ctx_mut() else {
		return;
	};
	let state = ui.into_inner();
	let game = eng.into_inner();
	let snapshot = game.engine.snapshot();
	let weather = game.weather.current().clone();

	// Top HUD
	egui::TopBottomPanel::top("top_hud").show(&*ctx, |ui_top| {
		ui_top.horizontal(|ui_row| {
			ui_row.label(format_hud(&snapshot, &weather));
			ui_row.separator();
			let pause_label = if state.paused { "Resume" } else { "Pause" };
			if ui_row.button(pause_label).clicked() {
				state.paused = !state.paused;
			}
			if let Some((ref msg, _)) = state.toast {
				ui_row.separator();
				ui_row.colored_label(egui::Color32::YELLOW, msg);
			}
		});
	});

	// Right panel (mission setup / status)
	egui::SidePanel::right("right_panel")
		.resizable(true)
		.default_width(300.0)
		.show(&*ctx, |ui_right| {
			let running = snapshot.state.is_active();
			ui_right.add_enabled_ui(!running, |ui_setup| {
				let before = state.city.clone();
				egui::ComboBox::from_label("City").selected_text(state.city.as_str()).show_ui(ui_setup, |ui_combo| {
					for name in CITY_NAMES {
						ui_combo.selectable_value(&mut state.city, name.to_string(), name);
					}
				});
				if state.city != before {
					let count = game.engine.graph.bases_of(&state.city).map(|b| b.len()).unwrap_or(0);
					state.selected = vec![false; count];
					state.request_rebuild_bases = true;
					game.engine.reset();
					game.weather =
						SimulatedWeather::new(&state.city, game.engine.config.weather_seed, game.engine.config.weather_refresh_secs);
				}
				if let Ok(bases) = game.engine.graph.bases_of(&state.city) {
					for (i, base) in bases.iter().enumerate() {
						if base.is_home() {
							continue;
						}
						if let Some(on) = state.selected.get_mut(i) {
							ui_setup.checkbox(on, format!("{} (P{})", base.name, base.priority));
						}
					}
				}
			});
			ui_right.horizontal(|ui_row| {
				if ui_row.add_enabled(!running, egui::Button::new("Start")).clicked() {
					let selection = selected_indices(&state.selected);
					match game.engine.start_mission(&state.city, &selection) {
						Ok(()) => {
							game.report = AnalysisReport::new();
							state.show_report = false;
							state.console_log.push(format!("Mission over {} started", state.city));
						}
						Err(e) => set_toast(state, e.to_string()),
					}
				}
				if ui_row.button("Reset").clicked() {
					game.engine.reset();
					game.report = AnalysisReport::new();
					state.show_report = false;
					state.console_log.push("Drone reset to full fuel".to_string());
				}
			});
			ui_right.separator();
			ui_right.heading(TARGET_PANEL_HEADING);
			egui::ScrollArea::vertical().id_salt("targets").max_height(160.0).show(ui_right, |ui_scroll| {
				for t in &snapshot.targets {
					ui_scroll.label(format!("{} (P{}) - {}", t.name, t.priority, status_label(t.status)));
				}
			});
			ui_right.separator();
			for line in format_side_panel(&snapshot, &weather).iter().take(8) {
				ui_right.label(line);
			}
			ui_right.separator();
			ui_right.checkbox(&mut state.show_report, "Show analysis report");
		});

	// Bottom console
	egui::TopBottomPanel::bottom("bottom_console").resizable(true).show(&*ctx, |ui_bottom| {
		egui::ScrollArea::vertical().stick_to_bottom(true).show(ui_bottom, |ui_logs| {
			for line in &state.console_log {
				ui_logs.label(line);
			}
		});
	});

	if state.show_report {
		egui::Window::new("Analysis Report").open(&mut state.show_report).show(&*ctx, |ui_report| {
			ui_report.monospace(game.report.generate_report());
		});
	}
}
