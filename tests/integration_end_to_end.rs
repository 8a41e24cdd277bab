use dronestrike::*;

fn test_graph() -> LocationGraph {
    let mut g = LocationGraph::new();
    g.add_city("Test").unwrap();
    g.add_base("Test", Base::new("Alpha", 10.0, 5.0, 5).with_edges(&[(4, 10.0)])).unwrap();
    g.add_base("Test", Base::new("Beta", 5.0, 15.0, 3).with_edges(&[(4, 20.0)])).unwrap();
    g.add_base("Test", Base::new("Orphan", 30.0, 30.0, 4)).unwrap();
    g.add_base("Test", Base::new("One Way", 5.0, 8.0, 2)).unwrap();
    g.add_base(
        "Test",
        Base::new("Home Base", 5.0, 5.0, 0).with_edges(&[(0, 10.0), (1, 20.0), (3, 3.0)]),
    )
    .unwrap();
    g
}

fn engine_with_fuel(fuel: f32) -> Engine {
    let config = SimConfig { starting_fuel: fuel, ..SimConfig::default() };
    Engine::new(test_graph(), config).unwrap()
}

fn run_to_completion(engine: &mut Engine, weather: &WeatherSnapshot, observer: &mut dyn MissionObserver) {
    for _ in 0..100_000 {
        if engine.tick(0.1, weather, observer).unwrap() == ExecutorState::Complete {
            return;
        }
    }
    panic!("mission never completed");
}

fn status_of(engine: &Engine, name: &str) -> TargetStatus {
    engine.executor.targets().iter().find(|t| t.name == name).unwrap().status
}

#[test]
fn two_targets_are_struck_in_priority_order() {
    let mut engine = engine_with_fuel(100.0);
    // Beta selected first; Alpha still goes first on priority.
    engine.start_mission_by_name("Test", &["Beta", "Alpha"]).unwrap();
    let mut events = Vec::new();
    run_to_completion(&mut engine, &WeatherSnapshot::calm(), &mut events);

    assert_eq!(status_of(&engine, "Alpha"), TargetStatus::Destroyed);
    assert_eq!(status_of(&engine, "Beta"), TargetStatus::Destroyed);
    assert_eq!(engine.drone.position(), Point2::new(5.0, 5.0));
    assert_eq!(engine.drone.missions_completed(), 2);

    // 10 + 20 charged on commit, 30 units flown at 0.05 per unit.
    assert!((engine.drone.remaining_fuel() - 68.5).abs() < 1e-2);

    let completed: Vec<&str> = events
        .iter()
        .filter_map(|e| match e {
            MissionEvent::Completed { target, .. } => Some(target.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(completed, vec!["Alpha", "Beta"]);
    let finished = events.iter().filter(|e| matches!(e, MissionEvent::Finished { .. })).count();
    assert_eq!(finished, 1);
    assert_eq!(events.last(), Some(&MissionEvent::FuelSnapshot {
        starting: 100.0,
        current: engine.drone.remaining_fuel(),
    }));
}

#[test]
fn insufficient_fuel_skips_without_moving() {
    let mut engine = engine_with_fuel(15.0);
    engine.start_mission_by_name("Test", &["Beta"]).unwrap();
    let mut events = Vec::new();
    run_to_completion(&mut engine, &WeatherSnapshot::calm(), &mut events);

    assert_eq!(status_of(&engine, "Beta"), TargetStatus::Skipped);
    assert_eq!(engine.executor.state(), ExecutorState::Complete);
    assert_eq!(engine.drone.remaining_fuel(), 15.0);
    assert_eq!(engine.drone.position(), Point2::new(5.0, 5.0));
    assert!(events.contains(&MissionEvent::Failed {
        target: "Beta".into(),
        reason: SkipReason::InsufficientFuel { required: 40.0, available: 15.0 },
    }));
    assert!(events.contains(&MissionEvent::Finished { destroyed: 0, skipped: 1 }));
}

#[test]
fn unreachable_targets_report_distinct_reasons() {
    let mut engine = engine_with_fuel(100.0);
    engine.start_mission_by_name("Test", &["Orphan", "One Way"]).unwrap();
    let mut events = Vec::new();
    run_to_completion(&mut engine, &WeatherSnapshot::calm(), &mut events);

    assert_eq!(status_of(&engine, "Orphan"), TargetStatus::Skipped);
    assert_eq!(status_of(&engine, "One Way"), TargetStatus::Skipped);
    assert!(events.contains(&MissionEvent::Failed { target: "Orphan".into(), reason: SkipReason::NoPath }));
    assert!(events.contains(&MissionEvent::Failed {
        target: "One Way".into(),
        reason: SkipReason::NoReturnPath,
    }));
    assert_eq!(engine.drone.remaining_fuel(), 100.0);
}

#[test]
fn wind_replaces_the_commit_charge() {
    let mut engine = engine_with_fuel(100.0);
    engine.start_mission_by_name("Test", &["Beta"]).unwrap();
    let windy = WeatherSnapshot { temperature: 20.0, wind_speed: 10.0, alert: None };
    run_to_completion(&mut engine, &windy, &mut ());

    // 5 + 10 * 0.5 instead of the 20 path cost, then 20 units flown.
    assert_eq!(status_of(&engine, "Beta"), TargetStatus::Destroyed);
    assert!((engine.drone.remaining_fuel() - 89.0).abs() < 1e-2);
}

#[test]
fn report_collects_the_whole_mission() {
    let mut engine = engine_with_fuel(100.0);
    engine.start_mission_by_name("Test", &["Alpha", "Orphan"]).unwrap();
    let mut report = AnalysisReport::new();
    run_to_completion(&mut engine, &WeatherSnapshot::calm(), &mut report);

    assert!(report.is_finished());
    assert_eq!(report.totals(), (2, 1, 1));
    let text = report.generate_report();
    assert!(text.contains("Base: Alpha"));
    assert!(text.contains("Base: Orphan"));
    assert!(text.contains("Outcome: 1 destroyed, 1 skipped"));
    assert!((report.fuel_consumed() - (100.0 - engine.drone.remaining_fuel())).abs() < 1e-3);
}

#[test]
fn reset_is_idempotent() {
    let mut engine = engine_with_fuel(100.0);
    engine.start_mission_by_name("Test", &["Alpha"]).unwrap();
    run_to_completion(&mut engine, &WeatherSnapshot::calm(), &mut ());

    engine.reset();
    let once = engine.snapshot();
    engine.reset();
    let twice = engine.snapshot();
    assert_eq!(once, twice);
    assert_eq!(once.state, ExecutorState::Idle);
    assert_eq!(once.fuel, MAX_FUEL_CAPACITY);
    assert!(once.targets.is_empty());
    assert!(once.path.is_empty());
}

#[test]
fn setup_errors_leave_engine_idle() {
    let mut engine = engine_with_fuel(100.0);
    assert_eq!(engine.start_mission("Test", &[]), Err(SetupError::EmptySelection));
    assert_eq!(engine.start_mission("Test", &[4]), Err(SetupError::HomeSelected));
    assert_eq!(engine.start_mission("Test", &[0, 0]), Err(SetupError::DuplicateTarget(0)));
    assert_eq!(engine.executor.state(), ExecutorState::Idle);
    assert_eq!(engine.drone.remaining_fuel(), 100.0);
}

#[test]
fn karachi_catalogue_mission_runs_to_completion() {
    let mut engine = Engine::new(default_targets().unwrap(), SimConfig::default()).unwrap();
    let names: Vec<String> = engine
        .graph
        .bases_of("Karachi")
        .unwrap()
        .iter()
        .filter(|b| !b.is_home())
        .map(|b| b.name.clone())
        .collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    engine.start_mission_by_name("Karachi", &refs).unwrap();
    let mut events = Vec::new();
    run_to_completion(&mut engine, &WeatherSnapshot::calm(), &mut events);

    let destroyed = engine.executor.count(TargetStatus::Destroyed);
    let skipped = engine.executor.count(TargetStatus::Skipped);
    assert_eq!(destroyed + skipped, names.len());
    assert!(destroyed > 0);
    assert!(engine.drone.remaining_fuel() >= 0.0);
    assert_eq!(engine.drone.position(), Point2::new(5.0, 5.0));

    let first = events.iter().find_map(|e| match e {
        MissionEvent::Assigned { target } => Some(target.as_str()),
        _ => None,
    });
    assert_eq!(first, Some("Karachi Naval Base"));
    for e in &events {
        if let MissionEvent::Failed { reason, .. } = e {
            assert!(matches!(reason, SkipReason::InsufficientFuel { .. }));
        }
    }
}

#[test]
fn loaded_graph_with_negative_costs_cannot_start() {
    let json = r#"{ "cities": [ { "name": "X", "bases": [
        { "name": "T", "pos": { "x": 1.0, "y": 0.0 }, "priority": 3, "neighbors": [ { "to": 1, "cost": -30.0 } ] },
        { "name": "Home Base", "pos": { "x": 0.0, "y": 0.0 }, "priority": 0, "neighbors": [ { "to": 0, "cost": -30.0 } ] }
    ] } ] }"#;
    let graph: LocationGraph = serde_json::from_str(json).unwrap();
    let config = SimConfig { starting_fuel: 50.0, ..SimConfig::default() };
    let mut engine = Engine::new(graph, config).unwrap();

    assert!(matches!(
        engine.start_mission("X", &[0]),
        Err(SetupError::Graph(GraphError::NegativeEdgeCost { .. }))
    ));
    assert_eq!(engine.executor.state(), ExecutorState::Idle);
    engine.tick(0.1, &WeatherSnapshot::calm(), &mut ()).unwrap();
    assert_eq!(engine.drone.remaining_fuel(), 50.0);
}
