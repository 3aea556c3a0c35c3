//! Full-session scenarios: scripted input from the first click to the
//! end screen, across all three death branches.

use glam::Vec2;
use starforge_core::{DeathBranch, InputEvent, ScenePhase, SimConfig};
use starforge_physics::color::star_color;
use starforge_sim::simulation::Simulation;

const TICK_CAP: u32 = 20_000;

/// Drive the scripted flow up to the parameter confirmation, then keep
/// ticking until `stop` says we are done. Returns the phase sequence.
fn run_session(
    sim: &mut Simulation,
    pos: Vec2,
    mass: f32,
    instability: f32,
    stop: impl Fn(&Simulation) -> bool,
) -> Vec<ScenePhase> {
    let mut phases = vec![sim.scene.phase];
    let mut record = |sim: &Simulation, phases: &mut Vec<ScenePhase>| {
        if phases.last() != Some(&sim.scene.phase) {
            phases.push(sim.scene.phase);
        }
    };

    sim.tick(&[InputEvent::Confirm]);
    record(sim, &mut phases);
    sim.tick(&[InputEvent::PointerClick(pos)]);
    record(sim, &mut phases);

    let mut guard = 0;
    while sim.scene.phase == ScenePhase::SelectPosition {
        sim.tick(&[]);
        record(sim, &mut phases);
        guard += 1;
        assert!(guard < TICK_CAP, "stuck in SelectPosition");
    }
    assert_eq!(sim.scene.phase, ScenePhase::SetParameters);

    sim.tick(&[InputEvent::SetParameters { mass, instability }]);
    sim.tick(&[InputEvent::Confirm]);
    record(sim, &mut phases);

    let mut guard = 0;
    while !stop(sim) {
        sim.tick(&[]);
        record(sim, &mut phases);
        guard += 1;
        assert!(guard < TICK_CAP, "session never reached the stop condition");
    }
    phases
}

fn resolved(sim: &Simulation) -> bool {
    sim.scene.phase == ScenePhase::End
        && sim
            .universe
            .star
            .as_ref()
            .is_some_and(|s| s.death_resolved)
}

#[test]
fn test_black_hole_session_end_to_end() {
    let mut sim = Simulation::new(SimConfig::default());
    let phases = run_session(&mut sim, Vec2::new(100.0, 100.0), 95.0, 80.0, resolved);

    let expected = [
        ScenePhase::Init,
        ScenePhase::SelectPosition,
        ScenePhase::SetParameters,
        ScenePhase::BigBang,
        ScenePhase::StarFormation,
        ScenePhase::Observation,
        ScenePhase::BlackHoleSink,
        ScenePhase::End,
    ];
    assert_eq!(phases, expected, "phase sequence mismatch: {phases:?}");

    let star = sim.universe.star.as_ref().unwrap();
    assert_eq!(star.branch, Some(DeathBranch::BlackHole));
    assert_eq!(star.pos, Vec2::new(100.0, 100.0));
    assert_eq!(sim.scene.end_message, Some(DeathBranch::BlackHole.message()));

    // Exactly one legacy update: the record holds the dead star's color
    // and further ticks never touch it.
    let legacy = sim.universe.legacy_color;
    assert_eq!(legacy, Some(star.color));
    for _ in 0..200 {
        sim.tick(&[]);
    }
    assert_eq!(sim.universe.legacy_color, legacy);
}

#[test]
fn test_supernova_session_skips_sink() {
    let mut sim = Simulation::new(SimConfig::default());
    let phases = run_session(&mut sim, Vec2::new(400.0, 300.0), 70.0, 30.0, resolved);

    assert!(!phases.contains(&ScenePhase::BlackHoleSink));
    assert_eq!(*phases.last().unwrap(), ScenePhase::End);

    let star = sim.universe.star.as_ref().unwrap();
    assert_eq!(star.branch, Some(DeathBranch::Supernova));
    assert!(sim.universe.supernova_flash > 0, "flash should be running");
    assert!(!sim.universe.remnants.is_empty());
    assert!(!sim.universe.effects.is_empty(), "burst particles spawned");
    assert!(sim.universe.ambient_brightness > 0.0);
}

#[test]
fn test_nebula_session_leaves_white_dwarf() {
    let mut sim = Simulation::new(SimConfig::default());
    run_session(&mut sim, Vec2::new(640.0, 360.0), 20.0, 10.0, resolved);

    let star = sim.universe.star.as_ref().unwrap();
    assert_eq!(star.branch, Some(DeathBranch::Nebula));
    assert!(sim.universe.white_dwarf.is_some());
    assert_eq!(sim.universe.ambient_brightness, 0.0, "quiet death, no ratchet");
    assert_eq!(sim.scene.end_message, Some(DeathBranch::Nebula.message()));

    // The dying star keeps shrinking and shedding on the end screen.
    let size_at_end = star.size;
    for _ in 0..120 {
        sim.tick(&[]);
    }
    let star = sim.universe.star.as_ref().unwrap();
    assert!(star.size < size_at_end);
}

#[test]
fn test_same_seed_same_frames() {
    let script = |sim: &mut Simulation| {
        run_session(sim, Vec2::new(200.0, 200.0), 40.0, 60.0, |s| {
            s.scene.phase == ScenePhase::Observation && s.frame > 500
        });
    };
    let mut a = Simulation::new(SimConfig::default());
    let mut b = Simulation::new(SimConfig::default());
    script(&mut a);
    script(&mut b);

    assert_eq!(a.frame, b.frame);
    assert_eq!(
        a.universe.star.as_ref().unwrap().color,
        b.universe.star.as_ref().unwrap().color
    );
    let fa = a.compose_frame();
    let fb = b.compose_frame();
    assert_eq!(fa.cmds, fb.cmds, "identical seeds must render identical frames");
}

#[test]
fn test_legacy_biases_next_generation() {
    let mut sim = Simulation::new(SimConfig::default());
    run_session(&mut sim, Vec2::new(300.0, 300.0), 70.0, 20.0, resolved);
    let legacy = sim.universe.legacy_color.expect("legacy set by death");

    sim.tick(&[InputEvent::Restart]);
    assert_eq!(sim.scene.phase, ScenePhase::Init);

    run_session(&mut sim, Vec2::new(500.0, 300.0), 30.0, 20.0, |s| {
        s.scene.phase == ScenePhase::Observation
    });
    let second = sim.universe.star.as_ref().unwrap();
    assert_eq!(second.color, star_color(30.0, Some(legacy)));
    assert_ne!(second.color, star_color(30.0, None), "legacy must bias color");
}
