//! Monte Carlo census of stellar fates.
//! Runs scripted headless sessions across a mass sweep and catalogues
//! which death branch each star meets.

use glam::Vec2;
use starforge_core::{DeathBranch, InputEvent, ScenePhase, SimConfig};
use starforge_sim::simulation::Simulation;

/// One completed session worth remembering
struct Fate {
    seed: u64,
    mass: f32,
    instability: f32,
    branch: DeathBranch,
    lifetime_frames: u64,
    remnant_count: usize,
}

/// Drive a full session from the start screen to a resolved death.
/// Returns None only if the session never terminates within the cap.
fn run_session(seed: u64, mass: f32, instability: f32) -> Option<Fate> {
    let config = SimConfig { seed, ..SimConfig::default() };
    let mut sim = Simulation::new(config);

    sim.tick(&[InputEvent::Confirm]);
    sim.tick(&[InputEvent::PointerClick(Vec2::new(640.0, 360.0))]);
    while sim.scene.phase == ScenePhase::SelectPosition {
        sim.tick(&[]);
    }
    sim.tick(&[InputEvent::SetParameters { mass, instability }]);
    sim.tick(&[InputEvent::Confirm]);

    let birth_frame = sim.frame;
    let cap = 30_000;
    for _ in 0..cap {
        sim.tick(&[]);
        let done = sim.scene.phase == ScenePhase::End
            && sim
                .universe
                .star
                .as_ref()
                .is_some_and(|s| s.death_resolved);
        if done {
            let star = sim.universe.star.as_ref()?;
            return Some(Fate {
                seed,
                mass,
                instability,
                branch: star.branch?,
                lifetime_frames: sim.frame - birth_frame,
                remnant_count: sim.universe.remnants.len(),
            });
        }
    }
    None
}

fn main() {
    let runs_per_mass = 4;
    let masses: Vec<f32> = (0..=20).map(|i| i as f32 * 5.0).collect();

    eprintln!(
        "Simulating {} sessions across {} mass levels...",
        runs_per_mass * masses.len(),
        masses.len()
    );

    let mut fates: Vec<Fate> = Vec::new();
    for (i, &mass) in masses.iter().enumerate() {
        for r in 0..runs_per_mass {
            let seed = 1000 + (i * runs_per_mass + r) as u64 * 7919;
            let instability = (r as f32 + 1.0) * 20.0;
            if let Some(fate) = run_session(seed, mass, instability) {
                fates.push(fate);
            } else {
                eprintln!("  session (mass {mass}, seed {seed}) never resolved");
            }
        }
        eprint!("  {}/{} mass levels...\r", i + 1, masses.len());
    }
    eprintln!("Done. {} sessions resolved.", fates.len());

    let total = fates.len().max(1);
    let census = [
        DeathBranch::Nebula,
        DeathBranch::Supernova,
        DeathBranch::BlackHole,
    ];

    println!();
    println!("==================================================");
    println!("  STELLAR FATE CENSUS — {} sessions", fates.len());
    println!("==================================================");
    println!();
    for branch in census {
        let count = fates.iter().filter(|f| f.branch == branch).count();
        let pct = count as f64 / total as f64 * 100.0;
        let bar = "#".repeat((pct * 0.4) as usize);
        println!("  {:<11} {:>5.1}%  {}", branch.name(), pct, bar);
    }

    println!();
    println!("--------------------------------------------------");
    println!("  EXEMPLARS");
    println!("--------------------------------------------------");
    for branch in census {
        let Some(fate) = fates
            .iter()
            .filter(|f| f.branch == branch)
            .max_by(|a, b| a.mass.partial_cmp(&b.mass).unwrap())
        else {
            continue;
        };
        println!();
        println!("  {} (seed {})", fate.branch.name().to_uppercase(), fate.seed);
        println!(
            "    mass {:.0}, instability {:.0} | lived {} frames | {} remnant motes",
            fate.mass, fate.instability, fate.lifetime_frames, fate.remnant_count
        );
        println!("    \"{}\"", fate.branch.message());
    }

    // Sanity line: branch boundaries as configured.
    let config = SimConfig::default();
    println!();
    println!(
        "  Thresholds: nebula <= {:.0} < supernova <= {:.0} < black hole",
        config.supernova_mass, config.black_hole_mass
    );
}
