//! Skirmish Headless Simulation Harness
//!
//! Validates the battle simulation without any rendering: terrain
//! determinism, pathfinding on synthetic grids, composition validation,
//! and a sweep of battle scenarios loaded from the JSON manifest.
//!
//! Usage:
//!   cargo run -p skirmish-simtest
//!   cargo run -p skirmish-simtest -- --verbose

use serde::Deserialize;

use skirmish_core::config::{
    parse_unit_count, BattleComposition, SimConfig, TeamComposition, TerrainConfig,
};
use skirmish_core::engine::{BattleEngine, BattlePhase};
use skirmish_core::nav::{find_path, NavGrid};

// ── Scenario manifest ───────────────────────────────────────────────────
const SCENARIOS_JSON: &str = include_str!("../../../data/scenarios.json");

const FRAME: f32 = 1.0 / 60.0;

#[derive(Debug, Deserialize)]
struct Scenario {
    name: String,
    seed: u64,
    team_a: TeamComposition,
    team_b: TeamComposition,
    flat: bool,
    /// Whether the battle must reach Ended within the time budget
    require_finish: bool,
    max_seconds: f32,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn new(name: impl Into<String>, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed,
            detail: detail.into(),
        }
    }
}

fn main() {
    env_logger::init();
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Skirmish Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Generation determinism
    results.extend(validate_generation_determinism(verbose));

    // 2. Pathfinding on synthetic grids
    results.extend(validate_pathfinding(verbose));

    // 3. Composition validation and input coercion
    results.extend(validate_compositions(verbose));

    // 4. Scenario sweep from the manifest
    results.extend(run_scenarios(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    for result in results.iter().filter(|r| !r.passed) {
        println!("FAIL {} - {}", result.name, result.detail);
    }
    println!("\n{passed} passed, {failed} failed, {} total", results.len());
    if failed > 0 {
        std::process::exit(1);
    }
}

fn report(results: &mut Vec<TestResult>, verbose: bool, result: TestResult) {
    if verbose {
        let mark = if result.passed { "ok  " } else { "FAIL" };
        println!("{mark} {} - {}", result.name, result.detail);
    }
    results.push(result);
}

// ── Validations ─────────────────────────────────────────────────────────

fn validate_generation_determinism(verbose: bool) -> Vec<TestResult> {
    let mut results = Vec::new();

    let comp = BattleComposition::quick_skirmish();
    let mut first = BattleEngine::new();
    let mut second = BattleEngine::new();
    for engine in [&mut first, &mut second] {
        engine.set_seed(1234);
        engine
            .start_battle(&comp)
            .expect("quick skirmish is a valid composition");
    }

    let spawns_match = first
        .units()
        .iter()
        .zip(second.units().iter())
        .all(|(a, b)| a.position == b.position && a.team == b.team && a.class == b.class);
    report(
        &mut results,
        verbose,
        TestResult::new(
            "generation/unit-spawns",
            spawns_match,
            "same seed places every unit identically",
        ),
    );

    let obstacles_match = first.obstacles().len() == second.obstacles().len()
        && first
            .obstacles()
            .iter()
            .zip(second.obstacles())
            .all(|(a, b)| a.position == b.position && a.kind == b.kind);
    report(
        &mut results,
        verbose,
        TestResult::new(
            "generation/obstacles",
            obstacles_match,
            "same seed places every obstacle identically",
        ),
    );

    let heights_match = (0..200).all(|i| {
        let x = -48.0 + (i % 20) as f32 * 5.0;
        let z = -48.0 + (i / 20) as f32 * 9.7;
        first.terrain_height(x, z) == second.terrain_height(x, z)
    });
    report(
        &mut results,
        verbose,
        TestResult::new(
            "generation/heights",
            heights_match,
            "same seed produces an identical height field",
        ),
    );

    results
}

fn validate_pathfinding(verbose: bool) -> Vec<TestResult> {
    let mut results = Vec::new();

    let mut grid = NavGrid::new(40.0, 2.0);
    // Wall across the middle with a single gap
    for gx in 0..grid.width() {
        if gx != 15 {
            grid.set_walkable(gx, 10, false);
        }
    }

    let start = grid.grid_to_world(2, 2);
    let goal = grid.grid_to_world(2, 18);
    let path = find_path(&grid, start, goal);
    let routed = path
        .as_ref()
        .map(|p| {
            p.iter().all(|wp| {
                let g = grid.world_to_grid(wp.x, wp.z);
                grid.is_walkable(g.x, g.z)
            })
        })
        .unwrap_or(false);
    report(
        &mut results,
        verbose,
        TestResult::new(
            "pathfinding/gap-in-wall",
            routed,
            "path threads the gap over walkable cells only",
        ),
    );

    grid.set_walkable(15, 10, false); // close the gap
    let no_path = find_path(&grid, start, goal).is_none();
    report(
        &mut results,
        verbose,
        TestResult::new(
            "pathfinding/sealed-wall",
            no_path,
            "unreachable goal yields no path",
        ),
    );

    let blocked_goal = find_path(&grid, start, grid.grid_to_world(30, 10)).is_none();
    report(
        &mut results,
        verbose,
        TestResult::new(
            "pathfinding/unwalkable-goal",
            blocked_goal,
            "unwalkable destination fails fast",
        ),
    );

    results
}

fn validate_compositions(verbose: bool) -> Vec<TestResult> {
    let mut results = Vec::new();

    let rejected = BattleComposition::new(TeamComposition::default(), TeamComposition::new(1, 0, 0))
        .validate()
        .is_err();
    report(
        &mut results,
        verbose,
        TestResult::new(
            "composition/empty-team",
            rejected,
            "an empty team is rejected with a reason",
        ),
    );

    let coerced = parse_unit_count("not-a-number") == 0 && parse_unit_count("8") == 8;
    report(
        &mut results,
        verbose,
        TestResult::new(
            "composition/input-coercion",
            coerced,
            "malformed counts coerce to zero",
        ),
    );

    results
}

fn run_scenarios(verbose: bool) -> Vec<TestResult> {
    let mut results = Vec::new();
    let scenarios: Vec<Scenario> =
        serde_json::from_str(SCENARIOS_JSON).expect("scenario manifest parses");

    for scenario in &scenarios {
        let (passed, detail) = run_scenario(scenario);
        report(
            &mut results,
            verbose,
            TestResult::new(format!("scenario/{}", scenario.name), passed, detail),
        );
    }

    results
}

fn run_scenario(scenario: &Scenario) -> (bool, String) {
    let outcome = play(scenario);
    let replay = play(scenario);

    // Determinism: the replay must match exactly
    if outcome != replay {
        return (false, format!("replay diverged: {outcome:?} vs {replay:?}"));
    }

    match outcome {
        PlayResult::Finished { winner, duration } => (
            true,
            format!("team {winner} wins after {duration:.2}s simulated"),
        ),
        PlayResult::TimedOut { a_alive, b_alive } => {
            if scenario.require_finish {
                (
                    false,
                    format!("did not finish within {}s ({a_alive} vs {b_alive} alive)", scenario.max_seconds),
                )
            } else {
                (
                    true,
                    format!("ran {}s deterministically ({a_alive} vs {b_alive} alive)", scenario.max_seconds),
                )
            }
        }
    }
}

#[derive(Debug, PartialEq)]
enum PlayResult {
    Finished { winner: char, duration: f32 },
    TimedOut { a_alive: usize, b_alive: usize },
}

fn play(scenario: &Scenario) -> PlayResult {
    let terrain = if scenario.flat {
        TerrainConfig::flat()
    } else {
        TerrainConfig::default()
    };
    let mut engine = BattleEngine::with_config(SimConfig {
        terrain,
        ..SimConfig::default()
    });
    engine.set_seed(scenario.seed);
    engine
        .start_battle(&BattleComposition::new(scenario.team_a, scenario.team_b))
        .expect("scenario composition is valid");

    let max_steps = (scenario.max_seconds / FRAME) as usize;
    for _ in 0..max_steps {
        if engine.phase() != BattlePhase::Running {
            break;
        }
        engine.step(FRAME);
    }

    match engine.outcome() {
        Some(outcome) => PlayResult::Finished {
            winner: match outcome.winning_team {
                skirmish_core::components::Team::A => 'A',
                skirmish_core::components::Team::B => 'B',
            },
            duration: outcome.duration_seconds,
        },
        None => PlayResult::TimedOut {
            a_alive: engine.living_count(skirmish_core::components::Team::A),
            b_alive: engine.living_count(skirmish_core::components::Team::B),
        },
    }
}
