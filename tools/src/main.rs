//! triage-runner: headless runner for the triage round engine.
//!
//! Usage:
//!   triage-runner --seed 12345 --difficulty stochastic --policy severity-first
//!   triage-runner --config data/triage_config.json --db run.db
//!   triage-runner --ipc-mode

use anyhow::Result;
use std::env;
use std::io::{self, BufRead, Write};
use triage_core::{
    engine::SimEngine,
    hospital::HospitalState,
    rng::SimRng,
    store::SimStore,
    types::{PatientId, Round},
    Decision, Decisions, Difficulty, GameState, Patient, RoundSummary, Severity, TriageConfig,
};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    BeginRound,
    ResolveRound { decisions: Decisions },
    Quit,
}

/// What the decision-maker is allowed to see: never the true severity.
#[derive(serde::Serialize)]
struct VisiblePatient {
    id:               PatientId,
    label:            String,
    visible_severity: Severity,
}

#[derive(serde::Serialize)]
struct UiState<'a> {
    run_id:       &'a str,
    round:        Round,
    total_rounds: u32,
    difficulty:   Difficulty,
    hospital:     &'a HospitalState,
    round_open:   bool,
    arrivals:     Vec<VisiblePatient>,
    last_summary: Option<&'a RoundSummary>,
    game_over:    bool,
    won:          Option<bool>,
}

#[derive(Clone, Copy, Debug)]
enum Policy {
    SeverityFirst,
    TreatAll,
    MonitorAll,
    TransferAll,
}

impl Policy {
    fn parse(s: &str) -> Result<Self> {
        match s {
            "severity-first" => Ok(Self::SeverityFirst),
            "treat-all"      => Ok(Self::TreatAll),
            "monitor-all"    => Ok(Self::MonitorAll),
            "transfer-all"   => Ok(Self::TransferAll),
            other => anyhow::bail!("unknown policy '{other}'"),
        }
    }

    fn decide(&self, state: &GameState, arrivals: &[Patient]) -> Decisions {
        match self {
            Self::TreatAll    => uniform(arrivals, Decision::TreatNow),
            Self::MonitorAll  => uniform(arrivals, Decision::Monitor),
            Self::TransferAll => uniform(arrivals, Decision::Transfer),
            Self::SeverityFirst => {
                // Most severe-looking first; treat while capacity lasts,
                // send the high-risk overflow elsewhere.
                let mut ranked: Vec<&Patient> = arrivals.iter().collect();
                ranked.sort_by(|a, b| b.visible_severity.cmp(&a.visible_severity));
                let mut capacity = state
                    .hospital
                    .available_beds
                    .min(state.hospital.staff_capacity_this_round);
                ranked
                    .into_iter()
                    .map(|p| {
                        let decision = if capacity > 0 && p.visible_severity >= Severity::Moderate {
                            capacity -= 1;
                            Decision::TreatNow
                        } else if p.visible_severity.is_high_risk() {
                            Decision::Transfer
                        } else {
                            Decision::Monitor
                        };
                        (p.id, decision)
                    })
                    .collect()
            }
        }
    }
}

fn uniform(arrivals: &[Patient], decision: Decision) -> Decisions {
    arrivals.iter().map(|p| (p.id, decision)).collect()
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let seed = parse_seed(find_arg(&args, "--seed"))?;
    let difficulty: Difficulty = find_arg(&args, "--difficulty")
        .unwrap_or("basic")
        .parse()?;
    let policy = Policy::parse(find_arg(&args, "--policy").unwrap_or("severity-first"))?;
    let db = find_arg(&args, "--db").unwrap_or(":memory:");
    let config = match find_arg(&args, "--config") {
        Some(path) => TriageConfig::load(path)?,
        None => TriageConfig::default(),
    };

    let rng = match seed {
        Some(s) => SimRng::new(s),
        None => SimRng::from_entropy(),
    };

    if !ipc_mode {
        println!("Triage — round runner");
        println!("  seed:       {}", rng.seed());
        println!("  difficulty: {difficulty}");
        println!("  policy:     {policy:?}");
        println!("  db:         {db}");
        println!();
    }

    let store = if db == ":memory:" {
        SimStore::in_memory()?
    } else {
        SimStore::open(db)?
    };
    store.migrate()?;

    let run_id = format!("run-{}", uuid::Uuid::new_v4());
    let state = GameState::new(difficulty, config)?;
    let mut engine = SimEngine::start(run_id, rng, state, store)?;

    if ipc_mode {
        run_ipc_loop(&mut engine)?;
    } else {
        let won = engine.run_to_completion(|state, arrivals| policy.decide(state, arrivals))?;
        print_summary(&engine, won)?;
    }

    Ok(())
}

fn run_ipc_loop(engine: &mut SimEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        let outcome = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => Ok(()),
            IpcCommand::BeginRound => engine.begin_round().map(|_| ()),
            IpcCommand::ResolveRound { decisions } => engine.resolve_round(&decisions).map(|_| ()),
        };

        match outcome {
            Ok(()) => {
                let state = build_ui_state(engine);
                writeln!(stdout, "{}", serde_json::to_string(&state)?)?;
                stdout.flush()?;
            }
            // Rule violations go back to the client; the session stays alive.
            Err(e) => {
                log::warn!("ipc command rejected: {e}");
                write_error(&mut stdout, &e.to_string())?;
            }
        }
    }
    Ok(())
}

fn write_error(stdout: &mut io::Stdout, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(stdout, "{}", err_json)?;
    stdout.flush()?;
    Ok(())
}

fn build_ui_state(engine: &SimEngine) -> UiState<'_> {
    let state = &engine.state;
    let round_open = engine.round_open();
    let arrivals = if round_open {
        state
            .arrivals_for_round(state.current_round)
            .map(|p| VisiblePatient {
                id:               p.id,
                label:            p.display_label(),
                visible_severity: p.visible_severity,
            })
            .collect()
    } else {
        Vec::new()
    };

    UiState {
        run_id:       &engine.run_id,
        round:        state.current_round,
        total_rounds: state.config().total_rounds,
        difficulty:   state.difficulty,
        hospital:     &state.hospital,
        round_open,
        arrivals,
        last_summary: state.history.last(),
        game_over:    state.is_game_over(),
        won:          state.has_player_won(),
    }
}

fn print_summary(engine: &SimEngine, won: bool) -> Result<()> {
    for summary in &engine.state.history {
        println!("=== ROUND {} ===", summary.round_number());
        if summary.is_quiet() {
            println!("  No significant events.");
        }
        if !summary.patients_treated().is_empty() {
            println!("  treated:      {:?}", summary.patients_treated());
        }
        if !summary.patients_died().is_empty() {
            println!("  died:         {:?}", summary.patients_died());
        }
        if !summary.patients_deteriorated().is_empty() {
            println!("  deteriorated: {:?}", summary.patients_deteriorated());
        }
        for note in summary.notes() {
            println!("  - {note}");
        }
        println!();
    }

    println!("=== METRICS BY ROUND ===");
    for row in engine.store_round_metrics()? {
        println!(
            "  round {} | beds {} | survival {:.1} | stress {:.1} | reputation {:.1}",
            row.round, row.available_beds, row.survival_score, row.staff_stress, row.reputation
        );
    }

    let h = &engine.state.hospital;
    let total_rounds = engine.state.config().total_rounds;
    println!();
    println!("=== RUN SUMMARY ===");
    println!("  run_id:      {}", engine.run_id);
    println!("  rounds:      {} / {total_rounds}", engine.state.history.len());
    println!("  patients:    {}", engine.state.patients.len());
    println!("  survival:    {:.1}", h.survival_score);
    println!("  stress:      {:.1}", h.staff_stress);
    println!("  reputation:  {:.1}", h.reputation);
    println!("  outcome:     {}", if won { "won" } else { "lost" });
    Ok(())
}

/// `None` means draw a seed from entropy.
fn parse_seed(raw: Option<&str>) -> Result<Option<u64>> {
    match raw {
        Some(s) => match s.parse() {
            Ok(seed) => Ok(Some(seed)),
            Err(_) => anyhow::bail!("invalid --seed '{s}': expected an unsigned integer"),
        },
        None => Ok(None),
    }
}

fn find_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
