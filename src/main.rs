//! zeusfit - Personal strength training log

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use zeusfit::Database;
use zeusfit::export::{export_csv, group_by_split};
use zeusfit::plan::{DraftWorkout, WorkoutRequest, next_variant, parse_plan_response};
use zeusfit::splits::Split;
use zeusfit::stats::Analytics;
use zeusfit::workout::WorkoutPayload;

#[derive(Parser)]
#[command(name = "zeusfit")]
#[command(author, version, about = "Zeus Fitness - personal strength training log")]
struct Cli {
    /// SQLite database path
    #[arg(long, global = true, env = "ZEUSFIT_DB", default_value = "zeusfit.db")]
    db: String,

    /// User whose history is read and written
    #[arg(long, global = true, env = "ZEUSFIT_USER", default_value = "local")]
    user: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show totals and the current streak
    Stats,

    /// Show personal records
    Records,

    /// Show the best set ever logged for an exercise
    Best {
        /// Exercise name (case-insensitive)
        exercise: String,
    },

    /// Show recent sets and the record for an exercise
    History {
        /// Exercise name (case-insensitive)
        exercise: String,

        /// Number of sets to show
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },

    /// List stored workouts grouped by split
    List {
        /// Number of workouts to show per split
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Export every logged set as CSV
    Export {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Store a completed workout from a JSON file
    Log {
        /// JSON payload with a `workout` or `loggedWorkout` array
        file: PathBuf,
    },

    /// Prepare a generator request, or turn a generator answer into a draft
    Plan {
        /// Split key (e.g., "push", "legs")
        split: String,

        /// Raw generator answer; prints the request body when omitted
        #[arg(short, long)]
        response: Option<PathBuf>,

        #[arg(long, default_value = "Beginner")]
        level: String,

        #[arg(long, default_value = "None")]
        equipment: String,

        /// Session length in minutes
        #[arg(long, default_value = "30")]
        duration: u32,

        /// Store the draft as a completed workout
        #[arg(long)]
        save: bool,
    },

    /// List available splits
    Splits,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let db = Database::open(&cli.db)?;
    let user = cli.user.as_str();

    match cli.command {
        Some(Commands::Stats) | None => {
            let analytics = Analytics::new(db.get_sessions(user)?);
            let stats = analytics.stats();

            println!("Training Statistics");
            println!("{:-<40}", "");
            println!("Workouts:   {}", analytics.sessions().len());
            println!("Exercises:  {}", stats.total_exercises);
            println!("Sets:       {}", stats.total_sets);
            println!("Volume:     {} kg", stats.total_weight);
            println!("Day streak: {}", analytics.streak(Local::now().date_naive()));
        }

        Some(Commands::Records) => {
            let analytics = Analytics::new(db.get_sessions(user)?);
            let records = analytics.personal_records();

            if records.is_empty() {
                println!("No personal records yet.");
            }
            for pr in records.iter() {
                println!("{:30} {} kg × {} reps", pr.exercise, pr.weight, pr.reps);
            }
        }

        Some(Commands::Best { exercise }) => {
            let analytics = Analytics::new(db.get_sessions(user)?);
            match analytics.best_effort(&exercise) {
                Some(best) => println!("{}: {}", exercise, best.format_hint()),
                None => println!("{}: no history yet", exercise),
            }
        }

        Some(Commands::History { exercise, limit }) => {
            let analytics = Analytics::new(db.get_sessions(user)?);
            let history = analytics.history(&exercise);

            if history.is_empty() {
                println!("No history yet.");
                return Ok(());
            }

            println!("{} - last {} sets", exercise, limit);
            for entry in history.recent(limit) {
                println!("{} - {} kg × {} reps", entry.date.format("%-d/%-m/%Y"), entry.weight, entry.reps);
            }
            if let Some(pr) = history.record() {
                println!("PR: {} kg × {} reps", pr.weight, pr.reps);
            }
        }

        Some(Commands::List { limit }) => {
            let sessions = db.get_sessions(user)?;
            if sessions.is_empty() {
                println!("No workouts recorded yet.");
            }

            for (split, workouts) in group_by_split(&sessions) {
                println!("{} ({})", split, workouts.len());
                for w in workouts.iter().take(limit) {
                    println!(
                        "  {} | {} | {} exercises",
                        w.created_at.with_timezone(&Local).format("%a %d %b %Y"),
                        w.workout.variant().map(|v| v.as_str()).unwrap_or("-"),
                        w.workout.exercises().len()
                    );
                }
            }
        }

        Some(Commands::Export { out }) => {
            let sessions = db.get_sessions(user)?;
            let Some(csv) = export_csv(&sessions, &Local) else {
                println!("No workout history to export");
                return Ok(());
            };

            match out {
                Some(path) => {
                    fs::write(&path, csv)
                        .with_context(|| format!("writing {}", path.display()))?;
                    info!("Exported {} workouts to {}", sessions.len(), path.display());
                }
                None => println!("{}", csv),
            }
        }

        Some(Commands::Log { file }) => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let value: serde_json::Value = serde_json::from_str(&text)
                .with_context(|| format!("parsing {}", file.display()))?;
            let payload = WorkoutPayload::from(value);

            if payload.is_empty() {
                bail!("{} has no `workout` or `loggedWorkout` array", file.display());
            }

            let id = db.add_session(user, &payload, Utc::now())?;
            println!("Logged: {} exercises (id: {})", payload.exercises().len(), id);
        }

        Some(Commands::Plan { split, response, level, equipment, duration, save }) => {
            let Some(split) = Split::from_key(&split) else {
                bail!("unknown split {:?}, see `zeusfit splits`", split);
            };

            let last = db.last_session(user)?;
            let variant = next_variant(last.as_ref(), split.key());
            let request = WorkoutRequest::new(user, split.key(), variant)
                .with_level(level)
                .with_equipment(equipment)
                .with_duration(duration);
            request.validate()?;

            let Some(response) = response else {
                println!("{}", serde_json::to_string_pretty(&request)?);
                return Ok(());
            };

            let raw = fs::read_to_string(&response)
                .with_context(|| format!("reading {}", response.display()))?;
            let plan = parse_plan_response(&raw)?;
            let draft = DraftWorkout::from_plan(split.key(), variant, &plan);

            let analytics = Analytics::new(db.get_sessions(user)?);
            println!("{} - variant {}", split.label(), variant.as_str());
            println!("{:-<40}", "");
            for ex in &draft.exercises {
                println!("{} ({} sets × {} reps)", ex.exercise, ex.sets.len(), ex.sets.first().map(|s| s.reps).unwrap_or_default());
                if let Some(best) = analytics.best_effort(&ex.exercise) {
                    println!("  {}", best.format_hint());
                }
            }

            if save {
                let id = db.add_session(user, &draft.into_payload(), Utc::now())?;
                println!("Workout saved (id: {})", id);
            }
        }

        Some(Commands::Splits) => {
            for split in Split::all() {
                let muscles: Vec<_> = split.muscles().iter().map(|m| m.name()).collect();
                println!("{:10} {:12} {}", split.key(), split.label(), muscles.join(", "));
            }
        }
    }

    Ok(())
}
