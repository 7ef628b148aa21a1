use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use liftlog_core::api::{EXPORT_PATH, STATS_PATH, WORKOUTS_PATH};
use liftlog_core::*;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "liftlog")]
#[command(about = "Personal workout log with volume and 1RM statistics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every logged workout as JSON
    List,

    /// Log a workout
    Log {
        /// Exercise name (e.g. "Bench Press" or "Running")
        #[arg(long, required_unless_present = "json")]
        exercise: Option<String>,

        /// Workout date as YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Strength set as REPSxWEIGHT or REPS,WEIGHT (repeatable)
        #[arg(long = "set", value_parser = parse_set, allow_hyphen_values = true)]
        sets: Vec<SetDraft>,

        /// Cardio duration in minutes
        #[arg(long, allow_negative_numbers = true)]
        duration: Option<i32>,

        /// Submit a raw JSON workout body instead of the flags above
        #[arg(long, conflicts_with_all = ["exercise", "date", "sets", "duration"])]
        json: Option<String>,
    },

    /// Print rolling volume and best estimated 1RM as JSON
    Stats {
        /// Compute as of this date instead of today (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date_arg)]
        as_of: Option<NaiveDate>,
    },

    /// Export the log as CSV
    Export {
        /// Write to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        liftlog_core::logging::init_with_level("debug");
    } else {
        liftlog_core::logging::init();
    }

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Returns `Ok(false)` when the request was answered with a failure status
fn run(cli: Cli) -> Result<bool> {
    let mut config = Config::load()?;
    if let Some(data_dir) = cli.data_dir {
        config.data.data_dir = data_dir;
    }

    let store = JsonFileStore::open(config.store_path())?;
    let api = Api::new(store).with_export_file_name(config.export.file_name.clone());

    match cli.command {
        Commands::List => cmd_list(&api),
        Commands::Log {
            exercise,
            date,
            sets,
            duration,
            json,
        } => cmd_log(&api, exercise, date, sets, duration, json),
        Commands::Stats { as_of } => cmd_stats(&api, as_of),
        Commands::Export { output } => cmd_export(&api, output),
    }
}

fn cmd_list(api: &Api<JsonFileStore>) -> Result<bool> {
    let response = api.handle(&Request::get(WORKOUTS_PATH));
    emit(&response)
}

fn cmd_log(
    api: &Api<JsonFileStore>,
    exercise: Option<String>,
    date: Option<String>,
    sets: Vec<SetDraft>,
    duration: Option<i32>,
    json: Option<String>,
) -> Result<bool> {
    let body = match json {
        Some(raw) => raw,
        None => {
            let draft = WorkoutDraft {
                date: Some(date.unwrap_or_else(|| Local::now().format("%Y-%m-%d").to_string())),
                exercise,
                sets: (!sets.is_empty()).then_some(sets),
                duration,
            };
            serde_json::to_string(&draft)?
        }
    };

    let response = api.handle(&Request::post(WORKOUTS_PATH, body));
    emit(&response)
}

fn cmd_stats(api: &Api<JsonFileStore>, as_of: Option<NaiveDate>) -> Result<bool> {
    let request = Request::get(STATS_PATH);
    let response = match as_of {
        Some(day) => api.handle_at(&request, day),
        None => api.handle(&request),
    };
    emit(&response)
}

fn cmd_export(api: &Api<JsonFileStore>, output: Option<PathBuf>) -> Result<bool> {
    let response = api.handle(&Request::get(EXPORT_PATH));

    match output {
        Some(path) if response.is_success() => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, &response.body)?;
            println!("✓ Exported to {}", path.display());
            Ok(true)
        }
        _ => emit(&response),
    }
}

/// Print a response body: stdout on success, stderr otherwise
fn emit(response: &Response) -> Result<bool> {
    if response.is_success() {
        let mut stdout = io::stdout().lock();
        stdout.write_all(response.body.as_bytes())?;
        if !response.body.ends_with('\n') {
            stdout.write_all(b"\n")?;
        }
        stdout.flush()?;
        Ok(true)
    } else {
        eprintln!("{}", response.body);
        Ok(false)
    }
}

fn parse_set(s: &str) -> std::result::Result<SetDraft, String> {
    let (reps, weight) = s
        .split_once(|c: char| matches!(c, 'x' | 'X' | ','))
        .ok_or_else(|| format!("expected REPSxWEIGHT, got '{}'", s))?;

    let reps = reps
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("invalid reps '{}': {}", reps.trim(), e))?;
    let weight = weight
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid weight '{}': {}", weight.trim(), e))?;

    Ok(SetDraft { reps, weight })
}

fn parse_date_arg(s: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("invalid date '{}': {}", s, e))
}
