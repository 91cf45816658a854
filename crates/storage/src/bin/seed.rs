use std::fmt;

use storage::Storage;
use storage::fallback::fallback_records;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    inactive: Vec<i64>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidQuestionId { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidQuestionId { raw } => {
                write!(f, "invalid --deactivate value: {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("TRIVIA_DB_URL").unwrap_or_else(|_| "sqlite:dev.sqlite3".into());
        let mut inactive = Vec::new();

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--deactivate" => {
                    let value = require_value(&mut args, "--deactivate")?;
                    let id = value
                        .parse::<i64>()
                        .map_err(|_| ArgsError::InvalidQuestionId { raw: value.clone() })?;
                    inactive.push(id);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { db_url, inactive })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite:dev.sqlite3)");
    eprintln!("  --deactivate <id>         Store question <id> as inactive (repeatable)");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  TRIVIA_DB_URL             Same as --db");
    eprintln!("  RUST_LOG                  Log filter (default: info)");
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = Storage::sqlite(&args.db_url).await?;

    let mut seeded = 0_usize;
    for mut record in fallback_records() {
        record.is_active = !args.inactive.contains(&record.id);
        storage.question_store.upsert_question(&record).await?;
        seeded += 1;
    }

    let active = storage.questions.fetch_active_questions(u32::MAX).await?;
    tracing::info!(seeded, active = active.len(), "seeded question bank");
    println!(
        "Seeded {seeded} questions ({} active) into {}",
        active.len(),
        args.db_url
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
