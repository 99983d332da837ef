use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use exam_core::model::{CategoryId, Exam, ExamId, OptionLabel, Question, UserId};
use services::{AppServices, Clock, ExamCatalog, SessionService, StaticIdentity};
use storage::repository::{ExamRepository, Storage};
use tracing_subscriber::{EnvFilter, fmt as tracing_fmt, layer::SubscriberExt, util::SubscriberInitExt};
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidUserId { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidUserId { raw } => write!(f, "invalid --user-id value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
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

struct DesktopApp {
    session_service: Arc<SessionService>,
    catalog: Arc<ExamCatalog>,
}

impl UiApp for DesktopApp {
    fn session_service(&self) -> Arc<SessionService> {
        Arc::clone(&self.session_service)
    }

    fn catalog(&self) -> Arc<ExamCatalog> {
        Arc::clone(&self.catalog)
    }
}

struct Args {
    db_url: String,
    data_dir: String,
    user_id: UserId,
    email: String,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  cargo run -p app -- ui   [--db <sqlite_url>] [--data-dir <dir>] [--user-id <id>] [--email <addr>]"
    );
    eprintln!("  cargo run -p app -- seed [--db <sqlite_url>]  # load sample tests");
    eprintln!();
    eprintln!("Defaults for ui:");
    eprintln!("  --db sqlite:dev.sqlite3");
    eprintln!("  --data-dir ./data");
    eprintln!("  --user-id 1");
    eprintln!("  --email taker@example.com");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  EXAM_DB_URL, EXAM_DATA_DIR, EXAM_USER_ID, EXAM_USER_EMAIL");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Seed,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "seed" => Some(Self::Seed),
            _ => None,
        }
    }
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("EXAM_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://dev.sqlite3".into(), normalize_sqlite_url);
        let mut data_dir = std::env::var("EXAM_DATA_DIR").unwrap_or_else(|_| "./data".into());
        let mut user_id = std::env::var("EXAM_USER_ID")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .map_or_else(|| UserId::new(1), UserId::new);
        let mut email =
            std::env::var("EXAM_USER_EMAIL").unwrap_or_else(|_| "taker@example.com".into());

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--data-dir" => {
                    data_dir = require_value(args, "--data-dir")?;
                }
                "--user-id" => {
                    let value = require_value(args, "--user-id")?;
                    let parsed: u64 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidUserId { raw: value.clone() })?;
                    user_id = UserId::new(parsed);
                }
                "--email" => {
                    email = require_value(args, "--email")?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            data_dir,
            user_id,
            email,
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: launching UI when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;

    match cmd {
        Command::Ui => {
            let identity = Arc::new(StaticIdentity::signed_in(parsed.user_id, parsed.email));
            let services = AppServices::new_sqlite(
                &parsed.db_url,
                parsed.data_dir.clone(),
                Clock::default_clock(),
                identity,
            )
            .await?;

            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                session_service: services.session_service(),
                catalog: services.catalog(),
            });
            let context = build_app_context(&app);

            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Exam Prep")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Seed => {
            let storage = Storage::sqlite(&parsed.db_url).await?;
            let count = seed_sample_exams(storage.exams.as_ref()).await?;
            eprintln!("seeded {count} sample tests into {}", parsed.db_url);
            Ok(())
        }
    }
}

/// A couple of small tests so a fresh database has something to open.
async fn seed_sample_exams(
    exams: &dyn ExamRepository,
) -> Result<usize, Box<dyn std::error::Error>> {
    let samples = vec![
        Exam::new(
            ExamId::new(1),
            "General Knowledge Warm-up",
            CategoryId::new(1),
            "General",
            vec![
                Question::new(
                    "Which planet is known as the Red Planet?",
                    vec![
                        "Venus".into(),
                        "Mars".into(),
                        "Jupiter".into(),
                        "Mercury".into(),
                    ],
                    OptionLabel::B,
                    Some("Iron oxide dust gives Mars its reddish color.".into()),
                )?,
                Question::new(
                    "How many continents are there?",
                    vec!["five".into(), "six".into(), "seven".into(), "eight".into()],
                    OptionLabel::C,
                    None,
                )?,
                Question::new(
                    "Which gas do plants absorb from the atmosphere?",
                    vec![
                        "Oxygen".into(),
                        "Nitrogen".into(),
                        "Carbon dioxide".into(),
                        "Hydrogen".into(),
                    ],
                    OptionLabel::C,
                    Some("Photosynthesis fixes carbon from CO2.".into()),
                )?,
            ],
            10,
            2.0,
            0.5,
        )?,
        Exam::new(
            ExamId::new(2),
            "Basic Arithmetic",
            CategoryId::new(2),
            "Math",
            vec![
                Question::new(
                    "What is 12 x 12?",
                    vec!["124".into(), "144".into(), "154".into(), "164".into()],
                    OptionLabel::B,
                    None,
                )?,
                Question::new(
                    "What is 7 + 8 x 2?",
                    vec!["30".into(), "22".into(), "23".into(), "15".into()],
                    OptionLabel::C,
                    Some("Multiplication binds tighter than addition.".into()),
                )?,
            ],
            5,
            1.0,
            0.0,
        )?,
    ];

    for exam in &samples {
        exams.upsert_exam(exam).await?;
    }
    Ok(samples.len())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_fmt::layer().with_target(false))
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
