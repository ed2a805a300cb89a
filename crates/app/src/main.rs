use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{
    AppServices, AttendanceService, AuthService, Clock, CourseStore, FeedbackService,
    GoalService, PreferencesService, StatsService, StreakService,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use ui::{App, UiApp, build_app_context};

const DEFAULT_DB_URL: &str = "sqlite://attendance.sqlite3";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidEmail { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidEmail { raw } => write!(f, "invalid --email value: {raw}"),
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
    services: AppServices,
    login_email: Option<String>,
}

impl UiApp for DesktopApp {
    fn auth(&self) -> AuthService {
        self.services.auth()
    }

    fn course_store(&self) -> CourseStore {
        self.services.course_store()
    }

    fn attendance(&self) -> Arc<AttendanceService> {
        self.services.attendance()
    }

    fn stats(&self) -> Arc<StatsService> {
        self.services.stats()
    }

    fn feedback(&self) -> Arc<FeedbackService> {
        self.services.feedback()
    }

    fn goals(&self) -> Arc<GoalService> {
        self.services.goals()
    }

    fn streaks(&self) -> Arc<StreakService> {
        self.services.streaks()
    }

    fn preferences(&self) -> Arc<PreferencesService> {
        self.services.preferences()
    }

    fn login_email(&self) -> Option<String> {
        self.login_email.clone()
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    db_url: String,
    login_email: Option<String>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [ui] [--db <sqlite_url>] [--email <address>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!();
    eprintln!("Environment (also read from .env):");
    eprintln!("  ATTEND_DB_URL, ATTEND_USER_EMAIL, RUST_LOG");
}

impl Args {
    /// Parse flags on top of environment defaults.
    fn parse(
        args: &mut impl Iterator<Item = String>,
        env_db_url: Option<String>,
        env_email: Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut db_url = env_db_url.map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url);
        let mut login_email = env_email.filter(|e| !e.trim().is_empty());

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--email" => {
                    let value = require_value(args, "--email")?;
                    if !value.contains('@') {
                        return Err(ArgsError::InvalidEmail { raw: value });
                    }
                    login_email = Some(value.trim().to_ascii_lowercase());
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
            login_email,
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

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1).peekable();
    if argv.peek().is_some_and(|first| first == "ui") {
        argv.next();
    }

    let parsed = Args::parse(
        &mut argv,
        std::env::var("ATTEND_DB_URL").ok(),
        std::env::var("ATTEND_USER_EMAIL").ok(),
    )
    .map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    prepare_sqlite_file(&parsed.db_url)?;
    let services = AppServices::new_sqlite(&parsed.db_url, Clock::default_clock()).await?;
    tracing::info!(db_url = %parsed.db_url, "launching desktop app");

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        services,
        login_email: parsed.login_email,
    });
    let context = build_app_context(&app);

    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("SAM - Student Attendance Manager")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "app=info,services=info,storage=info,ui=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = run().await {
        tracing::error!(%err, "startup failed");
        std::process::exit(2);
    }
}
