use anyhow::{Context, Result};
use clap::Parser;
use secrecy::SecretString;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

use newsflow::app::{App, AppEvent};
use newsflow::config::Config;
use newsflow::feed::{Category, SortOrder};
use newsflow::news::NewsClient;
use newsflow::theme::ThemeVariant;
use newsflow::ui;

const API_KEY_ENV: &str = "NEWS_API_KEY";

/// Get the config directory path (~/.config/newsflow/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("newsflow"))
}

/// Send tracing output to a log file so it never draws over the TUI.
/// Logging stays off unless RUST_LOG is set.
fn init_logging(config_dir: &std::path::Path) -> Result<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        return Ok(());
    }

    let log_path = config_dir.join("newsflow.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[derive(Parser, Debug)]
#[command(name = "newsflow", about = "Terminal news reader: search and top headlines")]
struct Args {
    /// Config file (default: ~/.config/newsflow/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Initial search term; pass "" to start on top headlines
    #[arg(long, value_name = "TERM")]
    query: Option<String>,

    /// Initial category (general, business, entertainment, health, science, sports, technology)
    #[arg(long, value_name = "NAME")]
    category: Option<Category>,

    /// Initial sort order (latest, relevance, popularity)
    #[arg(long, value_name = "ORDER")]
    sort: Option<SortOrder>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
    }

    // User-only access: the config file may hold an API key
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(metadata) = std::fs::metadata(&config_dir) {
            let mut perms = metadata.permissions();
            perms.set_mode(0o700);
            let _ = std::fs::set_permissions(&config_dir, perms);
        }
    }

    init_logging(&config_dir)?;

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    // Env var takes precedence over the config file
    let api_key = std::env::var(API_KEY_ENV)
        .ok()
        .or_else(|| config.news_api_key.clone())
        .filter(|k| !k.trim().is_empty());
    let Some(api_key) = api_key else {
        eprintln!("Error: no news API key configured.");
        eprintln!();
        eprintln!("Set the {} environment variable:", API_KEY_ENV);
        eprintln!("  export {}=your-key", API_KEY_ENV);
        eprintln!();
        eprintln!("or add `news_api_key = \"your-key\"` to {}", config_path.display());
        std::process::exit(1);
    };

    let client = NewsClient::with_options(
        SecretString::from(api_key),
        config.api_base_url.as_deref(),
        Duration::from_secs(config.request_timeout_secs.max(1)),
    )
    .context("Failed to create news client")?;

    let mut initial = config.initial_query();
    if let Some(query) = args.query {
        initial.search_term = query;
    }
    if let Some(category) = args.category {
        initial.category = category;
    }
    if let Some(sort) = args.sort {
        initial.sort_order = sort;
    }
    tracing::info!(
        term = %initial.search_term,
        category = %initial.category,
        sort = ?initial.sort_order,
        "Starting newsflow"
    );

    let mut app = App::new(client, initial);

    match ThemeVariant::from_str_name(&config.theme) {
        Some(variant) => app.set_theme(variant),
        None => tracing::warn!(theme = %config.theme, "Unknown theme, using dark"),
    }

    for warning in app.keybindings.apply_overrides(&config.keybindings) {
        tracing::warn!("{}", warning);
    }

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    ui::run(&mut app, event_tx, event_rx).await?;

    println!("Goodbye!");

    Ok(())
}
