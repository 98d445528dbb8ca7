use std::fs;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use wpwatch::cli::{Cli, Commands};
use wpwatch::config::Config;
use wpwatch::domain::CheckResult;
use wpwatch::errors::{WatchError, WatchResult};
use wpwatch::notifiers::{BrowserOpener, ConsoleNotifier, LinkOpener, Notifier, WebhookNotifier};
use wpwatch::services::{
    spawn_scheduler, spawn_settings_watcher, BatchRunner, ImportExportService,
    NotificationService, Scheduler, SiteService,
};
use wpwatch::sources::{ReqwestHttpClient, WordPressSource};
use wpwatch::storage::{SqliteKeyValueStore, SqliteStorage, StateStore};

type State = StateStore<SqliteKeyValueStore>;
type Runner = BatchRunner<WordPressSource<ReqwestHttpClient>, SqliteKeyValueStore>;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> WatchResult<()> {
    let cli = Cli::parse();

    init_tracing(matches!(cli.command, Commands::Watch));

    // Load configuration
    let config = Config::from_env()?;

    // Initialize storage
    let storage = SqliteStorage::new(&config.db_path)?;
    let state = StateStore::new(SqliteKeyValueStore::new(storage));
    state.init_defaults()?;

    match cli.command {
        Commands::Add { url, name } => cmd_add(&url, name, &state),
        Commands::Remove => cmd_remove(&state),
        Commands::List => cmd_list(&state),
        Commands::Interval { minutes } => cmd_interval(&state, minutes),
        Commands::Check => cmd_check(&state, &config),
        Commands::Recent => cmd_recent(&state),
        Commands::Open { site, item } => cmd_open(&state, site, item),
        Commands::Watch => cmd_watch(&state, &config),
        Commands::Import { path } => cmd_import(&path, &state),
        Commands::Export { output } => cmd_export(&state, output),
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the default level
fn init_tracing(verbose: bool) {
    let default = if verbose { "wpwatch=info" } else { "wpwatch=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn build_runner(state: &State, config: &Config) -> WatchResult<Runner> {
    let mut notifiers: Vec<Box<dyn Notifier>> = vec![Box::new(ConsoleNotifier)];
    if let Some(url) = &config.webhook_url {
        notifiers.push(Box::new(WebhookNotifier::new(url, config.http_timeout)?));
    }

    let notifications = NotificationService::new(notifiers, Box::new(BrowserOpener));
    let source = WordPressSource::new(ReqwestHttpClient::new(config.http_timeout));

    Ok(BatchRunner::new(source, state.clone(), notifications))
}

fn cmd_add(url: &str, name: Option<String>, state: &State) -> WatchResult<()> {
    let service = SiteService::new(state.clone());

    match service.add(url, name) {
        Ok(site) => {
            println!("Site added: {}", site.display_name());
            println!("  URL: {}", site.url);
            println!("  ID: {}", site.id);
            Ok(())
        }
        Err(WatchError::SiteAlreadyExists(_)) => {
            println!("Site already exists: {}", url);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

fn cmd_remove(state: &State) -> WatchResult<()> {
    let service = SiteService::new(state.clone());
    let sites = service.list()?;

    if sites.is_empty() {
        println!("No sites to remove.");
        return Ok(());
    }

    // Display numbered list
    println!("Select a site to remove:\n");
    for (i, site) in sites.iter().enumerate() {
        println!("  {}. {} ({})", i + 1, site.display_name(), site.url);
    }
    println!();

    // Read user input
    print!("Enter number (or 'q' to cancel): ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    if input.eq_ignore_ascii_case("q") {
        println!("Cancelled.");
        return Ok(());
    }

    let index: usize = input
        .parse()
        .map_err(|_| WatchError::InvalidInput("Invalid number".to_string()))?;

    if index == 0 || index > sites.len() {
        return Err(WatchError::InvalidInput("Number out of range".to_string()));
    }

    let removed = service.remove(&sites[index - 1].id)?;
    println!("Removed: {}", removed.display_name());

    Ok(())
}

fn cmd_list(state: &State) -> WatchResult<()> {
    let sites = SiteService::new(state.clone()).list()?;

    if sites.is_empty() {
        println!("No sites configured.");
        return Ok(());
    }

    println!("Watched sites (every {} min):\n", state.interval_minutes()?);
    for (i, site) in sites.iter().enumerate() {
        println!("  {}. {}", i + 1, site.display_name());
        if site.name.is_some() {
            println!("     URL: {}", site.url);
        }
    }

    Ok(())
}

fn cmd_interval(state: &State, minutes: Option<u32>) -> WatchResult<()> {
    match minutes {
        Some(minutes) => {
            state.set_interval_minutes(minutes)?;
            println!("Check interval set to {} minute(s).", minutes);
        }
        None => {
            println!("Check interval: {} minute(s).", state.interval_minutes()?);
        }
    }
    Ok(())
}

fn cmd_check(state: &State, config: &Config) -> WatchResult<()> {
    let sites = state.sites()?;
    if sites.is_empty() {
        println!("No sites configured.");
        return Ok(());
    }

    let runner = build_runner(state, config)?;

    println!("Checking {} site(s)...\n", sites.len());
    let started = Instant::now();
    let results = runner.run()?;

    print_results(&results);
    println!("\nDone in {:.1}s.", started.elapsed().as_secs_f64());

    Ok(())
}

fn print_results(results: &[CheckResult]) {
    for result in results {
        match (&result.latest, &result.error) {
            (Some(latest), _) => {
                let marker = if result.is_new { " [new]" } else { "" };
                println!("  ok    {}: {}{}", result.site, latest.title, marker);
            }
            (None, Some(error)) => println!("  FAIL  {}: {}", result.site, error),
            (None, None) => println!("  ?     {}", result.site),
        }
    }
}

fn cmd_recent(state: &State) -> WatchResult<()> {
    let sites = state.sites()?;

    if sites.is_empty() {
        println!("No sites configured. Use `wpwatch add <url>` to add one.");
        return Ok(());
    }

    for (i, site) in sites.iter().enumerate() {
        println!("{}. {}", i + 1, site.display_name());

        let cached = state.cache(&site.id)?;
        if cached.is_empty() {
            println!("   No posts cached yet.");
        }
        for (n, item) in cached.iter().enumerate() {
            println!("   {}) {}", n + 1, item.title);
            match &item.date {
                Some(date) => println!("      {}  {}", item.link, date),
                None => println!("      {}", item.link),
            }
        }
        println!();
    }

    Ok(())
}

fn cmd_open(state: &State, site_number: usize, item_number: usize) -> WatchResult<()> {
    let sites = state.sites()?;
    let site = site_number
        .checked_sub(1)
        .and_then(|i| sites.get(i))
        .ok_or_else(|| WatchError::InvalidInput("Site number out of range".to_string()))?;

    let cached = state.cache(&site.id)?;
    let item = item_number
        .checked_sub(1)
        .and_then(|i| cached.get(i))
        .ok_or_else(|| WatchError::InvalidInput("Post number out of range".to_string()))?;

    let link = item
        .link_opt()
        .ok_or_else(|| WatchError::InvalidInput("Post has no link".to_string()))?;

    BrowserOpener.open(link)?;
    println!("Opened {}", link);
    Ok(())
}

fn cmd_watch(state: &State, config: &Config) -> WatchResult<()> {
    let runner = Arc::new(build_runner(state, config)?);
    let minutes = state.interval_minutes()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let (interval_tx, interval_rx) = watch::channel(minutes);
        let watcher = spawn_settings_watcher(state.clone(), config.settings_poll, interval_tx);

        let batch = Arc::clone(&runner);
        let handle = spawn_scheduler(Scheduler::new(minutes), interval_rx, move || {
            run_scheduled(&batch)
        });

        spawn_click_reader(Arc::clone(&runner));

        println!(
            "Watching sites every {} minute(s). Press Ctrl-C to stop.",
            minutes
        );
        println!("Type a notification id and press Enter to open its post.");
        tokio::signal::ctrl_c().await?;

        handle.stop().await?;
        watcher.abort();
        Ok::<(), WatchError>(())
    })?;

    // Blocking HTTP clients must be dropped outside the runtime
    drop(runtime);
    drop(runner);
    Ok(())
}

/// Treat each stdin line as a click on the notification with that id
fn spawn_click_reader(runner: Arc<Runner>) {
    std::thread::spawn(move || {
        for line in io::stdin().lines() {
            let Ok(line) = line else { break };
            let id = line.trim().trim_start_matches('[').trim_end_matches(']');
            if id.is_empty() {
                continue;
            }

            match runner.notifications().handle_click(id) {
                Ok(true) => {}
                Ok(false) => println!("Unknown or expired notification: {}", id),
                Err(e) => warn!(id = %id, error = %e, "failed to open notification link"),
            }
        }
    });
}

fn run_scheduled(runner: &Runner) {
    match runner.run() {
        Ok(results) => print_results(&results),
        Err(WatchError::BatchInProgress) => info!("previous check still running; skipping"),
        Err(e) => warn!(error = %e, "scheduled check failed"),
    }
}

fn cmd_import(path: &str, state: &State) -> WatchResult<()> {
    let content = fs::read_to_string(path)?;
    let sites = SiteService::new(state.clone());
    let service = ImportExportService::new(&sites);

    println!("Importing sites from {}...\n", path);

    let result = service.import_opml(&content)?;

    if !result.added.is_empty() {
        println!("Added {} sites:", result.added.len());
        for site in &result.added {
            println!("  + {} ({})", site.display_name(), site.url);
        }
        println!();
    }

    if !result.duplicates.is_empty() {
        println!("Skipped {} duplicates:", result.duplicates.len());
        for url in &result.duplicates {
            println!("  - {}", url);
        }
        println!();
    }

    if !result.invalid.is_empty() {
        println!("Failed {} sites:", result.invalid.len());
        for (url, error) in &result.invalid {
            println!("  ! {}: {}", url, error);
        }
        println!();
    }

    println!(
        "Import complete: {} added, {} duplicates, {} failed",
        result.added.len(),
        result.duplicates.len(),
        result.invalid.len()
    );

    Ok(())
}

fn cmd_export(state: &State, output: Option<String>) -> WatchResult<()> {
    let sites = SiteService::new(state.clone());
    let opml = ImportExportService::new(&sites).export_opml()?;

    match output {
        Some(path) => {
            fs::write(&path, &opml)?;
            println!("Exported sites to {}", path);
        }
        None => {
            println!("{}", opml);
        }
    }

    Ok(())
}
