mod commands;
mod helper;
mod login;
mod tracing_layer;
mod view;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use pawfinder_application::{FetchOutcome, MatchError, MatchOutcome, PawfinderApp, SearchTicket};
use pawfinder_core::dog::DogApi;
use pawfinder_core::favorites::Toggle;
use pawfinder_infrastructure::{ConfigService, JsonFavoritesRepository, PawfinderPaths};
use pawfinder_interaction::FetchApiClient;

use crate::commands::{Command, FavoriteTarget};
use crate::helper::CliHelper;
use crate::tracing_layer::{Diagnostics, DiagnosticsLayer};
use crate::view::ErrorBoundary;

/// Browse adoptable dogs from the terminal.
#[derive(Debug, Parser)]
#[command(name = "pawfinder", version, about)]
struct Args {
    /// Service base URL (overrides config and PAWFINDER_BASE_URL).
    #[arg(long)]
    base_url: Option<String>,

    /// Path to config.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to the favorites file.
    #[arg(long)]
    favorites: Option<PathBuf>,
}

/// Messages from background work to the screen task.
#[derive(Debug)]
enum UiEvent {
    Searched(FetchOutcome),
    Retry,
}

/// How a REPL session ended.
enum Flow {
    LoggedOut,
    Quit,
}

type Rl = Editor<CliHelper, DefaultHistory>;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let paths = PawfinderPaths::default();

    // ===== Configuration =====
    let config_service = match &args.config {
        Some(path) => ConfigService::with_path(path.clone()),
        None => ConfigService::new_default()?,
    };
    let mut config = config_service
        .load()
        .with_context(|| format!("loading {}", config_service.path().display()))?;
    if let Some(base_url) = args.base_url {
        config.api.base_url = base_url.trim_end_matches('/').to_string();
    }

    let diagnostics = Diagnostics::default();
    let _log_guard = init_tracing(&paths, config.log_level.as_deref(), diagnostics.clone())?;
    tracing_layer::route_panics_to_tracing();
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = %config.api.base_url,
        "pawfinder starting"
    );

    if args.config.is_none() {
        if let Err(e) = config_service.ensure_config_file() {
            tracing::warn!(error = %e, "could not write default config file");
        }
    }

    // ===== Backend Initialization =====
    let favorites_path = match args.favorites.or_else(|| config.storage.favorites_path.clone()) {
        Some(path) => path,
        None => paths.favorites_file()?,
    };
    let api: Arc<dyn DogApi> = Arc::new(FetchApiClient::from_config(&config.api)?);
    let repository = Arc::new(JsonFavoritesRepository::with_path(favorites_path));
    let app = Arc::new(PawfinderApp::new(api, repository).await);

    // Background fetches report here; the screen task owns the error boundary.
    let (ui_tx, ui_rx) = mpsc::channel::<UiEvent>(32);
    let screen = tokio::spawn(run_screen(Arc::clone(&app), ui_rx));

    // ===== REPL Setup =====
    let mut rl: Rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== Pawfinder ===".bright_magenta().bold());
    println!("{}", "Type /help for commands, or 'quit' to exit.".bright_black());
    println!();

    let mut repl = Repl {
        app: Arc::clone(&app),
        rl,
        ui_tx,
        diagnostics,
    };

    let mut authenticated = app.start().await.is_authenticated();
    loop {
        if !authenticated && !login::sign_in(&mut repl.rl, &app).await? {
            break;
        }
        match repl.run().await? {
            Flow::LoggedOut => authenticated = false,
            Flow::Quit => break,
        }
    }

    println!("{}", "Goodbye!".bright_green());

    // Drop the sender to signal shutdown, then let the screen task drain.
    drop(repl);
    let _ = screen.await;

    Ok(())
}

/// File log plus the in-memory diagnostics buffer. `RUST_LOG` wins over the
/// configured level.
fn init_tracing(
    paths: &PawfinderPaths,
    level: Option<&str>,
    diagnostics: Diagnostics,
) -> Result<WorkerGuard> {
    let logs_dir = paths.logs_dir()?;
    std::fs::create_dir_all(&logs_dir)
        .with_context(|| format!("creating log directory {}", logs_dir.display()))?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(&logs_dir, "pawfinder.log"));

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level.unwrap_or("info"))
            .with_context(|| format!("invalid log level {:?}", level))?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(DiagnosticsLayer::new(diagnostics))
        .try_init()
        .context("installing tracing subscriber")?;

    Ok(guard)
}

/// Redraws the catalog whenever a search lands.
async fn run_screen(app: Arc<PawfinderApp>, mut events: mpsc::Receiver<UiEvent>) {
    let mut boundary = ErrorBoundary::new();

    while let Some(event) = events.recv().await {
        match event {
            UiEvent::Searched(FetchOutcome::Superseded) => continue,
            UiEvent::Searched(_) => {}
            UiEvent::Retry => boundary.retry(),
        }

        let snapshot = app.catalog().snapshot().await;
        let favorites = app.favorites().snapshot().await;
        println!();
        println!(
            "{}",
            boundary.render(|| view::render_catalog(&snapshot, &favorites))
        );
    }
}

struct Repl {
    app: Arc<PawfinderApp>,
    rl: Rl,
    ui_tx: mpsc::Sender<UiEvent>,
    diagnostics: Diagnostics,
}

impl Repl {
    /// Runs commands until logout or quit.
    async fn run(&mut self) -> Result<Flow> {
        self.enter_catalog().await;

        loop {
            let line = match self.rl.readline(">> ") {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => {
                    println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
                    continue;
                }
                Err(ReadlineError::Eof) => return Ok(Flow::Quit),
                Err(err) => return Err(err.into()),
            };

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let _ = self.rl.add_history_entry(trimmed);

            match commands::parse(trimmed) {
                Ok(command) => {
                    if let Some(flow) = self.execute(command).await {
                        return Ok(flow);
                    }
                }
                Err(e) => println!("{}", e.to_string().yellow()),
            }
        }
    }

    async fn enter_catalog(&mut self) {
        self.load_breeds().await;
        let ticket = self.app.catalog().refresh().await;
        self.spawn_search(ticket).await;
    }

    async fn load_breeds(&mut self) {
        let Some(session) = self.app.session().await else {
            return;
        };
        if let Err(message) = self.app.catalog().load_breeds(&session).await {
            println!("{}", message.red());
        }
        let breeds = self.app.catalog().snapshot().await.breeds;
        if let Some(helper) = self.rl.helper_mut() {
            helper.set_breeds(breeds);
        }
    }

    async fn spawn_search(&self, ticket: SearchTicket) {
        let Some(session) = self.app.session().await else {
            return;
        };
        let app = Arc::clone(&self.app);
        let tx = self.ui_tx.clone();
        tokio::spawn(async move {
            let outcome = app.catalog().fetch_detached(session, ticket).await;
            if tx.send(UiEvent::Searched(outcome)).await.is_err() {
                tracing::warn!("screen closed before search result arrived");
            }
        });
    }

    /// Returns `Some` when the session is over.
    async fn execute(&mut self, command: Command) -> Option<Flow> {
        if let Some(action) = command.criteria_action() {
            let navigation = action.is_navigation();
            match self.app.catalog().dispatch(action).await {
                Some(ticket) => self.spawn_search(ticket).await,
                None if navigation => println!("{}", "No such page.".bright_black()),
                None => println!("{}", "Filters unchanged.".bright_black()),
            }
            return None;
        }

        match command {
            Command::Sort(_) => {
                let current = self.app.catalog().criteria().await.sort;
                println!("{}", view::render_sort_options(current));
            }
            Command::Breeds => {
                let snapshot = self.app.catalog().snapshot().await;
                if snapshot.breeds.is_empty() || snapshot.breeds_state.error.is_some() {
                    self.load_breeds().await;
                }
                let snapshot = self.app.catalog().snapshot().await;
                println!(
                    "{}",
                    view::render_breeds(&snapshot.breeds, snapshot.criteria.selected_breed())
                );
            }
            Command::Favorite(target) => self.toggle_favorite(target).await,
            Command::Favorites => {
                let ids = self.app.favorites().ids().await;
                let on_screen = self.app.catalog().snapshot().await.dogs;
                println!("{}", view::render_favorites(&ids, &on_screen));
            }
            Command::Match => self.request_match().await,
            Command::Refresh => {
                let ticket = self.app.catalog().refresh().await;
                self.spawn_search(ticket).await;
            }
            Command::Log => println!("{}", view::render_diagnostics(&self.diagnostics.recent())),
            Command::Retry => {
                let _ = self.ui_tx.send(UiEvent::Retry).await;
            }
            Command::Logout => {
                if let Err(e) = self.app.logout().await {
                    println!(
                        "{}",
                        format!("Logout failed: {}. You have been signed out locally.", e).red()
                    );
                } else {
                    println!("{}", "Signed out.".bright_green());
                }
                return Some(Flow::LoggedOut);
            }
            Command::Help => println!("{}", view::render_help()),
            Command::Quit => return Some(Flow::Quit),
            // Criteria edits were handled above.
            _ => {}
        }
        None
    }

    async fn toggle_favorite(&mut self, target: FavoriteTarget) {
        let dog = match &target {
            FavoriteTarget::Id(id) => {
                let dogs = self.app.catalog().snapshot().await.dogs;
                dogs.into_iter().find(|dog| &dog.id == id)
            }
            FavoriteTarget::Card(index) => {
                match self.app.catalog().snapshot().await.dogs.get(*index) {
                    Some(dog) => Some(dog.clone()),
                    None => {
                        println!("{}", format!("No card #{} on this page.", index + 1).yellow());
                        return;
                    }
                }
            }
            FavoriteTarget::Match => match self.app.matcher().current().await {
                Some(dog) => Some(dog),
                None => {
                    println!("{}", "No match yet. Try /match.".yellow());
                    return;
                }
            },
        };
        let id = match (&target, &dog) {
            (_, Some(dog)) => dog.id.clone(),
            (FavoriteTarget::Id(id), None) => id.clone(),
            _ => return,
        };
        let name = dog.map(|dog| dog.name).unwrap_or_else(|| id.clone());

        match self.app.toggle_favorite(&id).await {
            Ok(Toggle::Added) => println!("{}", format!("♥ Added {} to favorites.", name).bright_magenta()),
            Ok(Toggle::Removed) => println!("{}", format!("Removed {} from favorites.", name).bright_black()),
            Err(e) => println!("{}", format!("Could not save favorites: {}", e).red()),
        }
        println!("{}", view::favorites_count(self.app.favorites().ids().await.len()));
    }

    async fn request_match(&mut self) {
        let Repl { app, rl, .. } = self;
        match app.request_match(|question| login::confirm(rl, question)).await {
            Ok(MatchOutcome::Matched(dog)) => {
                let favorite = app.favorites().contains(&dog.id).await;
                println!("{}", view::render_match(&dog, favorite));
            }
            Ok(MatchOutcome::Declined) => println!("{}", "Match cancelled.".bright_black()),
            Err(e @ MatchError::NoFavorites) => println!("{}", e.to_string().yellow()),
            Err(e) => println!("{}", e.to_string().red()),
        }
    }
}
