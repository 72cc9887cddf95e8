//! # ScanPrice App Library
//!
//! Everything behind the `scanprice` binary: startup, command dispatch and
//! the interactive shell.
//!
//! ## Module Organization
//! ```text
//! scanprice_lib/
//! ├── lib.rs          ◄─── You are here (startup, dispatch, shell)
//! ├── cli.rs          ◄─── clap definitions, shell line parsing
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── config.rs   ◄─── AppConfig (toml + env)
//! │   ├── history.rs  ◄─── HistoryState + writer task
//! │   └── session.rs  ◄─── SessionState (current product, status, view)
//! ├── commands/
//! │   ├── lookup.rs   ◄─── manual / scanned lookups
//! │   ├── history.rs  ◄─── list, select, remove, clear
//! │   ├── session.rs  ◄─── view switching, session summary
//! │   ├── storage.rs  ◄─── storage diagnostics
//! │   └── ar.rs       ◄─── AR scene and captures
//! ├── scanner.rs      ◄─── decoder contract, scoped scanner session
//! ├── ar.rs           ◄─── AR overlay state and scene description
//! ├── notify.rs       ◄─── toast-style notifications
//! ├── render.rs       ◄─── terminal output
//! └── error.rs        ◄─── ApiError / AppError
//! ```

pub mod ar;
pub mod cli;
pub mod commands;
pub mod error;
pub mod notify;
pub mod render;
pub mod scanner;
pub mod state;

use std::path::PathBuf;
use std::sync::Arc;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::info;
use tracing_subscriber::EnvFilter;

use scanprice_core::{ActiveView, Product};
use scanprice_lookup::{LookupService, OpenFoodFactsClient};
use scanprice_store::{Database, DbConfig, HistoryBackend, MemoryHistoryBackend};

use cli::{parse_shell_line, Cli, Command, ShellCommand};
use error::{ApiError, AppError, ErrorCode};
use notify::{ConsoleNotifier, Notifier};
use scanner::{ScannerSession, SerialLineDecoder};
use state::{AppConfig, HistoryState, SessionState};

const PROMPT: &str = "scanprice> ";

/// How a one-shot command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

/// Initializes the tracing subscriber. Logs go to stderr.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=scanprice=trace` - Trace for the scanprice crates only
/// - Default: WARN, INFO for scanprice crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,scanprice=info,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs the app for parsed arguments.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Load Configuration ───────────────────────────────────────────────► │
/// │     • --config FILE (errors are fatal) or platform default (lenient)    │
/// │     • SCANPRICE_* environment overrides                                 │
/// │                                                                         │
/// │  2. Open Storage ─────────────────────────────────────────────────────► │
/// │     • SQLite with WAL mode, migrations applied                          │
/// │     • --ephemeral: memory only                                          │
/// │                                                                         │
/// │  3. Hydrate History ──────────────────────────────────────────────────► │
/// │     • One read; corrupt record → empty history                         │
/// │     • Writer task started                                               │
/// │                                                                         │
/// │  4. Dispatch ─────────────────────────────────────────────────────────► │
/// │     • Subcommand once, or the interactive shell                         │
/// │                                                                         │
/// │  5. Shutdown ─────────────────────────────────────────────────────────► │
/// │     • Flush pending history writes, close the pool                      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(cli: Cli) -> Result<Outcome, AppError> {
    let config = match &cli.config {
        Some(path) => AppConfig::load(Some(path.clone()))?,
        None => AppConfig::load_or_default(None),
    };

    let app = App::bootstrap(config, cli.ephemeral, Arc::new(ConsoleNotifier))
        .await?
        .with_config_path(cli.config);

    let result = match cli.command.unwrap_or(Command::Shell) {
        Command::Shell => app.shell().await.map(|()| Outcome::Success),
        command => Ok(app.run_once(command).await),
    };

    app.shutdown().await;
    result
}

// =============================================================================
// App
// =============================================================================

/// All state for one run.
pub struct App {
    pub config: AppConfig,
    pub lookup: LookupService,
    pub history: HistoryState,
    pub session: SessionState,
    pub notifier: Arc<dyn Notifier>,
    db: Option<Database>,
    config_path: Option<PathBuf>,
}

impl App {
    /// Builds the lookup client, opens storage and hydrates the history.
    pub async fn bootstrap(
        config: AppConfig,
        ephemeral: bool,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, AppError> {
        let client = OpenFoodFactsClient::new(&config.lookup)?;
        let lookup = LookupService::new(Arc::new(client));

        let (backend, db): (Arc<dyn HistoryBackend>, Option<Database>) = if ephemeral {
            info!("Ephemeral run, history kept in memory");
            (Arc::new(MemoryHistoryBackend::new()), None)
        } else {
            let db_path = config.database_path()?;
            info!(?db_path, "Database path determined");
            let db = Database::new(DbConfig::new(db_path)).await?;
            (Arc::new(db.history(config.storage.key.clone())), Some(db))
        };

        let history = HistoryState::hydrate(backend).await;

        Ok(App {
            config,
            lookup,
            history,
            session: SessionState::new(),
            notifier,
            db,
            config_path: None,
        })
    }

    /// Assembles an app from ready-made parts, without storage.
    pub fn with_parts(
        config: AppConfig,
        lookup: LookupService,
        history: HistoryState,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        App {
            config,
            lookup,
            history,
            session: SessionState::new(),
            notifier,
            db: None,
            config_path: None,
        }
    }

    /// Config file that `config --write` targets. Platform default when `None`.
    pub fn with_config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    /// Flushes pending history writes and closes storage.
    pub async fn shutdown(self) {
        self.history.flush().await;
        if let Some(db) = &self.db {
            db.close().await;
        }
    }

    fn card(&self, product: &Product) -> String {
        render::product_card(product, &self.config.lookup.product_page_base_url)
    }

    /// Runs one command and renders its result.
    pub async fn execute(&self, command: Command) -> Result<String, ApiError> {
        let notifier = self.notifier.as_ref();

        match command {
            Command::Lookup { code } => {
                let product = commands::submit_manual_code(
                    &self.lookup,
                    &self.session,
                    &self.history,
                    notifier,
                    &code,
                )
                .await?;
                Ok(self.card(&product))
            }
            Command::Scan {
                decoded: Some(text),
                ..
            } => {
                let product = commands::submit_scanned_code(
                    &self.lookup,
                    &self.session,
                    &self.history,
                    notifier,
                    &text,
                )
                .await?;
                Ok(self.card(&product))
            }
            Command::Scan {
                device,
                decoded: None,
            } => {
                let mut scanner = ScannerSession::new(SerialLineDecoder::new(device));
                notifier.info("Waiting for a barcode...");
                let product = commands::scan_and_lookup(
                    &mut scanner,
                    &self.config.scanner,
                    &self.lookup,
                    &self.session,
                    &self.history,
                    notifier,
                )
                .await?;
                Ok(self.card(&product))
            }
            Command::History => Ok(render::history_list(&commands::list_history(&self.history))),
            Command::Select { code } => {
                let item = commands::select_history_item(&self.history, &self.session, &code)?;
                Ok(self.card(&item.product))
            }
            Command::Remove { code } => match commands::remove_history_item(&self.history, &code) {
                Some(removed) => Ok(format!(
                    "Removed {} ({})",
                    removed.product.product_name,
                    removed.code()
                )),
                None => Ok(format!("Nothing to remove for {}", code)),
            },
            Command::Clear => {
                let count = commands::clear_history(&self.history);
                Ok(format!("Cleared {} item(s)", count))
            }
            Command::Ar { capture: None, .. } => {
                serde_json::to_string_pretty(&commands::menu_scene())
                    .map_err(|e| ApiError::new(ErrorCode::Unexpected, e.to_string()))
            }
            Command::Ar {
                capture: Some(frame),
                out,
            } => {
                let path = commands::capture_frame(&frame, &out).await?;
                Ok(format!("Saved {}", path.display()))
            }
            Command::Status => {
                let session = commands::session_status(&self.session);
                let storage =
                    commands::storage_status(self.db.as_ref(), &self.config.storage.key).await;
                Ok(format!(
                    "{}\n{}",
                    render::session_line(&session),
                    render::storage_line(&storage)
                ))
            }
            Command::Config { write } => {
                let unexpected = |e: AppError| ApiError::new(ErrorCode::Unexpected, e.to_string());
                let text = toml::to_string_pretty(&self.config).map_err(|e| unexpected(e.into()))?;
                if !write {
                    return Ok(text);
                }
                let path = self.config.save(self.config_path.clone()).map_err(unexpected)?;
                Ok(format!("Config written to {}", path.display()))
            }
            Command::Shell => Err(ApiError::validation("Already in the shell")),
        }
    }

    /// Runs one command, printing output to stdout and errors to stderr.
    pub async fn run_once(&self, command: Command) -> Outcome {
        let is_lookup = matches!(command, Command::Lookup { .. } | Command::Scan { .. });

        match self.execute(command).await {
            Ok(text) => {
                println!("{}", text);
                Outcome::Success
            }
            Err(err) => {
                if !(is_lookup && notified_by_lookup(&err)) {
                    eprintln!("{}", render::api_error(&err));
                }
                Outcome::Failure
            }
        }
    }

    /// Interactive shell. Ends on `quit`, Ctrl-C or Ctrl-D.
    pub async fn shell(&self) -> Result<(), AppError> {
        let mut editor = DefaultEditor::new()?;
        println!("scanprice {} - type 'help' for commands", env!("CARGO_PKG_VERSION"));

        loop {
            let line = tokio::task::block_in_place(|| editor.readline(PROMPT));

            match line {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let _ = editor.add_history_entry(line.trim());

                    match parse_shell_line(&line) {
                        Ok(None) => {}
                        Ok(Some(ShellCommand::Quit)) => break,
                        Ok(Some(ShellCommand::View { view })) => self.show_view(view.into()),
                        Ok(Some(ShellCommand::App(command))) => {
                            self.run_once(command).await;
                        }
                        Err(e) => {
                            let _ = e.print();
                        }
                    }
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(e) => return Err(e.into()),
            }
        }

        info!("Shell closed");
        Ok(())
    }

    fn show_view(&self, view: ActiveView) {
        commands::show_view(&self.session, view);
        match view {
            ActiveView::History => {
                println!("{}", render::history_list(&commands::list_history(&self.history)));
            }
            ActiveView::Scan => match self.session.current_product() {
                Some(product) => println!("{}", self.card(&product)),
                None => println!("No product selected"),
            },
        }
    }
}

/// Lookup failures the notifier has already shown.
fn notified_by_lookup(err: &ApiError) -> bool {
    matches!(
        err.code,
        ErrorCode::NetworkError
            | ErrorCode::NotFound
            | ErrorCode::Unexpected
            | ErrorCode::CameraError
    )
}
