use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use petl_client::banner::{BannerInfo, print_banner, print_session_summary};
use petl_client::commands::{CommandRegistry, CommandResult, SessionInfo, StateChange};
use petl_client::config::{Config, resolve_endpoint};
use petl_client::consts::{DEFAULT_ENDPOINT, ENDPOINT_KEY, default_db_path};
use petl_client::controller::InterpretRequestController;
use petl_client::interpreter::http::HttpInterpreter;
use petl_client::ui::EditorInput;
use petl_client::ui::editor::{Editor, read_script};
use petl_client::ui::lines::stdin_lines;
use petl_client::ui::terminal::{SpinnerSignal, TerminalOutput};

#[derive(Parser)]
#[command(name = "petl", version, about = "A terminal client for a remote PETL interpreter.")]
struct Cli {
    /// Interpreter service address (URL or host:port)
    #[arg(short = 'u', long, env = "PETL_ENDPOINT")]
    endpoint: Option<String>,

    /// SQLite database for saved settings (use :memory: for ephemeral)
    #[arg(short, long)]
    db: Option<String>,

    /// Do not request a session cookie at startup
    #[arg(long, default_value_t = false)]
    no_session: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Run a .petl file once and exit (non-interactive)
    #[arg(short, long, conflicts_with = "eval")]
    file: Option<PathBuf>,

    /// Run an inline script once and exit (non-interactive)
    #[arg(short, long)]
    eval: Option<String>,
}

/// The interpreter-facing half of the session, rebuilt on `/endpoint`.
struct Connection {
    controller: Arc<InterpretRequestController>,
    endpoint: String,
    session: String,
}

async fn connect(
    endpoint: &str,
    start_session: bool,
    busy: Arc<SpinnerSignal>,
    output: Arc<TerminalOutput>,
) -> anyhow::Result<Connection> {
    let interpreter = HttpInterpreter::new(endpoint)?;

    let session = if !start_session {
        "skipped".to_string()
    } else {
        match interpreter.start_session().await {
            Ok(()) => "started".to_string(),
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "could not start session");
                "unavailable".to_string()
            }
        }
    };

    let endpoint = interpreter.endpoint().to_string();
    let controller = Arc::new(InterpretRequestController::new(
        Arc::new(interpreter),
        busy,
        output,
    ));
    Ok(Connection {
        controller,
        endpoint,
        session,
    })
}

fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let db_path = cli
        .db
        .clone()
        .unwrap_or_else(|| default_db_path().to_string_lossy().into_owned());
    let config = Config::open(&db_path).with_context(|| format!("failed to open {db_path}"))?;
    let (endpoint, source) = resolve_endpoint(cli.endpoint.as_deref(), &config)?;

    let busy = Arc::new(SpinnerSignal::new());
    let output = Arc::new(TerminalOutput);
    let mut conn = connect(&endpoint, !cli.no_session, busy.clone(), output.clone()).await?;

    // Single script mode
    let script = match (&cli.file, cli.eval) {
        (Some(path), _) => Some(read_script(path)?),
        (None, Some(inline)) => Some(inline),
        (None, None) => None,
    };
    if let Some(script) = script {
        conn.controller.submit(script).await;
        busy.settle().await;
        return Ok(());
    }

    let config_label = if db_path == ":memory:" {
        "ephemeral"
    } else {
        &db_path
    };
    print_banner(&BannerInfo {
        endpoint: &conn.endpoint,
        endpoint_source: &source.to_string(),
        session: &conn.session,
        config: config_label,
    });

    let registry = CommandRegistry::new();
    let editor = Editor::new();
    let mut runs = 0usize;

    // REPL: stdin on its own thread so Ctrl+C can end the session mid-read
    let mut lines = stdin_lines();

    loop {
        if editor.is_empty() {
            print!("\npetl> ");
        } else {
            print!("  ... ");
        }
        io::stdout().flush()?;

        let line = tokio::select! {
            result = lines.recv() => {
                match result {
                    Some(Ok(line)) => line,
                    None => {
                        // Ctrl+D (EOF)
                        println!();
                        break;
                    }
                    Some(Err(e)) => {
                        eprintln!("input error: {}", e);
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        };

        let info = SessionInfo {
            editor: &editor,
            endpoint: &conn.endpoint,
            args: "",
        };
        match registry.dispatch(&line, &info).await {
            CommandResult::NotACommand => editor.push_line(&line),
            CommandResult::Handled => {}
            CommandResult::Run => {
                runs += 1;
                let request = conn.controller.spawn_submit(editor.text());

                // The request is never aborted; Ctrl+C leaves the client instead
                tokio::select! {
                    joined = request => {
                        if let Err(e) = joined {
                            tracing::warn!(error = %e, "interpret task ended abnormally");
                        }
                        busy.settle().await;
                    }
                    _ = tokio::signal::ctrl_c() => {
                        eprint!("\x1b[2K\r");
                        println!("\ninterrupted");
                        break;
                    }
                }
            }
            CommandResult::StateChanged(StateChange::Endpoint(url)) => {
                match connect(&url, !cli.no_session, busy.clone(), output.clone()).await {
                    Ok(next) => {
                        if let Err(e) = config.set(ENDPOINT_KEY, &next.endpoint) {
                            tracing::warn!(error = %format!("{e:#}"), "could not save endpoint");
                        }
                        println!("  ✓ endpoint set to {} (session {})", next.endpoint, next.session);
                        conn = next;
                    }
                    Err(e) => eprintln!("  ✗ {e:#}"),
                }
            }
            CommandResult::StateChanged(StateChange::EndpointReset) => {
                if let Err(e) = config.remove(ENDPOINT_KEY) {
                    tracing::warn!(error = %format!("{e:#}"), "could not forget endpoint");
                }
                match connect(DEFAULT_ENDPOINT, !cli.no_session, busy.clone(), output.clone()).await {
                    Ok(next) => {
                        println!("  ✓ endpoint reset to {} (session {})", next.endpoint, next.session);
                        conn = next;
                    }
                    Err(e) => eprintln!("  ✗ {e:#}"),
                }
            }
            CommandResult::Quit => break,
        }
    }

    print_session_summary(runs);
    Ok(())
}
