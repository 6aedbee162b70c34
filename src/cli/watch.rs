//! Watch command implementation

use crate::cli::output::render_dashboard;
use crate::cli::{load_config_with_overrides, WatchArgs};
use crate::dashboard::{Dashboard, SharedDashboard};
use crate::feed;
use crate::logging::init_tracing;
use crate::refresh::RefreshLoop;
use std::io::Write;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// How often an elapsed insights highlight is checked
const HIGHLIGHT_POLL: Duration = Duration::from_millis(250);

const DEFAULT_WIDTH: usize = 100;

/// What a typed command did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Quit,
    Redraw,
    /// Nothing bound to the input
    Unknown(String),
    /// Blank line
    Ignored,
}

/// Apply one line of user input to the dashboard.
pub fn handle_command(dashboard: &mut Dashboard, line: &str, now: Instant) -> CommandOutcome {
    let line = line.trim();
    if line.is_empty() {
        return CommandOutcome::Ignored;
    }
    if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
        return CommandOutcome::Quit;
    }

    let Some(trigger) = dashboard.resolve_input(line) else {
        return CommandOutcome::Unknown(line.to_string());
    };
    match dashboard.handle(trigger, now) {
        Ok(dispatch) => {
            tracing::debug!(input = line, ?dispatch, "Input handled");
            CommandOutcome::Redraw
        }
        Err(e) => {
            tracing::warn!(input = line, error = %e, "Navigation failed");
            CommandOutcome::Redraw
        }
    }
}

/// Apply one read from stdin. End of input quits, like `q`.
pub fn handle_input(
    dashboard: &mut Dashboard,
    line: std::io::Result<Option<String>>,
    now: Instant,
) -> CommandOutcome {
    match line {
        Ok(Some(line)) => handle_command(dashboard, &line, now),
        Ok(None) => {
            tracing::debug!("stdin closed");
            CommandOutcome::Quit
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read input");
            CommandOutcome::Quit
        }
    }
}

fn terminal_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|c| c.parse().ok())
        .unwrap_or(DEFAULT_WIDTH)
}

async fn redraw(dashboard: &SharedDashboard, notice: Option<&str>) {
    let frame = {
        let dashboard = dashboard.lock().await;
        render_dashboard(&dashboard, Instant::now(), terminal_width())
    };
    let mut stdout = std::io::stdout().lock();
    // Clear screen and home the cursor
    let _ = writeln!(stdout, "\x1B[2J\x1B[H{}", frame);
    if let Some(notice) = notice {
        let _ = writeln!(stdout, "{}", notice);
    }
    let _ = write!(stdout, "> ");
    let _ = stdout.flush();
}

/// Wait for SIGINT or SIGTERM, then cancel.
async fn shutdown_signal(cancel_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
        _ = cancel_token.cancelled() => return,
    }

    cancel_token.cancel();
}

/// Main watch command handler
pub async fn run_watch(args: WatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load and merge configuration
    let mut config = load_config_with_overrides(&args.source)?;
    if args.no_synthesis {
        config.refresh.synthesize_alerts = false;
    }

    // 2. Initialize tracing
    init_tracing(&config.logging)?;
    tracing::debug!(?config, "Loaded configuration");

    // 3. Build the data source and dashboard
    let source = feed::from_config(&config.source)?;
    let mut dashboard = Dashboard::new(&config.refresh);
    dashboard.init()?;
    let dashboard = dashboard.shared();

    // 4. Start the refresh loop
    let cancel_token = CancellationToken::new();
    let (events_tx, mut events_rx) = broadcast::channel(64);
    let scheduler = RefreshLoop::new(dashboard.clone(), source, config.refresh.clone())
        .with_events(events_tx)
        .start(cancel_token.clone());

    tokio::spawn(shutdown_signal(cancel_token.clone()));

    redraw(&dashboard, None).await;

    // 5. Input and redraw loop
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut highlight_tick = tokio::time::interval(HIGHLIGHT_POLL);

    loop {
        tokio::select! {
            _ = cancel_token.cancelled() => break,
            event = events_rx.recv() => match event {
                Ok(event) => {
                    tracing::trace!(?event, "Redrawing");
                    redraw(&dashboard, None).await;
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::debug!(missed, "Redraw events lagged");
                    redraw(&dashboard, None).await;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            _ = highlight_tick.tick() => {
                let expired = dashboard.lock().await.tick(Instant::now());
                if expired {
                    redraw(&dashboard, None).await;
                }
            }
            line = lines.next_line() => {
                let outcome = {
                    let mut dashboard = dashboard.lock().await;
                    handle_input(&mut dashboard, line, Instant::now())
                };
                match outcome {
                    CommandOutcome::Quit => break,
                    CommandOutcome::Redraw | CommandOutcome::Ignored => {
                        redraw(&dashboard, None).await;
                    }
                    CommandOutcome::Unknown(input) => {
                        let notice = format!("Unknown command: {}", input);
                        redraw(&dashboard, Some(&notice)).await;
                    }
                }
            }
        }
    }

    // 6. Cleanup
    cancel_token.cancel();
    scheduler.shutdown().await;
    println!();
    tracing::info!("Dashboard stopped");
    Ok(())
}
