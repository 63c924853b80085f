//! shell-relay binary entry point.

use std::io::Write;
use std::process::ExitCode;

use shell_relay::cli;
use shell_relay::config::Config;
use shell_relay::session::{drive, InputEvent, LineSurface, SurfaceEvent};
use shell_relay::{logging, ExecutionContext, HttpTransport, ShellClient, TerminalSession};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let args = match cli::parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("run with --help for usage");
            return ExitCode::from(2);
        }
    };

    if args.help {
        cli::print_help();
        return ExitCode::SUCCESS;
    }
    if args.version {
        cli::print_version();
        return ExitCode::SUCCESS;
    }

    let config = match Config::load(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(2);
        }
    };

    // Another subscriber may already be installed when embedded.
    logging::init_with_filter(config.log_filter()).ok();
    info!("shell-relay v{}", env!("CARGO_PKG_VERSION"));

    let transport = match HttpTransport::new(&config.endpoint.url) {
        Ok(transport) => transport,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!(url = %config.endpoint.url, "using shell endpoint");
    let client = ShellClient::with_precedence(transport, config.session.stream_precedence);

    match args.execute.as_deref() {
        Some(command) => run_once(&client, command).await,
        None => run_interactive(client, &config).await,
    }
}

async fn run_once(client: &ShellClient<HttpTransport>, command: &str) -> ExitCode {
    let mut context = ExecutionContext::new();
    match client.execute_collected(&mut context, command).await {
        Ok(output) => {
            let mut stdout = std::io::stdout();
            if stdout
                .write_all(output.text.as_bytes())
                .and_then(|_| stdout.flush())
                .is_err()
            {
                return ExitCode::FAILURE;
            }
            debug!(exit_code = ?output.exit_code, "command finished");
            ExitCode::from(output.status_code())
        }
        Err(e) => {
            eprintln!("shell exec failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_interactive(client: ShellClient<HttpTransport>, config: &Config) -> ExitCode {
    let (tx, rx) = mpsc::channel(64);

    let interrupts = tx.downgrade();
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            let Some(tx) = interrupts.upgrade() else {
                break;
            };
            if tx.send(SurfaceEvent::Interrupt).await.is_err() {
                break;
            }
        }
    });

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if !line.is_empty()
                        && tx
                            .send(SurfaceEvent::Input(InputEvent::Paste(line)))
                            .await
                            .is_err()
                    {
                        break;
                    }
                    if tx
                        .send(SurfaceEvent::Input(InputEvent::Enter))
                        .await
                        .is_err()
                    {
                        break;
                    }
                }
                Ok(None) => {
                    debug!("stdin closed");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "failed to read stdin");
                    break;
                }
            }
        }
    });

    let mut session = TerminalSession::with_options(client, config.session_options());
    let mut surface = LineSurface::new(std::io::stdout());
    drive(&mut session, rx, &mut surface).await;

    println!();
    info!(commands = session.history().len(), "session ended");
    ExitCode::SUCCESS
}
