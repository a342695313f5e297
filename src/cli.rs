use crate::app_state::AppState;
use crate::config::{LoggerConfig, ProcessEnv};
use crate::config_loader::ConfigLoader;
use crate::editor_link::editor_url;
use crate::log_capture::CaptureBuffer;
use crate::log_event::LogArg;
use crate::log_sink::LogLevel;
use crate::logger::Logger;
use crate::logweb::build_relay_router;
use crate::relay::HttpRelay;
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level CLI interface for the log terminal
#[derive(Parser)]
#[command(
    name = "log_terminal",
    version = "0.1.0",
    about = "Unified client/server log terminal with browser log relay"
)]
pub struct Cli {
    /// Logger config file (defaults to $LOG_TERMINAL_CONFIG or ./log-terminal.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the relay endpoint and print relayed client logs
    Serve {
        /// Host/IP to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port to bind
        #[arg(long, default_value_t = 3000)]
        port: u16,
        /// Mount the in-memory test-log capture endpoint
        #[arg(long)]
        capture: bool,
    },

    /// Log one message as a client and relay it to a server
    Emit {
        /// Server origin the relay endpoint is resolved against
        #[arg(long, default_value = "http://127.0.0.1:3000")]
        server: String,
        #[arg(short, long, default_value = "info")]
        level: String,
        #[arg(short, long)]
        message: String,
        /// Auxiliary value; parsed as JSON, otherwise sent as a string. Repeatable.
        #[arg(short, long = "arg")]
        args: Vec<String>,
        /// Page path reported as metadata.pathname
        #[arg(long)]
        pathname: Option<String>,
    },

    /// Print the resolved logger configuration
    Config {
        /// Print JSON instead of TOML
        #[arg(long)]
        json: bool,
    },

    /// Print an editor deep link for a file and line
    EditorLink {
        /// Editor identifier (defaults to the configured editor)
        #[arg(long)]
        editor: Option<String>,
        #[arg(long)]
        file: String,
        #[arg(long)]
        line: u32,
    },
}

fn config_loader(path: Option<PathBuf>) -> ConfigLoader {
    match path {
        Some(path) => ConfigLoader::new().with_file(path),
        None => ConfigLoader::discover(&ProcessEnv),
    }
}

fn parse_arg(raw: &str) -> LogArg {
    match serde_json::from_str(raw) {
        Ok(value) => LogArg::Value(value),
        Err(_) => LogArg::from(raw),
    }
}

pub fn dispatch(cli: Cli) -> anyhow::Result<()> {
    let loader = config_loader(cli.config);

    match cli.command {
        Commands::Serve {
            host,
            port,
            capture,
        } => {
            let addr = format!("{host}:{port}");
            let mut state = AppState::from_process_env(loader.clone());
            if capture {
                state = state.with_capture(Arc::new(CaptureBuffer::new()));
            }
            let endpoint = state.endpoint.clone();
            let app = build_relay_router(Arc::new(state));
            let logger = Logger::server(loader.resolve());

            let rt = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("Failed to build Tokio runtime")?;

            rt.block_on(async move {
                let socket_addr: std::net::SocketAddr = addr
                    .parse()
                    .with_context(|| format!("Invalid bind address {addr}"))?;
                let listener = tokio::net::TcpListener::bind(socket_addr)
                    .await
                    .with_context(|| format!("Failed to bind {addr}"))?;
                logger.info(
                    "Log relay listening",
                    &[LogArg::from(format!("http://{addr}{endpoint}"))],
                );
                if capture {
                    logger.info("Test-log capture enabled", &[]);
                }
                axum::serve(listener, app).await.context("Server error")
            })
        }
        Commands::Emit {
            server,
            level,
            message,
            args,
            pathname,
        } => {
            let level: LogLevel = level.parse().map_err(anyhow::Error::msg)?;
            let args: Vec<LogArg> = args.iter().map(|a| parse_arg(a)).collect();

            let mut logger = Logger::client(loader.resolve(), HttpRelay::new(server));
            if let Some(pathname) = pathname {
                logger = logger.with_pathname(pathname);
            }

            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("Failed to build Tokio runtime")?;

            rt.block_on(async {
                logger.at_level(level, &message, &args);
                logger.flush().await;
            });
            Ok(())
        }
        Commands::Config { json } => {
            let config: LoggerConfig = loader.resolve();
            let rendered = if json {
                serde_json::to_string_pretty(&config)?
            } else {
                toml::to_string_pretty(&config)?
            };
            println!("{rendered}");
            Ok(())
        }
        Commands::EditorLink { editor, file, line } => {
            let editor = editor.unwrap_or_else(|| loader.resolve().editor);
            println!("{}", editor_url(&editor, &file, line));
            Ok(())
        }
    }
}
