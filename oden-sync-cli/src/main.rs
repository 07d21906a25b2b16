use std::process;

use clap::CommandFactory;
use is_terminal::IsTerminal;
use oden_sync::{Config, EpicSync};
use oden_sync_cli::cli::{Cli, Commands};
use oden_sync_cli::commands;
use oden_sync_cli::error::handle_cli_result;
use oden_sync_cli::exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_WARNING};
use oden_sync_cli::logging::{self, FileWriterGuard};
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    // Fast path for help
    let Some(command) = cli.command else {
        let _ = Cli::command().print_help();
        process::exit(EXIT_SUCCESS);
    };

    let is_mcp_mode = matches!(command, Commands::Serve) && !std::io::stdin().is_terminal();
    let log_level = logging::log_level(is_mcp_mode, cli.quiet, cli.debug, cli.verbose);
    init_tracing(is_mcp_mode, log_level);

    let config = Config::load(cli.project_root);

    let exit_code = match command {
        Commands::Serve => {
            tracing::info!("Starting MCP server");
            run_server(config).await
        }
        Commands::Status => {
            let sync = EpicSync::new(config);
            handle_cli_result(commands::run_status(&sync).await)
        }
        Commands::Sync { epic } => {
            tracing::info!("Syncing epic '{}'", epic);
            let sync = EpicSync::new(config);
            handle_cli_result(commands::run_sync(&sync, &epic).await)
        }
        Commands::Create {
            title,
            body,
            body_file,
            labels,
        } => {
            let sync = EpicSync::new(config);
            let result = match commands::read_body(body, body_file.as_deref()) {
                Ok(body) => commands::run_create(&sync, &title, &body, labels).await,
                Err(e) => Err(e),
            };
            handle_cli_result(result)
        }
    };

    process::exit(exit_code);
}

fn env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()))
}

fn init_tracing(is_mcp_mode: bool, log_level: Level) {
    if is_mcp_mode {
        // stdout belongs to the protocol
        let log_file = logging::mcp_log_path();
        if let Some(log_dir) = log_file.parent() {
            if let Err(e) = std::fs::create_dir_all(log_dir) {
                eprintln!("Failed to create log directory {}: {}", log_dir.display(), e);
            }
        }

        match std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
        {
            Ok(file) => {
                let shared = std::sync::Arc::new(std::sync::Mutex::new(file));
                tracing_subscriber::fmt()
                    .with_writer(move || FileWriterGuard::new(shared.clone()))
                    .with_env_filter(env_filter(log_level))
                    .with_ansi(false)
                    .init();
                return;
            }
            Err(e) => {
                eprintln!(
                    "Failed to open log file {}, using stderr: {}",
                    log_file.display(),
                    e
                );
            }
        }
    }

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter(log_level))
        .init();
}

async fn run_server(config: Config) -> i32 {
    use oden_sync::mcp::McpServer;
    use rmcp::serve_server;
    use rmcp::transport::io::stdio;
    use tokio_util::sync::CancellationToken;

    let server = McpServer::new(config);

    let ct = CancellationToken::new();
    let ct_clone = ct.clone();

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Shutdown signal received"),
            Err(e) => tracing::error!("Failed to listen for ctrl+c: {}", e),
        }
        ct_clone.cancel();
    });

    let running = match serve_server(server, stdio()).await {
        Ok(running) => running,
        Err(e) => {
            tracing::error!("MCP server failed to start: {}", e);
            return EXIT_ERROR;
        }
    };
    tracing::info!("MCP server started");

    tokio::select! {
        _ = ct.cancelled() => {
            tracing::info!("MCP server stopped by signal");
            EXIT_SUCCESS
        }
        quit = running.waiting() => {
            match quit {
                Ok(reason) => {
                    tracing::info!("MCP client disconnected: {:?}", reason);
                    EXIT_SUCCESS
                }
                Err(e) => {
                    tracing::error!("MCP server error: {}", e);
                    EXIT_WARNING
                }
            }
        }
    }
}
