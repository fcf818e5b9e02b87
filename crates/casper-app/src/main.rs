mod boot;
mod cli;
mod render;

use std::io::Write;

use casper_chat::{ChatError, ChatSession};
use casper_config::{CasperConfig, ResolvedSecrets};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use crate::render::Renderer;

/// Load environment variables from a `.env` file (KEY=VALUE lines).
///
/// Variables already set in the environment are left alone.
fn load_dotenv() {
    let Ok(contents) = std::fs::read_to_string(".env") else {
        return;
    };
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if std::env::var(key).is_err() {
                std::env::set_var(key, value);
            }
        }
    }
}

fn init_logging(directive: &str) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                directive
                    .parse()
                    .unwrap_or_else(|_| "casper=info".parse().unwrap()),
            ),
        )
        .init();
}

fn load(args: &cli::Args) -> casper_common::Result<CasperConfig> {
    let config = match &args.config {
        Some(path) => casper_config::load_config_from(std::path::Path::new(path))?,
        None => casper_config::load_config()?,
    };
    Ok(config)
}

fn main() {
    // Environment edits must happen before the runtime spawns worker threads.
    load_dotenv();
    let args = cli::parse();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("casper: failed to start async runtime: {e}");
            std::process::exit(1);
        }
    };
    runtime.block_on(run(args));
}

async fn run(args: cli::Args) {
    let loaded = load(&args);

    let log_directive = args.log_level.clone().unwrap_or_else(|| match &loaded {
        Ok(config) => config.logging.filter.clone(),
        Err(_) => "casper=info".to_string(),
    });
    init_logging(&log_directive);

    tracing::info!("Casper v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut notices = Vec::new();
    let config = loaded.unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        notices.push(format!("Config load failed, using defaults: {e}"));
        CasperConfig::default()
    });

    if args.print_config {
        println!("{}", casper_config::config_to_json(&config));
        return;
    }

    let secrets = casper_config::resolve_secrets(&config).unwrap_or_else(|e| {
        tracing::warn!("Secret resolution failed: {e}");
        notices.push(format!("Error loading secrets: {e}"));
        ResolvedSecrets::default()
    });

    let boot = match boot::build_session(&config, &secrets).await {
        Ok(boot) => boot,
        Err(e) => {
            tracing::error!("Startup failed: {e}");
            eprintln!("casper: {e}");
            std::process::exit(1);
        }
    };
    notices.extend(boot.notices);
    let mut session = boot.session;

    let mut renderer = Renderer::new(config.persona.name.clone());
    let mut stdout = std::io::stdout();
    for notice in &notices {
        let _ = renderer.notice(notice, &mut stdout);
    }
    let _ = renderer.render(session.conversation(), &mut stdout);

    if let Some(message) = args.message {
        run_turn(&mut session, &mut renderer, &message).await;
        return;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        let _ = stdout.flush();

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!("Failed to read input: {e}");
                break;
            }
        };
        if matches!(line.trim(), "/quit" | "/exit") {
            break;
        }
        run_turn(&mut session, &mut renderer, &line).await;
    }

    tracing::info!(session = %session.id(), "Shutdown complete");
}

/// Submit one message, then redraw and surface any errors.
async fn run_turn(session: &mut ChatSession, renderer: &mut Renderer, text: &str) {
    let result = session.submit(text).await;
    let mut stdout = std::io::stdout();
    let _ = renderer.render(session.conversation(), &mut stdout);

    match result {
        Ok(report) => {
            for failure in report.sink_failures {
                let _ = renderer.notice(
                    &format!("Error saving chat ({}): {}", failure.sink, failure.error),
                    &mut stdout,
                );
            }
        }
        Err(ChatError::EmptyMessage) => {}
        Err(e) => {
            let _ = renderer.notice(&format!("Error: {e}"), &mut stdout);
        }
    }
}
