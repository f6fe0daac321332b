//! xo_lobby - server and demo entry point.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;
use xo_lobby::{
    ChatScope, ParticipantId, Request, Response, SequentialGameIds, ServerConfig, SessionManager,
    dispatch, router, spawn_sweeper,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,xo_lobby=debug")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { config, host, port } => run_server(config, host, port).await,
        Command::Demo => run_demo(),
    }
}

/// Run the HTTP request server
#[instrument]
async fn run_server(
    config: Option<std::path::PathBuf>,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    let config = match config {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    }
    .with_env_overrides()?
    .with_cli_overrides(host, port);

    let manager = config.session_manager();
    if let Some(sweep) = config.sweep() {
        spawn_sweeper(manager.clone(), *sweep);
    }

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!(address = %address, exclusivity = ?config.exclusivity(), "Listening");

    axum::serve(listener, router(manager)).await?;
    Ok(())
}

/// Plays host 1 against joiner 2 to an X win along the top row.
fn run_demo() -> Result<()> {
    let manager = SessionManager::with_ids(SequentialGameIds::new());
    let chat = ChatScope::new(1);
    let host = ParticipantId::new(1);
    let joiner = ParticipantId::new(2);

    let Response::Invited { game_id } = dispatch(&manager, Request::StartGame { chat, host })?
    else {
        anyhow::bail!("StartGame did not produce an invitation");
    };
    let mut requests = vec![Request::JoinGame {
        chat,
        game_id: game_id.clone(),
        joiner,
    }];
    for (requester, cell) in [(host, 0), (joiner, 3), (host, 1), (joiner, 4), (host, 2)] {
        requests.push(Request::MakeMove {
            chat,
            game_id: game_id.clone(),
            requester,
            cell,
        });
    }

    for request in requests {
        if let Response::Game(game) = dispatch(&manager, request)? {
            info!(status = ?game.status(), next = %game.current_mark(), "\n{}", game.board());
        }
    }
    info!(stats = ?manager.stats(), "Demo finished");
    Ok(())
}
