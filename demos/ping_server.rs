//! Minimal server wired with the logware middleware pair.
//!
//! ```text
//! cargo run --example ping_server -- --mode production
//! cargo run --example ping_server -- --config logware.toml --watch
//! ```
//!
//! `GET /ping` answers pong; `GET /boom` panics so the recovery layer can be
//! watched doing its job.

use axum::{middleware, routing::get, Router};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use logware::config::{self, ConfigWatcher};
use logware::Mode;

#[derive(Parser, Debug)]
#[command(about = "Demo server for the logware middleware pair")]
struct Args {
    /// Bind address.
    #[arg(long, default_value = "127.0.0.1:8080")]
    listen: SocketAddr,

    /// Logging mode (`debug` or `production`) when no config file is given.
    #[arg(long, default_value = "debug")]
    mode: String,

    /// TOML configuration file; overrides --mode and configures the notifier.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Watch the config file and re-apply changes.
    #[arg(long)]
    watch: bool,
}

async fn ping() -> &'static str {
    "pong"
}

async fn boom() -> &'static str {
    panic!("boom");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut _watch_handle = None;
    match &args.config {
        Some(path) => {
            let cfg = config::load_config(path)?;
            config::apply(&cfg);

            if args.watch {
                let (watcher, mut updates) = ConfigWatcher::new(path);
                _watch_handle = Some(watcher.run()?);
                tokio::spawn(async move {
                    while let Some(cfg) = updates.recv().await {
                        config::apply(&cfg);
                        logware::info!("configuration reloaded");
                    }
                });
            }
        }
        None => logware::set_mode(args.mode.parse::<Mode>()?),
    }

    let app = Router::new()
        .route("/ping", get(ping))
        .route("/boom", get(boom))
        .layer(middleware::from_fn(logware::panic_recovery))
        .layer(middleware::from_fn(logware::request_logger));

    let listener = tokio::net::TcpListener::bind(args.listen).await?;
    logware::info!("listening on {}", listener.local_addr()?);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
