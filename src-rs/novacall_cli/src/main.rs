mod cli;
mod render;
mod repl;
mod watch;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use novacall_rs::helpers::build_api;
use novacall_rs::App;

use cli::{Cli, Command};
use repl::REPL;

const DEFAULT_LOG_FILTER: &str = "warn,novacall_rs=info,novacall_cli=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so they stay out of the rendered transcript.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = cli.client_config();
    let api = build_api(&config).context("invalid client configuration")?;
    tracing::debug!(backend = %api.base_url(), "client ready");
    let mut app = App::new(Arc::new(api), config.poll_settings());

    match cli.command {
        None | Some(Command::Repl) => {
            let mut repl = REPL::new(config, app);
            repl.run().await;
        }
        Some(Command::Create(args)) => {
            args.apply(app.form_mut());
            render::creating();
            let id = app.submit().await?;
            render::created(&id);
            if !args.no_watch {
                if let Some(viewer) = app.viewer() {
                    watch::follow(viewer).await;
                }
            }
            app.clear().await;
        }
        Some(Command::Watch { call_id }) => {
            app.set_created_id(&call_id).await;
            match app.viewer() {
                Some(viewer) => {
                    watch::follow(viewer).await;
                }
                None => anyhow::bail!("call id cannot be empty"),
            }
            app.clear().await;
        }
    }
    Ok(())
}
