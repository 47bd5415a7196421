//! `clinic` command-line front-end

mod cli;
mod commands;
mod settings;

use anyhow::Context;
use clinic_client::HttpClient;
use clinic_session::{Actions, FileStore, Session};
use settings::{Overrides, Settings};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("clinic=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("clinic=info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Build the client and restore the session; the client only carries the
/// token that came back with the restored user
fn connect(settings: &Settings) -> anyhow::Result<(Arc<HttpClient>, Actions)> {
    let client = Arc::new(HttpClient::new(&settings.client).context("building HTTP client")?);
    let store = Arc::new(FileStore::new(&settings.session_file));
    let session = Arc::new(Session::new(client.clone(), store));
    session.initialize().context("restoring session")?;
    client.set_token(session.token());

    let actions = Actions::new(session, client.clone(), client.clone());
    Ok((client, actions))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli::build().get_matches();
    init_tracing(matches.get_flag("verbose"));

    let overrides = Overrides {
        config: matches.get_one::<PathBuf>("config").cloned(),
        api_url: matches.get_one::<String>("api-url").cloned(),
        session_file: matches.get_one::<PathBuf>("session-file").cloned(),
    };
    let settings = Settings::from_env(&overrides)?;

    let (_, actions) = connect(&settings)?;
    commands::run(&actions, &matches).await
}
