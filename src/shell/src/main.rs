use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use log::{error, info};
use smarthome_ui::{config::AppConfig, http_client::ReqwestTransport, runtime::Shell};
use std::io::Write;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        error!("application error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    initialize();

    let config = AppConfig::get().context("failed to load configuration")?;
    info!(
        "backend: {} (push channel: {})",
        config.api.base_url, config.realtime.url
    );

    let transport = ReqwestTransport::new(config)?;
    let (shell, inbox) = Shell::new(transport, config.clone(), Box::new(std::io::stdout()));

    shell.run(inbox).await
}

fn initialize() {
    log_panics::init();

    let mut builder = if cfg!(debug_assertions) {
        Builder::from_env(Env::default().default_filter_or("debug"))
    } else {
        Builder::from_env(Env::default().default_filter_or("info"))
    };

    builder.format(|f, record| match record.level() {
        log::Level::Error => writeln!(f, "error: {}", record.args()),
        _ => writeln!(f, "{}", record.args()),
    });

    // stdout belongs to the dashboard
    builder.target(Target::Stderr).init();

    info!(
        "module version: {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_SHORT_REV")
    );
}
