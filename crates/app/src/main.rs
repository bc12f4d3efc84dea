//! SMC Session - Main Entry Point
//!
//! Logs in with the settings from `~/.smcrc` or the `SMC_*` environment
//! variables, prints what the server advertised, visits every domain given
//! on the command line and logs out again.
//!
//! ```bash
//! SMC_ADDRESS=https://smc:8082 SMC_API_KEY=... smc-session "Shared Domain" Eng
//! ```

use smc_application::Session;
use smc_domain::LoginParams;
use smc_infrastructure::{
    EnvConfigSource, FileConfigSource, ReqwestTransportFactory, init_stream_logger,
};
use tracing::Level;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_stream_logger(Level::INFO)?;

    let domains: Vec<String> = std::env::args().skip(1).collect();

    let mut session = Session::new(ReqwestTransportFactory::new())
        .with_config_source(FileConfigSource::new())
        .with_config_source(EnvConfigSource::from_env());

    let mut params = LoginParams::default();
    if let Some(first) = domains.first() {
        params = params.with_domain(first.clone());
    }
    session.login(params).await?;

    tracing::info!(
        "Logged in to {} (API {})",
        session.url().unwrap_or_default(),
        session
            .api_version()
            .map(ToString::to_string)
            .unwrap_or_default()
    );

    for domain in domains.iter().skip(1) {
        session.switch_domain(domain).await?;
    }

    for domain in session.domains() {
        println!("domain: {domain}");
    }
    println!("entry points: {}", session.entry_points()?.len());
    if let Some(user) = session.current_user().await? {
        println!("current user: {user}");
    }

    let report = session.logout().await;
    for (domain, outcome) in report.outcomes() {
        println!("logout {domain}: {outcome}");
    }

    Ok(())
}
