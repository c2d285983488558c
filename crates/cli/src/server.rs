//! Server bootstrap: configuration, migrations, state assembly, listen loop.

use std::sync::Arc;

use error::{AppError, Result};
use migration::MigratorTrait;
use server::{AppState, OtpFlowConfig, SmtpConfig, email::SmtpMailer};
use tracing::info;

use crate::config;

/// Start the API server on the given address.
///
/// Runs pending migrations first, then assembles the application state from
/// the environment and serves until the process is stopped.
pub async fn serve(host: &str, port: u16) -> Result<()> {
    let db_config = config::DatabaseConfig::from_env()?;
    let db = migration::connect_to_database(&config::build_database_url(&db_config)).await?;

    migration::Migrator::up(&db, None).await?;
    info!("Migrations applied");

    let smtp = SmtpConfig::from_env()?;
    let mailer = Arc::new(SmtpMailer::new(&smtp)?);

    let state = AppState {
        db,
        tokens: config::token_config_from_env()?,
        reset: OtpFlowConfig::reset_from_env()?,
        verification: OtpFlowConfig::verification_from_env()?,
        sealing_key: config::sealing_key_from_env()?,
        mailer,
        email_from: smtp.from_address.clone(),
    };

    let app = server::create_router(state);

    let addr = config::parse_socket_addr(host, port)?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::config(format!("Cannot bind {addr}: {e}")))?;

    info!(%addr, "janus API listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::internal(format!("Server terminated: {e}")))
}
