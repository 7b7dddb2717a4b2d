use anyhow::Result;
use tracing::info;

use uni360_admin::{app, config, logging};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = config::Config::load()?;

    // Initialize logging
    logging::init_logging(&config.logging);

    info!("Starting UNI360 admin v{}", env!("CARGO_PKG_VERSION"));

    // Seed fixtures and build gateways
    let state = app::create_app(config)?;

    let users = state.user_list();
    let universities = state.university_list();
    let applications = state.application_list();
    let commissions = state.commission_list();
    let payments = state.payment_list();
    let documents = state.document_list();
    let appointments = state.appointment_list();

    tokio::try_join!(
        users.load(),
        universities.load(),
        applications.load(),
        commissions.load(),
        payments.load(),
        documents.load(),
        appointments.load(),
    )?;

    let (users, universities, applications, commissions, payments) = (
        users.snapshot().await,
        universities.snapshot().await,
        applications.snapshot().await,
        commissions.snapshot().await,
        payments.snapshot().await,
    );
    let (documents, appointments) = (documents.snapshot().await, appointments.snapshot().await);
    info!(total = users.pagination.total, summary = ?users.summary, "Users loaded");
    info!(total = universities.pagination.total, summary = ?universities.summary, "Universities loaded");
    info!(total = applications.pagination.total, summary = ?applications.summary, "Applications loaded");
    info!(total = commissions.pagination.total, summary = ?commissions.summary, "Commissions loaded");
    info!(total = payments.pagination.total, summary = ?payments.summary, "Payments loaded");
    info!(total = documents.pagination.total, summary = ?documents.summary, "Documents loaded");
    info!(total = appointments.pagination.total, summary = ?appointments.summary, "Appointments loaded");

    let overview = state.dashboard().overview().await?;
    let overview = serde_json::to_string(&overview)?;
    info!(%overview, "Dashboard overview");

    Ok(())
}
