use budget_buddy::{
    config::{database, settings},
    core::{budget, profile, report},
    errors::{Error, Result},
    gateway::SeaOrmGateway,
};
use chrono::Utc;
use dotenvy::dotenv;
use std::env;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, non-fatal since env vars can be set externally
    dotenv().ok();

    // 3. Load the application configuration
    let app_config = settings::load_app_configuration()
        .inspect_err(|e| error!("Failed to load configuration: {e}"))?;
    info!("Successfully processed application configuration.");

    // 4. Open the database and make sure the tables exist
    database::prepare_sqlite_path(&app_config.database_url)?;
    let db = database::create_connection(&app_config.database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {e}"))?;

    // 5. Session start: make sure the profile exists, then seed its categories
    let user_id = env::var("BUDGET_BUDDY_USER_ID").map_err(|_| Error::Config {
        message: "BUDGET_BUDDY_USER_ID is not set".to_string(),
    })?;
    let email = env::var("BUDGET_BUDDY_USER_EMAIL").unwrap_or_default();
    let user = profile::ensure_profile(&db, &user_id, &email).await?;
    budget::seed_default_categories(&db, &user.id, &app_config.categories).await?;

    // 6. Summarise the dashboard window
    let gateway = SeaOrmGateway::new(db);
    let summary = report::load_dashboard(&gateway, &user.id, &app_config, Utc::now()).await?;

    info!(
        "{}: income {}, expenses {}, balance {} (savings rate {})",
        user.display_name,
        report::format_currency(summary.balance.income),
        report::format_currency(summary.balance.expenses),
        report::format_currency(summary.balance.balance),
        report::format_percentage(summary.savings_rate),
    );
    if let Some(top) = &summary.top_category {
        info!("Top spending category: {top}");
    }
    for (label, total) in summary.expenses_by_category.iter() {
        info!("  {label}: {}", report::format_currency(total));
    }
    for alert in &summary.alerts {
        warn!(
            "{} is {:?}: {}",
            alert.category_name,
            alert.status,
            report::format_budget_bar(alert.spent, alert.limit, None)
        );
    }

    Ok(())
}
