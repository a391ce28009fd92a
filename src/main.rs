use anyhow::Result;
use std::sync::Arc;
use tokio::sync::Mutex;

use pantry::config::Config;
use pantry::constants::{SUCCESS_SYNC_CLEAN, WARN_SYNC_ISSUES};
use pantry::inventory::InventoryService;
use pantry::logger;
use pantry::remote::create_remote_store;
use pantry::session::{is_fallback_id, DbSettingsStore, NoIdentityProvider, SessionService};
use pantry::storage::LocalStorage;
use pantry::sync::{SyncService, SyncStatus};

const USAGE: &str = "Usage: pantry [sync|status|init-config]";

#[tokio::main]
async fn main() -> Result<()> {
    let command = std::env::args().nth(1).unwrap_or_else(|| "status".to_string());

    if command == "init-config" {
        return Config::generate_default_config(Config::get_default_config_path()?);
    }
    if command != "sync" && command != "status" {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    }

    let config = Config::load()?;
    logger::setup_logging(&config.logging)?;

    let storage = Arc::new(Mutex::new(LocalStorage::new(&config.storage).await?));
    let session = SessionService::new(
        Arc::new(DbSettingsStore::new(storage.clone())),
        Arc::new(NoIdentityProvider),
    );
    let user_id = session.resolve_user_id().await?;

    match command.as_str() {
        "sync" => {
            let remote = create_remote_store(&config.remote)?;
            let sync_service = SyncService::new(storage, remote);
            match sync_service.reconcile(&user_id).await {
                SyncStatus::Completed(report) if report.is_success() => {
                    println!("{}: {}", SUCCESS_SYNC_CLEAN, report.summary());
                }
                SyncStatus::Completed(report) => {
                    println!("{}: {}", WARN_SYNC_ISSUES, report.summary());
                    for issue in report.issues() {
                        println!("  {}", issue);
                    }
                }
                other => println!("{:?}", other),
            }
        }
        _ => {
            let inventory = InventoryService::new(storage, config.inventory.clone());
            let summary = inventory.expiry_summary(&user_id).await?;
            let account = if is_fallback_id(&user_id) { "local only" } else { "cloud" };
            println!("User: {} ({})", user_id, account);
            println!(
                "{} item(s): {} expired, {} expire today, {} expiring within {} days, {} fresh",
                summary.total(),
                summary.expired,
                summary.expires_today,
                summary.expiring_soon,
                config.inventory.expiring_soon_days,
                summary.fresh
            );
            for item in inventory.get_expiring_items(&user_id, config.inventory.expiring_soon_days).await? {
                println!(
                    "  {} - {} {} ({})",
                    item.name,
                    pantry::utils::quantity::format_amount(item.quantity),
                    item.unit,
                    pantry::utils::datetime::format_expiry(&item.expiration_date, pantry::utils::datetime::today())
                );
            }
        }
    }

    Ok(())
}
