//! Browse a OneDrive drive from the command line
//!
//! Run with:
//! ```bash
//! ONEDRIVE_ACCESS_TOKEN=... cargo run -p provider-onedrive --example browse_drive -- <drive-id> [query]
//!
//! # JSON logs with request tracing
//! RUST_LOG=provider_onedrive=debug cargo run -p provider-onedrive --example browse_drive -- <drive-id>
//! ```

use bridge_desktop::StaticAccountManager;
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use core_runtime::AddonConfig;
use provider_onedrive::{ContentType, Item, ItemOptions, ItemRef, OneDriveAddon, PageCallback};
use std::env;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let mut config = LoggingConfig::default().with_format(LogFormat::Compact);
    if let Ok(filter) = env::var("RUST_LOG") {
        config = config.with_filter(filter);
    }
    init_logging(config).expect("Failed to initialize logging");

    let args: Vec<String> = env::args().collect();
    let Some(drive_id) = args.get(1) else {
        eprintln!("usage: browse_drive <drive-id> [query]");
        return;
    };
    let token = env::var("ONEDRIVE_ACCESS_TOKEN").expect("ONEDRIVE_ACCESS_TOKEN must be set");

    let config = AddonConfig::builder()
        .account_manager(Arc::new(StaticAccountManager::with_default_token(token)))
        .build()
        .expect("Failed to build addon config");
    let addon = OneDriveAddon::new(config);

    for folder in addon.get_custom_drive_folders(ContentType::Video) {
        info!(id = folder.string_id(), path = folder.path(), "{}", folder.display_name());
    }

    let mut print_page = |items: &[Item]| {
        for item in items {
            let kind = if item.is_folder() { "dir " } else { "file" };
            println!("{} {:<40} {}", kind, item.name, item.id);
        }
    };
    let callback: &mut PageCallback<'_> = &mut print_page;

    let result = match args.get(2) {
        Some(query) => addon.search(drive_id, query, None, Some(callback)).await,
        None => {
            addon
                .get_folder_items(drive_id, &ItemRef::root(), Some(callback))
                .await
        }
    };

    match result {
        Ok(items) => info!(count = items.len(), "Done"),
        Err(e) => {
            error!(error = %e, "Request failed");
            return;
        }
    }

    match addon
        .get_item(drive_id, &ItemRef::root(), ItemOptions::default())
        .await
    {
        Ok(Some(root)) => info!(children = ?root.folder.map(|f| f.child_count), "Drive root"),
        Ok(None) => {}
        Err(e) => error!(error = %e, "Root lookup failed"),
    }
}
