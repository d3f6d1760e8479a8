//! OneDrive addon
//!
//! Translates host browse, search and lookup requests into Graph calls and
//! maps the results onto host [`Item`]s.
//!
//! # Example
//!
//! ```ignore
//! use core_runtime::AddonConfig;
//! use provider_onedrive::{ItemRef, OneDriveAddon};
//!
//! let config = AddonConfig::builder()
//!     .account_manager(accounts)
//!     .build()?;
//! let addon = OneDriveAddon::new(config);
//!
//! let items = addon.get_folder_items("b!t18F8ybsHUq1z3LT", &ItemRef::root(), None).await?;
//! ```

use core_runtime::AddonConfig;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::cache::MetadataCache;
use crate::client::{DriveSession, GraphClient};
use crate::error::{OneDriveError, Result};
use crate::folders::{is_virtual_folder, ContentType, CustomFolder, ItemOptions, ItemRef};
use crate::item::{extract_item, get_extension, remove_extension, Item};
use crate::types::{DriveItem, DriveItemPage};

/// Extensions kept when looking for subtitles next to a video
const SUBTITLE_EXTENSIONS: [&str; 3] = ["srt", "sub", "sbv"];

/// Receives each page of items as soon as it has been mapped
pub type PageCallback<'a> = dyn FnMut(&[Item]) + Send + 'a;

/// OneDrive browsing backend for the media-center host
#[derive(Debug)]
pub struct OneDriveAddon {
    client: GraphClient,
    cache: MetadataCache,
    expand_thumbnails: bool,
    cancellation: CancellationToken,
}

impl OneDriveAddon {
    pub fn new(config: AddonConfig) -> Self {
        let client = GraphClient::new(
            config.http_client,
            config.account_manager,
            config.graph_base_url,
            config.request_timeout,
        );
        let cache = MetadataCache::new(
            config.cache,
            config.addon_id,
            config.item_ttl,
            config.listing_ttl,
        );

        Self {
            client,
            cache,
            expand_thumbnails: config.expand_thumbnails,
            cancellation: CancellationToken::new(),
        }
    }

    /// Share a cancellation token with the host
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn client(&self) -> &GraphClient {
        &self.client
    }

    pub fn get_custom_drive_folders(&self, content_type: ContentType) -> Vec<CustomFolder> {
        CustomFolder::for_content(content_type)
    }

    /// List the children of an item or named folder, following every page
    #[instrument(skip(self, on_page))]
    pub async fn get_folder_items(
        &self,
        drive_id: &str,
        target: &ItemRef,
        on_page: Option<&mut PageCallback<'_>>,
    ) -> Result<Vec<Item>> {
        let session = self.client.configure(drive_id);
        let params = self.expand_params();

        let listed_drive = match target {
            ItemRef::Item(key) => key.drive_id.as_str(),
            ItemRef::Folder(_) => drive_id,
        };

        let page: DriveItemPage = match target {
            ItemRef::Item(key) => {
                let path = format!("/drives/{}/items/{}/children", key.drive_id, key.item_id);
                session.get(&path, &params).await?
            }
            ItemRef::Folder(folder) if is_virtual_folder(folder) => {
                session.get(&format!("/drives/{}/{}", drive_id, folder), &[]).await?
            }
            ItemRef::Folder(folder) => {
                let path = format!("/drives/{}/{}/children", drive_id, folder);
                session.get(&path, &params).await?
            }
        };
        self.ensure_not_cancelled()?;

        self.process_files(listed_drive, &session, page, on_page).await
    }

    /// Search a whole drive, or below an item or folder when `within` is given.
    /// Only files are returned. `sharedWithMe` and `recent` cannot be searched.
    #[instrument(skip(self, on_page))]
    pub async fn search(
        &self,
        drive_id: &str,
        query: &str,
        within: Option<&ItemRef>,
        on_page: Option<&mut PageCallback<'_>>,
    ) -> Result<Vec<Item>> {
        let session = self.client.configure(drive_id);

        let (listed_drive, scope) = match within {
            Some(ItemRef::Item(key)) => (
                key.drive_id.as_str(),
                format!("/drives/{}/items/{}", key.drive_id, key.item_id),
            ),
            Some(ItemRef::Folder(folder)) if is_virtual_folder(folder) => {
                return Err(OneDriveError::InvalidRequest(format!(
                    "Cannot search within {}",
                    folder
                )));
            }
            Some(ItemRef::Folder(folder)) => (drive_id, format!("/drives/{}/{}", drive_id, folder)),
            None => (drive_id, format!("/drives/{}", drive_id)),
        };
        let path = format!("{}/search(q='{}')", scope, urlencoding::encode(query));

        let mut params = self.expand_params();
        params.push(("$filter", "file ne null"));

        let page: DriveItemPage = session.get(&path, &params).await?;
        self.ensure_not_cancelled()?;

        self.process_files(listed_drive, &session, page, on_page).await
    }

    /// Map a page of results and every page after it.
    ///
    /// Each entry is cached under its item key, `on_page` sees every page as
    /// it completes, and the merged items are returned in Graph order.
    /// Entries without a drive of their own are keyed under `listed_drive`.
    pub async fn process_files(
        &self,
        listed_drive: &str,
        session: &DriveSession<'_>,
        first_page: DriveItemPage,
        mut on_page: Option<&mut PageCallback<'_>>,
    ) -> Result<Vec<Item>> {
        let mut items = Vec::new();
        let mut page = first_page;
        let mut page_number = 1;

        loop {
            let DriveItemPage { value, next_link } = page;
            let mut page_items = Vec::with_capacity(value.len());

            for entry in value {
                let entry = entry.into_resolved();
                let item = extract_item(&entry, None);

                let item_drive = item.drive_id.as_deref().unwrap_or(listed_drive);
                self.cache.put_listed(item_drive, &entry).await;
                page_items.push(item);
            }

            debug!(page = page_number, items = page_items.len(), "Processed page");
            if let Some(callback) = on_page.as_deref_mut() {
                callback(page_items.as_slice());
            }
            items.extend(page_items);

            let Some(next_link) = next_link else {
                break;
            };
            page = session.get(&next_link, &[]).await?;
            self.ensure_not_cancelled()?;
            page_number += 1;
        }

        info!(total = items.len(), pages = page_number, "Listed drive items");
        Ok(items)
    }

    /// Look up one item or named folder.
    ///
    /// Returns `Ok(None)` for `sharedWithMe` and `recent`, which are views
    /// without an item of their own.
    #[instrument(skip(self))]
    pub async fn get_item(
        &self,
        drive_id: &str,
        target: &ItemRef,
        options: ItemOptions,
    ) -> Result<Option<Item>> {
        let session = self.client.configure(drive_id);

        let (cache_key, path) = match target {
            ItemRef::Item(key) => (
                self.cache.lookup_key(&key.drive_id, &key.item_id),
                format!("/drives/{}/items/{}", key.drive_id, key.item_id),
            ),
            ItemRef::Folder(folder) if is_virtual_folder(folder) => return Ok(None),
            ItemRef::Folder(folder) => (
                self.cache.folder_key(drive_id, folder),
                format!("/drives/{}/{}", drive_id, folder),
            ),
        };

        let entry = match self.cache.get(&cache_key).await {
            Some(entry) => entry,
            None => {
                let entry: DriveItem = match session.get(&path, &self.expand_params()).await {
                    Ok(entry) => entry,
                    Err(e @ OneDriveError::NotFound(_)) => {
                        // Listings must not keep offering a deleted item
                        if let ItemRef::Item(key) = target {
                            self.cache
                                .invalidate(&self.cache.item_key(&key.drive_id, &key.item_id))
                                .await;
                        }
                        return Err(e);
                    }
                    Err(e) => return Err(e),
                };
                self.ensure_not_cancelled()?;
                self.cache.put_lookup(&cache_key, &entry).await;
                entry
            }
        };

        let access_token = if options.include_download_info {
            Some(session.access_token().await?)
        } else {
            None
        };

        let mut item = extract_item(&entry, access_token.as_deref());

        if options.find_subtitles {
            let item_drive = match target {
                ItemRef::Item(key) => key.drive_id.as_str(),
                ItemRef::Folder(_) => entry.drive_id().unwrap_or(drive_id),
            };
            let subtitles = self
                .find_subtitles(&session, item_drive, &entry, access_token.as_deref())
                .await?;
            if !subtitles.is_empty() {
                item.subtitles = Some(subtitles);
            }
        }

        Ok(Some(item))
    }

    /// Subtitle files in the same folder sharing the item's base name
    async fn find_subtitles(
        &self,
        session: &DriveSession<'_>,
        item_drive: &str,
        entry: &DriveItem,
        access_token: Option<&str>,
    ) -> Result<Vec<Item>> {
        let Some(parent_id) = entry.parent_id() else {
            debug!(item_id = %entry.id, "Item has no parent, skipping subtitle search");
            return Ok(Vec::new());
        };

        let path = format!(
            "/drives/{}/items/{}/search(q='{{{}}}')",
            item_drive,
            parent_id,
            urlencoding::encode(remove_extension(&entry.name))
        );

        let page: DriveItemPage = session.get(&path, &[]).await?;
        self.ensure_not_cancelled()?;

        let subtitles: Vec<Item> = page
            .value
            .iter()
            .filter(|candidate| SUBTITLE_EXTENSIONS.contains(&get_extension(&candidate.name).as_str()))
            .map(|candidate| extract_item(candidate, access_token))
            .collect();

        debug!(item_id = %entry.id, found = subtitles.len(), "Subtitle search finished");
        Ok(subtitles)
    }

    fn expand_params(&self) -> Vec<(&'static str, &'static str)> {
        if self.expand_thumbnails {
            vec![("$expand", "thumbnails")]
        } else {
            Vec::new()
        }
    }

    fn ensure_not_cancelled(&self) -> Result<()> {
        if self.cancellation.is_cancelled() {
            info!("Operation cancelled by host");
            return Err(OneDriveError::Cancelled);
        }
        Ok(())
    }
}
