//! Integration tests for the OneDrive addon against a mocked Graph API

use async_trait::async_trait;
use bridge_desktop::{MemoryCache, StaticAccountManager};
use bridge_traits::cache::KeyValueCache;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use bridge_traits::time::ManualClock;
use bytes::Bytes;
use core_runtime::AddonConfig;
use mockall::mock;
use provider_onedrive::{
    ContentType, CustomFolder, Item, ItemOptions, ItemRef, OneDriveAddon, OneDriveError,
    PageCallback,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const GRAPH: &str = "https://graph.microsoft.com/v1.0";

mock! {
    Http {}

    #[async_trait]
    impl HttpClient for Http {
        async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
    }
}

fn ok(body: Value) -> HttpResponse {
    HttpResponse {
        status: 200,
        headers: HashMap::new(),
        body: Bytes::from(body.to_string()),
    }
}

/// Expect exactly `times` GETs of `url`, answered with `body`
fn expect_get(http: &mut MockHttp, url: String, body: Value, times: usize) {
    http.expect_execute()
        .withf(move |request| request.url == url)
        .times(times)
        .returning(move |_| Ok(ok(body.clone())));
}

fn addon(http: MockHttp, clock: Arc<ManualClock>) -> OneDriveAddon {
    addon_with_store(http, Arc::new(MemoryCache::with_clock(clock)))
}

fn addon_with_store(http: MockHttp, store: Arc<MemoryCache>) -> OneDriveAddon {
    let config = AddonConfig::builder()
        .http_client(Arc::new(http))
        .account_manager(Arc::new(StaticAccountManager::with_default_token("EwB4A8l6")))
        .cache(store)
        .build()
        .unwrap();

    OneDriveAddon::new(config)
}

fn file(id: &str, name: &str, drive_id: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "size": 1024,
        "parentReference": { "driveId": drive_id, "id": "parent-1" },
        "file": { "mimeType": "application/octet-stream" }
    })
}

#[tokio::test]
async fn test_folder_listing_follows_next_link() {
    let next_link = format!("{}/drives/d1/root/children?$skiptoken=page2", GRAPH);
    let mut http = MockHttp::new();
    expect_get(
        &mut http,
        format!("{}/drives/d1/root/children?$expand=thumbnails", GRAPH),
        json!({
            "value": [file("1", "a.mkv", "d1"), file("2", "b.mkv", "d1")],
            "@odata.nextLink": next_link
        }),
        1,
    );
    expect_get(
        &mut http,
        next_link.clone(),
        json!({ "value": [file("3", "c.mkv", "d1")] }),
        1,
    );

    let addon = addon(http, Arc::new(ManualClock::default()));
    let mut pages = Vec::new();
    let callback: &mut PageCallback<'_> = &mut |items: &[Item]| pages.push(items.len());

    let items = addon
        .get_folder_items("d1", &ItemRef::root(), Some(callback))
        .await
        .unwrap();

    let ids: Vec<&str> = items.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(pages, vec![2, 1]);
    assert_eq!(items[0].name_extension, "mkv");
}

#[tokio::test]
async fn test_item_lookup_after_listing_fetches_full_item() {
    let mut http = MockHttp::new();
    expect_get(
        &mut http,
        format!("{}/drives/d2/items/folder-9/children?$expand=thumbnails", GRAPH),
        json!({ "value": [file("song-1", "Song.MP3", "d2")] }),
        1,
    );
    expect_get(
        &mut http,
        format!("{}/drives/d2/items/song-1?$expand=thumbnails", GRAPH),
        json!({
            "id": "song-1",
            "name": "Song.MP3",
            "parentReference": { "driveId": "d2", "id": "folder-9" },
            "audio": { "title": "Song", "duration": 201_000 }
        }),
        1,
    );

    let addon = addon(http, Arc::new(ManualClock::default()));

    addon
        .get_folder_items("d1", &ItemRef::item("d2", "folder-9"), None)
        .await
        .unwrap();
    let item = addon
        .get_item("d1", &ItemRef::item("d2", "song-1"), ItemOptions::default())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(item.name_extension, "mp3");
    assert_eq!(item.drive_id.as_deref(), Some("d2"));
    assert_eq!(item.audio.as_ref().map(|a| a.duration), Some(201));

    // Second lookup comes from the lookup entry
    addon
        .get_item("d1", &ItemRef::item("d2", "song-1"), ItemOptions::default())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_shared_with_me_unwraps_remote_items() {
    let mut http = MockHttp::new();
    expect_get(
        &mut http,
        format!("{}/drives/d1/sharedWithMe", GRAPH),
        json!({
            "value": [{
                "id": "link-1",
                "name": "Holiday",
                "remoteItem": {
                    "id": "remote-1",
                    "name": "Holiday",
                    "folder": { "childCount": 4 },
                    "parentReference": { "driveId": "friend-drive" }
                }
            }]
        }),
        1,
    );

    let addon = addon(http, Arc::new(ManualClock::default()));
    let items = addon
        .get_folder_items("d1", &ItemRef::from(CustomFolder::SharedWithMe), None)
        .await
        .unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, "remote-1");
    assert_eq!(items[0].drive_id.as_deref(), Some("friend-drive"));
    assert_eq!(items[0].folder.as_ref().map(|f| f.child_count), Some(4));

}

#[tokio::test]
async fn test_shared_item_lookup_has_download_url() {
    let mut http = MockHttp::new();
    expect_get(
        &mut http,
        format!("{}/drives/d1/sharedWithMe", GRAPH),
        json!({
            "value": [{
                "id": "link-1",
                "name": "Trip.mp4",
                "remoteItem": {
                    "id": "remote-1",
                    "name": "Trip.mp4",
                    "file": { "mimeType": "video/mp4" },
                    "parentReference": { "driveId": "friend-drive" }
                }
            }]
        }),
        1,
    );
    expect_get(
        &mut http,
        format!("{}/drives/friend-drive/items/remote-1?$expand=thumbnails", GRAPH),
        json!({
            "id": "remote-1",
            "name": "Trip.mp4",
            "parentReference": { "driveId": "friend-drive", "id": "p9" },
            "file": { "mimeType": "video/mp4" },
            "video": { "width": 1280, "height": 720, "duration": 60_000 },
            "@microsoft.graph.downloadUrl": "https://download/remote-1"
        }),
        1,
    );

    let addon = addon(http, Arc::new(ManualClock::default()));
    addon
        .get_folder_items("d1", &ItemRef::from(CustomFolder::SharedWithMe), None)
        .await
        .unwrap();

    let item = addon
        .get_item(
            "d1",
            &ItemRef::item("friend-drive", "remote-1"),
            ItemOptions::default().with_download_info(),
        )
        .await
        .unwrap()
        .unwrap();

    let download = item.download_info.unwrap();
    assert_eq!(download.url.as_deref(), Some("https://download/remote-1"));
    assert_eq!(item.video.map(|v| v.duration), Some(60));
}

#[tokio::test]
async fn test_virtual_folders_have_no_item() {
    // Any request would fail the test: no expectations are set
    let addon = addon(MockHttp::new(), Arc::new(ManualClock::default()));

    for folder in ["sharedWithMe", "recent"] {
        let item = addon
            .get_item("d1", &ItemRef::folder(folder), ItemOptions::default())
            .await
            .unwrap();
        assert!(item.is_none());
    }
}

#[tokio::test]
async fn test_search_is_file_only_and_encoded() {
    let mut http = MockHttp::new();
    expect_get(
        &mut http,
        format!(
            "{}/drives/d1/search(q='road%20trip')?$expand=thumbnails&$filter=file%20ne%20null",
            GRAPH
        ),
        json!({ "value": [file("v1", "road trip.mp4", "d1")] }),
        1,
    );
    expect_get(
        &mut http,
        format!(
            "{}/drives/d2/items/f1/search(q='road%20trip')?$expand=thumbnails&$filter=file%20ne%20null",
            GRAPH
        ),
        json!({ "value": [] }),
        1,
    );
    // Filter does not leak into later listings
    expect_get(
        &mut http,
        format!("{}/drives/d1/root/children?$expand=thumbnails", GRAPH),
        json!({ "value": [] }),
        1,
    );

    let addon = addon(http, Arc::new(ManualClock::default()));

    let found = addon.search("d1", "road trip", None, None).await.unwrap();
    assert_eq!(found.len(), 1);

    let within = ItemRef::item("d2", "f1");
    let found = addon
        .search("d1", "road trip", Some(&within), None)
        .await
        .unwrap();
    assert!(found.is_empty());

    addon
        .get_folder_items("d1", &ItemRef::root(), None)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_search_within_folder_follows_next_link() {
    let next_link = format!("{}/drives/d1/special/music/search(q='live')?$skiptoken=2", GRAPH);
    let mut http = MockHttp::new();
    expect_get(
        &mut http,
        format!(
            "{}/drives/d1/special/music/search(q='live')?$expand=thumbnails&$filter=file%20ne%20null",
            GRAPH
        ),
        json!({
            "value": [file("a1", "live-1.flac", "d1")],
            "@odata.nextLink": next_link
        }),
        1,
    );
    expect_get(
        &mut http,
        next_link.clone(),
        json!({ "value": [file("a2", "live-2.flac", "d1"), file("a3", "live-3.flac", "d1")] }),
        1,
    );

    let addon = addon(http, Arc::new(ManualClock::default()));
    let mut pages = Vec::new();
    let callback: &mut PageCallback<'_> = &mut |items: &[Item]| pages.push(items.len());

    let found = addon
        .search("d1", "live", Some(&ItemRef::from(CustomFolder::Music)), Some(callback))
        .await
        .unwrap();

    let ids: Vec<&str> = found.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, vec!["a1", "a2", "a3"]);
    assert_eq!(pages, vec![1, 2]);
}

#[tokio::test]
async fn test_search_rejects_virtual_folders() {
    // No expectations: reaching Graph fails the test
    let addon = addon(MockHttp::new(), Arc::new(ManualClock::default()));

    for folder in ["sharedWithMe", "recent"] {
        let result = addon
            .search("d1", "trip", Some(&ItemRef::folder(folder)), None)
            .await;
        assert!(matches!(result, Err(OneDriveError::InvalidRequest(_))));
    }
}

#[tokio::test]
async fn test_get_item_with_download_info_and_subtitles() {
    let mut http = MockHttp::new();
    expect_get(
        &mut http,
        format!("{}/drives/d2/items/v1?$expand=thumbnails", GRAPH),
        json!({
            "id": "v1",
            "name": "Holiday.mp4",
            "size": 73_400_320,
            "parentReference": { "driveId": "d2", "id": "p1" },
            "file": { "mimeType": "video/mp4" },
            "video": { "width": 1920, "height": 1080, "duration": 125_500 },
            "thumbnails": [ { "large": { "url": "https://thumbs/v1" } } ],
            "@microsoft.graph.downloadUrl": "https://download/v1"
        }),
        1,
    );
    expect_get(
        &mut http,
        format!("{}/drives/d2/items/p1/search(q='{{Holiday}}')", GRAPH),
        json!({
            "value": [
                file("s1", "Holiday.srt", "d2"),
                file("v1", "Holiday.mp4", "d2"),
                file("s2", "Holiday.en.SUB", "d2"),
                file("s3", "Holiday.txt", "d2")
            ]
        }),
        1,
    );

    let addon = addon(http, Arc::new(ManualClock::default()));
    let options = ItemOptions::default().with_subtitles().with_download_info();

    let item = addon
        .get_item("d1", &ItemRef::item("d2", "v1"), options)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(item.video.as_ref().map(|v| v.duration), Some(125));
    assert_eq!(item.thumbnail.as_deref(), Some("https://thumbs/v1"));

    let download = item.download_info.as_ref().unwrap();
    assert_eq!(download.url.as_deref(), Some("https://download/v1"));
    assert_eq!(
        download.headers.get("authorization").map(String::as_str),
        Some("Bearer EwB4A8l6")
    );

    let subtitles = item.subtitles.unwrap();
    let names: Vec<&str> = subtitles.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Holiday.srt", "Holiday.en.SUB"]);
    assert!(subtitles.iter().all(|s| s.download_info.is_some()));
}

#[tokio::test]
async fn test_item_lookup_expires_after_ttl() {
    let mut http = MockHttp::new();
    expect_get(
        &mut http,
        format!("{}/drives/d1/special/music?$expand=thumbnails", GRAPH),
        json!({
            "id": "music-folder",
            "name": "Music",
            "folder": { "childCount": 3 },
            "parentReference": { "driveId": "d1" }
        }),
        2,
    );

    let clock = Arc::new(ManualClock::default());
    let addon = addon(http, clock.clone());
    let target = ItemRef::from(CustomFolder::Music);

    addon.get_item("d1", &target, ItemOptions::default()).await.unwrap();
    clock.advance(Duration::from_secs(30));
    addon.get_item("d1", &target, ItemOptions::default()).await.unwrap();

    clock.advance(Duration::from_secs(29));
    let item = addon
        .get_item("d1", &target, ItemOptions::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(item.folder.map(|f| f.child_count), Some(3));
}

#[tokio::test]
async fn test_cancellation_after_round_trip() {
    let mut http = MockHttp::new();
    expect_get(
        &mut http,
        format!("{}/drives/d1/recent", GRAPH),
        json!({ "value": [file("1", "a.mkv", "d1")] }),
        1,
    );

    let token = CancellationToken::new();
    let addon = addon(http, Arc::new(ManualClock::default())).with_cancellation(token.clone());
    token.cancel();

    let result = addon
        .get_folder_items("d1", &ItemRef::folder("recent"), None)
        .await;
    assert!(matches!(result, Err(OneDriveError::Cancelled)));
}

#[tokio::test]
async fn test_cancellation_after_next_page() {
    let next_link = format!("{}/drives/d1/root/children?$skiptoken=2", GRAPH);
    let mut http = MockHttp::new();
    expect_get(
        &mut http,
        format!("{}/drives/d1/root/children?$expand=thumbnails", GRAPH),
        json!({ "value": [file("1", "a.mkv", "d1")], "@odata.nextLink": next_link }),
        1,
    );
    expect_get(
        &mut http,
        next_link.clone(),
        json!({ "value": [file("2", "b.mkv", "d1")] }),
        1,
    );

    let token = CancellationToken::new();
    let addon = addon(http, Arc::new(ManualClock::default())).with_cancellation(token.clone());

    let mut pages = 0;
    let callback: &mut PageCallback<'_> = &mut |_: &[Item]| {
        pages += 1;
        token.cancel();
    };
    let result = addon
        .get_folder_items("d1", &ItemRef::root(), Some(callback))
        .await;

    assert!(matches!(result, Err(OneDriveError::Cancelled)));
    assert_eq!(pages, 1);
}

#[tokio::test]
async fn test_listing_and_lookup_ttls() {
    let mut http = MockHttp::new();
    expect_get(
        &mut http,
        format!("{}/drives/d1/root/children?$expand=thumbnails", GRAPH),
        json!({ "value": [file("1", "a.mkv", "d1")] }),
        1,
    );
    expect_get(
        &mut http,
        format!("{}/drives/d1/items/1?$expand=thumbnails", GRAPH),
        file("1", "a.mkv", "d1"),
        1,
    );

    let clock = Arc::new(ManualClock::default());
    let store = Arc::new(MemoryCache::with_clock(clock.clone()));
    let addon = addon_with_store(http, store.clone());

    addon
        .get_folder_items("d1", &ItemRef::root(), None)
        .await
        .unwrap();
    addon
        .get_item("d1", &ItemRef::item("d1", "1"), ItemOptions::default())
        .await
        .unwrap();

    let listed = "plugin.onedrive-item-d1-1";
    let looked_up = "plugin.onedrive-item-d1-1-";
    assert!(store.contains(looked_up).await.unwrap());

    clock.advance(Duration::from_secs(59));
    assert!(store.contains(listed).await.unwrap());
    assert!(!store.contains(looked_up).await.unwrap());

    clock.advance(Duration::from_secs(1));
    assert!(!store.contains(listed).await.unwrap());
}

#[tokio::test]
async fn test_listing_without_drive_keyed_under_listed_drive() {
    let mut http = MockHttp::new();
    expect_get(
        &mut http,
        format!("{}/drives/d2/items/f1/children?$expand=thumbnails", GRAPH),
        json!({ "value": [{ "id": "x", "name": "x.mkv", "file": {} }] }),
        1,
    );

    let store = Arc::new(MemoryCache::with_clock(Arc::new(ManualClock::default())));
    let addon = addon_with_store(http, store.clone());

    addon
        .get_folder_items("d1", &ItemRef::item("d2", "f1"), None)
        .await
        .unwrap();

    assert!(store.contains("plugin.onedrive-item-d2-x").await.unwrap());
    assert!(!store.contains("plugin.onedrive-item-d1-x").await.unwrap());
}

#[tokio::test]
async fn test_missing_item_drops_listing_entry() {
    let mut http = MockHttp::new();
    expect_get(
        &mut http,
        format!("{}/drives/d1/root/children?$expand=thumbnails", GRAPH),
        json!({ "value": [file("gone", "gone.mkv", "d1")] }),
        1,
    );
    http.expect_execute()
        .withf(|request| request.url.contains("/items/gone?"))
        .times(1)
        .returning(|_| {
            Ok(HttpResponse {
                status: 404,
                headers: HashMap::new(),
                body: Bytes::from(
                    json!({ "error": { "code": "itemNotFound", "message": "Item not found" } })
                        .to_string(),
                ),
            })
        });

    let store = Arc::new(MemoryCache::with_clock(Arc::new(ManualClock::default())));
    let addon = addon_with_store(http, store.clone());

    addon
        .get_folder_items("d1", &ItemRef::root(), None)
        .await
        .unwrap();
    assert!(store.contains("plugin.onedrive-item-d1-gone").await.unwrap());

    let result = addon
        .get_item("d1", &ItemRef::item("d1", "gone"), ItemOptions::default())
        .await;

    assert!(matches!(result, Err(OneDriveError::NotFound(_))));
    assert!(!store.contains("plugin.onedrive-item-d1-gone").await.unwrap());
}

#[tokio::test]
async fn test_throttling_reaches_caller() {
    let mut http = MockHttp::new();
    http.expect_execute().times(1).returning(|_| {
        Ok(HttpResponse {
            status: 429,
            headers: HashMap::from([("Retry-After".to_string(), "30".to_string())]),
            body: Bytes::new(),
        })
    });

    let addon = addon(http, Arc::new(ManualClock::default()));
    let result = addon.search("d1", "anything", None, None).await;

    assert!(matches!(result, Err(OneDriveError::Throttled(30))));
}

#[test]
fn test_custom_drive_folders() {
    let addon = addon(MockHttp::new(), Arc::new(ManualClock::default()));

    let paths: Vec<&str> = addon
        .get_custom_drive_folders(ContentType::Image)
        .iter()
        .map(|folder| folder.path())
        .collect();
    assert_eq!(
        paths,
        vec!["sharedWithMe", "recent", "special/photos", "special/cameraroll"]
    );
}
