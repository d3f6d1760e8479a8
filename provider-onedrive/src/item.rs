//! Host item schema
//!
//! The media-center host consumes flat item records. `extract_item` maps a
//! Graph `driveItem` onto that shape.

use serde::Serialize;
use std::collections::HashMap;

use crate::types::DriveItem;

/// Item record handed to the host
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    /// Lowercased extension, empty when the name has none
    pub name_extension: String,
    pub drive_id: Option<String>,
    pub mimetype: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<FolderInfo>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoInfo>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioInfo>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageInfo>,

    /// URL of the large thumbnail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_info: Option<DownloadInfo>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitles: Option<Vec<Item>>,
}

impl Item {
    pub fn is_folder(&self) -> bool {
        self.folder.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FolderInfo {
    pub child_count: u64,
}

/// Video details, duration in whole seconds
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VideoInfo {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub duration: u64,
}

/// Audio details, duration in whole seconds
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AudioInfo {
    pub tracknumber: Option<u32>,
    pub discnumber: Option<u32>,
    pub duration: u64,
    pub year: Option<u32>,
    pub genre: Option<String>,
    pub album: Option<String>,
    pub artist: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImageInfo {
    pub size: u64,
}

/// Where and how the host downloads the content
#[derive(Clone, Default, PartialEq, Serialize)]
pub struct DownloadInfo {
    pub url: Option<String>,
    pub headers: HashMap<String, String>,
}

// Headers carry the bearer token
impl std::fmt::Debug for DownloadInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadInfo")
            .field("url", &self.url.as_ref().map(|_| "[REDACTED]"))
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Map a Graph `driveItem` to a host [`Item`].
///
/// When `access_token` is given the item carries download info with an
/// `authorization` header built from it.
pub fn extract_item(entry: &DriveItem, access_token: Option<&str>) -> Item {
    let image = (entry.image.is_some() || entry.photo.is_some()).then(|| ImageInfo {
        size: entry.size.unwrap_or(0),
    });

    let thumbnail = entry
        .thumbnails
        .first()
        .and_then(|set| set.large.as_ref())
        .and_then(|large| large.url.clone());

    let download_info = access_token.map(|token| DownloadInfo {
        url: entry.download_url.clone(),
        headers: HashMap::from([("authorization".to_string(), format!("Bearer {}", token))]),
    });

    Item {
        id: entry.id.clone(),
        name: entry.name.clone(),
        name_extension: get_extension(&entry.name),
        drive_id: entry.drive_id().map(str::to_string),
        mimetype: entry.file.as_ref().and_then(|f| f.mime_type.clone()),
        folder: entry.folder.as_ref().map(|folder| FolderInfo {
            child_count: folder.child_count,
        }),
        video: entry.video.as_ref().map(|video| VideoInfo {
            width: video.width,
            height: video.height,
            duration: video.duration.unwrap_or(0) / 1000,
        }),
        audio: entry.audio.as_ref().map(|audio| AudioInfo {
            tracknumber: audio.track,
            discnumber: audio.disc,
            duration: audio.duration.unwrap_or(0) / 1000,
            year: audio.year,
            genre: audio.genre.clone(),
            album: audio.album.clone(),
            artist: audio.artist.clone(),
            title: audio.title.clone(),
        }),
        image,
        thumbnail,
        download_info,
        subtitles: None,
    }
}

/// Lowercased text after the last `.`, empty when there is none
pub fn get_extension(name: &str) -> String {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default()
}

/// Name without its last extension
pub fn remove_extension(name: &str) -> &str {
    name.rsplit_once('.').map(|(base, _)| base).unwrap_or(name)
}
