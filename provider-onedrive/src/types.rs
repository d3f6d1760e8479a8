//! Microsoft Graph response types
//!
//! Data structures for the `driveItem` fields the adapter reads. They
//! serialize back to the Graph JSON names so cached entries decode the same
//! way a fresh response does.

use serde::{Deserialize, Serialize};

/// Graph `driveItem` resource
///
/// See: https://learn.microsoft.com/graph/api/resources/driveitem
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveItem {
    /// Item ID, unique within its drive
    pub id: String,

    /// File or folder name including extension
    #[serde(default)]
    pub name: String,

    /// Size in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_reference: Option<ItemReference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileFacet>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<FolderFacet>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoFacet>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioFacet>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageFacet>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<PhotoFacet>,

    /// Present only when the request asked for `$expand=thumbnails`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub thumbnails: Vec<ThumbnailSet>,

    /// Points at the real item for entries shared from another drive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_item: Option<Box<DriveItem>>,

    /// Short-lived pre-authenticated download URL
    #[serde(
        rename = "@microsoft.graph.downloadUrl",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub download_url: Option<String>,
}

impl DriveItem {
    /// Replace a shared entry with the item it points at
    pub fn into_resolved(self) -> DriveItem {
        match self.remote_item {
            Some(remote) => *remote,
            None => self,
        }
    }

    pub fn drive_id(&self) -> Option<&str> {
        self.parent_reference
            .as_ref()
            .and_then(|parent| parent.drive_id.as_deref())
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent_reference
            .as_ref()
            .and_then(|parent| parent.id.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drive_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileFacet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderFacet {
    #[serde(default)]
    pub child_count: u64,
}

/// Video metadata; durations are in milliseconds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoFacet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
}

/// Audio metadata; durations are in milliseconds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioFacet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disc: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFacet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoFacet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taken_date_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_make: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_model: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThumbnailSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large: Option<Thumbnail>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<Thumbnail>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small: Option<Thumbnail>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Thumbnail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// One page of a collection response (children, search, sharedWithMe, recent)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DriveItemPage {
    #[serde(default)]
    pub value: Vec<DriveItem>,

    /// Absolute URL of the next page
    #[serde(rename = "@odata.nextLink", default)]
    pub next_link: Option<String>,
}

/// Graph error envelope: `{ "error": { "code": ..., "message": ... } }`
#[derive(Debug, Deserialize)]
pub struct GraphErrorResponse {
    pub error: GraphError,
}

#[derive(Debug, Deserialize)]
pub struct GraphError {
    #[serde(default)]
    pub code: String,

    #[serde(default)]
    pub message: String,
}
