//! Drive folders and request targets

use std::fmt;
use std::str::FromStr;

use crate::error::OneDriveError;

/// Folder names Graph serves as views rather than real folders
pub const SHARED_WITH_ME: &str = "sharedWithMe";
pub const RECENT: &str = "recent";

/// Views without a backing `driveItem`; they can be listed but not fetched
pub fn is_virtual_folder(folder: &str) -> bool {
    folder == SHARED_WITH_ME || folder == RECENT
}

/// Kind of media the host is browsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentType {
    #[default]
    Video,
    Audio,
    Image,
    Executable,
}

impl FromStr for ContentType {
    type Err = OneDriveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "video" => Ok(ContentType::Video),
            "audio" => Ok(ContentType::Audio),
            "image" => Ok(ContentType::Image),
            "executable" => Ok(ContentType::Executable),
            other => Err(OneDriveError::InvalidRequest(format!(
                "unknown content type: {}",
                other
            ))),
        }
    }
}

/// Shortcut folders offered next to the drive root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomFolder {
    SharedWithMe,
    Recent,
    Photos,
    CameraRoll,
    Music,
}

impl CustomFolder {
    /// Graph path segment below `/drives/{drive-id}/`
    pub fn path(&self) -> &'static str {
        match self {
            CustomFolder::SharedWithMe => SHARED_WITH_ME,
            CustomFolder::Recent => RECENT,
            CustomFolder::Photos => "special/photos",
            CustomFolder::CameraRoll => "special/cameraroll",
            CustomFolder::Music => "special/music",
        }
    }

    /// Id of the host's localized label
    pub fn string_id(&self) -> u32 {
        match self {
            CustomFolder::SharedWithMe => 32058,
            CustomFolder::Recent => 32053,
            CustomFolder::Photos => 32007,
            CustomFolder::CameraRoll => 32008,
            CustomFolder::Music => 32009,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CustomFolder::SharedWithMe => "Shared with me",
            CustomFolder::Recent => "Recent",
            CustomFolder::Photos => "Photos",
            CustomFolder::CameraRoll => "Camera Roll",
            CustomFolder::Music => "Music",
        }
    }

    /// Folders to show for `content_type`, in display order
    pub fn for_content(content_type: ContentType) -> Vec<CustomFolder> {
        let mut folders = vec![CustomFolder::SharedWithMe, CustomFolder::Recent];
        match content_type {
            ContentType::Image => {
                folders.push(CustomFolder::Photos);
                folders.push(CustomFolder::CameraRoll);
            }
            ContentType::Audio => folders.push(CustomFolder::Music),
            ContentType::Video | ContentType::Executable => {}
        }
        folders
    }
}

impl fmt::Display for CustomFolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// An item addressed by the drive that holds it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemKey {
    pub drive_id: String,
    pub item_id: String,
}

impl ItemKey {
    pub fn new(drive_id: impl Into<String>, item_id: impl Into<String>) -> Self {
        Self {
            drive_id: drive_id.into(),
            item_id: item_id.into(),
        }
    }
}

/// What a browse or lookup request points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemRef {
    /// A concrete item, possibly on another drive
    Item(ItemKey),
    /// A named folder of the request's drive: `root`, `special/music`, `sharedWithMe`, ...
    Folder(String),
}

impl ItemRef {
    pub fn item(drive_id: impl Into<String>, item_id: impl Into<String>) -> Self {
        ItemRef::Item(ItemKey::new(drive_id, item_id))
    }

    pub fn folder(folder: impl Into<String>) -> Self {
        ItemRef::Folder(folder.into())
    }

    pub fn root() -> Self {
        ItemRef::Folder("root".to_string())
    }
}

impl From<CustomFolder> for ItemRef {
    fn from(folder: CustomFolder) -> Self {
        ItemRef::Folder(folder.path().to_string())
    }
}

/// Extras for [`get_item`](crate::OneDriveAddon::get_item)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemOptions {
    pub find_subtitles: bool,
    pub include_download_info: bool,
}

impl ItemOptions {
    pub fn with_subtitles(mut self) -> Self {
        self.find_subtitles = true;
        self
    }

    pub fn with_download_info(mut self) -> Self {
        self.include_download_info = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folders_per_content_type() {
        assert_eq!(
            CustomFolder::for_content(ContentType::Video),
            vec![CustomFolder::SharedWithMe, CustomFolder::Recent]
        );
        assert_eq!(
            CustomFolder::for_content(ContentType::Image),
            vec![
                CustomFolder::SharedWithMe,
                CustomFolder::Recent,
                CustomFolder::Photos,
                CustomFolder::CameraRoll
            ]
        );
        assert_eq!(
            CustomFolder::for_content(ContentType::Audio).last(),
            Some(&CustomFolder::Music)
        );
    }

    #[test]
    fn test_folder_labels() {
        let ids: Vec<u32> = CustomFolder::for_content(ContentType::Image)
            .iter()
            .map(CustomFolder::string_id)
            .collect();
        assert_eq!(ids, vec![32058, 32053, 32007, 32008]);
        assert_eq!(CustomFolder::Music.string_id(), 32009);
        assert_eq!(CustomFolder::CameraRoll.to_string(), "special/cameraroll");
    }

    #[test]
    fn test_content_type_parsing() {
        assert_eq!("audio".parse::<ContentType>().unwrap(), ContentType::Audio);
        assert!("podcast".parse::<ContentType>().is_err());
    }

    #[test]
    fn test_virtual_folders() {
        assert!(is_virtual_folder("sharedWithMe"));
        assert!(is_virtual_folder("recent"));
        assert!(!is_virtual_folder("root"));
        assert!(!is_virtual_folder("special/music"));
    }

    #[test]
    fn test_item_refs() {
        assert_eq!(ItemRef::root(), ItemRef::Folder("root".to_string()));
        assert_eq!(
            ItemRef::from(CustomFolder::Photos),
            ItemRef::folder("special/photos")
        );
        assert_eq!(
            ItemOptions::default().with_subtitles(),
            ItemOptions {
                find_subtitles: true,
                include_download_info: false
            }
        );
    }
}
