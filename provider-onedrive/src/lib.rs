//! # OneDrive Provider
//!
//! Browsing backend that lets a media-center host list, search and look up
//! files stored in OneDrive through Microsoft Graph.
//!
//! ## Overview
//!
//! This crate provides:
//! - Folder listings with `@odata.nextLink` pages fetched and merged
//! - File-only search across a drive or below a folder
//! - Single item lookup with optional download info and subtitle discovery
//! - A short-lived metadata cache shared between listings and lookups
//! - Mapping from Graph `driveItem` resources to host item records
//!
//! Sign-in and token refresh belong to the host; tokens are obtained through
//! `bridge_traits::account::AccountManager`.

pub mod addon;
pub mod cache;
pub mod client;
pub mod error;
pub mod folders;
pub mod item;
pub mod types;

pub use addon::{OneDriveAddon, PageCallback};
pub use cache::MetadataCache;
pub use client::{DriveSession, GraphClient};
pub use error::{OneDriveError, Result};
pub use folders::{ContentType, CustomFolder, ItemKey, ItemOptions, ItemRef};
pub use item::{extract_item, get_extension, remove_extension, Item};
pub use types::{DriveItem, DriveItemPage};
