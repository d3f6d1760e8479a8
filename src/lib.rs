//! Workspace umbrella crate.
//!
//! Exposes the feature flags that wire the OneDrive adapter together with its
//! runtime. Hosts can depend on `onedrive-media-workspace` and enable
//! `desktop-shims` to get the reqwest transport and in-memory cache defaults
//! without depending on each workspace crate individually.

#[cfg(any(feature = "desktop-shims", feature = "adapter-only"))]
pub use provider_onedrive as onedrive;

#[cfg(any(feature = "desktop-shims", feature = "adapter-only"))]
pub use core_runtime as runtime;
