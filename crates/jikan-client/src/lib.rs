//! Client library for the Jikan v4 anime/manga metadata API.
//!
//! Method calls become URL construction, a single GET request and response
//! normalization. A subset of calls (user lists) goes to the official
//! MyAnimeList API instead, with its client id header attached.

pub mod api;
pub mod error;
pub mod jikan;
pub mod settings;

pub use api::{build_url, PathSegment, QueryParameters, QueryValue, Request};
pub use error::{JikanError, Result};
pub use jikan::JikanApi;
pub use settings::{Settings, SettingsProvider};
