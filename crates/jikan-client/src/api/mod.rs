//! Jikan API v4 transport layer.
//!
//! This module turns path segments and query parameters into a URL, sends a
//! single GET and normalizes the response. No caching, retries or rate limiting.

pub mod params;
pub mod request;
pub mod types;
pub mod url_builder;

pub use params::{segments_from_json, PathSegment, QueryParameters, QueryValue};
pub use request::{PreparedRequest, Request, MAL_CLIENT_ID_HEADER};
pub use types::*;
pub use url_builder::build_url;
