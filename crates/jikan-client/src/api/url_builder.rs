//! Request URL construction.

use super::params::{PathSegment, QueryParameters};
use crate::error::{JikanError, Result};
use url::Url;

/// Compose a base origin, path segments and query parameters into one URL.
///
/// Present segments are appended after any path prefix already on the base
/// (e.g. `/v4`). Query parameters that fail the inclusion rule are skipped;
/// when none survive the URL gets no `?` at all.
pub fn build_url(
    base_origin: &str,
    segments: &[PathSegment],
    params: Option<&QueryParameters>,
) -> Result<Url> {
    let mut url = Url::parse(base_origin)?;

    let parts: Vec<_> = segments.iter().filter_map(PathSegment::as_path_part).collect();
    if !parts.is_empty() {
        url.path_segments_mut()
            .map_err(|_| {
                JikanError::InvalidInput(format!(
                    "Base URL cannot take path segments: {}",
                    base_origin
                ))
            })?
            .pop_if_empty()
            .extend(parts.iter().map(|part| &**part));
    }

    if let Some(params) = params {
        let mut included = params.included().peekable();
        if included.peek().is_some() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in included {
                pairs.append_pair(key, &value);
            }
        }
    }

    Ok(url)
}
