//! Per-resource method surface over the Jikan API.
//!
//! Every method only shapes its arguments into path segments and query
//! parameters and hands them to [`Request::send`]. Payloads come back as
//! untouched JSON.
//!
//! Status codes reported by the upstream:
//! - 200: OK
//! - 400: Bad Request (invalid endpoint or parameters)
//! - 404: Not Found (id doesn't exist)
//! - 405: Method Not Allowed
//! - 429: Too Many Requests (request limit is hit)
//!
//! All of them except 200 surface as [`JikanError::Api`](crate::JikanError::Api).

use crate::api::{segments_from_json, PathSegment, QueryParameters, Request};
use crate::error::Result;
use crate::segments;
use crate::settings::Settings;
use serde_json::Value;
use shared::config::JikanConfig;
use std::sync::Arc;
use tracing::{debug, info};

/// Jikan API client
#[derive(Debug, Clone)]
pub struct JikanApi {
    settings: Arc<Settings>,
    request: Request,
}

fn page(page: Option<u32>) -> QueryParameters {
    QueryParameters::new().with("page", page)
}

impl JikanApi {
    /// Client against the public Jikan API with default settings
    pub fn new() -> Result<Self> {
        Self::from_config(&JikanConfig::default())
    }

    /// Client built from the `[jikan]` config section
    pub fn from_config(config: &JikanConfig) -> Result<Self> {
        let settings = Arc::new(Settings::from_config(config)?);
        let request = Request::from_config(config, settings.clone())?;
        Ok(Self { settings, request })
    }

    /// Client over an existing settings handle, so several clients can share one base URL
    pub fn with_settings(config: &JikanConfig, settings: Arc<Settings>) -> Result<Self> {
        let request = Request::from_config(config, settings.clone())?;
        Ok(Self { settings, request })
    }

    /// Runtime settings; changing the base URL affects subsequent calls
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Anime by id, optionally a sub-resource.
    ///
    /// `request` is e.g. characters, staff, episodes, news, forum, videos,
    /// pictures, statistics, moreinfo, recommendations, userupdates, reviews,
    /// relations, themes, external.
    pub async fn load_anime(
        &self,
        id: u32,
        request: Option<&str>,
        params: Option<&QueryParameters>,
    ) -> Result<Value> {
        debug!(id, request, "Fetching anime");
        self.request
            .send(&segments!["anime", id, request], params, false)
            .await
    }

    /// Single episode of an anime
    pub async fn load_anime_episode(&self, id: u32, episode: u32) -> Result<Value> {
        debug!(id, episode, "Fetching anime episode");
        self.request
            .send(&segments!["anime", id, "episodes", episode], None, false)
            .await
    }

    /// `request`: anime, manga, voices, pictures
    pub async fn load_character(&self, id: u32, request: Option<&str>) -> Result<Value> {
        debug!(id, request, "Fetching character");
        self.request
            .send(&segments!["characters", id, request], None, false)
            .await
    }

    /// `request`: members, staff, relations. `page` applies to members.
    pub async fn load_club(&self, id: u32, request: Option<&str>, page_no: Option<u32>) -> Result<Value> {
        debug!(id, request, page = page_no, "Fetching club");
        self.request
            .send(&segments!["clubs", id, request], Some(&page(page_no)), false)
            .await
    }

    /// Genres of `kind` (anime or manga).
    ///
    /// `filter` is one of genres, explicit_genres, themes, demographics.
    pub async fn load_genres(
        &self,
        kind: &str,
        page_no: Option<u32>,
        filter: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Value> {
        info!(kind, filter, "Fetching genres");
        let params = page(page_no).with("filter", filter).with("limit", limit);
        self.request
            .send(&segments!["genres", kind], Some(&params), false)
            .await
    }

    pub async fn load_magazines(&self, page_no: Option<u32>) -> Result<Value> {
        info!(page = page_no, "Fetching magazines");
        self.request
            .send(&segments!["magazines"], Some(&page(page_no)), false)
            .await
    }

    /// `request`: characters, news, forum, pictures, statistics, moreinfo,
    /// recommendations, userupdates, reviews, relations, external
    pub async fn load_manga(&self, id: u32, request: Option<&str>, page_no: Option<u32>) -> Result<Value> {
        debug!(id, request, page = page_no, "Fetching manga");
        self.request
            .send(&segments!["manga", id, request], Some(&page(page_no)), false)
            .await
    }

    /// `request`: anime, voices, manga, pictures
    pub async fn load_person(&self, id: u32, request: Option<&str>) -> Result<Value> {
        debug!(id, request, "Fetching person");
        self.request
            .send(&segments!["people", id, request], None, false)
            .await
    }

    pub async fn load_producers(&self, page_no: Option<u32>) -> Result<Value> {
        info!(page = page_no, "Fetching producers/studios");
        self.request
            .send(&segments!["producers"], Some(&page(page_no)), false)
            .await
    }

    /// `kind`: anime, manga, characters, people, users
    pub async fn load_random(&self, kind: &str) -> Result<Value> {
        debug!(kind, "Fetching random entry");
        self.request
            .send(&segments!["random", kind], None, false)
            .await
    }

    pub async fn load_recommendations(&self, kind: &str, page_no: Option<u32>) -> Result<Value> {
        info!(kind, page = page_no, "Fetching recommendations");
        self.request
            .send(&segments!["recommendations", kind], Some(&page(page_no)), false)
            .await
    }

    pub async fn load_reviews(&self, kind: &str, page_no: Option<u32>) -> Result<Value> {
        info!(kind, page = page_no, "Fetching reviews");
        self.request
            .send(&segments!["reviews", kind], Some(&page(page_no)), false)
            .await
    }

    /// `day`: monday..sunday, other, unknown
    pub async fn load_schedule(&self, day: &str, page_no: Option<u32>) -> Result<Value> {
        info!(day, page = page_no, "Fetching schedule");
        let params = QueryParameters::new().with("filter", day).with("page", page_no);
        self.request
            .send(&segments!["schedules"], Some(&params), false)
            .await
    }

    /// `request`: statistics, favorites, userupdates, about, history,
    /// friends, reviews, recommendations, clubs
    pub async fn load_user(&self, username: &str, request: Option<&str>, page_no: Option<u32>) -> Result<Value> {
        debug!(username, request, page = page_no, "Fetching user");
        self.request
            .send(&segments!["users", username, request], Some(&page(page_no)), false)
            .await
    }

    /// User's anime list from the official MyAnimeList API.
    ///
    /// Useful parameters: status, sort, limit, offset, fields.
    pub async fn load_user_anime_list(
        &self,
        username: &str,
        params: Option<&QueryParameters>,
    ) -> Result<Value> {
        debug!(username, "Fetching user anime list");
        self.request
            .send(&segments!["users", username, "animelist"], params, true)
            .await
    }

    /// User's manga list from the official MyAnimeList API
    pub async fn load_user_manga_list(
        &self,
        username: &str,
        params: Option<&QueryParameters>,
    ) -> Result<Value> {
        debug!(username, "Fetching user manga list");
        self.request
            .send(&segments!["users", username, "mangalist"], params, true)
            .await
    }

    /// `season`: winter, spring, summer, fall
    pub async fn load_season(&self, year: u32, season: &str, page_no: Option<u32>) -> Result<Value> {
        info!(year, season, page = page_no, "Fetching season");
        self.request
            .send(&segments!["seasons", year, season], Some(&page(page_no)), false)
            .await
    }

    pub async fn load_season_archive(&self) -> Result<Value> {
        info!("Fetching season archive");
        self.request.send(&segments!["seasons"], None, false).await
    }

    pub async fn load_current_season(&self, page_no: Option<u32>) -> Result<Value> {
        info!(page = page_no, "Fetching current season");
        self.request
            .send(&segments!["seasons", "now"], Some(&page(page_no)), false)
            .await
    }

    pub async fn load_upcoming_season(&self, page_no: Option<u32>) -> Result<Value> {
        info!(page = page_no, "Fetching upcoming season");
        self.request
            .send(&segments!["seasons", "upcoming"], Some(&page(page_no)), false)
            .await
    }

    /// `kind`: anime, manga, people, characters, reviews (25 items per page)
    pub async fn load_top(&self, kind: &str, page_no: Option<u32>) -> Result<Value> {
        info!(kind, page = page_no, "Fetching top list");
        self.request
            .send(&segments!["top", kind], Some(&page(page_no)), false)
            .await
    }

    /// `kind`: episodes, promos
    pub async fn load_watch(&self, kind: &str, page_no: Option<u32>, popular: bool) -> Result<Value> {
        info!(kind, page = page_no, popular, "Fetching watch list");
        let popular = popular.then_some("popular");
        self.request
            .send(&segments!["watch", kind, popular], Some(&page(page_no)), false)
            .await
    }

    /// Free-form search over `kind` (anime, manga, people, characters, clubs).
    ///
    /// Caller parameters win: `q` and `limit` are only filled in when `params`
    /// has no usable value for them.
    pub async fn search(
        &self,
        kind: &str,
        query: &str,
        limit: Option<u32>,
        params: Option<QueryParameters>,
    ) -> Result<Value> {
        info!(kind, query, "Searching");
        let mut params = params.unwrap_or_default();
        if !params.has_included("q") {
            params.set("q", query);
        }
        if !params.has_included("limit") && limit.is_some() {
            params.set("limit", limit);
        }

        self.request.send(&segments![kind], Some(&params), false).await
    }

    /// Escape hatch for endpoints without a dedicated method
    pub async fn raw(&self, segments: &[PathSegment], params: Option<&QueryParameters>) -> Result<Value> {
        debug!(segments = segments.len(), "Fetching raw endpoint");
        self.request.send(segments, params, false).await
    }

    /// Escape hatch taking loosely typed JSON, e.g. `["anime", 1]` and `{"type": "tv"}`.
    ///
    /// Input is validated before anything goes on the wire.
    pub async fn raw_json(&self, url_parts: &Value, params: Option<&Value>) -> Result<Value> {
        let segments = segments_from_json(url_parts)?;
        let params = params.map(QueryParameters::try_from).transpose()?;
        self.raw(&segments, params.as_ref()).await
    }
}
