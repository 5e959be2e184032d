//! Jikan CLI application.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use jikan_client::{JikanApi, PathSegment, QueryParameters, QueryValue};
use serde_json::Value;
use shared::{Config, LogConfig};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "jikan.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Override the Jikan base URL from the config file
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Call any endpoint, e.g. `raw anime 1 characters`
    Raw {
        segments: Vec<String>,
        /// Query parameter as key=value (repeatable)
        #[arg(short, long = "query", value_parser = parse_key_value)]
        query: Vec<(String, QueryValue)>,
        /// Send to the official MyAnimeList API instead
        #[arg(long)]
        mal: bool,
    },
    /// Anime by id, optionally a sub-resource
    Anime { id: u32, request: Option<String> },
    /// Single episode of an anime
    Episode { id: u32, episode: u32 },
    /// Manga by id, optionally a sub-resource
    Manga {
        id: u32,
        request: Option<String>,
        #[arg(long)]
        page: Option<u32>,
    },
    /// Search anime, manga, people, characters or clubs
    Search {
        kind: String,
        query: String,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Random anime, manga, character, person or user
    Random { kind: String },
    /// Top list of a kind
    Top {
        kind: String,
        #[arg(long)]
        page: Option<u32>,
    },
    /// A season's anime; the current season when year and season are omitted
    Season {
        #[arg(requires = "season")]
        year: Option<u32>,
        season: Option<String>,
        #[arg(long)]
        page: Option<u32>,
    },
    /// Broadcast schedule for a weekday
    Schedule {
        day: String,
        #[arg(long)]
        page: Option<u32>,
    },
    /// A user's list from the official MyAnimeList API
    UserList {
        username: String,
        /// Fetch the manga list instead of the anime list
        #[arg(long)]
        manga: bool,
        #[arg(short, long = "query", value_parser = parse_key_value)]
        query: Vec<(String, QueryValue)>,
    },
}

/// Parse a `key=value` pair, inferring the value's type
fn parse_key_value(arg: &str) -> std::result::Result<(String, QueryValue), String> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("invalid key=value: no `=` found in `{}`", arg))?;

    if key.is_empty() {
        return Err(format!("invalid key=value: empty key in `{}`", arg));
    }

    Ok((key.to_string(), QueryValue::infer(value)))
}

async fn run(api: &JikanApi, command: Command) -> Result<Value> {
    let payload = match command {
        Command::Raw { segments, query, mal } => {
            let segments: Vec<PathSegment> = segments.into_iter().map(PathSegment::from).collect();
            let params: QueryParameters = query.into_iter().collect();
            api.request().send(&segments, Some(&params), mal).await?
        }
        Command::Anime { id, request } => api.load_anime(id, request.as_deref(), None).await?,
        Command::Episode { id, episode } => api.load_anime_episode(id, episode).await?,
        Command::Manga { id, request, page } => {
            api.load_manga(id, request.as_deref(), page).await?
        }
        Command::Search { kind, query, limit } => api.search(&kind, &query, limit, None).await?,
        Command::Random { kind } => api.load_random(&kind).await?,
        Command::Top { kind, page } => api.load_top(&kind, page).await?,
        Command::Season { year, season, page } => match (year, season) {
            (Some(year), Some(season)) => api.load_season(year, &season, page).await?,
            (None, None) => api.load_current_season(page).await?,
            _ => bail!("Both year and season are required"),
        },
        Command::Schedule { day, page } => api.load_schedule(&day, page).await?,
        Command::UserList { username, manga, query } => {
            let params: QueryParameters = query.into_iter().collect();
            if manga {
                api.load_user_manga_list(&username, Some(&params)).await?
            } else {
                api.load_user_anime_list(&username, Some(&params)).await?
            }
        }
    };

    Ok(payload)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if let Some(base_url) = args.base_url {
        config.jikan.base_url = base_url;
    }

    // Initialize logging
    let mut log_config = LogConfig::from_config(&config, "jikan");
    if args.verbose {
        log_config.default_level = tracing::Level::DEBUG;
    }
    shared::logging::init(log_config)?;

    info!(config_file = %args.config.display(), base_url = %config.jikan.base_url, "Loaded configuration");

    let api = JikanApi::from_config(&config.jikan).context("Failed to create Jikan client")?;

    let payload = run(&api, args.command).await.context("Request failed")?;

    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("Failed to format response")?
    );

    Ok(())
}
