use std::{path::PathBuf, time::Duration};

use anyhow::Context;
use regex::Regex;
use serde::{Deserialize, de::DeserializeOwned};

/// Landing page and form endpoint of the room timetable site.
pub const DEFAULT_ROOM_TIMETABLE_URL: &str = "http://studentssp.wit.ie/Timetables/RoomTT.aspx";

// The site ties its validation tokens to the last request in the session, so
// room submissions never overlap.
pub const MAX_IN_FLIGHT_REQUESTS: usize = 1;

/// The env vars read for a scraping run. Every one of them has a default.
#[derive(Debug, Deserialize)]
pub struct ScrapingEnv {
    #[serde(default = "default_room_timetable_url")]
    room_timetable_url: String,
    #[serde(default = "default_room_pattern")]
    room_pattern: String,
    #[serde(default)]
    week_offset: i32,
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,
    #[serde(default = "default_output_dir")]
    output_dir: PathBuf,
    #[serde(default)]
    debug_mode: bool,
}

fn default_room_timetable_url() -> String {
    DEFAULT_ROOM_TIMETABLE_URL.to_string()
}

fn default_room_pattern() -> String {
    "^IT101$".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

#[derive(Debug)]
pub struct ScrapingConfig {
    pub room_timetable_url: String,
    pub room_selector: RoomSelector,
    pub week_offset: i32,
    pub request_timeout: Duration,
    pub output_dir: PathBuf,
    pub debug_mode: bool,
}

impl ScrapingConfig {
    pub fn new() -> anyhow::Result<Self> {
        let scraping_env = ScrapingEnv::load_from_env()?;
        Self::from_env_values(scraping_env)
    }

    pub fn from_env_values(scraping_env: ScrapingEnv) -> anyhow::Result<Self> {
        if scraping_env.request_timeout_secs == 0 {
            return Err(anyhow::anyhow!("REQUEST_TIMEOUT_SECS must be greater than zero"));
        }
        let room_selector = RoomSelector::new(&scraping_env.room_pattern)?;
        Ok(Self {
            room_timetable_url: scraping_env.room_timetable_url,
            room_selector,
            week_offset: scraping_env.week_offset,
            request_timeout: Duration::from_secs(scraping_env.request_timeout_secs),
            output_dir: scraping_env.output_dir,
            debug_mode: scraping_env.debug_mode,
        })
    }

    /// Defaults pointed at another endpoint, e.g. a local mock server.
    #[cfg(test)]
    pub fn for_url(room_timetable_url: &str, room_pattern: &str) -> anyhow::Result<Self> {
        Ok(Self {
            room_timetable_url: room_timetable_url.to_string(),
            room_selector: RoomSelector::new(room_pattern)?,
            week_offset: 0,
            request_timeout: Duration::from_secs(default_request_timeout_secs()),
            output_dir: default_output_dir(),
            debug_mode: false,
        })
    }
}

/// Decides which room options of the landing page get a timetable request.
#[derive(Debug, Clone)]
pub struct RoomSelector {
    // Matched against the whole option value, e.g. `^IT1[0-9]{2}$`.
    room_regex: Regex,
}

impl RoomSelector {
    pub fn new(pattern: &str) -> anyhow::Result<Self> {
        let room_regex = Regex::new(pattern)
            .with_context(|| format!("invalid room pattern: {pattern}"))?;
        Ok(Self { room_regex })
    }

    pub fn matches(&self, room_id: &str) -> bool {
        self.room_regex.is_match(room_id)
    }

    pub fn pattern(&self) -> &str {
        self.room_regex.as_str()
    }
}

// Extension trait.
pub trait LoadFromEnv: DeserializeOwned {
    fn load_from_env() -> anyhow::Result<Self> {
        // Don't throw an error if .env file doesn't exist.
        let _ = dotenv::dotenv();
        let config =
            envy::from_env::<Self>().context("failed to load env variables into config struct")?;
        Ok(config)
    }
}

impl<T: DeserializeOwned> LoadFromEnv for T {}
