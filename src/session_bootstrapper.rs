use std::sync::LazyLock;

use anyhow::Context;
use log::{debug, error, info, warn};
use scraper::{Html, Selector};

use crate::{
    bootstrap_error::BootstrapError,
    config::{RoomSelector, ScrapingConfig},
    requests::RequestClient,
    session_state::{FormTokens, RoomCandidate, SessionState},
};

static HIDDEN_INPUT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("input[type='hidden']").unwrap());
static SELECTED_WEEK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("select[name='CboWeeks'] > option[selected]").unwrap());
static ROOM_SELECT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("select[name='CboLocation']").unwrap());
static OPTION_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("option").unwrap());

/// Session replay data plus the rooms to request, in landing page order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrappedSession {
    pub state: SessionState,
    pub rooms: Vec<RoomCandidate>,
}

#[derive(Debug)]
pub struct SessionBootstrapper {
    pub url: String,
    pub week_offset: i32,
    pub room_selector: RoomSelector,
}

impl SessionBootstrapper {
    pub fn new(url: String, week_offset: i32, room_selector: RoomSelector) -> Self {
        SessionBootstrapper {
            url,
            week_offset,
            room_selector,
        }
    }

    pub fn from_config(config: &ScrapingConfig) -> Self {
        Self::new(
            config.room_timetable_url.clone(),
            config.week_offset,
            config.room_selector.clone(),
        )
    }

    /// GETs the landing page and captures what every room submission replays.
    ///
    /// Any failure here is fatal to the run: without the session tokens no
    /// room request can succeed.
    pub async fn bootstrap(
        &self,
        request_client: &RequestClient,
    ) -> anyhow::Result<BootstrappedSession> {
        info!("Getting required metadata from {}", self.url);
        let html = request_client
            .fetch_url_body(&self.url)
            .await
            .with_context(|| format!("getting required metadata from {} failed", self.url))?;
        let session = self.parse_landing_page(&html)?;
        info!(
            "Found {} room(s) matching {}, week code {:?}",
            session.rooms.len(),
            self.room_selector.pattern(),
            session.state.week_code
        );
        if session.rooms.is_empty() {
            warn!("No room on the landing page matches {}", self.room_selector.pattern());
        }
        Ok(session)
    }

    pub fn parse_landing_page(&self, html: &str) -> Result<BootstrappedSession, BootstrapError> {
        let document = Html::parse_document(html);

        let mut tokens = FormTokens::default();
        for hidden_input in document.select(&HIDDEN_INPUT_SELECTOR) {
            let Some(name) = hidden_input.attr("name") else {
                continue;
            };
            tokens.capture(name, hidden_input.attr("value").unwrap_or_default());
        }
        for missing in tokens.missing() {
            warn!("Landing page has no {missing} field, submitting without it");
        }

        let raw_week = document
            .select(&SELECTED_WEEK_SELECTOR)
            .next()
            .and_then(|option| option.attr("value"))
            .unwrap_or_default();
        let week_code = resolve_week_code(raw_week, self.week_offset);

        let Some(room_select) = document.select(&ROOM_SELECT_SELECTOR).next() else {
            return Err(BootstrapError::MissingRoomSelector {
                url: self.url.clone(),
            });
        };
        let mut rooms: Vec<RoomCandidate> = Vec::new();
        for room_name in room_select
            .select(&OPTION_SELECTOR)
            .filter_map(|option| option.attr("value"))
            .filter(|room_name| self.room_selector.matches(room_name))
        {
            // Each room is requested once, at its first position in the list.
            if rooms.iter().any(|room| room.id() == room_name) {
                debug!("Skipping repeated room option {room_name}");
                continue;
            }
            debug!("Room found: {room_name}");
            rooms.push(RoomCandidate(room_name.to_string()));
        }

        Ok(BootstrappedSession {
            state: SessionState::new(tokens, week_code),
            rooms,
        })
    }
}

/// Shifts the selected week by `offset`. A week value that is not an integer
/// is sent back untouched.
pub fn resolve_week_code(raw_week: &str, offset: i32) -> String {
    match raw_week.parse::<i32>() {
        Ok(week) => week.saturating_add(offset).to_string(),
        Err(e) => {
            error!("Failed to convert week string {raw_week:?} to int: {e}");
            raw_week.to_string()
        }
    }
}
