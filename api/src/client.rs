use crate::espn::{
    EventsResponse, TeamResponse, TeamsResponse, WireCompetitor, WireEvent, WireLogo, WireTeam,
};
use crate::{Game, GameState, Rgb, Team};
use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, warn};
use reqwest::Client;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const ESPN_NFL_SITE_V2: &str = "https://site.api.espn.com/apis/site/v2/sports/football/nfl";

/// NFL API client backed by ESPN's public site endpoints.
///
/// Four logical endpoints: all-teams list, single-team detail, single-team
/// schedule, scoreboard (optionally dated). No retries here — a failed fetch
/// is the caller's problem.
#[derive(Debug, Clone)]
pub struct NflApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl Default for NflApi {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent("nflboard/0.1 (led matrix scoreboard)")
                .build()
                .unwrap_or_default(),
            base_url: ESPN_NFL_SITE_V2.to_owned(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    Missing(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::Missing(msg) => write!(f, "Missing data: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl NflApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client at a different base URL. Tests aim this at a local
    /// mock server.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Fetch the league-wide team list, keyed by string team id.
    pub async fn fetch_all_teams(&self) -> ApiResult<HashMap<String, Team>> {
        let url = format!("{}/teams?limit=40", self.base_url);
        let raw: TeamsResponse = self.get(&url).await?;

        let mut teams = HashMap::new();
        for entry in raw
            .sports
            .into_iter()
            .flatten()
            .flat_map(|s| s.leagues.into_iter().flatten())
            .flat_map(|l| l.teams.into_iter().flatten())
        {
            if let Some(wire) = entry.team {
                let team = map_team(&wire);
                teams.insert(team.id.clone(), team);
            }
        }
        Ok(teams)
    }

    /// Fetch one team's profile (record, standing, colors, logo).
    pub async fn fetch_team(&self, team_id: &str) -> ApiResult<Team> {
        let url = format!("{}/teams/{team_id}", self.base_url);
        let raw: TeamResponse = self.get(&url).await?;
        raw.team
            .as_ref()
            .map(map_team)
            .ok_or_else(|| ApiError::Missing(format!("no team payload for id {team_id}")))
    }

    /// Fetch one team's full-season schedule. Participants are resolved
    /// against a freshly fetched all-teams lookup; teams absent from the
    /// lookup fall back to the competitor-embedded payload.
    pub async fn fetch_team_schedule(&self, team_id: &str) -> ApiResult<Vec<Game>> {
        let url = format!("{}/teams/{team_id}/schedule", self.base_url);
        let raw: EventsResponse = self.get(&url).await?;
        let lookup = self.fetch_all_teams().await?;
        Ok(map_events(raw, &lookup))
    }

    /// Fetch the scoreboard: today's and in-progress games, or the slate for
    /// an explicit date.
    pub async fn fetch_scoreboard(&self, date: Option<NaiveDate>) -> ApiResult<Vec<Game>> {
        let url = match date {
            Some(d) => format!("{}/scoreboard?dates={}", self.base_url, d.format("%Y%m%d")),
            None => format!("{}/scoreboard", self.base_url),
        };
        let raw: EventsResponse = self.get(&url).await?;
        let lookup = self.fetch_all_teams().await?;
        Ok(map_events(raw, &lookup))
    }

    /// Re-fetch the scoreboard and return fresh copies of the given live
    /// games. Ids absent from the fresh scoreboard are silently dropped;
    /// the caller keeps its stale data for those.
    pub async fn refresh_live_games(&self, event_ids: &HashSet<String>) -> ApiResult<Vec<Game>> {
        if event_ids.is_empty() {
            return Ok(Vec::new());
        }
        let games = self.fetch_scoreboard(None).await?;
        Ok(games
            .into_iter()
            .filter(|g| event_ids.contains(&g.event_id))
            .collect())
    }

    async fn get<T: Default + serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        debug!("fetching {url}");
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e, url.to_owned())),
            Err(e) => Err(ApiError::Api(e, url.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// Mapping: ESPN wire types → clean domain types
// ---------------------------------------------------------------------------

/// Map a full team payload (teams list or team-detail endpoint).
pub fn map_team(wire: &WireTeam) -> Team {
    let record_summary = wire
        .record
        .as_ref()
        .and_then(|r| r.items.as_ref())
        .into_iter()
        .flatten()
        .find_map(|item| item.summary.clone().filter(|s| !s.is_empty()))
        .unwrap_or_default();

    Team {
        record_summary,
        record_comment: wire.standing_summary.clone(),
        ..map_team_base(wire)
    }
}

/// Map the minimal team embedded in a competitor payload. Degraded: the
/// schedule feed carries no record there.
pub fn map_competitor_team(wire: &WireTeam) -> Team {
    map_team_base(wire)
}

fn map_team_base(wire: &WireTeam) -> Team {
    let display_name = wire
        .display_name
        .clone()
        .or_else(|| wire.name.clone())
        .unwrap_or_default();

    Team {
        id: wire.id.as_ref().map(|id| id.as_string()).unwrap_or_default(),
        display_name,
        abbreviation: wire.abbreviation.clone().unwrap_or_default(),
        location: wire.location.clone().unwrap_or_default(),
        name: wire.name.clone().unwrap_or_default(),
        color_primary: wire.color.as_deref().and_then(parse_hex_color),
        color_secondary: wire.alternate_color.as_deref().and_then(parse_hex_color),
        record_summary: String::new(),
        record_comment: None,
        logo_url: pick_logo_url(wire.logos.as_deref().unwrap_or_default()),
        logo_path: None,
    }
}

fn map_events(raw: EventsResponse, lookup: &HashMap<String, Team>) -> Vec<Game> {
    raw.events
        .unwrap_or_default()
        .iter()
        .filter_map(|event| map_event(event, lookup))
        .collect()
}

/// Map one event to a `Game`. Returns `None` when a side cannot be resolved
/// at all (no competitor tagged for it, or no team payload anywhere).
pub fn map_event(event: &WireEvent, lookup: &HashMap<String, Team>) -> Option<Game> {
    let competition = event.competitions.as_ref()?.first()?;
    let competitors = competition.competitors.as_deref().unwrap_or_default();

    let home_competitor = competitors
        .iter()
        .find(|c| c.home_away.as_deref() == Some("home"))?;
    let away_competitor = competitors
        .iter()
        .find(|c| c.home_away.as_deref() == Some("away"))?;

    let home = resolve_team(home_competitor, lookup)?;
    let away = resolve_team(away_competitor, lookup)?;

    let status = competition.status.clone().unwrap_or_default();
    let status_type = status.status_type.unwrap_or_default();
    let state = GameState::from_wire(status_type.state.as_deref().unwrap_or(""));
    let is_live = state == GameState::In;

    let detail = status_type
        .detail
        .or(status_type.short_detail)
        .unwrap_or_default();

    Some(Game {
        event_id: event.id.as_ref().map(|id| id.as_string()).unwrap_or_default(),
        date: parse_utc_datetime(event.date.as_deref()),
        home,
        away,
        state,
        status_detail: detail,
        is_completed: status_type.completed.unwrap_or(false),
        home_score: home_competitor.score.as_ref().and_then(|s| s.as_u32()),
        away_score: away_competitor.score.as_ref().and_then(|s| s.as_u32()),
        venue: extract_venue(competition.venue.as_ref()),
        quarter: if is_live { status.period } else { None },
        time_remaining: if is_live { status.display_clock } else { None },
        possession_team_id: if is_live {
            competition
                .situation
                .as_ref()
                .and_then(|s| s.possession.as_ref())
                .map(|id| id.as_string())
        } else {
            None
        },
    })
}

/// Resolve a competitor to a full `Team` via the all-teams lookup, falling
/// back to the embedded competitor payload.
fn resolve_team(competitor: &WireCompetitor, lookup: &HashMap<String, Team>) -> Option<Team> {
    let team_id = competitor
        .team
        .as_ref()
        .and_then(|t| t.id.as_ref())
        .map(|id| id.as_string());

    if let Some(id) = &team_id
        && let Some(team) = lookup.get(id)
    {
        return Some(team.clone());
    }

    competitor.team.as_ref().map(map_competitor_team)
}

fn extract_venue(venue: Option<&crate::espn::WireVenue>) -> Option<String> {
    let venue = venue?;
    if let Some(name) = venue.full_name.clone().filter(|n| !n.is_empty()) {
        return Some(name);
    }
    let address = venue.address.as_ref()?;
    match (&address.city, &address.state) {
        (Some(city), Some(state)) => Some(format!("{city}, {state}")),
        (Some(city), None) => Some(city.clone()),
        _ => None,
    }
}

/// Prefer a logo tagged for the scoreboard; otherwise take the first.
pub fn pick_logo_url(logos: &[WireLogo]) -> Option<String> {
    let mut first = None;
    for logo in logos {
        let rel = logo.rel.as_deref().unwrap_or_default();
        if rel.iter().any(|r| r == "scoreboard") && logo.href.is_some() {
            return logo.href.clone();
        }
        if first.is_none() {
            first = logo.href.clone();
        }
    }
    first
}

// ---------------------------------------------------------------------------
// Coercion helpers
// ---------------------------------------------------------------------------

/// Convert an ESPN hex color string to RGB. The feed sometimes omits the `#`
/// prefix and sometimes sends an empty string; anything that is not six hex
/// digits is "no color".
pub fn parse_hex_color(raw: &str) -> Option<Rgb> {
    let hex = raw.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Rgb(r, g, b))
}

/// Parse an ESPN ISO-8601 timestamp (UTC, `Z` suffix). Malformed values are
/// logged and treated as absent.
pub fn parse_utc_datetime(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?;
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    // Schedule endpoints drop the seconds ("2025-09-07T17:00Z").
    if let Some(stripped) = raw.strip_suffix('Z')
        && let Ok(dt) = DateTime::parse_from_rfc3339(&format!("{stripped}:00Z"))
    {
        return Some(dt.with_timezone(&Utc));
    }
    warn!("could not parse date value '{raw}'");
    None
}
