//! ESPN API raw wire types: serde shapes for deserializing the NFL site v2
//! responses. These map to the clean domain types via the functions in
//! client.rs. Every field is optional; the feed omits things freely.

use serde::Deserialize;

/// Identifiers arrive as strings on most endpoints and as bare numbers on a
/// few. Comparison is always done on the string form.
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum WireId {
    Text(String),
    Number(i64),
}

impl WireId {
    pub fn as_string(&self) -> String {
        match self {
            WireId::Text(s) => s.clone(),
            WireId::Number(n) => n.to_string(),
        }
    }
}

/// Scores are strings on the scoreboard, objects on schedule endpoints, and
/// occasionally bare numbers.
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum WireScore {
    Text(String),
    Number(f64),
    Detailed {
        #[serde(rename = "displayValue")]
        display_value: Option<String>,
        value: Option<f64>,
    },
}

impl WireScore {
    /// Coerce to an integer score. Non-numeric or empty input is "absent",
    /// never an error.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            WireScore::Text(s) => s.trim().parse::<u32>().ok(),
            WireScore::Number(n) => {
                if *n >= 0.0 {
                    Some(*n as u32)
                } else {
                    None
                }
            }
            WireScore::Detailed { display_value, value } => display_value
                .as_deref()
                .and_then(|s| s.trim().parse::<u32>().ok())
                .or_else(|| value.filter(|v| *v >= 0.0).map(|v| v as u32)),
        }
    }
}

// ---------------------------------------------------------------------------
// Teams list  (teams endpoint: sports[0].leagues[0].teams[])
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct TeamsResponse {
    pub sports: Option<Vec<WireSport>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WireSport {
    pub leagues: Option<Vec<WireLeague>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WireLeague {
    pub teams: Option<Vec<WireTeamEntry>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WireTeamEntry {
    pub team: Option<WireTeam>,
}

// ---------------------------------------------------------------------------
// Single team detail
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct TeamResponse {
    pub team: Option<WireTeam>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireTeam {
    pub id: Option<WireId>,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    pub abbreviation: Option<String>,
    pub location: Option<String>,
    pub name: Option<String>,
    /// Hex color, sometimes without the leading `#`, sometimes empty.
    pub color: Option<String>,
    #[serde(rename = "alternateColor")]
    pub alternate_color: Option<String>,
    pub record: Option<WireRecord>,
    #[serde(rename = "standingSummary")]
    pub standing_summary: Option<String>,
    pub logos: Option<Vec<WireLogo>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireRecord {
    pub items: Option<Vec<WireRecordItem>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WireRecordItem {
    pub summary: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WireLogo {
    pub href: Option<String>,
    pub rel: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Events  (scoreboard and team schedule both nest games under events[])
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EventsResponse {
    pub events: Option<Vec<WireEvent>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireEvent {
    pub id: Option<WireId>,
    pub date: Option<String>, // ISO 8601, "Z" suffix
    pub competitions: Option<Vec<WireCompetition>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireCompetition {
    pub competitors: Option<Vec<WireCompetitor>>,
    pub status: Option<WireStatus>,
    pub situation: Option<WireSituation>,
    pub venue: Option<WireVenue>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireStatus {
    #[serde(rename = "type")]
    pub status_type: Option<WireStatusType>,
    pub period: Option<u8>,
    #[serde(rename = "displayClock")]
    pub display_clock: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireStatusType {
    pub state: Option<String>, // "pre" | "in" | "post"
    pub detail: Option<String>,
    #[serde(rename = "shortDetail")]
    pub short_detail: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireSituation {
    pub possession: Option<WireId>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireVenue {
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
    pub address: Option<WireAddress>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireAddress {
    pub city: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireCompetitor {
    pub id: Option<WireId>,
    #[serde(rename = "homeAway")]
    pub home_away: Option<String>, // "home" | "away"
    pub team: Option<WireTeam>,
    pub score: Option<WireScore>,
}
