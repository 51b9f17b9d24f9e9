pub mod client;
pub mod espn;
pub mod logos;

use chrono::{DateTime, Utc};
use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Domain types — clean model, independent of the ESPN wire format
// ---------------------------------------------------------------------------

/// An RGB color for the display. "No color" is `Option<Rgb>::None`; an `Rgb`
/// value is always fully specified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Game lifecycle state. ESPN reports `pre`, `in` and `post`; anything else
/// is carried through verbatim so provider additions don't get lost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameState {
    Pre,
    In,
    Post,
    Other(String),
}

impl GameState {
    pub fn from_wire(state: &str) -> Self {
        match state {
            "pre" => GameState::Pre,
            "in" => GameState::In,
            "post" => GameState::Post,
            other => GameState::Other(other.to_owned()),
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        GameState::Pre
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameState::Pre => write!(f, "pre"),
            GameState::In => write!(f, "in"),
            GameState::Post => write!(f, "post"),
            GameState::Other(s) => write!(f, "{s}"),
        }
    }
}

/// Win/loss/tie token for a completed game, from the perspective of one team.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultToken {
    Win,
    Loss,
    Tie,
}

impl ResultToken {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultToken::Win => "W",
            ResultToken::Loss => "L",
            ResultToken::Tie => "T",
        }
    }
}

impl fmt::Display for ResultToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An NFL franchise. Team identity is always the string `id`; games carry
/// their own `Team` snapshots, so two games may hold distinct copies of the
/// same franchise.
#[derive(Debug, Clone, Default)]
pub struct Team {
    pub id: String,
    pub display_name: String, // "Kansas City Chiefs"
    pub abbreviation: String, // "KC"
    pub location: String,     // "Kansas City"
    pub name: String,         // "Chiefs"
    pub color_primary: Option<Rgb>,
    pub color_secondary: Option<Rgb>,
    pub record_summary: String, // "11-6"
    pub record_comment: Option<String>,
    pub logo_url: Option<String>,
    /// Local cached logo, set as a side effect of the logo cache. At most one
    /// file per abbreviation per process.
    pub logo_path: Option<PathBuf>,
}

impl Team {
    /// Deterministic cache file name, content-addressed by abbreviation.
    pub fn logo_filename(&self) -> String {
        format!("{}.png", self.abbreviation.to_lowercase())
    }

    /// Record string for display; teams parsed from degraded competitor
    /// payloads have no record.
    pub fn record_text(&self) -> &str {
        if self.record_summary.is_empty() {
            "--"
        } else {
            &self.record_summary
        }
    }
}

/// One contest between two teams.
#[derive(Debug, Clone, Default)]
pub struct Game {
    pub event_id: String,
    /// UTC kickoff instant. `None` for undated placeholders.
    pub date: Option<DateTime<Utc>>,
    pub home: Team,
    pub away: Team,
    pub state: GameState,
    pub status_detail: String,
    pub is_completed: bool,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub venue: Option<String>,
    // In-progress detail, present only while the game is live.
    pub quarter: Option<u8>,
    pub time_remaining: Option<String>,
    pub possession_team_id: Option<String>,
}

impl Game {
    pub fn is_live(&self) -> bool {
        self.state == GameState::In
    }

    pub fn involves_team(&self, team_id: &str) -> bool {
        self.home.id == team_id || self.away.id == team_id
    }

    pub fn is_home_team(&self, team_id: &str) -> bool {
        self.home.id == team_id
    }

    /// The other participant, if `team_id` matches exactly one side.
    pub fn get_opponent(&self, team_id: &str) -> Option<&Team> {
        if self.home.id == team_id {
            Some(&self.away)
        } else if self.away.id == team_id {
            Some(&self.home)
        } else {
            None
        }
    }

    pub fn team_score(&self, team_id: &str) -> Option<u32> {
        if self.home.id == team_id {
            self.home_score
        } else if self.away.id == team_id {
            self.away_score
        } else {
            None
        }
    }

    pub fn opponent_score(&self, team_id: &str) -> Option<u32> {
        if self.home.id == team_id {
            self.away_score
        } else if self.away.id == team_id {
            self.home_score
        } else {
            None
        }
    }

    /// `W`/`L`/`T` for the given team once the contest is final. Incomplete
    /// or scoreless games have no result; a completed game missing either
    /// score is tolerated and treated the same way.
    pub fn result_token(&self, team_id: &str) -> Option<ResultToken> {
        if !self.is_completed {
            return None;
        }
        let ours = self.team_score(team_id)?;
        let theirs = self.opponent_score(team_id)?;
        Some(if ours > theirs {
            ResultToken::Win
        } else if ours < theirs {
            ResultToken::Loss
        } else {
            ResultToken::Tie
        })
    }
}
