use anyhow::{Context, Result, bail};
use chrono::NaiveTime;
use log::{info, warn};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_DISPLAY_SECONDS: u64 = 8;
pub const DEFAULT_REFRESH_SECONDS: u64 = 300;
pub const DEFAULT_PREVIOUS_GAMES_CUTOFF: &str = "06:00";

/// `team_ids` accepts either a single id or a list, the way the host
/// framework's board configs do.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TeamIds {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Deserialize, Default)]
struct RawConfig {
    team_ids: Option<TeamIds>,
    display_seconds: Option<u64>,
    refresh_seconds: Option<u64>,
    show_todays_games: Option<bool>,
    show_previous_games_until: Option<String>,
}

/// Validated board configuration.
#[derive(Debug, Clone)]
pub struct BoardConfig {
    /// Favorite teams, in display order. Never empty.
    pub team_ids: Vec<String>,
    /// How long each rendered view holds on screen.
    pub display_seconds: u64,
    /// Snapshot refresh interval.
    pub refresh_seconds: u64,
    /// Also show games not involving a favorite team.
    pub show_todays_games: bool,
    /// Local time-of-day until which yesterday's finished games stay on the
    /// board. `None` disables previous-game carryover.
    pub previous_games_cutoff: Option<NaiveTime>,
}

impl BoardConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("could not read config file {}", path.display()))?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let raw: RawConfig = serde_json::from_str(text).context("invalid config JSON")?;

        let team_ids = match raw.team_ids {
            Some(TeamIds::One(id)) => vec![id],
            Some(TeamIds::Many(ids)) => ids,
            None => Vec::new(),
        };
        let team_ids: Vec<String> = team_ids
            .into_iter()
            .map(|id| id.trim().to_owned())
            .filter(|id| !id.is_empty())
            .collect();
        if team_ids.is_empty() {
            bail!("at least one team_id is required");
        }

        let cutoff_raw = raw
            .show_previous_games_until
            .unwrap_or_else(|| DEFAULT_PREVIOUS_GAMES_CUTOFF.to_owned());

        let config = Self {
            team_ids,
            display_seconds: raw.display_seconds.unwrap_or(DEFAULT_DISPLAY_SECONDS),
            refresh_seconds: raw.refresh_seconds.unwrap_or(DEFAULT_REFRESH_SECONDS),
            show_todays_games: raw.show_todays_games.unwrap_or(false),
            previous_games_cutoff: parse_cutoff(&cutoff_raw),
        };
        info!(
            "configured for teams {:?}, refresh every {}s",
            config.team_ids, config.refresh_seconds
        );
        Ok(config)
    }
}

/// Parse the `HH:MM` cutoff. An empty string disables carryover; a malformed
/// value falls back to the default with a warning.
fn parse_cutoff(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match NaiveTime::parse_from_str(raw, "%H:%M") {
        Ok(time) => Some(time),
        Err(_) => {
            warn!("invalid cutoff time '{raw}', using {DEFAULT_PREVIOUS_GAMES_CUTOFF}");
            NaiveTime::parse_from_str(DEFAULT_PREVIOUS_GAMES_CUTOFF, "%H:%M").ok()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn team_ids_are_required() {
        assert!(BoardConfig::from_json("{}").is_err());
        assert!(BoardConfig::from_json(r#"{"team_ids": []}"#).is_err());
        assert!(BoardConfig::from_json(r#"{"team_ids": ["  "]}"#).is_err());
    }

    #[test]
    fn single_string_team_id_is_accepted() {
        let config = BoardConfig::from_json(r#"{"team_ids": "12"}"#).unwrap();
        assert_eq!(config.team_ids, vec!["12"]);
    }

    #[test]
    fn defaults_apply_when_fields_are_omitted() {
        let config = BoardConfig::from_json(r#"{"team_ids": ["12", "8"]}"#).unwrap();
        assert_eq!(config.display_seconds, DEFAULT_DISPLAY_SECONDS);
        assert_eq!(config.refresh_seconds, DEFAULT_REFRESH_SECONDS);
        assert!(!config.show_todays_games);
        let cutoff = config.previous_games_cutoff.unwrap();
        assert_eq!((cutoff.hour(), cutoff.minute()), (6, 0));
    }

    #[test]
    fn empty_cutoff_disables_previous_game_carryover() {
        let config = BoardConfig::from_json(
            r#"{"team_ids": ["12"], "show_previous_games_until": ""}"#,
        )
        .unwrap();
        assert!(config.previous_games_cutoff.is_none());
    }

    #[test]
    fn malformed_cutoff_falls_back_to_default() {
        let config = BoardConfig::from_json(
            r#"{"team_ids": ["12"], "show_previous_games_until": "late"}"#,
        )
        .unwrap();
        let cutoff = config.previous_games_cutoff.unwrap();
        assert_eq!((cutoff.hour(), cutoff.minute()), (6, 0));
    }

    #[test]
    fn explicit_values_win() {
        let config = BoardConfig::from_json(
            r#"{
                "team_ids": ["12"],
                "display_seconds": 5,
                "refresh_seconds": 120,
                "show_todays_games": true,
                "show_previous_games_until": "09:30"
            }"#,
        )
        .unwrap();
        assert_eq!(config.display_seconds, 5);
        assert_eq!(config.refresh_seconds, 120);
        assert!(config.show_todays_games);
        let cutoff = config.previous_games_cutoff.unwrap();
        assert_eq!((cutoff.hour(), cutoff.minute()), (9, 30));
    }
}
