use crate::config::BoardConfig;
use crate::state::snapshot::Snapshot;
use chrono::{Days, Local, NaiveDate, NaiveTime, Utc};
use log::{error, warn};
use nfl_api::client::{ApiResult, NflApi};
use nfl_api::logos::LogoCache;
use nfl_api::{Game, Team};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

/// Runs one full refresh cycle: several independent network calls reconciled
/// into a single consistent `Snapshot`.
pub struct SnapshotBuilder {
    api: NflApi,
    logos: LogoCache,
    config: Arc<BoardConfig>,
}

impl SnapshotBuilder {
    pub fn new(config: Arc<BoardConfig>, logo_dir: impl Into<PathBuf>) -> Self {
        Self {
            api: NflApi::new(),
            logos: LogoCache::new(logo_dir),
            config,
        }
    }

    /// Build a snapshot. Never fails: a total refresh failure collapses to an
    /// error snapshot so the render path always has something to read.
    pub async fn build(&mut self) -> Snapshot {
        match self.try_build().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                error!("refresh failed: {err}");
                Snapshot::error(err.to_string())
            }
        }
    }

    async fn try_build(&mut self) -> ApiResult<Snapshot> {
        let now_local = Local::now();
        let today = now_local.date_naive();

        let scoreboard = self.api.fetch_scoreboard(None).await?;

        // Per-team failures are isolated: that team simply has no profile and
        // an empty schedule this cycle.
        let mut favorite_teams = HashMap::new();
        let mut schedules = HashMap::new();
        for team_id in &self.config.team_ids {
            match fetch_team_data(&self.api, team_id).await {
                Ok((team, schedule)) => {
                    favorite_teams.insert(team_id.clone(), team);
                    schedules.insert(team_id.clone(), schedule);
                }
                Err(err) => {
                    warn!("team {team_id} unavailable this refresh: {err}");
                    schedules.insert(team_id.clone(), Vec::new());
                }
            }
        }

        let mut display_games =
            if previous_games_needed(self.config.previous_games_cutoff, now_local.time()) {
                let lookback = self.fetch_lookback(today).await?;
                merge_previous_games(scoreboard, lookback, today)
            } else {
                filter_current_games(scoreboard, today)
            };

        let live_ids: HashSet<String> = display_games
            .iter()
            .filter(|g| g.is_live())
            .map(|g| g.event_id.clone())
            .collect();
        if !live_ids.is_empty() {
            let updates = self.api.refresh_live_games(&live_ids).await?;
            apply_live_updates(&mut display_games, updates);
        }

        let (mut favorite_games, mut other_games) =
            partition_games(display_games.clone(), &self.config.team_ids);
        if !self.config.show_todays_games {
            other_games.clear();
        }

        let teams_with_game_today =
            teams_with_game_today(&favorite_games, &self.config.team_ids, today);

        // Logos only for what will actually be drawn.
        for team in favorite_teams.values_mut() {
            self.ensure_team_logo(team).await;
        }
        for game in favorite_games.iter_mut().chain(other_games.iter_mut()) {
            self.ensure_team_logo(&mut game.home).await;
            self.ensure_team_logo(&mut game.away).await;
        }

        Ok(Snapshot {
            favorite_teams,
            favorite_games,
            teams_with_game_today,
            other_games,
            display_games,
            schedules,
            error: None,
            built_at: Utc::now(),
        })
    }

    /// Scoreboards for the three days before `today`, merged into one list.
    async fn fetch_lookback(&self, today: NaiveDate) -> ApiResult<Vec<Game>> {
        let mut games = Vec::new();
        for days_back in 1..=3u64 {
            if let Some(date) = today.checked_sub_days(Days::new(days_back)) {
                games.extend(self.api.fetch_scoreboard(Some(date)).await?);
            }
        }
        Ok(games)
    }

    async fn ensure_team_logo(&mut self, team: &mut Team) {
        if team.logo_path.is_some() {
            return;
        }
        if let Some(url) = team.logo_url.clone() {
            team.logo_path = self.logos.ensure(&team.abbreviation, &url).await;
        }
    }
}

async fn fetch_team_data(api: &NflApi, team_id: &str) -> ApiResult<(Team, Vec<Game>)> {
    let team = api.fetch_team(team_id).await?;
    let schedule = api.fetch_team_schedule(team_id).await?;
    Ok((team, schedule))
}

// ---------------------------------------------------------------------------
// Time-window and partition rules (pure; `now`/`today` injected)
// ---------------------------------------------------------------------------

/// Previous-day games stay relevant until the configured local cutoff time.
/// No cutoff means carryover is disabled.
fn previous_games_needed(cutoff: Option<NaiveTime>, now: NaiveTime) -> bool {
    match cutoff {
        Some(cutoff) => now < cutoff,
        None => false,
    }
}

fn local_game_date(game: &Game) -> Option<NaiveDate> {
    game.date.map(|d| d.with_timezone(&Local).date_naive())
}

/// Before the cutoff: keep the current list and merge in lookback games that
/// are completed and dated strictly before today. Duplicate event ids from
/// overlapping scoreboards are dropped.
fn merge_previous_games(current: Vec<Game>, lookback: Vec<Game>, today: NaiveDate) -> Vec<Game> {
    let mut seen: HashSet<String> = current.iter().map(|g| g.event_id.clone()).collect();
    let mut games = current;
    for game in lookback {
        if !game.is_completed {
            continue;
        }
        let Some(date) = local_game_date(&game) else {
            continue;
        };
        if date < today && seen.insert(game.event_id.clone()) {
            games.push(game);
        }
    }
    games
}

/// At or after the cutoff: drop completed games dated strictly before today.
/// Games dated today or later always stay, and a non-completed game stays
/// regardless of its date.
fn filter_current_games(games: Vec<Game>, today: NaiveDate) -> Vec<Game> {
    games
        .into_iter()
        .filter(|game| {
            !game.is_completed || local_game_date(game).is_some_and(|date| date >= today)
        })
        .collect()
}

/// Split the display list into (favorite, other) by participant membership.
fn partition_games(games: Vec<Game>, favorites: &[String]) -> (Vec<Game>, Vec<Game>) {
    games
        .into_iter()
        .partition(|game| favorites.iter().any(|id| game.involves_team(id)))
}

/// Overwrite display entries with freshly fetched live games, matched by
/// event id. Entries with no fresh copy keep their stale data.
fn apply_live_updates(display: &mut [Game], updates: Vec<Game>) {
    for update in updates {
        if let Some(slot) = display.iter_mut().find(|g| g.event_id == update.event_id) {
            *slot = update;
        }
    }
}

/// Favorite team ids that have a game dated today among the favorite games.
fn teams_with_game_today(
    favorite_games: &[Game],
    favorites: &[String],
    today: NaiveDate,
) -> HashSet<String> {
    let mut out = HashSet::new();
    for game in favorite_games {
        if local_game_date(game) == Some(today) {
            for id in favorites {
                if game.involves_team(id) {
                    out.insert(id.clone());
                }
            }
        }
    }
    out
}
