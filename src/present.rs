//! Turns a snapshot into the ordered list of views the board cycles through,
//! and formats every display string. Formatting is pure; the timezone is a
//! parameter so tests run against a fixed offset while production passes
//! `Local`.

use crate::state::snapshot::Snapshot;
use chrono::{DateTime, TimeZone, Utc};
use log::warn;
use nfl_api::{Game, Team};
use std::collections::HashSet;
use std::fmt;

/// One view in the display rotation.
#[derive(Debug, Clone)]
pub enum DisplayItem {
    Game(Game),
    TeamSummary {
        team: Team,
        next_game: Option<Game>,
        last_game: Option<Game>,
    },
}

/// Build the rotation from a snapshot, in configured team order: each
/// favorite shows its game today or, failing that, a season summary. Games
/// carried over from yesterday follow, then the rest of the league slate.
/// A favorite with neither game nor profile this cycle is skipped.
pub fn select_items(snapshot: &Snapshot, team_ids: &[String]) -> Vec<DisplayItem> {
    let mut items = Vec::new();
    let mut shown: HashSet<String> = HashSet::new();

    for team_id in team_ids {
        if snapshot.teams_with_game_today.contains(team_id) {
            let game = snapshot
                .favorite_games
                .iter()
                .find(|g| g.involves_team(team_id) && !shown.contains(&g.event_id));
            if let Some(game) = game {
                shown.insert(game.event_id.clone());
                items.push(DisplayItem::Game(game.clone()));
                continue;
            }
            // The game was already claimed by the other favorite in it.
            if snapshot
                .favorite_games
                .iter()
                .any(|g| g.involves_team(team_id))
            {
                continue;
            }
        }

        match snapshot.favorite_teams.get(team_id) {
            Some(team) => {
                let schedule = snapshot
                    .schedules
                    .get(team_id)
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                items.push(DisplayItem::TeamSummary {
                    team: team.clone(),
                    next_game: next_game(schedule).cloned(),
                    last_game: last_game(schedule).cloned(),
                });
            }
            None => warn!("no data for team {team_id} this cycle, skipping"),
        }
    }

    // Carryover games (yesterday's finals kept until the cutoff) are in the
    // favorite list but their teams are not "playing today".
    for game in &snapshot.favorite_games {
        if shown.insert(game.event_id.clone()) {
            items.push(DisplayItem::Game(game.clone()));
        }
    }

    for game in &snapshot.other_games {
        if shown.insert(game.event_id.clone()) {
            items.push(DisplayItem::Game(game.clone()));
        }
    }

    items
}

/// Earliest game still to be played. Undated games sort after every dated
/// one; live games are already on screen as games, not summaries.
pub fn next_game(schedule: &[Game]) -> Option<&Game> {
    schedule
        .iter()
        .filter(|g| !g.is_completed && !g.is_live())
        .min_by_key(|g| (g.date.is_none(), g.date))
}

/// Most recent completed game. Undated completed games are treated as the
/// oldest.
pub fn last_game(schedule: &[Game]) -> Option<&Game> {
    schedule.iter().filter(|g| g.is_completed).max_by_key(|g| g.date)
}

// ---------------------------------------------------------------------------
// Display strings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeStyle {
    /// `Sun 12/7 1:00 PM`
    Full,
    /// `1:00 PM`
    TimeOnly,
    /// `Sun 12/7`
    DateOnly,
    /// `12/7 1:00 PM`
    Short,
}

impl TimeStyle {
    fn pattern(self) -> &'static str {
        match self {
            TimeStyle::Full => "%a %-m/%-d %-I:%M %p",
            TimeStyle::TimeOnly => "%-I:%M %p",
            TimeStyle::DateOnly => "%a %-m/%-d",
            TimeStyle::Short => "%-m/%-d %-I:%M %p",
        }
    }
}

/// Kickoff instant in the viewer's timezone. Undated games show `TBD`.
pub fn format_game_time<Tz: TimeZone>(
    date: Option<DateTime<Utc>>,
    style: TimeStyle,
    tz: &Tz,
) -> String
where
    Tz::Offset: fmt::Display,
{
    match date {
        Some(instant) => instant.with_timezone(tz).format(style.pattern()).to_string(),
        None => "TBD".to_owned(),
    }
}

/// `VS <opponent>` at home, `AT <opponent>` on the road. The opponent text
/// prefers the city, then the abbreviation, then the full name.
pub fn opponent_label(game: &Game, team_id: &str) -> Option<String> {
    let opponent = game.get_opponent(team_id)?;
    let prefix = if game.is_home_team(team_id) { "VS" } else { "AT" };
    Some(format!("{prefix} {}", opponent_text(opponent)))
}

fn opponent_text(team: &Team) -> &str {
    if !team.location.is_empty() {
        &team.location
    } else if !team.abbreviation.is_empty() {
        &team.abbreviation
    } else {
        &team.display_name
    }
}

/// Summary line for the upcoming game, `---` when the schedule has none left.
pub fn next_game_line<Tz: TimeZone>(team_id: &str, game: Option<&Game>, tz: &Tz) -> String
where
    Tz::Offset: fmt::Display,
{
    let Some(game) = game else {
        return "---".to_owned();
    };
    let when = format_game_time(game.date, TimeStyle::Short, tz);
    match opponent_label(game, team_id) {
        Some(label) => format!("{when} {label}").to_uppercase(),
        None => when.to_uppercase(),
    }
}

/// Summary line for the most recent result, `---` when nothing is completed.
pub fn last_game_line(team_id: &str, game: Option<&Game>) -> String {
    let Some(game) = game else {
        return "---".to_owned();
    };
    let label = opponent_label(game, team_id).unwrap_or_default();
    let line = match (
        game.result_token(team_id),
        game.team_score(team_id),
        game.opponent_score(team_id),
    ) {
        (Some(token), Some(ours), Some(theirs)) => {
            format!("{token} {ours}-{theirs} {label}")
        }
        // Final without scores on the wire: show the matchup alone.
        _ => label,
    };
    line.trim().to_uppercase()
}

/// In-progress status, degrading with whatever the wire carried.
pub fn live_status(game: &Game) -> String {
    match (game.quarter, game.time_remaining.as_deref()) {
        (Some(quarter), Some(clock)) => format!("Q{quarter} {clock}"),
        (Some(quarter), None) => format!("Q{quarter}"),
        _ => "LIVE".to_owned(),
    }
}

/// Away score before home score, missing scores shown as zero.
pub fn score_line(game: &Game) -> String {
    format!(
        "{}-{}",
        game.away_score.unwrap_or(0),
        game.home_score.unwrap_or(0)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use nfl_api::GameState;
    use std::collections::{HashMap, HashSet};

    fn team(id: &str, abbrev: &str, location: &str) -> Team {
        Team {
            id: id.to_owned(),
            abbreviation: abbrev.to_owned(),
            location: location.to_owned(),
            display_name: format!("{location} {abbrev}"),
            ..Team::default()
        }
    }

    fn game(event_id: &str, home: Team, away: Team) -> Game {
        Game {
            event_id: event_id.to_owned(),
            home,
            away,
            ..Game::default()
        }
    }

    fn est() -> FixedOffset {
        FixedOffset::west_opt(5 * 3600).unwrap()
    }

    /// 2025-12-07 18:00 UTC is Sunday 1:00 PM EST.
    fn sunday_kickoff() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 12, 7, 18, 0, 0).unwrap()
    }

    #[test]
    fn time_styles_use_twelve_hour_clock_without_leading_zero() {
        let date = Some(sunday_kickoff());
        let tz = est();
        assert_eq!(format_game_time(date, TimeStyle::Full, &tz), "Sun 12/7 1:00 PM");
        assert_eq!(format_game_time(date, TimeStyle::TimeOnly, &tz), "1:00 PM");
        assert_eq!(format_game_time(date, TimeStyle::DateOnly, &tz), "Sun 12/7");
        assert_eq!(format_game_time(date, TimeStyle::Short, &tz), "12/7 1:00 PM");
        assert_eq!(format_game_time(None, TimeStyle::Full, &tz), "TBD");
    }

    #[test]
    fn next_game_is_earliest_pending_with_undated_last() {
        let mut played = game("1", team("1", "A", "Aville"), team("2", "B", "Bton"));
        played.is_completed = true;
        played.date = Some(Utc.with_ymd_and_hms(2025, 11, 30, 18, 0, 0).unwrap());

        let mut undated = game("2", team("1", "A", "Aville"), team("3", "C", "Cburg"));
        undated.date = None;

        let mut soon = game("3", team("4", "D", "Dtown"), team("1", "A", "Aville"));
        soon.date = Some(sunday_kickoff());

        let mut later = game("4", team("1", "A", "Aville"), team("5", "E", "Efield"));
        later.date = Some(Utc.with_ymd_and_hms(2025, 12, 14, 18, 0, 0).unwrap());

        let schedule = vec![played, undated.clone(), soon.clone(), later];
        assert_eq!(next_game(&schedule).map(|g| g.event_id.as_str()), Some("3"));

        // Only undated pending games left: still a next game.
        let schedule = vec![undated];
        assert_eq!(next_game(&schedule).map(|g| g.event_id.as_str()), Some("2"));

        assert!(next_game(&[]).is_none());
    }

    #[test]
    fn live_games_are_not_next_games() {
        let mut live = game("1", team("1", "A", "Aville"), team("2", "B", "Bton"));
        live.state = GameState::In;
        live.date = Some(sunday_kickoff());
        assert!(next_game(&[live]).is_none());
    }

    #[test]
    fn last_game_is_latest_completed_with_undated_oldest() {
        let mut older = game("1", team("1", "A", "Aville"), team("2", "B", "Bton"));
        older.is_completed = true;
        older.date = Some(Utc.with_ymd_and_hms(2025, 11, 23, 18, 0, 0).unwrap());

        let mut newer = game("2", team("1", "A", "Aville"), team("3", "C", "Cburg"));
        newer.is_completed = true;
        newer.date = Some(Utc.with_ymd_and_hms(2025, 11, 30, 18, 0, 0).unwrap());

        let mut undated = game("3", team("1", "A", "Aville"), team("4", "D", "Dtown"));
        undated.is_completed = true;

        let pending = game("4", team("1", "A", "Aville"), team("5", "E", "Efield"));

        let schedule = vec![undated, older, newer, pending];
        assert_eq!(last_game(&schedule).map(|g| g.event_id.as_str()), Some("2"));
        assert!(last_game(&[]).is_none());
    }

    #[test]
    fn opponent_label_prefers_location_then_abbreviation_then_name() {
        let favorite = team("12", "KC", "Kansas City");
        let g = game("1", favorite.clone(), team("8", "DET", "Detroit"));
        assert_eq!(opponent_label(&g, "12").as_deref(), Some("VS Detroit"));
        assert_eq!(opponent_label(&g, "8").as_deref(), Some("AT Kansas City"));
        assert_eq!(opponent_label(&g, "99"), None);

        let mut no_location = team("8", "DET", "");
        no_location.display_name = "Detroit Lions".to_owned();
        let g = game("2", favorite.clone(), no_location);
        assert_eq!(opponent_label(&g, "12").as_deref(), Some("VS DET"));

        let mut name_only = team("8", "", "");
        name_only.display_name = "Detroit Lions".to_owned();
        let g = game("3", favorite, name_only);
        assert_eq!(opponent_label(&g, "12").as_deref(), Some("VS Detroit Lions"));
    }

    #[test]
    fn next_game_line_is_uppercased_time_and_opponent() {
        let mut g = game("1", team("8", "DET", "Detroit"), team("12", "KC", "Kansas City"));
        g.date = Some(sunday_kickoff());
        assert_eq!(
            next_game_line("12", Some(&g), &est()),
            "12/7 1:00 PM AT DETROIT"
        );
        assert_eq!(next_game_line("12", None, &est()), "---");
    }

    #[test]
    fn last_game_line_carries_result_token_and_scores() {
        let mut g = game("1", team("12", "KC", "Kansas City"), team("8", "DET", "Detroit"));
        g.is_completed = true;
        g.home_score = Some(24);
        g.away_score = Some(17);
        assert_eq!(last_game_line("12", Some(&g)), "W 24-17 VS DETROIT");
        assert_eq!(last_game_line("8", Some(&g)), "L 17-24 AT KANSAS CITY");
        assert_eq!(last_game_line("12", None), "---");

        // Final with no scores on the wire.
        g.home_score = None;
        assert_eq!(last_game_line("12", Some(&g)), "VS DETROIT");
    }

    #[test]
    fn live_status_degrades_with_missing_detail() {
        let mut g = game("1", team("12", "KC", "Kansas City"), team("8", "DET", "Detroit"));
        g.state = GameState::In;
        g.quarter = Some(3);
        g.time_remaining = Some("4:32".to_owned());
        assert_eq!(live_status(&g), "Q3 4:32");
        g.time_remaining = None;
        assert_eq!(live_status(&g), "Q3");
        g.quarter = None;
        assert_eq!(live_status(&g), "LIVE");
    }

    #[test]
    fn score_line_is_away_before_home() {
        let mut g = game("1", team("12", "KC", "Kansas City"), team("8", "DET", "Detroit"));
        g.home_score = Some(24);
        g.away_score = Some(17);
        assert_eq!(score_line(&g), "17-24");
        g.away_score = None;
        assert_eq!(score_line(&g), "0-24");
    }

    #[test]
    fn selection_shows_todays_game_then_summaries_in_configured_order() {
        let a = team("12", "KC", "Kansas City");
        let b = team("8", "DET", "Detroit");

        let mut today = game("401", a.clone(), team("20", "NYJ", "New York"));
        today.date = Some(sunday_kickoff());

        let mut b_next = game("402", b.clone(), team("21", "CHI", "Chicago"));
        b_next.date = Some(Utc.with_ymd_and_hms(2025, 12, 14, 18, 0, 0).unwrap());
        let mut b_last = game("403", team("22", "GB", "Green Bay"), b.clone());
        b_last.is_completed = true;
        b_last.date = Some(Utc.with_ymd_and_hms(2025, 11, 30, 18, 0, 0).unwrap());

        let snapshot = Snapshot {
            favorite_teams: HashMap::from([("12".to_owned(), a), ("8".to_owned(), b)]),
            favorite_games: vec![today.clone()],
            teams_with_game_today: HashSet::from(["12".to_owned()]),
            schedules: HashMap::from([(
                "8".to_owned(),
                vec![b_next.clone(), b_last.clone()],
            )]),
            ..Snapshot::default()
        };

        let items = select_items(&snapshot, &["12".to_owned(), "8".to_owned()]);
        assert_eq!(items.len(), 2);
        match &items[0] {
            DisplayItem::Game(g) => assert_eq!(g.event_id, "401"),
            other => panic!("expected game view, got {other:?}"),
        }
        match &items[1] {
            DisplayItem::TeamSummary {
                team,
                next_game,
                last_game,
            } => {
                assert_eq!(team.id, "8");
                assert_eq!(next_game.as_ref().map(|g| g.event_id.as_str()), Some("402"));
                assert_eq!(last_game.as_ref().map(|g| g.event_id.as_str()), Some("403"));
            }
            other => panic!("expected summary view, got {other:?}"),
        }
    }

    #[test]
    fn selection_deduplicates_a_shared_game_between_two_favorites() {
        let a = team("12", "KC", "Kansas City");
        let b = team("8", "DET", "Detroit");
        let mut shared = game("401", a.clone(), b.clone());
        shared.date = Some(sunday_kickoff());

        let snapshot = Snapshot {
            favorite_teams: HashMap::from([("12".to_owned(), a), ("8".to_owned(), b)]),
            favorite_games: vec![shared],
            teams_with_game_today: HashSet::from(["12".to_owned(), "8".to_owned()]),
            ..Snapshot::default()
        };

        let items = select_items(&snapshot, &["12".to_owned(), "8".to_owned()]);
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn selection_appends_carryover_and_other_games() {
        let a = team("12", "KC", "Kansas City");
        let mut carryover = game("400", a.clone(), team("20", "NYJ", "New York"));
        carryover.is_completed = true;
        let league = game("410", team("30", "SEA", "Seattle"), team("31", "SF", "San Francisco"));

        let snapshot = Snapshot {
            favorite_teams: HashMap::from([("12".to_owned(), a)]),
            favorite_games: vec![carryover],
            other_games: vec![league],
            ..Snapshot::default()
        };

        let items = select_items(&snapshot, &["12".to_owned()]);
        // Summary for the favorite, its carried-over final, then the league game.
        assert_eq!(items.len(), 3);
        assert!(matches!(items[0], DisplayItem::TeamSummary { .. }));
        match (&items[1], &items[2]) {
            (DisplayItem::Game(first), DisplayItem::Game(second)) => {
                assert_eq!(first.event_id, "400");
                assert_eq!(second.event_id, "410");
            }
            other => panic!("expected two game views, got {other:?}"),
        }
    }

    #[test]
    fn selection_skips_a_team_with_no_data() {
        let snapshot = Snapshot::default();
        assert!(select_items(&snapshot, &["12".to_owned()]).is_empty());
    }
}
