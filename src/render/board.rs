//! Renders display items against the host surface. One view per item; each
//! view clears, draws, presents, then holds for the configured dwell time.

use crate::present::{self, DisplayItem, TimeStyle};
use crate::render::offsets::LogoOffsets;
use crate::render::{DrawSurface, Layout, LayoutSource, Region};
use crate::state::snapshot::Snapshot;
use chrono::Local;
use image::{DynamicImage, GenericImageView};
use log::warn;
use nfl_api::logos::LOGO_EDGE;
use nfl_api::{Game, GameState, Team};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

const GAME_LAYOUT: &str = "nfl_game";
const SUMMARY_LAYOUT: &str = "nfl_team_summary";
const MESSAGE_LAYOUT: &str = "nfl_message";

/// Key for a memoized scaled logo. Zoom is kept in hundredths so the key
/// hashes; the cache never evicts (a season's worth of variants is small).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct VariantKey {
    path: PathBuf,
    size: u32,
    zoom_pct: u32,
    element: String,
}

pub struct BoardRenderer<S, L> {
    surface: S,
    layouts: L,
    offsets: LogoOffsets,
    hold: Duration,
    variants: HashMap<VariantKey, Arc<DynamicImage>>,
}

impl<S: DrawSurface, L: LayoutSource> BoardRenderer<S, L> {
    pub fn new(surface: S, layouts: L, offsets: LogoOffsets, display_seconds: u64) -> Self {
        Self {
            surface,
            layouts,
            offsets,
            hold: Duration::from_secs(display_seconds),
            variants: HashMap::new(),
        }
    }

    /// Cycle once through everything the snapshot has to show.
    pub async fn render_snapshot(&mut self, snapshot: &Snapshot, team_ids: &[String]) {
        if let Some(message) = &snapshot.error {
            self.render_message(&format!("NFL: {message}"));
            self.hold().await;
            return;
        }

        let items = present::select_items(snapshot, team_ids);
        if items.is_empty() {
            self.render_message("NO GAMES");
            self.hold().await;
            return;
        }

        for item in items {
            match item {
                DisplayItem::Game(game) => self.render_game(&game),
                DisplayItem::TeamSummary {
                    team,
                    next_game,
                    last_game,
                } => self.render_summary(&team, next_game.as_ref(), last_game.as_ref()),
            }
            self.hold().await;
        }
    }

    async fn hold(&self) {
        sleep(self.hold).await;
    }

    fn render_game(&mut self, game: &Game) {
        let Some(layout) = self.layouts.layout(GAME_LAYOUT) else {
            warn!("layout {GAME_LAYOUT} unavailable, skipping view");
            return;
        };
        self.surface.clear();

        if let Some(region) = layout.region("status") {
            self.surface.draw_text(region, &game_status(game), None, None);
        }
        self.draw_team_row(&layout, game, &game.away, "away");
        self.draw_team_row(&layout, game, &game.home, "home");
        self.surface.present();
    }

    fn draw_team_row(&mut self, layout: &Layout, game: &Game, team: &Team, side: &str) {
        let element = format!("{side}_logo");
        if let Some(region) = layout.region(&element) {
            self.draw_logo(region, team, &element);
        }
        if let Some(region) = layout.region(&format!("{side}_text")) {
            self.surface.draw_text(
                region,
                &team_row_text(game, team),
                team.color_primary,
                team.color_secondary,
            );
        }
    }

    fn render_summary(&mut self, team: &Team, next: Option<&Game>, last: Option<&Game>) {
        let Some(layout) = self.layouts.layout(SUMMARY_LAYOUT) else {
            warn!("layout {SUMMARY_LAYOUT} unavailable, skipping view");
            return;
        };
        self.surface.clear();

        if let Some(region) = layout.region("logo") {
            self.draw_logo(region, team, "logo");
        }
        if let Some(region) = layout.region("name") {
            self.surface.draw_text(
                region,
                &team.display_name.to_uppercase(),
                team.color_primary,
                team.color_secondary,
            );
        }
        if let Some(region) = layout.region("record") {
            let record = match &team.record_comment {
                Some(comment) => format!("{} {comment}", team.record_text()),
                None => team.record_text().to_owned(),
            };
            self.surface.draw_text(region, &record, None, None);
        }
        if let Some(region) = layout.region("next_game") {
            let line = present::next_game_line(&team.id, next, &Local);
            self.surface.draw_text(region, &line, None, None);
        }
        if let Some(region) = layout.region("last_game") {
            let line = present::last_game_line(&team.id, last);
            self.surface.draw_text(region, &line, None, None);
        }
        self.surface.present();
    }

    fn render_message(&mut self, text: &str) {
        self.surface.clear();
        let region = self
            .layouts
            .layout(MESSAGE_LAYOUT)
            .and_then(|layout| layout.region("message"))
            .unwrap_or(Region {
                x: 0,
                y: 0,
                width: self.surface.width(),
                height: self.surface.height(),
            });
        self.surface.draw_text(region, text, None, None);
        self.surface.present();
    }

    fn draw_logo(&mut self, region: Region, team: &Team, element: &str) {
        let Some(path) = team.logo_path.clone() else {
            return;
        };
        let adjust = self.offsets.resolve(&team.abbreviation, element);
        let size = self.logo_edge();
        if let Some(image) = self.variant(&path, size, adjust.zoom, element) {
            self.surface
                .draw_image(region, &image, (adjust.x_offset, adjust.y_offset));
        }
    }

    /// Logos scale down on short panels; a 32-row matrix gets at most 32px.
    fn logo_edge(&self) -> u32 {
        let height = self.surface.height();
        if height >= 48 {
            LOGO_EDGE
        } else {
            height.min(32)
        }
    }

    fn variant(&mut self, path: &Path, size: u32, zoom: f32, element: &str) -> Option<Arc<DynamicImage>> {
        let key = VariantKey {
            path: path.to_owned(),
            size,
            zoom_pct: (zoom * 100.0).round().max(0.0) as u32,
            element: element.to_owned(),
        };
        if let Some(hit) = self.variants.get(&key) {
            return Some(Arc::clone(hit));
        }

        let source = match image::open(path) {
            Ok(img) => img,
            Err(err) => {
                warn!("could not open cached logo {}: {err}", path.display());
                return None;
            }
        };
        let edge = ((size as f32) * zoom).round().max(1.0) as u32;
        let scaled = if source.width().max(source.height()) > edge {
            source.thumbnail(edge, edge)
        } else {
            source
        };
        let variant = Arc::new(scaled);
        self.variants.insert(key, Arc::clone(&variant));
        Some(variant)
    }
}

fn game_status(game: &Game) -> String {
    if game.is_live() {
        present::live_status(game)
    } else if game.is_completed {
        if game.status_detail.is_empty() {
            "FINAL".to_owned()
        } else {
            game.status_detail.clone()
        }
    } else {
        present::format_game_time(game.date, TimeStyle::Full, &Local)
    }
}

/// Row text next to each logo: records before kickoff, scores afterwards.
fn team_row_text(game: &Game, team: &Team) -> String {
    if game.state == GameState::Pre {
        format!("{} {}", team.abbreviation, team.record_text())
    } else {
        let score = if team.id == game.home.id {
            game.home_score
        } else {
            game.away_score
        };
        format!("{} {}", team.abbreviation, score.unwrap_or(0))
    }
}
