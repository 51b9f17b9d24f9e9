mod config;
mod present;
mod render;
mod state;

use crate::config::BoardConfig;
use crate::render::board::BoardRenderer;
use crate::render::offsets::LogoOffsets;
use crate::render::{DrawSurface, Layout, LayoutSource, Region};
use crate::state::builder::SnapshotBuilder;
use crate::state::refresher::PeriodicRefresher;
use crate::state::snapshot::SharedSnapshot;
use image::{DynamicImage, GenericImageView};
use log::{error, info};
use nfl_api::Rgb;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = PathBuf::from(
        std::env::args()
            .nth(1)
            .unwrap_or_else(|| "nflboard.json".to_owned()),
    );

    // A bad config disables this board only; the host keeps running.
    let config = match BoardConfig::load(&config_path) {
        Ok(config) => Arc::new(config),
        Err(err) => {
            error!("nfl board disabled: {err:#}");
            return Ok(());
        }
    };

    // Logos and offsets live next to the config file.
    let asset_dir = config_path
        .parent()
        .unwrap_or(Path::new("."))
        .to_path_buf();
    let offsets = LogoOffsets::load(&asset_dir.join("logo_offsets.json"));

    let shared = SharedSnapshot::new();
    let builder = Arc::new(Mutex::new(SnapshotBuilder::new(
        config.clone(),
        asset_dir.join("logos"),
    )));

    let refresher = PeriodicRefresher::new(
        builder.clone(),
        shared.clone(),
        Duration::from_secs(config.refresh_seconds),
    );
    tokio::spawn(refresher.run());

    let mut renderer = BoardRenderer::new(
        ConsoleSurface::new(64, 64),
        ConsoleLayouts,
        offsets,
        config.display_seconds,
    );

    info!("nfl board up, teams {:?}", config.team_ids);
    loop {
        let snapshot = match shared.current().await {
            Some(snapshot) => snapshot,
            None => {
                // Nothing published yet: build once in the foreground so the
                // panel isn't blank until the first interval fires.
                let snapshot = builder.lock().await.build().await;
                shared.publish(snapshot).await;
                continue;
            }
        };
        renderer.render_snapshot(&snapshot, &config.team_ids).await;
    }
}

// ---------------------------------------------------------------------------
// Console stand-ins — real deployments implement these over the LED matrix
// ---------------------------------------------------------------------------

/// Prints draw calls instead of driving a panel.
struct ConsoleSurface {
    width: u32,
    height: u32,
    lines: Vec<String>,
}

impl ConsoleSurface {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            lines: Vec::new(),
        }
    }
}

impl DrawSurface for ConsoleSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.lines.clear();
    }

    fn draw_text(&mut self, region: Region, text: &str, _fill: Option<Rgb>, _bg: Option<Rgb>) {
        self.lines.push(format!("({:2},{:2}) {text}", region.x, region.y));
    }

    fn draw_image(&mut self, region: Region, image: &DynamicImage, offset: (i32, i32)) {
        self.lines.push(format!(
            "({:2},{:2}) [logo {}x{} offset {:?}]",
            region.x,
            region.y,
            image.width(),
            image.height(),
            offset
        ));
    }

    fn present(&mut self) {
        println!("--------------------------------");
        for line in &self.lines {
            println!("{line}");
        }
    }
}

/// Fixed layouts for a 64x64 demo panel.
struct ConsoleLayouts;

impl LayoutSource for ConsoleLayouts {
    fn layout(&self, name: &str) -> Option<Layout> {
        let region = |x, y, width, height| Region {
            x,
            y,
            width,
            height,
        };
        match name {
            "nfl_game" => Some(
                Layout::new()
                    .with_region("status", region(0, 0, 64, 10))
                    .with_region("away_logo", region(0, 12, 26, 26))
                    .with_region("away_text", region(28, 12, 36, 26))
                    .with_region("home_logo", region(0, 38, 26, 26))
                    .with_region("home_text", region(28, 38, 36, 26)),
            ),
            "nfl_team_summary" => Some(
                Layout::new()
                    .with_region("logo", region(0, 0, 26, 26))
                    .with_region("name", region(28, 0, 36, 12))
                    .with_region("record", region(28, 14, 36, 10))
                    .with_region("next_game", region(0, 40, 64, 10))
                    .with_region("last_game", region(0, 52, 64, 10)),
            ),
            "nfl_message" => Some(Layout::new().with_region("message", region(0, 24, 64, 16))),
            _ => None,
        }
    }
}
