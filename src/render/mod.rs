//! Narrow seams to the host display. The board never talks to LED hardware
//! directly; it draws through `DrawSurface` into named regions that a
//! `LayoutSource` resolves per view.

pub mod board;
pub mod offsets;

use image::DynamicImage;
use nfl_api::Rgb;
use std::collections::HashMap;

/// A rectangle on the display, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Named regions for one view.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    regions: HashMap<String, Region>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_region(mut self, name: impl Into<String>, region: Region) -> Self {
        self.regions.insert(name.into(), region);
        self
    }

    /// A missing region is a normal outcome; the caller skips that element.
    pub fn region(&self, name: &str) -> Option<Region> {
        self.regions.get(name).copied()
    }
}

/// Drawing operations the host display must provide.
pub trait DrawSurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn clear(&mut self);
    fn draw_text(&mut self, region: Region, text: &str, fill: Option<Rgb>, background: Option<Rgb>);
    /// `offset` shifts the image within the region after centering.
    fn draw_image(&mut self, region: Region, image: &DynamicImage, offset: (i32, i32));
    fn present(&mut self);
}

/// Resolves view layouts by name. A `None` aborts that render pass only.
pub trait LayoutSource {
    fn layout(&self, name: &str) -> Option<Layout>;
}
