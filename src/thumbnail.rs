use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::{self, ColorImage, TextureHandle, TextureOptions};

use crate::bucket::Grid;
use crate::navigate::CursorPosition;
use crate::renderer::{downscale_to_fit, render_rgba};
use crate::zoom::MAX_THUMBNAIL_SIZE;

// Keeps full-size previews under common GPU texture limits.
pub const PREVIEW_MAX_DIM: u32 = 8192;

pub fn decode_image(path: &Path, max_dim: u32) -> Result<ColorImage> {
    let image = image::open(path).with_context(|| format!("Could not decode {}", path.display()))?;
    Ok(render_rgba(&downscale_to_fit(image, max_dim)))
}

/// Decoded thumbnails laid out like the grid they were loaded from. Zooming
/// only changes the drawn size, so every image is decoded once per folder.
#[derive(Default)]
pub struct ThumbnailCache {
    rows: Vec<Vec<Option<TextureHandle>>>,
}

impl ThumbnailCache {
    pub fn load(ctx: &egui::Context, grid: &Grid) -> Self {
        let max_dim = MAX_THUMBNAIL_SIZE as u32;
        let rows = grid
            .rows()
            .iter()
            .enumerate()
            .map(|(row, step_row)| {
                step_row
                    .paths
                    .iter()
                    .enumerate()
                    .map(|(col, path)| match decode_image(path, max_dim) {
                        Ok(image) => Some(ctx.load_texture(
                            format!("thumbnail-{row}-{col}"),
                            image,
                            TextureOptions::LINEAR,
                        )),
                        Err(err) => {
                            log::warn!("{err:#}");
                            None
                        }
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        Self { rows }
    }

    pub fn get(&self, position: CursorPosition) -> Option<&TextureHandle> {
        self.rows
            .get(position.row)
            .and_then(|row| row.get(position.col))
            .and_then(Option::as_ref)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(Vec::is_empty)
    }

    pub fn loaded_count(&self) -> usize {
        self.rows.iter().flatten().flatten().count()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }
}
