use eframe::egui;

use crate::renderer::fit_size;

pub const DEFAULT_THUMBNAIL_SIZE: f32 = 150.0;
pub const MIN_THUMBNAIL_SIZE: f32 = 40.0;
pub const MAX_THUMBNAIL_SIZE: f32 = 500.0;
pub const THUMBNAIL_ZOOM_STEP: f32 = 20.0;

pub const PREVIEW_ZOOM_FACTOR: f32 = 1.15;
pub const MIN_PREVIEW_ZOOM: f32 = 0.2;
pub const MAX_PREVIEW_ZOOM: f32 = 16.0;

// One mouse wheel line with egui's default line scroll speed.
const PIXELS_PER_NOTCH: f32 = 40.0;
// ln of egui's zoom delta for one Ctrl+wheel line.
const ZOOM_LOG_PER_NOTCH: f32 = 0.2;
const NOTCH_EPSILON: f32 = 1e-3;

/// Turns continuous wheel input into whole notches, positive for wheel up.
/// Residuals carry over between frames and are dropped when the direction
/// reverses.
pub fn notch_steps(accum: &mut f32, delta: f32, per_notch: f32) -> i32 {
    if delta.abs() <= f32::EPSILON || per_notch <= 0.0 {
        return 0;
    }

    if *accum != 0.0 && delta.signum() != accum.signum() {
        *accum = 0.0;
    }
    *accum += delta;

    let raw = *accum / per_notch;
    let steps = (raw + NOTCH_EPSILON * raw.signum()).trunc() as i32;
    if steps != 0 {
        *accum -= steps as f32 * per_notch;
    }
    steps
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailZoom {
    size: f32,
    zoom_accum: f32,
}

impl Default for ThumbnailZoom {
    fn default() -> Self {
        Self {
            size: DEFAULT_THUMBNAIL_SIZE,
            zoom_accum: 0.0,
        }
    }
}

impl ThumbnailZoom {
    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn zoom_in(&mut self) {
        self.size = (self.size + THUMBNAIL_ZOOM_STEP).min(MAX_THUMBNAIL_SIZE);
    }

    pub fn zoom_out(&mut self) {
        self.size = (self.size - THUMBNAIL_ZOOM_STEP).max(MIN_THUMBNAIL_SIZE);
    }

    /// Applies egui's multiplicative zoom delta (Ctrl+wheel or pinch) as
    /// discrete size steps. Returns true if the size changed.
    pub fn apply_zoom_delta(&mut self, zoom_delta: f32) -> bool {
        if zoom_delta <= 0.0 {
            return false;
        }
        let steps = notch_steps(&mut self.zoom_accum, zoom_delta.ln(), ZOOM_LOG_PER_NOTCH);
        let before = self.size;
        for _ in 0..steps.unsigned_abs() {
            if steps > 0 {
                self.zoom_in();
            } else {
                self.zoom_out();
            }
        }
        (self.size - before).abs() > f32::EPSILON
    }
}

/// Zoom is relative to fit-to-view; pan is the offset of the image center
/// from the canvas center.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewTransform {
    zoom: f32,
    pan: egui::Vec2,
    scroll_accum: f32,
    zoom_accum: f32,
}

impl Default for PreviewTransform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: egui::Vec2::ZERO,
            scroll_accum: 0.0,
            zoom_accum: 0.0,
        }
    }
}

impl PreviewTransform {
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn pan(&self) -> egui::Vec2 {
        self.pan
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn apply_wheel(&mut self, scroll: f32, pointer_offset: Option<egui::Vec2>) {
        let steps = notch_steps(&mut self.scroll_accum, scroll, PIXELS_PER_NOTCH);
        if steps != 0 {
            self.zoom_about(PREVIEW_ZOOM_FACTOR.powi(steps), pointer_offset);
        }
    }

    /// Ctrl+wheel and pinch arrive as egui's zoom delta; each wheel line
    /// counts as one notch, same as a plain wheel.
    pub fn apply_zoom_delta(&mut self, zoom_delta: f32, pointer_offset: Option<egui::Vec2>) {
        if zoom_delta <= 0.0 {
            return;
        }
        let steps = notch_steps(&mut self.zoom_accum, zoom_delta.ln(), ZOOM_LOG_PER_NOTCH);
        if steps != 0 {
            self.zoom_about(PREVIEW_ZOOM_FACTOR.powi(steps), pointer_offset);
        }
    }

    /// `pointer_offset` is the pointer position relative to the current image
    /// center; that point stays under the pointer.
    pub fn zoom_about(&mut self, factor: f32, pointer_offset: Option<egui::Vec2>) {
        let next_zoom = (self.zoom * factor).clamp(MIN_PREVIEW_ZOOM, MAX_PREVIEW_ZOOM);
        if (next_zoom - self.zoom).abs() <= f32::EPSILON {
            return;
        }
        let zoom_ratio = next_zoom / self.zoom;
        self.zoom = next_zoom;
        if let Some(offset) = pointer_offset {
            self.pan += offset * (1.0 - zoom_ratio);
        }
    }

    pub fn pan_by(&mut self, delta: egui::Vec2) {
        self.pan += delta;
    }

    /// Clamps the pan for this canvas and returns where the image is drawn.
    pub fn layout(&mut self, canvas: egui::Rect, image_size: egui::Vec2) -> egui::Rect {
        let draw_size = fit_size(image_size, canvas.size()) * self.zoom;
        let max_pan_x = ((draw_size.x - canvas.width()) * 0.5).max(0.0);
        let max_pan_y = ((draw_size.y - canvas.height()) * 0.5).max(0.0);
        self.pan.x = self.pan.x.clamp(-max_pan_x, max_pan_x);
        self.pan.y = self.pan.y.clamp(-max_pan_y, max_pan_y);
        if self.zoom <= 1.0 {
            self.pan = egui::Vec2::ZERO;
        }
        egui::Rect::from_center_size(canvas.center() + self.pan, draw_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notch_steps_accumulates_partial_deltas() {
        let mut accum = 0.0;
        assert_eq!(notch_steps(&mut accum, 15.0, 40.0), 0);
        assert_eq!(notch_steps(&mut accum, 15.0, 40.0), 0);
        assert_eq!(notch_steps(&mut accum, 15.0, 40.0), 1);
        assert!((accum - 5.0).abs() < 1e-4);
        assert_eq!(notch_steps(&mut accum, 80.0, 40.0), 2);
    }

    #[test]
    fn notch_steps_resets_on_direction_change() {
        let mut accum = 0.0;
        assert_eq!(notch_steps(&mut accum, 30.0, 40.0), 0);
        assert_eq!(notch_steps(&mut accum, -30.0, 40.0), 0);
        assert!((accum + 30.0).abs() < 1e-4);
        assert_eq!(notch_steps(&mut accum, -10.0, 40.0), -1);
        assert_eq!(notch_steps(&mut accum, 0.0, 40.0), 0);
    }

    #[test]
    fn thumbnail_zoom_clamps_to_bounds() {
        let mut zoom = ThumbnailZoom::default();
        assert_eq!(zoom.size(), DEFAULT_THUMBNAIL_SIZE);

        for _ in 0..100 {
            zoom.zoom_in();
        }
        assert_eq!(zoom.size(), MAX_THUMBNAIL_SIZE);

        for _ in 0..100 {
            zoom.zoom_out();
        }
        assert_eq!(zoom.size(), MIN_THUMBNAIL_SIZE);
    }

    #[test]
    fn thumbnail_zoom_steps_once_per_wheel_line() {
        let mut zoom = ThumbnailZoom::default();
        let one_line = ZOOM_LOG_PER_NOTCH.exp();

        assert!(zoom.apply_zoom_delta(one_line));
        assert_eq!(zoom.size(), DEFAULT_THUMBNAIL_SIZE + THUMBNAIL_ZOOM_STEP);

        assert!(zoom.apply_zoom_delta(1.0 / one_line));
        assert!(zoom.apply_zoom_delta(1.0 / one_line));
        assert_eq!(zoom.size(), DEFAULT_THUMBNAIL_SIZE - THUMBNAIL_ZOOM_STEP);

        assert!(!zoom.apply_zoom_delta(1.0));
    }

    #[test]
    fn preview_wheel_zooms_by_fixed_factor() {
        let mut transform = PreviewTransform::default();
        transform.apply_wheel(PIXELS_PER_NOTCH, None);
        assert!((transform.zoom() - PREVIEW_ZOOM_FACTOR).abs() < 1e-4);

        transform.apply_wheel(-PIXELS_PER_NOTCH, None);
        assert!((transform.zoom() - 1.0).abs() < 1e-4);

        for _ in 0..200 {
            transform.apply_wheel(-PIXELS_PER_NOTCH, None);
        }
        assert_eq!(transform.zoom(), MIN_PREVIEW_ZOOM);
    }

    #[test]
    fn preview_ctrl_wheel_matches_plain_wheel_notch() {
        let mut transform = PreviewTransform::default();
        let one_line = ZOOM_LOG_PER_NOTCH.exp();

        transform.apply_zoom_delta(one_line, None);
        assert!((transform.zoom() - PREVIEW_ZOOM_FACTOR).abs() < 1e-4);

        transform.apply_zoom_delta(one_line.sqrt(), None);
        assert!((transform.zoom() - PREVIEW_ZOOM_FACTOR).abs() < 1e-4);
        transform.apply_zoom_delta(one_line.sqrt(), None);
        assert!((transform.zoom() - PREVIEW_ZOOM_FACTOR.powi(2)).abs() < 1e-4);

        transform.apply_zoom_delta(1.0 / one_line, None);
        assert!((transform.zoom() - PREVIEW_ZOOM_FACTOR).abs() < 1e-4);
        transform.apply_zoom_delta(1.0, None);
        assert!((transform.zoom() - PREVIEW_ZOOM_FACTOR).abs() < 1e-4);
    }

    #[test]
    fn zoom_keeps_point_under_pointer() {
        let mut transform = PreviewTransform::default();
        transform.zoom_about(2.0, Some(egui::vec2(100.0, -50.0)));
        assert_eq!(transform.zoom(), 2.0);
        assert_eq!(transform.pan(), egui::vec2(-100.0, 50.0));
    }

    #[test]
    fn layout_fits_image_and_clamps_pan() {
        let canvas = egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(800.0, 600.0));
        let mut transform = PreviewTransform::default();

        let fitted = transform.layout(canvas, egui::vec2(400.0, 400.0));
        assert_eq!(fitted.size(), egui::vec2(600.0, 600.0));
        assert_eq!(fitted.center(), canvas.center());

        transform.pan_by(egui::vec2(50.0, 50.0));
        let centered = transform.layout(canvas, egui::vec2(400.0, 400.0));
        assert_eq!(centered.center(), canvas.center());

        transform.zoom_about(2.0, None);
        transform.pan_by(egui::vec2(10_000.0, -10_000.0));
        let zoomed = transform.layout(canvas, egui::vec2(400.0, 400.0));
        assert_eq!(zoomed.size(), egui::vec2(1200.0, 1200.0));
        assert_eq!(transform.pan(), egui::vec2(200.0, -300.0));
    }
}
