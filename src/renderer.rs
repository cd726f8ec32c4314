use eframe::egui::{self, ColorImage};
use image::imageops::FilterType;
use image::DynamicImage;

pub fn render_rgba(image: &DynamicImage) -> ColorImage {
    let rgba = image.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    ColorImage::from_rgba_unmultiplied(size, rgba.as_raw())
}

/// Shrinks `image` so its longest edge is at most `max_dim`. Smaller images
/// are returned unchanged.
pub fn downscale_to_fit(image: DynamicImage, max_dim: u32) -> DynamicImage {
    let longest_edge = image.width().max(image.height());
    if max_dim == 0 || longest_edge <= max_dim {
        return image;
    }
    image.resize(max_dim, max_dim, FilterType::Triangle)
}

/// Keep-aspect-ratio scaling of `size` into `bounds`. Scales up as well as down.
pub fn fit_size(size: egui::Vec2, bounds: egui::Vec2) -> egui::Vec2 {
    if size.x <= 0.0 || size.y <= 0.0 {
        return egui::Vec2::ZERO;
    }
    let scale = (bounds.x / size.x).min(bounds.y / size.y).max(0.0);
    size * scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn render_rgba_keeps_dimensions_and_pixels() {
        let mut source = RgbaImage::new(3, 2);
        source.put_pixel(2, 1, Rgba([10, 20, 30, 255]));
        let rendered = render_rgba(&DynamicImage::ImageRgba8(source));

        assert_eq!(rendered.size, [3, 2]);
        assert_eq!(rendered.pixels.len(), 6);
        assert_eq!(rendered.pixels[5], egui::Color32::from_rgb(10, 20, 30));
    }

    #[test]
    fn downscale_only_shrinks_oversized_images() {
        let large = DynamicImage::new_rgba8(1000, 250);
        let scaled = downscale_to_fit(large, 500);
        assert_eq!((scaled.width(), scaled.height()), (500, 125));

        let small = DynamicImage::new_rgba8(40, 80);
        let unchanged = downscale_to_fit(small, 500);
        assert_eq!((unchanged.width(), unchanged.height()), (40, 80));
    }

    #[test]
    fn fit_size_keeps_aspect_ratio() {
        let fitted = fit_size(egui::vec2(400.0, 200.0), egui::vec2(150.0, 150.0));
        assert_eq!(fitted, egui::vec2(150.0, 75.0));

        let tall = fit_size(egui::vec2(50.0, 100.0), egui::vec2(300.0, 300.0));
        assert_eq!(tall, egui::vec2(150.0, 300.0));

        assert_eq!(
            fit_size(egui::Vec2::ZERO, egui::vec2(10.0, 10.0)),
            egui::Vec2::ZERO
        );
    }
}
