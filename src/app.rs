use std::path::{Path, PathBuf};

use eframe::egui::{
    self, Color32, RichText, Sense, TextureHandle, TextureOptions, ViewportBuilder, ViewportClass,
    ViewportId,
};

use crate::bucket::{scan_folder, Grid};
use crate::navigate::{move_cursor, CursorPosition, Direction};
use crate::renderer::fit_size;
use crate::thumbnail::{decode_image, ThumbnailCache, PREVIEW_MAX_DIM};
use crate::zoom::{PreviewTransform, ThumbnailZoom};

pub const APP_TITLE: &str = "Image Grid Viewer";
const PREVIEW_TITLE: &str = "Image Preview";
const PREVIEW_INNER_SIZE: [f32; 2] = [800.0, 600.0];
const PREVIEW_HINT: &str = "Scroll to zoom; MMB to pan";
const EXAMPLE_FOLDER_URL: &str = "https://github.com/ostris/ai-toolkit";
const GRID_CELL_SPACING: f32 = 6.0;

const BACKGROUND: Color32 = Color32::from_rgb(0x2b, 0x2b, 0x2b);
const FOOTER_FILL: Color32 = Color32::from_rgb(0x22, 0x22, 0x22);
const BORDER: Color32 = Color32::from_rgb(0x3c, 0x3c, 0x3c);
const SECONDARY_TEXT: Color32 = Color32::from_rgb(0xaa, 0xaa, 0xaa);
const MUTED_TEXT: Color32 = Color32::from_rgb(0x88, 0x88, 0x88);
const LINK: Color32 = Color32::from_rgb(0x33, 0x99, 0xff);
const HANDLE: Color32 = Color32::from_rgb(0x5a, 0x5a, 0x5a);
const HANDLE_HOVER: Color32 = Color32::from_rgb(0x6a, 0x6a, 0x6a);

const NAVIGATION_KEYS: [(egui::Key, Direction); 4] = [
    (egui::Key::ArrowUp, Direction::Up),
    (egui::Key::ArrowDown, Direction::Down),
    (egui::Key::ArrowLeft, Direction::Left),
    (egui::Key::ArrowRight, Direction::Right),
];

struct Preview {
    position: CursorPosition,
    texture: Option<TextureHandle>,
    transform: PreviewTransform,
}

pub struct ImageGridApp {
    folder: Option<PathBuf>,
    grid: Grid,
    thumbnails: ThumbnailCache,
    thumbnail_zoom: ThumbnailZoom,
    preview: Option<Preview>,
    pending_folder_open: Option<PathBuf>,
    pending_folder_open_armed: bool,
    drag_hover: bool,
    status_line: String,
}

impl Default for ImageGridApp {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl ImageGridApp {
    pub fn new(initial_folder: Option<PathBuf>, initial_status: Option<String>) -> Self {
        let mut app = Self {
            folder: None,
            grid: Grid::default(),
            thumbnails: ThumbnailCache::default(),
            thumbnail_zoom: ThumbnailZoom::default(),
            preview: None,
            pending_folder_open: None,
            pending_folder_open_armed: false,
            drag_hover: false,
            status_line: initial_status.unwrap_or_default(),
        };

        if let Some(folder) = initial_folder {
            if folder.is_dir() {
                app.queue_folder_open(folder);
            } else {
                app.status_line = format!("Not a folder: {}", folder.display());
            }
        }
        app
    }

    fn apply_dark_theme(ctx: &egui::Context) {
        let mut visuals = egui::Visuals::dark();
        visuals.panel_fill = BACKGROUND;
        visuals.window_fill = BACKGROUND;
        visuals.faint_bg_color = BACKGROUND;
        visuals.extreme_bg_color = BORDER;
        visuals.hyperlink_color = LINK;
        visuals.window_stroke = egui::Stroke::new(1.0, BORDER);
        visuals.widgets.noninteractive.bg_stroke = egui::Stroke::new(1.0, BORDER);
        visuals.widgets.inactive.bg_fill = HANDLE;
        visuals.widgets.hovered.bg_fill = HANDLE_HOVER;
        visuals.widgets.active.bg_fill = HANDLE_HOVER;
        ctx.set_visuals(visuals);
    }

    fn is_loading(&self) -> bool {
        self.pending_folder_open.is_some()
    }

    fn queue_folder_open(&mut self, folder: PathBuf) {
        self.status_line = format!("Loading {}...", folder.display());
        self.pending_folder_open = Some(folder);
        self.pending_folder_open_armed = false;
    }

    fn process_pending_folder_open(&mut self, ctx: &egui::Context) {
        let Some(_) = self.pending_folder_open else {
            return;
        };

        // Let one frame render the loading state before decoding blocks the UI.
        if !self.pending_folder_open_armed {
            self.pending_folder_open_armed = true;
            ctx.request_repaint();
            return;
        }

        self.pending_folder_open_armed = false;
        if let Some(folder) = self.pending_folder_open.take() {
            self.load_folder(folder, ctx);
        }
    }

    fn load_folder(&mut self, folder: PathBuf, ctx: &egui::Context) {
        match scan_folder(&folder) {
            Ok(grid) => {
                self.preview = None;
                self.thumbnails.clear();
                self.thumbnails = ThumbnailCache::load(ctx, &grid);
                log::info!(
                    "Loaded {} of {} thumbnails",
                    self.thumbnails.loaded_count(),
                    grid.image_count()
                );
                self.status_line = format!(
                    "{}: {} images in {} steps",
                    folder_label(&folder),
                    grid.image_count(),
                    grid.len()
                );
                self.grid = grid;
                self.folder = Some(folder);
            }
            Err(err) => {
                log::error!("{err:#}");
                self.status_line = format!("Error opening folder: {err:#}");
            }
        }
    }

    fn pick_folder(&mut self) {
        if let Some(folder) = rfd::FileDialog::new()
            .set_title("Select Image Folder")
            .pick_folder()
        {
            self.queue_folder_open(folder);
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let (hovering, dropped) = ctx.input(|input| {
            (
                !input.raw.hovered_files.is_empty(),
                input
                    .raw
                    .dropped_files
                    .first()
                    .map(|file| file.path.clone()),
            )
        });
        self.drag_hover = hovering;

        match dropped {
            Some(Some(path)) if path.is_dir() => self.queue_folder_open(path),
            Some(Some(path)) => log::debug!("Ignoring drop of non-folder {}", path.display()),
            Some(None) => log::debug!("Ignoring drop without a local path"),
            None => {}
        }
    }

    fn apply_thumbnail_zoom(&mut self, zoom_delta: f32) -> bool {
        if self.thumbnails.is_empty() {
            return false;
        }
        self.thumbnail_zoom.apply_zoom_delta(zoom_delta)
    }

    /// Ctrl+wheel resizes thumbnails unless an embedded preview window is
    /// open, since that window shares the root viewport's input.
    fn handle_thumbnail_zoom(&mut self, ctx: &egui::Context) -> bool {
        if self.preview.is_some() && ctx.embed_viewports() {
            return false;
        }
        let zoom_delta = ctx.input(|input| input.zoom_delta());
        self.apply_thumbnail_zoom(zoom_delta)
    }

    fn open_preview(&mut self, position: CursorPosition, ctx: &egui::Context) {
        let Some(path) = self.grid.path(position) else {
            log::warn!("No image at ({}, {})", position.row, position.col);
            return;
        };

        let image = match decode_image(path, PREVIEW_MAX_DIM) {
            Ok(image) => Some(image),
            Err(err) => {
                log::warn!("{err:#}");
                None
            }
        };

        let mut texture = self.preview.take().and_then(|preview| preview.texture);
        match image {
            Some(image) => {
                if let Some(texture) = texture.as_mut() {
                    texture.set(image, TextureOptions::LINEAR);
                } else {
                    texture = Some(ctx.load_texture("preview-image", image, TextureOptions::LINEAR));
                }
            }
            None => texture = None,
        }

        self.preview = Some(Preview {
            position,
            texture,
            transform: PreviewTransform::default(),
        });
    }

    fn navigate_preview(&mut self, direction: Direction, ctx: &egui::Context) {
        let Some(position) = self.preview.as_ref().map(|preview| preview.position) else {
            return;
        };
        match move_cursor(&self.grid, position, direction) {
            Ok(next) => self.open_preview(next, ctx),
            Err(err) => log::warn!("Preview navigation failed: {err}"),
        }
    }

    fn close_preview(&mut self) {
        self.preview = None;
    }

    fn preview_title(&self) -> Option<String> {
        let preview = self.preview.as_ref()?;
        let file_name = self
            .grid
            .path(preview.position)
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        Some(format!("{PREVIEW_TITLE} - {file_name}"))
    }

    fn preview_step_label(&self) -> String {
        self.preview
            .as_ref()
            .and_then(|preview| self.grid.row(preview.position.row))
            .map(|row| format!("Steps: {}", row.step))
            .unwrap_or_else(|| "Steps: N/A".to_string())
    }

    fn show_preview_viewport(&mut self, ctx: &egui::Context) {
        let Some(title) = self.preview_title() else {
            return;
        };

        let builder = ViewportBuilder::default()
            .with_title(title.clone())
            .with_inner_size(PREVIEW_INNER_SIZE);
        ctx.show_viewport_immediate(
            ViewportId::from_hash_of("image-preview"),
            builder,
            |ctx, class| {
                let mut open = true;
                if class == ViewportClass::Embedded {
                    egui::Window::new(title.as_str())
                        .id(egui::Id::new("image-preview-window"))
                        .open(&mut open)
                        .default_size(PREVIEW_INNER_SIZE)
                        .show(ctx, |ui| self.show_preview_body(ui));
                } else {
                    egui::CentralPanel::default()
                        .frame(egui::Frame::none().fill(BACKGROUND))
                        .show(ctx, |ui| self.show_preview_body(ui));
                    if ctx.input(|input| input.viewport().close_requested()) {
                        open = false;
                    }
                }

                let (direction, escape_pressed) = ctx.input_mut(|input| {
                    let direction = NAVIGATION_KEYS
                        .iter()
                        .find(|(key, _)| input.consume_key(egui::Modifiers::NONE, *key))
                        .map(|(_, direction)| *direction);
                    (
                        direction,
                        input.consume_key(egui::Modifiers::NONE, egui::Key::Escape),
                    )
                });

                if !open || escape_pressed {
                    self.close_preview();
                    ctx.request_repaint_of(ViewportId::ROOT);
                } else if let Some(direction) = direction {
                    self.navigate_preview(direction, ctx);
                }
            },
        );
    }

    fn show_preview_body(&mut self, ui: &mut egui::Ui) {
        let step_label = self.preview_step_label();
        egui::TopBottomPanel::bottom("preview-footer")
            .show_separator_line(false)
            .frame(
                egui::Frame::none()
                    .fill(FOOTER_FILL)
                    .stroke(egui::Stroke::new(1.0, BORDER))
                    .inner_margin(egui::Margin::symmetric(8.0, 4.0)),
            )
            .show_inside(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(step_label).color(SECONDARY_TEXT).size(12.0));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(RichText::new(PREVIEW_HINT).color(SECONDARY_TEXT).size(12.0));
                    });
                });
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(BACKGROUND))
            .show_inside(ui, |ui| self.show_preview_canvas(ui));
    }

    fn show_preview_canvas(&mut self, ui: &mut egui::Ui) {
        let Some(preview) = self.preview.as_mut() else {
            return;
        };

        let (canvas_rect, response) =
            ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        // Undecodable images stay blank.
        let Some(texture) = preview.texture.as_ref() else {
            return;
        };
        let image_size = texture.size_vec2();
        if image_size.x <= 0.0 || image_size.y <= 0.0 || !canvas_rect.is_positive() {
            return;
        }

        if response.double_clicked() {
            preview.transform.reset();
        }

        if response.dragged_by(egui::PointerButton::Middle) {
            preview.transform.pan_by(response.drag_delta());
            ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
        } else if response.hovered() && preview.transform.zoom() > 1.0 {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
        }

        if response.hovered() {
            let (zoom_delta, raw_scroll) =
                ui.input(|input| (input.zoom_delta(), input.raw_scroll_delta));
            let image_center = canvas_rect.center() + preview.transform.pan();
            let pointer_offset = response.hover_pos().map(|pos| pos - image_center);
            if (zoom_delta - 1.0).abs() > f32::EPSILON {
                preview.transform.apply_zoom_delta(zoom_delta, pointer_offset);
            } else {
                preview
                    .transform
                    .apply_wheel(dominant_scroll_axis(raw_scroll), pointer_offset);
            }
        }

        let image_rect = preview.transform.layout(canvas_rect, image_size);
        ui.painter_at(canvas_rect).image(
            texture.id(),
            image_rect,
            egui::Rect::from_min_max(egui::Pos2::ZERO, egui::pos2(1.0, 1.0)),
            Color32::WHITE,
        );
    }

    fn show_welcome(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space((ui.available_height() * 0.3).max(0.0));
            ui.label(RichText::new(APP_TITLE).size(32.0).strong());
            ui.add_space(12.0);
            ui.label(
                RichText::new("Drag and drop a folder to begin.")
                    .size(16.0)
                    .color(SECONDARY_TEXT),
            );
            ui.add_space(6.0);
            ui.label(
                RichText::new(
                    "Use Ctrl+Scroll to zoom thumbnails and Shift+Scroll to scroll horizontally.",
                )
                .size(14.0)
                .color(MUTED_TEXT),
            );
            ui.add_space(6.0);
            ui.label(
                RichText::new("Example folder: samples from")
                    .size(14.0)
                    .color(MUTED_TEXT),
            );
            ui.hyperlink_to("Ostris's AI-Toolkit", EXAMPLE_FOLDER_URL);
        });
    }

    fn show_grid(&self, ui: &mut egui::Ui) -> Option<CursorPosition> {
        if self.grid.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new("No images with a step in their file name.").color(MUTED_TEXT),
                );
            });
            return None;
        }

        let cell_size = self.thumbnail_zoom.size();
        let mut clicked = None;
        egui::ScrollArea::both()
            .id_salt("thumbnail-grid")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                egui::Grid::new("thumbnail-grid-cells")
                    .spacing(egui::vec2(GRID_CELL_SPACING, GRID_CELL_SPACING))
                    .show(ui, |ui| {
                        for (row, step_row) in self.grid.rows().iter().enumerate() {
                            ui.label(
                                RichText::new(format!("Step {}", step_row.step))
                                    .color(MUTED_TEXT),
                            );
                            for col in 0..step_row.paths.len() {
                                let position = CursorPosition::new(row, col);
                                let response =
                                    thumbnail_cell(ui, self.thumbnails.get(position), cell_size);
                                if response.clicked() {
                                    clicked = Some(position);
                                }
                            }
                            ui.end_row();
                        }
                    });
            });
        clicked
    }

    fn show_drop_overlay(&self, ctx: &egui::Context) {
        if !self.drag_hover {
            return;
        }
        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("folder-drop-overlay"),
        ));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(160));
        painter.text(
            screen_rect.center(),
            egui::Align2::CENTER_CENTER,
            "Drop a folder to open it",
            egui::TextStyle::Heading.resolve(&ctx.style()),
            Color32::WHITE,
        );
    }
}

impl eframe::App for ImageGridApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        Self::apply_dark_theme(ctx);
        self.process_pending_folder_open(ctx);
        self.handle_dropped_files(ctx);

        if self.handle_thumbnail_zoom(ctx) {
            ctx.request_repaint();
        }

        let mut pick_folder_clicked = false;
        egui::TopBottomPanel::top("toolbar")
            .frame(
                egui::Frame::none()
                    .fill(FOOTER_FILL)
                    .inner_margin(egui::Margin::symmetric(8.0, 4.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if ui.button("Open Folder...").clicked() {
                        pick_folder_clicked = true;
                    }
                    ui.label(
                        RichText::new(&self.status_line)
                            .color(SECONDARY_TEXT)
                            .size(12.0),
                    );
                });
            });
        if pick_folder_clicked {
            self.pick_folder();
        }

        let mut clicked = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.is_loading() && self.folder.is_none() {
                ui.centered_and_justified(|ui| {
                    ui.label("Loading folder...");
                });
            } else if self.folder.is_none() {
                self.show_welcome(ui);
            } else {
                clicked = self.show_grid(ui);
            }
        });

        if let Some(position) = clicked {
            self.open_preview(position, ctx);
        }

        self.show_preview_viewport(ctx);
        self.show_drop_overlay(ctx);

        if self.is_loading() {
            ctx.set_cursor_icon(egui::CursorIcon::Progress);
        }
    }
}

fn thumbnail_cell(
    ui: &mut egui::Ui,
    texture: Option<&TextureHandle>,
    cell_size: f32,
) -> egui::Response {
    let (rect, response) =
        ui.allocate_exact_size(egui::vec2(cell_size, cell_size), Sense::click());
    if let Some(texture) = texture {
        let draw_size = fit_size(texture.size_vec2(), rect.size());
        ui.painter().image(
            texture.id(),
            egui::Rect::from_center_size(rect.center(), draw_size),
            egui::Rect::from_min_max(egui::Pos2::ZERO, egui::pos2(1.0, 1.0)),
            Color32::WHITE,
        );
    }
    if response.hovered() {
        ui.painter()
            .rect_stroke(rect, 0.0, egui::Stroke::new(1.0, HANDLE_HOVER));
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
    }
    response
}

fn dominant_scroll_axis(scroll: egui::Vec2) -> f32 {
    if scroll.y.abs() >= scroll.x.abs() {
        scroll.y
    } else {
        scroll.x
    }
}

fn folder_label(folder: &Path) -> String {
    folder
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| folder.display().to_string())
}
