use eframe::egui;
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use crate::app::APP_NAME;
use crate::error::EditorError;
use crate::modules::image_export::ExportFormat;
use crate::settings::AppSettings;
use super::ie_session::{Command, EditorSession, Outcome};

pub(super) const OPEN_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "webp", "gif", "tif", "tiff"];

pub(super) struct Notice {
    pub(super) title: String,
    pub(super) message: String,
    pub(super) is_error: bool,
}

impl Notice {
    fn info(title: &str, message: String) -> Self {
        Self { title: title.to_string(), message, is_error: false }
    }

    fn from_error(err: &EditorError) -> Self {
        Self {
            title: err.title().to_string(),
            message: err.to_string(),
            is_error: !matches!(err, EditorError::NoHistory),
        }
    }
}

pub struct ImageEditor {
    pub(super) session: EditorSession,
    pub(super) texture: Option<egui::TextureId>,
    pub(super) texture_dirty: bool,
    /// On-screen size of the image in the last frame, used to map selections back to pixels.
    pub(super) display_size: egui::Vec2,
    pub(super) notice: Option<Notice>,
}

impl ImageEditor {
    pub fn new() -> Self {
        Self {
            session: EditorSession::new(),
            texture: None,
            texture_dirty: false,
            display_size: egui::Vec2::ZERO,
            notice: None,
        }
    }

    pub fn has_image(&self) -> bool { self.session.has_image() }
    pub fn can_undo(&self) -> bool { !self.session.history().is_empty() }

    pub fn get_title(&self) -> String {
        if !self.session.has_image() { return APP_NAME.to_string(); }
        let name: String = self.session.file_path()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Untitled".to_string());
        let marker: &str = if self.session.is_dirty() { " *" } else { "" };
        format!("{name}{marker} - {APP_NAME}")
    }

    pub fn run(&mut self, command: Command) {
        match self.session.execute(command) {
            Ok(Outcome::Changed) => self.texture_dirty = true,
            Ok(Outcome::Unchanged) => {}
            Err(err) => self.report(err),
        }
    }

    /// Records the on-screen image size. A pending selection was dragged at the
    /// old scale, so it is dropped when the size changes.
    pub(super) fn set_display_size(&mut self, size: egui::Vec2) {
        if size == self.display_size { return; }
        self.session.selector_mut().reset();
        self.display_size = size;
    }

    pub(super) fn crop(&mut self) {
        let display_size: egui::Vec2 = self.display_size;
        self.run(Command::Crop { display_size });
    }

    pub fn open_path(&mut self, path: &Path, settings: &mut AppSettings) {
        match self.session.open(path) {
            Ok(()) => {
                self.texture_dirty = true;
                settings.remember_directory(path);
            }
            Err(err) => self.report(err),
        }
    }

    pub fn open_dialog(&mut self, settings: &mut AppSettings) {
        let mut dialog: rfd::FileDialog = rfd::FileDialog::new().add_filter("Images", OPEN_EXTENSIONS);
        if let Some(dir) = &settings.last_directory { dialog = dialog.set_directory(dir); }
        if let Some(path) = dialog.pick_file() { self.open_path(&path, settings); }
    }

    pub fn save_dialog(&mut self, settings: &mut AppSettings) {
        if !self.session.has_image() { return; }
        let stem: String = self.session.file_path()
            .and_then(|p| p.file_stem())
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "untitled".to_string());

        let mut dialog: rfd::FileDialog = rfd::FileDialog::new()
            .set_file_name(format!("{stem}.{}", ExportFormat::Jpeg.extension()));
        for format in ExportFormat::all() { dialog = dialog.add_filter(format.as_str(), format.extensions()); }
        if let Some(dir) = &settings.last_directory { dialog = dialog.set_directory(dir); }

        let Some(path) = dialog.save_file() else { return; };
        match self.session.save(&path, settings.jpeg_quality) {
            Ok(written) => {
                settings.remember_directory(&written);
                self.notice = Some(Notice::info("Saved", format!("Image saved to {}", written.display())));
            }
            Err(err) => self.report(err),
        }
    }

    fn report(&mut self, err: EditorError) {
        match err {
            EditorError::NoImageLoaded => return,
            EditorError::NoHistory => info!("{err}"),
            EditorError::UnsupportedFormat(_) => warn!("{err}"),
            _ => error!("{err}"),
        }
        self.notice = Some(Notice::from_error(&err));
    }

    pub(super) fn ensure_texture(&mut self, ctx: &egui::Context) {
        if !self.texture_dirty { return; }
        self.texture_dirty = false;
        let Some(img) = self.session.image() else { return; };
        let color_image: egui::ColorImage = egui::ColorImage::from_rgb(
            [img.width() as usize, img.height() as usize],
            img.as_raw(),
        );

        if let Some(texture_id) = self.texture {
            ctx.tex_manager().write().set(texture_id, egui::epaint::ImageDelta::full(color_image, egui::TextureOptions::LINEAR));
        } else {
            self.texture = Some(ctx.tex_manager().write().alloc("photo_editor_img".into(), color_image.into(), egui::TextureOptions::LINEAR));
        }
    }

    pub(super) fn handle_keyboard(&mut self, ctx: &egui::Context, settings: &mut AppSettings) {
        // dialogs block, so they run after the input lock is released
        let (open, save, undo, crop, clear) = ctx.input_mut(|i| (
            i.consume_key(egui::Modifiers::CTRL, egui::Key::O),
            i.consume_key(egui::Modifiers::CTRL, egui::Key::S),
            i.consume_key(egui::Modifiers::CTRL, egui::Key::Z),
            i.consume_key(egui::Modifiers::NONE, egui::Key::Enter),
            i.consume_key(egui::Modifiers::NONE, egui::Key::Escape),
        ));
        if open { self.open_dialog(settings); }
        if save { self.save_dialog(settings); }
        if undo { self.run(Command::Undo); }
        if crop { self.crop(); }
        if clear { self.session.selector_mut().reset(); }
    }

    pub(super) fn handle_dropped_files(&mut self, ctx: &egui::Context, settings: &mut AppSettings) {
        let dropped: Option<PathBuf> = ctx.input(|i| i.raw.dropped_files.iter().find_map(|f| f.path.clone()));
        if let Some(path) = dropped { self.open_path(&path, settings); }
    }
}
