use eframe::egui;
use image::RgbImage;
use log::{debug, info};
use std::path::{Path, PathBuf};
use crate::error::EditorError;
use crate::modules::image_export::{self, ExportFormat};
use super::ie_history::EditHistory;
use super::ie_selection::RegionSelector;
use super::ie_tools;

/// Editing actions that work on the current image. File actions (open, save,
/// close) need dialogs and live in the shell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Undo,
    RotateLeft,
    RotateRight,
    /// Commit the pending selection. `display_size` is the on-screen size of
    /// the image the selection was dragged over.
    Crop { display_size: egui::Vec2 },
    BrightnessUp,
    BrightnessDown,
    Blur,
    Sharpen,
    Grayscale,
    Invert,
}

impl Command {
    pub fn label(&self) -> &'static str {
        match self {
            Command::Undo => "Undo",
            Command::RotateLeft => "Rotate Left",
            Command::RotateRight => "Rotate Right",
            Command::Crop { .. } => "Crop",
            Command::BrightnessUp => "Increase Brightness",
            Command::BrightnessDown => "Decrease Brightness",
            Command::Blur => "Blur",
            Command::Sharpen => "Sharpen",
            Command::Grayscale => "Grayscale",
            Command::Invert => "Invert Colors",
        }
    }
}

/// Whether a command replaced the current image. The shell only re-uploads
/// the texture on `Changed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Changed,
    Unchanged,
}

/// Current image, its undo history and the pending crop selection.
#[derive(Debug, Default)]
pub struct EditorSession {
    image: Option<RgbImage>,
    history: EditHistory,
    selector: RegionSelector,
    file_path: Option<PathBuf>,
    dirty: bool,
}

impl EditorSession {
    pub fn new() -> Self { Self::default() }

    pub fn image(&self) -> Option<&RgbImage> { self.image.as_ref() }
    pub fn has_image(&self) -> bool { self.image.is_some() }
    pub fn file_path(&self) -> Option<&Path> { self.file_path.as_deref() }
    pub fn is_dirty(&self) -> bool { self.dirty }
    pub fn history(&self) -> &EditHistory { &self.history }
    pub fn selector(&self) -> &RegionSelector { &self.selector }
    pub fn selector_mut(&mut self) -> &mut RegionSelector { &mut self.selector }

    pub fn open(&mut self, path: &Path) -> Result<(), EditorError> {
        let decoded: image::DynamicImage = image::open(path)
            .map_err(|source| EditorError::Open { path: path.to_path_buf(), source })?;
        info!("opened {} ({}x{})", path.display(), decoded.width(), decoded.height());
        self.load_image(decoded.to_rgb8(), Some(path.to_path_buf()));
        Ok(())
    }

    /// Replaces the current image. History belongs to the previous image and is dropped.
    pub fn load_image(&mut self, image: RgbImage, path: Option<PathBuf>) {
        self.image = Some(image);
        self.history.clear();
        self.selector.reset();
        self.file_path = path;
        self.dirty = false;
    }

    /// Writes the current image, choosing JPEG or PNG from the extension.
    /// Returns the path actually written.
    pub fn save(&mut self, path: &Path, jpeg_quality: u8) -> Result<PathBuf, EditorError> {
        let image: &RgbImage = self.image.as_ref().ok_or(EditorError::NoImageLoaded)?;
        let path: PathBuf = image_export::with_default_extension(path);
        let format: ExportFormat = ExportFormat::from_path(&path)?;
        image_export::export_image(image, &path, format, jpeg_quality)?;
        info!("saved {} as {}", path.display(), format.as_str());
        self.file_path = Some(path.clone());
        self.dirty = false;
        Ok(path)
    }

    pub fn execute(&mut self, command: Command) -> Result<Outcome, EditorError> {
        debug!("command: {}", command.label());
        let outcome: Outcome = match command {
            Command::Undo => self.undo()?,
            Command::Crop { display_size } => self.crop(display_size),
            Command::RotateLeft => self.transform(ie_tools::rotate_left),
            Command::RotateRight => self.transform(ie_tools::rotate_right),
            Command::BrightnessUp => self.transform(ie_tools::brighten),
            Command::BrightnessDown => self.transform(ie_tools::darken),
            Command::Blur => self.transform(ie_tools::blur),
            Command::Sharpen => self.transform(ie_tools::sharpen),
            Command::Grayscale => self.transform(ie_tools::grayscale),
            Command::Invert => self.transform(ie_tools::invert),
        };
        if outcome == Outcome::Changed {
            self.dirty = true;
            // the overlay was drawn over the old picture
            self.selector.reset();
        }
        Ok(outcome)
    }

    fn replace_image(&mut self, next: RgbImage) {
        if let Some(previous) = self.image.replace(next) { self.history.push(previous); }
    }

    fn transform(&mut self, op: impl FnOnce(&RgbImage) -> RgbImage) -> Outcome {
        let Some(current) = self.image.as_ref() else {
            debug!("ignored: {}", EditorError::NoImageLoaded);
            return Outcome::Unchanged;
        };
        let next: RgbImage = op(current);
        self.replace_image(next);
        Outcome::Changed
    }

    fn crop(&mut self, display_size: egui::Vec2) -> Outcome {
        let Some(current) = self.image.as_ref() else {
            self.selector.reset();
            return Outcome::Unchanged;
        };
        let Some(region) = self.selector.commit(current.dimensions(), display_size) else {
            debug!("crop ignored: empty or degenerate selection");
            return Outcome::Unchanged;
        };
        debug!("crop to {}x{} at ({}, {})", region.width, region.height, region.x, region.y);
        let cropped: RgbImage = ie_tools::crop(current, region);
        self.replace_image(cropped);
        Outcome::Changed
    }

    fn undo(&mut self) -> Result<Outcome, EditorError> {
        let previous: RgbImage = self.history.pop().ok_or(EditorError::NoHistory)?;
        self.image = Some(previous);
        Ok(Outcome::Changed)
    }
}
