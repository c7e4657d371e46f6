use eframe::egui;
use crate::settings::AppSettings;
use crate::style::{self, ColorPalette, ThemeMode};
use super::ie_helpers::fit_scale;
use super::ie_main::ImageEditor;
use super::ie_session::Command;

const PANEL_WIDTH: f32 = 170.0;

impl ImageEditor {
    /// Draws the whole editor for one frame. Side panels must be laid out before the canvas.
    pub fn ui(&mut self, ctx: &egui::Context, settings: &mut AppSettings, theme: ThemeMode) {
        self.handle_dropped_files(ctx, settings);
        self.handle_keyboard(ctx, settings);
        self.ensure_texture(ctx);

        self.render_file_panel(ctx, settings, theme);
        self.render_adjust_panel(ctx, theme);
        egui::CentralPanel::default().show(ctx, |ui| self.render_canvas(ui, ctx, theme));
        self.render_notice(ctx, theme);
    }

    fn render_file_panel(&mut self, ctx: &egui::Context, settings: &mut AppSettings, theme: ThemeMode) {
        let has_image: bool = self.session.has_image();
        egui::SidePanel::left("ie_file_panel").resizable(false).exact_width(PANEL_WIDTH).show(ctx, |ui| {
            ui.add_space(8.0);
            ui.label(egui::RichText::new("File").strong());
            if style::tool_button(ui, "Open", true, theme).on_hover_text("Ctrl+O").clicked() {
                self.open_dialog(settings);
            }
            if style::tool_button(ui, "Save", has_image, theme).on_hover_text("Ctrl+S").clicked() {
                self.save_dialog(settings);
            }

            ui.separator();
            ui.label(egui::RichText::new("Edit").strong());
            let history = self.session.history();
            let undo_label: String = format!("Undo ({}/{})", history.len(), history.capacity());
            if style::tool_button(ui, &undo_label, true, theme).on_hover_text("Ctrl+Z").clicked() {
                self.run(Command::Undo);
            }
            self.command_button(ui, Command::RotateLeft, has_image, theme);
            self.command_button(ui, Command::RotateRight, has_image, theme);

            ui.separator();
            if style::tool_button(ui, "Close", true, theme).clicked() {
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });
    }

    fn render_adjust_panel(&mut self, ctx: &egui::Context, theme: ThemeMode) {
        let has_image: bool = self.session.has_image();
        egui::SidePanel::right("ie_adjust_panel").resizable(false).exact_width(PANEL_WIDTH).show(ctx, |ui| {
            ui.add_space(8.0);
            ui.label(egui::RichText::new("Adjust").strong());
            let can_crop: bool = has_image && self.session.selector().has_selection();
            if style::tool_button(ui, "Crop", can_crop, theme).on_hover_text("Enter").clicked() {
                self.crop();
            }
            for command in [Command::BrightnessUp, Command::BrightnessDown] {
                self.command_button(ui, command, has_image, theme);
            }

            ui.separator();
            ui.label(egui::RichText::new("Filters").strong());
            for command in [Command::Blur, Command::Sharpen, Command::Grayscale, Command::Invert] {
                self.command_button(ui, command, has_image, theme);
            }
        });
    }

    fn command_button(&mut self, ui: &mut egui::Ui, command: Command, enabled: bool, theme: ThemeMode) {
        if style::tool_button(ui, command.label(), enabled, theme).clicked() { self.run(command); }
    }

    fn render_canvas(&mut self, ui: &mut egui::Ui, ctx: &egui::Context, theme: ThemeMode) {
        let canvas_rect: egui::Rect = ui.available_rect_before_wrap();
        let (rect, response) = ui.allocate_exact_size(canvas_rect.size(), egui::Sense::click_and_drag());
        let painter: egui::Painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, ui.visuals().extreme_bg_color);

        let (Some(tex), Some(img)) = (self.texture, self.session.image()) else {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "Open an image or drop one here",
                egui::FontId::proportional(18.0),
                style::muted_text(theme),
            );
            return;
        };

        let (img_w, img_h) = img.dimensions();
        let scale: f32 = fit_scale((img_w, img_h), rect.size());
        let display_size: egui::Vec2 = egui::vec2(img_w as f32 * scale, img_h as f32 * scale);
        let img_rect: egui::Rect = egui::Rect::from_center_size(rect.center(), display_size);
        self.set_display_size(display_size);

        painter.image(tex, img_rect, egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)), egui::Color32::WHITE);
        painter.rect_stroke(img_rect, 0.0, egui::Stroke::new(1.0, ColorPalette::ZINC_500), egui::StrokeKind::Outside);

        let to_display = |p: egui::Pos2| (p - img_rect.min).to_pos2();
        let pointer_pos = || response.interact_pointer_pos().or_else(|| ctx.input(|i| i.pointer.latest_pos()));

        if response.drag_started_by(egui::PointerButton::Primary) {
            let origin = ctx.input(|i| i.pointer.press_origin()).or_else(pointer_pos);
            if let Some(p) = origin { self.session.selector_mut().begin(to_display(p)); }
        }
        if response.dragged_by(egui::PointerButton::Primary) {
            if let Some(p) = pointer_pos() { self.session.selector_mut().update(to_display(p)); }
        }
        if response.drag_stopped_by(egui::PointerButton::Primary) {
            if let Some(p) = pointer_pos() { self.session.selector_mut().end(to_display(p)); }
        }
        if response.clicked_by(egui::PointerButton::Primary) {
            if let Some(p) = pointer_pos() { self.session.selector_mut().begin(to_display(p)); }
        }

        let selector = self.session.selector();
        let Some(overlay) = selector.overlay() else { return; };
        let screen_rect: egui::Rect = overlay.translate(img_rect.min.to_vec2());
        painter.rect_stroke(screen_rect, 0.0, egui::Stroke::new(2.0, ColorPalette::RED_500), egui::StrokeKind::Outside);

        if let Some(region) = selector.preview((img_w, img_h), display_size) {
            let hint: &str = if selector.is_frozen() { "  (Enter to crop)" } else { "" };
            let label: String = format!("{} x {}{hint}", region.width, region.height);
            let text_pos = egui::pos2(screen_rect.min.x + 4.0, (screen_rect.min.y - 18.0).max(rect.min.y + 4.0));
            painter.text(text_pos + egui::vec2(1.0, 1.0), egui::Align2::LEFT_TOP, &label, egui::FontId::proportional(12.0), egui::Color32::from_black_alpha(160));
            painter.text(text_pos, egui::Align2::LEFT_TOP, &label, egui::FontId::proportional(12.0), egui::Color32::WHITE);
        }
    }

    fn render_notice(&mut self, ctx: &egui::Context, theme: ThemeMode) {
        let Some(notice) = &self.notice else { return; };
        let text_color: egui::Color32 = match (notice.is_error, theme) {
            (true, ThemeMode::Dark) => ColorPalette::RED_400,
            (true, ThemeMode::Light) => ColorPalette::RED_600,
            (false, _) => ctx.style().visuals.text_color(),
        };

        let mut dismissed: bool = false;
        egui::Window::new(notice.title.as_str())
            .id(egui::Id::new("ie_notice"))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.set_max_width(360.0);
                ui.label(egui::RichText::new(&notice.message).color(text_color));
                ui.add_space(10.0);
                ui.vertical_centered(|ui| {
                    if style::primary_button(ui, "OK").clicked() { dismissed = true; }
                });
            });
        if dismissed { self.notice = None; }
    }
}
