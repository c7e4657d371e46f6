use eframe::egui;
use crate::modules::image_editor::{Command, ImageEditor};
use crate::settings::{AppSettings, ThemePreference};
use crate::style::{self, ThemeMode};

pub const APP_NAME: &str = "Simple Photo Editor";

pub struct PhotoEditorApp {
    editor: ImageEditor,
    settings: AppSettings,
    theme_mode: ThemeMode,
    window_title: String,
}

fn system_theme(ctx: &egui::Context) -> ThemeMode {
    match ctx.theme() {
        egui::Theme::Dark => ThemeMode::Dark,
        egui::Theme::Light => ThemeMode::Light,
    }
}

impl PhotoEditorApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings: AppSettings = AppSettings::load();
        let initial_theme: ThemeMode = match settings.theme_preference {
            ThemePreference::System => system_theme(&cc.egui_ctx),
            ThemePreference::Light => ThemeMode::Light,
            ThemePreference::Dark => ThemeMode::Dark,
        };
        style::apply_theme(&cc.egui_ctx, initial_theme);

        Self {
            editor: ImageEditor::new(),
            settings,
            theme_mode: initial_theme,
            window_title: APP_NAME.to_string(),
        }
    }

    fn set_theme(&mut self, ctx: &egui::Context, preference: ThemePreference) {
        self.settings.theme_preference = preference;
        self.theme_mode = match preference {
            ThemePreference::System => system_theme(ctx),
            ThemePreference::Light => ThemeMode::Light,
            ThemePreference::Dark => ThemeMode::Dark,
        };
        style::apply_theme(ctx, self.theme_mode);
        self.settings.save();
    }

    fn top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.add_space(4.0);
            egui::MenuBar::new().ui(ui, |ui| {
                let has_image: bool = self.editor.has_image();
                ui.menu_button("File", |ui| {
                    if ui.button("Open... (Ctrl+O)").clicked() {
                        ui.close();
                        self.editor.open_dialog(&mut self.settings);
                    }
                    if ui.add_enabled(has_image, egui::Button::new("Save As... (Ctrl+S)")).clicked() {
                        ui.close();
                        self.editor.save_dialog(&mut self.settings);
                    }
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                        ui.close();
                    }
                });

                ui.menu_button("Edit", |ui| {
                    if ui.add_enabled(self.editor.can_undo(), egui::Button::new("Undo (Ctrl+Z)")).clicked() {
                        self.editor.run(Command::Undo);
                        ui.close();
                    }
                });

                ui.menu_button("View", |ui| {
                    ui.label("Theme:");
                    for (preference, label) in [
                        (ThemePreference::System, "System"),
                        (ThemePreference::Light, "Light"),
                        (ThemePreference::Dark, "Dark"),
                    ] {
                        if ui.selectable_label(self.settings.theme_preference == preference, label).clicked() {
                            self.set_theme(ctx, preference);
                            ui.close();
                        }
                    }
                });

                ui.menu_button("Settings", |ui| {
                    ui.label("JPEG quality:");
                    let slider = ui.add(egui::Slider::new(&mut self.settings.jpeg_quality, 1..=100));
                    if slider.drag_stopped() || slider.lost_focus() { self.settings.save(); }
                });
            });
        });
    }

    fn sync_title(&mut self, ctx: &egui::Context) {
        let title: String = self.editor.get_title();
        if title != self.window_title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.window_title = title;
        }
    }
}

impl eframe::App for PhotoEditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if matches!(self.settings.theme_preference, ThemePreference::System) {
            let current: ThemeMode = system_theme(ctx);
            if self.theme_mode != current {
                self.theme_mode = current;
                style::apply_theme(ctx, self.theme_mode);
            }
        }

        self.top_bar(ctx);
        self.editor.ui(ctx, &mut self.settings, self.theme_mode);
        self.sync_title(ctx);
    }
}
