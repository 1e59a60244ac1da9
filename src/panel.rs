//! Side panel: entity list, overlay toggles and the asteroid search.

use crate::config::ViewSettings;
use crate::scene::{SceneState, SUN_NAME};
use crate::sbdb::{AsteroidSearch, LookupState};
use eframe::egui;

/// A labelled checkbox bound to one view flag.
pub struct WidgetButton<'a> {
    pub name: &'a str,
    pub text: &'a str,
    pub checked: &'a mut bool,
}

impl WidgetButton<'_> {
    /// Returns true when the flag was flipped this frame.
    pub fn show(self, ui: &mut egui::Ui) -> bool {
        let WidgetButton { name, text, checked } = self;
        let response = ui
            .push_id(name, |ui| ui.checkbox(&mut *checked, text))
            .inner;
        if response.changed() {
            log::debug!("{name} toggled to {}", *checked);
        }
        response.changed()
    }
}

#[derive(Default)]
pub struct SidePanelState {
    pub search_open: bool,
    pub search: AsteroidSearch,
    pub catalog_error: Option<String>,
}

/// Edge button that opens and closes the side panel.
pub fn show_panel_toggle(ctx: &egui::Context, settings: &mut ViewSettings) {
    egui::Area::new(egui::Id::new("side-window-button"))
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-10.0, 10.0))
        .show(ctx, |ui| {
            let text = if settings.side_panel_open { "›" } else { "☰" };
            if ui.button(text).on_hover_text("Bodies and overlays").clicked() {
                settings.side_panel_open = !settings.side_panel_open;
            }
        });
}

pub fn show_side_panel(
    ctx: &egui::Context,
    settings: &mut ViewSettings,
    scene: &mut SceneState,
    panel: &mut SidePanelState,
) {
    if !settings.side_panel_open {
        return;
    }
    egui::SidePanel::right("rightMenu")
        .resizable(true)
        .default_width(240.0)
        .show(ctx, |ui| {
            if ui
                .add_sized([ui.available_width(), 20.0], egui::Button::new("Close ×"))
                .clicked()
            {
                settings.side_panel_open = false;
            }
            ui.separator();

            ui.label(egui::RichText::new("Overlays").strong());
            WidgetButton { name: "grid-toggle", text: "Grid", checked: &mut settings.show_grid }.show(ui);
            WidgetButton { name: "axes-toggle", text: "Axes", checked: &mut settings.show_axes }.show(ui);
            WidgetButton { name: "orbit-toggle", text: "Orbits", checked: &mut settings.show_orbits }.show(ui);
            WidgetButton { name: "dark-toggle", text: "Dark background", checked: &mut settings.dark_mode }.show(ui);
            ui.separator();

            ui.label(egui::RichText::new("Bodies").strong());
            if let Some(err) = &panel.catalog_error {
                ui.colored_label(ui.visuals().error_fg_color, err.as_str());
            } else if !scene.is_loaded() {
                ui.label(egui::RichText::new("Loading…").weak());
            }
            egui::ScrollArea::vertical()
                .id_salt("entity-list")
                .max_height(ui.available_height() * 0.5)
                .show(ui, |ui| show_entity_list(ui, settings, scene));
            ui.separator();

            let label = if panel.search_open { "Hide Database Search" } else { "Go to Database Search" };
            if ui
                .add_sized([ui.available_width(), 20.0], egui::Button::new(label))
                .clicked()
            {
                panel.search_open = !panel.search_open;
            }
            if panel.search_open {
                show_search(ui, &mut panel.search);
            }
        });
}

fn show_entity_list(ui: &mut egui::Ui, settings: &mut ViewSettings, scene: &mut SceneState) {
    let mut sun_visible = settings.show_sun && scene.is_visible(SUN_NAME);
    if (WidgetButton { name: "sun-toggle", text: SUN_NAME, checked: &mut sun_visible }).show(ui) {
        settings.show_sun = sun_visible;
        scene.set_visible(SUN_NAME, sun_visible);
    }

    let names: Vec<(String, &'static str)> = scene
        .bodies()
        .map(|b| (b.name.clone(), b.kind.label()))
        .collect();
    for (name, kind) in names {
        let mut visible = scene.is_visible(&name);
        let changed = ui
            .horizontal(|ui| {
                let changed = WidgetButton { name: &name, text: &name, checked: &mut visible }.show(ui);
                ui.label(egui::RichText::new(kind).small().weak());
                changed
            })
            .inner;
        if changed {
            scene.set_visible(&name, visible);
        }
    }
}

fn show_search(ui: &mut egui::Ui, search: &mut AsteroidSearch) {
    ui.label("Add an asteroid from the JPL small-body database:");
    ui.horizontal(|ui| {
        let field = ui.add(
            egui::TextEdit::singleline(&mut search.query)
                .hint_text("e.g. Eros")
                .desired_width(140.0),
        );
        let enter = field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        let add = ui
            .add_enabled(!search.is_loading(), egui::Button::new("Add"))
            .clicked();
        if enter || add {
            search.start();
        }
    });
    match &search.state {
        LookupState::Idle => {}
        LookupState::Loading(query) => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(format!("Searching for {query}…"));
            });
        }
        LookupState::Added(name) => {
            ui.label(egui::RichText::new(format!("Added {name}")).weak());
        }
        LookupState::Failed(err) => {
            ui.colored_label(ui.visuals().error_fg_color, err.as_str());
        }
    }
}
