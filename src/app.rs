//! Application shell and eframe integration.
//!
//! Owns the scene, camera and UI state. The catalog is read once on the
//! first frame; every frame after that polls the database lookup, advances
//! the clock and redraws the panels and the scene.

use crate::camera::{Camera, OrbitControls};
use crate::catalog::load_catalog;
use crate::config::{SceneConfig, ViewSettings, SETTINGS_KEY};
use crate::drawing::{draw_scene_view, load_sphere_sprite, SceneView};
use crate::info::{show_info_view, ScaleForm};
use crate::panel::{show_panel_toggle, show_side_panel, SidePanelState};
use crate::scene::{body_position, SceneState, ViewFlags, SUN_NAME};
use crate::time::SimClock;
use eframe::egui;
use nalgebra::Point3;
use std::time::Duration;

pub(crate) struct App {
    config: SceneConfig,
    settings: ViewSettings,
    scene: SceneState,
    camera: Camera,
    controls: OrbitControls,
    clock: SimClock,
    scale_form: ScaleForm,
    panel: SidePanelState,
    sphere_sprite: egui::TextureHandle,
    first_frame: bool,
}

impl App {
    pub(crate) fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config = SceneConfig::default();
        let settings: ViewSettings = cc
            .storage
            .and_then(|storage| eframe::get_value::<ViewSettings>(storage, SETTINGS_KEY))
            .map(ViewSettings::sanitized)
            .unwrap_or_default();
        log::debug!("restored view settings: {settings:?}");

        Self {
            camera: Camera::from_config(&config.camera),
            controls: OrbitControls::from_config(&config.camera),
            clock: SimClock::now(settings.clock_speed),
            sphere_sprite: load_sphere_sprite(&cc.egui_ctx, config.sphere_sprite_size),
            scale_form: ScaleForm::default(),
            panel: SidePanelState::default(),
            scene: SceneState::default(),
            first_frame: true,
            config,
            settings,
        }
    }

    fn initialize_scene(&mut self) {
        log::info!("creating solar system from the built-in catalog");
        match load_catalog() {
            Ok(bodies) => self.scene.populate(bodies),
            Err(e) => {
                log::error!("failed to load catalog: {e}");
                self.panel.catalog_error = Some(e.to_string());
            }
        }
    }

    /// Re-targets the camera on a body, keeping the current viewing offset.
    fn focus_on(&mut self, name: &str) {
        let target = if name == SUN_NAME {
            Some(Point3::origin())
        } else {
            self.scene
                .find(name)
                .map(|b| body_position(&b.elements, self.clock.days_since_j2000))
        };
        if let Some(target) = target {
            let offset = self.camera.position - self.camera.target;
            self.camera.target = target;
            self.camera.position = target + offset;
            log::debug!("camera focused on {name}");
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.first_frame {
            self.initialize_scene();
            self.first_frame = false;
        }

        ctx.set_visuals(if self.settings.dark_mode {
            let mut vis = egui::Visuals::dark();
            vis.panel_fill = egui::Color32::from_gray(10);
            vis.window_fill = egui::Color32::from_gray(10);
            vis
        } else {
            egui::Visuals::light()
        });

        if let Some(body) = self.panel.search.poll() {
            self.scene.add_asteroid(body);
        }
        if self.panel.search.is_loading() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        let dt = ctx.input(|i| i.stable_dt) as f64;
        self.clock.advance(dt);
        if self.clock.running {
            ctx.request_repaint();
        }

        show_panel_toggle(ctx, &mut self.settings);
        show_side_panel(ctx, &mut self.settings, &mut self.scene, &mut self.panel);
        show_info_view(ctx, &mut self.scale_form, &mut self.settings.scale, &mut self.clock);

        let clicked = egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                draw_scene_view(
                    ui,
                    &mut self.camera,
                    &self.controls,
                    SceneView {
                        state: &self.scene,
                        flags: ViewFlags::from(&self.settings),
                        config: &self.config,
                        days_since_j2000: self.clock.days_since_j2000,
                        sprite: Some(&self.sphere_sprite),
                        dark_mode: self.settings.dark_mode,
                    },
                )
            })
            .inner;

        if let Some(name) = clicked {
            self.focus_on(&name);
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.settings.clock_speed = self.clock.speed;
        eframe::set_value(storage, SETTINGS_KEY, &self.settings);
    }
}
