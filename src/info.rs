//! Info view: the scale form and the simulation date readout.

use crate::error::ScaleError;
use crate::time::SimClock;
use eframe::egui;

#[derive(Default)]
pub struct ScaleForm {
    pub input: String,
    pub error: Option<ScaleError>,
}

pub fn parse_scale(input: &str) -> Result<f64, ScaleError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ScaleError::Empty);
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| ScaleError::NotANumber(trimmed.to_string()))?;
    if !value.is_finite() {
        return Err(ScaleError::NotANumber(trimmed.to_string()));
    }
    if value <= 0.0 {
        return Err(ScaleError::NonPositive(value));
    }
    Ok(value)
}

impl ScaleForm {
    /// Parses the field. On error the message is kept for display.
    pub fn submit(&mut self) -> Result<f64, ScaleError> {
        let result = parse_scale(&self.input);
        self.error = result.as_ref().err().cloned();
        result
    }

    /// Returns the new scale when the form was submitted with a valid value.
    pub fn show(&mut self, ui: &mut egui::Ui) -> Option<f64> {
        let mut submitted = false;
        ui.horizontal(|ui| {
            ui.label("Scale:");
            let field = ui.add(
                egui::TextEdit::singleline(&mut self.input)
                    .id_salt("scale")
                    .desired_width(80.0),
            );
            if field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                submitted = true;
            }
            if ui.button("Set New Scale").clicked() {
                submitted = true;
            }
        });
        if let Some(err) = &self.error {
            ui.colored_label(ui.visuals().error_fg_color, err.to_string());
        }
        if !submitted {
            return None;
        }
        match self.submit() {
            Ok(scale) => Some(scale),
            Err(e) => {
                log::warn!("rejected scale input: {e}");
                None
            }
        }
    }
}

/// Floating info window with the scale form, current scale and clock.
pub fn show_info_view(
    ctx: &egui::Context,
    form: &mut ScaleForm,
    scale: &mut f64,
    clock: &mut SimClock,
) {
    egui::Window::new("Info")
        .id(egui::Id::new("info-viewer"))
        .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(10.0, -10.0))
        .resizable(false)
        .collapsible(true)
        .show(ctx, |ui| {
            if let Some(new_scale) = form.show(ui) {
                log::info!("scale changed from {} to {}", *scale, new_scale);
                *scale = new_scale;
            }
            ui.label(egui::RichText::new(format!("Current scale: {}", *scale)).weak());

            ui.separator();
            match clock.timestamp() {
                Some(ts) => ui.label(format!("Date: {}", ts.format("%Y-%m-%d %H:%M UTC"))),
                None => ui.colored_label(ui.visuals().warn_fg_color, "Date: out of range"),
            };
            ui.horizontal(|ui| {
                let label = if clock.running { "⏸" } else { "▶" };
                if ui.button(label).clicked() {
                    clock.running = !clock.running;
                }
                if ui.button("⏪").clicked() {
                    clock.speed = -clock.speed;
                }
                if ui.button("Now").clicked() {
                    clock.reset_to_now();
                }
                ui.label("Speed:");
                ui.add(
                    egui::DragValue::new(&mut clock.speed)
                        .range(-36_525.0..=36_525.0)
                        .speed(1.0)
                        .suffix(" d/s"),
                );
            });
            ui.label(
                egui::RichText::new(format!("{} ({})", env!("CARGO_PKG_VERSION"), env!("GIT_HASH")))
                    .small()
                    .weak(),
            );
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_positive_numbers() {
        assert_eq!(parse_scale("2"), Ok(2.0));
        assert_eq!(parse_scale("  0.25 "), Ok(0.25));
        assert_eq!(parse_scale("1e2"), Ok(100.0));
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(parse_scale(""), Err(ScaleError::Empty));
        assert_eq!(parse_scale("   "), Err(ScaleError::Empty));
        assert_eq!(parse_scale("big"), Err(ScaleError::NotANumber("big".into())));
        assert_eq!(parse_scale("NaN"), Err(ScaleError::NotANumber("NaN".into())));
        assert_eq!(parse_scale("inf"), Err(ScaleError::NotANumber("inf".into())));
        assert_eq!(parse_scale("0"), Err(ScaleError::NonPositive(0.0)));
        assert_eq!(parse_scale("-3"), Err(ScaleError::NonPositive(-3.0)));
    }

    #[test]
    fn submit_keeps_last_error_until_fixed() {
        let mut form = ScaleForm { input: "abc".into(), error: None };
        assert!(form.submit().is_err());
        assert!(form.error.is_some());
        form.input = "3".into();
        assert_eq!(form.submit(), Ok(3.0));
        assert!(form.error.is_none());
    }
}
