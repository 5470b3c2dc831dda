use crate::domain::forecast::HoldoutEvaluation;
use crate::interfaces::components::card::Card;
use crate::interfaces::design_system::DesignSystem;
use eframe::egui;

fn metric(ui: &mut egui::Ui, label: &str, value: String) {
    ui.vertical(|ui| {
        ui.label(
            egui::RichText::new(value)
                .size(24.0)
                .strong()
                .color(DesignSystem::TEXT_PRIMARY),
        );
        ui.label(
            egui::RichText::new(label)
                .size(11.0)
                .color(DesignSystem::TEXT_MUTED),
        );
    });
}

/// One-step-ahead accuracy of the model on the held-out tail of the history
pub fn render_holdout_card(ui: &mut egui::Ui, holdout: Option<&HoldoutEvaluation>, model: &str) {
    Card::new().title("Model Accuracy").show(ui, |ui| {
        match holdout {
            Some(eval) => {
                ui.horizontal(|ui| {
                    metric(ui, "RMSE (USD)", format!("{:.2}", eval.rmse));
                    ui.add_space(DesignSystem::SPACING_MEDIUM);
                    metric(ui, "MAPE", format!("{:.2}%", eval.mape_pct));
                    ui.add_space(DesignSystem::SPACING_MEDIUM);
                    metric(ui, "Test windows", eval.samples.to_string());
                });
            }
            None => {
                ui.label(
                    egui::RichText::new("No holdout evaluation for this range")
                        .color(DesignSystem::TEXT_MUTED),
                );
            }
        }
        ui.add_space(4.0);
        ui.label(
            egui::RichText::new(format!("Model: {}", model))
                .size(11.0)
                .color(DesignSystem::TEXT_MUTED),
        );
    });
}
