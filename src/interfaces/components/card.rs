use crate::interfaces::design_system::DesignSystem;
use eframe::egui;

/// Titled container used for every block of the central panel
#[derive(Default)]
pub struct Card {
    title: Option<String>,
    min_height: f32,
}

impl Card {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn min_height(mut self, height: f32) -> Self {
        self.min_height = height;
        self
    }

    pub fn show<R>(
        self,
        ui: &mut egui::Ui,
        add_contents: impl FnOnce(&mut egui::Ui) -> R,
    ) -> egui::InnerResponse<R> {
        DesignSystem::card_frame().show(ui, |ui| {
            // min_width misbehaves inside ScrollArea, only height is pinned
            if self.min_height > 0.0 {
                ui.set_min_height(self.min_height);
            }

            if let Some(title) = self.title {
                ui.label(
                    egui::RichText::new(title)
                        .size(14.0)
                        .color(DesignSystem::TEXT_SECONDARY)
                        .strong(),
                );
                ui.add_space(DesignSystem::SPACING_SMALL);
            }

            add_contents(ui)
        })
    }
}
