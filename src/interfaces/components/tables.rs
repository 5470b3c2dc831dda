use crate::interfaces::components::card::Card;
use crate::interfaces::design_system::DesignSystem;
use crate::interfaces::view_models::TableRow;
use eframe::egui;

/// Two-column date/price table in a scrollable card
pub fn render_price_table(
    ui: &mut egui::Ui,
    id: &str,
    title: &str,
    price_header: &str,
    rows: &[TableRow],
    max_height: f32,
) {
    Card::new().title(title).show(ui, |ui| {
        egui::ScrollArea::vertical()
            .id_salt(id)
            .max_height(max_height)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                egui::Grid::new(id)
                    .striped(true)
                    .num_columns(2)
                    .min_col_width(100.0)
                    .spacing([20.0, 6.0])
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new("Date").strong());
                        ui.label(egui::RichText::new(price_header).strong());
                        ui.end_row();

                        for row in rows {
                            ui.label(
                                egui::RichText::new(&row.date).color(DesignSystem::TEXT_SECONDARY),
                            );
                            ui.label(egui::RichText::new(&row.price).monospace());
                            ui.end_row();
                        }
                    });
            });
    });
}
