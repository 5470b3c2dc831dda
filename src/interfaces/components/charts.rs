use crate::interfaces::design_system::DesignSystem;
use crate::interfaces::view_models::ForecastViewModel;
use crate::interfaces::view_models::forecast_view_model::axis_label;
use eframe::egui;
use egui_plot::{Corner, Legend, Line, LineStyle, Plot};

/// Historical closes (solid) and predictions (dashed) on one time axis
pub fn render_forecast_chart(ui: &mut egui::Ui, vm: &ForecastViewModel, height: f32) {
    ui.label(
        egui::RichText::new("Historical Data and Future Predictions")
            .strong()
            .size(16.0)
            .color(DesignSystem::TEXT_PRIMARY),
    );
    ui.add_space(6.0);

    Plot::new(format!("forecast_chart_{}", vm.symbol))
        .height(height.max(300.0))
        .show_grid([true, true])
        .legend(Legend::default().position(Corner::RightBottom))
        .x_axis_label("Date")
        .y_axis_label("Close Price USD")
        .x_axis_formatter(|mark, _range| axis_label(mark.value))
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new("Historical Data", vm.history_points.clone())
                    .color(DesignSystem::HISTORY_LINE)
                    .width(1.5),
            );
            if vm.forecast_points.len() > 1 {
                plot_ui.line(
                    Line::new("Future Predictions", vm.forecast_points.clone())
                        .color(DesignSystem::FORECAST_LINE)
                        .style(LineStyle::dashed_loose())
                        .width(2.0),
                );
            }
        });
}
