use crate::application::client::{ClientEvent, ForecastClient};
use crate::interfaces::components::{charts, metrics, tables};
use crate::interfaces::design_system::DesignSystem;
use crate::interfaces::view_models::{ForecastViewModel, SettingsForm};
use eframe::egui;
use std::collections::VecDeque;
use std::time::Duration;
use tracing::info;

const MAX_LOG_LINES: usize = 500;

enum ViewState {
    Idle,
    Ready(Box<ForecastViewModel>),
    Failed(String),
}

/// Desktop dashboard: settings sidebar, results in the central panel.
pub struct ForecastDashboard {
    client: ForecastClient,
    form: SettingsForm,
    max_horizon: usize,
    view: ViewState,
    logs: VecDeque<String>,
}

impl ForecastDashboard {
    pub fn new(client: ForecastClient, form: SettingsForm) -> Self {
        let max_horizon = client.service().settings().max_horizon;
        Self {
            client,
            form,
            max_horizon,
            view: ViewState::Idle,
            logs: VecDeque::with_capacity(MAX_LOG_LINES),
        }
    }

    fn drain_events(&mut self) {
        while let Some(event) = self.client.poll_next() {
            match event {
                ClientEvent::Finished(outcome) => {
                    self.view = match *outcome {
                        Ok(report) => {
                            ViewState::Ready(Box::new(ForecastViewModel::from_report(&report)))
                        }
                        Err(e) => ViewState::Failed(e.user_message()),
                    };
                }
                ClientEvent::Log(line) => {
                    if self.logs.len() == MAX_LOG_LINES {
                        self.logs.pop_front();
                    }
                    self.logs.push_back(line);
                }
            }
        }
    }

    fn make_predictions(&mut self) {
        let submitted = self
            .form
            .to_request()
            .and_then(|request| self.client.submit(request));

        match submitted {
            Ok(()) => info!("Prediction requested for {}", self.form.symbol.trim()),
            Err(e) => self.view = ViewState::Failed(e.user_message()),
        }
    }

    fn render_settings(&mut self, ui: &mut egui::Ui) {
        ui.heading("Settings");
        ui.separator();
        ui.add_space(DesignSystem::SPACING_SMALL);

        egui::Grid::new("settings_grid")
            .num_columns(2)
            .spacing([10.0, 10.0])
            .show(ui, |ui| {
                ui.label("Start Date");
                ui.add(egui::TextEdit::singleline(&mut self.form.start).hint_text("YYYY-MM-DD"));
                ui.end_row();

                ui.label("End Date");
                ui.add(egui::TextEdit::singleline(&mut self.form.end).hint_text("YYYY-MM-DD"));
                ui.end_row();

                ui.label("Number of Future Predictions");
                ui.add(egui::DragValue::new(&mut self.form.horizon).range(1..=self.max_horizon));
                ui.end_row();

                ui.label("Stock Symbol");
                ui.add(egui::TextEdit::singleline(&mut self.form.symbol));
                ui.end_row();
            });

        ui.add_space(DesignSystem::SPACING_MEDIUM);

        let busy = self.client.is_busy();
        ui.horizontal(|ui| {
            if ui
                .add_enabled(!busy, egui::Button::new("Make Predictions"))
                .clicked()
            {
                self.make_predictions();
            }
            if busy {
                ui.spinner();
            }
        });

        ui.add_space(DesignSystem::SPACING_MEDIUM);
        ui.label(
            egui::RichText::new(format!(
                "Source: {} | Model: {}",
                self.client.service().source_name(),
                self.client.service().model_name()
            ))
            .size(11.0)
            .color(DesignSystem::TEXT_MUTED),
        );
    }

    fn render_logs(&self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new("Logs").strong());
        egui::ScrollArea::vertical()
            .id_salt("log_scroll")
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for line in &self.logs {
                    let color = if line.contains("ERROR") {
                        DesignSystem::DANGER
                    } else if line.contains("WARN") {
                        DesignSystem::WARNING
                    } else {
                        DesignSystem::TEXT_SECONDARY
                    };
                    ui.label(egui::RichText::new(line).monospace().size(11.0).color(color));
                }
            });
    }

    fn render_results(&self, ui: &mut egui::Ui) {
        match &self.view {
            ViewState::Idle => {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        egui::RichText::new("Choose a range and press \"Make Predictions\"")
                            .color(DesignSystem::TEXT_MUTED),
                    );
                });
            }
            ViewState::Failed(message) => {
                DesignSystem::error_frame().show(ui, |ui| {
                    ui.label(egui::RichText::new(message).color(DesignSystem::DANGER));
                });
            }
            ViewState::Ready(vm) => {
                egui::ScrollArea::vertical()
                    .id_salt("results_scroll")
                    .show(ui, |ui| {
                        ui.heading(format!("{} Stock Price Prediction", vm.symbol));
                        ui.add_space(DesignSystem::SPACING_SMALL);

                        ui.columns(2, |cols| {
                            tables::render_price_table(
                                &mut cols[0],
                                "history_table",
                                "Historical Stock Data",
                                "Close",
                                &vm.history_rows,
                                240.0,
                            );
                            tables::render_price_table(
                                &mut cols[1],
                                "forecast_table",
                                "Future Predictions",
                                "Predicted Close",
                                &vm.forecast_rows,
                                240.0,
                            );
                        });

                        ui.add_space(DesignSystem::SPACING_SMALL);
                        metrics::render_holdout_card(ui, vm.holdout.as_ref(), &vm.model_name);

                        ui.add_space(DesignSystem::SPACING_MEDIUM);
                        let height = ui.available_height() - 20.0;
                        charts::render_forecast_chart(ui, vm, height);
                    });
            }
        }
    }
}

impl eframe::App for ForecastDashboard {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(DesignSystem::theme());

        self.drain_events();

        egui::SidePanel::left("settings_panel")
            .default_width(300.0)
            .min_width(260.0)
            .resizable(true)
            .show(ctx, |ui| self.render_settings(ui));

        egui::TopBottomPanel::bottom("log_panel")
            .default_height(140.0)
            .resizable(true)
            .show(ctx, |ui| self.render_logs(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.render_results(ui));

        // Keep polling the background task and log channel
        let interval = if self.client.is_busy() { 50 } else { 250 };
        ctx.request_repaint_after(Duration::from_millis(interval));
    }
}
