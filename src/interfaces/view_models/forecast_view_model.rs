use crate::config::DashboardEnvConfig;
use crate::domain::errors::ForecastError;
use crate::domain::forecast::{ForecastReport, ForecastRequest, HoldoutEvaluation};
use chrono::{Datelike, NaiveDate};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Editable state of the "Settings" sidebar.
///
/// Dates are kept as text so a half-typed value never blocks the frame; they
/// are parsed only when the user asks for a forecast.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsForm {
    pub start: String,
    pub end: String,
    pub horizon: usize,
    pub symbol: String,
}

impl SettingsForm {
    pub fn from_config(config: &DashboardEnvConfig) -> Self {
        Self {
            start: config.default_start.format(DATE_FORMAT).to_string(),
            end: config.default_end.format(DATE_FORMAT).to_string(),
            horizon: config.default_horizon,
            symbol: config.default_symbol.clone(),
        }
    }

    pub fn to_request(&self) -> Result<ForecastRequest, ForecastError> {
        let start = parse_date("start date", &self.start)?;
        let end = parse_date("end date", &self.end)?;
        Ok(ForecastRequest::new(
            self.symbol.as_str(),
            start,
            end,
            self.horizon,
        ))
    }
}

fn parse_date(field: &str, text: &str) -> Result<NaiveDate, ForecastError> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).map_err(|_| {
        ForecastError::invalid(format!(
            "{} '{}' is not a valid YYYY-MM-DD date",
            field,
            text.trim()
        ))
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub date: String,
    pub price: String,
}

/// Display-ready projection of a `ForecastReport`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastViewModel {
    pub symbol: String,
    pub model_name: String,
    pub history_rows: Vec<TableRow>,
    pub forecast_rows: Vec<TableRow>,
    /// `[day, close]` pairs; x is days since the common era
    pub history_points: Vec<[f64; 2]>,
    pub forecast_points: Vec<[f64; 2]>,
    pub holdout: Option<HoldoutEvaluation>,
}

impl ForecastViewModel {
    pub fn from_report(report: &ForecastReport) -> Self {
        let history = report.history.points();

        // The dashed forecast line starts at the last observation so both
        // lines join on the chart.
        let mut forecast_points: Vec<[f64; 2]> = history
            .last()
            .map(|p| vec![[day_axis(p.date), p.close]])
            .unwrap_or_default();
        forecast_points.extend(
            report
                .forecast
                .points
                .iter()
                .map(|p| [day_axis(p.date), p.price]),
        );

        Self {
            symbol: report.request.symbol.clone(),
            model_name: report.model_name.clone(),
            history_rows: history
                .iter()
                .map(|p| TableRow {
                    date: p.date.format(DATE_FORMAT).to_string(),
                    price: format!("{:.2}", p.close),
                })
                .collect(),
            forecast_rows: report
                .forecast
                .points
                .iter()
                .map(|p| TableRow {
                    date: p.date.format(DATE_FORMAT).to_string(),
                    price: format!("{:.2}", p.price),
                })
                .collect(),
            history_points: history
                .iter()
                .map(|p| [day_axis(p.date), p.close])
                .collect(),
            forecast_points,
            holdout: report.holdout,
        }
    }
}

pub fn day_axis(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

/// Inverse of `day_axis`, used for tick labels.
pub fn axis_label(value: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(value.round() as i32)
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::forecast::{Forecast, ForecastRequest};
    use crate::domain::market::{PricePoint, PriceSeries};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn report() -> ForecastReport {
        let history = PriceSeries::new(
            "AAPL",
            vec![
                PricePoint {
                    date: date(2023, 11, 2),
                    close: 177.57,
                },
                PricePoint {
                    date: date(2023, 11, 3),
                    close: 176.65,
                },
            ],
        )
        .unwrap();
        let forecast = Forecast::from_parts(
            vec![date(2023, 11, 4), date(2023, 11, 5)],
            vec![176.9, 177.123],
        )
        .unwrap();

        ForecastReport {
            request: ForecastRequest::new("aapl", date(2023, 1, 1), date(2023, 11, 4), 2),
            history,
            forecast,
            holdout: None,
            model_name: "test".to_string(),
        }
    }

    #[test]
    fn test_rows_and_points() {
        let vm = ForecastViewModel::from_report(&report());

        assert_eq!(vm.symbol, "AAPL");
        assert_eq!(vm.history_rows.len(), 2);
        assert_eq!(vm.history_rows[1].date, "2023-11-03");
        assert_eq!(vm.forecast_rows[1].price, "177.12");

        // Forecast line is anchored on the last observation
        assert_eq!(vm.forecast_points.len(), 3);
        assert_eq!(vm.forecast_points[0], vm.history_points[1]);
        assert_eq!(
            vm.forecast_points[1][0] - vm.history_points[1][0],
            1.0
        );
    }

    #[test]
    fn test_axis_label_inverts_day_axis() {
        let d = date(2023, 11, 3);
        assert_eq!(axis_label(day_axis(d)), "2023-11-03");
    }

    #[test]
    fn test_form_defaults_and_parse() {
        let form = SettingsForm::from_config(&DashboardEnvConfig::default());
        assert_eq!(form.start, "2022-09-01");
        assert_eq!(form.end, "2023-11-03");
        assert_eq!(form.horizon, 5);

        let request = form.to_request().unwrap();
        assert_eq!(request.symbol, "AAPL");
        assert_eq!(request.end, date(2023, 11, 3));
    }

    #[test]
    fn test_form_rejects_bad_date() {
        let mut form = SettingsForm::from_config(&DashboardEnvConfig::default());
        form.start = "09/01/2022".to_string();

        assert!(matches!(
            form.to_request(),
            Err(ForecastError::InvalidArgument { .. })
        ));
    }
}
