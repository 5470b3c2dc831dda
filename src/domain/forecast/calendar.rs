use chrono::NaiveDate;

/// The `n` consecutive calendar days following `last`.
///
/// Weekends and holidays are not skipped.
pub fn future_dates(last: NaiveDate, n: usize) -> Vec<NaiveDate> {
    last.iter_days().skip(1).take(n).collect()
}
