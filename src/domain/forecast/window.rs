use crate::domain::errors::ForecastError;

/// Length of the input vector the predictor is trained on.
pub const WINDOW_SIZE: usize = 60;

fn check_length(len: usize, window_size: usize) -> Result<(), ForecastError> {
    if window_size == 0 {
        return Err(ForecastError::invalid("window size must be at least 1"));
    }
    if len <= window_size {
        return Err(ForecastError::InsufficientData {
            required: window_size + 1,
            available: len,
        });
    }
    Ok(())
}

/// All overlapping windows `scaled[i..i + window_size]` for `i` in `0..len - window_size`.
///
/// Each window is followed by at least one observed value, so window `i`
/// pairs with target `scaled[i + window_size]`.
pub fn make_windows(scaled: &[f64], window_size: usize) -> Result<Vec<&[f64]>, ForecastError> {
    check_length(scaled.len(), window_size)?;

    Ok(scaled
        .windows(window_size)
        .take(scaled.len() - window_size)
        .collect())
}

/// The final `window_size` values of `scaled`, used to seed a rollout.
pub fn last_window(scaled: &[f64], window_size: usize) -> Result<&[f64], ForecastError> {
    check_length(scaled.len(), window_size)?;

    Ok(&scaled[scaled.len() - window_size..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_count() {
        let series: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let windows = make_windows(&series, WINDOW_SIZE).unwrap();

        assert_eq!(windows.len(), 100 - WINDOW_SIZE);
        assert!(windows.iter().all(|w| w.len() == WINDOW_SIZE));
        assert_eq!(windows[0][0], 0.0);
        assert_eq!(windows[39][59], 98.0);
    }

    #[test]
    fn test_windows_are_contiguous_slices() {
        let series = [0.1, 0.2, 0.3, 0.4, 0.5];
        let windows = make_windows(&series, 2).unwrap();

        assert_eq!(windows.len(), 3);
        assert_eq!(windows[0], [0.1, 0.2]);
        assert_eq!(windows[1], [0.2, 0.3]);
        assert_eq!(windows[2], [0.3, 0.4]);
    }

    #[test]
    fn test_series_not_longer_than_window() {
        let series = vec![0.0; WINDOW_SIZE];

        assert_eq!(
            make_windows(&series, WINDOW_SIZE),
            Err(ForecastError::InsufficientData {
                required: 61,
                available: 60
            })
        );
        assert!(last_window(&series, WINDOW_SIZE).is_err());
    }

    #[test]
    fn test_last_window_is_tail() {
        let series = [0.0, 0.25, 0.5, 0.75, 1.0];
        assert_eq!(last_window(&series, 2).unwrap(), &[0.75, 1.0]);
    }

    #[test]
    fn test_zero_window_rejected() {
        assert!(matches!(
            make_windows(&[1.0, 2.0], 0),
            Err(ForecastError::InvalidArgument { .. })
        ));
    }
}
