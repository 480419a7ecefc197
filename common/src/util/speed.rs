pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Replaces infinities (and NaN) that come out of a division by zero with a
/// missing value. A missing value means "no data", never "zero".
pub fn finite(value: f64) -> Option<f64> {
    if value.is_finite() { Some(value) } else { None }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Speed(pub f64); // in mph

impl Speed {
    /// Average speed over `miles` covered in `runtime_secs`. Missing when no time elapsed.
    pub fn from_run(miles: f64, runtime_secs: f64) -> Option<Speed> {
        finite(miles / (runtime_secs / SECONDS_PER_HOUR)).map(Speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_from_run() {
        assert_eq!(Speed::from_run(1.0, 3600.0), Some(Speed(1.0)));
        assert_eq!(Speed::from_run(10.0, 1800.0), Some(Speed(20.0)));
    }

    #[test]
    fn test_zero_runtime_is_missing() {
        assert_eq!(Speed::from_run(0.3, 0.0), None);
        assert_eq!(Speed::from_run(0.0, 0.0), None);
    }

    #[test]
    fn test_finite() {
        assert_eq!(finite(2.5), Some(2.5));
        assert_eq!(finite(f64::INFINITY), None);
        assert_eq!(finite(f64::NEG_INFINITY), None);
        assert_eq!(finite(f64::NAN), None);
    }
}
