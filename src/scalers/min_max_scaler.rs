/// Value written for every row of a group whose column has no spread.
pub const DEGENERATE_VALUE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinMaxScaler {
    min: f64,
    max: f64,
}

impl MinMaxScaler {
    /// `data` must be non-empty and finite; the table layer guarantees both.
    pub fn new(data: &[f64]) -> Self {
        let min = data.iter().copied().fold(f64::INFINITY, f64::min);
        let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        MinMaxScaler { min, max }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn is_degenerate(&self) -> bool {
        self.max == self.min
    }

    pub fn transform(&self, value: f64) -> f64 {
        if self.is_degenerate() {
            return DEGENERATE_VALUE;
        }
        let span = self.max - self.min;
        if !span.is_finite() {
            // halves keep the difference of two finite values finite
            return (value / 2.0 - self.min / 2.0) / (self.max / 2.0 - self.min / 2.0);
        }
        (value - self.min) / span
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_map_to_zero_and_one() {
        let scaler = MinMaxScaler::new(&[10.0, 30.0, 20.0]);
        assert_eq!(scaler.transform(10.0), 0.0);
        assert_eq!(scaler.transform(30.0), 1.0);
        assert_eq!(scaler.transform(20.0), 0.5);
    }

    #[test]
    fn test_constant_data_is_midpoint() {
        let scaler = MinMaxScaler::new(&[7.0, 7.0, 7.0]);
        assert!(scaler.is_degenerate());
        assert_eq!(scaler.transform(7.0), DEGENERATE_VALUE);
    }

    #[test]
    fn test_single_value_is_midpoint() {
        let scaler = MinMaxScaler::new(&[-3.25]);
        assert_eq!(scaler.min(), -3.25);
        assert_eq!(scaler.max(), -3.25);
        assert_eq!(scaler.transform(-3.25), 0.5);
    }

    #[test]
    fn test_range_wider_than_f64_stays_in_bounds() {
        let scaler = MinMaxScaler::new(&[-1e308, 0.0, 1e308]);
        assert_eq!(scaler.transform(-1e308), 0.0);
        assert_eq!(scaler.transform(0.0), 0.5);
        assert_eq!(scaler.transform(1e308), 1.0);
    }

    #[test]
    fn test_negative_range() {
        let scaler = MinMaxScaler::new(&[-20.0, -10.0]);
        assert_eq!(scaler.transform(-20.0), 0.0);
        assert_eq!(scaler.transform(-10.0), 1.0);
        assert_eq!(scaler.transform(-15.0), 0.5);
    }
}
