use std::iter::Sum;
use std::ops::Add;

/// Meters per statute mile, truncated the way the agency's reports round it
pub const METERS_PER_MILE: f64 = 1609.0;

/// Distance in meters
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Distance(pub f64);

impl Distance {
    pub const ZERO: Distance = Distance(0.0);

    pub fn meters(&self) -> f64 {
        self.0
    }

    pub fn miles(&self) -> f64 {
        self.0 / METERS_PER_MILE
    }
}

impl Add for Distance {
    type Output = Distance;

    fn add(self, rhs: Self) -> Self::Output {
        Distance(self.0 + rhs.0)
    }
}

impl Sum for Distance {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Distance::ZERO, Add::add)
    }
}
