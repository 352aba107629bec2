use serde::{Deserialize, Serialize};

/// Whether a range endpoint belongs to the range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundType {
    /// Endpoint is included
    Closed,
    /// Endpoint is excluded
    Open,
}

impl BoundType {
    /// The bound type a touching neighbor must use so the two ranges neither
    /// overlap nor leave a gap
    pub fn complement(self) -> Self {
        match self {
            BoundType::Closed => BoundType::Open,
            BoundType::Open => BoundType::Closed,
        }
    }
}

/// An m/z interval with independently open or closed endpoints
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MzRange {
    /// Lower endpoint
    pub lower: f64,
    /// Whether the lower endpoint is included
    pub lower_bound: BoundType,
    /// Upper endpoint
    pub upper: f64,
    /// Whether the upper endpoint is included
    pub upper_bound: BoundType,
}

impl MzRange {
    /// Create a range with explicit bound types
    pub fn new(lower: f64, lower_bound: BoundType, upper: f64, upper_bound: BoundType) -> Self {
        Self {
            lower,
            lower_bound,
            upper,
            upper_bound,
        }
    }

    /// `[lower, upper]`
    pub fn closed(lower: f64, upper: f64) -> Self {
        Self::new(lower, BoundType::Closed, upper, BoundType::Closed)
    }

    /// `(lower, upper)`
    pub fn open(lower: f64, upper: f64) -> Self {
        Self::new(lower, BoundType::Open, upper, BoundType::Open)
    }

    /// `(lower, upper]`
    pub fn open_closed(lower: f64, upper: f64) -> Self {
        Self::new(lower, BoundType::Open, upper, BoundType::Closed)
    }

    /// `[lower, upper)`
    pub fn closed_open(lower: f64, upper: f64) -> Self {
        Self::new(lower, BoundType::Closed, upper, BoundType::Open)
    }

    /// True if `value` lies inside the range
    pub fn contains(&self, value: f64) -> bool {
        let above_lower = match self.lower_bound {
            BoundType::Closed => value >= self.lower,
            BoundType::Open => value > self.lower,
        };
        let below_upper = match self.upper_bound {
            BoundType::Closed => value <= self.upper,
            BoundType::Open => value < self.upper,
        };
        above_lower && below_upper
    }

    /// True if no value can lie inside the range
    pub fn is_empty(&self) -> bool {
        if self.lower > self.upper {
            return true;
        }
        self.lower == self.upper
            && (self.lower_bound == BoundType::Open || self.upper_bound == BoundType::Open)
    }

    /// True if every value of the range is strictly less than `value`
    pub fn is_below(&self, value: f64) -> bool {
        match self.upper_bound {
            BoundType::Closed => self.upper < value,
            BoundType::Open => self.upper <= value,
        }
    }

    /// True if every value of the range is strictly greater than `value`
    pub fn is_above(&self, value: f64) -> bool {
        match self.lower_bound {
            BoundType::Closed => self.lower > value,
            BoundType::Open => self.lower >= value,
        }
    }

    /// True if at least one value lies in both ranges
    pub fn overlaps(&self, other: &MzRange) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        !(Self::ends_before(self, other) || Self::ends_before(other, self))
    }

    fn ends_before(a: &MzRange, b: &MzRange) -> bool {
        a.upper < b.lower
            || (a.upper == b.lower
                && (a.upper_bound == BoundType::Open || b.lower_bound == BoundType::Open))
    }
}
