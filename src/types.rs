use std::cmp::Ordering;

use derive_more::{Constructor, Deref};
use serde::Serialize;
use serde_json::Number;

/// A millisecond quantity exactly as it appeared in the log: integers stay
/// integers and floats stay floats when written back out.
#[derive(Debug, Clone, PartialEq, Constructor, Deref, Serialize)]
#[serde(transparent)]
pub struct Millis(Number);

impl Millis {
    pub fn as_f64(&self) -> f64 {
        self.0.as_f64().unwrap_or(f64::NAN)
    }

    /// Total order over mixed integer and float values. Integers are
    /// compared exactly whenever both sides fit the same integer type.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        if let (Some(a), Some(b)) = (self.0.as_i64(), other.0.as_i64()) {
            return a.cmp(&b);
        }
        if let (Some(a), Some(b)) = (self.0.as_u64(), other.0.as_u64()) {
            return a.cmp(&b);
        }
        self.as_f64().total_cmp(&other.as_f64())
    }
}

impl From<i64> for Millis {
    fn from(value: i64) -> Self {
        Self(Number::from(value))
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use serde_json::Number;

    use super::Millis;

    fn float(v: f64) -> Millis {
        Millis::new(Number::from_f64(v).unwrap())
    }

    #[test]
    fn integers_compare_exactly() {
        assert_eq!(Millis::from(100i64).total_cmp(&Millis::from(200i64)), Ordering::Less);
        assert_eq!(Millis::from(7i64).total_cmp(&Millis::from(7i64)), Ordering::Equal);
    }

    #[test]
    fn mixed_values_compare_numerically() {
        assert_eq!(float(99.5).total_cmp(&Millis::from(100i64)), Ordering::Less);
        assert_eq!(Millis::from(101i64).total_cmp(&float(100.9)), Ordering::Greater);

        let huge = Millis::new(Number::from(u64::MAX));
        assert_eq!(huge.total_cmp(&Millis::from(-1i64)), Ordering::Greater);
    }

    #[test]
    fn large_unsigned_values_compare_exactly() {
        let max = Millis::new(Number::from(u64::MAX));
        let below = Millis::new(Number::from(u64::MAX - 1));
        assert_eq!(below.total_cmp(&max), Ordering::Less);
        assert_eq!(max.total_cmp(&below), Ordering::Greater);
        assert_eq!(max.total_cmp(&max.clone()), Ordering::Equal);
    }
}
