//! Conversion of nominal annual rates into effective monthly growth rates

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;

/// How often a nominal annual rate compounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompoundingFrequency {
    Daily,
    Monthly,
    Quarterly,
    Annually,
}

impl CompoundingFrequency {
    /// All frequencies in the order offered to users
    pub const ALL: [CompoundingFrequency; 4] = [
        CompoundingFrequency::Monthly,
        CompoundingFrequency::Quarterly,
        CompoundingFrequency::Annually,
        CompoundingFrequency::Daily,
    ];

    /// Number of compounding periods per year
    pub fn periods_per_year(self) -> u32 {
        match self {
            CompoundingFrequency::Daily => 365,
            CompoundingFrequency::Monthly => 12,
            CompoundingFrequency::Quarterly => 4,
            CompoundingFrequency::Annually => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CompoundingFrequency::Daily => "Daily",
            CompoundingFrequency::Monthly => "Monthly",
            CompoundingFrequency::Quarterly => "Quarterly",
            CompoundingFrequency::Annually => "Annually",
        }
    }

    /// Effective monthly rate for a nominal annual rate at this frequency
    pub fn monthly_rate(self, annual_rate: f64) -> f64 {
        monthly_rate(annual_rate, self.periods_per_year())
    }
}

impl fmt::Display for CompoundingFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CompoundingFrequency {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Daily" => Ok(CompoundingFrequency::Daily),
            "Monthly" => Ok(CompoundingFrequency::Monthly),
            "Quarterly" => Ok(CompoundingFrequency::Quarterly),
            "Annually" => Ok(CompoundingFrequency::Annually),
            other => Err(ProjectionError::UnknownCompounding(other.to_string())),
        }
    }
}

/// Map a frequency label to its periods per year.
///
/// Unrecognized labels map to 0, which `monthly_rate` turns into a zero rate.
/// Loaders go through `CompoundingFrequency::from_str` instead so that bad
/// labels are rejected before they reach the engine.
pub fn compounding_periods(label: &str) -> u32 {
    label
        .parse::<CompoundingFrequency>()
        .map(CompoundingFrequency::periods_per_year)
        .unwrap_or(0)
}

/// Effective monthly rate from a nominal annual rate compounded `periods_per_year` times.
///
/// effective_annual = (1 + r/n)^n - 1
/// monthly = (1 + effective_annual)^(1/12) - 1
///
/// Returns 0.0 when either the rate or the frequency is zero.
pub fn monthly_rate(annual_rate: f64, periods_per_year: u32) -> f64 {
    if periods_per_year == 0 || annual_rate == 0.0 {
        return 0.0;
    }

    let n = periods_per_year as f64;
    let effective_annual = (1.0 + annual_rate / n).powf(n) - 1.0;

    (1.0 + effective_annual).powf(1.0 / 12.0) - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_guards() {
        for freq in CompoundingFrequency::ALL {
            assert_eq!(freq.monthly_rate(0.0), 0.0);
        }
        assert_eq!(monthly_rate(0.07, 0), 0.0);
        assert_eq!(monthly_rate(0.0, 0), 0.0);
    }

    #[test]
    fn test_monthly_compounding_is_nominal_over_twelve() {
        // (1 + r/12)^12 then back to a month gives r/12 exactly
        assert_relative_eq!(monthly_rate(0.06, 12), 0.005, epsilon = 1e-12);
    }

    #[test]
    fn test_annual_compounding() {
        let expected = 1.07_f64.powf(1.0 / 12.0) - 1.0;
        assert_relative_eq!(monthly_rate(0.07, 1), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_quarterly_matches_effective_annual() {
        let monthly = CompoundingFrequency::Quarterly.monthly_rate(0.07);
        let effective = (1.0 + 0.07 / 4.0_f64).powi(4) - 1.0;
        assert_relative_eq!((1.0 + monthly).powi(12) - 1.0, effective, epsilon = 1e-12);
    }

    #[test]
    fn test_more_frequent_compounding_grows_faster() {
        let rates: Vec<f64> = [1, 4, 12, 365].iter().map(|&n| monthly_rate(0.083, n)).collect();
        assert!(rates.windows(2).all(|w| w[0] < w[1]), "rates: {:?}", rates);
    }

    #[test]
    fn test_monotonic_in_annual_rate() {
        for freq in CompoundingFrequency::ALL {
            let mut prev = monthly_rate(-0.5, freq.periods_per_year());
            for step in 1..=100 {
                let r = -0.5 + step as f64 * 0.01;
                let current = monthly_rate(r, freq.periods_per_year());
                assert!(current > prev, "{} not increasing at {}", freq, r);
                prev = current;
            }
        }
    }

    #[test]
    fn test_label_mapping() {
        assert_eq!(compounding_periods("Daily"), 365);
        assert_eq!(compounding_periods("Monthly"), 12);
        assert_eq!(compounding_periods("Quarterly"), 4);
        assert_eq!(compounding_periods("Annually"), 1);
        assert_eq!(compounding_periods("Fortnightly"), 0);
    }

    #[test]
    fn test_parse_rejects_unknown_label() {
        assert_eq!("Quarterly".parse::<CompoundingFrequency>().unwrap(), CompoundingFrequency::Quarterly);
        let err = "Weekly".parse::<CompoundingFrequency>().unwrap_err();
        assert!(matches!(err, ProjectionError::UnknownCompounding(ref label) if label == "Weekly"));
    }
}
