use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A fixed-length string of decimal digits derived from a seed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Code(String);

impl Code {
    /// Caller guarantees every digit is in `0..=9`.
    pub(crate) fn from_digits(digits: &[u8]) -> Self {
        Self(digits.iter().map(|d| char::from(b'0' + d)).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn digits(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.bytes().map(|b| b - b'0')
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Code {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioPlan {
    pub base_unit: f64,
    pub ratios: Vec<f64>,
    pub notes: String,
}

impl RatioPlan {
    /// Every ratio multiplied by the base unit, in generation order.
    pub fn scaled(&self) -> impl Iterator<Item = f64> + '_ {
        self.ratios.iter().map(move |r| self.base_unit * r)
    }

    /// Nearest scaled ratio to `query`. On equal distance the earlier ratio wins.
    ///
    /// `None` when no candidate has a finite distance: a NaN or infinite query,
    /// or a plan without ratios.
    pub fn snap(&self, query: f64) -> Option<f64> {
        let mut best = None;
        let mut best_distance = f64::INFINITY;
        for candidate in self.scaled() {
            let distance = (candidate - query).abs();
            if distance < best_distance {
                best = Some(candidate);
                best_distance = distance;
            }
        }
        best
    }

    pub fn min_ratio(&self) -> f64 {
        self.ratios.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max_ratio(&self) -> f64 {
        self.ratios.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Measured outcome of one Fibonacci pulse circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantumPulse {
    pub counts: BTreeMap<String, u32>,
    pub fibs: Vec<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UsageWindow {
    Low,
    Moderate,
    High,
    Invalid,
}

impl UsageWindow {
    pub fn label(self) -> &'static str {
        match self {
            UsageWindow::Low => "Low usage",
            UsageWindow::Moderate => "Moderate usage",
            UsageWindow::High => "High usage",
            UsageWindow::Invalid => "Invalid hour",
        }
    }
}

impl fmt::Display for UsageWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummary {
    pub name: String,
    pub price_usd: f64,
    pub barcode_fixed: String,
    pub barcode_seeded: Code,
    pub seed: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanSummary {
    pub unit: f64,
    pub ratios: Vec<f64>,
    pub ratios_count: usize,
    pub phi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapSummary {
    pub query: f64,
    pub snapped: f64,
}

/// Everything one node run observed, ready to be printed as JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeReport {
    pub repo_access: bool,
    pub hour: u32,
    pub usage_window: String,
    pub dns_labels: BTreeMap<u8, String>,
    pub y_oct_labels: Vec<String>,
    pub x_oct_labels: Vec<String>,
    pub product: ProductSummary,
    pub ratio_plan: PlanSummary,
    pub snap_example: SnapSummary,
    pub native_result: Option<i32>,
    pub quantum: Option<QuantumPulse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(ratios: Vec<f64>) -> RatioPlan {
        RatioPlan {
            base_unit: 2.0,
            ratios,
            notes: String::new(),
        }
    }

    #[test]
    fn test_code_from_digits() {
        let code = Code::from_digits(&[1, 1, 2, 3, 5, 8]);
        assert_eq!(code.as_str(), "112358");
        assert_eq!(code.len(), 6);
        assert_eq!(code.digits().collect::<Vec<_>>(), vec![1, 1, 2, 3, 5, 8]);
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"112358\"");
    }

    #[test]
    fn test_plan_snap_prefers_first_on_tie() {
        // 2*1.0 = 2.0 and 2*2.0 = 4.0 are both 1.0 away from 3.0
        let plan = plan(vec![1.0, 2.0]);
        assert_eq!(plan.snap(3.0), Some(2.0));
    }

    #[test]
    fn test_plan_snap_without_finite_candidate() {
        assert_eq!(plan(vec![1.0, 2.0]).snap(f64::NAN), None);
        assert_eq!(plan(vec![1.0, 2.0]).snap(f64::INFINITY), None);
        assert_eq!(plan(Vec::new()).snap(3.0), None);
    }

    #[test]
    fn test_plan_bounds() {
        let plan = plan(vec![1.0, 5.0, 0.5]);
        assert_eq!(plan.min_ratio(), 0.5);
        assert_eq!(plan.max_ratio(), 5.0);
        assert_eq!(plan.scaled().collect::<Vec<_>>(), vec![2.0, 10.0, 1.0]);
    }

    #[test]
    fn test_usage_labels() {
        assert_eq!(UsageWindow::Low.to_string(), "Low usage");
        assert_eq!(UsageWindow::Invalid.label(), "Invalid hour");
    }
}
