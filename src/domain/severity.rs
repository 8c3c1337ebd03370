use serde::Serialize;
use std::collections::BTreeMap;

/// DNS issue severity, keyed by octal level `0o1..=0o7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DnsSeverity {
    Informational,
    Low,
    Medium,
    High,
    Critical,
    Severe,
    Catastrophic,
}

impl DnsSeverity {
    pub const ALL: [DnsSeverity; 7] = [
        DnsSeverity::Informational,
        DnsSeverity::Low,
        DnsSeverity::Medium,
        DnsSeverity::High,
        DnsSeverity::Critical,
        DnsSeverity::Severe,
        DnsSeverity::Catastrophic,
    ];

    pub fn from_octal(level: u8) -> Option<Self> {
        match level {
            0o1..=0o7 => Some(Self::ALL[usize::from(level - 1)]),
            _ => None,
        }
    }

    pub fn octal(self) -> u8 {
        self as u8 + 1
    }

    pub fn label(self) -> &'static str {
        match self {
            DnsSeverity::Informational => "Informational",
            DnsSeverity::Low => "Low",
            DnsSeverity::Medium => "Medium",
            DnsSeverity::High => "High",
            DnsSeverity::Critical => "Critical",
            DnsSeverity::Severe => "Severe",
            DnsSeverity::Catastrophic => "Catastrophic",
        }
    }
}

pub fn dns_severity_table() -> BTreeMap<u8, &'static str> {
    DnsSeverity::ALL
        .iter()
        .map(|s| (s.octal(), s.label()))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OctalAxes {
    pub y_oct: Vec<u8>,
    pub x_oct: Vec<u8>,
}

impl Default for OctalAxes {
    fn default() -> Self {
        let levels: Vec<u8> = (0o1..=0o7).collect();
        Self {
            y_oct: levels.clone(),
            x_oct: levels,
        }
    }
}

impl OctalAxes {
    /// Severity labels for the y and x axes; unknown levels are skipped.
    pub fn labels(&self) -> (Vec<&'static str>, Vec<&'static str>) {
        let resolve = |axis: &[u8]| -> Vec<&'static str> {
            axis.iter()
                .filter_map(|&n| DnsSeverity::from_octal(n))
                .map(DnsSeverity::label)
                .collect()
        };
        (resolve(self.y_oct.as_slice()), resolve(self.x_oct.as_slice()))
    }
}
