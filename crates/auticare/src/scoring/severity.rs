use serde::{Deserialize, Serialize};

/// Four ordered screening tiers shared by scoring, reporting, and storage.
///
/// Boundaries are half-open on the upper side:
///
/// | tier       | score range |
/// |------------|-------------|
/// | `low`      | `[0, 25)`   |
/// | `mild`     | `[25, 45)`  |
/// | `moderate` | `[45, 65)`  |
/// | `high`     | `[65, 100]` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Mild,
    Moderate,
    High,
}

pub const MILD_THRESHOLD: f64 = 25.0;
pub const MODERATE_THRESHOLD: f64 = 45.0;
pub const HIGH_THRESHOLD: f64 = 65.0;

impl Severity {
    pub const fn ordered() -> [Self; 4] {
        [Self::Low, Self::Mild, Self::Moderate, Self::High]
    }

    /// Maps an authoritative score onto its tier. Callers validate the range first.
    pub fn from_score(score: f64) -> Self {
        if score >= HIGH_THRESHOLD {
            Self::High
        } else if score >= MODERATE_THRESHOLD {
            Self::Moderate
        } else if score >= MILD_THRESHOLD {
            Self::Mild
        } else {
            Self::Low
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Mild => "mild",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Mild => "Mild",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }

    pub const fn guidance(self) -> &'static str {
        match self {
            Self::Low => "Few indicators observed. Continue routine developmental monitoring.",
            Self::Mild => {
                "Some indicators observed. Discuss the results at the next routine check-up."
            }
            Self::Moderate => {
                "Several indicators observed. Consider scheduling a developmental evaluation."
            }
            Self::High => {
                "Many indicators observed. A comprehensive evaluation by a specialist is recommended."
            }
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_belong_to_upper_tier() {
        assert_eq!(Severity::from_score(0.0), Severity::Low);
        assert_eq!(Severity::from_score(24.9), Severity::Low);
        assert_eq!(Severity::from_score(25.0), Severity::Mild);
        assert_eq!(Severity::from_score(44.9), Severity::Mild);
        assert_eq!(Severity::from_score(45.0), Severity::Moderate);
        assert_eq!(Severity::from_score(64.9), Severity::Moderate);
        assert_eq!(Severity::from_score(65.0), Severity::High);
        assert_eq!(Severity::from_score(100.0), Severity::High);
    }

    #[test]
    fn tiers_are_ordered() {
        let ordered = Severity::ordered();
        assert!(ordered.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn serializes_as_snake_case_tag() {
        let value = serde_json::to_value(Severity::Moderate).expect("serializes");
        assert_eq!(value, serde_json::json!("moderate"));
        assert_eq!(Severity::Moderate.to_string(), "moderate");
    }
}
