//! Risk tier classification.
//!
//! Maps an averaged prediction probability onto one of five severity buckets.

use serde::{Deserialize, Serialize};

/// Discrete cardiovascular risk tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    /// Below 0.2
    VeryLow,
    /// 0.2 up to 0.4
    Low,
    /// 0.4 up to 0.6
    Moderate,
    /// 0.6 up to 0.8
    High,
    /// 0.8 and above
    VeryHigh,
}

/// Severity color associated with a tier.
///
/// Kept abstract so the domain does not depend on the terminal palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Green,
    Blue,
    Yellow,
    Orange,
    Red,
}

impl RiskTier {
    /// All tiers, lowest first.
    pub const ALL: [RiskTier; 5] = [
        RiskTier::VeryLow,
        RiskTier::Low,
        RiskTier::Moderate,
        RiskTier::High,
        RiskTier::VeryHigh,
    ];

    /// Classify a probability. Boundary values belong to the higher bucket.
    #[must_use]
    pub fn from_probability(probability: f64) -> Self {
        if probability >= 0.8 {
            Self::VeryHigh
        } else if probability >= 0.6 {
            Self::High
        } else if probability >= 0.4 {
            Self::Moderate
        } else if probability >= 0.2 {
            Self::Low
        } else {
            Self::VeryLow
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::VeryLow => "Very Low",
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }

    /// Advisory text shown under the headline figure.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::VeryLow => "Excellent cardiovascular health",
            Self::Low => "Continue current healthy practices",
            Self::Moderate => "Monitor regularly and maintain healthy lifestyle",
            Self::High => "Consult with a healthcare professional soon",
            Self::VeryHigh => "Immediate medical attention recommended",
        }
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::VeryLow => Severity::Green,
            Self::Low => Severity::Blue,
            Self::Moderate => Severity::Yellow,
            Self::High => Severity::Orange,
            Self::VeryHigh => Severity::Red,
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Convenience wrapper around [`RiskTier::from_probability`].
#[must_use]
pub fn risk_tier(probability: f64) -> RiskTier {
    RiskTier::from_probability(probability)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(risk_tier(0.0), RiskTier::VeryLow);
        assert_eq!(risk_tier(0.199), RiskTier::VeryLow);
        assert_eq!(risk_tier(0.2), RiskTier::Low);
        assert_eq!(risk_tier(0.399), RiskTier::Low);
        assert_eq!(risk_tier(0.4), RiskTier::Moderate);
        assert_eq!(risk_tier(0.6), RiskTier::High);
        assert_eq!(risk_tier(0.8), RiskTier::VeryHigh);
        assert_eq!(risk_tier(1.0), RiskTier::VeryHigh);
    }

    #[test]
    fn test_tier_presentation() {
        assert_eq!(RiskTier::VeryHigh.to_string(), "Very High");
        assert_eq!(RiskTier::VeryHigh.severity(), Severity::Red);
        assert_eq!(RiskTier::VeryLow.severity(), Severity::Green);
        assert_eq!(
            RiskTier::Moderate.advice(),
            "Monitor regularly and maintain healthy lifestyle"
        );
    }

    #[test]
    fn test_tiers_are_monotonic() {
        let mut last = RiskTier::VeryLow;
        for step in 0..=100 {
            let tier = risk_tier(f64::from(step) / 100.0);
            let idx = RiskTier::ALL.iter().position(|t| *t == tier);
            let last_idx = RiskTier::ALL.iter().position(|t| *t == last);
            assert!(idx >= last_idx);
            last = tier;
        }
    }
}
