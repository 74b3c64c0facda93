//! Material conditions and the two condition models.
//!
//! The rules engine never looks at a condition directly. It asks a
//! [`ConditionModel`] whether a good-or-excellent gate is satisfied and how
//! much weight that outcome carries:
//!
//! - [`SampledCondition`]: the Monte Carlo view, reporting the condition the
//!   state actually rolled.
//! - [`ExpectedCondition`]: the expected-value view, which always lets gated
//!   actions through and scales them by a tracked probability instead.

use std::fmt;

/// Per-turn material condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Condition {
    #[default]
    Normal,
    Good,
    Excellent,
    Poor,
}

impl Condition {
    /// Returns `true` for good or excellent.
    pub fn is_good_or_excellent(self) -> bool {
        matches!(self, Condition::Good | Condition::Excellent)
    }

    /// Quality gain factor under this condition.
    pub fn quality_factor(self) -> f64 {
        match self {
            Condition::Normal => 1.0,
            Condition::Good => 1.5,
            Condition::Excellent => 4.0,
            Condition::Poor => 0.5,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Condition::Normal => "Normal",
            Condition::Good => "Good",
            Condition::Excellent => "Excellent",
            Condition::Poor => "Poor",
        };
        f.write_str(s)
    }
}

/// Capability pair the rules engine uses to resolve condition gates.
pub trait ConditionModel {
    /// Whether a good-or-excellent requirement is satisfied.
    fn check_good_or_excellent(&self) -> bool;

    /// Weight applied to gains that depend on a good-or-excellent condition.
    fn probability_weight(&self) -> f64;
}

/// Condition model backed by a sampled condition.
#[derive(Debug, Clone, Copy)]
pub struct SampledCondition {
    pub condition: Condition,
    /// When conditions are not modeled every gate is treated as satisfied.
    pub use_conditions: bool,
}

impl ConditionModel for SampledCondition {
    fn check_good_or_excellent(&self) -> bool {
        !self.use_conditions || self.condition.is_good_or_excellent()
    }

    fn probability_weight(&self) -> f64 {
        1.0
    }
}

/// Condition model backed by a probability weight.
#[derive(Debug, Clone, Copy)]
pub struct ExpectedCondition {
    pub p_good_or_excellent: f64,
}

impl ConditionModel for ExpectedCondition {
    fn check_good_or_excellent(&self) -> bool {
        true
    }

    fn probability_weight(&self) -> f64 {
        self.p_good_or_excellent
    }
}

/// Discrete probability distribution over the four conditions, advanced by
/// the expected-value simulator in place of sampling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConditionDistribution {
    pub normal: f64,
    pub good: f64,
    pub excellent: f64,
    pub poor: f64,
}

impl Default for ConditionDistribution {
    /// The first step is always normal.
    fn default() -> Self {
        Self {
            normal: 1.0,
            good: 0.0,
            excellent: 0.0,
            poor: 0.0,
        }
    }
}

impl ConditionDistribution {
    /// Probability of a good or excellent condition this turn.
    pub fn good_or_excellent(&self) -> f64 {
        self.good + self.excellent
    }

    /// Expected quality factor this turn.
    ///
    /// Good turns are discounted by the chance that a trick action already
    /// spent them, compounded over the trick budget.
    pub fn quality_factor(&self, p_good: f64, max_trick_uses: u32) -> f64 {
        self.normal
            + 1.5 * self.good * (1.0 - (self.good + p_good) / 2.0).powi(max_trick_uses as i32)
            + 4.0 * self.excellent
            + 0.5 * self.poor
    }

    /// Advances one turn: excellent decays to poor, normal may turn good or
    /// excellent, and normal absorbs the remainder.
    pub fn advance(&mut self, p_good: f64, p_excellent: f64) {
        let normal = self.normal;
        self.poor = self.excellent;
        self.good = p_good * normal;
        self.excellent = p_excellent * normal;
        self.normal = 1.0 - (self.good + self.excellent + self.poor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sampled_condition_gates() {
        let good = SampledCondition {
            condition: Condition::Good,
            use_conditions: true,
        };
        let poor = SampledCondition {
            condition: Condition::Poor,
            use_conditions: true,
        };
        let unmodeled = SampledCondition {
            condition: Condition::Normal,
            use_conditions: false,
        };
        assert!(good.check_good_or_excellent());
        assert!(!poor.check_good_or_excellent());
        assert!(unmodeled.check_good_or_excellent());
        assert_eq!(good.probability_weight(), 1.0);
    }

    #[test]
    fn test_expected_condition_always_passes() {
        let model = ExpectedCondition {
            p_good_or_excellent: 0.12,
        };
        assert!(model.check_good_or_excellent());
        assert!((model.probability_weight() - 0.12).abs() < 1e-12);
    }

    #[test]
    fn test_distribution_starts_normal() {
        let dist = ConditionDistribution::default();
        assert_eq!(dist.good_or_excellent(), 0.0);
        assert!((dist.quality_factor(0.11, 0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_distribution_advance_sums_to_one() {
        let mut dist = ConditionDistribution::default();
        for _ in 0..20 {
            dist.advance(0.11, 0.01);
            let total = dist.normal + dist.good + dist.excellent + dist.poor;
            assert!((total - 1.0).abs() < 1e-12);
            assert!(dist.poor >= 0.0 && dist.normal >= 0.0);
        }

        let mut dist = ConditionDistribution::default();
        dist.advance(0.11, 0.01);
        assert!((dist.good - 0.11).abs() < 1e-12);
        assert!((dist.excellent - 0.01).abs() < 1e-12);
        assert_eq!(dist.poor, 0.0);
        dist.advance(0.11, 0.01);
        assert!((dist.poor - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_condition_quality_factors() {
        assert_eq!(Condition::Excellent.quality_factor(), 4.0);
        assert_eq!(Condition::Good.quality_factor(), 1.5);
        assert_eq!(Condition::Poor.quality_factor(), 0.5);
        assert_eq!(Condition::Normal.quality_factor(), 1.0);
        assert!(Condition::Excellent.is_good_or_excellent());
        assert!(!Condition::Poor.is_good_or_excellent());
    }
}
