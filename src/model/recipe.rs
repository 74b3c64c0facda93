//! Recipe parameters.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Targets and gain-formula parameters of one recipe.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Recipe {
    /// Class level the recipe belongs to (used by Trained Eye).
    pub base_level: u32,
    /// Internal recipe level (used by the gain formulas and condition tables).
    pub level: u32,
    /// Progress required to finish.
    pub difficulty: u32,
    /// Starting and maximum durability.
    pub durability: u32,
    pub start_quality: u32,
    pub max_quality: u32,
    /// Extra quality target above `max_quality`, in percent.
    pub safety_margin: u32,
    /// Display only.
    pub suggested_craftsmanship: u32,
    /// Display only.
    pub suggested_control: u32,
    pub progress_divider: u32,
    pub progress_modifier: u32,
    pub quality_divider: u32,
    pub quality_modifier: u32,
    /// Star difficulty rating.
    pub stars: u32,
}

impl Default for Recipe {
    fn default() -> Self {
        Self {
            base_level: 90,
            level: 560,
            difficulty: 3500,
            durability: 80,
            start_quality: 0,
            max_quality: 7200,
            safety_margin: 0,
            suggested_craftsmanship: 2805,
            suggested_control: 2635,
            progress_divider: 130,
            progress_modifier: 90,
            quality_divider: 115,
            quality_modifier: 80,
            stars: 0,
        }
    }
}

impl Recipe {
    /// Quality target including the safety margin.
    pub fn quality_target(&self) -> f64 {
        self.max_quality as f64 * (1.0 + self.safety_margin as f64 * 0.01)
    }

    /// Checks the divisors and targets.
    pub fn validate(&self) -> Result<(), String> {
        if self.progress_divider == 0 || self.quality_divider == 0 {
            return Err("progress_divider and quality_divider must be positive".into());
        }
        if self.durability == 0 {
            return Err("durability must be positive".into());
        }
        if self.max_quality == 0 {
            return Err("max_quality must be positive".into());
        }
        Ok(())
    }
}
