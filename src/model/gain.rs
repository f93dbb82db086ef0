//! Gain values that remember whether they were given in linear or dB form.

use serde::{Deserialize, Serialize};

use super::params::Parameter;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GainUnit {
    Linear,
    Db,
}

/// A gain factor.
///
/// The original unit is kept so that a value read as `-6 dB` is written back
/// as `-6 dB`, not as `0.501...`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Gain {
    value: f64,
    unit: GainUnit,
}

impl Gain {
    #[inline]
    pub fn from_linear(value: f64) -> Self {
        Self {
            value,
            unit: GainUnit::Linear,
        }
    }

    #[inline]
    pub fn from_db(value: f64) -> Self {
        Self {
            value,
            unit: GainUnit::Db,
        }
    }

    /// Unity gain (1.0 linear).
    #[inline]
    pub fn unity() -> Self {
        Self::from_linear(1.0)
    }

    pub fn unit(&self) -> GainUnit {
        self.unit
    }

    pub fn is_db(&self) -> bool {
        self.unit == GainUnit::Db
    }

    pub fn as_linear(&self) -> f64 {
        match self.unit {
            GainUnit::Linear => self.value,
            GainUnit::Db => 10f64.powf(self.value / 20.0),
        }
    }

    /// Returns the gain in dB; a linear gain of zero is negative infinity.
    pub fn as_db(&self) -> f64 {
        match self.unit {
            GainUnit::Linear => 20.0 * self.value.abs().log10(),
            GainUnit::Db => self.value,
        }
    }
}

impl Parameter for Gain {
    const NAME: &'static str = "gain";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_to_linear() {
        let gain = Gain::from_db(20.0);
        assert!((gain.as_linear() - 10.0).abs() < 1e-12);
        assert!(gain.is_db());
    }

    #[test]
    fn test_linear_zero_is_negative_infinity_db() {
        let db = Gain::from_linear(0.0).as_db();
        assert!(db.is_infinite() && db.is_sign_negative());
    }

    #[test]
    fn test_unity() {
        assert_eq!(Gain::unity().as_db(), 0.0);
        assert_eq!(Gain::unity().unit(), GainUnit::Linear);
    }

    #[test]
    fn test_minus_six_db_round_trip() {
        let linear = Gain::from_db(-6.0).as_linear();
        let back = Gain::from_linear(linear).as_db();
        assert!((back + 6.0).abs() < 1e-9);
    }
}
