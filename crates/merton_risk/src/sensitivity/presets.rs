//! Preset combined stress scenarios.
//!
//! Each scenario shocks equity volatility and debt together:
//! - Base case (no shock)
//! - Mild, moderate, severe and extreme stress
//! - A benign scenario with both inputs reduced

use std::fmt;

/// Named combined volatility/debt scenario.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StressScenario {
    /// No shock
    Base,
    /// Volatility +10%, debt +10%
    Mild,
    /// Volatility +20%, debt +20%
    Moderate,
    /// Volatility +30%, debt +30%
    Severe,
    /// Volatility +50%, debt +30%
    Extreme,
    /// Volatility −20%, debt −20%
    Benign,
}

impl StressScenario {
    /// All scenarios in reporting order.
    pub const ALL: [StressScenario; 6] = [
        Self::Base,
        Self::Mild,
        Self::Moderate,
        Self::Severe,
        Self::Extreme,
        Self::Benign,
    ];

    /// Get human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Base => "Base Case",
            Self::Mild => "Mild Stress",
            Self::Moderate => "Moderate Stress",
            Self::Severe => "Severe Stress",
            Self::Extreme => "Extreme Stress",
            Self::Benign => "Benign",
        }
    }

    /// Get description.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Base => "Unshocked inputs",
            Self::Mild => "Equity volatility +10%, debt +10%",
            Self::Moderate => "Equity volatility +20%, debt +20%",
            Self::Severe => "Equity volatility +30%, debt +30%",
            Self::Extreme => "Equity volatility +50%, debt +30%",
            Self::Benign => "Equity volatility -20%, debt -20%",
        }
    }

    /// Relative shock to equity volatility.
    pub fn volatility_shock(&self) -> f64 {
        match self {
            Self::Base => 0.0,
            Self::Mild => 0.10,
            Self::Moderate => 0.20,
            Self::Severe => 0.30,
            Self::Extreme => 0.50,
            Self::Benign => -0.20,
        }
    }

    /// Relative shock to debt face value.
    pub fn debt_shock(&self) -> f64 {
        match self {
            Self::Base => 0.0,
            Self::Mild => 0.10,
            Self::Moderate => 0.20,
            Self::Severe | Self::Extreme => 0.30,
            Self::Benign => -0.20,
        }
    }

    /// Look a scenario up by [`name`](Self::name), ignoring case.
    ///
    /// # Examples
    /// ```
    /// use merton_risk::sensitivity::StressScenario;
    ///
    /// assert_eq!(StressScenario::from_name("severe stress"), Some(StressScenario::Severe));
    /// assert_eq!(StressScenario::from_name("Armageddon"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for StressScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_shocks() {
        assert_eq!(StressScenario::Base.volatility_shock(), 0.0);
        assert_eq!(StressScenario::Base.debt_shock(), 0.0);
        assert_eq!(StressScenario::Extreme.volatility_shock(), 0.50);
        assert_eq!(StressScenario::Extreme.debt_shock(), 0.30);
        assert_eq!(StressScenario::Benign.volatility_shock(), -0.20);
        assert_eq!(StressScenario::Benign.debt_shock(), -0.20);
    }

    #[test]
    fn test_stress_scenarios_are_increasing() {
        let ladder = [
            StressScenario::Mild,
            StressScenario::Moderate,
            StressScenario::Severe,
            StressScenario::Extreme,
        ];
        for pair in ladder.windows(2) {
            assert!(pair[1].volatility_shock() >= pair[0].volatility_shock());
            assert!(pair[1].debt_shock() >= pair[0].debt_shock());
        }
    }

    #[test]
    fn test_names_round_trip() {
        for scenario in StressScenario::ALL {
            assert_eq!(StressScenario::from_name(scenario.name()), Some(scenario));
            assert_eq!(scenario.to_string(), scenario.name());
            assert!(!scenario.description().is_empty());
        }
        assert_eq!(
            StressScenario::from_name("  BASE CASE "),
            Some(StressScenario::Base)
        );
    }
}
