use std::fmt;

/// Three-way usage classification of a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    High,
    Optimal,
    Moderate,
}

impl Advisory {
    pub const HIGH_THRESHOLD: f64 = 1200.0;
    pub const OPTIMAL_THRESHOLD: f64 = 800.0;

    /// Both thresholds themselves classify as [`Advisory::Moderate`].
    pub fn classify(prediction: f64) -> Self {
        if prediction > Self::HIGH_THRESHOLD {
            Self::High
        } else if prediction < Self::OPTIMAL_THRESHOLD {
            Self::Optimal
        } else {
            Self::Moderate
        }
    }

    /// Wording used by the live monitor.
    pub fn live_message(self) -> &'static str {
        match self {
            Self::High => "ALERT: High water usage detected! Reduce irrigation or check for leaks.",
            Self::Optimal => "Optimal usage - systems running efficiently.",
            Self::Moderate => "Moderate usage - normal operation.",
        }
    }

    /// Wording used by the one-shot forecast.
    pub fn forecast_message(self) -> &'static str {
        match self {
            Self::High => "High water usage expected - consider irrigation control.",
            Self::Optimal => "Water usage within optimal range.",
            Self::Moderate => "Moderate usage - monitor tank levels.",
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::High => "high",
            Self::Optimal => "optimal",
            Self::Moderate => "moderate",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_exclusive() {
        assert_eq!(Advisory::classify(1200.0), Advisory::Moderate);
        assert_eq!(Advisory::classify(800.0), Advisory::Moderate);
        assert_eq!(Advisory::classify(1200.01), Advisory::High);
        assert_eq!(Advisory::classify(799.99), Advisory::Optimal);
        assert_eq!(Advisory::classify(1000.0), Advisory::Moderate);
    }

    #[test]
    fn extremes() {
        assert_eq!(Advisory::classify(f64::INFINITY), Advisory::High);
        assert_eq!(Advisory::classify(-5.0), Advisory::Optimal);
        assert_eq!(Advisory::classify(f64::NAN), Advisory::Moderate);
    }

    #[test]
    fn display_names_the_class() {
        assert_eq!(Advisory::High.to_string(), "high");
        assert!(Advisory::High.live_message().starts_with("ALERT"));
    }
}
