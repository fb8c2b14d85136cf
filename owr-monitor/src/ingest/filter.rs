//! Glitch and duplicate suppression
//!
//! Two checks, in order:
//!
//! 1. **Humidity glitch.** A sensor that was reading under 5% and suddenly
//!    reports exactly 99% is almost always a radio/battery fault. If the
//!    previous sample was warm (above 70°F) the humidity is corrected to 1%;
//!    otherwise the sample is dropped. Skipped when the device has no prior
//!    reading.
//! 2. **Duplicate.** The decoder repeats a transmission several times. A
//!    stored reading with the same device and timestamp and identical
//!    temperature and humidity suppresses the candidate.

use owr_common::db::{CanonicalReading, StoredReading};

/// Tunable limits for [`AnomalyFilter`]
#[derive(Debug, Clone, PartialEq)]
pub struct FilterThresholds {
    /// Prior humidity must be strictly below this for the glitch check to apply
    pub glitch_prior_humidity_below: u8,
    /// Humidity value a glitching sensor reports
    pub glitch_pinned_humidity: u8,
    /// Prior temperature above which a glitch is corrected rather than dropped
    pub correct_when_prior_above_f: f64,
    /// Humidity substituted when correcting
    pub corrected_humidity: u8,
    /// Maximum timestamp gap, in seconds, for two equal readings to be duplicates
    pub duplicate_window_secs: i64,
}

impl Default for FilterThresholds {
    fn default() -> Self {
        Self {
            glitch_prior_humidity_below: 5,
            glitch_pinned_humidity: 99,
            correct_when_prior_above_f: 70.0,
            corrected_humidity: 1,
            duplicate_window_secs: 5,
        }
    }
}

/// Why a reading was not stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressReason {
    HumidityGlitch,
    Duplicate,
}

impl std::fmt::Display for SuppressReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuppressReason::HumidityGlitch => write!(f, "humidity glitch"),
            SuppressReason::Duplicate => write!(f, "duplicate"),
        }
    }
}

/// Filter verdict
#[derive(Debug, Clone, PartialEq)]
pub enum FilterDecision {
    /// Store this reading (humidity may have been corrected)
    Admit(CanonicalReading),
    /// Drop the reading
    Suppress(SuppressReason),
}

#[derive(Debug, Clone, Default)]
pub struct AnomalyFilter {
    thresholds: FilterThresholds,
}

impl AnomalyFilter {
    pub fn new(thresholds: FilterThresholds) -> Self {
        Self { thresholds }
    }

    /// Run both checks
    ///
    /// `prior` is the most recent stored reading for the device;
    /// `same_timestamp` is any stored reading with the candidate's exact
    /// device and timestamp.
    pub fn evaluate(
        &self,
        candidate: CanonicalReading,
        prior: Option<&StoredReading>,
        same_timestamp: Option<&StoredReading>,
    ) -> FilterDecision {
        let candidate = match self.screen_humidity_glitch(candidate, prior) {
            FilterDecision::Admit(reading) => reading,
            suppressed => return suppressed,
        };

        match same_timestamp {
            Some(existing) if self.is_duplicate(&candidate, existing) => {
                FilterDecision::Suppress(SuppressReason::Duplicate)
            }
            _ => FilterDecision::Admit(candidate),
        }
    }

    /// Check 1: correct or drop a pinned-humidity glitch
    pub fn screen_humidity_glitch(
        &self,
        mut candidate: CanonicalReading,
        prior: Option<&StoredReading>,
    ) -> FilterDecision {
        let Some(prior) = prior else {
            return FilterDecision::Admit(candidate);
        };

        let t = &self.thresholds;
        if prior.humidity_pct < t.glitch_prior_humidity_below
            && candidate.humidity_pct == t.glitch_pinned_humidity
        {
            if prior.temperature_f > t.correct_when_prior_above_f {
                tracing::info!(
                    device_model = %candidate.device_model,
                    prior_humidity = prior.humidity_pct,
                    prior_temperature_f = prior.temperature_f,
                    "Correcting pinned humidity reading to {}%",
                    t.corrected_humidity
                );
                candidate.humidity_pct = t.corrected_humidity;
            } else {
                tracing::info!(
                    device_model = %candidate.device_model,
                    prior_humidity = prior.humidity_pct,
                    prior_temperature_f = prior.temperature_f,
                    "Ignoring pinned humidity reading"
                );
                return FilterDecision::Suppress(SuppressReason::HumidityGlitch);
            }
        }

        FilterDecision::Admit(candidate)
    }

    /// Check 2: same values as a reading already stored under this timestamp
    ///
    /// With `existing` from an exact timestamp lookup the window test always holds.
    pub fn is_duplicate(&self, candidate: &CanonicalReading, existing: &StoredReading) -> bool {
        let gap_secs = candidate.time.timestamp() - existing.time.timestamp();

        existing.temperature_f == candidate.temperature_f
            && existing.humidity_pct == candidate.humidity_pct
            && gap_secs <= self.thresholds.duplicate_window_secs
    }
}
