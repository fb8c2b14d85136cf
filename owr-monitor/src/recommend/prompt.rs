//! Prompt synthesis

use chrono::{DateTime, TimeZone};
use owr_common::db::StoredReading;
use std::fmt::Display;

/// Render the instruction sent to the language model
///
/// Output depends only on the arguments.
pub fn build_prompt<Tz>(indoor: &StoredReading, outdoor: &StoredReading, now: DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        r#"You are a smart home automation assistant. Based on the current weather conditions, provide recommendations for air conditioning and window management.

Current conditions:
- Indoor temperature: {:.1}°F ({:.1}% humidity)
- Outdoor temperature: {:.1}°F ({:.1}% humidity)
- Time: {}

Please respond with ONLY a valid JSON object in this exact format:
{{
  "shouldOperateAirConditioner": boolean,
  "temperatureToSetAirConditionerInF": integer,
  "shouldWindowBeOpen": boolean,
  "weatherDescription": "string description of current conditions and reasoning in 2 sentences"
}}

Consider factors like:
- Energy efficiency (avoid AC when windows can provide cooling)
- Comfort levels (typical comfort range is 68-78°F)
- Humidity levels
- Temperature differential between indoor and outdoor"#,
        indoor.temperature_f,
        f64::from(indoor.humidity_pct),
        outdoor.temperature_f,
        f64::from(outdoor.humidity_pct),
        now.format("%Y-%m-%d %H:%M:%S"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn reading(device_model: &str, temperature_f: f64, humidity_pct: u8) -> StoredReading {
        StoredReading {
            id: 1,
            time: Utc::now(),
            device_model: device_model.to_string(),
            temperature_f,
            humidity_pct,
        }
    }

    #[test]
    fn test_prompt_embeds_conditions_and_time() {
        let indoor = reading("Indoor-Sensor", 74.3, 41);
        let outdoor = reading("Outdoor-Sensor", 88.0, 20);
        let now = FixedOffset::west_opt(7 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 7, 4, 15, 30, 5)
            .unwrap();

        let prompt = build_prompt(&indoor, &outdoor, now);

        assert!(prompt.contains("Indoor temperature: 74.3°F (41.0% humidity)"));
        assert!(prompt.contains("Outdoor temperature: 88.0°F (20.0% humidity)"));
        assert!(prompt.contains("Time: 2024-07-04 15:30:05"));
    }

    #[test]
    fn test_prompt_names_reply_keys_and_factors() {
        let indoor = reading("A", 70.0, 50);
        let outdoor = reading("B", 60.0, 50);

        let prompt = build_prompt(&indoor, &outdoor, Utc::now());

        for key in [
            "shouldOperateAirConditioner",
            "temperatureToSetAirConditionerInF",
            "shouldWindowBeOpen",
            "weatherDescription",
        ] {
            assert!(prompt.contains(key), "missing {}", key);
        }
        assert!(prompt.contains("68-78°F"));
        assert!(prompt.contains("ONLY a valid JSON object"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let indoor = reading("A", 70.0, 50);
        let outdoor = reading("B", 60.0, 50);
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        assert_eq!(
            build_prompt(&indoor, &outdoor, now),
            build_prompt(&indoor, &outdoor, now)
        );
    }
}
