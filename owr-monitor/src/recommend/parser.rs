//! Tolerant extraction of the model's JSON reply

use super::RecommendError;
use serde::Deserialize;

/// The four fields the prompt asks the model for
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationReply {
    pub should_operate_air_conditioner: bool,
    #[serde(rename = "temperatureToSetAirConditionerInF")]
    pub temperature_to_set_air_conditioner_in_f: i64,
    pub should_window_be_open: bool,
    pub weather_description: String,
}

/// Parse the JSON object embedded in a free-form reply
///
/// Takes everything from the first `{` to the last `}` inclusive, so prose
/// before and after the object is ignored.
pub fn parse_recommendation(text: &str) -> Result<RecommendationReply, RecommendError> {
    let unparseable = |reason: String| RecommendError::UnparseableRecommendation {
        reason,
        text: text.to_string(),
    };

    let start = text
        .find('{')
        .ok_or_else(|| unparseable("no opening brace".to_string()))?;
    let end = text
        .rfind('}')
        .filter(|&end| end > start)
        .ok_or_else(|| unparseable("no closing brace after opening brace".to_string()))?;

    serde_json::from_str(&text[start..=end]).map_err(|e| unparseable(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_object_wrapped_in_prose() {
        let text = "Here you go: {\"shouldOperateAirConditioner\":true,\"temperatureToSetAirConditionerInF\":72,\"shouldWindowBeOpen\":false,\"weatherDescription\":\"Hot outside.\"} thanks";

        let reply = parse_recommendation(text).unwrap();

        assert_eq!(
            reply,
            RecommendationReply {
                should_operate_air_conditioner: true,
                temperature_to_set_air_conditioner_in_f: 72,
                should_window_be_open: false,
                weather_description: "Hot outside.".to_string(),
            }
        );
    }

    #[test]
    fn test_no_brace_is_unparseable() {
        let text = "I cannot make a recommendation right now.";

        match parse_recommendation(text) {
            Err(RecommendError::UnparseableRecommendation { text: original, .. }) => {
                assert_eq!(original, text);
            }
            other => panic!("Expected UnparseableRecommendation, got {:?}", other),
        }
    }

    #[test]
    fn test_closing_brace_before_opening_is_unparseable() {
        let result = parse_recommendation("} nothing here {");
        assert!(matches!(
            result,
            Err(RecommendError::UnparseableRecommendation { .. })
        ));
    }

    #[test]
    fn test_missing_field_is_unparseable() {
        let text = r#"{"shouldOperateAirConditioner":false,"shouldWindowBeOpen":true,"weatherDescription":"Mild."}"#;
        assert!(matches!(
            parse_recommendation(text),
            Err(RecommendError::UnparseableRecommendation { .. })
        ));
    }

    #[test]
    fn test_fractional_target_is_unparseable() {
        let text = r#"{"shouldOperateAirConditioner":true,"temperatureToSetAirConditionerInF":72.5,"shouldWindowBeOpen":false,"weatherDescription":"Hot."}"#;
        assert!(matches!(
            parse_recommendation(text),
            Err(RecommendError::UnparseableRecommendation { .. })
        ));
    }

    #[test]
    fn test_markdown_fenced_reply_with_extra_keys() {
        let text = "```json\n{\n  \"shouldOperateAirConditioner\": false,\n  \"temperatureToSetAirConditionerInF\": 76,\n  \"shouldWindowBeOpen\": true,\n  \"weatherDescription\": \"Cool evening. Open the window.\",\n  \"confidence\": \"high\"\n}\n```";

        let reply = parse_recommendation(text).unwrap();

        assert!(reply.should_window_be_open);
        assert_eq!(reply.temperature_to_set_air_conditioner_in_f, 76);
    }
}
