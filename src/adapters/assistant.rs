//! Keyword-matching health assistant.
//!
//! Replies come from a fixed topic table scanned in order; the first topic
//! with any keyword contained in the lowercased message wins.

use std::thread;
use std::time::Duration;

use crate::domain::Assessment;
use crate::ports::{GatewayError, HealthAssistant};

/// Posted once when the chat is first enabled.
pub const WELCOME_MESSAGE: &str = "Hello! I'm your AI Health Assistant. I've analyzed your cardiovascular risk assessment results. I'm here to help you understand your results and provide health guidance. Feel free to ask me any questions about your cardiovascular health!";

/// Shown in place of a reply when the responder fails.
pub const ERROR_MESSAGE: &str =
    "I apologize, but I'm having trouble processing your request right now. Please try again later.";

const NO_RESULTS: &str =
    "I don't have your prediction results yet. Please complete the health assessment first.";

const RISK: &str = "Based on your assessment, your cardiovascular risk level appears to be in a specific range. This assessment considers multiple factors including your age, lifestyle, blood pressure, cholesterol levels, and other health indicators. Remember, this is a prediction tool and should not replace professional medical advice.";

const FALLBACK: &str = "That's a great question about cardiovascular health! While I can provide general health information, it's always best to consult with your healthcare provider for personalized medical advice. I'm here to help you understand general heart health principles and lifestyle recommendations. Is there a specific aspect of cardiovascular health you'd like to know more about?";

/// Topics after the risk topic, in match order.
const TOPICS: &[(&[&str], &str)] = &[
    (
        &["diet", "food", "eat"],
        "For heart health, I recommend following a Mediterranean-style diet rich in fruits, vegetables, whole grains, lean proteins, and healthy fats like olive oil. Limit processed foods, excess sodium, and saturated fats. Consider foods like salmon, nuts, berries, and leafy greens.",
    ),
    (
        &["exercise", "workout", "activity"],
        "Regular physical activity is crucial for cardiovascular health. Aim for at least 150 minutes of moderate-intensity aerobic exercise per week, or 75 minutes of vigorous exercise. Include strength training twice a week. Start gradually and consult your doctor before beginning any new exercise program.",
    ),
    (
        &["medication", "medicine", "drug"],
        "If you're taking medications for blood pressure, cholesterol, or diabetes, it's important to take them as prescribed by your doctor. Never stop or change medications without consulting your healthcare provider. These medications play a crucial role in managing cardiovascular risk factors.",
    ),
    (
        &["stress", "anxiety", "mental"],
        "Stress management is vital for heart health. Chronic stress can contribute to cardiovascular problems. Try relaxation techniques like deep breathing, meditation, yoga, or regular exercise. Ensure adequate sleep and consider talking to a counselor if stress becomes overwhelming.",
    ),
    (
        &["smoking", "tobacco"],
        "Smoking is one of the most significant risk factors for cardiovascular disease. If you smoke, quitting is the single most important thing you can do for your heart health. There are many resources available to help you quit, including medications, counseling, and support groups.",
    ),
    (
        &["doctor", "physician", "medical"],
        "It's important to have regular check-ups with your healthcare provider, especially if you have elevated cardiovascular risk factors. They can monitor your blood pressure, cholesterol, blood sugar, and other important markers. Don't hesitate to discuss any concerns about your heart health.",
    ),
];

const RISK_KEYWORDS: &[&str] = &["risk", "result"];

/// Assistant answering from the keyword table after a short delay.
pub struct KeywordAssistant {
    delay: Duration,
}

impl KeywordAssistant {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Pure reply selection, no delay.
    #[must_use]
    pub fn reply(message: &str, context: Option<&Assessment>) -> &'static str {
        let lower = message.to_lowercase();
        let mentions = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

        if mentions(RISK_KEYWORDS) {
            return if context.is_some() { RISK } else { NO_RESULTS };
        }

        TOPICS
            .iter()
            .find(|(keywords, _)| mentions(*keywords))
            .map_or(FALLBACK, |(_, reply)| *reply)
    }
}

impl HealthAssistant for KeywordAssistant {
    fn respond(&self, message: &str, context: Option<&Assessment>) -> Result<String, GatewayError> {
        thread::sleep(self.delay);
        Ok(Self::reply(message, context).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ModelResult;

    fn assessment() -> Assessment {
        Assessment::from_results(vec![ModelResult::new("Random Forest", 0.89, 0.25, 0.92)])
            .expect("Non-empty")
    }

    #[test]
    fn test_risk_depends_on_results() {
        assert_eq!(KeywordAssistant::reply("What is my risk?", None), NO_RESULTS);
        assert_eq!(
            KeywordAssistant::reply("Explain my RESULTS", Some(&assessment())),
            RISK
        );
    }

    #[test]
    fn test_topic_order() {
        // "risk" outranks "diet" even when both appear.
        assert_eq!(KeywordAssistant::reply("diet and risk", None), NO_RESULTS);
        assert!(KeywordAssistant::reply("What should I eat?", None).contains("Mediterranean"));
        // Smoking comes before the doctor topic in the table.
        assert!(
            KeywordAssistant::reply("ask my doctor about tobacco", None).starts_with("Smoking")
        );
        // "medical" alone routes to the doctor topic, "medication" wins first.
        assert!(KeywordAssistant::reply("medical checkup", None).starts_with("It's important"));
        assert!(KeywordAssistant::reply("medication", None).starts_with("If you're taking"));
    }

    #[test]
    fn test_fallback() {
        assert_eq!(KeywordAssistant::reply("hello there", None), FALLBACK);
    }

    #[test]
    fn test_respond_returns_reply() {
        let assistant = KeywordAssistant::new(Duration::ZERO);
        let reply = assistant
            .respond("how much exercise?", None)
            .expect("Keyword assistant never fails");
        assert!(reply.starts_with("Regular physical activity"));
    }
}
