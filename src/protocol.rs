//! Public request/response structs for the HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

/// Lesson configuration sent by the client to `/generate-game`.
/// Wire names stay camelCase to match the existing frontend.
#[derive(Clone, Debug, Deserialize)]
pub struct GameConfig {
    pub license_key: String,
    #[serde(rename = "bookSeries")]
    pub book_series: String,
    pub grade: String,
    pub subject: String,
    #[serde(rename = "lessonName")]
    pub lesson_name: String,
    /// Recognized values include "practice" and "warm-up".
    #[serde(rename = "activityType")]
    pub activity_type: String,
    /// Recognized values include "quiz", "simulation", "sequencing";
    /// anything else is passed to the model as-is.
    #[serde(rename = "gameType")]
    pub game_type: String,
    /// Only meaningful when activityType is "practice".
    #[serde(rename = "questionCount", default = "default_question_count")]
    pub question_count: u32,
}

fn default_question_count() -> u32 {
    5
}

#[derive(Debug, Deserialize)]
pub struct ChatIn {
    pub message: String,
    pub license_key: String,
}

#[derive(Debug, Serialize)]
pub struct ChatOut {
    pub reply: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub status: &'static str,
    pub model_ready: bool,
    pub message: String,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_config_accepts_camel_case_wire_names() {
        let cfg: GameConfig = serde_json::from_str(
            r#"{
                "license_key": "VIP-2025",
                "bookSeries": "Global Success",
                "grade": "Grade 4",
                "subject": "English",
                "lessonName": "Unit 3: My Week",
                "activityType": "practice",
                "gameType": "quiz",
                "questionCount": 7
            }"#,
        )
        .expect("deserialize");
        assert_eq!(cfg.book_series, "Global Success");
        assert_eq!(cfg.question_count, 7);
    }

    #[test]
    fn question_count_defaults_to_five() {
        let cfg: GameConfig = serde_json::from_str(
            r#"{
                "license_key": "VIP-2025",
                "bookSeries": "B",
                "grade": "G",
                "subject": "S",
                "lessonName": "L",
                "activityType": "warm-up",
                "gameType": "simulation"
            }"#,
        )
        .expect("deserialize");
        assert_eq!(cfg.question_count, 5);
    }
}
