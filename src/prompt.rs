//! Prompt construction for game generation.
//!
//! Rendering is deterministic: the same `GameConfig` always yields the same
//! prompt text. Lesson context is substituted verbatim (no escaping; the
//! model tolerates arbitrary text). The question-count directive is a whole
//! conditional line, present only for "practice" activities, so its absence
//! leaves no dangling label or stray blank line.

use crate::protocol::GameConfig;
use crate::util::fill_template;

const CONTEXT_TEMPLATE: &str = "\
- Subject: {subject} ({grade}) - Book series: {book_series}
- Lesson: {lesson_name}
- Game type: {game_type}";

const OUTPUT_RULES: &str = r#"STRICT REQUIREMENTS:
1. Reply with exactly ONE JSON object and nothing else.
2. Do NOT write any preamble such as "Here is the result" and do NOT wrap the reply in markdown code fences.
3. JSON structure:
{
    "title": "Name of the game",
    "description": "How to play",
    "questions": []
}"#;

/// Descriptive guidance for the shape of each `questions` entry. The model
/// is free to deviate; nothing here is enforced server-side.
fn game_type_hint(game_type: &str) -> &'static str {
  match game_type {
    "quiz" => {
      "Each entry in \"questions\" must be an object with: \"id\", \"question\" (the question text), \"options\" (an ordered array of answer choices), \"answer\" (the correct choice), and \"explanation\"."
    }
    "simulation" => {
      "Each entry in \"questions\" must describe one drag-and-drop step with: \"id\", \"prompt\", \"zones\" (an array of drop-zone descriptors) and \"items\" (an array of draggable item descriptors, each naming its target zone)."
    }
    "sequencing" => {
      "Each entry in \"questions\" must be an object with: \"id\", \"text\" (one step of the sequence), and \"order\" (the 1-based position it belongs at)."
    }
    _ => {
      "Each entry in \"questions\" must be an object with an \"id\" plus whatever fields best fit this game type."
    }
  }
}

/// Render the single instruction string sent to the model for one request.
pub fn build_game_prompt(cfg: &GameConfig) -> String {
  let context = fill_template(
    CONTEXT_TEMPLATE,
    &[
      ("subject", &cfg.subject),
      ("grade", &cfg.grade),
      ("book_series", &cfg.book_series),
      ("lesson_name", &cfg.lesson_name),
      ("game_type", &cfg.game_type),
    ],
  );

  let mut lines = vec![
    "You are an expert educator. Task: create the data for an educational game as JSON.".to_string(),
    context,
  ];
  if cfg.activity_type == "practice" {
    lines.push(format!("- Number of questions: {}", cfg.question_count));
  }
  lines.push(String::new());
  lines.push(OUTPUT_RULES.to_string());
  lines.push(String::new());
  lines.push(game_type_hint(&cfg.game_type).to_string());

  lines.join("\n")
}

#[cfg(test)]
mod tests {
  use super::*;

  fn cfg(activity_type: &str, game_type: &str, question_count: u32) -> GameConfig {
    serde_json::from_value(serde_json::json!({
      "license_key": "VIP-2025",
      "bookSeries": "Global Success",
      "grade": "Grade 4",
      "subject": "English",
      "lessonName": "Unit 3: My Week",
      "activityType": activity_type,
      "gameType": game_type,
      "questionCount": question_count,
    }))
    .expect("valid config")
  }

  #[test]
  fn practice_includes_question_count_directive() {
    let prompt = build_game_prompt(&cfg("practice", "quiz", 7));
    assert!(prompt.contains("Number of questions: 7"));
  }

  #[test]
  fn non_practice_omits_the_directive_entirely() {
    let prompt = build_game_prompt(&cfg("warm-up", "quiz", 7));
    assert!(!prompt.contains("Number of questions"));
    assert!(!prompt.contains("7"));
    // No doubled blank line where the directive would have been.
    assert!(!prompt.contains("- Game type: quiz\n\n\n"));
  }

  #[test]
  fn rendering_is_deterministic() {
    let c = cfg("practice", "quiz", 5);
    assert_eq!(build_game_prompt(&c), build_game_prompt(&c));
  }

  #[test]
  fn context_is_substituted_verbatim() {
    let prompt = build_game_prompt(&cfg("practice", "quiz", 5));
    assert!(prompt.contains("English (Grade 4) - Book series: Global Success"));
    assert!(prompt.contains("Lesson: Unit 3: My Week"));
  }

  #[test]
  fn game_type_hints_vary_by_type() {
    let quiz = build_game_prompt(&cfg("practice", "quiz", 5));
    assert!(quiz.contains("\"options\""));
    assert!(quiz.contains("\"explanation\""));

    let sim = build_game_prompt(&cfg("practice", "simulation", 5));
    assert!(sim.contains("drag-and-drop"));
    assert!(sim.contains("\"zones\""));

    let seq = build_game_prompt(&cfg("practice", "sequencing", 5));
    assert!(seq.contains("\"order\""));

    let open = build_game_prompt(&cfg("practice", "story-builder", 5));
    assert!(open.contains("whatever fields best fit"));
  }

  #[test]
  fn prompt_demands_raw_json_only() {
    let prompt = build_game_prompt(&cfg("warm-up", "quiz", 5));
    assert!(prompt.contains("ONE JSON object"));
    assert!(prompt.contains("markdown code fences"));
    assert!(prompt.contains("\"title\""));
    assert!(prompt.contains("\"description\""));
    assert!(prompt.contains("\"questions\""));
  }
}
