/// Fixed instructions appended after the symptom list
pub const SYSTEM_PROMPT: &str = r#"
As a highly knowledgeable medical AI, your task is to predict possible diseases based on the provided symptoms. Your response should include the following sections:

1. **Mild Threat**: Diseases that are not life-threatening and can be treated with simple remedies or lifestyle changes.
2. **Moderate Threat**: Diseases that require medical attention but are not immediately life-threatening.
3. **Severe Threat**: Diseases that are serious and require immediate medical attention.

Please provide a structured response with these headings. Narrow down the possible diseases with each additional symptom.
"#;

/// Everything sent to the inference service for one submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPayload {
    symptoms: Vec<String>,
    bullets: String,
}

impl PromptPayload {
    pub fn symptoms(&self) -> &[String] {
        &self.symptoms
    }

    /// One `- symptom` line per symptom
    pub fn bullets(&self) -> &str {
        &self.bullets
    }

    /// History turn: the symptom list followed by the instructions
    pub fn instructions(&self) -> String {
        format!("Symptoms:\n{}\n{}", self.bullets(), SYSTEM_PROMPT)
    }

    /// Message that asks the model for its answer
    pub fn trigger_message(&self) -> String {
        format!(
            "Here are the possible diseases based on the symptoms: {}.",
            self.bullets()
        )
    }
}

/// Split raw input on commas, trim, and drop empty entries
pub fn parse_symptoms(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Build the payload, or `None` when the input holds no symptoms
pub fn build_prompt(raw: &str) -> Option<PromptPayload> {
    let symptoms = parse_symptoms(raw);
    if symptoms.is_empty() {
        return None;
    }

    let bullets = symptoms
        .iter()
        .map(|symptom| format!("- {}", symptom))
        .collect::<Vec<_>>()
        .join("\n");

    Some(PromptPayload { symptoms, bullets })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn bullet_lines(text: &str) -> Vec<&str> {
        text.lines().filter(|line| line.starts_with("- ")).collect()
    }

    proptest! {
        #[test]
        fn parsed_entries_are_trimmed_and_non_empty(raw in "\\PC*") {
            for entry in parse_symptoms(&raw) {
                prop_assert!(!entry.is_empty());
                prop_assert_eq!(entry.as_str(), entry.trim());
            }
        }

        #[test]
        fn comma_heavy_input_keeps_only_real_tokens(raw in "[ ,\t\na-z]{0,64}") {
            let expected: Vec<&str> = raw.split(',').map(str::trim).filter(|s| !s.is_empty()).collect();
            prop_assert_eq!(parse_symptoms(&raw), expected);
        }

        #[test]
        fn building_is_deterministic(raw in "\\PC*") {
            prop_assert_eq!(build_prompt(&raw), build_prompt(&raw));
        }

        #[test]
        fn one_bullet_per_symptom(raw in "[ ,a-z]{0,64}") {
            match build_prompt(&raw) {
                Some(payload) => {
                    prop_assert_eq!(payload.bullets().lines().count(), payload.symptoms().len());
                    prop_assert!(payload.bullets().lines().all(|line| line.starts_with("- ")));
                }
                None => {
                    prop_assert!(parse_symptoms(&raw).is_empty());
                }
            }
        }
    }

    #[test]
    fn three_symptoms_keep_their_order() {
        let payload = build_prompt("fever, cough, headache").unwrap();
        let instructions = payload.instructions();

        assert_eq!(
            bullet_lines(&instructions),
            vec!["- fever", "- cough", "- headache"]
        );

        let last_bullet = instructions.find("- headache").unwrap();
        for section in ["Mild Threat", "Moderate Threat", "Severe Threat"] {
            let pos = instructions.find(section).unwrap();
            assert!(pos > last_bullet, "{} should follow the symptom list", section);
        }
    }

    #[test]
    fn empty_middle_token_is_dropped() {
        let payload = build_prompt(" fever ,, cough ").unwrap();
        assert_eq!(payload.symptoms(), ["fever", "cough"]);
        assert_eq!(payload.bullets(), "- fever\n- cough");
        assert_eq!(bullet_lines(&payload.instructions()), vec!["- fever", "- cough"]);
    }

    #[test]
    fn blank_input_builds_nothing() {
        assert_eq!(build_prompt(""), None);
        assert_eq!(build_prompt("   "), None);
        assert_eq!(build_prompt(" , ,, "), None);
    }

    #[test]
    fn building_twice_gives_the_same_payload() {
        let first = build_prompt("fever, chills").unwrap();
        let second = build_prompt("fever, chills").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.instructions(), second.instructions());
        assert_eq!(first.trigger_message(), second.trigger_message());
    }

    #[test]
    fn instruction_turn_layout() {
        let payload = build_prompt("fever").unwrap();
        assert_eq!(
            payload.instructions(),
            format!("Symptoms:\n- fever\n{}", SYSTEM_PROMPT)
        );
        assert_eq!(
            payload.trigger_message(),
            "Here are the possible diseases based on the symptoms: - fever."
        );
    }

    #[test]
    fn duplicates_are_kept() {
        let payload = build_prompt("cough, cough").unwrap();
        assert_eq!(payload.symptoms(), ["cough", "cough"]);
    }
}
