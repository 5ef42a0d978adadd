/// Some models echo the tail of the instructions back before the rewritten
/// body; everything up to and including this marker is discarded.
pub const PROMPT_ECHO_MARKER: &str = "Modified Version:";

pub fn rewrite_prompt(title: &str, content: &str, person_of_interest: &str) -> String {
    format!(
        "You are a professional news editor. Your task is to modify the following article to
promote {} while maintaining journalistic integrity.

Guidelines:
1. Naturally weave {} into the narrative
2. Highlight their relevant achievements, expertise, or contributions
3. Connect them to the article's topic in a meaningful way
4. Maintain factual accuracy and credibility
5. Keep the tone professional and journalistic
6. Ensure the modified content flows naturally

Original Article:
Title: {}
Content: {}

Please provide a modified version that promotes {} while preserving the core news value.
Focus only on the modified content, do not include any explanations or additional text.",
        person_of_interest, person_of_interest, title, content, person_of_interest
    )
}

/// Normalizes raw model output into clean article body text: trims
/// whitespace and, when the prompt-echo marker is present, keeps only what
/// follows its last occurrence.
pub fn clean_generated_text(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.rfind(PROMPT_ECHO_MARKER) {
        Some(index) => trimmed[index + PROMPT_ECHO_MARKER.len()..].trim().to_string(),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_interpolates_inputs_verbatim() {
        let prompt = rewrite_prompt("Storms ahead", "Coastal towns brace.", "Dr. Gale");

        assert!(prompt.contains("Title: Storms ahead"));
        assert!(prompt.contains("Content: Coastal towns brace."));
        assert!(prompt.contains("promote Dr. Gale"));
    }

    #[test]
    fn marker_and_everything_before_it_is_stripped() {
        let raw = "Sure, here is the text.\nModified Version: The town thrived.";
        assert_eq!(clean_generated_text(raw), "The town thrived.");
    }

    #[test]
    fn last_marker_occurrence_wins() {
        let raw = "Modified Version: draft\nModified Version: final copy";
        assert_eq!(clean_generated_text(raw), "final copy");
    }

    #[test]
    fn clean_text_is_left_untouched() {
        let raw = "  A finished article body.  ";
        let once = clean_generated_text(raw);
        assert_eq!(once, "A finished article body.");
        assert_eq!(clean_generated_text(&once), once);
    }
}
