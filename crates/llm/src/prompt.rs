//! Prompt templates

/// Chat prompt for a farmer's question in the working language
pub fn chat_prompt(question: &str) -> String {
    format!(
        "You are AgriSaarthi, an expert agricultural assistant helping Indian farmers.
Respond to this farming question in English: \"{question}\"

Provide specific, actionable advice in 2-3 sentences. If it's about:
- Crop problems: Give diagnosis and treatment
- Government schemes: Explain benefits and application process
- Market prices: Provide current rates and trends
- Weather/irrigation: Give practical farming advice
- Growing crops: Provide step-by-step guidance

Keep responses concise but informative. Use simple language.",
        question = question.trim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_prompt_quotes_question() {
        let prompt = chat_prompt("  How to grow rice? ");
        assert!(prompt.starts_with("You are AgriSaarthi"));
        assert!(prompt.contains("in English: \"How to grow rice?\""));
        assert!(prompt.ends_with("Use simple language."));
    }
}
