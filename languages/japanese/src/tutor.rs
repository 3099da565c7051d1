//! Prompted LLM tasks a Japanese learner needs: translation, kana,
//! example sentences, glosses, suggestions and grammar notes.
//!
//! Every task is a single `generate` call. Plain-text replies are trimmed,
//! JSON replies go through [`parse_json_reply`].

use std::sync::Arc;

use kotoba_translator::{AssistError, LanguageModel, parse_json_reply};
use kotoba_types::{Direction, Example, GrammarPoint, Suggestion};

const SUGGESTION_FORMAT: &str = r#"Return a strict JSON array of objects with these keys:
- "word": The Japanese word (Kanji or Kana)
- "reading": The reading in Hiragana/Katakana
- "meaning": The meaning in Traditional Chinese (繁體中文, Taiwan usage)

Example output:
[{"word": "猫", "reading": "ねこ", "meaning": "貓"}, {"word": "子猫", "reading": "こねこ", "meaning": "小貓"}]"#;

const GRAMMAR_FORMAT: &str = r#"Return a strict JSON object with these keys:
- "grammar": The grammar pattern itself (e.g., "～ほど～ない")
- "meaning": The meaning in Traditional Chinese (繁體中文, Taiwan usage)
- "usage": A brief explanation of how to use it (connection rules, nuance) in Traditional Chinese
- "examples": An array of objects with "jap" (Japanese sentence) and "cht" (Traditional Chinese translation)

Example output:
{
    "grammar": "N + ほど～ない",
    "meaning": "沒有比...更...",
    "usage": "接在名詞後面，表示該名詞是程度最高的，沒有其他事物能比得上。",
    "examples": [{"jap": "今年の夏ほど暑い夏はない。", "cht": "沒有比今年夏天更熱的夏天了。"}]
}"#;

#[derive(Clone)]
pub struct JapaneseTutor {
    model: Arc<dyn LanguageModel>,
}

impl JapaneseTutor {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    async fn ask(&self, prompt: String) -> Result<String, AssistError> {
        tracing::debug!(
            "Prompting {} ({} chars)",
            self.model.metadata().model,
            prompt.chars().count()
        );
        let reply = self.model.generate(&prompt).await?;
        Ok(reply.trim().to_string())
    }

    /// Most common Japanese word for a Chinese one
    pub async fn translate_to_japanese(&self, query: &str) -> Result<String, AssistError> {
        self.ask(format!(
            "Translate the Chinese word \"{query}\" to the most common Japanese word (Kanji or Kana). Return ONLY the Japanese word."
        ))
        .await
    }

    pub async fn to_hiragana(&self, query: &str) -> Result<String, AssistError> {
        self.ask(format!(
            "Convert \"{query}\" to Hiragana. Return ONLY the Hiragana."
        ))
        .await
    }

    /// Three short sentences with Traditional Chinese translations
    pub async fn example_sentences(
        &self,
        word: &str,
        meaning: &str,
    ) -> Result<Vec<Example>, AssistError> {
        let reply = self
            .ask(format!(
                "Generate 3 simple Japanese example sentences for the word \"{word}\" ({meaning}).\n\
                 Format as JSON array of objects with 'jap' (Japanese sentence) and 'cht' (Traditional Chinese translation, Taiwan usage).\n\
                 Example: [{{\"jap\": \"猫がいます。\", \"cht\": \"有一隻貓。\"}}]"
            ))
            .await?;
        parse_json_reply(&reply)
    }

    /// Traditional Chinese (Taiwan usage) gloss of a Japanese word
    pub async fn gloss(&self, word: &str, reading: &str) -> Result<String, AssistError> {
        self.ask(format!(
            "Translate the Japanese word \"{word}\" (reading: {reading}) to Traditional Chinese (Taiwan usage). Return ONLY the Chinese translation, no explanation."
        ))
        .await
    }

    pub async fn suggest(
        &self,
        query: &str,
        direction: Direction,
    ) -> Result<Vec<Suggestion>, AssistError> {
        let lead = match direction {
            Direction::ZhJa => format!(
                "Based on the Chinese word or phrase \"{query}\", suggest 5 related Japanese words that a learner might want to know."
            ),
            Direction::JaZh => format!(
                "Based on the Japanese word or phrase \"{query}\", suggest 5 related Japanese words."
            ),
        };
        let reply = self.ask(format!("{lead}\n{SUGGESTION_FORMAT}")).await?;
        parse_json_reply(&reply)
    }

    pub async fn explain_grammar(&self, pattern: &str) -> Result<GrammarPoint, AssistError> {
        let reply = self
            .ask(format!(
                "Explain the Japanese grammar point \"{pattern}\".\n{GRAMMAR_FORMAT}"
            ))
            .await?;
        parse_json_reply(&reply)
    }
}
