//! AI card generation backed by the Gemini REST API.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Cards produced per request when the caller does not say.
pub const DEFAULT_CARD_COUNT: u32 = 5;

/// Upper bound on cards per request.
pub const MAX_CARD_COUNT: u32 = 50;

/// Longer source texts are cut off before prompting.
const MAX_SOURCE_TEXT_CHARS: usize = 5000;

/// Generation errors.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Generation backend error: {status} - {message}")]
    Backend { status: u16, message: String },

    #[error("Could not decode generated cards: {0}")]
    Decode(String),

    #[error("The model returned no cards")]
    Empty,
}

/// A card produced by the generator, not yet part of any deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedCard {
    pub front: String,
    pub back: String,
}

// === Wire types ===

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn first_text(&self) -> Option<&str> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
            .find_map(|p| p.text.as_deref())
    }
}

/// Client for turning topics, texts and word lists into flashcards.
pub struct CardGenerator {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl CardGenerator {
    /// Client wired from the GEMINI_* environment variables.
    pub fn from_env() -> Self {
        Self::new(std::env::var("GEMINI_API_KEY").ok())
    }

    /// Client with an explicit key. `None` disables generation; requests
    /// then fail with [`GenerationError::MissingApiKey`] without going to
    /// the network.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            api_key,
        }
    }

    /// Generate `count` cards about a topic.
    pub async fn from_topic(
        &self,
        topic: &str,
        count: u32,
        instructions: Option<&str>,
    ) -> Result<Vec<GeneratedCard>, GenerationError> {
        self.generate(&topic_prompt(topic, count, instructions)).await
    }

    /// Generate up to `count` cards covering the key concepts of a text.
    pub async fn from_text(
        &self,
        text: &str,
        count: u32,
        instructions: Option<&str>,
    ) -> Result<Vec<GeneratedCard>, GenerationError> {
        self.generate(&text_prompt(text, count, instructions)).await
    }

    /// Generate one card per word or phrase.
    pub async fn from_words(
        &self,
        words: &[String],
        instructions: Option<&str>,
    ) -> Result<Vec<GeneratedCard>, GenerationError> {
        self.generate(&words_prompt(words, instructions)).await
    }

    async fn generate(&self, prompt: &str) -> Result<Vec<GeneratedCard>, GenerationError> {
        let api_key = self.api_key.as_deref().ok_or(GenerationError::MissingApiKey)?;
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: card_list_schema(),
            },
        };

        let resp = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(GenerationError::Backend { status, message });
        }

        let response: GenerateContentResponse = resp
            .json()
            .await
            .map_err(|e| GenerationError::Decode(e.to_string()))?;

        let payload = response.first_text().ok_or(GenerationError::Empty)?;
        let cards = parse_cards(payload)?;
        tracing::info!("Generated {} cards with {}", cards.len(), self.model);
        Ok(cards)
    }
}

/// Schema for the structured JSON response: an array of front/back pairs.
fn card_list_schema() -> serde_json::Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "front": {
                    "type": "STRING",
                    "description": "Question or term shown on the front of the card"
                },
                "back": {
                    "type": "STRING",
                    "description": "Answer or definition shown on the back of the card"
                }
            },
            "required": ["front", "back"]
        }
    })
}

fn topic_prompt(topic: &str, count: u32, instructions: Option<&str>) -> String {
    let mut prompt = format!(
        "Generate {count} flashcards about \"{topic}\". Each card has a concise \
         question or term on the front and a clear, accurate answer or definition \
         on the back."
    );
    if let Some(extra) = instructions {
        prompt.push_str("\nAdditional instructions: ");
        prompt.push_str(extra);
    }
    prompt
}

fn text_prompt(text: &str, count: u32, instructions: Option<&str>) -> String {
    let truncated: String = text.chars().take(MAX_SOURCE_TEXT_CHARS).collect();
    let mut prompt = format!(
        "Create up to {count} flashcards covering the key concepts in the \
         following text. Put a question or term on the front and the answer or \
         definition on the back."
    );
    if let Some(extra) = instructions {
        prompt.push_str("\nAdditional instructions: ");
        prompt.push_str(extra);
    }
    prompt.push_str("\n\nText:\n\"\"\"\n");
    prompt.push_str(&truncated);
    prompt.push_str("\n\"\"\"");
    prompt
}

fn words_prompt(words: &[String], instructions: Option<&str>) -> String {
    let mut prompt = String::from(
        "Create one flashcard for each of the following words or phrases. Put \
         the word on the front and a concise definition on the back.",
    );
    if let Some(extra) = instructions {
        prompt.push_str("\nAdditional instructions: ");
        prompt.push_str(extra);
    }
    prompt.push_str("\n\nWords: ");
    prompt.push_str(&words.join(", "));
    prompt
}

fn parse_cards(payload: &str) -> Result<Vec<GeneratedCard>, GenerationError> {
    let cards: Vec<GeneratedCard> =
        serde_json::from_str(payload.trim()).map_err(|e| GenerationError::Decode(e.to_string()))?;

    let cards: Vec<GeneratedCard> = cards
        .into_iter()
        .filter(|c| !c.front.trim().is_empty() && !c.back.trim().is_empty())
        .collect();

    if cards.is_empty() {
        return Err(GenerationError::Empty);
    }
    Ok(cards)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn topic_prompt_names_topic_count_and_instructions() {
        let prompt = topic_prompt("photosynthesis", 7, Some("keep answers short"));
        assert!(prompt.contains("7 flashcards"));
        assert!(prompt.contains("\"photosynthesis\""));
        assert!(prompt.contains("keep answers short"));

        let plain = topic_prompt("photosynthesis", 5, None);
        assert!(!plain.contains("Additional instructions"));
    }

    #[test]
    fn text_prompt_truncates_long_sources() {
        let text = "x".repeat(MAX_SOURCE_TEXT_CHARS + 100);
        let prompt = text_prompt(&text, 5, None);
        assert_eq!(
            prompt.matches('x').count(),
            MAX_SOURCE_TEXT_CHARS,
            "source text should be cut off"
        );
    }

    #[test]
    fn words_prompt_lists_every_word() {
        let words = vec!["ephemeral".to_string(), "sonder".to_string()];
        let prompt = words_prompt(&words, None);
        assert!(prompt.contains("ephemeral, sonder"));
    }

    #[test]
    fn request_wire_format_uses_camel_case() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: "hello".to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: card_list_schema(),
            },
        };
        let body = serde_json::to_string(&request).unwrap();
        assert!(body.contains("\"generationConfig\""));
        assert!(body.contains("\"responseMimeType\""));
        assert!(body.contains("\"responseSchema\""));
    }

    #[test]
    fn response_text_comes_from_the_first_candidate_part() {
        let raw = r#"{
            "candidates": [
                { "content": { "parts": [ { "text": "[{\"front\":\"f\",\"back\":\"b\"}]" } ] } }
            ]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(
            response.first_text(),
            Some("[{\"front\":\"f\",\"back\":\"b\"}]")
        );
    }

    #[test]
    fn empty_response_has_no_text() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.first_text(), None);
    }

    #[test]
    fn parse_cards_reads_front_back_pairs() {
        let cards = parse_cards(r#"[{"front":"What is Rust?","back":"A systems language."}]"#)
            .unwrap();
        assert_eq!(
            cards,
            vec![GeneratedCard {
                front: "What is Rust?".to_string(),
                back: "A systems language.".to_string(),
            }]
        );
    }

    #[test]
    fn parse_cards_rejects_malformed_payloads() {
        assert!(matches!(
            parse_cards("not json"),
            Err(GenerationError::Decode(_))
        ));
        assert!(matches!(
            parse_cards(r#"{"front":"not","back":"an array"}"#),
            Err(GenerationError::Decode(_))
        ));
    }

    #[test]
    fn parse_cards_drops_blank_entries() {
        let cards = parse_cards(
            r#"[{"front":"keep","back":"me"},{"front":"  ","back":"dropped"}]"#,
        )
        .unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].front, "keep");

        assert!(matches!(
            parse_cards(r#"[{"front":"","back":""}]"#),
            Err(GenerationError::Empty)
        ));
    }

    #[tokio::test]
    #[ignore = "requires GEMINI_API_KEY"]
    async fn generates_cards_for_a_topic() {
        let generator = CardGenerator::from_env();
        let cards = generator
            .from_topic("the planets of the solar system", 3, None)
            .await
            .expect("generation should succeed");
        assert!(!cards.is_empty());
    }
}
