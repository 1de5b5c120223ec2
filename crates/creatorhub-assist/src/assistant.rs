use std::sync::Arc;

use async_trait::async_trait;
use creatorhub_types::models::Message;
use tracing::{error, warn};

use crate::{AssistError, Drafter, GeminiClient, ReplySuggester, Transcriber};

pub const DRAFT_NOT_CONFIGURED: &str =
    "API key not configured. Please add it to your environment variables.";
pub const DRAFT_FALLBACK: &str = "Sorry, I couldn't generate a draft right now. Please try again.";
pub const TRANSCRIBE_FALLBACK: &str = "Sorry, I couldn't transcribe that audio. Please try again.";

/// Messages of context sent for reply suggestions.
const SUGGESTION_CONTEXT: usize = 5;
const MAX_SUGGESTIONS: usize = 3;

/// Facade over the AI capabilities. Never fails: every error is logged
/// and replaced with a fallback value.
#[derive(Clone)]
pub struct Assistant {
    drafter: Arc<dyn Drafter>,
    suggester: Arc<dyn ReplySuggester>,
    transcriber: Arc<dyn Transcriber>,
}

impl Assistant {
    pub fn new(
        drafter: Arc<dyn Drafter>,
        suggester: Arc<dyn ReplySuggester>,
        transcriber: Arc<dyn Transcriber>,
    ) -> Self {
        Self {
            drafter,
            suggester,
            transcriber,
        }
    }

    pub fn gemini(client: GeminiClient) -> Self {
        let client = Arc::new(client);
        Self::new(client.clone(), client.clone(), client)
    }

    /// An assistant with no backing service; every call returns its fallback.
    pub fn unconfigured() -> Self {
        let disabled = Arc::new(Disabled);
        Self::new(disabled.clone(), disabled.clone(), disabled)
    }

    pub async fn draft_post(&self, topic: &str) -> String {
        let prompt = format!(
            "Generate a social media post for a content creator about the following topic: \"{}\". \
             The post should be engaging, friendly, and encourage interaction. \
             Include relevant emojis and hashtags.",
            topic
        );
        match self.drafter.draft(&prompt).await {
            Ok(text) => text,
            Err(AssistError::NotConfigured) => {
                warn!("Draft requested but no AI service is configured");
                DRAFT_NOT_CONFIGURED.to_string()
            }
            Err(e) => {
                error!("Error generating post draft: {}", e);
                DRAFT_FALLBACK.to_string()
            }
        }
    }

    /// Up to three short replies for `current_user_id`. Nothing is requested
    /// when the conversation is empty or the user spoke last.
    pub async fn suggest_replies(&self, history: &[Message], current_user_id: &str) -> Vec<String> {
        let Some(last) = history.last() else {
            return vec![];
        };
        if last.from_id == current_user_id {
            return vec![];
        }

        let start = history.len().saturating_sub(SUGGESTION_CONTEXT);
        let conversation = history[start..]
            .iter()
            .map(|msg| {
                let speaker = if msg.from_id == current_user_id { "Me" } else { "Them" };
                format!("{}: {}", speaker, msg.text)
            })
            .collect::<Vec<_>>()
            .join("\n");
        let prompt = format!(
            "Based on the following conversation, suggest three short, casual, and helpful replies for \"Me\".\n\n\
             Conversation:\n{}\n\n\
             Provide only a JSON array of three strings.",
            conversation
        );

        match self.suggester.suggest(&prompt).await {
            Ok(mut replies) => {
                replies.truncate(MAX_SUGGESTIONS);
                replies
            }
            Err(e) => {
                warn!("Error generating suggested replies: {}", e);
                vec![]
            }
        }
    }

    pub async fn transcribe(&self, audio: &[u8], mime_type: &str) -> String {
        if audio.is_empty() {
            return TRANSCRIBE_FALLBACK.to_string();
        }
        match self.transcriber.transcribe(audio, mime_type).await {
            Ok(text) => text,
            Err(e) => {
                error!("Error transcribing audio: {}", e);
                TRANSCRIBE_FALLBACK.to_string()
            }
        }
    }
}

struct Disabled;

#[async_trait]
impl Drafter for Disabled {
    async fn draft(&self, _prompt: &str) -> Result<String, AssistError> {
        Err(AssistError::NotConfigured)
    }
}

#[async_trait]
impl ReplySuggester for Disabled {
    async fn suggest(&self, _transcript: &str) -> Result<Vec<String>, AssistError> {
        Err(AssistError::NotConfigured)
    }
}

#[async_trait]
impl Transcriber for Disabled {
    async fn transcribe(&self, _audio: &[u8], _mime_type: &str) -> Result<String, AssistError> {
        Err(AssistError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::Utc;

    use super::*;

    /// Records prompts and answers with canned values.
    #[derive(Default)]
    struct Canned {
        prompts: Mutex<Vec<String>>,
        replies: Vec<String>,
        fail: bool,
    }

    impl Canned {
        fn result<T>(&self, prompt: &str, value: T) -> Result<T, AssistError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            if self.fail {
                Err(AssistError::Decode("boom".into()))
            } else {
                Ok(value)
            }
        }
    }

    #[async_trait]
    impl Drafter for Canned {
        async fn draft(&self, prompt: &str) -> Result<String, AssistError> {
            self.result(prompt, "Draft!".to_string())
        }
    }

    #[async_trait]
    impl ReplySuggester for Canned {
        async fn suggest(&self, transcript: &str) -> Result<Vec<String>, AssistError> {
            self.result(transcript, self.replies.clone())
        }
    }

    #[async_trait]
    impl Transcriber for Canned {
        async fn transcribe(&self, _audio: &[u8], mime_type: &str) -> Result<String, AssistError> {
            self.result(mime_type, "hello there".to_string())
        }
    }

    fn assistant(canned: Arc<Canned>) -> Assistant {
        Assistant::new(canned.clone(), canned.clone(), canned)
    }

    fn msg(from: &str, to: &str, text: &str) -> Message {
        Message {
            id: text.into(),
            from_id: from.into(),
            to_id: to.into(),
            text: text.into(),
            timestamp: Utc::now(),
            is_read: false,
            status: None,
        }
    }

    #[tokio::test]
    async fn draft_wraps_topic_in_prompt() {
        let canned = Arc::new(Canned::default());
        let text = assistant(canned.clone()).draft_post("sourdough").await;

        assert_eq!(text, "Draft!");
        assert!(canned.prompts.lock().unwrap()[0].contains("\"sourdough\""));
    }

    #[tokio::test]
    async fn failures_fall_back_to_fixed_strings() {
        let canned = Arc::new(Canned {
            fail: true,
            ..Canned::default()
        });
        let assistant = assistant(canned);

        assert_eq!(assistant.draft_post("x").await, DRAFT_FALLBACK);
        assert_eq!(assistant.transcribe(b"audio", "audio/webm").await, TRANSCRIBE_FALLBACK);
        let history = [msg("them", "me", "hi")];
        assert!(assistant.suggest_replies(&history, "me").await.is_empty());
    }

    #[tokio::test]
    async fn unconfigured_draft_explains_missing_key() {
        let assistant = Assistant::unconfigured();
        assert_eq!(assistant.draft_post("x").await, DRAFT_NOT_CONFIGURED);
        assert_eq!(assistant.transcribe(b"a", "audio/webm").await, TRANSCRIBE_FALLBACK);
    }

    #[tokio::test]
    async fn suggestions_skip_when_user_spoke_last() {
        let canned = Arc::new(Canned::default());
        let assistant = assistant(canned.clone());

        assert!(assistant.suggest_replies(&[], "me").await.is_empty());
        let history = [msg("them", "me", "hi"), msg("me", "them", "hello")];
        assert!(assistant.suggest_replies(&history, "me").await.is_empty());
        assert!(canned.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn suggestions_use_last_five_messages_and_cap_at_three() {
        let canned = Arc::new(Canned {
            replies: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            ..Canned::default()
        });
        let assistant = assistant(canned.clone());
        let history: Vec<Message> = (0..7)
            .map(|i| {
                if i % 2 == 0 {
                    msg("them", "me", &format!("line{}", i))
                } else {
                    msg("me", "them", &format!("line{}", i))
                }
            })
            .collect();

        let replies = assistant.suggest_replies(&history, "me").await;

        assert_eq!(replies, ["a", "b", "c"]);
        let prompt = canned.prompts.lock().unwrap()[0].clone();
        assert!(!prompt.contains("line1"));
        assert!(prompt.contains("Them: line2"));
        assert!(prompt.contains("Me: line5"));
        assert!(prompt.contains("Them: line6"));
    }
}
