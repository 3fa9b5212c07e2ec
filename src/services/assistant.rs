/// Conversational assistant seam
///
/// The LLM chain (retrieval, prompting, memory) runs as a separate service;
/// this module only knows how to hand it a message plus prior turns and get
/// an answer back.
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::models::ChatTurn;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait GameAssistant: Send + Sync {
    /// Asks the assistant one question, with conversation history supplied
    /// by the caller.
    async fn ask(&self, message: &str, history: &[ChatTurn]) -> AppResult<String>;
}

/// HTTP-backed assistant client.
#[derive(Clone)]
pub struct HttpAssistant {
    http_client: HttpClient,
    api_url: String,
}

impl HttpAssistant {
    pub fn new(api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url,
        }
    }

    fn request_body(message: &str, history: &[ChatTurn]) -> Value {
        json!({
            "message": message,
            "history": history,
        })
    }
}

#[async_trait::async_trait]
impl GameAssistant for HttpAssistant {
    async fn ask(&self, message: &str, history: &[ChatTurn]) -> AppResult<String> {
        let response = self
            .http_client
            .post(&self.api_url)
            .json(&Self::request_body(message, history))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Assistant(format!(
                "Assistant service returned status {}: {}",
                status, text
            )));
        }

        #[derive(Deserialize)]
        struct AskResponse {
            answer: String,
        }

        let parsed: AskResponse = response.json().await?;

        tracing::info!(
            history_turns = history.len(),
            answer_chars = parsed.answer.len(),
            "Assistant answered"
        );

        Ok(parsed.answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChatRole;

    #[test]
    fn test_request_body_shape() {
        let history = vec![
            ChatTurn {
                role: ChatRole::User,
                content: "How long does a game take?".to_string(),
            },
            ChatTurn {
                role: ChatRole::Assistant,
                content: "Around two hours.".to_string(),
            },
        ];

        let body = HttpAssistant::request_body("Is it good for two players?", &history);
        assert_eq!(body["message"], "Is it good for two players?");
        assert_eq!(body["history"][0]["role"], "user");
        assert_eq!(body["history"][1]["role"], "assistant");
        assert_eq!(body["history"][1]["content"], "Around two hours.");
    }

    #[test]
    fn test_request_body_empty_history() {
        let body = HttpAssistant::request_body("Hello", &[]);
        assert_eq!(body["history"], json!([]));
    }
}
