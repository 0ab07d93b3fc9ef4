use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::types::{GenerationMode, ModelCallError, ModelClient};

pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    http: Client,
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct TextCompletion {
    choices: Vec<TextChoice>,
}

#[derive(Deserialize)]
struct TextChoice {
    #[serde(default)]
    text: Option<String>,
}

impl OpenAiClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl ModelClient for OpenAiClient {
    async fn generate(
        &self,
        model_id: &str,
        prompt: &str,
        mode: GenerationMode,
    ) -> Result<String, ModelCallError> {
        let (url, body) = match mode {
            GenerationMode::Chat => (
                self.endpoint("chat/completions"),
                json!({
                    "model": model_id,
                    "messages": [{ "role": "user", "content": prompt }],
                }),
            ),
            GenerationMode::Completion => (
                self.endpoint("completions"),
                json!({
                    "model": model_id,
                    "prompt": prompt,
                }),
            ),
        };
        debug!(%url, model_id, ?mode, "sending model request");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;
        if !status.is_success() {
            return Err(ModelCallError::new(format!(
                "model server returned HTTP {status}: {raw}"
            )));
        }

        let text = match mode {
            GenerationMode::Chat => {
                let parsed: ChatCompletion = serde_json::from_str(&raw)?;
                parsed
                    .choices
                    .into_iter()
                    .next()
                    .map(|choice| choice.message.content)
            }
            GenerationMode::Completion => {
                let parsed: TextCompletion = serde_json::from_str(&raw)?;
                parsed.choices.into_iter().next().map(|choice| choice.text)
            }
        };

        match text {
            Some(content) => Ok(content.unwrap_or_default()),
            None => Err(ModelCallError::new("model server returned no choices")),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{Json, Router, http::HeaderMap, http::StatusCode, routing::post};
    use serde_json::Value;
    use tokio::net::TcpListener;

    use super::*;

    async fn spawn_stub(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/v1/")
    }

    fn bearer(headers: &HeaderMap) -> String {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    async fn echo_chat(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
        let content = format!(
            "{}|{}|{}",
            body["model"].as_str().unwrap_or_default(),
            body["messages"][0]["content"].as_str().unwrap_or_default(),
            bearer(&headers),
        );
        Json(json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        }))
    }

    async fn echo_completion(Json(body): Json<Value>) -> Json<Value> {
        let text = format!(
            "{}|{}",
            body["model"].as_str().unwrap_or_default(),
            body["prompt"].as_str().unwrap_or_default(),
        );
        Json(json!({ "choices": [{ "text": text }] }))
    }

    #[tokio::test]
    async fn chat_mode_sends_message_envelope() {
        let base = spawn_stub(Router::new().route("/v1/chat/completions", post(echo_chat))).await;
        let client = OpenAiClient::new(&base, "ollama");

        let reply = client
            .generate("cogito:3b", "hello", GenerationMode::Chat)
            .await
            .unwrap();
        assert_eq!(reply, "cogito:3b|hello|Bearer ollama");
    }

    #[tokio::test]
    async fn completion_mode_sends_raw_prompt() {
        let base = spawn_stub(Router::new().route("/v1/completions", post(echo_completion))).await;
        let client = OpenAiClient::new(&base, "ollama");

        let reply = client
            .generate("cogito:3b", "Once upon", GenerationMode::Completion)
            .await
            .unwrap();
        assert_eq!(reply, "cogito:3b|Once upon");
    }

    #[tokio::test]
    async fn null_content_becomes_empty_string() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async {
                Json(json!({ "choices": [{ "message": { "role": "assistant", "content": null } }] }))
            }),
        );
        let client = OpenAiClient::new(&spawn_stub(router).await, "ollama");

        let reply = client
            .generate("m", "p", GenerationMode::Chat)
            .await
            .unwrap();
        assert_eq!(reply, "");
    }

    #[tokio::test]
    async fn empty_choices_is_an_error() {
        let router = Router::new().route(
            "/v1/completions",
            post(|| async { Json(json!({ "choices": [] })) }),
        );
        let client = OpenAiClient::new(&spawn_stub(router).await, "ollama");

        let err = client
            .generate("m", "p", GenerationMode::Completion)
            .await
            .unwrap_err();
        assert!(err.message().contains("no choices"));
    }

    #[tokio::test]
    async fn error_status_carries_server_message() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async { (StatusCode::NOT_FOUND, "model \"nope\" not found") }),
        );
        let client = OpenAiClient::new(&spawn_stub(router).await, "ollama");

        let err = client
            .generate("nope", "p", GenerationMode::Chat)
            .await
            .unwrap_err();
        assert!(err.message().contains("404"));
        assert!(err.message().contains("model \"nope\" not found"));
    }

    #[tokio::test]
    async fn malformed_body_is_an_error() {
        let router = Router::new().route("/v1/chat/completions", post(|| async { "not json" }));
        let client = OpenAiClient::new(&spawn_stub(router).await, "ollama");

        let err = client
            .generate("m", "p", GenerationMode::Chat)
            .await
            .unwrap_err();
        assert!(err.message().starts_with("invalid response from model server"));
    }

    #[tokio::test]
    async fn connection_refused_is_an_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = OpenAiClient::new(&format!("http://{addr}/v1"), "ollama");
        assert!(
            client
                .generate("m", "p", GenerationMode::Chat)
                .await
                .is_err()
        );
    }

    #[test]
    fn trailing_slash_is_normalized() {
        let client = OpenAiClient::new("http://localhost:11434/v1/", "ollama");
        assert_eq!(client.base_url(), "http://localhost:11434/v1");
        assert_eq!(
            client.endpoint("chat/completions"),
            "http://localhost:11434/v1/chat/completions"
        );
    }
}
