use std::time::Duration;

use async_trait::async_trait;
use coach_core::config::GeneratorConfig;
use coach_core::plan::Plan;
use coach_core::request::GenerationRequest;

use crate::prompt::SYSTEM_PROMPT;
use crate::types::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig};
use crate::{AgentError, Result};

// ─── Trait ────────────────────────────────────────────────────────────────

/// Something that turns a generation request into a plan.
#[async_trait]
pub trait PlanGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<Plan>;
}

// ─── GeminiClient ─────────────────────────────────────────────────────────

/// HTTP client for the `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
    temperature: f32,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, config: &GeneratorConfig) -> Result<Self> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(AgentError::MissingCredential);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| AgentError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            temperature: config.temperature,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    pub(crate) fn build_body(&self, request: &GenerationRequest) -> Result<GenerateContentRequest> {
        let input = serde_json::to_string(request)
            .map_err(|e| AgentError::Config(format!("failed to encode request: {e}")))?;
        Ok(GenerateContentRequest {
            system_instruction: Content::text("system", SYSTEM_PROMPT),
            contents: vec![Content::text("user", input)],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                response_mime_type: "application/json".to_string(),
            },
        })
    }
}

/// Turn a response body into a plan.
pub(crate) fn parse_plan(body: &str) -> Result<Plan> {
    let data: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| AgentError::MalformedResponse(e.to_string()))?;
    let text = data.first_text().ok_or(AgentError::EmptyResponse)?;
    serde_json::from_str(text).map_err(|e| AgentError::invalid_plan(text, e))
}

#[async_trait]
impl PlanGenerator for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<Plan> {
        let body = self.build_body(request)?;
        tracing::info!(model = %self.model, date = %request.date, "requesting plan");

        let resp = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "plan generator returned an error");
            return Err(AgentError::Upstream {
                status: status.as_u16(),
                body: text,
            });
        }

        let plan = parse_plan(&text)?;
        tracing::info!(date = %plan.date, tasks = plan.tasks.len(), "plan received");
        Ok(plan)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use coach_core::config::Config;
    use coach_core::request::GenerationInputs;
    use coach_core::summary::RollingSummary;
    use mockito::Matcher;

    const PLAN_TEXT: &str = r#"{"date":"2024-06-01","tasks":[{"id":"t1","title":"Stretch","points":5}],"prayer_checklist":{"items":[{"name":"Fajr","tip":""}],"consistency_tip":"tip"}}"#;

    fn request() -> GenerationRequest {
        let today = coach_core::paths::parse_date("2024-06-01").unwrap();
        GenerationRequest::build(
            &Config::default(),
            &RollingSummary::default(),
            today,
            GenerationInputs::default(),
        )
    }

    fn config(base_url: &str) -> GeneratorConfig {
        GeneratorConfig {
            base_url: base_url.to_string(),
            ..GeneratorConfig::default()
        }
    }

    fn envelope(text: &str) -> String {
        serde_json::json!({
            "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
        })
        .to_string()
    }

    #[test]
    fn empty_credential_is_rejected() {
        let err = GeminiClient::new("   ", &GeneratorConfig::default()).unwrap_err();
        assert!(matches!(err, AgentError::MissingCredential));
        assert!(!err.is_upstream());
    }

    #[test]
    fn endpoint_includes_model() {
        let client = GeminiClient::new("AIzaKey", &config("http://localhost:1/")).unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:1/v1beta/models/gemini-1.5-pro-latest:generateContent"
        );
    }

    #[test]
    fn body_carries_prompt_and_request() {
        let client = GeminiClient::new("AIzaKey", &GeneratorConfig::default()).unwrap();
        let body = serde_json::to_value(client.build_body(&request()).unwrap()).unwrap();
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["contents"][0]["role"], "user");
        let input: serde_json::Value =
            serde_json::from_str(body["contents"][0]["parts"][0]["text"].as_str().unwrap()).unwrap();
        assert_eq!(input["date"], "2024-06-01");
        assert!(body["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("prayer_checklist"));
    }

    #[test]
    fn parse_plan_reads_first_candidate() {
        let plan = parse_plan(&envelope(PLAN_TEXT)).unwrap();
        assert_eq!(plan.date, "2024-06-01");
        assert_eq!(plan.tasks[0].points, 5);
    }

    #[test]
    fn parse_plan_errors() {
        assert!(matches!(
            parse_plan(r#"{"candidates":[]}"#),
            Err(AgentError::EmptyResponse)
        ));
        assert!(matches!(
            parse_plan(&envelope("   ")),
            Err(AgentError::EmptyResponse)
        ));
        assert!(matches!(
            parse_plan("<html>"),
            Err(AgentError::MalformedResponse(_))
        ));
        let err = parse_plan(&envelope("Sure! Here is your plan")).unwrap_err();
        assert!(matches!(err, AgentError::InvalidPlan { .. }));
        assert!(err.is_upstream());
    }

    #[test]
    fn invalid_plan_truncates_raw_text() {
        let long = "x".repeat(5000);
        let AgentError::InvalidPlan { raw, .. } = parse_plan(&envelope(&long)).unwrap_err() else {
            panic!("expected InvalidPlan");
        };
        assert_eq!(raw.len(), crate::error::RAW_EXCERPT_LEN);
    }

    #[tokio::test]
    async fn generate_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock(
                "POST",
                Matcher::Regex(r"^/v1beta/models/gemini-1.5-pro-latest:generateContent".into()),
            )
            .match_query(Matcher::UrlEncoded("key".into(), "AIzaTest".into()))
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(envelope(PLAN_TEXT))
            .create_async()
            .await;

        let client = GeminiClient::new("AIzaTest", &config(&server.url())).unwrap();
        let plan = client.generate(&request()).await.unwrap();
        assert_eq!(plan.tasks.len(), 1);
        assert_eq!(plan.prayer_checklist.consistency_tip, "tip");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn generate_surfaces_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .with_status(403)
            .with_body(r#"{"error":{"message":"API key not valid"}}"#)
            .expect(1)
            .create_async()
            .await;

        let client = GeminiClient::new("AIzaBad", &config(&server.url())).unwrap();
        let err = client.generate(&request()).await.unwrap_err();
        match &err {
            AgentError::Upstream { status, body } => {
                assert_eq!(*status, 403);
                assert!(body.contains("API key not valid"));
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
        // Exactly one request: failures are not retried.
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn transport_error_hides_api_key() {
        let key = "AIzaSecretKey123456";
        let client = GeminiClient::new(key, &config("http://127.0.0.1:1")).unwrap();
        let err = client.generate(&request()).await.unwrap_err();
        assert!(matches!(err, AgentError::Http(_)));

        let mut chain = vec![err.to_string(), format!("{err:?}")];
        let mut source = std::error::Error::source(&err);
        while let Some(e) = source {
            chain.push(e.to_string());
            source = e.source();
        }
        for text in &chain {
            assert!(!text.contains(key), "key leaked in: {text}");
        }
    }

    #[tokio::test]
    async fn generate_empty_candidates() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", Matcher::Any)
            .with_status(200)
            .with_body(r#"{"candidates":[]}"#)
            .create_async()
            .await;

        let client = GeminiClient::new("AIzaTest", &config(&server.url())).unwrap();
        let err = client.generate(&request()).await.unwrap_err();
        assert!(matches!(err, AgentError::EmptyResponse));
    }
}
