use crate::error::{BookDistillerError, Result};
use crate::types::{ModelConfig, PageKnowledge};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

const EXTRACT_SYSTEM_PROMPT: &str = "\
Analyze this page as if you are studying the book it comes from.

Skip pages that contain:
- Table of contents
- Chapter listings
- Index pages
- Blank pages
- Copyright information
- Publishing details
- References or bibliography
- Acknowledgments

Extract knowledge when the page contains:
- Preface content explaining important concepts
- Actual educational content
- Key definitions and concepts
- Important arguments or theories
- Examples and case studies
- Significant findings or conclusions
- Methodologies or frameworks
- Critical analysis or interpretation

For valid content:
- Set has_content to true
- Extract detailed, learnable knowledge points
- Include important quotes or key statements
- Capture examples together with their context
- Preserve technical terms and definitions

For pages to skip:
- Set has_content to false
- Return an empty knowledge list";

const SUMMARY_SYSTEM_PROMPT: &str = "\
Create a comprehensive summary of the provided content in a concise but detailed markdown format.

Use markdown formatting:
- ## for main sections
- ### for subsections
- Bullet points for lists
- `code blocks` for any code or formulas
- **bold** for emphasis
- *italics* for terminology
- > blockquotes for important notes

Return only the summary itself, with nothing before or after it.";

/// Judges a single page and extracts its knowledge points.
#[async_trait]
pub trait PageAnalyzer: Send + Sync {
    async fn analyze_page(&self, page_text: &str) -> Result<PageKnowledge>;
}

/// Condenses accumulated knowledge points into a markdown summary.
#[async_trait]
pub trait KnowledgeSummarizer: Send + Sync {
    async fn summarize(&self, knowledge: &[String]) -> Result<String>;
}

/// Both capabilities backed by an OpenAI-compatible chat completions API.
///
/// Page analysis uses a strict JSON schema response format so the reply is
/// machine-parseable; summaries are plain completions.
pub struct OpenAiAnalyzer {
    client: reqwest::Client,
    config: ModelConfig,
}

impl OpenAiAnalyzer {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    async fn chat(&self, body: Value) -> Result<String> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        let payload: Value = response.json().await?;
        Self::message_content(&payload)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v["error"]["message"].as_str().map(|s| s.to_string()))
            .unwrap_or(body);
        Err(BookDistillerError::Api {
            status: status.as_u16(),
            message,
        })
    }

    fn message_content(payload: &Value) -> Result<String> {
        payload["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| BookDistillerError::ModelResponse {
                reason: "missing choices[0].message.content".to_string(),
            })
    }

    fn parse_page_knowledge(content: &str) -> Result<PageKnowledge> {
        let mut page: PageKnowledge =
            serde_json::from_str(content).map_err(|e| BookDistillerError::ModelResponse {
                reason: format!("page analysis is not valid JSON: {}", e),
            })?;
        // A page judged content-free contributes nothing, whatever the model
        // put in the list.
        if !page.has_content {
            page.knowledge.clear();
        }
        Ok(page)
    }

    fn extraction_body(&self, page_text: &str) -> Value {
        json!({
            "model": self.config.extract_model,
            "messages": [
                {"role": "system", "content": EXTRACT_SYSTEM_PROMPT},
                {"role": "user", "content": format!("Page text: {}", page_text)}
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": "page_knowledge",
                    "strict": true,
                    "schema": {
                        "type": "object",
                        "properties": {
                            "has_content": {"type": "boolean"},
                            "knowledge": {
                                "type": "array",
                                "items": {"type": "string"}
                            }
                        },
                        "required": ["has_content", "knowledge"],
                        "additionalProperties": false
                    }
                }
            }
        })
    }

    fn summary_body(&self, knowledge: &[String]) -> Value {
        json!({
            "model": self.config.summary_model,
            "messages": [
                {"role": "system", "content": SUMMARY_SYSTEM_PROMPT},
                {"role": "user", "content": format!("Analyze this content:\n{}", knowledge.join("\n"))}
            ]
        })
    }
}

#[async_trait]
impl PageAnalyzer for OpenAiAnalyzer {
    async fn analyze_page(&self, page_text: &str) -> Result<PageKnowledge> {
        debug!(
            "Requesting page analysis from model '{}'",
            self.config.extract_model
        );
        let content = self.chat(self.extraction_body(page_text)).await?;
        Self::parse_page_knowledge(&content)
    }
}

#[async_trait]
impl KnowledgeSummarizer for OpenAiAnalyzer {
    async fn summarize(&self, knowledge: &[String]) -> Result<String> {
        debug!(
            "Requesting summary of {} knowledge points from model '{}'",
            knowledge.len(),
            self.config.summary_model
        );
        self.chat(self.summary_body(knowledge)).await
    }
}
