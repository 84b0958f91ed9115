//! HTTP Provider Client - 调用外部生成式内容服务
//!
//! 实现 ContentProviderPort trait，通过 HTTP 调用 Gemini 风格的
//! generateContent REST API
//!
//! 外部 API:
//! POST {base_url}/v1beta/models/{model}:generateContent
//! Request: {"contents":[{"parts":[{"text":"..."}]}], "generationConfig": {...}}  (JSON)
//! Response: {"candidates":[{"content":{"parts":[{"text":"..."} | {"inlineData":{...}}]}}]}
//!
//! 大纲以 JSON 文本返回并在本地解析；封面以 inline base64 图片返回，
//! 拼为 data URL。响应成功但缺少图片 part 时回退为占位图 URL。

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use crate::application::ports::{ContentProviderPort, CoverRequest, ProviderError};
use crate::domain::book::{ChapterStub, Outline};

/// 大纲提示词
const OUTLINE_PROMPT: &str = "ACT AS A WORLD-CLASS PUBLISHING EDITOR.\n\
    Generate a high-end book outline for a title: \"{title}\" by \"{author}\".\n\
    Create exactly 7 chapters that form a cohesive and thrilling narrative arc.\n\
    Include a genre and a sophisticated back-cover description that hooks a potential reader.\n\
    Respond with a single JSON object: {\"title\", \"genre\", \"description\", \
    \"chapters\": [{\"id\", \"title\", \"summary\"}]}.";

/// 章节正文提示词
const CHAPTER_PROMPT: &str = "ACT AS AN AWARD-WINNING NOVELIST.\n\
    Write a complete chapter for the book \"{book_title}\".\n\
    Chapter Title: \"{chapter_title}\"\n\
    Key Plot Event: {summary}\n\
    REQUIREMENTS:\n\
    - Minimum 1000 words.\n\
    - Immersive descriptive prose.\n\
    - Engaging dialogue.\n\
    - Professional literary pacing.";

/// 封面提示词
const COVER_PROMPT: &str = "A professional book cover illustration for a {genre} novel \
    titled \"{title}\" by {author}.\nTheme: {description}.\n\
    No text in the image. High-end, museum quality art.";

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_config: Option<ImageConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig {
    aspect_ratio: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    text: Option<String>,
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: Option<String>,
    data: String,
}

impl GenerateContentRequest {
    fn text_prompt(prompt: String) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: None,
        }
    }

    fn with_json_response(mut self) -> Self {
        self.generation_config = Some(GenerationConfig {
            response_mime_type: Some("application/json".to_string()),
            image_config: None,
        });
        self
    }

    fn with_image_response(mut self) -> Self {
        self.generation_config = Some(GenerationConfig {
            response_mime_type: None,
            image_config: Some(ImageConfig {
                aspect_ratio: "3:4".to_string(),
            }),
        });
        self
    }
}

impl GenerateContentResponse {
    /// 提取第一个文本 part
    fn first_text(&self) -> Option<&str> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
            .find_map(|p| p.text.as_deref())
    }

    /// 提取第一个 inline 图片 part，拼为 data URL
    fn first_image_data_url(&self) -> Option<String> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
            .find_map(|p| p.inline_data.as_ref())
            .map(|inline| {
                let mime = inline.mime_type.as_deref().unwrap_or("image/png");
                format!("data:{};base64,{}", mime, inline.data)
            })
    }
}

/// 模型偶尔无视 responseMimeType，把 JSON 包进 markdown 代码栅栏里
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

// ============================================================================
// Client
// ============================================================================

/// HTTP Provider 客户端配置
#[derive(Debug, Clone)]
pub struct HttpProviderConfig {
    /// 生成服务基础 URL
    pub base_url: String,
    /// API Key
    pub api_key: String,
    /// 大纲生成模型
    pub outline_model: String,
    /// 章节正文生成模型
    pub chapter_model: String,
    /// 封面图片生成模型
    pub image_model: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_key: String::new(),
            outline_model: "gemini-3-flash-preview".to_string(),
            chapter_model: "gemini-3-pro-preview".to_string(),
            image_model: "gemini-2.5-flash-image".to_string(),
            timeout_secs: 120,
        }
    }
}

impl HttpProviderConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// HTTP Provider 客户端
///
/// 三类调用共用一个 reqwest Client，调用间无共享可变状态
pub struct HttpProviderClient {
    client: Client,
    config: HttpProviderConfig,
}

impl HttpProviderClient {
    /// 创建新的 HTTP Provider 客户端
    pub fn new(config: HttpProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn model_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, model
        )
    }

    /// 发送一次 generateContent 调用并解析响应 envelope
    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError> {
        let url = self.model_url(model);
        tracing::debug!(url = %url, "Sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout
                } else if e.is_connect() {
                    ProviderError::NetworkError(format!(
                        "Cannot connect to provider: {}",
                        e
                    ))
                } else {
                    ProviderError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl ContentProviderPort for HttpProviderClient {
    async fn generate_outline(
        &self,
        title: &str,
        author: &str,
    ) -> Result<Outline, ProviderError> {
        let prompt = OUTLINE_PROMPT
            .replace("{title}", title)
            .replace("{author}", author);
        let request = GenerateContentRequest::text_prompt(prompt).with_json_response();

        let response = self.generate(&self.config.outline_model, &request).await?;
        let text = response
            .first_text()
            .ok_or_else(|| ProviderError::InvalidResponse("no text part in outline response".to_string()))?;

        let outline: Outline = serde_json::from_str(strip_code_fences(text))
            .map_err(|e| ProviderError::InvalidResponse(format!("outline is not valid JSON: {}", e)))?;

        tracing::info!(
            chapters = outline.chapter_count(),
            genre = ?outline.genre,
            "Outline generated"
        );
        Ok(outline)
    }

    async fn generate_chapter_text(
        &self,
        book_title: &str,
        stub: &ChapterStub,
    ) -> Result<String, ProviderError> {
        let prompt = CHAPTER_PROMPT
            .replace("{book_title}", book_title)
            .replace("{chapter_title}", &stub.title)
            .replace("{summary}", &stub.summary);
        let request = GenerateContentRequest::text_prompt(prompt);

        let response = self.generate(&self.config.chapter_model, &request).await?;
        let text = response
            .first_text()
            .ok_or_else(|| ProviderError::InvalidResponse("no text part in chapter response".to_string()))?;

        tracing::info!(
            chapter_id = stub.id,
            content_len = text.len(),
            "Chapter text generated"
        );
        Ok(text.to_string())
    }

    async fn generate_cover_image(&self, cover: CoverRequest) -> Result<String, ProviderError> {
        let prompt = COVER_PROMPT
            .replace("{genre}", &cover.genre)
            .replace("{title}", &cover.title)
            .replace("{author}", &cover.author)
            .replace("{description}", &cover.description);
        let request = GenerateContentRequest::text_prompt(prompt).with_image_response();

        let response = self.generate(&self.config.image_model, &request).await?;

        // 响应成功但没有图片 part 时回退占位图，不判失败
        let url = response.first_image_data_url().unwrap_or_else(|| {
            tracing::warn!("Cover response carried no image part, using placeholder");
            format!("https://picsum.photos/600/800?random={}", Uuid::new_v4())
        });

        tracing::info!(url_len = url.len(), "Cover image generated");
        Ok(url)
    }

    async fn health_check(&self) -> bool {
        // generateContent API 无专用健康检查端点，探测基础 URL 可达性
        self.client
            .get(&self.config.base_url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = HttpProviderConfig::default();
        assert_eq!(config.base_url, "https://generativelanguage.googleapis.com");
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn test_config_builder() {
        let config = HttpProviderConfig::new("http://provider.local:9000", "k").with_timeout(60);
        assert_eq!(config.base_url, "http://provider.local:9000");
        assert_eq!(config.api_key, "k");
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn test_response_text_extraction() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "hello"}]}}
            ]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.first_text(), Some("hello"));
        assert!(response.first_image_data_url().is_none());
    }

    #[test]
    fn test_response_image_extraction() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [
                    {"inlineData": {"mimeType": "image/png", "data": "QUJD"}}
                ]}}
            ]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            response.first_image_data_url().as_deref(),
            Some("data:image/png;base64,QUJD")
        );
    }

    #[test]
    fn test_empty_response_has_no_parts() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(response.first_text().is_none());
        assert!(response.first_image_data_url().is_none());
    }

    #[test]
    fn test_outline_request_serializes_camel_case() {
        let request =
            GenerateContentRequest::text_prompt("p".to_string()).with_json_response();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(json["contents"][0]["parts"][0]["text"], "p");
    }
}
