//! Fake Provider Client - 测试用内容生成客户端
//!
//! 返回确定性的罐头大纲/正文/封面，不调用远程服务。
//! 支持按操作注入失败，用于驱动管线的失败路径测试。

use async_trait::async_trait;
use tokio::time::{sleep, Duration};

use crate::application::ports::{ContentProviderPort, CoverRequest, ProviderError};
use crate::domain::book::{ChapterStub, Outline};

/// Fake Provider 配置
#[derive(Debug, Clone)]
pub struct FakeProviderConfig {
    /// 罐头大纲的章节数
    pub chapter_count: usize,
    /// 每次调用的模拟延迟（毫秒）
    pub latency_ms: u64,
    /// 大纲调用直接失败
    pub fail_outline: bool,
    /// 生成到第 N 章（1 起）时失败
    pub fail_chapter: Option<usize>,
    /// 封面调用直接失败
    pub fail_cover: bool,
}

impl Default for FakeProviderConfig {
    fn default() -> Self {
        Self {
            chapter_count: 3,
            latency_ms: 5,
            fail_outline: false,
            fail_chapter: None,
            fail_cover: false,
        }
    }
}

/// Fake Provider Client
///
/// 大纲回显输入标题，正文/封面为固定格式的罐头内容
pub struct FakeProviderClient {
    config: FakeProviderConfig,
}

impl FakeProviderClient {
    pub fn new(config: FakeProviderConfig) -> Self {
        Self { config }
    }

    async fn simulate_latency(&self) {
        if self.config.latency_ms > 0 {
            sleep(Duration::from_millis(self.config.latency_ms)).await;
        }
    }
}

#[async_trait]
impl ContentProviderPort for FakeProviderClient {
    async fn generate_outline(
        &self,
        title: &str,
        _author: &str,
    ) -> Result<Outline, ProviderError> {
        self.simulate_latency().await;
        if self.config.fail_outline {
            return Err(ProviderError::ServiceError(
                "fake outline failure".to_string(),
            ));
        }

        let chapters = (1..=self.config.chapter_count as i64)
            .map(|id| ChapterStub {
                id,
                title: format!("Chapter {}", id),
                summary: format!("Events of chapter {}", id),
            })
            .collect();

        Ok(Outline {
            title: Some(title.to_string()),
            genre: Some("Speculative Fiction".to_string()),
            description: Some(format!("A generated story called \"{}\".", title)),
            chapters,
        })
    }

    async fn generate_chapter_text(
        &self,
        book_title: &str,
        stub: &ChapterStub,
    ) -> Result<String, ProviderError> {
        self.simulate_latency().await;
        if self.config.fail_chapter == Some(stub.id as usize) {
            return Err(ProviderError::ServiceError(format!(
                "fake chapter failure at {}",
                stub.id
            )));
        }

        Ok(format!(
            "Generated prose for chapter {} (\"{}\") of \"{}\".",
            stub.id, stub.title, book_title
        ))
    }

    async fn generate_cover_image(&self, request: CoverRequest) -> Result<String, ProviderError> {
        self.simulate_latency().await;
        if self.config.fail_cover {
            return Err(ProviderError::ServiceError("fake cover failure".to_string()));
        }

        Ok(format!(
            "https://covers.invalid/{}.png",
            request.title.split_whitespace().collect::<Vec<_>>().join("_")
        ))
    }
}
