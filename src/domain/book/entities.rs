//! Book Context - Entities
//!
//! 大纲与章节实体：Provider 先产出 Outline（章节桩），
//! 再为每个桩生成正文，配对成完整 Chapter

use serde::{Deserialize, Serialize};

/// 章节桩：正文生成前的章节骨架
///
/// 由 Provider 在大纲阶段产出，之后不可变
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterStub {
    /// 大纲内唯一的章节编号
    pub id: i64,
    /// 章节标题
    pub title: String,
    /// 情节概要（用于正文生成的提示）
    pub summary: String,
}

/// 完整章节：桩 + 生成的正文
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: i64,
    pub title: String,
    pub summary: String,
    /// 生成的章节正文
    pub content: String,
}

impl Chapter {
    /// 将章节桩与生成的正文配对
    pub fn from_stub(stub: ChapterStub, content: String) -> Self {
        Self {
            id: stub.id,
            title: stub.title,
            summary: stub.summary,
            content,
        }
    }
}

/// 书籍大纲
///
/// Provider 对一次生成只产出一份，之后只读。
/// 可选字段缺失不算错误，组装时按规则回退：
/// - title 缺失 -> 用户输入的标题
/// - genre 缺失 -> 常量默认值
/// - description 缺失 -> 空字符串
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// 章节桩序列，顺序即成书章节顺序，允许为空
    #[serde(default)]
    pub chapters: Vec<ChapterStub>,
}

impl Outline {
    /// 章节数
    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }
}
