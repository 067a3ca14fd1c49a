//! API 数据结构模块

use serde::{Deserialize, Serialize};

// ================================================================================================
// API 请求结构
// ================================================================================================

/// `generateContent` 请求体
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// 对话内容
    pub contents: Vec<Content>,
    /// 系统指令
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    /// 生成参数
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// 一条消息内容
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Content {
    /// 角色，系统指令不带角色
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// 内容片段
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// 内容片段，这里只关心文本
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Part {
    /// 文本
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// 是否为思考过程
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub thought: bool,
}

/// 角色枚举
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// 用户
    #[default]
    User,
    /// 模型
    Model,
}

/// 生成参数
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i32>,
}

impl GenerationConfig {
    /// 所有参数均未设置
    pub fn is_empty(&self) -> bool {
        self == &GenerationConfig::default()
    }
}

// ================================================================================================
// API 响应结构
// ================================================================================================

/// `generateContent` 响应体
#[derive(Debug, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// 候选结果
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// 提示反馈，提示被拦截时出现
    pub prompt_feedback: Option<PromptFeedback>,
    /// token 使用情况
    #[serde(default)]
    pub usage_metadata: UsageMetadata,
    /// 实际使用的模型版本
    pub model_version: Option<String>,
}

/// 候选结果
#[derive(Debug, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// 生成内容
    #[serde(default)]
    pub content: Content,
    /// 结束原因
    pub finish_reason: Option<String>,
    /// 索引
    #[serde(default)]
    pub index: u32,
}

/// 提示反馈
#[derive(Debug, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// 拦截原因
    pub block_reason: Option<String>,
}

/// token 使用情况
#[derive(Debug, Deserialize, Serialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// 提示 token 数量
    #[serde(default)]
    pub prompt_token_count: u32,
    /// 输出 token 数量
    #[serde(default)]
    pub candidates_token_count: u32,
    /// 思考 token 数量
    #[serde(default)]
    pub thoughts_token_count: u32,
    /// 总 token 数量
    #[serde(default)]
    pub total_token_count: u32,
}

/// Google API 错误信封
#[derive(Debug, Deserialize)]
pub struct ApiErrorEnvelope {
    pub error: ApiErrorDetail,
}

/// 错误详情
#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}

// ================================================================================================
// 应用内部数据模型
// ================================================================================================

/// 请求统计信息
#[derive(Debug, Clone, Default)]
pub struct RequestStats {
    /// 请求耗时（毫秒）
    pub duration_ms: u64,
    /// token 使用情况
    pub usage: UsageMetadata,
    /// 使用的模型名称
    pub model: String,
}

/// 一次调用的结果
///
/// `content` 即打印到标准输出的文本，其余字段只读
#[derive(Debug, Clone, Default)]
pub struct ModelResponse {
    /// 生成的文本内容
    pub content: String,
    /// 结束原因
    pub finish_reason: Option<String>,
    /// 请求统计信息
    pub stats: RequestStats,
}

impl ModelResponse {
    /// 只带文本的响应
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }
}
