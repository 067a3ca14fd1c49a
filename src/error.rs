//! 错误处理模块

use crate::types::ApiErrorEnvelope;
use reqwest::StatusCode;
use thiserror::Error;

/// askgemini 的统一错误类型
///
/// 除了写标准输出时的 IO 错误之外，所有变体都来自那一次远程调用。
/// 程序不做任何本地恢复，错误一路传播到 `main`。
#[derive(Debug, Error)]
pub enum AskError {
    /// HTTP 请求相关错误（网络不可达、连接被拒绝等）
    #[error("HTTP请求失败: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON 序列化/反序列化错误
    #[error("JSON处理错误: {0}")]
    Json(String),

    /// 其他 API 服务端错误
    #[error("API错误 ({status}): {message}")]
    Api { status: u16, message: String },

    /// 请求超时错误
    #[error("请求超时")]
    Timeout,

    /// 响应内容为空
    #[error("响应内容为空")]
    NoContent,

    /// 提示被服务端安全策略拦截
    #[error("提示被拦截: {0}")]
    Blocked(String),

    /// API 请求频率限制或配额耗尽
    #[error("请求频率超限: {0}")]
    RateLimit(String),

    /// 身份验证失败（密钥缺失或无效）
    #[error("身份验证失败: {0}")]
    Auth(String),

    /// 指定的模型不存在
    #[error("模型不存在: {0}")]
    ModelNotFound(String),

    /// 请求参数无效
    #[error("请求参数无效: {0}")]
    InvalidRequest(String),

    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// askgemini 的 Result 类型别名
pub type Result<T> = std::result::Result<T, AskError>;

impl From<serde_json::Error> for AskError {
    fn from(e: serde_json::Error) -> Self {
        AskError::Json(e.to_string())
    }
}

impl AskError {
    /// 将传输层错误归类，超时单独区分出来
    pub(crate) fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AskError::Timeout
        } else {
            AskError::Http(e)
        }
    }

    /// 根据非 2xx 状态码和响应体构造错误
    ///
    /// 响应体优先按 Google 的错误信封 `{"error": {...}}` 解析，
    /// 解析失败时直接使用原始文本。
    pub(crate) fn from_status(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ApiErrorEnvelope>(body)
            .map(|env| env.error.message)
            .unwrap_or_else(|_| body.trim().to_string());
        let message = if message.is_empty() {
            status.to_string()
        } else {
            message
        };

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AskError::Auth(message),
            // 无效密钥时服务端返回 400 INVALID_ARGUMENT
            StatusCode::BAD_REQUEST if message.contains("API key") => AskError::Auth(message),
            StatusCode::BAD_REQUEST => AskError::InvalidRequest(message),
            StatusCode::NOT_FOUND => AskError::ModelNotFound(message),
            StatusCode::TOO_MANY_REQUESTS => AskError::RateLimit(message),
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => AskError::Timeout,
            _ => AskError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }
}
