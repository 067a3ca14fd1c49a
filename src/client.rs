//! Gemini 客户端核心模块
use crate::{
    config::Config,
    error::{AskError, Result},
    types::{
        GenerateContentRequest, GenerateContentResponse, GenerationConfig, ModelResponse,
        RequestStats, Role,
    },
    utils::{candidate_text, content},
};
use log::{debug, error};
use reqwest::{
    Client,
    header::{CONTENT_TYPE, HeaderMap, HeaderValue},
};
use std::future::Future;
use std::time::Instant;

const API_KEY_HEADER: &str = "x-goog-api-key";

// ================================================================================================
// 模型调用接口
// ================================================================================================

/// 可以回答单个提示的模型
///
/// 入口流程对该 trait 泛型，测试中用假实现替换真实客户端
pub trait ChatModel {
    /// 发送提示并返回响应
    fn invoke(&self, prompt: &str) -> impl Future<Output = Result<ModelResponse>> + Send;
}

// ================================================================================================
// 核心客户端
// ================================================================================================

/// Gemini 客户端
///
/// 绑定一个模型名称和凭据，每次 `invoke` 发送一次 `generateContent` 请求，不做重试
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    config: Config,
}

impl GeminiClient {
    /// 创建一个新的 `GeminiClient` 实例
    pub fn new(config: Config) -> Self {
        let mut builder = Client::builder()
            .pool_idle_timeout(config.pool_idle_timeout)
            .tcp_keepalive(config.tcp_keepalive)
            .tcp_nodelay(config.tcp_nodelay);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().unwrap_or_else(|e| {
            error!("Failed to build reqwest client: {}", e);
            Client::new()
        });

        Self { client, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        )
    }

    /// 构建 API 请求所需的 HTTP 标头
    ///
    /// 没有凭据时不带密钥标头，由服务端拒绝
    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(key) = &self.config.api_key {
            let mut value = HeaderValue::from_str(key)
                .map_err(|e| AskError::Auth(format!("Invalid API key: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(API_KEY_HEADER, value);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    fn build_request(&self, prompt: &str) -> GenerateContentRequest {
        let generation_config = GenerationConfig {
            temperature: self.config.temperature,
            top_p: self.config.top_p,
            max_output_tokens: self.config.max_output_tokens,
            seed: self.config.random_seed,
        };

        GenerateContentRequest {
            contents: vec![content(Some(Role::User), prompt)],
            system_instruction: self
                .config
                .system_instruction
                .as_deref()
                .map(|s| content(None, s)),
            generation_config: (!generation_config.is_empty()).then_some(generation_config),
        }
    }

    /// 发送请求，非 2xx 状态码转换为对应的错误
    async fn call_api(&self, body: &GenerateContentRequest) -> Result<GenerateContentResponse> {
        let endpoint = self.endpoint();
        debug!("POST {}", endpoint);

        let response = self
            .client
            .post(&endpoint)
            .headers(self.build_headers()?)
            .json(body)
            .send()
            .await
            .map_err(AskError::from_transport)?;

        let status = response.status();
        let text = response.text().await.map_err(AskError::from_transport)?;
        if !status.is_success() {
            debug!("Request failed with status: {}", status);
            return Err(AskError::from_status(status, &text));
        }

        Ok(serde_json::from_str(&text)?)
    }

    /// 为给定的提示生成响应，包括性能统计信息
    pub async fn generate_with_stats(&self, prompt: &str) -> Result<ModelResponse> {
        let start_time = Instant::now();
        let request = self.build_request(prompt);
        let response = self.call_api(&request).await?;

        let Some(candidate) = response.candidates.first() else {
            return Err(response
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .map_or(AskError::NoContent, AskError::Blocked));
        };

        let stats = RequestStats {
            duration_ms: start_time.elapsed().as_millis() as u64,
            usage: response.usage_metadata,
            model: response
                .model_version
                .clone()
                .unwrap_or_else(|| self.config.model.clone()),
        };
        debug!(
            "Received {} candidate tokens in {} ms",
            stats.usage.candidates_token_count, stats.duration_ms
        );

        Ok(ModelResponse {
            content: candidate_text(candidate),
            finish_reason: candidate.finish_reason.clone(),
            stats,
        })
    }

    /// 为给定的提示生成响应文本
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_stats(prompt)
            .await
            .map(|res| res.content)
    }

    /// 只接受本地地址、不走代理的客户端
    #[cfg(test)]
    pub(crate) fn without_proxy(config: Config) -> Self {
        let client = Client::builder().no_proxy().build().unwrap();
        Self { client, config }
    }
}

impl ChatModel for GeminiClient {
    async fn invoke(&self, prompt: &str) -> Result<ModelResponse> {
        self.generate_with_stats(prompt).await
    }
}
