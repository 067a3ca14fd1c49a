//! # askgemini - 一次性 Gemini 问答
//!
//! 从环境变量（或 `.env` 文件）读取 `GOOGLE_API_KEY`，
//! 向 `gemini-2.5-pro` 发送一个固定的问题，并把回答打印到标准输出。
//!
//! 没有重试、没有流式输出、没有多轮对话：一次加载、一次调用、一次打印。
//! 库目标只是为了让入口流程可以注入假客户端进行测试。
//!
//! ## 快速开始
//!
//! ```rust,no_run
//! use askgemini::{app, EnvLoader, GeminiClient, Result};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<()> {
//!     let loader = EnvLoader::load();
//!     let mut stdout = std::io::stdout();
//!     app::run(&loader, GeminiClient::new, &mut stdout).await
//! }
//! ```

// 模块定义
pub mod app;
pub mod client;
pub mod config;
pub mod error;
pub mod types;
pub mod utils;

pub use client::{ChatModel, GeminiClient};
pub use config::{Config, EnvLoader};
pub use error::{AskError, Result};
pub use types::ModelResponse;
