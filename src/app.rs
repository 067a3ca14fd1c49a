//! 入口流程模块
use crate::{
    client::ChatModel,
    config::{Config, EnvLoader},
    error::Result,
};
use log::info;
use std::io::Write;

/// 固定的提示
pub const PROMPT: &str = "Who is Mahatma Gandhi?";

/// 执行一次问答
///
/// 读取配置，调用 `build_client` 构造客户端，用 [`PROMPT`] 调用一次，
/// 把响应文本加换行写入 `out`。任何错误都直接返回，此时不写任何内容。
pub async fn run<M, F, W>(loader: &EnvLoader, build_client: F, out: &mut W) -> Result<()>
where
    M: ChatModel,
    F: FnOnce(Config) -> M,
    W: Write,
{
    let config = Config::from_loader(loader);
    info!("Asking {}", config.model());
    let client = build_client(config);

    let response = client.invoke(PROMPT).await?;
    writeln!(out, "{}", response.content)?;
    out.flush()?;
    Ok(())
}
