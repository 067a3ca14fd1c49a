use askgemini::{EnvLoader, GeminiClient, Result, app};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 日志写到标准错误，标准输出只留给回答
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let loader = EnvLoader::load();
    app::run(&loader, GeminiClient::new, &mut std::io::stdout()).await
}
