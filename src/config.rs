//! 配置模块
use dotenvy::Error as DotenvError;
use log::{debug, warn};
use nanorand::{Rng, WyRand};
use std::collections::HashMap;
use std::env;
use std::path::Path;
use std::time::Duration;

/// 默认模型
pub const MODEL: &str = "gemini-2.5-pro";
/// 凭据所在的环境变量
pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";
/// 可选的 API 地址覆盖
pub const API_BASE_VAR: &str = "GOOGLE_API_BASE";
/// 默认 API 地址
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

// ===============================================================================================
// 环境变量加载
// ===============================================================================================

/// 环境变量加载器
///
/// 读取 `.env` 文件中的 `KEY=VALUE`，查询时进程环境变量优先。
/// 文件不存在时静默忽略，文件格式错误时记录警告并保留已读到的条目。
#[derive(Debug, Clone)]
pub struct EnvLoader {
    file_vars: HashMap<String, String>,
    process_env: bool,
}

impl EnvLoader {
    /// 从当前目录（及其上级目录）的 `.env` 文件加载
    pub fn load() -> Self {
        Self::collect(dotenvy::dotenv_iter())
    }

    /// 从指定的文件加载
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self::collect(dotenvy::from_path_iter(path.as_ref()))
    }

    /// 只查询文件中的条目，不读取进程环境变量
    pub fn without_process_env(mut self) -> Self {
        self.process_env = false;
        self
    }

    /// 按名称查询变量
    pub fn get(&self, name: &str) -> Option<String> {
        if self.process_env {
            if let Ok(value) = env::var(name) {
                return Some(value);
            }
        }
        self.file_vars.get(name).cloned()
    }

    fn collect<I>(iter: std::result::Result<I, DotenvError>) -> Self
    where
        I: Iterator<Item = std::result::Result<(String, String), DotenvError>>,
    {
        let mut file_vars = HashMap::new();
        match iter {
            Ok(entries) => {
                for entry in entries {
                    match entry {
                        Ok((key, value)) => {
                            file_vars.insert(key, value);
                        }
                        Err(e) => {
                            warn!("Ignoring malformed .env entry: {}", e);
                        }
                    }
                }
                debug!("Loaded {} entries from .env", file_vars.len());
            }
            Err(e) if e.not_found() => debug!("No .env file found"),
            Err(e) => warn!("Failed to read .env file: {}", e),
        }

        Self {
            file_vars,
            process_env: true,
        }
    }
}

// ===============================================================================================
// 客户端配置
// ===============================================================================================

/// Gemini 客户端配置
///
/// 生成参数默认全部留空，此时请求体只包含提示本身
#[derive(Debug, Clone)]
pub struct Config {
    /// 模型名称
    pub(crate) model: String,
    /// API 密钥，缺失时由服务端拒绝
    pub(crate) api_key: Option<String>,
    /// API 基础 URL
    pub(crate) api_base: String,
    /// 请求超时时间，未设置时使用 HTTP 库默认值
    pub(crate) timeout: Option<Duration>,
    /// 系统指令
    pub(crate) system_instruction: Option<String>,
    /// 温度参数 (0.0-2.0)
    pub(crate) temperature: Option<f32>,
    /// Top-p 参数 (0.0-1.0)
    pub(crate) top_p: Option<f32>,
    /// 最大生成 token 数
    pub(crate) max_output_tokens: Option<u32>,
    /// 随机种子
    pub(crate) random_seed: Option<i32>,
    /// 连接池空闲超时时间
    pub(crate) pool_idle_timeout: Duration,
    /// TCP Keepalive
    pub(crate) tcp_keepalive: Duration,
    /// TCP Nodelay
    pub(crate) tcp_nodelay: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: MODEL.into(),
            api_key: None,
            api_base: DEFAULT_API_BASE.into(),
            timeout: None,
            system_instruction: None,
            temperature: None,
            top_p: None,
            max_output_tokens: None,
            random_seed: None,
            pool_idle_timeout: Duration::from_secs(90),
            tcp_keepalive: Duration::from_secs(60),
            tcp_nodelay: true,
        }
    }
}

/// 生成 Config Builder 方法的宏
///
/// 自动生成 `with_field_name` 形式的 builder 方法
macro_rules! config_builder {
    ($field:ident, $type:ty) => {
        paste::paste! {
            #[doc = "设置 `"]
            #[doc = stringify!($field)]
            #[doc = "`"]
            pub fn [<with_ $field>](mut self, $field: $type) -> Self {
                self.$field = $field;
                self
            }
        }
    };
    ($field:ident, $type:ty, option) => {
        paste::paste! {
            #[doc = "设置 `"]
            #[doc = stringify!($field)]
            #[doc = "`"]
            pub fn [<with_ $field>](mut self, $field: $type) -> Self {
                self.$field = Some($field);
                self
            }
        }
    };
}

impl Config {
    /// 用模型名称和凭据创建配置
    pub fn new(model: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            model: model.into(),
            api_key,
            ..Default::default()
        }
    }

    pub fn model(&self) -> &str { &self.model }
    pub fn api_key(&self) -> Option<&str> { self.api_key.as_deref() }
    pub fn api_base(&self) -> &str { &self.api_base }
    pub fn timeout(&self) -> Option<Duration> { self.timeout }

    /// 从加载器读取凭据和可选的 API 地址
    ///
    /// 凭据缺失不是错误，调用时由服务端返回身份验证失败
    pub fn from_loader(loader: &EnvLoader) -> Self {
        let api_key = loader.get(API_KEY_VAR);
        if api_key.is_none() {
            debug!("{} is not set", API_KEY_VAR);
        }
        let api_base = loader
            .get(API_BASE_VAR)
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        Config {
            api_base,
            ..Config::new(MODEL, api_key)
        }
    }

    // 使用宏生成 builder 方法
    config_builder!(api_base, String);
    config_builder!(model, String);
    config_builder!(api_key, String, option);
    config_builder!(timeout, Duration, option);
    config_builder!(system_instruction, String, option);
    config_builder!(temperature, f32, option);
    config_builder!(top_p, f32, option);
    config_builder!(max_output_tokens, u32, option);
    config_builder!(random_seed, i32, option);
    config_builder!(pool_idle_timeout, Duration);
    config_builder!(tcp_keepalive, Duration);
    config_builder!(tcp_nodelay, bool);

    /// 自动生成随机种子
    ///
    /// 使用 WyRand 生成非负的 32 位种子
    pub fn with_random_seed_auto(mut self) -> Self {
        let seed = WyRand::new().generate::<u32>() >> 1;
        self.random_seed = Some(seed as i32);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_env(lines: &[&str]) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join(".env");
        let mut file = File::create(&file_path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        (dir, file_path)
    }

    /// Tests that the default configuration targets the fixed model with no key.
    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.model(), "gemini-2.5-pro");
        assert_eq!(config.api_base(), DEFAULT_API_BASE);
        assert!(config.api_key().is_none());
        assert!(config.timeout().is_none());
        assert!(config.temperature.is_none());
        assert!(config.random_seed.is_none());
    }

    /// Tests the builder methods for setting configuration fields.
    #[test]
    fn test_config_builder_methods() {
        let config = Config::default()
            .with_model("test_model".to_string())
            .with_api_key("test_key".to_string())
            .with_temperature(0.9)
            .with_timeout(Duration::from_secs(5))
            .with_random_seed(12345);

        assert_eq!(config.model, "test_model");
        assert_eq!(config.api_key.as_deref(), Some("test_key"));
        assert_eq!(config.temperature, Some(0.9));
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.random_seed, Some(12345));
    }

    /// Tests that `with_random_seed_auto` sets a non-negative seed.
    #[test]
    fn test_with_random_seed_auto() {
        let config = Config::default().with_random_seed_auto();
        assert!(config.random_seed.is_some_and(|s| s >= 0));
    }

    /// Tests that a key in the .env file reaches the config.
    #[test]
    fn test_from_loader_with_dotenv_file() {
        let (_dir, path) = write_env(&["GOOGLE_API_KEY=dotenv_key", "OTHER=1"]);
        let loader = EnvLoader::from_path(&path).without_process_env();

        assert_eq!(loader.get("OTHER").as_deref(), Some("1"));
        let config = Config::from_loader(&loader);
        assert_eq!(config.api_key(), Some("dotenv_key"));
        assert_eq!(config.model(), MODEL);
        assert_eq!(config.api_base(), DEFAULT_API_BASE);
    }

    /// Tests the optional API base override.
    #[test]
    fn test_from_loader_api_base_override() {
        let (_dir, path) = write_env(&["GOOGLE_API_BASE=http://127.0.0.1:9/v1beta"]);
        let loader = EnvLoader::from_path(&path).without_process_env();
        let config = Config::from_loader(&loader);
        assert_eq!(config.api_base(), "http://127.0.0.1:9/v1beta");
        assert!(config.api_key().is_none());
    }

    /// Tests that a missing .env file is tolerated.
    #[test]
    fn test_missing_file_is_tolerated() {
        let dir = tempdir().unwrap();
        let loader = EnvLoader::from_path(dir.path().join("nope.env")).without_process_env();
        assert!(loader.get(API_KEY_VAR).is_none());
        assert!(Config::from_loader(&loader).api_key().is_none());
    }

    /// Tests that entries on both sides of a malformed line are kept.
    #[test]
    fn test_malformed_line_is_skipped() {
        let (_dir, path) = write_env(&["BEFORE=first", "this line is 'broken", "AFTER=second"]);
        let loader = EnvLoader::from_path(&path).without_process_env();
        assert_eq!(loader.get("BEFORE").as_deref(), Some("first"));
        assert_eq!(loader.get("AFTER").as_deref(), Some("second"));
    }

    /// Tests that a key after a malformed line still reaches the config.
    #[test]
    fn test_key_after_malformed_line() {
        let (_dir, path) = write_env(&["# comment", "not a valid line", "GOOGLE_API_KEY=abc"]);
        let loader = EnvLoader::from_path(&path).without_process_env();
        assert_eq!(Config::from_loader(&loader).api_key(), Some("abc"));
    }

    /// Tests that the process environment wins over the .env file.
    #[test]
    fn test_process_env_overrides_file() {
        // PATH is set in any test environment
        let (_dir, path) = write_env(&["PATH=from-file"]);
        let loader = EnvLoader::from_path(&path);
        assert_eq!(loader.get("PATH"), env::var("PATH").ok());
        assert_ne!(loader.get("PATH").as_deref(), Some("from-file"));
        assert_eq!(
            loader.without_process_env().get("PATH").as_deref(),
            Some("from-file")
        );
    }
}
