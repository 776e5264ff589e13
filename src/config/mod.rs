/// 运行配置
///
/// 支持TOML/JSON配置文件和环境变量覆盖，命令行参数在此之上再覆盖一次
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod input;
pub mod verify;

pub use input::InputConfig;
pub use verify::VerifyConfig;

use crate::impl_default;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 文件读取错误
    #[error("Config file error: {0}")]
    FileError(#[from] std::io::Error),
    /// 解析错误
    #[error("Config parse error: {0}")]
    ParseError(String),
    /// 验证错误
    #[error("Config validation error: {0}")]
    ValidationError(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// 环境变量前缀
pub const ENV_PREFIX: &str = "LANE_KERNELS_";

/// 主配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// 输入数据
    #[serde(default)]
    pub input: InputConfig,

    /// 校验
    #[serde(default)]
    pub verify: VerifyConfig,

    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl_default!(RunConfig {
    input: InputConfig::default(),
    verify: VerifyConfig::default(),
    logging: LoggingConfig::default(),
});

impl RunConfig {
    /// 创建默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 从TOML文件加载配置
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_toml_str(&content)
    }

    /// 从TOML字符串解析配置
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 从JSON文件加载配置
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_json_str(&content)
    }

    /// 从JSON字符串解析配置
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 按扩展名加载，`.json` 走JSON，其余按TOML
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// 保存为TOML文件
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 保存为JSON文件
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 从环境变量覆盖配置
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(format!("{ENV_PREFIX}{key}")).ok());
    }

    /// 用任意键值来源覆盖配置，键不带前缀；无法解析的值被忽略
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // 输入配置
        if let Some(size) = lookup("SIZE").and_then(|v| v.parse().ok()) {
            self.input.size = size;
        }
        if let Some(seed) = lookup("SEED").and_then(|v| v.parse().ok()) {
            self.input.seed = seed;
        }
        if let Some(exp_max) = lookup("EXP_MAX").and_then(|v| v.parse().ok()) {
            self.input.exp_max = exp_max;
        }

        // 校验配置
        if let Some(tolerance) = lookup("TOLERANCE").and_then(|v| v.parse().ok()) {
            self.verify.tolerance = tolerance;
        }
        if let Some(print_log) = lookup("PRINT_LOG").and_then(|v| v.parse().ok()) {
            self.verify.print_log = print_log;
        }

        // 日志配置
        if let Some(level) = lookup("LOG_LEVEL").and_then(|v| LogLevel::parse(&v)) {
            self.logging.level = level;
        }
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        self.input.validate()?;
        self.verify.validate()?;
        Ok(())
    }

    /// 默认配置文件的查找顺序
    ///
    /// 1. ./lane_kernels.toml
    /// 2. ./lane_kernels.json
    /// 3. ~/.config/lane_kernels/config.toml
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from("lane_kernels.toml"),
            PathBuf::from("lane_kernels.json"),
        ];
        if let Some(home) = env::var_os("HOME") {
            paths.push(
                PathBuf::from(home)
                    .join(".config")
                    .join("lane_kernels")
                    .join("config.toml"),
            );
        }
        paths
    }

    /// 按默认顺序查找配置文件，返回配置及其来源路径
    ///
    /// 本身不输出日志，来源路径由调用方在日志初始化之后记录。
    pub fn discover() -> Option<(Self, PathBuf)> {
        Self::load_first(Self::search_paths())
    }

    /// 加载候选路径中第一个能成功读取和解析的配置
    pub fn load_first<I, P>(paths: I) -> Option<(Self, PathBuf)>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        paths.into_iter().find_map(|path| {
            let path: PathBuf = path.into();
            Self::from_file(&path).ok().map(|config| (config, path))
        })
    }
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: LogLevel,
}

impl_default!(LoggingConfig {
    level: LogLevel::Warn,
});

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// 跟踪
    Trace,
    /// 调试
    Debug,
    /// 信息
    Info,
    /// 警告
    Warn,
    /// 错误
    Error,
}

impl LogLevel {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// `EnvFilter` 使用的指令字符串
    pub fn as_filter(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}
