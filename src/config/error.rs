// ==========================================
// 每周派车分配系统 - 配置层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败: {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("配置文件 JSON 格式错误: {0}")]
    Json(#[from] serde_json::Error),

    #[error("配置文件顶层必须是 JSON 对象")]
    NotAnObject,

    #[error("配置值类型错误: {key} = {value} (期望 {expected})")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },

    #[error("无法确定用户配置目录")]
    NoConfigDir,
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
