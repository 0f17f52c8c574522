// ==========================================
// 每周派车分配系统 - 配置层
// ==========================================
// 职责: 系统配置管理,文件值覆写内置默认值
// 存储: JSON 对象文件
// ==========================================

pub mod config_manager;
pub mod error;
pub mod roster_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use error::{ConfigError, ConfigResult};
pub use roster_config_trait::RosterConfigReader;
