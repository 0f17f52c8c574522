// ==========================================
// 每周派车分配系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、快照
// 存储: JSON 对象文件 (key → value),缺省键使用内置默认值
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::roster_config_trait::RosterConfigReader;
use crate::domain::counters::AllocationPolicy;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    values: HashMap<String, String>,
    source: Option<PathBuf>,
}

impl ConfigManager {
    /// 全部使用默认值
    pub fn new() -> Self {
        Self::default()
    }

    /// 默认配置文件路径: `<config_dir>/weekly-dispatch/config.json`
    pub fn default_path() -> ConfigResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("weekly-dispatch").join("config.json"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// 从 JSON 文件加载
    ///
    /// # 参数
    /// - path: 配置文件路径
    ///
    /// # 返回
    /// - 文件不存在: 全部默认值
    /// - 文件存在但无法解析: ConfigError
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            info!(path = %path.display(), "配置文件不存在,使用默认配置");
            return Ok(Self::new());
        }

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut manager = Self::from_json_str(&raw)?;
        manager.source = Some(path.to_path_buf());

        info!(
            path = %path.display(),
            overrides = manager.values.len(),
            "配置文件加载完成"
        );
        Ok(manager)
    }

    /// 加载默认路径下的配置
    pub fn load_default() -> ConfigResult<Self> {
        Self::load(&Self::default_path()?)
    }

    /// 从 JSON 字符串解析（数字/布尔值转为字符串保存）
    pub fn from_json_str(raw: &str) -> ConfigResult<Self> {
        let parsed: Value = serde_json::from_str(raw)?;
        let Value::Object(map) = parsed else {
            return Err(ConfigError::NotAnObject);
        };

        let mut values = HashMap::with_capacity(map.len());
        for (key, value) in map {
            let text = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null => continue,
                other => {
                    return Err(ConfigError::InvalidValue {
                        key,
                        value: other.to_string(),
                        expected: "标量值",
                    })
                }
            };
            values.insert(key, text);
        }

        Ok(Self {
            values,
            source: None,
        })
    }

    /// 配置来源文件（默认配置时为 None）
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// 覆写单个配置值（CLI 参数优先于文件）
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        debug!(key, value = %value, "配置覆写");
        self.values.insert(key.to_string(), value);
    }

    /// 读取配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 未配置
    pub fn get_config_value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// 读取配置值,带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> String {
        self.get_config_value(key).unwrap_or(default).to_string()
    }

    /// 读取并解析为指定类型
    fn get_parsed_or_default<T: FromStr>(
        &self,
        key: &str,
        default: T,
        expected: &'static str,
    ) -> ConfigResult<T> {
        match self.get_config_value(key) {
            None => Ok(default),
            Some(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw.to_string(),
                expected,
            }),
        }
    }

    /// 生效配置（默认值 + 覆写）,按键排序
    pub fn effective_config(&self) -> BTreeMap<String, String> {
        let mut merged: BTreeMap<String, String> = config_keys::DEFAULTS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        for (k, v) in &self.values {
            merged.insert(k.clone(), v.clone());
        }
        merged
    }

    /// 获取生效配置的快照（JSON格式）
    ///
    /// # 用途
    /// - 运行开始时记录日志
    /// - 写入运行摘要,保证结果可追溯
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string(&self.effective_config())?)
    }

    // ===== 分配配置 =====

    /// 每周认证类别上限
    pub fn get_weekly_cap(&self) -> ConfigResult<u32> {
        self.get_parsed_or_default(config_keys::WEEKLY_CAP, 2, "非负整数")
    }

    /// 每周待命上限
    pub fn get_standby_cap(&self) -> ConfigResult<u32> {
        self.get_parsed_or_default(config_keys::STANDBY_CAP, 2, "非负整数")
    }

    /// 分配策略参数
    pub fn allocation_policy(&self) -> ConfigResult<AllocationPolicy> {
        Ok(AllocationPolicy {
            weekly_cap: self.get_weekly_cap()?,
            standby_cap: self.get_standby_cap()?,
        })
    }

    /// 随机种子（未配置时返回 None,由调用方使用系统熵）
    pub fn get_rng_seed(&self) -> ConfigResult<Option<u64>> {
        match self.get_config_value(config_keys::RNG_SEED) {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Some)
                .map_err(|_| ConfigError::InvalidValue {
                    key: config_keys::RNG_SEED.to_string(),
                    value: raw.to_string(),
                    expected: "u64",
                }),
        }
    }
}

// ==========================================
// RosterConfigReader Trait 实现
// ==========================================
impl RosterConfigReader for ConfigManager {
    fn get_certified_marker(&self) -> ConfigResult<String> {
        Ok(self.get_config_or_default(config_keys::CERTIFIED_MARKER, "dot"))
    }

    fn get_available_marker(&self) -> ConfigResult<String> {
        Ok(self.get_config_or_default(config_keys::AVAILABLE_MARKER, "1"))
    }

    fn get_roster_skip_rows(&self) -> ConfigResult<usize> {
        self.get_parsed_or_default(config_keys::ROSTER_SKIP_ROWS, 13, "非负整数")
    }

    fn get_roster_max_rows(&self) -> ConfigResult<usize> {
        self.get_parsed_or_default(config_keys::ROSTER_MAX_ROWS, 77, "非负整数")
    }

    fn get_roster_col_first_name(&self) -> ConfigResult<usize> {
        self.get_parsed_or_default(config_keys::ROSTER_COL_FIRST_NAME, 3, "列号")
    }

    fn get_roster_col_last_name(&self) -> ConfigResult<usize> {
        self.get_parsed_or_default(config_keys::ROSTER_COL_LAST_NAME, 4, "列号")
    }

    fn get_roster_col_day_start(&self) -> ConfigResult<usize> {
        self.get_parsed_or_default(config_keys::ROSTER_COL_DAY_START, 5, "列号")
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 分配上限
    pub const WEEKLY_CAP: &str = "weekly_cap";
    pub const STANDBY_CAP: &str = "standby_cap";

    // 状态标记
    pub const CERTIFIED_MARKER: &str = "certified_marker";
    pub const AVAILABLE_MARKER: &str = "available_marker";

    // 花名册布局
    pub const ROSTER_SKIP_ROWS: &str = "roster_skip_rows";
    pub const ROSTER_MAX_ROWS: &str = "roster_max_rows";
    pub const ROSTER_COL_FIRST_NAME: &str = "roster_col_first_name";
    pub const ROSTER_COL_LAST_NAME: &str = "roster_col_last_name";
    pub const ROSTER_COL_DAY_START: &str = "roster_col_day_start";

    // 随机源
    pub const RNG_SEED: &str = "rng_seed";

    /// 默认值表（rng_seed 无默认值）
    pub const DEFAULTS: &[(&str, &str)] = &[
        (WEEKLY_CAP, "2"),
        (STANDBY_CAP, "2"),
        (CERTIFIED_MARKER, "dot"),
        (AVAILABLE_MARKER, "1"),
        (ROSTER_SKIP_ROWS, "13"),
        (ROSTER_MAX_ROWS, "77"),
        (ROSTER_COL_FIRST_NAME, "3"),
        (ROSTER_COL_LAST_NAME, "4"),
        (ROSTER_COL_DAY_START, "5"),
    ];
}
