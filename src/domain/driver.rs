// ==========================================
// 每周派车分配系统 - 司机与花名册领域模型
// ==========================================
// 职责: 司机记录、姓名键标准化、认证/出勤推导
// 红线: 运行开始时一次构造,之后只读
// ==========================================

use crate::domain::types::{Availability, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;
use tracing::warn;

// ==========================================
// DriverKey - 司机唯一键
// ==========================================
// 标准化: 去首尾空白 + 折叠内部空白 + 小写
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriverKey(String);

impl DriverKey {
    /// 由原始姓名构造标准化键
    pub fn new(raw_name: &str) -> Self {
        let normalized = raw_name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        Self(normalized)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for DriverKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DriverKey {
    fn from(raw: &str) -> Self {
        DriverKey::new(raw)
    }
}

// ==========================================
// Driver - 司机记录
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Driver {
    pub key: DriverKey,
    pub display_name: String,             // 原始展示姓名（"名 姓"）
    pub availability: [Availability; 7],  // 周日..周六
    pub raw_status: [String; 7],          // 原始单元格文本（导出时保留）
    pub is_certified: bool,               // 任一天为认证排班即为认证司机
    pub is_semi_restricted: bool,         // 禁止 DOT / DOT-HelperRoute
    pub is_new: bool,                     // 新司机,只能排 XL
}

impl Driver {
    /// 创建司机记录
    ///
    /// # 参数
    /// - `display_name`: 展示姓名
    /// - `availability`: 七天出勤状态（周日起）
    ///
    /// # 说明
    /// - `is_certified` 由出勤状态推导
    /// - 新司机/半限制标记由 `RosterModel::build` 统一设置
    pub fn new(display_name: &str, availability: [Availability; 7]) -> Self {
        let raw_status = availability.map(|a| match a {
            Availability::Unavailable => String::new(),
            Availability::Available => "1".to_string(),
            Availability::CertifiedAvailable => "DOT".to_string(),
        });
        Self::with_raw_status(display_name, availability, raw_status)
    }

    /// 创建司机记录（保留原始单元格文本）
    pub fn with_raw_status(
        display_name: &str,
        availability: [Availability; 7],
        raw_status: [String; 7],
    ) -> Self {
        let is_certified = availability
            .iter()
            .any(|a| *a == Availability::CertifiedAvailable);
        Self {
            key: DriverKey::new(display_name),
            display_name: display_name.trim().to_string(),
            availability,
            raw_status,
            is_certified,
            is_semi_restricted: false,
            is_new: false,
        }
    }

    pub fn availability_on(&self, day: Weekday) -> Availability {
        self.availability[day.index()]
    }

    pub fn is_available_on(&self, day: Weekday) -> bool {
        self.availability_on(day).is_available()
    }

    /// 是否可以进入 stepvan 类别（认证且非半限制且非新司机）
    pub fn may_drive_stepvan(&self) -> bool {
        self.is_certified && !self.is_semi_restricted && !self.is_new
    }
}

// ==========================================
// RosterError - 花名册前置条件错误
// ==========================================
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    #[error("司机姓名为空 (第 {0} 条记录)")]
    EmptyName(usize),

    #[error("司机姓名重复: {0}")]
    DuplicateDriver(String),
}

// ==========================================
// RosterModel - 花名册
// ==========================================
// 保持导入顺序（确定性遍历）
// 反序列化经 RosterRecords 重新校验并建立索引
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "RosterRecords")]
pub struct RosterModel {
    drivers: Vec<Driver>,
    #[serde(skip)]
    index: HashMap<DriverKey, usize>,
}

/// 花名册的序列化形态（只含司机记录,标记随记录保存）
#[derive(Deserialize)]
struct RosterRecords {
    drivers: Vec<Driver>,
}

impl TryFrom<RosterRecords> for RosterModel {
    type Error = RosterError;

    fn try_from(records: RosterRecords) -> Result<Self, Self::Error> {
        let index = Self::index_of(&records.drivers)?;
        Ok(Self {
            drivers: records.drivers,
            index,
        })
    }
}

impl RosterModel {
    /// 构造花名册并标记新司机/半限制司机
    ///
    /// # 参数
    /// - `drivers`: 司机记录（导入顺序）
    /// - `new_drivers`: 新司机名单
    /// - `semi_restricted`: 半限制司机名单
    ///
    /// # 返回
    /// - Err(RosterError): 姓名为空或重复（前置条件违反,整次运行中止）
    ///
    /// # 说明
    /// 名单中不在花名册内的姓名被忽略（记 warn 日志）
    pub fn build(
        drivers: Vec<Driver>,
        new_drivers: &[DriverKey],
        semi_restricted: &[DriverKey],
    ) -> Result<Self, RosterError> {
        let index = Self::index_of(&drivers)?;
        let mut roster = Self { drivers, index };

        let new_set: HashSet<&DriverKey> = new_drivers.iter().collect();
        let semi_set: HashSet<&DriverKey> = semi_restricted.iter().collect();
        for key in new_set.iter().chain(semi_set.iter()) {
            if !roster.index.contains_key(*key) {
                warn!(driver = %key, "名单中的司机不在花名册内,已忽略");
            }
        }
        for driver in roster.drivers.iter_mut() {
            driver.is_new = new_set.contains(&driver.key);
            driver.is_semi_restricted = semi_set.contains(&driver.key);
        }

        Ok(roster)
    }

    /// 建立键索引（姓名为空或重复即失败）
    fn index_of(drivers: &[Driver]) -> Result<HashMap<DriverKey, usize>, RosterError> {
        let mut index = HashMap::with_capacity(drivers.len());
        for (i, driver) in drivers.iter().enumerate() {
            if driver.key.is_empty() {
                return Err(RosterError::EmptyName(i + 1));
            }
            if index.insert(driver.key.clone(), i).is_some() {
                return Err(RosterError::DuplicateDriver(driver.display_name.clone()));
            }
        }
        Ok(index)
    }

    pub fn drivers(&self) -> &[Driver] {
        &self.drivers
    }

    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }

    pub fn get(&self, key: &DriverKey) -> Option<&Driver> {
        self.index.get(key).map(|&i| &self.drivers[i])
    }

    /// 当天是否可用（不在花名册内视为不可用）
    pub fn is_available(&self, key: &DriverKey, day: Weekday) -> bool {
        self.get(key).map(|d| d.is_available_on(day)).unwrap_or(false)
    }

    /// 当天可分配池（非 Unavailable,花名册顺序）
    pub fn pool_for(&self, day: Weekday) -> Vec<DriverKey> {
        self.drivers
            .iter()
            .filter(|d| d.is_available_on(day))
            .map(|d| d.key.clone())
            .collect()
    }

    /// 当天可用的新司机
    pub fn new_drivers_available(&self, day: Weekday) -> Vec<DriverKey> {
        self.drivers
            .iter()
            .filter(|d| d.is_new && d.is_available_on(day))
            .map(|d| d.key.clone())
            .collect()
    }

    /// 认证司机键（花名册顺序）
    pub fn certified_keys(&self) -> Vec<DriverKey> {
        self.drivers
            .iter()
            .filter(|d| d.is_certified)
            .map(|d| d.key.clone())
            .collect()
    }

    /// 展示姓名（不在花名册内时回退为键本身）
    pub fn display_name<'a>(&'a self, key: &'a DriverKey) -> &'a str {
        self.get(key)
            .map(|d| d.display_name.as_str())
            .unwrap_or_else(|| key.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Availability::{Available as A, CertifiedAvailable as C, Unavailable as U};

    #[test]
    fn test_driver_key_normalization() {
        assert_eq!(DriverKey::new("  Jane   DOE "), DriverKey::new("jane doe"));
        assert_eq!(DriverKey::new("Jane\tDoe").as_str(), "jane doe");
        assert!(DriverKey::new("   ").is_empty());
    }

    #[test]
    fn test_certification_inferred_from_any_day() {
        let d = Driver::new("Ann Lee", [U, A, A, C, U, U, U]);
        assert!(d.is_certified);
        let d = Driver::new("Bob Ray", [A, A, A, A, A, A, A]);
        assert!(!d.is_certified);
    }

    #[test]
    fn test_build_marks_flags_and_rejects_duplicates() {
        let drivers = vec![
            Driver::new("Ann Lee", [C; 7]),
            Driver::new("Bob Ray", [A; 7]),
        ];
        let roster = RosterModel::build(
            drivers,
            &[DriverKey::new("BOB RAY"), DriverKey::new("ghost")],
            &[DriverKey::new("ann lee")],
        )
        .unwrap();
        assert!(roster.get(&DriverKey::new("bob ray")).unwrap().is_new);
        assert!(roster.get(&DriverKey::new("ann lee")).unwrap().is_semi_restricted);
        assert!(!roster.get(&DriverKey::new("ann lee")).unwrap().may_drive_stepvan());

        let dup = vec![Driver::new("Ann Lee", [A; 7]), Driver::new("ann  lee", [A; 7])];
        assert_eq!(
            RosterModel::build(dup, &[], &[]).unwrap_err(),
            RosterError::DuplicateDriver("ann  lee".to_string())
        );
    }

    #[test]
    fn test_pool_for_day_keeps_roster_order() {
        let drivers = vec![
            Driver::new("Zed", [A, U, U, U, U, U, U]),
            Driver::new("Amy", [C, C, U, U, U, U, U]),
        ];
        let roster = RosterModel::build(drivers, &[], &[]).unwrap();
        assert_eq!(
            roster.pool_for(Weekday::Sun),
            vec![DriverKey::new("zed"), DriverKey::new("amy")]
        );
        assert_eq!(roster.pool_for(Weekday::Mon), vec![DriverKey::new("amy")]);
        assert!(roster.pool_for(Weekday::Sat).is_empty());
    }

    #[test]
    fn test_deserialized_roster_is_indexed() {
        let roster = RosterModel::build(
            vec![Driver::new("Ann Lee", [C; 7]), Driver::new("Bob Ray", [A; 7])],
            &[DriverKey::new("bob ray")],
            &[],
        )
        .unwrap();
        let json = serde_json::to_string(&roster).unwrap();
        let restored: RosterModel = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.len(), 2);
        assert!(restored.get(&DriverKey::new("ann lee")).unwrap().is_certified);
        assert!(restored.get(&DriverKey::new("bob ray")).unwrap().is_new);
        assert_eq!(restored.display_name(&DriverKey::new("bob ray")), "Bob Ray");
    }

    #[test]
    fn test_deserialize_rejects_duplicate_keys() {
        let one = serde_json::to_value(Driver::new("Ann Lee", [A; 7])).unwrap();
        let json = serde_json::json!({ "drivers": [one.clone(), one] }).to_string();

        let err = serde_json::from_str::<RosterModel>(&json).unwrap_err();
        assert!(err.to_string().contains("Ann Lee"));
    }
}
