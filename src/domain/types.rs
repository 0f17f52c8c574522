// ==========================================
// 每周派车分配系统 - 领域类型定义
// ==========================================
// 职责: 星期、出勤状态、岗位类别、审计原因
// 红线: 类别是标签,不是车辆/线路实体
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 星期 (Weekday)
// ==========================================
// 顺序: 周日 → 周六（日历顺序,分配必须按此顺序执行）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Sun,
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl Weekday {
    /// 按日历顺序排列的全部七天
    pub const ALL: [Weekday; 7] = [
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ];

    /// 周内下标（周日 = 0）
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// 由周内下标构造
    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Sun => "Sun",
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
        }
    }

    /// 从字符串解析（大小写不敏感,接受缩写与全称）
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "sun" | "sunday" => Some(Weekday::Sun),
            "mon" | "monday" => Some(Weekday::Mon),
            "tue" | "tues" | "tuesday" => Some(Weekday::Tue),
            "wed" | "wednesday" => Some(Weekday::Wed),
            "thu" | "thur" | "thurs" | "thursday" => Some(Weekday::Thu),
            "fri" | "friday" => Some(Weekday::Fri),
            "sat" | "saturday" => Some(Weekday::Sat),
            _ => None,
        }
    }

    /// 由 chrono 日期换算（周日为一周起点）
    pub fn from_chrono(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Sun => Weekday::Sun,
            chrono::Weekday::Mon => Weekday::Mon,
            chrono::Weekday::Tue => Weekday::Tue,
            chrono::Weekday::Wed => Weekday::Wed,
            chrono::Weekday::Thu => Weekday::Thu,
            chrono::Weekday::Fri => Weekday::Fri,
            chrono::Weekday::Sat => Weekday::Sat,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 出勤状态 (Availability)
// ==========================================
// Unavailable: 当天不排班
// Available: 原始值 "1"
// CertifiedAvailable: 原始值 "DOT"（当天以认证身份排班）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Availability {
    Unavailable,
    Available,
    CertifiedAvailable,
}

impl Availability {
    /// 当天是否在可分配池中
    pub fn is_available(&self) -> bool {
        !matches!(self, Availability::Unavailable)
    }
}

impl Default for Availability {
    fn default() -> Self {
        Availability::Unavailable
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Availability::Unavailable => write!(f, "UNAVAILABLE"),
            Availability::Available => write!(f, "AVAILABLE"),
            Availability::CertifiedAvailable => write!(f, "CERTIFIED_AVAILABLE"),
        }
    }
}

// ==========================================
// 岗位类别 (Duty Category)
// ==========================================
// 顺序即分配优先级展示顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DutyCategory {
    CertifiedDuty,        // DOT 线路
    CertifiedHelperRoute, // DOT 帮手线路（与帮手配对）
    CertifiedHelper,      // DOT 帮手
    Standard,             // XL（最低技能类别）
    Standby,              // 待命
}

impl DutyCategory {
    /// 全部类别（展示顺序）
    pub const ALL: [DutyCategory; 5] = [
        DutyCategory::CertifiedDuty,
        DutyCategory::CertifiedHelperRoute,
        DutyCategory::CertifiedHelper,
        DutyCategory::Standard,
        DutyCategory::Standby,
    ];

    /// 是否为 stepvan 名额（计入公平性统计）
    pub fn is_stepvan(&self) -> bool {
        matches!(
            self,
            DutyCategory::CertifiedDuty | DutyCategory::CertifiedHelperRoute
        )
    }

    /// 是否计入每周认证上限
    pub fn counts_toward_weekly_cap(&self) -> bool {
        matches!(
            self,
            DutyCategory::CertifiedDuty
                | DutyCategory::CertifiedHelperRoute
                | DutyCategory::CertifiedHelper
        )
    }

    /// 短标签（日志/审计存储）
    pub fn as_str(&self) -> &'static str {
        match self {
            DutyCategory::CertifiedDuty => "DOT",
            DutyCategory::CertifiedHelperRoute => "DOT-HelperRoute",
            DutyCategory::CertifiedHelper => "DOT-Helper",
            DutyCategory::Standard => "XL",
            DutyCategory::Standby => "Standby",
        }
    }

    /// 排班表单元格文本
    pub fn label_text(&self) -> &'static str {
        match self {
            DutyCategory::CertifiedDuty => "DOT Route",
            other => other.as_str(),
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim() {
            "DOT" | "DOT Route" => Some(DutyCategory::CertifiedDuty),
            "DOT-HelperRoute" => Some(DutyCategory::CertifiedHelperRoute),
            "DOT-Helper" => Some(DutyCategory::CertifiedHelper),
            "XL" => Some(DutyCategory::Standard),
            "Standby" => Some(DutyCategory::Standby),
            _ => None,
        }
    }
}

impl fmt::Display for DutyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 审计原因 (Audit Reason)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditReason {
    StepvanFairness,  // stepvan 公平性调换
    StandbyCapRepair, // 待命上限修复
}

impl AuditReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditReason::StepvanFairness => "STEPVAN_FAIRNESS",
            AuditReason::StandbyCapRepair => "STANDBY_CAP_REPAIR",
        }
    }
}

impl fmt::Display for AuditReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_order_and_parse() {
        assert_eq!(Weekday::ALL[0], Weekday::Sun);
        assert_eq!(Weekday::Sat.index(), 6);
        assert_eq!(Weekday::from_str(" wednesday "), Some(Weekday::Wed));
        assert_eq!(Weekday::from_str("THU"), Some(Weekday::Thu));
        assert_eq!(Weekday::from_str("funday"), None);
        assert_eq!(Weekday::from_index(7), None);
        assert_eq!(Weekday::from_chrono(chrono::Weekday::Sun), Weekday::Sun);
    }

    #[test]
    fn test_category_flags() {
        assert!(DutyCategory::CertifiedDuty.is_stepvan());
        assert!(DutyCategory::CertifiedHelperRoute.is_stepvan());
        assert!(!DutyCategory::CertifiedHelper.is_stepvan());
        assert!(DutyCategory::CertifiedHelper.counts_toward_weekly_cap());
        assert!(!DutyCategory::Standard.counts_toward_weekly_cap());
        assert!(!DutyCategory::Standby.counts_toward_weekly_cap());
        assert_eq!(DutyCategory::CertifiedDuty.label_text(), "DOT Route");
        assert_eq!(DutyCategory::from_str("XL"), Some(DutyCategory::Standard));
    }
}
