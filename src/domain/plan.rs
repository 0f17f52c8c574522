// ==========================================
// 每周派车分配系统 - 日目标 / 日分配 / 周计划
// ==========================================
// 红线: 同一天内一个司机至多出现在一个类别中
// ==========================================

use crate::domain::audit_log::AuditLog;
use crate::domain::driver::DriverKey;
use crate::domain::types::{DutyCategory, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

// ==========================================
// DayTarget - 日目标数量
// ==========================================
// 待命不设目标: 可用且未分配者即为候选,再受上限约束
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTarget {
    pub certified_duty: u32,         // DOT
    pub certified_helper_route: u32, // DOT-HelperRoute
    pub certified_helper: u32,       // DOT-Helper
    pub standard: u32,               // XL
}

impl DayTarget {
    pub fn new(
        certified_duty: u32,
        certified_helper_route: u32,
        certified_helper: u32,
        standard: u32,
    ) -> Self {
        Self {
            certified_duty,
            certified_helper_route,
            certified_helper,
            standard,
        }
    }

    /// 全零目标（当天不排任何定额类别）
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn total(&self) -> u32 {
        self.certified_duty + self.certified_helper_route + self.certified_helper + self.standard
    }
}

// ==========================================
// Pairing - 帮手线路配对
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    pub helper_route: DriverKey,    // DOT-HelperRoute 司机
    pub helper: Option<DriverKey>,  // DOT-Helper 司机（不足时为 None）
}

// ==========================================
// DayAssignment - 单日分配结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAssignment {
    pub day: Weekday,
    pub certified_duty: Vec<DriverKey>,
    pub certified_helper_route: Vec<DriverKey>,
    pub certified_helper: Vec<DriverKey>,
    pub standard: Vec<DriverKey>,
    pub standby: Vec<DriverKey>,
    pub pairings: Vec<Pairing>,
    pub unassigned_new: Vec<DriverKey>, // 可用但未排入 XL 的新司机
    #[serde(default)]
    pub standby_capped: Vec<DriverKey>, // 可用但待命上限已满,当天无分配
}

impl DayAssignment {
    pub fn empty(day: Weekday) -> Self {
        Self {
            day,
            certified_duty: Vec::new(),
            certified_helper_route: Vec::new(),
            certified_helper: Vec::new(),
            standard: Vec::new(),
            standby: Vec::new(),
            pairings: Vec::new(),
            unassigned_new: Vec::new(),
            standby_capped: Vec::new(),
        }
    }

    pub fn members(&self, category: DutyCategory) -> &[DriverKey] {
        match category {
            DutyCategory::CertifiedDuty => &self.certified_duty,
            DutyCategory::CertifiedHelperRoute => &self.certified_helper_route,
            DutyCategory::CertifiedHelper => &self.certified_helper,
            DutyCategory::Standard => &self.standard,
            DutyCategory::Standby => &self.standby,
        }
    }

    pub fn members_mut(&mut self, category: DutyCategory) -> &mut Vec<DriverKey> {
        match category {
            DutyCategory::CertifiedDuty => &mut self.certified_duty,
            DutyCategory::CertifiedHelperRoute => &mut self.certified_helper_route,
            DutyCategory::CertifiedHelper => &mut self.certified_helper,
            DutyCategory::Standard => &mut self.standard,
            DutyCategory::Standby => &mut self.standby,
        }
    }

    /// 查询司机当天所在类别
    pub fn category_of(&self, key: &DriverKey) -> Option<DutyCategory> {
        DutyCategory::ALL
            .into_iter()
            .find(|c| self.members(*c).contains(key))
    }

    /// 从当天所在类别中移除司机,返回原类别
    pub fn remove(&mut self, key: &DriverKey) -> Option<DutyCategory> {
        let category = self.category_of(key)?;
        self.members_mut(category).retain(|k| k != key);
        Some(category)
    }

    /// 在指定类别中用 `incoming` 原位替换 `outgoing`
    ///
    /// # 返回
    /// - true: 替换成功
    /// - false: `outgoing` 不在该类别中
    pub fn replace_in(
        &mut self,
        category: DutyCategory,
        outgoing: &DriverKey,
        incoming: DriverKey,
    ) -> bool {
        let members = self.members_mut(category);
        match members.iter().position(|k| k == outgoing) {
            Some(pos) => {
                members[pos] = incoming;
                true
            }
            None => false,
        }
    }

    /// 已分配到任一类别的司机数
    pub fn assigned_count(&self) -> usize {
        DutyCategory::ALL
            .iter()
            .map(|c| self.members(*c).len())
            .sum()
    }

    /// 线路数（DOT + DOT-HelperRoute + XL）
    pub fn route_count(&self) -> usize {
        self.certified_duty.len() + self.certified_helper_route.len() + self.standard.len()
    }

    /// 类别间是否互斥
    pub fn is_disjoint(&self) -> bool {
        let mut seen = HashSet::new();
        DutyCategory::ALL
            .iter()
            .flat_map(|c| self.members(*c).iter())
            .all(|k| seen.insert(k))
    }

    /// 当天的 司机 → 类别 映射
    pub fn label_map(&self) -> HashMap<DriverKey, DutyCategory> {
        let mut map = HashMap::with_capacity(self.assigned_count());
        for category in DutyCategory::ALL {
            for key in self.members(category) {
                map.entry(key.clone()).or_insert(category);
            }
        }
        map
    }
}

// ==========================================
// WeekPlan - 周计划
// ==========================================
// 生命周期: 每次运行新建; 两个事后修正完成后即定型
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekPlan {
    pub days: [DayAssignment; 7],
    pub audit_log: AuditLog,
}

impl WeekPlan {
    /// 空周计划
    pub fn empty() -> Self {
        Self {
            days: Weekday::ALL.map(DayAssignment::empty),
            audit_log: AuditLog::new(),
        }
    }

    pub fn day(&self, day: Weekday) -> &DayAssignment {
        &self.days[day.index()]
    }

    pub fn day_mut(&mut self, day: Weekday) -> &mut DayAssignment {
        &mut self.days[day.index()]
    }

    /// 统计每个司机整周待命次数
    pub fn standby_tally(&self) -> HashMap<DriverKey, u32> {
        let mut tally = HashMap::new();
        for day in &self.days {
            for key in &day.standby {
                *tally.entry(key.clone()).or_insert(0) += 1;
            }
        }
        tally
    }

    /// 统计每个司机整周 stepvan 次数
    pub fn stepvan_tally(&self) -> HashMap<DriverKey, u32> {
        let mut tally = HashMap::new();
        for day in &self.days {
            for key in day.certified_duty.iter().chain(day.certified_helper_route.iter()) {
                *tally.entry(key.clone()).or_insert(0) += 1;
            }
        }
        tally
    }
}

impl Default for WeekPlan {
    fn default() -> Self {
        Self::empty()
    }
}
