// ==========================================
// 每周派车分配系统 - 周计数器
// ==========================================
// 职责: 跨天累积的每周计数（认证上限 / stepvan 公平性 / 待命上限）
// 红线: 只由日分配器（递增）与两个事后修正（调整）修改
// ==========================================

use crate::domain::driver::{DriverKey, RosterModel};
use crate::domain::plan::WeekPlan;
use crate::domain::types::DutyCategory;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// AllocationPolicy - 分配策略参数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationPolicy {
    pub weekly_cap: u32,  // 每周认证类别上限（DOT + DOT-HelperRoute + DOT-Helper）
    pub standby_cap: u32, // 每周待命上限
}

impl Default for AllocationPolicy {
    fn default() -> Self {
        Self {
            weekly_cap: 2,
            standby_cap: 2,
        }
    }
}

// ==========================================
// WeeklyCounters - 周计数器
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeeklyCounters {
    dot_weekly_count: HashMap<DriverKey, u32>, // 仅认证司机
    stepvan_count: HashMap<DriverKey, u32>,    // 仅认证司机
    standby_count: HashMap<DriverKey, u32>,    // 任意司机
}

impl WeeklyCounters {
    /// 为花名册中的认证司机初始化零计数
    pub fn for_roster(roster: &RosterModel) -> Self {
        let mut counters = Self::default();
        for key in roster.certified_keys() {
            counters.dot_weekly_count.insert(key.clone(), 0);
            counters.stepvan_count.insert(key, 0);
        }
        counters
    }

    pub fn dot_weekly_count(&self, key: &DriverKey) -> u32 {
        self.dot_weekly_count.get(key).copied().unwrap_or(0)
    }

    pub fn stepvan_count(&self, key: &DriverKey) -> u32 {
        self.stepvan_count.get(key).copied().unwrap_or(0)
    }

    pub fn standby_count(&self, key: &DriverKey) -> u32 {
        self.standby_count.get(key).copied().unwrap_or(0)
    }

    /// 是否被追踪为认证司机
    pub fn is_tracked_certified(&self, key: &DriverKey) -> bool {
        self.stepvan_count.contains_key(key)
    }

    /// 认证司机在某类别落位后的计数递增
    ///
    /// # 规则
    /// - DOT / DOT-HelperRoute: 周上限 +1, stepvan +1
    /// - DOT-Helper: 仅周上限 +1
    /// - 非认证司机: 不计数
    pub fn record_certified_assignment(&mut self, key: &DriverKey, category: DutyCategory) {
        if !self.is_tracked_certified(key) || !category.counts_toward_weekly_cap() {
            return;
        }
        *self.dot_weekly_count.entry(key.clone()).or_insert(0) += 1;
        if category.is_stepvan() {
            *self.stepvan_count.entry(key.clone()).or_insert(0) += 1;
        }
    }

    /// 认证司机离开某类别后的计数回退（调换时使用）
    pub fn release_certified_assignment(&mut self, key: &DriverKey, category: DutyCategory) {
        if !self.is_tracked_certified(key) || !category.counts_toward_weekly_cap() {
            return;
        }
        if let Some(v) = self.dot_weekly_count.get_mut(key) {
            *v = v.saturating_sub(1);
        }
        if category.is_stepvan() {
            if let Some(v) = self.stepvan_count.get_mut(key) {
                *v = v.saturating_sub(1);
            }
        }
    }

    pub fn record_standby(&mut self, key: &DriverKey) {
        *self.standby_count.entry(key.clone()).or_insert(0) += 1;
    }

    pub fn release_standby(&mut self, key: &DriverKey) {
        if let Some(v) = self.standby_count.get_mut(key) {
            *v = v.saturating_sub(1);
        }
    }

    /// 从周计划重新统计待命次数（修复之后同步）
    pub fn sync_standby_from(&mut self, week: &WeekPlan) {
        self.standby_count = week.standby_tally();
    }

    /// stepvan 计数为 0 的认证司机（按键排序）
    pub fn unserved_certified(&self) -> Vec<DriverKey> {
        let mut keys: Vec<DriverKey> = self
            .stepvan_count
            .iter()
            .filter(|(_, &v)| v == 0)
            .map(|(k, _)| k.clone())
            .collect();
        keys.sort();
        keys
    }
}
