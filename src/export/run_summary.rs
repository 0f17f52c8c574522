// ==========================================
// 每周派车分配系统 - 运行摘要
// ==========================================
// 用途: 每次运行生成一份可追溯的 JSON 摘要
// ==========================================

use crate::domain::types::Weekday;
use crate::engine::orchestrator::WeekRunResult;
use crate::export::calendar::WeekCalendar;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCounts {
    pub day: Weekday,
    pub label: String,
    pub certified_duty: usize,
    pub certified_helper_route: usize,
    pub certified_helper: usize,
    pub standard: usize,
    pub standby: usize,
    pub unassigned_new: usize,
    pub standby_capped: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,               // UUID
    pub generated_at: NaiveDateTime,
    pub week_start: NaiveDate,
    pub config_snapshot: BTreeMap<String, String>,
    pub days: Vec<DayCounts>,
    pub swaps: usize,
    pub standby_repairs: usize,
    pub audit_entries: usize,
    pub unserved: Vec<String>,          // 周末 stepvan 仍为 0 的认证司机
    pub no_swap_found: Vec<String>,     // 再平衡候选中找不到调换位置者
    pub shortfalls: usize,
}

impl RunSummary {
    pub fn build(
        result: &WeekRunResult,
        calendar: &WeekCalendar,
        config_snapshot: BTreeMap<String, String>,
    ) -> Self {
        let days = Weekday::ALL
            .iter()
            .map(|day| {
                let a = result.plan.day(*day);
                DayCounts {
                    day: *day,
                    label: calendar.day_label(*day),
                    certified_duty: a.certified_duty.len(),
                    certified_helper_route: a.certified_helper_route.len(),
                    certified_helper: a.certified_helper.len(),
                    standard: a.standard.len(),
                    standby: a.standby.len(),
                    unassigned_new: a.unassigned_new.len(),
                    standby_capped: a.standby_capped.len(),
                }
            })
            .collect();

        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            generated_at: chrono::Local::now().naive_local(),
            week_start: calendar.start(),
            config_snapshot,
            days,
            swaps: result.rebalance.swaps,
            standby_repairs: result.repair.repaired,
            audit_entries: result.plan.audit_log.len(),
            unserved: result.unserved().iter().map(|k| k.to_string()).collect(),
            no_swap_found: result.rebalance.unserved.iter().map(|k| k.to_string()).collect(),
            shortfalls: result.shortfalls.len(),
        }
    }
}
