// ==========================================
// 每周派车分配系统 - 审计与文本报告
// ==========================================
// 职责: 公平性审计表 / 审计日志表 / 配对表 / 控制台文本报告
// ==========================================

use crate::domain::driver::{DriverKey, RosterModel};
use crate::domain::types::{AuditReason, DutyCategory, Weekday};
use crate::engine::orchestrator::WeekRunResult;
use crate::export::calendar::WeekCalendar;
use std::fmt::Write as _;

/// 公平性审计行: 原本整周无 stepvan、再平衡后获得 stepvan 的司机
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FairnessAuditRow {
    pub driver: String,
    pub label: String,
    pub day: String,
}

pub fn fairness_audit_rows(
    result: &WeekRunResult,
    roster: &RosterModel,
    calendar: &WeekCalendar,
) -> Vec<FairnessAuditRow> {
    let mut rows = Vec::new();
    for day in Weekday::ALL {
        let assignment = result.plan.day(day);
        for category in [DutyCategory::CertifiedDuty, DutyCategory::CertifiedHelperRoute] {
            for key in assignment.members(category) {
                if result.rebalance.candidates.contains(key) {
                    rows.push(FairnessAuditRow {
                        driver: roster.display_name(key).to_string(),
                        label: category.as_str().to_string(),
                        day: calendar.day_label(day),
                    });
                }
            }
        }
    }
    rows
}

/// 审计日志表头
pub const AUDIT_LOG_HEADER: [&str; 10] = [
    "entry_id",
    "recorded_at",
    "reason",
    "day",
    "driver_out",
    "from_category",
    "to_category",
    "driver_in",
    "driver_in_previous",
    "detail",
];

/// 审计日志行（与表头一一对应）
pub fn audit_log_rows(result: &WeekRunResult, roster: &RosterModel) -> Vec<[String; 10]> {
    result
        .plan
        .audit_log
        .entries()
        .iter()
        .map(|e| {
            [
                e.entry_id.clone(),
                e.recorded_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                e.reason.to_string(),
                e.day.to_string(),
                roster.display_name(&e.driver_out).to_string(),
                e.from_category.to_string(),
                e.to_category.to_string(),
                e.driver_in
                    .as_ref()
                    .map(|k| roster.display_name(k).to_string())
                    .unwrap_or_default(),
                e.driver_in_previous
                    .map(|c| c.to_string())
                    .unwrap_or_default(),
                e.detail.clone().unwrap_or_default(),
            ]
        })
        .collect()
}

/// 配对行: (日标签, 帮手线路司机, 帮手或 "none")
pub fn pairing_rows(
    result: &WeekRunResult,
    roster: &RosterModel,
    calendar: &WeekCalendar,
) -> Vec<[String; 3]> {
    Weekday::ALL
        .iter()
        .flat_map(|day| {
            result.plan.day(*day).pairings.iter().map(move |p| {
                [
                    calendar.day_label(*day),
                    roster.display_name(&p.helper_route).to_string(),
                    p.helper
                        .as_ref()
                        .map(|h| roster.display_name(h).to_string())
                        .unwrap_or_else(|| "none".to_string()),
                ]
            })
        })
        .collect()
}

/// 控制台文本报告
pub fn render_text_report(
    result: &WeekRunResult,
    roster: &RosterModel,
    calendar: &WeekCalendar,
) -> String {
    let name = |k: &DriverKey| roster.display_name(k).to_string();
    let mut out = String::new();

    for day in Weekday::ALL {
        let assignment = result.plan.day(day);
        let _ = writeln!(out, "== {} ({}) ==", calendar.day_label(day), calendar.date_of(day));
        for category in DutyCategory::ALL {
            let members = assignment.members(category);
            let names: Vec<String> = members.iter().map(name).collect();
            let listed = if names.is_empty() {
                "(none)".to_string()
            } else {
                names.join(", ")
            };
            let _ = writeln!(out, "  {} ({}): {}", category, members.len(), listed);
        }
        if !assignment.unassigned_new.is_empty() {
            let names: Vec<String> = assignment.unassigned_new.iter().map(name).collect();
            let _ = writeln!(out, "  Unassigned new drivers (need XL): {}", names.join(", "));
        }
        if !assignment.standby_capped.is_empty() {
            let names: Vec<String> = assignment.standby_capped.iter().map(name).collect();
            let _ = writeln!(out, "  Unassigned (standby cap reached): {}", names.join(", "));
        }
        let _ = writeln!(
            out,
            "  {} routes assigned / {} scheduled drivers",
            assignment.route_count(),
            roster.pool_for(day).len()
        );
    }

    let _ = writeln!(out);
    let audit = &result.plan.audit_log;
    for entry in audit.by_reason(AuditReason::StepvanFairness) {
        if let Some(incoming) = &entry.driver_in {
            let _ = writeln!(
                out,
                "Swapped {} with {} on {}",
                name(&entry.driver_out),
                name(incoming),
                entry.day
            );
            let _ = writeln!(
                out,
                "Reassigned {} to {} on {}",
                name(&entry.driver_out),
                entry.to_category,
                entry.day
            );
        }
    }
    for entry in audit.by_reason(AuditReason::StandbyCapRepair) {
        let _ = writeln!(
            out,
            "Moved {} from {} to {} on {}",
            name(&entry.driver_out),
            entry.from_category,
            entry.to_category,
            entry.day
        );
    }

    let _ = writeln!(
        out,
        "Fairness: {} swaps, {} standby repairs",
        result.rebalance.swaps, result.repair.repaired
    );
    let unserved = result.unserved();
    if unserved.is_empty() {
        let _ = writeln!(out, "Every certified driver has at least one step-van slot.");
    } else {
        let names: Vec<String> = unserved.iter().map(name).collect();
        let _ = writeln!(
            out,
            "Certified drivers still at stepvanCount = 0: {}",
            names.join(", ")
        );
        if !result.rebalance.unserved.is_empty() {
            let names: Vec<String> = result.rebalance.unserved.iter().map(name).collect();
            let _ = writeln!(out, "  No swap found for: {}", names.join(", "));
        }
    }
    out
}
