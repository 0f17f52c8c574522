// ==========================================
// 每周派车分配系统 - stepvan 公平性再平衡
// ==========================================
// 红线: 必须在七天分配全部完成之后执行（依据最终 stepvan_count）
// 红线: 贪心首次命中,不做全局最优匹配
// ==========================================
// 职责: 为整周 stepvan 为 0 的认证司机换入一个 stepvan 名额
// 输入: 周计划 + 周计数器 + 花名册
// 输出: 审计条目（追加到周计划）+ 仍未服务名单
// ==========================================

use crate::domain::audit_log::AuditEntry;
use crate::domain::counters::{AllocationPolicy, WeeklyCounters};
use crate::domain::driver::{DriverKey, RosterModel};
use crate::domain::plan::{DayAssignment, WeekPlan};
use crate::domain::types::{AuditReason, DutyCategory, Weekday};
use std::cmp::Reverse;
use tracing::{debug, info, instrument, warn};

/// 再平衡结果
#[derive(Debug, Clone, Default)]
pub struct RebalanceReport {
    pub candidates: Vec<DriverKey>, // 执行前 stepvan 为 0 的候选
    pub swaps: usize,
    pub unserved: Vec<DriverKey>,   // 未找到可调换日/对象的候选
}

// ==========================================
// FairnessRebalancer - 公平性再平衡
// ==========================================
pub struct FairnessRebalancer {
    policy: AllocationPolicy,
}

impl FairnessRebalancer {
    pub fn new(policy: AllocationPolicy) -> Self {
        Self { policy }
    }

    /// 执行再平衡
    ///
    /// 规则:
    /// 1) 候选: 认证、非半限制、非新司机,且 stepvan_count == 0（花名册顺序,各扫描一次）
    /// 2) 按日历顺序扫描候选可用的日子; 先看 DOT 再看 DOT-HelperRoute
    /// 3) 换出对象: stepvan_count 最高者（并列取类别中靠前者）,
    ///    且换出后仍保有至少一个 stepvan 名额
    /// 4) 候选换入后不得超过周上限
    /// 5) 换出者改排 XL; 记录一条审计
    #[instrument(skip_all, fields(days = week.days.len()))]
    pub fn rebalance(
        &self,
        week: &mut WeekPlan,
        counters: &mut WeeklyCounters,
        roster: &RosterModel,
    ) -> RebalanceReport {
        for driver in roster.drivers().iter().filter(|d| {
            d.is_certified && !d.may_drive_stepvan() && counters.stepvan_count(&d.key) == 0
        }) {
            debug!(
                driver = %driver.key,
                semi_restricted = driver.is_semi_restricted,
                is_new = driver.is_new,
                "认证司机无 stepvan 但不参与再平衡"
            );
        }

        let candidates: Vec<DriverKey> = roster
            .drivers()
            .iter()
            .filter(|d| d.may_drive_stepvan())
            .filter(|d| counters.stepvan_count(&d.key) == 0)
            .map(|d| d.key.clone())
            .collect();

        let mut report = RebalanceReport {
            candidates: candidates.clone(),
            ..Default::default()
        };

        if candidates.is_empty() {
            info!("stepvan 公平性已满足,无需再平衡");
            return report;
        }
        info!(count = candidates.len(), "认证司机本周无 stepvan,开始再平衡");

        for driver in candidates {
            match self.try_swap_in(&driver, week, counters, roster) {
                Some(entry) => {
                    info!(
                        driver_in = %driver,
                        driver_out = %entry.driver_out,
                        day = %entry.day,
                        category = %entry.from_category,
                        "公平性调换"
                    );
                    week.audit_log.append(entry);
                    report.swaps += 1;
                }
                None => {
                    warn!(driver = %driver, "未找到可调换的日期/对象,保持未服务");
                    report.unserved.push(driver);
                }
            }
        }

        info!(
            swaps = report.swaps,
            unserved = report.unserved.len(),
            "再平衡完成"
        );
        report
    }

    /// 为单个司机寻找首个可调换位置并执行
    fn try_swap_in(
        &self,
        driver: &DriverKey,
        week: &mut WeekPlan,
        counters: &mut WeeklyCounters,
        roster: &RosterModel,
    ) -> Option<AuditEntry> {
        for day in Weekday::ALL {
            if !roster.is_available(driver, day) {
                continue;
            }

            let current = week.day(day).category_of(driver);
            // 由 DOT-Helper 转入不增加周上限占用
            let cap_delta = if current == Some(DutyCategory::CertifiedHelper) { 0 } else { 1 };
            if counters.dot_weekly_count(driver) + cap_delta > self.policy.weekly_cap {
                debug!(driver = %driver, day = %day, "换入将超过周上限,跳过");
                continue;
            }

            for category in [DutyCategory::CertifiedDuty, DutyCategory::CertifiedHelperRoute] {
                let Some(victim) = Self::pick_victim(week.day(day), category, counters) else {
                    continue;
                };
                Self::apply_swap(week.day_mut(day), category, driver, &victim, current, counters);
                return Some(
                    AuditEntry::new(
                        Some(driver.clone()),
                        victim,
                        day,
                        category,
                        DutyCategory::Standard,
                        AuditReason::StepvanFairness,
                    )
                    .with_driver_in_previous(current),
                );
            }
        }
        None
    }

    /// 选择换出对象
    ///
    /// # 规则
    /// - stepvan_count 最高者优先,并列取类别中位置靠前者
    /// - 换出后必须仍有至少一个 stepvan 名额（stepvan_count >= 2）
    fn pick_victim(
        day: &DayAssignment,
        category: DutyCategory,
        counters: &WeeklyCounters,
    ) -> Option<DriverKey> {
        day.members(category)
            .iter()
            .enumerate()
            .filter(|(_, k)| counters.stepvan_count(k) >= 2)
            .max_by_key(|(i, k)| (counters.stepvan_count(k), Reverse(*i)))
            .map(|(_, k)| k.clone())
    }

    /// 执行调换并维护计数
    fn apply_swap(
        day: &mut DayAssignment,
        category: DutyCategory,
        incoming: &DriverKey,
        victim: &DriverKey,
        incoming_previous: Option<DutyCategory>,
        counters: &mut WeeklyCounters,
    ) {
        // 换入司机先离开当天原类别
        day.standby_capped.retain(|k| k != incoming);
        if let Some(previous) = incoming_previous {
            day.remove(incoming);
            match previous {
                DutyCategory::CertifiedHelper => {
                    counters.release_certified_assignment(incoming, previous);
                    for pairing in day.pairings.iter_mut() {
                        if pairing.helper.as_ref() == Some(incoming) {
                            pairing.helper = None;
                        }
                    }
                }
                DutyCategory::Standby => counters.release_standby(incoming),
                _ => {}
            }
        }

        day.replace_in(category, victim, incoming.clone());
        if category == DutyCategory::CertifiedHelperRoute {
            for pairing in day.pairings.iter_mut() {
                if &pairing.helper_route == victim {
                    pairing.helper_route = incoming.clone();
                }
            }
        }
        counters.record_certified_assignment(incoming, category);

        counters.release_certified_assignment(victim, category);
        if !day.standard.contains(victim) {
            day.standard.push(victim.clone());
        }
    }
}

impl Default for FairnessRebalancer {
    fn default() -> Self {
        Self::new(AllocationPolicy::default())
    }
}
