// ==========================================
// 每周派车分配系统 - 待命上限修复
// ==========================================
// 红线: 在公平性再平衡之后执行
// 红线: 幂等（对已满足上限的计划再次执行不产生任何改动）
// ==========================================
// 职责: 将整周待命超过上限的司机,从最晚的待命日起改排 XL
// 说明: XL 容量为建议值,修复可使当天 XL 人数超过目标
// ==========================================

use crate::domain::audit_log::AuditEntry;
use crate::domain::counters::AllocationPolicy;
use crate::domain::driver::DriverKey;
use crate::domain::plan::WeekPlan;
use crate::domain::types::{AuditReason, DutyCategory, Weekday};
use tracing::{info, instrument, warn};

/// 修复结果
#[derive(Debug, Clone, Default)]
pub struct RepairReport {
    pub repaired: usize,             // 移动次数
    pub unrepaired: Vec<DriverKey>,  // 无可移动日仍超限的司机
}

pub struct StandbyCapRepairer {
    policy: AllocationPolicy,
}

impl StandbyCapRepairer {
    pub fn new(policy: AllocationPolicy) -> Self {
        Self { policy }
    }

    /// 执行修复
    #[instrument(skip_all, fields(standby_cap = self.policy.standby_cap))]
    pub fn repair(&self, week: &mut WeekPlan) -> RepairReport {
        let mut over: Vec<(DriverKey, u32)> = week
            .standby_tally()
            .into_iter()
            .filter(|(_, count)| *count > self.policy.standby_cap)
            .collect();
        over.sort();

        let mut report = RepairReport::default();
        if over.is_empty() {
            return report;
        }

        for (driver, mut count) in over {
            while count > self.policy.standby_cap {
                let Some(day) = Self::latest_standby_day(week, &driver) else {
                    warn!(driver = %driver, count, "待命超限但无可移动日");
                    report.unrepaired.push(driver.clone());
                    break;
                };

                let assignment = week.day_mut(day);
                assignment.standby.retain(|k| k != &driver);
                assignment.standard.push(driver.clone());
                count -= 1;

                info!(driver = %driver, day = %day, "待命超限,改排 XL");
                week.audit_log.append(
                    AuditEntry::new(
                        None,
                        driver.clone(),
                        day,
                        DutyCategory::Standby,
                        DutyCategory::Standard,
                        AuditReason::StandbyCapRepair,
                    )
                    .with_detail(format!(
                        "standby {} > cap {}",
                        count + 1,
                        self.policy.standby_cap
                    )),
                );
                report.repaired += 1;
            }
        }

        info!(repaired = report.repaired, "待命上限修复完成");
        report
    }

    fn latest_standby_day(week: &WeekPlan, driver: &DriverKey) -> Option<Weekday> {
        Weekday::ALL
            .into_iter()
            .rev()
            .find(|day| week.day(*day).standby.contains(driver))
    }
}

impl Default for StandbyCapRepairer {
    fn default() -> Self {
        Self::new(AllocationPolicy::default())
    }
}
