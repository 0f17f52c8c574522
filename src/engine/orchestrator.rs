// ==========================================
// 每周派车分配系统 - 周编排器
// ==========================================
// 用途: 协调日分配 → 公平性再平衡 → 待命修复 的执行顺序
// 红线: 七天按 Sun..Sat 顺序串行（后一天依赖前一天的周计数）
// ==========================================

use crate::domain::counters::{AllocationPolicy, WeeklyCounters};
use crate::domain::driver::{DriverKey, RosterModel};
use crate::domain::plan::{DayTarget, WeekPlan};
use crate::domain::types::Weekday;
use crate::engine::day_allocator::{DayAllocator, Shortfall};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::rebalancer::{FairnessRebalancer, RebalanceReport};
use crate::engine::standby_repair::{RepairReport, StandbyCapRepairer};
use crate::perf::PerfGuard;
use rand::Rng;
use tracing::{debug, info, instrument};

// ==========================================
// WeekRunResult - 整周运行结果
// ==========================================
#[derive(Debug, Clone)]
pub struct WeekRunResult {
    pub plan: WeekPlan,
    pub counters: WeeklyCounters,

    // 日分配输出
    pub shortfalls: Vec<(Weekday, Shortfall)>,

    // 事后修正输出
    pub rebalance: RebalanceReport,
    pub repair: RepairReport,
}

impl WeekRunResult {
    /// 整周结束时 stepvan 计数仍为 0 的认证司机
    ///
    /// 包含不参与再平衡的半限制司机与新司机;
    /// 再平衡找不到调换位置的候选见 `rebalance.unserved`
    pub fn unserved(&self) -> Vec<DriverKey> {
        self.counters.unserved_certified()
    }

    /// 因待命上限当天无分配的司机
    pub fn standby_capped(&self) -> impl Iterator<Item = (Weekday, &DriverKey)> + '_ {
        self.plan
            .days
            .iter()
            .flat_map(|d| d.standby_capped.iter().map(move |k| (d.day, k)))
    }
}

// ==========================================
// WeekOrchestrator - 周编排器
// ==========================================
pub struct WeekOrchestrator {
    policy: AllocationPolicy,
    allocator: DayAllocator,
    rebalancer: FairnessRebalancer,
    repairer: StandbyCapRepairer,
}

impl WeekOrchestrator {
    pub fn new(policy: AllocationPolicy) -> Self {
        Self {
            policy,
            allocator: DayAllocator::new(policy),
            rebalancer: FairnessRebalancer::new(policy),
            repairer: StandbyCapRepairer::new(policy),
        }
    }

    pub fn policy(&self) -> &AllocationPolicy {
        &self.policy
    }

    /// 执行整周分配
    ///
    /// # 参数
    /// - `roster`: 花名册（只读）
    /// - `targets`: 七天日目标（按 Sun..Sat）
    /// - `rng`: 随机源
    ///
    /// # 返回
    /// - Ok(WeekRunResult): 定型的周计划与各阶段报告
    /// - Err(EngineError): 前置条件违反
    #[instrument(skip_all, fields(drivers = roster.len()))]
    pub fn run<R: Rng + ?Sized>(
        &self,
        roster: &RosterModel,
        targets: &[DayTarget; 7],
        rng: &mut R,
    ) -> EngineResult<WeekRunResult> {
        let _perf = PerfGuard::new("week_run");
        self.validate()?;

        info!(
            drivers = roster.len(),
            certified = roster.certified_keys().len(),
            "开始整周分配"
        );

        let mut counters = WeeklyCounters::for_roster(roster);
        let mut plan = WeekPlan::empty();
        let mut shortfalls = Vec::new();

        // ==========================================
        // 阶段1: 七天日分配
        // ==========================================
        for day in Weekday::ALL {
            let pool = roster.pool_for(day);
            let new_available = roster.new_drivers_available(day);
            let result = self.allocator.allocate_day(
                day,
                &pool,
                &new_available,
                &targets[day.index()],
                roster,
                &mut counters,
                rng,
            );
            shortfalls.extend(result.shortfalls.into_iter().map(|s| (day, s)));
            *plan.day_mut(day) = result.assignment;
        }
        debug!(shortfalls = shortfalls.len(), "七天日分配完成");

        // ==========================================
        // 阶段2: stepvan 公平性再平衡
        // ==========================================
        let rebalance = {
            let _perf = PerfGuard::new("fairness_rebalance");
            self.rebalancer.rebalance(&mut plan, &mut counters, roster)
        };

        // ==========================================
        // 阶段3: 待命上限修复
        // ==========================================
        let repair = self.repairer.repair(&mut plan);
        counters.sync_standby_from(&plan);

        info!(
            swaps = rebalance.swaps,
            repairs = repair.repaired,
            no_swap_found = rebalance.unserved.len(),
            unserved = counters.unserved_certified().len(),
            summary = %plan.audit_log.generate_summary_text(),
            "整周分配完成"
        );

        Ok(WeekRunResult {
            plan,
            counters,
            shortfalls,
            rebalance,
            repair,
        })
    }

    fn validate(&self) -> EngineResult<()> {
        if self.policy.weekly_cap == 0 {
            return Err(EngineError::InvalidPolicy(
                "weekly_cap 必须至少为 1".to_string(),
            ));
        }
        if self.policy.standby_cap == 0 {
            return Err(EngineError::InvalidPolicy(
                "standby_cap 必须至少为 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for WeekOrchestrator {
    fn default() -> Self {
        Self::new(AllocationPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::driver::Driver;
    use crate::domain::types::Availability::CertifiedAvailable as C;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_zero_targets_everyone_standby_then_repaired() {
        let roster = RosterModel::build(vec![Driver::new("solo", [C; 7])], &[], &[]).unwrap();
        let result = WeekOrchestrator::default()
            .run(&roster, &[DayTarget::zero(); 7], &mut StdRng::seed_from_u64(0))
            .unwrap();

        let key = DriverKey::new("solo");
        assert_eq!(result.counters.standby_count(&key), 2);
        assert_eq!(result.unserved(), &[key]);
        assert_eq!(result.repair.repaired, 0);
    }

    #[test]
    fn test_deserialized_roster_runs_like_original() {
        let roster = RosterModel::build(vec![Driver::new("solo", [C; 7])], &[], &[]).unwrap();
        let json = serde_json::to_string(&roster).unwrap();
        let restored: RosterModel = serde_json::from_str(&json).unwrap();

        let targets = [DayTarget::new(0, 0, 0, 1); 7];
        let a = WeekOrchestrator::default()
            .run(&roster, &targets, &mut StdRng::seed_from_u64(3))
            .unwrap();
        let b = WeekOrchestrator::default()
            .run(&restored, &targets, &mut StdRng::seed_from_u64(3))
            .unwrap();
        assert_eq!(a.plan.days, b.plan.days);
    }

    #[test]
    fn test_zero_weekly_cap_rejected() {
        let roster = RosterModel::default();
        let policy = AllocationPolicy {
            weekly_cap: 0,
            standby_cap: 2,
        };
        let err = WeekOrchestrator::new(policy)
            .run(&roster, &[DayTarget::zero(); 7], &mut StdRng::seed_from_u64(0))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidPolicy(_)));
    }

    #[test]
    fn test_zero_standby_cap_rejected() {
        let roster = RosterModel::build(vec![Driver::new("solo", [C; 7])], &[], &[]).unwrap();
        let policy = AllocationPolicy {
            weekly_cap: 2,
            standby_cap: 0,
        };
        let err = WeekOrchestrator::new(policy)
            .run(&roster, &[DayTarget::zero(); 7], &mut StdRng::seed_from_u64(0))
            .unwrap_err();
        match err {
            EngineError::InvalidPolicy(msg) => assert!(msg.contains("standby_cap")),
            other => panic!("期望 InvalidPolicy, 实际: {:?}", other),
        }
    }
}
