// ==========================================
// 每周派车分配系统 - 日分配引擎
// ==========================================
// 红线: 周上限与待命上限在选择时强制,不做事后截断
// 红线: 新司机只进入 XL
// ==========================================
// 职责: 单日池 + 日目标 → 五类分配,原地累加周计数
// 输入: 当天池 + 当天可用新司机 + 日目标 + 周计数器
// 输出: DayAssignment + 缺额明细
// ==========================================

use crate::domain::counters::{AllocationPolicy, WeeklyCounters};
use crate::domain::driver::{DriverKey, RosterModel};
use crate::domain::plan::{DayAssignment, DayTarget, Pairing};
use crate::domain::types::{DutyCategory, Weekday};
use crate::engine::eligibility::EligibilityRules;
use crate::engine::sampler::TieredSampler;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, instrument, warn};

// ==========================================
// Shortfall - 缺额记录
// ==========================================
// 供给不足时静默部分填充,这里只记录供报告展示
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortfall {
    pub category: DutyCategory,
    pub requested: u32,
    pub filled: u32,
}

/// 单日分配结果
#[derive(Debug, Clone)]
pub struct DayAllocationResult {
    pub assignment: DayAssignment,
    pub shortfalls: Vec<Shortfall>,
}

// ==========================================
// DayAllocator - 日分配引擎
// ==========================================
pub struct DayAllocator {
    policy: AllocationPolicy,
}

impl DayAllocator {
    pub fn new(policy: AllocationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &AllocationPolicy {
        &self.policy
    }

    /// 执行单日分配
    ///
    /// 顺序（每步先移除已选司机再进入下一步）:
    /// 1) 新司机优先进入 XL
    /// 2) DOT: 认证/非半限制/未达周上限,按 stepvan_count 分层
    /// 3) DOT-HelperRoute: 剩余候选重新分层
    /// 4) DOT-Helper: 无认证要求（认证司机仍受周上限约束）
    /// 5) XL 剩余名额
    /// 6) HelperRoute 与 Helper 配对
    /// 7) 待命: 其余池内司机,受待命上限约束
    ///
    /// # 参数
    /// - `day`: 分配日
    /// - `pool`: 当天非 Unavailable 的司机
    /// - `new_available`: 当天可用的新司机
    /// - `target`: 日目标
    /// - `roster`: 花名册（只读）
    /// - `counters`: 周计数器（原地修改）
    /// - `rng`: 随机源
    #[allow(clippy::too_many_arguments)]
    #[instrument(skip_all, fields(day = %day, pool_size = pool.len()))]
    pub fn allocate_day<R: Rng + ?Sized>(
        &self,
        day: Weekday,
        pool: &[DriverKey],
        new_available: &[DriverKey],
        target: &DayTarget,
        roster: &RosterModel,
        counters: &mut WeeklyCounters,
        rng: &mut R,
    ) -> DayAllocationResult {
        let mut assignment = DayAssignment::empty(day);
        let mut shortfalls = Vec::new();

        let pool_set: HashSet<&DriverKey> = pool.iter().collect();
        let new_in_pool: Vec<DriverKey> = new_available
            .iter()
            .filter(|k| pool_set.contains(k))
            .cloned()
            .collect();

        // 新司机无论是否排入 XL,当天都不进入其他类别
        let mut taken: HashSet<DriverKey> = new_in_pool.iter().cloned().collect();

        // ==========================================
        // 步骤1: 新司机优先 XL
        // ==========================================
        let new_for_standard =
            TieredSampler::sample(new_in_pool.clone(), target.standard as usize, rng);
        let remaining_standard = target.standard as usize - new_for_standard.len();
        assignment.unassigned_new = new_in_pool
            .iter()
            .filter(|k| !new_for_standard.contains(k))
            .cloned()
            .collect();
        if !assignment.unassigned_new.is_empty() {
            warn!(
                count = assignment.unassigned_new.len(),
                "新司机可用但 XL 名额不足,当天不分配"
            );
        }
        assignment.standard = new_for_standard;
        debug!(
            new_in_standard = assignment.standard.len(),
            remaining_standard, "步骤1: 新司机 XL 完成"
        );

        // ==========================================
        // 步骤2: DOT
        // ==========================================
        let eligible =
            EligibilityRules::stepvan_candidates(pool, &taken, roster, counters, &self.policy);
        let tiers = EligibilityRules::partition_by_stepvan(&eligible, counters);
        let duty = TieredSampler::sample_tiered(tiers, target.certified_duty as usize, rng);
        for key in &duty {
            counters.record_certified_assignment(key, DutyCategory::CertifiedDuty);
            taken.insert(key.clone());
        }
        assignment.certified_duty = duty;

        // ==========================================
        // 步骤3: DOT-HelperRoute（按更新后的 stepvan_count 重新分层）
        // ==========================================
        let remaining_eligible: Vec<DriverKey> = eligible
            .into_iter()
            .filter(|k| !taken.contains(k))
            .collect();
        let tiers = EligibilityRules::partition_by_stepvan(&remaining_eligible, counters);
        let helper_route =
            TieredSampler::sample_tiered(tiers, target.certified_helper_route as usize, rng);
        for key in &helper_route {
            counters.record_certified_assignment(key, DutyCategory::CertifiedHelperRoute);
            taken.insert(key.clone());
        }
        assignment.certified_helper_route = helper_route;

        // ==========================================
        // 步骤4: DOT-Helper
        // ==========================================
        let helper_pool =
            EligibilityRules::helper_candidates(pool, &taken, counters, &self.policy);
        let helpers = TieredSampler::sample(helper_pool, target.certified_helper as usize, rng);
        for key in &helpers {
            counters.record_certified_assignment(key, DutyCategory::CertifiedHelper);
            taken.insert(key.clone());
        }
        assignment.certified_helper = helpers;

        // ==========================================
        // 步骤5: XL 剩余名额
        // ==========================================
        let rest: Vec<DriverKey> = pool.iter().filter(|k| !taken.contains(*k)).cloned().collect();
        let standard_fill = TieredSampler::sample(rest, remaining_standard, rng);
        for key in &standard_fill {
            taken.insert(key.clone());
        }
        assignment.standard.extend(standard_fill);

        // ==========================================
        // 步骤6: 配对
        // ==========================================
        let mut shuffled_helpers =
            TieredSampler::shuffled(&assignment.certified_helper, rng).into_iter();
        assignment.pairings = assignment
            .certified_helper_route
            .iter()
            .map(|route| Pairing {
                helper_route: route.clone(),
                helper: shuffled_helpers.next(),
            })
            .collect();

        // ==========================================
        // 步骤7: 待命（受上限约束）
        // ==========================================
        for key in pool.iter().filter(|k| !taken.contains(*k)) {
            if EligibilityRules::under_standby_cap(key, counters, &self.policy) {
                counters.record_standby(key);
                assignment.standby.push(key.clone());
            } else {
                assignment.standby_capped.push(key.clone());
            }
        }
        if !assignment.standby_capped.is_empty() {
            warn!(
                count = assignment.standby_capped.len(),
                "待命上限已满,司机当天无分配"
            );
        }

        // ==========================================
        // 缺额统计
        // ==========================================
        for (category, requested) in [
            (DutyCategory::CertifiedDuty, target.certified_duty),
            (DutyCategory::CertifiedHelperRoute, target.certified_helper_route),
            (DutyCategory::CertifiedHelper, target.certified_helper),
            (DutyCategory::Standard, target.standard),
        ] {
            let filled = assignment.members(category).len() as u32;
            if filled < requested {
                debug!(category = %category, requested, filled, "类别部分填充");
                shortfalls.push(Shortfall {
                    category,
                    requested,
                    filled,
                });
            }
        }

        debug!(
            dot = assignment.certified_duty.len(),
            dot_helper_route = assignment.certified_helper_route.len(),
            dot_helper = assignment.certified_helper.len(),
            xl = assignment.standard.len(),
            standby = assignment.standby.len(),
            "单日分配完成"
        );

        DayAllocationResult {
            assignment,
            shortfalls,
        }
    }
}

impl Default for DayAllocator {
    fn default() -> Self {
        Self::new(AllocationPolicy::default())
    }
}
