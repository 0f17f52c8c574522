// ==========================================
// 每周派车分配系统 - 资格判定纯函数库
// ==========================================
// 职责: stepvan 资格、公平性分层、待命上限判定
// 红线: 无状态、无副作用、无 I/O 操作
// ==========================================

use crate::domain::counters::{AllocationPolicy, WeeklyCounters};
use crate::domain::driver::{DriverKey, RosterModel};
use std::collections::{BTreeMap, HashSet};

// ==========================================
// EligibilityRules - 纯函数工具类
// ==========================================
pub struct EligibilityRules;

impl EligibilityRules {
    /// 是否仍有周上限余量
    pub fn under_weekly_cap(
        key: &DriverKey,
        counters: &WeeklyCounters,
        policy: &AllocationPolicy,
    ) -> bool {
        counters.dot_weekly_count(key) < policy.weekly_cap
    }

    /// 是否仍可排待命
    pub fn under_standby_cap(
        key: &DriverKey,
        counters: &WeeklyCounters,
        policy: &AllocationPolicy,
    ) -> bool {
        counters.standby_count(key) < policy.standby_cap
    }

    /// 计算 stepvan（DOT / DOT-HelperRoute）候选集合
    ///
    /// # 规则
    /// 1. 在当天池中
    /// 2. 认证、非半限制、非新司机
    /// 3. dot_weekly_count < weekly_cap
    /// 4. 不在 `taken` 中（当天已选）
    ///
    /// # 返回
    /// 候选键（保持池顺序）
    pub fn stepvan_candidates(
        pool: &[DriverKey],
        taken: &HashSet<DriverKey>,
        roster: &RosterModel,
        counters: &WeeklyCounters,
        policy: &AllocationPolicy,
    ) -> Vec<DriverKey> {
        pool.iter()
            .filter(|k| !taken.contains(*k))
            .filter(|k| roster.get(k).map(|d| d.may_drive_stepvan()).unwrap_or(false))
            .filter(|k| Self::under_weekly_cap(k, counters, policy))
            .cloned()
            .collect()
    }

    /// 帮手候选: 无认证要求; 认证司机仍受周上限约束
    pub fn helper_candidates(
        pool: &[DriverKey],
        taken: &HashSet<DriverKey>,
        counters: &WeeklyCounters,
        policy: &AllocationPolicy,
    ) -> Vec<DriverKey> {
        pool.iter()
            .filter(|k| !taken.contains(*k))
            .filter(|k| {
                !counters.is_tracked_certified(k) || Self::under_weekly_cap(k, counters, policy)
            })
            .cloned()
            .collect()
    }

    /// 按 stepvan_count 升序分层
    ///
    /// # 返回
    /// 层列表: 第 0 层为 stepvan_count 最小者; 层内保持输入顺序（随后由采样器打乱）
    pub fn partition_by_stepvan(
        candidates: &[DriverKey],
        counters: &WeeklyCounters,
    ) -> Vec<Vec<DriverKey>> {
        let mut tiers: BTreeMap<u32, Vec<DriverKey>> = BTreeMap::new();
        for key in candidates {
            tiers
                .entry(counters.stepvan_count(key))
                .or_default()
                .push(key.clone());
        }
        tiers.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::driver::Driver;
    use crate::domain::types::Availability::{Available as A, CertifiedAvailable as C};
    use crate::domain::types::DutyCategory;

    fn k(s: &str) -> DriverKey {
        DriverKey::new(s)
    }

    fn roster() -> RosterModel {
        RosterModel::build(
            vec![
                Driver::new("cert one", [C; 7]),
                Driver::new("cert two", [C; 7]),
                Driver::new("semi", [C; 7]),
                Driver::new("rookie", [C; 7]),
                Driver::new("plain", [A; 7]),
            ],
            &[k("rookie")],
            &[k("semi")],
        )
        .unwrap()
    }

    #[test]
    fn test_stepvan_candidates_rules() {
        let roster = roster();
        let policy = AllocationPolicy::default();
        let mut counters = WeeklyCounters::for_roster(&roster);
        let pool: Vec<DriverKey> = roster.drivers().iter().map(|d| d.key.clone()).collect();

        let got = EligibilityRules::stepvan_candidates(
            &pool,
            &HashSet::new(),
            &roster,
            &counters,
            &policy,
        );
        assert_eq!(got, vec![k("cert one"), k("cert two")]);

        // 周上限耗尽
        counters.record_certified_assignment(&k("cert two"), DutyCategory::CertifiedDuty);
        counters.record_certified_assignment(&k("cert two"), DutyCategory::CertifiedHelper);
        let taken: HashSet<DriverKey> = [k("cert one")].into_iter().collect();
        let got =
            EligibilityRules::stepvan_candidates(&pool, &taken, &roster, &counters, &policy);
        assert!(got.is_empty());

        // 帮手: 非认证司机不受上限约束, 已满上限的认证司机被排除
        let helpers = EligibilityRules::helper_candidates(&pool, &taken, &counters, &policy);
        assert_eq!(helpers, vec![k("semi"), k("rookie"), k("plain")]);
    }

    #[test]
    fn test_partition_by_stepvan_orders_tiers() {
        let roster = roster();
        let mut counters = WeeklyCounters::for_roster(&roster);
        counters.record_certified_assignment(&k("cert one"), DutyCategory::CertifiedDuty);

        let tiers = EligibilityRules::partition_by_stepvan(
            &[k("cert one"), k("cert two"), k("semi")],
            &counters,
        );
        assert_eq!(tiers.len(), 2);
        assert_eq!(tiers[0], vec![k("cert two"), k("semi")]);
        assert_eq!(tiers[1], vec![k("cert one")]);
    }
}
