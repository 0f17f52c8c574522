// ==========================================
// DayAllocator 引擎集成测试
// ==========================================
// 测试目标: 验证单日分配的七个步骤
// 覆盖范围: 新司机优先 XL、周上限、半限制、公平性分层、帮手上限、待命上限
// ==========================================

mod helpers;

use helpers::test_data_builder::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use weekly_dispatch::domain::counters::{AllocationPolicy, WeeklyCounters};
use weekly_dispatch::domain::driver::RosterModel;
use weekly_dispatch::domain::plan::DayTarget;
use weekly_dispatch::domain::types::{DutyCategory, Weekday};
use weekly_dispatch::engine::{DayAllocationResult, DayAllocator};

// ==========================================
// 测试辅助函数
// ==========================================

fn allocate(
    roster: &RosterModel,
    day: Weekday,
    target: DayTarget,
    counters: &mut WeeklyCounters,
    seed: u64,
) -> DayAllocationResult {
    let pool = roster.pool_for(day);
    let new_available = roster.new_drivers_available(day);
    DayAllocator::default().allocate_day(
        day,
        &pool,
        &new_available,
        &target,
        roster,
        counters,
        &mut StdRng::seed_from_u64(seed),
    )
}

// ==========================================
// 步骤1: 新司机
// ==========================================

#[test]
fn test_new_drivers_fill_standard_first() {
    println!("\n=== 测试：新司机优先进入 XL ===");

    let roster = RosterBuilder::new()
        .driver(DriverBuilder::new("Rookie One").available_all_week().new_driver())
        .driver(DriverBuilder::new("Rookie Two").available_all_week().new_driver())
        .driver(DriverBuilder::new("Veteran").available_all_week())
        .build();
    let mut counters = WeeklyCounters::for_roster(&roster);

    let result = allocate(&roster, Weekday::Sun, DayTarget::new(0, 0, 0, 1), &mut counters, 7);
    let a = &result.assignment;

    println!("  - XL: {:?}", a.standard);
    println!("  - 未分配新司机: {:?}", a.unassigned_new);

    assert_eq!(a.standard.len(), 1);
    assert!(roster.get(&a.standard[0]).unwrap().is_new, "XL 名额应先给新司机");
    assert_eq!(a.unassigned_new.len(), 1);
    assert!(
        !a.standby.contains(&a.unassigned_new[0]),
        "未分配的新司机不进入待命"
    );
    assert_eq!(a.standby, vec![key("veteran")], "老司机进入待命");

    println!("=== 测试通过 ===\n");
}

#[test]
fn test_new_certified_driver_never_takes_stepvan() {
    println!("\n=== 测试：认证新司机不进入 DOT ===");

    let roster = RosterBuilder::new()
        .driver(DriverBuilder::new("Fresh Cert").certified_all_week().new_driver())
        .build();
    let mut counters = WeeklyCounters::for_roster(&roster);

    let result = allocate(&roster, Weekday::Mon, DayTarget::new(1, 1, 1, 0), &mut counters, 1);
    let a = &result.assignment;

    assert!(a.certified_duty.is_empty());
    assert!(a.certified_helper_route.is_empty());
    assert!(a.certified_helper.is_empty());
    assert_eq!(a.unassigned_new, vec![key("fresh cert")]);
    assert_eq!(result.shortfalls.len(), 3, "三个认证类别均部分填充");

    println!("=== 测试通过 ===\n");
}

// ==========================================
// 步骤2-3: 认证类别
// ==========================================

#[test]
fn test_weekly_cap_enforced_across_days() {
    println!("\n=== 测试：周上限跨天生效 ===");

    let roster = RosterBuilder::new()
        .driver(DriverBuilder::new("Cap Driver").certified_all_week())
        .build();
    let mut counters = WeeklyCounters::for_roster(&roster);

    let mut duty_days = Vec::new();
    for day in Weekday::ALL {
        let result = allocate(&roster, day, DayTarget::new(1, 0, 0, 0), &mut counters, 11);
        if !result.assignment.certified_duty.is_empty() {
            duty_days.push(day);
        }
    }

    println!("  - DOT 日: {:?}", duty_days);
    assert_eq!(duty_days, vec![Weekday::Sun, Weekday::Mon]);
    assert_eq!(counters.dot_weekly_count(&key("cap driver")), 2);
    assert_eq!(counters.stepvan_count(&key("cap driver")), 2);

    println!("=== 测试通过 ===\n");
}

#[test]
fn test_semi_restricted_only_as_helper() {
    println!("\n=== 测试：半限制司机只能做帮手 ===");

    let roster = RosterBuilder::new()
        .driver(DriverBuilder::new("Semi Cert").certified_all_week().semi_restricted())
        .build();
    let mut counters = WeeklyCounters::for_roster(&roster);

    let result = allocate(&roster, Weekday::Tue, DayTarget::new(1, 1, 1, 0), &mut counters, 3);
    let a = &result.assignment;

    assert!(a.certified_duty.is_empty());
    assert!(a.certified_helper_route.is_empty());
    assert_eq!(a.certified_helper, vec![key("semi cert")]);
    assert_eq!(counters.dot_weekly_count(&key("semi cert")), 1, "帮手计入周上限");
    assert_eq!(counters.stepvan_count(&key("semi cert")), 0, "帮手不计 stepvan");

    println!("=== 测试通过 ===\n");
}

#[test]
fn test_fairness_tier_prefers_unserved() {
    println!("\n=== 测试：stepvan 为 0 的司机优先 ===");

    let roster = RosterBuilder::new()
        .driver(DriverBuilder::new("Served").certified_all_week())
        .driver(DriverBuilder::new("Waiting").certified_all_week())
        .build();

    for seed in 0..20 {
        let mut counters = WeeklyCounters::for_roster(&roster);
        counters.record_certified_assignment(&key("served"), DutyCategory::CertifiedDuty);

        let result = allocate(&roster, Weekday::Wed, DayTarget::new(1, 0, 0, 0), &mut counters, seed);
        assert_eq!(
            result.assignment.certified_duty,
            vec![key("waiting")],
            "seed {} 下应选择第 0 层",
            seed
        );
    }

    println!("=== 测试通过 ===\n");
}

#[test]
fn test_helper_route_retiers_after_duty() {
    println!("\n=== 测试：HelperRoute 按更新后的计数重新分层 ===");

    let roster = RosterBuilder::new()
        .driver(DriverBuilder::new("One").certified_all_week())
        .driver(DriverBuilder::new("Two").certified_all_week())
        .driver(DriverBuilder::new("Three").certified_all_week())
        .build();
    let mut counters = WeeklyCounters::for_roster(&roster);
    counters.record_certified_assignment(&key("one"), DutyCategory::CertifiedDuty);

    let result = allocate(&roster, Weekday::Thu, DayTarget::new(1, 1, 0, 0), &mut counters, 5);
    let a = &result.assignment;

    // 第 0 层为 two / three,两个名额都应落在这一层
    let mut stepvan: Vec<_> = a
        .certified_duty
        .iter()
        .chain(a.certified_helper_route.iter())
        .cloned()
        .collect();
    stepvan.sort();
    assert_eq!(stepvan, vec![key("three"), key("two")]);
    assert!(a.standby.contains(&key("one")));

    println!("=== 测试通过 ===\n");
}

// ==========================================
// 步骤4: 帮手
// ==========================================

#[test]
fn test_capped_certified_driver_excluded_from_helper() {
    println!("\n=== 测试：达到周上限的认证司机不能做帮手 ===");

    let roster = RosterBuilder::new()
        .driver(DriverBuilder::new("Capped").certified_all_week())
        .driver(DriverBuilder::new("Plain").available_all_week())
        .build();
    let mut counters = WeeklyCounters::for_roster(&roster);
    counters.record_certified_assignment(&key("capped"), DutyCategory::CertifiedDuty);
    counters.record_certified_assignment(&key("capped"), DutyCategory::CertifiedDuty);

    let result = allocate(&roster, Weekday::Fri, DayTarget::new(0, 0, 2, 0), &mut counters, 9);

    assert_eq!(result.assignment.certified_helper, vec![key("plain")]);
    assert_eq!(counters.dot_weekly_count(&key("capped")), 2);
    assert_eq!(counters.dot_weekly_count(&key("plain")), 0, "非认证司机不计数");

    println!("=== 测试通过 ===\n");
}

// ==========================================
// 步骤7: 待命
// ==========================================

#[test]
fn test_standby_cap_leaves_driver_unassigned() {
    println!("\n=== 测试：待命上限满后当天无分配 ===");

    let roster = RosterBuilder::new()
        .driver(DriverBuilder::new("Idle").available_all_week())
        .build();
    let mut counters = WeeklyCounters::for_roster(&roster);

    let mut standby_days = Vec::new();
    let mut capped_days = Vec::new();
    for day in Weekday::ALL {
        let result = allocate(&roster, day, DayTarget::zero(), &mut counters, 2);
        if !result.assignment.standby.is_empty() {
            standby_days.push(day);
        }
        if !result.assignment.standby_capped.is_empty() {
            capped_days.push(day);
        }
        assert_eq!(result.assignment.assigned_count(), result.assignment.standby.len());
    }

    println!("  - 待命日: {:?}", standby_days);
    assert_eq!(standby_days, vec![Weekday::Sun, Weekday::Mon]);
    assert_eq!(capped_days.len(), 5);
    assert_eq!(counters.standby_count(&key("idle")), 2);

    println!("=== 测试通过 ===\n");
}

#[test]
fn test_custom_policy_caps() {
    println!("\n=== 测试：自定义上限 ===");

    let roster = RosterBuilder::new()
        .driver(DriverBuilder::new("Busy").certified_all_week())
        .build();
    let mut counters = WeeklyCounters::for_roster(&roster);
    let allocator = DayAllocator::new(AllocationPolicy {
        weekly_cap: 3,
        standby_cap: 0,
    });
    let mut rng = StdRng::seed_from_u64(4);

    let mut duty = 0;
    for day in Weekday::ALL {
        let result = allocator.allocate_day(
            day,
            &roster.pool_for(day),
            &[],
            &DayTarget::new(1, 0, 0, 0),
            &roster,
            &mut counters,
            &mut rng,
        );
        duty += result.assignment.certified_duty.len();
        assert!(result.assignment.standby.is_empty(), "待命上限为 0");
    }
    assert_eq!(duty, 3);

    println!("=== 测试通过 ===\n");
}

// ==========================================
// 不变量: 不相交 + 可复现
// ==========================================

#[test]
fn test_categories_disjoint_and_seed_reproducible() {
    println!("\n=== 测试：类别不相交且同种子可复现 ===");

    let mut builder = RosterBuilder::new();
    for i in 0..6 {
        builder = builder.driver(DriverBuilder::new(&format!("Cert {}", i)).certified_all_week());
    }
    for i in 0..6 {
        builder = builder.driver(DriverBuilder::new(&format!("Plain {}", i)).available_all_week());
    }
    let roster = builder
        .driver(DriverBuilder::new("Newbie").available_all_week().new_driver())
        .build();
    let target = DayTarget::new(2, 2, 2, 3);

    let mut c1 = WeeklyCounters::for_roster(&roster);
    let mut c2 = WeeklyCounters::for_roster(&roster);
    let first = allocate(&roster, Weekday::Sat, target, &mut c1, 42);
    let second = allocate(&roster, Weekday::Sat, target, &mut c2, 42);

    assert!(first.assignment.is_disjoint());
    assert_eq!(first.assignment, second.assignment, "同种子结果应一致");
    assert!(first.assignment.standard.contains(&key("newbie")));
    assert_eq!(first.assignment.pairings.len(), 2);
    assert!(first
        .assignment
        .pairings
        .iter()
        .all(|p| p.helper.is_some()));

    println!("=== 测试通过 ===\n");
}
