// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use weekly_dispatch::domain::driver::{Driver, DriverKey, RosterModel};
use weekly_dispatch::domain::plan::DayTarget;
use weekly_dispatch::domain::types::{Availability, Weekday};

/// 键简写
pub fn key(name: &str) -> DriverKey {
    DriverKey::new(name)
}

// ==========================================
// Driver 构建器
// ==========================================
// 默认整周不可出勤; 通过 available_on / certified_on 逐天开放

pub struct DriverBuilder {
    name: String,
    availability: [Availability; 7],
    is_new: bool,
    is_semi_restricted: bool,
}

impl DriverBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            availability: [Availability::Unavailable; 7],
            is_new: false,
            is_semi_restricted: false,
        }
    }

    pub fn available_on(mut self, days: &[Weekday]) -> Self {
        for day in days {
            self.availability[day.index()] = Availability::Available;
        }
        self
    }

    pub fn certified_on(mut self, days: &[Weekday]) -> Self {
        for day in days {
            self.availability[day.index()] = Availability::CertifiedAvailable;
        }
        self
    }

    pub fn available_all_week(self) -> Self {
        self.available_on(&Weekday::ALL)
    }

    pub fn certified_all_week(self) -> Self {
        self.certified_on(&Weekday::ALL)
    }

    pub fn new_driver(mut self) -> Self {
        self.is_new = true;
        self
    }

    pub fn semi_restricted(mut self) -> Self {
        self.is_semi_restricted = true;
        self
    }

    pub fn build(self) -> Driver {
        Driver::new(&self.name, self.availability)
    }
}

// ==========================================
// RosterModel 构建器
// ==========================================

#[derive(Default)]
pub struct RosterBuilder {
    drivers: Vec<Driver>,
    new_drivers: Vec<DriverKey>,
    semi_restricted: Vec<DriverKey>,
}

impl RosterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn driver(mut self, builder: DriverBuilder) -> Self {
        if builder.is_new {
            self.new_drivers.push(key(&builder.name));
        }
        if builder.is_semi_restricted {
            self.semi_restricted.push(key(&builder.name));
        }
        self.drivers.push(builder.build());
        self
    }

    pub fn build(self) -> RosterModel {
        RosterModel::build(self.drivers, &self.new_drivers, &self.semi_restricted)
            .expect("测试花名册构造失败")
    }
}

// ==========================================
// DayTarget 构建
// ==========================================

/// 七天全零目标
pub fn zero_targets() -> [DayTarget; 7] {
    [DayTarget::zero(); 7]
}

/// 为指定日子设置目标,其余为零
pub fn targets_with(days: &[(Weekday, DayTarget)]) -> [DayTarget; 7] {
    let mut targets = zero_targets();
    for (day, target) in days {
        targets[day.index()] = *target;
    }
    targets
}
