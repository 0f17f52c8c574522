// ==========================================
// 每周派车分配系统 - 领域模型层
// ==========================================
// 职责: 定义花名册、计数器、日/周分配、审计日志
// 红线: 不含文件读写逻辑,不含分配引擎逻辑
// ==========================================

pub mod audit_log;
pub mod counters;
pub mod driver;
pub mod plan;
pub mod types;

// 重导出核心类型
pub use audit_log::{AuditEntry, AuditLog};
pub use counters::{AllocationPolicy, WeeklyCounters};
pub use driver::{Driver, DriverKey, RosterError, RosterModel};
pub use plan::{DayAssignment, DayTarget, Pairing, WeekPlan};
pub use types::{AuditReason, Availability, DutyCategory, Weekday};
