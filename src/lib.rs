// ==========================================
// 每周派车分配系统 - 核心库
// ==========================================
// 职责: 按周为司机分配 认证线路 / 帮手线路 / 帮手 / XL / 待命
// 流程: 花名册导入 → 七天日分配 → 公平性再平衡 → 待命修复 → 导出
// 系统定位: 调度辅助工具 (调度员最终确认)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 花名册、计数器、周计划
pub mod domain;

// 引擎层 - 分配规则
pub mod engine;

// 导入层 - 花名册/名单/日目标
pub mod importer;

// 导出层 - 日汇总表/周网格/审计
pub mod export;

// 配置层 - 系统配置
pub mod config;

// 日志系统
pub mod logging;

// 性能计时
pub mod perf;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AuditReason, Availability, DutyCategory, Weekday};

// 领域实体
pub use domain::{
    AllocationPolicy, AuditEntry, AuditLog, DayAssignment, DayTarget, Driver, DriverKey,
    RosterModel, WeekPlan, WeeklyCounters,
};

// 引擎
pub use engine::{
    DayAllocator, EngineError, FairnessRebalancer, StandbyCapRepairer, WeekOrchestrator,
    WeekRunResult,
};

// 导入/导出
pub use export::{ExportWriter, RunSummary, WeekCalendar};
pub use importer::{RosterImport, RosterImporter};

// 配置
pub use config::ConfigManager;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "每周派车分配系统";
