// ==========================================
// 每周派车分配系统 - 引擎层
// ==========================================
// 职责: 实现分配规则,不做文件 I/O
// 红线: 所有事后调整必须写入审计日志
// ==========================================

pub mod day_allocator;
pub mod eligibility;
pub mod error;
pub mod orchestrator;
pub mod rebalancer;
pub mod sampler;
pub mod standby_repair;

// 重导出核心引擎
pub use day_allocator::{DayAllocationResult, DayAllocator, Shortfall};
pub use eligibility::EligibilityRules;
pub use error::{EngineError, EngineResult};
pub use orchestrator::{WeekOrchestrator, WeekRunResult};
pub use rebalancer::{FairnessRebalancer, RebalanceReport};
pub use sampler::TieredSampler;
pub use standby_repair::{RepairReport, StandbyCapRepairer};
