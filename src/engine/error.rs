// ==========================================
// 每周派车分配系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 引擎内无可恢复错误; 这里只表达前置条件违反（整次运行中止）
//       供给不足 / 上限耗尽 / 无法修复 均为策略结果,不是错误
// ==========================================

use crate::domain::driver::RosterError;
use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("花名册前置条件违反: {0}")]
    Roster(#[from] RosterError),

    #[error("分配参数无效: {0}")]
    InvalidPolicy(String),
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
