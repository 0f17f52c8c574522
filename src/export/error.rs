// ==========================================
// 每周派车分配系统 - 导出模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 导出模块错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("输出写入失败: {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV 写入失败: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON 序列化失败: {0}")]
    Json(#[from] serde_json::Error),

    #[error("ISO 周无效: {year} 年第 {week} 周")]
    InvalidWeek { year: i32, week: u32 },
}

/// Result 类型别名
pub type ExportResult<T> = Result<T, ExportError>;
