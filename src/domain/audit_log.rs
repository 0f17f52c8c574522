// ==========================================
// 每周派车分配系统 - 审计日志领域模型
// ==========================================
// 红线: 仅追加,不可修改/删除
// 用途: 记录每一次公平性调换与待命修复,供报告追溯
// ==========================================

use crate::domain::driver::DriverKey;
use crate::domain::types::{AuditReason, DutyCategory, Weekday};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// AuditEntry - 审计条目
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    // ===== 标识 =====
    pub entry_id: String,          // 条目ID (UUID)
    pub recorded_at: NaiveDateTime, // 记录时间

    // ===== 动作内容 =====
    pub driver_in: Option<DriverKey>, // 换入司机（修复动作为 None）
    pub driver_out: DriverKey,        // 换出/被调整司机
    pub day: Weekday,                 // 发生日
    pub from_category: DutyCategory,  // driver_out 原类别
    pub to_category: DutyCategory,    // driver_out 新类别
    pub reason: AuditReason,          // 原因

    // ===== 扩展 =====
    pub driver_in_previous: Option<DutyCategory>, // 换入司机当天原类别
    pub detail: Option<String>,
}

impl AuditEntry {
    /// 创建审计条目
    ///
    /// # 参数
    /// - `driver_in`: 换入司机
    /// - `driver_out`: 换出/被调整司机
    /// - `day`: 发生日
    /// - `from_category` / `to_category`: driver_out 的类别变化
    /// - `reason`: 原因
    pub fn new(
        driver_in: Option<DriverKey>,
        driver_out: DriverKey,
        day: Weekday,
        from_category: DutyCategory,
        to_category: DutyCategory,
        reason: AuditReason,
    ) -> Self {
        Self {
            entry_id: uuid::Uuid::new_v4().to_string(),
            recorded_at: chrono::Utc::now().naive_utc(),
            driver_in,
            driver_out,
            day,
            from_category,
            to_category,
            reason,
            driver_in_previous: None,
            detail: None,
        }
    }

    pub fn with_driver_in_previous(mut self, previous: Option<DutyCategory>) -> Self {
        self.driver_in_previous = previous;
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// 生成单行描述
    pub fn describe(&self) -> String {
        match (&self.reason, &self.driver_in) {
            (AuditReason::StepvanFairness, Some(incoming)) => format!(
                "Swapped {} with {} on {} ({} -> {})",
                self.driver_out, incoming, self.day, self.from_category, self.to_category
            ),
            _ => format!(
                "Moved {} from {} to {} on {}",
                self.driver_out, self.from_category, self.to_category, self.day
            ),
        }
    }
}

// ==========================================
// AuditLog - 审计日志
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditLog {
    entries: Vec<AuditEntry>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加条目
    pub fn append(&mut self, entry: AuditEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn by_reason(&self, reason: AuditReason) -> impl Iterator<Item = &AuditEntry> {
        self.entries.iter().filter(move |e| e.reason == reason)
    }

    /// 生成简短摘要文本
    pub fn generate_summary_text(&self) -> String {
        let swaps = self.by_reason(AuditReason::StepvanFairness).count();
        let repairs = self.by_reason(AuditReason::StandbyCapRepair).count();
        if swaps == 0 && repairs == 0 {
            return "no adjustments".to_string();
        }
        format!("{} swaps, {} standby repairs", swaps, repairs)
    }
}
