// ==========================================
// 每周派车分配系统 - 状态清洗器实现
// ==========================================
// 职责: 原始单元格 → Availability 标准化 + 数据质量问题记录
// 规则: 可用标记 → Available; 认证标记（不区分大小写）→ CertifiedAvailable;
//       空 → Unavailable; 其他值 → Unavailable 并记录警告
// ==========================================

use crate::config::RosterConfigReader;
use crate::domain::types::{Availability, Weekday};
use crate::importer::error::ImportResult;
use serde::{Deserialize, Serialize};

// ==========================================
// RosterIssue - 花名册数据质量问题
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterIssue {
    pub row_number: usize,   // 原始文件行号
    pub driver: String,      // 展示姓名
    pub day: Weekday,
    pub raw_value: String,   // 原始单元格
    pub message: String,
}

pub struct DataCleaner {
    certified_marker: String,
    available_marker: String,
}

impl DataCleaner {
    pub fn new(certified_marker: &str, available_marker: &str) -> Self {
        Self {
            certified_marker: certified_marker.trim().to_lowercase(),
            available_marker: available_marker.trim().to_string(),
        }
    }

    pub fn from_config<C: RosterConfigReader + ?Sized>(config: &C) -> ImportResult<Self> {
        Ok(Self::new(
            &config.get_certified_marker()?,
            &config.get_available_marker()?,
        ))
    }

    /// 标准化单元格
    ///
    /// # 返回
    /// - (Availability, None): 可识别的值
    /// - (Unavailable, Some(message)): 无法识别的非空值
    pub fn normalize_status(&self, raw: &str) -> (Availability, Option<String>) {
        let value = raw.trim();
        if value.is_empty() {
            return (Availability::Unavailable, None);
        }
        if self.is_available_marker(value) {
            return (Availability::Available, None);
        }
        if value.to_lowercase() == self.certified_marker {
            return (Availability::CertifiedAvailable, None);
        }
        (
            Availability::Unavailable,
            Some(format!("无法识别的状态值 '{}',按不可用处理", value)),
        )
    }

    /// 可用标记比较（电子表格中的数值单元格可能读为 "1.0"）
    fn is_available_marker(&self, value: &str) -> bool {
        if value == self.available_marker {
            return true;
        }
        match (value.parse::<f64>(), self.available_marker.parse::<f64>()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }

    /// 清洗七天状态,收集数据质量问题
    pub fn clean_week(
        &self,
        row_number: usize,
        driver: &str,
        raw_status: &[String; 7],
        issues: &mut Vec<RosterIssue>,
    ) -> [Availability; 7] {
        std::array::from_fn(|i| {
            let (availability, issue) = self.normalize_status(&raw_status[i]);
            if let Some(message) = issue {
                issues.push(RosterIssue {
                    row_number,
                    driver: driver.to_string(),
                    day: Weekday::ALL[i],
                    raw_value: raw_status[i].clone(),
                    message,
                });
            }
            availability
        })
    }
}

impl Default for DataCleaner {
    fn default() -> Self {
        Self::new("dot", "1")
    }
}
