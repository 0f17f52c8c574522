// ==========================================
// 每周派车分配系统 - 花名册字段映射
// ==========================================
// 职责: 按位置布局把网格行映射为原始司机行
// 规则: 名字与姓氏均为空的行跳过; 缺失单元格视为空
// ==========================================

use crate::config::RosterConfigReader;
use crate::importer::error::{ImportError, ImportResult};
use serde::{Deserialize, Serialize};

// ==========================================
// RosterLayout - 花名册位置布局
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterLayout {
    pub skip_rows: usize,       // 跳过的表头行
    pub max_rows: usize,        // 最多读取行数
    pub col_first_name: usize,  // 名字列
    pub col_last_name: usize,   // 姓氏列
    pub col_day_start: usize,   // 周日列（周一至周六依次向右）
}

impl Default for RosterLayout {
    fn default() -> Self {
        Self {
            skip_rows: 13,
            max_rows: 77,
            col_first_name: 3,
            col_last_name: 4,
            col_day_start: 5,
        }
    }
}

impl RosterLayout {
    /// 从配置读取布局
    pub fn from_config<C: RosterConfigReader + ?Sized>(config: &C) -> ImportResult<Self> {
        let layout = Self {
            skip_rows: config.get_roster_skip_rows()?,
            max_rows: config.get_roster_max_rows()?,
            col_first_name: config.get_roster_col_first_name()?,
            col_last_name: config.get_roster_col_last_name()?,
            col_day_start: config.get_roster_col_day_start()?,
        };
        layout.validate()?;
        Ok(layout)
    }

    /// 名字列不得落在七个状态列之内
    pub fn validate(&self) -> ImportResult<()> {
        let day_cols = self.col_day_start..self.col_day_start + 7;
        for (field, col) in [
            ("first_name", self.col_first_name),
            ("last_name", self.col_last_name),
        ] {
            if day_cols.contains(&col) {
                return Err(ImportError::RosterLayoutError(format!(
                    "{} 列 {} 与状态列 {}..{} 重叠",
                    field, col, day_cols.start, day_cols.end
                )));
            }
        }
        if self.col_first_name == self.col_last_name {
            return Err(ImportError::RosterLayoutError(format!(
                "名字与姓氏使用同一列 {}",
                self.col_first_name
            )));
        }
        Ok(())
    }
}

// ==========================================
// RawDriverRow - 原始司机行
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDriverRow {
    pub row_number: usize,        // 原始文件行号（从 1 开始）
    pub first_name: String,
    pub last_name: String,
    pub raw_status: [String; 7],  // Sun..Sat
}

impl RawDriverRow {
    /// 展示姓名 "{first} {last}"（去除首尾空白）
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

pub struct FieldMapper;

impl FieldMapper {
    /// 映射网格为原始司机行
    pub fn map_rows(&self, grid: &[Vec<String>], layout: &RosterLayout) -> Vec<RawDriverRow> {
        let cell = |row: &[String], col: usize| -> String {
            row.get(col).map(|v| v.trim().to_string()).unwrap_or_default()
        };

        grid.iter()
            .enumerate()
            .skip(layout.skip_rows)
            .take(layout.max_rows)
            .filter_map(|(idx, row)| {
                let first_name = cell(row, layout.col_first_name);
                let last_name = cell(row, layout.col_last_name);
                if first_name.is_empty() && last_name.is_empty() {
                    return None;
                }
                let raw_status = std::array::from_fn(|i| cell(row, layout.col_day_start + i));
                Some(RawDriverRow {
                    row_number: idx + 1,
                    first_name,
                    last_name,
                    raw_status,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_map_rows_respects_window_and_skips_nameless() {
        let layout = RosterLayout {
            skip_rows: 1,
            max_rows: 2,
            col_first_name: 0,
            col_last_name: 1,
            col_day_start: 2,
        };
        let grid = vec![
            row(&["First", "Last", "Sun"]),
            row(&["", "", "1", "1"]),
            row(&["Ann", "", "DOT", "", "1"]),
            row(&["Late", "Row", "1"]),
        ];

        let rows = FieldMapper.map_rows(&grid, &layout);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].row_number, 3);
        assert_eq!(rows[0].display_name(), "Ann");
        assert_eq!(rows[0].raw_status[0], "DOT");
        assert_eq!(rows[0].raw_status[2], "1");
        assert_eq!(rows[0].raw_status[6], "");
    }

    #[test]
    fn test_layout_overlap_rejected() {
        let layout = RosterLayout {
            col_first_name: 6,
            ..RosterLayout::default()
        };
        assert!(matches!(
            layout.validate(),
            Err(ImportError::RosterLayoutError(_))
        ));
        assert!(RosterLayout::default().validate().is_ok());
    }
}
