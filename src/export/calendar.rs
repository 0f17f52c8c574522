// ==========================================
// 每周派车分配系统 - 周日历
// ==========================================
// 规则: 一周从周日开始; ISO 第 N 周对应其周一之前的周日
// 标签: "%a %m_%d"（如 "Sun 11_09"）
// ==========================================

use crate::domain::types::Weekday;
use crate::export::error::{ExportError, ExportResult};
use chrono::{Datelike, Days, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekCalendar {
    start: NaiveDate, // 周日
}

impl WeekCalendar {
    /// 包含给定日期的一周
    pub fn containing(date: NaiveDate) -> Self {
        let offset = Weekday::from_chrono(date.weekday()).index() as u64;
        Self {
            start: date - Days::new(offset),
        }
    }

    /// ISO 周（起点为该周周一之前的周日）
    pub fn for_iso_week(year: i32, week: u32) -> ExportResult<Self> {
        let monday = NaiveDate::from_isoywd_opt(year, week, chrono::Weekday::Mon)
            .ok_or(ExportError::InvalidWeek { year, week })?;
        let start = monday
            .checked_sub_days(Days::new(1))
            .ok_or(ExportError::InvalidWeek { year, week })?;
        Ok(Self { start })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn date_of(&self, day: Weekday) -> NaiveDate {
        self.start + Days::new(day.index() as u64)
    }

    /// 日标签,如 "Sun 11_09"
    pub fn day_label(&self, day: Weekday) -> String {
        self.date_of(day).format("%a %m_%d").to_string()
    }

    /// 可用作文件名的日标签
    pub fn file_stem(&self, day: Weekday) -> String {
        safe_file_stem(&self.day_label(day))
    }
}

/// 替换文件名中的非法字符并截断到 31 个字符
pub fn safe_file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if "[]:*?/\\".contains(c) { '_' } else { c })
        .take(31)
        .collect()
}
