// ==========================================
// 每周派车分配系统 - 日目标加载
// ==========================================
// 格式: CSV,表头 day,dot_helper_route,dot_helper,dot,xl
//       （别名: certified_helper_route / certified_helper / certified_duty / standard）
// 规则: 缺失的日子按全零目标处理并告警; 数量非整数为错误; 空单元格为 0
// ==========================================

use crate::domain::plan::DayTarget;
use crate::domain::types::Weekday;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::CsvParser;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

const DAY_COLUMN: &str = "day";
const DUTY_COLUMNS: &[&str] = &["dot", "certified_duty"];
const HELPER_ROUTE_COLUMNS: &[&str] = &["dot_helper_route", "certified_helper_route"];
const HELPER_COLUMNS: &[&str] = &["dot_helper", "certified_helper"];
const STANDARD_COLUMNS: &[&str] = &["xl", "standard"];

/// 目标导入结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetsImport {
    pub targets: [DayTarget; 7],    // 按 Sun..Sat
    pub missing_days: Vec<Weekday>, // 未出现在文件中的日子（全零）
}

/// 从文件加载日目标
pub fn load_day_targets(path: &Path) -> ImportResult<TargetsImport> {
    let records = CsvParser.parse_to_records(path)?;
    build_targets(records)
}

/// 从任意 reader 解析日目标
pub fn parse_day_targets<R: std::io::Read>(input: R) -> ImportResult<TargetsImport> {
    let records = CsvParser.parse_reader_to_records(input)?;
    build_targets(records)
}

fn build_targets(records: Vec<(usize, HashMap<String, String>)>) -> ImportResult<TargetsImport> {
    let mut targets: [Option<DayTarget>; 7] = [None; 7];

    for (row, record) in records {
        let raw_day = record
            .get(DAY_COLUMN)
            .ok_or_else(|| ImportError::MissingColumn(DAY_COLUMN.to_string()))?;
        let day = Weekday::from_str(raw_day).ok_or_else(|| ImportError::UnknownDay {
            row,
            value: raw_day.clone(),
        })?;
        if targets[day.index()].is_some() {
            return Err(ImportError::DuplicateDay {
                row,
                day: day.to_string(),
            });
        }

        targets[day.index()] = Some(DayTarget::new(
            read_count(&record, DUTY_COLUMNS, row)?,
            read_count(&record, HELPER_ROUTE_COLUMNS, row)?,
            read_count(&record, HELPER_COLUMNS, row)?,
            read_count(&record, STANDARD_COLUMNS, row)?,
        ));
    }

    let missing_days: Vec<Weekday> = Weekday::ALL
        .into_iter()
        .filter(|d| targets[d.index()].is_none())
        .collect();
    for day in &missing_days {
        warn!(day = %day, "目标文件缺少该日,按全零目标处理");
    }

    let targets = targets.map(|t| t.unwrap_or_else(DayTarget::zero));
    info!(
        total = targets.iter().map(DayTarget::total).sum::<u32>(),
        missing = missing_days.len(),
        "日目标加载完成"
    );

    Ok(TargetsImport {
        targets,
        missing_days,
    })
}

/// 读取数量列（按别名顺序取第一个存在的列）
fn read_count(record: &HashMap<String, String>, aliases: &[&str], row: usize) -> ImportResult<u32> {
    let Some((column, raw)) = aliases
        .iter()
        .find_map(|name| record.get(*name).map(|v| (*name, v)))
    else {
        return Err(ImportError::MissingColumn(aliases.join("/")));
    };

    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse::<u32>()
        .map_err(|e| ImportError::TypeConversionError {
            row,
            field: column.to_string(),
            message: format!("'{}' 不是非负整数: {}", raw, e),
        })
}
