// ==========================================
// 每周派车分配系统 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// 说明: 花名册按位置读取（网格）,目标文件按表头读取（记录）
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件 → 单元格网格（不含任何业务含义）
// 实现者: CsvParser, ExcelParser
pub trait FileParser {
    /// 解析文件为行列网格（单元格已 trim）
    ///
    /// # 返回
    /// - Ok(Vec<Vec<String>>): 全部行（含表头行,行长度可不一致）
    /// - Err: 文件不存在、格式错误
    fn parse_to_grid(&self, file_path: &Path) -> ImportResult<Vec<Vec<String>>>;
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_grid(&self, file_path: &Path) -> ImportResult<Vec<Vec<String>>> {
        ensure_exists(file_path)?;

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let mut grid = Vec::new();
        for result in reader.records() {
            let record = result?;
            grid.push(record.iter().map(|v| v.trim().to_string()).collect());
        }
        Ok(grid)
    }
}

impl CsvParser {
    /// 解析带表头的 CSV 为行记录（表头小写化）
    ///
    /// # 返回
    /// - Vec<(行号, HashMap<列名, 值>)>: 行号从 2 开始（第 1 行为表头）
    pub fn parse_to_records(
        &self,
        file_path: &Path,
    ) -> ImportResult<Vec<(usize, HashMap<String, String>)>> {
        ensure_exists(file_path)?;
        let file = File::open(file_path)?;
        self.parse_reader_to_records(file)
    }

    /// 从任意 reader 解析带表头的 CSV
    pub fn parse_reader_to_records<R: std::io::Read>(
        &self,
        input: R,
    ) -> ImportResult<Vec<(usize, HashMap<String, String>)>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(input);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();

        let mut records = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let record = result?;
            let mut row_map = HashMap::new();
            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row_map.insert(header.clone(), value.trim().to_string());
                }
            }

            // 跳过完全空白的行
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }
            records.push((row_idx + 2, row_map));
        }
        Ok(records)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_to_grid(&self, file_path: &Path) -> ImportResult<Vec<Vec<String>>> {
        ensure_exists(file_path)?;

        let mut workbook = open_workbook_auto(file_path)?;

        // 读取第一个 sheet
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;
        let range = workbook.worksheet_range(&sheet_name)?;

        // Range 从第一个非空单元格开始,这里补齐左上角偏移以保持绝对位置
        let (start_row, start_col) = range.start().unwrap_or((0, 0));
        let mut grid: Vec<Vec<String>> = vec![Vec::new(); start_row as usize];
        for data_row in range.rows() {
            let mut row = vec![String::new(); start_col as usize];
            row.extend(data_row.iter().map(|cell| cell.to_string().trim().to_string()));
            grid.push(row);
        }
        Ok(grid)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Vec<Vec<String>>> {
        let path = file_path.as_ref();
        match extension_of(path).as_str() {
            "csv" => CsvParser.parse_to_grid(path),
            "xlsx" | "xls" | "xlsm" => ExcelParser.parse_to_grid(path),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}
