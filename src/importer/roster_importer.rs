// ==========================================
// 每周派车分配系统 - 花名册导入器
// ==========================================
// 导入流程:
// 1. 文件读取与解析（网格）
// 2. 按布局映射为原始司机行
// 3. 状态清洗（记录数据质量问题）
// 4. 构造花名册（标记新司机/半限制司机,重复姓名中止）
// ==========================================

use crate::config::RosterConfigReader;
use crate::domain::driver::{Driver, DriverKey, RosterModel};
use crate::importer::data_cleaner::{DataCleaner, RosterIssue};
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::{FieldMapper, RosterLayout};
use crate::importer::file_parser::UniversalFileParser;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

// ==========================================
// RosterImportReport - 导入汇总
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterImportReport {
    pub grid_rows: usize,           // 网格总行数
    pub drivers: usize,             // 导入司机数
    pub certified: usize,           // 认证司机数
    pub new_drivers: usize,         // 已标记新司机数
    pub semi_restricted: usize,     // 已标记半限制司机数
    pub issues: Vec<RosterIssue>,   // 数据质量警告
    pub elapsed: Duration,
}

/// 导入结果
#[derive(Debug, Clone)]
pub struct RosterImport {
    pub roster: RosterModel,
    pub report: RosterImportReport,
}

// ==========================================
// RosterImporter - 花名册导入器
// ==========================================
pub struct RosterImporter {
    layout: RosterLayout,
    cleaner: DataCleaner,
}

impl RosterImporter {
    pub fn new(layout: RosterLayout, cleaner: DataCleaner) -> Self {
        Self { layout, cleaner }
    }

    /// 从配置构造（布局 + 状态标记）
    pub fn from_config<C: RosterConfigReader + ?Sized>(config: &C) -> ImportResult<Self> {
        Ok(Self::new(
            RosterLayout::from_config(config)?,
            DataCleaner::from_config(config)?,
        ))
    }

    pub fn layout(&self) -> &RosterLayout {
        &self.layout
    }

    /// 从文件导入花名册
    ///
    /// # 参数
    /// - file_path: 花名册文件（.xlsx/.xls/.csv,读取第一个工作表）
    /// - new_drivers: 新司机名单
    /// - semi_restricted: 半限制司机名单
    ///
    /// # 返回
    /// - Ok(RosterImport): 花名册 + 导入汇总
    /// - Err: 文件错误、布局错误、重复姓名
    #[instrument(skip_all, fields(file = %file_path.as_ref().display()))]
    pub fn import_file<P: AsRef<Path>>(
        &self,
        file_path: P,
        new_drivers: &[DriverKey],
        semi_restricted: &[DriverKey],
    ) -> ImportResult<RosterImport> {
        let start = Instant::now();
        let grid = UniversalFileParser.parse(file_path.as_ref())?;
        debug!(rows = grid.len(), "文件解析完成");

        let mut import = self.import_grid(&grid, new_drivers, semi_restricted)?;
        import.report.elapsed = start.elapsed();
        Ok(import)
    }

    /// 从已解析的网格导入花名册
    pub fn import_grid(
        &self,
        grid: &[Vec<String>],
        new_drivers: &[DriverKey],
        semi_restricted: &[DriverKey],
    ) -> ImportResult<RosterImport> {
        let rows = FieldMapper.map_rows(grid, &self.layout);
        if rows.is_empty() {
            warn!(
                skip_rows = self.layout.skip_rows,
                max_rows = self.layout.max_rows,
                "花名册读取窗口内没有司机行"
            );
        }

        let mut issues = Vec::new();
        let drivers: Vec<Driver> = rows
            .into_iter()
            .map(|row| {
                let name = row.display_name();
                let availability =
                    self.cleaner
                        .clean_week(row.row_number, &name, &row.raw_status, &mut issues);
                Driver::with_raw_status(&name, availability, row.raw_status)
            })
            .collect();

        for issue in &issues {
            warn!(
                row = issue.row_number,
                driver = %issue.driver,
                day = %issue.day,
                raw = %issue.raw_value,
                "花名册状态值无法识别"
            );
        }

        let roster = RosterModel::build(drivers, new_drivers, semi_restricted)?;
        let report = RosterImportReport {
            grid_rows: grid.len(),
            drivers: roster.len(),
            certified: roster.drivers().iter().filter(|d| d.is_certified).count(),
            new_drivers: roster.drivers().iter().filter(|d| d.is_new).count(),
            semi_restricted: roster
                .drivers()
                .iter()
                .filter(|d| d.is_semi_restricted)
                .count(),
            issues,
            elapsed: Duration::ZERO,
        };

        info!(
            drivers = report.drivers,
            certified = report.certified,
            new_drivers = report.new_drivers,
            semi_restricted = report.semi_restricted,
            issues = report.issues.len(),
            "花名册导入完成"
        );

        Ok(RosterImport { roster, report })
    }
}

impl Default for RosterImporter {
    fn default() -> Self {
        Self::new(RosterLayout::default(), DataCleaner::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::driver::RosterError;
    use crate::domain::types::{Availability, Weekday};
    use crate::importer::error::ImportError;

    fn compact_importer() -> RosterImporter {
        RosterImporter::new(
            RosterLayout {
                skip_rows: 1,
                max_rows: 100,
                col_first_name: 0,
                col_last_name: 1,
                col_day_start: 2,
            },
            DataCleaner::default(),
        )
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_import_grid_builds_roster_with_flags() {
        let grid = vec![
            row(&["First", "Last", "Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]),
            row(&["Ann", "Lee", "DOT", "1", "", "", "", "", ""]),
            row(&["Bo", "Kim", "1", "1", "sick", "", "", "", ""]),
            row(&["Cy", "Park", "1", "", "", "", "", "", "1"]),
        ];
        let import = compact_importer()
            .import_grid(&grid, &[DriverKey::new("cy park")], &[DriverKey::new("ann lee")])
            .unwrap();

        let roster = import.roster;
        assert_eq!(roster.len(), 3);
        let ann = roster.get(&DriverKey::new("Ann Lee")).unwrap();
        assert!(ann.is_certified && ann.is_semi_restricted);
        assert_eq!(ann.availability_on(Weekday::Sun), Availability::CertifiedAvailable);
        let bo = roster.get(&DriverKey::new("bo kim")).unwrap();
        assert_eq!(bo.availability_on(Weekday::Tue), Availability::Unavailable);
        assert_eq!(bo.raw_status[2], "sick");
        assert!(roster.get(&DriverKey::new("cy park")).unwrap().is_new);

        assert_eq!(import.report.certified, 1);
        assert_eq!(import.report.issues.len(), 1);
        assert_eq!(import.report.issues[0].row_number, 3);
    }

    #[test]
    fn test_duplicate_names_abort_import() {
        let grid = vec![
            row(&["header"]),
            row(&["Ann", "Lee", "1"]),
            row(&["ann", " LEE", "DOT"]),
        ];
        let err = compact_importer().import_grid(&grid, &[], &[]).unwrap_err();
        assert!(matches!(
            err,
            ImportError::Roster(RosterError::DuplicateDriver(_))
        ));
    }
}
