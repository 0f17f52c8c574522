// ==========================================
// 每周派车分配系统 - 导出层
// ==========================================
// 职责: 把定型的周计划写入输出目录
// 输出: 日汇总表 ×7 / weekly_schedule.csv / fairness_audit.csv /
//       audit_log.csv / pairings.csv / run_summary.json
// ==========================================

pub mod audit_report;
pub mod calendar;
pub mod day_sheet;
pub mod error;
pub mod run_summary;
pub mod schedule_grid;

pub use audit_report::{
    audit_log_rows, fairness_audit_rows, pairing_rows, render_text_report, FairnessAuditRow,
    AUDIT_LOG_HEADER,
};
pub use calendar::WeekCalendar;
pub use day_sheet::{DaySheet, STANDBY_CAPPED_LABEL, UNASSIGNED_NEW_LABEL};
pub use error::{ExportError, ExportResult};
pub use run_summary::{DayCounts, RunSummary};
pub use schedule_grid::ScheduleGrid;

use crate::domain::driver::RosterModel;
use crate::domain::types::Weekday;
use crate::engine::orchestrator::WeekRunResult;
use csv::Writer;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// ==========================================
// ExportWriter - 输出目录写入器
// ==========================================
pub struct ExportWriter {
    out_dir: PathBuf,
}

impl ExportWriter {
    /// 创建写入器（目录不存在时自动创建）
    pub fn new<P: AsRef<Path>>(out_dir: P) -> ExportResult<Self> {
        let out_dir = out_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&out_dir).map_err(|source| ExportError::Io {
            path: out_dir.display().to_string(),
            source,
        })?;
        Ok(Self { out_dir })
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// 写出全部文件
    ///
    /// # 返回
    /// - Ok(Vec<PathBuf>): 已写出的文件
    pub fn write_all(
        &self,
        result: &WeekRunResult,
        roster: &RosterModel,
        calendar: &WeekCalendar,
        summary: &RunSummary,
    ) -> ExportResult<Vec<PathBuf>> {
        let mut written = Vec::new();

        for day in Weekday::ALL {
            let sheet = DaySheet::build(&calendar.day_label(day), result.plan.day(day), roster);
            let path = self.path_for(&format!("{}.csv", calendar.file_stem(day)));
            self.write_day_sheet(&path, &sheet)?;
            written.push(path);
        }

        let path = self.path_for("weekly_schedule.csv");
        let grid = ScheduleGrid::build(&result.plan, roster, calendar);
        self.write_rows(&path, &grid.header, grid.rows.iter())?;
        written.push(path);

        let path = self.path_for("fairness_audit.csv");
        let audit = fairness_audit_rows(result, roster, calendar);
        self.write_rows(
            &path,
            &["Driver", "Assigned Label", "Day"],
            audit.iter().map(|r| [r.driver.as_str(), r.label.as_str(), r.day.as_str()]),
        )?;
        written.push(path);

        let path = self.path_for("audit_log.csv");
        self.write_rows(&path, &AUDIT_LOG_HEADER, audit_log_rows(result, roster).iter())?;
        written.push(path);

        let path = self.path_for("pairings.csv");
        self.write_rows(
            &path,
            &["Day", "HelperRoute", "Helper"],
            pairing_rows(result, roster, calendar).iter(),
        )?;
        written.push(path);

        let path = self.path_for("run_summary.json");
        self.write_summary(&path, summary)?;
        written.push(path);

        info!(
            out_dir = %self.out_dir.display(),
            files = written.len(),
            "输出写入完成"
        );
        Ok(written)
    }

    fn path_for(&self, file_name: &str) -> PathBuf {
        self.out_dir.join(file_name)
    }

    fn write_day_sheet(&self, path: &Path, sheet: &DaySheet) -> ExportResult<()> {
        self.write_rows(
            path,
            &["Group", "Driver"],
            sheet.rows.iter().map(|(g, d)| [g.as_str(), d.as_str()]),
        )
    }

    fn write_rows<H, R, I>(&self, path: &Path, header: &[H], rows: I) -> ExportResult<()>
    where
        H: AsRef<[u8]>,
        R: IntoIterator,
        R::Item: AsRef<[u8]>,
        I: Iterator<Item = R>,
    {
        let mut writer = Writer::from_path(path)?;
        writer.write_record(header)?;
        let mut count = 0usize;
        for row in rows {
            writer.write_record(row)?;
            count += 1;
        }
        writer.flush().map_err(|source| ExportError::Io {
            path: path.display().to_string(),
            source,
        })?;
        debug!(file = %path.display(), rows = count, "CSV 写入完成");
        Ok(())
    }

    fn write_summary(&self, path: &Path, summary: &RunSummary) -> ExportResult<()> {
        let json = serde_json::to_string_pretty(summary)?;
        std::fs::write(path, json).map_err(|source| ExportError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}
