// ==========================================
// 每周派车分配系统 - 周标签网格
// ==========================================
// 每个司机一行、每天一列
// 单元格: 当天分配的标签文本; 未分配时保留原始状态文本
// ==========================================

use crate::domain::driver::RosterModel;
use crate::domain::plan::WeekPlan;
use crate::domain::types::Weekday;
use crate::export::calendar::WeekCalendar;
use crate::export::day_sheet::{STANDBY_CAPPED_LABEL, UNASSIGNED_NEW_LABEL};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleGrid {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ScheduleGrid {
    pub fn build(plan: &WeekPlan, roster: &RosterModel, calendar: &WeekCalendar) -> Self {
        let mut header = vec!["Driver".to_string()];
        header.extend(Weekday::ALL.iter().map(|d| calendar.day_label(*d)));

        let label_maps: Vec<_> = plan.days.iter().map(|d| d.label_map()).collect();

        let rows = roster
            .drivers()
            .iter()
            .map(|driver| {
                let mut row = vec![driver.display_name.clone()];
                for day in Weekday::ALL {
                    let assignment = plan.day(day);
                    let cell = match label_maps[day.index()].get(&driver.key) {
                        Some(category) => category.label_text().to_string(),
                        None if assignment.unassigned_new.contains(&driver.key) => {
                            UNASSIGNED_NEW_LABEL.to_string()
                        }
                        None if assignment.standby_capped.contains(&driver.key) => {
                            STANDBY_CAPPED_LABEL.to_string()
                        }
                        None => driver.raw_status[day.index()].clone(),
                    };
                    row.push(cell);
                }
                row
            })
            .collect();

        Self { header, rows }
    }
}
