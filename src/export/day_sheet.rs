// ==========================================
// 每周派车分配系统 - 日汇总表
// ==========================================
// 布局（两列 Group / Driver）:
//   Routes assigned: N
//   Scheduled drivers: M
//   （空行）
//   每个类别: "{类别} ({人数})" + 成员行 + 空行
//   Unassigned (Need XL)（仅在有未分配新司机时）
//   Unassigned (Standby cap)（仅在有待命上限已满的司机时）
// ==========================================

use crate::domain::driver::RosterModel;
use crate::domain::plan::DayAssignment;
use crate::domain::types::DutyCategory;

pub const UNASSIGNED_NEW_LABEL: &str = "Unassigned (Need XL)";
pub const STANDBY_CAPPED_LABEL: &str = "Unassigned (Standby cap)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySheet {
    pub title: String,
    pub route_count: usize,
    pub scheduled_count: usize,
    pub rows: Vec<(String, String)>,
}

impl DaySheet {
    pub fn build(title: &str, assignment: &DayAssignment, roster: &RosterModel) -> Self {
        let route_count = assignment.route_count();
        let scheduled_count = roster.pool_for(assignment.day).len();

        let mut rows = vec![
            (format!("Routes assigned: {}", route_count), String::new()),
            (format!("Scheduled drivers: {}", scheduled_count), String::new()),
            (String::new(), String::new()),
        ];
        for category in DutyCategory::ALL {
            let members = assignment.members(category);
            rows.push((format!("{} ({})", category, members.len()), String::new()));
            rows.extend(
                members
                    .iter()
                    .map(|k| (String::new(), roster.display_name(k).to_string())),
            );
            rows.push((String::new(), String::new()));
        }
        for (label, keys) in [
            (UNASSIGNED_NEW_LABEL, &assignment.unassigned_new),
            (STANDBY_CAPPED_LABEL, &assignment.standby_capped),
        ] {
            if keys.is_empty() {
                continue;
            }
            rows.push((label.to_string(), String::new()));
            rows.extend(
                keys.iter()
                    .map(|k| (String::new(), roster.display_name(k).to_string())),
            );
        }

        Self {
            title: title.to_string(),
            route_count,
            scheduled_count,
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::driver::{Driver, DriverKey};
    use crate::domain::types::Availability::{Available as A, Unavailable as U};
    use crate::domain::types::Weekday;

    #[test]
    fn test_day_sheet_layout() {
        let roster = RosterModel::build(
            vec![
                Driver::new("Ann Lee", [A; 7]),
                Driver::new("Bo Kim", [A; 7]),
                Driver::new("Off Duty", [U; 7]),
            ],
            &[DriverKey::new("bo kim")],
            &[],
        )
        .unwrap();
        let mut day = DayAssignment::empty(Weekday::Sun);
        day.standard = vec![DriverKey::new("ann lee")];
        day.unassigned_new = vec![DriverKey::new("bo kim")];

        let sheet = DaySheet::build("Sun 11_09", &day, &roster);
        assert_eq!(sheet.route_count, 1);
        assert_eq!(sheet.scheduled_count, 2);
        assert_eq!(sheet.rows[0].0, "Routes assigned: 1");
        assert_eq!(sheet.rows[1].0, "Scheduled drivers: 2");
        assert!(sheet.rows.contains(&("XL (1)".to_string(), String::new())));
        assert!(sheet.rows.contains(&(String::new(), "Ann Lee".to_string())));
        let tail = &sheet.rows[sheet.rows.len() - 2..];
        assert_eq!(tail[0].0, UNASSIGNED_NEW_LABEL);
        assert_eq!(tail[1].1, "Bo Kim");
        assert!(!sheet.rows.iter().any(|(g, _)| g == STANDBY_CAPPED_LABEL));
    }

    #[test]
    fn test_day_sheet_lists_standby_capped() {
        let roster = RosterModel::build(
            vec![Driver::new("Ann Lee", [A; 7]), Driver::new("Cal Wu", [A; 7])],
            &[],
            &[],
        )
        .unwrap();
        let mut day = DayAssignment::empty(Weekday::Fri);
        day.standby = vec![DriverKey::new("ann lee")];
        day.standby_capped = vec![DriverKey::new("cal wu")];

        let sheet = DaySheet::build("Fri 11_14", &day, &roster);
        let tail = &sheet.rows[sheet.rows.len() - 2..];
        assert_eq!(tail[0].0, STANDBY_CAPPED_LABEL);
        assert_eq!(tail[1].1, "Cal Wu");
        assert_eq!(sheet.scheduled_count, 2);
    }
}
