// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use weekly_dispatch::config::{ConfigResult, RosterConfigReader};

/// Mock 配置结构（紧凑布局,便于手写 CSV 花名册）
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub certified_marker: String,
    pub available_marker: String,
    pub skip_rows: usize,
    pub max_rows: usize,
    pub col_first_name: usize,
    pub col_last_name: usize,
    pub col_day_start: usize,
}

impl MockConfig {
    /// 一行表头,名在第 0 列,姓在第 1 列,周日状态在第 2 列
    pub fn compact() -> Self {
        Self {
            certified_marker: "dot".to_string(),
            available_marker: "1".to_string(),
            skip_rows: 1,
            max_rows: 100,
            col_first_name: 0,
            col_last_name: 1,
            col_day_start: 2,
        }
    }

    /// 自定义状态标记
    pub fn with_markers(certified: &str, available: &str) -> Self {
        let mut config = Self::compact();
        config.certified_marker = certified.to_string();
        config.available_marker = available.to_string();
        config
    }
}

impl RosterConfigReader for MockConfig {
    fn get_certified_marker(&self) -> ConfigResult<String> {
        Ok(self.certified_marker.clone())
    }

    fn get_available_marker(&self) -> ConfigResult<String> {
        Ok(self.available_marker.clone())
    }

    fn get_roster_skip_rows(&self) -> ConfigResult<usize> {
        Ok(self.skip_rows)
    }

    fn get_roster_max_rows(&self) -> ConfigResult<usize> {
        Ok(self.max_rows)
    }

    fn get_roster_col_first_name(&self) -> ConfigResult<usize> {
        Ok(self.col_first_name)
    }

    fn get_roster_col_last_name(&self) -> ConfigResult<usize> {
        Ok(self.col_last_name)
    }

    fn get_roster_col_day_start(&self) -> ConfigResult<usize> {
        Ok(self.col_day_start)
    }
}
