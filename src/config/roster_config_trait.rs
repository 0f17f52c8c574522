// ==========================================
// 每周派车分配系统 - 花名册配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::error::ConfigResult;

// ==========================================
// RosterConfigReader Trait
// ==========================================
// 用途: 导入模块所需的配置读取接口
// 实现者: ConfigManager（从 JSON 配置文件读取）
pub trait RosterConfigReader {
    // ===== 状态标记 =====

    /// 认证可用标记（不区分大小写）
    ///
    /// # 默认值
    /// - "dot"
    fn get_certified_marker(&self) -> ConfigResult<String>;

    /// 普通可用标记
    ///
    /// # 默认值
    /// - "1"
    fn get_available_marker(&self) -> ConfigResult<String>;

    // ===== 表格布局 =====

    /// 跳过的表头行数
    ///
    /// # 默认值
    /// - 13
    fn get_roster_skip_rows(&self) -> ConfigResult<usize>;

    /// 表头之后最多读取的行数
    ///
    /// # 默认值
    /// - 77
    fn get_roster_max_rows(&self) -> ConfigResult<usize>;

    /// 名字列（从 0 开始）
    fn get_roster_col_first_name(&self) -> ConfigResult<usize>;

    /// 姓氏列（从 0 开始）
    fn get_roster_col_last_name(&self) -> ConfigResult<usize>;

    /// 周日状态列（从 0 开始）,周一至周六依次向右
    fn get_roster_col_day_start(&self) -> ConfigResult<usize>;
}
