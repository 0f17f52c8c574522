// ==========================================
// 每周派车分配系统 - 导入层
// ==========================================
// 职责: 外部数据导入,生成花名册与日目标
// 支持: Excel, CSV, 纯文本名单
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod name_list;
pub mod roster_importer;
pub mod targets;

// 重导出核心类型
pub use data_cleaner::{DataCleaner, RosterIssue};
pub use error::{ImportError, ImportResult};
pub use field_mapper::{FieldMapper, RawDriverRow, RosterLayout};
pub use file_parser::{CsvParser, ExcelParser, FileParser, UniversalFileParser};
pub use name_list::{load_name_list, parse_name_list};
pub use roster_importer::{RosterImport, RosterImportReport, RosterImporter};
pub use targets::{load_day_targets, parse_day_targets, TargetsImport};
