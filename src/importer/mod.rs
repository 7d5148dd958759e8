// ==========================================
// 表格导入 - 导入层
// ==========================================
// 职责: 读取工作簿、扫描导入目录、扫描结果落库
// 支持: Excel (xlsx/xlsm/xlsb/xls/ods), CSV
// ==========================================

pub mod error;
pub mod file_parser;
pub mod importer_trait;
pub mod scanner;
pub mod staging;

pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use importer_trait::WorkbookParser;
pub use scanner::{FailureKind, FileFailure, ImportScanner, ScanReport, ScanSummary};
pub use staging::{stage_report, StageFailure, StageSummary};
