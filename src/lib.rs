// ==========================================
// 表格导入 - 核心库
// ==========================================
// 职责: 扫描导入目录中的工作簿，按模板识别工作表，
//       抽取并过滤数据行，可选写入 SQLite
// 技术栈: Rust + calamine/csv + SQLite
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 单元格/工作表/模板
pub mod domain;

// 引擎层 - 识别与抽取
pub mod engine;

// 导入层 - 读取工作簿、扫描目录、落库
pub mod importer;

// 数据仓储层 - 数据写入
pub mod repository;

// 配置层
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// 国际化
pub mod i18n;

// ==========================================
// 重导出核心类型
// ==========================================

pub use config::{ImporterConfig, MalformedRowPolicy};
pub use domain::{
    CellValue, ColumnRule, Extraction, LabelRule, MalformedRow, Presence, ProjectedRow,
    SheetData, Template, TemplateRegistry,
};
pub use engine::{Classification, RowExtractor, SheetClassifier, SheetPipeline};
pub use importer::{ImportError, ImportScanner, ScanReport, UniversalFileParser};
pub use repository::{SqliteStagingRepository, StagingRepository};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
