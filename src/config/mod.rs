// ==========================================
// 表格导入 - 配置层
// ==========================================
// 职责: 运行配置（目录、数据库、日志、模板来源、畸形行策略）
// 存储: 环境变量
// ==========================================

pub mod importer_config;

pub use importer_config::{default_db_path, ImporterConfig, MalformedRowPolicy, PerfSettings};
