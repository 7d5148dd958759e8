// ==========================================
// 表格导入 - 命令行入口
// ==========================================
// 用法: sheet-intake [导入目录]
// 配置: 见 config::importer_config（SHEET_INTAKE_* 环境变量）
// ==========================================

use sheet_intake::config::ImporterConfig;
use sheet_intake::engine::SheetPipeline;
use sheet_intake::importer::{stage_report, ImportScanner, UniversalFileParser};
use sheet_intake::repository::SqliteStagingRepository;
use sheet_intake::{i18n, logging};
use std::fs;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let mut config = ImporterConfig::from_env()?;
    if let Some(dir) = std::env::args_os().nth(1) {
        config.import_dir = PathBuf::from(dir);
    }

    logging::init(config.log_file.as_deref())?;

    tracing::info!("==================================================");
    tracing::info!("表格导入 - 版本: {}", sheet_intake::VERSION);
    tracing::info!("==================================================");

    if i18n::is_supported(&config.locale) {
        i18n::set_locale(&config.locale);
    } else {
        tracing::warn!(locale = %config.locale, "不支持的语言，使用默认语言");
    }

    let registry = config.load_registry()?;
    tracing::info!(templates = ?registry.names(), "模板加载完成");

    let scanner = ImportScanner::new(
        UniversalFileParser,
        SheetPipeline::new(&registry, config.malformed_policy),
    );
    let report = scanner.scan(&config.import_dir)?;
    println!("{}", serde_json::to_string_pretty(&report.summary())?);

    if config.stage_rows {
        tracing::info!(db_path = %config.db_path.display(), "使用数据库");
        if let Some(parent) = config.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let repo = SqliteStagingRepository::new(&config.db_path, &config.perf)?;
        let staged = stage_report(&report, &registry, &repo);
        println!("{}", serde_json::to_string_pretty(&staged)?);
    }

    tracing::info!("{}", i18n::t("common.success"));
    Ok(())
}
