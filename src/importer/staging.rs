// ==========================================
// 表格导入 - 扫描结果落库
// ==========================================
// 流程: 逐个已识别工作表 → 模板有目标表则写库 → 汇总
// 红线: 单个工作表落库失败只记录，不影响其他工作表
// ==========================================

use crate::domain::template::TemplateRegistry;
use crate::i18n::t_with_args;
use crate::importer::scanner::ScanReport;
use crate::perf::PerfGuard;
use crate::repository::StagingRepository;
use serde::Serialize;
use tracing::{error, info, instrument};

/// 单个工作表落库失败
#[derive(Debug, Clone, Serialize)]
pub struct StageFailure {
    pub file: String,
    pub sheet: String,
    pub table: String,
    pub reason: String,
}

/// 落库汇总
#[derive(Debug, Clone, Default, Serialize)]
pub struct StageSummary {
    /// 成功写库的工作表数
    pub sheets: usize,
    /// 实际插入行数（重复行不计）
    pub inserted: usize,
    /// 模板无目标表、未写库的工作表数
    pub skipped: usize,
    pub failures: Vec<StageFailure>,
}

/// 将扫描结果写入模板指定的目标表
#[instrument(skip_all, fields(batch_id = %report.batch_id))]
pub fn stage_report(
    report: &ScanReport,
    registry: &TemplateRegistry,
    repo: &dyn StagingRepository,
) -> StageSummary {
    let mut summary = StageSummary::default();

    for outcome in &report.outcomes {
        let (Some(template_name), Some(extraction)) = (outcome.template(), outcome.extraction())
        else {
            continue;
        };
        let Some(table) = registry.get(template_name).and_then(|t| t.table.as_deref()) else {
            summary.skipped += 1;
            continue;
        };

        let _perf = PerfGuard::new("stage_sheet");
        match repo.stage_rows(table, &extraction.rows) {
            Ok(inserted) => {
                let count = inserted.to_string();
                info!(
                    file = %outcome.file,
                    sheet = %outcome.sheet,
                    table = %table,
                    "{}",
                    t_with_args(
                        "db.staged",
                        &[
                            ("file", outcome.file.as_str()),
                            ("sheet", outcome.sheet.as_str()),
                            ("table", table),
                            ("count", count.as_str()),
                        ]
                    )
                );
                summary.sheets += 1;
                summary.inserted += inserted;
            }
            Err(e) => {
                let reason = e.to_string();
                error!(
                    file = %outcome.file,
                    sheet = %outcome.sheet,
                    "{}",
                    t_with_args(
                        "db.stage_failed",
                        &[("table", table), ("error", reason.as_str())]
                    )
                );
                summary.failures.push(StageFailure {
                    file: outcome.file.clone(),
                    sheet: outcome.sheet.clone(),
                    table: table.to_string(),
                    reason,
                });
            }
        }
    }

    summary
}
