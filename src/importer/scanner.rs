// ==========================================
// 表格导入 - 导入目录扫描器
// ==========================================
// 流程: 列出目录文件（按文件名排序）→ 解析工作簿 → 逐个工作表走处理管道
// 红线: 单个文件/工作表失败只记录，不中断整个扫描
// ==========================================

use crate::engine::pipeline::{SheetOutcome, SheetPipeline, SheetResult};
use crate::i18n::t_with_args;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::WorkbookParser;
use crate::perf::PerfGuard;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// 失败类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// 扩展名不支持
    Unsupported,
    /// 被其他程序占用/无权限
    Locked,
    /// 不存在/损坏/解析失败
    Unreadable,
    /// 工作表存在畸形行且策略为 Abort
    MalformedSheet,
}

/// 文件（或工作表）级失败记录
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub file: String,
    pub sheet: Option<String>,
    pub kind: FailureKind,
    pub reason: String,
}

/// 一次扫描的完整结果
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub batch_id: String,
    pub import_dir: PathBuf,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub files: usize,
    pub outcomes: Vec<SheetOutcome>,
    pub failures: Vec<FileFailure>,
}

/// 扫描汇总（用于日志/JSON 输出）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub batch_id: String,
    pub files: usize,
    pub sheets: usize,
    pub matched: usize,
    pub unknown: usize,
    pub failed: usize,
    pub malformed_rows: usize,
    /// 模板名 → 抽取行数
    pub rows_by_template: BTreeMap<String, usize>,
}

impl ScanReport {
    /// 识别为指定模板的全部工作表（按处理顺序）
    pub fn collected(&self, template: &str) -> Vec<&SheetOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.template() == Some(template))
            .collect()
    }

    /// 未匹配任何模板的工作表
    pub fn unknown(&self) -> Vec<&SheetOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.result, SheetResult::UnknownFormat))
            .collect()
    }

    pub fn summary(&self) -> ScanSummary {
        let mut rows_by_template = BTreeMap::new();
        let mut malformed_rows = 0;
        for outcome in &self.outcomes {
            if let (Some(template), Some(extraction)) = (outcome.template(), outcome.extraction()) {
                *rows_by_template.entry(template.to_string()).or_insert(0) += extraction.len();
                malformed_rows += extraction.malformed.len();
            }
        }

        let unknown = self.unknown().len();
        ScanSummary {
            batch_id: self.batch_id.clone(),
            files: self.files,
            sheets: self.outcomes.len(),
            matched: self.outcomes.len() - unknown,
            unknown,
            failed: self.failures.len(),
            malformed_rows,
            rows_by_template,
        }
    }
}

// ==========================================
// ImportScanner
// ==========================================
pub struct ImportScanner<'r, P>
where
    P: WorkbookParser,
{
    parser: P,
    pipeline: SheetPipeline<'r>,
}

impl<'r, P> ImportScanner<'r, P>
where
    P: WorkbookParser,
{
    pub fn new(parser: P, pipeline: SheetPipeline<'r>) -> Self {
        Self { parser, pipeline }
    }

    /// 扫描导入目录
    ///
    /// # 返回
    /// - Ok(ScanReport): 全部文件的处理结果（含失败记录）
    /// - Err: 目录无法创建或无法列出
    #[instrument(skip(self, import_dir), fields(batch_id))]
    pub fn scan(&self, import_dir: &Path) -> ImportResult<ScanReport> {
        let batch_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("batch_id", batch_id.as_str());
        let started_at = Utc::now();

        let dir_label = import_dir.display().to_string();
        info!(
            "{}",
            t_with_args("import.scan_started", &[("path", dir_label.as_str())])
        );

        if !import_dir.is_dir() {
            fs::create_dir_all(import_dir)?;
        }

        let mut files: Vec<PathBuf> = fs::read_dir(import_dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file())
            .collect();
        files.sort();

        let mut outcomes = Vec::new();
        let mut failures = Vec::new();
        for path in &files {
            self.scan_file(path, &mut outcomes, &mut failures);
        }

        let report = ScanReport {
            batch_id,
            import_dir: import_dir.to_path_buf(),
            started_at,
            finished_at: Utc::now(),
            files: files.len(),
            outcomes,
            failures,
        };

        let summary = report.summary();
        let sheets = summary.sheets.to_string();
        let matched = summary.matched.to_string();
        let failed = summary.failed.to_string();
        info!(
            "{}",
            t_with_args(
                "import.scan_finished",
                &[
                    ("sheets", sheets.as_str()),
                    ("matched", matched.as_str()),
                    ("failed", failed.as_str()),
                ]
            )
        );

        Ok(report)
    }

    fn scan_file(
        &self,
        path: &Path,
        outcomes: &mut Vec<SheetOutcome>,
        failures: &mut Vec<FileFailure>,
    ) {
        let file = path.display().to_string();
        info!("{}", t_with_args("import.file_found", &[("path", file.as_str())]));

        if !self.parser.supports(path) {
            warn!(
                "{}",
                t_with_args("import.file_unsupported", &[("path", file.as_str())])
            );
            failures.push(FileFailure {
                file,
                sheet: None,
                kind: FailureKind::Unsupported,
                reason: ImportError::UnsupportedFormat(
                    crate::importer::file_parser::file_extension(path),
                )
                .to_string(),
            });
            return;
        }

        let _perf = PerfGuard::new("scan_file");
        let sheets = match self.parser.parse_workbook(path) {
            Ok(sheets) => sheets,
            Err(e) => {
                let kind = match e {
                    ImportError::FileLocked(_) => {
                        warn!(
                            "{}",
                            t_with_args("import.file_locked", &[("path", file.as_str())])
                        );
                        FailureKind::Locked
                    }
                    ImportError::FileNotFound(_) => {
                        warn!(
                            "{}",
                            t_with_args("import.file_not_found", &[("path", file.as_str())])
                        );
                        FailureKind::Unreadable
                    }
                    ImportError::UnsupportedFormat(_) => FailureKind::Unsupported,
                    _ => {
                        let reason = e.to_string();
                        error!(
                            "{}",
                            t_with_args(
                                "import.file_failed",
                                &[("path", file.as_str()), ("error", reason.as_str())]
                            )
                        );
                        FailureKind::Unreadable
                    }
                };
                failures.push(FileFailure {
                    file,
                    sheet: None,
                    kind,
                    reason: e.to_string(),
                });
                return;
            }
        };

        for sheet in &sheets {
            match self.pipeline.process(&file, sheet) {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => failures.push(FileFailure {
                    file: file.clone(),
                    sheet: Some(sheet.name.clone()),
                    kind: FailureKind::MalformedSheet,
                    reason: e.to_string(),
                }),
            }
        }
    }
}
