// ==========================================
// 表格导入 - 单工作表处理管道
// ==========================================
// 流程: 识别 → 抽取 → 畸形行策略 → 日志
// 输出: SheetOutcome（每个 (文件, 工作表) 一条）
// ==========================================

use crate::config::MalformedRowPolicy;
use crate::domain::extraction::Extraction;
use crate::domain::sheet::SheetData;
use crate::domain::template::TemplateRegistry;
use crate::engine::classifier::{Classification, SheetClassifier};
use crate::engine::extractor::RowExtractor;
use crate::i18n::t_with_args;
use crate::importer::error::{ImportError, ImportResult};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

/// 单个工作表的处理结果
#[derive(Debug, Clone, Serialize)]
pub struct SheetOutcome {
    pub file: String,
    pub sheet: String,
    pub result: SheetResult,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SheetResult {
    /// 识别成功并完成抽取
    Extracted {
        template: String,
        extraction: Extraction,
    },
    /// 未匹配任何模板（跳过，不视为失败）
    UnknownFormat,
}

impl SheetOutcome {
    pub fn template(&self) -> Option<&str> {
        match &self.result {
            SheetResult::Extracted { template, .. } => Some(template),
            SheetResult::UnknownFormat => None,
        }
    }

    pub fn extraction(&self) -> Option<&Extraction> {
        match &self.result {
            SheetResult::Extracted { extraction, .. } => Some(extraction),
            SheetResult::UnknownFormat => None,
        }
    }
}

// ==========================================
// SheetPipeline
// ==========================================
pub struct SheetPipeline<'r> {
    classifier: SheetClassifier<'r>,
    extractor: RowExtractor,
    malformed_policy: MalformedRowPolicy,
}

impl<'r> SheetPipeline<'r> {
    pub fn new(registry: &'r TemplateRegistry, malformed_policy: MalformedRowPolicy) -> Self {
        Self {
            classifier: SheetClassifier::new(registry),
            extractor: RowExtractor::new(),
            malformed_policy,
        }
    }

    /// 处理单个工作表
    ///
    /// # 返回
    /// - Ok(SheetOutcome): 识别成功（含抽取结果）或未匹配
    /// - Err(ImportError::MalformedRow): 策略为 Abort 且存在畸形行
    #[instrument(skip(self, sheet), fields(sheet = %sheet.name))]
    pub fn process(&self, file: &str, sheet: &SheetData) -> ImportResult<SheetOutcome> {
        let sheet_name = sheet.name.as_str();
        let outcome = |result: SheetResult| SheetOutcome {
            file: file.to_string(),
            sheet: sheet.name.clone(),
            result,
        };

        let template = match self.classifier.classify(&sheet.header) {
            Classification::Matched(template) => template,
            Classification::NoMatch => {
                warn!(
                    file = %file,
                    sheet = %sheet_name,
                    "{}",
                    t_with_args(
                        "import.sheet_unknown_format",
                        &[("file", file), ("sheet", sheet_name)]
                    )
                );
                return Ok(outcome(SheetResult::UnknownFormat));
            }
        };

        let candidates = self.classifier.matching(&sheet.header);
        if candidates.len() > 1 {
            let names = candidates
                .iter()
                .map(|t| t.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            warn!(
                file = %file,
                sheet = %sheet_name,
                "{}",
                t_with_args(
                    "import.sheet_ambiguous",
                    &[
                        ("file", file),
                        ("sheet", sheet_name),
                        ("templates", names.as_str()),
                        ("template", template.name.as_str()),
                    ]
                )
            );
        }

        debug!(template = %template.name, rows = sheet.rows.len(), "开始抽取");
        let extraction = self.extractor.extract(&sheet.rows, template);

        let row_key = match self.malformed_policy {
            MalformedRowPolicy::Skip => "import.row_malformed_skipped",
            MalformedRowPolicy::Abort => "import.row_malformed",
        };
        for malformed in &extraction.malformed {
            let row = malformed.sheet_row().to_string();
            let column = malformed.column.to_string();
            let width = malformed.width.to_string();
            warn!(
                file = %file,
                sheet = %sheet_name,
                sheet_row = malformed.sheet_row(),
                column = malformed.column,
                "{}",
                t_with_args(
                    row_key,
                    &[
                        ("file", file),
                        ("sheet", sheet_name),
                        ("row", row.as_str()),
                        ("column", column.as_str()),
                        ("width", width.as_str()),
                    ]
                )
            );
        }

        if self.malformed_policy == MalformedRowPolicy::Abort {
            if let Some(first) = extraction.malformed.first() {
                warn!(
                    file = %file,
                    sheet = %sheet_name,
                    "{}",
                    t_with_args(
                        "import.sheet_rejected",
                        &[("file", file), ("sheet", sheet_name)]
                    )
                );
                return Err(ImportError::MalformedRow {
                    file: file.to_string(),
                    sheet: sheet.name.clone(),
                    source: first.clone(),
                });
            }
        }

        let count = extraction.len().to_string();
        info!(
            file = %file,
            sheet = %sheet_name,
            template = %template.name,
            "{}",
            t_with_args(
                "import.sheet_identified",
                &[
                    ("file", file),
                    ("sheet", sheet_name),
                    ("template", template.name.as_str()),
                    ("count", count.as_str()),
                ]
            )
        );

        Ok(outcome(SheetResult::Extracted {
            template: template.name.clone(),
            extraction,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cell::CellValue;
    use crate::domain::template::{ColumnRule, Template};

    fn text_row(values: &[&str]) -> Vec<CellValue> {
        values.iter().map(|v| CellValue::text(*v)).collect()
    }

    fn registry() -> TemplateRegistry {
        TemplateRegistry::new(vec![Template::new(
            "codes",
            vec![ColumnRule::required(0, "Code"), ColumnRule::any_optional(2)],
            1,
        )])
        .unwrap()
    }

    fn sheet_with_short_row() -> SheetData {
        SheetData::new(
            "Sheet1",
            text_row(&["Code", "Name", "Note"]),
            vec![
                text_row(&["instructions", "", ""]),
                text_row(&["A1", "x", "n"]),
                text_row(&["A2"]),
                text_row(&["A3", "y", "m"]),
            ],
        )
    }

    #[test]
    fn test_unknown_format_is_an_outcome_not_error() {
        let registry = registry();
        let pipeline = SheetPipeline::new(&registry, MalformedRowPolicy::Skip);
        let sheet = SheetData::new("Other", text_row(&["Foo"]), vec![]);

        let outcome = pipeline.process("book.xlsx", &sheet).unwrap();
        assert!(matches!(outcome.result, SheetResult::UnknownFormat));
        assert_eq!(outcome.template(), None);
        assert_eq!(outcome.file, "book.xlsx");
        assert_eq!(outcome.sheet, "Other");
    }

    #[test]
    fn test_skip_policy_keeps_valid_rows() {
        let registry = registry();
        let pipeline = SheetPipeline::new(&registry, MalformedRowPolicy::Skip);

        let outcome = pipeline.process("book.xlsx", &sheet_with_short_row()).unwrap();
        assert_eq!(outcome.template(), Some("codes"));

        let extraction = outcome.extraction().unwrap();
        assert_eq!(extraction.rows.len(), 2);
        assert_eq!(extraction.malformed.len(), 1);
        assert_eq!(extraction.malformed[0].row, 2);
        // 表头 + 2 行数据之后: 工作表第 4 行
        assert_eq!(extraction.malformed[0].sheet_row(), 4);
    }

    #[test]
    fn test_abort_policy_rejects_sheet() {
        let registry = registry();
        let pipeline = SheetPipeline::new(&registry, MalformedRowPolicy::Abort);

        let err = pipeline.process("book.xlsx", &sheet_with_short_row()).unwrap_err();
        match err {
            ImportError::MalformedRow { file, sheet, source } => {
                assert_eq!(file, "book.xlsx");
                assert_eq!(sheet, "Sheet1");
                assert_eq!(source.row, 2);
                assert_eq!(source.column, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
