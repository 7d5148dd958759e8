// ==========================================
// 表格导入 - 数据行抽取器
// ==========================================
// 流程: 跳过 offset 行 → 按规则列投影 → 必填列缺失则丢弃
// 畸形行（行宽不足）: 记录 MalformedRow 并跳过该行，继续处理后续行
// 红线: 无内部状态；同一输入多次抽取结果一致
// ==========================================

use crate::domain::cell::CellValue;
use crate::domain::extraction::{Extraction, MalformedRow, ProjectedRow};
use crate::domain::sheet::DataRow;
use crate::domain::template::Template;

#[derive(Debug, Default, Clone, Copy)]
pub struct RowExtractor;

impl RowExtractor {
    pub fn new() -> Self {
        Self
    }

    /// 按模板抽取数据行
    ///
    /// # 参数
    /// - rows: 表头之后的全部行（含说明行）
    /// - template: 已识别的模板
    ///
    /// # 返回
    /// - Extraction: 保留的投影行（保持原顺序，不去重）+ 畸形行列表
    pub fn extract(&self, rows: &[DataRow], template: &Template) -> Extraction {
        let mut extraction = Extraction::default();

        for (row_idx, row) in rows.iter().enumerate().skip(template.offset) {
            match project(row, row_idx, template) {
                Ok(projected) => {
                    if keep_row(&projected, template) {
                        extraction.rows.push(projected);
                    }
                }
                Err(malformed) => extraction.malformed.push(malformed),
            }
        }

        extraction
    }
}

/// 取出规则列的值（按规则顺序）
fn project(
    row: &[CellValue],
    row_idx: usize,
    template: &Template,
) -> Result<ProjectedRow, MalformedRow> {
    let values = template
        .columns
        .iter()
        .map(|rule| {
            row.get(rule.index).cloned().ok_or_else(|| MalformedRow {
                row: row_idx,
                column: rule.index,
                width: row.len(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ProjectedRow::new(values))
}

/// 每一列要么有值，要么允许缺失
fn keep_row(projected: &ProjectedRow, template: &Template) -> bool {
    projected
        .values()
        .iter()
        .zip(&template.columns)
        .all(|(value, rule)| !value.is_missing() || !rule.is_strict())
}
