// ==========================================
// 表格导入 - 抽取结果
// ==========================================
// 职责: 投影后的数据行 + 被跳过的畸形行
// 所有权: 抽取完成后交给调用方
// ==========================================

use crate::domain::cell::CellValue;
use serde::Serialize;
use thiserror::Error;

/// 投影行: 仅包含模板声明列的值，按规则顺序排列，宽度固定为规则数
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedRow(Vec<CellValue>);

impl ProjectedRow {
    pub fn new(values: Vec<CellValue>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[CellValue] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// 畸形行: 行宽不足以覆盖某条规则的列号
///
/// `row` 为数据行序号（0 基，表头之后计数），`column` 为第一条越界规则的列号。
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("数据行 {row}（表头后 0 基）缺少列号 {column}（行宽 {width}）")]
pub struct MalformedRow {
    pub row: usize,
    pub column: usize,
    pub width: usize,
}

impl MalformedRow {
    /// 工作表中的行号（1 基，表头为第 1 行）
    pub fn sheet_row(&self) -> usize {
        self.row + 2
    }
}

/// 单个工作表的抽取结果
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Extraction {
    pub rows: Vec<ProjectedRow>,
    pub malformed: Vec<MalformedRow>,
}

impl Extraction {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_row_counts_header_and_is_one_based() {
        let first = MalformedRow {
            row: 0,
            column: 3,
            width: 1,
        };
        assert_eq!(first.sheet_row(), 2);

        let later = MalformedRow {
            row: 4,
            column: 5,
            width: 3,
        };
        assert_eq!(later.sheet_row(), 6);
    }
}
