// ==========================================
// 表格导入 - 工作表数据
// ==========================================
// 职责: 读取端交给核心的单页数据（表头行 + 数据行）
// 生命周期: 每个工作表构造一次，识别/抽取后丢弃
// ==========================================

use crate::domain::cell::CellValue;

/// 表头行（按列号索引）
pub type HeaderRow = Vec<CellValue>;

/// 数据行（按列号索引）
pub type DataRow = Vec<CellValue>;

/// 单个工作表的内容
///
/// `rows` 为表头之后的全部行（含说明行），模板 offset 相对于此计数。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetData {
    pub name: String,
    pub header: HeaderRow,
    pub rows: Vec<DataRow>,
}

impl SheetData {
    pub fn new(name: impl Into<String>, header: HeaderRow, rows: Vec<DataRow>) -> Self {
        Self {
            name: name.into(),
            header,
            rows,
        }
    }

    /// 由二维行集构造: 第一行为表头，其余为数据行
    pub fn from_rows(name: impl Into<String>, mut rows: Vec<DataRow>) -> Self {
        let header = if rows.is_empty() {
            Vec::new()
        } else {
            rows.remove(0)
        };
        Self::new(name, header, rows)
    }
}
