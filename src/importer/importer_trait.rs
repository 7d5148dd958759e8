// ==========================================
// 表格导入 - 导入接口
// ==========================================
// 职责: 定义读取端接口（不包含实现）
// ==========================================

use crate::domain::sheet::SheetData;
use crate::importer::error::ImportResult;
use std::path::Path;

// ==========================================
// WorkbookParser Trait
// ==========================================
// 用途: 文件 → 工作表列表（表头行 + 数据行）
// 实现者: ExcelParser, CsvParser, UniversalFileParser
pub trait WorkbookParser: Send + Sync {
    /// 解析文件中的全部工作表
    ///
    /// # 参数
    /// - file_path: 文件路径
    ///
    /// # 返回
    /// - Ok(Vec<SheetData>): 按工作簿顺序排列的工作表
    /// - Err: 文件不存在/被占用/格式不支持/解析失败
    fn parse_workbook(&self, file_path: &Path) -> ImportResult<Vec<SheetData>>;

    /// 是否支持该文件（按扩展名判断）
    fn supports(&self, file_path: &Path) -> bool;
}
