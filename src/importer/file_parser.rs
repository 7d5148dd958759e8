// ==========================================
// 表格导入 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xlsm/.xlsb/.xls) / ODS (.ods) / CSV (.csv)
// 约定:
// - 每个工作表第一行为表头，其余为数据行
// - 列号为工作表绝对列号（calamine 区域前导空列/空行补 Empty）
// - 文本去除首尾空白；空白文本、Excel 错误值视为缺失
// ==========================================

use crate::domain::cell::CellValue;
use crate::domain::sheet::{DataRow, SheetData};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::WorkbookParser;
use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::NaiveDateTime;
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

pub const EXCEL_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];
pub const CSV_EXTENSIONS: &[&str] = &["csv"];

/// 小写扩展名（无扩展名时为空串）
pub fn file_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// 先打开一次文件，让「被占用/无权限」以 IO 错误的形式暴露
fn ensure_readable(path: &Path) -> ImportResult<()> {
    File::open(path).map(|_| ()).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ImportError::FileNotFound(path.display().to_string()),
        std::io::ErrorKind::PermissionDenied => {
            ImportError::FileLocked(path.display().to_string())
        }
        _ => ImportError::from(e),
    })
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl WorkbookParser for ExcelParser {
    fn parse_workbook(&self, file_path: &Path) -> ImportResult<Vec<SheetData>> {
        let ext = file_extension(file_path);
        if !EXCEL_EXTENSIONS.contains(&ext.as_str()) {
            return Err(ImportError::UnsupportedFormat(ext));
        }
        ensure_readable(file_path)?;

        let mut workbook = open_workbook_auto(file_path)?;

        let mut sheets = Vec::new();
        for sheet_name in workbook.sheet_names() {
            let range = workbook.worksheet_range(&sheet_name)?;
            sheets.push(SheetData::from_rows(sheet_name, range_to_rows(&range)));
        }

        Ok(sheets)
    }

    fn supports(&self, file_path: &Path) -> bool {
        EXCEL_EXTENSIONS.contains(&file_extension(file_path).as_str())
    }
}

/// calamine 区域 → 以 A1 为原点的行集
pub fn range_to_rows(range: &Range<Data>) -> Vec<DataRow> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };
    let lead_cols = start_col as usize;
    let width = lead_cols + range.width();

    let mut rows: Vec<DataRow> = (0..start_row)
        .map(|_| vec![CellValue::Empty; width])
        .collect();

    for row in range.rows() {
        let mut cells = Vec::with_capacity(width);
        cells.resize(lead_cols, CellValue::Empty);
        cells.extend(row.iter().map(cell_value));
        rows.push(cells);
    }

    rows
}

fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => text_cell(s),
        Data::Int(v) => CellValue::Int(*v),
        Data::Float(v) => CellValue::Float(*v),
        Data::Bool(v) => CellValue::Bool(*v),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::Float(dt.as_f64())),
        Data::DateTimeIso(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .map(CellValue::DateTime)
            .unwrap_or_else(|_| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Error(e.to_string()),
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
// 一个 CSV 文件即一个工作表，表名取文件名（不含扩展名）
pub struct CsvParser;

impl WorkbookParser for CsvParser {
    fn parse_workbook(&self, file_path: &Path) -> ImportResult<Vec<SheetData>> {
        let ext = file_extension(file_path);
        if !CSV_EXTENSIONS.contains(&ext.as_str()) {
            return Err(ImportError::UnsupportedFormat(ext));
        }
        ensure_readable(file_path)?;

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(text_cell).collect());
        }

        let sheet_name = file_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        Ok(vec![SheetData::from_rows(sheet_name, rows)])
    }

    fn supports(&self, file_path: &Path) -> bool {
        CSV_EXTENSIONS.contains(&file_extension(file_path).as_str())
    }
}

/// 去除首尾空白；空白串视为缺失（Excel 与 CSV 一致）
fn text_cell(raw: &str) -> CellValue {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        CellValue::Empty
    } else {
        CellValue::Text(trimmed.to_string())
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl WorkbookParser for UniversalFileParser {
    fn parse_workbook(&self, file_path: &Path) -> ImportResult<Vec<SheetData>> {
        if CsvParser.supports(file_path) {
            CsvParser.parse_workbook(file_path)
        } else if ExcelParser.supports(file_path) {
            ExcelParser.parse_workbook(file_path)
        } else {
            Err(ImportError::UnsupportedFormat(file_extension(file_path)))
        }
    }

    fn supports(&self, file_path: &Path) -> bool {
        CsvParser.supports(file_path) || ExcelParser.supports(file_path)
    }
}
