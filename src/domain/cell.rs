// ==========================================
// 表格导入 - 单元格值
// ==========================================
// 职责: 以强类型表示单元格内容，显式区分「缺失」与「空字符串」
// 用途: 表头比对（可打印字符串）、数据行过滤（is_missing）、落库（ToSql）
// ==========================================

use chrono::NaiveDateTime;
use rusqlite::types::{Null, ToSql, ToSqlOutput};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 单元格值
///
/// 缺失判定只看变体，不做字符串比较:
/// - `Empty`: 单元格不存在/无内容
/// - `Error`: 公式错误值（#N/A、#REF! 等），读取端视为缺失
///
/// `Text("")` 是合法的空字符串，不算缺失。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
    Error(String),
}

impl CellValue {
    /// 是否为缺失值
    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Empty | CellValue::Error(_))
    }

    /// 构造文本单元格
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    /// 表头比对用的标准化标签（可打印形式 + 小写）
    pub fn label_key(&self) -> String {
        self.to_string().to_lowercase()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Int(v) => write!(f, "{}", v),
            // 整数值的浮点数按整数打印（Excel 数字列常见: 4601234567890.0）
            CellValue::Float(v) if v.fract() == 0.0 && v.abs() < 1e15 => {
                write!(f, "{}", *v as i64)
            }
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Bool(v) => write!(f, "{}", v),
            CellValue::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S")),
            CellValue::Error(e) => write!(f, "{}", e),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl ToSql for CellValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            CellValue::Empty | CellValue::Error(_) => Null.to_sql(),
            CellValue::Text(s) => s.to_sql(),
            CellValue::Int(v) => v.to_sql(),
            CellValue::Float(v) => v.to_sql(),
            CellValue::Bool(v) => v.to_sql(),
            CellValue::DateTime(v) => v.to_sql(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_missing_only_for_empty_and_error() {
        assert!(CellValue::Empty.is_missing());
        assert!(CellValue::Error("#N/A".to_string()).is_missing());

        assert!(!CellValue::text("").is_missing());
        assert!(!CellValue::Int(0).is_missing());
        assert!(!CellValue::Float(f64::NAN).is_missing());
        assert!(!CellValue::Bool(false).is_missing());
    }

    #[test]
    fn test_display_integral_float_without_fraction() {
        assert_eq!(CellValue::Float(4601234567890.0).to_string(), "4601234567890");
        assert_eq!(CellValue::Float(2.5).to_string(), "2.5");
        assert_eq!(CellValue::Int(-7).to_string(), "-7");
    }

    #[test]
    fn test_display_datetime_and_empty() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        assert_eq!(CellValue::DateTime(dt).to_string(), "2024-03-01 08:30:00");
        assert_eq!(CellValue::Empty.to_string(), "");
    }

    #[test]
    fn test_label_key_is_case_insensitive() {
        assert_eq!(CellValue::text("GTIN").label_key(), "gtin");
        assert_eq!(CellValue::text("ФИО").label_key(), "фио");
    }

    #[test]
    fn test_to_sql_maps_missing_to_null() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let is_null: bool = conn
            .query_row("SELECT ?1 IS NULL", [CellValue::Empty], |row| row.get(0))
            .unwrap();
        assert!(is_null);

        let text: String = conn
            .query_row("SELECT ?1", [CellValue::text("abc")], |row| row.get(0))
            .unwrap();
        assert_eq!(text, "abc");
    }
}
