// ==========================================
// 表格导入 - 领域层
// ==========================================
// 职责: 单元格、工作表、模板、抽取结果
// ==========================================

pub mod cell;
pub mod extraction;
pub mod sheet;
pub mod template;

pub use cell::CellValue;
pub use extraction::{Extraction, MalformedRow, ProjectedRow};
pub use sheet::{DataRow, HeaderRow, SheetData};
pub use template::{ColumnRule, LabelRule, Presence, RegistryError, Template, TemplateRegistry};
