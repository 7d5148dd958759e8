// ==========================================
// 表格导入 - 引擎层
// ==========================================
// 职责: 模板识别、数据行抽取、单工作表处理管道
// ==========================================

pub mod classifier;
pub mod extractor;
pub mod pipeline;

pub use classifier::{Classification, SheetClassifier};
pub use extractor::RowExtractor;
pub use pipeline::{SheetOutcome, SheetPipeline, SheetResult};
