// ==========================================
// 表格导入 - 数据仓储层
// ==========================================
// 红线: Repository 不含识别/过滤规则
// 约束: 所有写入使用参数化，表名须通过标识符校验
// ==========================================

pub mod error;
pub mod staging_repo;
pub mod staging_repo_impl;

pub use error::{RepositoryError, RepositoryResult};
pub use staging_repo::StagingRepository;
pub use staging_repo_impl::SqliteStagingRepository;
