// ==========================================
// 表格导入 - 落库 Repository Trait
// ==========================================
// 职责: 将抽取结果写入目标表（不包含识别/过滤规则）
// 实现者: SqliteStagingRepository（使用 rusqlite）
// ==========================================

use crate::domain::extraction::ProjectedRow;
use crate::repository::error::RepositoryResult;

pub trait StagingRepository: Send + Sync {
    /// 批量写入（INSERT OR IGNORE，单事务）
    ///
    /// # 参数
    /// - table: 目标表名（须为合法 SQL 标识符）
    /// - rows: 投影后的数据行（所有行列数一致）
    ///
    /// # 返回
    /// - Ok(usize): 实际插入的行数（被忽略的重复行不计）
    fn stage_rows(&self, table: &str, rows: &[ProjectedRow]) -> RepositoryResult<usize>;

    /// 统计目标表行数
    fn count_rows(&self, table: &str) -> RepositoryResult<usize>;
}
