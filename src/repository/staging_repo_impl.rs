// ==========================================
// 表格导入 - 落库 Repository 实现
// ==========================================
// 职责: 实现 StagingRepository（使用 rusqlite）
// 红线: Repository 不含识别/过滤规则，只做数据写入
// 约束: 表名先校验为合法标识符，值一律参数化绑定
// ==========================================

use crate::config::PerfSettings;
use crate::db::{bootstrap_schema, open_sqlite_connection};
use crate::domain::extraction::ProjectedRow;
use crate::domain::template::is_sql_identifier;
use crate::perf::{install_sqlite_tracing, PerfGuard};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::staging_repo::StagingRepository;
use rusqlite::{params_from_iter, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

// ==========================================
// SqliteStagingRepository
// ==========================================
pub struct SqliteStagingRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStagingRepository {
    /// 打开数据库并建表
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    /// - perf: SQL trace/慢查询设置
    pub fn new(db_path: &Path, perf: &PerfSettings) -> RepositoryResult<Self> {
        let mut conn = open_sqlite_connection(db_path).map_err(|e| {
            RepositoryError::DatabaseConnectionError(format!("{}: {}", db_path.display(), e))
        })?;
        install_sqlite_tracing(&mut conn, perf);
        bootstrap_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn ensure_table_name(table: &str) -> RepositoryResult<()> {
        if is_sql_identifier(table) {
            Ok(())
        } else {
            Err(RepositoryError::InvalidTableName(table.to_string()))
        }
    }

    /// INSERT OR IGNORE INTO "t" VALUES (?1, ?2, …)
    fn insert_sql(table: &str, width: usize) -> String {
        let placeholders = (1..=width)
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        format!("INSERT OR IGNORE INTO \"{}\" VALUES ({})", table, placeholders)
    }
}

impl StagingRepository for SqliteStagingRepository {
    fn stage_rows(&self, table: &str, rows: &[ProjectedRow]) -> RepositoryResult<usize> {
        Self::ensure_table_name(table)?;
        let Some(first) = rows.first() else {
            return Ok(0);
        };

        let width = first.len();
        if let Some((row, bad)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(RepositoryError::WidthMismatch {
                table: table.to_string(),
                row,
                expected: width,
                actual: bad.len(),
            });
        }

        let _perf = PerfGuard::new("stage_rows");
        let sql = Self::insert_sql(table, width);

        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(&sql)?;
            for row in rows {
                inserted += stmt.execute(params_from_iter(row.values().iter()))?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        debug!(table = %table, rows = rows.len(), inserted, "落库完成");
        Ok(inserted)
    }

    fn count_rows(&self, table: &str) -> RepositoryResult<usize> {
        Self::ensure_table_name(table)?;
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM \"{}\"", table),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}
