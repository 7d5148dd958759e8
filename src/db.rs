// ==========================================
// 表格导入 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少其他进程同时写库时的偶发 busy 错误
// ==========================================

use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 落库目标表结构
///
/// 说明：表名/列顺序与内置模板 class_gtins 的列规则一一对应
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS gtin_data (
    gtin str(16) PRIMARY KEY,
    name str(256) NOT NULL,
    inn_producer str(16) NOT NULL DEFAULT '',
    tn_code str(32) NOT NULL DEFAULT '',
    ware_code str(32) NOT NULL DEFAULT ''
);
CREATE INDEX IF NOT EXISTS gtin_data_name_index ON gtin_data (name);
"#;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &Path) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 建表（幂等）
pub fn bootstrap_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}
