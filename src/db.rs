// ==========================================
// 平台配置引擎 - SQLite 连接与事务基础设施
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 提供唯一的“在事务中执行”原语，仓储只组合工作单元，不直接 COMMIT/ROLLBACK
// ==========================================

use rusqlite::{Connection, OptionalExtension, Transaction};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 共享连接句柄（显式传递，不使用全局单例）
pub type SharedConnection = Arc<Mutex<Connection>>;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    configure_sqlite_connection_with_timeout(conn, DEFAULT_BUSY_TIMEOUT_MS)
}

/// 同上，可指定 busy_timeout
pub fn configure_sqlite_connection_with_timeout(
    conn: &Connection,
    busy_timeout_ms: u64,
) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(busy_timeout_ms))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 打开连接并包装为共享句柄
pub fn open_shared_connection(db_path: &str, busy_timeout_ms: u64) -> rusqlite::Result<SharedConnection> {
    let mut conn = Connection::open(db_path)?;
    configure_sqlite_connection_with_timeout(&conn, busy_timeout_ms)?;
    crate::perf::install_sqlite_tracing(&mut conn);
    Ok(Arc::new(Mutex::new(conn)))
}

/// 在单个事务中执行工作单元
///
/// - 工作单元返回 Ok: 提交
/// - 工作单元返回 Err / 提交失败: 事务随 drop 回滚，错误原样向上传递
pub fn in_transaction<T, E, F>(conn: &mut Connection, work: F) -> Result<T, E>
where
    F: FnOnce(&Transaction<'_>) -> Result<T, E>,
    E: From<rusqlite::Error>,
{
    let tx = conn.transaction()?;
    let value = work(&tx)?;
    tx.commit()?;
    Ok(value)
}

/// 判断表是否存在
pub fn table_exists(conn: &Connection, table: &str) -> rusqlite::Result<bool> {
    let found: Option<bool> = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1 LIMIT 1",
            [table],
            |_row| Ok(true),
        )
        .optional()?;
    Ok(found.unwrap_or(false))
}
