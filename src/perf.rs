// ==========================================
// 平台配置引擎 - 同步耗时与慢 SQL 日志
// ==========================================
// - StoreTimer: 记录一次导入/导出/分区替换的分区、行数与耗时
// - 慢 SQL: rusqlite profile 回调，超过阈值输出 slow_sql 警告
// ==========================================

use crate::domain::ConfigurationType;
use rusqlite::Connection;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// 慢 SQL 阈值环境变量（毫秒，0 关闭）
pub const SLOW_SQL_MS_ENV: &str = "PLATFORM_SETUP_SLOW_SQL_MS";
/// 慢同步操作阈值环境变量（毫秒，0 关闭）
pub const SLOW_SYNC_MS_ENV: &str = "PLATFORM_SETUP_SLOW_SYNC_MS";

const DEFAULT_SLOW_SQL_MS: u64 = 200;
const DEFAULT_SLOW_SYNC_MS: u64 = 2_000;
const MAX_LOGGED_SQL_CHARS: usize = 300;

static SLOW_SQL_THRESHOLD_MS: AtomicU64 = AtomicU64::new(DEFAULT_SLOW_SQL_MS);

fn threshold_from_env(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

/// 单行化并按字符数截断，避免大批量 INSERT 刷屏
fn shorten_sql(sql: &str) -> String {
    let one_line = sql.split_whitespace().collect::<Vec<_>>().join(" ");
    match one_line.char_indices().nth(MAX_LOGGED_SQL_CHARS) {
        Some((cut, _)) => format!("{}…", &one_line[..cut]),
        None => one_line,
    }
}

/// 为连接安装慢 SQL 回调
pub fn install_sqlite_tracing(conn: &mut Connection) {
    let threshold = threshold_from_env(SLOW_SQL_MS_ENV, DEFAULT_SLOW_SQL_MS);
    SLOW_SQL_THRESHOLD_MS.store(threshold, Ordering::Relaxed);

    if threshold == 0 {
        conn.profile(None);
    } else {
        conn.profile(Some(slow_sql_callback));
    }
}

fn slow_sql_callback(sql: &str, duration: Duration) {
    let threshold = SLOW_SQL_THRESHOLD_MS.load(Ordering::Relaxed);
    let ms = duration.as_millis() as u64;
    if threshold > 0 && ms >= threshold {
        tracing::warn!(target: "slow_sql", duration_ms = ms, sql = %shorten_sql(sql), "slow sql");
    }
}

// ==========================================
// StoreTimer - 同步操作计时
// ==========================================
// drop 时输出一条 debug 日志；超过阈值升级为 warn
pub struct StoreTimer {
    op: &'static str,
    partition: Option<(ConfigurationType, i64)>,
    rows: usize,
    start: Instant,
    slow_ms: u64,
}

impl StoreTimer {
    /// 跨分区操作（全量导入/导出、全部删除）
    pub fn new(op: &'static str) -> Self {
        Self::start(op, None)
    }

    /// 单分区操作
    pub fn for_partition(
        op: &'static str,
        configuration_type: ConfigurationType,
        tenant_id: i64,
    ) -> Self {
        Self::start(op, Some((configuration_type, tenant_id)))
    }

    fn start(op: &'static str, partition: Option<(ConfigurationType, i64)>) -> Self {
        Self {
            op,
            partition,
            rows: 0,
            start: Instant::now(),
            slow_ms: threshold_from_env(SLOW_SYNC_MS_ENV, DEFAULT_SLOW_SYNC_MS),
        }
    }

    /// 记录本次处理的资源行数
    pub fn set_rows(&mut self, rows: usize) {
        self.rows = rows;
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn partition(&self) -> Option<(ConfigurationType, i64)> {
        self.partition
    }
}

impl Drop for StoreTimer {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_millis() as u64;
        let content_type = self.partition.map(|(t, _)| t.as_str()).unwrap_or("*");
        let tenant_id = self.partition.map(|(_, id)| id);

        if self.slow_ms > 0 && elapsed_ms >= self.slow_ms {
            tracing::warn!(
                target: "perf",
                op = self.op,
                content_type,
                tenant_id = ?tenant_id,
                rows = self.rows,
                elapsed_ms,
                "slow configuration sync"
            );
        } else {
            tracing::debug!(
                target: "perf",
                op = self.op,
                content_type,
                tenant_id = ?tenant_id,
                rows = self.rows,
                elapsed_ms,
                "done"
            );
        }
    }
}
