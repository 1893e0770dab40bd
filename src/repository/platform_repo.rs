// ==========================================
// 平台配置引擎 - 平台信息数据仓储
// ==========================================
// 对齐: platform 表（单行，id=1，记录已安装版本）
// ==========================================

use crate::db::{in_transaction, SharedConnection};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

/// 平台行固定主键
pub const PLATFORM_ID: i64 = 1;

/// 平台创建者
pub const PLATFORM_CREATED_BY: &str = "platformAdmin";

// ==========================================
// PlatformEntity - 平台信息
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformEntity {
    pub id: i64,
    pub version: String,
    pub previous_version: Option<String>,
    pub initial_version: String,
    pub created: i64, // 毫秒时间戳
    pub created_by: String,
}

impl PlatformEntity {
    /// 以当前时间构造新平台行
    pub fn new_installation(version: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: PLATFORM_ID,
            version: version.to_string(),
            previous_version: Some(String::new()),
            initial_version: version.to_string(),
            created: now.timestamp_millis(),
            created_by: PLATFORM_CREATED_BY.to_string(),
        }
    }
}

pub struct PlatformRepository {
    conn: SharedConnection,
}

impl PlatformRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入平台行
    pub fn insert(&self, platform: &PlatformEntity) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        in_transaction(&mut conn, |tx| -> RepositoryResult<()> {
            tx.execute(
                r#"
                INSERT INTO platform (id, version, previous_version, initial_version, created, created_by)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    platform.id,
                    platform.version,
                    platform.previous_version,
                    platform.initial_version,
                    platform.created,
                    platform.created_by,
                ],
            )?;
            Ok(())
        })?;

        tracing::info!(version = %platform.version, "平台行已写入");
        Ok(())
    }

    /// 读取全部平台行，按 id 排序
    ///
    /// 表不存在时返回存储错误，由上层决定如何解释。
    pub fn find_all(&self) -> RepositoryResult<Vec<PlatformEntity>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, version, previous_version, initial_version, created, created_by
            FROM platform
            ORDER BY id
            "#,
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok(PlatformEntity {
                    id: row.get(0)?,
                    version: row.get(1)?,
                    previous_version: row.get(2)?,
                    initial_version: row.get(3)?,
                    created: row.get(4)?,
                    created_by: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::{Arc, Mutex};

    fn setup_test_db() -> SharedConnection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE platform (
                id BIGINT NOT NULL PRIMARY KEY,
                version VARCHAR(50) NOT NULL,
                previous_version VARCHAR(50),
                initial_version VARCHAR(50) NOT NULL,
                created BIGINT NOT NULL,
                created_by VARCHAR(50) NOT NULL
            );
            "#,
        )
        .unwrap();
        Arc::new(Mutex::new(conn))
    }

    #[test]
    fn test_insert_and_find_all() {
        let repo = PlatformRepository::new(setup_test_db());
        let now = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let platform = PlatformEntity::new_installation("7.3.0", now);

        repo.insert(&platform).unwrap();

        let rows = repo.find_all().unwrap();
        assert_eq!(rows, vec![platform]);
        assert_eq!(rows[0].created, now.timestamp_millis());
        assert_eq!(rows[0].created_by, "platformAdmin");
    }

    #[test]
    fn test_insert_twice_fails() {
        let repo = PlatformRepository::new(setup_test_db());
        let platform = PlatformEntity::new_installation("7.3.0", Utc::now());

        repo.insert(&platform).unwrap();
        assert!(matches!(
            repo.insert(&platform).unwrap_err(),
            RepositoryError::UniqueConstraintViolation(_)
        ));
    }

    #[test]
    fn test_find_all_without_table_is_error() {
        let repo = PlatformRepository::new(Arc::new(Mutex::new(
            Connection::open_in_memory().unwrap(),
        )));
        assert!(repo.find_all().is_err());
    }
}
