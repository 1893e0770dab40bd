// ==========================================
// 平台配置引擎 - 配置资源数据仓储
// ==========================================
// 对齐: configuration 表
//   PRIMARY KEY (tenant_id, content_type, resource_name)
// 红线: 行从不原地更新，替换 = 删除 + 重新插入，且在同一事务内
// ==========================================

mod queries;


use crate::db::{in_transaction, SharedConnection};
use crate::domain::{
    is_safe_resource_name, BonitaConfiguration, ConfigurationType, FullBonitaConfiguration,
};
use crate::perf::StoreTimer;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Transaction};

const INSERT_SQL: &str = r#"
    INSERT INTO configuration (tenant_id, content_type, resource_name, resource_content)
    VALUES (?1, ?2, ?3, ?4)
"#;

const DELETE_PARTITION_SQL: &str =
    "DELETE FROM configuration WHERE content_type = ?1 AND tenant_id = ?2";

const DELETE_TENANT_SQL: &str = "DELETE FROM configuration WHERE tenant_id = ?1";

const DELETE_ALL_SQL: &str = "DELETE FROM configuration";

// ==========================================
// ConfigurationRepository - 配置资源仓储
// ==========================================
// 每个公开操作恰好对应一个事务；不额外加进程内锁以外的并发控制
pub struct ConfigurationRepository {
    conn: SharedConnection,
}

impl ConfigurationRepository {
    /// 创建新的配置仓储
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    pub(super) fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 替换单个分区 (content_type, tenant_id) 的全部资源
    ///
    /// 同一事务内: 删除分区旧行 → 插入 `resources`。
    /// `resources` 为空时分区最终为空。分区内资源名重复会触发主键冲突，整个事务回滚。
    /// tenant_id 与类型作用域不符、资源名不是单个路径段时，开启事务前直接拒绝。
    ///
    /// # 返回
    /// - `Ok(count)`: 插入的行数
    pub fn store(
        &self,
        resources: &[BonitaConfiguration],
        configuration_type: ConfigurationType,
        tenant_id: i64,
    ) -> RepositoryResult<usize> {
        let mut timer =
            StoreTimer::for_partition("configuration.store", configuration_type, tenant_id);
        check_scope(configuration_type, tenant_id)?;
        for r in resources {
            check_resource_name(&r.resource_name)?;
        }

        let mut conn = self.get_conn()?;

        let inserted = in_transaction(&mut conn, |tx| -> RepositoryResult<usize> {
            let deleted =
                tx.execute(DELETE_PARTITION_SQL, params![configuration_type.as_str(), tenant_id])?;
            tracing::debug!(
                content_type = %configuration_type,
                tenant_id,
                deleted,
                "清理分区旧配置"
            );
            insert_rows(
                tx,
                resources.iter().map(|r| {
                    (
                        tenant_id,
                        configuration_type,
                        r.resource_name.as_str(),
                        &r.resource_content[..],
                    )
                }),
            )
        })?;

        timer.set_rows(inserted);
        tracing::info!(
            content_type = %configuration_type,
            tenant_id,
            inserted,
            "分区配置已替换"
        );
        Ok(inserted)
    }

    /// 全量替换: 删除所有行 → 插入全部 `resources`，单一事务
    ///
    /// 不可拆成多次 `store()`，否则跨分区原子性丢失。
    pub fn store_all(&self, resources: &[FullBonitaConfiguration]) -> RepositoryResult<usize> {
        let mut timer = StoreTimer::new("configuration.store_all");
        for r in resources {
            check_scope(r.configuration_type, r.tenant_id)?;
            check_resource_name(&r.resource_name)?;
        }

        let mut conn = self.get_conn()?;

        let inserted = in_transaction(&mut conn, |tx| -> RepositoryResult<usize> {
            let deleted = tx.execute(DELETE_ALL_SQL, [])?;
            tracing::debug!(deleted, "清理全部旧配置");
            insert_rows(
                tx,
                resources.iter().map(|r| {
                    (
                        r.tenant_id,
                        r.configuration_type,
                        r.resource_name.as_str(),
                        &r.resource_content[..],
                    )
                }),
            )
        })?;

        timer.set_rows(inserted);
        tracing::info!(inserted, "全部配置已替换");
        Ok(inserted)
    }

    /// 删除某租户的全部配置（不区分类型）
    ///
    /// `tenant_id <= 0` 直接拒绝，不触达存储：否则会误删 tenant_id=0 的平台级资源。
    ///
    /// # 返回
    /// - `Ok(count)`: 删除的行数
    pub fn delete_tenant(&self, tenant_id: i64) -> RepositoryResult<usize> {
        if tenant_id <= 0 {
            return Err(RepositoryError::InvalidArgument(format!(
                "tenant_id={} 不允许",
                tenant_id
            )));
        }

        let mut conn = self.get_conn()?;
        let deleted = in_transaction(&mut conn, |tx| -> RepositoryResult<usize> {
            Ok(tx.execute(DELETE_TENANT_SQL, params![tenant_id])?)
        })?;

        tracing::info!(tenant_id, deleted, "租户配置已删除");
        Ok(deleted)
    }

    /// 删除全部配置（幂等）
    pub fn delete_all(&self) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let deleted = in_transaction(&mut conn, |tx| -> RepositoryResult<usize> {
            Ok(tx.execute(DELETE_ALL_SQL, [])?)
        })?;

        tracing::info!(deleted, "全部配置已删除");
        Ok(deleted)
    }
}

fn check_scope(configuration_type: ConfigurationType, tenant_id: i64) -> RepositoryResult<()> {
    if configuration_type.accepts_tenant_id(tenant_id) {
        return Ok(());
    }
    Err(RepositoryError::InvalidArgument(format!(
        "content_type={} 不接受 tenant_id={}",
        configuration_type, tenant_id
    )))
}

fn check_resource_name(resource_name: &str) -> RepositoryResult<()> {
    if !is_safe_resource_name(resource_name) {
        return Err(RepositoryError::InvalidArgument(format!(
            "resource_name={:?} 不是合法的文件名",
            resource_name
        )));
    }
    Ok(())
}

/// 逐行插入 (tenant_id, content_type, resource_name, resource_content)
fn insert_rows<'a, I>(tx: &Transaction<'_>, rows: I) -> RepositoryResult<usize>
where
    I: IntoIterator<Item = (i64, ConfigurationType, &'a str, &'a [u8])>,
{
    let mut stmt = tx.prepare_cached(INSERT_SQL)?;
    let mut count = 0;
    for (tenant_id, configuration_type, resource_name, resource_content) in rows {
        stmt.execute(params![
            tenant_id,
            configuration_type.as_str(),
            resource_name,
            resource_content
        ])?;
        count += 1;
    }
    Ok(count)
}
