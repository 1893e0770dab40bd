use super::ConfigurationRepository;
use crate::db::in_transaction;
use crate::domain::{BonitaConfiguration, ConfigurationType, FullBonitaConfiguration};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::params;

impl ConfigurationRepository {
    // ==========================================
    // 查询操作
    // ==========================================

    /// 查询分区 (content_type, tenant_id) 内的全部资源，按资源名排序
    pub fn get(
        &self,
        configuration_type: ConfigurationType,
        tenant_id: i64,
    ) -> RepositoryResult<Vec<BonitaConfiguration>> {
        let mut conn = self.get_conn()?;

        in_transaction(&mut conn, |tx| -> RepositoryResult<Vec<BonitaConfiguration>> {
            let mut stmt = tx.prepare_cached(
                r#"
                SELECT resource_name, resource_content
                FROM configuration
                WHERE content_type = ?1 AND tenant_id = ?2
                ORDER BY resource_name
                "#,
            )?;

            let rows = stmt
                .query_map(params![configuration_type.as_str(), tenant_id], |row| {
                    Ok(BonitaConfiguration {
                        resource_name: row.get(0)?,
                        resource_content: row.get(1)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// 查询全部资源（带类型与租户），用于全量导出
    ///
    /// 排序: tenant_id, content_type, resource_name
    pub fn get_all(&self) -> RepositoryResult<Vec<FullBonitaConfiguration>> {
        let mut conn = self.get_conn()?;

        let raw = in_transaction(
            &mut conn,
            |tx| -> RepositoryResult<Vec<(i64, String, String, Vec<u8>)>> {
                let mut stmt = tx.prepare_cached(
                    r#"
                    SELECT tenant_id, content_type, resource_name, resource_content
                    FROM configuration
                    ORDER BY tenant_id, content_type, resource_name
                    "#,
                )?;
                let rows = stmt
                    .query_map([], |row| {
                        Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            },
        )?;

        raw.into_iter()
            .map(|(tenant_id, content_type, resource_name, resource_content)| {
                let configuration_type = content_type.parse::<ConfigurationType>().map_err(|e| {
                    RepositoryError::CorruptData {
                        table: "configuration".to_string(),
                        message: format!("{} (resource_name={})", e, resource_name),
                    }
                })?;
                if !configuration_type.accepts_tenant_id(tenant_id) {
                    return Err(RepositoryError::CorruptData {
                        table: "configuration".to_string(),
                        message: format!(
                            "content_type={} 与 tenant_id={} 作用域不符 (resource_name={})",
                            configuration_type, tenant_id, resource_name
                        ),
                    });
                }
                Ok(FullBonitaConfiguration {
                    resource_name,
                    resource_content,
                    configuration_type,
                    tenant_id,
                })
            })
            .collect()
    }

    /// 配置总行数
    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let n = conn.query_row("SELECT COUNT(*) FROM configuration", [], |row| row.get(0))?;
        Ok(n)
    }

    /// 平台是否已初始化（存在探针）
    ///
    /// 探测发生在建表之前，表不存在等任何存储错误都视为“未创建”，
    /// 这是错误体系里唯一一处把失败转成布尔值的地方。
    pub fn exists(&self) -> bool {
        let conn = match self.get_conn() {
            Ok(conn) => conn,
            Err(e) => {
                tracing::debug!(error = %e, "存在探针获取连接失败，视为未创建");
                return false;
            }
        };

        match conn.query_row("SELECT COUNT(*) FROM platform", [], |row| row.get::<_, i64>(0)) {
            Ok(n) => n > 0,
            Err(e) => {
                tracing::debug!(error = %e, "存在探针查询失败，视为未创建");
                false
            }
        }
    }
}
