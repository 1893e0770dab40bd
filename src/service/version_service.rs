// ==========================================
// 平台配置引擎 - 版本服务
// ==========================================
// 职责: 已安装平台版本 vs 当前工具版本
// ==========================================

use crate::db::SharedConnection;
use crate::repository::PlatformRepository;
use crate::service::error::{PlatformError, PlatformResult};

pub struct VersionService {
    platform_repo: PlatformRepository,
}

impl VersionService {
    pub fn new(conn: SharedConnection) -> Self {
        Self {
            platform_repo: PlatformRepository::new(conn),
        }
    }

    /// 已安装的平台版本
    ///
    /// platform 表不存在、无行或多行时都返回 `PlatformNotCreated`。
    pub fn get_platform_version(&self) -> PlatformResult<String> {
        let rows = self.platform_repo.find_all().map_err(|e| {
            tracing::debug!(error = %e, "读取 platform 表失败");
            PlatformError::PlatformNotCreated
        })?;

        match rows.as_slice() {
            [single] => Ok(single.version.clone()),
            _ => {
                tracing::debug!(rows = rows.len(), "platform 表行数不为 1");
                Err(PlatformError::PlatformNotCreated)
            }
        }
    }

    /// 当前工具版本
    pub fn get_platform_setup_version(&self) -> &'static str {
        crate::VERSION
    }

    /// 已安装版本是否与工具版本一致
    pub fn is_valid_platform_version(&self) -> PlatformResult<bool> {
        Ok(self.get_platform_version()? == self.get_platform_setup_version())
    }
}
