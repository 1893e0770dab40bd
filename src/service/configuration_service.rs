// ==========================================
// 平台配置引擎 - 配置服务（门面）
// ==========================================
// 职责:
// 1. 每个配置类别一组强类型读/写入口（固定类型后委托仓储）
// 2. 目录 → 存储 的全量/单分区导入
// 3. 存储 → 目录 的全量导出
// 红线: 全量导入必须走单事务 store_all，不能拆成多次分区替换
// ==========================================

use crate::db::SharedConnection;
use crate::domain::{BonitaConfiguration, ConfigurationType, NON_TENANT_RESOURCE};
use crate::importer::{
    walk, walk_configurations, AllConfigurationClassifier, LicensesClassifier,
    SingleTypeClassifier,
};
use crate::perf::StoreTimer;
use crate::repository::ConfigurationRepository;
use crate::service::error::{PlatformError, PlatformResult};
use std::fs;
use std::path::Path;
use std::sync::Arc;

// ==========================================
// ConfigurationService - 配置服务
// ==========================================
pub struct ConfigurationService {
    repo: Arc<ConfigurationRepository>,
}

impl ConfigurationService {
    /// 创建新的配置服务
    pub fn new(repo: Arc<ConfigurationRepository>) -> Self {
        Self { repo }
    }

    /// 从共享连接创建
    pub fn from_connection(conn: SharedConnection) -> Self {
        Self::new(Arc::new(ConfigurationRepository::new(conn)))
    }

    /// 底层仓储（供编排层做存在探测）
    pub fn repository(&self) -> &ConfigurationRepository {
        &self.repo
    }

    // ==========================================
    // 平台级配置
    // ==========================================

    pub fn get_platform_engine_conf(&self) -> PlatformResult<Vec<BonitaConfiguration>> {
        self.get_non_tenant_resource(ConfigurationType::PlatformEngine)
    }

    pub fn store_platform_engine_conf(&self, confs: &[BonitaConfiguration]) -> PlatformResult<()> {
        self.store_partition(confs, ConfigurationType::PlatformEngine, NON_TENANT_RESOURCE)
    }

    pub fn get_platform_portal_conf(&self) -> PlatformResult<Vec<BonitaConfiguration>> {
        self.get_non_tenant_resource(ConfigurationType::PlatformPortal)
    }

    pub fn store_platform_portal_conf(&self, confs: &[BonitaConfiguration]) -> PlatformResult<()> {
        self.store_partition(confs, ConfigurationType::PlatformPortal, NON_TENANT_RESOURCE)
    }

    pub fn get_platform_init_engine_conf(&self) -> PlatformResult<Vec<BonitaConfiguration>> {
        self.get_non_tenant_resource(ConfigurationType::PlatformInitEngine)
    }

    pub fn store_platform_init_engine_conf(
        &self,
        confs: &[BonitaConfiguration],
    ) -> PlatformResult<()> {
        self.store_partition(confs, ConfigurationType::PlatformInitEngine, NON_TENANT_RESOURCE)
    }

    // ==========================================
    // 新租户模板
    // ==========================================

    pub fn get_tenant_template_engine_conf(&self) -> PlatformResult<Vec<BonitaConfiguration>> {
        self.get_non_tenant_resource(ConfigurationType::TenantTemplateEngine)
    }

    pub fn store_tenant_template_engine_conf(
        &self,
        confs: &[BonitaConfiguration],
    ) -> PlatformResult<()> {
        self.store_partition(confs, ConfigurationType::TenantTemplateEngine, NON_TENANT_RESOURCE)
    }

    pub fn get_tenant_template_portal_conf(&self) -> PlatformResult<Vec<BonitaConfiguration>> {
        self.get_non_tenant_resource(ConfigurationType::TenantTemplatePortal)
    }

    pub fn store_tenant_template_portal_conf(
        &self,
        confs: &[BonitaConfiguration],
    ) -> PlatformResult<()> {
        self.store_partition(confs, ConfigurationType::TenantTemplatePortal, NON_TENANT_RESOURCE)
    }

    pub fn get_tenant_template_security_scripts(
        &self,
    ) -> PlatformResult<Vec<BonitaConfiguration>> {
        self.get_non_tenant_resource(ConfigurationType::TenantTemplateSecurityScripts)
    }

    pub fn store_tenant_template_security_scripts(
        &self,
        confs: &[BonitaConfiguration],
    ) -> PlatformResult<()> {
        self.store_partition(
            confs,
            ConfigurationType::TenantTemplateSecurityScripts,
            NON_TENANT_RESOURCE,
        )
    }

    // ==========================================
    // 租户级配置（显式 tenant_id）
    // ==========================================

    pub fn get_tenant_engine_conf(&self, tenant_id: i64) -> PlatformResult<Vec<BonitaConfiguration>> {
        self.get_partition(ConfigurationType::TenantEngine, tenant_id)
    }

    pub fn store_tenant_engine_conf(
        &self,
        confs: &[BonitaConfiguration],
        tenant_id: i64,
    ) -> PlatformResult<()> {
        self.store_partition(confs, ConfigurationType::TenantEngine, tenant_id)
    }

    pub fn get_tenant_portal_conf(&self, tenant_id: i64) -> PlatformResult<Vec<BonitaConfiguration>> {
        self.get_partition(ConfigurationType::TenantPortal, tenant_id)
    }

    pub fn store_tenant_portal_conf(
        &self,
        confs: &[BonitaConfiguration],
        tenant_id: i64,
    ) -> PlatformResult<()> {
        self.store_partition(confs, ConfigurationType::TenantPortal, tenant_id)
    }

    pub fn get_tenant_security_scripts(
        &self,
        tenant_id: i64,
    ) -> PlatformResult<Vec<BonitaConfiguration>> {
        self.get_partition(ConfigurationType::TenantSecurityScripts, tenant_id)
    }

    pub fn store_tenant_security_scripts(
        &self,
        confs: &[BonitaConfiguration],
        tenant_id: i64,
    ) -> PlatformResult<()> {
        self.store_partition(confs, ConfigurationType::TenantSecurityScripts, tenant_id)
    }

    // ==========================================
    // 许可证
    // ==========================================

    pub fn get_licenses(&self) -> PlatformResult<Vec<BonitaConfiguration>> {
        self.get_non_tenant_resource(ConfigurationType::Licenses)
    }

    /// 导入许可证目录: 目录下任意文件都归入 (LICENSES, 0)，替换该分区
    pub fn store_licenses(&self, licenses_folder: &Path) -> PlatformResult<()> {
        let confs = walk_configurations(licenses_folder, &LicensesClassifier)?;
        self.store_partition(&confs, ConfigurationType::Licenses, NON_TENANT_RESOURCE)
    }

    // ==========================================
    // 目录导入
    // ==========================================

    /// 以单一类型 TENANT_PORTAL 导入某租户的配置目录
    pub fn store_tenant_configuration(&self, folder: &Path, tenant_id: i64) -> PlatformResult<()> {
        self.store_folder(folder, ConfigurationType::TenantPortal, tenant_id)
    }

    /// 以单一类型 PLATFORM_ENGINE 导入平台配置目录
    pub fn store_platform_configuration(&self, folder: &Path) -> PlatformResult<()> {
        self.store_folder(folder, ConfigurationType::PlatformEngine, NON_TENANT_RESOURCE)
    }

    /// 全量导入: 按目录布局分类后，单事务替换存储的全部内容
    ///
    /// # 返回
    /// - Ok(count): 导入的资源数
    pub fn store_all_configuration(&self, folder: &Path) -> PlatformResult<usize> {
        let mut timer = StoreTimer::new("store_all_configuration");

        let resources = walk(folder, &AllConfigurationClassifier)?;
        let inserted = self.repo.store_all(&resources)?;
        timer.set_rows(inserted);

        tracing::info!(folder = %folder.display(), inserted, "全部配置已从目录导入");
        Ok(inserted)
    }

    // ==========================================
    // 目录导出
    // ==========================================

    /// 全量导出到目录（非事务，失败时目录可能只写了一部分）
    ///
    /// - 非租户: `folder/<type>/<resourceName>`
    /// - 租户: `folder/tenants/<tenantId>/<type>/<resourceName>`
    ///
    /// 同名文件直接覆盖，内容原样写出。
    ///
    /// # 返回
    /// - Ok(count): 写出的文件数
    pub fn write_all_configuration_to_folder(&self, folder: &Path) -> PlatformResult<usize> {
        let mut timer = StoreTimer::new("write_all_configuration_to_folder");

        let all = self.repo.get_all()?;
        timer.set_rows(all.len());

        // 先校验全部资源名，再写任何文件
        let mut targets = Vec::with_capacity(all.len());
        for conf in &all {
            let relative = conf.relative_path().ok_or_else(|| {
                tracing::error!(resource_name = %conf.resource_name, "资源名不是单个路径段，拒绝导出");
                PlatformError::UnsafeResourceName {
                    resource_name: conf.resource_name.clone(),
                    content_type: conf.configuration_type,
                    tenant_id: conf.tenant_id,
                }
            })?;
            targets.push((folder.join(relative), conf));
        }

        for (target, conf) in targets {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| PlatformError::io(parent, e))?;
            }
            tracing::debug!(path = %target.display(), "写出配置文件");
            fs::write(&target, &conf.resource_content).map_err(|e| PlatformError::io(&target, e))?;
        }

        tracing::info!(folder = %folder.display(), written = all.len(), "全部配置已导出到目录");
        Ok(all.len())
    }

    // ==========================================
    // 删除
    // ==========================================

    /// 删除某租户的全部配置；`tenant_id <= 0` 直接拒绝
    pub fn delete_tenant_configuration(&self, tenant_id: i64) -> PlatformResult<()> {
        if tenant_id <= 0 {
            return Err(PlatformError::InvalidTenantId(tenant_id));
        }
        self.repo.delete_tenant(tenant_id)?;
        Ok(())
    }

    pub fn delete_all_configuration(&self) -> PlatformResult<()> {
        self.repo.delete_all()?;
        Ok(())
    }

    // ==========================================
    // 内部辅助
    // ==========================================

    fn get_non_tenant_resource(
        &self,
        configuration_type: ConfigurationType,
    ) -> PlatformResult<Vec<BonitaConfiguration>> {
        self.get_partition(configuration_type, NON_TENANT_RESOURCE)
    }

    fn get_partition(
        &self,
        configuration_type: ConfigurationType,
        tenant_id: i64,
    ) -> PlatformResult<Vec<BonitaConfiguration>> {
        Ok(self.repo.get(configuration_type, tenant_id)?)
    }

    fn store_partition(
        &self,
        confs: &[BonitaConfiguration],
        configuration_type: ConfigurationType,
        tenant_id: i64,
    ) -> PlatformResult<()> {
        self.repo.store(confs, configuration_type, tenant_id)?;
        Ok(())
    }

    fn store_folder(
        &self,
        folder: &Path,
        configuration_type: ConfigurationType,
        tenant_id: i64,
    ) -> PlatformResult<()> {
        let classifier = SingleTypeClassifier::new(configuration_type, tenant_id);
        let confs = walk_configurations(folder, &classifier)?;
        self.store_partition(&confs, configuration_type, tenant_id)
    }
}
