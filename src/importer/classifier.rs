// ==========================================
// 平台配置引擎 - 资源分类策略
// ==========================================
// 职责: 文件路径 → (配置类型, 租户ID)，不匹配则忽略
// 三种模式: 全量布局 / 固定单一类型 / 许可证
// ==========================================

use crate::domain::{ConfigurationType, NON_TENANT_RESOURCE, TENANTS_FOLDER_NAME};
use std::path::{Component, Path};

/// 资源分类策略
///
/// `relative` 为文件相对遍历根目录的路径（最后一段为文件名）。
pub trait ResourceClassifier {
    fn classify(&self, relative: &Path) -> Option<(ConfigurationType, i64)>;
}

// ==========================================
// 全量布局
// ==========================================
// <root>/<type-folder>/.../<file>                      → (非租户类型, 0)
// <root>/tenants/<tenantId>/<type-folder>/.../<file>   → (租户类型, tenantId)
#[derive(Debug, Clone, Copy, Default)]
pub struct AllConfigurationClassifier;

impl ResourceClassifier for AllConfigurationClassifier {
    fn classify(&self, relative: &Path) -> Option<(ConfigurationType, i64)> {
        let parts = normal_components(relative)?;

        match parts.as_slice() {
            [tenants, tenant_id, type_folder, _, ..] if *tenants == TENANTS_FOLDER_NAME => {
                let tenant_id = tenant_id.parse::<i64>().ok().filter(|id| *id > 0)?;
                let configuration_type = ConfigurationType::from_folder_name(type_folder)?;
                configuration_type
                    .is_tenant_scoped()
                    .then_some((configuration_type, tenant_id))
            }
            [type_folder, _, ..] => {
                let configuration_type = ConfigurationType::from_folder_name(type_folder)?;
                (!configuration_type.is_tenant_scoped())
                    .then_some((configuration_type, NON_TENANT_RESOURCE))
            }
            _ => None,
        }
    }
}

// ==========================================
// 固定单一类型
// ==========================================
// 调用方已将根目录限定到一个分区，目录下任意文件都归入该分区
#[derive(Debug, Clone, Copy)]
pub struct SingleTypeClassifier {
    pub configuration_type: ConfigurationType,
    pub tenant_id: i64,
}

impl SingleTypeClassifier {
    pub fn new(configuration_type: ConfigurationType, tenant_id: i64) -> Self {
        Self {
            configuration_type,
            tenant_id,
        }
    }
}

impl ResourceClassifier for SingleTypeClassifier {
    fn classify(&self, _relative: &Path) -> Option<(ConfigurationType, i64)> {
        Some((self.configuration_type, self.tenant_id))
    }
}

// ==========================================
// 许可证
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct LicensesClassifier;

impl ResourceClassifier for LicensesClassifier {
    fn classify(&self, _relative: &Path) -> Option<(ConfigurationType, i64)> {
        Some((ConfigurationType::Licenses, NON_TENANT_RESOURCE))
    }
}

/// 仅接受普通 UTF-8 路径段；出现 `..`、根、前缀或非 UTF-8 段时返回 None
fn normal_components(relative: &Path) -> Option<Vec<&str>> {
    relative
        .components()
        .map(|c| match c {
            Component::Normal(s) => s.to_str(),
            _ => None,
        })
        .collect()
}
