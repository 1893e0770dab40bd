// ==========================================
// 平台配置引擎 - 配置资源领域模型
// ==========================================
// 对齐: configuration 表 (tenant_id, content_type, resource_name, resource_content)
// 约束: resource_content 为不透明字节，不做任何编码假设
// ==========================================

use crate::domain::types::{ConfigurationType, TENANTS_FOLDER_NAME};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// 资源名必须是单个普通路径段: 不含分隔符，不能是 `.`/`..`、绝对路径或盘符
pub fn is_safe_resource_name(name: &str) -> bool {
    if name.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

// ==========================================
// BonitaConfiguration - 单个配置资源
// ==========================================
// 分区 (content_type, tenant_id) 内 resource_name 唯一
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BonitaConfiguration {
    pub resource_name: String,      // 资源名（文件名）
    pub resource_content: Vec<u8>,  // 资源内容（原样字节）
}

impl BonitaConfiguration {
    pub fn new(resource_name: impl Into<String>, resource_content: impl Into<Vec<u8>>) -> Self {
        Self {
            resource_name: resource_name.into(),
            resource_content: resource_content.into(),
        }
    }
}

// ==========================================
// FullBonitaConfiguration - 带类型/租户的配置资源
// ==========================================
// 用途: 全量导入/导出，以及由路径反推资源身份
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FullBonitaConfiguration {
    pub resource_name: String,
    pub resource_content: Vec<u8>,
    pub configuration_type: ConfigurationType,
    pub tenant_id: i64, // 0 = 非租户资源
}

impl FullBonitaConfiguration {
    pub fn new(
        resource_name: impl Into<String>,
        resource_content: impl Into<Vec<u8>>,
        configuration_type: ConfigurationType,
        tenant_id: i64,
    ) -> Self {
        Self {
            resource_name: resource_name.into(),
            resource_content: resource_content.into(),
            configuration_type,
            tenant_id,
        }
    }

    /// 是否为租户资源（由类型的作用域决定）
    pub fn is_tenant_resource(&self) -> bool {
        self.configuration_type.is_tenant_scoped()
    }

    /// 相对导出根目录的路径
    ///
    /// - 非租户: `<type>/<resourceName>`
    /// - 租户: `tenants/<tenantId>/<type>/<resourceName>`
    ///
    /// 资源名不是单个普通路径段时返回 None，避免写出导出目录之外。
    pub fn relative_path(&self) -> Option<PathBuf> {
        if !is_safe_resource_name(&self.resource_name) {
            return None;
        }
        let mut path = PathBuf::new();
        if self.is_tenant_resource() {
            path.push(TENANTS_FOLDER_NAME);
            path.push(self.tenant_id.to_string());
        }
        path.push(self.configuration_type.folder_name());
        path.push(&self.resource_name);
        Some(path)
    }

    /// 去掉类型/租户信息
    pub fn into_configuration(self) -> BonitaConfiguration {
        BonitaConfiguration {
            resource_name: self.resource_name,
            resource_content: self.resource_content,
        }
    }
}
