// ==========================================
// 平台配置引擎 - 领域层
// ==========================================
// 职责: 配置类型与配置资源实体
// 红线: 领域层不访问数据库/文件系统
// ==========================================

pub mod configuration;
pub mod types;

pub use configuration::{is_safe_resource_name, BonitaConfiguration, FullBonitaConfiguration};
pub use types::{ConfigurationType, NON_TENANT_RESOURCE, TENANTS_FOLDER_NAME};
