// ==========================================
// 平台配置引擎 - 领域类型定义
// ==========================================
// 职责: 配置类型枚举 + 作用域/目录名映射表
// 对齐: configuration.content_type 列
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 非租户资源的 tenant_id 哨兵值
pub const NON_TENANT_RESOURCE: i64 = 0;

/// 租户目录名（`<root>/tenants/<tenantId>/...`）
pub const TENANTS_FOLDER_NAME: &str = "tenants";

// ==========================================
// 配置类型 (Configuration Type)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
// 目录名: 存储名的小写形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfigurationType {
    PlatformEngine,                // 平台引擎配置
    PlatformPortal,                // 平台门户配置
    PlatformInitEngine,            // 平台初始化引擎配置
    TenantTemplateEngine,          // 新租户引擎模板
    TenantTemplatePortal,          // 新租户门户模板
    TenantTemplateSecurityScripts, // 新租户安全脚本模板
    TenantEngine,                  // 租户引擎配置
    TenantPortal,                  // 租户门户配置
    TenantSecurityScripts,         // 租户安全脚本
    Licenses,                      // 许可证
}

/// 类型表: (类型, 存储名, 是否租户作用域)
///
/// walker 与导出共同使用这一张表，不要在别处散落判断。
const TYPE_TABLE: [(ConfigurationType, &str, bool); 10] = [
    (ConfigurationType::PlatformEngine, "PLATFORM_ENGINE", false),
    (ConfigurationType::PlatformPortal, "PLATFORM_PORTAL", false),
    (ConfigurationType::PlatformInitEngine, "PLATFORM_INIT_ENGINE", false),
    (ConfigurationType::TenantTemplateEngine, "TENANT_TEMPLATE_ENGINE", false),
    (ConfigurationType::TenantTemplatePortal, "TENANT_TEMPLATE_PORTAL", false),
    (
        ConfigurationType::TenantTemplateSecurityScripts,
        "TENANT_TEMPLATE_SECURITY_SCRIPTS",
        false,
    ),
    (ConfigurationType::TenantEngine, "TENANT_ENGINE", true),
    (ConfigurationType::TenantPortal, "TENANT_PORTAL", true),
    (ConfigurationType::TenantSecurityScripts, "TENANT_SECURITY_SCRIPTS", true),
    (ConfigurationType::Licenses, "LICENSES", false),
];

impl ConfigurationType {
    /// 全部配置类型（声明顺序）
    pub const ALL: [ConfigurationType; 10] = [
        ConfigurationType::PlatformEngine,
        ConfigurationType::PlatformPortal,
        ConfigurationType::PlatformInitEngine,
        ConfigurationType::TenantTemplateEngine,
        ConfigurationType::TenantTemplatePortal,
        ConfigurationType::TenantTemplateSecurityScripts,
        ConfigurationType::TenantEngine,
        ConfigurationType::TenantPortal,
        ConfigurationType::TenantSecurityScripts,
        ConfigurationType::Licenses,
    ];

    fn entry(self) -> &'static (ConfigurationType, &'static str, bool) {
        // TYPE_TABLE 覆盖全部变体，且顺序与声明顺序一致
        &TYPE_TABLE[self as usize]
    }

    /// 数据库中的存储名，例如 `TENANT_PORTAL`
    pub fn as_str(self) -> &'static str {
        self.entry().1
    }

    /// 是否为租户作用域类型（tenant_id > 0）
    pub fn is_tenant_scoped(self) -> bool {
        self.entry().2
    }

    /// tenant_id 是否与作用域匹配: 租户类型要求 > 0，其余类型只能是 0
    pub fn accepts_tenant_id(self, tenant_id: i64) -> bool {
        if self.is_tenant_scoped() {
            tenant_id > NON_TENANT_RESOURCE
        } else {
            tenant_id == NON_TENANT_RESOURCE
        }
    }

    /// 目录名，例如 `tenant_portal`
    pub fn folder_name(self) -> String {
        self.as_str().to_lowercase()
    }

    /// 根据目录名解析类型（大小写不敏感）
    pub fn from_folder_name(name: &str) -> Option<Self> {
        TYPE_TABLE
            .iter()
            .find(|(_, stored, _)| stored.eq_ignore_ascii_case(name))
            .map(|(t, _, _)| *t)
    }

    /// 非租户作用域的全部类型
    pub fn non_tenant_types() -> impl Iterator<Item = ConfigurationType> {
        Self::ALL.into_iter().filter(|t| !t.is_tenant_scoped())
    }

    /// 租户作用域的全部类型
    pub fn tenant_types() -> impl Iterator<Item = ConfigurationType> {
        Self::ALL.into_iter().filter(|t| t.is_tenant_scoped())
    }
}

impl fmt::Display for ConfigurationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 未知的配置类型存储名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownConfigurationType(pub String);

impl fmt::Display for UnknownConfigurationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "未知的配置类型: {}", self.0)
    }
}

impl std::error::Error for UnknownConfigurationType {}

impl FromStr for ConfigurationType {
    type Err = UnknownConfigurationType;

    /// 按存储名精确解析（区分大小写）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TYPE_TABLE
            .iter()
            .find(|(_, stored, _)| *stored == s)
            .map(|(t, _, _)| *t)
            .ok_or_else(|| UnknownConfigurationType(s.to_string()))
    }
}
