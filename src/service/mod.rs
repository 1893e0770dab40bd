// ==========================================
// 平台配置引擎 - 服务层
// ==========================================
// 职责: 组合目录导入与仓储，对外提供强类型入口
// ==========================================

pub mod configuration_service;
pub mod error;
pub mod version_service;

pub use configuration_service::ConfigurationService;
pub use error::{PlatformError, PlatformResult};
pub use version_service::VersionService;
