// ==========================================
// 平台配置引擎 - 核心库
// ==========================================
// 职责: 配置资源在目录树与关系库之间的同步
// 技术栈: Rust + SQLite (rusqlite)
// 红线: 分区替换与全量替换都必须在单一事务内完成
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 配置类型与资源实体
pub mod domain;

// 数据库基础设施（连接初始化/PRAGMA/事务原语）
pub mod db;

// SQL 统计与慢查询日志
pub mod perf;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 配置目录遍历
pub mod importer;

// 服务层 - 配置门面与版本服务
pub mod service;

// 安装层 - 建表脚本与 init/push/pull 编排
pub mod setup;

// 配置层 - 安装配置
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{
    BonitaConfiguration, ConfigurationType, FullBonitaConfiguration, NON_TENANT_RESOURCE,
};
pub use repository::{ConfigurationRepository, RepositoryError};
pub use service::{ConfigurationService, PlatformError, PlatformResult, VersionService};
pub use config::SetupConfig;
pub use setup::{PlatformSetup, ScriptExecutor};

// ==========================================
// 常量定义
// ==========================================

// 安装工具版本（写入 platform.version）
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
