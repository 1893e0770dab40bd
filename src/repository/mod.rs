// ==========================================
// 平台配置引擎 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化；每个写操作恰好一个事务
// ==========================================

pub mod configuration_repo;
pub mod error;
pub mod platform_repo;

// 重导出核心仓储
pub use configuration_repo::ConfigurationRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use platform_repo::{PlatformEntity, PlatformRepository, PLATFORM_CREATED_BY, PLATFORM_ID};
