// ==========================================
// 平台配置引擎 - 目录导入层
// ==========================================
// 职责: 配置目录树 → 配置资源列表
// 结构: 一个遍历器 + 三种分类策略（全量 / 单一类型 / 许可证）
// ==========================================

pub mod classifier;
pub mod error;
pub mod resource_walker;

pub use classifier::{
    AllConfigurationClassifier, LicensesClassifier, ResourceClassifier, SingleTypeClassifier,
};
pub use error::{ImportError, ImportResult};
pub use resource_walker::{walk, walk_configurations};
