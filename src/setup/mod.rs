// ==========================================
// 平台配置引擎 - 安装层
// ==========================================
// 职责: 建表/删表脚本执行 + init/push/pull/clean/destroy 编排
// ==========================================

pub mod platform_setup;
pub mod script_executor;

pub use platform_setup::PlatformSetup;
pub use script_executor::ScriptExecutor;
