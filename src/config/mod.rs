// ==========================================
// 平台配置引擎 - 配置层
// ==========================================
// 职责: 安装配置（数据库路径、安装目录、连接参数）
// 来源: JSON 配置文件 + 环境变量
// ==========================================

pub mod setup_config;

pub use setup_config::{get_default_db_path, SetupConfig};
