// ==========================================
// 平台配置引擎 - 安装配置
// ==========================================
// 来源优先级: JSON 配置文件 < 环境变量
// 目录布局 (setup_folder 下):
//   platform_conf/initial     初次 init 时导入
//   platform_conf/current     push / pull 的工作目录
//   platform_conf/sql/sqlite  覆盖内置 SQL 脚本
// ==========================================

use crate::db::{open_shared_connection, SharedConnection, DEFAULT_BUSY_TIMEOUT_MS};
use crate::service::error::{PlatformError, PlatformResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DB_PATH_ENV: &str = "PLATFORM_SETUP_DB_PATH";
pub const SETUP_FOLDER_ENV: &str = "PLATFORM_SETUP_FOLDER";
pub const BUSY_TIMEOUT_ENV: &str = "PLATFORM_SETUP_BUSY_TIMEOUT_MS";

pub const PLATFORM_CONF_FOLDER_NAME: &str = "platform_conf";
pub const INITIAL_FOLDER_NAME: &str = "initial";
pub const CURRENT_FOLDER_NAME: &str = "current";
pub const SQL_FOLDER_NAME: &str = "sql";
pub const DB_VENDOR: &str = "sqlite";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetupConfig {
    /// SQLite 数据库文件路径
    pub db_path: String,
    /// 安装目录；None 时不导入初始配置、只使用内置 SQL 脚本
    pub setup_folder: Option<PathBuf>,
    pub busy_timeout_ms: u64,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            db_path: get_default_db_path(),
            setup_folder: None,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl SetupConfig {
    /// 从 JSON 文件加载（缺省字段取默认值），再叠加环境变量
    pub fn load(path: &Path) -> PlatformResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| PlatformError::io(path, e))?;
        let config: SetupConfig = serde_json::from_str(&raw)
            .map_err(|e| PlatformError::Config(format!("{}: {}", path.display(), e)))?;
        config.with_env_overrides()
    }

    /// 默认值 + 环境变量
    pub fn from_env() -> PlatformResult<Self> {
        SetupConfig::default().with_env_overrides()
    }

    fn with_env_overrides(mut self) -> PlatformResult<Self> {
        if let Some(v) = non_empty_env(DB_PATH_ENV) {
            self.db_path = v;
        }
        if let Some(v) = non_empty_env(SETUP_FOLDER_ENV) {
            self.setup_folder = Some(PathBuf::from(v));
        }
        if let Some(v) = non_empty_env(BUSY_TIMEOUT_ENV) {
            self.busy_timeout_ms = v.parse().map_err(|_| {
                PlatformError::Config(format!("{} 不是合法的毫秒数: {}", BUSY_TIMEOUT_ENV, v))
            })?;
        }
        Ok(self)
    }

    /// `<setup>/platform_conf`
    pub fn platform_conf_folder(&self) -> Option<PathBuf> {
        self.setup_folder
            .as_ref()
            .map(|f| f.join(PLATFORM_CONF_FOLDER_NAME))
    }

    /// `<setup>/platform_conf/initial`
    pub fn initial_folder(&self) -> Option<PathBuf> {
        self.platform_conf_folder().map(|f| f.join(INITIAL_FOLDER_NAME))
    }

    /// `<setup>/platform_conf/current`
    pub fn current_folder(&self) -> Option<PathBuf> {
        self.platform_conf_folder().map(|f| f.join(CURRENT_FOLDER_NAME))
    }

    /// `<setup>/platform_conf/sql/sqlite`
    pub fn sql_folder(&self) -> Option<PathBuf> {
        self.platform_conf_folder()
            .map(|f| f.join(SQL_FOLDER_NAME).join(DB_VENDOR))
    }

    /// 打开数据库连接（数据库文件所在目录不存在时先创建）
    pub fn open_connection(&self) -> PlatformResult<SharedConnection> {
        if let Some(parent) = Path::new(&self.db_path)
            .parent()
            .filter(|p| !p.as_os_str().is_empty() && !p.exists())
        {
            std::fs::create_dir_all(parent).map_err(|e| PlatformError::io(parent, e))?;
        }
        tracing::info!(db_path = %self.db_path, "打开数据库");
        Ok(open_shared_connection(&self.db_path, self.busy_timeout_ms)?)
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 默认数据库路径（只计算，不创建目录）
///
/// `PLATFORM_SETUP_DB_PATH` 优先；否则使用用户数据目录，拿不到时回退到当前目录。
pub fn get_default_db_path() -> String {
    if let Some(path) = non_empty_env(DB_PATH_ENV) {
        return path;
    }

    dirs::data_dir()
        .map(|dir| dir.join("platform-setup").join("platform.db"))
        .unwrap_or_else(|| PathBuf::from("./platform.db"))
        .to_string_lossy()
        .to_string()
}
