// ==========================================
// 平台配置引擎 - SQL 脚本执行器
// ==========================================
// 职责: 建表/初始化/删表，以及平台行写入
// 脚本来源: 配置了 sql 目录时从目录读取，否则使用内置脚本
// ==========================================

use crate::db::SharedConnection;
use crate::repository::{ConfigurationRepository, PlatformEntity, PlatformRepository};
use crate::service::error::{PlatformError, PlatformResult};
use chrono::Utc;
use std::path::PathBuf;

pub const CREATE_TABLES_SQL_FILE: &str = "createTables.sql";
pub const INIT_TABLES_SQL_FILE: &str = "initTables.sql";
pub const DROP_TABLES_SQL_FILE: &str = "dropTables.sql";

const EMBEDDED_SCRIPTS: [(&str, &str); 3] = [
    (CREATE_TABLES_SQL_FILE, include_str!("../../sql/sqlite/createTables.sql")),
    (INIT_TABLES_SQL_FILE, include_str!("../../sql/sqlite/initTables.sql")),
    (DROP_TABLES_SQL_FILE, include_str!("../../sql/sqlite/dropTables.sql")),
];

/// 遇错是否继续执行后续语句
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnError {
    Continue,
    Fail,
}

pub struct ScriptExecutor {
    conn: SharedConnection,
    sql_folder: Option<PathBuf>,
}

impl ScriptExecutor {
    /// # 参数
    /// - sql_folder: 覆盖内置脚本的目录（`<setup>/platform_conf/sql/sqlite`）
    pub fn new(conn: SharedConnection, sql_folder: Option<PathBuf>) -> Self {
        tracing::info!(
            vendor = crate::config::setup_config::DB_VENDOR,
            sql_folder = ?sql_folder,
            "数据库脚本配置"
        );
        Self { conn, sql_folder }
    }

    /// 删表（忽略失败）后重新建表
    pub fn create_tables(&self) -> PlatformResult<()> {
        self.execute_sql_resource(DROP_TABLES_SQL_FILE, OnError::Continue)?;
        self.execute_sql_resource(CREATE_TABLES_SQL_FILE, OnError::Fail)
    }

    pub fn initialize_platform_structure(&self) -> PlatformResult<()> {
        self.execute_sql_resource(INIT_TABLES_SQL_FILE, OnError::Fail)
    }

    /// 写入平台行（id=1）
    pub fn insert_platform(&self, version: &str) -> PlatformResult<()> {
        let platform = PlatformEntity::new_installation(version, Utc::now());
        PlatformRepository::new(self.conn.clone()).insert(&platform)?;
        Ok(())
    }

    /// 平台是否已创建（存在探针，表不存在视为未创建）
    pub fn is_platform_already_created(&self) -> bool {
        ConfigurationRepository::new(self.conn.clone()).exists()
    }

    /// 未创建时建表 + 初始化 + 写平台行
    ///
    /// # 返回
    /// - Ok(true): 本次完成了创建
    /// - Ok(false): 平台已存在，什么都没做
    pub fn create_and_initialize_platform_if_necessary(&self) -> PlatformResult<bool> {
        if self.is_platform_already_created() {
            tracing::info!("Platform is already created. Nothing to do.");
            return Ok(false);
        }

        self.create_tables()?;
        self.initialize_platform_structure()?;
        self.insert_platform(crate::VERSION)?;
        tracing::info!(version = crate::VERSION, "Platform created.");
        Ok(true)
    }

    /// 删表（忽略失败）
    pub fn delete_tables(&self) -> PlatformResult<()> {
        self.execute_sql_resource(DROP_TABLES_SQL_FILE, OnError::Continue)
    }

    /// 读取脚本内容
    ///
    /// 配置了 sql 目录但文件不存在时报错，不回退到内置脚本。
    fn load_script(&self, file: &str) -> PlatformResult<String> {
        if let Some(folder) = &self.sql_folder {
            let path = folder.join(file);
            if !path.is_file() {
                tracing::error!(path = %path.display(), "SQL 脚本不存在");
                return Err(PlatformError::ScriptNotFound(path));
            }
            return std::fs::read_to_string(&path).map_err(|e| PlatformError::io(&path, e));
        }

        EMBEDDED_SCRIPTS
            .iter()
            .find(|(name, _)| *name == file)
            .map(|(_, sql)| sql.to_string())
            .ok_or_else(|| PlatformError::ScriptNotFound(PathBuf::from(file)))
    }

    fn execute_sql_resource(&self, file: &str, on_error: OnError) -> PlatformResult<()> {
        let script = self.load_script(file)?;
        let conn = self
            .conn
            .lock()
            .map_err(|e| crate::repository::RepositoryError::LockError(e.to_string()))?;

        match on_error {
            // 整个脚本交给 SQLite 解析，字符串内的 `;` 与行尾注释都安全
            OnError::Fail => conn.execute_batch(&script).map_err(|e| {
                tracing::error!(file, error = %e, "脚本执行失败");
                PlatformError::from(e)
            })?,
            OnError::Continue => {
                for statement in split_statements(&script) {
                    if let Err(e) = conn.execute_batch(&statement) {
                        tracing::debug!(file, error = %e, "语句执行失败，继续");
                    }
                }
            }
        }

        tracing::debug!(file, "SQL 脚本执行完成");
        Ok(())
    }
}

/// 按 `;` 切分语句，去掉整行 `--` 注释与空语句
///
/// 只用于逐条容错执行的删表脚本: 不识别字符串字面量里的 `;`，也不处理行尾注释。
fn split_statements(script: &str) -> Vec<String> {
    let without_comments: String = script
        .lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n");

    without_comments
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("{};", s))
        .collect()
}
