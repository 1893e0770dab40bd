// ==========================================
// 平台配置引擎 - 服务层错误类型
// ==========================================
// 职责: 汇总仓储/导入/文件系统错误为平台级错误，保留足够上下文
//       （出错路径、租户ID、底层存储错误）
// ==========================================

use crate::domain::ConfigurationType;
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use std::path::PathBuf;
use thiserror::Error;

/// 平台级错误类型
#[derive(Error, Debug)]
pub enum PlatformError {
    // ==========================================
    // 参数错误（本地校验，不触达存储）
    // ==========================================
    #[error("tenantId value {0} is not allowed: 租户ID必须大于 0")]
    InvalidTenantId(i64),

    // ==========================================
    // 初始化状态错误
    // ==========================================
    #[error("Platform is not created. Run platform setup before pushing configuration.")]
    PlatformNotCreated,

    #[error("平台版本不一致: installed={installed}, expected={expected}")]
    VersionMismatch { installed: String, expected: String },

    // ==========================================
    // 文件系统错误
    // ==========================================
    #[error("配置目录导入失败: {0}")]
    Import(#[from] ImportError),

    #[error("文件写入失败 ({}): {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("资源名会写出导出目录之外: {resource_name:?} ({content_type}, tenant_id={tenant_id})")]
    UnsafeResourceName {
        resource_name: String,
        content_type: ConfigurationType,
        tenant_id: i64,
    },

    #[error("SQL 脚本不存在: {}", .0.display())]
    ScriptNotFound(PathBuf),

    // ==========================================
    // 存储错误
    // ==========================================
    #[error("存储失败: {0}")]
    Repository(#[from] RepositoryError),

    // ==========================================
    // 配置错误
    // ==========================================
    #[error("配置错误: {0}")]
    Config(String),
}

impl PlatformError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PlatformError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<rusqlite::Error> for PlatformError {
    fn from(err: rusqlite::Error) -> Self {
        PlatformError::from(RepositoryError::from(err))
    }
}

/// Result 类型别名
pub type PlatformResult<T> = Result<T, PlatformError>;
