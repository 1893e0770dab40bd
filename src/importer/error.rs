// ==========================================
// 平台配置引擎 - 目录导入错误类型
// ==========================================
// 工具: thiserror 派生宏
// 约束: 任何文件系统错误都终止整次遍历，不返回部分结果
// ==========================================

use std::path::PathBuf;
use thiserror::Error;

/// 目录导入错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("配置目录不存在: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("文件读取失败 ({}): {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("检测到符号链接循环: {}", .0.display())]
    SymlinkLoop(PathBuf),
}

impl ImportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ImportError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
