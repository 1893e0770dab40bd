// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库初始化、配置目录构建、目录快照
// ==========================================

#![allow(dead_code)]

use platform_setup::db::{open_shared_connection, SharedConnection};
use platform_setup::ScriptExecutor;
use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - SharedConnection: 已建表的共享连接
pub fn create_test_db() -> Result<(NamedTempFile, SharedConnection), Box<dyn Error>> {
    let (temp_file, conn) = create_empty_test_db()?;
    ScriptExecutor::new(conn.clone(), None).create_tables()?;
    Ok((temp_file, conn))
}

/// 创建未建表的临时数据库
pub fn create_empty_test_db() -> Result<(NamedTempFile, SharedConnection), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().ok_or("非 UTF-8 路径")?.to_string();
    let conn = open_shared_connection(&db_path, 1_000)?;
    Ok((temp_file, conn))
}

/// 在 root 下写入文件（自动创建父目录）
pub fn write_file(root: &Path, relative: &str, content: &[u8]) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

/// 目录快照: 相对路径（`/` 分隔）→ 文件内容
pub fn snapshot(root: &Path) -> BTreeMap<String, Vec<u8>> {
    let mut out = BTreeMap::new();
    collect(root, root, &mut out);
    out
}

fn collect(root: &Path, dir: &Path, out: &mut BTreeMap<String, Vec<u8>>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect(root, &path, out);
        } else {
            let relative = path
                .strip_prefix(root)
                .unwrap()
                .components()
                .map(|c| c.as_os_str().to_string_lossy().to_string())
                .collect::<Vec<_>>()
                .join("/");
            out.insert(relative, fs::read(&path).unwrap());
        }
    }
}
