// ==========================================
// 平台配置引擎 - 配置目录遍历器
// ==========================================
// 职责: 递归遍历根目录，按分类策略把每个普通文件映射为配置资源
// 约束:
// - 目录只下钻不产出；分类策略不认识的路径忽略
// - 任一文件系统错误终止整次遍历（不返回部分结果）
// - 符号链接跟随；链接循环视为错误
// ==========================================

use crate::domain::{is_safe_resource_name, BonitaConfiguration, FullBonitaConfiguration};
use crate::importer::classifier::ResourceClassifier;
use crate::importer::error::{ImportError, ImportResult};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// 遍历 `root`，返回分类后的全部资源
///
/// 同一目录内按文件名排序，便于日志与测试复现；调用方不得依赖该顺序。
pub fn walk<C>(root: &Path, classifier: &C) -> ImportResult<Vec<FullBonitaConfiguration>>
where
    C: ResourceClassifier + ?Sized,
{
    if !root.exists() {
        return Err(ImportError::RootNotFound(root.to_path_buf()));
    }

    let mut walker = Walker {
        root,
        classifier,
        visited: HashSet::new(),
        resources: Vec::new(),
        skipped: 0,
    };
    walker.visit_dir(root)?;

    tracing::debug!(
        root = %root.display(),
        found = walker.resources.len(),
        skipped = walker.skipped,
        "配置目录遍历完成"
    );
    Ok(walker.resources)
}

/// 遍历并丢弃类型/租户信息（用于单分区导入）
pub fn walk_configurations<C>(root: &Path, classifier: &C) -> ImportResult<Vec<BonitaConfiguration>>
where
    C: ResourceClassifier + ?Sized,
{
    Ok(walk(root, classifier)?
        .into_iter()
        .map(FullBonitaConfiguration::into_configuration)
        .collect())
}

struct Walker<'a, C: ?Sized> {
    root: &'a Path,
    classifier: &'a C,
    visited: HashSet<PathBuf>, // 已访问目录的规范路径
    resources: Vec<FullBonitaConfiguration>,
    skipped: usize,
}

impl<C> Walker<'_, C>
where
    C: ResourceClassifier + ?Sized,
{
    fn visit_dir(&mut self, dir: &Path) -> ImportResult<()> {
        let canonical = fs::canonicalize(dir).map_err(|e| ImportError::io(dir, e))?;
        if !self.visited.insert(canonical) {
            return Err(ImportError::SymlinkLoop(dir.to_path_buf()));
        }

        let mut entries = fs::read_dir(dir)
            .map_err(|e| ImportError::io(dir, e))?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ImportError::io(dir, e))?;
        entries.sort();

        for path in entries {
            // fs::metadata 跟随符号链接；断链在此报错
            let metadata = fs::metadata(&path).map_err(|e| ImportError::io(&path, e))?;
            if metadata.is_dir() {
                self.visit_dir(&path)?;
            } else if metadata.is_file() {
                self.visit_file(&path)?;
            }
        }

        // 仅阻止祖先链上的循环；兄弟目录通过链接指向同一目录是允许的
        if let Ok(canonical) = fs::canonicalize(dir) {
            self.visited.remove(&canonical);
        }
        Ok(())
    }

    fn visit_file(&mut self, path: &Path) -> ImportResult<()> {
        let Ok(relative) = path.strip_prefix(self.root) else {
            self.skipped += 1;
            return Ok(());
        };
        let Some(resource_name) = path
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| is_safe_resource_name(n))
        else {
            tracing::warn!(path = %path.display(), "文件名非 UTF-8 或含路径分隔符，忽略");
            self.skipped += 1;
            return Ok(());
        };

        match self.classifier.classify(relative) {
            Some((configuration_type, tenant_id)) => {
                let content = fs::read(path).map_err(|e| ImportError::io(path, e))?;
                tracing::trace!(
                    path = %path.display(),
                    content_type = %configuration_type,
                    tenant_id,
                    "收集配置文件"
                );
                self.resources.push(FullBonitaConfiguration::new(
                    resource_name,
                    content,
                    configuration_type,
                    tenant_id,
                ));
            }
            None => {
                tracing::debug!(path = %relative.display(), "路径不匹配配置布局，忽略");
                self.skipped += 1;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConfigurationType;
    use crate::importer::classifier::{
        AllConfigurationClassifier, LicensesClassifier, SingleTypeClassifier,
    };
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &[u8]) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_walk_all_configuration_layout() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "platform_engine/a.properties", b"k=v");
        write(dir.path(), "tenant_template_portal/b.xml", b"<b/>");
        write(dir.path(), "tenants/5/tenant_portal/x.properties", b"v1");
        write(dir.path(), "tenants/5/unknown/ignored.txt", b"?");
        write(dir.path(), "stray.txt", b"?");

        let mut found = walk(dir.path(), &AllConfigurationClassifier).unwrap();
        found.sort_by(|a, b| a.resource_name.cmp(&b.resource_name));

        assert_eq!(
            found,
            vec![
                FullBonitaConfiguration::new("a.properties", b"k=v".to_vec(), ConfigurationType::PlatformEngine, 0),
                FullBonitaConfiguration::new("b.xml", b"<b/>".to_vec(), ConfigurationType::TenantTemplatePortal, 0),
                FullBonitaConfiguration::new("x.properties", b"v1".to_vec(), ConfigurationType::TenantPortal, 5),
            ]
        );
    }

    #[test]
    fn test_walk_single_type_uses_base_name() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "platform_engine/a.properties", b"k=v");
        write(dir.path(), "nested/deeper/b.properties", b"b");

        let classifier = SingleTypeClassifier::new(ConfigurationType::PlatformEngine, 0);
        let mut found = walk_configurations(dir.path(), &classifier).unwrap();
        found.sort_by(|a, b| a.resource_name.cmp(&b.resource_name));

        assert_eq!(
            found,
            vec![
                BonitaConfiguration::new("a.properties", b"k=v".to_vec()),
                BonitaConfiguration::new("b.properties", b"b".to_vec()),
            ]
        );
    }

    #[test]
    fn test_walk_licenses() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "one.lic", b"1");
        write(dir.path(), "sub/two.lic", b"2");

        let found = walk(dir.path(), &LicensesClassifier).unwrap();
        assert_eq!(found.len(), 2);
        assert!(found
            .iter()
            .all(|r| r.configuration_type == ConfigurationType::Licenses && r.tenant_id == 0));
    }

    #[test]
    fn test_walk_empty_dir() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("platform_engine")).unwrap();
        assert!(walk(dir.path(), &AllConfigurationClassifier).unwrap().is_empty());
    }

    #[test]
    fn test_walk_missing_root_fails() {
        let dir = TempDir::new().unwrap();
        let err = walk(&dir.path().join("missing"), &LicensesClassifier).unwrap_err();
        assert!(matches!(err, ImportError::RootNotFound(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_broken_symlink_fails() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("platform_engine")).unwrap();
        std::os::unix::fs::symlink(
            dir.path().join("nowhere"),
            dir.path().join("platform_engine/broken.properties"),
        )
        .unwrap();

        let err = walk(dir.path(), &AllConfigurationClassifier).unwrap_err();
        assert!(matches!(err, ImportError::Io { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_symlink_loop_fails() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("platform_engine")).unwrap();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("platform_engine/loop")).unwrap();

        let err = walk(dir.path(), &AllConfigurationClassifier).unwrap_err();
        assert!(matches!(err, ImportError::SymlinkLoop(_)));
    }
}
