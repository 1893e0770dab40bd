// ==========================================
// 平台安装编排集成测试
// ==========================================
// 测试目标: init / push / pull / clean / destroy 全流程
// ==========================================

mod test_helpers;

use platform_setup::{BonitaConfiguration, PlatformError, PlatformSetup, SetupConfig};
use std::path::Path;
use tempfile::TempDir;
use test_helpers::{create_empty_test_db, snapshot, write_file};

fn setup_in(folder: &Path) -> (tempfile::NamedTempFile, PlatformSetup) {
    let (db_file, conn) = create_empty_test_db().unwrap();
    let config = SetupConfig {
        db_path: db_file.path().to_string_lossy().to_string(),
        setup_folder: Some(folder.to_path_buf()),
        busy_timeout_ms: 1_000,
    };
    (db_file, PlatformSetup::with_connection(config, conn))
}

// ==========================================
// init
// ==========================================

#[test]
fn test_init_imports_initial_folder() {
    platform_setup::logging::init_test();
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "platform_conf/initial/platform_engine/a.properties", b"k=v");
    write_file(dir.path(), "platform_conf/initial/tenants/1/tenant_engine/t.xml", b"<t/>");
    let (_db, setup) = setup_in(dir.path());

    assert!(!setup.is_platform_already_created());
    setup.init().unwrap();
    assert!(setup.is_platform_already_created());

    let service = setup.configuration_service();
    assert_eq!(
        service.get_platform_engine_conf().unwrap(),
        vec![BonitaConfiguration::new("a.properties", b"k=v".to_vec())]
    );
    assert_eq!(service.get_tenant_engine_conf(1).unwrap().len(), 1);
}

#[test]
fn test_init_twice_creates_platform_once() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "platform_conf/initial/platform_engine/a.properties", b"k=v");
    let (_db, setup) = setup_in(dir.path());

    setup.init().unwrap();
    // 第二次 init 不得覆盖已修改的配置
    setup
        .configuration_service()
        .store_platform_engine_conf(&[BonitaConfiguration::new("changed", b"c".to_vec())])
        .unwrap();
    setup.init().unwrap();

    assert_eq!(
        setup.configuration_service().get_platform_engine_conf().unwrap(),
        vec![BonitaConfiguration::new("changed", b"c".to_vec())]
    );
}

#[test]
fn test_init_without_initial_folder() {
    let dir = TempDir::new().unwrap();
    let (_db, setup) = setup_in(dir.path());

    setup.init().unwrap();

    assert!(setup.is_platform_already_created());
    assert!(setup
        .configuration_service()
        .repository()
        .get_all()
        .unwrap()
        .is_empty());
}

#[test]
fn test_platform_version_after_init() {
    let dir = TempDir::new().unwrap();
    let (_db, setup) = setup_in(dir.path());

    assert!(matches!(
        setup.version_service().get_platform_version(),
        Err(PlatformError::PlatformNotCreated)
    ));

    setup.init().unwrap();

    assert_eq!(
        setup.version_service().get_platform_version().unwrap(),
        platform_setup::VERSION
    );
    assert!(setup.version_service().is_valid_platform_version().unwrap());
}

#[test]
fn test_init_with_sql_folder_missing_script() {
    let dir = TempDir::new().unwrap();
    write_file(
        dir.path(),
        "platform_conf/sql/sqlite/createTables.sql",
        b"CREATE TABLE configuration (tenant_id INTEGER);",
    );
    let (_db, setup) = setup_in(dir.path());

    assert!(matches!(setup.init(), Err(PlatformError::ScriptNotFound(_))));
}

// ==========================================
// push / pull
// ==========================================

#[test]
fn test_push_before_init_fails() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "platform_conf/current/platform_engine/a.properties", b"a");
    let (_db, setup) = setup_in(dir.path());

    assert!(matches!(setup.push(), Err(PlatformError::PlatformNotCreated)));
}

#[test]
fn test_push_replaces_previous_configuration() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "platform_conf/initial/platform_engine/old.properties", b"old");
    write_file(dir.path(), "platform_conf/initial/tenants/3/tenant_portal/p.xml", b"p");
    write_file(dir.path(), "platform_conf/current/platform_engine/new.properties", b"new");
    let (_db, setup) = setup_in(dir.path());

    setup.init().unwrap();
    setup.push().unwrap();

    let service = setup.configuration_service();
    assert_eq!(
        service.get_platform_engine_conf().unwrap(),
        vec![BonitaConfiguration::new("new.properties", b"new".to_vec())]
    );
    assert!(service.get_tenant_portal_conf(3).unwrap().is_empty());
}

#[test]
fn test_push_then_pull_restores_folder() {
    let dir = TempDir::new().unwrap();
    let current = dir.path().join("platform_conf/current");
    write_file(&current, "platform_portal/cache.xml", b"<c/>");
    write_file(&current, "licenses/x.lic", &[0u8, 1, 2, 255]);
    write_file(&current, "tenants/9/tenant_security_scripts/R.groovy", b"r");
    let (_db, setup) = setup_in(dir.path());

    setup.init().unwrap();
    setup.push().unwrap();
    let pushed = snapshot(&current);

    // 目录中残留的文件在 pull 后应消失
    write_file(&current, "platform_engine/leftover.properties", b"x");
    setup.pull().unwrap();

    assert_eq!(snapshot(&current), pushed);
}

#[test]
fn test_clean_then_pull_gives_empty_folder() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "platform_conf/initial/platform_engine/a.properties", b"a");
    let (_db, setup) = setup_in(dir.path());

    setup.init().unwrap();
    setup.clean().unwrap();

    let target = dir.path().join("export");
    setup.pull_to(&target).unwrap();

    assert!(target.is_dir());
    assert!(snapshot(&target).is_empty());
}

#[test]
fn test_push_without_setup_folder() {
    let (db_file, conn) = create_empty_test_db().unwrap();
    let config = SetupConfig {
        db_path: db_file.path().to_string_lossy().to_string(),
        setup_folder: None,
        busy_timeout_ms: 1_000,
    };
    let setup = PlatformSetup::with_connection(config, conn);

    setup.init().unwrap();
    assert!(matches!(setup.push(), Err(PlatformError::Config(_))));
}

// ==========================================
// destroy
// ==========================================

#[test]
fn test_destroy_then_init_again() {
    let dir = TempDir::new().unwrap();
    let (_db, setup) = setup_in(dir.path());

    setup.init().unwrap();
    setup.destroy().unwrap();
    assert!(!setup.is_platform_already_created());

    setup.init().unwrap();
    assert!(setup.is_platform_already_created());
}
