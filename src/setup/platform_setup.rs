// ==========================================
// 平台配置引擎 - 平台安装编排
// ==========================================
// init:    未创建则建表/初始化/写平台行，并导入 platform_conf/initial
// push:    用 platform_conf/current 全量替换存储中的配置
// pull:    清空 platform_conf/current 后导出全部配置
// clean:   删除全部配置
// destroy: 删表
// ==========================================

use crate::config::SetupConfig;
use crate::db::SharedConnection;
use crate::service::error::{PlatformError, PlatformResult};
use crate::service::{ConfigurationService, VersionService};
use crate::setup::script_executor::ScriptExecutor;
use std::fs;
use std::path::{Path, PathBuf};

pub struct PlatformSetup {
    config: SetupConfig,
    script_executor: ScriptExecutor,
    configuration_service: ConfigurationService,
    version_service: VersionService,
}

impl PlatformSetup {
    /// 按配置打开数据库并装配各组件
    pub fn new(config: SetupConfig) -> PlatformResult<Self> {
        let conn = config.open_connection()?;
        Ok(Self::with_connection(config, conn))
    }

    /// 使用已有连接装配（测试/嵌入场景）
    ///
    /// `platform_conf/sql/sqlite` 目录存在时才覆盖内置脚本。
    pub fn with_connection(config: SetupConfig, conn: SharedConnection) -> Self {
        let sql_folder = config.sql_folder().filter(|folder| folder.is_dir());
        Self {
            script_executor: ScriptExecutor::new(conn.clone(), sql_folder),
            configuration_service: ConfigurationService::from_connection(conn.clone()),
            version_service: VersionService::new(conn),
            config,
        }
    }

    pub fn configuration_service(&self) -> &ConfigurationService {
        &self.configuration_service
    }

    pub fn version_service(&self) -> &VersionService {
        &self.version_service
    }

    pub fn is_platform_already_created(&self) -> bool {
        self.script_executor.is_platform_already_created()
    }

    /// 初始化平台（幂等）
    pub fn init(&self) -> PlatformResult<()> {
        if !self.script_executor.create_and_initialize_platform_if_necessary()? {
            return Ok(());
        }

        match self.config.initial_folder() {
            Some(initial) if initial.is_dir() => {
                let count = self.configuration_service.store_all_configuration(&initial)?;
                tracing::info!(
                    folder = %initial.display(),
                    count,
                    "Initial configuration successfully pushed to database"
                );
            }
            Some(initial) => {
                tracing::warn!(folder = %initial.display(), "初始配置目录不存在，跳过导入");
            }
            None => {
                tracing::info!("未配置安装目录，跳过初始配置导入");
            }
        }
        Ok(())
    }

    /// 推送 platform_conf/current 到存储（全量替换）
    pub fn push(&self) -> PlatformResult<()> {
        let current = self.require_current_folder()?;
        self.check_platform_version()?;

        let count = self.configuration_service.store_all_configuration(&current)?;
        tracing::info!(
            folder = %current.display(),
            count,
            "Configuration files successfully pushed to database"
        );
        Ok(())
    }

    /// 导出到 platform_conf/current
    pub fn pull(&self) -> PlatformResult<()> {
        let current = self.require_current_folder()?;
        self.pull_to(&current)
    }

    /// 导出到指定目录（先清空目录）
    pub fn pull_to(&self, folder: &Path) -> PlatformResult<()> {
        self.check_platform_version()?;

        if folder.exists() {
            fs::remove_dir_all(folder).map_err(|e| PlatformError::io(folder, e))?;
        }
        fs::create_dir_all(folder).map_err(|e| PlatformError::io(folder, e))?;

        let count = self
            .configuration_service
            .write_all_configuration_to_folder(folder)?;
        tracing::info!(
            folder = %folder.display(),
            count,
            "Configuration files successfully pulled from database"
        );
        Ok(())
    }

    /// 删除存储中的全部配置
    pub fn clean(&self) -> PlatformResult<()> {
        self.configuration_service.delete_all_configuration()?;
        tracing::info!("Execution of clean successful. All configuration deleted.");
        Ok(())
    }

    /// 删表
    pub fn destroy(&self) -> PlatformResult<()> {
        self.script_executor.delete_tables()?;
        tracing::info!("Platform tables dropped.");
        Ok(())
    }

    fn require_current_folder(&self) -> PlatformResult<PathBuf> {
        self.config
            .current_folder()
            .ok_or_else(|| PlatformError::Config("未配置安装目录 (setup_folder)".to_string()))
    }

    /// 平台必须已创建且版本与工具一致
    fn check_platform_version(&self) -> PlatformResult<()> {
        let installed = self.version_service.get_platform_version()?;
        let expected = self.version_service.get_platform_setup_version();
        if installed != expected {
            return Err(PlatformError::VersionMismatch {
                installed,
                expected: expected.to_string(),
            });
        }
        Ok(())
    }
}
