//! 配置管理命令
//!
//! 查看、初始化监控配置文件

use crate::config::{MonitorConfig, default_config_path};
use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::{Path, PathBuf};

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 显示生效的配置
    Show,

    /// 写入默认配置文件
    Init {
        /// 覆盖已有文件
        #[arg(short, long)]
        force: bool,
    },

    /// 显示配置文件路径
    Path,
}

impl ConfigCommand {
    pub fn execute(self, config_path: Option<&Path>) -> Result<()> {
        match self {
            ConfigCommand::Show => Self::show_(config_path),

            ConfigCommand::Init { force } => Self::init_(config_path, force),

            ConfigCommand::Path => {
                println!("{}", Self::resolve_path(config_path)?.display());
                Ok(())
            },
        }
    }

    fn resolve_path(config_path: Option<&Path>) -> Result<PathBuf> {
        match config_path {
            Some(path) => Ok(path.to_path_buf()),
            None => default_config_path().context("无法确定配置目录"),
        }
    }

    fn show_(config_path: Option<&Path>) -> Result<()> {
        let config = MonitorConfig::load(config_path)?;
        let content = toml::to_string_pretty(&config).context("序列化配置失败")?;
        print!("{}", content);
        Ok(())
    }

    fn init_(config_path: Option<&Path>, force: bool) -> Result<()> {
        let path = Self::resolve_path(config_path)?;
        if path.exists() && !force {
            anyhow::bail!("配置文件已存在: {}（使用 --force 覆盖）", path.display());
        }

        MonitorConfig::default().save(&path)?;
        println!("✅ 已写入默认配置: {}", path.display());
        Ok(())
    }
}
