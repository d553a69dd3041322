//! 监控配置
//!
//! 配置文件路径：
//! - Linux: `~/.config/motor-power/config.toml`
//! - macOS: `~/Library/Application Support/motor-power/config.toml`
//! - Windows: `%APPDATA%\motor-power\config.toml`
//!
//! 文件中缺省的字段使用默认值，命令行参数优先于文件。

use anyhow::{Context, Result};
use motor_power_driver::PumpConfig;
use motor_power_protocol::DEFAULT_MARKER;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 默认发布主题
pub const DEFAULT_TOPIC: &str = "/motor_power";

/// 默认发布后暂停（毫秒）
pub const DEFAULT_THROTTLE_MS: u64 = 10;

/// 监控配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonitorConfig {
    /// 采集命令（argv，不经过 shell）
    pub command: Vec<String>,

    /// 预过滤标记
    pub marker: String,

    /// 每次发布后暂停（毫秒），0 表示不暂停
    pub throttle_ms: u64,

    /// 输出中的主题名
    pub topic: String,

    /// 发布队列长度
    pub queue_size: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            command: vec!["candump".to_string(), "can0".to_string()],
            marker: DEFAULT_MARKER.to_string(),
            throttle_ms: DEFAULT_THROTTLE_MS,
            topic: DEFAULT_TOPIC.to_string(),
            queue_size: motor_power_driver::sink::DEFAULT_QUEUE_SIZE,
        }
    }
}

/// 默认配置文件路径
pub fn default_config_path() -> Option<PathBuf> {
    let mut path = dirs::config_dir()?;
    path.push("motor-power");
    path.push("config.toml");
    Some(path)
}

impl MonitorConfig {
    /// 加载配置
    ///
    /// - 指定了 `path`：文件必须存在
    /// - 未指定：默认路径存在则读取，否则使用默认配置
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::load_from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// 从文件加载配置
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("解析配置文件失败: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件（自动创建父目录）
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).context("创建配置目录失败")?;
        }

        let content = format!(
            "# Motor Power Monitor Configuration\n\n{}",
            toml::to_string_pretty(self).context("序列化配置失败")?
        );
        fs::write(path, content).context("写入配置文件失败")?;
        Ok(())
    }

    /// 检查配置
    pub fn validate(&self) -> Result<()> {
        if self.command.is_empty() {
            anyhow::bail!("采集命令不能为空");
        }
        if self.queue_size == 0 {
            anyhow::bail!("发布队列长度必须大于 0");
        }
        Ok(())
    }

    /// Pump 配置
    pub fn pump_config(&self) -> PumpConfig {
        PumpConfig {
            marker: self.marker.clone(),
            throttle: (self.throttle_ms > 0).then(|| Duration::from_millis(self.throttle_ms)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MonitorConfig::default();
        assert_eq!(config.command, vec!["candump", "can0"]);
        assert_eq!(config.marker, "9A");
        assert_eq!(config.throttle_ms, 10);
        assert_eq!(config.topic, "/motor_power");
        assert_eq!(config.queue_size, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_pump_config_throttle() {
        let config = MonitorConfig::default();
        assert_eq!(
            config.pump_config().throttle,
            Some(Duration::from_millis(10))
        );

        let config = MonitorConfig {
            throttle_ms: 0,
            ..MonitorConfig::default()
        };
        assert_eq!(config.pump_config().throttle, None);
        assert_eq!(config.pump_config().marker, "9A");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "marker = \"7B\"\ncommand = [\"candump\", \"can1\"]\n").unwrap();

        let config = MonitorConfig::load(Some(&path)).unwrap();
        assert_eq!(config.marker, "7B");
        assert_eq!(config.command, vec!["candump", "can1"]);
        assert_eq!(config.throttle_ms, DEFAULT_THROTTLE_MS);
        assert_eq!(config.topic, DEFAULT_TOPIC);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = MonitorConfig {
            topic: "/bench/motor_power".to_string(),
            throttle_ms: 0,
            ..MonitorConfig::default()
        };

        config.save(&path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# Motor Power Monitor Configuration"));

        assert_eq!(MonitorConfig::load(Some(&path)).unwrap(), config);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(MonitorConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn test_invalid_files_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        fs::write(&path, "marker = ").unwrap();
        assert!(MonitorConfig::load_from_file(&path).is_err());

        fs::write(&path, "unknown_key = 1\n").unwrap();
        assert!(MonitorConfig::load_from_file(&path).is_err());

        fs::write(&path, "command = []\n").unwrap();
        assert!(MonitorConfig::load_from_file(&path).is_err());

        fs::write(&path, "queue_size = 0\n").unwrap();
        assert!(MonitorConfig::load_from_file(&path).is_err());
    }
}
