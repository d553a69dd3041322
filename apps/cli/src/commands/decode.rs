//! 解码命令
//!
//! 回放 candump 日志（文件或 stdin），输出电机功率读数

use crate::config::MonitorConfig;
use crate::output::JsonLinesSink;
use crate::utils::{install_stop_flag, report_exit};
use anyhow::{Context, Result};
use clap::Args;
use motor_power_driver::{LineSource, PumpMetrics, ReaderSource, ReadingSink, pump_loop};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;

/// 解码命令参数
#[derive(Args, Debug)]
pub struct DecodeCommand {
    /// candump 日志文件，省略或 "-" 表示 stdin
    pub input: Option<PathBuf>,

    /// 预过滤标记（覆盖配置）
    #[arg(short, long)]
    pub marker: Option<String>,

    /// 每次发布后暂停（毫秒），默认不暂停
    #[arg(short, long, default_value_t = 0)]
    pub throttle_ms: u64,

    /// 输出主题名（覆盖配置）
    #[arg(long)]
    pub topic: Option<String>,
}

impl DecodeCommand {
    fn open_source(&self) -> Result<Box<dyn LineSource>> {
        match self.input.as_deref() {
            None => Ok(Box::new(ReaderSource::new(io::stdin().lock()))),
            Some(path) if path == Path::new("-") => {
                Ok(Box::new(ReaderSource::new(io::stdin().lock())))
            },
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("打开日志文件失败: {}", path.display()))?;
                Ok(Box::new(ReaderSource::new(BufReader::new(file))))
            },
        }
    }

    /// 执行解码
    pub fn execute(&self, config_path: Option<&Path>) -> Result<()> {
        let mut config = MonitorConfig::load(config_path)?;
        if let Some(ref marker) = self.marker {
            config.marker = marker.clone();
        }
        if let Some(ref topic) = self.topic {
            config.topic = topic.clone();
        }
        // 回放默认不节流
        config.throttle_ms = self.throttle_ms;

        let is_running = install_stop_flag()?;
        let source = self.open_source()?;
        let metrics = PumpMetrics::new();
        let mut out = JsonLinesSink::new(io::stdout().lock(), config.topic.as_str());

        let exit = pump_loop(
            source,
            out.by_ref(),
            &config.pump_config(),
            || !is_running.load(Ordering::Acquire),
            &metrics,
        );
        out.log_summary();
        report_exit(exit, metrics.snapshot())
    }
}
