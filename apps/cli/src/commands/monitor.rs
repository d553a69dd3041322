//! 监控命令
//!
//! 启动采集进程，实时发布电机功率读数

use crate::config::MonitorConfig;
use crate::output::JsonLinesSink;
use crate::utils::{install_stop_flag, report_exit};
use anyhow::{Context, Result};
use clap::Args;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use motor_power_driver::{
    ChannelSink, KillHandle, ProcessSource, PumpMetrics, ReadingSink, pump_loop,
};
use motor_power_protocol::MotorPowerReading;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use tracing::info;

/// 等待读数时检查运行标志的间隔
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// 监控命令参数
#[derive(Args, Debug, Default)]
pub struct MonitorCommand {
    /// 采集命令（覆盖配置），如 "candump can0"
    ///
    /// 按 shell 引号规则切分参数，但不经过 shell 执行。
    #[arg(long)]
    pub command: Option<String>,

    /// 预过滤标记（覆盖配置）
    #[arg(short, long)]
    pub marker: Option<String>,

    /// 每次发布后暂停（毫秒，覆盖配置）
    #[arg(short, long)]
    pub throttle_ms: Option<u64>,

    /// 输出主题名（覆盖配置）
    #[arg(long)]
    pub topic: Option<String>,
}

impl MonitorCommand {
    /// 将命令行参数合并到配置
    pub fn apply(&self, config: &mut MonitorConfig) -> Result<()> {
        if let Some(ref command) = self.command {
            config.command = shlex::split(command)
                .with_context(|| format!("采集命令引号不匹配: {}", command))?;
        }
        if let Some(ref marker) = self.marker {
            config.marker = marker.clone();
        }
        if let Some(throttle_ms) = self.throttle_ms {
            config.throttle_ms = throttle_ms;
        }
        if let Some(ref topic) = self.topic {
            config.topic = topic.clone();
        }
        Ok(())
    }

    /// 执行监控
    ///
    /// Pump 运行在独立线程，主线程从有界通道取出读数写到 stdout。
    /// 采集进程退出或 Ctrl-C 后结束。
    pub fn execute(&self, config_path: Option<&Path>) -> Result<()> {
        let mut config = MonitorConfig::load(config_path)?;
        self.apply(&mut config)?;
        config.validate()?;

        let is_running = install_stop_flag()?;
        let source = ProcessSource::spawn(config.command.as_slice())?;
        let kill_handle = source.kill_handle();
        let (sink, rx) = ChannelSink::bounded(config.queue_size);
        let metrics = Arc::new(PumpMetrics::new());
        let pump_config = config.pump_config();

        let pump = {
            let metrics = metrics.clone();
            let is_running = is_running.clone();
            thread::Builder::new()
                .name("motor-power-pump".to_string())
                .spawn(move || {
                    pump_loop(
                        source,
                        sink,
                        &pump_config,
                        || !is_running.load(Ordering::Acquire),
                        &metrics,
                    )
                })
                .context("启动 Pump 线程失败")?
        };

        info!("Publishing motor power on {}", config.topic);

        let mut out = JsonLinesSink::new(io::stdout().lock(), config.topic.as_str());
        forward_readings(&rx, &mut out, &is_running, &kill_handle);
        out.log_summary();

        let exit = pump
            .join()
            .map_err(|_| anyhow::anyhow!("Pump 线程 panic"))?;
        report_exit(exit, metrics.snapshot())
    }
}

/// 把通道中的读数写到输出，直到 Pump 线程释放 Sender
///
/// 运行标志清除后终止采集进程，阻塞中的读取随之返回。
fn forward_readings<W: Write>(
    rx: &Receiver<MotorPowerReading>,
    out: &mut JsonLinesSink<W>,
    is_running: &AtomicBool,
    kill_handle: &KillHandle,
) {
    let mut killed = false;
    loop {
        match rx.recv_timeout(STOP_POLL_INTERVAL) {
            Ok(reading) => {
                out.publish(reading);
            },
            Err(RecvTimeoutError::Timeout) => {},
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if !killed && !is_running.load(Ordering::Acquire) {
            info!("Stop requested, terminating capture process");
            kill_handle.kill();
            killed = true;
        }
    }
}
