//! Pump 循环模块
//!
//! 从行源逐行读取，按标记预过滤，解码后交给 Sink。
//!
//! - 单线程、阻塞读取，严格按到达顺序处理
//! - 每行读取前检查一次停止信号
//! - 行源结束或读取失败即退出，不重试、不退避

use crate::DriverError;
use crate::metrics::PumpMetrics;
use crate::sink::ReadingSink;
use crate::source::LineSource;
use motor_power_protocol::{DEFAULT_MARKER, try_decode};
use std::sync::atomic::Ordering;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// Pump 配置
///
/// # Example
///
/// ```
/// use motor_power_driver::PumpConfig;
/// use std::time::Duration;
///
/// // 默认配置（标记 "9A"，无节流）
/// let config = PumpConfig::default();
///
/// // 每次发布后暂停 10ms
/// let config = PumpConfig {
///     throttle: Some(Duration::from_millis(10)),
///     ..PumpConfig::default()
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PumpConfig {
    /// 预过滤标记：只有包含该子串的行才交给解码器
    ///
    /// 空字符串匹配所有行。
    pub marker: String,
    /// 每次发布后的暂停时间
    pub throttle: Option<Duration>,
}

impl PumpConfig {
    pub fn with_marker(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            ..Self::default()
        }
    }
}

impl Default for PumpConfig {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            throttle: None,
        }
    }
}

/// Pump 退出原因
#[derive(Debug)]
pub enum PumpExit {
    /// 停止信号为 true
    Stopped,
    /// 行源结束
    EndOfStream,
    /// 行源读取失败（不重试，由上层决定是否重启采集）
    SourceFailed(DriverError),
}

impl PumpExit {
    pub fn is_source_failure(&self) -> bool {
        matches!(self, PumpExit::SourceFailed(_))
    }
}

/// Pump 主循环
///
/// 对每一行：
/// 1. 检查停止信号
/// 2. 读取一行（阻塞，无超时）
/// 3. 不含 `config.marker` 的行直接丢弃，不解码
/// 4. 去除首尾空白后解码，成功则发布到 `sink`
///
/// 解码失败不是错误，只计入 `frames_rejected`。Sink 拒收的读数计入
/// `readings_dropped`，不计入 `readings_published`。
pub fn pump_loop<S, K, F>(
    mut source: S,
    mut sink: K,
    config: &PumpConfig,
    should_stop: F,
    metrics: &PumpMetrics,
) -> PumpExit
where
    S: LineSource,
    K: ReadingSink,
    F: Fn() -> bool,
{
    info!(
        "Pump started (marker: {:?}, throttle: {:?})",
        config.marker, config.throttle
    );

    let exit = loop {
        if should_stop() {
            trace!("Pump: stop signal received, exiting");
            break PumpExit::Stopped;
        }

        let line = match source.next_line() {
            Ok(Some(line)) => line,
            Ok(None) => break PumpExit::EndOfStream,
            Err(e) => {
                warn!("Pump: source read failed: {}", e);
                break PumpExit::SourceFailed(e);
            },
        };
        metrics.lines_total.fetch_add(1, Ordering::Relaxed);

        if !line.contains(config.marker.as_str()) {
            metrics.lines_filtered.fetch_add(1, Ordering::Relaxed);
            continue;
        }

        let line = line.trim();
        match try_decode(line) {
            Ok(reading) => {
                debug!(
                    "Motor {} power: {:.1} W",
                    reading.motor_id, reading.motor_power_watts
                );
                if sink.publish(reading) {
                    metrics.readings_published.fetch_add(1, Ordering::Relaxed);
                } else {
                    metrics.readings_dropped.fetch_add(1, Ordering::Relaxed);
                }

                if let Some(throttle) = config.throttle
                    && !throttle.is_zero()
                {
                    spin_sleep::sleep(throttle);
                }
            },
            Err(reason) => {
                metrics.frames_rejected.fetch_add(1, Ordering::Relaxed);
                trace!("Pump: skipped line {:?}: {}", line, reason);
            },
        }
    };

    let snapshot = metrics.snapshot();
    info!(
        "Pump exited ({:?}): {} lines, {} filtered, {} rejected, {} published, {} dropped",
        exit,
        snapshot.lines_total,
        snapshot.lines_filtered,
        snapshot.frames_rejected,
        snapshot.readings_published,
        snapshot.readings_dropped
    );
    exit
}

/// 以默认配置运行 Pump
///
/// `marker` 为预过滤子串，`should_stop` 每行读取前检查一次。
///
/// # Example
///
/// ```
/// use motor_power_driver::{IterSource, PumpExit, run};
/// use motor_power_protocol::MotorPowerReading;
///
/// let source = IterSource::new([
///     "can0 577 [8] 9A 00 00 00 71 00 00 00 00 00 10 27",
///     "can0 577 [8] 00 00 00 00 71 00 00 00 00 00 10 27",
/// ]);
/// let mut readings = Vec::new();
/// let exit = run(source, "9A", |r: MotorPowerReading| readings.push(r), || false);
///
/// assert!(matches!(exit, PumpExit::EndOfStream));
/// assert_eq!(readings.len(), 1);
/// assert_eq!(readings[0].motor_power_watts, 1000.0);
/// ```
pub fn run<S, K, F>(source: S, marker: &str, sink: K, should_stop: F) -> PumpExit
where
    S: LineSource,
    K: ReadingSink,
    F: Fn() -> bool,
{
    let config = PumpConfig::with_marker(marker);
    pump_loop(source, sink, &config, should_stop, &PumpMetrics::new())
}
