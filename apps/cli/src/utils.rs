//! 命令共用工具

use anyhow::{Context, Result};
use motor_power_driver::{MetricsSnapshot, PumpExit};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

/// 安装 Ctrl-C 处理器，返回运行标志
///
/// 收到信号后标志置为 false，Pump 在下一次读取前退出。
/// 读取可能阻塞，`monitor` 会在标志变化后终止采集进程。
pub fn install_stop_flag() -> Result<Arc<AtomicBool>> {
    let is_running = Arc::new(AtomicBool::new(true));
    let flag = is_running.clone();
    ctrlc::set_handler(move || {
        flag.store(false, Ordering::Release);
    })
    .context("设置 Ctrl-C 处理器失败")?;
    Ok(is_running)
}

/// 汇报 Pump 退出原因与指标
///
/// 行源读取失败返回错误（非零退出码），由外部监督者决定是否重启采集。
pub fn report_exit(exit: PumpExit, snapshot: MetricsSnapshot) -> Result<()> {
    info!(
        "{} lines read, {} filtered, {} rejected, {} published, {} dropped (hit rate {:.1}%)",
        snapshot.lines_total,
        snapshot.lines_filtered,
        snapshot.frames_rejected,
        snapshot.readings_published,
        snapshot.readings_dropped,
        snapshot.hit_rate()
    );
    if snapshot.readings_dropped > 0 {
        warn!(
            "{} readings were decoded but not published",
            snapshot.readings_dropped
        );
    }

    match exit {
        PumpExit::Stopped => {
            info!("Stopped by signal");
            Ok(())
        },
        PumpExit::EndOfStream => {
            info!("Source reached end of stream");
            Ok(())
        },
        PumpExit::SourceFailed(e) => {
            warn!("Source failed: {}", e);
            Err(e).context("读取行源失败")
        },
    }
}
