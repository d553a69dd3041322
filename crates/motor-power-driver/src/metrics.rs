//! Pump 指标模块
//!
//! 原子计数器，用于观察行源流量与过滤效果。可以在任何线程读取，不引入锁竞争。

use std::sync::atomic::{AtomicU64, Ordering};

/// Pump 实时指标
///
/// # 使用示例
///
/// ```rust
/// use motor_power_driver::PumpMetrics;
/// use std::sync::Arc;
/// use std::sync::atomic::Ordering;
///
/// let metrics = Arc::new(PumpMetrics::default());
///
/// // 在 Pump 线程中更新指标
/// metrics.lines_total.fetch_add(1, Ordering::Relaxed);
///
/// // 在主线程中读取快照
/// let snapshot = metrics.snapshot();
/// assert_eq!(snapshot.lines_total, 1);
/// ```
#[derive(Debug, Default)]
pub struct PumpMetrics {
    /// 读取的总行数
    pub lines_total: AtomicU64,

    /// 不含标记、被预过滤丢弃的行数
    pub lines_filtered: AtomicU64,

    /// 含标记但解码无读数的行数（格式错误或不匹配）
    pub frames_rejected: AtomicU64,

    /// Sink 接收的读数
    pub readings_published: AtomicU64,

    /// Sink 丢弃的读数（队列满、接收端断开、写入失败）
    pub readings_dropped: AtomicU64,
}

impl PumpMetrics {
    /// 创建新的指标实例（所有计数器初始化为 0）
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取指标快照
    ///
    /// 使用 `Ordering::Relaxed`，不同计数器之间可能有微小的时间差。
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            lines_total: self.lines_total.load(Ordering::Relaxed),
            lines_filtered: self.lines_filtered.load(Ordering::Relaxed),
            frames_rejected: self.frames_rejected.load(Ordering::Relaxed),
            readings_published: self.readings_published.load(Ordering::Relaxed),
            readings_dropped: self.readings_dropped.load(Ordering::Relaxed),
        }
    }

    /// 重置所有计数器
    pub fn reset(&self) {
        self.lines_total.store(0, Ordering::Relaxed);
        self.lines_filtered.store(0, Ordering::Relaxed);
        self.frames_rejected.store(0, Ordering::Relaxed);
        self.readings_published.store(0, Ordering::Relaxed);
        self.readings_dropped.store(0, Ordering::Relaxed);
    }
}

/// 指标快照（不可变，用于读取）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// 读取的总行数
    pub lines_total: u64,
    /// 被预过滤丢弃的行数
    pub lines_filtered: u64,
    /// 解码无读数的行数
    pub frames_rejected: u64,
    /// Sink 接收的读数
    pub readings_published: u64,
    /// Sink 丢弃的读数
    pub readings_dropped: u64,
}

impl MetricsSnapshot {
    /// 交给解码器的行数
    pub fn lines_decoded(&self) -> u64 {
        self.lines_total.saturating_sub(self.lines_filtered)
    }

    /// 解码出的读数（无论 Sink 是否接收）
    pub fn readings_decoded(&self) -> u64 {
        self.readings_published + self.readings_dropped
    }

    /// 解码命中率（百分比）
    ///
    /// 返回 0.0 到 100.0 之间的值。没有行交给解码器时返回 0.0。
    pub fn hit_rate(&self) -> f64 {
        let decoded = self.lines_decoded();
        if decoded == 0 {
            return 0.0;
        }
        (self.readings_decoded() as f64 / decoded as f64) * 100.0
    }
}
