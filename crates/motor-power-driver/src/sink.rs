//! 读数发布接口
//!
//! Pump 每成功解码一帧调用一次 [`ReadingSink::publish`]。发布是 fire-and-forget：
//! Pump 不等待确认，也不因发布失败重试，失败由 Sink 自己处理。
//! 返回值只用于计数：`true` 计入已发布，`false` 计入已丢弃。
//!
//! # 使用示例
//!
//! ```rust
//! use motor_power_driver::sink::{ChannelSink, ReadingSink};
//! use motor_power_protocol::decode;
//!
//! let (mut sink, rx) = ChannelSink::bounded(4);
//! let reading = decode("can0 577 [8] 9A 00 00 00 71 00 00 00 00 00 10 27").unwrap();
//! assert!(sink.publish(reading));
//! assert_eq!(rx.try_recv().unwrap().motor_id, 321);
//! ```

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use motor_power_protocol::MotorPowerReading;
use tracing::warn;

/// 原始部署中发布队列的长度
pub const DEFAULT_QUEUE_SIZE: usize = 4;

/// 读数发布 Trait
pub trait ReadingSink {
    /// 发布一个读数
    ///
    /// Sink 接收了读数返回 `true`，丢弃返回 `false`。
    fn publish(&mut self, reading: MotorPowerReading) -> bool;

    /// 借出 Sink，调用方在 Pump 结束后仍持有它
    ///
    /// ```rust
    /// use motor_power_driver::{ChannelSink, IterSource, ReadingSink, run};
    ///
    /// let (mut sink, _rx) = ChannelSink::bounded(1);
    /// let line = "can0 577 [8] 9A 00 00 00 71 00 00 00 00 00 10 27";
    /// run(IterSource::new([line, line]), "9A", sink.by_ref(), || false);
    /// assert_eq!(sink.dropped(), 1);
    /// ```
    fn by_ref(&mut self) -> ByRef<'_, Self>
    where
        Self: Sized,
    {
        ByRef(self)
    }
}

/// 闭包 Sink，总是接收
impl<F: FnMut(MotorPowerReading)> ReadingSink for F {
    fn publish(&mut self, reading: MotorPowerReading) -> bool {
        self(reading);
        true
    }
}

/// [`ReadingSink::by_ref`] 返回的借用 Sink
#[derive(Debug)]
pub struct ByRef<'a, K: ?Sized>(&'a mut K);

impl<K: ReadingSink + ?Sized> ReadingSink for ByRef<'_, K> {
    fn publish(&mut self, reading: MotorPowerReading) -> bool {
        self.0.publish(reading)
    }
}

/// 有界通道 Sink
///
/// 使用 `try_send`，从不阻塞 Pump。队列满或接收端断开时丢弃读数并计数。
/// 通道是 FIFO，读数顺序与帧到达顺序一致。
///
/// 队列满时丢弃的是最新的读数，已在队列中的读数不会被挤出。
/// 这与 ROS `Publisher(queue_size=4)` 丢弃最旧消息的行为不同：
/// Sink 不持有接收端，接收端断开后才能检测到 `Disconnected`。
#[derive(Debug)]
pub struct ChannelSink {
    sender: Sender<MotorPowerReading>,
    dropped: u64,
}

impl ChannelSink {
    /// 创建容量为 `capacity` 的通道 Sink 及其接收端
    pub fn bounded(capacity: usize) -> (Self, Receiver<MotorPowerReading>) {
        let (sender, receiver) = bounded(capacity);
        (Self::new(sender), receiver)
    }

    pub fn new(sender: Sender<MotorPowerReading>) -> Self {
        Self { sender, dropped: 0 }
    }

    /// 被丢弃的读数数量
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl ReadingSink for ChannelSink {
    fn publish(&mut self, reading: MotorPowerReading) -> bool {
        match self.sender.try_send(reading) {
            Ok(()) => true,
            Err(TrySendError::Full(reading)) => {
                self.dropped += 1;
                warn!(
                    "Publish queue full, dropping reading for motor {} (dropped: {})",
                    reading.motor_id, self.dropped
                );
                false
            },
            Err(TrySendError::Disconnected(reading)) => {
                self.dropped += 1;
                warn!(
                    "Publish channel disconnected, dropping reading for motor {}",
                    reading.motor_id
                );
                false
            },
        }
    }
}
