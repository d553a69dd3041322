//! 驱动层模块
//!
//! 本模块把行源、解码器和发布 Sink 串成一个单线程 Pump：
//! - 行源抽象（内存、`BufRead`、外部采集进程）
//! - 标记预过滤与帧解码
//! - 读数发布（闭包、有界通道）
//! - 原子计数指标
//!
//! # 使用场景
//!
//! ```rust
//! use motor_power_driver::{ChannelSink, PumpConfig, PumpMetrics, ReaderSource, pump_loop};
//! use std::io::Cursor;
//!
//! let log = "can0 578 [8] 9A 00 00 00 71 00 00 00 00 00 e8 03\n";
//! let (sink, rx) = ChannelSink::bounded(4);
//! let metrics = PumpMetrics::new();
//!
//! pump_loop(ReaderSource::new(Cursor::new(log)), sink, &PumpConfig::default(), || false, &metrics);
//!
//! let reading = rx.try_recv().unwrap();
//! assert_eq!(reading.motor_id, 0x142);
//! assert_eq!(reading.motor_power_watts, 100.0);
//! ```

mod error;
pub mod metrics;
pub mod pipeline;
pub mod sink;
pub mod source;

pub use error::DriverError;
pub use metrics::{MetricsSnapshot, PumpMetrics};
pub use pipeline::{PumpConfig, PumpExit, pump_loop, run};
pub use sink::{ByRef, ChannelSink, ReadingSink};
pub use source::{IterSource, KillHandle, LineSource, ProcessSource, ReaderSource};
