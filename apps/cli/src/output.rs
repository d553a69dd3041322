//! JSON Lines 发布
//!
//! 每个读数输出一行 JSON：
//!
//! ```text
//! {"topic":"/motor_power","motor_id":321,"motor_power_watts":1000.0}
//! ```

use motor_power_driver::ReadingSink;
use motor_power_protocol::MotorPowerReading;
use serde::Serialize;
use std::io::Write;
use tracing::{info, warn};

/// 输出消息
#[derive(Debug, Serialize)]
struct PublishedReading<'a> {
    topic: &'a str,
    #[serde(flatten)]
    reading: MotorPowerReading,
}

/// JSON Lines Sink
///
/// 每行写入后立即 flush，下游可以逐行消费。写入失败只记录日志并计数。
pub struct JsonLinesSink<W: Write> {
    writer: W,
    topic: String,
    written: u64,
    failed: u64,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W, topic: impl Into<String>) -> Self {
        Self {
            writer,
            topic: topic.into(),
            written: 0,
            failed: 0,
        }
    }

    /// 成功写出的行数
    pub fn written(&self) -> u64 {
        self.written
    }

    /// 写入失败次数
    pub fn failed(&self) -> u64 {
        self.failed
    }

    /// 汇报输出统计
    pub fn log_summary(&self) {
        if self.failed > 0 {
            warn!(
                "{} readings written to {}, {} failed",
                self.written, self.topic, self.failed
            );
        } else {
            info!("{} readings written to {}", self.written, self.topic);
        }
    }

    fn write_line(&mut self, reading: MotorPowerReading) -> std::io::Result<()> {
        let message = PublishedReading {
            topic: &self.topic,
            reading,
        };
        serde_json::to_writer(&mut self.writer, &message)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }
}

impl<W: Write> ReadingSink for JsonLinesSink<W> {
    fn publish(&mut self, reading: MotorPowerReading) -> bool {
        match self.write_line(reading) {
            Ok(()) => {
                self.written += 1;
                true
            },
            Err(e) => {
                self.failed += 1;
                warn!("Failed to publish reading for motor {}: {}", reading.motor_id, e);
                false
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use motor_power_driver::{IterSource, PumpConfig, PumpMetrics, pump_loop};

    fn reading(motor_id: u32, watts: f64) -> MotorPowerReading {
        MotorPowerReading {
            motor_id,
            motor_power_watts: watts,
        }
    }

    #[test]
    fn test_json_lines_output() {
        let mut sink = JsonLinesSink::new(Vec::new(), "/motor_power");
        sink.publish(reading(321, 1000.0));
        sink.publish(reading(324, 0.5));
        assert_eq!(sink.written(), 2);

        let output = String::from_utf8(sink.writer).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines,
            vec![
                r#"{"topic":"/motor_power","motor_id":321,"motor_power_watts":1000.0}"#,
                r#"{"topic":"/motor_power","motor_id":324,"motor_power_watts":0.5}"#,
            ]
        );
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_is_counted() {
        let mut sink = JsonLinesSink::new(BrokenPipe, "/motor_power");
        assert!(!sink.publish(reading(321, 1.0)));
        assert_eq!(sink.written(), 0);
        assert_eq!(sink.failed(), 1);
    }

    #[test]
    fn test_pump_write_failures_are_dropped() {
        let line = "can0 577 [8] 9A 00 00 00 71 00 00 00 00 00 10 27";
        let mut sink = JsonLinesSink::new(BrokenPipe, "/motor_power");
        let metrics = PumpMetrics::new();

        pump_loop(
            IterSource::new([line, line]),
            sink.by_ref(),
            &PumpConfig::default(),
            || false,
            &metrics,
        );

        // Pump 结束后仍可读取输出统计
        assert_eq!(sink.failed(), 2);
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.readings_published, 0);
        assert_eq!(snapshot.readings_dropped, 2);
    }

    #[test]
    fn test_pump_with_borrowed_sink_counts_written() {
        let line = "can0 578 [8] 9A 00 00 00 71 00 00 00 00 00 e8 03";
        let mut sink = JsonLinesSink::new(Vec::new(), "/motor_power");

        pump_loop(
            IterSource::new([line]),
            sink.by_ref(),
            &PumpConfig::default(),
            || false,
            &PumpMetrics::new(),
        );

        assert_eq!(sink.written(), 1);
        assert_eq!(sink.failed(), 0);
        sink.log_summary();
    }
}
