//! 行源抽象
//!
//! Pump 只依赖 [`LineSource`]：逐行读取，`Ok(None)` 表示流结束。
//! 行源如何构造（进程、文件、内存）由调用方决定。
//!
//! - [`IterSource`]: 内存行序列，主要用于测试
//! - [`ReaderSource`]: 任意 `BufRead`（文件、stdin）
//! - [`ProcessSource`]: 外部采集进程（如 `candump can0`）的 stdout

mod process;

pub use process::{KillHandle, ProcessSource};

use crate::DriverError;
use std::io::BufRead;

/// 行源 Trait
///
/// 读取是阻塞的，没有超时。读取失败即终止 Pump，Pump 不重试。
pub trait LineSource {
    /// 读取下一行
    ///
    /// - `Ok(Some(line))`: 一行数据（可能带行尾换行符）
    /// - `Ok(None)`: 流结束
    /// - `Err(_)`: 读取失败
    fn next_line(&mut self) -> Result<Option<String>, DriverError>;
}

impl<S: LineSource + ?Sized> LineSource for &mut S {
    fn next_line(&mut self) -> Result<Option<String>, DriverError> {
        (**self).next_line()
    }
}

impl<S: LineSource + ?Sized> LineSource for Box<S> {
    fn next_line(&mut self) -> Result<Option<String>, DriverError> {
        (**self).next_line()
    }
}

/// 内存行序列
///
/// # Example
///
/// ```
/// use motor_power_driver::{IterSource, LineSource};
///
/// let mut source = IterSource::new(["a", "b"]);
/// assert_eq!(source.next_line().unwrap(), Some("a".to_string()));
/// assert_eq!(source.next_line().unwrap(), Some("b".to_string()));
/// assert_eq!(source.next_line().unwrap(), None);
/// ```
#[derive(Debug, Clone)]
pub struct IterSource<I> {
    lines: I,
}

impl<I> IterSource<I>
where
    I: Iterator,
    I::Item: Into<String>,
{
    pub fn new<T: IntoIterator<IntoIter = I>>(lines: T) -> Self {
        Self {
            lines: lines.into_iter(),
        }
    }
}

impl<I> LineSource for IterSource<I>
where
    I: Iterator,
    I::Item: Into<String>,
{
    fn next_line(&mut self) -> Result<Option<String>, DriverError> {
        Ok(self.lines.next().map(Into::into))
    }
}

/// `BufRead` 行源
///
/// 非 UTF-8 字节按有损方式转换，不视为读取失败：
/// 截断或损坏的行交给解码器静默丢弃即可。
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::with_capacity(128),
        }
    }

    /// 取回底层 reader
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: BufRead> LineSource for ReaderSource<R> {
    fn next_line(&mut self) -> Result<Option<String>, DriverError> {
        self.buf.clear();
        let n = self.reader.read_until(b'\n', &mut self.buf)?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }
}
