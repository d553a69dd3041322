//! 驱动层错误类型定义

use thiserror::Error;

/// 驱动层错误类型
#[derive(Error, Debug)]
pub enum DriverError {
    /// 行源读取错误（管道关闭、进程退出等）
    #[error("Source IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 采集进程启动失败
    #[error("Failed to spawn capture command {command:?}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// 采集命令为空
    #[error("Capture command is empty")]
    EmptyCommand,

    /// 采集进程未提供 stdout 管道
    #[error("Capture process has no stdout pipe")]
    NoStdout,
}

#[cfg(test)]
mod tests {
    use super::DriverError;

    /// 测试 DriverError 的 Display 实现
    #[test]
    fn test_driver_error_display() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let msg = format!("{}", DriverError::Io(io));
        assert!(msg.contains("Source IO error") && msg.contains("pipe closed"));

        let msg = format!("{}", DriverError::EmptyCommand);
        assert_eq!(msg, "Capture command is empty");

        let err = DriverError::Spawn {
            command: "candump can0".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("candump can0") && msg.contains("not found"));
    }

    /// 测试 From<std::io::Error> 转换
    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        let driver_error: DriverError = io.into();
        assert!(matches!(driver_error, DriverError::Io(_)));
    }
}
