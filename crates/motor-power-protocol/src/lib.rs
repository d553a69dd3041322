//! # Motor Power Protocol
//!
//! 电机控制器功率应答帧的文本解析（无 IO、无共享状态）
//!
//! ## 模块
//!
//! - `ids`: CAN ID 常量定义与电机应答 ID 枚举
//! - `constants`: 协议常量定义
//! - `frame`: candump 文本行的分词与数据窗口解析
//! - `feedback`: 功率应答解析（`decode`）
//!
//! ## 字节序
//!
//! 功率字段为小端 16 位（Byte 6 为低字节，Byte 7 为高字节），
//! 单位 0.1W/LSB。

pub mod constants;
pub mod feedback;
pub mod frame;
pub mod ids;

// 重新导出常用类型
pub use constants::*;
pub use feedback::*;
pub use frame::*;
pub use ids::*;

use thiserror::Error;

/// 协议解析错误类型
///
/// 仅用于诊断（trace 日志、测试）。[`decode`] 从不向调用方暴露这些错误，
/// 解析失败一律表现为"无读数"。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Too few tokens: expected at least {expected}, got {actual}")]
    TooFewTokens { expected: usize, actual: usize },

    #[error("Invalid CAN ID token: {token:?}")]
    InvalidCanId { token: String },

    #[error("Invalid hex byte at data index {index}: {token:?}")]
    InvalidHexByte { index: usize, token: String },

    #[error("Unknown CAN ID: 0x{id:X}")]
    UnknownCanId { id: u32 },

    #[error("Unexpected command byte: 0x{command:02X}")]
    UnexpectedCommand { command: u8 },
}

/// 小端字节序转 u16
///
/// 电机应答帧的多字节字段均为低字节在前。
pub fn bytes_to_u16_le(bytes: [u8; 2]) -> u16 {
    u16::from_le_bytes(bytes)
}
