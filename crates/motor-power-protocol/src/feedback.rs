//! 反馈帧结构体定义
//!
//! 电机功率应答（命令码 0x71）的解析与物理量转换。

use crate::constants::{CMD_READ_MOTOR_POWER, POWER_SCALE};
use crate::frame::TextFrame;
use crate::ids::MotorReplyId;
use crate::{ProtocolError, bytes_to_u16_le};

// ============================================================================
// 电机功率读数
// ============================================================================

/// 电机功率读数
///
/// 每帧构造一个新值，不跨帧保留任何状态。
/// - 功率单位：W（原始值 0.1W/LSB）
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotorPowerReading {
    /// 电机编号（`can_id - 0x100`）
    pub motor_id: u32,
    /// 电机功率（W）
    pub motor_power_watts: f64,
}

impl MotorPowerReading {
    /// 从应答 ID 和原始功率值构造
    pub fn new(reply_id: MotorReplyId, power_raw: u16) -> Self {
        Self {
            motor_id: reply_id.motor_id(),
            motor_power_watts: power_raw as f64 / POWER_SCALE,
        }
    }

    /// 获取功率原始值（0.1W 单位）
    pub fn power_raw(&self) -> u16 {
        (self.motor_power_watts * POWER_SCALE).round() as u16
    }
}

impl<'a> TryFrom<TextFrame<'a>> for MotorPowerReading {
    type Error = ProtocolError;

    fn try_from(frame: TextFrame<'a>) -> Result<Self, Self::Error> {
        // ID 检查先于数据解析：非本系列的帧不解析数据字节
        let can_id = frame.can_id()?;
        let reply_id =
            MotorReplyId::from_can_id(can_id).ok_or(ProtocolError::UnknownCanId { id: can_id })?;

        let data = frame.data()?;

        // 命令码与 ID 必须同时匹配
        if data[0] != CMD_READ_MOTOR_POWER {
            return Err(ProtocolError::UnexpectedCommand { command: data[0] });
        }

        // Byte 6-7: 电机功率，uint16 小端，0.1W/LSB
        let power_raw = bytes_to_u16_le([data[6], data[7]]);

        Ok(Self::new(reply_id, power_raw))
    }
}

/// 解码一行 candump 文本，返回不匹配的原因
///
/// 对任意输入都不会 panic。
pub fn try_decode(line: &str) -> Result<MotorPowerReading, ProtocolError> {
    TextFrame::split(line)?.try_into()
}

/// 解码一行 candump 文本
///
/// 格式错误（token 不足、ID 或十六进制解析失败）与不匹配（ID 不在集合内、
/// 命令码不是 0x71）都返回 `None`，不向调用方报告错误。
///
/// # Example
///
/// ```
/// use motor_power_protocol::decode;
///
/// let line = "can0 577 [8] 9A 00 00 00 71 00 00 00 00 00 10 27";
/// let reading = decode(line).unwrap();
/// assert_eq!(reading.motor_id, 321);
/// assert_eq!(reading.motor_power_watts, 1000.0);
///
/// assert!(decode("can0 577 [8] 71 00 00 00 00 00 10 27").is_none());
/// ```
pub fn decode(line: &str) -> Option<MotorPowerReading> {
    try_decode(line).ok()
}
