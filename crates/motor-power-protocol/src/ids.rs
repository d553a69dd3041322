//! CAN ID 常量定义和枚举
//!
//! 电机应答帧的 CAN ID 常量，以及从原始 ID 到应答 ID 的精确匹配。

use crate::constants::MOTOR_ID_OFFSET;
use num_enum::{IntoPrimitive, TryFromPrimitive};

// ============================================================================
// 应答帧 ID 常量
// ============================================================================

/// 电机 1 应答
pub const ID_MOTOR_REPLY_1: u32 = 0x241;

/// 电机 2 应答
pub const ID_MOTOR_REPLY_2: u32 = 0x242;

/// 电机 3 应答
pub const ID_MOTOR_REPLY_3: u32 = 0x243;

/// 电机 4 应答
pub const ID_MOTOR_REPLY_4: u32 = 0x244;

// ============================================================================
// ID 枚举
// ============================================================================

/// 电机应答帧 ID
///
/// 只接受这四个确切的 ID。不按区间判断：区间外的 ID 即使在算术上相邻，
/// 也不属于该设备系列。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u32)]
pub enum MotorReplyId {
    Motor1 = 0x241,
    Motor2 = 0x242,
    Motor3 = 0x243,
    Motor4 = 0x244,
}

impl MotorReplyId {
    /// 所有应答 ID
    pub const ALL: [MotorReplyId; 4] = [
        MotorReplyId::Motor1,
        MotorReplyId::Motor2,
        MotorReplyId::Motor3,
        MotorReplyId::Motor4,
    ];

    /// 根据 CAN ID 查找应答 ID（精确匹配）
    pub fn from_can_id(id: u32) -> Option<Self> {
        Self::try_from(id).ok()
    }

    /// 原始 CAN ID
    pub fn can_id(self) -> u32 {
        self.into()
    }

    /// 电机编号：`can_id - 0x100`
    ///
    /// 保留原始偏移，不做从 1 开始的重新编号（0x241 -> 0x141 = 321）。
    pub fn motor_id(self) -> u32 {
        self.can_id() - MOTOR_ID_OFFSET
    }
}
