//! 协议常量定义
//!
//! 应答命令码、物理量缩放系数以及 candump 文本行的字段布局。

/// 电机功率读取应答命令码（数据 Byte 0）
pub const CMD_READ_MOTOR_POWER: u8 = 0x71;

/// 功率缩放系数：原始值单位 0.1W
pub const POWER_SCALE: f64 = 10.0;

/// CAN ID 到电机编号的固定偏移
///
/// `motor_id = can_id - MOTOR_ID_OFFSET`，对所有应答 ID 一致。
pub const MOTOR_ID_OFFSET: u32 = 0x100;

/// CAN ID 所在的 token 下标
pub const ID_TOKEN_INDEX: usize = 1;

/// 数据窗口起始 token 下标
pub const DATA_TOKEN_START: usize = 7;

/// 数据窗口字节数（CAN 2.0 固定 8 字节）
pub const DATA_WINDOW_LEN: usize = 8;

/// 可解码行的最少 token 数（tokens[7..15] 必须完整）
pub const MIN_TOKEN_COUNT: usize = DATA_TOKEN_START + DATA_WINDOW_LEN;

/// 默认预过滤标记
///
/// 上游总线工具为该电机系列输出的子字段，Pump 只把包含此子串的行交给解码器。
pub const DEFAULT_MARKER: &str = "9A";
