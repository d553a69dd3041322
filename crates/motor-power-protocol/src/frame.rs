//! candump 文本帧
//!
//! 一行文本对应一帧，字段以空白分隔：
//!
//! ```text
//! <interface> <id> [<len>] <byte0> <byte1> ... <byteN-1>
//! ```
//!
//! - `<id>` 为十进制整数
//! - `<len>` 为方括号包裹的字节数（解码不使用）
//! - 数据字节为两位十六进制
//!
//! 功率应答的 8 字节数据窗口位于 tokens[7..15]。

use crate::ProtocolError;
use crate::constants::{DATA_TOKEN_START, DATA_WINDOW_LEN, ID_TOKEN_INDEX, MIN_TOKEN_COUNT};

/// 分词后的文本帧（借用原始行）
///
/// 只做分词和 token 数检查，ID 与数据字节按需解析，
/// 这样调用方可以先过滤 ID 再解析数据。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextFrame<'a> {
    interface: &'a str,
    id_token: &'a str,
    data_tokens: [&'a str; DATA_WINDOW_LEN],
}

impl<'a> TextFrame<'a> {
    /// 对一行文本分词
    ///
    /// token 数少于 [`MIN_TOKEN_COUNT`] 时返回 [`ProtocolError::TooFewTokens`]。
    pub fn split(line: &'a str) -> Result<Self, ProtocolError> {
        let tokens: Vec<&'a str> = line.split_whitespace().collect();
        if tokens.len() < MIN_TOKEN_COUNT {
            return Err(ProtocolError::TooFewTokens {
                expected: MIN_TOKEN_COUNT,
                actual: tokens.len(),
            });
        }

        let mut data_tokens = [""; DATA_WINDOW_LEN];
        data_tokens.copy_from_slice(&tokens[DATA_TOKEN_START..MIN_TOKEN_COUNT]);

        Ok(Self {
            interface: tokens[0],
            id_token: tokens[ID_TOKEN_INDEX],
            data_tokens,
        })
    }

    /// 接口名（如 `can0`）
    pub fn interface(&self) -> &'a str {
        self.interface
    }

    /// 以十进制解析 CAN ID
    pub fn can_id(&self) -> Result<u32, ProtocolError> {
        self.id_token
            .parse::<u32>()
            .map_err(|_| ProtocolError::InvalidCanId {
                token: self.id_token.to_string(),
            })
    }

    /// 解析 8 字节数据窗口
    pub fn data(&self) -> Result<[u8; DATA_WINDOW_LEN], ProtocolError> {
        let mut data = [0u8; DATA_WINDOW_LEN];
        for (index, token) in self.data_tokens.iter().enumerate() {
            data[index] = parse_hex_byte(token).ok_or_else(|| ProtocolError::InvalidHexByte {
                index,
                token: token.to_string(),
            })?;
        }
        Ok(data)
    }
}

/// 严格解析一个两位十六进制字节
///
/// 长度不是 2 或包含非十六进制字符时返回 `None`（`"7"`、`"071"`、`"0x71"` 均不接受）。
pub fn parse_hex_byte(token: &str) -> Option<u8> {
    let mut byte = [0u8; 1];
    hex::decode_to_slice(token, &mut byte).ok()?;
    Some(byte[0])
}
