use serde::{Deserialize, Serialize};

/// Read state of a notification.
///
/// The store keeps this as an integer column where `1` means unread and `0`
/// means read. Code outside the row mapping should only ever see this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadState {
    Unread,
    Read,
}

impl ReadState {
    pub const UNREAD_FLAG: i64 = 1;
    pub const READ_FLAG: i64 = 0;

    pub fn from_flag(flag: i64) -> Self {
        if flag == Self::READ_FLAG {
            Self::Read
        } else {
            Self::Unread
        }
    }

    pub fn as_flag(self) -> i64 {
        match self {
            Self::Unread => Self::UNREAD_FLAG,
            Self::Read => Self::READ_FLAG,
        }
    }

    pub fn is_unread(self) -> bool {
        self == Self::Unread
    }
}
