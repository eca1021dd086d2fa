//! Range channel identifiers and per-beam encoded states.
//!
//! A dual-channel scan always orders its range channels as
//! `[Preprocessed, SelfFiltered]`.

use std::fmt;
use std::str::FromStr;

use crate::error::ScanError;

/// Number of range channels a complete dual-channel scan carries.
pub const CHANNEL_COUNT: usize = 2;

/// One of the two range channels of a dual-channel scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Channel {
    /// Range after basic validity filtering.
    Preprocessed = 0,
    /// Range after additionally removing returns off the platform's own body.
    SelfFiltered = 1,
}

impl Channel {
    /// Position of this channel in [`DualChannelScan::channels`](crate::DualChannelScan::channels).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Human-readable channel name.
    pub fn name(self) -> &'static str {
        match self {
            Channel::Preprocessed => "preprocessed",
            Channel::SelfFiltered => "self-filtered",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for Channel {
    type Error = ScanError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Channel::Preprocessed),
            1 => Ok(Channel::SelfFiltered),
            other => Err(ScanError::IndexOutOfRange {
                index: other as usize,
                available: CHANNEL_COUNT,
            }),
        }
    }
}

impl FromStr for Channel {
    type Err = ScanError;

    /// Accepts a channel name (`preprocessed`, `self-filtered`, `self_filtered`)
    /// or its numeric index.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "preprocessed" => Ok(Channel::Preprocessed),
            "self-filtered" | "self_filtered" | "selffiltered" => Ok(Channel::SelfFiltered),
            other => match other.parse::<u8>() {
                Ok(index) => Channel::try_from(index),
                Err(_) => Err(ScanError::IndexOutOfRange {
                    index: usize::MAX,
                    available: CHANNEL_COUNT,
                }),
            },
        }
    }
}

/// What an encoded range value says about its beam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum BeamState {
    /// Valid in both channels.
    Valid,
    /// Valid before self filtering, removed by it.
    SelfFiltered,
    /// No return in either channel.
    Invalid,
}

impl BeamState {
    /// Human-readable state name.
    pub fn name(self) -> &'static str {
        match self {
            BeamState::Valid => "valid",
            BeamState::SelfFiltered => "self-filtered",
            BeamState::Invalid => "invalid",
        }
    }
}
