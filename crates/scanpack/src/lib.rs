//! Compact wire codec for dual-channel laser scans.
//!
//! scanpack moves scans that carry both a preprocessed and a self-filtered
//! range channel over bandwidth-constrained links, at 2 bytes per beam plus
//! an optional intensity byte.
//!
//! # Crate Structure
//!
//! - [`codec`]: scan types, range/intensity codec, channel selection, wire layout
//!
//! The `scanpack` binary (behind the `cli` feature) encodes, decodes, selects
//! and inspects scans stored as JSON or wire files.

/// Re-export codec types.
pub mod codec {
    pub use scanpack_codec::*;
}

pub use scanpack_codec::{
    compress, decompress, select_channel, Channel, CompactScan, DualChannelScan, ScanError,
    ScanProperties, SingleChannelScan,
};
