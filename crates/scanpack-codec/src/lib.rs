//! Lossy compact wire codec for dual-channel laser scans.
//!
//! A dual-channel scan carries two range channels per beam: the
//! *preprocessed* range and the *self-filtered* range (the same range with
//! returns off the platform's own body removed). The compact form packs both
//! channels into one `u16` per beam:
//! - `INVALID` (`0xFFFF`) when neither channel has a return
//! - millimeters below `max_range_mm` when both channels agree
//! - millimeters offset by `max_range_mm` when only the preprocessed channel is valid
//!
//! Intensities are reduced to one byte per beam. Scan geometry that both ends
//! already know ([`ScanProperties`]) never goes on the wire.

pub mod channel;
pub mod codec;
pub mod config;
pub mod error;
pub mod scan;
pub mod select;
pub mod wire;

pub use channel::{BeamState, Channel, CHANNEL_COUNT};
pub use codec::{
    classify, compress, decode_intensity, decode_range, decompress, encode_intensity,
    encode_range, ScanCodec, INVALID,
};
pub use config::{
    CodecConfig, DEFAULT_FIXED_FRAME_ID, DEFAULT_INTENSITY_CLIP, DEFAULT_INTENSITY_SCALE,
    DEFAULT_RANGE_SCALE,
};
pub use error::{Result, ScanError};
pub use scan::{
    CompactScan, DualChannelScan, Header, RigidTransform, ScanGeometry, ScanProperties,
    SingleChannelScan, Time,
};
pub use select::select_channel;
pub use wire::{decode_compact, encode_compact, wire_size, FIXED_SIZE, TRANSFORM_SIZE};
