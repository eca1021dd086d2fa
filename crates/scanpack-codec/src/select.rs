use crate::channel::Channel;
use crate::error::{Result, ScanError};
use crate::scan::{DualChannelScan, SingleChannelScan};

/// View one range channel of a dual-channel scan as a plain laser scan.
///
/// The sensor-frame header, geometry and intensities are copied unchanged.
pub fn select_channel(scan: &DualChannelScan, channel: Channel) -> Result<SingleChannelScan> {
    let ranges = scan
        .channel(channel)
        .ok_or(ScanError::IndexOutOfRange {
            index: channel.index(),
            available: scan.channels.len(),
        })?
        .to_vec();

    Ok(SingleChannelScan {
        header: scan.scan_header.clone(),
        geometry: scan.geometry,
        ranges,
        intensities: scan.intensities.clone().unwrap_or_default(),
    })
}

impl DualChannelScan {
    /// See [`select_channel`].
    pub fn select(&self, channel: Channel) -> Result<SingleChannelScan> {
        select_channel(self, channel)
    }
}
