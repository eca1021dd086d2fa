use tracing::{debug, warn};

use crate::channel::{BeamState, Channel, CHANNEL_COUNT};
use crate::config::{
    CodecConfig, DEFAULT_INTENSITY_CLIP, DEFAULT_INTENSITY_SCALE, DEFAULT_RANGE_SCALE,
};
use crate::error::{Result, ScanError};
use crate::scan::{CompactScan, DualChannelScan, Header, ScanProperties};

/// Encoded range meaning "no return in either channel".
pub const INVALID: u16 = u16::MAX;

/// Compresses and decompresses scans with a fixed [`CodecConfig`].
///
/// Every encoded range falls in one of three regions, split by
/// `max_range_mm = round(range_max * range_scale)`:
///
/// ```text
/// 0 ........... max_range_mm - 1 | max_range_mm ........ 0xFFFE | 0xFFFF
///   valid in both channels       | preprocessed only,           | INVALID
///   (direct)                     | offset by max_range_mm       |
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScanCodec {
    config: CodecConfig,
}

/// Beams that could not be represented exactly in one scan.
#[derive(Debug, Default)]
struct EncodeStats {
    clamped: usize,
    inconsistent: usize,
}

impl ScanCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Threshold separating the direct region from the offset region.
    pub fn max_range_mm(&self, range_max: f32) -> u16 {
        scaled_max_range(range_max, self.config.range_scale)
    }

    /// Pack a dual-channel scan into its compact wire form.
    pub fn compress(&self, scan: &DualChannelScan) -> Result<CompactScan> {
        if scan.channels.len() < CHANNEL_COUNT {
            return Err(ScanError::ChannelDataAbsent {
                found: scan.channels.len(),
            });
        }
        check_range_max(scan.geometry.range_max)?;

        let preprocessed = &scan.channels[Channel::Preprocessed.index()];
        let self_filtered = &scan.channels[Channel::SelfFiltered.index()];
        if self_filtered.len() != preprocessed.len() {
            return Err(ScanError::LengthMismatch {
                what: "self-filtered channel",
                expected: preprocessed.len(),
                actual: self_filtered.len(),
            });
        }
        if let Some(intensities) = &scan.intensities {
            if intensities.len() != preprocessed.len() {
                return Err(ScanError::LengthMismatch {
                    what: "intensities",
                    expected: preprocessed.len(),
                    actual: intensities.len(),
                });
            }
        }

        let max_mm = self.max_range_mm(scan.geometry.range_max);
        let mut stats = EncodeStats::default();
        let encoded_ranges: Vec<u16> = preprocessed
            .iter()
            .zip(self_filtered)
            .map(|(&pre, &filtered)| {
                let (value, clamped, inconsistent) =
                    encode_range_scaled(pre, filtered, max_mm, self.config.range_scale);
                stats.clamped += usize::from(clamped);
                stats.inconsistent += usize::from(inconsistent);
                value
            })
            .collect();

        let encoded_intensities = scan.intensities.as_ref().map(|intensities| {
            intensities
                .iter()
                .map(|&i| {
                    encode_intensity_scaled(
                        i,
                        self.config.intensity_clip,
                        self.config.intensity_scale,
                    )
                })
                .collect()
        });

        if stats.clamped > 0 {
            warn!(
                beams = stats.clamped,
                max_range_mm = max_mm,
                "ranges outside the encodable region were clamped"
            );
        }
        if stats.inconsistent > 0 {
            warn!(
                beams = stats.inconsistent,
                "self-filtered range present where preprocessed range is NaN"
            );
        }
        debug!(
            beams = encoded_ranges.len(),
            intensities = scan.intensities.is_some(),
            max_range_mm = max_mm,
            "compressed scan"
        );

        Ok(CompactScan {
            stamp: scan.header.stamp,
            angle_min: scan.geometry.angle_min,
            angle_max: scan.geometry.angle_max,
            encoded_ranges,
            encoded_intensities,
            first_ray_transform: scan.first_ray_transform,
            last_ray_transform: scan.last_ray_transform,
        })
    }

    /// Expand a compact scan back into a dual-channel scan.
    ///
    /// `properties` supplies the geometry the wire form leaves out.
    pub fn decompress(
        &self,
        compact: &CompactScan,
        properties: &ScanProperties,
    ) -> Result<DualChannelScan> {
        check_range_max(properties.range_max)?;
        let beams = compact.encoded_ranges.len();
        if let Some(intensities) = &compact.encoded_intensities {
            if intensities.len() != beams {
                return Err(ScanError::LengthMismatch {
                    what: "encoded intensities",
                    expected: beams,
                    actual: intensities.len(),
                });
            }
        }

        let max_mm = self.max_range_mm(properties.range_max);
        let mut preprocessed = Vec::with_capacity(beams);
        let mut self_filtered = Vec::with_capacity(beams);
        for &value in &compact.encoded_ranges {
            let (pre, filtered) = decode_range_scaled(value, max_mm, self.config.range_scale);
            preprocessed.push(pre);
            self_filtered.push(filtered);
        }

        let intensities = compact.encoded_intensities.as_ref().map(|encoded| {
            encoded
                .iter()
                .map(|&i| decode_intensity_scaled(i, self.config.intensity_scale))
                .collect()
        });

        debug!(
            beams,
            intensities = compact.encoded_intensities.is_some(),
            max_range_mm = max_mm,
            "decompressed scan"
        );

        Ok(DualChannelScan {
            header: Header {
                stamp: compact.stamp,
                frame_id: self.config.fixed_frame_id.clone(),
            },
            scan_header: Header {
                stamp: compact.stamp,
                frame_id: properties.frame_id.clone(),
            },
            geometry: properties.geometry(compact.angle_min, compact.angle_max),
            channels: vec![preprocessed, self_filtered],
            intensities,
            first_ray_transform: compact.first_ray_transform,
            last_ray_transform: compact.last_ray_transform,
        })
    }
}

/// Compress with the default codec configuration.
pub fn compress(scan: &DualChannelScan) -> Result<CompactScan> {
    ScanCodec::default().compress(scan)
}

/// Decompress with the default codec configuration.
pub fn decompress(compact: &CompactScan, properties: &ScanProperties) -> Result<DualChannelScan> {
    ScanCodec::default().decompress(compact, properties)
}

/// Encode one beam at millimeter resolution.
pub fn encode_range(preprocessed: f32, self_filtered: f32, max_range_mm: u16) -> u16 {
    encode_range_scaled(preprocessed, self_filtered, max_range_mm, DEFAULT_RANGE_SCALE).0
}

/// Decode one beam at millimeter resolution into `(preprocessed, self_filtered)`.
pub fn decode_range(value: u16, max_range_mm: u16) -> (f32, f32) {
    decode_range_scaled(value, max_range_mm, DEFAULT_RANGE_SCALE)
}

/// Encode one intensity with the default clip and scale.
pub fn encode_intensity(intensity: f32) -> u8 {
    encode_intensity_scaled(intensity, DEFAULT_INTENSITY_CLIP, DEFAULT_INTENSITY_SCALE)
}

/// Decode one intensity with the default scale.
pub fn decode_intensity(value: u8) -> f32 {
    decode_intensity_scaled(value, DEFAULT_INTENSITY_SCALE)
}

/// Which region an encoded range falls in. `max_range_mm` itself is offset region.
pub fn classify(value: u16, max_range_mm: u16) -> BeamState {
    if value == INVALID {
        BeamState::Invalid
    } else if value < max_range_mm {
        BeamState::Valid
    } else {
        BeamState::SelfFiltered
    }
}

fn check_range_max(range_max: f32) -> Result<()> {
    if range_max.is_finite() && range_max > 0.0 {
        Ok(())
    } else {
        Err(ScanError::InvalidProperties(format!(
            "range_max must be finite and positive, got {range_max}"
        )))
    }
}

/// Kept within `1..INVALID` so both the direct and the offset region are non-empty.
fn scaled_max_range(range_max: f32, range_scale: f32) -> u16 {
    let scaled = (range_max * range_scale).round();
    if scaled.is_nan() || scaled < 1.0 {
        1
    } else if scaled >= f32::from(INVALID) {
        INVALID - 1
    } else {
        scaled as u16
    }
}

/// Returns the encoded value plus whether it was clamped and whether the
/// channels contradicted each other.
fn encode_range_scaled(
    preprocessed: f32,
    self_filtered: f32,
    max_range_mm: u16,
    range_scale: f32,
) -> (u16, bool, bool) {
    match (preprocessed.is_nan(), self_filtered.is_nan()) {
        (true, true) => (INVALID, false, false),
        (false, true) => {
            let offset =
                quantize(preprocessed, range_scale).saturating_add(u32::from(max_range_mm));
            let ceiling = u32::from(INVALID - 1);
            (offset.min(ceiling) as u16, offset > ceiling, false)
        }
        (pre_nan, false) => {
            // A NaN preprocessed range under a valid self-filtered one breaks the
            // refinement order; the self-filtered return is the one to keep.
            let range = if pre_nan { self_filtered } else { preprocessed };
            let direct = quantize(range, range_scale);
            let ceiling = u32::from(max_range_mm) - 1;
            (direct.min(ceiling) as u16, direct > ceiling, pre_nan)
        }
    }
}

fn decode_range_scaled(value: u16, max_range_mm: u16, range_scale: f32) -> (f32, f32) {
    match classify(value, max_range_mm) {
        BeamState::Invalid => (f32::NAN, f32::NAN),
        BeamState::Valid => {
            let range = f32::from(value) / range_scale;
            (range, range)
        }
        BeamState::SelfFiltered => (f32::from(value - max_range_mm) / range_scale, f32::NAN),
    }
}

/// Negative ranges become 0; the float-to-int cast saturates large ones.
fn quantize(range: f32, range_scale: f32) -> u32 {
    (range * range_scale).round().max(0.0) as u32
}

fn encode_intensity_scaled(intensity: f32, clip: f32, scale: f32) -> u8 {
    if intensity.is_nan() {
        return 0;
    }
    (intensity.min(clip) / scale).floor() as u8
}

fn decode_intensity_scaled(value: u8, scale: f32) -> f32 {
    f32::from(value) * scale
}
