/// Encoded range units per meter (millimeter resolution).
pub const DEFAULT_RANGE_SCALE: f32 = 1000.0;

/// Intensity units represented by one encoded intensity step.
pub const DEFAULT_INTENSITY_SCALE: f32 = 40.0;

/// Intensities are clamped to this ceiling before scaling so they fit in a byte.
pub const DEFAULT_INTENSITY_CLIP: f32 = 10000.0;

/// Frame id written into the outer header of decompressed scans.
pub const DEFAULT_FIXED_FRAME_ID: &str = "world";

/// Controls scan compression and decompression.
///
/// The scale defaults define the deployed wire format; both ends of a link
/// must agree on them.
#[derive(Debug, Clone, PartialEq)]
pub struct CodecConfig {
    /// Encoded range units per meter. Default: 1000.
    pub range_scale: f32,
    /// Intensity units per encoded step. Default: 40.
    pub intensity_scale: f32,
    /// Intensity ceiling applied before scaling. Default: 10000.
    pub intensity_clip: f32,
    /// Frame id of the fixed frame the ray transforms are expressed in.
    pub fixed_frame_id: String,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            range_scale: DEFAULT_RANGE_SCALE,
            intensity_scale: DEFAULT_INTENSITY_SCALE,
            intensity_clip: DEFAULT_INTENSITY_CLIP,
            fixed_frame_id: DEFAULT_FIXED_FRAME_ID.to_string(),
        }
    }
}
