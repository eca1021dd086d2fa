//! Scan value types: the float dual-channel form, the compact wire form and
//! the single-channel consumer view.

use crate::channel::Channel;
use crate::error::{Result, ScanError};

/// A 64-bit time value split into whole seconds and nanoseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Time {
    pub sec: u32,
    pub nsec: u32,
}

impl Time {
    pub fn new(sec: u32, nsec: u32) -> Self {
        Self { sec, nsec }
    }

    /// Total nanoseconds since the epoch of the clock.
    pub fn as_nanos(&self) -> u64 {
        u64::from(self.sec) * 1_000_000_000 + u64::from(self.nsec)
    }
}

/// Stamp and coordinate frame of a message.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Header {
    pub stamp: Time,
    pub frame_id: String,
}

/// A rigid transform: translation in meters plus a unit quaternion `(x, y, z, w)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RigidTransform {
    pub translation: [f64; 3],
    pub rotation: [f64; 4],
}

impl RigidTransform {
    pub const IDENTITY: RigidTransform = RigidTransform {
        translation: [0.0; 3],
        rotation: [0.0, 0.0, 0.0, 1.0],
    };
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Angular layout, timing and range limits of a scan.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScanGeometry {
    /// Angle of the first beam (rad).
    pub angle_min: f32,
    /// Angle of the last beam (rad).
    pub angle_max: f32,
    /// Angular distance between beams (rad).
    pub angle_increment: f32,
    /// Time between beams (s).
    pub time_increment: f32,
    /// Time between scans (s).
    pub scan_time: f32,
    /// Minimum valid range (m).
    pub range_min: f32,
    /// Maximum valid range (m).
    pub range_max: f32,
}

/// Sensor description known to both ends of the link and never sent on the wire.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScanProperties {
    /// Sensor coordinate frame.
    pub frame_id: String,
    pub angle_increment: f32,
    pub time_increment: f32,
    pub scan_time: f32,
    pub range_min: f32,
    pub range_max: f32,
}

impl ScanProperties {
    /// Take the out-of-band part of a scan geometry.
    pub fn from_geometry(frame_id: impl Into<String>, geometry: &ScanGeometry) -> Self {
        Self {
            frame_id: frame_id.into(),
            angle_increment: geometry.angle_increment,
            time_increment: geometry.time_increment,
            scan_time: geometry.scan_time,
            range_min: geometry.range_min,
            range_max: geometry.range_max,
        }
    }

    /// Complete geometry for a scan spanning `angle_min..=angle_max`.
    pub fn geometry(&self, angle_min: f32, angle_max: f32) -> ScanGeometry {
        ScanGeometry {
            angle_min,
            angle_max,
            angle_increment: self.angle_increment,
            time_increment: self.time_increment,
            scan_time: self.scan_time,
            range_min: self.range_min,
            range_max: self.range_max,
        }
    }

    /// Number of beams in a scan spanning `angle_min..=angle_max`.
    pub fn beam_count(&self, angle_min: f32, angle_max: f32) -> Result<usize> {
        let increment = f64::from(self.angle_increment);
        if !increment.is_finite() || increment == 0.0 {
            return Err(ScanError::InvalidProperties(format!(
                "angle_increment must be finite and non-zero, got {}",
                self.angle_increment
            )));
        }
        let steps = (f64::from(angle_max) - f64::from(angle_min)) / increment;
        if !steps.is_finite() || steps < -0.5 || steps > f64::from(u32::MAX) {
            return Err(ScanError::InvalidProperties(format!(
                "angle range {angle_min}..{angle_max} does not match increment {}",
                self.angle_increment
            )));
        }
        usize::try_from(steps.round() as u64)
            .ok()
            .and_then(|steps| steps.checked_add(1))
            .ok_or_else(|| {
                ScanError::Malformed(format!(
                    "{steps} angle steps exceed the addressable beam count"
                ))
            })
    }
}

/// Processing-side scan: two float range channels per beam.
///
/// `channels[Preprocessed][i]` is NaN only if `channels[SelfFiltered][i]` is NaN too.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DualChannelScan {
    /// Stamp and fixed frame the ray transforms are expressed in.
    pub header: Header,
    /// Stamp and sensor frame of the ranges.
    pub scan_header: Header,
    pub geometry: ScanGeometry,
    /// Range channels in meters, ordered `[Preprocessed, SelfFiltered]`. NaN means no return.
    #[cfg_attr(feature = "serde", serde(with = "nan_serde::channels"))]
    pub channels: Vec<Vec<f32>>,
    /// Intensities, if the sensor reported them.
    #[cfg_attr(feature = "serde", serde(default))]
    pub intensities: Option<Vec<f32>>,
    /// Platform pose at the first beam.
    pub first_ray_transform: RigidTransform,
    /// Platform pose at the last beam.
    pub last_ray_transform: RigidTransform,
}

impl DualChannelScan {
    /// Ranges of `channel`, if populated.
    pub fn channel(&self, channel: Channel) -> Option<&[f32]> {
        self.channels.get(channel.index()).map(Vec::as_slice)
    }

    /// Number of beams (length of the preprocessed channel).
    pub fn beam_count(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }
}

/// Wire-side scan: one tagged `u16` range and optionally one `u8` intensity per beam.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompactScan {
    pub stamp: Time,
    pub angle_min: f32,
    pub angle_max: f32,
    pub encoded_ranges: Vec<u16>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub encoded_intensities: Option<Vec<u8>>,
    pub first_ray_transform: RigidTransform,
    pub last_ray_transform: RigidTransform,
}

impl CompactScan {
    pub fn beam_count(&self) -> usize {
        self.encoded_ranges.len()
    }
}

/// A plain laser scan with a single range channel.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SingleChannelScan {
    pub header: Header,
    pub geometry: ScanGeometry,
    #[cfg_attr(feature = "serde", serde(with = "nan_serde::ranges"))]
    pub ranges: Vec<f32>,
    /// Empty when the source reported no intensities.
    #[cfg_attr(feature = "serde", serde(default))]
    pub intensities: Vec<f32>,
}

/// JSON has no NaN: "no return" ranges travel as `null`.
#[cfg(feature = "serde")]
mod nan_serde {
    fn to_option(value: f32) -> Option<f32> {
        if value.is_nan() {
            None
        } else {
            Some(value)
        }
    }

    pub mod ranges {
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            ranges: &[f32],
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            serializer.collect_seq(ranges.iter().map(|r| super::to_option(*r)))
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Vec<f32>, D::Error> {
            let values = Vec::<Option<f32>>::deserialize(deserializer)?;
            Ok(values.into_iter().map(|r| r.unwrap_or(f32::NAN)).collect())
        }
    }

    pub mod channels {
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            channels: &[Vec<f32>],
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            serializer.collect_seq(channels.iter().map(|channel| {
                channel
                    .iter()
                    .map(|r| super::to_option(*r))
                    .collect::<Vec<_>>()
            }))
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Vec<Vec<f32>>, D::Error> {
            let values = Vec::<Vec<Option<f32>>>::deserialize(deserializer)?;
            Ok(values
                .into_iter()
                .map(|channel| channel.into_iter().map(|r| r.unwrap_or(f32::NAN)).collect())
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn properties(angle_increment: f32) -> ScanProperties {
        ScanProperties {
            frame_id: "laser".into(),
            angle_increment,
            range_max: 30.0,
            ..ScanProperties::default()
        }
    }

    #[test]
    fn beam_count_from_angle_range() {
        let props = properties(0.25);
        assert_eq!(props.beam_count(-1.0, 1.0).unwrap(), 9);
        assert_eq!(props.beam_count(0.5, 0.5).unwrap(), 1);
    }

    #[test]
    fn beam_count_tolerates_float_noise() {
        let inc = std::f32::consts::PI / 720.0;
        let props = properties(inc);
        let angle_min = -std::f32::consts::FRAC_PI_2;
        let angle_max = angle_min + 359.0 * inc;
        assert_eq!(props.beam_count(angle_min, angle_max).unwrap(), 360);
    }

    #[test]
    fn beam_count_rejects_zero_increment() {
        let props = properties(0.0);
        assert!(matches!(
            props.beam_count(0.0, 1.0),
            Err(ScanError::InvalidProperties(_))
        ));
        let props = properties(f32::NAN);
        assert!(props.beam_count(0.0, 1.0).is_err());
    }

    #[test]
    fn beam_count_rejects_reversed_range() {
        let props = properties(0.1);
        assert!(props.beam_count(1.0, -1.0).is_err());
    }

    #[test]
    fn beam_count_at_the_steps_ceiling() {
        let props = properties(1.0);
        let count = props.beam_count(0.0, 4_294_967_040.0).unwrap();
        assert_eq!(count as u64, 4_294_967_041);
        assert!(matches!(
            props.beam_count(0.0, 1.0e10),
            Err(ScanError::InvalidProperties(_))
        ));
    }

    #[test]
    fn properties_round_trip_through_geometry() {
        let geometry = ScanGeometry {
            angle_min: -1.0,
            angle_max: 1.0,
            angle_increment: 0.5,
            time_increment: 0.001,
            scan_time: 0.025,
            range_min: 0.1,
            range_max: 30.0,
        };
        let props = ScanProperties::from_geometry("laser", &geometry);
        assert_eq!(props.geometry(-1.0, 1.0), geometry);
    }

    #[test]
    fn dual_scan_channel_access() {
        let scan = DualChannelScan {
            channels: vec![vec![1.0, 2.0]],
            ..DualChannelScan::default()
        };
        assert_eq!(scan.beam_count(), 2);
        assert_eq!(scan.channel(Channel::Preprocessed), Some(&[1.0, 2.0][..]));
        assert_eq!(scan.channel(Channel::SelfFiltered), None);
    }

    #[test]
    fn time_as_nanos() {
        assert_eq!(Time::new(2, 5).as_nanos(), 2_000_000_005);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn nan_ranges_serialize_as_null() {
        let scan = SingleChannelScan {
            ranges: vec![1.5, f32::NAN],
            ..SingleChannelScan::default()
        };
        let json = serde_json::to_value(&scan).unwrap();
        assert_eq!(json["ranges"], serde_json::json!([1.5, null]));

        let back: SingleChannelScan = serde_json::from_value(json).unwrap();
        assert_eq!(back.ranges[0], 1.5);
        assert!(back.ranges[1].is_nan());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn dual_scan_channels_keep_nan_through_json() {
        let scan = DualChannelScan {
            channels: vec![vec![2.1, f32::NAN], vec![f32::NAN, f32::NAN]],
            ..DualChannelScan::default()
        };
        let text = serde_json::to_string(&scan).unwrap();
        let back: DualChannelScan = serde_json::from_str(&text).unwrap();
        assert_eq!(back.channels[0][0], 2.1);
        assert!(back.channels[0][1].is_nan());
        assert!(back.channels[1].iter().all(|r| r.is_nan()));
        assert_eq!(back.intensities, None);
    }
}
