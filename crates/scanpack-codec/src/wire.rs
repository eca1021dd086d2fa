use bytes::{Buf, BufMut, BytesMut};
use tracing::trace;

use crate::error::{Result, ScanError};
use crate::scan::{CompactScan, RigidTransform, ScanProperties, Time};

/// Rigid transform: translation (3 × f64) + rotation (4 × f64) = 56 bytes.
pub const TRANSFORM_SIZE: usize = 7 * 8;

/// Everything except the per-beam arrays: stamp (8) + angles (8) + 2 transforms.
pub const FIXED_SIZE: usize = 8 + 8 + 2 * TRANSFORM_SIZE;

const HEAD_SIZE: usize = 16;

/// Total wire size of a compact scan.
pub fn wire_size(scan: &CompactScan) -> usize {
    let beams = scan.encoded_ranges.len();
    let intensities = scan.encoded_intensities.as_ref().map_or(0, Vec::len);
    FIXED_SIZE + 2 * beams + intensities
}

/// Encode a compact scan into its wire layout.
///
/// Wire format (little-endian):
/// ```text
/// ┌───────────┬───────────┬───────────┬───────────┬─────────────┬──────────────┬───────────┬──────────┐
/// │ sec (4B)  │ nsec (4B) │ angle_min │ angle_max │ ranges      │ intensities  │ first ray │ last ray │
/// │ u32       │ u32       │ f32       │ f32       │ N × u16     │ N × u8 / -   │ 7 × f64   │ 7 × f64  │
/// └───────────┴───────────┴───────────┴───────────┴─────────────┴──────────────┴───────────┴──────────┘
/// ```
///
/// The beam count is not stored; the receiver derives it from the angle range
/// and its own [`ScanProperties`].
pub fn encode_compact(scan: &CompactScan, dst: &mut BytesMut) -> Result<()> {
    let beams = scan.encoded_ranges.len();
    if let Some(intensities) = &scan.encoded_intensities {
        if intensities.len() != beams {
            return Err(ScanError::LengthMismatch {
                what: "encoded intensities",
                expected: beams,
                actual: intensities.len(),
            });
        }
    }

    dst.reserve(wire_size(scan));
    dst.put_u32_le(scan.stamp.sec);
    dst.put_u32_le(scan.stamp.nsec);
    dst.put_f32_le(scan.angle_min);
    dst.put_f32_le(scan.angle_max);
    for &range in &scan.encoded_ranges {
        dst.put_u16_le(range);
    }
    if let Some(intensities) = &scan.encoded_intensities {
        dst.put_slice(intensities);
    }
    put_transform(dst, &scan.first_ray_transform);
    put_transform(dst, &scan.last_ray_transform);
    Ok(())
}

/// Decode one complete compact scan record.
///
/// Intensities are present iff the record holds exactly one extra byte per beam.
pub fn decode_compact(src: &[u8], properties: &ScanProperties) -> Result<CompactScan> {
    if src.len() < FIXED_SIZE {
        return Err(ScanError::Truncated {
            needed: FIXED_SIZE,
            available: src.len(),
        });
    }

    let mut buf = src;
    let stamp = Time::new(buf.get_u32_le(), buf.get_u32_le());
    let angle_min = buf.get_f32_le();
    let angle_max = buf.get_f32_le();

    let beams = properties.beam_count(angle_min, angle_max)?;
    let body = src.len() - FIXED_SIZE;
    let (Some(ranges_len), Some(full_len)) = (beams.checked_mul(2), beams.checked_mul(3)) else {
        return Err(ScanError::Malformed(format!(
            "{beams} beams exceed the addressable record size"
        )));
    };
    let with_intensities = if body == ranges_len {
        false
    } else if body == full_len {
        true
    } else {
        return Err(ScanError::Malformed(format!(
            "{body} body bytes do not fit {beams} beams (expected {ranges_len} or {full_len})"
        )));
    };
    debug_assert_eq!(buf.remaining(), src.len() - HEAD_SIZE);

    let encoded_ranges = (0..beams).map(|_| buf.get_u16_le()).collect();
    let encoded_intensities = if with_intensities {
        let mut intensities = vec![0u8; beams];
        buf.copy_to_slice(&mut intensities);
        Some(intensities)
    } else {
        None
    };
    let first_ray_transform = get_transform(&mut buf);
    let last_ray_transform = get_transform(&mut buf);

    trace!(beams, with_intensities, bytes = src.len(), "decoded compact scan");

    Ok(CompactScan {
        stamp,
        angle_min,
        angle_max,
        encoded_ranges,
        encoded_intensities,
        first_ray_transform,
        last_ray_transform,
    })
}

fn put_transform(dst: &mut BytesMut, transform: &RigidTransform) {
    for value in transform.translation.iter().chain(&transform.rotation) {
        dst.put_f64_le(*value);
    }
}

fn get_transform(buf: &mut &[u8]) -> RigidTransform {
    let mut transform = RigidTransform::IDENTITY;
    for value in transform.translation.iter_mut() {
        *value = buf.get_f64_le();
    }
    for value in transform.rotation.iter_mut() {
        *value = buf.get_f64_le();
    }
    transform
}

#[cfg(test)]
mod tests {
    use super::*;

    fn properties() -> ScanProperties {
        ScanProperties {
            frame_id: "head_laser".into(),
            angle_increment: 0.5,
            range_max: 30.0,
            ..ScanProperties::default()
        }
    }

    fn compact(intensities: bool) -> CompactScan {
        CompactScan {
            stamp: Time::new(1_400_000_123, 456_000_000),
            angle_min: -0.5,
            angle_max: 0.5,
            encoded_ranges: vec![5_234, 32_100, 0xFFFF],
            encoded_intensities: intensities.then(|| vec![10, 250, 0]),
            first_ray_transform: RigidTransform {
                translation: [0.25, -1.5, 1.0],
                rotation: [0.0, 0.0, 0.38268343, 0.92387953],
            },
            last_ray_transform: RigidTransform::IDENTITY,
        }
    }

    #[test]
    fn encode_layout() {
        let mut buf = BytesMut::new();
        encode_compact(&compact(true), &mut buf).unwrap();

        assert_eq!(buf.len(), FIXED_SIZE + 3 * 3);
        assert_eq!(&buf[0..4], &1_400_000_123u32.to_le_bytes());
        assert_eq!(&buf[8..12], &(-0.5f32).to_le_bytes());
        assert_eq!(&buf[16..18], &5_234u16.to_le_bytes());
        assert_eq!(&buf[18..20], &32_100u16.to_le_bytes());
        assert_eq!(&buf[20..22], &[0xFF, 0xFF]);
        assert_eq!(&buf[22..25], &[10, 250, 0]);
        assert_eq!(&buf[25..33], &0.25f64.to_le_bytes());
    }

    #[test]
    fn decode_with_and_without_intensities() {
        for intensities in [true, false] {
            let expected = compact(intensities);
            let mut buf = BytesMut::new();
            encode_compact(&expected, &mut buf).unwrap();
            assert_eq!(buf.len(), wire_size(&expected));

            let decoded = decode_compact(&buf, &properties()).unwrap();
            assert_eq!(decoded, expected);
        }
    }

    #[test]
    fn decode_truncated_record() {
        let result = decode_compact(&[0u8; 20], &properties());
        assert!(matches!(
            result,
            Err(ScanError::Truncated {
                needed: FIXED_SIZE,
                available: 20
            })
        ));
    }

    #[test]
    fn decode_rejects_beam_count_disagreement() {
        let mut buf = BytesMut::new();
        encode_compact(&compact(false), &mut buf).unwrap();
        buf.truncate(buf.len() - 1);
        assert!(matches!(
            decode_compact(&buf, &properties()),
            Err(ScanError::Malformed(_))
        ));

        // Geometry implying five beams against a three-beam record.
        let narrow = ScanProperties {
            angle_increment: 0.25,
            ..properties()
        };
        let mut buf = BytesMut::new();
        encode_compact(&compact(true), &mut buf).unwrap();
        assert!(matches!(
            decode_compact(&buf, &narrow),
            Err(ScanError::Malformed(_))
        ));
    }

    #[test]
    fn decode_rejects_huge_beam_count_without_overflow() {
        let mut buf = BytesMut::new();
        encode_compact(&compact(false), &mut buf).unwrap();
        // Steps close to u32::MAX: the implied record is far larger than the buffer.
        let tiny = ScanProperties {
            angle_increment: 1.0 / 4_000_000_000.0,
            ..properties()
        };
        assert!(matches!(
            decode_compact(&buf, &tiny),
            Err(ScanError::Malformed(_))
        ));
    }

    #[test]
    fn decode_rejects_unusable_increment() {
        let mut buf = BytesMut::new();
        encode_compact(&compact(false), &mut buf).unwrap();
        let props = ScanProperties {
            angle_increment: 0.0,
            ..properties()
        };
        assert!(matches!(
            decode_compact(&buf, &props),
            Err(ScanError::InvalidProperties(_))
        ));
    }

    #[test]
    fn encode_rejects_mismatched_intensities() {
        let mut scan = compact(true);
        scan.encoded_intensities = Some(vec![1]);
        let mut buf = BytesMut::new();
        assert!(matches!(
            encode_compact(&scan, &mut buf),
            Err(ScanError::LengthMismatch { .. })
        ));
        assert!(buf.is_empty());
    }
}
