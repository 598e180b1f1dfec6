//! Frame payload decoding

use crate::error::{NavxError, Result};
use crate::messages::RawNavFrame;
use crate::sample::NavigationSample;

/// Decode one frame slice into a [`NavigationSample`].
///
/// `frame` starts at the marker byte. Only the first [`RawNavFrame::SIZE`]
/// bytes are read; trailing checksum characters are ignored. No checksum is
/// verified, so a corrupted payload that passes framing decodes as-is.
///
/// # Errors
/// Returns [`NavxError::FrameTooShort`] if `frame` is shorter than the fixed
/// payload layout.
pub fn decode(frame: &[u8]) -> Result<NavigationSample> {
    let raw = RawNavFrame::from_wire(frame).ok_or(NavxError::FrameTooShort {
        len: frame.len(),
        required: RawNavFrame::SIZE,
    })?;
    Ok(NavigationSample::from_raw(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{encode_frame, AHRS_POS_UPDATE_LENGTH};
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_yaw_from_bytes() {
        let mut frame = vec![0u8; 64];
        frame[4] = 0xD2;
        frame[5] = 0x04;
        let sample = decode(&frame).unwrap();
        assert_relative_eq!(sample.yaw(), 12.34, epsilon = 1e-12);
    }

    #[test]
    fn test_negative_altitude_from_bytes() {
        let mut frame = vec![0u8; 62];
        frame[12..16].copy_from_slice(&(-65536i32).to_le_bytes());
        let sample = decode(&frame).unwrap();
        assert_eq!(sample.altitude(), -1.0);
    }

    #[test]
    fn test_unsigned_fields_from_bytes() {
        let mut frame = vec![0u8; 62];
        // 0xFFFF is 655.35 degrees unsigned, never -0.01
        frame[10] = 0xFF;
        frame[11] = 0xFF;
        frame[16] = 0x28;
        frame[17] = 0x23;
        let sample = decode(&frame).unwrap();
        assert_relative_eq!(sample.compass_heading(), 655.35, epsilon = 1e-12);
        assert_relative_eq!(sample.fused_heading(), 90.0, epsilon = 1e-12);
    }

    #[test]
    fn test_status_bytes_from_bytes() {
        let mut frame = vec![0u8; 62];
        frame[58..62].copy_from_slice(&[4, 0x21, 0x06, 0x8F]);
        let sample = decode(&frame).unwrap();
        assert_eq!(sample.op_status(), 4);
        assert_eq!(sample.sensor_status(), 0x21);
        assert_eq!(sample.cal_status(), 0x06);
        assert_eq!(sample.selftest_status(), 0x8F);
    }

    #[test]
    fn test_short_frame_is_error() {
        let frame = vec![0u8; 61];
        match decode(&frame) {
            Err(NavxError::FrameTooShort { len, required }) => {
                assert_eq!(len, 61);
                assert_eq!(required, 62);
            }
            other => panic!("Expected FrameTooShort, got {other:?}"),
        }
        assert!(decode(&[]).is_err());
    }

    fn put_i16(frame: &mut [u8], offset: usize, value: i16) {
        frame[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
    }

    fn put_u16(frame: &mut [u8], offset: usize, value: u16) {
        frame[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
    }

    fn put_i32(frame: &mut [u8], offset: usize, value: i32) {
        frame[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
    }

    #[test]
    fn test_every_field_at_its_wire_offset() {
        let mut frame = vec![0u8; 62];
        put_i16(&mut frame, 4, 1001);
        put_i16(&mut frame, 6, -2002);
        put_i16(&mut frame, 8, 3003);
        put_u16(&mut frame, 10, 4004);
        put_i32(&mut frame, 12, 5 * 65536 + 32768);
        put_u16(&mut frame, 16, 6006);
        put_i16(&mut frame, 18, 101);
        put_i16(&mut frame, 20, -202);
        put_i16(&mut frame, 22, 303);
        put_i32(&mut frame, 24, 65536);
        put_i32(&mut frame, 28, -2 * 65536);
        put_i32(&mut frame, 32, 3 * 65536 + 16384);
        put_i32(&mut frame, 36, 4 * 65536);
        put_i32(&mut frame, 40, -5 * 65536 - 32768);
        put_i32(&mut frame, 44, 6 * 65536 + 49152);
        put_i16(&mut frame, 48, 16384);
        put_i16(&mut frame, 50, -8192);
        put_i16(&mut frame, 52, 4096);
        put_i16(&mut frame, 54, -2048);
        put_i16(&mut frame, 56, 2512);
        frame[58..62].copy_from_slice(&[0x11, 0x22, 0x33, 0x44]);

        let sample = decode(&frame).unwrap();

        assert_relative_eq!(sample.yaw(), 10.01, epsilon = 1e-12);
        assert_relative_eq!(sample.pitch(), -20.02, epsilon = 1e-12);
        assert_relative_eq!(sample.roll(), 30.03, epsilon = 1e-12);
        assert_relative_eq!(sample.compass_heading(), 40.04, epsilon = 1e-12);
        assert_relative_eq!(sample.altitude(), 5.5, epsilon = 1e-12);
        assert_relative_eq!(sample.fused_heading(), 60.06, epsilon = 1e-12);
        assert_relative_eq!(sample.accel_x(), 0.101, epsilon = 1e-12);
        assert_relative_eq!(sample.accel_y(), -0.202, epsilon = 1e-12);
        assert_relative_eq!(sample.accel_z(), 0.303, epsilon = 1e-12);
        assert_relative_eq!(sample.velocity_x(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(sample.velocity_y(), -2.0, epsilon = 1e-12);
        assert_relative_eq!(sample.velocity_z(), 3.25, epsilon = 1e-12);
        assert_relative_eq!(sample.displacement_x(), 4.0, epsilon = 1e-12);
        assert_relative_eq!(sample.displacement_y(), -5.5, epsilon = 1e-12);
        assert_relative_eq!(sample.displacement_z(), 6.75, epsilon = 1e-12);
        assert_eq!(sample.quaternion_w(), 16384);
        assert_eq!(sample.quaternion_x(), -8192);
        assert_eq!(sample.quaternion_y(), 4096);
        assert_eq!(sample.quaternion_z(), -2048);
        assert_relative_eq!(sample.temperature(), 25.12, epsilon = 1e-12);
        assert_eq!(sample.op_status(), 0x11);
        assert_eq!(sample.sensor_status(), 0x22);
        assert_eq!(sample.cal_status(), 0x33);
        assert_eq!(sample.selftest_status(), 0x44);
    }

    #[test]
    fn test_decode_encoded_frame_within_quantization() {
        let mut rng = StdRng::seed_from_u64(0x6e61_7678);

        let hundredths = |v: f64| (v * 100.0).round() as i16;
        let thousandths = |v: f64| (v * 1000.0).round() as i16;
        let q16 = |v: f64| (v * 65536.0).round() as i32;
        let half_hundredth = 0.005 + 1e-9;
        let half_thousandth = 0.0005 + 1e-9;
        let half_q16 = 0.5 / 65536.0 + 1e-9;

        for _ in 0..200 {
            let attitude: [f64; 3] = std::array::from_fn(|_| rng.random_range(-180.0..180.0));
            let compass: f64 = rng.random_range(0.0..360.0);
            let fused: f64 = rng.random_range(0.0..360.0);
            let altitude: f64 = rng.random_range(-500.0..9000.0);
            let accel: [f64; 3] = std::array::from_fn(|_| rng.random_range(-16.0..16.0));
            let velocity: [f64; 3] = std::array::from_fn(|_| rng.random_range(-100.0..100.0));
            let displacement: [f64; 3] =
                std::array::from_fn(|_| rng.random_range(-1000.0..1000.0));
            let quaternion: [i16; 4] = std::array::from_fn(|_| rng.random());
            let temperature: f64 = rng.random_range(-40.0..85.0);
            let status: [u8; 4] = rng.random();

            let raw = RawNavFrame {
                yaw: hundredths(attitude[0]),
                pitch: hundredths(attitude[1]),
                roll: hundredths(attitude[2]),
                compass_heading: (compass * 100.0).round() as u16,
                altitude: q16(altitude),
                fused_heading: (fused * 100.0).round() as u16,
                accel_x: thousandths(accel[0]),
                accel_y: thousandths(accel[1]),
                accel_z: thousandths(accel[2]),
                velocity_x: q16(velocity[0]),
                velocity_y: q16(velocity[1]),
                velocity_z: q16(velocity[2]),
                displacement_x: q16(displacement[0]),
                displacement_y: q16(displacement[1]),
                displacement_z: q16(displacement[2]),
                quaternion_w: quaternion[0],
                quaternion_x: quaternion[1],
                quaternion_y: quaternion[2],
                quaternion_z: quaternion[3],
                temperature: hundredths(temperature),
                op_status: status[0],
                sensor_status: status[1],
                cal_status: status[2],
                selftest_status: status[3],
                ..Default::default()
            };
            let frame = encode_frame(&raw);
            let sample = decode(&frame[..AHRS_POS_UPDATE_LENGTH as usize]).unwrap();

            assert!((sample.yaw() - attitude[0]).abs() <= half_hundredth);
            assert!((sample.pitch() - attitude[1]).abs() <= half_hundredth);
            assert!((sample.roll() - attitude[2]).abs() <= half_hundredth);
            assert!((sample.compass_heading() - compass).abs() <= half_hundredth);
            assert!((sample.fused_heading() - fused).abs() <= half_hundredth);
            assert!((sample.altitude() - altitude).abs() <= half_q16);
            for (decoded, expected) in [sample.accel_x(), sample.accel_y(), sample.accel_z()]
                .into_iter()
                .zip(accel)
            {
                assert!((decoded - expected).abs() <= half_thousandth);
            }
            for (decoded, expected) in [
                sample.velocity_x(),
                sample.velocity_y(),
                sample.velocity_z(),
                sample.displacement_x(),
                sample.displacement_y(),
                sample.displacement_z(),
            ]
            .into_iter()
            .zip(velocity.into_iter().chain(displacement))
            {
                assert!((decoded - expected).abs() <= half_q16);
            }
            assert_eq!(
                [
                    sample.quaternion_w(),
                    sample.quaternion_x(),
                    sample.quaternion_y(),
                    sample.quaternion_z()
                ],
                quaternion
            );
            assert!((sample.temperature() - temperature).abs() <= half_hundredth);
            assert_eq!(
                [
                    sample.op_status(),
                    sample.sensor_status(),
                    sample.cal_status(),
                    sample.selftest_status()
                ],
                status
            );
        }
    }
}
