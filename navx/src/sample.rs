//! Decoded navigation sample

use std::fmt;

use crate::messages::{RawNavFrame, HUNDREDTHS, Q16_16_SCALE, THOUSANDTHS};
use crate::status::{CalibrationStatus, OperationalStatus, SelfTestStatus, SensorStatus};

/// One AHRS position update.
///
/// Holds the raw integer values exactly as transmitted; the accessors apply
/// the per-field scaling. Values are immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationSample {
    yaw: i16,
    pitch: i16,
    roll: i16,
    compass_heading: u16,
    altitude: i32,
    fused_heading: u16,
    accel: [i16; 3],
    velocity: [i32; 3],
    displacement: [i32; 3],
    quaternion: [i16; 4],
    temperature: i16,
    op_status: u8,
    sensor_status: u8,
    cal_status: u8,
    selftest_status: u8,
}

fn q16_16(raw: i32) -> f64 {
    raw as f64 / Q16_16_SCALE
}

impl NavigationSample {
    /// Build a sample from the host-order view of a frame
    pub fn from_raw(raw: &RawNavFrame) -> Self {
        Self {
            yaw: raw.yaw,
            pitch: raw.pitch,
            roll: raw.roll,
            compass_heading: raw.compass_heading,
            altitude: raw.altitude,
            fused_heading: raw.fused_heading,
            accel: [raw.accel_x, raw.accel_y, raw.accel_z],
            velocity: [raw.velocity_x, raw.velocity_y, raw.velocity_z],
            displacement: [raw.displacement_x, raw.displacement_y, raw.displacement_z],
            quaternion: [
                raw.quaternion_w,
                raw.quaternion_x,
                raw.quaternion_y,
                raw.quaternion_z,
            ],
            temperature: raw.temperature,
            op_status: raw.op_status,
            sensor_status: raw.sensor_status,
            cal_status: raw.cal_status,
            selftest_status: raw.selftest_status,
        }
    }

    /// Raw frame carrying the same field values, with an AHRS update header
    pub fn to_raw(&self) -> RawNavFrame {
        RawNavFrame {
            yaw: self.yaw,
            pitch: self.pitch,
            roll: self.roll,
            compass_heading: self.compass_heading,
            altitude: self.altitude,
            fused_heading: self.fused_heading,
            accel_x: self.accel[0],
            accel_y: self.accel[1],
            accel_z: self.accel[2],
            velocity_x: self.velocity[0],
            velocity_y: self.velocity[1],
            velocity_z: self.velocity[2],
            displacement_x: self.displacement[0],
            displacement_y: self.displacement[1],
            displacement_z: self.displacement[2],
            quaternion_w: self.quaternion[0],
            quaternion_x: self.quaternion[1],
            quaternion_y: self.quaternion[2],
            quaternion_z: self.quaternion[3],
            temperature: self.temperature,
            op_status: self.op_status,
            sensor_status: self.sensor_status,
            cal_status: self.cal_status,
            selftest_status: self.selftest_status,
            ..RawNavFrame::default()
        }
    }

    /// Yaw in degrees
    pub fn yaw(&self) -> f64 {
        self.yaw as f64 / HUNDREDTHS
    }

    /// Pitch in degrees
    pub fn pitch(&self) -> f64 {
        self.pitch as f64 / HUNDREDTHS
    }

    /// Roll in degrees
    pub fn roll(&self) -> f64 {
        self.roll as f64 / HUNDREDTHS
    }

    /// Tilt-compensated compass heading in degrees
    pub fn compass_heading(&self) -> f64 {
        self.compass_heading as f64 / HUNDREDTHS
    }

    /// Fused (gyro + magnetometer) heading in degrees
    pub fn fused_heading(&self) -> f64 {
        self.fused_heading as f64 / HUNDREDTHS
    }

    /// Altitude in meters
    pub fn altitude(&self) -> f64 {
        q16_16(self.altitude)
    }

    pub fn accel_x(&self) -> f64 {
        self.accel[0] as f64 / THOUSANDTHS
    }

    pub fn accel_y(&self) -> f64 {
        self.accel[1] as f64 / THOUSANDTHS
    }

    pub fn accel_z(&self) -> f64 {
        self.accel[2] as f64 / THOUSANDTHS
    }

    pub fn velocity_x(&self) -> f64 {
        q16_16(self.velocity[0])
    }

    pub fn velocity_y(&self) -> f64 {
        q16_16(self.velocity[1])
    }

    pub fn velocity_z(&self) -> f64 {
        q16_16(self.velocity[2])
    }

    pub fn displacement_x(&self) -> f64 {
        q16_16(self.displacement[0])
    }

    pub fn displacement_y(&self) -> f64 {
        q16_16(self.displacement[1])
    }

    pub fn displacement_z(&self) -> f64 {
        q16_16(self.displacement[2])
    }

    /// Linear acceleration (x, y, z) in g
    pub fn acceleration(&self) -> (f64, f64, f64) {
        (self.accel_x(), self.accel_y(), self.accel_z())
    }

    /// Velocity (x, y, z) in m/s
    pub fn velocity(&self) -> (f64, f64, f64) {
        (self.velocity_x(), self.velocity_y(), self.velocity_z())
    }

    /// Displacement (x, y, z) in meters
    pub fn displacement(&self) -> (f64, f64, f64) {
        (
            self.displacement_x(),
            self.displacement_y(),
            self.displacement_z(),
        )
    }

    pub fn quaternion_w(&self) -> i16 {
        self.quaternion[0]
    }

    pub fn quaternion_x(&self) -> i16 {
        self.quaternion[1]
    }

    pub fn quaternion_y(&self) -> i16 {
        self.quaternion[2]
    }

    pub fn quaternion_z(&self) -> i16 {
        self.quaternion[3]
    }

    /// Sensor temperature in degrees Celsius
    pub fn temperature(&self) -> f64 {
        self.temperature as f64 / HUNDREDTHS
    }

    pub fn op_status(&self) -> u8 {
        self.op_status
    }

    pub fn sensor_status(&self) -> u8 {
        self.sensor_status
    }

    pub fn cal_status(&self) -> u8 {
        self.cal_status
    }

    pub fn selftest_status(&self) -> u8 {
        self.selftest_status
    }

    // Typed views of the status bytes

    pub fn operational(&self) -> OperationalStatus {
        OperationalStatus::from(self.op_status)
    }

    pub fn sensor_flags(&self) -> SensorStatus {
        SensorStatus::from_bits_retain(self.sensor_status)
    }

    pub fn calibration_flags(&self) -> CalibrationStatus {
        CalibrationStatus::from_bits_retain(self.cal_status)
    }

    pub fn selftest_flags(&self) -> SelfTestStatus {
        SelfTestStatus::from_bits_retain(self.selftest_status)
    }
}

impl fmt::Display for NavigationSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Yaw={:.2}, Pitch={:.2}, Roll={:.2}, Heading={:.2}",
            self.yaw(),
            self.pitch(),
            self.roll(),
            self.fused_heading()
        )
    }
}
