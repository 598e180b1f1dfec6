//! Status bytes reported at the tail of every AHRS position update

use bitflags::bitflags;

/// Operational state of the sensor (status byte 58)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationalStatus {
    Initializing,
    SelfTest,
    Error,
    ImuAutoCalibrating,
    Normal,
    /// Value outside the documented range
    Unknown(u8),
}

impl From<u8> for OperationalStatus {
    fn from(value: u8) -> Self {
        match value {
            0x00 => OperationalStatus::Initializing,
            0x01 => OperationalStatus::SelfTest,
            0x02 => OperationalStatus::Error,
            0x03 => OperationalStatus::ImuAutoCalibrating,
            0x04 => OperationalStatus::Normal,
            other => OperationalStatus::Unknown(other),
        }
    }
}

bitflags! {
    /// Sensor status flags (status byte 59)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SensorStatus: u8 {
        const MOVING = 0x01;
        const YAW_STABLE = 0x02;
        const MAG_DISTURBANCE = 0x04;
        const ALTITUDE_VALID = 0x08;
        const SEA_LEVEL_PRESSURE_SET = 0x10;
        const FUSED_HEADING_VALID = 0x20;
    }
}

bitflags! {
    /// Calibration status flags (status byte 60)
    ///
    /// The low two bits carry the IMU calibration state, see
    /// [`imu_calibration`](Self::imu_calibration).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CalibrationStatus: u8 {
        const IMU_CAL_STATE = 0x03;
        const MAG_CAL_COMPLETE = 0x04;
        const BARO_CAL_COMPLETE = 0x08;
    }
}

/// IMU calibration progress decoded from [`CalibrationStatus`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImuCalibration {
    InProgress,
    Accumulating,
    Complete,
    Reserved,
}

impl CalibrationStatus {
    pub fn imu_calibration(&self) -> ImuCalibration {
        match self.bits() & Self::IMU_CAL_STATE.bits() {
            0 => ImuCalibration::InProgress,
            1 => ImuCalibration::Accumulating,
            2 => ImuCalibration::Complete,
            _ => ImuCalibration::Reserved,
        }
    }
}

bitflags! {
    /// Self-test result flags (status byte 61)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SelfTestStatus: u8 {
        const GYRO_PASSED = 0x01;
        const ACCEL_PASSED = 0x02;
        const MAG_PASSED = 0x04;
        const BARO_PASSED = 0x08;
        const COMPLETE = 0x80;
    }
}
