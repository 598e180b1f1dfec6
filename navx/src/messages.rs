//! Wire layout of the navX AHRS position update frame
//!
//! Every frame starts with a `!` marker, carries its length in byte 2 and is
//! terminated by a carriage return at that offset. Multi-byte payload fields
//! are little-endian. The two ASCII checksum characters that precede the
//! terminator are not validated.

use bytemuck::{Pod, Zeroable};

/// Frame start marker (`!`)
pub const MARKER: u8 = 0x21;

/// Frame terminator (carriage return), located at offset `length`
pub const TERMINATOR: u8 = 0x0D;

/// Line feed emitted after the terminator by the device
pub const LINE_FEED: u8 = 0x0A;

/// Offset of the length byte within a frame
pub const LENGTH_OFFSET: usize = 2;

/// Binary packet indicator at offset 1
pub const BINARY_PACKET_INDICATOR: u8 = b'#';

/// Message id of the AHRS position update at offset 3
pub const AHRS_POS_UPDATE_ID: u8 = b'a';

/// Value of the length byte for an AHRS position update (payload + checksum chars)
pub const AHRS_POS_UPDATE_LENGTH: u8 = 64;

/// Total bytes on the wire for one AHRS position update (including CR LF)
pub const AHRS_POS_UPDATE_FRAME_SIZE: usize = AHRS_POS_UPDATE_LENGTH as usize + 2;

/// Divisor for heading, attitude and temperature fields
pub const HUNDREDTHS: f64 = 100.0;

/// Divisor for acceleration fields (milli-g)
pub const THOUSANDTHS: f64 = 1000.0;

/// Divisor for Q16.16 fixed-point fields
pub const Q16_16_SCALE: f64 = 65536.0;

/// Raw AHRS position update frame, header through status bytes.
///
/// Fields hold host-order values; use [`from_wire`](Self::from_wire) and
/// [`to_wire`](Self::to_wire) to move between this view and frame bytes.
///
/// Total size: 62 bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C, packed)]
pub struct RawNavFrame {
    /// Frame start marker (1 byte)
    pub marker: u8,
    /// Binary packet indicator (1 byte)
    pub packet_type: u8,
    /// Length byte, offset of the terminator (1 byte)
    pub length: u8,
    /// Message id (1 byte)
    pub message_id: u8,
    /// Yaw, hundredths of a degree
    pub yaw: i16,
    /// Pitch, hundredths of a degree
    pub pitch: i16,
    /// Roll, hundredths of a degree
    pub roll: i16,
    /// Tilt-compensated compass heading, hundredths of a degree
    pub compass_heading: u16,
    /// Altitude, Q16.16 meters
    pub altitude: i32,
    /// Fused heading, hundredths of a degree
    pub fused_heading: u16,
    /// Linear acceleration X, milli-g
    pub accel_x: i16,
    /// Linear acceleration Y, milli-g
    pub accel_y: i16,
    /// Linear acceleration Z, milli-g
    pub accel_z: i16,
    /// Velocity X, Q16.16 m/s
    pub velocity_x: i32,
    /// Velocity Y, Q16.16 m/s
    pub velocity_y: i32,
    /// Velocity Z, Q16.16 m/s
    pub velocity_z: i32,
    /// Displacement X, Q16.16 meters
    pub displacement_x: i32,
    /// Displacement Y, Q16.16 meters
    pub displacement_y: i32,
    /// Displacement Z, Q16.16 meters
    pub displacement_z: i32,
    /// Quaternion W, raw
    pub quaternion_w: i16,
    /// Quaternion X, raw
    pub quaternion_x: i16,
    /// Quaternion Y, raw
    pub quaternion_y: i16,
    /// Quaternion Z, raw
    pub quaternion_z: i16,
    /// Temperature, hundredths of a degree Celsius
    pub temperature: i16,
    /// Operational status (1 byte)
    pub op_status: u8,
    /// Sensor status flags (1 byte)
    pub sensor_status: u8,
    /// Calibration status flags (1 byte)
    pub cal_status: u8,
    /// Self-test status flags (1 byte)
    pub selftest_status: u8,
}

impl RawNavFrame {
    /// Bytes covered by the fixed layout; shorter frames cannot be decoded
    pub const SIZE: usize = 62;

    /// Read the fixed layout from the first [`SIZE`](Self::SIZE) bytes of `bytes`.
    ///
    /// Returns None if fewer bytes are supplied.
    pub fn from_wire(bytes: &[u8]) -> Option<Self> {
        let bytes = bytes.get(..Self::SIZE)?;
        let raw: Self = bytemuck::pod_read_unaligned(bytes);
        Some(raw.swap_le())
    }

    /// Wire bytes for this layout (little-endian fields)
    pub fn to_wire(&self) -> [u8; Self::SIZE] {
        let le = self.swap_le();
        let mut out = [0u8; Self::SIZE];
        out.copy_from_slice(bytemuck::bytes_of(&le));
        out
    }

    /// Convert every multi-byte field between host and little-endian order.
    ///
    /// The conversion is its own inverse, and a no-op on little-endian hosts.
    fn swap_le(self) -> Self {
        Self {
            yaw: i16::from_le(self.yaw),
            pitch: i16::from_le(self.pitch),
            roll: i16::from_le(self.roll),
            compass_heading: u16::from_le(self.compass_heading),
            altitude: i32::from_le(self.altitude),
            fused_heading: u16::from_le(self.fused_heading),
            accel_x: i16::from_le(self.accel_x),
            accel_y: i16::from_le(self.accel_y),
            accel_z: i16::from_le(self.accel_z),
            velocity_x: i32::from_le(self.velocity_x),
            velocity_y: i32::from_le(self.velocity_y),
            velocity_z: i32::from_le(self.velocity_z),
            displacement_x: i32::from_le(self.displacement_x),
            displacement_y: i32::from_le(self.displacement_y),
            displacement_z: i32::from_le(self.displacement_z),
            quaternion_w: i16::from_le(self.quaternion_w),
            quaternion_x: i16::from_le(self.quaternion_x),
            quaternion_y: i16::from_le(self.quaternion_y),
            quaternion_z: i16::from_le(self.quaternion_z),
            temperature: i16::from_le(self.temperature),
            ..self
        }
    }
}

impl Default for RawNavFrame {
    fn default() -> Self {
        Self {
            marker: MARKER,
            packet_type: BINARY_PACKET_INDICATOR,
            length: AHRS_POS_UPDATE_LENGTH,
            message_id: AHRS_POS_UPDATE_ID,
            ..<Self as Zeroable>::zeroed()
        }
    }
}

// SAFETY: RawNavFrame is repr(C, packed) and all fields are Pod
unsafe impl Pod for RawNavFrame {}
// SAFETY: RawNavFrame is repr(C, packed) and all fields are Zeroable
unsafe impl Zeroable for RawNavFrame {}

/// Build a complete AHRS position update as the device sends it.
///
/// The header bytes are forced to the AHRS position update values, so the
/// result always carries a valid marker, length and terminator. Checksum
/// characters are written as ASCII `"00"`.
pub fn encode_frame(raw: &RawNavFrame) -> Vec<u8> {
    let header = RawNavFrame {
        marker: MARKER,
        packet_type: BINARY_PACKET_INDICATOR,
        length: AHRS_POS_UPDATE_LENGTH,
        message_id: AHRS_POS_UPDATE_ID,
        ..*raw
    };

    let mut frame = Vec::with_capacity(AHRS_POS_UPDATE_FRAME_SIZE);
    frame.extend_from_slice(&header.to_wire());
    frame.extend_from_slice(b"00");
    frame.push(TERMINATOR);
    frame.push(LINE_FEED);
    frame
}
