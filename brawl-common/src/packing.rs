//! Frame record packing utilities
//!
//! Converts engine-space f32 vertex data to the 8-byte FGT frame record:
//! - position: f32 → i16 fixed point (1/64 unit per tick)
//! - normal: unit vector → 2-byte spherical (latitude, longitude)
//!
//! Used by both `brawl-export` (asset pipeline) and the runtime decoders.

use std::f32::consts::TAU;

use byteorder::{ByteOrder, LittleEndian};
use glam::Vec3;

// ============================================================================
// Record Constants
// ============================================================================

/// Bytes per vertex per frame in the decoded frame buffer
pub const FRAME_RECORD_SIZE: usize = 8;

/// Fixed-point ticks per world unit
pub const POSITION_SCALE: f32 = 64.0;

/// Latitude byte used for the downward pole `(0, -1, 0)`
pub const SOUTH_POLE_LATITUDE: u8 = 128;

// ============================================================================
// Position Quantization
// ============================================================================

/// Quantize one coordinate to 1/64-unit fixed point.
///
/// Values outside the representable range (±512 units) saturate.
#[inline]
pub fn quantize_position(value: f32) -> i16 {
    (value * POSITION_SCALE)
        .round()
        .clamp(i16::MIN as f32, i16::MAX as f32) as i16
}

/// Convert a fixed-point coordinate back to world units.
#[inline]
pub fn dequantize_position(value: i16) -> f32 {
    value as f32 / POSITION_SCALE
}

// ============================================================================
// Spherical Normal Packing
// ============================================================================

/// Pack an engine-space (Y-up) unit normal into `[longitude, latitude]` bytes.
///
/// Latitude is measured from +Y, longitude around Y starting at +X. Both
/// angles map 0..2π onto 0..255, so latitude only uses 0..=128. Normals
/// pointing straight up or down are stored as exact poles.
pub fn pack_normal_spherical(normal: Vec3) -> [u8; 2] {
    if normal.x == 0.0 && normal.z == 0.0 {
        let lat = if normal.y < 0.0 { SOUTH_POLE_LATITUDE } else { 0 };
        return [0, lat];
    }

    let lat = (normal.y.clamp(-1.0, 1.0).acos() * 255.0 / TAU).round() as i32;
    let lon = (normal.z.atan2(normal.x) * 255.0 / TAU).round() as i32;
    [lon.rem_euclid(256) as u8, lat.rem_euclid(256) as u8]
}

/// Unpack `[longitude, latitude]` bytes into an engine-space unit normal.
pub fn unpack_normal_spherical(packed: [u8; 2]) -> Vec3 {
    let [lon, lat] = packed;
    if lat == SOUTH_POLE_LATITUDE && lon == 0 {
        return Vec3::new(0.0, -1.0, 0.0);
    }

    let theta = lat as f32 / 255.0 * TAU;
    let phi = lon as f32 / 255.0 * TAU;
    let (sin_theta, cos_theta) = theta.sin_cos();
    let (sin_phi, cos_phi) = phi.sin_cos();
    Vec3::new(sin_theta * cos_phi, cos_theta, sin_theta * sin_phi)
}

// ============================================================================
// Frame Record
// ============================================================================

/// One vertex of one animation frame, as stored in the decoded frame buffer.
///
/// Layout (little-endian): `x:i16 y:i16 z:i16 lon:u8 lat:u8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameRecord {
    pub position: [i16; 3],
    /// `[longitude, latitude]`
    pub normal: [u8; 2],
}

impl FrameRecord {
    /// Quantize an engine-space position and normal.
    pub fn pack(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: [
                quantize_position(position.x),
                quantize_position(position.y),
                quantize_position(position.z),
            ],
            normal: pack_normal_spherical(normal),
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(
            dequantize_position(self.position[0]),
            dequantize_position(self.position[1]),
            dequantize_position(self.position[2]),
        )
    }

    pub fn normal(&self) -> Vec3 {
        unpack_normal_spherical(self.normal)
    }

    pub fn to_bytes(&self) -> [u8; FRAME_RECORD_SIZE] {
        let mut bytes = [0u8; FRAME_RECORD_SIZE];
        LittleEndian::write_i16_into(&self.position, &mut bytes[0..6]);
        bytes[6..8].copy_from_slice(&self.normal);
        bytes
    }

    /// Read a record from the first 8 bytes of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < FRAME_RECORD_SIZE {
            return None;
        }
        let mut position = [0i16; 3];
        LittleEndian::read_i16_into(&bytes[0..6], &mut position);
        Some(Self {
            position,
            normal: [bytes[6], bytes[7]],
        })
    }
}
