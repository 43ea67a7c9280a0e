//! Delta-chain frame coding
//!
//! Each frame starts with a `u16` back-reference:
//! - `0`: keyframe, one full 8-byte record per vertex
//! - `r > 0`: per vertex, `i8` offsets on each axis from frame `r - 1` plus
//!   the 2 normal bytes (5 bytes per vertex)
//!
//! A reference may point at any earlier frame, not just the previous one, so
//! holds and loops can all hang off one shared pose. Normals are never
//! delta-coded.

use crate::cursor::{ByteCursor, ByteWriter};
use crate::error::{FormatError, Result};
use crate::packing::{FRAME_RECORD_SIZE, FrameRecord};

/// Bytes per vertex in a delta frame
const DELTA_RECORD_SIZE: usize = 5;

/// Upper bound on a delta-coded payload: every frame stored as a keyframe.
pub fn delta_payload_capacity(vertex_count: usize, frame_count: usize) -> usize {
    frame_count * (2 + vertex_count * FRAME_RECORD_SIZE)
}

fn record_at(frames: &[u8], vertex_count: usize, frame: usize, vertex: usize) -> FrameRecord {
    let offset = (frame * vertex_count + vertex) * FRAME_RECORD_SIZE;
    frames
        .get(offset..)
        .and_then(FrameRecord::from_bytes)
        .unwrap_or_default()
}

/// Sum of absolute axis offsets from `base` to `frame`, or `None` if any
/// offset overflows a signed byte.
fn delta_cost(frames: &[u8], vertex_count: usize, base: usize, frame: usize) -> Option<u64> {
    let mut cost = 0u64;
    for v in 0..vertex_count {
        let from = record_at(frames, vertex_count, base, v);
        let to = record_at(frames, vertex_count, frame, v);
        for axis in 0..3 {
            let d = to.position[axis] as i32 - from.position[axis] as i32;
            if d < i8::MIN as i32 || d > i8::MAX as i32 {
                return None;
            }
            cost += d.unsigned_abs() as u64;
        }
    }
    Some(cost)
}

/// Choose a back-reference for every frame.
///
/// Frame `i` references the earlier frame with the smallest total offset that
/// still fits in signed bytes (earliest wins ties), or becomes a keyframe if
/// none does.
pub fn plan_references(frames: &[u8], vertex_count: usize, frame_count: usize) -> Vec<u16> {
    let mut references = Vec::with_capacity(frame_count);
    for frame in 0..frame_count {
        let mut best: Option<(usize, u64)> = None;
        for base in 0..frame {
            let Some(cost) = delta_cost(frames, vertex_count, base, frame) else {
                continue;
            };
            if best.is_none_or(|(_, best_cost)| cost < best_cost) {
                best = Some((base, cost));
            }
        }
        // References are stored as base + 1 in a u16
        let reference = match best {
            Some((base, _)) if base < u16::MAX as usize => base as u16 + 1,
            _ => 0,
        };
        references.push(reference);
    }
    references
}

/// Delta-code a frame buffer using the given per-frame references.
pub fn encode_delta_frames(
    frames: &[u8],
    vertex_count: usize,
    references: &[u16],
) -> Result<Vec<u8>> {
    let frame_size = vertex_count * FRAME_RECORD_SIZE;
    let frame_count = references.len();
    if frames.len() != frame_size * frame_count {
        return Err(FormatError::BufferSize {
            what: "frame",
            expected: frame_size * frame_count,
            actual: frames.len(),
        });
    }

    let mut w = ByteWriter::with_capacity(frames.len() + frame_count * 2);
    for (frame, &reference) in references.iter().enumerate() {
        w.write_u16(reference);

        if reference == 0 {
            w.write_bytes(&frames[frame * frame_size..(frame + 1) * frame_size]);
            continue;
        }

        let base = reference as usize - 1;
        if base >= frame {
            return Err(FormatError::InvalidFrameReference {
                frame,
                reference: base,
            });
        }

        for vertex in 0..vertex_count {
            let from = record_at(frames, vertex_count, base, vertex);
            let to = record_at(frames, vertex_count, frame, vertex);
            for axis in 0..3 {
                let delta = to.position[axis] as i32 - from.position[axis] as i32;
                let delta = i8::try_from(delta).map_err(|_| FormatError::DeltaOutOfRange {
                    frame,
                    vertex,
                    delta,
                })?;
                w.write_i8(delta);
            }
            w.write_bytes(&to.normal);
        }
    }

    Ok(w.into_inner())
}

/// Rebuild the flat frame buffer from a delta-coded payload.
///
/// Single forward pass: every referenced frame must already be decoded.
pub fn decode_delta_frames(
    payload: &[u8],
    vertex_count: usize,
    frame_count: usize,
) -> Result<Vec<u8>> {
    let frame_size = vertex_count * FRAME_RECORD_SIZE;
    let mut out = Vec::with_capacity(frame_size * frame_count);
    let mut c = ByteCursor::new(payload);

    for frame in 0..frame_count {
        let reference = c.read_u16()?;

        if reference == 0 {
            out.extend_from_slice(c.read_bytes(frame_size)?);
            continue;
        }

        let base = reference as usize - 1;
        if base >= frame {
            return Err(FormatError::InvalidFrameReference {
                frame,
                reference: base,
            });
        }

        let deltas = c.read_bytes(vertex_count * DELTA_RECORD_SIZE)?;
        for (vertex, delta) in deltas.chunks_exact(DELTA_RECORD_SIZE).enumerate() {
            let from = record_at(&out, vertex_count, base, vertex);
            let record = FrameRecord {
                position: [
                    from.position[0].wrapping_add(delta[0] as i8 as i16),
                    from.position[1].wrapping_add(delta[1] as i8 as i16),
                    from.position[2].wrapping_add(delta[2] as i8 as i16),
                ],
                normal: [delta[3], delta[4]],
            };
            out.extend_from_slice(&record.to_bytes());
        }
    }

    if c.remaining() != 0 {
        return Err(FormatError::PayloadSize {
            expected: c.offset(),
            actual: payload.len(),
        });
    }

    tracing::debug!(
        frame_count,
        vertex_count,
        payload = payload.len(),
        decoded = out.len(),
        "delta frames decoded"
    );

    Ok(out)
}
