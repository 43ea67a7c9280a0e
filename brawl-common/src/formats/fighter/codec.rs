//! FGT encoder and decoder

use super::frames::{
    decode_delta_frames, delta_payload_capacity, encode_delta_frames, plan_references,
};
use super::header::{FGT_MAGIC_FLAGGED, FGT_MAGIC_RAW, FighterHeader};
use super::types::{AnimationCue, FighterModel, FrameBlockFlags, FrameEncoding};
use crate::cursor::{ByteCursor, ByteWriter};
use crate::error::{FormatError, Result};
use crate::packing::FRAME_RECORD_SIZE;

/// Default zstd level for offline asset builds
pub const DEFAULT_ZSTD_LEVEL: i32 = 19;

/// Frame block settings for [`write_fighter`]
#[derive(Debug, Clone)]
pub struct FrameBlockOptions {
    pub encoding: FrameEncoding,
    pub zstd_level: i32,
    /// Explicit per-frame back-references for delta coding; planned
    /// automatically when `None`
    pub references: Option<Vec<u16>>,
}

impl Default for FrameBlockOptions {
    fn default() -> Self {
        Self {
            encoding: FrameEncoding::Raw,
            zstd_level: DEFAULT_ZSTD_LEVEL,
            references: None,
        }
    }
}

impl From<FrameEncoding> for FrameBlockOptions {
    fn from(encoding: FrameEncoding) -> Self {
        Self {
            encoding,
            ..Self::default()
        }
    }
}

/// Decode a complete FGT asset.
pub fn decode_fighter(data: &[u8]) -> Result<FighterModel> {
    let mut c = ByteCursor::new(data);

    let header = FighterHeader::from_bytes(c.read_bytes(FighterHeader::SIZE)?)
        .ok_or(FormatError::UnexpectedEof {
            offset: 0,
            needed: FighterHeader::SIZE,
            available: data.len(),
        })?;
    if !header.is_known() {
        return Err(FormatError::BadMagic {
            found: header.magic,
            expected: &[&FGT_MAGIC_RAW, &FGT_MAGIC_FLAGGED],
        });
    }

    let vertex_count = header.vertex_count as usize;
    let frame_count = header.frame_count as usize;
    let expected = header.frames_size();

    let frames = if header.is_flagged() {
        read_flagged_frames(&mut c, vertex_count, frame_count)?
    } else {
        c.read_bytes(expected)?.to_vec()
    };
    if frames.len() != expected {
        return Err(FormatError::PayloadSize {
            expected,
            actual: frames.len(),
        });
    }

    let uv = c.read_bytes(vertex_count * 8)?.to_vec();

    let index_count = c.read_u16()? as usize;
    let indices = c.read_bytes(index_count * 2)?.to_vec();

    let anim_count = c.read_u16()? as usize;
    let mut animations = Vec::with_capacity(anim_count);
    for _ in 0..anim_count {
        let start = c.read_u16()?;
        let length = c.read_u16()?;
        let fps = c.read_u16()?;
        animations.push(AnimationCue { start, length, fps });
    }

    let model = FighterModel {
        frame_count: header.frame_count,
        vertex_count: header.vertex_count,
        frames,
        uv,
        indices,
        animations,
    };
    model.validate()?;

    tracing::debug!(
        frames = model.frame_count,
        vertices = model.vertex_count,
        indices = index_count,
        animations = anim_count,
        flagged = header.is_flagged(),
        "decoded fighter"
    );

    Ok(model)
}

fn read_flagged_frames(
    c: &mut ByteCursor<'_>,
    vertex_count: usize,
    frame_count: usize,
) -> Result<Vec<u8>> {
    let raw_flags = c.read_u8()?;
    let flags = FrameBlockFlags::from_bits_truncate(raw_flags);
    if flags.bits() != raw_flags {
        tracing::warn!(raw_flags, "unknown frame block flag bits ignored");
    }

    let length = c.read_i32()?;
    let length = usize::try_from(length).map_err(|_| FormatError::NegativeLength(length))?;
    let payload = c.read_bytes(length)?;

    let unpacked = if flags.contains(FrameBlockFlags::ZSTD) {
        // The header fixes the decoded size; never inflate past it.
        let capacity = if flags.contains(FrameBlockFlags::DELTA) {
            delta_payload_capacity(vertex_count, frame_count)
        } else {
            vertex_count * FRAME_RECORD_SIZE * frame_count
        };
        zstd::bulk::decompress(payload, capacity)?
    } else {
        payload.to_vec()
    };

    if flags.contains(FrameBlockFlags::DELTA) {
        decode_delta_frames(&unpacked, vertex_count, frame_count)
    } else {
        Ok(unpacked)
    }
}

/// Encode a model with the given frame block encoding.
pub fn encode_fighter(model: &FighterModel, encoding: FrameEncoding) -> Result<Vec<u8>> {
    let size = model.frames.len() + model.uv.len() + model.indices.len() + 64;
    let mut w = ByteWriter::with_capacity(size);
    write_fighter(&mut w, model, &encoding.into())?;
    Ok(w.into_inner())
}

/// Append an encoded model to `w`.
pub fn write_fighter(
    w: &mut ByteWriter,
    model: &FighterModel,
    options: &FrameBlockOptions,
) -> Result<()> {
    model.validate()?;
    let vertex_count = model.vertex_count as usize;
    let frame_count = model.frame_count as usize;

    let magic = match options.encoding.flags() {
        None => FGT_MAGIC_RAW,
        Some(_) => FGT_MAGIC_FLAGGED,
    };
    let header = FighterHeader::new(magic, model.frame_count, model.vertex_count);
    w.write_bytes(&header.to_bytes());

    match options.encoding.flags() {
        None => w.write_bytes(&model.frames),
        Some(flags) => {
            let coded = if flags.contains(FrameBlockFlags::DELTA) {
                let planned;
                let references = match &options.references {
                    Some(references) => references.as_slice(),
                    None => {
                        planned = plan_references(&model.frames, vertex_count, frame_count);
                        planned.as_slice()
                    }
                };
                if references.len() != frame_count {
                    return Err(FormatError::PayloadSize {
                        expected: frame_count,
                        actual: references.len(),
                    });
                }
                encode_delta_frames(&model.frames, vertex_count, references)?
            } else {
                model.frames.clone()
            };

            let payload = if flags.contains(FrameBlockFlags::ZSTD) {
                zstd::bulk::compress(&coded, options.zstd_level)?
            } else {
                coded
            };

            let length = i32::try_from(payload.len()).map_err(|_| FormatError::CountOverflow {
                what: "frame block byte",
                count: payload.len(),
            })?;
            w.write_u8(flags.bits());
            w.write_i32(length);
            w.write_bytes(&payload);

            tracing::debug!(
                encoding = %options.encoding,
                raw = model.frames.len(),
                stored = payload.len(),
                "frame block encoded"
            );
        }
    }

    w.write_bytes(&model.uv);

    w.write_u16(model.index_count() as u16);
    w.write_bytes(&model.indices[..model.index_count() * 2]);

    w.write_u16(model.animations.len() as u16);
    for cue in &model.animations {
        w.write_u16(cue.start);
        w.write_u16(cue.length);
        w.write_u16(cue.fps);
    }

    Ok(())
}
