//! Tests for the fighter format

use super::*;
use crate::cursor::ByteWriter;
use crate::error::FormatError;
use crate::packing::{FRAME_RECORD_SIZE, FrameRecord};

/// Four-vertex fighter whose frames drift slowly, with one large jump at
/// frame 3 and a return to the rest pose at frame 4.
fn sample_frames() -> Vec<Vec<FrameRecord>> {
    let record = |position: [i16; 3], normal: [u8; 2]| FrameRecord { position, normal };
    let rest = vec![
        record([0, 0, 0], [0, 0]),
        record([64, 0, 0], [10, 60]),
        record([64, 64, 0], [20, 61]),
        record([0, 64, -64], [30, 128]),
    ];
    let shifted = |dx: i16, dy: i16| -> Vec<FrameRecord> {
        rest.iter()
            .map(|r| FrameRecord {
                position: [r.position[0] + dx, r.position[1] + dy, r.position[2]],
                normal: [r.normal[0].wrapping_add(1), r.normal[1]],
            })
            .collect()
    };
    vec![
        rest.clone(),
        shifted(3, -2),
        shifted(6, -4),
        shifted(900, 0),
        rest.clone(),
    ]
}

fn sample_model() -> FighterModel {
    FighterModel::from_parts(
        &sample_frames(),
        &[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
        &[0, 2, 1, 0, 3, 2],
        vec![AnimationCue::new(0, 3, 20), AnimationCue::new(3, 2, 80)],
    )
    .unwrap()
}

// ========================================================================
// Header Tests
// ========================================================================

#[test]
fn test_fighter_header_roundtrip() {
    let header = FighterHeader::new(FGT_MAGIC_RAW, 90, 512);
    let parsed = FighterHeader::from_bytes(&header.to_bytes()).unwrap();
    assert_eq!(parsed, header);
    assert!(!parsed.is_flagged());
    assert!(parsed.is_known());
    assert_eq!(parsed.frame_size(), 512 * 8);
    assert_eq!(parsed.frames_size(), 90 * 512 * 8);
}

#[test]
fn test_fighter_header_unknown_magic() {
    let header = FighterHeader::new(*b"MD3 ", 1, 1);
    assert!(!header.is_known());
}

// ========================================================================
// Model Tests
// ========================================================================

#[test]
fn test_model_size_invariants() {
    let model = sample_model();
    assert_eq!(model.frame_count, 5);
    assert_eq!(model.vertex_count, 4);
    assert_eq!(
        model.frames.len(),
        model.vertex_count as usize * 8 * model.frame_count as usize
    );
    assert_eq!(model.index_count(), 6);
    for cue in &model.animations {
        assert!(cue.end() < model.frame_count as u32);
    }
}

#[test]
fn test_model_accessors() {
    let model = sample_model();
    let frames = sample_frames();

    assert_eq!(model.frame_records(3).unwrap(), frames[3]);
    assert_eq!(model.frame(1).unwrap().len(), 4 * FRAME_RECORD_SIZE);
    assert!(model.frame(5).is_none());
    assert_eq!(model.uvs()[2], [1.0, 1.0]);
    assert_eq!(model.indices_u16(), vec![0, 2, 1, 0, 3, 2]);
}

#[test]
fn test_model_rejects_ragged_frames() {
    let mut frames = sample_frames();
    frames[2].pop();
    let result = FighterModel::from_parts(&frames, &[[0.0; 2]; 4], &[], vec![]);
    assert!(matches!(result, Err(FormatError::BufferSize { what: "frame", .. })));
}

#[test]
fn test_model_rejects_cue_past_last_frame() {
    let result = FighterModel::from_parts(
        &sample_frames(),
        &[[0.0; 2]; 4],
        &[],
        vec![AnimationCue::new(3, 3, 10)],
    );
    assert!(matches!(
        result,
        Err(FormatError::CueOutOfRange {
            index: 0,
            start: 3,
            length: 3,
            frame_count: 5,
        })
    ));
}

#[test]
fn test_model_accepts_zero_length_cue_on_existing_frame() {
    let model = FighterModel::from_parts(
        &sample_frames(),
        &[[0.0; 2]; 4],
        &[],
        vec![AnimationCue::new(4, 0, 10)],
    )
    .unwrap();
    let decoded = decode_fighter(&encode_fighter(&model, FrameEncoding::Raw).unwrap()).unwrap();
    assert_eq!(decoded.animations, vec![AnimationCue::new(4, 0, 10)]);

    let result = FighterModel::from_parts(
        &sample_frames(),
        &[[0.0; 2]; 4],
        &[],
        vec![AnimationCue::new(5, 0, 10)],
    );
    assert!(matches!(
        result,
        Err(FormatError::CueOutOfRange {
            start: 5,
            length: 0,
            ..
        })
    ));
}

// ========================================================================
// Raw Container Tests
// ========================================================================

#[test]
fn test_raw_layout() {
    let model = sample_model();
    let bytes = encode_fighter(&model, FrameEncoding::Raw).unwrap();

    assert_eq!(&bytes[0..4], b"FGTR");
    assert_eq!(u16::from_le_bytes([bytes[4], bytes[5]]), 5);
    assert_eq!(u16::from_le_bytes([bytes[6], bytes[7]]), 4);
    // header + frames + uv + index count + indices + anim count + anims
    let expected = 8 + 5 * 4 * 8 + 4 * 8 + 2 + 6 * 2 + 2 + 2 * 6;
    assert_eq!(bytes.len(), expected);
    // frame block starts right after the header, no flags byte
    assert_eq!(&bytes[8..8 + model.frames.len()], model.frames.as_slice());
}

#[test]
fn test_raw_decode() {
    let model = sample_model();
    let decoded = decode_fighter(&encode_fighter(&model, FrameEncoding::Raw).unwrap()).unwrap();
    assert_eq!(decoded, model);
    assert_eq!(decoded.animations[1], AnimationCue::new(3, 2, 80));
}

#[test]
fn test_decode_truncated_fails() {
    let bytes = encode_fighter(&sample_model(), FrameEncoding::Raw).unwrap();
    for cut in [3, 8, 50, bytes.len() - 1] {
        let result = decode_fighter(&bytes[..cut]);
        assert!(
            matches!(result, Err(FormatError::UnexpectedEof { .. })),
            "cut at {}",
            cut
        );
    }
}

#[test]
fn test_decode_bad_magic() {
    let mut bytes = encode_fighter(&sample_model(), FrameEncoding::Raw).unwrap();
    bytes[3] = b'X';
    assert!(matches!(decode_fighter(&bytes), Err(FormatError::BadMagic { .. })));
}

#[test]
fn test_decode_rejects_cue_out_of_range() {
    let mut bytes = encode_fighter(&sample_model(), FrameEncoding::Raw).unwrap();
    // Last cue's start field: 6 bytes from the end
    let at = bytes.len() - 6;
    bytes[at..at + 2].copy_from_slice(&4u16.to_le_bytes());
    assert!(matches!(
        decode_fighter(&bytes),
        Err(FormatError::CueOutOfRange { index: 1, .. })
    ));
}

// ========================================================================
// Delta Chain Tests
// ========================================================================

#[test]
fn test_plan_references() {
    let model = sample_model();
    let refs = plan_references(&model.frames, 4, 5);
    // frame 0 has nothing to reference
    assert_eq!(refs[0], 0);
    // small drifts reference the closest earlier pose
    assert_eq!(refs[1], 1);
    assert_eq!(refs[2], 2);
    // +900 on x cannot be expressed in a signed byte
    assert_eq!(refs[3], 0);
    // the rest pose comes back exactly: frame 0, not frame 3
    assert_eq!(refs[4], 1);
}

#[test]
fn test_delta_roundtrip_planned() {
    let model = sample_model();
    let refs = plan_references(&model.frames, 4, 5);
    let coded = encode_delta_frames(&model.frames, 4, &refs).unwrap();
    let decoded = decode_delta_frames(&coded, 4, 5).unwrap();
    assert_eq!(decoded, model.frames);
}

#[test]
fn test_delta_roundtrip_shared_pose() {
    // Every non-key frame hangs off frame 0 rather than its predecessor
    let model = sample_model();
    let refs = [0, 1, 1, 0, 1];
    let coded = encode_delta_frames(&model.frames, 4, &refs).unwrap();

    // 3 delta frames of 4 × 5 bytes, 2 keyframes of 4 × 8 bytes, 5 refs
    assert_eq!(coded.len(), 5 * 2 + 2 * 4 * 8 + 3 * 4 * 5);
    assert_eq!(decode_delta_frames(&coded, 4, 5).unwrap(), model.frames);
}

/// Reproducible xorshift source for generated frame sets.
struct Rng(u32);

impl Rng {
    fn next(&mut self) -> u32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        x
    }

    fn below(&mut self, bound: u32) -> u32 {
        self.next() % bound
    }

    fn delta(&mut self) -> i16 {
        self.below(256) as i16 - 128
    }
}

/// Random frames together with a random valid reference table: frame `i`
/// references anything in `{0} ∪ [1, i]`, and delta frames stay within a
/// signed byte of their base.
fn generated_chain(rng: &mut Rng) -> (Vec<Vec<FrameRecord>>, Vec<u16>) {
    let vertex_count = 1 + rng.below(6) as usize;
    let frame_count = 1 + rng.below(10) as usize;
    let mut frames: Vec<Vec<FrameRecord>> = Vec::with_capacity(frame_count);
    let mut references = Vec::with_capacity(frame_count);

    for frame in 0..frame_count {
        let reference = rng.below(frame as u32 + 1) as u16;
        let pose = (0..vertex_count)
            .map(|vertex| {
                let position = if reference == 0 {
                    [0; 3].map(|_| rng.below(8000) as i16 - 4000)
                } else {
                    frames[reference as usize - 1][vertex]
                        .position
                        .map(|p| p + rng.delta())
                };
                FrameRecord {
                    position,
                    normal: [rng.below(256) as u8, rng.below(256) as u8],
                }
            })
            .collect();
        frames.push(pose);
        references.push(reference);
    }
    (frames, references)
}

fn flatten(frames: &[Vec<FrameRecord>]) -> Vec<u8> {
    frames.iter().flatten().flat_map(|r| r.to_bytes()).collect()
}

#[test]
fn test_delta_roundtrip_generated_chains() {
    let mut rng = Rng(0x9E37_79B9);
    for case in 0..200 {
        let (frames, references) = generated_chain(&mut rng);
        let vertex_count = frames[0].len();
        let frame_count = frames.len();
        let flat = flatten(&frames);

        let coded = encode_delta_frames(&flat, vertex_count, &references).unwrap();
        let decoded = decode_delta_frames(&coded, vertex_count, frame_count).unwrap();
        assert_eq!(decoded, flat, "case {} references {:?}", case, references);

        let planned = plan_references(&flat, vertex_count, frame_count);
        let coded = encode_delta_frames(&flat, vertex_count, &planned).unwrap();
        let decoded = decode_delta_frames(&coded, vertex_count, frame_count).unwrap();
        assert_eq!(decoded, flat, "case {} planned {:?}", case, planned);
    }
}

#[test]
fn test_flagged_roundtrip_generated_chains() {
    let mut rng = Rng(0x2545_F491);
    for case in 0..50 {
        let (frames, references) = generated_chain(&mut rng);
        let vertex_count = frames[0].len();
        let model =
            FighterModel::from_parts(&frames, &vec![[0.0; 2]; vertex_count], &[], vec![]).unwrap();

        for encoding in [FrameEncoding::Delta, FrameEncoding::DeltaZstd] {
            let options = FrameBlockOptions {
                encoding,
                references: Some(references.clone()),
                ..FrameBlockOptions::default()
            };
            let mut w = ByteWriter::new();
            write_fighter(&mut w, &model, &options).unwrap();
            let decoded = decode_fighter(w.as_bytes()).unwrap();
            assert_eq!(decoded, model, "case {} {}", case, encoding);
        }
    }
}

#[test]
fn test_delta_all_keyframes() {
    let model = sample_model();
    let coded = encode_delta_frames(&model.frames, 4, &[0; 5]).unwrap();
    assert_eq!(decode_delta_frames(&coded, 4, 5).unwrap(), model.frames);
}

#[test]
fn test_delta_encode_rejects_overflow() {
    let model = sample_model();
    // frame 3 is 900 ticks away from frame 2
    let result = encode_delta_frames(&model.frames, 4, &[0, 1, 2, 3, 1]);
    assert!(matches!(result, Err(FormatError::DeltaOutOfRange { frame: 3, .. })));
}

#[test]
fn test_delta_encode_rejects_forward_reference() {
    let model = sample_model();
    let result = encode_delta_frames(&model.frames, 4, &[0, 2, 0, 0, 0]);
    assert!(matches!(
        result,
        Err(FormatError::InvalidFrameReference {
            frame: 1,
            reference: 1,
        })
    ));
}

#[test]
fn test_delta_decode_rejects_forward_reference() {
    // One vertex, two frames; frame 1 references itself
    let mut w = ByteWriter::new();
    w.write_u16(0);
    w.write_bytes(&FrameRecord::default().to_bytes());
    w.write_u16(2);
    w.write_bytes(&[1, 1, 1, 0, 0]);

    let result = decode_delta_frames(w.as_bytes(), 1, 2);
    assert!(matches!(
        result,
        Err(FormatError::InvalidFrameReference {
            frame: 1,
            reference: 1,
        })
    ));
}

#[test]
fn test_delta_decode_rejects_trailing_bytes() {
    let model = sample_model();
    let mut coded = encode_delta_frames(&model.frames, 4, &[0; 5]).unwrap();
    coded.push(0);
    assert!(matches!(
        decode_delta_frames(&coded, 4, 5),
        Err(FormatError::PayloadSize { .. })
    ));
}

// ========================================================================
// Flagged Container Tests
// ========================================================================

#[test]
fn test_flagged_roundtrips() {
    let model = sample_model();
    for encoding in [
        FrameEncoding::Delta,
        FrameEncoding::Zstd,
        FrameEncoding::DeltaZstd,
    ] {
        let bytes = encode_fighter(&model, encoding).unwrap();
        assert_eq!(&bytes[0..4], b"FGTZ");
        assert_eq!(bytes[8], encoding.flags().unwrap().bits());

        let decoded = decode_fighter(&bytes).unwrap();
        assert_eq!(decoded, model, "{} roundtrip", encoding);
    }
}

#[test]
fn test_flagged_length_prefix() {
    let model = sample_model();
    let bytes = encode_fighter(&model, FrameEncoding::Delta).unwrap();
    let length = i32::from_le_bytes([bytes[9], bytes[10], bytes[11], bytes[12]]) as usize;

    let refs = plan_references(&model.frames, 4, 5);
    let coded = encode_delta_frames(&model.frames, 4, &refs).unwrap();
    assert_eq!(length, coded.len());
    assert_eq!(&bytes[13..13 + length], coded.as_slice());
}

#[test]
fn test_flagged_without_bits_is_raw_payload() {
    let model = sample_model();
    let mut w = ByteWriter::new();
    w.write_bytes(&FighterHeader::new(FGT_MAGIC_FLAGGED, 5, 4).to_bytes());
    w.write_u8(0);
    w.write_i32(model.frames.len() as i32);
    w.write_bytes(&model.frames);
    w.write_bytes(&model.uv);
    w.write_u16(0);
    w.write_u16(0);

    let decoded = decode_fighter(w.as_bytes()).unwrap();
    assert_eq!(decoded.frames, model.frames);
    assert_eq!(decoded.index_count(), 0);
    assert!(decoded.animations.is_empty());
}

#[test]
fn test_flagged_wrong_payload_size() {
    let model = sample_model();
    let mut w = ByteWriter::new();
    w.write_bytes(&FighterHeader::new(FGT_MAGIC_FLAGGED, 5, 4).to_bytes());
    w.write_u8(0);
    w.write_i32(8);
    w.write_bytes(&model.frames[..8]);

    assert!(matches!(
        decode_fighter(w.as_bytes()),
        Err(FormatError::PayloadSize {
            expected: 160,
            actual: 8,
        })
    ));
}

#[test]
fn test_flagged_negative_length() {
    let mut w = ByteWriter::new();
    w.write_bytes(&FighterHeader::new(FGT_MAGIC_FLAGGED, 1, 1).to_bytes());
    w.write_u8(FrameBlockFlags::ZSTD.bits());
    w.write_i32(-4);
    assert!(matches!(
        decode_fighter(w.as_bytes()),
        Err(FormatError::NegativeLength(-4))
    ));
}

/// Flagged single-frame, single-vertex file whose zstd payload inflates to
/// far more than the 8 bytes the header allows.
fn oversized_zstd_fighter(flags: FrameBlockFlags) -> Vec<u8> {
    let payload = zstd::bulk::compress(&vec![0u8; 1 << 20], 19).unwrap();
    let mut w = ByteWriter::new();
    w.write_bytes(&FighterHeader::new(FGT_MAGIC_FLAGGED, 1, 1).to_bytes());
    w.write_u8(flags.bits());
    w.write_i32(payload.len() as i32);
    w.write_bytes(&payload);
    w.write_bytes(&[0u8; 8 + 2 + 2]);
    w.into_inner()
}

#[test]
fn test_zstd_payload_is_capped_by_header() {
    let delta_zstd = FrameBlockFlags::DELTA | FrameBlockFlags::ZSTD;
    for flags in [FrameBlockFlags::ZSTD, delta_zstd] {
        let bytes = oversized_zstd_fighter(flags);
        assert!(
            matches!(decode_fighter(&bytes), Err(FormatError::Zstd(_))),
            "{:?}",
            flags
        );
    }
}

#[test]
fn test_explicit_references_are_used() {
    let model = sample_model();
    let options = FrameBlockOptions {
        encoding: FrameEncoding::Delta,
        references: Some(vec![0, 1, 1, 0, 1]),
        ..FrameBlockOptions::default()
    };
    let mut w = ByteWriter::new();
    write_fighter(&mut w, &model, &options).unwrap();

    // frame 2's ref follows the flags/length prefix, keyframe 0 and delta frame 1
    let at = 13 + (2 + 4 * 8) + (2 + 4 * 5);
    let bytes = w.as_bytes();
    assert_eq!(u16::from_le_bytes([bytes[at], bytes[at + 1]]), 1);
    assert_eq!(decode_fighter(w.as_bytes()).unwrap(), model);
}

#[test]
fn test_zstd_shrinks_repetitive_frames() {
    let pose: Vec<FrameRecord> = (0..64)
        .map(|i| FrameRecord {
            position: [i, -i, 2 * i],
            normal: [i as u8, 40],
        })
        .collect();
    let frames = vec![pose; 40];
    let cues = vec![AnimationCue::new(0, 40, 30)];
    let model = FighterModel::from_parts(&frames, &[[0.5; 2]; 64], &[], cues).unwrap();

    let raw = encode_fighter(&model, FrameEncoding::Raw).unwrap();
    let packed = encode_fighter(&model, FrameEncoding::DeltaZstd).unwrap();
    assert!(
        packed.len() < raw.len() / 4,
        "{} vs {}",
        packed.len(),
        raw.len()
    );
    assert_eq!(decode_fighter(&packed).unwrap(), model);
}

#[test]
fn test_frame_encoding_names() {
    for encoding in [
        FrameEncoding::Raw,
        FrameEncoding::Delta,
        FrameEncoding::Zstd,
        FrameEncoding::DeltaZstd,
    ] {
        assert_eq!(encoding.to_string().parse::<FrameEncoding>(), Ok(encoding));
    }
    assert!("lz4".parse::<FrameEncoding>().is_err());
}
