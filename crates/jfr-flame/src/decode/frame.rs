//! Conversion of one wire frame record into a [`Frame`].

use super::options::DecodeOptions;
use super::title_pool::{FrameLocation, TitlePool};
use crate::model::{DiffDetails, Frame, FramePosition, FrameSampleTypes, FrameType};
use crate::proto;
use crate::utils::error::DecodeError;

/// Decode a single frame
///
/// Optional sub-messages stay `None` when the wire record does not set them,
/// so "no position" and "position (0, 0)" remain distinguishable.
///
/// # Errors
/// * `DecodeError::TitleIndexOutOfRange` - title not in pool (strict policy)
/// * `DecodeError::NegativeValue` - negative sample or weight count
/// * `DecodeError::IntegerOutOfRange` - value rejected by the integer policy
pub fn decode_frame(
    wire: &proto::Frame,
    pool: &TitlePool<'_>,
    location: FrameLocation,
    options: &DecodeOptions,
) -> Result<Frame, DecodeError> {
    let ints = options.integers;

    let title = pool.resolve(wire.title_index, location)?;
    let self_samples = ints.count("self_samples", wire.self_samples)?;

    Ok(Frame {
        left_samples: ints.count("left_samples", wire.left_samples)?,
        total_samples: ints.count("total_samples", wire.total_samples)?,
        title: title.to_string(),
        frame_type: FrameType::from_wire(wire.r#type),
        left_weight: ints.count("left_weight", wire.left_weight)?,
        total_weight: ints.count("total_weight", wire.total_weight)?,
        self_samples: (self_samples > 0).then_some(self_samples),
        position: wire.position.map(|p| FramePosition {
            bci: p.bci,
            line: p.line,
        }),
        sample_types: wire
            .sample_types
            .map(|st| decode_sample_types(&st, options))
            .transpose()?,
        diff_details: wire
            .diff_details
            .map(|d| decode_diff_details(&d, options))
            .transpose()?,
        before_marker: wire.before_marker,
    })
}

fn decode_sample_types(
    wire: &proto::FrameSampleTypes,
    options: &DecodeOptions,
) -> Result<FrameSampleTypes, DecodeError> {
    let ints = options.integers;
    Ok(FrameSampleTypes {
        inlined: ints.count("sample_types.inlined", wire.inlined)?,
        c1: ints.count("sample_types.c1", wire.c1)?,
        interpret: ints.count("sample_types.interpret", wire.interpret)?,
        jit: ints.count("sample_types.jit", wire.jit)?,
    })
}

fn decode_diff_details(
    wire: &proto::DiffDetails,
    options: &DecodeOptions,
) -> Result<DiffDetails, DecodeError> {
    let ints = options.integers;
    Ok(DiffDetails {
        samples: ints.signed("diff_details.samples", wire.samples)?,
        weight: ints.signed("diff_details.weight", wire.weight)?,
        percent_samples: f64::from(wire.percent_samples),
        percent_weight: f64::from(wire.percent_weight),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{IntegerPolicy, TitleIndexPolicy};

    fn titles() -> Vec<String> {
        vec!["all".to_string(), "Main.run".to_string()]
    }

    fn wire_frame() -> proto::Frame {
        proto::Frame {
            left_samples: 4,
            total_samples: 12,
            title_index: 1,
            r#type: proto::FrameType::JitCompiled as i32,
            ..Default::default()
        }
    }

    #[test]
    fn test_decode_minimal_frame() {
        let titles = titles();
        let pool = TitlePool::new(&titles, TitleIndexPolicy::Strict);
        let frame = decode_frame(
            &wire_frame(),
            &pool,
            FrameLocation::default(),
            &DecodeOptions::default(),
        )
        .unwrap();

        assert_eq!(frame.left_samples, 4);
        assert_eq!(frame.total_samples, 12);
        assert_eq!(frame.title, "Main.run");
        assert_eq!(frame.frame_type, FrameType::JitCompiled);
        assert_eq!(frame.left_weight, 0);
        assert_eq!(frame.self_samples, None);
        assert_eq!(frame.position, None);
        assert_eq!(frame.sample_types, None);
        assert_eq!(frame.diff_details, None);
        assert!(!frame.before_marker);
    }

    #[test]
    fn test_zero_position_is_present() {
        let titles = titles();
        let pool = TitlePool::new(&titles, TitleIndexPolicy::Strict);
        let mut wire = wire_frame();
        wire.position = Some(proto::FramePosition { bci: 0, line: 0 });

        let frame =
            decode_frame(&wire, &pool, FrameLocation::default(), &DecodeOptions::default())
                .unwrap();
        assert_eq!(frame.position, Some(FramePosition { bci: 0, line: 0 }));
    }

    #[test]
    fn test_diff_details_keep_sign() {
        let titles = titles();
        let pool = TitlePool::new(&titles, TitleIndexPolicy::Strict);
        let mut wire = wire_frame();
        wire.diff_details = Some(proto::DiffDetails {
            samples: -7,
            weight: -2048,
            percent_samples: 41.5,
            percent_weight: 12.25,
        });

        let frame =
            decode_frame(&wire, &pool, FrameLocation::default(), &DecodeOptions::default())
                .unwrap();
        let details = frame.diff_details.unwrap();
        assert_eq!(details.samples, -7);
        assert_eq!(details.weight, -2048);
        assert_eq!(details.percent_samples, 41.5);
        assert_eq!(details.percent_weight, 12.25);
    }

    #[test]
    fn test_negative_count_fails() {
        let titles = titles();
        let pool = TitlePool::new(&titles, TitleIndexPolicy::Strict);
        let mut wire = wire_frame();
        wire.total_weight = -1;

        let result =
            decode_frame(&wire, &pool, FrameLocation::default(), &DecodeOptions::default());
        assert!(matches!(
            result,
            Err(DecodeError::NegativeValue {
                field: "total_weight",
                ..
            })
        ));
    }

    #[test]
    fn test_js_safe_rejects_large_values() {
        let titles = titles();
        let pool = TitlePool::new(&titles, TitleIndexPolicy::Strict);
        let mut wire = wire_frame();
        wire.total_samples = 1 << 60;

        let native =
            decode_frame(&wire, &pool, FrameLocation::default(), &DecodeOptions::default())
                .unwrap();
        assert_eq!(native.total_samples, 1 << 60);

        let options = DecodeOptions::default().with_integers(IntegerPolicy::JsSafe);
        let result = decode_frame(&wire, &pool, FrameLocation::default(), &options);
        assert!(matches!(result, Err(DecodeError::IntegerOutOfRange { .. })));
    }
}
