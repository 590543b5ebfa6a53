use crate::error::{CalibrationError, Result};
use std::ops::RangeInclusive;

/// Control bytes the device pads its pages with.
pub const PADDING_BYTES: RangeInclusive<u8> = 0..=6;

const DOCUMENT_END: &[u8] = b"}}";

/// Cuts the calibration document out of a reassembled page stream.
///
/// The document runs from the first `{` to the first `}}` after it, padding bytes inside that
/// range are then dropped.
pub fn sanitize(raw: &[u8]) -> Result<Vec<u8>> {
    let start = raw
        .iter()
        .position(|&byte| byte == b'{')
        .ok_or(CalibrationError::MalformedBlob("no opening brace"))?;

    let end = raw[start..]
        .windows(DOCUMENT_END.len())
        .position(|window| window == DOCUMENT_END)
        .map(|offset| start + offset + DOCUMENT_END.len())
        .ok_or(CalibrationError::MalformedBlob("no closing '}}' after the opening brace"))?;

    Ok(raw[start..end]
        .iter()
        .copied()
        .filter(|byte| !PADDING_BYTES.contains(byte))
        .collect())
}
