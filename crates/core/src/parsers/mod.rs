pub mod pprof;

use pprof_tree_protocol::pprof::Profile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("pprof: {0}")]
    Pprof(#[from] pprof::PprofParseError),
}

/// Detect the encoding of a pprof profile and decode it.
///
/// Detection strategy:
/// 1. Inflate gzip input (magic `1f 8b`) first; both encodings may be
///    compressed.
/// 2. If the first non-whitespace byte is `{`, parse as JSON.
/// 3. Otherwise parse as protobuf.
pub fn parse_auto(data: &[u8]) -> Result<Profile, ParseError> {
    let inflated;
    let data = if pprof::is_gzip(data) {
        inflated = pprof::gunzip(data)?;
        inflated.as_slice()
    } else {
        data
    };

    let looks_like_json = data
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|&b| b == b'{');
    if looks_like_json {
        return Ok(pprof::parse_pprof_json(data)?);
    }
    Ok(pprof::parse_pprof_proto(data)?)
}
