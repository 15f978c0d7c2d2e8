use std::io::Read;

use flate2::read::GzDecoder;
use prost::Message;
use thiserror::Error;

use pprof_tree_protocol::pprof::Profile;

#[derive(Debug, Error)]
pub enum PprofParseError {
    #[error("invalid gzip stream: {0}")]
    Gzip(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid protobuf: {0}")]
    Protobuf(#[from] prost::DecodeError),
    #[error("empty input")]
    Empty,
}

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

pub fn is_gzip(data: &[u8]) -> bool {
    data.starts_with(&GZIP_MAGIC)
}

/// Inflate a gzip stream.
pub fn gunzip(data: &[u8]) -> Result<Vec<u8>, PprofParseError> {
    let mut out = Vec::with_capacity(data.len() * 4);
    GzDecoder::new(data).read_to_end(&mut out)?;
    Ok(out)
}

/// Parse the binary protobuf encoding of `profile.proto`, gzip-compressed
/// or not. Go's `runtime/pprof` and `net/http/pprof` write the compressed
/// form.
pub fn parse_pprof_proto(data: &[u8]) -> Result<Profile, PprofParseError> {
    if data.is_empty() {
        return Err(PprofParseError::Empty);
    }
    if is_gzip(data) {
        let inflated = gunzip(data)?;
        return Ok(Profile::decode(inflated.as_slice())?);
    }
    Ok(Profile::decode(data)?)
}

/// Parse a pprof JSON export (camelCase keys, as produced by pprof-rs or
/// a protobuf-to-JSON conversion of `profile.proto`).
pub fn parse_pprof_json(data: &[u8]) -> Result<Profile, PprofParseError> {
    if data.iter().all(u8::is_ascii_whitespace) {
        return Err(PprofParseError::Empty);
    }
    Ok(serde_json::from_slice(data)?)
}
