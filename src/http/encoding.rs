//! Content-Encoding dispatch for response bodies

use crate::error::{ReqHelperError, Result};
use std::fmt;
use std::io::Read;
use std::str::FromStr;

const BROTLI_BUFFER_SIZE: usize = 4096;

/// Body encodings that `read_body` knows how to undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEncoding {
    Gzip,
    Brotli,
    Zstd,
    /// Raw deflate stream, no zlib wrapper.
    Deflate,
    Identity,
}

impl ContentEncoding {
    /// Resolve a `Content-Encoding` header value. Missing or unknown values
    /// are treated as identity.
    pub fn from_header(value: Option<&str>) -> Self {
        match value {
            Some(value) => value.parse().unwrap_or_else(|_| {
                log::warn!("unsupported content-encoding '{}', passing body through", value);
                ContentEncoding::Identity
            }),
            None => ContentEncoding::Identity,
        }
    }
}

impl fmt::Display for ContentEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoding = match self {
            ContentEncoding::Gzip => "gzip",
            ContentEncoding::Brotli => "br",
            ContentEncoding::Zstd => "zstd",
            ContentEncoding::Deflate => "deflate",
            ContentEncoding::Identity => "identity",
        };
        write!(f, "{}", encoding)
    }
}

impl FromStr for ContentEncoding {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gzip" => Ok(ContentEncoding::Gzip),
            "br" => Ok(ContentEncoding::Brotli),
            "zstd" => Ok(ContentEncoding::Zstd),
            "deflate" => Ok(ContentEncoding::Deflate),
            "" | "identity" => Ok(ContentEncoding::Identity),
            _ => Err(()),
        }
    }
}

/// Decode `body` according to `encoding` and return the full payload.
///
/// Each decoder lives only for the duration of its match arm, so it is
/// released before returning on both the success and the error path.
pub fn read_body(body: &[u8], encoding: ContentEncoding) -> Result<Vec<u8>> {
    let mut decoded = Vec::with_capacity(body.len());

    let read = match encoding {
        ContentEncoding::Gzip => flate2::read::GzDecoder::new(body).read_to_end(&mut decoded),
        ContentEncoding::Brotli => {
            brotli::Decompressor::new(body, BROTLI_BUFFER_SIZE).read_to_end(&mut decoded)
        }
        ContentEncoding::Zstd => zstd::stream::read::Decoder::new(body)
            .and_then(|mut decoder| decoder.read_to_end(&mut decoded)),
        ContentEncoding::Deflate => {
            flate2::read::DeflateDecoder::new(body).read_to_end(&mut decoded)
        }
        ContentEncoding::Identity => {
            decoded.extend_from_slice(body);
            Ok(body.len())
        }
    };

    read.map_err(|source| ReqHelperError::Decode {
        encoding: encoding.to_string(),
        source,
    })?;

    Ok(decoded)
}
