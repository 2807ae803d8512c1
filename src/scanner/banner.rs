use std::ops::Range;

use crate::error::{Result, ScanError};

/// Byte window assumed to hold the server's key-exchange method list.
///
/// This is an approximation. It only lines up for servers whose version
/// line and KEXINIT preamble happen to match the layout the offsets were
/// picked from; anything else comes back misaligned or truncated. Kept
/// for output compatibility with earlier sweeps.
pub const KEX_BLOB_RANGE: Range<usize> = 98..206;

const LINE_END: &[u8] = b"\r\n";

/// Fields pulled out of the first bytes a server sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub protocol_version: String,
    pub kex_method_blob: Vec<u8>,
}

/// Turns a raw initial response into a [`Banner`].
///
/// The scanner only depends on this trait, so a parser that walks the real
/// length-prefixed KEXINIT packet can replace [`OffsetBannerParser`].
pub trait BannerParser: Send + Sync {
    fn parse(&self, raw: &[u8]) -> Result<Banner>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OffsetBannerParser;

impl BannerParser for OffsetBannerParser {
    fn parse(&self, raw: &[u8]) -> Result<Banner> {
        let line_end = raw
            .windows(LINE_END.len())
            .position(|window| window == LINE_END)
            .ok_or(ScanError::MalformedBanner { captured: raw.len() })?;

        let protocol_version = String::from_utf8_lossy(&raw[..line_end]).into_owned();

        // Clamped to what was captured; short responses give a short blob.
        let start = KEX_BLOB_RANGE.start.min(raw.len());
        let end = KEX_BLOB_RANGE.end.min(raw.len());

        Ok(Banner {
            protocol_version,
            kex_method_blob: raw[start..end].to_vec(),
        })
    }
}
