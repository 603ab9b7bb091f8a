use std::borrow::Cow;

use encoding_rs::{Encoding, SHIFT_JIS};

use crate::{error::Error, result::Result};

/// Text codec used on the wire.
///
/// 5ch only accepts form fields in its legacy codepage and serves every page
/// in it, so both directions go through one implementation of this trait.
pub trait Codec: std::fmt::Debug + Send + Sync {
    /// Encodes `text` for transmission.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unmappable`] if `text` contains a character outside
    /// the codec's repertoire. Implementations must not substitute.
    fn encode<'a>(&self, text: &'a str) -> Result<Cow<'a, [u8]>>;

    /// Decodes a response body. Malformed sequences become U+FFFD.
    fn decode<'a>(&self, bytes: &'a [u8]) -> Cow<'a, str>;
}

/// `Shift_JIS` as served by 5ch (cp932 / Windows-31J in practice).
#[derive(Debug, Clone, Copy, Default)]
pub struct ShiftJis;

impl ShiftJis {
    fn encoding() -> &'static Encoding {
        SHIFT_JIS
    }
}

impl Codec for ShiftJis {
    fn encode<'a>(&self, text: &'a str) -> Result<Cow<'a, [u8]>> {
        let (bytes, _, unmappable) = Self::encoding().encode(text);
        if !unmappable {
            return Ok(bytes);
        }

        // find the offender so the error is actionable
        let mut buf = [0; 4];
        let character = text
            .chars()
            .find(|c| Self::encoding().encode(c.encode_utf8(&mut buf)).2)
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        Err(Error::Unmappable {
            encoding: Self::encoding().name(),
            character,
        })
    }

    fn decode<'a>(&self, bytes: &'a [u8]) -> Cow<'a, str> {
        let (text, _, had_errors) = Self::encoding().decode(bytes);
        if had_errors {
            log::debug!("malformed {} sequence replaced", Self::encoding().name());
        }
        text
    }
}
