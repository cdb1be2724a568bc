//! Reversible text conversions with automatic direction detection
//!
//! Binary, hex and Morse inspect their input: anything that already looks
//! encoded is decoded, everything else is encoded. A failed decode always
//! falls back to encoding the raw input. Caesar is a plain forward shift.

pub mod binary;
pub mod caesar;
pub mod hex;
pub mod morse;
mod relay;
mod types;

pub use morse::{ItuMorseTable, MorseTable};
pub use relay::{Delivery, PasteSink, RelayPolicy};
pub use types::{Classified, DecodeError, Direction, EncodingScheme, TranscodeResult};

use crate::error::Result;

/// Stateless converter bundling the Morse lookup, Caesar offset and relay policy
pub struct Transcoder<M = ItuMorseTable> {
    morse: M,
    caesar_offset: usize,
    relay: RelayPolicy,
}

impl<M: MorseTable> Transcoder<M> {
    pub fn new(morse: M, caesar_offset: usize, relay: RelayPolicy) -> Self {
        Self {
            morse,
            caesar_offset,
            relay,
        }
    }

    pub fn relay_policy(&self) -> &RelayPolicy {
        &self.relay
    }

    pub fn transcode(&self, scheme: EncodingScheme, input: &str) -> Result<TranscodeResult> {
        let text = match scheme {
            EncodingScheme::Binary => {
                convert(binary::classify(input), binary::try_decode, binary::encode)
            }
            EncodingScheme::Hex => convert(hex::classify(input), hex::try_decode, hex::encode),
            EncodingScheme::Morse => morse::transcode(&self.morse, input)?,
            EncodingScheme::Caesar => {
                return Ok(TranscodeResult::inline(caesar::shift(
                    input,
                    self.caesar_offset,
                )));
            }
        };

        Ok(self.relay.apply(text))
    }
}

fn convert(
    classified: Classified<'_>,
    try_decode: fn(&str) -> std::result::Result<String, DecodeError>,
    encode: fn(&str) -> String,
) -> String {
    match classified {
        Classified::PlainText(text) => encode(text),
        Classified::Encoded(text) => try_decode(text).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Decode failed, encoding input instead");
            encode(text)
        }),
    }
}
