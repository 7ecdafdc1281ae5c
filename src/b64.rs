//! Base64 codec for blob literals, using the RFC 4648 §4 alphabet.  Output
//! carries no padding since the `=` character doubles as the blob delimiter
//! on the wire.
//!
//! This is the single codec shared by the parser and the writer.

const ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Encode bytes to base64 (no padding)
pub fn encode(input: &[u8]) -> String {
    let mut out = String::with_capacity((input.len() * 4 + 2) / 3);
    for chunk in input.chunks(3) {
        let b0 = chunk[0] as u32;
        let b1 = if chunk.len() > 1 { chunk[1] as u32 } else { 0 };
        let b2 = if chunk.len() > 2 { chunk[2] as u32 } else { 0 };
        let combined = (b0 << 16) | (b1 << 8) | b2;
        out.push(ALPHABET[((combined >> 18) & 0x3f) as usize] as char);
        out.push(ALPHABET[((combined >> 12) & 0x3f) as usize] as char);
        if chunk.len() > 1 {
            out.push(ALPHABET[((combined >> 6) & 0x3f) as usize] as char);
        }
        if chunk.len() > 2 {
            out.push(ALPHABET[(combined & 0x3f) as usize] as char);
        }
    }
    out
}

/// Incremental base64 decoder.  Characters are pushed one at a time as the
/// parser consumes them from the input stream.
#[derive(Default)]
pub struct Decoder {
    buf: u32,
    bits: u32,
    out: Vec<u8>,
}

impl Decoder {
    /// Push a single character into the decoder.  Returns `false` if the
    /// character is outside the base64 alphabet.
    pub fn push(&mut self, c: char) -> bool {
        let val = match sextet(c) {
            Some(v) => v,
            None => return false,
        };
        self.buf = (self.buf << 6) | u32::from(val);
        self.bits += 6;
        if self.bits >= 8 {
            self.bits -= 8;
            self.out.push((self.buf >> self.bits) as u8);
            self.buf &= (1 << self.bits) - 1;
        }
        true
    }

    /// Complete the decode and hand back the accumulated bytes.  A residual
    /// group of 6 bits means the input length was 1 mod 4, which no byte
    /// sequence can encode, so that is rejected with [None]; a residual of 2
    /// or 4 bits is the normal tail of an unpadded stream and is discarded.
    pub fn finish(self) -> Option<Vec<u8>> {
        if self.bits == 6 {
            return None;
        }
        Some(self.out)
    }
}

/// Decode a complete base64 string (no padding expected)
#[cfg(test)]
pub fn decode(input: &str) -> Option<Vec<u8>> {
    let mut decoder = Decoder::default();
    for c in input.chars() {
        if !decoder.push(c) {
            return None;
        }
    }
    decoder.finish()
}

/// Map a character to its 6-bit value, [None] for anything outside the alphabet
fn sextet(c: char) -> Option<u8> {
    match c {
        'A'..='Z' => Some(c as u8 - b'A'),
        'a'..='z' => Some(c as u8 - b'a' + 26),
        '0'..='9' => Some(c as u8 - b'0' + 52),
        '+' => Some(62),
        '/' => Some(63),
        _ => None,
    }
}
