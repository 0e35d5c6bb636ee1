//! RFC 4648 base32 with `=` padding.

/// Base32 alphabet.
pub const ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

const PAD: u8 = b'=';

/// Reverse lookup table, `-1` for bytes outside the alphabet.
const TABLE: [i8; 128] = {
    let mut table = [-1i8; 128];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as i8;
        i += 1;
    }
    table
};

pub fn encode(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len().div_ceil(5) * 8);
    for chunk in data.chunks(5) {
        let mut block = [0u8; 5];
        block[..chunk.len()].copy_from_slice(chunk);
        let bits = block.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
        // Characters carrying at least one input bit.
        let used = (chunk.len() * 8).div_ceil(5);
        for i in 0..8 {
            if i < used {
                let index = (bits >> (35 - 5 * i)) & 0x1f;
                out.push(ALPHABET[index as usize] as char);
            } else {
                out.push(PAD as char);
            }
        }
    }
    out
}

/// Decodes padded base32. `None` for bad length, padding or characters.
pub fn decode(text: &str) -> Option<Vec<u8>> {
    let bytes = text.as_bytes();
    if bytes.len() % 8 != 0 {
        return None;
    }
    let mut out = Vec::with_capacity(bytes.len() / 8 * 5);
    let blocks = bytes.len() / 8;
    for (n, block) in bytes.chunks(8).enumerate() {
        let used = block.iter().take_while(|&&c| c != PAD).count();
        if used < 8 && (n + 1 != blocks || block[used..].iter().any(|&c| c != PAD)) {
            return None;
        }
        let len = match used {
            8 => 5,
            7 => 4,
            5 => 3,
            4 => 2,
            2 => 1,
            _ => return None,
        };
        let mut bits = 0u64;
        for i in 0..8 {
            let value = if i < used {
                let c = block[i];
                let v = *TABLE.get(c as usize)?;
                if v < 0 {
                    return None;
                }
                v as u64
            } else {
                0
            };
            bits = (bits << 5) | value;
        }
        for i in 0..len {
            out.push((bits >> (32 - 8 * i)) as u8);
        }
    }
    Some(out)
}
