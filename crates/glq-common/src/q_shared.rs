// q_shared.rs -- constants and small helpers shared by every module

// ============================================================
// Error codes (Com_Error)
// ============================================================

pub const ERR_FATAL: i32 = 0;
pub const ERR_DROP: i32 = 1;
pub const ERR_QUIT: i32 = 2;

// ============================================================
// Cvar flags
// ============================================================

pub const CVAR_ZERO: i32 = 0;
/// Saved to the config file.
pub const CVAR_ARCHIVE: i32 = 1;

pub const MAX_STRING_CHARS: usize = 1024;
pub const MAX_STRING_TOKENS: usize = 80;

// ============================================================
// Key numbers
// ============================================================

pub const K_ESCAPE: i32 = 27;

// ============================================================
// Byte order
// ============================================================

/// Read a little-endian 32-bit integer at `offset`, if the slice is long enough.
pub fn read_little_long(data: &[u8], offset: usize) -> Option<i32> {
    let bytes = data.get(offset..offset + 4)?;
    Some(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

// ============================================================
// String helpers
// ============================================================

/// Case-insensitive string equality check.
pub fn q_streq_nocase(s1: &str, s2: &str) -> bool {
    s1.eq_ignore_ascii_case(s2)
}

/// Case-insensitive prefix test, the `_strnicmp(s, prefix, len) == 0` idiom.
pub fn q_starts_with_nocase(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len()
        && s.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// Q_atoi -- optional sign, decimal or `0x` hex, `'c'` character literals.
/// Parsing stops at the first character that does not belong to the number;
/// anything unparseable yields 0.
pub fn q_atoi(s: &str) -> i32 {
    let bytes = s.trim_start().as_bytes();
    let mut pos = 0;
    let mut sign: i64 = 1;

    if bytes.first() == Some(&b'-') {
        sign = -1;
        pos += 1;
    }

    // hex
    if bytes.len() >= pos + 2 && bytes[pos] == b'0' && (bytes[pos + 1] == b'x' || bytes[pos + 1] == b'X') {
        pos += 2;
        let mut val: i64 = 0;
        while let Some(&c) = bytes.get(pos) {
            let digit = match c {
                b'0'..=b'9' => c - b'0',
                b'a'..=b'f' => c - b'a' + 10,
                b'A'..=b'F' => c - b'A' + 10,
                _ => break,
            };
            val = (val * 16 + digit as i64) & 0xffff_ffff;
            pos += 1;
        }
        return (val as u32 as i32).wrapping_mul(sign as i32);
    }

    // character
    if bytes.get(pos) == Some(&b'\'') {
        return bytes.get(pos + 1).map_or(0, |&c| sign as i32 * c as i32);
    }

    // decimal
    let mut val: i64 = 0;
    while let Some(&c) = bytes.get(pos) {
        if !c.is_ascii_digit() {
            break;
        }
        val = (val * 10 + (c - b'0') as i64).min(i32::MAX as i64 + 1);
        pos += 1;
    }
    (val * sign).clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Q_atof -- like `q_atoi` but accepts a fractional part. Garbage yields 0.
pub fn q_atof(s: &str) -> f32 {
    let t = s.trim();
    if let Ok(v) = t.parse::<f32>() {
        return v;
    }

    // Take the longest leading prefix that parses, so "0.7abc" -> 0.7
    let end = t
        .char_indices()
        .take_while(|&(i, c)| c.is_ascii_digit() || c == '.' || (i == 0 && c == '-'))
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(0);
    t[..end].parse::<f32>().unwrap_or(0.0)
}
