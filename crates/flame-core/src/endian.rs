// crates/flame-core/src/endian.rs

/// Combina 4 bytes en big-endian (PowerPC): `bytes[0]` ocupa los bits 31-24.
#[inline(always)]
pub fn pack32_be(bytes: [u8; 4]) -> u32 {
    let b0 = bytes[0] as u32;
    let b1 = bytes[1] as u32;
    let b2 = bytes[2] as u32;
    let b3 = bytes[3] as u32;
    (b0 << 24) | (b1 << 16) | (b2 << 8) | b3
}

/// Separa un u32 en 4 bytes, el más significativo primero.
#[inline(always)]
pub fn unpack32_be(value: u32) -> [u8; 4] {
    [
        (value >> 24) as u8,
        (value >> 16) as u8,
        (value >> 8) as u8,
        (value & 0xFF) as u8,
    ]
}
