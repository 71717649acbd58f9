/// djb2 over the UTF-16 code units of `input` (seed 5381, `h * 33 + c`),
/// wrapped to 32 bits and rendered as 16 zero-padded lowercase hex digits.
pub fn djb2_hex(input: &str) -> String {
    let mut hash: i32 = 5381;
    for unit in input.encode_utf16() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_add(hash)
            .wrapping_add(i32::from(unit));
    }
    format!("{:016x}", hash as u32)
}
