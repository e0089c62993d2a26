//! CRC-16/CCITT-FALSE as validated by QRIS readers.
//!
//! Register starts at `0xFFFF`, polynomial `0x1021`, MSB first, no final XOR.

const INITIAL: u16 = 0xFFFF;
const POLYNOMIAL: u16 = 0x1021;

/// Computes the checksum of `data` and renders it as 4 uppercase hex digits.
///
/// Input is expected to be ASCII. Only the low byte of each character's code
/// point contributes to the register.
pub fn checksum(data: &str) -> String {
    format!("{:04X}", crc16(data))
}

pub fn crc16(data: &str) -> u16 {
    let mut crc = INITIAL;
    for ch in data.chars() {
        crc ^= ((ch as u32 & 0xFF) as u16) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ POLYNOMIAL
            } else {
                crc << 1
            };
        }
    }
    crc
}
