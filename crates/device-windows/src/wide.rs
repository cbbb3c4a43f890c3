//! UTF-16 buffer helpers for the wide-string Win32 calls

/// Decode a wide buffer up to its first NUL
#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
pub(crate) fn from_wide_nul(buf: &[u16]) -> String {
    let len = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
    String::from_utf16_lossy(&buf[..len])
}

/// Decode a registry `REG_SZ` byte buffer (little-endian UTF-16)
#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
pub(crate) fn from_reg_sz(bytes: &[u8]) -> String {
    let wide: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    from_wide_nul(&wide)
}

/// NUL-terminated wide copy of `s`
#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
pub(crate) fn to_wide_nul(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_wide_stops_at_nul() {
        let mut buf = [0u16; 16];
        for (slot, c) in buf.iter_mut().zip("HDAUDIO\\1".encode_utf16()) {
            *slot = c;
        }
        assert_eq!(from_wide_nul(&buf), "HDAUDIO\\1");
    }

    #[test]
    fn test_from_wide_without_nul_uses_whole_buffer() {
        let buf: Vec<u16> = "abc".encode_utf16().collect();
        assert_eq!(from_wide_nul(&buf), "abc");
    }

    #[test]
    fn test_from_reg_sz_decodes_little_endian() {
        let mut bytes: Vec<u8> = "Realtek(R) Audio"
            .encode_utf16()
            .flat_map(u16::to_le_bytes)
            .collect();
        bytes.extend_from_slice(&[0, 0, 0x41, 0x00]);
        assert_eq!(from_reg_sz(&bytes), "Realtek(R) Audio");
    }

    #[test]
    fn test_to_wide_nul_round_trips() {
        let wide = to_wide_nul("SWD\\MMDEVAPI\\{0.0.0}");
        assert_eq!(wide.last(), Some(&0));
        assert_eq!(from_wide_nul(&wide), "SWD\\MMDEVAPI\\{0.0.0}");
    }
}
