// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
bit packing.

Integer columns of the colors-and-flags texture are stored as four `u8` components, most
significant byte first.  A shader reads the texel as a `uvec4` and recovers the value with

```text
dot(texel, uvec4(1 << 24, 1 << 16, 1 << 8, 1))
```

which is [`u8s_to_u32`].  Keep the two functions in this file in step.
*/

/// Splits `packed` into four bytes, most significant first.
pub const fn u32_to_u8s(packed: u32) -> [u8; 4] {
    [
        ((packed >> 24) & 255) as u8,
        ((packed >> 16) & 255) as u8,
        ((packed >> 8) & 255) as u8,
        (packed & 255) as u8,
    ]
}

/// Inverse of [`u32_to_u8s`], written as the dot product the consuming shader uses.
pub const fn u8s_to_u32(bytes: [u8; 4]) -> u32 {
    const WEIGHTS: [u32; 4] = [1 << 24, 1 << 16, 1 << 8, 1];
    bytes[0] as u32 * WEIGHTS[0]
        + bytes[1] as u32 * WEIGHTS[1]
        + bytes[2] as u32 * WEIGHTS[2]
        + bytes[3] as u32 * WEIGHTS[3]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn most_significant_first() {
        assert_eq!(u32_to_u8s(0x0102_0304), [1, 2, 3, 4]);
        assert_eq!(u32_to_u8s(0xFF00_0000), [255, 0, 0, 0]);
        assert_eq!(u32_to_u8s(255), [0, 0, 0, 255]);
    }

    #[test]
    fn recovers_extremes() {
        for value in [0, 1, 255, 256, 65_535, 65_536, 16_777_215, 16_777_216, u32::MAX] {
            assert_eq!(u8s_to_u32(u32_to_u8s(value)), value);
        }
    }

    #[test]
    fn recovers_strided_range() {
        let mut value: u32 = 7;
        while let Some(next) = value.checked_add(0x0001_3579) {
            assert_eq!(u8s_to_u32(u32_to_u8s(value)), value);
            value = next;
        }
    }

    #[test]
    fn matches_big_endian() {
        assert_eq!(u32_to_u8s(0xDEAD_BEEF), 0xDEAD_BEEF_u32.to_be_bytes());
    }
}
