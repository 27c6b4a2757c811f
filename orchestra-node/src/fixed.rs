//! Integer helpers shared by the control and audio paths.

/// Saturate an `i32` to `i16` range (`-32768..=32767`).
#[inline(always)]
pub fn saturate16(val: i32) -> i16 {
    if val > i16::MAX as i32 {
        i16::MAX
    } else if val < i16::MIN as i32 {
        i16::MIN
    } else {
        val as i16
    }
}

/// Linear integer re-mapping of `x` from `[in_min, in_max]` onto
/// `[out_min, out_max]`, truncating toward zero. Values outside the input
/// range extrapolate.
#[inline]
pub fn map_range(x: i32, in_min: i32, in_max: i32, out_min: i32, out_max: i32) -> i32 {
    (x - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// Q8 multiply: `(a * b) >> 8`.
#[inline(always)]
pub fn mul_q8(a: i32, b: i32) -> i32 {
    (a * b) >> 8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saturate16_clamps() {
        assert_eq!(saturate16(100), 100);
        assert_eq!(saturate16(40_000), 32767);
        assert_eq!(saturate16(-40_000), -32768);
    }

    #[test]
    fn map_range_endpoints() {
        assert_eq!(map_range(7, 7, 14, 1000, 6000), 1000);
        assert_eq!(map_range(14, 7, 14, 1000, 6000), 6000);
    }

    #[test]
    fn map_range_truncates() {
        // 3 * 5000 / 7 = 2142.86
        assert_eq!(map_range(10, 7, 14, 1000, 6000), 3142);
        // -100 * 14 / 80 = -17.5, truncated toward zero
        assert_eq!(map_range(0, 100, 180, 4, 18), -13);
    }

    #[test]
    fn map_range_extrapolates() {
        assert_eq!(map_range(200, 100, 180, 4, 18), 21);
    }

    #[test]
    fn mul_q8_scales() {
        assert_eq!(mul_q8(256, 100), 100);
        assert_eq!(mul_q8(-512, 128), -256);
    }
}
