//! Pixel encoding for the ST7789 SPI bus.
//!
//! The ST7789 expects RGB565 pixels most significant byte first. Render
//! regions hold either native `u16` values (little-endian in RAM on the
//! Cortex-M33) or values that were byte-swapped while rendering.
//!
//! | Region content | In RAM | Sent as |
//! |----------------|--------|---------|
//! | native | `lo hi` | encoded into a scratch chunk as `hi lo` |
//! | pre-swapped | `hi lo` | the region bytes themselves |

/// Bytes encoded per SPI transfer when swapping on the fly.
pub const SCRATCH_BYTES: usize = 512;

/// Write `pixels` into `out` big-endian. Returns the number of pixels encoded,
/// limited by the room in `out`.
pub fn encode_be(
    pixels: &[u16],
    out: &mut [u8],
) -> usize {
    let count = pixels.len().min(out.len() / 2);
    for (dst, px) in out.chunks_exact_mut(2).zip(&pixels[..count]) {
        dst.copy_from_slice(&px.to_be_bytes());
    }
    count
}

/// View pre-swapped pixels as the bytes they occupy in memory.
pub fn as_bytes(pixels: &[u16]) -> &[u8] {
    // SAFETY: u16 has no padding and u8 has alignment 1; the length covers
    // exactly the same memory as the input slice.
    unsafe { core::slice::from_raw_parts(pixels.as_ptr().cast::<u8>(), pixels.len() * 2) }
}

// =============================================================================
// Unit Tests
// =============================================================================
