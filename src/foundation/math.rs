use crate::raster::image::RasterImage;

/// FNV-1a, 64-bit. Used for content-derived cache keys.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv1a64(u64);

impl Fnv1a64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01B3;

    pub(crate) fn new_default() -> Self {
        Self(Self::OFFSET_BASIS)
    }

    pub(crate) fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= u64::from(b);
            h = h.wrapping_mul(Self::PRIME);
        }
        self.0 = h;
    }

    pub(crate) fn finish(self) -> u64 {
        self.0
    }
}

/// Hash dimensions plus every RGBA sample in scan order.
pub(crate) fn fingerprint_raster<I: RasterImage + ?Sized>(image: &I) -> u64 {
    let mut h = Fnv1a64::new_default();
    h.write_u32(image.width());
    h.write_u32(image.height());
    for y in 0..image.height() {
        for x in 0..image.width() {
            let c = image.color(x, y);
            h.write_bytes(&[c.r, c.g, c.b, image.alpha(x, y)]);
        }
    }
    h.finish()
}
