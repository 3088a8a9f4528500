// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! The seam between packing and the GPU.
//!
//! The encoder only computes layouts and fills buffers.  Whatever owns the texture handles
//! implements [`TextureSink`], and the encoder drives it in a fixed order for every texture:
//!
//! 1. [`TextureSink::create_texture`] allocates storage for the layout
//! 2. [`TextureSink::write_sub_image`] uploads the packed bytes
//! 3. [`TextureSink::set_filtering_nearest_clamp_to_edge`] turns off interpolation and wrapping
//!
//! Interpolating or wrapping a lookup table corrupts the decoded values, so step 3 is never
//! skipped.

use crate::layout::TextureLayout;
use crate::pixel_formats::ComponentFormat;
use crate::visible_to::TextureUsage;
use std::fmt::Debug;

/// A rectangle of texels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    /// The whole texture.
    pub const fn full(layout: &TextureLayout) -> Self {
        Region {
            x: 0,
            y: 0,
            width: layout.width(),
            height: layout.height(),
        }
    }

    /// Complete rows `y..y + height`.
    pub const fn rows(layout: &TextureLayout, y: u32, height: u32) -> Self {
        Region {
            x: 0,
            y,
            width: layout.width(),
            height,
        }
    }

    pub const fn texel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Smallest region covering both.
    pub fn union(self, other: Region) -> Region {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = (self.y + self.height).max(other.y + other.height);
        Region {
            x,
            y,
            width: right - x,
            height: bottom - y,
        }
    }

    pub const fn fits(&self, layout: &TextureLayout) -> bool {
        self.x as u64 + self.width as u64 <= layout.width() as u64
            && self.y as u64 + self.height as u64 <= layout.height() as u64
    }
}

/// Everything a sink needs to allocate one data texture.
#[derive(Debug, Clone, Copy)]
pub struct DataTextureConfig<'a> {
    pub debug_name: &'a str,
    pub layout: TextureLayout,
    pub visible_to: TextureUsage,
}

/// Owner of GPU textures.
///
/// Calls are made on whatever thread owns the device; the encoder never calls a sink
/// concurrently with itself.
pub trait TextureSink {
    /// Opaque, bindable texture.
    type Handle: Debug;

    /// Allocates storage for `config.layout`.  Contents are unspecified until written.
    fn create_texture(&mut self, config: &DataTextureConfig<'_>) -> Self::Handle;

    /// Writes `data` into `region` of the texture.
    ///
    /// `data` holds exactly `region.texel_count()` texels of `format`, rows tightly packed,
    /// in native byte order.
    fn write_sub_image(
        &mut self,
        handle: &Self::Handle,
        region: Region,
        format: ComponentFormat,
        data: &[u8],
    );

    /// Nearest-neighbour, clamp-to-edge lookups.
    fn set_filtering_nearest_clamp_to_edge(&mut self, handle: &mut Self::Handle);
}

impl<T: TextureSink + ?Sized> TextureSink for &mut T {
    type Handle = T::Handle;

    fn create_texture(&mut self, config: &DataTextureConfig<'_>) -> Self::Handle {
        (**self).create_texture(config)
    }

    fn write_sub_image(
        &mut self,
        handle: &Self::Handle,
        region: Region,
        format: ComponentFormat,
        data: &[u8],
    ) {
        (**self).write_sub_image(handle, region, format, data)
    }

    fn set_filtering_nearest_clamp_to_edge(&mut self, handle: &mut Self::Handle) {
        (**self).set_filtering_nearest_clamp_to_edge(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Category;

    #[test]
    fn union_covers_both() {
        let a = Region {
            x: 3,
            y: 0,
            width: 1,
            height: 1,
        };
        let b = Region {
            x: 0,
            y: 2,
            width: 2,
            height: 1,
        };
        assert_eq!(
            a.union(b),
            Region {
                x: 0,
                y: 0,
                width: 4,
                height: 3
            }
        );
        assert_eq!(a.union(a), a);
    }

    #[test]
    fn fits_layout() {
        let layout = TextureLayout::for_records(
            Category::ObjectOffsets,
            ComponentFormat::RGB32F,
            600,
        )
        .unwrap();
        assert!(Region::full(&layout).fits(&layout));
        assert!(Region::rows(&layout, 1, 1).fits(&layout));
        assert!(!Region::rows(&layout, 1, 2).fits(&layout));
    }
}
