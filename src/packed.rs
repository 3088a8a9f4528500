// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Row-major component storage matching a [`TextureLayout`] exactly.

use crate::layout::{Texel, TextureLayout};
use crate::pixel_formats::{TexelComponent, components_as_bytes};
use crate::sink::Region;
use std::borrow::Cow;
use std::fmt::Debug;

/// A flat buffer of `width * height * components` scalars.
///
/// Rows are tightly packed with no padding, so the buffer can be handed to a texture upload
/// with a row pitch of `width * bytes_per_texel`.  Every component starts at zero; packing
/// routines only ever overwrite the slots they own.
#[derive(Clone, PartialEq)]
pub struct PackedBuffer<C> {
    layout: TextureLayout,
    data: Box<[C]>,
}

impl<C: TexelComponent> PackedBuffer<C> {
    /// A zero-filled buffer for `layout`.
    pub fn zeroed(layout: TextureLayout) -> Self {
        debug_assert_eq!(layout.format().component_type(), C::TYPE);
        PackedBuffer {
            layout,
            data: vec![C::ZERO; layout.component_count()].into_boxed_slice(),
        }
    }

    pub fn layout(&self) -> &TextureLayout {
        &self.layout
    }

    pub fn as_slice(&self) -> &[C] {
        &self.data
    }

    pub fn as_bytes(&self) -> &[u8] {
        components_as_bytes(&self.data)
    }

    pub fn byte_len(&self) -> usize {
        std::mem::size_of_val(&*self.data)
    }

    /// Copies `source` in starting at component `offset`.
    ///
    /// # Panics
    ///
    /// Panics if the source runs past the end of the buffer.
    pub fn write(&mut self, offset: usize, source: &[C]) {
        self.data[offset..offset + source.len()].copy_from_slice(source);
    }

    /// Components `offset..offset + len`.
    pub fn read(&self, offset: usize, len: usize) -> &[C] {
        &self.data[offset..offset + len]
    }

    /// Components of one texel.
    pub fn texel(&self, texel: Texel) -> &[C] {
        let components = self.layout.format().components() as usize;
        self.read(self.layout.texel_offset(texel), components)
    }

    /// The components covering `region`, rows tightly packed.
    ///
    /// Borrowed when the region is a run of whole rows, copied otherwise.
    pub fn region(&self, region: Region) -> Cow<'_, [C]> {
        debug_assert!(region.fits(&self.layout));
        let components = self.layout.format().components() as usize;
        let row_len = self.layout.width() as usize * components;
        if region.x == 0 && region.width == self.layout.width() {
            let start = region.y as usize * row_len;
            return Cow::Borrowed(&self.data[start..start + region.height as usize * row_len]);
        }
        let span = region.width as usize * components;
        let mut out = Vec::with_capacity(span * region.height as usize);
        for row in region.y..region.y + region.height {
            let start = self.layout.texel_offset(Texel { x: region.x, y: row });
            out.extend_from_slice(&self.data[start..start + span]);
        }
        Cow::Owned(out)
    }
}

impl<C> Debug for PackedBuffer<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackedBuffer")
            .field("layout", &self.layout)
            .field("len", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Category;
    use crate::pixel_formats::ComponentFormat;

    fn offsets_buffer(records: usize) -> PackedBuffer<f32> {
        let layout =
            TextureLayout::for_records(Category::ObjectOffsets, ComponentFormat::RGB32F, records)
                .unwrap();
        PackedBuffer::zeroed(layout)
    }

    #[test]
    fn starts_zeroed() {
        let buffer = offsets_buffer(3);
        assert_eq!(buffer.as_slice().len(), 512 * 3);
        assert!(buffer.as_slice().iter().all(|c| *c == 0.0));
        assert_eq!(buffer.byte_len(), 512 * 3 * 4);
        assert_eq!(buffer.as_bytes().len(), buffer.byte_len());
    }

    #[test]
    fn texel_addressing() {
        let mut buffer = offsets_buffer(513);
        buffer.write(512 * 3, &[1.0, 2.0, 3.0]);
        assert_eq!(buffer.texel(Texel { x: 0, y: 1 }), &[1.0, 2.0, 3.0]);
        assert_eq!(buffer.texel(Texel { x: 1, y: 1 }), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn whole_rows_are_borrowed() {
        let buffer = offsets_buffer(1025);
        let rows = buffer.region(Region::rows(buffer.layout(), 1, 2));
        assert!(matches!(rows, Cow::Borrowed(_)));
        assert_eq!(rows.len(), 2 * 512 * 3);
    }

    #[test]
    fn partial_rows_are_copied() {
        let mut buffer = offsets_buffer(1025);
        buffer.write(3 * 3, &[9.0, 9.0, 9.0]);
        buffer.write((512 + 3) * 3, &[7.0, 7.0, 7.0]);
        let region = Region {
            x: 3,
            y: 0,
            width: 1,
            height: 2,
        };
        let copied = buffer.region(region);
        assert!(matches!(copied, Cow::Owned(_)));
        assert_eq!(&*copied, &[9.0, 9.0, 9.0, 7.0, 7.0, 7.0]);
    }
}
