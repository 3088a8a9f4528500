// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Per-object XYZ offsets, one RGB32F texel per object, 512 objects per row.
//!
//! Offsets move whole objects without re-uploading their positions, so the buffer is kept and
//! individual offsets can be changed after creation.  Changes accumulate into one dirty region
//! and go to the GPU on the next [`ObjectOffsetsTexture::flush`].

use super::{DataTexture, TextureLayoutEncoder};
use crate::Error;
use crate::layout::{Category, TextureLayout};
use crate::packed::PackedBuffer;
use crate::pixel_formats::ComponentFormat;
use crate::sink::{Region, TextureSink};
use crate::stats::RamAccountant;

#[derive(Debug)]
pub struct ObjectOffsetsTexture<H> {
    texture: DataTexture<H>,
    buffer: PackedBuffer<f32>,
    objects: usize,
    dirty: Option<Region>,
}

impl<H> ObjectOffsetsTexture<H> {
    pub fn texture(&self) -> &DataTexture<H> {
        &self.texture
    }

    pub fn buffer(&self) -> &PackedBuffer<f32> {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.objects
    }

    pub fn is_empty(&self) -> bool {
        self.objects == 0
    }

    fn check(&self, index: usize) -> Result<(), Error> {
        if index < self.objects {
            Ok(())
        } else {
            Err(Error::OutOfBounds {
                index,
                count: self.objects,
            })
        }
    }

    pub fn offset(&self, index: usize) -> Result<[f32; 3], Error> {
        self.check(index)?;
        let c = self.buffer.read(self.buffer.layout().record_offset(index), 3);
        Ok([c[0], c[1], c[2]])
    }

    /// Changes the offset of object `index` on the CPU side.
    pub fn set_offset(&mut self, index: usize, offset: [f32; 3]) -> Result<(), Error> {
        self.check(index)?;
        let layout = *self.buffer.layout();
        self.buffer.write(layout.record_offset(index), &offset);
        let texel = layout.record_texel(index);
        let changed = Region {
            x: texel.x,
            y: texel.y,
            width: 1,
            height: 1,
        };
        self.dirty = Some(match self.dirty {
            Some(existing) => existing.union(changed),
            None => changed,
        });
        Ok(())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.is_some()
    }

    /// Uploads every offset changed since the last flush in one write.  Returns whether
    /// anything was written.
    pub fn flush<S, A>(&mut self, encoder: &mut TextureLayoutEncoder<S, A>) -> bool
    where
        S: TextureSink<Handle = H>,
        A: RamAccountant,
    {
        match self.dirty.take() {
            Some(region) => {
                encoder.rewrite(&self.texture, &self.buffer, region);
                true
            }
            None => false,
        }
    }
}

impl<S: TextureSink, A: RamAccountant> TextureLayoutEncoder<S, A> {
    /// Packs one XYZ offset per object.  Fails when `offsets` is empty.
    pub fn object_offsets_texture(
        &mut self,
        offsets: &[[f32; 3]],
    ) -> Result<ObjectOffsetsTexture<S::Handle>, Error> {
        let layout = TextureLayout::for_records(
            Category::ObjectOffsets,
            ComponentFormat::RGB32F,
            offsets.len(),
        )?;
        let mut buffer = PackedBuffer::zeroed(layout);
        buffer.write(0, offsets.as_flattened());
        let texture = self.upload(&buffer);
        Ok(ObjectOffsetsTexture {
            texture,
            buffer,
            objects: offsets.len(),
            dirty: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Texel;
    use crate::software::SoftwareSink;
    use crate::stats::DataTextureRamStats;

    fn encoder() -> TextureLayoutEncoder<SoftwareSink, DataTextureRamStats> {
        TextureLayoutEncoder::new(
            SoftwareSink::new(),
            DataTextureRamStats::new(),
            Default::default(),
        )
    }

    #[test]
    fn object_513_wraps_to_second_row() {
        let mut encoder = encoder();
        let offsets: Vec<[f32; 3]> = (0..513).map(|i| [i as f32, 0.5, -1.0]).collect();
        let texture = encoder.object_offsets_texture(&offsets).unwrap();
        assert_eq!(texture.texture().width(), 512);
        assert_eq!(texture.texture().height(), 2);

        let stored = encoder.sink().texture(texture.texture().handle()).unwrap();
        assert_eq!(stored.texel::<f32>(Texel { x: 0, y: 1 }), vec![512.0, 0.5, -1.0]);
        assert_eq!(stored.texel::<f32>(Texel { x: 511, y: 0 }), vec![511.0, 0.5, -1.0]);
        for x in 1..512 {
            assert_eq!(stored.texel::<f32>(Texel { x, y: 1 }), vec![0.0, 0.0, 0.0]);
        }
        assert_eq!(
            encoder.accountant().bytes(Category::ObjectOffsets),
            512 * 2 * 12
        );
    }

    #[test]
    fn empty_is_an_error() {
        let mut encoder = encoder();
        assert_eq!(
            encoder.object_offsets_texture(&[]).unwrap_err(),
            Error::ZeroHeight {
                category: Category::ObjectOffsets
            }
        );
    }

    #[test]
    fn updates_flush_once() {
        let mut encoder = encoder();
        let mut texture = encoder.object_offsets_texture(&[[0.0; 3]; 1000]).unwrap();
        assert!(!texture.flush(&mut encoder));

        texture.set_offset(3, [1.0, 2.0, 3.0]).unwrap();
        texture.set_offset(600, [4.0, 5.0, 6.0]).unwrap();
        assert!(texture.is_dirty());
        assert_eq!(texture.offset(600).unwrap(), [4.0, 5.0, 6.0]);
        assert!(texture.flush(&mut encoder));
        assert!(!texture.flush(&mut encoder));

        let stored = encoder.sink().texture(texture.texture().handle()).unwrap();
        // one write at creation, one flush
        assert_eq!(stored.write_count(), 2);
        assert_eq!(stored.texel::<f32>(Texel { x: 3, y: 0 }), vec![1.0, 2.0, 3.0]);
        assert_eq!(stored.texel::<f32>(Texel { x: 88, y: 1 }), vec![4.0, 5.0, 6.0]);
    }

    #[test]
    fn updates_are_bounds_checked() {
        let mut encoder = encoder();
        let mut texture = encoder.object_offsets_texture(&[[0.0; 3]; 2]).unwrap();
        assert_eq!(
            texture.set_offset(2, [1.0; 3]).unwrap_err(),
            Error::OutOfBounds { index: 2, count: 2 }
        );
        assert!(!texture.is_dirty());
    }
}
