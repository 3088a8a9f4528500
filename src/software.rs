// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*! An in-memory [`TextureSink`].

[`SoftwareSink`] keeps every texture's bytes on the CPU, laid out exactly as a GPU texture with an
unpadded row pitch of `width * bytes_per_texel`.  It's useful for headless runs, for inspecting
what a shader would fetch, and for tests.

```
use data_textures::encoder::{EncoderConfig, TextureLayoutEncoder};
use data_textures::layout::Texel;
use data_textures::software::SoftwareSink;
use data_textures::stats::NoAccounting;

let mut encoder = TextureLayoutEncoder::new(SoftwareSink::new(), NoAccounting, EncoderConfig::default());
let positions = encoder.positions_texture(&[1, 2, 3, 4, 5, 6]).unwrap();
let stored = encoder.sink().texture(positions.handle()).unwrap();
assert_eq!(stored.texel::<u16>(Texel { x: 1, y: 0 }), vec![4, 5, 6]);
```
*/

use crate::layout::{Texel, TextureLayout};
use crate::pixel_formats::{ComponentFormat, TexelComponent};
use crate::sink::{DataTextureConfig, Region, TextureSink};
use crate::visible_to::TextureUsage;

/// Identifies a texture within one [`SoftwareSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoftwareTextureId(usize);

/// One texture's storage and bookkeeping.
#[derive(Debug, Clone)]
pub struct SoftwareTexture {
    debug_name: String,
    layout: TextureLayout,
    visible_to: TextureUsage,
    bytes: Vec<u8>,
    nearest_clamp_to_edge: bool,
    write_count: usize,
}

impl SoftwareTexture {
    pub fn debug_name(&self) -> &str {
        &self.debug_name
    }

    pub fn layout(&self) -> &TextureLayout {
        &self.layout
    }

    pub fn visible_to(&self) -> TextureUsage {
        self.visible_to
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_nearest_clamp_to_edge(&self) -> bool {
        self.nearest_clamp_to_edge
    }

    /// Number of [`TextureSink::write_sub_image`] calls this texture received.
    pub fn write_count(&self) -> usize {
        self.write_count
    }

    /// Components of the texel at `texel`, the way a texel fetch would return them.
    ///
    /// # Panics
    ///
    /// Panics if `C` is not this texture's component type, or `texel` is out of bounds.
    pub fn texel<C: TexelComponent>(&self, texel: Texel) -> Vec<C> {
        let format = self.layout.format();
        assert_eq!(format.component_type(), C::TYPE, "component type mismatch");
        assert!(
            texel.x < self.layout.width() && texel.y < self.layout.height(),
            "texel ({},{}) outside {}x{}",
            texel.x,
            texel.y,
            self.layout.width(),
            self.layout.height()
        );
        let size = std::mem::size_of::<C>();
        let start = self.layout.texel_offset(texel) * size;
        self.bytes[start..start + format.bytes_per_texel()]
            .chunks_exact(size)
            .map(bytemuck::pod_read_unaligned::<C>)
            .collect()
    }
}

/// Stores textures in CPU memory.
#[derive(Debug, Default)]
pub struct SoftwareSink {
    textures: Vec<SoftwareTexture>,
}

impl SoftwareSink {
    pub fn new() -> Self {
        SoftwareSink::default()
    }

    pub fn texture(&self, id: &SoftwareTextureId) -> Option<&SoftwareTexture> {
        self.textures.get(id.0)
    }

    /// Number of textures created so far.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn textures(&self) -> impl Iterator<Item = &SoftwareTexture> {
        self.textures.iter()
    }
}

impl TextureSink for SoftwareSink {
    type Handle = SoftwareTextureId;

    fn create_texture(&mut self, config: &DataTextureConfig<'_>) -> Self::Handle {
        self.textures.push(SoftwareTexture {
            debug_name: config.debug_name.to_string(),
            layout: config.layout,
            visible_to: config.visible_to,
            bytes: vec![0; config.layout.byte_len()],
            nearest_clamp_to_edge: false,
            write_count: 0,
        });
        SoftwareTextureId(self.textures.len() - 1)
    }

    fn write_sub_image(
        &mut self,
        handle: &Self::Handle,
        region: Region,
        format: ComponentFormat,
        data: &[u8],
    ) {
        let texture = &mut self.textures[handle.0];
        let layout = texture.layout;
        assert_eq!(format, layout.format(), "format mismatch");
        assert!(
            region.fits(&layout),
            "region {region:?} exceeds {}x{}",
            layout.width(),
            layout.height()
        );
        let bytes_per_texel = format.bytes_per_texel();
        let src_row = region.width as usize * bytes_per_texel;
        assert_eq!(
            data.len(),
            src_row * region.height as usize,
            "data does not match region"
        );
        for row in 0..region.height as usize {
            let dst_texel = Texel {
                x: region.x,
                y: region.y + row as u32,
            };
            let dst = layout.texel_offset(dst_texel) / format.components() as usize
                * bytes_per_texel;
            texture.bytes[dst..dst + src_row]
                .copy_from_slice(&data[row * src_row..(row + 1) * src_row]);
        }
        texture.write_count += 1;
    }

    fn set_filtering_nearest_clamp_to_edge(&mut self, handle: &mut Self::Handle) {
        self.textures[handle.0].nearest_clamp_to_edge = true;
    }
}
