// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*! [`TextureSink`] on wgpu.

wgpu has no three-component texture formats.  RGB data textures (offsets, triangle indices,
positions) are allocated with the matching four-component format and each texel is widened with a
zero fourth component at upload time.  Everything on the CPU side, including stride math and
[`PackedBuffer`](crate::packed::PackedBuffer) contents, stays three-component; shaders read
`.xyz`.
*/

use crate::layout::TextureLayout;
use crate::pixel_formats::{ComponentFormat, ComponentType};
use crate::sink::{DataTextureConfig, Region, TextureSink};
use crate::visible_to::TextureUsage;
use std::borrow::Cow;
use wgpu::{Extent3d, TexelCopyBufferLayout, TexelCopyTextureInfo};

impl TextureUsage {
    /// Shader stages that need to see the texture in a bind group layout.
    pub const fn wgpu_shader_stages(&self) -> wgpu::ShaderStages {
        match self {
            TextureUsage::FragmentShaderRead => wgpu::ShaderStages::FRAGMENT,
            TextureUsage::VertexShaderRead => wgpu::ShaderStages::VERTEX,
            TextureUsage::VertexAndFragmentShaderRead => wgpu::ShaderStages::VERTEX_FRAGMENT,
        }
    }
}

/// Components per texel once allocated on wgpu.
const fn gpu_components(format: ComponentFormat) -> u8 {
    match format.components() {
        3 => 4,
        n => n,
    }
}

/// The wgpu format a data texture of `format` is allocated with.
pub const fn wgpu_format(format: ComponentFormat) -> wgpu::TextureFormat {
    use wgpu::TextureFormat as F;
    match (format.component_type(), gpu_components(format)) {
        (ComponentType::U8, 1) => F::R8Uint,
        (ComponentType::U8, 2) => F::Rg8Uint,
        (ComponentType::U8, _) => F::Rgba8Uint,
        (ComponentType::U16, 1) => F::R16Uint,
        (ComponentType::U16, 2) => F::Rg16Uint,
        (ComponentType::U16, _) => F::Rgba16Uint,
        (ComponentType::U32, 1) => F::R32Uint,
        (ComponentType::U32, 2) => F::Rg32Uint,
        (ComponentType::U32, _) => F::Rgba32Uint,
        (ComponentType::F32, 1) => F::R32Float,
        (ComponentType::F32, 2) => F::Rg32Float,
        (ComponentType::F32, _) => F::Rgba32Float,
    }
}

/// Bytes per texel on the GPU side.
const fn gpu_bytes_per_texel(format: ComponentFormat) -> usize {
    gpu_components(format) as usize * format.component_type().byte_size()
}

/// Widens tightly packed RGB texels to RGBA with a zero fourth component.  Other formats pass
/// through untouched.
pub fn widen_for_upload(format: ComponentFormat, data: &[u8]) -> Cow<'_, [u8]> {
    if format.components() != 3 {
        return Cow::Borrowed(data);
    }
    let src = format.bytes_per_texel();
    let dst = gpu_bytes_per_texel(format);
    let mut widened = vec![0; data.len() / src * dst];
    for (texel, out) in data.chunks_exact(src).zip(widened.chunks_exact_mut(dst)) {
        out[..src].copy_from_slice(texel);
    }
    Cow::Owned(widened)
}

/// A data texture allocated on a wgpu device.
#[derive(Debug)]
pub struct WgpuDataTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: Option<wgpu::Sampler>,
    format: ComponentFormat,
    visible_to: TextureUsage,
}

impl WgpuDataTexture {
    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// Nearest, clamp-to-edge sampler.  `None` until the encoder has configured filtering.
    pub fn sampler(&self) -> Option<&wgpu::Sampler> {
        self.sampler.as_ref()
    }

    /// Format of the packed CPU data, before any widening.
    pub fn format(&self) -> ComponentFormat {
        self.format
    }

    /// Layout entry for binding this texture at `binding`, visible to the declared stages.
    pub fn bind_group_layout_entry(&self, binding: u32) -> wgpu::BindGroupLayoutEntry {
        let sample_type = if self.format.component_type().is_integer() {
            wgpu::TextureSampleType::Uint
        } else {
            wgpu::TextureSampleType::Float { filterable: false }
        };
        wgpu::BindGroupLayoutEntry {
            binding,
            visibility: self.visible_to.wgpu_shader_stages(),
            ty: wgpu::BindingType::Texture {
                sample_type,
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        }
    }
}

/// Creates and writes data textures on a wgpu device.
#[derive(Debug, Clone)]
pub struct WgpuSink {
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl WgpuSink {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        WgpuSink { device, queue }
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    fn texture_descriptor<'a>(
        debug_name: &'a str,
        layout: &TextureLayout,
    ) -> wgpu::TextureDescriptor<'a> {
        wgpu::TextureDescriptor {
            label: Some(debug_name),
            size: Extent3d {
                width: layout.width(),
                height: layout.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu_format(layout.format()),
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        }
    }
}

impl TextureSink for WgpuSink {
    type Handle = WgpuDataTexture;

    fn create_texture(&mut self, config: &DataTextureConfig<'_>) -> Self::Handle {
        let texture = self
            .device
            .create_texture(&Self::texture_descriptor(config.debug_name, &config.layout));
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        WgpuDataTexture {
            texture,
            view,
            sampler: None,
            format: config.layout.format(),
            visible_to: config.visible_to,
        }
    }

    fn write_sub_image(
        &mut self,
        handle: &Self::Handle,
        region: Region,
        format: ComponentFormat,
        data: &[u8],
    ) {
        debug_assert_eq!(format, handle.format);
        let widened = widen_for_upload(format, data);
        let bytes_per_row = region.width as usize * gpu_bytes_per_texel(format);
        logwise::trace_sync!(
            "write_texture {format} ({x},{y}) {w}x{h}",
            format = logwise::privacy::LogIt(handle.texture.format()),
            x = region.x,
            y = region.y,
            w = region.width,
            h = region.height
        );
        self.queue.write_texture(
            TexelCopyTextureInfo {
                texture: &handle.texture,
                mip_level: 0,
                origin: wgpu::Origin3d {
                    x: region.x,
                    y: region.y,
                    z: 0,
                },
                aspect: wgpu::TextureAspect::All,
            },
            &widened,
            TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row as u32),
                rows_per_image: Some(region.height),
            },
            Extent3d {
                width: region.width,
                height: region.height,
                depth_or_array_layers: 1,
            },
        );
    }

    fn set_filtering_nearest_clamp_to_edge(&mut self, handle: &mut Self::Handle) {
        let sampler = self.device.create_sampler(&wgpu::SamplerDescriptor {
            label: None,
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        handle.sampler = Some(sampler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_widens_to_rgba() {
        let data: [u16; 6] = [1, 2, 3, 4, 5, 6];
        let widened = widen_for_upload(ComponentFormat::RGB16UI, bytemuck::cast_slice(&data));
        let texels: Vec<u16> = widened
            .chunks_exact(2)
            .map(|b| u16::from_ne_bytes([b[0], b[1]]))
            .collect();
        assert_eq!(texels, vec![1, 2, 3, 0, 4, 5, 6, 0]);
    }

    #[test]
    fn other_formats_pass_through() {
        let data = [9u8; 8];
        assert!(matches!(
            widen_for_upload(ComponentFormat::RG32UI, &data),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn formats() {
        assert_eq!(
            wgpu_format(ComponentFormat::RGBA8UI),
            wgpu::TextureFormat::Rgba8Uint
        );
        assert_eq!(
            wgpu_format(ComponentFormat::RGB32F),
            wgpu::TextureFormat::Rgba32Float
        );
        assert_eq!(
            wgpu_format(ComponentFormat::RGB8UI),
            wgpu::TextureFormat::Rgba8Uint
        );
        assert_eq!(
            wgpu_format(ComponentFormat::RG16UI),
            wgpu::TextureFormat::Rg16Uint
        );
        assert_eq!(
            wgpu_format(ComponentFormat::R16UI),
            wgpu::TextureFormat::R16Uint
        );
        for format in [ComponentFormat::RGB16UI, ComponentFormat::RGBA32F] {
            assert_eq!(
                Some(gpu_bytes_per_texel(format) as u32),
                wgpu_format(format).block_copy_size(None)
            );
        }
    }
}
