// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Which shader stages read a data texture.
//!
//! Data textures are only ever read with direct texel fetches (`texelFetch` in GLSL,
//! `textureLoad` in WGSL), never sampled, so unlike image textures there is no "sample"
//! variant here.  The declaration is forwarded to the [`TextureSink`](crate::sink::TextureSink)
//! so a backend can set up bind group visibility.
//!
//! # Examples
//!
//! ```
//! use data_textures::visible_to::TextureUsage;
//!
//! // positions and indices are fetched per vertex
//! let geometry = TextureUsage::VertexShaderRead;
//! // colors and flags are needed again when shading the fragment
//! let metadata = TextureUsage::VertexAndFragmentShaderRead;
//! assert!(metadata.vertex() && metadata.fragment());
//! assert!(!geometry.fragment());
//! ```

/// Describes which shader stages fetch texels from a data texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureUsage {
    /// Read with direct texel fetches in the fragment shader.
    FragmentShaderRead,

    /// Read with direct texel fetches in the vertex shader.
    ///
    /// The common case: vertex shaders look records up by vertex index.
    VertexShaderRead,

    /// Read in both vertex and fragment shaders.
    #[default]
    VertexAndFragmentShaderRead,
}

impl TextureUsage {
    pub const fn vertex(&self) -> bool {
        matches!(
            self,
            TextureUsage::VertexShaderRead | TextureUsage::VertexAndFragmentShaderRead
        )
    }

    pub const fn fragment(&self) -> bool {
        matches!(
            self,
            TextureUsage::FragmentShaderRead | TextureUsage::VertexAndFragmentShaderRead
        )
    }
}
