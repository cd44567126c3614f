//! Texture resource management for wgpu
//!
//! Depth buffers, sampled textures decoded from image files, and the
//! registry that maps [`TextureUnit`]s to uploaded textures.

use std::path::{Path, PathBuf};

use crate::{error::TextureError, gfx::resources::material::TextureUnit};

/// GPU texture resource containing texture, view, and sampler
pub struct TextureResource {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl TextureResource {
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Creates a depth buffer matching the surface dimensions.
    pub fn create_depth_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        // Never sampled; present so every TextureResource has the same shape
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{label} Sampler")),
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Uploads RGBA8 pixels (4 bytes per pixel, first row at v = 0).
    ///
    /// Addressing mirrors on repeat so UVs slightly outside the unit square
    /// do not show a seam.
    pub fn create_from_rgba_data_with_filter(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[u8],
        width: u32,
        height: u32,
        label: &str,
        filter_mode: wgpu::FilterMode,
    ) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            address_mode_u: wgpu::AddressMode::MirrorRepeat,
            address_mode_v: wgpu::AddressMode::MirrorRepeat,
            address_mode_w: wgpu::AddressMode::MirrorRepeat,
            mag_filter: filter_mode,
            min_filter: filter_mode,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// 1×1 texture of a single color.
    pub fn solid_color(device: &wgpu::Device, queue: &wgpu::Queue, rgba: [u8; 4], label: &str) -> Self {
        Self::create_from_rgba_data_with_filter(device, queue, &rgba, 1, 1, label, wgpu::FilterMode::Nearest)
    }
}

/// Decoded image, flipped so the first row is the bottom of the picture.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Channel count of the source file; `pixels` is always RGBA.
    pub channels: u8,
}

/// Reads and decodes an image file, flipping it vertically so that texture
/// coordinate v = 0 addresses the bottom row.
pub fn decode_image(path: &Path) -> Result<DecodedImage, TextureError> {
    let image = image::open(path).map_err(|source| TextureError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    if image.width() == 0 || image.height() == 0 {
        return Err(TextureError::Empty {
            path: path.to_path_buf(),
        });
    }

    let channels = image.color().channel_count();
    let rgba = image.flipv().to_rgba8();
    Ok(DecodedImage {
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
        channels,
    })
}

/// Uploaded textures addressed by [`TextureUnit`].
///
/// Unit 0 is a white fallback. Failed loads are logged and resolve to it,
/// so a missing file degrades the look of an object but never stops the
/// scene from rendering.
pub struct TextureRegistry {
    fallback: TextureResource,
    loaded: Vec<(PathBuf, TextureResource)>,
}

impl TextureRegistry {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self {
            fallback: TextureResource::solid_color(device, queue, [255; 4], "Fallback Texture"),
            loaded: Vec::new(),
        }
    }

    /// Loads `path` and returns its unit. Loading the same path twice
    /// returns the existing unit.
    pub fn load(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, path: &Path) -> TextureUnit {
        if let Some(index) = self.loaded.iter().position(|(p, _)| p == path) {
            return TextureUnit(index + 1);
        }

        match decode_image(path) {
            Ok(image) => {
                log::info!(
                    "loaded texture {} ({}x{}, {} channels)",
                    path.display(),
                    image.width,
                    image.height,
                    image.channels
                );
                let label = path.display().to_string();
                let texture = TextureResource::create_from_rgba_data_with_filter(
                    device,
                    queue,
                    &image.pixels,
                    image.width,
                    image.height,
                    &label,
                    wgpu::FilterMode::Linear,
                );
                self.loaded.push((path.to_path_buf(), texture));
                TextureUnit(self.loaded.len())
            }
            Err(e) => {
                log::warn!("{e}; using fallback texture");
                TextureUnit::DEFAULT
            }
        }
    }

    /// Texture for `unit`; unknown units resolve to the fallback.
    pub fn get(&self, unit: TextureUnit) -> &TextureResource {
        unit.0
            .checked_sub(1)
            .and_then(|index| self.loaded.get(index))
            .map(|(_, texture)| texture)
            .unwrap_or(&self.fallback)
    }

    /// Number of units, fallback included.
    pub fn unit_count(&self) -> usize {
        self.loaded.len() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_png(name: &str, pixels: &[[u8; 4]], width: u32, height: u32) -> PathBuf {
        let path = std::env::temp_dir().join(format!("tabletop-{}-{name}.png", std::process::id()));
        let raw: Vec<u8> = pixels.iter().flatten().copied().collect();
        let image = image::RgbaImage::from_raw(width, height, raw).unwrap();
        image.save(&path).unwrap();
        path
    }

    #[test]
    fn test_decode_flips_vertically() {
        const RED: [u8; 4] = [255, 0, 0, 255];
        const BLUE: [u8; 4] = [0, 0, 255, 255];
        // Top row red, bottom row blue
        let path = temp_png("flip", &[RED, RED, BLUE, BLUE], 2, 2);

        let decoded = decode_image(&path).unwrap();
        assert_eq!((decoded.width, decoded.height), (2, 2));
        assert_eq!(decoded.channels, 4);
        assert_eq!(&decoded.pixels[0..4], &BLUE);
        assert_eq!(&decoded.pixels[12..16], &RED);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let path = std::env::temp_dir().join("tabletop-definitely-missing.png");
        match decode_image(&path) {
            Err(TextureError::Decode { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected decode error, got {other:?}"),
        }
    }
}
