use std::path::Path;

use anyhow::{Context, Result};
use image::imageops::flip_vertical_in_place;
use image::RgbaImage;
use wgpu::util::{DeviceExt, TextureDataOrder};

use crate::types::TextureSettings;

const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

pub(crate) struct TextureResources {
    pub _texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub resolution: (u32, u32),
}

/// Uploads the configured image, or a white placeholder when none is
/// configured or the image cannot be decoded.
pub(crate) fn create_resources(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    settings: &TextureSettings,
) -> TextureResources {
    let Some(path) = settings.path.as_deref() else {
        return create_placeholder(device, queue, settings);
    };

    match decode_image(path, settings.flip_vertical) {
        Ok(rgba) => {
            tracing::info!(
                path = %path.display(),
                width = rgba.width(),
                height = rgba.height(),
                wrap = %settings.wrap,
                filter = %settings.filter,
                "loaded texture"
            );
            upload(device, queue, settings, "triangle texture", &rgba)
        }
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                error = %error,
                "failed to load texture; using placeholder"
            );
            create_placeholder(device, queue, settings)
        }
    }
}

/// Decodes an image to RGBA8, flipping rows when the texture origin is bottom-left.
pub(crate) fn decode_image(path: &Path, flip_vertical: bool) -> Result<RgbaImage> {
    let image = image::open(path)
        .with_context(|| format!("failed to open texture at {}", path.display()))?;
    let mut rgba = image.to_rgba8();
    if flip_vertical {
        flip_vertical_in_place(&mut rgba);
    }
    Ok(rgba)
}

pub(crate) fn sampler_descriptor(settings: &TextureSettings) -> wgpu::SamplerDescriptor<'static> {
    let address_mode = settings.wrap.address_mode();
    let filter = settings.filter.filter();
    wgpu::SamplerDescriptor {
        label: Some("triangle texture sampler"),
        address_mode_u: address_mode,
        address_mode_v: address_mode,
        address_mode_w: address_mode,
        mag_filter: filter,
        min_filter: filter,
        mipmap_filter: filter,
        ..Default::default()
    }
}

fn create_placeholder(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    settings: &TextureSettings,
) -> TextureResources {
    let white = RgbaImage::from_pixel(1, 1, image::Rgba([255, 255, 255, 255]));
    upload(device, queue, settings, "placeholder texture", &white)
}

fn upload(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    settings: &TextureSettings,
    label: &str,
    rgba: &RgbaImage,
) -> TextureResources {
    let (width, height) = rgba.dimensions();
    let texture = device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        TextureDataOrder::LayerMajor,
        rgba.as_raw(),
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let sampler = device.create_sampler(&sampler_descriptor(settings));

    TextureResources {
        _texture: texture,
        view,
        sampler,
        resolution: (width, height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FilterMode, WrapMode};
    use tempfile::TempDir;

    #[test]
    fn decode_flips_rows_to_bottom_left_origin() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stripes.png");
        let mut img = RgbaImage::new(1, 2);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        img.put_pixel(0, 1, image::Rgba([0, 0, 255, 255]));
        img.save(&path).unwrap();

        let flipped = decode_image(&path, true).unwrap();
        assert_eq!(flipped.get_pixel(0, 0).0, [0, 0, 255, 255]);
        assert_eq!(flipped.get_pixel(0, 1).0, [255, 0, 0, 255]);

        let untouched = decode_image(&path, false).unwrap();
        assert_eq!(untouched.get_pixel(0, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn decode_reports_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = decode_image(&dir.path().join("absent.png"), true).unwrap_err();
        assert!(err.to_string().contains("absent.png"));
    }

    #[test]
    fn sampler_uses_configured_wrap_and_filter() {
        let settings = TextureSettings {
            path: None,
            wrap: WrapMode::ClampToEdge,
            filter: FilterMode::Nearest,
            flip_vertical: true,
        };
        let descriptor = sampler_descriptor(&settings);
        assert_eq!(descriptor.address_mode_u, wgpu::AddressMode::ClampToEdge);
        assert_eq!(descriptor.address_mode_v, wgpu::AddressMode::ClampToEdge);
        assert_eq!(descriptor.mag_filter, wgpu::FilterMode::Nearest);
        assert_eq!(descriptor.min_filter, wgpu::FilterMode::Nearest);
    }

    #[test]
    fn default_sampler_repeats_with_linear_filtering() {
        let descriptor = sampler_descriptor(&TextureSettings::default());
        assert_eq!(descriptor.address_mode_u, wgpu::AddressMode::Repeat);
        assert_eq!(descriptor.mag_filter, wgpu::FilterMode::Linear);
    }
}
