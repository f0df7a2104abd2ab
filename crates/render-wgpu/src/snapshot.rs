use std::io::Cursor;

use crossbeam_channel::{Receiver, TryRecvError};
use image::{ImageFormat, RgbaImage, imageops::FilterType};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("cannot read back texture format {0:?}")]
    UnsupportedFormat(wgpu::TextureFormat),
    #[error("texture was not created with COPY_SRC usage")]
    NotCopyable,
    #[error("mapping the readback buffer failed: {0}")]
    Map(#[from] wgpu::BufferAsyncError),
    #[error("readback was dropped before the GPU finished")]
    Dropped,
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("pixel buffer does not match {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
}

/// Round a row length up to wgpu's copy row alignment.
fn align_bytes_per_row(value: u32) -> u32 {
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    value.div_ceil(align) * align
}

/// Strip row padding from a mapped readback and convert to RGBA.
fn tighten_rows(data: &[u8], width: u32, height: u32, padded_bpr: u32, bgra: bool) -> Vec<u8> {
    let tight_bpr = width as usize * 4;
    let mut tight = Vec::with_capacity(tight_bpr * height as usize);
    for row in data.chunks(padded_bpr as usize).take(height as usize) {
        tight.extend_from_slice(&row[..tight_bpr]);
    }
    if bgra {
        for pixel in tight.chunks_exact_mut(4) {
            pixel.swap(0, 2);
        }
    }
    tight
}

/// A texture copy in flight. Poll it with [`PendingCapture::try_finish`]
/// on later frames; the frame that started it never waits on the GPU.
pub struct PendingCapture {
    buffer: wgpu::Buffer,
    receiver: Receiver<Result<(), wgpu::BufferAsyncError>>,
    width: u32,
    height: u32,
    padded_bpr: u32,
    bgra: bool,
}

impl PendingCapture {
    /// Copy `texture` into a staging buffer and request it be mapped.
    ///
    /// Call after the frame's draw has been submitted and before the
    /// surface texture is presented.
    pub fn begin(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        texture: &wgpu::Texture,
    ) -> Result<Self, SnapshotError> {
        let format = texture.format();
        let bgra = match format {
            wgpu::TextureFormat::Rgba8Unorm | wgpu::TextureFormat::Rgba8UnormSrgb => false,
            wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb => true,
            other => return Err(SnapshotError::UnsupportedFormat(other)),
        };
        if !texture.usage().contains(wgpu::TextureUsages::COPY_SRC) {
            return Err(SnapshotError::NotCopyable);
        }

        let width = texture.width();
        let height = texture.height();
        let padded_bpr = align_bytes_per_row(width * 4);

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("snapshot_staging"),
            size: u64::from(padded_bpr) * u64::from(height),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("snapshot_encoder"),
        });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bpr),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        queue.submit(std::iter::once(encoder.finish()));

        let (sender, receiver) = crossbeam_channel::bounded(1);
        buffer.slice(..).map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });

        tracing::trace!(width, height, ?format, "frame capture started");
        Ok(Self {
            buffer,
            receiver,
            width,
            height,
            padded_bpr,
            bgra,
        })
    }

    /// Returns `None` while the copy is still in flight.
    pub fn try_finish(&self, device: &wgpu::Device) -> Option<Result<CapturedFrame, SnapshotError>> {
        device.poll(wgpu::Maintain::Poll);
        let mapped = match self.receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => return Some(Err(SnapshotError::Dropped)),
        };
        Some(mapped.map_err(SnapshotError::from).map(|()| {
            let rgba = {
                let data = self.buffer.slice(..).get_mapped_range();
                tighten_rows(&data, self.width, self.height, self.padded_bpr, self.bgra)
            };
            self.buffer.unmap();
            CapturedFrame {
                width: self.width,
                height: self.height,
                rgba,
            }
        }))
    }
}

/// Tightly packed RGBA8 pixels of one rendered frame.
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Square preview image, both as raw pixels and PNG bytes.
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub size: u32,
    pub rgba: Vec<u8>,
    pub png: Vec<u8>,
}

impl CapturedFrame {
    /// Scale the frame to a `size` x `size` thumbnail and encode it as PNG.
    pub fn thumbnail(&self, size: u32) -> Result<Thumbnail, SnapshotError> {
        let invalid = SnapshotError::InvalidSize {
            width: self.width,
            height: self.height,
        };
        if size == 0 {
            return Err(invalid);
        }
        let frame = RgbaImage::from_raw(self.width, self.height, self.rgba.clone())
            .ok_or(invalid)?;
        let scaled = image::imageops::resize(&frame, size, size, FilterType::Triangle);

        let mut png = Cursor::new(Vec::new());
        scaled.write_to(&mut png, ImageFormat::Png)?;

        Ok(Thumbnail {
            size,
            rgba: scaled.into_raw(),
            png: png.into_inner(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_align_to_copy_alignment() {
        assert_eq!(align_bytes_per_row(4), 256);
        assert_eq!(align_bytes_per_row(256), 256);
        assert_eq!(align_bytes_per_row(257), 512);
    }

    #[test]
    fn tighten_drops_row_padding() {
        // 2x2 image, rows padded to 12 bytes.
        let data = [
            1, 2, 3, 4, 5, 6, 7, 8, 0, 0, 0, 0, //
            9, 10, 11, 12, 13, 14, 15, 16, 0, 0, 0, 0,
        ];
        let tight = tighten_rows(&data, 2, 2, 12, false);
        assert_eq!(tight, (1..=16).collect::<Vec<u8>>());
    }

    #[test]
    fn tighten_swizzles_bgra() {
        let data = [10, 20, 30, 255];
        assert_eq!(tighten_rows(&data, 1, 1, 4, true), vec![30, 20, 10, 255]);
    }

    #[test]
    fn thumbnail_is_square_png() {
        let frame = CapturedFrame {
            width: 8,
            height: 4,
            rgba: [0, 0, 128, 255].repeat(32),
        };
        let thumb = frame.thumbnail(2).unwrap();
        assert_eq!(thumb.size, 2);
        assert_eq!(thumb.rgba.len(), 2 * 2 * 4);
        assert_eq!(&thumb.png[..8], b"\x89PNG\r\n\x1a\n");
        let blue = thumb.rgba[2];
        assert!((127..=129).contains(&blue), "blue={blue}");
        assert_eq!(thumb.rgba[3], 255);
    }

    #[test]
    fn thumbnail_rejects_mismatched_buffer() {
        let frame = CapturedFrame {
            width: 4,
            height: 4,
            rgba: vec![0; 10],
        };
        assert!(matches!(
            frame.thumbnail(2),
            Err(SnapshotError::InvalidSize { .. })
        ));
    }
}
