use crate::error::{HarmonizerError, Result};
use base64::Engine;
use dicom_object::DefaultDicomObject;
use dicom_pixeldata::PixelDecoder;
use image::codecs::jpeg::JpegEncoder;
use image::GrayImage;
use log::debug;

/// Value every pixel takes when the source image has no dynamic range
pub const FLAT_IMAGE_VALUE: u8 = 128;

/// Single-channel pixel grid with arbitrary numeric range
///
/// Values are stored row-major, `rows * columns` of them.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelGrid {
    rows: u32,
    columns: u32,
    values: Vec<f64>,
}

impl PixelGrid {
    /// Creates a new PixelGrid
    ///
    /// # Errors
    ///
    /// Returns a decode error if the grid is empty or the number of values
    /// does not match the dimensions
    pub fn new(rows: u32, columns: u32, values: Vec<f64>) -> Result<Self> {
        if rows == 0 || columns == 0 {
            return Err(HarmonizerError::Decode(format!(
                "empty pixel grid ({}x{})",
                rows, columns
            )));
        }
        if values.len() != rows as usize * columns as usize {
            return Err(HarmonizerError::Decode(format!(
                "pixel grid {}x{} expects {} values, found {}",
                rows,
                columns,
                rows as usize * columns as usize,
                values.len()
            )));
        }
        Ok(Self {
            rows,
            columns,
            values,
        })
    }

    /// Decodes the first frame of a DICOM object's pixel data
    ///
    /// Multi-sample (colour) pixels are averaged into one channel.
    pub fn from_dicom(obj: &DefaultDicomObject) -> Result<Self> {
        let decoded = obj.decode_pixel_data()?;
        let rows = decoded.rows();
        let columns = decoded.columns();
        let samples = decoded.samples_per_pixel().max(1) as usize;

        let raw: Vec<f32> = decoded.to_vec_frame(0)?;
        debug!(
            "Decoded pixel frame {}x{} with {} sample(s) per pixel",
            rows, columns, samples
        );

        let values = raw
            .chunks(samples)
            .map(|px| px.iter().map(|&v| f64::from(v)).sum::<f64>() / px.len() as f64)
            .collect();

        Self::new(rows, columns, values)
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns the (min, max) of all finite values
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Linearly rescales the grid onto 0-255
///
/// `(value - min) / (max - min) * 255`, truncated to u8. A grid with
/// `max == min` (or no finite values) becomes a uniform
/// [`FLAT_IMAGE_VALUE`] image instead of dividing by zero.
pub fn normalize(grid: &PixelGrid) -> Result<GrayImage> {
    let data: Vec<u8> = match grid.value_range() {
        Some((min, max)) if max > min => {
            let range = max - min;
            grid.values
                .iter()
                .map(|&v| {
                    if v.is_finite() {
                        ((v - min) / range * 255.0) as u8
                    } else {
                        0
                    }
                })
                .collect()
        }
        _ => {
            debug!("Flat pixel grid, substituting constant image");
            vec![FLAT_IMAGE_VALUE; grid.values.len()]
        }
    };

    GrayImage::from_raw(grid.columns, grid.rows, data).ok_or_else(|| {
        HarmonizerError::Decode("pixel buffer does not match image dimensions".to_string())
    })
}

/// Encodes an 8-bit image as JPEG and returns it base64-encoded
pub fn encode_jpeg_base64(img: &GrayImage, quality: u8) -> Result<String> {
    let mut buf: Vec<u8> = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    encoder.encode_image(img)?;
    Ok(base64::engine::general_purpose::STANDARD.encode(&buf))
}

/// Full normalizer: DICOM pixel data to base64 JPEG text
pub fn normalize_object(obj: &DefaultDicomObject, quality: u8) -> Result<String> {
    let grid = PixelGrid::from_dicom(obj)?;
    let img = normalize(&grid)?;
    encode_jpeg_base64(&img, quality)
}
