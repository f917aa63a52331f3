//! Batch image format conversion.
//!
//! Images are decoded with the `image` crate and re-encoded in the target
//! format. Formats without an alpha channel are flattened onto white first.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

use crate::batch::BatchOutcome;
use crate::error::{CoreError, CoreResult};
use crate::utils::file_name_lossy;

/// Target extensions accepted by [`convert_images`].
pub const SUPPORTED_IMAGE_TARGETS: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".webp", ".bmp", ".gif", ".tiff", ".tif", ".ico",
];

/// Targets that cannot store transparency.
const NO_ALPHA_TARGETS: &[&str] = &[".jpg", ".jpeg", ".bmp"];

/// Default JPEG quality.
pub const DEFAULT_IMAGE_QUALITY: u8 = 95;

/// Suffix used when the output would overwrite its own input.
const CONVERTED_SUFFIX: &str = "_converted";

/// Options for [`convert_images`].
#[derive(Debug, Clone)]
pub struct ImageConvertOptions {
    /// Target extension, with or without the leading dot
    pub target_ext: String,
    /// Output directory; `None` writes next to each input
    pub output_dir: Option<PathBuf>,
    /// JPEG quality, clamped to 1..=100
    pub quality: u8,
    /// Remove inputs whose extension differs from the target after success
    pub delete_originals: bool,
}

impl Default for ImageConvertOptions {
    fn default() -> Self {
        Self {
            target_ext: ".png".to_string(),
            output_dir: None,
            quality: DEFAULT_IMAGE_QUALITY,
            delete_originals: false,
        }
    }
}

/// Normalizes a target extension to lowercase with a leading dot.
pub fn normalize_target_ext(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{ext}")
    }
}

fn image_format_for(ext: &str) -> Option<ImageFormat> {
    match ext {
        ".png" => Some(ImageFormat::Png),
        ".jpg" | ".jpeg" => Some(ImageFormat::Jpeg),
        ".webp" => Some(ImageFormat::WebP),
        ".bmp" => Some(ImageFormat::Bmp),
        ".gif" => Some(ImageFormat::Gif),
        ".tiff" | ".tif" => Some(ImageFormat::Tiff),
        ".ico" => Some(ImageFormat::Ico),
        _ => None,
    }
}

/// Output path for one input.
///
/// `{dir}/{stem}{ext}`, or `{dir}/{stem}_converted{ext}` when that would be
/// the input itself.
pub fn image_output_path(input: &Path, output_dir: Option<&Path>, target_ext: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let dir = output_dir
        .map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_default();

    let candidate = dir.join(format!("{stem}{target_ext}"));
    if candidate == input {
        dir.join(format!("{stem}{CONVERTED_SUFFIX}{target_ext}"))
    } else {
        candidate
    }
}

/// Converts a single image.
pub fn convert_image(input: &Path, output: &Path, quality: u8) -> CoreResult<()> {
    let target_ext = output
        .extension()
        .map(|e| normalize_target_ext(&e.to_string_lossy()))
        .unwrap_or_default();
    let format = image_format_for(&target_ext).ok_or_else(|| {
        CoreError::InvalidInput(format!("Unsupported target format: {target_ext}"))
    })?;

    let img = image::open(input)?;
    let img = if NO_ALPHA_TARGETS.contains(&target_ext.as_str()) {
        flatten_onto_white(&img)
    } else {
        DynamicImage::ImageRgba8(img.to_rgba8())
    };

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    if format == ImageFormat::Jpeg {
        let writer = BufWriter::new(File::create(output)?);
        let encoder = JpegEncoder::new_with_quality(writer, quality.clamp(1, 100));
        img.write_with_encoder(encoder)?;
    } else {
        img.save_with_format(output, format)?;
    }
    Ok(())
}

/// Composites an image onto an opaque white background.
fn flatten_onto_white(img: &DynamicImage) -> DynamicImage {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut out = RgbImage::new(width, height);
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let alpha = u32::from(pixel[3]);
        let blend = |c: u8| ((u32::from(c) * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        out.put_pixel(x, y, Rgb([blend(pixel[0]), blend(pixel[1]), blend(pixel[2])]));
    }
    DynamicImage::ImageRgb8(out)
}

/// Converts every input to the target format.
///
/// # Returns
///
/// * `Ok(BatchOutcome)` - Per-item results; failures never stop the batch
/// * `Err(CoreError::InvalidInput)` - If the target format is not supported
pub fn convert_images(inputs: &[PathBuf], options: &ImageConvertOptions) -> CoreResult<BatchOutcome> {
    let target_ext = normalize_target_ext(&options.target_ext);
    if !SUPPORTED_IMAGE_TARGETS.contains(&target_ext.as_str()) {
        return Err(CoreError::InvalidInput(format!(
            "Unsupported target format: {target_ext}"
        )));
    }

    log::info!(
        "Converting {} image(s) to {} (quality {})",
        inputs.len(),
        target_ext.to_uppercase(),
        options.quality
    );

    let mut outcome = BatchOutcome::new();
    let total = inputs.len();

    for (i, input) in inputs.iter().enumerate() {
        let output = image_output_path(input, options.output_dir.as_deref(), &target_ext);
        let name = file_name_lossy(input);

        match convert_image(input, &output, options.quality) {
            Ok(()) => {
                log::info!("[{}/{}] {} -> {}", i + 1, total, input.display(), output.display());
                outcome.record_success();
                if options.delete_originals && extension_differs(input, &target_ext) {
                    match fs::remove_file(input) {
                        Ok(()) => outcome.deleted_originals += 1,
                        Err(e) => log::warn!("Failed to delete {}: {}", input.display(), e),
                    }
                }
            }
            Err(e) => {
                log::error!("[{}/{}] {} failed: {}", i + 1, total, input.display(), e);
                outcome.record_failure(&name, e.to_string());
            }
        }
    }

    Ok(outcome)
}

fn extension_differs(input: &Path, target_ext: &str) -> bool {
    let ext = input
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default();
    ext != target_ext
}
