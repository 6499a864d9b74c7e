use std::cell::Cell;
use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{DynamicImage, ImageBuffer, ImageFormat, Luma};
use qrcode::{Color, QrCode};

use crate::config::{RenderOptions, MAX_IMAGE_SIZE, PNG_MIME};
use crate::error::ErrorKind;

/*---- Artifact ----*/

/// A rendered QR code: PNG bytes plus a `data:` URI of the same bytes.
///
/// Artifacts are rebuilt on every dispatch and never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageArtifact {
    bytes: Vec<u8>,
    data_uri: String,
    name_hint: Option<String>,
}

impl ImageArtifact {
    /// Wraps encoded PNG bytes and derives the data URI.
    pub fn from_png(bytes: Vec<u8>) -> Self {
        let data_uri = format!("data:{};base64,{}", PNG_MIME, STANDARD.encode(&bytes));
        Self {
            bytes,
            data_uri,
            name_hint: None,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }

    pub fn mime(&self) -> &'static str {
        PNG_MIME
    }

    /// File name the native share sheet should see, when the shell asked for one.
    pub fn name_hint(&self) -> Option<&str> {
        self.name_hint.as_deref()
    }

    pub fn with_name_hint(mut self, hint: Option<String>) -> Self {
        self.name_hint = hint;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/*---- Surface ----*/

/// Something that turns a payload into an [`ImageArtifact`].
///
/// The dispatcher only sees this trait, so a shell can substitute its own renderer.
pub trait Surface {
    /// Renders `text` as a `size` x `size` PNG.
    ///
    /// # Errors
    ///
    /// * [`ErrorKind::SurfaceUnavailable`] if the surface is not mounted.
    /// * [`ErrorKind::ArtifactUnavailable`] if `text` is empty, `size` is zero or above
    ///   [`MAX_IMAGE_SIZE`], or encoding fails.
    fn render(&self, text: &str, size: u32) -> Result<ImageArtifact, ErrorKind>;
}

/// The QR code surface displayed by the shell.
///
/// A fresh surface is unmounted; the shell calls [`QrSurface::mount`] once the element that
/// shows the code exists. Rendering before that fails with [`ErrorKind::SurfaceUnavailable`].
///
/// # Example
///
/// ```rust
/// use qrshare::surface::{QrSurface, Surface};
///
/// let surface = QrSurface::default();
/// surface.mount();
/// let artifact = surface.render("https://example.com", 200).unwrap();
/// assert!(artifact.data_uri().starts_with("data:image/png;base64,"));
/// ```
#[derive(Debug, Default)]
pub struct QrSurface {
    mounted: Cell<bool>,
    options: RenderOptions,
}

impl QrSurface {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            mounted: Cell::new(false),
            options,
        }
    }

    pub fn mount(&self) {
        self.mounted.set(true);
    }

    pub fn unmount(&self) {
        self.mounted.set(false);
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.get()
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }
}

impl Surface for QrSurface {
    fn render(&self, text: &str, size: u32) -> Result<ImageArtifact, ErrorKind> {
        if !self.is_mounted() {
            return Err(ErrorKind::SurfaceUnavailable);
        }
        let img = generate_image_buffer(text, size, self.options())?;
        let bytes = encode_png(img)?;
        log::debug!("rendered {size}x{size} QR code ({} bytes)", bytes.len());
        Ok(ImageArtifact::from_png(bytes))
    }
}

/*---- Utilities ----*/

/// Generates a `size` x `size` QR code image buffer for `content`.
///
/// Each pixel takes the colour of the module under it, quiet zone included, so the output
/// is exactly `size` pixels wide whatever the symbol version.
///
/// # Arguments
///
/// * `content` - The content to encode. Must not be empty.
/// * `size` - Edge length in pixels, from 1 to [`MAX_IMAGE_SIZE`].
/// * `options` - Error correction level, quiet zone and colours.
///
/// # Example
///
/// ```rust
/// use qrshare::config::RenderOptions;
/// use qrshare::surface::generate_image_buffer;
///
/// let img = generate_image_buffer("Hello, World!", 120, &RenderOptions::default()).unwrap();
/// assert_eq!(img.dimensions(), (120, 120));
/// ```
pub fn generate_image_buffer(
    content: &str,
    size: u32,
    options: &RenderOptions,
) -> Result<ImageBuffer<Luma<u8>, Vec<u8>>, ErrorKind> {
    if content.is_empty() || size == 0 {
        return Err(ErrorKind::ArtifactUnavailable);
    }
    if size > MAX_IMAGE_SIZE {
        log::warn!("refusing to render a {size}x{size} QR code");
        return Err(ErrorKind::ArtifactUnavailable);
    }
    let qr = QrCode::with_error_correction_level(content.as_bytes(), options.error_correction)?;
    let modules = qr.width() as u64;
    let border = u64::from(options.margin);
    let span = modules + 2 * border;
    let size64 = u64::from(size);

    let is_dark = |module_x: u64, module_y: u64| -> bool {
        let range = border..border + modules;
        range.contains(&module_x)
            && range.contains(&module_y)
            && qr[((module_x - border) as usize, (module_y - border) as usize)] == Color::Dark
    };

    let mut img = ImageBuffer::new(size, size);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let module_x = u64::from(x) * span / size64;
        let module_y = u64::from(y) * span / size64;
        *pixel = if is_dark(module_x, module_y) {
            options.dark
        } else {
            options.light
        };
    }

    Ok(img)
}

/// Encodes a greyscale buffer as PNG bytes.
pub fn encode_png(img: ImageBuffer<Luma<u8>, Vec<u8>>) -> Result<Vec<u8>, ErrorKind> {
    let mut bytes: Vec<u8> = Vec::new();
    DynamicImage::ImageLuma8(img).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}
