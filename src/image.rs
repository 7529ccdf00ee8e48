// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use crate::error::{Error, Result};
use core::fmt;
use std::str::FromStr;
use tracing::debug;
use turbojpeg::OwnedBuf;

/// Pixel layouts accepted by the engine.
///
/// Packed RGB variants document their byte order from the lowest address.
/// YUV variants describe how the luma and chroma planes are arranged, either
/// inside one contiguous buffer ([`PackedImage`]) or as separate planes
/// ([`PlanarImage`]).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ImageType {
    /// R, G, B: 3 bytes per pixel.
    Rgb24,
    /// R, G, B, A: 4 bytes per pixel (Android `ARGB_8888`).
    Rgba32,
    /// B, G, R, A: 4 bytes per pixel (iOS `kCVPixelFormatType_32BGRA`).
    Bgra32,
    /// Y plane followed by an interleaved U/V plane, 2x2 subsampled chroma.
    Nv12,
    /// Y plane followed by an interleaved V/U plane, 2x2 subsampled chroma.
    Nv21,
    /// Y, U then V planes, 2x2 subsampled chroma (I420).
    Yuv420p,
    /// Y, V then U planes, 2x2 subsampled chroma (YV12).
    Yvu420p,
    /// Y, U then V planes, chroma subsampled horizontally (I422).
    ///
    /// Some vendor headers describe this layout as "V and U planes". The
    /// packed buffer is read U first like every other planar type here; pass
    /// V-first data through [`PlanarImage`] with the `u` and `v` planes
    /// swapped.
    Yuv422p,
    /// Y, U then V planes, full resolution chroma (I444). Same plane order
    /// note as [`ImageType::Yuv422p`].
    Yuv444p,
    /// Single 8-bit luma channel.
    Y,
    /// B, G, R: 3 bytes per pixel.
    Bgr24,
}

impl ImageType {
    pub const ALL: [ImageType; 11] = [
        ImageType::Rgb24,
        ImageType::Rgba32,
        ImageType::Bgra32,
        ImageType::Nv12,
        ImageType::Nv21,
        ImageType::Yuv420p,
        ImageType::Yvu420p,
        ImageType::Yuv422p,
        ImageType::Yuv444p,
        ImageType::Y,
        ImageType::Bgr24,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            ImageType::Rgb24 => "rgb24",
            ImageType::Rgba32 => "rgba32",
            ImageType::Bgra32 => "bgra32",
            ImageType::Nv12 => "nv12",
            ImageType::Nv21 => "nv21",
            ImageType::Yuv420p => "yuv420p",
            ImageType::Yvu420p => "yvu420p",
            ImageType::Yuv422p => "yuv422p",
            ImageType::Yuv444p => "yuv444p",
            ImageType::Y => "y",
            ImageType::Bgr24 => "bgr24",
        }
    }

    pub const fn is_yuv(self) -> bool {
        matches!(
            self,
            ImageType::Nv12
                | ImageType::Nv21
                | ImageType::Yuv420p
                | ImageType::Yvu420p
                | ImageType::Yuv422p
                | ImageType::Yuv444p
        )
    }

    pub const fn is_semi_planar(self) -> bool {
        matches!(self, ImageType::Nv12 | ImageType::Nv21)
    }

    /// Bytes per pixel of the single-plane layouts, `None` for YUV.
    pub const fn bytes_per_pixel(self) -> Option<usize> {
        match self {
            ImageType::Rgb24 | ImageType::Bgr24 => Some(3),
            ImageType::Rgba32 | ImageType::Bgra32 => Some(4),
            ImageType::Y => Some(1),
            _ => None,
        }
    }

    /// Horizontal and vertical chroma subsampling factors.
    pub const fn chroma_subsampling(self) -> (usize, usize) {
        match self {
            ImageType::Nv12 | ImageType::Nv21 | ImageType::Yuv420p | ImageType::Yvu420p => (2, 2),
            ImageType::Yuv422p => (2, 1),
            _ => (1, 1),
        }
    }

    /// Chroma plane dimensions for a `width` x `height` luma plane.
    pub const fn chroma_size(self, width: usize, height: usize) -> (usize, usize) {
        let (sx, sy) = self.chroma_subsampling();
        (width.div_ceil(sx), height.div_ceil(sy))
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ImageType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.to_ascii_lowercase();
        ImageType::ALL
            .into_iter()
            .find(|t| t.name() == lower)
            .ok_or_else(|| Error::invalid_argument(format!("unknown image type '{s}'")))
    }
}

/// EXIF/JPEG orientation code, always within `[1, 8]`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Orientation(u8);

impl Orientation {
    pub const UPRIGHT: Orientation = Orientation(1);

    pub fn code(self) -> u8 {
        self.0
    }

    /// Whether the upright image has width and height swapped (codes 5-8).
    pub fn swaps_dimensions(self) -> bool {
        self.0 >= 5
    }

    /// Returns the upright version of `src`.
    pub fn apply(self, src: &LumaImage) -> LumaImage {
        if self == Orientation::UPRIGHT {
            return src.clone();
        }

        let (w, h) = (src.width, src.height);
        let (out_w, out_h) = if self.swaps_dimensions() { (h, w) } else { (w, h) };
        let mut data = Vec::with_capacity(out_w * out_h);

        for oy in 0..out_h {
            for ox in 0..out_w {
                let (sx, sy) = match self.0 {
                    2 => (w - 1 - ox, oy),
                    3 => (w - 1 - ox, h - 1 - oy),
                    4 => (ox, h - 1 - oy),
                    5 => (oy, ox),
                    6 => (oy, h - 1 - ox),
                    7 => (w - 1 - oy, h - 1 - ox),
                    8 => (w - 1 - oy, ox),
                    _ => (ox, oy),
                };
                data.push(src.data[sy * w + sx]);
            }
        }

        LumaImage {
            width: out_w,
            height: out_h,
            data,
        }
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Orientation::UPRIGHT
    }
}

impl TryFrom<i32> for Orientation {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            1..=8 => Ok(Orientation(value as u8)),
            _ => Err(Error::invalid_argument(format!(
                "EXIF orientation {value} outside [1, 8]"
            ))),
        }
    }
}

/// Rectangle within an upright frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rect {
    /// X coordinate of top-left corner
    pub x: usize,
    /// Y coordinate of top-left corner
    pub y: usize,
    /// Width of the rectangle in pixels
    pub width: usize,
    /// Height of the rectangle in pixels
    pub height: usize,
}

impl Rect {
    /// Builds the region of interest from a `[left, right, top, bottom]`
    /// entry, clamped to a `width` x `height` frame.
    ///
    /// An all-zero entry selects the whole frame and yields `None`.
    pub fn from_roi(roi: [f32; 4], width: usize, height: usize) -> Result<Option<Rect>> {
        if roi.iter().all(|v| *v == 0.0) {
            return Ok(None);
        }
        let [left, right, top, bottom] = roi;
        let left = (left.max(0.0).floor() as usize).min(width);
        let right = (right.max(0.0).ceil() as usize).min(width);
        let top = (top.max(0.0).floor() as usize).min(height);
        let bottom = (bottom.max(0.0).ceil() as usize).min(height);

        if right <= left || bottom <= top {
            return Err(Error::invalid_argument(format!(
                "region of interest {roi:?} is empty within a {width}x{height} frame"
            )));
        }

        Ok(Some(Rect {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
        }))
    }
}

/// An RGB sample decoded from any supported layout.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// BT.601 luma in fixed point.
    pub fn luma(self) -> u8 {
        luma(self.r, self.g, self.b)
    }
}

#[inline]
fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((77 * r as u32 + 150 * g as u32 + 29 * b as u32 + 128) >> 8) as u8
}

/// Full range BT.601 YUV to RGB.
pub fn yuv_to_rgb(y: u8, u: u8, v: u8) -> Rgb {
    let c = y as i32;
    let d = u as i32 - 128;
    let e = v as i32 - 128;
    let clamp = |x: i32| x.clamp(0, 255) as u8;
    Rgb {
        r: clamp(c + ((359 * e + 128) >> 8)),
        g: clamp(c - ((88 * d + 183 * e + 128) >> 8)),
        b: clamp(c + ((454 * d + 128) >> 8)),
    }
}

/// Minimum slice length holding `rows` rows of `cols` samples spaced by
/// `pixel_stride` bytes, each row starting `row_stride` bytes apart.
///
/// `None` when the length does not fit in `usize`.
fn plane_len(rows: usize, cols: usize, row_stride: usize, pixel_stride: usize) -> Option<usize> {
    if rows == 0 || cols == 0 {
        return Some(0);
    }
    (rows - 1)
        .checked_mul(row_stride)?
        .checked_add((cols - 1).checked_mul(pixel_stride)?)?
        .checked_add(1)
}

fn size_overflow(width: usize, height: usize) -> Error {
    Error::invalid_argument(format!("image size {width}x{height} overflows"))
}

fn check_plane(name: &str, plane: &[u8], needed: usize) -> Result<()> {
    if plane.len() < needed {
        return Err(Error::invalid_argument(format!(
            "{name} plane holds {} bytes, expected at least {needed}",
            plane.len()
        )));
    }
    Ok(())
}

fn check_dimensions(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::invalid_argument(format!(
            "invalid image size {width}x{height}"
        )));
    }
    Ok(())
}

/// Borrowed view over the three planes of a YUV frame.
struct YuvPlanes<'a> {
    y: &'a [u8],
    u: &'a [u8],
    v: &'a [u8],
    y_stride: usize,
    u_stride: usize,
    v_stride: usize,
    uv_pixel_stride: usize,
    subsampling: (usize, usize),
}

impl YuvPlanes<'_> {
    fn sample(&self, x: usize, y: usize) -> (u8, u8, u8) {
        let (sx, sy) = self.subsampling;
        let (cx, cy) = (x / sx, y / sy);
        (
            self.y[y * self.y_stride + x],
            self.u[cy * self.u_stride + cx * self.uv_pixel_stride],
            self.v[cy * self.v_stride + cx * self.uv_pixel_stride],
        )
    }

    fn luma(&self, width: usize, height: usize) -> LumaImage {
        let mut data = Vec::with_capacity(width * height);
        for row in self.y.chunks(self.y_stride).take(height) {
            data.extend_from_slice(&row[..width]);
        }
        LumaImage {
            width,
            height,
            data,
        }
    }
}

/// A single caller-owned buffer holding a whole frame.
///
/// For YUV layouts the chroma planes directly follow the luma plane. Luma
/// rows are `stride` bytes apart, semi-planar chroma rows use the luma
/// stride rounded up to even, planar chroma rows use the stride divided by
/// the horizontal subsampling factor.
#[derive(Copy, Clone, Debug)]
pub struct PackedImage<'a> {
    pub image_type: ImageType,
    pub data: &'a [u8],
    pub width: usize,
    pub height: usize,
    /// Row stride in samples, 0 means `width`.
    pub stride: usize,
    /// EXIF orientation code, validated when processed.
    pub orientation: i32,
}

impl<'a> PackedImage<'a> {
    pub fn new(image_type: ImageType, data: &'a [u8], width: usize, height: usize) -> Self {
        Self {
            image_type,
            data,
            width,
            height,
            stride: 0,
            orientation: 1,
        }
    }

    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    pub fn with_orientation(mut self, orientation: i32) -> Self {
        self.orientation = orientation;
        self
    }

    /// Row stride in samples after resolving the `0` default.
    pub fn effective_stride(&self) -> usize {
        if self.stride == 0 {
            self.width
        } else {
            self.stride
        }
    }

    /// Checks dimensions, stride and buffer length.
    pub fn validate(&self) -> Result<()> {
        check_dimensions(self.width, self.height)?;
        let stride = self.effective_stride();
        if stride < self.width {
            return Err(Error::invalid_argument(format!(
                "stride {stride} smaller than width {}",
                self.width
            )));
        }

        let needed = self
            .required_len(stride)
            .ok_or_else(|| size_overflow(self.width, self.height))?;
        check_plane("image", self.data, needed)
    }

    /// Buffer length needed for the frame with rows `stride` samples apart.
    fn required_len(&self, stride: usize) -> Option<usize> {
        if let Some(bpp) = self.image_type.bytes_per_pixel() {
            return plane_len(
                self.height,
                self.width.checked_mul(bpp)?,
                stride.checked_mul(bpp)?,
                1,
            );
        }

        let (cw, ch) = self.image_type.chroma_size(self.width, self.height);
        let luma_len = stride.checked_mul(self.height)?;
        let chroma_len = if self.image_type.is_semi_planar() {
            plane_len(ch, cw, stride.checked_next_multiple_of(2)?, 2)?.checked_add(1)?
        } else {
            // first plane in full, then up to the last sample of the second
            let cs = self.chroma_stride();
            cs.checked_mul(ch)?
                .checked_add(plane_len(ch, cw, cs, 1)?)?
        };
        luma_len.checked_add(chroma_len)
    }

    fn chroma_stride(&self) -> usize {
        let (sx, _) = self.image_type.chroma_subsampling();
        self.effective_stride().div_ceil(sx)
    }

    fn yuv_planes(&self) -> YuvPlanes<'a> {
        let stride = self.effective_stride();
        let (_, ch) = self.image_type.chroma_size(self.width, self.height);
        let (y, chroma) = self.data.split_at(stride * self.height);

        if self.image_type.is_semi_planar() {
            let uv_stride = stride.next_multiple_of(2);
            let (u, v) = match self.image_type {
                ImageType::Nv12 => (chroma, &chroma[1..]),
                _ => (&chroma[1..], chroma),
            };
            return YuvPlanes {
                y,
                u,
                v,
                y_stride: stride,
                u_stride: uv_stride,
                v_stride: uv_stride,
                uv_pixel_stride: 2,
                subsampling: self.image_type.chroma_subsampling(),
            };
        }

        let cs = self.chroma_stride();
        let (first, second) = chroma.split_at(cs * ch);
        let (u, v) = match self.image_type {
            ImageType::Yvu420p => (second, first),
            _ => (first, second),
        };
        YuvPlanes {
            y,
            u,
            v,
            y_stride: stride,
            u_stride: cs,
            v_stride: cs,
            uv_pixel_stride: 1,
            subsampling: self.image_type.chroma_subsampling(),
        }
    }

    /// Decodes the pixel at (`x`, `y`), `None` when out of bounds or the
    /// buffer does not validate.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height || self.validate().is_err() {
            return None;
        }
        let Some(bpp) = self.image_type.bytes_per_pixel() else {
            let (y, u, v) = self.yuv_planes().sample(x, y);
            return Some(yuv_to_rgb(y, u, v));
        };
        let o = (y * self.effective_stride() + x) * bpp;
        let p = &self.data[o..o + bpp];
        Some(match self.image_type {
            ImageType::Rgb24 | ImageType::Rgba32 => Rgb::new(p[0], p[1], p[2]),
            ImageType::Bgr24 | ImageType::Bgra32 => Rgb::new(p[2], p[1], p[0]),
            _ => Rgb::new(p[0], p[0], p[0]),
        })
    }

    /// Converts the frame to a tightly packed grayscale image.
    pub fn to_luma(&self) -> Result<LumaImage> {
        self.validate()?;
        let Some(bpp) = self.image_type.bytes_per_pixel() else {
            return Ok(self.yuv_planes().luma(self.width, self.height));
        };

        let row_bytes = self.width * bpp;
        let mut data = Vec::with_capacity(self.width * self.height);
        for row in self.data.chunks(self.effective_stride() * bpp).take(self.height) {
            let row = &row[..row_bytes];
            match self.image_type {
                ImageType::Y => data.extend_from_slice(row),
                ImageType::Rgb24 | ImageType::Rgba32 => {
                    data.extend(row.chunks_exact(bpp).map(|p| luma(p[0], p[1], p[2])))
                }
                _ => data.extend(row.chunks_exact(bpp).map(|p| luma(p[2], p[1], p[0]))),
            }
        }

        debug!(
            "decoded {} {}x{} frame to luma",
            self.image_type, self.width, self.height
        );
        Ok(LumaImage {
            width: self.width,
            height: self.height,
            data,
        })
    }
}

/// A YUV frame described by three caller-owned planes.
///
/// Strides are in bytes. `uv_pixel_stride` is the distance between two
/// consecutive chroma samples of the same plane: 1 for planar and 2 for
/// semi-planar data, 0 to detect it.
#[derive(Copy, Clone, Debug)]
pub struct PlanarImage<'a> {
    pub image_type: ImageType,
    pub y: &'a [u8],
    pub u: &'a [u8],
    pub v: &'a [u8],
    pub width: usize,
    pub height: usize,
    pub y_stride: usize,
    pub u_stride: usize,
    pub v_stride: usize,
    pub uv_pixel_stride: usize,
    /// EXIF orientation code, validated when processed.
    pub orientation: i32,
}

impl<'a> PlanarImage<'a> {
    pub fn new(
        image_type: ImageType,
        [y, u, v]: [&'a [u8]; 3],
        width: usize,
        height: usize,
        [y_stride, u_stride, v_stride]: [usize; 3],
    ) -> Self {
        Self {
            image_type,
            y,
            u,
            v,
            width,
            height,
            y_stride,
            u_stride,
            v_stride,
            uv_pixel_stride: 0,
            orientation: 1,
        }
    }

    pub fn with_uv_pixel_stride(mut self, uv_pixel_stride: usize) -> Self {
        self.uv_pixel_stride = uv_pixel_stride;
        self
    }

    pub fn with_orientation(mut self, orientation: i32) -> Self {
        self.orientation = orientation;
        self
    }

    /// Chroma pixel stride after auto-detection.
    ///
    /// NV12/NV21 are always semi-planar. Otherwise U and V views starting one
    /// byte apart are taken as interleaved chroma (Android `YUV_420_888`).
    pub fn effective_uv_pixel_stride(&self) -> usize {
        if self.uv_pixel_stride != 0 {
            return self.uv_pixel_stride;
        }
        if self.image_type.is_semi_planar() {
            return 2;
        }
        let (u, v) = (self.u.as_ptr() as usize, self.v.as_ptr() as usize);
        if u.abs_diff(v) == 1 {
            2
        } else {
            1
        }
    }

    /// Checks image type, dimensions, strides and plane lengths.
    pub fn validate(&self) -> Result<()> {
        if !self.image_type.is_yuv() {
            return Err(Error::invalid_argument(format!(
                "{} is not a planar image type",
                self.image_type
            )));
        }
        check_dimensions(self.width, self.height)?;
        if self.y_stride < self.width {
            return Err(Error::invalid_argument(format!(
                "Y stride {} smaller than width {}",
                self.y_stride, self.width
            )));
        }

        let ps = self.effective_uv_pixel_stride();
        if ps > 2 {
            return Err(Error::invalid_argument(format!(
                "UV pixel stride {ps} not in [1, 2]"
            )));
        }
        let (cw, ch) = self.image_type.chroma_size(self.width, self.height);
        let overflow = || size_overflow(self.width, self.height);
        let row = plane_len(1, cw, 0, ps).ok_or_else(overflow)?;
        if self.u_stride < row || self.v_stride < row {
            return Err(Error::invalid_argument(format!(
                "chroma strides {}/{} smaller than {row}",
                self.u_stride, self.v_stride
            )));
        }

        let y_len = plane_len(self.height, self.width, self.y_stride, 1).ok_or_else(overflow)?;
        let u_len = plane_len(ch, cw, self.u_stride, ps).ok_or_else(overflow)?;
        let v_len = plane_len(ch, cw, self.v_stride, ps).ok_or_else(overflow)?;
        check_plane("Y", self.y, y_len)?;
        check_plane("U", self.u, u_len)?;
        check_plane("V", self.v, v_len)
    }

    fn planes(&self) -> YuvPlanes<'a> {
        YuvPlanes {
            y: self.y,
            u: self.u,
            v: self.v,
            y_stride: self.y_stride,
            u_stride: self.u_stride,
            v_stride: self.v_stride,
            uv_pixel_stride: self.effective_uv_pixel_stride(),
            subsampling: self.image_type.chroma_subsampling(),
        }
    }

    /// Decodes the pixel at (`x`, `y`), `None` when out of bounds or the
    /// planes do not validate.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height || self.validate().is_err() {
            return None;
        }
        let (y, u, v) = self.planes().sample(x, y);
        Some(yuv_to_rgb(y, u, v))
    }

    /// Extracts the luma plane as a tightly packed grayscale image.
    pub fn to_luma(&self) -> Result<LumaImage> {
        self.validate()?;
        debug!(
            "extracting luma from planar {} {}x{} frame",
            self.image_type, self.width, self.height
        );
        Ok(self.planes().luma(self.width, self.height))
    }
}

/// Owned, tightly packed 8-bit grayscale frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LumaImage {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl LumaImage {
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        check_dimensions(width, height)?;
        let expected = width
            .checked_mul(height)
            .ok_or_else(|| size_overflow(width, height))?;
        if data.len() != expected {
            return Err(Error::invalid_argument(format!(
                "luma frame data size: expected {expected}, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A frame filled with `value`.
    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        (x < self.width && y < self.height).then(|| self.data[y * self.width + x])
    }

    /// Copies the `rect` region, which must lie inside the frame.
    pub fn crop(&self, rect: &Rect) -> Result<LumaImage> {
        let fits = |start: usize, len: usize, limit: usize| {
            len > 0 && start.checked_add(len).is_some_and(|end| end <= limit)
        };
        if !fits(rect.x, rect.width, self.width) || !fits(rect.y, rect.height, self.height) {
            return Err(Error::invalid_argument(format!(
                "crop {rect:?} outside {}x{} frame",
                self.width, self.height
            )));
        }
        let mut data = Vec::with_capacity(rect.width * rect.height);
        for row in self.data.chunks(self.width).skip(rect.y).take(rect.height) {
            data.extend_from_slice(&row[rect.x..rect.x + rect.width]);
        }
        Ok(LumaImage {
            width: rect.width,
            height: rect.height,
            data,
        })
    }
}

impl fmt::Display for LumaImage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{} luma", self.width, self.height)
    }
}

/// Encodes a grayscale frame to JPEG using turbojpeg.
///
/// # Errors
///
/// Returns an error if JPEG compression fails.
pub fn encode_jpeg(frame: &LumaImage, quality: i32) -> Result<OwnedBuf> {
    let image = turbojpeg::Image {
        pixels: frame.as_slice(),
        width: frame.width,
        pitch: frame.width,
        height: frame.height,
        format: turbojpeg::PixelFormat::GRAY,
    };
    Ok(turbojpeg::compress(image, quality, turbojpeg::Subsamp::Gray)?)
}

/// Decodes a JPEG file to packed RGB24 pixels.
///
/// Returns the pixels with the width, height and stride in samples expected
/// by [`PackedImage`].
pub fn decode_jpeg(jpeg: &[u8]) -> Result<(Vec<u8>, usize, usize, usize)> {
    let image = turbojpeg::decompress(jpeg, turbojpeg::PixelFormat::RGB)?;
    let stride = image.pitch / 3;
    Ok((image.pixels, image.width, image.height, stride))
}
