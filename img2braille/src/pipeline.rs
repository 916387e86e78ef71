use std::sync::Arc;

use crate::{
    blocks::{BLOCK_HEIGHT, BLOCK_WIDTH, BlockGrid},
    dots::encode_block,
    error::*,
    mapping::Mapping,
    render::{RenderFrame, Renderer},
};
use fast_image_resize as fir;
use image::{GrayImage, Luma};
use tracing::{debug, info};

pub const DEFAULT_WIDTH: u32 = 80;
pub const DEFAULT_BLANK_VALUE: u8 = 200;
pub const DEFAULT_PADDING_VALUE: u8 = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Use a fixed width and derive the height from the aspect ratio
    Width(u32),
    /// Use fixed resolution (width, height)
    Fixed(u32, u32),
}

impl Resolution {
    pub fn new(width: u32, height: Option<u32>) -> Self {
        match height {
            Some(h) => Resolution::Fixed(width, h),
            None => Resolution::Width(width),
        }
    }

    pub fn calc(&self, img: &GrayImage) -> Result<(u32, u32), Error> {
        let (src_w, src_h) = img.dimensions();
        if src_w == 0 || src_h == 0 {
            return Err(Error::InvalidDimension(format!(
                "source image is {src_w}x{src_h}"
            )));
        }
        match *self {
            Resolution::Width(0) | Resolution::Fixed(0, _) => Err(Error::InvalidDimension(
                "target width must be positive".to_string(),
            )),
            Resolution::Fixed(_, 0) => Err(Error::InvalidDimension(
                "target height must be positive".to_string(),
            )),
            Resolution::Fixed(w, h) => Ok((w, h)),
            Resolution::Width(w) => {
                let scale_factor = src_w as f64 / src_h as f64;
                // a very wide source can round down to nothing
                let h = (w as f64 / scale_factor).round().max(1.0) as u32;
                Ok((w, h))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Target resolution of the resized grid, in pixels.
    pub resolution: Resolution,
    /// Pixels strictly darker than this become dots.
    pub blank_value: u8,
    /// Fill value for rows and columns added during padding.
    pub padding_value: u8,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            resolution: Resolution::Width(DEFAULT_WIDTH),
            blank_value: DEFAULT_BLANK_VALUE,
            padding_value: DEFAULT_PADDING_VALUE,
        }
    }
}

/// Smallest amount that makes `len` a multiple of `block`.
pub fn pad_amount(len: u32, block: u32) -> u32 {
    (block - len % block) % block
}

/// Pads the grid below and to the right until it is block-aligned.
pub fn pad(img: &GrayImage, padding_value: u8) -> GrayImage {
    let (width, height) = img.dimensions();
    let pad_rows = pad_amount(height, BLOCK_HEIGHT);
    let pad_cols = pad_amount(width, BLOCK_WIDTH);
    debug!(pad_rows, pad_cols, "padding grid");
    if pad_rows == 0 && pad_cols == 0 {
        return img.clone();
    }

    let (new_w, new_h) = (width + pad_cols, height + pad_rows);
    GrayImage::from_fn(new_w, new_h, |x, y| {
        if x < width && y < height {
            *img.get_pixel(x, y)
        } else {
            Luma([padding_value])
        }
    })
}

pub struct ImagePipeline {
    /// Resize target and thresholds.
    pub config: PipelineConfig,
    /// The glyph lookup table used for the conversion.
    pub mapping: Arc<Mapping>,
}

impl ImagePipeline {
    pub fn new(config: PipelineConfig, mapping: Arc<Mapping>) -> Self {
        Self { config, mapping }
    }

    /// Area-averaging resize to the configured resolution.
    pub fn resize(&self, img: &GrayImage) -> Result<GrayImage, Error> {
        let (dst_w, dst_h) = self.config.resolution.calc(img)?;
        let src_image = fir::images::Image::from_vec_u8(
            img.width(),
            img.height(),
            img.as_raw().clone(),
            fir::PixelType::U8,
        )
        .map_err(|err| Error::InvalidDimension(format!("{ERROR_RESIZE}: {err:?}")))?;

        let mut dst_image = fir::images::Image::new(dst_w, dst_h, fir::PixelType::U8);

        let mut resizer = fir::Resizer::new();
        resizer
            .resize(
                &src_image,
                &mut dst_image,
                &fir::ResizeOptions::new()
                    .resize_alg(fir::ResizeAlg::Convolution(fir::FilterType::Box)),
            )
            .map_err(|err| Error::InvalidDimension(format!("{ERROR_RESIZE}: {err:?}")))?;

        GrayImage::from_raw(dst_w, dst_h, dst_image.into_vec())
            .ok_or_else(|| Error::InvalidDimension(ERROR_DATA.to_string()))
    }

    /// Resize, pad and encode a grayscale image.
    pub fn convert(&self, img: &GrayImage) -> Result<RenderFrame, Error> {
        info!(width = img.width(), height = img.height(), "original image dimensions");
        let resized = self.resize(img)?;
        info!(
            width = resized.width(),
            height = resized.height(),
            "resized image dimensions"
        );
        self.convert_unscaled(&resized)
    }

    /// Pad and encode a grid that already has the wanted resolution.
    pub fn convert_unscaled(&self, img: &GrayImage) -> Result<RenderFrame, Error> {
        let padded = pad(img, self.config.padding_value);
        let grid = BlockGrid::new(&padded)?;
        debug!(
            blocks = grid.len(),
            per_row = grid.blocks_per_row(),
            "encoding blocks"
        );

        let glyphs = grid
            .iter()
            .map(|block| encode_block(&block, &self.mapping, self.config.blank_value))
            .collect::<Result<Vec<_>, _>>()?;

        Renderer::new(grid.blocks_per_row()).render(glyphs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn pipeline(resolution: Resolution) -> ImagePipeline {
        ImagePipeline::new(
            PipelineConfig {
                resolution,
                ..Default::default()
            },
            Arc::new(Mapping::standard()),
        )
    }

    #[test]
    fn test_pad_amount() {
        for len in 0..32 {
            for block in [2, 4] {
                let pad = pad_amount(len, block);
                assert!(pad < block);
                assert_eq!((len + pad) % block, 0);
            }
        }
        // naive `len % block` would give 1 here
        assert_eq!(pad_amount(5, 4), 3);
    }

    #[test]
    fn test_pad_three_by_five() {
        // height 3, width 5
        let img = GrayImage::from_pixel(5, 3, Luma([7]));
        let padded = pad(&img, 255);
        assert_eq!(padded.dimensions(), (6, 4));
        assert_eq!(padded.get_pixel(4, 2)[0], 7);
        assert_eq!(padded.get_pixel(5, 0)[0], 255);
        assert_eq!(padded.get_pixel(0, 3)[0], 255);
        assert_eq!(padded.get_pixel(5, 3)[0], 255);
    }

    #[test]
    fn test_pad_aligned_is_noop() {
        let img = GrayImage::from_fn(4, 8, |x, y| Luma([(x + y) as u8]));
        assert_eq!(pad(&img, 255), img);
        assert_eq!(pad(&GrayImage::new(0, 0), 255).dimensions(), (0, 0));
    }

    #[test]
    fn test_pad_always_aligns() {
        for w in 1..9 {
            for h in 1..9 {
                let padded = pad(&GrayImage::new(w, h), 255);
                assert_eq!(padded.width() % 2, 0);
                assert_eq!(padded.height() % 4, 0);
                assert!(padded.width() - w < 2 && padded.height() - h < 4);
            }
        }
    }

    #[test]
    fn test_resolution_keeps_aspect_ratio() {
        let img = GrayImage::new(400, 200);
        assert_eq!(Resolution::Width(80).calc(&img).unwrap(), (80, 40));
        let img = GrayImage::new(300, 200);
        // 40 / 1.5 = 26.67
        assert_eq!(Resolution::Width(40).calc(&img).unwrap(), (40, 27));
        assert_eq!(Resolution::Fixed(10, 3).calc(&img).unwrap(), (10, 3));
        let wide = GrayImage::new(1000, 1);
        assert_eq!(Resolution::Width(80).calc(&wide).unwrap(), (80, 1));
    }

    #[test]
    fn test_resolution_rejects_zero() {
        let img = GrayImage::new(4, 4);
        for res in [
            Resolution::Width(0),
            Resolution::Fixed(0, 4),
            Resolution::Fixed(4, 0),
        ] {
            assert!(matches!(res.calc(&img), Err(Error::InvalidDimension(_))));
        }
        assert!(matches!(
            Resolution::Width(4).calc(&GrayImage::new(0, 3)),
            Err(Error::InvalidDimension(_))
        ));
    }

    #[test]
    fn test_resize_averages() {
        let img = GrayImage::from_pixel(8, 8, Luma([100]));
        let resized = pipeline(Resolution::Width(4)).resize(&img).unwrap();
        assert_eq!(resized.dimensions(), (4, 4));
        assert!(resized.pixels().all(|p| p[0] == 100));
    }

    #[test]
    fn test_resize_averages_stripes() {
        // nearest neighbour would keep only the black or the gray columns
        let img = GrayImage::from_fn(8, 8, |x, _| Luma([if x % 2 == 0 { 0 } else { 200 }]));
        let resized = pipeline(Resolution::Width(4)).resize(&img).unwrap();
        assert_eq!(resized.dimensions(), (4, 4));
        assert!(resized.pixels().all(|p| p[0] == 100));
    }

    #[test]
    fn test_resize_averages_ramp() {
        let img = GrayImage::from_fn(9, 2, |x, _| Luma([(x * 20) as u8]));
        let resized = pipeline(Resolution::Fixed(4, 2)).resize(&img).unwrap();
        let row: Vec<u8> = (0..4).map(|x| resized.get_pixel(x, 0)[0]).collect();
        assert_eq!(row, vec![10, 60, 110, 150]);
    }

    #[test]
    fn test_single_black_block() {
        let glyphs: HashMap<String, String> =
            [("12345678".to_string(), "⣿".to_string())].into_iter().collect();
        let pipeline = ImagePipeline::new(PipelineConfig::default(), Arc::new(glyphs.into()));
        let img = GrayImage::from_pixel(2, 4, Luma([0]));
        assert_eq!(pipeline.convert_unscaled(&img).unwrap().text, "⣿\n");
    }

    #[test]
    fn test_convert_end_to_end() {
        // left half black, right half white
        let img = GrayImage::from_fn(40, 40, |x, _| Luma([if x < 20 { 0 } else { 255 }]));
        let frame = pipeline(Resolution::Width(8)).convert(&img).unwrap();
        assert_eq!(frame.columns, 4);
        assert_eq!(frame.rows, 2);
        assert_eq!(frame.text, "⣿⣿\u{2800}\u{2800}\n⣿⣿\u{2800}\u{2800}\n");
    }

    #[test]
    fn test_padding_is_blank() {
        // 3x3 black grid pads to 4x4; padding is white and stays dotless
        let img = GrayImage::from_pixel(3, 3, Luma([0]));
        let frame = pipeline(Resolution::Width(3)).convert_unscaled(&img).unwrap();
        assert_eq!(frame.text, "⠿⠇\n");
    }
}
