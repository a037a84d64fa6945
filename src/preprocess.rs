use clap::ValueEnum;
use image::imageops::FilterType;
use image::{Rgb, RgbImage};
use ndarray::Array4;

use crate::error::PredictError;

const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Axis order of the model input tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Layout {
    /// Batch, height, width, channels (Keras / TensorFlow exports).
    Nhwc,
    /// Batch, channels, height, width (PyTorch exports).
    Nchw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Normalization {
    /// Pixel values as-is, 0..=255. The model rescales internally.
    Raw,
    /// Pixel values divided by 255.
    Unit,
    /// Unit scale, then per-channel ImageNet mean/std.
    Imagenet,
}

impl Normalization {
    fn apply(self, channel: usize, value: u8) -> f32 {
        let value = value as f32;
        match self {
            Normalization::Raw => value,
            Normalization::Unit => value / 255.0,
            Normalization::Imagenet => {
                (value / 255.0 - IMAGENET_MEAN[channel]) / IMAGENET_STD[channel]
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResizeMode {
    /// Scale both axes to the input size, ignoring aspect ratio.
    Stretch,
    /// Keep aspect ratio, center the image and pad the rest with black.
    Letterbox,
}

/// Turns encoded image bytes into a single-image batch the classifier accepts.
#[derive(Debug, Clone, Copy)]
pub struct Preprocessor {
    pub size: u32,
    pub layout: Layout,
    pub normalization: Normalization,
    pub resize: ResizeMode,
}

impl Preprocessor {
    /// Shape of the batch produced by [`Preprocessor::prepare`].
    pub fn input_shape(&self) -> [usize; 4] {
        let size = self.size as usize;
        match self.layout {
            Layout::Nhwc => [1, size, size, 3],
            Layout::Nchw => [1, 3, size, size],
        }
    }

    pub fn prepare(&self, bytes: &[u8]) -> Result<Array4<f32>, PredictError> {
        let image = decode(bytes)?;
        let resized = self.resize(&image)?;
        self.to_tensor(&resized)
    }

    pub fn resize(&self, image: &RgbImage) -> Result<RgbImage, PredictError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 || self.size == 0 {
            return Err(PredictError::Preprocess(format!(
                "cannot resize {width}x{height} image to {0}x{0}",
                self.size
            )));
        }

        if (width, height) == (self.size, self.size) {
            return Ok(image.clone());
        }

        let resized = match self.resize {
            ResizeMode::Stretch => {
                image::imageops::resize(image, self.size, self.size, FilterType::Triangle)
            }
            ResizeMode::Letterbox => self.letterbox(image),
        };

        Ok(resized)
    }

    fn letterbox(&self, image: &RgbImage) -> RgbImage {
        let size = self.size;
        let (width, height) = image.dimensions();

        // Longest side becomes `size`; the short side never collapses to zero.
        let (new_width, new_height) = if width > height {
            (size, ((size as u64 * height as u64) / width as u64).max(1) as u32)
        } else {
            (((size as u64 * width as u64) / height as u64).max(1) as u32, size)
        };

        let resized = image::imageops::resize(image, new_width, new_height, FilterType::Triangle);

        let mut canvas = RgbImage::from_pixel(size, size, Rgb([0, 0, 0]));
        let pad_x = (size - new_width) / 2;
        let pad_y = (size - new_height) / 2;

        for (x, y, pixel) in resized.enumerate_pixels() {
            canvas.put_pixel(x + pad_x, y + pad_y, *pixel);
        }

        canvas
    }

    pub fn to_tensor(&self, image: &RgbImage) -> Result<Array4<f32>, PredictError> {
        if image.dimensions() != (self.size, self.size) {
            let (width, height) = image.dimensions();
            return Err(PredictError::Preprocess(format!(
                "expected {0}x{0} image, got {width}x{height}",
                self.size
            )));
        }

        let [n, d1, d2, d3] = self.input_shape();
        let mut tensor = Array4::<f32>::zeros((n, d1, d2, d3));

        for (x, y, pixel) in image.enumerate_pixels() {
            let (x, y) = (x as usize, y as usize);
            for c in 0..3 {
                let value = self.normalization.apply(c, pixel[c]);
                match self.layout {
                    Layout::Nhwc => tensor[[0, y, x, c]] = value,
                    Layout::Nchw => tensor[[0, c, y, x]] = value,
                }
            }
        }

        Ok(tensor)
    }
}

/// Decodes any format `image` recognises and forces three RGB channels.
pub fn decode(bytes: &[u8]) -> Result<RgbImage, PredictError> {
    let image = image::load_from_memory(bytes)?;
    Ok(image.to_rgb8())
}
