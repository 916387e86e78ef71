use std::{
    path::{Path, PathBuf},
    sync::LazyLock,
};

use image::{DynamicImage, GrayImage, ImageReader};
use regex::Regex;
use tracing::info;

use crate::error::*;

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://").expect("valid url pattern"));

/// Where an image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Path(PathBuf),
    Url(String),
}

impl Source {
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if URL_PATTERN.is_match(input) {
            Source::Url(input.to_string())
        } else {
            Source::Path(PathBuf::from(input))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Source::Path(path) => path.display().to_string(),
            Source::Url(url) => url.clone(),
        }
    }

    /// Decodes the image and converts it to 8-bit luma.
    pub fn open(&self) -> Result<GrayImage, Error> {
        info!(input = %self.describe(), "reading image");
        let img = match self {
            Source::Path(path) => open_path(path)?,
            Source::Url(url) => open_url(url)?,
        };
        Ok(img.into_luma8())
    }
}

pub fn is_url(input: &str) -> bool {
    URL_PATTERN.is_match(input.trim())
}

/// Opens a local path or an HTTP(S) URL as a grayscale grid.
pub fn open_image(input: &str) -> Result<GrayImage, Error> {
    Source::parse(input).open()
}

fn open_path(path: &Path) -> Result<DynamicImage, Error> {
    let input = path.display().to_string();
    ImageReader::open(path)
        .map_err(|e| Error::decode(&input, e))?
        .with_guessed_format()
        .map_err(|e| Error::decode(&input, e))?
        .decode()
        .map_err(|e| Error::decode(&input, e))
}

pub fn decode_bytes(input: &str, bytes: &[u8]) -> Result<DynamicImage, Error> {
    image::load_from_memory(bytes).map_err(|e| Error::decode(input, e))
}

#[cfg(feature = "http")]
fn open_url(url: &str) -> Result<DynamicImage, Error> {
    let response = reqwest::blocking::get(url)
        .and_then(|res| res.error_for_status())
        .map_err(|e| Error::ImageDecode {
            input: url.to_string(),
            reason: format!("{ERROR_FETCHING_URL}: {e}"),
        })?;
    let bytes = response.bytes().map_err(|e| Error::ImageDecode {
        input: url.to_string(),
        reason: format!("{ERROR_FETCHING_URL}: {e}"),
    })?;
    decode_bytes(url, &bytes)
}

#[cfg(not(feature = "http"))]
fn open_url(url: &str) -> Result<DynamicImage, Error> {
    Err(Error::ImageDecode {
        input: url.to_string(),
        reason: format!("{ERROR_FETCHING_URL}: built without the `http` feature"),
    })
}
