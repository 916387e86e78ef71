use std::{fs, path::Path};

use tracing::info;

use crate::error::Error;

/// Rendered text art plus its size in glyphs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFrame {
    pub text: String,
    pub columns: u32,
    pub rows: u32,
}

impl RenderFrame {
    /// Writes the text as UTF-8, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        info!(path = %path.display(), rows = self.rows, "saving to file");
        fs::write(path, &self.text)?;
        Ok(())
    }
}

pub struct Renderer {
    /// Number of glyphs per output line.
    blocks_per_row: u32,
}

impl Renderer {
    pub fn new(blocks_per_row: u32) -> Self {
        Self { blocks_per_row }
    }

    /// Joins glyphs row by row. Every row, the last one included, ends with a newline.
    pub fn render<I, S>(&self, glyphs: I) -> Result<RenderFrame, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.blocks_per_row == 0 {
            return Err(Error::InvalidDimension(
                "blocks per row must be positive".to_string(),
            ));
        }

        let mut text = String::new();
        let mut count = 0usize;
        for glyph in glyphs {
            text.push_str(glyph.as_ref());
            count += 1;
            if count % self.blocks_per_row as usize == 0 {
                text.push('\n');
            }
        }
        // a ragged last row still gets terminated
        if count % self.blocks_per_row as usize != 0 {
            text.push('\n');
        }

        Ok(RenderFrame {
            text,
            columns: self.blocks_per_row,
            rows: count.div_ceil(self.blocks_per_row as usize) as u32,
        })
    }
}
