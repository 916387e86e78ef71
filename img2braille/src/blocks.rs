//! Decomposition of a padded grid into 2x4 pixel blocks.
use image::GrayImage;

use crate::error::Error;

pub const BLOCK_WIDTH: u32 = 2;
pub const BLOCK_HEIGHT: u32 = 4;

/// A 4-row by 2-column tile of the grid at `(row, col)` in block space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub row: u32,
    pub col: u32,
    pixels: [[u8; BLOCK_WIDTH as usize]; BLOCK_HEIGHT as usize],
}

impl Block {
    pub fn new(row: u32, col: u32, pixels: [[u8; 2]; 4]) -> Self {
        Self { row, col, pixels }
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.pixels[row][col]
    }

    pub fn pixels(&self) -> &[[u8; 2]; 4] {
        &self.pixels
    }
}

/// Block view over a grid whose dimensions are block-aligned.
#[derive(Debug, Clone, Copy)]
pub struct BlockGrid<'a> {
    img: &'a GrayImage,
}

impl<'a> BlockGrid<'a> {
    pub fn new(img: &'a GrayImage) -> Result<Self, Error> {
        let (width, height) = img.dimensions();
        if width % BLOCK_WIDTH != 0 || height % BLOCK_HEIGHT != 0 {
            return Err(Error::Shape { width, height });
        }
        Ok(Self { img })
    }

    pub fn blocks_per_row(&self) -> u32 {
        self.img.width() / BLOCK_WIDTH
    }

    pub fn block_rows(&self) -> u32 {
        self.img.height() / BLOCK_HEIGHT
    }

    pub fn len(&self) -> usize {
        self.blocks_per_row() as usize * self.block_rows() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The block at `(row, col)` in block space, `None` when out of range.
    pub fn block(&self, row: u32, col: u32) -> Option<Block> {
        if row >= self.block_rows() || col >= self.blocks_per_row() {
            return None;
        }
        let (x0, y0) = (col * BLOCK_WIDTH, row * BLOCK_HEIGHT);
        let mut pixels = [[0u8; 2]; 4];
        for (dy, line) in pixels.iter_mut().enumerate() {
            for (dx, px) in line.iter_mut().enumerate() {
                *px = self.img.get_pixel(x0 + dx as u32, y0 + dy as u32)[0];
            }
        }
        Some(Block::new(row, col, pixels))
    }

    /// Row-major pass over all blocks; every call starts from the first block.
    pub fn iter(&self) -> Blocks<'a> {
        Blocks {
            grid: *self,
            next: 0,
        }
    }
}

impl<'a> IntoIterator for &BlockGrid<'a> {
    type Item = Block;
    type IntoIter = Blocks<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct Blocks<'a> {
    grid: BlockGrid<'a>,
    next: usize,
}

impl Iterator for Blocks<'_> {
    type Item = Block;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next == self.grid.len() {
            return None;
        }
        let per_row = self.grid.blocks_per_row() as usize;
        let block = self
            .grid
            .block((self.next / per_row) as u32, (self.next % per_row) as u32)?;
        self.next += 1;
        Some(block)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.grid.len() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Blocks<'_> {}
