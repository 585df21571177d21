//! Row-major 2-D containers.
//!
//! [`Grid`] is the `H×W` array every pass of the engine reads and writes.
//! [`Image`] adds an interleaved channel axis and is reduced to a grayscale
//! grid before it enters a transform.

use num_complex::Complex;

use crate::error::{DftError, Result};

/// An `height × width` grid stored row by row.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    height: usize,
    width: usize,
    data: Vec<T>,
}

impl<T> Grid<T> {
    /// Wraps a row-major buffer of exactly `height * width` samples.
    pub fn from_vec(height: usize, width: usize, data: Vec<T>) -> Result<Self> {
        if height == 0 || width == 0 {
            return Err(DftError::EmptyGrid);
        }
        if data.len() != height * width {
            return Err(DftError::BufferSize {
                expected: height * width,
                actual: data.len(),
            });
        }
        Ok(Self {
            height,
            width,
            data,
        })
    }

    /// Builds a grid from rows, rejecting an empty or ragged input.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(DftError::EmptyGrid);
        }
        let mut data = Vec::with_capacity(height * width);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != width {
                return Err(DftError::RaggedRows {
                    row,
                    expected: width,
                    actual: values.len(),
                });
            }
            data.extend(values);
        }
        Ok(Self {
            height,
            width,
            data,
        })
    }

    /// Builds a grid by evaluating `f(y, x)` at every position.
    pub fn from_fn(
        height: usize,
        width: usize,
        mut f: impl FnMut(usize, usize) -> T,
    ) -> Result<Self> {
        let data = (0..height)
            .flat_map(|y| (0..width).map(move |x| (y, x)))
            .map(|(y, x)| f(y, x))
            .collect();
        Self::from_vec(height, width, data)
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// `(height, width)`.
    pub fn dims(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn get(&self, y: usize, x: usize) -> Option<&T> {
        if y < self.height && x < self.width {
            self.data.get(y * self.width + x)
        } else {
            None
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn rows(&self) -> std::slice::ChunksExact<'_, T> {
        self.data.chunks_exact(self.width)
    }

    /// Applies `f` to every sample, producing a new grid of the same shape.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            height: self.height,
            width: self.width,
            data: self.data.iter().map(f).collect(),
        }
    }

    /// Like [`Grid::map`] but also passes the `(y, x)` position.
    pub fn map_indexed<U>(&self, mut f: impl FnMut(usize, usize, &T) -> U) -> Grid<U> {
        let width = self.width;
        Grid {
            height: self.height,
            width,
            data: self
                .data
                .iter()
                .enumerate()
                .map(|(i, value)| f(i / width, i % width, value))
                .collect(),
        }
    }

    pub fn ensure_same_dims<U>(&self, other: &Grid<U>) -> Result<()> {
        if self.dims() == other.dims() {
            Ok(())
        } else {
            Err(DftError::DimensionMismatch {
                expected: self.dims(),
                actual: other.dims(),
            })
        }
    }
}

impl<T: Clone> Grid<T> {
    pub fn filled(height: usize, width: usize, value: T) -> Result<Self> {
        Self::from_vec(height, width, vec![value; height * width])
    }

    /// Swaps rows and columns.
    pub fn transpose(&self) -> Self {
        let (h, w) = self.dims();
        let mut data = Vec::with_capacity(h * w);
        for x in 0..w {
            for y in 0..h {
                data.push(self.data[y * w + x].clone());
            }
        }
        Self {
            height: w,
            width: h,
            data,
        }
    }
}

impl Grid<f64> {
    pub fn to_complex(&self) -> Grid<Complex<f64>> {
        self.map(|&x| Complex::new(x, 0.0))
    }

    /// Sum of all samples.
    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    pub fn min(&self) -> f64 {
        self.data.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn mean(&self) -> f64 {
        self.sum() / self.data.len() as f64
    }
}

impl<T> std::ops::Index<(usize, usize)> for Grid<T> {
    type Output = T;

    fn index(&self, (y, x): (usize, usize)) -> &T {
        assert!(y < self.height && x < self.width, "index ({y}, {x}) out of bounds");
        &self.data[y * self.width + x]
    }
}

impl<T> std::ops::IndexMut<(usize, usize)> for Grid<T> {
    fn index_mut(&mut self, (y, x): (usize, usize)) -> &mut T {
        assert!(y < self.height && x < self.width, "index ({y}, {x}) out of bounds");
        &mut self.data[y * self.width + x]
    }
}

/// An `height × width × channels` image with interleaved channels.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    height: usize,
    width: usize,
    channels: usize,
    data: Vec<f64>,
}

impl Image {
    pub fn new(height: usize, width: usize, channels: usize, data: Vec<f64>) -> Result<Self> {
        if channels == 0 {
            return Err(DftError::InvalidChannels);
        }
        if height == 0 || width == 0 {
            return Err(DftError::EmptyGrid);
        }
        let expected = height * width * channels;
        if data.len() != expected {
            return Err(DftError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            height,
            width,
            channels,
            data,
        })
    }

    /// Repeats a grayscale grid across `channels` identical channels.
    pub fn from_gray(gray: &Grid<f64>, channels: usize) -> Result<Self> {
        let data = gray
            .as_slice()
            .iter()
            .flat_map(|&v| std::iter::repeat(v).take(channels))
            .collect();
        Self::new(gray.height(), gray.width(), channels, data)
    }

    /// Stacks equally sized planes into one image, one plane per channel.
    pub fn from_planes(planes: &[Grid<f64>]) -> Result<Self> {
        let first = planes.first().ok_or(DftError::InvalidChannels)?;
        for plane in &planes[1..] {
            first.ensure_same_dims(plane)?;
        }
        let len = first.as_slice().len();
        let data = (0..len)
            .flat_map(|i| planes.iter().map(move |p| p.as_slice()[i]))
            .collect();
        Self::new(first.height(), first.width(), planes.len(), data)
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn pixel(&self, y: usize, x: usize) -> &[f64] {
        let start = (y * self.width + x) * self.channels;
        &self.data[start..start + self.channels]
    }

    /// Arithmetic mean across channels.
    pub fn to_grayscale(&self) -> Grid<f64> {
        let data = self
            .data
            .chunks_exact(self.channels)
            .map(|px| px.iter().sum::<f64>() / self.channels as f64)
            .collect();
        Grid {
            height: self.height,
            width: self.width,
            data,
        }
    }
}

impl From<Grid<f64>> for Image {
    fn from(gray: Grid<f64>) -> Self {
        Self {
            height: gray.height,
            width: gray.width,
            channels: 1,
            data: gray.data,
        }
    }
}
