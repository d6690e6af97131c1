//! Summed-area tables over the working luma image.
//!
//! Both tables are inclusive prefix sums: `sum(x, y)` covers every pixel in
//! `[0..=x] × [0..=y]`. A four-corner query over `(x0, y0, x1, y1)` therefore
//! returns the sum over `(x0, x1] × (y0, y1]`, which is the window convention
//! the scanner and the reference cascades were calibrated with.
use crate::image::PixelSource;

#[derive(Clone, Debug, Default)]
pub struct IntegralImage {
    width: usize,
    height: usize,
    sum: Vec<f64>,
    squares: Vec<f64>,
}

impl IntegralImage {
    /// Build both tables from `src` in one pass.
    pub fn from_source<S: PixelSource + ?Sized>(src: &S) -> Self {
        let (width, height) = (src.width(), src.height());
        let len = width * height;
        let mut sum = vec![0.0f64; len];
        let mut squares = vec![0.0f64; len];
        for y in 0..height {
            let mut row = 0.0f64;
            let mut row_sq = 0.0f64;
            for x in 0..width {
                let luma = src.luma_at(x, y);
                row += luma;
                row_sq += luma * luma;
                let idx = y * width + x;
                if y == 0 {
                    sum[idx] = row;
                    squares[idx] = row_sq;
                } else {
                    sum[idx] = sum[idx - width] + row;
                    squares[idx] = squares[idx - width] + row_sq;
                }
            }
        }
        Self {
            width,
            height,
            sum,
            squares,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major index with both coordinates clamped into the table.
    #[inline]
    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if self.sum.is_empty() {
            return None;
        }
        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        Some(y * self.width + x)
    }

    #[inline]
    pub fn sum_at(&self, x: i64, y: i64) -> f64 {
        self.index(x, y).map_or(0.0, |i| self.sum[i])
    }

    #[inline]
    pub fn square_at(&self, x: i64, y: i64) -> f64 {
        self.index(x, y).map_or(0.0, |i| self.squares[i])
    }

    /// Four-corner luma sum with corners `(x0, y0)` and `(x1, y1)`.
    #[inline]
    pub fn rect_sum(&self, x0: i64, y0: i64, x1: i64, y1: i64) -> f64 {
        self.sum_at(x1, y1) - self.sum_at(x0, y1) - self.sum_at(x1, y0) + self.sum_at(x0, y0)
    }

    /// Four-corner sum of squared luma.
    #[inline]
    pub fn rect_square_sum(&self, x0: i64, y0: i64, x1: i64, y1: i64) -> f64 {
        self.square_at(x1, y1) - self.square_at(x0, y1) - self.square_at(x1, y0)
            + self.square_at(x0, y0)
    }
}

#[cfg(all(test, feature = "raster"))]
mod tests {
    use super::*;
    use crate::image::RasterAdapter;
    use image::{Rgba, RgbaImage};

    fn gray(values: &[[u8; 3]; 3]) -> RgbaImage {
        RgbaImage::from_fn(3, 3, |x, y| {
            let v = values[y as usize][x as usize];
            Rgba([v, v, v, 255])
        })
    }

    #[test]
    fn prefix_sums_are_inclusive() {
        let img = gray(&[[1, 2, 3], [4, 5, 6], [7, 8, 9]]);
        let ii = IntegralImage::from_source(&RasterAdapter::from_rgba(&img));
        assert_eq!(ii.sum_at(0, 0), 1.0);
        assert_eq!(ii.sum_at(2, 0), 6.0);
        assert_eq!(ii.sum_at(0, 2), 12.0);
        assert_eq!(ii.sum_at(2, 2), 45.0);
        assert_eq!(ii.square_at(1, 1), 1.0 + 4.0 + 16.0 + 25.0);
    }

    #[test]
    fn four_corner_sum_excludes_the_origin_row_and_column() {
        let img = gray(&[[1, 2, 3], [4, 5, 6], [7, 8, 9]]);
        let ii = IntegralImage::from_source(&RasterAdapter::from_rgba(&img));
        // (0, 2] × (0, 2] -> pixels 5, 6, 8, 9.
        assert_eq!(ii.rect_sum(0, 0, 2, 2), 28.0);
        assert_eq!(ii.rect_square_sum(0, 0, 2, 2), 25.0 + 36.0 + 64.0 + 81.0);
        assert_eq!(ii.rect_sum(1, 1, 1, 1), 0.0);
    }

    #[test]
    fn lookups_outside_the_table_are_clamped() {
        let img = gray(&[[1, 1, 1], [1, 1, 1], [1, 1, 1]]);
        let ii = IntegralImage::from_source(&RasterAdapter::from_rgba(&img));
        assert_eq!(ii.sum_at(10, 10), 9.0);
        assert_eq!(ii.sum_at(-3, 0), 1.0);
        assert_eq!(ii.rect_sum(2, 2, 40, 40), 0.0);
    }

    #[test]
    fn empty_source_yields_zero_sums() {
        let img = RgbaImage::new(0, 0);
        let ii = IntegralImage::from_source(&RasterAdapter::from_rgba(&img));
        assert_eq!((ii.width(), ii.height()), (0, 0));
        assert_eq!(ii.rect_sum(0, 0, 5, 5), 0.0);
    }

    #[test]
    fn uses_integer_ratio_luma() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([10, 20, 30, 255]));
        let ii = IntegralImage::from_source(&RasterAdapter::from_rgba(&img));
        assert!((ii.sum_at(0, 0) - 18.1).abs() < 1e-12);
    }
}
