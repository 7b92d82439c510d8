use std::ops::{Index, IndexMut};

/// Dense row-major 2D array.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T: Clone> Grid<T> {
    pub fn new(width: usize, height: usize, fill: T) -> Self {
        Self {
            width,
            height,
            data: vec![fill; width * height],
        }
    }

    /// Copy of the `width × height` window whose top-left corner is `(x0, y0)`.
    pub fn crop(&self, x0: usize, y0: usize, width: usize, height: usize) -> Grid<T> {
        debug_assert!(x0 + width <= self.width && y0 + height <= self.height);
        let mut data = Vec::with_capacity(width * height);
        for y in y0..y0 + height {
            data.extend_from_slice(&self.row(y)[x0..x0 + width]);
        }
        Grid {
            width,
            height,
            data,
        }
    }

    /// Paste `src` with its top-left corner at `(x0, y0)`.
    pub fn blit(&mut self, src: &Grid<T>, x0: usize, y0: usize) {
        debug_assert!(x0 + src.width <= self.width && y0 + src.height <= self.height);
        for y in 0..src.height {
            let start = (y0 + y) * self.width + x0;
            self.data[start..start + src.width].clone_from_slice(src.row(y));
        }
    }

    pub fn column(&self, x: usize) -> Vec<T> {
        (0..self.height).map(|y| self[(x, y)].clone()).collect()
    }
}

impl<T> Grid<T> {
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Wrap an existing row-major buffer; `None` when the length does not match.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Option<Self> {
        (data.len() == width * height).then_some(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x < self.width && y < self.height {
            self.data.get(y * self.width + x)
        } else {
            None
        }
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[T] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn map<U>(&self, mut f: impl FnMut(usize, usize, &T) -> U) -> Grid<U> {
        Grid::from_fn(self.width, self.height, |x, y| f(x, y, &self[(x, y)]))
    }

    /// Rewrite every cell in place.
    pub fn walk(&mut self, mut f: impl FnMut(usize, usize, &T) -> T) {
        let width = self.width;
        for (i, cell) in self.data.iter_mut().enumerate() {
            *cell = f(i % width, i / width, cell);
        }
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;
    #[inline]
    fn index(&self, (x, y): (usize, usize)) -> &T {
        &self.data[y * self.width + x]
    }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
    #[inline]
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut T {
        &mut self.data[y * self.width + x]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_then_blit_restores_window() {
        let g = Grid::from_fn(6, 4, |x, y| (y * 6 + x) as i32);
        let window = g.crop(2, 1, 3, 2);
        assert_eq!(window.row(0), &[8, 9, 10]);
        let mut blank = Grid::new(6, 4, -1);
        blank.blit(&window, 2, 1);
        assert_eq!(blank[(4, 2)], 16);
        assert_eq!(blank[(1, 1)], -1);
    }

    #[test]
    fn from_vec_checks_length() {
        assert!(Grid::from_vec(2, 2, vec![0u8; 3]).is_none());
        assert!(Grid::from_vec(2, 2, vec![0u8; 4]).is_some());
    }

    #[test]
    fn walk_sees_coordinates() {
        let mut g = Grid::new(3, 2, 0usize);
        g.walk(|x, y, _| x + 10 * y);
        assert_eq!(g.column(2), vec![2, 12]);
    }
}
