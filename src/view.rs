//! Strided sub-view descriptors and odometer iteration over them
//!
//! A [`View`] describes a rectangular window into flat sample storage as an
//! origin offset plus per-dimension sizes and strides. The projection engine
//! positions one view per output cell by moving its origin, then walks every
//! element with [`View::offsets`] in odometer order (dimension 0 fastest).
//! [`Block`] binds a view to the storage slice it indexes and yields the
//! actual sample values.

/// Strided window into flat sample storage.
///
/// A view is pure index arithmetic over `{origin, sizes, strides}`; it never
/// touches the storage itself. Offsets are signed so a view can be
/// repositioned freely without intermediate underflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    origin: isize,
    sizes: Vec<usize>,
    strides: Vec<isize>,
}

impl View {
    /// View with an explicit origin offset.
    #[must_use]
    pub fn new(origin: isize, sizes: Vec<usize>, strides: Vec<isize>) -> Self {
        debug_assert_eq!(sizes.len(), strides.len());
        Self {
            origin,
            sizes,
            strides,
        }
    }

    /// View covering every element of storage with the given shape and
    /// strides.
    #[must_use]
    pub fn full(sizes: &[usize], strides: &[isize]) -> Self {
        Self::new(0, sizes.to_vec(), strides.to_vec())
    }

    #[must_use]
    pub fn origin(&self) -> isize {
        self.origin
    }

    #[must_use]
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    #[must_use]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    #[must_use]
    pub fn ndim(&self) -> usize {
        self.sizes.len()
    }

    /// Number of elements the view spans. A zero-dimensional view spans one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sizes.iter().product()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Move the view to an absolute storage offset.
    pub fn set_origin(&mut self, origin: isize) {
        self.origin = origin;
    }

    /// Move the view by a relative storage offset.
    pub fn shift_origin(&mut self, delta: isize) {
        self.origin += delta;
    }

    /// Add a dimension at `index`, leaving the addressed elements unchanged
    /// when `size` is 1 or `stride` is 0.
    pub fn insert_axis(&mut self, index: usize, size: usize, stride: isize) {
        self.sizes.insert(index, size);
        self.strides.insert(index, stride);
    }

    /// Drop every dimension of size 1. The addressed elements and their
    /// order are unchanged.
    pub fn squeeze(&mut self) {
        let mut keep = 0;
        for d in 0..self.sizes.len() {
            if self.sizes[d] != 1 {
                self.sizes[keep] = self.sizes[d];
                self.strides[keep] = self.strides[d];
                keep += 1;
            }
        }
        self.sizes.truncate(keep);
        self.strides.truncate(keep);
    }

    /// Iterate the flat storage offsets of every element, dimension 0
    /// fastest.
    #[must_use]
    pub fn offsets(&self) -> Offsets<'_> {
        Offsets {
            view: self,
            position: vec![0; self.sizes.len()],
            offset: self.origin,
            remaining: self.len(),
        }
    }
}

/// Odometer iterator over the flat storage offsets of a [`View`].
///
/// Dimension 0 advances first; when a dimension overflows its size, its
/// stride contribution is rewound and the carry moves to the next dimension.
/// A zero-dimensional view yields exactly one offset, its origin.
#[derive(Debug)]
pub struct Offsets<'a> {
    view: &'a View,
    position: Vec<usize>,
    offset: isize,
    remaining: usize,
}

impl Iterator for Offsets<'_> {
    type Item = isize;

    fn next(&mut self) -> Option<isize> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.offset;
        self.remaining -= 1;
        for d in 0..self.position.len() {
            self.position[d] += 1;
            self.offset += self.view.strides[d];
            if self.position[d] < self.view.sizes[d] {
                break;
            }
            // Rewind this dimension and carry into the next.
            self.offset -= self.view.strides[d] * self.position[d] as isize;
            self.position[d] = 0;
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Offsets<'_> {}

/// A [`View`] bound to the flat storage slice it indexes.
///
/// This is the element sequence a reducer folds over for one output cell.
#[derive(Debug, Clone, Copy)]
pub struct Block<'a, T> {
    samples: &'a [T],
    view: &'a View,
}

impl<'a, T: Copy> Block<'a, T> {
    #[must_use]
    pub fn new(samples: &'a [T], view: &'a View) -> Self {
        Self { samples, view }
    }

    /// Number of samples the view spans.
    #[must_use]
    pub fn len(&self) -> usize {
        self.view.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate the samples in odometer order.
    pub fn iter(&self) -> impl Iterator<Item = T> + 'a {
        let samples = self.samples;
        self.view
            .offsets()
            .map(move |offset| samples[offset as usize])
    }
}
