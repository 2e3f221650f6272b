//! Banner carousel position.

/// Index into a fixed list of slides, wrapping at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carousel {
    len: usize,
    current: usize,
}

impl Carousel {
    #[must_use]
    pub const fn new(len: usize) -> Self {
        Self { len, current: 0 }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub const fn current(&self) -> usize {
        self.current
    }

    pub const fn next_slide(&mut self) {
        if self.len > 0 {
            self.current = (self.current + 1) % self.len;
        }
    }

    pub const fn prev_slide(&mut self) {
        if self.len > 0 {
            self.current = (self.current + self.len - 1) % self.len;
        }
    }

    /// Jump to `index`; out-of-range indices are ignored.
    pub const fn select(&mut self, index: usize) -> bool {
        if index < self.len {
            self.current = index;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_both_ways() {
        let mut c = Carousel::new(3);
        c.prev_slide();
        assert_eq!(c.current(), 2);
        c.next_slide();
        assert_eq!(c.current(), 0);
        c.next_slide();
        c.next_slide();
        c.next_slide();
        assert_eq!(c.current(), 0);
    }

    #[test]
    fn select_ignores_out_of_range() {
        let mut c = Carousel::new(2);
        assert!(c.select(1));
        assert!(!c.select(2));
        assert_eq!(c.current(), 1);
    }

    #[test]
    fn empty_carousel_stays_put() {
        let mut c = Carousel::new(0);
        c.next_slide();
        c.prev_slide();
        assert_eq!(c.current(), 0);
        assert!(c.is_empty());
    }
}
