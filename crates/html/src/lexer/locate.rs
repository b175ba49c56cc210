use memchr::memchr_iter;

/// Maps byte offsets to 1-based line/column pairs. Lookups are expected to be
/// mostly increasing, so the last answer is cached and extended.
#[derive(Debug)]
pub(crate) struct Locator {
    line_starts: Vec<usize>,
    cache_offset: usize,
    cache_line: usize,
    cache_col: u32,
}

impl Locator {
    pub(crate) fn new(input: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(memchr_iter(b'\n', input.as_bytes()).map(|i| i + 1));
        Self {
            line_starts,
            cache_offset: 0,
            cache_line: 0,
            cache_col: 1,
        }
    }

    pub(crate) fn locate(&mut self, input: &str, offset: usize) -> (u32, u32) {
        let offset = offset.min(input.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(next) => next - 1,
        };
        let line_start = self.line_starts[line];
        let (from, mut col) = if line == self.cache_line && offset >= self.cache_offset {
            (self.cache_offset, self.cache_col)
        } else {
            (line_start, 1)
        };
        col += input
            .get(from..offset)
            .map_or(0, |s| s.chars().count() as u32);
        self.cache_offset = offset;
        self.cache_line = line;
        self.cache_col = col;
        (line as u32 + 1, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_map_to_lines_and_columns() {
        let input = "ab\ncd\u{e9}f\n\nx";
        let mut locator = Locator::new(input);
        assert_eq!(locator.locate(input, 0), (1, 1));
        assert_eq!(locator.locate(input, 1), (1, 2));
        assert_eq!(locator.locate(input, 3), (2, 1));
        assert_eq!(locator.locate(input, 7), (2, 4));
        assert_eq!(locator.locate(input, 9), (3, 1));
        assert_eq!(locator.locate(input, 10), (4, 1));
        assert_eq!(locator.locate(input, 4), (2, 2));
    }
}
