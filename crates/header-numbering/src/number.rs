//! Outline numbering calculator

/// Counter state of one top-to-bottom numbering pass (`[1, 2, 1]` is "1.2.1")
///
/// Counters are signed so a pass seeded with start number 0 can begin at
/// `[-1]` and produce `0` for its first header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberPath(Vec<i64>);

impl NumberPath {
    /// Seed a pass so that the first top-level header receives `start_number`
    pub fn seeded(start_number: u32) -> Self {
        NumberPath(vec![i64::from(start_number) - 1])
    }

    pub fn from_counters(counters: Vec<i64>) -> Self {
        NumberPath(counters)
    }

    pub fn counters(&self) -> &[i64] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Number of the next header at `depth` (1-based)
    pub fn next(&self, depth: usize) -> NumberPath {
        NumberPath(next_number(&self.0, depth))
    }

    /// Render with the configured number separator
    pub fn format(&self, separator: char) -> String {
        let mut out = String::new();
        for (i, counter) in self.0.iter().enumerate() {
            if i > 0 {
                out.push(separator);
            }
            out.push_str(&counter.to_string());
        }
        out
    }
}

/// Next counter stack for a header at `depth`
///
/// At or above the current depth the stack is truncated and its last counter
/// incremented; deeper headers extend the stack with 1s. `depth` must be at
/// least 1.
pub fn next_number(counters: &[i64], depth: usize) -> Vec<i64> {
    debug_assert!(depth > 0, "numbering depth must be positive");
    let mut next = counters.to_vec();
    if depth <= next.len() {
        next.truncate(depth);
        if let Some(last) = next.last_mut() {
            *last += 1;
        }
    } else {
        next.resize(depth, 1);
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sibling_increments() {
        assert_eq!(next_number(&[1, 2], 2), vec![1, 3]);
    }

    #[test]
    fn test_shallower_truncates_and_increments() {
        assert_eq!(next_number(&[1, 2, 4], 1), vec![2]);
    }

    #[test]
    fn test_deeper_extends_with_ones() {
        assert_eq!(next_number(&[3], 3), vec![3, 1, 1]);
    }

    #[test]
    fn test_seeded_path() {
        let path = NumberPath::seeded(1);
        assert_eq!(path.next(1).counters(), &[1]);

        let path = NumberPath::seeded(0);
        assert_eq!(path.next(1).format('.'), "0");

        let path = NumberPath::seeded(5);
        assert_eq!(path.next(2).format('.'), "4.1");
    }

    #[test]
    fn test_format_with_separators() {
        let path = NumberPath::from_counters(vec![1, 2, 3]);
        assert_eq!(path.format('.'), "1.2.3");
        assert_eq!(path.format('-'), "1-2-3");
        assert_eq!(path.format('/'), "1/2/3");
        assert_eq!(path.depth(), 3);
    }
}
