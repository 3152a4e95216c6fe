/// An immutable offset/limit pair bounding which part of an unbounded
/// item stream is retained.
///
/// `offset = 0` means "start from the first item", `limit = 0` means
/// "no limit". Both fields are fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowWindow {
    offset: u64,
    limit: u64,
}

/// Where a freshly arrived batch starts relative to a [`RowWindow`],
/// given how many items the stream has already delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStart {
    /// No windowing is in effect; take the whole batch.
    All,
    /// The batch ends before the window begins; take nothing.
    /// The caller must still advance its seen-items counter.
    BeforeWindow,
    /// The window begins at this index into the batch.
    At(usize),
}

impl RowWindow {
    pub fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// A window that retains every item of the stream.
    pub fn unbounded() -> Self {
        Self {
            offset: 0,
            limit: 0,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.offset == 0 && self.limit == 0
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// True once `accumulated` items satisfy the limit.
    /// Always false for a window without a limit.
    pub fn is_full(&self, accumulated: u64) -> bool {
        self.limit > 0 && accumulated >= self.limit
    }

    /// Classify a batch of `batch_len` items arriving after `total_seen`
    /// items have already been delivered by the stream.
    pub fn locate(&self, batch_len: u64, total_seen: u64) -> BatchStart {
        if self.is_unbounded() {
            return BatchStart::All;
        }
        if self.offset > 0 {
            if total_seen + batch_len < self.offset {
                return BatchStart::BeforeWindow;
            }
            if total_seen < self.offset {
                return BatchStart::At((self.offset - total_seen) as usize);
            }
        }
        BatchStart::At(0)
    }
}

#[cfg(test)]
mod tests {
    use super::{BatchStart, RowWindow};

    #[test]
    fn test_unbounded_takes_everything() {
        let window = RowWindow::unbounded();
        assert!(window.is_unbounded());
        assert_eq!(window.locate(10, 0), BatchStart::All);
        assert_eq!(window.locate(10, 1000), BatchStart::All);
        assert!(!window.is_full(u64::MAX));
    }

    #[test]
    fn test_batch_entirely_before_offset() {
        let window = RowWindow::new(10, 5);
        assert_eq!(window.locate(4, 0), BatchStart::BeforeWindow);
        assert_eq!(window.locate(5, 4), BatchStart::BeforeWindow);
    }

    #[test]
    fn test_batch_straddles_offset() {
        let window = RowWindow::new(10, 5);
        // Items 8..18 of the stream; the window starts at index 2.
        assert_eq!(window.locate(10, 8), BatchStart::At(2));
        // Batch ending exactly at the offset selects an empty tail.
        assert_eq!(window.locate(6, 4), BatchStart::At(6));
    }

    #[test]
    fn test_batch_past_offset() {
        let window = RowWindow::new(10, 5);
        assert_eq!(window.locate(3, 10), BatchStart::At(0));
        assert_eq!(window.locate(3, 25), BatchStart::At(0));
    }

    #[test]
    fn test_limit_only_window() {
        let window = RowWindow::new(0, 7);
        assert!(!window.is_unbounded());
        assert_eq!(window.locate(100, 0), BatchStart::At(0));
        assert!(!window.is_full(6));
        assert!(window.is_full(7));
        assert!(window.is_full(8));
    }

    use quickcheck_macros::quickcheck;

    #[quickcheck]
    fn prop_locate_start_within_batch(
        offset: u16,
        limit: u16,
        batch_len: u16,
        total_seen: u32,
    ) -> bool {
        let window = RowWindow::new(offset as u64, limit as u64);
        match window.locate(batch_len as u64, total_seen as u64) {
            BatchStart::At(start) => start <= batch_len as usize,
            _ => true,
        }
    }

    /// Replaying a stream batch by batch through `locate`/`is_full`
    /// selects exactly `stream[offset..offset + limit]`.
    #[quickcheck]
    fn prop_replay_selects_window_slice(
        offset: u8,
        limit: u8,
        batch_sizes: Vec<u8>,
    ) -> bool {
        let window = RowWindow::new(offset as u64, limit as u64);
        let total: usize = batch_sizes
            .iter()
            .map(|n| *n as usize)
            .sum();
        let stream: Vec<usize> = (0..total).collect();

        let mut taken = Vec::new();
        let mut seen = 0u64;
        let mut cursor = 0usize;
        for size in batch_sizes.iter().map(|n| *n as usize) {
            let batch = &stream[cursor..cursor + size];
            cursor += size;
            match window.locate(size as u64, seen) {
                BatchStart::All => {
                    taken.extend_from_slice(batch);
                    seen += size as u64;
                }
                BatchStart::BeforeWindow => seen += size as u64,
                BatchStart::At(start) => {
                    seen += start as u64;
                    for item in &batch[start..] {
                        if window.is_full(taken.len() as u64) {
                            break;
                        }
                        taken.push(*item);
                        seen += 1;
                    }
                }
            }
            if window.is_full(taken.len() as u64) {
                break;
            }
        }

        let start = (offset as usize).min(total);
        let end = if limit == 0 {
            total
        } else {
            (start + limit as usize).min(total)
        };
        taken == stream[start..end]
    }
}
