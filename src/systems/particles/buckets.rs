/// Per-tick lists of particle indices, one per color bucket.
///
/// Holds indices into the particle arrays, never copies of particle data.
/// Cleared and refilled every tick; the inner vectors keep their capacity.
#[derive(Default)]
pub struct ColorBuckets {
    lists: Vec<Vec<u32>>,
}

impl ColorBuckets {
    pub fn new(bucket_count: usize) -> Self {
        Self {
            lists: vec![Vec::new(); bucket_count],
        }
    }

    /// Change the number of buckets (palette change).
    pub fn reset(&mut self, bucket_count: usize) {
        self.lists.clear();
        self.lists.resize_with(bucket_count, Vec::new);
    }

    pub fn clear(&mut self) {
        for list in self.lists.iter_mut() {
            list.clear();
        }
    }

    #[inline]
    pub fn push(&mut self, bucket: usize, particle: usize) {
        self.lists[bucket].push(particle as u32);
    }

    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.lists.len()
    }

    #[inline]
    pub fn bucket(&self, bucket: usize) -> &[u32] {
        &self.lists[bucket]
    }

    /// (bucket index, members) for every bucket with at least one particle
    pub fn non_empty(&self) -> impl Iterator<Item = (usize, &[u32])> {
        self.lists
            .iter()
            .enumerate()
            .filter(|(_, l)| !l.is_empty())
            .map(|(i, l)| (i, l.as_slice()))
    }

    pub fn total(&self) -> usize {
        self.lists.iter().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_keeps_bucket_count() {
        let mut b = ColorBuckets::new(3);
        b.push(0, 4);
        b.push(2, 9);
        b.push(2, 1);
        assert_eq!(b.total(), 3);
        assert_eq!(b.non_empty().map(|(i, _)| i).collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(b.bucket(2), &[9, 1]);

        b.clear();
        assert_eq!(b.bucket_count(), 3);
        assert_eq!(b.total(), 0);

        b.reset(5);
        assert_eq!(b.bucket_count(), 5);
    }
}
