use std::cmp::Ordering;

/// Index reported for a search that did not find its target.
pub const NOT_FOUND: isize = -1;

/// Return the index of an element equal to `q`, or `None` if there is none.
///
/// `vals` must be sorted ascending. Bounds are inclusive; the loop ends when
/// they cross.
pub fn binary_search<T: Ord>(vals: &[T], q: &T) -> Option<usize> {
    let mut l = 0;
    let mut r = vals.len().checked_sub(1)?;
    while l <= r {
        let m = l + (r - l) / 2;
        match vals[m].cmp(q) {
            Ordering::Equal => return Some(m),
            Ordering::Less => l = m + 1,
            // r would go below 0: the bounds crossed.
            Ordering::Greater => r = m.checked_sub(1)?,
        }
    }
    None
}

pub fn index_or_sentinel(index: Option<usize>) -> isize {
    index.map_or(NOT_FOUND, |i| i as isize)
}
