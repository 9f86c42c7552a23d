/// Painter's-algorithm ordering
///
/// Triangles are ordered by their largest camera-space z only. Triangles whose
/// depth ranges interleave can come out in the wrong order; that is accepted.
use crate::geometry::Triangle;

/// In-place quicksort with Lomuto partitioning. Not stable.
///
/// `le(a, b)` must return true when `a` may be placed before `b`.
///
/// The pivot is the last element, so runs of equal keys (a large flat mesh
/// facing the camera ties on depth) take quadratic time. Stack depth stays
/// logarithmic either way.
pub fn quick_sort_by<T, F>(items: &mut [T], mut le: F)
where
    F: FnMut(&T, &T) -> bool,
{
    sort_range(items, &mut le);
}

fn sort_range<T, F>(mut items: &mut [T], le: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    // Recurse into the smaller half, loop on the larger one.
    while items.len() > 1 {
        let pivot = partition(items, le);
        let (low, rest) = std::mem::take(&mut items).split_at_mut(pivot);
        let high = &mut rest[1..];
        if low.len() < high.len() {
            sort_range(low, le);
            items = high;
        } else {
            sort_range(high, le);
            items = low;
        }
    }
}

/// Lomuto partition around the last element; returns the pivot's final index.
fn partition<T, F>(items: &mut [T], le: &mut F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    let high = items.len() - 1;
    let mut store = 0;
    for i in 0..high {
        if le(&items[i], &items[high]) {
            items.swap(i, store);
            store += 1;
        }
    }
    items.swap(store, high);
    store
}

/// `a` goes no later than `b` when its deepest vertex is not deeper.
pub fn depth_le(a: &Triangle, b: &Triangle) -> bool {
    a.max_depth() <= b.max_depth()
}

/// Sort camera-space triangles ascending by maximum z, the order they are drawn in.
pub fn sort_by_depth(triangles: &mut [Triangle]) {
    quick_sort_by(triangles, depth_le);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vector3;

    fn is_sorted(values: &[i64]) -> bool {
        values.windows(2).all(|w| w[0] <= w[1])
    }

    #[test]
    fn test_sorts_integers() {
        let mut values: Vec<i64> = (0..500).map(|i| (i * 7919 + 13) % 1009 - 500).collect();
        let mut expected = values.clone();
        expected.sort();
        quick_sort_by(&mut values, |a, b| a <= b);
        assert_eq!(values, expected);
    }

    #[test]
    fn test_edge_inputs() {
        let mut empty: Vec<i64> = vec![];
        quick_sort_by(&mut empty, |a, b| a <= b);
        assert!(empty.is_empty());

        let mut one = vec![4];
        quick_sort_by(&mut one, |a, b| a <= b);
        assert_eq!(one, vec![4]);

        let mut equal = vec![3; 64];
        quick_sort_by(&mut equal, |a, b| a <= b);
        assert_eq!(equal, vec![3; 64]);

        // already ordered and reversed input must not blow the stack
        let mut ascending: Vec<i64> = (0..3_000).collect();
        quick_sort_by(&mut ascending, |a, b| a <= b);
        assert!(is_sorted(&ascending));

        let mut descending: Vec<i64> = (0..3_000).rev().collect();
        quick_sort_by(&mut descending, |a, b| a <= b);
        assert!(is_sorted(&descending));
    }

    #[test]
    fn test_tied_keys_keep_every_item() {
        // 2_000 items on 4 keys; ties fall on one side of each partition
        let mut pairs: Vec<(i64, usize)> = (0..2_000).map(|i| ((i % 4) as i64, i)).collect();
        quick_sort_by(&mut pairs, |a, b| a.0 <= b.0);
        assert!(pairs.windows(2).all(|w| w[0].0 <= w[1].0));

        let mut ids: Vec<usize> = pairs.iter().map(|p| p.1).collect();
        ids.sort();
        assert_eq!(ids, (0..2_000).collect::<Vec<_>>());
    }

    #[test]
    fn test_sort_by_depth_orders_by_max_z() {
        let depths = [4.0, -7.5, 0.0, 12.0, -1.0, 4.0, 3.25];
        let mut triangles: Vec<Triangle> = depths
            .iter()
            .map(|&z| {
                Triangle::new(
                    Vector3::new(0.0, 0.0, z - 10.0),
                    Vector3::new(1.0, 0.0, z),
                    Vector3::new(0.0, 1.0, z - 3.0),
                )
            })
            .collect();

        sort_by_depth(&mut triangles);

        assert_eq!(triangles.len(), depths.len());
        for pair in triangles.windows(2) {
            assert!(pair[0].max_depth() <= pair[1].max_depth());
        }
        assert_eq!(triangles[0].max_depth(), -7.5);
        assert_eq!(triangles[6].max_depth(), 12.0);
    }
}
