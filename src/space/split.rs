use crate::errors::SpaceError;
use crate::float_types::Real;
use crate::sampling::seeded_rng;
use rand::seq::SliceRandom;

/// Partition the positions of `items` into `(train, test)` index sets.
///
/// The test set holds `floor(len * test_size)` positions, the train set the
/// rest. Both are sorted. The same seed always yields the same partition.
///
/// ```
/// use shapespace::train_test_split;
///
/// let (train, test) = train_test_split(&["a", "b", "c", "d", "e"], 7, 0.4).unwrap();
/// assert_eq!((train.len(), test.len()), (3, 2));
/// ```
pub fn train_test_split<T>(
    items: &[T],
    seed: u64,
    test_size: Real,
) -> Result<(Vec<usize>, Vec<usize>), SpaceError> {
    if !(0.0..=1.0).contains(&test_size) {
        return Err(SpaceError::invalid(format!(
            "test size must lie in [0, 1], got {test_size}"
        )));
    }

    let n = items.len();
    // 0.3 * 10 must count as 3, not 2.9999...
    let n_test = ((n as f64 * test_size as f64 + 1e-9).floor() as usize).min(n);

    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(&mut seeded_rng(seed));

    let mut test = order[..n_test].to_vec();
    let mut train = order[n_test..].to_vec();
    test.sort_unstable();
    train.sort_unstable();
    Ok((train, test))
}
