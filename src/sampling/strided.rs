use crate::errors::SpaceError;

/// Indices `(shift + k * step) mod len` for `k = 0..count`.
///
/// Overruns wrap around, so a fixed-size set can be walked periodically.
pub fn take_each_n_indices(
    len: usize,
    count: usize,
    step: usize,
    shift: usize,
) -> Result<Vec<usize>, SpaceError> {
    if len == 0 && count > 0 {
        return Err(SpaceError::invalid("cannot take elements from an empty array"));
    }
    // u128 holds shift + k * step for any usize operands
    let n = len as u128;
    Ok((0..count)
        .map(|k| ((shift as u128 + k as u128 * step as u128) % n) as usize)
        .collect())
}

/// Picks `count` elements of `array` at the indices of
/// [`take_each_n_indices`], returning `(indices, values)`.
pub fn take_each_n<T: Clone>(
    array: &[T],
    count: usize,
    step: usize,
    shift: usize,
) -> Result<(Vec<usize>, Vec<T>), SpaceError> {
    let indices = take_each_n_indices(array.len(), count, step, shift)?;
    let values = indices.iter().map(|&i| array[i].clone()).collect();
    Ok((indices, values))
}
