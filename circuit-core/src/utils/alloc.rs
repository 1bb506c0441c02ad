use std::collections::TryReserveError;

/// Allocates a vector of `size` copies of `value`, failing instead of
/// aborting when the allocation cannot be satisfied.
///
/// Wire counts come straight from circuit files, so tables sized by them go
/// through here.
pub fn try_allocate_vec<T: Clone>(size: usize, value: T) -> Result<Vec<T>, TryReserveError> {
    let mut result = Vec::new();
    result.try_reserve_exact(size)?;
    result.resize(size, value);
    Ok(result)
}
