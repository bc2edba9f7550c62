//! Rayon-based parallelisation utilities.
//!
//! Shock grids, stress scenarios and batch analyses are embarrassingly
//! parallel: every item is a pure re-run of the structural pipeline with its
//! own inputs, so no state is shared between workers.

use rayon::iter::Either;
use rayon::prelude::*;

/// Parallel map preserving input order.
///
/// # Arguments
///
/// * `items` - Slice of items to process
/// * `mapper` - Function to apply to each item
///
/// # Returns
///
/// Vector of mapped results, one per item, in input order.
pub fn parallel_map<T, R, F>(items: &[T], mapper: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    items.par_iter().map(mapper).collect()
}

/// Parallel fallible map, splitting successes from failures.
///
/// A failing item never prevents the others from running.
pub fn parallel_partition<T, R, E, F>(items: &[T], mapper: F) -> (Vec<R>, Vec<E>)
where
    T: Sync,
    R: Send,
    E: Send,
    F: Fn(&T) -> Result<R, E> + Sync + Send,
{
    items
        .par_iter()
        .map(mapper)
        .partition_map(|result| match result {
            Ok(value) => Either::Left(value),
            Err(err) => Either::Right(err),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parallel_map() {
        let items: Vec<i32> = (0..100).collect();
        let doubled: Vec<i32> = parallel_map(&items, |&x| x * 2);

        assert_eq!(doubled.len(), 100);
        assert_eq!(doubled[50], 100);
    }

    #[test]
    fn test_parallel_partition() {
        let items: Vec<i32> = (0..10).collect();
        let (even, odd): (Vec<i32>, Vec<String>) = parallel_partition(&items, |&x| {
            if x % 2 == 0 {
                Ok(x)
            } else {
                Err(format!("odd {}", x))
            }
        });

        assert_eq!(even.len(), 5);
        assert_eq!(odd.len(), 5);
        assert!(even.iter().all(|x| x % 2 == 0));
    }

    #[test]
    fn test_parallel_partition_empty() {
        let items: Vec<i32> = Vec::new();
        let (ok, err): (Vec<i32>, Vec<()>) = parallel_partition(&items, |&x| Ok(x));
        assert!(ok.is_empty() && err.is_empty());
    }
}
