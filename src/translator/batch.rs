use std::future::Future;

use futures::future::try_join_all;

use crate::core::Result;

/// Run `f` over `items` in batches of `batch_size`.
///
/// All calls of one batch run concurrently; the next batch starts only after
/// every call of the current one resolved. The first error fails the whole
/// run. Results keep the order of `items`.
pub async fn in_batches<'a, T, R, F, Fut>(
    items: &'a [T],
    batch_size: usize,
    f: F,
) -> Result<Vec<R>>
where
    F: Fn(&'a T) -> Fut,
    Fut: Future<Output = Result<R>>,
{
    let mut results = Vec::with_capacity(items.len());
    for batch in items.chunks(batch_size.max(1)) {
        results.extend(try_join_all(batch.iter().map(&f)).await?);
    }
    Ok(results)
}
