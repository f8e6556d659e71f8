// Fan-out fetch over chunked sub-ranges
use crate::domain::time_range::TimeRange;
use crate::error::Result;
use futures::future::try_join_all;
use std::future::Future;

/// Split `range` into `chunk_days` pieces, fetch all of them concurrently and
/// concatenate the results in chunk order. The first failure fails the batch.
pub async fn fetch_in_chunks<T, F, Fut>(range: &TimeRange, chunk_days: i64, fetch: F) -> Result<Vec<T>>
where
    F: Fn(TimeRange) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let chunks = range.split(chunk_days);
    tracing::debug!(
        "Fetching {} chunk(s) of {} day(s) for {} .. {}",
        chunks.len(),
        chunk_days,
        range.start_at,
        range.end_at
    );

    let batches = try_join_all(chunks.into_iter().map(fetch)).await?;
    Ok(batches.into_iter().flatten().collect())
}
