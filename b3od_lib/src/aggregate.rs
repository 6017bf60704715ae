//! Concurrent fan-out of a single-date fetch over many dates.
//!
//! Uses the Semaphore + JoinSet pattern: one task per date, with at most
//! `concurrency` of them talking to the server at any time.

use std::future::Future;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::error::B3Error;
use crate::frame::Frame;

/// Runs `fetch_one` for every date and stacks the results in input order.
///
/// The first failure cancels the remaining tasks and is returned as is.
pub async fn fetch_many<F, Fut>(
    dates: Vec<NaiveDate>,
    concurrency: usize,
    fetch_one: F,
) -> Result<Frame, B3Error>
where
    F: Fn(NaiveDate) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Frame, B3Error>> + Send + 'static,
{
    if dates.is_empty() {
        return Ok(Frame::empty());
    }

    let total = dates.len();
    let limit = concurrency.max(1);
    tracing::info!("Downloading {} dates ({} at a time)", total, limit);

    let semaphore = Arc::new(Semaphore::new(limit));
    let fetch_one = Arc::new(fetch_one);
    let mut join_set = JoinSet::new();

    for (idx, date) in dates.into_iter().enumerate() {
        let sem = Arc::clone(&semaphore);
        let fetch = Arc::clone(&fetch_one);
        join_set.spawn(async move {
            let _permit = sem
                .acquire_owned()
                .await
                .map_err(|e| B3Error::Task(e.to_string()))?;
            tracing::debug!("fetching {}", date);
            let frame = fetch(date).await?;
            Ok::<_, B3Error>((idx, frame))
        });
    }

    let mut slots: Vec<Option<Frame>> = (0..total).map(|_| None).collect();
    while let Some(joined) = join_set.join_next().await {
        let outcome = joined
            .map_err(|e| B3Error::Task(e.to_string()))
            .and_then(|result| result);
        match outcome {
            Ok((idx, frame)) => slots[idx] = Some(frame),
            Err(err) => {
                tracing::error!("Aborting remaining downloads: {}", err);
                join_set.abort_all();
                return Err(err);
            }
        }
    }

    Frame::concat(slots.into_iter().flatten())
}
