//! Drives a full run: count the listings, then walk the pages one after the
//! other, inspecting every listing of a page concurrently.

use futures::StreamExt;
use tokio::io::AsyncWrite;
use tracing::Instrument;

use crate::{
    inspect::{self, Inspection},
    sink::OutputSink,
    steam::{self, ListingPage, ListingRecord},
    Config, FetchError, Metrics, PaginationState, RunError,
};

/// Source of listings.
#[allow(async_fn_in_trait)]
pub trait Market {
    async fn total_count(&self, count: u32) -> Result<u64, FetchError>;

    async fn page(&self, start: u64, count: u32) -> Result<ListingPage, FetchError>;
}

/// Looks up the float details of a single listing.
#[allow(async_fn_in_trait)]
pub trait Inspector {
    async fn inspect(&self, record: &ListingRecord) -> Result<Inspection, FetchError>;
}

impl Market for steam::Client {
    async fn total_count(&self, count: u32) -> Result<u64, FetchError> {
        self.load_total_count(count).await
    }

    async fn page(&self, start: u64, count: u32) -> Result<ListingPage, FetchError> {
        self.load_page(start, count).await
    }
}

impl Inspector for inspect::Client {
    async fn inspect(&self, record: &ListingRecord) -> Result<Inspection, FetchError> {
        self.load_inspection(record).await
    }
}

/// Runs the whole collection and returns where pagination ended up.
///
/// Only failing to write the output stops a run, every remote failure is
/// logged and counted.
pub async fn run<M, I, W>(
    config: &Config,
    market: &M,
    inspector: &I,
    sink: &mut OutputSink<W>,
    metrics: &Metrics,
) -> Result<PaginationState, RunError>
where
    M: Market,
    I: Inspector,
    W: AsyncWrite + Unpin,
{
    let mut state = PaginationState::new(config.page_size);

    match market.total_count(config.probe_count).await {
        Ok(total_count) => state.set_total(total_count),
        Err(e) => {
            tracing::error!("Loading total count {:?}", e);
        }
    };
    metrics
        .total_listings
        .set(i64::try_from(state.total_count).unwrap_or(i64::MAX));

    tracing::info!(
        total_count = state.total_count,
        total_pages = state.total_pages,
        "Counted listings"
    );

    state.reset();
    while state.has_page() {
        process_page(config, &state, market, inspector, sink, metrics)
            .instrument(tracing::info_span!(
                "Page",
                current = state.current_page,
                total_pages = state.total_pages,
                start = state.start
            ))
            .await?;

        state.advance();
    }

    Ok(state)
}

async fn process_page<M, I, W>(
    config: &Config,
    state: &PaginationState,
    market: &M,
    inspector: &I,
    sink: &mut OutputSink<W>,
    metrics: &Metrics,
) -> Result<(), RunError>
where
    M: Market,
    I: Inspector,
    W: AsyncWrite + Unpin,
{
    let page = match market.page(state.start, state.page_size).await {
        Ok(p) => p,
        Err(e) => {
            tracing::error!("Loading listings {:?}", e);
            metrics.pages_failed.inc();

            sink.write_failed_page(state.current_page, state.total_pages)
                .await?;
            return Ok(());
        }
    };
    metrics.pages_fetched.inc();

    let extracted = steam::extract_listings(&page, config.price_divisor);
    metrics.listings_skipped.inc_by(extracted.skipped as u64);
    metrics.listings_seen.inc_by(extracted.records.len() as u64);

    tracing::debug!(
        listings = extracted.records.len(),
        skipped = extracted.skipped,
        "Inspecting listings"
    );

    // Completion order, so lines within a page are not sorted.
    let results: Vec<_> = futures::stream::iter(extracted.records.iter())
        .map(move |record| async move { (record, inspector.inspect(record).await) })
        .buffer_unordered(config.concurrency.max(1))
        .collect()
        .await;

    for (record, result) in results {
        match result {
            Ok(inspection) => {
                metrics.inspections_succeeded.inc();

                sink.write_inspection(
                    state.current_page,
                    state.total_pages,
                    &inspection,
                    &config.currency_suffix,
                )
                .await?;
                metrics.lines_written.inc();
            }
            Err(e) => {
                tracing::warn!(listing_id = %record.listing_id, "Inspecting listing {}", e);
                metrics.inspections_failed.inc();
            }
        }
    }

    Ok(())
}
