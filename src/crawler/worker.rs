//! Per-page worker procedure
//!
//! One invocation handles one already-claimed URL: wait out the request
//! delay, fetch, extract, persist and normalize the page's links. Every
//! failure is recorded in the shared error list and ends the invocation
//! with no new links.

use crate::crawler::cancel::CancelFlag;
use crate::crawler::extractor::TextExtractor;
use crate::crawler::fetcher::{FetchResult, PageFetcher};
use crate::state::{ErrorList, ErrorRecord};
use crate::storage::PageStore;
use crate::url::LinkNormalizer;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Everything a worker needs, shared by all workers of one crawl
pub struct WorkerContext {
    pub fetcher: Arc<dyn PageFetcher>,
    pub extractor: Arc<dyn TextExtractor>,
    pub store: Arc<dyn PageStore>,
    pub normalizer: LinkNormalizer,
    pub errors: Arc<ErrorList>,
    pub cancel: CancelFlag,

    /// Pause before every fetch
    pub request_delay: Duration,
}

/// Processes one claimed URL and returns the in-scope links found on it
///
/// The returned links are canonical but not deduplicated; the frontier
/// filters them.
pub async fn process_page(ctx: Arc<WorkerContext>, url: Url) -> Vec<Url> {
    tokio::time::sleep(ctx.request_delay).await;

    if ctx.cancel.is_cancelled() {
        tracing::debug!("Skipping {} after cancellation", url);
        return Vec::new();
    }

    let body = match ctx.fetcher.fetch(&url).await {
        FetchResult::Success {
            body, final_url, ..
        } => {
            if final_url != url.as_str() {
                tracing::debug!("{} redirected to {}", url, final_url);
            }
            body
        }
        FetchResult::ContentMismatch { content_type } => {
            ctx.errors
                .push(ErrorRecord::unsupported_content(url.as_str(), &content_type));
            return Vec::new();
        }
        failure => {
            let detail = failure
                .error_detail()
                .unwrap_or_else(|| "Fetch failed".to_string());
            ctx.errors.push(ErrorRecord::transport(url.as_str(), detail));
            return Vec::new();
        }
    };

    let page = match ctx.extractor.extract(&url, &body) {
        Ok(page) => page,
        Err(e) => {
            ctx.errors.push(ErrorRecord::extraction(url.as_str(), e));
            return Vec::new();
        }
    };

    ctx.errors.extend(
        page.errors
            .iter()
            .map(|e| ErrorRecord::extraction(url.as_str(), e)),
    );

    if let Err(e) = ctx.store.save_page(url.as_str(), &page.text) {
        ctx.errors.push(ErrorRecord::persistence(url.as_str(), e));
    }

    let links = ctx.normalizer.normalize(&url, &page.links);
    let rejected = links.rejected.len();
    ctx.errors
        .extend(links.rejected.into_iter().map(ErrorRecord::from));

    tracing::debug!(
        "Processed {}: {} links accepted, {} rejected",
        url,
        links.accepted.len(),
        rejected
    );

    links.accepted
}
