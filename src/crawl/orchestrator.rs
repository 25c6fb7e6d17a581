// src/crawl/orchestrator.rs
// =============================================================================
// The recursive mirror crawl.
//
// Every resource is handled by one CrawlTask { resource, depth }:
// 1. depth > max_depth          -> stop (the URL is NOT claimed)
// 2. registry.try_claim fails   -> stop (someone else has it)
// 3. take a fetch permit, fetch, give the permit back
// 4. write the bytes into the mirror
// 5. if it was HTML and we may go deeper: extract references, resolve them,
//    spawn one child task per in-scope URL and wait for all of them
//
// A child's failure never fails its parent. It is recorded in the report
// instead, so only the root task's own fetch/write error reaches the caller.
//
// Rust concepts:
// - Arc: the shared crawl state is reference-counted across tokio tasks
// - BoxFuture: an async fn cannot call itself directly, so the recursive
//   task returns a boxed future
// - JoinSet: the join barrier for one page's children
// =============================================================================

use super::limiter::FetchLimiter;
use super::registry::VisitedRegistry;
use super::resolver::{Resolution, Resolver};
use crate::config::MirrorConfig;
use crate::error::CrawlError;
use crate::extract::{ReferenceExtractor, ReferenceKind};
use crate::fetch::Fetcher;
use crate::mirror::{MirrorEntry, MirrorWriter};
use futures::future::{BoxFuture, FutureExt};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::{Id, JoinSet};
use tracing::{debug, info, warn};
use url::Url;

/// One unit of crawl work
#[derive(Debug, Clone)]
pub struct CrawlTask {
    pub resource: Url,
    pub depth: usize,
}

/// A resource that was claimed but could not be mirrored (or scanned)
#[derive(Debug, Clone, Serialize)]
pub struct FailedResource {
    pub url: String,
    pub error: String,
}

/// What a crawl (or one subtree of it) did
#[derive(Debug, Default, Clone, Serialize)]
pub struct CrawlReport {
    /// Resources written to disk
    pub persisted: Vec<MirrorEntry>,
    /// Descendants whose fetch or write failed
    pub failed: Vec<FailedResource>,
    /// Pages that were saved but could not be scanned for references
    pub unparsed: Vec<FailedResource>,
    /// Tasks that stopped because the URL was already claimed
    pub duplicates_skipped: usize,
    /// Most fetches that were in flight at the same time
    pub peak_concurrency: usize,
}

impl CrawlReport {
    // Folds a finished child subtree into this report
    fn merge(&mut self, child: CrawlReport) {
        self.persisted.extend(child.persisted);
        self.failed.extend(child.failed);
        self.unparsed.extend(child.unparsed);
        self.duplicates_skipped += child.duplicates_skipped;
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.unparsed.is_empty()
    }
}

// Everything the tasks share. Only the registry and the limiter change
// during a run, and only through their own atomic operations.
struct CrawlContext {
    config: MirrorConfig,
    resolver: Resolver,
    registry: VisitedRegistry,
    limiter: FetchLimiter,
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn ReferenceExtractor>,
    writer: MirrorWriter,
}

pub struct Crawler {
    context: Arc<CrawlContext>,
}

impl Crawler {
    pub fn new(
        config: MirrorConfig,
        fetcher: Arc<dyn Fetcher>,
        extractor: Arc<dyn ReferenceExtractor>,
    ) -> Self {
        let mut origin = config.origin.clone();
        origin.set_fragment(None);

        let context = CrawlContext {
            resolver: Resolver::new(origin),
            registry: VisitedRegistry::new(),
            limiter: FetchLimiter::new(config.concurrency),
            writer: MirrorWriter::new(config.output_root.clone()),
            fetcher,
            extractor,
            config,
        };

        Self {
            context: Arc::new(context),
        }
    }

    // Mirrors everything reachable from the origin
    //
    // Returns only when the whole in-scope, depth-bounded graph has been
    // processed. Err means the origin itself could not be fetched or saved.
    pub async fn run(&self) -> Result<CrawlReport, CrawlError> {
        let root = CrawlTask {
            resource: self.context.resolver.origin().clone(),
            depth: 0,
        };

        info!(
            origin = %root.resource,
            max_depth = self.context.config.max_depth,
            concurrency = self.context.limiter.capacity(),
            output = %self.context.writer.output_root().display(),
            "starting mirror"
        );

        let mut report = crawl(self.context.clone(), root).await?;
        report.persisted.sort_by(|a, b| a.url.cmp(&b.url));
        report.peak_concurrency = self.context.limiter.peak();

        info!(
            persisted = report.persisted.len(),
            failed = report.failed.len(),
            claimed = self.context.registry.len(),
            "mirror finished"
        );

        Ok(report)
    }
}

// Runs one task and, for pages, its whole subtree
fn crawl(
    context: Arc<CrawlContext>,
    task: CrawlTask,
) -> BoxFuture<'static, Result<CrawlReport, CrawlError>> {
    run_task(context, task).boxed()
}

async fn run_task(context: Arc<CrawlContext>, task: CrawlTask) -> Result<CrawlReport, CrawlError> {
    let mut report = CrawlReport::default();

    // Depth first, claim second: a URL seen too deep stays unclaimed and
    // can still be mirrored if a shorter path reaches it later
    if task.depth > context.config.max_depth {
        debug!(url = %task.resource, depth = task.depth, "beyond max depth");
        return Ok(report);
    }

    // Losing the claim is normal (another page linked here first)
    if !context.registry.try_claim(&task.resource) {
        debug!(url = %task.resource, "already claimed");
        report.duplicates_skipped += 1;
        return Ok(report);
    }

    // The permit only covers the network fetch, not the subtree below it
    let fetched = {
        let _permit = context.limiter.acquire().await;
        debug!(
            url = %task.resource,
            depth = task.depth,
            in_flight = context.limiter.in_flight(),
            "fetching"
        );
        context.fetcher.fetch(&task.resource).await?
    };

    // Any ? above or here ends this task with an error. For the root that
    // error becomes the result of run(); for a child the parent records it
    let entry = context.writer.persist(&task.resource, &fetched.bytes).await?;
    info!(url = %task.resource, path = %entry.path.display(), bytes = entry.bytes, "saved");
    report.persisted.push(entry);

    // Children would land at depth + 1 and be rejected anyway
    if !fetched.is_html() || task.depth >= context.config.max_depth {
        return Ok(report);
    }

    let references = match context.extractor.extract(&fetched.bytes) {
        Ok(references) => references,
        Err(e) => {
            warn!(url = %task.resource, error = %e, "could not scan page for references");
            report.unparsed.push(FailedResource {
                url: task.resource.to_string(),
                error: e.to_string(),
            });
            return Ok(report);
        }
    };

    // JoinSet is the join barrier: we don't return until every child (and
    // therefore its whole subtree) has finished. The id -> URL map lets us
    // name a child that panicked, since a panic loses the task's own output.
    let mut children = JoinSet::new();
    let mut spawned: HashMap<Id, Url> = HashMap::new();
    for reference in references {
        // Assets (<img>, <script>, <link>) only with --assets
        if reference.kind == ReferenceKind::Asset && !context.config.include_assets {
            continue;
        }

        let resource = match context.resolver.resolve(&task.resource, &reference.raw) {
            Resolution::InScope(url) => url,
            Resolution::OutOfScope => continue,
            Resolution::Malformed => {
                debug!(base = %task.resource, reference = %reference.raw, "unresolvable reference");
                continue;
            }
        };

        let child = CrawlTask {
            resource,
            depth: task.depth + 1,
        };
        let url = child.resource.clone();
        let run = crawl(context.clone(), child);
        let handle = children.spawn({
            let url = url.clone();
            async move { (url, run.await) }
        });
        spawned.insert(handle.id(), url);
    }

    while let Some(joined) = children.join_next().await {
        match joined {
            // Child finished normally: fold its subtree into ours
            Ok((_, Ok(child_report))) => report.merge(child_report),
            // Child's own fetch or write failed: record it, keep going
            Ok((url, Err(e))) => {
                warn!(url = %url, error = %e, "failed to mirror");
                report.failed.push(FailedResource {
                    url: url.to_string(),
                    error: e.to_string(),
                });
            }
            // Child panicked (or was cancelled): still counts as a failure
            Err(e) => {
                let url = spawned
                    .remove(&e.id())
                    .map(|url| url.to_string())
                    .unwrap_or_else(|| "<unknown>".to_string());
                warn!(url = %url, error = %e, "crawl task panicked");
                report.failed.push(FailedResource {
                    url,
                    error: e.to_string(),
                });
            }
        }
    }

    Ok(report)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does crawl() return BoxFuture instead of being an async fn?
//    - An async fn's future contains the futures of everything it awaits
//    - If it awaited itself, the type would be infinitely large
//    - Boxing gives the recursive call a fixed size (one pointer)
//
// 2. Why tokio::spawn (via JoinSet) instead of just awaiting children?
//    - Spawned tasks run in parallel on the runtime's worker threads
//    - Awaiting them one by one would crawl the site one page at a time
//
// 3. Who shares what?
//    - Every task holds an Arc<CrawlContext> (cloning only bumps a counter)
//    - Only the registry and the limiter are ever mutated, and both are
//      safe to use from many threads at once
// -----------------------------------------------------------------------------
