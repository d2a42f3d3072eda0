use crate::context::BannerContext;
use crate::fingerprint::{ContextFingerprint, StoreFingerprint, fingerprint_context};
use crate::index::LibraryIndex;
use crate::resolve::{OverrideResolver, Resolution};

/// Counters for memoization effectiveness.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoStats {
    pub hits: u64,
    pub misses: u64,
}

/// Resolver that recomputes only when the context or the store content changes.
#[derive(Debug, Default)]
pub struct MemoizedResolver {
    resolver: OverrideResolver,
    last: Option<(ContextFingerprint, StoreFingerprint, Option<Resolution>)>,
    stats: MemoStats,
}

impl MemoizedResolver {
    pub fn new(resolver: OverrideResolver) -> Self {
        Self {
            resolver,
            last: None,
            stats: MemoStats::default(),
        }
    }

    /// Resolve, reusing the previous result when the full input tuple is unchanged.
    pub fn resolve(&mut self, ctx: &BannerContext, index: &LibraryIndex) -> Option<&Resolution> {
        let ctx_fp = fingerprint_context(ctx);
        let store_fp = index.fingerprint();

        let fresh = matches!(&self.last, Some((c, s, _)) if *c == ctx_fp && *s == store_fp);
        if fresh {
            self.stats.hits += 1;
        } else {
            self.stats.misses += 1;
            let resolved = self.resolver.resolve_traced(ctx, index);
            self.last = Some((ctx_fp, store_fp, resolved));
        }

        self.last.as_ref().and_then(|(_, _, r)| r.as_ref())
    }

    /// Most recently computed resolution.
    pub fn last(&self) -> Option<&Resolution> {
        self.last.as_ref().and_then(|(_, _, r)| r.as_ref())
    }

    /// Drop the cached result.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    pub fn stats(&self) -> MemoStats {
        self.stats
    }
}
