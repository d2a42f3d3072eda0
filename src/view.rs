use std::time::Duration;

use crate::config::EngineConfig;
use crate::context::BannerContext;
use crate::index::LibraryIndex;
use crate::resolve::memo::MemoizedResolver;
use crate::resolve::{OverrideResolver, Resolution};
use crate::transition::{DisplayState, SwapTicket, TransitionController, TransitionStep};

/// One mounted banner: memoized resolution feeding its own cross-fade.
///
/// Banner instances share nothing; two open pages hold two views.
#[derive(Debug)]
pub struct BannerView {
    resolver: MemoizedResolver,
    transition: TransitionController,
}

impl BannerView {
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_resolver(config, OverrideResolver::new())
    }

    pub fn with_resolver(config: &EngineConfig, resolver: OverrideResolver) -> Self {
        Self {
            resolver: MemoizedResolver::new(resolver),
            transition: TransitionController::new(config.transition),
        }
    }

    /// Re-resolve for the current context and store, and feed the result to the transition.
    pub fn update(
        &mut self,
        ctx: &BannerContext,
        index: &LibraryIndex,
        now: Duration,
    ) -> TransitionStep {
        let resolved = self.resolver.resolve(ctx, index).map(|r| r.image.clone());
        self.transition.observe(resolved, now)
    }

    /// Last resolution, including the source that produced it.
    pub fn last_resolution(&self) -> Option<&Resolution> {
        self.resolver.last()
    }

    pub fn on_swap_due(&mut self, ticket: SwapTicket) -> bool {
        self.transition.on_swap_due(ticket)
    }

    pub fn on_animation_frame(&mut self, now: Duration) -> bool {
        self.transition.on_animation_frame(now)
    }

    pub fn poll(&mut self, now: Duration) -> bool {
        self.transition.poll(now)
    }

    pub fn display(&self, now: Duration) -> DisplayState<'_> {
        self.transition.display(now)
    }

    pub fn transition(&self) -> &TransitionController {
        &self.transition
    }

    pub fn resolver(&self) -> &MemoizedResolver {
        &self.resolver
    }

    pub fn unmount(&mut self) {
        self.transition.unmount();
    }

    pub fn mount(&mut self) {
        self.resolver.invalidate();
        self.transition.mount();
    }
}
