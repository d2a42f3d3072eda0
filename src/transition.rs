use std::time::Duration;

use crate::config::TransitionTiming;
use crate::resolved::{DisplayIdentity, ResolvedImage};

/// Where the cross-fade currently is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransitionPhase {
    /// Showing the displayed image (or nothing) at full opacity.
    Idle(DisplayIdentity),
    /// Fading the old image out; the swap to `to` is scheduled.
    FadingOut {
        from: DisplayIdentity,
        to: DisplayIdentity,
    },
    /// New content is in place at zero opacity, waiting for layout.
    SwappingContent {
        to: DisplayIdentity,
        frames_left: u8,
    },
    /// Fading the new image in.
    FadingIn { to: DisplayIdentity, since: Duration },
}

/// Cancellation token of one scheduled swap. Only the most recent ticket is live.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SwapTicket(u64);

/// What a host has to do after feeding a resolution in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionStep {
    /// Same picture and same presentation.
    Unchanged,
    /// Same picture; transform or background were updated in place.
    Refreshed,
    /// Schedule a call to [`TransitionController::on_swap_due`] after `delay`.
    /// Any previously scheduled ticket is dead.
    ScheduleSwap { ticket: SwapTicket, delay: Duration },
    /// Nothing was on screen; the new content was swapped in immediately.
    Swapped,
}

#[derive(Clone, Copy, Debug)]
struct PendingSwap {
    ticket: SwapTicket,
    due: Duration,
}

#[derive(Clone, Copy, Debug)]
struct OpacityRamp {
    from: f64,
    to: f64,
    start: Duration,
    length: Duration,
}

impl OpacityRamp {
    fn settled(value: f64) -> Self {
        Self {
            from: value,
            to: value,
            start: Duration::ZERO,
            length: Duration::ZERO,
        }
    }
}

/// Snapshot of what the rendering layer should paint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayState<'a> {
    pub image: Option<&'a ResolvedImage>,
    /// Opacity the banner is heading to.
    pub opacity_target: f64,
    /// Eased opacity at the sampled instant.
    pub opacity: f64,
}

/// Cross-fade state machine for one banner instance.
///
/// Clock-agnostic: every entry point takes a monotonic `now`. Hosts either run timers and hand
/// tickets back through [`on_swap_due`](Self::on_swap_due), or call [`poll`](Self::poll)
/// periodically; both paths only ever apply the latest requested target.
#[derive(Debug)]
pub struct TransitionController {
    timing: TransitionTiming,
    phase: TransitionPhase,
    displayed: Option<ResolvedImage>,
    target: Option<ResolvedImage>,
    pending: Option<PendingSwap>,
    next_ticket: u64,
    ramp: OpacityRamp,
    mounted: bool,
}

impl TransitionController {
    pub fn new(timing: TransitionTiming) -> Self {
        Self {
            timing,
            phase: TransitionPhase::Idle(DisplayIdentity::Nothing),
            displayed: None,
            target: None,
            pending: None,
            next_ticket: 0,
            ramp: OpacityRamp::settled(1.0),
            mounted: true,
        }
    }

    pub fn phase(&self) -> &TransitionPhase {
        &self.phase
    }

    /// The image currently on screen (possibly at zero opacity).
    pub fn displayed(&self) -> Option<&ResolvedImage> {
        self.displayed.as_ref()
    }

    /// The most recently requested image.
    pub fn target(&self) -> Option<&ResolvedImage> {
        self.target.as_ref()
    }

    pub fn pending_ticket(&self) -> Option<SwapTicket> {
        self.pending.map(|p| p.ticket)
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn display(&self, now: Duration) -> DisplayState<'_> {
        DisplayState {
            image: self.displayed.as_ref(),
            opacity_target: self.ramp.to,
            opacity: self.opacity_at(now),
        }
    }

    /// Eased opacity at `now`.
    pub fn opacity_at(&self, now: Duration) -> f64 {
        let r = &self.ramp;
        if r.length.is_zero() || now >= r.start + r.length {
            return r.to;
        }
        let t = now.saturating_sub(r.start).as_secs_f64() / r.length.as_secs_f64();
        self.timing.fade_ease.ramp(r.from, r.to, t)
    }

    fn ramp_to(&mut self, to: f64, now: Duration, length: Duration) {
        let from = self.opacity_at(now);
        self.ramp = OpacityRamp {
            from,
            to,
            start: now,
            length,
        };
    }

    fn issue_ticket(&mut self) -> SwapTicket {
        self.next_ticket += 1;
        SwapTicket(self.next_ticket)
    }

    /// Feed the latest resolution.
    pub fn observe(&mut self, next: Option<ResolvedImage>, now: Duration) -> TransitionStep {
        if !self.mounted {
            tracing::debug!("ignoring resolution for unmounted banner");
            return TransitionStep::Unchanged;
        }

        let next_id = DisplayIdentity::of(next.as_ref());
        let target_id = DisplayIdentity::of(self.target.as_ref());

        if next_id == target_id {
            let changed = match (&self.target, &next) {
                (Some(a), Some(b)) => a.image != b.image || !a.same_presentation(b),
                (None, None) => false,
                _ => true,
            };
            self.target = next;
            // The target is on screen unless a swap is still pending.
            if self.pending.is_none() {
                self.displayed = self.target.clone();
            }
            return if changed {
                TransitionStep::Refreshed
            } else {
                TransitionStep::Unchanged
            };
        }

        let displayed_id = DisplayIdentity::of(self.displayed.as_ref());
        self.target = next;

        if matches!(self.phase, TransitionPhase::FadingOut { .. }) && next_id == displayed_id {
            tracing::debug!(?next_id, "change reverted before swap, cancelling");
            self.pending = None;
            self.displayed = self.target.clone();
            self.phase = TransitionPhase::Idle(next_id);
            self.ramp_to(1.0, now, self.timing.settle_delay());
            return TransitionStep::Refreshed;
        }

        if displayed_id.is_nothing() {
            self.pending = None;
            self.swap();
            return TransitionStep::Swapped;
        }

        let ticket = self.issue_ticket();
        let delay = self.timing.settle_delay();
        self.pending = Some(PendingSwap {
            ticket,
            due: now + delay,
        });
        if !matches!(self.phase, TransitionPhase::FadingOut { .. }) {
            self.ramp_to(0.0, now, delay);
        }
        tracing::debug!(from = ?displayed_id, to = ?next_id, ?ticket, "fading out");
        self.phase = TransitionPhase::FadingOut {
            from: displayed_id,
            to: next_id,
        };
        TransitionStep::ScheduleSwap { ticket, delay }
    }

    fn swap(&mut self) {
        self.pending = None;
        self.displayed = self.target.clone();
        let to = DisplayIdentity::of(self.displayed.as_ref());
        self.ramp = OpacityRamp::settled(0.0);

        if to.is_nothing() {
            tracing::debug!("swapped to no image");
            self.phase = TransitionPhase::Idle(to);
            self.ramp = OpacityRamp::settled(1.0);
            return;
        }

        tracing::debug!(?to, "content swapped, waiting for layout");
        self.phase = TransitionPhase::SwappingContent {
            to,
            frames_left: self.timing.frame_barrier.max(1),
        };
    }

    /// Timer callback for a scheduled swap. Stale tickets are ignored.
    ///
    /// Returns `true` when the swap was applied.
    pub fn on_swap_due(&mut self, ticket: SwapTicket) -> bool {
        if !self.mounted {
            return false;
        }
        match self.pending {
            Some(p) if p.ticket == ticket => {
                self.swap();
                true
            }
            _ => {
                tracing::debug!(?ticket, "discarding stale swap ticket");
                false
            }
        }
    }

    /// Animation-frame callback; advances the post-swap layout barrier and settles a finished
    /// fade-in.
    ///
    /// Returns `true` when the phase changed.
    pub fn on_animation_frame(&mut self, now: Duration) -> bool {
        if !self.mounted {
            return false;
        }
        if self.settle_fade_in(now) {
            return true;
        }
        let TransitionPhase::SwappingContent { to, frames_left } = &mut self.phase else {
            return false;
        };
        *frames_left = frames_left.saturating_sub(1);
        if *frames_left > 0 {
            return false;
        }

        let to = to.clone();
        tracing::debug!(?to, "fading in");
        self.phase = TransitionPhase::FadingIn { to, since: now };
        self.ramp_to(1.0, now, self.timing.fade_in());
        true
    }

    /// Drive time-based transitions for hosts without their own timers.
    ///
    /// Fires the live pending swap once due and settles a finished fade-in. Returns `true` when
    /// anything changed.
    pub fn poll(&mut self, now: Duration) -> bool {
        if !self.mounted {
            return false;
        }
        if let Some(p) = self.pending
            && now >= p.due
        {
            self.swap();
            return true;
        }
        self.settle_fade_in(now)
    }

    fn settle_fade_in(&mut self, now: Duration) -> bool {
        let TransitionPhase::FadingIn { to, since } = &self.phase else {
            return false;
        };
        if now < *since + self.timing.fade_in() {
            return false;
        }
        let to = to.clone();
        tracing::debug!(?to, "fade-in settled");
        self.phase = TransitionPhase::Idle(to);
        true
    }

    /// Banner view went away: drop any pending continuation.
    pub fn unmount(&mut self) {
        if let Some(p) = self.pending.take() {
            tracing::debug!(ticket = ?p.ticket, "unmount cancels pending swap");
        }
        self.mounted = false;
        self.phase = TransitionPhase::Idle(DisplayIdentity::of(self.displayed.as_ref()));
    }

    /// Banner view (re)appeared; the next resolution is a first paint.
    pub fn mount(&mut self) {
        self.mounted = true;
        self.pending = None;
        self.phase = TransitionPhase::Idle(DisplayIdentity::Nothing);
        self.displayed = None;
        self.target = None;
        self.ramp = OpacityRamp::settled(1.0);
    }
}
