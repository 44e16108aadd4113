// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-owner gesture claim protocol.

use core::fmt::Debug;

use crate::frame::GestureFrame;

/// What kind of region holds a gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClaimType {
    /// A single entity (for example, dragging a card).
    Object,
    /// A container entity.
    Container,
    /// The canvas background (panning, pinch zoom).
    Surface,
    /// A tool such as box-select.
    Tool,
}

/// Exclusive right of one owner to interpret the current gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Claim<K> {
    /// The owning listener.
    pub owner: K,
    /// The kind of claim.
    pub claim_type: ClaimType,
}

/// How a claim attempt treats an existing claim.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClaimMode {
    /// Succeeds only on the gesture's first frame and only if nothing is claimed yet.
    #[default]
    Exclusive,
    /// Displaces any current owner, at any point during the gesture.
    Override,
}

/// A listener competing for a gesture in [`GestureArbiter::arbitrate`].
pub struct Candidate<'a, K> {
    /// The listener's id.
    pub owner: K,
    /// The claim it takes if accepted.
    pub claim_type: ClaimType,
    /// Decides from the first frame whether to take the gesture; `None` accepts anything.
    pub filter: Option<&'a dyn Fn(&GestureFrame) -> bool>,
}

impl<K: Debug> Debug for Candidate<'_, K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Candidate")
            .field("owner", &self.owner)
            .field("claim_type", &self.claim_type)
            .field("filtered", &self.filter.is_some())
            .finish()
    }
}

impl<'a, K> Candidate<'a, K> {
    /// A candidate that accepts any gesture.
    pub fn new(owner: K, claim_type: ClaimType) -> Self {
        Self {
            owner,
            claim_type,
            filter: None,
        }
    }

    /// Restricts the candidate to gestures whose first frame passes `filter`.
    #[must_use]
    pub fn with_filter(mut self, filter: &'a dyn Fn(&GestureFrame) -> bool) -> Self {
        self.filter = Some(filter);
        self
    }
}

/// Decides which listener owns the current gesture.
///
/// Two states: idle (no claim) and claimed. A claim is taken at most once per
/// gesture, on its first frame, and is always released when the gesture ends.
/// An owner may also release early with [`abandon`](Self::abandon); the
/// release is observed at the start of the next frame.
///
/// The arbiter does not route events. Every listener checks
/// [`has_claim`](Self::has_claim) before acting on a frame.
///
/// ```rust
/// use kurbo::Point;
/// use expanse_gesture::{ClaimType, GestureArbiter, GestureFrame};
///
/// let mut arbiter = GestureArbiter::new();
/// let first = GestureFrame::start(Point::new(5.0, 5.0));
/// arbiter.begin_frame(&first);
///
/// // Two listeners race on the first frame; exactly one wins.
/// assert!(arbiter.claim(ClaimType::Object, "card"));
/// assert!(!arbiter.claim(ClaimType::Surface, "canvas"));
/// assert!(arbiter.has_claim(ClaimType::Object, "card"));
///
/// arbiter.end_gesture();
/// assert_eq!(arbiter.claimed_by(), None);
/// ```
#[derive(Clone, Debug)]
pub struct GestureArbiter<K> {
    claim: Option<Claim<K>>,
    /// Claims may be taken only while the first frame is being handled.
    window_open: bool,
    active: bool,
    abandon_requested: bool,
    gestures: u64,
}

impl<K: Copy + Eq + Debug> Default for GestureArbiter<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + Debug> GestureArbiter<K> {
    /// Creates an idle arbiter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            claim: None,
            window_open: false,
            active: false,
            abandon_requested: false,
            gestures: 0,
        }
    }

    /// Starts processing `frame`.
    ///
    /// On a first frame, any leftover claim is dropped and the claim window
    /// opens for the duration of this frame. On later frames the window is
    /// closed and a pending abandon takes effect.
    ///
    /// Returns the claim released by this call, if any.
    pub fn begin_frame(&mut self, frame: &GestureFrame) -> Option<Claim<K>> {
        if frame.first {
            let stale = self.claim.take();
            self.window_open = true;
            self.active = true;
            self.abandon_requested = false;
            self.gestures = self.gestures.wrapping_add(1);
            return stale;
        }
        self.window_open = false;
        if self.abandon_requested {
            self.abandon_requested = false;
            let released = self.claim.take();
            #[cfg(feature = "tracing")]
            tracing::debug!(claim = ?released, "gesture claim abandoned");
            return released;
        }
        None
    }

    /// Offers the gesture to `candidates` in order.
    ///
    /// On the first frame, if nothing is claimed, each candidate's filter is
    /// evaluated once against `frame` and the first to accept takes the claim.
    /// Later frames never re-evaluate filters. Returns the current claim.
    pub fn arbitrate<'a>(
        &mut self,
        frame: &GestureFrame,
        candidates: impl IntoIterator<Item = Candidate<'a, K>>,
    ) -> Option<Claim<K>>
    where
        K: 'a,
    {
        if frame.first && self.window_open && self.claim.is_none() {
            for candidate in candidates {
                if candidate.filter.is_none_or(|accept| accept(frame)) {
                    self.claim(candidate.claim_type, candidate.owner);
                    break;
                }
            }
        }
        self.claim
    }

    /// Claims the current gesture for `owner`.
    ///
    /// Succeeds only on the gesture's first frame and only if no claim exists.
    /// Claiming again with the same owner and type is a no-op success.
    pub fn claim(&mut self, claim_type: ClaimType, owner: K) -> bool {
        self.claim_with(claim_type, owner, ClaimMode::Exclusive)
    }

    /// Claims the current gesture with an explicit [`ClaimMode`].
    pub fn claim_with(&mut self, claim_type: ClaimType, owner: K, mode: ClaimMode) -> bool {
        let claim = Claim { owner, claim_type };
        if self.claim == Some(claim) {
            return true;
        }
        match mode {
            ClaimMode::Exclusive => {
                if !self.window_open || self.claim.is_some() {
                    return false;
                }
                #[cfg(feature = "tracing")]
                tracing::debug!(owner = ?owner, claim_type = ?claim_type, "gesture claimed");
            }
            ClaimMode::Override => {
                if !self.active {
                    return false;
                }
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    owner = ?owner,
                    claim_type = ?claim_type,
                    displaced = ?self.claim,
                    "gesture claim overridden"
                );
            }
        }
        self.claim = Some(claim);
        self.abandon_requested = false;
        true
    }

    /// Returns `true` if `owner` holds a claim of `claim_type`.
    #[must_use]
    pub fn has_claim(&self, claim_type: ClaimType, owner: K) -> bool {
        self.claim == Some(Claim { owner, claim_type })
    }

    /// Returns `true` if `owner` holds any claim.
    #[must_use]
    pub fn is_claimed_by(&self, owner: K) -> bool {
        self.claimed_by() == Some(owner)
    }

    /// Current owner.
    #[must_use]
    pub fn claimed_by(&self) -> Option<K> {
        self.claim.map(|c| c.owner)
    }

    /// Type of the current claim.
    #[must_use]
    pub fn claim_type(&self) -> Option<ClaimType> {
        self.claim.map(|c| c.claim_type)
    }

    /// Current claim.
    #[must_use]
    pub fn current(&self) -> Option<Claim<K>> {
        self.claim
    }

    /// Returns `true` between a first frame and [`end_gesture`](Self::end_gesture).
    #[must_use]
    pub fn in_gesture(&self) -> bool {
        self.active
    }

    /// Returns `true` if an abandon is waiting for the next frame.
    #[must_use]
    pub fn abandon_pending(&self) -> bool {
        self.abandon_requested
    }

    /// Number of gestures started so far.
    #[must_use]
    pub fn gesture_count(&self) -> u64 {
        self.gestures
    }

    /// Releases the claim immediately.
    pub fn reset_claim(&mut self) -> Option<Claim<K>> {
        self.abandon_requested = false;
        let released = self.claim.take();
        #[cfg(feature = "tracing")]
        if released.is_some() {
            tracing::debug!(claim = ?released, "gesture claim reset");
        }
        released
    }

    /// Cooperative early release by the current owner.
    ///
    /// Takes effect at the next [`begin_frame`](Self::begin_frame). Returns
    /// `false` if `owner` does not hold the claim.
    pub fn abandon(&mut self, owner: K) -> bool {
        if !self.is_claimed_by(owner) {
            return false;
        }
        self.abandon_requested = true;
        true
    }

    /// Ends the gesture, releasing the claim whether or not it was used.
    pub fn end_gesture(&mut self) -> Option<Claim<K>> {
        self.window_open = false;
        self.active = false;
        self.abandon_requested = false;
        self.claim.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    fn first() -> GestureFrame {
        GestureFrame::start(Point::new(1.0, 1.0))
    }

    #[test]
    fn claims_only_on_first_frame() {
        let mut a = GestureArbiter::new();
        // Outside a gesture nothing can be claimed.
        assert!(!a.claim(ClaimType::Object, 1_u32));

        let f = first();
        a.begin_frame(&f);
        a.begin_frame(&f.next(Point::new(2.0, 2.0)));
        assert!(!a.claim(ClaimType::Object, 1));
        assert_eq!(a.claimed_by(), None);
    }

    #[test]
    fn exactly_one_of_two_racing_claims_wins() {
        let mut a = GestureArbiter::new();
        a.begin_frame(&first());
        let results = [a.claim(ClaimType::Object, 1_u32), a.claim(ClaimType::Container, 2)];
        assert_eq!(results, [true, false]);
        assert_eq!(a.current(), Some(Claim { owner: 1, claim_type: ClaimType::Object }));
        // Re-claiming the same thing is fine.
        assert!(a.claim(ClaimType::Object, 1));
    }

    #[test]
    fn override_displaces_mid_gesture() {
        let mut a = GestureArbiter::new();
        let f = first();
        a.begin_frame(&f);
        assert!(a.claim(ClaimType::Object, 1_u32));
        a.begin_frame(&f.next(Point::new(3.0, 3.0)));
        assert!(a.claim_with(ClaimType::Tool, 9, ClaimMode::Override));
        assert!(a.has_claim(ClaimType::Tool, 9));
        assert!(!a.is_claimed_by(1));

        a.end_gesture();
        assert!(!a.claim_with(ClaimType::Tool, 9, ClaimMode::Override));
    }

    #[test]
    fn end_gesture_always_clears() {
        let mut a: GestureArbiter<u32> = GestureArbiter::new();
        a.begin_frame(&first());
        assert_eq!(a.end_gesture(), None);
        assert_eq!(a.claimed_by(), None);

        a.begin_frame(&first());
        a.claim(ClaimType::Surface, 4);
        assert!(a.end_gesture().is_some());
        assert_eq!(a.claimed_by(), None);
        assert!(!a.in_gesture());
        assert_eq!(a.gesture_count(), 2);
    }

    #[test]
    fn abandon_is_observed_on_next_frame() {
        let mut a = GestureArbiter::new();
        let f = first();
        a.begin_frame(&f);
        a.claim(ClaimType::Object, 1_u32);

        assert!(!a.abandon(2), "only the owner can abandon");
        assert!(a.abandon(1));
        assert!(a.abandon_pending());
        // Still owned for the rest of this frame.
        assert!(a.has_claim(ClaimType::Object, 1));

        let released = a.begin_frame(&f.next(Point::new(4.0, 4.0)).with_touches(2));
        assert_eq!(released, Some(Claim { owner: 1, claim_type: ClaimType::Object }));
        assert_eq!(a.claimed_by(), None);
        // The window stays closed: nobody can pick the gesture up mid-way.
        assert!(!a.claim(ClaimType::Surface, 0));
    }

    #[test]
    fn arbitrate_uses_first_accepting_filter_once() {
        use core::cell::Cell;

        let calls = Cell::new(0);
        let needs_shift = |f: &GestureFrame| {
            calls.set(calls.get() + 1);
            f.shift()
        };
        let mut a = GestureArbiter::new();
        let f = first();
        a.begin_frame(&f);
        let claim = a.arbitrate(
            &f,
            [
                Candidate::new(1_u32, ClaimType::Tool).with_filter(&needs_shift),
                Candidate::new(2, ClaimType::Surface),
            ],
        );
        assert_eq!(claim, Some(Claim { owner: 2, claim_type: ClaimType::Surface }));
        assert_eq!(calls.get(), 1);

        let next = f.next(Point::new(2.0, 2.0));
        a.begin_frame(&next);
        let claim = a.arbitrate(
            &next,
            [Candidate::new(1, ClaimType::Tool).with_filter(&needs_shift)],
        );
        assert_eq!(claim.map(|c| c.owner), Some(2));
        assert_eq!(calls.get(), 1, "filters only run on the first frame");
    }

    #[test]
    fn rejected_by_everyone_stays_unclaimed() {
        let never = |_: &GestureFrame| false;
        let mut a = GestureArbiter::new();
        let f = first();
        a.begin_frame(&f);
        let claim = a.arbitrate(&f, [Candidate::new(1_u32, ClaimType::Object).with_filter(&never)]);
        assert_eq!(claim, None);
    }
}
