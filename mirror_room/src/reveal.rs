use super::*;

/// Default pause between two segments of a revealed light path.
pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_millis(300);

/// A segment of a light path that is due to be drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealStep {
    /// The reveal this step belongs to.
    pub generation: u64,
    pub index: usize,
    pub segment: Segment,
}

#[derive(Clone, Debug, PartialEq)]
struct Reveal {
    segments: ArrayVec<Segment, { MAX_WAYPOINTS - 1 }>,
    shown: usize,
    elapsed: Duration,
}

/// Paces the drawing of light path segments, one every `delay`.
///
/// Time is driven by the caller ([`Self::poll`]), so nothing here ever blocks.
/// Starting a new reveal bumps the generation, which invalidates every step
/// handed out by the previous one.
#[derive(Clone, Debug, PartialEq)]
pub struct RevealScheduler {
    delay: Duration,
    generation: u64,
    active: Option<Reveal>,
}

impl Default for RevealScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_REVEAL_DELAY)
    }
}

impl RevealScheduler {
    #[inline]
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            active: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    #[inline]
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether `step` belongs to the current reveal.
    #[inline]
    #[must_use]
    pub const fn is_current(&self, step: &RevealStep) -> bool {
        step.generation == self.generation
    }

    /// Whether segments are still waiting to be drawn.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|r| r.shown < r.segments.len())
    }

    /// Schedules `segments` (at most [`MAX_WAYPOINTS`]` - 1`), replacing any
    /// ongoing reveal. The first segment is due immediately.
    pub fn start(&mut self, segments: impl IntoIterator<Item = Segment>) -> u64 {
        self.generation += 1;
        self.active = Some(Reveal {
            segments: segments.into_iter().take(MAX_WAYPOINTS - 1).collect(),
            shown: 0,
            elapsed: Duration::ZERO,
        });
        self.generation
    }

    /// Drops the ongoing reveal, if any.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.active = None;
    }

    /// Advances the clock by `elapsed`, and returns the segments that became due.
    pub fn poll(&mut self, elapsed: Duration) -> Vec<RevealStep> {
        let Some(reveal) = self.active.as_mut() else {
            return Vec::new();
        };

        reveal.elapsed = reveal.elapsed.saturating_add(elapsed);

        let due = if self.delay.is_zero() {
            reveal.segments.len()
        } else {
            let steps = reveal.elapsed.as_nanos() / self.delay.as_nanos();
            usize::try_from(steps)
                .unwrap_or(usize::MAX)
                .saturating_add(1)
                .min(reveal.segments.len())
        };

        Self::take(self.generation, reveal, due)
    }

    /// Returns every segment not yet drawn, regardless of the clock.
    pub fn drain(&mut self) -> Vec<RevealStep> {
        match self.active.as_mut() {
            Some(reveal) => {
                let due = reveal.segments.len();
                Self::take(self.generation, reveal, due)
            }
            None => Vec::new(),
        }
    }

    fn take(generation: u64, reveal: &mut Reveal, due: usize) -> Vec<RevealStep> {
        let steps = (reveal.shown..due)
            .map(|index| RevealStep {
                generation,
                index,
                segment: reveal.segments[index],
            })
            .collect();
        reveal.shown = reveal.shown.max(due);
        steps
    }
}
