//! Headless display session.
//!
//! A [`DisplaySession`] is the animated part of one mounted board: the
//! footer ticker, the route list scroller and the frame loop driving them.
//! Content sizes come from [`LayoutConfig`] rather than a real renderer.
//!
//! Each animator is remounted when the length of its content changes (footer
//! text length for the ticker, number of upcoming stops for the scroller),
//! which resets its frame state. Dropping the session unmounts both.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::animation::{
    AutoScrollAnimator, AutoScrollConfig, ScrollPhase, TickerAnimator, TickerConfig, TickerPhase,
};
use crate::config::{AnimationConfig, LayoutConfig};
use crate::hal::ManualScheduler;
use crate::journey::JourneyState;
use crate::traits::{Animator, FrameScheduler};

/// Animation state at the current frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationFrame {
    /// Session time in milliseconds.
    pub now_ms: u64,
    /// Ticker left offset in pixels.
    pub ticker_offset_px: f32,
    /// Ticker lifecycle phase.
    pub ticker_phase: TickerPhase,
    /// Route list scroll offset in pixels.
    pub route_scroll_px: f32,
    /// Route list pass phase.
    pub route_phase: ScrollPhase,
}

/// Ticker and route scroller for one board.
#[derive(Debug)]
pub struct DisplaySession {
    scheduler: ManualScheduler,
    ticker: TickerAnimator,
    route_scroll: AutoScrollAnimator,
    layout: LayoutConfig,
    ticker_chars: Option<usize>,
    upcoming_rows: Option<usize>,
    carry_ms: u64,
}

impl DisplaySession {
    /// New session with nothing mounted yet; call [`sync`](Self::sync) to mount.
    pub fn new(animation: &AnimationConfig, layout: LayoutConfig) -> Self {
        Self {
            scheduler: ManualScheduler::new(animation.frame_ms),
            ticker: TickerAnimator::new(
                TickerConfig::from_config(animation),
                0.0,
                layout.container_width_px,
            ),
            route_scroll: AutoScrollAnimator::new(
                AutoScrollConfig::from_config(animation),
                0.0,
                layout.viewport_height_px,
            ),
            layout,
            ticker_chars: None,
            upcoming_rows: None,
            carry_ms: 0,
        }
    }

    /// Bring the animators in line with `journey`, remounting whichever one's
    /// content length changed.
    pub fn sync(&mut self, journey: &JourneyState) {
        let footer = journey.footer_text();
        let chars = footer.chars().count();
        if self.ticker_chars != Some(chars) {
            debug!("ticker content changed to {} chars, remounting", chars);
            self.ticker.unmount(&mut self.scheduler);
            self.ticker
                .set_metrics(self.layout.text_width(footer), self.layout.container_width_px);
            self.ticker.mount(&mut self.scheduler);
            self.ticker_chars = Some(chars);
        }

        let rows = journey.upcoming_stops().len();
        if self.upcoming_rows != Some(rows) {
            debug!("route list changed to {} rows, remounting scroller", rows);
            self.route_scroll.unmount(&mut self.scheduler);
            self.route_scroll
                .set_metrics(self.layout.list_height(rows), self.layout.viewport_height_px);
            self.route_scroll.mount(&mut self.scheduler);
            self.upcoming_rows = Some(rows);
        }
    }

    /// Run the frame loop forward by `elapsed_ms`.
    ///
    /// Time that does not fill a whole frame is carried to the next call.
    /// Returns the number of frames stepped.
    pub fn advance(&mut self, elapsed_ms: u64) -> u64 {
        let frame_ms = self.scheduler.frame_ms();
        let total = self.carry_ms + elapsed_ms;
        let frames = total / frame_ms;
        self.carry_ms = total % frame_ms;

        for _ in 0..frames {
            for fired in self.scheduler.step() {
                if !self.ticker.on_fired(fired, &mut self.scheduler) {
                    self.route_scroll.on_fired(fired, &mut self.scheduler);
                }
            }
        }
        frames
    }

    /// Current animation state.
    pub fn frame(&self) -> AnimationFrame {
        AnimationFrame {
            now_ms: self.scheduler.now_ms(),
            ticker_offset_px: self.ticker.offset(),
            ticker_phase: self.ticker.phase(),
            route_scroll_px: self.route_scroll.position(),
            route_phase: self.route_scroll.phase(),
        }
    }

    /// Ticker animator.
    pub fn ticker(&self) -> &TickerAnimator {
        &self.ticker
    }

    /// Route list scroller.
    pub fn route_scroll(&self) -> &AutoScrollAnimator {
        &self.route_scroll
    }

    /// Callbacks still pending in the frame loop.
    pub fn pending_callbacks(&self) -> usize {
        self.scheduler.pending()
    }

    /// Unmount both animators, leaving no pending callbacks.
    pub fn shutdown(&mut self) {
        self.ticker.unmount(&mut self.scheduler);
        self.route_scroll.unmount(&mut self.scheduler);
        self.ticker_chars = None;
        self.upcoming_rows = None;
    }
}

impl Drop for DisplaySession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::DevCommand;
    use crate::source::fixture_journey;

    fn session() -> DisplaySession {
        DisplaySession::new(&AnimationConfig::default(), LayoutConfig::default())
    }

    #[test]
    fn sync_mounts_both_animators() {
        let mut s = session();
        s.sync(&fixture_journey());
        assert_eq!(s.ticker().phase(), TickerPhase::WaitingToStart);
        // ticker start timer + scroller initial timer
        assert_eq!(s.pending_callbacks(), 2);
    }

    #[test]
    fn unchanged_lengths_do_not_remount() {
        let mut s = session();
        let journey = fixture_journey();
        s.sync(&journey);
        s.advance(2000);
        let offset = s.frame().ticker_offset_px;

        let toggled = DevCommand::ToggleWifi.apply(&journey).unwrap();
        s.sync(&toggled);
        assert_eq!(s.frame().ticker_offset_px, offset);
        assert_eq!(s.ticker().phase(), TickerPhase::Running);
    }

    #[test]
    fn footer_length_change_remounts_ticker() {
        let mut s = session();
        let journey = fixture_journey();
        s.sync(&journey);
        s.advance(3000);
        assert_eq!(s.ticker().phase(), TickerPhase::Running);

        let changed = DevCommand::SetFooterMessage { message: "++ kurz ++".into() }
            .apply(&journey)
            .unwrap();
        s.sync(&changed);
        assert_eq!(s.ticker().phase(), TickerPhase::WaitingToStart);
        assert_eq!(s.frame().ticker_offset_px, s.ticker().centred_offset());
    }

    #[test]
    fn advancing_stops_remounts_scroller() {
        let mut s = session();
        let journey = fixture_journey();
        s.sync(&journey);
        s.advance(10_500);
        assert!(s.route_scroll().is_busy());

        let moved = DevCommand::NextStop.apply(&journey).unwrap();
        s.sync(&moved);
        assert!(!s.route_scroll().is_busy());
        assert_eq!(s.frame().route_scroll_px, 0.0);
    }

    #[test]
    fn advance_carries_partial_frames() {
        let mut s = session();
        s.sync(&fixture_journey());
        assert_eq!(s.advance(10), 0);
        assert_eq!(s.advance(10), 1);
        assert_eq!(s.frame().now_ms, 16);
    }

    #[test]
    fn shutdown_leaves_nothing_pending() {
        let mut s = session();
        s.sync(&fixture_journey());
        s.advance(12_000);
        s.shutdown();
        assert_eq!(s.pending_callbacks(), 0);
    }
}
