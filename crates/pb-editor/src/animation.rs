//! One-shot entrance choreography for viewers.
//!
//! Every hotspot starts on its guideline end, hidden, and flies to its saved
//! position after a per-index stagger. Once the last one has settled, the
//! connectors grow from their fixed start toward the live hotspot centre.
//! The animator is clock-driven: the host calls [`EntranceAnimator::tick`]
//! once per animation frame and applies the returned steps.

use pb_core::{Guidelines, HotspotSet, PartIndex, PercentPoint};

/// Delay between successive hotspot reveals.
pub const STAGGER_MS: f64 = 120.0;
/// Wait after the last reveal before connectors start drawing.
pub const SETTLE_MS: f64 = 1100.0;
/// Duration of the connector draw.
pub const LINE_DRAW_MS: f64 = 600.0;
/// CSS transition applied to hotspots for the reveal.
pub const HOTSPOT_TRANSITION: &str = "opacity 0.8s ease-out, left 1s ease-out, top 1s ease-out";

/// Where one hotspot starts and ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntranceTrack {
    pub index: PartIndex,
    pub start: PercentPoint,
    pub end: PercentPoint,
    /// Only hotspots with a guideline get a connector during the draw.
    pub has_guideline: bool,
}

/// Capture start/end for each hotspot. Without a guideline the start is
/// the saved position itself, so the hotspot fades in without travelling.
pub fn plan_entrance(hotspots: &HotspotSet, guidelines: &Guidelines) -> Vec<EntranceTrack> {
    hotspots
        .iter()
        .map(|h| {
            let guide = guidelines.get(h.index);
            EntranceTrack {
                index: h.index,
                start: guide.unwrap_or(h.position),
                end: h.position,
                has_guideline: guide.is_some(),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntranceStep {
    /// Fade in and move to the saved position.
    Reveal(PartIndex),
    /// Draw connectors `progress` (0..=1) of the way.
    DrawLines { progress: f64 },
    /// Final static redraw; pulsing affordances may start.
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Pending,
    Revealing { started: f64 },
    Drawing { started: f64 },
    Done,
}

#[derive(Debug, Clone)]
pub struct EntranceAnimator {
    tracks: Vec<EntranceTrack>,
    revealed: usize,
    phase: Phase,
}

impl EntranceAnimator {
    pub fn new(tracks: Vec<EntranceTrack>) -> Self {
        Self {
            tracks,
            revealed: 0,
            phase: Phase::Pending,
        }
    }

    pub fn tracks(&self) -> &[EntranceTrack] {
        &self.tracks
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Revealing { .. } | Phase::Drawing { .. })
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Start the clock. An empty page finishes immediately.
    pub fn start(&mut self, now: f64) -> Vec<EntranceStep> {
        if self.phase != Phase::Pending {
            return Vec::new();
        }
        if self.tracks.is_empty() {
            self.phase = Phase::Done;
            return vec![EntranceStep::Finished];
        }
        self.phase = Phase::Revealing { started: now };
        self.tick(now)
    }

    /// Time at which the connector draw begins, relative to `start`.
    pub fn draw_offset(&self) -> f64 {
        let last = self.tracks.len().saturating_sub(1) as f64;
        last * STAGGER_MS + SETTLE_MS
    }

    pub fn tick(&mut self, now: f64) -> Vec<EntranceStep> {
        let mut steps = Vec::new();
        if let Phase::Revealing { started } = self.phase {
            while self.revealed < self.tracks.len()
                && now - started >= self.revealed as f64 * STAGGER_MS
            {
                steps.push(EntranceStep::Reveal(self.tracks[self.revealed].index));
                self.revealed += 1;
            }
            let draw_at = started + self.draw_offset();
            if self.revealed == self.tracks.len() && now >= draw_at {
                self.phase = Phase::Drawing { started: draw_at };
            }
        }
        if let Phase::Drawing { started } = self.phase {
            let progress = ((now - started) / LINE_DRAW_MS).clamp(0.0, 1.0);
            steps.push(EntranceStep::DrawLines { progress });
            if progress >= 1.0 {
                self.phase = Phase::Done;
                log::info!("entrance finished for {} hotspots", self.tracks.len());
                steps.push(EntranceStep::Finished);
            }
        }
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pb_core::Hotspot;
    use pretty_assertions::assert_eq;

    fn idx(n: u32) -> PartIndex {
        PartIndex::new(n).unwrap()
    }

    fn three() -> (HotspotSet, Guidelines) {
        let set = HotspotSet::from_parts(vec![
            Hotspot::new(idx(1), PercentPoint::new(30.0, 30.0))
                .with_guideline(PercentPoint::new(5.0, 30.0)),
            Hotspot::new(idx(1), PercentPoint::new(50.0, 60.0)),
            Hotspot::new(idx(1), PercentPoint::new(70.0, 40.0))
                .with_guideline(PercentPoint::new(95.0, 40.0)),
        ]);
        let lines = Guidelines::from_hotspots(&set);
        (set, lines)
    }

    #[test]
    fn degenerate_track_does_not_travel() {
        let (set, lines) = three();
        let tracks = plan_entrance(&set, &lines);
        assert_eq!(tracks[1].start, tracks[1].end);
        assert!(!tracks[1].has_guideline);
        assert_eq!(tracks[0].start, PercentPoint::new(5.0, 30.0));
        assert_eq!(tracks[0].end, PercentPoint::new(30.0, 30.0));
        assert_eq!(tracks[2].start, PercentPoint::new(95.0, 40.0));
        assert_eq!(tracks[2].end, PercentPoint::new(70.0, 40.0));
    }

    #[test]
    fn reveals_are_staggered() {
        let (set, lines) = three();
        let mut anim = EntranceAnimator::new(plan_entrance(&set, &lines));
        assert_eq!(anim.start(1000.0), vec![EntranceStep::Reveal(idx(1))]);
        assert!(anim.tick(1119.0).is_empty());
        assert_eq!(anim.tick(1120.0), vec![EntranceStep::Reveal(idx(2))]);
        assert_eq!(anim.tick(1500.0), vec![EntranceStep::Reveal(idx(3))]);
        assert!(anim.is_running());
    }

    #[test]
    fn lines_draw_after_settle_then_finish() {
        let (set, lines) = three();
        let mut anim = EntranceAnimator::new(plan_entrance(&set, &lines));
        anim.start(0.0);
        anim.tick(240.0);
        // last reveal at 240, draw starts at 240 + 1100
        assert_eq!(anim.draw_offset(), 1340.0);
        assert!(anim.tick(1339.0).is_empty());
        assert_eq!(anim.tick(1340.0), vec![EntranceStep::DrawLines { progress: 0.0 }]);
        assert_eq!(anim.tick(1640.0), vec![EntranceStep::DrawLines { progress: 0.5 }]);
        assert_eq!(
            anim.tick(2000.0),
            vec![EntranceStep::DrawLines { progress: 1.0 }, EntranceStep::Finished]
        );
        assert!(anim.is_finished());
        assert!(anim.tick(3000.0).is_empty());
    }

    #[test]
    fn late_frame_catches_up() {
        let (set, lines) = three();
        let mut anim = EntranceAnimator::new(plan_entrance(&set, &lines));
        anim.start(0.0);
        let steps = anim.tick(5000.0);
        assert_eq!(
            steps,
            vec![
                EntranceStep::Reveal(idx(2)),
                EntranceStep::Reveal(idx(3)),
                EntranceStep::DrawLines { progress: 1.0 },
                EntranceStep::Finished,
            ]
        );
    }

    #[test]
    fn empty_page_finishes_at_once() {
        let mut anim = EntranceAnimator::new(Vec::new());
        assert_eq!(anim.start(0.0), vec![EntranceStep::Finished]);
        assert!(anim.is_finished());
        assert!(anim.start(1.0).is_empty());
    }
}
