//! Slice gesture tracking and hit detection
//!
//! The touch path keeps only the most recent samples. Fewer than two samples
//! means no visible ribbon and no intersection test.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::object::{GameObject, HitKind};
use super::registry::ObjectRegistry;
use crate::consts::{RIBBON_BG_COLOR, RIBBON_BG_WIDTH, RIBBON_FG_COLOR, RIBBON_FG_WIDTH};

/// Recent touch samples, oldest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlicePath {
    points: Vec<Vec2>,
    capacity: usize,
}

impl SlicePath {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Start a new gesture at `point`
    pub fn begin(&mut self, point: Vec2) {
        self.points.clear();
        self.points.push(point);
    }

    /// Append a sample, dropping the oldest beyond capacity
    pub fn extend(&mut self, point: Vec2) {
        self.points.push(point);
        if self.points.len() > self.capacity {
            let excess = self.points.len() - self.capacity;
            self.points.drain(..excess);
        }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Enough samples for a ribbon and hit testing
    pub fn is_drawable(&self) -> bool {
        self.points.len() >= 2
    }
}

/// One stroke layer of the ribbon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RibbonStroke {
    pub width: f32,
    pub color: [f32; 4],
}

/// Renderable polyline following the path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ribbon {
    /// Polyline, `None` when there is nothing to draw
    pub polyline: Option<Vec<Vec2>>,
    /// Background then foreground
    pub strokes: [RibbonStroke; 2],
    /// Opacity (1 while touching, fades after release)
    pub alpha: f32,
    fade_rate: f32,
    fading: bool,
}

impl Ribbon {
    pub fn new(fade_duration: f32) -> Self {
        Self {
            polyline: None,
            strokes: [
                RibbonStroke {
                    width: RIBBON_BG_WIDTH,
                    color: RIBBON_BG_COLOR,
                },
                RibbonStroke {
                    width: RIBBON_FG_WIDTH,
                    color: RIBBON_FG_COLOR,
                },
            ],
            alpha: 1.0,
            fade_rate: if fade_duration > 0.0 {
                1.0 / fade_duration
            } else {
                f32::INFINITY
            },
            fading: false,
        }
    }

    /// Rebuild geometry from the current path
    pub fn regenerate(&mut self, path: &SlicePath) {
        self.polyline = path.is_drawable().then(|| path.points().to_vec());
    }

    pub fn is_visible(&self) -> bool {
        self.polyline.is_some() && self.alpha > 0.0
    }

    fn show(&mut self) {
        self.alpha = 1.0;
        self.fading = false;
    }

    fn start_fade(&mut self) {
        self.fading = true;
    }

    fn update(&mut self, dt: f32) {
        if self.fading {
            self.alpha = (self.alpha - dt * self.fade_rate).max(0.0);
            if self.alpha == 0.0 {
                self.fading = false;
            }
        }
    }
}

/// Tracks the active gesture and resolves what it cuts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SliceDetector {
    pub path: SlicePath,
    pub ribbon: Ribbon,
    /// Swoosh cue currently playing; repeats are suppressed
    pub swoosh_active: bool,
}

impl SliceDetector {
    pub fn new(capacity: usize, ribbon_fade: f32) -> Self {
        Self {
            path: SlicePath::new(capacity),
            ribbon: Ribbon::new(ribbon_fade),
            swoosh_active: false,
        }
    }

    /// Finger down: reset the path to a single point
    pub fn begin_path(&mut self, point: Vec2) {
        self.path.begin(point);
        self.ribbon.regenerate(&self.path);
        self.ribbon.show();
    }

    /// Finger moved
    pub fn extend_path(&mut self, point: Vec2) {
        self.path.extend(point);
        self.ribbon.regenerate(&self.path);
    }

    /// Finger lifted: the ribbon fades out
    pub fn end_path(&mut self) {
        self.ribbon.start_fade();
    }

    pub fn update(&mut self, dt: f32) {
        self.ribbon.update(dt);
    }

    /// Claim the swoosh cue. Returns false while one is already playing.
    pub fn try_start_swoosh(&mut self) -> bool {
        if self.swoosh_active {
            return false;
        }
        self.swoosh_active = true;
        true
    }

    pub fn swoosh_finished(&mut self) {
        self.swoosh_active = false;
    }

    /// Every live object whose hit region contains `point`, in id order.
    ///
    /// Returns a snapshot; the caller removes hits from the registry, which
    /// keeps overlapping objects from being credited twice.
    pub fn test_intersections(
        &self,
        point: Vec2,
        registry: &ObjectRegistry,
    ) -> Vec<(GameObject, HitKind)> {
        if !self.path.is_drawable() {
            return Vec::new();
        }
        registry
            .iter()
            .filter(|o| !o.removed)
            .filter_map(|o| o.hit_test(point).map(|hit| (o.clone(), hit)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::object::{BombSubpart, ObjectKind};

    #[test]
    fn test_path_keeps_most_recent_twelve() {
        let mut detector = SliceDetector::new(12, 0.25);
        detector.begin_path(Vec2::new(0.0, 0.0));
        for i in 1..15 {
            detector.extend_path(Vec2::new(i as f32, 0.0));
        }
        let points = detector.path.points();
        assert_eq!(points.len(), 12);
        assert_eq!(points[0], Vec2::new(3.0, 0.0));
        assert_eq!(points[11], Vec2::new(14.0, 0.0));
        assert_eq!(detector.ribbon.polyline.as_ref().map(Vec::len), Some(12));
    }

    #[test]
    fn test_single_point_has_no_ribbon() {
        let mut detector = SliceDetector::new(12, 0.25);
        detector.begin_path(Vec2::new(5.0, 5.0));
        assert!(detector.ribbon.polyline.is_none());
        assert!(!detector.ribbon.is_visible());

        detector.extend_path(Vec2::new(6.0, 5.0));
        assert!(detector.ribbon.is_visible());
    }

    #[test]
    fn test_begin_resets_path() {
        let mut detector = SliceDetector::new(12, 0.25);
        detector.begin_path(Vec2::ZERO);
        detector.extend_path(Vec2::ONE);
        detector.begin_path(Vec2::new(9.0, 9.0));
        assert_eq!(detector.path.points(), &[Vec2::new(9.0, 9.0)]);
    }

    #[test]
    fn test_ribbon_fades_after_release() {
        let mut detector = SliceDetector::new(12, 0.25);
        detector.begin_path(Vec2::ZERO);
        detector.extend_path(Vec2::ONE);
        detector.end_path();
        detector.update(0.125);
        assert!((detector.ribbon.alpha - 0.5).abs() < 1e-5);
        detector.update(0.5);
        assert_eq!(detector.ribbon.alpha, 0.0);
        assert!(!detector.ribbon.is_visible());

        detector.begin_path(Vec2::ZERO);
        assert_eq!(detector.ribbon.alpha, 1.0);
    }

    #[test]
    fn test_intersections_need_two_points() {
        let mut registry = ObjectRegistry::new();
        registry.insert(GameObject::new(
            1,
            ObjectKind::Normal { radius: 64.0 },
            Vec2::new(100.0, 100.0),
            Vec2::ZERO,
            0.0,
        ));
        let mut detector = SliceDetector::new(12, 0.25);
        detector.begin_path(Vec2::new(100.0, 100.0));
        assert!(detector.test_intersections(Vec2::new(100.0, 100.0), &registry).is_empty());

        detector.extend_path(Vec2::new(100.0, 100.0));
        let hits = detector.test_intersections(Vec2::new(100.0, 100.0), &registry);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].1, HitKind::Normal);
    }

    #[test]
    fn test_overlapping_objects_all_reported() {
        let mut registry = ObjectRegistry::new();
        registry.insert(GameObject::new(
            1,
            ObjectKind::Fast { radius: 64.0 },
            Vec2::new(100.0, 100.0),
            Vec2::ZERO,
            0.0,
        ));
        registry.insert(GameObject::new(
            2,
            ObjectKind::Bomb {
                subpart: BombSubpart {
                    offset: Vec2::ZERO,
                    radius: 48.0,
                },
            },
            Vec2::new(110.0, 100.0),
            Vec2::ZERO,
            0.0,
        ));
        let mut detector = SliceDetector::new(12, 0.25);
        detector.begin_path(Vec2::ZERO);
        detector.extend_path(Vec2::new(105.0, 100.0));

        let hits: Vec<(u32, HitKind)> = detector
            .test_intersections(Vec2::new(105.0, 100.0), &registry)
            .into_iter()
            .map(|(o, hit)| (o.id, hit))
            .collect();
        assert_eq!(hits, vec![(1, HitKind::Fast), (2, HitKind::BombSubpart)]);
    }

    #[test]
    fn test_swoosh_debounce() {
        let mut detector = SliceDetector::new(12, 0.25);
        assert!(detector.try_start_swoosh());
        assert!(!detector.try_start_swoosh());
        detector.swoosh_finished();
        assert!(detector.try_start_swoosh());
    }
}
