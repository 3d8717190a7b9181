//! Input-state cache for solve results.
//!
//! The 2D solve can run for seconds to minutes; everything downstream of
//! it is cheap. The cache remembers the last request/result pair per
//! operation and skips re-solving when a recompute arrives with an
//! identical request. Lookup is structural equality on the typed request —
//! no serialization round-trip involved. The serde form of the pair is the
//! persisted cross-session state.

use serde::{Deserialize, Serialize};

use crate::region::SolveResult;
use crate::request::SolveRequest;

/// Last solve request and its result, per operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolveCache {
    state: Option<(SolveRequest, SolveResult)>,
}

impl SolveCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the stored result if `request` matches the stored request.
    pub fn lookup(&self, request: &SolveRequest) -> Option<&SolveResult> {
        match &self.state {
            Some((stored, result)) if stored == request => Some(result),
            _ => None,
        }
    }

    /// Store a request/result pair, replacing any previous state.
    pub fn store(&mut self, request: SolveRequest, result: SolveResult) {
        self.state = Some((request, result));
    }

    /// Drop the stored state.
    pub fn clear(&mut self) {
        self.state = None;
    }

    /// Whether the cache holds a result.
    pub fn is_populated(&self) -> bool {
        self.state.is_some()
    }

    /// Serialize for cross-session persistence.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Restore from persisted state.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::{MotionKind, PathSegment, Region};
    use crate::request::{CutSide, OperationKind};
    use timbercam_outline::{Outline, Point2d};

    fn request(stepover: f64) -> SolveRequest {
        let square = Outline::single(vec![
            Point2d::new(0.0, 0.0),
            Point2d::new(10.0, 0.0),
            Point2d::new(10.0, 10.0),
            Point2d::new(0.0, 10.0),
            Point2d::new(0.0, 0.0),
        ]);
        SolveRequest {
            tool_diameter: 6.0,
            tolerance: 0.1,
            stepover_percent: stepover,
            helix_diameter_limit: 0.0,
            operation: OperationKind::Clearing,
            side: CutSide::Inside,
            force_inside_out: false,
            keep_tool_down_ratio: 3.0,
            stock_to_leave: 0.0,
            base: square.clone(),
            stock: square,
        }
    }

    fn result() -> SolveResult {
        SolveResult {
            regions: vec![Region {
                helix_center: Point2d::new(5.0, 5.0),
                start_point: Point2d::new(6.0, 5.0),
                paths: vec![PathSegment::new(
                    MotionKind::Cutting,
                    vec![Point2d::new(6.0, 5.0), Point2d::new(6.0, 6.0)],
                )],
            }],
        }
    }

    #[test]
    fn test_empty_cache_misses() {
        let cache = SolveCache::new();
        assert!(cache.lookup(&request(20.0)).is_none());
        assert!(!cache.is_populated());
    }

    #[test]
    fn test_hit_on_equal_request() {
        let mut cache = SolveCache::new();
        cache.store(request(20.0), result());
        assert_eq!(cache.lookup(&request(20.0)), Some(&result()));
    }

    #[test]
    fn test_miss_on_changed_request() {
        let mut cache = SolveCache::new();
        cache.store(request(20.0), result());
        assert!(cache.lookup(&request(25.0)).is_none());
    }

    #[test]
    fn test_store_replaces() {
        let mut cache = SolveCache::new();
        cache.store(request(20.0), result());
        cache.store(request(25.0), SolveResult::empty());
        assert!(cache.lookup(&request(20.0)).is_none());
        assert_eq!(cache.lookup(&request(25.0)), Some(&SolveResult::empty()));
    }

    #[test]
    fn test_persistence_round_trip() {
        let mut cache = SolveCache::new();
        cache.store(request(20.0), result());
        let json = cache.to_json().unwrap();
        let restored = SolveCache::from_json(&json).unwrap();
        assert_eq!(restored.lookup(&request(20.0)), Some(&result()));
    }
}
