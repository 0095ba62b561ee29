//! Hover regions: screen points bucketed by quantized x.

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use super::types::{Point, Rect, Viewport};
use crate::error::{ChartError, ChartResult};

pub const DEFAULT_HOVER_BUCKET_PX: f64 = 1.0;

/// One data point under the pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoverPoint {
    pub trace_id: String,
    pub trace_index: usize,
    pub x: f64,
    pub y: f64,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub screen: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoverRegion {
    pub rect: Rect,
    /// X label of the region's first point.
    pub label: Option<String>,
    pub points: Vec<HoverPoint>,
}

/// Collects points into x buckets `floor(screen_x / bucket_px)`.
///
/// Buckets keep first-seen order until [`HoverIndexer::build`] sorts them.
#[derive(Debug, Clone)]
pub struct HoverIndexer {
    bucket_px: f64,
    buckets: IndexMap<i64, SmallVec<[HoverPoint; 4]>>,
}

impl HoverIndexer {
    pub fn new(bucket_px: f64) -> ChartResult<Self> {
        if !bucket_px.is_finite() || bucket_px <= 0.0 {
            return Err(ChartError::InvalidConfig(format!(
                "hover bucket width must be finite and > 0, got {bucket_px}"
            )));
        }
        Ok(Self {
            bucket_px,
            buckets: IndexMap::new(),
        })
    }

    #[must_use]
    pub fn bucket_px(&self) -> f64 {
        self.bucket_px
    }

    #[must_use]
    pub fn bucket_key(&self, screen_x: f64) -> i64 {
        (screen_x / self.bucket_px).floor() as i64
    }

    /// Adds a point; points with a non-finite screen position are ignored.
    pub fn push(&mut self, point: HoverPoint) {
        if !point.screen.x.is_finite() || !point.screen.y.is_finite() {
            return;
        }
        let key = self.bucket_key(point.screen.x);
        self.buckets.entry(key).or_default().push(point);
    }

    pub fn extend<I>(&mut self, points: I)
    where
        I: IntoIterator<Item = HoverPoint>,
    {
        for point in points {
            self.push(point);
        }
    }

    /// Turns the buckets into regions tiling the viewport width.
    ///
    /// Each boundary is the midpoint between the first screen x of two
    /// neighbouring buckets; the outer regions reach the viewport edges.
    /// Points left or right of the viewport are dropped.
    #[must_use]
    pub fn build(self, viewport: Viewport) -> HoverIndex {
        let (left_edge, right_edge) = (viewport.x, viewport.right());
        let mut buckets: Vec<SmallVec<[HoverPoint; 4]>> = self
            .buckets
            .into_values()
            .map(|mut points| {
                points.retain(|point| (left_edge..=right_edge).contains(&point.screen.x));
                points
            })
            .filter(|points| !points.is_empty())
            .collect();
        buckets.sort_by_key(|points| OrderedFloat(points[0].screen.x));

        let anchors: Vec<f64> = buckets.iter().map(|points| points[0].screen.x).collect();
        let regions: Vec<HoverRegion> = buckets
            .into_iter()
            .enumerate()
            .map(|(index, points)| {
                let left = if index == 0 {
                    viewport.x
                } else {
                    (anchors[index - 1] + anchors[index]) / 2.0
                };
                let right = anchors
                    .get(index + 1)
                    .map_or(viewport.right(), |next| (anchors[index] + next) / 2.0);
                let points = points.into_vec();
                HoverRegion {
                    rect: Rect::new(left, viewport.y, right - left, viewport.height),
                    label: points[0].x_label.clone(),
                    points,
                }
            })
            .collect();

        debug!(regions = regions.len(), "built hover index");
        HoverIndex { regions }
    }
}

/// Hover regions sorted by x.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HoverIndex {
    regions: Vec<HoverRegion>,
}

impl HoverIndex {
    #[must_use]
    pub fn regions(&self) -> &[HoverRegion] {
        &self.regions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Region under a pointer position, if any.
    #[must_use]
    pub fn hit_test(&self, x: f64, y: f64) -> Option<&HoverRegion> {
        let index = self.regions.partition_point(|region| region.rect.right() < x);
        let region = self.regions.get(index)?;
        region.rect.contains(Point::new(x, y)).then_some(region)
    }
}

#[cfg(test)]
mod tests {
    use super::{HoverIndexer, HoverPoint};
    use crate::core::{Point, Viewport};

    fn point(screen_x: f64, label: &str) -> HoverPoint {
        HoverPoint {
            trace_id: "y-0".to_owned(),
            trace_index: 0,
            x: screen_x,
            y: 0.0,
            x_label: Some(label.to_owned()),
            y_label: None,
            screen: Point::new(screen_x, 10.0),
        }
    }

    #[test]
    fn same_pixel_points_share_a_bucket() {
        let mut indexer = HoverIndexer::new(1.0).expect("bucket");
        indexer.push(point(10.2, "a"));
        indexer.push(point(10.7, "b"));
        indexer.push(point(30.0, "c"));
        let index = indexer.build(Viewport::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(index.len(), 2);
        assert_eq!(index.regions()[0].points.len(), 2);
        assert_eq!(index.regions()[0].label.as_deref(), Some("a"));
    }

    #[test]
    fn regions_are_sorted_and_split_at_midpoints() {
        let mut indexer = HoverIndexer::new(1.0).expect("bucket");
        indexer.push(point(60.0, "late"));
        indexer.push(point(20.0, "early"));
        let index = indexer.build(Viewport::new(0.0, 0.0, 100.0, 50.0));
        let regions = index.regions();
        assert_eq!(regions[0].label.as_deref(), Some("early"));
        assert_eq!(regions[0].rect.x, 0.0);
        assert_eq!(regions[0].rect.right(), 40.0);
        assert_eq!(regions[1].rect.x, 40.0);
        assert_eq!(regions[1].rect.right(), 100.0);
    }

    #[test]
    fn hit_test_finds_region_and_rejects_outside() {
        let mut indexer = HoverIndexer::new(1.0).expect("bucket");
        indexer.push(point(20.0, "a"));
        indexer.push(point(60.0, "b"));
        let index = indexer.build(Viewport::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(
            index.hit_test(55.0, 25.0).and_then(|r| r.label.as_deref()),
            Some("b")
        );
        assert!(index.hit_test(55.0, 80.0).is_none());
        assert!(index.hit_test(120.0, 25.0).is_none());
    }

    #[test]
    fn points_outside_viewport_are_dropped() {
        let mut indexer = HoverIndexer::new(1.0).expect("bucket");
        indexer.push(point(-40.0, "left"));
        indexer.push(point(-30.0, "left"));
        indexer.push(point(50.0, "inside"));
        indexer.push(point(140.0, "right"));
        let index = indexer.build(Viewport::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(index.len(), 1);
        let region = &index.regions()[0];
        assert_eq!(region.label.as_deref(), Some("inside"));
        assert_eq!(region.rect.x, 0.0);
        assert_eq!(region.rect.width, 100.0);
    }

    #[test]
    fn rejects_non_positive_bucket_width() {
        assert!(HoverIndexer::new(0.0).is_err());
        assert!(HoverIndexer::new(f64::NAN).is_err());
    }
}
