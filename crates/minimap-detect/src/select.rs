use std::collections::HashMap;

use kiddo::{KdTree, SquaredEuclidean};
use minimap_blobs::Blob;
use nalgebra::Point2;

/// Pick the blob whose centroid is closest to `center`.
///
/// Ties keep the blob that comes first in `blobs` (raster order of the
/// component's first pixel).
pub fn select_primary(blobs: &[Blob], center: Point2<f32>) -> Option<&Blob> {
    let mut best: Option<(&Blob, f32)> = None;
    for blob in blobs {
        let d = blob.distance_sq_to(center);
        if best.map(|(_, bd)| d < bd).unwrap_or(true) {
            best = Some((blob, d));
        }
    }
    best.map(|(b, _)| b)
}

/// Merge secondary blobs that lie within `threshold` px of each other.
///
/// Blobs are nodes of a graph with an edge between every pair closer than
/// `threshold`; each connected component is one marker. Returns the mean
/// centroid of every component, ordered by its first member.
pub fn dedup_secondary(blobs: &[Blob], threshold: f32) -> Vec<Point2<f32>> {
    if blobs.is_empty() {
        return Vec::new();
    }

    // The tree caps how many items sit on one exact point, so blobs sharing
    // a centroid are stored once as a site.
    let mut site_of = HashMap::new();
    let mut coords: Vec<[f32; 2]> = Vec::new();
    let mut members: Vec<Vec<usize>> = Vec::new();
    for (idx, blob) in blobs.iter().enumerate() {
        let c = blob.centroid;
        let key = ((c.x + 0.0).to_bits(), (c.y + 0.0).to_bits());
        let site = *site_of.entry(key).or_insert_with(|| {
            coords.push([c.x, c.y]);
            members.push(Vec::new());
            members.len() - 1
        });
        members[site].push(idx);
    }

    let tree: KdTree<f32, 2> = (&coords).into();
    let threshold_sq = threshold * threshold;
    // Query slightly wider and apply the exact test below.
    let query_sq = threshold_sq * (1.0 + 1e-4) + 1e-6;

    let mut group = vec![usize::MAX; coords.len()];
    let mut centroids = Vec::new();
    let mut queue = Vec::new();

    for seed in 0..coords.len() {
        if group[seed] != usize::MAX {
            continue;
        }
        let id = centroids.len();
        group[seed] = id;
        queue.push(seed);

        let mut sum = nalgebra::Vector2::zeros();
        let mut count = 0usize;
        while let Some(site) = queue.pop() {
            for &idx in &members[site] {
                sum += blobs[idx].centroid.coords;
            }
            count += members[site].len();

            let here = blobs[members[site][0]].centroid;
            for nn in tree.within::<SquaredEuclidean>(&coords[site], query_sq) {
                let other = nn.item as usize;
                if group[other] != usize::MAX {
                    continue;
                }
                let there = blobs[members[other][0]].centroid;
                if (there - here).norm_squared() <= threshold_sq {
                    group[other] = id;
                    queue.push(other);
                }
            }
        }
        centroids.push(Point2::from(sum / count as f32));
    }

    centroids
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use minimap_blobs::BoundingBox;

    fn blob_at(x: f32, y: f32) -> Blob {
        Blob {
            area: 16.0,
            pixel_count: 25,
            perimeter: 16.0,
            centroid: Point2::new(x, y),
            circularity: 0.8,
            aspect_ratio: 1.0,
            bbox: BoundingBox {
                min_x: 0,
                min_y: 0,
                max_x: 4,
                max_y: 4,
            },
        }
    }

    #[test]
    fn primary_is_closest_to_center() {
        let blobs = [blob_at(10.0, 10.0), blob_at(48.0, 22.0), blob_at(80.0, 30.0)];
        let chosen = select_primary(&blobs, Point2::new(50.0, 25.0)).expect("candidate");
        assert_eq!(chosen.centroid, Point2::new(48.0, 22.0));
    }

    #[test]
    fn primary_tie_is_deterministic() {
        let blobs = [blob_at(40.0, 25.0), blob_at(60.0, 25.0)];
        let center = Point2::new(50.0, 25.0);
        let a = select_primary(&blobs, center).map(|b| b.centroid);
        let b = select_primary(&blobs, center).map(|b| b.centroid);
        assert!(a.is_some());
        assert_eq!(a, b);
    }

    #[test]
    fn no_candidates_means_no_primary() {
        assert!(select_primary(&[], Point2::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn near_coincident_blobs_merge() {
        let blobs = [blob_at(100.0, 30.0), blob_at(102.0, 30.0)];
        let merged = dedup_secondary(&blobs, 5.0);
        assert_eq!(merged.len(), 1);
        assert_abs_diff_eq!(merged[0].x, 101.0, epsilon = 1e-5);
    }

    #[test]
    fn distant_blobs_stay_separate() {
        let blobs = [blob_at(100.0, 30.0), blob_at(250.0, 60.0)];
        assert_eq!(dedup_secondary(&blobs, 5.0).len(), 2);
    }

    #[test]
    fn chains_merge_regardless_of_order() {
        // a-b and b-c are within range, a-c is not: one marker either way.
        let a = blob_at(0.0, 0.0);
        let b = blob_at(4.0, 0.0);
        let c = blob_at(8.0, 0.0);
        assert_eq!(dedup_secondary(&[a, b, c], 5.0).len(), 1);
        assert_eq!(dedup_secondary(&[a, c, b], 5.0).len(), 1);
        assert_eq!(dedup_secondary(&[c, a, b], 5.0).len(), 1);
    }

    #[test]
    fn threshold_is_inclusive() {
        let blobs = [blob_at(0.0, 0.0), blob_at(3.0, 4.0)];
        assert_eq!(dedup_secondary(&blobs, 5.0).len(), 1);
        assert_eq!(dedup_secondary(&blobs, 4.99).len(), 2);
    }

    #[test]
    fn many_blobs_on_one_centroid_merge() {
        let mut blobs = vec![blob_at(40.0, 40.0); 80];
        blobs.push(blob_at(43.0, 40.0));
        let merged = dedup_secondary(&blobs, 5.0);
        assert_eq!(merged.len(), 1);
        assert_abs_diff_eq!(merged[0].x, 40.0 + 3.0 / 81.0, epsilon = 1e-4);
        assert_abs_diff_eq!(merged[0].y, 40.0, epsilon = 1e-5);
    }

    #[test]
    fn stacked_groups_stay_apart() {
        let mut blobs = vec![blob_at(100.0, 40.0); 40];
        blobs.extend(std::iter::repeat_n(blob_at(10.0, 40.0), 40));
        let merged = dedup_secondary(&blobs, 5.0);
        assert_eq!(merged.len(), 2);
        assert_abs_diff_eq!(merged[0].x, 100.0, epsilon = 1e-5);
        assert_abs_diff_eq!(merged[1].x, 10.0, epsilon = 1e-5);
    }
}
