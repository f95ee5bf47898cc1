use minimap_core::BinaryMask;
use nalgebra::Point2;

use crate::types::{Blob, BoundingBox};

/// Clockwise 8-neighbourhood in image coordinates (y grows downwards).
const OFFSETS: [(i64, i64); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

const WEST: usize = 4;

fn direction_of(dx: i64, dy: i64) -> Option<usize> {
    OFFSETS.iter().position(|&o| o == (dx, dy))
}

/// One labelled 8-connected component.
#[derive(Clone, Debug)]
pub struct Component {
    /// Label in the label image, starting at 1.
    pub label: u32,
    /// First pixel in raster order (topmost, then leftmost).
    pub start: (usize, usize),
    pub pixels: Vec<(usize, usize)>,
    pub bbox: BoundingBox,
}

/// Label 8-connected foreground regions.
///
/// Returns the label image (0 = background) and the components in the
/// order their first pixel is met during a raster scan.
pub fn label_components(mask: &BinaryMask) -> (Vec<u32>, Vec<Component>) {
    let (w, h) = (mask.width, mask.height);
    let mut labels = vec![0u32; w * h];
    let mut components = Vec::new();
    if mask.is_empty() {
        return (labels, components);
    }

    let mut stack: Vec<(usize, usize)> = Vec::new();
    for y in 0..h {
        for x in 0..w {
            if !mask.data[y * w + x] || labels[y * w + x] != 0 {
                continue;
            }

            let label = components.len() as u32 + 1;
            labels[y * w + x] = label;
            stack.push((x, y));

            let mut pixels = Vec::new();
            let mut bbox = BoundingBox {
                min_x: x,
                min_y: y,
                max_x: x,
                max_y: y,
            };

            while let Some((cx, cy)) = stack.pop() {
                pixels.push((cx, cy));
                bbox.min_x = bbox.min_x.min(cx);
                bbox.min_y = bbox.min_y.min(cy);
                bbox.max_x = bbox.max_x.max(cx);
                bbox.max_y = bbox.max_y.max(cy);

                for &(dx, dy) in &OFFSETS {
                    let (nx, ny) = (cx as i64 + dx, cy as i64 + dy);
                    if !mask.get(nx, ny) {
                        continue;
                    }
                    let idx = ny as usize * w + nx as usize;
                    if labels[idx] == 0 {
                        labels[idx] = label;
                        stack.push((nx as usize, ny as usize));
                    }
                }
            }

            components.push(Component {
                label,
                start: (x, y),
                pixels,
                bbox,
            });
        }
    }

    (labels, components)
}

/// Trace the outer boundary of one component with Moore-neighbour tracing.
///
/// `start` must be the component's first pixel in raster order, so that its
/// west neighbour is background. The returned points are pixel centres in
/// clockwise order without repeating the start point. An isolated pixel
/// yields a single point.
pub fn trace_contour(
    labels: &[u32],
    width: usize,
    height: usize,
    label: u32,
    start: (usize, usize),
) -> Vec<(i64, i64)> {
    let (w, h) = (width as i64, height as i64);
    let is_fg = |x: i64, y: i64| {
        x >= 0 && y >= 0 && x < w && y < h && labels[y as usize * width + x as usize] == label
    };

    let start = (start.0 as i64, start.1 as i64);
    let mut points = vec![start];
    let mut cur = start;
    let mut back = WEST;
    let mut first_move: Option<usize> = None;
    // Every boundary pixel is entered at most four times.
    let max_steps = 4 * labels.len() + 4;

    for _ in 0..max_steps {
        let found = (1..8).map(|k| (back + k) % 8).find(|&d| {
            let (dx, dy) = OFFSETS[d];
            is_fg(cur.0 + dx, cur.1 + dy)
        });
        let Some(d) = found else {
            break;
        };
        if cur == start && first_move == Some(d) {
            points.pop();
            break;
        }
        first_move.get_or_insert(d);

        let prev_bg = OFFSETS[(d + 7) % 8];
        let bg = (cur.0 + prev_bg.0, cur.1 + prev_bg.1);
        let next = (cur.0 + OFFSETS[d].0, cur.1 + OFFSETS[d].1);
        back = match direction_of(bg.0 - next.0, bg.1 - next.1) {
            Some(b) => b,
            None => break,
        };
        cur = next;
        points.push(cur);
    }

    points
}

fn contour_perimeter(points: &[(i64, i64)]) -> f32 {
    if points.len() < 2 {
        return 0.0;
    }
    let n = points.len();
    (0..n)
        .map(|i| {
            let (a, b) = (points[i], points[(i + 1) % n]);
            let (dx, dy) = ((b.0 - a.0) as f32, (b.1 - a.1) as f32);
            (dx * dx + dy * dy).sqrt()
        })
        .sum()
}

fn contour_area(points: &[(i64, i64)]) -> f32 {
    if points.len() < 3 {
        return 0.0;
    }
    let n = points.len();
    let twice: i64 = (0..n)
        .map(|i| {
            let (a, b) = (points[i], points[(i + 1) % n]);
            a.0 * b.1 - b.0 * a.1
        })
        .sum();
    (twice as f32 * 0.5).abs()
}

/// Describe one component, or `None` when its contour has zero length.
pub(crate) fn describe(
    labels: &[u32],
    width: usize,
    height: usize,
    component: &Component,
) -> Option<Blob> {
    let contour = trace_contour(labels, width, height, component.label, component.start);
    let perimeter = contour_perimeter(&contour);
    if perimeter <= 0.0 {
        return None;
    }

    let area = contour_area(&contour);
    let n = component.pixels.len() as f32;
    let (sx, sy) = component
        .pixels
        .iter()
        .fold((0.0f32, 0.0f32), |(sx, sy), &(x, y)| {
            (sx + x as f32, sy + y as f32)
        });

    let bbox = component.bbox;
    Some(Blob {
        area,
        pixel_count: component.pixels.len(),
        perimeter,
        centroid: Point2::new(sx / n, sy / n),
        circularity: 4.0 * std::f32::consts::PI * area / (perimeter * perimeter),
        aspect_ratio: bbox.width() as f32 / bbox.height() as f32,
        bbox,
    })
}

/// Label `mask` and describe every component with a non-degenerate contour.
///
/// Returns the blobs together with the number of labelled components.
pub(crate) fn extract_counted(mask: &BinaryMask) -> (Vec<Blob>, usize) {
    let (labels, components) = label_components(mask);
    let blobs = components
        .iter()
        .filter_map(|c| describe(&labels, mask.width, mask.height, c))
        .collect();
    (blobs, components.len())
}

/// Describe every component of `mask`. Zero-perimeter components are dropped.
pub fn extract_blobs(mask: &BinaryMask) -> Vec<Blob> {
    extract_counted(mask).0
}
