use nalgebra::Point2;

use crate::point::DeparturePoint;

/// Whether the player position reaches `point`. No position is never a hit.
#[inline]
pub fn is_hit(player: Option<Point2<f32>>, point: &DeparturePoint) -> bool {
    player.is_some_and(|p| point.is_hit_by(p))
}

/// Departure points in `points` reached by `player`, in input order.
pub fn hits<'a, I>(
    player: Option<Point2<f32>>,
    points: I,
) -> impl Iterator<Item = &'a DeparturePoint>
where
    I: IntoIterator<Item = &'a DeparturePoint>,
{
    let matched = points.into_iter().filter(move |p| is_hit(player, p));
    matched.inspect(move |p| log::debug!("departure point {:?} hit at {:?}", p.name, player))
}
