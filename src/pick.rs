//! Click-to-select.

use crate::model::Model;
use crate::raytrace::Ray;

/// Index of the nearest visible model whose triangles `ray` hits.
///
/// Boxes are tested first; a model is skipped outright when its box entry
/// lies beyond the best triangle hit found so far. Uses the world-space
/// caches, so the models should have been rendered (or
/// [`Model::update_world`] called) since they last moved.
pub fn pick(models: &[Model], ray: &Ray) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, model) in models.iter().enumerate() {
        if !model.is_visible() {
            continue;
        }
        let Some(entry) = model.bounds().and_then(|b| ray.hits_aabb(b)) else {
            continue;
        };
        if best.is_some_and(|(_, t)| entry > t) {
            continue;
        }
        let nearest = model
            .world_triangles()
            .filter_map(|tri| ray.hits_triangle(tri))
            .min_by(f32::total_cmp);
        if let Some(t) = nearest {
            if best.map_or(true, |(_, b)| t < b) {
                best = Some((index, t));
            }
        }
    }
    best.map(|(index, _)| index)
}
