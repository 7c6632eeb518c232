use geo::{BooleanOps, MultiPolygon};

/// computes the reachability ring between an outer and inner isochrone.
///
/// with no inner isochrone the outer area is returned unchanged. otherwise the
/// result is the plain set difference `outer - inner`: the inner area does not
/// need to lie within the outer one, only the overlapping portion is removed.
/// identical inputs produce an empty ring.
///
/// # Arguments
///
/// * `outer` - isochrone at `time + uncertainty`
/// * `inner` - isochrone at `max(0, time - uncertainty)`, if one was retrieved
///
/// # Returns
///
/// * the annulus-shaped area reachable within the outer but not the inner budget
pub fn ring(outer: &MultiPolygon<f64>, inner: Option<&MultiPolygon<f64>>) -> MultiPolygon<f64> {
    match inner {
        None => outer.clone(),
        Some(inner) => outer.difference(inner),
    }
}
