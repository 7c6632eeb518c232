use locus_core::model::Coordinate;

/// identity of a cached isochrone: the rounded origin, the travel mode and the
/// whole-minute time budget. uncertainty is not part of the key, so two
/// constraints whose derived budgets coincide share one entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ReachabilityCacheKey {
    pub lon: i64,
    pub lat: i64,
    pub mode: String,
    pub minutes: u32,
}

impl ReachabilityCacheKey {
    pub fn new(
        coordinate: &Coordinate,
        mode: &str,
        minutes: u32,
        decimal_places: u32,
    ) -> ReachabilityCacheKey {
        let (lon, lat) = coordinate.rounded_key(decimal_places);
        ReachabilityCacheKey {
            lon,
            lat,
            mode: mode.to_string(),
            minutes,
        }
    }
}

impl std::fmt::Display for ReachabilityCacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}) {} {}min", self.lon, self.lat, self.mode, self.minutes)
    }
}
