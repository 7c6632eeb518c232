mod isochrone_source;
mod openrouteservice_source;
mod reachability_cache;
mod reachability_cache_key;
mod reachability_client;
mod reachability_config;
mod reachability_error;

pub use isochrone_source::IsochroneSource;
pub use openrouteservice_source::OpenRouteServiceSource;
pub use reachability_cache::{CacheEntry, ReachabilityCache};
pub use reachability_cache_key::ReachabilityCacheKey;
pub use reachability_client::{whole_minutes, ReachabilityClient};
pub use reachability_config::ReachabilityConfig;
pub use reachability_error::ReachabilityError;
