pub mod aggregator;
pub mod clock;
pub mod geocoder;
pub mod reachability;
pub mod throttle;
