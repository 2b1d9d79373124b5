use crate::error::ErrorKind;
use crate::models::place::Coordinates;
use async_trait::async_trait;
use log::{ debug, info };
use std::sync::atomic::{ AtomicUsize, Ordering };
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("position unavailable")]
    Unavailable,
    #[error("location lookup timed out")]
    Timeout,
}

impl LocationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LocationError::PermissionDenied => ErrorKind::LocationDenied,
            LocationError::Unavailable | LocationError::Timeout => ErrorKind::LocationUnavailable,
        }
    }
}

/// One-shot position lookup. Callers decide whether to bound it in time.
#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates, LocationError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum LocationSource {
    Fixed(Coordinates),
    Denied,
    Unavailable,
}

/// Answers every lookup from a configured source, optionally after a delay.
pub struct FixedGeolocator {
    source: LocationSource,
    delay: Duration,
    lookups: AtomicUsize,
}

impl FixedGeolocator {
    pub fn new(source: LocationSource) -> Self {
        Self {
            source,
            delay: Duration::ZERO,
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self::new(LocationSource::Fixed(Coordinates::new(latitude, longitude)))
    }

    pub fn denied() -> Self {
        Self::new(LocationSource::Denied)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.source {
            LocationSource::Fixed(coords) => {
                debug!("Location lookup answered: {}", coords);
                Ok(*coords)
            }
            LocationSource::Denied => Err(LocationError::PermissionDenied),
            LocationSource::Unavailable => Err(LocationError::Unavailable),
        }
    }
}

/// Lookup bounded by `limit`; expiry is reported as `LocationError::Timeout`.
pub async fn locate_within(
    geolocator: &dyn Geolocator,
    limit: Duration
) -> Result<Coordinates, LocationError> {
    match tokio::time::timeout(limit, geolocator.current_position()).await {
        Ok(result) => result,
        Err(_) => {
            info!("Location lookup gave up after {:?}", limit);
            Err(LocationError::Timeout)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_source_answers_and_counts_lookups() {
        let geo = FixedGeolocator::at(12.34, 56.78);
        assert_eq!(geo.current_position().await, Ok(Coordinates::new(12.34, 56.78)));
        assert_eq!(geo.lookup_count(), 1);
        assert_eq!(
            FixedGeolocator::denied().current_position().await,
            Err(LocationError::PermissionDenied)
        );
    }

    #[tokio::test]
    async fn slow_lookup_times_out() {
        let geo = FixedGeolocator::at(1.0, 2.0).with_delay(Duration::from_millis(300));
        let result = locate_within(&geo, Duration::from_millis(20)).await;
        assert_eq!(result, Err(LocationError::Timeout));
        assert_eq!(result.unwrap_err().kind(), ErrorKind::LocationUnavailable);
    }

    #[tokio::test]
    async fn fast_lookup_beats_the_timeout() {
        let geo = FixedGeolocator::at(1.0, 2.0);
        let result = locate_within(&geo, Duration::from_secs(3)).await;
        assert_eq!(result, Ok(Coordinates::new(1.0, 2.0)));
    }
}
