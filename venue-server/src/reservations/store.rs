use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

use crate::availability::{ConflictChecker, ProbeError};
use crate::domain::PlaceId;

use super::ReservationError;

/// Identifier handed out by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(pub u64);

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl ReservationStatus {
    /// Whether a reservation in this state holds its slot.
    pub fn is_active(self) -> bool {
        matches!(self, ReservationStatus::Pending | ReservationStatus::Confirmed)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Details needed to book a slot.
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub place_id: PlaceId,
    pub venue_name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub customer_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    pub id: ReservationId,
    pub place_id: PlaceId,
    pub venue_name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub customer_name: String,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    fn holds(&self, place_id: &PlaceId, date: NaiveDate, time: NaiveTime) -> bool {
        self.status.is_active()
            && &self.place_id == place_id
            && self.date == date
            && self.time == time
    }
}

/// Thread-safe reservation store.
///
/// Cheap to clone; clones share the same reservations.
#[derive(Debug, Clone, Default)]
pub struct ReservationStore {
    inner: Arc<RwLock<HashMap<ReservationId, Reservation>>>,
    next_id: Arc<AtomicU64>,
}

impl ReservationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Book a slot. The reservation starts out pending.
    ///
    /// Fails if an active reservation already holds the same venue, date and
    /// time.
    pub async fn create(&self, request: NewReservation) -> Result<Reservation, ReservationError> {
        if request.customer_name.trim().is_empty() {
            return Err(ReservationError::Invalid("customer name is required".into()));
        }

        let mut reservations = self.inner.write().await;

        if let Some(existing) = reservations
            .values()
            .find(|r| r.holds(&request.place_id, request.date, request.time))
        {
            return Err(ReservationError::SlotTaken(existing.id));
        }

        let id = ReservationId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let now = Utc::now();
        let reservation = Reservation {
            id,
            place_id: request.place_id,
            venue_name: request.venue_name,
            date: request.date,
            time: request.time,
            customer_name: request.customer_name.trim().to_string(),
            status: ReservationStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        info!(
            reservation = %id,
            place_id = %reservation.place_id,
            date = %reservation.date,
            time = %reservation.time,
            "reservation created"
        );
        reservations.insert(id, reservation.clone());
        Ok(reservation)
    }

    /// Confirm a pending reservation. Confirming twice is a no-op.
    pub async fn confirm(&self, id: ReservationId) -> Result<Reservation, ReservationError> {
        self.transition(id, "confirm", |status| match status {
            ReservationStatus::Pending | ReservationStatus::Confirmed => {
                Some(ReservationStatus::Confirmed)
            }
            ReservationStatus::Cancelled => None,
        })
        .await
    }

    /// Cancel a reservation, releasing its slot. Cancelling twice is a no-op.
    pub async fn cancel(&self, id: ReservationId) -> Result<Reservation, ReservationError> {
        self.transition(id, "cancel", |_| Some(ReservationStatus::Cancelled))
            .await
    }

    pub async fn get(&self, id: ReservationId) -> Option<Reservation> {
        self.inner.read().await.get(&id).cloned()
    }

    /// Number of reservations in any state.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    async fn transition(
        &self,
        id: ReservationId,
        action: &'static str,
        next: impl FnOnce(ReservationStatus) -> Option<ReservationStatus>,
    ) -> Result<Reservation, ReservationError> {
        let mut reservations = self.inner.write().await;
        let reservation = reservations
            .get_mut(&id)
            .ok_or(ReservationError::NotFound(id))?;

        let from = reservation.status;
        let to = next(from).ok_or(ReservationError::InvalidTransition { from, action })?;

        if to != from {
            reservation.status = to;
            reservation.updated_at = Utc::now();
            info!(reservation = %id, %from, %to, "reservation updated");
        }
        Ok(reservation.clone())
    }
}

impl ConflictChecker for ReservationStore {
    async fn has_active_conflict(
        &self,
        place_id: &PlaceId,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<bool, ProbeError> {
        let reservations = self.inner.read().await;
        Ok(reservations.values().any(|r| r.holds(place_id, date, time)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    fn time(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    fn booking(place: &str, h: u32) -> NewReservation {
        NewReservation {
            place_id: PlaceId::parse(place).unwrap(),
            venue_name: format!("Venue {place}"),
            date: date(),
            time: time(h),
            customer_name: "Budi".to_string(),
        }
    }

    #[tokio::test]
    async fn create_starts_pending() {
        let store = ReservationStore::new();
        let r = store.create(booking("p1", 19)).await.unwrap();

        assert_eq!(r.id, ReservationId(1));
        assert_eq!(r.status, ReservationStatus::Pending);
        assert_eq!(store.get(r.id).await, Some(r));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn ids_are_unique() {
        let store = ReservationStore::new();
        let a = store.create(booking("p1", 19)).await.unwrap();
        let b = store.create(booking("p2", 19)).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn blank_customer_rejected() {
        let store = ReservationStore::new();
        let mut request = booking("p1", 19);
        request.customer_name = "  ".into();
        assert!(matches!(
            store.create(request).await,
            Err(ReservationError::Invalid(_))
        ));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn double_booking_rejected_until_cancelled() {
        let store = ReservationStore::new();
        let first = store.create(booking("p1", 19)).await.unwrap();

        assert_eq!(
            store.create(booking("p1", 19)).await,
            Err(ReservationError::SlotTaken(first.id))
        );

        // Different hour is a different slot.
        assert!(store.create(booking("p1", 20)).await.is_ok());

        store.cancel(first.id).await.unwrap();
        assert!(store.create(booking("p1", 19)).await.is_ok());
    }

    #[tokio::test]
    async fn confirm_and_cancel_transitions() {
        let store = ReservationStore::new();
        let r = store.create(booking("p1", 19)).await.unwrap();

        let confirmed = store.confirm(r.id).await.unwrap();
        assert_eq!(confirmed.status, ReservationStatus::Confirmed);
        assert_eq!(store.confirm(r.id).await.unwrap().status, ReservationStatus::Confirmed);

        let cancelled = store.cancel(r.id).await.unwrap();
        assert_eq!(cancelled.status, ReservationStatus::Cancelled);
        assert_eq!(store.cancel(r.id).await.unwrap().status, ReservationStatus::Cancelled);

        assert_eq!(
            store.confirm(r.id).await,
            Err(ReservationError::InvalidTransition {
                from: ReservationStatus::Cancelled,
                action: "confirm",
            })
        );
    }

    #[tokio::test]
    async fn unknown_id_not_found() {
        let store = ReservationStore::new();
        assert_eq!(
            store.confirm(ReservationId(42)).await,
            Err(ReservationError::NotFound(ReservationId(42)))
        );
        assert!(store.get(ReservationId(42)).await.is_none());
    }

    #[tokio::test]
    async fn only_active_reservations_conflict() {
        let store = ReservationStore::new();
        let place = PlaceId::parse("p1").unwrap();

        assert!(!store.has_active_conflict(&place, date(), time(19)).await.unwrap());

        let r = store.create(booking("p1", 19)).await.unwrap();
        assert!(store.has_active_conflict(&place, date(), time(19)).await.unwrap());
        assert!(!store.has_active_conflict(&place, date(), time(20)).await.unwrap());

        store.confirm(r.id).await.unwrap();
        assert!(store.has_active_conflict(&place, date(), time(19)).await.unwrap());

        store.cancel(r.id).await.unwrap();
        assert!(!store.has_active_conflict(&place, date(), time(19)).await.unwrap());
    }

    #[test]
    fn status_serialises_lowercase() {
        assert_eq!(
            serde_json::to_string(&ReservationStatus::Confirmed).unwrap(),
            "\"confirmed\""
        );
        assert!(ReservationStatus::Pending.is_active());
        assert!(!ReservationStatus::Cancelled.is_active());
    }
}
