//! In-memory fakes for the storage traits and the event sink.
//!
//! The booking fake mirrors the Postgres repository's semantics: every
//! lifecycle transition is conditional on the expected source status and
//! returns `None` when no row matches.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use nusastay_core::events::DomainEvent;
use nusastay_core::traits::EventSink;
use nusastay_core::types::pagination::{PageRequest, PageResponse};
use nusastay_core::types::{Money, StayRange};
use nusastay_core::{AppError, AppResult};
use nusastay_database::repositories::{BookingFilter, BookingStore, PropertyStore};
use nusastay_entity::booking::{
    Booking, BookingStatus, CancellationRecord, GuestBreakdown, GuestContact, PaymentRecord,
    PaymentStatus, PricingExtras, PricingSnapshot,
};
use nusastay_entity::property::{BookingRules, PropertySnapshot};

#[derive(Default)]
pub struct InMemoryBookingStore {
    rows: Mutex<HashMap<Uuid, Booking>>,
}

impl InMemoryBookingStore {
    pub fn insert(&self, booking: Booking) {
        self.rows.lock().unwrap().insert(booking.id, booking);
    }

    fn count_overlaps(
        rows: &HashMap<Uuid, Booking>,
        property_id: Uuid,
        range: &StayRange,
    ) -> u64 {
        rows.values()
            .filter(|b| {
                b.property_id == property_id
                    && b.status.blocks_availability()
                    && b.stay.overlaps(range)
            })
            .count() as u64
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn count_active_overlapping(
        &self,
        property_id: Uuid,
        range: &StayRange,
    ) -> AppResult<u64> {
        Ok(Self::count_overlaps(
            &self.rows.lock().unwrap(),
            property_id,
            range,
        ))
    }

    async fn create_checked(&self, booking: &Booking) -> AppResult<Booking> {
        let mut rows = self.rows.lock().unwrap();
        if Self::count_overlaps(&rows, booking.property_id, &booking.stay) > 0 {
            return Err(AppError::unavailable(
                "Property is already booked for the requested dates",
            ));
        }
        if rows.values().any(|b| b.reference == booking.reference) {
            return Err(AppError::conflict("duplicate booking reference"));
        }
        rows.insert(booking.id, booking.clone());
        Ok(booking.clone())
    }

    async fn list(
        &self,
        filter: &BookingFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Booking>> {
        let rows = self.rows.lock().unwrap();
        let mut items: Vec<Booking> = rows
            .values()
            .filter(|b| {
                filter.user_id.is_none_or(|u| b.user_id == u)
                    && filter.property_id.is_none_or(|p| b.property_id == p)
                    && filter.status.is_none_or(|s| b.status == s)
                    && filter.from.is_none_or(|d| b.stay.check_out > d)
                    && filter.to.is_none_or(|d| b.stay.check_in < d)
            })
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = items.len() as u64;
        let items: Vec<Booking> = items
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }

    async fn confirm(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<Option<Booking>> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&id) {
            Some(b) if b.status == BookingStatus::Pending => {
                b.status = BookingStatus::Confirmed;
                b.payment.status = PaymentStatus::Paid;
                b.payment.paid_at.get_or_insert(now);
                b.confirmation_sent_at = Some(now);
                b.updated_at = now;
                Ok(Some(b.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn check_in(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<Option<Booking>> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&id) {
            Some(b) if b.status == BookingStatus::Confirmed => {
                b.status = BookingStatus::CheckedIn;
                b.updated_at = now;
                Ok(Some(b.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn check_out(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<Option<Booking>> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&id) {
            Some(b) if b.status == BookingStatus::CheckedIn => {
                b.status = BookingStatus::Completed;
                b.updated_at = now;
                Ok(Some(b.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn cancel(
        &self,
        id: Uuid,
        record: &CancellationRecord,
    ) -> AppResult<Option<Booking>> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&id) {
            Some(b)
                if matches!(
                    b.status,
                    BookingStatus::Pending | BookingStatus::Confirmed
                ) =>
            {
                b.status = BookingStatus::Cancelled;
                b.cancellation = Some(record.clone());
                b.updated_at = record.cancelled_at;
                Ok(Some(b.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn update_payment(
        &self,
        id: Uuid,
        expected: PaymentStatus,
        payment: &PaymentRecord,
    ) -> AppResult<Option<Booking>> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&id) {
            Some(b) if b.payment.status == expected => {
                b.payment = payment.clone();
                b.updated_at = Utc::now();
                Ok(Some(b.clone()))
            }
            _ => Ok(None),
        }
    }
}

#[derive(Default)]
pub struct InMemoryPropertyStore {
    rows: Mutex<HashMap<Uuid, PropertySnapshot>>,
}

impl InMemoryPropertyStore {
    pub fn add(&self, snapshot: PropertySnapshot) -> Uuid {
        let id = snapshot.property_id;
        self.rows.lock().unwrap().insert(id, snapshot);
        id
    }

    /// 100 minor units a night, room for 3 capacity-relevant guests.
    pub fn add_default(&self) -> Uuid {
        self.add(default_snapshot())
    }

    pub fn add_unlisted(&self) -> Uuid {
        let mut snapshot = default_snapshot();
        snapshot.is_available = false;
        self.add(snapshot)
    }

    pub fn add_with(&self, adjust: impl FnOnce(&mut PropertySnapshot)) -> Uuid {
        let mut snapshot = default_snapshot();
        adjust(&mut snapshot);
        self.add(snapshot)
    }
}

#[async_trait]
impl PropertyStore for InMemoryPropertyStore {
    async fn pricing_and_rules(&self, property_id: Uuid) -> AppResult<Option<PropertySnapshot>> {
        Ok(self.rows.lock().unwrap().get(&property_id).cloned())
    }
}

fn default_snapshot() -> PropertySnapshot {
    PropertySnapshot {
        property_id: Uuid::new_v4(),
        base_price: Money::from_minor(100),
        currency: "IDR".to_string(),
        max_guests: 3,
        is_available: true,
        rules: BookingRules::default(),
    }
}

/// A confirmed booking occupying `range`, for seeding conflict scenarios.
pub fn confirmed_booking(property_id: Uuid, range: StayRange) -> Booking {
    let pricing = PricingSnapshot::compute(
        "IDR",
        Money::from_minor(100),
        range.nights(),
        &PricingExtras::default(),
    );
    let mut booking = Booking::new_pending(
        format!("NS-SEED-{}", Uuid::new_v4().simple()),
        Uuid::new_v4(),
        property_id,
        range,
        GuestBreakdown {
            adults: 2,
            children: 0,
            infants: 0,
        },
        GuestContact {
            first_name: "Putu".to_string(),
            last_name: "Santoso".to_string(),
            email: "putu@example.com".to_string(),
            phone: "+62 812 7777".to_string(),
            special_requests: None,
        },
        pricing,
        None,
    );
    booking.status = BookingStatus::Confirmed;
    booking
}

/// Seed a pending booking for `user_id` starting on `check_in`.
pub fn pending_booking(user_id: Uuid, property_id: Uuid, check_in: NaiveDate) -> Booking {
    let range = StayRange::new(check_in, check_in + chrono::Days::new(3))
        .expect("seed range is valid");
    let pricing = PricingSnapshot::compute(
        "IDR",
        Money::from_minor(100),
        range.nights(),
        &PricingExtras::default(),
    );
    Booking::new_pending(
        format!("NS-SEED-{}", Uuid::new_v4().simple()),
        user_id,
        property_id,
        range,
        GuestBreakdown {
            adults: 1,
            children: 0,
            infants: 0,
        },
        GuestContact {
            first_name: "Ayu".to_string(),
            last_name: "Lestari".to_string(),
            email: "ayu@example.com".to_string(),
            phone: "+62 812 3456".to_string(),
            special_requests: None,
        },
        pricing,
        None,
    )
}

/// [`EventSink`] that records published events for assertions.
#[derive(Default)]
pub struct CapturingEventSink {
    pub events: Mutex<Vec<DomainEvent>>,
}

#[async_trait]
impl EventSink for CapturingEventSink {
    async fn publish(&self, event: &DomainEvent) -> AppResult<()> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}
