//! Booking lifecycle manager.
//!
//! Owns creation and every status transition. Transitions are raced
//! safely: the storage layer applies each one as a single conditional
//! update, and a miss is re-read here to tell "gone" apart from "moved
//! on". Domain events are published fire-and-forget after each mutation.

use std::sync::Arc;

use chrono::{Duration, NaiveTime};
use uuid::Uuid;

use nusastay_core::config::BookingConfig;
use nusastay_core::events::{BookingEvent, DomainEvent, EventPayload};
use nusastay_core::traits::EventSink;
use nusastay_core::types::pagination::{PageRequest, PageResponse};
use nusastay_core::types::{Money, StayRange};
use nusastay_core::{AppError, AppResult};
use nusastay_database::repositories::{BookingFilter, BookingStore, PropertyStore};
use nusastay_entity::booking::{
    Booking, CancellationRecord, GuestBreakdown, GuestContact, PaymentStatus, PricingExtras,
    PricingSnapshot,
};

use crate::context::RequestContext;

use super::reference::ReferenceGenerator;

/// Input for creating a booking, already shape-validated by the HTTP
/// layer; domain validation happens here.
#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub property_id: Uuid,
    pub check_in: chrono::NaiveDate,
    pub check_out: chrono::NaiveDate,
    pub guests: GuestBreakdown,
    pub contact: GuestContact,
    pub payment_method: Option<String>,
    pub extras: PricingExtras,
}

/// Input for updating a booking's payment sub-record.
#[derive(Debug, Clone)]
pub struct PaymentUpdate {
    pub method: Option<String>,
    pub status: PaymentStatus,
    pub transaction_ref: Option<String>,
    pub refund_amount: Option<Money>,
}

/// The booking lifecycle manager.
pub struct BookingService {
    bookings: Arc<dyn BookingStore>,
    properties: Arc<dyn PropertyStore>,
    events: Arc<dyn EventSink>,
    config: BookingConfig,
    references: ReferenceGenerator,
}

impl BookingService {
    /// Create a new booking service.
    pub fn new(
        bookings: Arc<dyn BookingStore>,
        properties: Arc<dyn PropertyStore>,
        events: Arc<dyn EventSink>,
        config: BookingConfig,
    ) -> Self {
        let references = ReferenceGenerator::new(config.reference_prefix.clone());
        Self {
            bookings,
            properties,
            events,
            config,
            references,
        }
    }

    /// Create a new pending booking for the acting user.
    ///
    /// Validates dates, guest composition, contact details, the
    /// property's capacity and stay rules, and availability, then
    /// freezes the pricing snapshot and inserts. The final availability
    /// word belongs to the storage layer, which re-checks inside the
    /// insert transaction.
    pub async fn create(&self, ctx: &RequestContext, input: CreateBooking) -> AppResult<Booking> {
        let stay = StayRange::new(input.check_in, input.check_out)?;
        if stay.check_in < ctx.request_time.date_naive() {
            return Err(AppError::invalid_date_range(
                "Check-in date cannot be in the past",
            ));
        }
        input.guests.validate()?;
        input.contact.validate()?;
        input.extras.validate()?;

        let snapshot = self
            .properties
            .pricing_and_rules(input.property_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Property {} not found", input.property_id))
            })?;

        if !snapshot.is_available {
            return Err(AppError::unavailable("Property is not accepting bookings"));
        }
        if input.guests.total_guests() > snapshot.max_guests {
            return Err(AppError::validation(format!(
                "Property accommodates at most {} guests",
                snapshot.max_guests
            )));
        }
        let nights = stay.nights();
        if nights < snapshot.rules.min_stay_nights as i64 {
            return Err(AppError::validation(format!(
                "Minimum stay is {} nights",
                snapshot.rules.min_stay_nights
            )));
        }
        if let Some(max) = snapshot.rules.max_stay_nights {
            if nights > max as i64 {
                return Err(AppError::validation(format!(
                    "Maximum stay is {max} nights"
                )));
            }
        }

        if self
            .bookings
            .count_active_overlapping(input.property_id, &stay)
            .await?
            > 0
        {
            return Err(AppError::unavailable(
                "Property is already booked for the requested dates",
            ));
        }

        let currency = if snapshot.currency.is_empty() {
            self.config.currency.clone()
        } else {
            snapshot.currency.clone()
        };
        let pricing = PricingSnapshot::compute(currency, snapshot.base_price, nights, &input.extras);
        let booking = Booking::new_pending(
            self.references.generate(),
            ctx.user_id,
            input.property_id,
            stay,
            input.guests,
            input.contact,
            pricing,
            input.payment_method,
        );

        let created = self.bookings.create_checked(&booking).await?;
        tracing::info!(
            booking_id = %created.id,
            reference = %created.reference,
            property_id = %created.property_id,
            "booking created"
        );
        self.emit(
            ctx,
            BookingEvent::Created {
                booking_id: created.id,
                reference: created.reference.clone(),
                property_id: created.property_id,
            },
        );
        Ok(created)
    }

    /// Fetch a booking; guests may only see their own.
    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Booking> {
        let booking = self.require(id).await?;
        authorize_view(ctx, &booking)?;
        Ok(booking)
    }

    /// List bookings. Guests are always scoped to their own bookings,
    /// whatever the filter says; operators may filter freely.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        mut filter: BookingFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Booking>> {
        if !ctx.is_admin() {
            filter.user_id = Some(ctx.user_id);
        }
        self.bookings.list(&filter, page).await
    }

    /// pending → confirmed. Operator-only.
    ///
    /// Confirmation is the single payment coupling: the payment is forced
    /// to `paid`, and the confirmation event carries everything the email
    /// collaborator needs.
    pub async fn confirm(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Booking> {
        require_admin(ctx)?;
        match self.bookings.confirm(id, ctx.request_time).await? {
            Some(booking) => {
                tracing::info!(booking_id = %booking.id, "booking confirmed");
                self.emit(
                    ctx,
                    BookingEvent::Confirmed {
                        booking_id: booking.id,
                        reference: booking.reference.clone(),
                        guest_email: booking.contact.email.clone(),
                        check_in: booking.stay.check_in,
                        check_out: booking.stay.check_out,
                    },
                );
                Ok(booking)
            }
            None => Err(self.explain_failed_transition(id, "confirm").await),
        }
    }

    /// confirmed → checked_in. Operator-only.
    pub async fn check_in(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Booking> {
        require_admin(ctx)?;
        match self.bookings.check_in(id, ctx.request_time).await? {
            Some(booking) => {
                tracing::info!(booking_id = %booking.id, "guest checked in");
                self.emit(ctx, BookingEvent::CheckedIn { booking_id: booking.id });
                Ok(booking)
            }
            None => Err(self.explain_failed_transition(id, "check in").await),
        }
    }

    /// checked_in → completed. Operator-only.
    pub async fn check_out(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Booking> {
        require_admin(ctx)?;
        match self.bookings.check_out(id, ctx.request_time).await? {
            Some(booking) => {
                tracing::info!(booking_id = %booking.id, "guest checked out");
                self.emit(ctx, BookingEvent::Completed { booking_id: booking.id });
                Ok(booking)
            }
            None => Err(self.explain_failed_transition(id, "check out").await),
        }
    }

    /// pending|confirmed → cancelled.
    ///
    /// Guests may cancel their own bookings while strictly more than the
    /// configured lead time remains before check-in midnight (UTC);
    /// exactly at the boundary the cancellation is rejected. Operators
    /// may cancel at any time. A paid booking records the paid total as
    /// the refund amount.
    pub async fn cancel(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        reason: Option<String>,
    ) -> AppResult<Booking> {
        let booking = self.require(id).await?;
        authorize_view(ctx, &booking)?;

        if !ctx.is_admin() {
            let checkin_midnight = booking.stay.check_in.and_time(NaiveTime::MIN).and_utc();
            let lead = Duration::hours(self.config.cancellation_lead_time_hours);
            if checkin_midnight - ctx.request_time <= lead {
                return Err(AppError::forbidden(format!(
                    "Bookings can only be cancelled more than {} hours before check-in",
                    self.config.cancellation_lead_time_hours
                )));
            }
        }

        let refund_amount = (booking.payment.status == PaymentStatus::Paid)
            .then_some(booking.pricing.total);
        let record = CancellationRecord {
            cancelled_at: ctx.request_time,
            cancelled_by: ctx.user_id,
            reason: reason.clone(),
            refund_amount,
        };

        match self.bookings.cancel(id, &record).await? {
            Some(booking) => {
                tracing::info!(booking_id = %booking.id, "booking cancelled");
                self.emit(
                    ctx,
                    BookingEvent::Cancelled {
                        booking_id: booking.id,
                        reason,
                    },
                );
                Ok(booking)
            }
            None => Err(self.explain_failed_transition(id, "cancel").await),
        }
    }

    /// Replace the payment sub-record without touching the lifecycle
    /// status. Timestamps are stamped from the new status: a first
    /// `paid` sets `paid_at`, a refund sets `refunded_at` and defaults a
    /// full refund to the booking total.
    pub async fn update_payment(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        update: PaymentUpdate,
    ) -> AppResult<Booking> {
        let booking = self.require(id).await?;
        authorize_view(ctx, &booking)?;

        let mut payment = booking.payment.clone();
        if update.method.is_some() {
            payment.method = update.method;
        }
        if update.transaction_ref.is_some() {
            payment.transaction_ref = update.transaction_ref;
        }
        payment.status = update.status;
        match update.status {
            PaymentStatus::Paid => {
                payment.paid_at.get_or_insert(ctx.request_time);
            }
            PaymentStatus::Refunded => {
                payment.refunded_at = Some(ctx.request_time);
                payment.refund_amount = update.refund_amount.or(Some(booking.pricing.total));
            }
            PaymentStatus::PartiallyRefunded => {
                payment.refunded_at = Some(ctx.request_time);
                payment.refund_amount = update.refund_amount.or(payment.refund_amount);
            }
            PaymentStatus::Pending | PaymentStatus::Failed => {}
        }

        let updated = match self
            .bookings
            .update_payment(id, booking.payment.status, &payment)
            .await?
        {
            Some(updated) => updated,
            // The write is guarded on the payment status read above; a
            // miss means the booking vanished or a concurrent update won.
            None => {
                return Err(match self.bookings.find_by_id(id).await? {
                    Some(_) => AppError::conflict("Payment was modified concurrently"),
                    None => AppError::not_found(format!("Booking {id} not found")),
                });
            }
        };
        self.emit(
            ctx,
            BookingEvent::PaymentUpdated {
                booking_id: updated.id,
                payment_status: updated.payment.status.to_string(),
            },
        );
        Ok(updated)
    }

    async fn require(&self, id: Uuid) -> AppResult<Booking> {
        self.bookings
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Booking {id} not found")))
    }

    /// A conditional transition matched no row. Re-read to report the
    /// right failure: the booking is either gone or in the wrong status.
    async fn explain_failed_transition(&self, id: Uuid, verb: &str) -> AppError {
        match self.bookings.find_by_id(id).await {
            Ok(Some(booking)) => AppError::invalid_transition(format!(
                "Cannot {verb} a booking in status '{}'",
                booking.status
            )),
            Ok(None) => AppError::not_found(format!("Booking {id} not found")),
            Err(e) => e,
        }
    }

    /// Publish fire-and-forget: the operation already succeeded, a
    /// failed publish is logged and never surfaced to the caller.
    fn emit(&self, ctx: &RequestContext, payload: BookingEvent) {
        let sink = Arc::clone(&self.events);
        let event = DomainEvent::new(Some(ctx.user_id), EventPayload::Booking(payload));
        tokio::spawn(async move {
            if let Err(e) = sink.publish(&event).await {
                tracing::warn!(event_id = %event.id, error = %e, "event publish failed");
            }
        });
    }
}

fn authorize_view(ctx: &RequestContext, booking: &Booking) -> AppResult<()> {
    if ctx.is_admin() || booking.is_owned_by(ctx.user_id) {
        Ok(())
    } else {
        Err(AppError::forbidden("You do not have access to this booking"))
    }
}

fn require_admin(ctx: &RequestContext) -> AppResult<()> {
    if ctx.is_admin() {
        Ok(())
    } else {
        Err(AppError::forbidden(
            "Operator privileges are required for this operation",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate, Utc};
    use nusastay_core::error::ErrorKind;
    use nusastay_entity::booking::BookingStatus;
    use nusastay_entity::user::ActorRole;

    use crate::testing::{
        confirmed_booking, pending_booking, CapturingEventSink, InMemoryBookingStore,
        InMemoryPropertyStore,
    };

    struct Harness {
        bookings: Arc<InMemoryBookingStore>,
        properties: Arc<InMemoryPropertyStore>,
        events: Arc<CapturingEventSink>,
        service: BookingService,
    }

    fn harness() -> Harness {
        let bookings = Arc::new(InMemoryBookingStore::default());
        let properties = Arc::new(InMemoryPropertyStore::default());
        let events = Arc::new(CapturingEventSink::default());
        let service = BookingService::new(
            Arc::clone(&bookings) as Arc<dyn BookingStore>,
            Arc::clone(&properties) as Arc<dyn PropertyStore>,
            Arc::clone(&events) as Arc<dyn EventSink>,
            BookingConfig::default(),
        );
        Harness {
            bookings,
            properties,
            events,
            service,
        }
    }

    fn guest_ctx() -> RequestContext {
        RequestContext::new(Uuid::new_v4(), ActorRole::Guest, None)
    }

    fn admin_ctx() -> RequestContext {
        RequestContext::new(Uuid::new_v4(), ActorRole::Admin, None)
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 9, d).unwrap()
    }

    fn stay(a: u32, b: u32) -> StayRange {
        StayRange::new(day(a), day(b)).unwrap()
    }

    fn input(property_id: Uuid, a: u32, b: u32) -> CreateBooking {
        CreateBooking {
            property_id,
            check_in: day(a),
            check_out: day(b),
            guests: GuestBreakdown {
                adults: 2,
                children: 0,
                infants: 0,
            },
            contact: GuestContact {
                first_name: "Ayu".to_string(),
                last_name: "Lestari".to_string(),
                email: "ayu@example.com".to_string(),
                phone: "+62 812 3456".to_string(),
                special_requests: None,
            },
            payment_method: None,
            extras: PricingExtras::default(),
        }
    }

    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_create_computes_derived_fields() {
        let h = harness();
        let property_id = h.properties.add_default();
        let ctx = guest_ctx();

        let booking = h.service.create(&ctx, input(property_id, 10, 13)).await.unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.payment.status, PaymentStatus::Pending);
        assert_eq!(booking.nights, 3);
        assert_eq!(booking.total_guests, 2);
        assert_eq!(booking.pricing.subtotal, Money::from_minor(300));
        assert_eq!(booking.pricing.total, Money::from_minor(300));
        assert_eq!(booking.user_id, ctx.user_id);
        assert!(booking.reference.starts_with("NS-"));
    }

    #[tokio::test]
    async fn test_create_rejects_past_check_in() {
        let h = harness();
        let property_id = h.properties.add_default();
        let yesterday = Utc::now().date_naive() - Days::new(1);

        let mut req = input(property_id, 10, 13);
        req.check_in = yesterday;
        req.check_out = yesterday + Days::new(3);
        let err = h.service.create(&guest_ctx(), req).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidDateRange);
    }

    #[tokio::test]
    async fn test_create_rejects_inverted_range() {
        let h = harness();
        let property_id = h.properties.add_default();
        let err = h
            .service
            .create(&guest_ctx(), input(property_id, 13, 13))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidDateRange);
    }

    #[tokio::test]
    async fn test_create_enforces_capacity_without_counting_infants() {
        let h = harness();
        // Default property sleeps 3.
        let property_id = h.properties.add_default();

        let mut too_many = input(property_id, 10, 13);
        too_many.guests = GuestBreakdown {
            adults: 3,
            children: 1,
            infants: 0,
        };
        let err = h.service.create(&guest_ctx(), too_many).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let mut with_infants = input(property_id, 10, 13);
        with_infants.guests = GuestBreakdown {
            adults: 2,
            children: 1,
            infants: 5,
        };
        let booking = h.service.create(&guest_ctx(), with_infants).await.unwrap();
        assert_eq!(booking.total_guests, 3);
    }

    #[tokio::test]
    async fn test_create_enforces_stay_rules() {
        let h = harness();
        let property_id = h.properties.add_with(|p| {
            p.rules.min_stay_nights = 3;
            p.rules.max_stay_nights = Some(7);
        });

        let err = h
            .service
            .create(&guest_ctx(), input(property_id, 10, 12))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let err = h
            .service
            .create(&guest_ctx(), input(property_id, 10, 20))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        assert!(h.service.create(&guest_ctx(), input(property_id, 10, 15)).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_rejects_negative_pricing_amounts() {
        let h = harness();
        let property_id = h.properties.add_default();

        let mut negative_fee = input(property_id, 10, 13);
        negative_fee.extras.service_fee = Some(Money::from_minor(-1000));
        let err = h.service.create(&guest_ctx(), negative_fee).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let mut negative_taxes = input(property_id, 10, 13);
        negative_taxes.extras.taxes = Some(Money::from_minor(-1));
        let err = h.service.create(&guest_ctx(), negative_taxes).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_create_rejects_overlap_but_allows_turnover_day() {
        let h = harness();
        let property_id = h.properties.add_default();
        h.bookings.insert(confirmed_booking(property_id, stay(10, 13)));

        let err = h
            .service
            .create(&guest_ctx(), input(property_id, 12, 15))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unavailable);

        // Check-in on the previous guest's check-out day is fine.
        assert!(h.service.create(&guest_ctx(), input(property_id, 13, 16)).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_unknown_property_is_not_found() {
        let h = harness();
        let err = h
            .service
            .create(&guest_ctx(), input(Uuid::new_v4(), 10, 13))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_create_unlisted_property_is_unavailable() {
        let h = harness();
        let property_id = h.properties.add_unlisted();
        let err = h
            .service
            .create(&guest_ctx(), input(property_id, 10, 13))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unavailable);
    }

    #[tokio::test]
    async fn test_full_lifecycle() {
        let h = harness();
        let property_id = h.properties.add_default();
        let admin = admin_ctx();

        let booking = h
            .service
            .create(&guest_ctx(), input(property_id, 10, 13))
            .await
            .unwrap();

        let confirmed = h.service.confirm(&admin, booking.id).await.unwrap();
        assert_eq!(confirmed.status, BookingStatus::Confirmed);
        assert_eq!(confirmed.payment.status, PaymentStatus::Paid);
        assert!(confirmed.payment.paid_at.is_some());
        assert!(confirmed.confirmation_sent_at.is_some());

        let checked_in = h.service.check_in(&admin, booking.id).await.unwrap();
        assert_eq!(checked_in.status, BookingStatus::CheckedIn);

        let completed = h.service.check_out(&admin, booking.id).await.unwrap();
        assert_eq!(completed.status, BookingStatus::Completed);
    }

    #[tokio::test]
    async fn test_privileged_transitions_require_admin() {
        let h = harness();
        let property_id = h.properties.add_default();
        let ctx = guest_ctx();
        let booking = h.service.create(&ctx, input(property_id, 10, 13)).await.unwrap();

        for result in [
            h.service.confirm(&ctx, booking.id).await,
            h.service.check_in(&ctx, booking.id).await,
            h.service.check_out(&ctx, booking.id).await,
        ] {
            assert_eq!(result.unwrap_err().kind, ErrorKind::Forbidden);
        }
    }

    #[tokio::test]
    async fn test_confirm_missing_booking_is_not_found() {
        let h = harness();
        let err = h.service.confirm(&admin_ctx(), Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_confirm_cancelled_booking_is_invalid_transition() {
        let h = harness();
        let property_id = h.properties.add_default();
        let admin = admin_ctx();
        let booking = h
            .service
            .create(&guest_ctx(), input(property_id, 10, 13))
            .await
            .unwrap();
        h.service.cancel(&admin, booking.id, None).await.unwrap();

        let err = h.service.confirm(&admin, booking.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidTransition);
    }

    #[tokio::test]
    async fn test_check_in_requires_confirmed() {
        let h = harness();
        let property_id = h.properties.add_default();
        let booking = h
            .service
            .create(&guest_ctx(), input(property_id, 10, 13))
            .await
            .unwrap();

        let err = h.service.check_in(&admin_ctx(), booking.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidTransition);
    }

    #[tokio::test]
    async fn test_double_cancel_is_invalid_transition() {
        let h = harness();
        let property_id = h.properties.add_default();
        let admin = admin_ctx();
        let booking = h
            .service
            .create(&guest_ctx(), input(property_id, 10, 13))
            .await
            .unwrap();

        h.service.cancel(&admin, booking.id, None).await.unwrap();
        let err = h.service.cancel(&admin, booking.id, None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidTransition);
    }

    #[tokio::test]
    async fn test_owner_cancel_respects_lead_time_boundary() {
        let h = harness();
        let property_id = h.properties.add_default();
        let owner = Uuid::new_v4();
        let booking = pending_booking(owner, property_id, day(10));
        h.bookings.insert(booking.clone());

        let checkin_midnight = day(10).and_time(NaiveTime::MIN).and_utc();

        // Exactly 24 hours before check-in: rejected.
        let mut ctx = RequestContext::new(owner, ActorRole::Guest, None);
        ctx.request_time = checkin_midnight - Duration::hours(24);
        let err = h.service.cancel(&ctx, booking.id, None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);

        // One second earlier: allowed.
        ctx.request_time = checkin_midnight - Duration::hours(24) - Duration::seconds(1);
        let cancelled = h.service.cancel(&ctx, booking.id, None).await.unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
        assert_eq!(
            cancelled.cancellation.as_ref().map(|c| c.cancelled_by),
            Some(owner)
        );
    }

    #[tokio::test]
    async fn test_admin_cancel_ignores_lead_time() {
        let h = harness();
        let property_id = h.properties.add_default();
        let booking = pending_booking(Uuid::new_v4(), property_id, day(10));
        h.bookings.insert(booking.clone());

        let mut ctx = admin_ctx();
        ctx.request_time = day(10).and_time(NaiveTime::MIN).and_utc() - Duration::hours(1);
        assert!(h.service.cancel(&ctx, booking.id, None).await.is_ok());
    }

    #[tokio::test]
    async fn test_cancel_records_refund_of_paid_total() {
        let h = harness();
        let property_id = h.properties.add_default();
        let admin = admin_ctx();
        let booking = h
            .service
            .create(&guest_ctx(), input(property_id, 10, 13))
            .await
            .unwrap();
        h.service.confirm(&admin, booking.id).await.unwrap();

        let cancelled = h
            .service
            .cancel(&admin, booking.id, Some("change of plans".to_string()))
            .await
            .unwrap();
        let record = cancelled.cancellation.unwrap();
        assert_eq!(record.refund_amount, Some(Money::from_minor(300)));
        assert_eq!(record.reason.as_deref(), Some("change of plans"));
    }

    #[tokio::test]
    async fn test_cancel_without_payment_records_no_refund() {
        let h = harness();
        let property_id = h.properties.add_default();
        let ctx = guest_ctx();
        let booking = h.service.create(&ctx, input(property_id, 10, 13)).await.unwrap();

        let cancelled = h.service.cancel(&ctx, booking.id, None).await.unwrap();
        assert_eq!(cancelled.cancellation.unwrap().refund_amount, None);
    }

    #[tokio::test]
    async fn test_get_enforces_ownership() {
        let h = harness();
        let property_id = h.properties.add_default();
        let owner = guest_ctx();
        let booking = h.service.create(&owner, input(property_id, 10, 13)).await.unwrap();

        assert!(h.service.get(&owner, booking.id).await.is_ok());
        assert!(h.service.get(&admin_ctx(), booking.id).await.is_ok());
        let err = h.service.get(&guest_ctx(), booking.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn test_list_scopes_guests_to_own_bookings() {
        let h = harness();
        let property_id = h.properties.add_default();
        let alice = guest_ctx();
        let bob = guest_ctx();
        h.service.create(&alice, input(property_id, 10, 13)).await.unwrap();
        h.service.create(&bob, input(property_id, 13, 16)).await.unwrap();

        let page = PageRequest::default();
        let mine = h
            .service
            .list(&alice, BookingFilter::default(), &page)
            .await
            .unwrap();
        assert_eq!(mine.total_items, 1);
        assert_eq!(mine.items[0].user_id, alice.user_id);

        // A guest asking for someone else's bookings still gets their own.
        let filter = BookingFilter {
            user_id: Some(bob.user_id),
            ..Default::default()
        };
        let still_mine = h.service.list(&alice, filter, &page).await.unwrap();
        assert_eq!(still_mine.total_items, 1);
        assert_eq!(still_mine.items[0].user_id, alice.user_id);

        let all = h
            .service
            .list(&admin_ctx(), BookingFilter::default(), &page)
            .await
            .unwrap();
        assert_eq!(all.total_items, 2);
    }

    #[tokio::test]
    async fn test_update_payment_stamps_paid_at() {
        let h = harness();
        let property_id = h.properties.add_default();
        let ctx = guest_ctx();
        let booking = h.service.create(&ctx, input(property_id, 10, 13)).await.unwrap();

        let updated = h
            .service
            .update_payment(
                &ctx,
                booking.id,
                PaymentUpdate {
                    method: Some("credit_card".to_string()),
                    status: PaymentStatus::Paid,
                    transaction_ref: Some("tx-123".to_string()),
                    refund_amount: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.payment.status, PaymentStatus::Paid);
        assert_eq!(updated.payment.paid_at, Some(ctx.request_time));
        assert_eq!(updated.payment.method.as_deref(), Some("credit_card"));
        assert_eq!(updated.payment.transaction_ref.as_deref(), Some("tx-123"));
        // Payment state never drives the booking lifecycle.
        assert_eq!(updated.status, BookingStatus::Pending);
    }

    #[tokio::test]
    async fn test_update_payment_full_refund_defaults_to_total() {
        let h = harness();
        let property_id = h.properties.add_default();
        let admin = admin_ctx();
        let booking = h
            .service
            .create(&guest_ctx(), input(property_id, 10, 13))
            .await
            .unwrap();
        h.service.confirm(&admin, booking.id).await.unwrap();

        let updated = h
            .service
            .update_payment(
                &admin,
                booking.id,
                PaymentUpdate {
                    method: None,
                    status: PaymentStatus::Refunded,
                    transaction_ref: None,
                    refund_amount: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.payment.refund_amount, Some(Money::from_minor(300)));
        assert!(updated.payment.refunded_at.is_some());
    }

    #[tokio::test]
    async fn test_stale_payment_update_matches_no_row() {
        let h = harness();
        let property_id = h.properties.add_default();
        let ctx = guest_ctx();
        let booking = h.service.create(&ctx, input(property_id, 10, 13)).await.unwrap();

        let mut paid = booking.payment.clone();
        paid.status = PaymentStatus::Paid;
        let updated = h
            .bookings
            .update_payment(booking.id, PaymentStatus::Pending, &paid)
            .await
            .unwrap();
        assert!(updated.is_some());

        // A writer still holding the pending snapshot loses the race.
        let mut failed = booking.payment.clone();
        failed.status = PaymentStatus::Failed;
        let stale = h
            .bookings
            .update_payment(booking.id, PaymentStatus::Pending, &failed)
            .await
            .unwrap();
        assert!(stale.is_none());

        let current = h.bookings.find_by_id(booking.id).await.unwrap().unwrap();
        assert_eq!(current.payment.status, PaymentStatus::Paid);
    }

    #[tokio::test]
    async fn test_update_payment_requires_ownership() {
        let h = harness();
        let property_id = h.properties.add_default();
        let booking = h
            .service
            .create(&guest_ctx(), input(property_id, 10, 13))
            .await
            .unwrap();

        let err = h
            .service
            .update_payment(
                &guest_ctx(),
                booking.id,
                PaymentUpdate {
                    method: None,
                    status: PaymentStatus::Paid,
                    transaction_ref: None,
                    refund_amount: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn test_confirm_publishes_event_with_guest_email() {
        let h = harness();
        let property_id = h.properties.add_default();
        let booking = h
            .service
            .create(&guest_ctx(), input(property_id, 10, 13))
            .await
            .unwrap();
        h.service.confirm(&admin_ctx(), booking.id).await.unwrap();
        settle().await;

        let events = h.events.events.lock().unwrap();
        let confirmed = events.iter().find_map(|e| match &e.payload {
            EventPayload::Booking(BookingEvent::Confirmed {
                booking_id,
                guest_email,
                ..
            }) => Some((*booking_id, guest_email.clone())),
            _ => None,
        });
        assert_eq!(
            confirmed,
            Some((booking.id, "ayu@example.com".to_string()))
        );
    }
}
