//! Assignment notifications.
//!
//! When a driver is assigned to a booking, a JSON payload describing the trip
//! is sent to a [`NotificationSink`]. Delivery is best-effort: it runs on its
//! own task with its own timeout, and a failure is only logged.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::{
    Assignment, Booking, Driver, Money, Vehicle,
    cars::Car,
    lookup::Lookup,
    routes::Route,
};

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("notification request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("notification sink answered {0}")]
    Status(u16),
    #[error("notification timed out after {0:?}")]
    Timeout(Duration),
}

/// Payload sent to the notification sink.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentNotification {
    pub driver_name: String,
    pub driver_email: Option<String>,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub route_name: String,
    pub car_name: String,
    pub vehicle_plate: Option<String>,
    pub pickup_place: String,
    pub dropoff_place: String,
    pub date: NaiveDate,
    pub time: Option<String>,
    pub return_date: Option<NaiveDate>,
    pub return_time: Option<String>,
    pub round_trip: bool,
    pub note: Option<String>,
    pub total_price: Money,
    pub driver_pay: Money,
    pub company_profit: Money,
}

impl AssignmentNotification {
    /// Builds the payload, resolving display names through the lookups.
    ///
    /// Unknown route and car codes fall back to the raw code.
    pub fn build<R, C, V>(
        booking: &Booking,
        assignment: &Assignment,
        driver: &Driver,
        routes: &R,
        cars: &C,
        vehicles: &V,
    ) -> Self
    where
        R: Lookup<String, Item = Route>,
        C: Lookup<String, Item = Car>,
        V: Lookup<Uuid, Item = Vehicle>,
    {
        let route_name = routes
            .lookup(&booking.route_code)
            .map_or_else(|| booking.route_code.clone(), |route| route.name.clone());
        let car_name = cars
            .lookup(&booking.car_type_code)
            .map_or_else(|| booking.car_type_code.clone(), |car| car.name.clone());
        let vehicle_plate = assignment
            .vehicle_id
            .and_then(|id| vehicles.lookup(&id))
            .map(|vehicle| vehicle.plate.clone());

        Self {
            driver_name: driver.name.clone(),
            driver_email: driver.email.clone(),
            customer_name: booking.customer_name.clone(),
            customer_phone: booking.customer_phone.clone(),
            customer_email: booking.customer_email.clone(),
            route_name,
            car_name,
            vehicle_plate,
            pickup_place: booking.pickup.clone(),
            dropoff_place: booking.dropoff.clone(),
            date: booking.date,
            time: booking.time.clone(),
            return_date: booking.return_date,
            return_time: booking.return_time.clone(),
            round_trip: booking.round_trip,
            note: booking.note.clone(),
            total_price: booking.total_price,
            driver_pay: assignment.driver_pay,
            company_profit: assignment.company_profit,
        }
    }
}

#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, payload: &AssignmentNotification) -> Result<(), NotifyError>;
}

/// Sink used when no webhook is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

#[async_trait]
impl NotificationSink for NoopSink {
    async fn notify(&self, _payload: &AssignmentNotification) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// POSTs the payload as JSON to a webhook.
#[derive(Clone, Debug)]
pub struct WebhookSink {
    client: reqwest::Client,
    url: String,
}

impl WebhookSink {
    pub fn new(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl NotificationSink for WebhookSink {
    async fn notify(&self, payload: &AssignmentNotification) -> Result<(), NotifyError> {
        let resp = self.client.post(&self.url).json(payload).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status.as_u16()));
        }
        Ok(())
    }
}

/// Sends `payload` on a detached task, bounded by `timeout`.
///
/// The returned handle resolves once delivery finished or gave up; callers
/// are free to drop it.
pub fn dispatch(
    sink: Arc<dyn NotificationSink>,
    payload: AssignmentNotification,
    timeout: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let outcome = match tokio::time::timeout(timeout, sink.notify(&payload)).await {
            Ok(result) => result,
            Err(_) => Err(NotifyError::Timeout(timeout)),
        };
        match outcome {
            Ok(()) => tracing::debug!(
                driver = %payload.driver_name,
                date = %payload.date,
                "assignment notification sent"
            ),
            Err(err) => tracing::warn!(
                driver = %payload.driver_name,
                date = %payload.date,
                "assignment notification failed: {err}"
            ),
        }
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::Utc;

    use super::*;
    use crate::{AssignmentStatus, Rate, Roster};

    fn payload() -> AssignmentNotification {
        let mut booking = Booking::new(
            "Alice",
            "HN-HL",
            "SUV7",
            NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            Money::new(2_000_000),
        );
        booking.return_date = NaiveDate::from_ymd_opt(2024, 6, 12);
        let mut driver = Driver::new("Minh", Some(Rate::from_percent(70.0).unwrap()), Money::ZERO);
        driver.email = Some("minh@example.com".to_string());
        let vehicle = Vehicle::new("29A-123.45", "Ford", "Transit", 16);
        let now = Utc::now();
        let assignment = Assignment {
            id: Uuid::new_v4(),
            booking_id: booking.id,
            driver_id: Some(driver.id),
            vehicle_id: Some(vehicle.id),
            driver_pay: Money::new(1_400_000),
            company_profit: Money::new(600_000),
            status: AssignmentStatus::Assigned,
            paid: false,
            paid_at: None,
            created_at: now,
            updated_at: now,
        };
        let routes = Roster::keyed(
            vec![Route {
                code: "HN-HL".to_string(),
                name: "Hanoi - Ha Long".to_string(),
                active: true,
            }],
            |r| r.code.clone(),
        );
        let cars: Roster<String, Car> = Roster::default();
        let vehicles = Roster::keyed(vec![vehicle], |v| v.id);
        AssignmentNotification::build(&booking, &assignment, &driver, &routes, &cars, &vehicles)
    }

    #[test]
    fn payload_uses_expected_keys() {
        let json = serde_json::to_value(payload()).unwrap();
        let object = json.as_object().unwrap();
        let mut keys: Vec<_> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        let mut expected = vec![
            "driverName",
            "driverEmail",
            "customerName",
            "customerPhone",
            "customerEmail",
            "routeName",
            "carName",
            "vehiclePlate",
            "pickupPlace",
            "dropoffPlace",
            "date",
            "time",
            "returnDate",
            "returnTime",
            "roundTrip",
            "note",
            "totalPrice",
            "driverPay",
            "companyProfit",
        ];
        expected.sort_unstable();
        assert_eq!(keys, expected);

        assert_eq!(json["routeName"], "Hanoi - Ha Long");
        assert_eq!(json["carName"], "SUV7");
        assert_eq!(json["vehiclePlate"], "29A-123.45");
        assert_eq!(json["date"], "2024-06-10");
        assert_eq!(json["returnDate"], "2024-06-12");
        assert_eq!(json["driverPay"], 1_400_000);
    }

    struct Failing;

    #[async_trait]
    impl NotificationSink for Failing {
        async fn notify(&self, _payload: &AssignmentNotification) -> Result<(), NotifyError> {
            Err(NotifyError::Status(502))
        }
    }

    struct Slow;

    #[async_trait]
    impl NotificationSink for Slow {
        async fn notify(&self, _payload: &AssignmentNotification) -> Result<(), NotifyError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        }
    }

    #[derive(Default)]
    struct Recording(Mutex<Vec<AssignmentNotification>>);

    #[async_trait]
    impl NotificationSink for Recording {
        async fn notify(&self, payload: &AssignmentNotification) -> Result<(), NotifyError> {
            self.0.lock().unwrap().push(payload.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn failures_and_timeouts_do_not_propagate() {
        dispatch(Arc::new(Failing), payload(), Duration::from_secs(1))
            .await
            .unwrap();
        dispatch(Arc::new(Slow), payload(), Duration::from_millis(10))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn delivers_to_sink() {
        let sink = Arc::new(Recording::default());
        dispatch(sink.clone(), payload(), Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(sink.0.lock().unwrap().len(), 1);
    }
}
