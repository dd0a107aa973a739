#![allow(
    dead_code,
    unused_imports,
    unused_variables,
    unused_mut,
    clippy::field_reassign_with_default
)]

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate, NaiveTime};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use flotteq_core::{
    BookingWizard, FlotteqError, PortalApiClient, ServiceContext, SlotProvider, SlotQuery,
    SlotRefresh, SlotWindow, VehicleProvider, WizardStep,
};

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn in_days(days: i64) -> NaiveDate {
    today() + chrono::Duration::days(days)
}

fn context() -> ServiceContext {
    ServiceContext::new("p1", "s1", 30, "Garage Martin", "Oil change")
}

fn wizard_for(client: Arc<PortalApiClient>) -> BookingWizard {
    BookingWizard::new(context(), client.clone(), client.clone(), client)
}

async fn mount_single_vehicle(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/vehicles"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"vehicles":[{"id":"v1","brand":"Renault","model":"Clio","registration":"AB-123-CD"}]}"#,
        ))
        .mount(server)
        .await;
}

async fn mount_slots_for(server: &MockServer, date: NaiveDate, body: &str, delay_ms: u64) {
    let mut template = ResponseTemplate::new(200).set_body_string(body);
    if delay_ms > 0 {
        template = template.set_delay(Duration::from_millis(delay_ms));
    }

    Mock::given(method("GET"))
        .and(path("/partners/p1/services/s1/slots"))
        .and(query_param("date", date.to_string()))
        .and(query_param("duration", "30"))
        .respond_with(template)
        .mount(server)
        .await;
}

const MORNING_SLOTS: &str = r#"{"slots":[
    {"start":"09:00","end":"09:30","available":true},
    {"start":"09:30","end":"10:00","available":false},
    {"start":"14:00","end":"14:30","available":true}
]}"#;

const AFTERNOON_SLOTS: &str = r#"{"slots":[
    {"start":"15:00","end":"15:30","available":true}
]}"#;

mod wizard_opening {
    use super::*;

    #[tokio::test]
    async fn test_single_vehicle_opens_on_slot_selection() {
        let server = MockServer::start().await;
        mount_single_vehicle(&server).await;

        let client = Arc::new(PortalApiClient::new(server.uri()).unwrap());
        let wizard = wizard_for(client);

        let vehicles = wizard.open().await.unwrap();
        assert_eq!(vehicles.len(), 1);
        assert_eq!(wizard.step().await, WizardStep::SlotSelection);
        assert_eq!(wizard.draft().await.vehicle_id.as_deref(), Some("v1"));
    }

    #[tokio::test]
    async fn test_two_vehicles_open_on_vehicle_selection() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/vehicles"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"vehicles":[
                    {"id":"v1","brand":"Renault","model":"Clio","registration":"AB-123-CD"},
                    {"id":"v2","brand":"Peugeot","model":"208","registration":"EF-456-GH"}
                ]}"#,
            ))
            .mount(&server)
            .await;

        let client = Arc::new(PortalApiClient::new(server.uri()).unwrap());
        let wizard = wizard_for(client);

        let vehicles = wizard.open().await.unwrap();
        assert_eq!(vehicles.len(), 2);
        assert_eq!(wizard.step().await, WizardStep::VehicleSelection);
        assert!(wizard.draft().await.vehicle_id.is_none());
    }

    #[tokio::test]
    async fn test_vehicle_read_failure_surfaces() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/vehicles"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = Arc::new(PortalApiClient::new(server.uri()).unwrap());
        let wizard = wizard_for(client);

        let err = wizard.open().await.unwrap_err();
        assert!(matches!(err, FlotteqError::ApiServiceUnavailable(_)));
    }
}

mod slot_selection {
    use super::*;

    #[tokio::test]
    async fn test_only_available_windows_offered() {
        let server = MockServer::start().await;
        mount_single_vehicle(&server).await;
        let date = in_days(3);
        mount_slots_for(&server, date, MORNING_SLOTS, 0).await;

        let client = Arc::new(PortalApiClient::new(server.uri()).unwrap());
        let wizard = wizard_for(client);
        wizard.open().await.unwrap();

        let windows = match wizard.show_date(date).await.unwrap() {
            SlotRefresh::Loaded(windows) => windows,
            SlotRefresh::Discarded => panic!("refresh unexpectedly discarded"),
        };

        assert_eq!(
            windows,
            vec![
                SlotWindow::new(t(9, 0), t(9, 30)),
                SlotWindow::new(t(14, 0), t(14, 30)),
            ]
        );

        let err = wizard
            .choose_slot(SlotWindow::new(t(9, 30), t(10, 0)))
            .await
            .unwrap_err();
        assert!(matches!(err, FlotteqError::SlotUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_empty_day_is_not_an_error() {
        let server = MockServer::start().await;
        mount_single_vehicle(&server).await;
        let date = in_days(3);
        mount_slots_for(&server, date, r#"{"slots":[]}"#, 0).await;

        let client = Arc::new(PortalApiClient::new(server.uri()).unwrap());
        let wizard = wizard_for(client);
        wizard.open().await.unwrap();

        let refresh = wizard.show_date(date).await.unwrap();
        assert_eq!(refresh, SlotRefresh::Loaded(Vec::new()));
        assert!(!wizard.can_advance().await);
    }

    #[tokio::test]
    async fn test_late_response_for_old_date_is_discarded() {
        let server = MockServer::start().await;
        mount_single_vehicle(&server).await;

        let d1 = in_days(1);
        let d2 = in_days(2);
        mount_slots_for(&server, d1, MORNING_SLOTS, 500).await;
        mount_slots_for(&server, d2, AFTERNOON_SLOTS, 0).await;

        let client = Arc::new(PortalApiClient::new(server.uri()).unwrap());
        let wizard = wizard_for(client);
        wizard.open().await.unwrap();

        let slow = {
            let wizard = wizard.clone();
            tokio::spawn(async move { wizard.show_date(d1).await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;

        let refresh = wizard.show_date(d2).await.unwrap();
        assert_eq!(
            refresh,
            SlotRefresh::Loaded(vec![SlotWindow::new(t(15, 0), t(15, 30))])
        );

        let stale = slow.await.unwrap().unwrap();
        assert_eq!(stale, SlotRefresh::Discarded);

        // The applied list still belongs to d2
        assert_eq!(
            wizard.available().await,
            vec![SlotWindow::new(t(15, 0), t(15, 30))]
        );
    }

    #[tokio::test]
    async fn test_cancel_while_query_in_flight_applies_nothing() {
        let server = MockServer::start().await;
        mount_single_vehicle(&server).await;

        let date = in_days(1);
        mount_slots_for(&server, date, MORNING_SLOTS, 400).await;

        let client = Arc::new(PortalApiClient::new(server.uri()).unwrap());
        let wizard = wizard_for(client);
        wizard.open().await.unwrap();

        let slow = {
            let wizard = wizard.clone();
            tokio::spawn(async move { wizard.show_date(date).await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;

        wizard.cancel().await;

        let outcome = slow.await.unwrap().unwrap();
        assert_eq!(outcome, SlotRefresh::Discarded);
        assert!(wizard.available().await.is_empty());
    }
}

mod booking_submission {
    use super::*;

    async fn drive_to_summary(wizard: &BookingWizard, date: NaiveDate) {
        wizard.open().await.unwrap();
        wizard.show_date(date).await.unwrap();
        wizard
            .choose_slot(SlotWindow::new(t(14, 0), t(14, 30)))
            .await
            .unwrap();
        wizard.advance().await.unwrap();
        assert_eq!(wizard.step().await, WizardStep::Summary);
    }

    #[tokio::test]
    async fn test_full_flow_creates_booking_with_expected_payload() {
        let server = MockServer::start().await;
        mount_single_vehicle(&server).await;
        let date = in_days(5);
        mount_slots_for(&server, date, MORNING_SLOTS, 0).await;

        Mock::given(method("POST"))
            .and(path("/bookings"))
            .and(body_partial_json(serde_json::json!({
                "partnerId": "p1",
                "serviceId": "s1",
                "vehicleId": "v1",
                "scheduledDate": date.to_string(),
                "scheduledTime": "14:00",
                "endTime": "14:30",
                "customerNotes": "squeaky brakes"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_string(format!(
                r#"{{
                    "id": "7c9e6679-7425-40de-944b-e07fc1f90ae7",
                    "status": "confirmed",
                    "scheduledDate": "{date}",
                    "scheduledTime": "14:00",
                    "endTime": "14:30"
                }}"#
            )))
            .expect(1)
            .mount(&server)
            .await;

        let client = Arc::new(PortalApiClient::new(server.uri()).unwrap());
        let wizard = wizard_for(client);
        drive_to_summary(&wizard, date).await;
        wizard.set_notes("  squeaky brakes  ").await.unwrap();

        let booking = wizard.confirm().await.unwrap();
        assert_eq!(booking.scheduled_date, date);
        assert!(wizard.is_closed().await);
    }

    #[tokio::test]
    async fn test_rejection_preserves_draft_and_surfaces_server_message() {
        let server = MockServer::start().await;
        mount_single_vehicle(&server).await;
        let date = in_days(5);
        mount_slots_for(&server, date, MORNING_SLOTS, 0).await;

        Mock::given(method("POST"))
            .and(path("/bookings"))
            .respond_with(
                ResponseTemplate::new(409)
                    .set_body_string(r#"{"message":"Slot no longer available"}"#),
            )
            .mount(&server)
            .await;

        let client = Arc::new(PortalApiClient::new(server.uri()).unwrap());
        let wizard = wizard_for(client);
        drive_to_summary(&wizard, date).await;

        let before = wizard.draft().await;
        let err = wizard.confirm().await.unwrap_err();
        assert!(matches!(err, FlotteqError::BookingRejected { .. }));

        assert!(!wizard.is_closed().await);
        assert_eq!(wizard.step().await, WizardStep::Summary);
        assert_eq!(wizard.draft().await, before);
        assert_eq!(
            wizard.last_error().await.as_deref(),
            Some("Slot no longer available")
        );
        assert!(!wizard.is_submitting().await);
    }

    #[tokio::test]
    async fn test_concurrent_confirms_send_exactly_one_request() {
        let server = MockServer::start().await;
        mount_single_vehicle(&server).await;
        let date = in_days(5);
        mount_slots_for(&server, date, MORNING_SLOTS, 0).await;

        Mock::given(method("POST"))
            .and(path("/bookings"))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_string(format!(
                        r#"{{
                            "id": "7c9e6679-7425-40de-944b-e07fc1f90ae7",
                            "status": "pending",
                            "scheduledDate": "{date}",
                            "scheduledTime": "14:00",
                            "endTime": "14:30"
                        }}"#
                    ))
                    .set_delay(Duration::from_millis(400)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = Arc::new(PortalApiClient::new(server.uri()).unwrap());
        let wizard = wizard_for(client);
        drive_to_summary(&wizard, date).await;

        let first = {
            let wizard = wizard.clone();
            tokio::spawn(async move { wizard.confirm().await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;

        let second = wizard.confirm().await.unwrap_err();
        assert!(matches!(second, FlotteqError::SubmissionInFlight));

        let booking = first.await.unwrap().unwrap();
        assert_eq!(booking.scheduled_date, date);
        // wiremock verifies expect(1) on drop
    }
}

mod raw_client {
    use super::*;

    #[tokio::test]
    async fn test_slot_query_includes_duration_from_context() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/partners/p9/services/s9/slots"))
            .and(query_param("duration", "60"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"slots":[]}"#))
            .expect(1)
            .mount(&server)
            .await;

        let client = PortalApiClient::new(server.uri()).unwrap();
        let query = SlotQuery {
            partner_id: "p9".to_string(),
            service_id: "s9".to_string(),
            date: in_days(1),
            duration_minutes: 60,
        };
        let slots = client.list_slots(&query).await.unwrap();
        assert!(slots.is_empty());
    }
}
