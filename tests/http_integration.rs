// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the device clients and handlers using wiremock.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use accessory_bridge::accessory::{AccessoryContext, AccessoryHandler, Backends, SolarAccessory};
use accessory_bridge::client::SolarClient;
use accessory_bridge::config::SubDeviceConfig;
use accessory_bridge::derived::SolarEvent;
use accessory_bridge::protocol::HttpClient;
use accessory_bridge::{
    AccessoryEvent, Characteristic, CharacteristicValue, DeviceEntry, Error, EventBus,
    LivenessProbe, PresenceConfig, ProtocolError, SensorConfig, SolarConfig, StableId, SubDevice,
    SwitchConfig, ThermostatConfig, TimingConfig,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::broadcast;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helpers
// ============================================================================

#[derive(Debug, Default)]
struct FakeProbe {
    reachable: AtomicBool,
}

impl FakeProbe {
    fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }
}

#[async_trait]
impl LivenessProbe for FakeProbe {
    async fn probe(&self, host: &str, _timeout: Duration) -> Result<(), ProtocolError> {
        if self.reachable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ProtocolError::Unreachable(host.to_string()))
        }
    }
}

fn backends(sensor_api_base: &str, probe: Arc<FakeProbe>) -> Backends {
    Backends {
        http: HttpClient::new().unwrap(),
        probe,
        timing: TimingConfig::default(),
        sensor_api_base: sensor_api_base.to_string(),
    }
}

fn handler(
    entry: &DeviceEntry,
    backends: &Backends,
) -> (AccessoryHandler, broadcast::Receiver<AccessoryEvent>) {
    let bus = EventBus::new();
    let rx = bus.subscribe();
    let ctx = AccessoryContext::new(entry.stable_id(), entry.name(), bus);
    (AccessoryHandler::new(entry, ctx, backends), rx)
}

fn drain(rx: &mut broadcast::Receiver<AccessoryEvent>) -> Vec<AccessoryEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

// ============================================================================
// Sensor Tests
// ============================================================================

mod sensor {
    use super::*;

    fn entry() -> DeviceEntry {
        DeviceEntry::Sensor(SensorConfig {
            uuid: "abc123".to_string(),
            name: "Kitchen".to_string(),
            owner: None,
        })
    }

    fn reading(temperature: f64, humidity: f64) -> serde_json::Value {
        serde_json::json!({
            "status": 200,
            "data": [{ "temperature": temperature, "humidity": humidity }]
        })
    }

    #[tokio::test]
    async fn refresh_publishes_temperature_and_humidity() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/devices/abc123/data"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reading(20.0, 0.5)))
            .mount(&mock_server)
            .await;

        let backends = backends(&mock_server.uri(), Arc::default());
        let (sensor, mut rx) = handler(&entry(), &backends);

        sensor.refresh().await;

        let events = drain(&mut rx);
        assert_eq!(events.len(), 2);
        assert!(events.contains(&AccessoryEvent::changed(
            StableId::derive("abc123"),
            Characteristic::CurrentRelativeHumidity,
            50.0,
        )));
        assert_eq!(
            sensor
                .get(Characteristic::CurrentRelativeHumidity)
                .await
                .unwrap(),
            CharacteristicValue::Number(50.0)
        );
    }

    #[tokio::test]
    async fn unchanged_reading_is_not_republished() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/devices/abc123/data"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reading(20.0, 0.5)))
            .mount(&mock_server)
            .await;

        let backends = backends(&mock_server.uri(), Arc::default());
        let (sensor, mut rx) = handler(&entry(), &backends);

        sensor.refresh().await;
        sensor.refresh().await;

        assert_eq!(drain(&mut rx).len(), 2);
    }

    #[tokio::test]
    async fn failed_envelope_keeps_previous_state() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/devices/abc123/data"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reading(20.0, 0.5)))
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/devices/abc123/data"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "status": 500, "data": [] })),
            )
            .mount(&mock_server)
            .await;

        let backends = backends(&mock_server.uri(), Arc::default());
        let (sensor, mut rx) = handler(&entry(), &backends);

        sensor.refresh().await;
        sensor.refresh().await;

        assert_eq!(drain(&mut rx).len(), 2);
        assert_eq!(
            sensor
                .get(Characteristic::CurrentRelativeHumidity)
                .await
                .unwrap(),
            CharacteristicValue::Number(50.0)
        );
    }

    #[tokio::test]
    async fn http_error_publishes_nothing() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let backends = backends(&mock_server.uri(), Arc::default());
        let (sensor, mut rx) = handler(&entry(), &backends);

        sensor.refresh().await;

        assert!(drain(&mut rx).is_empty());
        assert_eq!(
            sensor.get(Characteristic::CurrentTemperature).await.unwrap(),
            CharacteristicValue::Number(0.0)
        );
    }

    #[tokio::test]
    async fn non_200_success_status_is_a_soft_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/devices/abc123/data"))
            .respond_with(ResponseTemplate::new(201).set_body_json(reading(20.0, 0.5)))
            .mount(&mock_server)
            .await;

        let backends = backends(&mock_server.uri(), Arc::default());
        let (sensor, mut rx) = handler(&entry(), &backends);

        sensor.refresh().await;

        assert!(drain(&mut rx).is_empty());
    }
}

// ============================================================================
// Thermostat Tests
// ============================================================================

mod thermostat {
    use super::*;

    fn entry(mock_server: &MockServer) -> DeviceEntry {
        let port = mock_server.address().port();
        let mut config = ThermostatConfig::new("Living", "127.0.0.1").with_port(port);
        config.valves = Some(vec![SubDeviceConfig {
            id: "water-valve".to_string(),
            name: "Water".to_string(),
        }]);
        DeviceEntry::thermostat(config).unwrap()
    }

    #[tokio::test]
    async fn reads_current_temperature() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/default/current-temperature"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "value": 19.5 })))
            .mount(&mock_server)
            .await;

        let backends = backends("http://unused", Arc::default());
        let (thermostat, _rx) = handler(&entry(&mock_server), &backends);

        assert_eq!(
            thermostat
                .get(Characteristic::CurrentTemperature)
                .await
                .unwrap(),
            CharacteristicValue::Number(19.5)
        );
    }

    #[tokio::test]
    async fn reads_target_state_and_humidity() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/default/target-state"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "value": 3 })))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/default/current-relative-humidity"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "value": 0.25 })))
            .mount(&mock_server)
            .await;

        let backends = backends("http://unused", Arc::default());
        let (thermostat, _rx) = handler(&entry(&mock_server), &backends);

        assert_eq!(
            thermostat
                .get(Characteristic::TargetHeatingCoolingState)
                .await
                .unwrap(),
            CharacteristicValue::State(3)
        );
        assert_eq!(
            thermostat
                .get(Characteristic::CurrentRelativeHumidity)
                .await
                .unwrap(),
            CharacteristicValue::Number(25.0)
        );
    }

    #[tokio::test]
    async fn read_failure_is_returned() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/default/current-state"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let backends = backends("http://unused", Arc::default());
        let (thermostat, _rx) = handler(&entry(&mock_server), &backends);

        let err = thermostat
            .get(Characteristic::CurrentHeatingCoolingState)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Protocol(ProtocolError::Status { .. })));
    }

    #[tokio::test]
    async fn setpoint_is_posted_as_json() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/default/target-temperature"))
            .and(body_json(serde_json::json!({ "value": 21.5 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "value": 21.5 })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let backends = backends("http://unused", Arc::default());
        let (thermostat, _rx) = handler(&entry(&mock_server), &backends);

        thermostat
            .set(Characteristic::TargetTemperature, CharacteristicValue::Number(21.5))
            .await
            .unwrap();

        mock_server.verify().await;
    }

    #[tokio::test]
    async fn out_of_range_setpoint_never_reaches_the_device() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let backends = backends("http://unused", Arc::default());
        let (thermostat, _rx) = handler(&entry(&mock_server), &backends);

        let err = thermostat
            .set(Characteristic::TargetTemperature, CharacteristicValue::Number(30.0))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Value(_)));

        mock_server.verify().await;
    }

    #[tokio::test]
    async fn water_valve_is_writable() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/default/water-valve/active"))
            .and(body_json(serde_json::json!({ "value": 1 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "value": 1 })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let backends = backends("http://unused", Arc::default());
        let (thermostat, _rx) = handler(&entry(&mock_server), &backends);

        thermostat
            .set(
                Characteristic::SubDevice(SubDevice::WaterValve),
                CharacteristicValue::Bool(true),
            )
            .await
            .unwrap();

        mock_server.verify().await;
    }

    #[tokio::test]
    async fn unconfigured_sub_device_is_rejected() {
        let mock_server = MockServer::start().await;

        let backends = backends("http://unused", Arc::default());
        let (thermostat, _rx) = handler(&entry(&mock_server), &backends);

        let err = thermostat
            .get(Characteristic::SubDevice(SubDevice::HeatingValve))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedCharacteristic(_)));
    }
}

// ============================================================================
// Switch Tests
// ============================================================================

mod switch {
    use super::*;

    fn entry(mock_server: &MockServer) -> DeviceEntry {
        let uri = mock_server.uri();
        DeviceEntry::switch(
            SwitchConfig::http("Lamp")
                .with_urls(format!("{uri}/on"), format!("{uri}/off"))
                .with_state_url(format!("{uri}/state")),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn initialize_publishes_remote_state() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/state"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": true })))
            .mount(&mock_server)
            .await;

        let backends = backends("http://unused", Arc::default());
        let entry = entry(&mock_server);
        let (switch, mut rx) = handler(&entry, &backends);

        switch.initialize().await;

        assert_eq!(
            drain(&mut rx),
            vec![AccessoryEvent::changed(entry.stable_id(), Characteristic::On, true)]
        );
    }

    #[tokio::test]
    async fn set_off_triggers_off_url() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/off"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/on"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let backends = backends("http://unused", Arc::default());
        let (switch, _rx) = handler(&entry(&mock_server), &backends);

        switch
            .set(Characteristic::On, CharacteristicValue::Bool(false))
            .await
            .unwrap();

        mock_server.verify().await;
    }

    #[tokio::test]
    async fn get_falls_back_to_cached_value() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/on"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/state"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let backends = backends("http://unused", Arc::default());
        let (switch, _rx) = handler(&entry(&mock_server), &backends);

        switch
            .set(Characteristic::On, CharacteristicValue::Bool(true))
            .await
            .unwrap();

        assert_eq!(
            switch.get(Characteristic::On).await.unwrap(),
            CharacteristicValue::Bool(true)
        );
    }

    #[tokio::test]
    async fn failing_trigger_is_not_an_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/on"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&mock_server)
            .await;

        let backends = backends("http://unused", Arc::default());
        let (switch, _rx) = handler(&entry(&mock_server), &backends);

        assert!(
            switch
                .set(Characteristic::On, CharacteristicValue::Bool(true))
                .await
                .is_ok()
        );
    }
}

// ============================================================================
// Presence Tests
// ============================================================================

mod presence {
    use super::*;

    fn entry(mock_server: &MockServer) -> DeviceEntry {
        let config =
            PresenceConfig::samsung("TV", "127.0.0.1").with_port(mock_server.address().port());
        DeviceEntry::presence(config).unwrap()
    }

    fn status(power_state: &str) -> serde_json::Value {
        serde_json::json!({
            "device": {
                "PowerState": power_state,
                "type": "Samsung SmartTV",
                "modelName": "QE55Q80",
                "id": "uuid:5f2a-tv"
            }
        })
    }

    fn occupancy(events: &[AccessoryEvent]) -> Vec<bool> {
        events
            .iter()
            .filter_map(|event| match event {
                AccessoryEvent::CharacteristicChanged {
                    characteristic: Characteristic::OccupancyDetected,
                    value,
                    ..
                } => value.as_bool().ok(),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn powered_tv_reports_occupancy_and_information() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(status("on")))
            .mount(&mock_server)
            .await;

        let probe = Arc::new(FakeProbe::default());
        probe.set_reachable(true);
        let backends = backends("http://unused", probe);
        let (tv, mut rx) = handler(&entry(&mock_server), &backends);

        tv.refresh().await;

        let events = drain(&mut rx);
        assert_eq!(occupancy(&events), vec![true]);
        assert!(events.iter().any(|event| matches!(
            event,
            AccessoryEvent::InformationUpdated { info, .. }
                if info.model == "QE55Q80" && info.serial_number == "5f2a-tv"
        )));
        assert_eq!(tv.info().manufacturer, "Samsung SmartTV");
    }

    #[tokio::test]
    async fn unreachable_tv_reads_as_unoccupied() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(status("on")))
            .mount(&mock_server)
            .await;

        let probe = Arc::new(FakeProbe::default());
        probe.set_reachable(true);
        let backends = backends("http://unused", Arc::clone(&probe));
        let (tv, mut rx) = handler(&entry(&mock_server), &backends);

        tv.refresh().await;
        probe.set_reachable(false);
        tv.refresh().await;

        assert_eq!(occupancy(&drain(&mut rx)), vec![true, false]);
        assert_eq!(
            tv.get(Characteristic::OccupancyDetected).await.unwrap(),
            CharacteristicValue::Bool(false)
        );
    }

    #[tokio::test]
    async fn status_failure_keeps_previous_occupancy() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(status("on")))
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/v2/"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let probe = Arc::new(FakeProbe::default());
        probe.set_reachable(true);
        let backends = backends("http://unused", probe);
        let (tv, mut rx) = handler(&entry(&mock_server), &backends);

        tv.refresh().await;
        tv.refresh().await;

        assert_eq!(occupancy(&drain(&mut rx)), vec![true]);
        assert_eq!(
            tv.get(Characteristic::OccupancyDetected).await.unwrap(),
            CharacteristicValue::Bool(true)
        );
    }

    #[tokio::test]
    async fn standby_tv_stays_unoccupied_without_publishing() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(status("standby")))
            .mount(&mock_server)
            .await;

        let probe = Arc::new(FakeProbe::default());
        probe.set_reachable(true);
        let backends = backends("http://unused", probe);
        let (tv, mut rx) = handler(&entry(&mock_server), &backends);

        tv.refresh().await;

        assert!(occupancy(&drain(&mut rx)).is_empty());
    }
}

// ============================================================================
// Solar Tests
// ============================================================================

mod solar {
    use super::*;

    fn ephemeris() -> serde_json::Value {
        serde_json::json!({
            "results": {
                "date": "2026-06-21",
                "sunrise": "05:29:10",
                "sunset": "22:01:45",
                "solar_noon": "13:45:27",
                "golden_hour": "21:10:12",
                "dawn": "04:44:03",
                "dusk": "22:46:52",
                "day_length": "16:32:35",
                "timezone": "CET"
            }
        })
    }

    fn accessory(mock_server: &MockServer) -> (SolarAccessory, broadcast::Receiver<AccessoryEvent>) {
        let config = SolarConfig::new("Sun").with_api_url(format!("{}/json", mock_server.uri()));
        let bus = EventBus::new();
        let rx = bus.subscribe();
        let ctx = AccessoryContext::new(StableId::derive("Sun"), "Sun", bus);
        let client = SolarClient::new(HttpClient::new().unwrap(), &config);
        (SolarAccessory::new(ctx, client, &config), rx)
    }

    fn at(hms: &str) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 6, 21)
            .unwrap()
            .and_time(chrono::NaiveTime::parse_from_str(hms, "%H:%M:%S").unwrap())
    }

    #[tokio::test]
    async fn publishes_only_on_transitions() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/json"))
            .and(query_param("timezone", "CET"))
            .and(query_param("time_format", "24"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ephemeris()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (sun, mut rx) = accessory(&mock_server);

        sun.refresh_at(at("12:00:00")).await;
        assert!(drain(&mut rx).is_empty());

        sun.refresh_at(at("13:30:00")).await;
        sun.refresh_at(at("13:35:00")).await;
        assert_eq!(
            drain(&mut rx),
            vec![AccessoryEvent::changed(
                StableId::derive("Sun"),
                Characteristic::MotionDetected(SolarEvent::SolarNoon),
                true,
            )]
        );

        sun.refresh_at(at("15:00:00")).await;
        assert_eq!(
            drain(&mut rx),
            vec![AccessoryEvent::changed(
                StableId::derive("Sun"),
                Characteristic::MotionDetected(SolarEvent::SolarNoon),
                false,
            )]
        );

        mock_server.verify().await;
    }

    #[tokio::test]
    async fn refetches_when_the_date_changes() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ephemeris()))
            .expect(2)
            .mount(&mock_server)
            .await;

        let (sun, _rx) = accessory(&mock_server);

        sun.refresh_at(at("12:00:00")).await;
        sun.refresh_at(at("12:00:03")).await;
        let tomorrow = NaiveDate::from_ymd_opt(2026, 6, 22)
            .unwrap()
            .and_hms_opt(0, 0, 1)
            .unwrap();
        sun.refresh_at(tomorrow).await;

        mock_server.verify().await;
    }

    #[tokio::test]
    async fn lagging_api_date_is_fetched_once_per_day() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ephemeris()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (sun, _rx) = accessory(&mock_server);
        let next_day = NaiveDate::from_ymd_opt(2026, 6, 22).unwrap();

        for tick in 0..10 {
            sun.refresh_at(next_day.and_hms_opt(0, 0, tick * 3).unwrap()).await;
        }

        assert_eq!(sun.ephemeris().unwrap().date(), NaiveDate::from_ymd_opt(2026, 6, 21).unwrap());
        mock_server.verify().await;
    }

    #[tokio::test]
    async fn disabled_source_does_nothing() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ephemeris()))
            .expect(0)
            .mount(&mock_server)
            .await;

        let (sun, _rx) = accessory(&mock_server);
        sun.set(Characteristic::On, CharacteristicValue::Bool(false))
            .unwrap();

        sun.refresh_at(at("13:45:00")).await;

        assert!(sun.ephemeris().is_none());
        mock_server.verify().await;
    }

    #[tokio::test]
    async fn api_failure_leaves_no_ephemeris() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let (sun, mut rx) = accessory(&mock_server);
        sun.refresh_at(at("13:45:00")).await;

        assert!(sun.ephemeris().is_none());
        assert!(drain(&mut rx).is_empty());
    }
}
