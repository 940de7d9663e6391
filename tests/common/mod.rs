//! Scripted in-memory gateway and record fixtures shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use f1_telemetry::{
    CarDataSample, DataGateway, DataOrchestrator, Driver, Lap, Meeting, Position, Result, Session,
    TelemetryError, Weather,
};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

#[derive(Default)]
struct Script {
    sessions: HashMap<i32, Vec<Session>>,
    drivers: HashMap<u32, Vec<Driver>>,
    laps: HashMap<(u32, u32), Vec<Lap>>,
    car_data: HashMap<(u32, u32), Vec<CarDataSample>>,
    weather: HashMap<u32, Vec<Weather>>,
    positions: HashMap<u32, Vec<Position>>,
    meetings: HashMap<i32, Vec<Meeting>>,
    failing: HashSet<&'static str>,
    delay: Option<Duration>,
}

/// Gateway answering from in-memory tables and counting calls per method
#[derive(Default)]
pub struct MockGateway {
    script: Mutex<Script>,
    calls: Mutex<HashMap<&'static str, usize>>,
}

impl MockGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self, method: &str) -> usize {
        self.calls.lock().get(method).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().values().sum()
    }

    /// Make `method` fail (or succeed again) from the next call on
    pub fn set_failing(&self, method: &'static str, failing: bool) {
        let mut script = self.script.lock();
        if failing {
            script.failing.insert(method);
        } else {
            script.failing.remove(method);
        }
    }

    /// Delay every response, to keep loads in flight
    pub fn set_delay(&self, delay: Duration) {
        self.script.lock().delay = Some(delay);
    }

    pub fn set_sessions(&self, year: i32, sessions: Vec<Session>) {
        self.script.lock().sessions.insert(year, sessions);
    }

    pub fn set_drivers(&self, session_key: u32, drivers: Vec<Driver>) {
        self.script.lock().drivers.insert(session_key, drivers);
    }

    pub fn set_laps(&self, session_key: u32, driver_number: u32, laps: Vec<Lap>) {
        self.script.lock().laps.insert((session_key, driver_number), laps);
    }

    pub fn set_car_data(&self, session_key: u32, driver_number: u32, samples: Vec<CarDataSample>) {
        self.script
            .lock()
            .car_data
            .insert((session_key, driver_number), samples);
    }

    pub fn set_weather(&self, session_key: u32, readings: Vec<Weather>) {
        self.script.lock().weather.insert(session_key, readings);
    }

    pub fn set_positions(&self, session_key: u32, positions: Vec<Position>) {
        self.script.lock().positions.insert(session_key, positions);
    }

    pub fn set_meetings(&self, year: i32, meetings: Vec<Meeting>) {
        self.script.lock().meetings.insert(year, meetings);
    }

    async fn respond<T>(&self, method: &'static str, data: Option<Vec<T>>) -> Result<Vec<T>> {
        *self.calls.lock().entry(method).or_default() += 1;

        let (delay, failing) = {
            let script = self.script.lock();
            (script.delay, script.failing.contains(method))
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if failing {
            return Err(TelemetryError::Http(format!("{} unavailable", method)));
        }
        Ok(data.unwrap_or_default())
    }
}

#[async_trait]
impl DataGateway for MockGateway {
    async fn fetch_sessions(&self, year: i32) -> Result<Vec<Session>> {
        let data = self.script.lock().sessions.get(&year).cloned();
        self.respond("sessions", data).await
    }

    async fn fetch_session_by_key(&self, session_key: u32) -> Result<Option<Session>> {
        let data = self.script.lock().sessions.values().flatten()
            .find(|s| s.session_key == session_key)
            .cloned()
            .map(|s| vec![s]);
        Ok(self.respond("session", data).await?.into_iter().next())
    }

    async fn fetch_drivers(&self, session_key: u32) -> Result<Vec<Driver>> {
        let data = self.script.lock().drivers.get(&session_key).cloned();
        self.respond("drivers", data).await
    }

    async fn fetch_laps(&self, session_key: u32, driver_number: u32) -> Result<Vec<Lap>> {
        let data = self.script.lock().laps.get(&(session_key, driver_number)).cloned();
        self.respond("laps", data).await
    }

    async fn fetch_car_data(&self, session_key: u32, driver_number: u32) -> Result<Vec<CarDataSample>> {
        let data = self
            .script
            .lock()
            .car_data
            .get(&(session_key, driver_number))
            .cloned();
        self.respond("car_data", data).await
    }

    async fn fetch_weather(&self, session_key: u32) -> Result<Vec<Weather>> {
        let data = self.script.lock().weather.get(&session_key).cloned();
        self.respond("weather", data).await
    }

    async fn fetch_positions(&self, session_key: u32) -> Result<Vec<Position>> {
        let data = self.script.lock().positions.get(&session_key).cloned();
        self.respond("positions", data).await
    }

    async fn fetch_meetings(&self, year: i32) -> Result<Vec<Meeting>> {
        let data = self.script.lock().meetings.get(&year).cloned();
        self.respond("meetings", data).await
    }
}

pub fn orchestrator(gateway: &Arc<MockGateway>) -> Arc<DataOrchestrator> {
    Arc::new(DataOrchestrator::with_gateway(gateway.clone()))
}

pub fn at(month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, month, day, hour, 0, 0).unwrap()
}

pub fn session(key: u32, meeting_key: u32, session_type: &str, start: DateTime<Utc>) -> Session {
    Session {
        session_key: key,
        session_name: session_type.to_string(),
        session_type: session_type.to_string(),
        date_start: start,
        date_end: start + ChronoDuration::hours(2),
        meeting_key,
        location: format!("Location {}", meeting_key),
        country_name: "Country".to_string(),
        country_code: "CC".to_string(),
        circuit_short_name: format!("Circuit {}", meeting_key),
        gmt_offset: "00:00:00".to_string(),
        year: 2024,
    }
}

pub fn meeting(key: u32, name: &str, start: DateTime<Utc>) -> Meeting {
    Meeting {
        meeting_key: key,
        meeting_name: name.to_string(),
        meeting_official_name: name.to_uppercase(),
        location: format!("Location {}", key),
        country_name: "Country".to_string(),
        country_code: "CC".to_string(),
        circuit_short_name: format!("Circuit {}", key),
        circuit_key: key,
        date_start: start,
        gmt_offset: "00:00:00".to_string(),
        year: 2024,
    }
}

pub fn driver(session_key: u32, number: u32, acronym: &str) -> Driver {
    Driver {
        session_key,
        driver_number: number,
        broadcast_name: acronym.to_string(),
        full_name: format!("Driver {}", acronym),
        name_acronym: acronym.to_string(),
        team_name: Some("Team".to_string()),
        team_colour: Some("3671C6".to_string()),
        country_code: None,
        headshot_url: None,
    }
}

pub fn lap(session_key: u32, driver_number: u32, number: u32, duration: Option<f64>) -> Lap {
    Lap {
        session_key,
        driver_number,
        lap_number: number,
        lap_duration: duration,
        sector_1: None,
        sector_2: None,
        sector_3: None,
        is_pit_out_lap: false,
        segments_sector_1: None,
        segments_sector_2: None,
        segments_sector_3: None,
        date_start: None,
    }
}

pub fn sample(session_key: u32, driver_number: u32, offset_ms: i64, speed: u32, brake: bool) -> CarDataSample {
    CarDataSample {
        session_key,
        driver_number,
        date: at(3, 2, 15) + ChronoDuration::milliseconds(offset_ms),
        speed,
        rpm: 11_000,
        n_gear: 7,
        throttle: if brake { 0 } else { 100 },
        brake,
        drs: 0,
    }
}

pub fn weather(session_key: u32, minute: i64, air: f64) -> Weather {
    Weather {
        session_key,
        date: at(3, 2, 15) + ChronoDuration::minutes(minute),
        air_temperature: air,
        track_temperature: air + 10.0,
        humidity: 40.0,
        pressure: 1012.0,
        rainfall: false,
        wind_direction: 90,
        wind_speed: 2.5,
    }
}
