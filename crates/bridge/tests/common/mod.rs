#![allow(dead_code)]

//! In-memory [`TelemetryBackend`] with scriptable failures and call
//! counters, shared by the bridge integration tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tb_backend::{CommandRequest, CommandResponse, Dictionary, TelemetryBackend};
use tb_domain::command::{ArgumentSpec, CommandSchema, CommandSpec};
use tb_domain::config::Config;
use tb_domain::error::{Error, Result};
use tb_domain::{Entity, HistoryRange, ImageEntry, TelemetrySample};
use tb_bridge::TelemetryBridge;

pub struct FakeBackend {
    /// `None` makes the call fail with a transport error.
    pub entities: Mutex<Option<Vec<Entity>>>,
    pub dictionary: Mutex<Option<Dictionary>>,
    pub schema: Mutex<Option<CommandSchema>>,
    pub history: Mutex<Option<Vec<TelemetrySample>>>,
    pub images: Mutex<Option<Vec<ImageEntry>>>,
    pub command_response: Mutex<Option<CommandResponse>>,

    pub latest_delay: Mutex<Duration>,
    /// 1-based `latest` call numbers that fail.
    pub failing_latest: Mutex<HashSet<u32>>,
    /// 1-based `latest` call numbers answered without a timestamp.
    pub untimed_latest: Mutex<HashSet<u32>>,

    pub entity_calls: AtomicU32,
    pub dictionary_calls: AtomicU32,
    pub schema_calls: AtomicU32,
    pub history_calls: AtomicU32,
    pub latest_calls: AtomicU32,
    pub command_calls: AtomicU32,
    pub last_command: Mutex<Option<CommandRequest>>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            entities: Mutex::new(Some(vec![
                Entity::new("rover-7", "Rover Seven", "rover"),
                Entity::new("base-2", "Base Two", "base"),
            ])),
            dictionary: Mutex::new(Some(Dictionary::default())),
            schema: Mutex::new(Some(default_schema())),
            history: Mutex::new(Some(Vec::new())),
            images: Mutex::new(Some(Vec::new())),
            command_response: Mutex::new(Some(CommandResponse {
                status: "executed".into(),
                result: Some("ok".into()),
                error: None,
            })),
            latest_delay: Mutex::new(Duration::ZERO),
            failing_latest: Mutex::new(HashSet::new()),
            untimed_latest: Mutex::new(HashSet::new()),
            entity_calls: AtomicU32::new(0),
            dictionary_calls: AtomicU32::new(0),
            schema_calls: AtomicU32::new(0),
            history_calls: AtomicU32::new(0),
            latest_calls: AtomicU32::new(0),
            command_calls: AtomicU32::new(0),
            last_command: Mutex::new(None),
        })
    }

    pub fn count(counter: &AtomicU32) -> u32 {
        counter.load(Ordering::SeqCst)
    }

    pub fn network_calls(&self) -> u32 {
        [
            &self.entity_calls,
            &self.dictionary_calls,
            &self.schema_calls,
            &self.history_calls,
            &self.latest_calls,
            &self.command_calls,
        ]
        .iter()
        .map(|c| Self::count(c))
        .sum()
    }
}

fn down() -> Error {
    Error::Http("connection refused".into())
}

pub fn default_schema() -> CommandSchema {
    let mut schema = CommandSchema::new();
    schema.insert(
        "Rover Seven".into(),
        vec![
            CommandSpec {
                name: "STOP".into(),
                arguments: Vec::new(),
            },
            CommandSpec {
                name: "SET_MOTOR".into(),
                arguments: vec![ArgumentSpec::new("value", "float")],
            },
            CommandSpec {
                name: "GOTO".into(),
                arguments: vec![ArgumentSpec::new("target", "vector3")],
            },
        ],
    );
    schema.insert(
        "Sun".into(),
        vec![CommandSpec {
            name: "SET_ANGLE".into(),
            arguments: vec![ArgumentSpec::new("deg", "float")],
        }],
    );
    schema
}

pub fn bridge(backend: &Arc<FakeBackend>) -> TelemetryBridge {
    TelemetryBridge::new(backend.clone(), &Config::default())
}

#[async_trait]
impl TelemetryBackend for FakeBackend {
    async fn entities(&self) -> Result<Vec<Entity>> {
        self.entity_calls.fetch_add(1, Ordering::SeqCst);
        self.entities.lock().clone().ok_or_else(down)
    }

    async fn dictionary(&self) -> Result<Dictionary> {
        self.dictionary_calls.fetch_add(1, Ordering::SeqCst);
        self.dictionary.lock().clone().ok_or_else(down)
    }

    async fn history(&self, _entity_id: &str, _range: HistoryRange) -> Result<Vec<TelemetrySample>> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        self.history.lock().clone().ok_or_else(down)
    }

    async fn latest(&self, _entity_id: &str) -> Result<TelemetrySample> {
        let n = self.latest_calls.fetch_add(1, Ordering::SeqCst) + 1;
        let delay = *self.latest_delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if self.failing_latest.lock().contains(&n) {
            return Err(down());
        }
        if self.untimed_latest.lock().contains(&n) {
            return Ok(TelemetrySample::new().with("call", n));
        }
        Ok(TelemetrySample::new()
            .with("timestamp", i64::from(n) * 1000)
            .with("call", n))
    }

    async fn command_targets(&self) -> Result<CommandSchema> {
        self.schema_calls.fetch_add(1, Ordering::SeqCst);
        self.schema.lock().clone().ok_or_else(down)
    }

    async fn execute_command(&self, req: CommandRequest) -> Result<CommandResponse> {
        self.command_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_command.lock() = Some(req);
        self.command_response.lock().clone().ok_or_else(down)
    }

    async fn images(&self) -> Result<Vec<ImageEntry>> {
        self.images.lock().clone().ok_or_else(down)
    }
}
