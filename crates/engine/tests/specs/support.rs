use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tailer_config::{TailerConfig, TailerConfigSchema};
use tailer_core::identity::IdentityKey;
use tailer_core::{CursorUpdate, FileInfo, PublishError, Publisher, TailEvent};
use tailer_engine::TailEngine;

pub struct RecordingPublisher {
    events: Mutex<Vec<TailEvent>>,
}

impl RecordingPublisher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self { events: Mutex::new(Vec::new()) })
    }

    pub fn events(&self) -> Vec<TailEvent> {
        self.events.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.events.lock().iter().map(|e| e.message.clone()).collect()
    }
}

#[async_trait::async_trait]
impl Publisher for RecordingPublisher {
    async fn publish(&self, event: TailEvent, _cursor: CursorUpdate) -> Result<(), PublishError> {
        self.events.lock().push(event);
        Ok(())
    }
}

/// Drives a real `TailEngine` against a tempdir, with its run loop spawned
/// as a background task for the harness's lifetime.
pub struct Harness {
    pub dir: tempfile::TempDir,
    pub engine: Arc<TailEngine>,
    pub publisher: Arc<RecordingPublisher>,
    run_task: Option<tokio::task::JoinHandle<()>>,
}

impl Harness {
    pub fn start(mutate: impl FnOnce(&mut TailerConfigSchema)) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut schema = TailerConfigSchema {
            paths: vec![dir.path().join("*.log*").to_string_lossy().to_string()],
            scanner: tailer_config::ScannerConfig { check_interval: Duration::from_millis(20), ..Default::default() },
            ..TailerConfigSchema::default()
        };
        mutate(&mut schema);

        let config = TailerConfig::from_schema(schema).unwrap();
        let publisher = RecordingPublisher::new();
        let engine = Arc::new(TailEngine::new(config, &dir.path().join("state.wal"), publisher.clone()).unwrap());

        let run_task = {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move {
                let _ = engine.run().await;
            })
        };

        Self { dir, engine, publisher, run_task: Some(run_task) }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write(&self, name: &str, content: &[u8]) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn append(&self, name: &str, content: &[u8]) {
        use std::io::Write as _;
        let mut f = std::fs::OpenOptions::new().append(true).open(self.path(name)).unwrap();
        f.write_all(content).unwrap();
    }

    pub fn truncate(&self, name: &str) {
        let f = std::fs::OpenOptions::new().write(true).open(self.path(name)).unwrap();
        f.set_len(0).unwrap();
    }

    pub fn os_identity_key(&self, name: &str) -> IdentityKey {
        let metadata = std::fs::metadata(self.path(name)).unwrap();
        let info = FileInfo::from_metadata(&metadata).unwrap();
        Arc::from(info.os_identity.as_key().as_str())
    }

    pub fn offset_for(&self, key: &IdentityKey) -> Option<u64> {
        self.engine.state_store().find_meta(key).map(|record| record.cursor.offset)
    }

    pub async fn wait_for_messages(&self, count: usize, timeout: Duration) {
        tokio::time::timeout(timeout, async {
            loop {
                if self.publisher.messages().len() >= count {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("timed out waiting for published messages");
    }

    pub async fn settle(&self, extra: Duration) {
        tokio::time::sleep(extra).await;
    }

    pub async fn shutdown(mut self) {
        self.engine.shutdown().await;
        if let Some(task) = self.run_task.take() {
            let _ = task.await;
        }
    }
}
