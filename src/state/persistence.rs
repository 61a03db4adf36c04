use crate::state::storage::KeyValueStore;
use log::{debug, warn};
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};

#[derive(Debug)]
pub enum PersistCommand {
    Write { key: &'static str, value: String },
    Read { key: &'static str, reply: oneshot::Sender<Option<String>> },
    /// Answered once every command queued before it has been served.
    Flush { reply: oneshot::Sender<()> },
}

/// Cloneable handle the stores use to reach the persistence task.
///
/// Writes are queued and never awaited by the caller. If the task is gone
/// the command is dropped: reads come back absent and writes are lost, and
/// the in-memory state stays authoritative either way.
#[derive(Debug, Clone)]
pub struct Persister {
    commands: mpsc::UnboundedSender<PersistCommand>,
}

impl Persister {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<PersistCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { commands: tx }, rx)
    }

    /// A persister wired to its own worker task on the current runtime.
    pub fn spawn<S: KeyValueStore>(storage: S) -> Self {
        let (persister, commands) = Self::channel();
        tokio::spawn(PersistenceWorker::new(storage, commands).run());
        persister
    }

    pub fn write(&self, key: &'static str, value: String) {
        if self.commands.send(PersistCommand::Write { key, value }).is_err() {
            debug!("persistence task stopped; dropping write for {key}");
        }
    }

    pub fn write_json<T: Serialize + ?Sized>(&self, key: &'static str, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => self.write(key, json),
            Err(e) => warn!("could not serialize {key}: {e}"),
        }
    }

    pub async fn read(&self, key: &'static str) -> Option<String> {
        let (reply, rx) = oneshot::channel();
        self.commands.send(PersistCommand::Read { key, reply }).ok()?;
        rx.await.ok().flatten()
    }

    pub async fn flush(&self) {
        let (reply, rx) = oneshot::channel();
        if self.commands.send(PersistCommand::Flush { reply }).is_ok() {
            let _ = rx.await;
        }
    }
}

/// Owns the key-value store and serves commands in arrival order, so the
/// last queued write for a key is the one left on disk.
pub struct PersistenceWorker<S> {
    storage: S,
    commands: mpsc::UnboundedReceiver<PersistCommand>,
}

impl<S: KeyValueStore> PersistenceWorker<S> {
    pub fn new(storage: S, commands: mpsc::UnboundedReceiver<PersistCommand>) -> Self {
        Self { storage, commands }
    }

    pub async fn run(mut self) {
        while let Some(command) = self.commands.recv().await {
            self.handle(command);
        }
        debug!("persistence task finished");
    }

    fn handle(&mut self, command: PersistCommand) {
        match command {
            PersistCommand::Write { key, value } => {
                if let Err(e) = self.storage.set(key, &value) {
                    warn!("failed to persist {key}: {e}");
                } else {
                    debug!("persisted {key} ({} bytes)", value.len());
                }
            }
            PersistCommand::Read { key, reply } => {
                let value = self.storage.get(key).unwrap_or_else(|e| {
                    warn!("failed to read {key}: {e}");
                    None
                });
                let _ = reply.send(value);
            }
            PersistCommand::Flush { reply } => {
                let _ = reply.send(());
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::state::storage::MemoryStore;

    #[tokio::test]
    async fn flush_waits_for_queued_writes() {
        let (persister, store) = memory_persister();
        persister.write("favorites", "[]".into());
        persister.write_json("isDarkMode", &true);
        persister.flush().await;

        assert_eq!(store.get("favorites").unwrap().as_deref(), Some("[]"));
        assert_eq!(store.get("isDarkMode").unwrap().as_deref(), Some("true"));
    }

    #[tokio::test]
    async fn last_write_wins() {
        let (persister, store) = memory_persister();
        persister.write_json("isDarkMode", &true);
        persister.write_json("isDarkMode", &false);
        persister.flush().await;
        assert_eq!(store.get("isDarkMode").unwrap().as_deref(), Some("false"));
    }

    #[tokio::test]
    async fn read_sees_earlier_writes() {
        let (persister, _store) = memory_persister();
        persister.write("session", "null".into());
        assert_eq!(persister.read("session").await.as_deref(), Some("null"));
        assert_eq!(persister.read("favorites").await, None);
    }

    #[tokio::test]
    async fn failed_writes_are_swallowed() {
        let seeded = MemoryStore::new().with_entry("isDarkMode", "true");
        let persister = Persister::spawn(BrokenStore(seeded));
        persister.write_json("isDarkMode", &false);
        persister.flush().await;
        assert_eq!(persister.read("isDarkMode").await.as_deref(), Some("true"));
    }

    #[tokio::test]
    async fn closed_channel_degrades_quietly() {
        let (persister, commands) = Persister::channel();
        drop(commands);
        persister.write_json("isDarkMode", &true);
        persister.flush().await;
        assert_eq!(persister.read("isDarkMode").await, None);
    }
}
