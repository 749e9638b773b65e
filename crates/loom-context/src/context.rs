//! The durable, append-only conversation context (spec §4.2, component C2).

use std::collections::HashMap;
use std::path::Path;

use loom_core::{CheckpointId, Message};

use crate::error::{ContextError, ContextResult};
use crate::journal::{Journal, JournalLine};

/// The in-memory conversation history, backed by an append-only journal file.
///
/// `Context` is not `Clone`; callers hold it behind whatever synchronization
/// the embedding loop needs (spec's agent loop owns a single `Context` per
/// session and never shares it across turns concurrently).
pub struct Context {
    messages: Vec<Message>,
    token_count: u64,
    next_checkpoint_id: CheckpointId,
    /// Prefix length of `messages` at the first time each checkpoint id was
    /// issued, kept live so `revert_to` can resolve a rewind without
    /// re-reading the journal.
    prefix_lens: HashMap<CheckpointId, usize>,
    journal: Journal,
}

impl Context {
    /// Open (or create) the journal at `path` and replay it to recover state.
    pub async fn open(path: impl AsRef<Path>) -> ContextResult<Self> {
        let path = path.as_ref().to_path_buf();
        let lines = Journal::read_all(&path).await?;
        let replayed = replay(lines);
        let journal = Journal::open(&path).await?;
        Ok(Self {
            messages: replayed.messages,
            token_count: replayed.token_count,
            next_checkpoint_id: replayed.next_checkpoint_id,
            prefix_lens: replayed.prefix_lens,
            journal,
        })
    }

    /// The current message history, in order.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The last reported prompt-token count.
    #[must_use]
    pub fn token_count(&self) -> u64 {
        self.token_count
    }

    /// Append a message to both the in-memory history and the journal.
    pub async fn append_message(&mut self, message: Message) -> ContextResult<()> {
        let line = JournalLine::from_message(&message);
        self.journal.append(&line).await?;
        self.messages.push(message);
        Ok(())
    }

    /// Record the current token usage as reported by the LLM provider.
    pub async fn update_token_count(&mut self, token_count: u64) -> ContextResult<()> {
        self.journal
            .append(&JournalLine::Usage { token_count })
            .await?;
        self.token_count = token_count;
        Ok(())
    }

    /// Mark the current message-history length as a checkpoint, returning its id.
    ///
    /// Checkpoint ids are monotonically increasing for ordinary checkpoints;
    /// see [`Self::revert_to`] for the compensating-record rewind case.
    pub async fn checkpoint(&mut self) -> ContextResult<CheckpointId> {
        let id = self.next_checkpoint_id;
        self.journal.append(&JournalLine::Checkpoint { id }).await?;
        self.prefix_lens.insert(id, self.messages.len());
        self.next_checkpoint_id += 1;
        Ok(id)
    }

    /// Rewind the in-memory history to the state recorded at checkpoint `id`
    /// (the D-Mail operation, spec §6).
    ///
    /// The journal is append-only: this does not truncate the file. Instead
    /// it appends a *compensating* checkpoint record that reuses `id`, which
    /// [`Self::open`]'s replay recognizes as a rewind signal rather than a
    /// new forward checkpoint.
    pub async fn revert_to(&mut self, id: CheckpointId) -> ContextResult<()> {
        let prefix_len = *self
            .prefix_lens
            .get(&id)
            .ok_or(ContextError::UnknownCheckpoint(id))?;
        self.journal.append(&JournalLine::Checkpoint { id }).await?;
        self.messages.truncate(prefix_len);
        Ok(())
    }

    /// fsync the journal. Callers invoke this at step-commit boundaries
    /// (spec: "writers MUST fsync at end-of-step"), not after every append.
    pub async fn commit(&mut self) -> ContextResult<()> {
        self.journal.commit().await
    }

    /// Replace the in-memory history with `new_history` (a compaction
    /// strategy's output), recording the replacement as a `_compact` marker
    /// followed by the new messages so the journal remains append-only.
    ///
    /// Checkpoint ids issued before this call no longer resolve: their
    /// recorded prefix lengths index into history this call discards.
    pub async fn compact(&mut self, new_history: Vec<Message>) -> ContextResult<()> {
        self.journal.append(&JournalLine::Compact).await?;
        for message in &new_history {
            self.journal.append(&JournalLine::from_message(message)).await?;
        }
        self.messages = new_history;
        self.prefix_lens.clear();
        Ok(())
    }
}

/// Result of replaying a journal's lines back into memory.
struct Replayed {
    messages: Vec<Message>,
    token_count: u64,
    next_checkpoint_id: CheckpointId,
    prefix_lens: HashMap<CheckpointId, usize>,
}

/// Replay journal lines into a [`Replayed`] state.
///
/// Implements the "highest-checkpoint-wins" rewind rule: a checkpoint record
/// whose id is less than or equal to the running maximum truncates the
/// in-memory message list back to that id's first-seen prefix length; a
/// checkpoint record whose id exceeds the running maximum is an ordinary
/// forward checkpoint.
fn replay(lines: Vec<JournalLine>) -> Replayed {
    let mut messages = Vec::new();
    let mut token_count = 0u64;
    let mut prefix_lens: HashMap<CheckpointId, usize> = HashMap::new();
    let mut max_seen: Option<CheckpointId> = None;

    for line in lines {
        match line {
            JournalLine::Checkpoint { id } => match max_seen {
                Some(max) if id <= max => {
                    if let Some(&len) = prefix_lens.get(&id) {
                        messages.truncate(len);
                    }
                },
                _ => {
                    prefix_lens.insert(id, messages.len());
                    max_seen = Some(id);
                },
            },
            JournalLine::Usage { token_count: t } => token_count = t,
            JournalLine::Compact => {
                messages.clear();
                prefix_lens.clear();
            },
            line @ (JournalLine::User { .. }
            | JournalLine::Assistant { .. }
            | JournalLine::Tool { .. }
            | JournalLine::System { .. }) => {
                if let Some(msg) = line.into_message() {
                    messages.push(msg);
                }
            },
        }
    }

    let next_checkpoint_id = max_seen.map_or(0, |m| m + 1);
    Replayed {
        messages,
        token_count,
        next_checkpoint_id,
        prefix_lens,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn open_in(dir: &tempfile::TempDir) -> Context {
        Context::open(dir.path().join("context.jsonl")).await.unwrap()
    }

    #[tokio::test]
    async fn journal_round_trips_messages_and_usage() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut ctx = open_in(&dir).await;
            ctx.append_message(Message::user("hi")).await.unwrap();
            ctx.append_message(Message::assistant_text("hello")).await.unwrap();
            ctx.update_token_count(42).await.unwrap();
            ctx.commit().await.unwrap();
        }
        let ctx = open_in(&dir).await;
        assert_eq!(ctx.messages().len(), 2);
        assert_eq!(ctx.messages()[0].text(), "hi");
        assert_eq!(ctx.messages()[1].text(), "hello");
        assert_eq!(ctx.token_count(), 42);
    }

    #[tokio::test]
    async fn checkpoint_ids_are_monotonic() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = open_in(&dir).await;
        let a = ctx.checkpoint().await.unwrap();
        ctx.append_message(Message::user("x")).await.unwrap();
        let b = ctx.checkpoint().await.unwrap();
        assert!(b > a);
    }

    #[tokio::test]
    async fn revert_to_truncates_messages_and_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("context.jsonl");
        {
            let mut ctx = Context::open(&path).await.unwrap();
            ctx.append_message(Message::user("one")).await.unwrap();
            let checkpoint = ctx.checkpoint().await.unwrap();
            ctx.append_message(Message::user("two")).await.unwrap();
            ctx.append_message(Message::user("three")).await.unwrap();
            ctx.revert_to(checkpoint).await.unwrap();
            ctx.commit().await.unwrap();
            assert_eq!(ctx.messages().len(), 1);
        }
        // The journal is append-only: reopening replays the compensating
        // checkpoint record and arrives at the same reverted state.
        let ctx = Context::open(&path).await.unwrap();
        assert_eq!(ctx.messages().len(), 1);
        assert_eq!(ctx.messages()[0].text(), "one");
    }

    #[tokio::test]
    async fn revert_to_unknown_checkpoint_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = open_in(&dir).await;
        let err = ctx.revert_to(999).await.unwrap_err();
        assert!(matches!(err, ContextError::UnknownCheckpoint(999)));
    }

    #[tokio::test]
    async fn revert_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = open_in(&dir).await;
        ctx.append_message(Message::user("one")).await.unwrap();
        let checkpoint = ctx.checkpoint().await.unwrap();
        ctx.append_message(Message::user("two")).await.unwrap();
        ctx.revert_to(checkpoint).await.unwrap();
        ctx.revert_to(checkpoint).await.unwrap();
        assert_eq!(ctx.messages().len(), 1);
    }

    #[tokio::test]
    async fn compact_replaces_history_and_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("context.jsonl");
        {
            let mut ctx = Context::open(&path).await.unwrap();
            ctx.append_message(Message::user("one")).await.unwrap();
            ctx.append_message(Message::assistant_text("two")).await.unwrap();
            ctx.append_message(Message::user("three")).await.unwrap();
            ctx.compact(vec![Message::system("summary of one/two/three")])
                .await
                .unwrap();
            ctx.commit().await.unwrap();
            assert_eq!(ctx.messages().len(), 1);
        }
        let ctx = Context::open(&path).await.unwrap();
        assert_eq!(ctx.messages().len(), 1);
        assert_eq!(ctx.messages()[0].text(), "summary of one/two/three");
    }

    #[tokio::test]
    async fn checkpoints_issued_before_compact_no_longer_resolve() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = open_in(&dir).await;
        ctx.append_message(Message::user("one")).await.unwrap();
        let checkpoint = ctx.checkpoint().await.unwrap();
        ctx.compact(vec![Message::system("summary")]).await.unwrap();
        let err = ctx.revert_to(checkpoint).await.unwrap_err();
        assert!(matches!(err, ContextError::UnknownCheckpoint(_)));
    }

    #[tokio::test]
    async fn truncated_trailing_line_is_discarded_on_restore() {
        use tokio::io::AsyncWriteExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("context.jsonl");
        {
            let mut ctx = Context::open(&path).await.unwrap();
            ctx.append_message(Message::user("good")).await.unwrap();
            ctx.commit().await.unwrap();
        }
        // Simulate a crash mid-write: append a non-JSON tail fragment.
        let mut file = tokio::fs::OpenOptions::new()
            .append(true)
            .open(&path)
            .await
            .unwrap();
        file.write_all(b"{\"role\":\"user\", \"pa").await.unwrap();
        file.flush().await.unwrap();

        let ctx = Context::open(&path).await.unwrap();
        assert_eq!(ctx.messages().len(), 1);
        assert_eq!(ctx.messages()[0].text(), "good");
    }
}
