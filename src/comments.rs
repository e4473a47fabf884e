use std::path::PathBuf;
use std::sync::Arc;
use async_trait::async_trait;
use dashmap::DashMap;
use itertools::Itertools;
use log::{debug, error, info, warn};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use crate::entities::{Comment, CommentDraft, Year};
use crate::error::ShowcaseError;

/// Year-partitioned, append-only comment collection.
#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn read_all(&self, year: Year) -> Result<Vec<Comment>, ShowcaseError>;
    async fn push(&self, year: Year, comment: Comment) -> Result<(), ShowcaseError>;
}

/// One JSON line per comment in `<dir>/<year>.jsonl`.
pub struct FileCommentStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileCommentStore {
    pub fn new(dir: PathBuf) -> anyhow::Result<Self> {
        if !dir.exists() {
            std::fs::create_dir_all(&dir)?;
        }
        if !dir.is_dir() {
            anyhow::bail!("comment store path is not a directory");
        }
        info!("comment store: {}", dir.display());
        Ok(Self { dir, write_lock: Mutex::new(()) })
    }

    fn year_path(&self, year: Year) -> PathBuf {
        self.dir.join(format!("{}.jsonl", year))
    }
}

#[async_trait]
impl CommentStore for FileCommentStore {
    async fn read_all(&self, year: Year) -> Result<Vec<Comment>, ShowcaseError> {
        let file_str = match tokio::fs::read_to_string(self.year_path(year)).await {
            Ok(x) => x,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ShowcaseError::StoreIOError(e)),
        };
        let comments = file_str.split('\n')
            .enumerate()
            .filter(|(_, x)| !x.is_empty())
            .filter_map(|(index, x)| match serde_json::from_str::<Comment>(x) {
                Ok(comment) => Some(comment),
                Err(e) => {
                    warn!("skipping unreadable comment line {} for {}: {}", index + 1, year, e);
                    None
                }
            })
            .collect();
        Ok(comments)
    }

    async fn push(&self, year: Year, comment: Comment) -> Result<(), ShowcaseError> {
        let serialized_comment = serde_json::to_string(&comment)
            .map_err(ShowcaseError::StoreSerializationError)?;
        let line = format!("{}\n", serialized_comment);
        let _guard = self.write_lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new().create(true).append(true).open(self.year_path(year)).await
            .map_err(ShowcaseError::StoreIOError)?;
        tokio::io::AsyncWriteExt::write_all(&mut file, line.as_bytes()).await
            .map_err(ShowcaseError::StoreIOError)?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryCommentStore {
    comments: DashMap<Year, Vec<Comment>>,
}

#[async_trait]
impl CommentStore for InMemoryCommentStore {
    async fn read_all(&self, year: Year) -> Result<Vec<Comment>, ShowcaseError> {
        Ok(self.comments.get(&year).map(|x| x.value().clone()).unwrap_or_default())
    }

    async fn push(&self, year: Year, comment: Comment) -> Result<(), ShowcaseError> {
        self.comments.entry(year).or_default().push(comment);
        Ok(())
    }
}

pub type CommentSnapshot = Arc<Vec<Comment>>;

fn newest_first(comments: Vec<Comment>) -> Vec<Comment> {
    comments.into_iter()
        .sorted_by_key(|x| x.timestamp).rev()
        .collect()
}

/// Live, newest-first view over the comment store, one channel per year.
///
/// Every snapshot that ends up in a channel is read while holding `publish_lock`, so the
/// last one sent was read after every write that preceded it.
pub struct CommentFeed<S: CommentStore> {
    store: Arc<S>,
    channels: DashMap<Year, watch::Sender<CommentSnapshot>>,
    publish_lock: Mutex<()>,
}

impl<S: CommentStore + 'static> CommentFeed<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
            channels: DashMap::new(),
            publish_lock: Mutex::new(()),
        }
    }

    async fn snapshot(&self, year: Year) -> Result<CommentSnapshot, ShowcaseError> {
        let comments = self.store.read_all(year).await?;
        Ok(Arc::new(newest_first(comments)))
    }

    /// Current comments for `year`, newest first.
    pub async fn list(&self, year: Year) -> Result<CommentSnapshot, ShowcaseError> {
        self.snapshot(year).await
    }

    /// Registers a listener. The receiver starts at the current set and sees every later one.
    pub async fn watch(&self, year: Year) -> Result<CommentWatch, ShowcaseError> {
        let _guard = self.publish_lock.lock().await;
        if let Some(sender) = self.channels.get(&year) {
            return Ok(CommentWatch { year, receiver: sender.subscribe() });
        }
        self.prune();
        let snapshot = self.snapshot(year).await?;
        let receiver = self.channels.entry(year)
            .or_insert_with(|| watch::channel(snapshot).0)
            .subscribe();
        debug!("opened comment channel for {} ({} open)", year, self.channels.len());
        Ok(CommentWatch { year, receiver })
    }

    /// Calls `on_update` with the full sorted list now and after every change, until the
    /// returned [`Subscription`] is dropped or unsubscribed.
    pub async fn subscribe<F>(&self, year: Year, mut on_update: F) -> Result<Subscription, ShowcaseError>
    where
        F: FnMut(&[Comment]) + Send + 'static,
    {
        let mut watch = self.watch(year).await?;
        let token = CancellationToken::new();
        let child_token = token.clone();
        let handle = tokio::spawn(async move {
            on_update(watch.current().as_slice());
            loop {
                tokio::select! {
                    _ = child_token.cancelled() => break,
                    changed = watch.changed() => match changed {
                        Some(comments) => on_update(comments.as_slice()),
                        None => break,
                    },
                }
            }
        });
        Ok(Subscription { year, token, handle: Some(handle) })
    }

    /// Validates and writes a comment. The draft is only borrowed so a failed write leaves
    /// the caller's input intact for a retry.
    pub async fn append(&self, year: Year, draft: &CommentDraft) -> Result<Comment, ShowcaseError> {
        draft.validate()?;
        let comment = Comment {
            id: uuid::Uuid::new_v4().to_string(),
            name: draft.name.trim().to_string(),
            content: draft.content.trim().to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        };
        if let Err(e) = self.store.push(year, comment.clone()).await {
            error!("failed to append comment for {}: {}", year, e);
            return Err(e);
        }
        self.publish(year).await;
        Ok(comment)
    }

    async fn publish(&self, year: Year) {
        let _guard = self.publish_lock.lock().await;
        match self.channels.get(&year).map(|x| x.receiver_count()) {
            None => return,
            Some(0) => {
                self.channels.remove(&year);
                return;
            }
            Some(_) => (),
        }
        match self.snapshot(year).await {
            Ok(snapshot) => {
                if let Some(sender) = self.channels.get(&year) {
                    sender.send_replace(snapshot);
                }
            }
            Err(e) => error!("failed to refresh comments for {}: {}", year, e),
        }
    }

    /// Drops the channels nobody listens to anymore.
    fn prune(&self) {
        self.channels.retain(|_, sender| sender.receiver_count() > 0);
    }

    /// Number of live listeners for `year`.
    pub fn listener_count(&self, year: Year) -> usize {
        self.channels.get(&year).map(|x| x.receiver_count()).unwrap_or(0)
    }
}

/// Receiver side of a year's comment channel. Dropping it detaches the listener.
pub struct CommentWatch {
    year: Year,
    receiver: watch::Receiver<CommentSnapshot>,
}

impl CommentWatch {
    pub fn year(&self) -> Year {
        self.year
    }

    pub fn current(&mut self) -> CommentSnapshot {
        self.receiver.borrow_and_update().clone()
    }

    /// Waits for the next change. `None` once the feed is gone.
    pub async fn changed(&mut self) -> Option<CommentSnapshot> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }
}

/// Handle to a callback listener started by [`CommentFeed::subscribe`].
pub struct Subscription {
    year: Year,
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl Subscription {
    pub fn year(&self) -> Year {
        self.year
    }

    /// Stops the listener and waits until its callback can no longer run.
    pub async fn unsubscribe(mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use crate::error::{ErrorKind, ValidationError};

    const YEAR: Year = Year::new(2025);

    struct FailingStore;

    #[async_trait]
    impl CommentStore for FailingStore {
        async fn read_all(&self, _year: Year) -> Result<Vec<Comment>, ShowcaseError> {
            Ok(Vec::new())
        }

        async fn push(&self, _year: Year, _comment: Comment) -> Result<(), ShowcaseError> {
            Err(ShowcaseError::StoreIOError(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "offline")))
        }
    }

    /// In-memory store whose second read answers late, with what it saw before sleeping.
    #[derive(Default)]
    struct LaggingStore {
        inner: InMemoryCommentStore,
        reads: std::sync::atomic::AtomicUsize,
    }

    #[async_trait]
    impl CommentStore for LaggingStore {
        async fn read_all(&self, year: Year) -> Result<Vec<Comment>, ShowcaseError> {
            let read = self.reads.fetch_add(1, std::sync::atomic::Ordering::SeqCst) + 1;
            let comments = self.inner.read_all(year).await?;
            if read == 2 {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
            Ok(comments)
        }

        async fn push(&self, year: Year, comment: Comment) -> Result<(), ShowcaseError> {
            self.inner.push(year, comment).await
        }
    }

    fn comment(id: &str, timestamp: i64) -> Comment {
        Comment { id: id.to_string(), name: "가".to_string(), content: "축하합니다".to_string(), timestamp }
    }

    #[tokio::test]
    async fn test_list_sorted_newest_first() {
        let store = InMemoryCommentStore::default();
        store.push(YEAR, comment("old", 1)).await.unwrap();
        store.push(YEAR, comment("new", 3)).await.unwrap();
        store.push(YEAR, comment("mid", 2)).await.unwrap();
        let feed = CommentFeed::new(store);
        let ids = feed.list(YEAR).await.unwrap().iter().map(|x| x.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[tokio::test]
    async fn test_invalid_draft_never_reaches_store() {
        let feed = CommentFeed::new(InMemoryCommentStore::default());
        let err = feed.append(YEAR, &CommentDraft::new("", "pw", "축하합니다")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(matches!(err, ShowcaseError::Validation(ValidationError::MissingName)));
        assert!(feed.list(YEAR).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_appears_first_in_next_delivery() {
        let store = InMemoryCommentStore::default();
        store.push(YEAR, comment("earlier", 1)).await.unwrap();
        let feed = CommentFeed::new(store);
        let mut watch = feed.watch(YEAR).await.unwrap();
        assert_eq!(watch.current().len(), 1);

        let appended = feed.append(YEAR, &CommentDraft::new("가", "pw", "축하합니다")).await.unwrap();
        let delivered = watch.changed().await.unwrap();
        assert_eq!(delivered.len(), 2);
        assert_eq!(delivered[0], appended);
        assert_eq!(delivered[0].content, "축하합니다");
    }

    #[tokio::test]
    async fn test_years_are_isolated() {
        let feed = CommentFeed::new(InMemoryCommentStore::default());
        feed.append(YEAR, &CommentDraft::new("가", "pw", "2025")).await.unwrap();
        assert!(feed.list(Year::new(2023)).await.unwrap().is_empty());
        assert_eq!(feed.list(YEAR).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_keeps_draft() {
        let feed = CommentFeed::new(FailingStore);
        let draft = CommentDraft::new("가", "pw", "축하합니다");
        let err = feed.append(YEAR, &draft).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(draft, CommentDraft::new("가", "pw", "축하합니다"));
    }

    #[tokio::test]
    async fn test_subscribe_delivers_and_unsubscribe_detaches() {
        let feed = CommentFeed::new(InMemoryCommentStore::default());
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<Vec<Comment>>();
        let subscription = feed.subscribe(YEAR, move |comments| {
            let _ = tx.send(comments.to_vec());
        }).await.unwrap();
        assert_eq!(subscription.year(), YEAR);

        let initial = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await.unwrap().unwrap();
        assert!(initial.is_empty());
        assert_eq!(feed.listener_count(YEAR), 1);

        feed.append(YEAR, &CommentDraft::new("가", "pw", "축하합니다")).await.unwrap();
        let update = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await.unwrap().unwrap();
        assert_eq!(update.len(), 1);

        subscription.unsubscribe().await;
        assert_eq!(feed.listener_count(YEAR), 0);
        feed.append(YEAR, &CommentDraft::new("나", "pw", "또 축하")).await.unwrap();
        // the callback (and its sender) is gone, so the channel is closed
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_late_read_never_replaces_newer_list() {
        let feed = Arc::new(CommentFeed::new(LaggingStore::default()));
        let mut watch = feed.watch(YEAR).await.unwrap();
        assert!(watch.current().is_empty());

        let first = {
            let feed = feed.clone();
            tokio::spawn(async move { feed.append(YEAR, &CommentDraft::new("가", "pw", "first")).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        feed.append(YEAR, &CommentDraft::new("나", "pw", "second")).await.unwrap();
        first.await.unwrap().unwrap();

        assert_eq!(feed.list(YEAR).await.unwrap().len(), 2);
        assert_eq!(watch.current().len(), 2);
    }

    #[tokio::test]
    async fn test_append_before_first_watch_is_included() {
        let feed = CommentFeed::new(LaggingStore::default());
        feed.append(YEAR, &CommentDraft::new("가", "pw", "early")).await.unwrap();
        let mut watch = feed.watch(YEAR).await.unwrap();
        assert_eq!(watch.current().len(), 1);
    }

    #[tokio::test]
    async fn test_idle_channels_are_released() {
        let feed = CommentFeed::new(InMemoryCommentStore::default());
        let old = feed.watch(Year::new(1999)).await.unwrap();
        drop(old);
        let _current = feed.watch(YEAR).await.unwrap();
        assert_eq!(feed.channels.len(), 1);
        assert!(!feed.channels.contains_key(&Year::new(1999)));

        let other = feed.watch(Year::new(2023)).await.unwrap();
        drop(other);
        feed.append(Year::new(2023), &CommentDraft::new("가", "pw", "late")).await.unwrap();
        assert!(!feed.channels.contains_key(&Year::new(2023)));
        assert_eq!(feed.listener_count(YEAR), 1);
    }

    #[tokio::test]
    async fn test_unreadable_line_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCommentStore::new(dir.path().to_path_buf()).unwrap();
        store.push(YEAR, comment("kept", 1)).await.unwrap();
        std::fs::OpenOptions::new()
            .append(true)
            .open(dir.path().join("2025.jsonl"))
            .and_then(|mut file| std::io::Write::write_all(&mut file, b"{\"id\":\"torn\",\"na"))
            .unwrap();

        let comments = store.read_all(YEAR).await.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].id, "kept");
    }

    #[tokio::test]
    async fn test_dropping_watch_detaches() {
        let feed = CommentFeed::new(InMemoryCommentStore::default());
        let first = feed.watch(YEAR).await.unwrap();
        let second = feed.watch(YEAR).await.unwrap();
        assert_eq!(feed.listener_count(YEAR), 2);
        drop(first);
        assert_eq!(feed.listener_count(YEAR), 1);
        drop(second);
        assert_eq!(feed.listener_count(YEAR), 0);
    }

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCommentStore::new(dir.path().join("comments")).unwrap();
        assert!(store.read_all(YEAR).await.unwrap().is_empty());
        let feed = CommentFeed::new(store);
        feed.append(YEAR, &CommentDraft::new(" 가 ", "pw", "첫 번째")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(2)).await;
        feed.append(YEAR, &CommentDraft::new("나", "pw", "두 번째")).await.unwrap();

        let comments = feed.list(YEAR).await.unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].content, "두 번째");
        assert_eq!(comments[1].name, "가");
        let raw = std::fs::read_to_string(dir.path().join("comments").join("2025.jsonl")).unwrap();
        assert!(!raw.contains("pw"));
    }
}
