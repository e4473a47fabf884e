//! State of one page instance: the active year, its dataset, and its comment listener.
//!
//! A load result is committed only when the ticket it was started with is still the latest
//! one, so a slow response for a year the visitor already left never overwrites newer state.

use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;
use log::{debug, error};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use crate::comments::{CommentFeed, CommentSnapshot, CommentStore, Subscription};
use crate::entities::{Dataset, Year};
use crate::error::{ErrorKind, ShowcaseError};
use crate::loader::DatasetLoader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    year: Year,
    generation: u64,
}

impl LoadTicket {
    pub fn year(&self) -> Year {
        self.year
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageState<T> {
    Idle,
    Loading { year: Year },
    Ready { year: Year, value: Arc<T> },
    Failed { year: Year, kind: ErrorKind, message: String },
}

impl<T> PageState<T> {
    pub fn year(&self) -> Option<Year> {
        match self {
            PageState::Idle => None,
            PageState::Loading { year } | PageState::Ready { year, .. } | PageState::Failed { year, .. } => Some(*year),
        }
    }
}

struct Slot<T> {
    generation: u64,
    state: PageState<T>,
}

/// A value that belongs to whichever year was selected last.
pub struct YearScoped<T> {
    slot: Mutex<Slot<T>>,
}

impl<T> Default for YearScoped<T> {
    fn default() -> Self {
        Self { slot: Mutex::new(Slot { generation: 0, state: PageState::Idle }) }
    }
}

impl<T> YearScoped<T> {
    /// Makes `year` the active one and returns the ticket its load must present.
    pub async fn begin(&self, year: Year) -> LoadTicket {
        let mut slot = self.slot.lock().await;
        slot.generation += 1;
        slot.state = PageState::Loading { year };
        LoadTicket { year, generation: slot.generation }
    }

    /// Applies a load result. Returns `false` (and changes nothing) for a stale ticket.
    pub async fn commit(&self, ticket: LoadTicket, result: Result<T, ShowcaseError>) -> bool {
        let mut slot = self.slot.lock().await;
        let active_year = slot.state.year();
        if ticket.generation != slot.generation || active_year != Some(ticket.year) {
            debug!("dropping stale result for {} (active: {:?})", ticket.year, active_year);
            return false;
        }
        slot.state = match result {
            Ok(value) => PageState::Ready { year: ticket.year, value: Arc::new(value) },
            Err(e) => PageState::Failed { year: ticket.year, kind: e.kind(), message: e.to_string() },
        };
        true
    }

    pub async fn reset(&self) {
        let mut slot = self.slot.lock().await;
        slot.generation += 1;
        slot.state = PageState::Idle;
    }
}

impl<T> YearScoped<T> {
    pub async fn state(&self) -> PageState<T> {
        let slot = self.slot.lock().await;
        match &slot.state {
            PageState::Idle => PageState::Idle,
            PageState::Loading { year } => PageState::Loading { year: *year },
            PageState::Ready { year, value } => PageState::Ready { year: *year, value: value.clone() },
            PageState::Failed { year, kind, message } => PageState::Failed { year: *year, kind: *kind, message: message.clone() },
        }
    }
}

/// One visitor's page: switching years reloads the dataset and moves the comment listener.
pub struct PageSession<S: CommentStore + 'static> {
    loader: DatasetLoader,
    feed: Arc<CommentFeed<S>>,
    dataset: Arc<YearScoped<Dataset>>,
    active_year: Arc<AtomicU16>,
    comments: Arc<watch::Sender<CommentSnapshot>>,
    subscription: Mutex<Option<Subscription>>,
}

impl<S: CommentStore + 'static> PageSession<S> {
    pub fn new(loader: DatasetLoader, feed: Arc<CommentFeed<S>>) -> Self {
        let (comments, _) = watch::channel(CommentSnapshot::default());
        Self {
            loader,
            feed,
            dataset: Arc::new(YearScoped::default()),
            active_year: Arc::new(AtomicU16::new(0)),
            comments: Arc::new(comments),
            subscription: Mutex::new(None),
        }
    }

    /// Selects `year`: the previous listener is released, a new one attached, and the
    /// dataset fetched in the background. The handle resolves to whether the result was applied.
    pub async fn navigate(&self, year: Year) -> JoinHandle<bool> {
        self.active_year.store(year.value(), Ordering::SeqCst);
        let ticket = self.dataset.begin(year).await;
        self.attach_comments(year).await;

        let loader = self.loader.clone();
        let dataset = self.dataset.clone();
        tokio::spawn(async move {
            let result = loader.load(ticket.year()).await;
            dataset.commit(ticket, result).await
        })
    }

    async fn attach_comments(&self, year: Year) {
        let mut subscription = self.subscription.lock().await;
        if let Some(previous) = subscription.take() {
            previous.unsubscribe().await;
        }
        self.comments.send_replace(CommentSnapshot::default());

        let active_year = self.active_year.clone();
        let sink = self.comments.clone();
        let result = self.feed.subscribe(year, move |comments| {
            if active_year.load(Ordering::SeqCst) == year.value() {
                sink.send_replace(Arc::new(comments.to_vec()));
            }
        }).await;
        match result {
            Ok(x) => *subscription = Some(x),
            Err(e) => error!("comment feed unavailable for {}: {}", year, e),
        }
    }

    pub async fn dataset(&self) -> PageState<Dataset> {
        self.dataset.state().await
    }

    pub fn comments(&self) -> CommentSnapshot {
        self.comments.borrow().clone()
    }

    /// Leaves the page: releases the comment listener and forgets pending loads.
    pub async fn close(&self) {
        self.active_year.store(0, Ordering::SeqCst);
        if let Some(subscription) = self.subscription.lock().await.take() {
            subscription.unsubscribe().await;
        }
        self.dataset.reset().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use async_trait::async_trait;
    use crate::comments::InMemoryCommentStore;
    use crate::entities::CommentDraft;
    use crate::loader::DatasetSource;

    /// Serves a one-designer document per year; 2023 answers slowly.
    struct SlowSource;

    #[async_trait]
    impl DatasetSource for SlowSource {
        async fn fetch(&self, year: Year) -> Result<Vec<u8>, ShowcaseError> {
            if year == Year::new(2023) {
                tokio::time::sleep(Duration::from_millis(200)).await;
            }
            if year == Year::new(1999) {
                return Err(ShowcaseError::DatasetNotFound(year));
            }
            Ok(format!(r#"{{ "designers": [{{ "name": "designer-{}" }}] }}"#, year).into_bytes())
        }
    }

    fn session() -> (PageSession<InMemoryCommentStore>, Arc<CommentFeed<InMemoryCommentStore>>) {
        let feed = Arc::new(CommentFeed::new(InMemoryCommentStore::default()));
        let loader = DatasetLoader::new(Arc::new(SlowSource), Year::new(2025));
        (PageSession::new(loader, feed.clone()), feed)
    }

    #[tokio::test]
    async fn test_commit_rejects_stale_ticket() {
        let scoped: YearScoped<u32> = YearScoped::default();
        let old = scoped.begin(Year::new(2023)).await;
        let new = scoped.begin(Year::new(2025)).await;
        assert!(!scoped.commit(old, Ok(1)).await);
        assert!(scoped.commit(new, Ok(2)).await);
        match scoped.state().await {
            PageState::Ready { year, value } => {
                assert_eq!(year, Year::new(2025));
                assert_eq!(*value, 2);
            }
            other => panic!("unexpected state: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_late_response_for_previous_year_is_ignored() {
        let (session, _) = session();
        let slow = session.navigate(Year::new(2023)).await;
        let fast = session.navigate(Year::new(2025)).await;
        assert!(fast.await.unwrap());
        assert!(!slow.await.unwrap());
        match session.dataset().await {
            PageState::Ready { year, value } => {
                assert_eq!(year, Year::new(2025));
                assert_eq!(value.designers[0].name, "designer-2025");
            }
            other => panic!("unexpected state: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failed_load_is_recorded() {
        let (session, _) = session();
        assert!(session.navigate(Year::new(1999)).await.await.unwrap());
        match session.dataset().await {
            PageState::Failed { kind, .. } => assert_eq!(kind, ErrorKind::NotFound),
            other => panic!("unexpected state: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_year_change_moves_comment_listener() {
        let (session, feed) = session();
        session.navigate(Year::new(2025)).await.await.unwrap();
        assert_eq!(feed.listener_count(Year::new(2025)), 1);

        feed.append(Year::new(2025), &CommentDraft::new("가", "pw", "축하합니다")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(session.comments().len(), 1);

        session.navigate(Year::new(2024)).await.await.unwrap();
        assert_eq!(feed.listener_count(Year::new(2025)), 0);
        assert_eq!(feed.listener_count(Year::new(2024)), 1);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(session.comments().is_empty());

        session.close().await;
        assert_eq!(feed.listener_count(Year::new(2024)), 0);
        assert_eq!(session.dataset().await, PageState::Idle);
    }
}
