use std::convert::Infallible;
use axum::response::sse::Event;
use futures_util::stream::{self, Stream};
use log::{debug, error};
use crate::comments::{CommentSnapshot, CommentWatch};

pub const COMMENTS_EVENT: &str = "comments";

/// Full sorted list on subscribe, then again after every change.
///
/// The stream owns the watch, so the listener is detached as soon as the
/// connection is closed and the response body dropped.
pub fn comment_events(watch: CommentWatch) -> impl Stream<Item = Result<Event, Infallible>> {
    stream::unfold((watch, true), |(mut watch, first)| async move {
        let comments = if first {
            watch.current()
        } else {
            watch.changed().await?
        };
        debug!("pushing {} comments for {}", comments.len(), watch.year());
        Some((Ok(to_event(&comments)), (watch, false)))
    })
}

fn to_event(comments: &CommentSnapshot) -> Event {
    match Event::default().event(COMMENTS_EVENT).json_data(comments.as_slice()) {
        Ok(event) => event,
        Err(e) => {
            error!("failed to encode comment event: {}", e);
            Event::default().event(COMMENTS_EVENT).data("[]")
        }
    }
}
