//! Previous/next lookups over a collection kept in dataset order.

use serde::Serialize;
use crate::entities::{Designer, Post, Team, Video};

/// Anything that can be located in a collection by a string key.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for Post {
    fn key(&self) -> &str {
        self.id.as_str()
    }
}

impl Keyed for Video {
    fn key(&self) -> &str {
        self.id.as_str()
    }
}

impl Keyed for Team {
    fn key(&self) -> &str {
        self.id.as_str()
    }
}

impl Keyed for Designer {
    fn key(&self) -> &str {
        &self.name
    }
}

#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct Siblings<'a, T> {
    pub previous: Option<&'a T>,
    pub next: Option<&'a T>,
}

impl<'a, T> Siblings<'a, T> {
    fn none() -> Self {
        Self { previous: None, next: None }
    }
}

fn position<T: Keyed>(items: &[T], current: &str) -> Option<usize> {
    items.iter().position(|x| x.key() == current)
}

/// Linear paging: no previous for the first item, no next for the last one.
pub fn siblings<'a, T: Keyed>(items: &'a [T], current: &str) -> Siblings<'a, T> {
    let Some(index) = position(items, current) else {
        return Siblings::none();
    };
    Siblings {
        previous: index.checked_sub(1).and_then(|x| items.get(x)),
        next: items.get(index + 1),
    }
}

/// Carousel paging: wraps around both ends.
///
/// An unknown key is treated as sitting just before the first item, so its previous is the
/// last item and its next is the first one. Only an empty collection yields nothing.
pub fn circular_siblings<'a, T: Keyed>(items: &'a [T], current: &str) -> Siblings<'a, T> {
    if items.is_empty() {
        return Siblings::none();
    }
    let len = items.len();
    match position(items, current) {
        Some(index) => Siblings {
            previous: items.get((index + len - 1) % len),
            next: items.get((index + 1) % len),
        },
        None => Siblings {
            previous: items.last(),
            next: items.first(),
        },
    }
}

/// Items at the given signed offsets around `current`, wrapping around the collection.
/// Empty when `current` is not in the collection.
pub fn circular_window<'a, T: Keyed>(items: &'a [T], current: &str, offsets: &[isize]) -> Vec<&'a T> {
    let Some(index) = position(items, current) else {
        return Vec::new();
    };
    let len = items.len() as isize;
    offsets.iter()
        .filter_map(|offset| {
            let wrapped = (index as isize + offset).rem_euclid(len);
            items.get(wrapped as usize)
        })
        .collect()
}
