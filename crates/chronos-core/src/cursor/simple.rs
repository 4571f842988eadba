use std::marker::PhantomData;

use super::Cursor;

/// Wraps a plain iterator. Dropping the iterator is how it closes, so any
/// resource the iterator owns is released on exhaustion or on `close`.
pub struct SimpleCursor<It> {
    inner: Option<It>,
}

impl<It: Iterator> SimpleCursor<It> {
    pub fn new(inner: It) -> Self {
        Self { inner: Some(inner) }
    }
}

impl<It: Iterator> Iterator for SimpleCursor<It> {
    type Item = It::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.inner.as_mut()?.next();
        if next.is_none() {
            self.inner = None;
        }
        next
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            Some(it) => it.size_hint(),
            None => (0, Some(0)),
        }
    }
}

impl<It: Iterator> Cursor for SimpleCursor<It> {
    fn close(&mut self) {
        self.inner = None;
    }

    fn is_open(&self) -> bool {
        self.inner.is_some()
    }
}

/// A cursor over nothing; born closed.
pub struct EmptyCursor<T>(PhantomData<T>);

impl<T> EmptyCursor<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for EmptyCursor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Iterator for EmptyCursor<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        None
    }
}

impl<T> Cursor for EmptyCursor<T> {
    fn close(&mut self) {}

    fn is_open(&self) -> bool {
        false
    }
}
