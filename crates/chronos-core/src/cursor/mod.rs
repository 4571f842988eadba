//! Closeable iterators.
//!
//! Every range query in the workspace hands back a [`Cursor`]. A cursor
//! closes itself once exhausted; callers abandoning one early should call
//! [`Cursor::close`] (or drop it) so backends can release whatever the
//! cursor holds open.

mod filter;
mod simple;

pub use filter::{Filter, FilterCursor};
pub use simple::{EmptyCursor, SimpleCursor};

/// An iterator that can be closed before exhaustion.
pub trait Cursor: Iterator {
    /// Release the underlying resources. Idempotent; `next` yields `None` afterwards.
    fn close(&mut self);

    fn is_open(&self) -> bool;
}

impl<C: Cursor + ?Sized> Cursor for Box<C> {
    fn close(&mut self) {
        (**self).close()
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }
}

/// Type-erased cursor, the currency of the storage traits.
pub type BoxCursor<'a, T> = Box<dyn Cursor<Item = T> + 'a>;

/// Box any iterator as a self-closing cursor.
pub fn boxed<'a, It>(iter: It) -> BoxCursor<'a, It::Item>
where
    It: Iterator + 'a,
{
    Box::new(SimpleCursor::new(iter))
}
