use super::Cursor;

/// Verdict of a [`FilterCursor`] predicate on one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    Show,
    Hide,
    /// Close the cursor; no further elements are produced.
    Stop,
}

/// Yields the elements of `inner` the predicate shows, and closes as soon
/// as the predicate answers [`Filter::Stop`].
pub struct FilterCursor<C, F> {
    inner: C,
    predicate: F,
    open: bool,
}

impl<C, F> FilterCursor<C, F>
where
    C: Cursor,
    F: FnMut(&C::Item) -> Filter,
{
    pub fn new(inner: C, predicate: F) -> Self {
        Self {
            inner,
            predicate,
            open: true,
        }
    }
}

impl<C, F> Iterator for FilterCursor<C, F>
where
    C: Cursor,
    F: FnMut(&C::Item) -> Filter,
{
    type Item = C::Item;

    fn next(&mut self) -> Option<C::Item> {
        if !self.open {
            return None;
        }
        loop {
            let Some(item) = self.inner.next() else {
                self.open = false;
                return None;
            };
            match (self.predicate)(&item) {
                Filter::Show => return Some(item),
                Filter::Hide => continue,
                Filter::Stop => {
                    self.close();
                    return None;
                }
            }
        }
    }
}

impl<C, F> Cursor for FilterCursor<C, F>
where
    C: Cursor,
    F: FnMut(&C::Item) -> Filter,
{
    fn close(&mut self) {
        self.open = false;
        self.inner.close();
    }

    fn is_open(&self) -> bool {
        self.open && self.inner.is_open()
    }
}
