//! Lazy pull iteration over remote result sets.
//!
//! [`EnumerationCursor`] turns a transport's [`crate::client::ElementSource`] into a one-shot, finite
//! [`Iterator`]. Elements are pulled only when the iterator is advanced, and the cursor stops for
//! good after the source is exhausted or a pull fails.
//!
//! [`drain`] consumes a cursor into a list, converting each element on the way. A conversion that
//! fails is logged and its element left out, while a failing pull or a fatal conversion error
//! (see [`crate::Error::is_fatal`]) aborts the whole drain. An empty result and a failed drain are
//! therefore always told apart.
//!
//! # Examples
//!
//! ```rust
//! use cimscope::client::{drain, EnumerationCursor, VecSource};
//!
//! let cursor = EnumerationCursor::new(Box::new(VecSource::new(vec![1, 2, 3, 4])));
//! let odd = drain(cursor, |n| Ok((n % 2 == 1).then_some(n * 10)))?;
//! assert_eq!(odd, [10, 30]);
//! # Ok::<(), cimscope::Error>(())
//! ```

use crate::{client::Elements, Result};

/// A one-shot lazy sequence of elements pulled from a remote result set.
pub struct EnumerationCursor<'a, T> {
    source: Elements<'a, T>,
    finished: bool,
    pulled: usize,
}

impl<'a, T> EnumerationCursor<'a, T> {
    /// Wraps an element source.
    #[must_use]
    pub fn new(source: Elements<'a, T>) -> Self {
        EnumerationCursor {
            source,
            finished: false,
            pulled: 0,
        }
    }

    /// Number of elements pulled so far, failed pulls included.
    #[must_use]
    pub fn pulled(&self) -> usize {
        self.pulled
    }

    /// Returns `true` once the cursor will not yield anything else.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl<T> Iterator for EnumerationCursor<'_, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        if !self.source.has_more() {
            self.finished = true;
            return None;
        }

        self.pulled += 1;
        match self.source.next_element() {
            Ok(element) => Some(Ok(element)),
            Err(error) => {
                self.finished = true;
                Some(Err(error))
            }
        }
    }
}

impl<T> std::iter::FusedIterator for EnumerationCursor<'_, T> {}

/// Pulls `cursor` to exhaustion, converting every element with `per_element`.
///
/// `per_element` returns `Ok(Some(value))` to keep an element, `Ok(None)` to drop it silently,
/// and `Err` when converting it failed. A non-fatal conversion error is logged and the element
/// skipped; the enumeration continues.
///
/// # Errors
/// Returns the error of a failed pull, or a fatal error returned by `per_element`, discarding
/// the elements converted so far.
pub fn drain<T, U, F>(cursor: EnumerationCursor<'_, T>, mut per_element: F) -> Result<Vec<U>>
where
    F: FnMut(T) -> Result<Option<U>>,
{
    let mut converted = Vec::new();
    let mut skipped = 0usize;

    for (index, element) in cursor.enumerate() {
        match per_element(element?) {
            Ok(Some(value)) => converted.push(value),
            Ok(None) => skipped += 1,
            Err(error) if error.is_fatal() => return Err(error),
            Err(error) => {
                log::warn!("skipping element {}: {}", index, error);
                skipped += 1;
            }
        }
    }

    log::debug!(
        "drained {} elements, {} skipped",
        converted.len() + skipped,
        skipped
    );
    Ok(converted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        client::{ElementSource, VecSource},
        Error,
    };

    struct CountingSource {
        remaining: u32,
        has_more_calls: u32,
    }

    impl ElementSource<u32> for CountingSource {
        fn has_more(&mut self) -> bool {
            self.has_more_calls += 1;
            self.remaining > 0
        }

        fn next_element(&mut self) -> Result<u32> {
            self.remaining -= 1;
            Ok(self.remaining)
        }
    }

    #[test]
    fn test_cursor_is_lazy() {
        let mut source = CountingSource {
            remaining: 3,
            has_more_calls: 0,
        };
        {
            let mut cursor = EnumerationCursor::new(Box::new(&mut source));
            assert_eq!(cursor.next().unwrap().unwrap(), 2);
            assert_eq!(cursor.pulled(), 1);
        }
        assert_eq!(source.has_more_calls, 1);
        assert_eq!(source.remaining, 2);
    }

    #[test]
    fn test_cursor_exhaustion_order() {
        let cursor = EnumerationCursor::new(Box::new(VecSource::new(vec!["a", "b", "c"])));
        let collected: Vec<_> = cursor.map(|element| element.unwrap()).collect();
        assert_eq!(collected, ["a", "b", "c"]);
    }

    #[test]
    fn test_cursor_fused_after_error() {
        let mut cursor = EnumerationCursor::new(Box::new(VecSource::from_results(vec![
            Ok(1),
            Err(Error::remote("broken pipe")),
            Ok(3),
        ])));
        assert!(cursor.next().unwrap().is_ok());
        assert!(cursor.next().unwrap().is_err());
        assert!(cursor.is_finished());
        assert!(cursor.next().is_none());
    }

    #[test]
    fn test_drain_skips_failed_conversions() {
        let cursor = EnumerationCursor::new(Box::new(VecSource::new(vec![1, 2, 3])));
        let result = drain(cursor, |n| {
            if n == 2 {
                Err(Error::remote("element 2 unreadable"))
            } else {
                Ok(Some(n))
            }
        })
        .unwrap();
        assert_eq!(result, [1, 3]);
    }

    #[test]
    fn test_drain_aborts_on_fatal() {
        let cursor = EnumerationCursor::new(Box::new(VecSource::new(vec![1, 2, 3])));
        let result = drain(cursor, |n| {
            if n == 2 {
                Err(Error::Disconnected("connection reset".into()))
            } else {
                Ok(Some(n))
            }
        });
        assert!(matches!(result, Err(Error::Disconnected(_))));
    }

    #[test]
    fn test_drain_aborts_on_failed_pull() {
        let cursor = EnumerationCursor::new(Box::new(VecSource::from_results(vec![
            Ok(1),
            Err(Error::remote("pull failed")),
        ])));
        let result = drain(cursor, |n: i32| Ok(Some(n)));
        assert!(matches!(result, Err(Error::RemoteProtocol { .. })));
    }

    #[test]
    fn test_drain_empty_is_ok() {
        let cursor = EnumerationCursor::new(Box::new(VecSource::<u8>::new(Vec::new())));
        assert!(drain(cursor, |n| Ok(Some(n))).unwrap().is_empty());
    }
}
