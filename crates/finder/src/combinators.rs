//! Stream combinators: join (flatMap), map, reduce
//!
//! Each combinator is one more stage in the pipeline (see `stream`), owning
//! its upstream and cancelling it when the downstream goes away.

use dom::{utils::is_blank, Node};

use crate::finder::Finder;
use crate::pred;
use crate::stream::FinderStream;

/// Outcome of one `reduce` comparison
#[derive(Debug, Clone)]
pub enum ReduceStep {
    /// Forward nothing
    Drop,
    /// Forward the right-hand item unchanged
    Keep,
    /// Forward this value instead of the right-hand item
    ///
    /// Must be a fresh value (e.g. `Finder::copy_with`) when the replacement
    /// may not alias an item already forwarded.
    Replace(Finder),
}

impl FinderStream {
    /// Forward every item of `split(x)` for each upstream `x`, in order
    ///
    /// A sub-stream is drained completely before the next upstream item is
    /// pulled, so output order is upstream order then sub-stream order.
    ///
    /// # Panics
    ///
    /// Outside a tokio runtime, unless the stream is already closed.
    pub fn join<F>(self, mut split: F) -> FinderStream
    where
        F: FnMut(Finder) -> FinderStream + Send + 'static,
    {
        if self.is_closed() {
            return FinderStream::empty();
        }
        FinderStream::spawn("join", move |out| async move {
            let mut upstream = self;
            while let Some(x) = upstream.next().await {
                let mut sub = split(x);
                while let Some(y) = sub.next().await {
                    out.emit(y).await?;
                }
            }
            Ok(())
        })
    }

    /// Forward a modified copy of every item
    ///
    /// `edit` runs on a detached copy of the node, never on the shared tree.
    ///
    /// # Panics
    ///
    /// Outside a tokio runtime, unless the stream is already closed.
    pub fn map<F>(self, mut edit: F) -> FinderStream
    where
        F: FnMut(&mut Node) + Send + 'static,
    {
        if self.is_closed() {
            return FinderStream::empty();
        }
        FinderStream::spawn("map", move |out| async move {
            let mut upstream = self;
            while let Some(x) = upstream.next().await {
                out.emit(x.copy_with(&mut edit)).await?;
            }
            Ok(())
        })
    }

    /// Fold with lookahead
    ///
    /// The first item is forwarded as is. Every later item `y` is passed to
    /// `combine(prev, y)`, which decides what to forward; `prev` then becomes
    /// `y` whatever the decision was.
    ///
    /// # Panics
    ///
    /// Outside a tokio runtime, unless the stream is already closed.
    pub fn reduce<F>(self, mut combine: F) -> FinderStream
    where
        F: FnMut(&Finder, &Finder) -> ReduceStep + Send + 'static,
    {
        if self.is_closed() {
            return FinderStream::empty();
        }
        FinderStream::spawn("reduce", move |out| async move {
            let mut upstream = self;
            let Some(mut prev) = upstream.next().await else {
                return Ok(());
            };
            out.emit(prev.clone()).await?;

            while let Some(y) = upstream.next().await {
                match combine(&prev, &y) {
                    ReduceStep::Drop => {}
                    ReduceStep::Keep => out.emit(y.clone()).await?,
                    ReduceStep::Replace(z) => out.emit(z).await?,
                }
                prev = y;
            }
            Ok(())
        })
    }
}

/// Split function for `join`: every non-blank text node under `f`
///
/// # Panics
///
/// Outside a tokio runtime, unless `f` is empty.
pub fn all_text(f: Finder) -> FinderStream {
    f.find_all(pred::text_cond(|text| !is_blank(text)))
}
