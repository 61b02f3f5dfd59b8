//! FinderStream: lazy, single-pass sequence of finders
//!
//! Every stream is fed by its own tokio task through a bounded channel:
//!
//! ```text
//! find_all task ──[1]──> filter task ──[1]──> map task ──[1]──> consumer
//! ```
//!
//! A producer suspends on each send until the next stage has room, so the
//! pipeline does only as much work as the final consumer pulls. Dropping (or
//! `close`-ing) a stream makes the producer's next send fail; the producer
//! returns, drops its own upstream, and the cancellation walks up the chain.
//!
//! Creating a stream spawns a task, so it must happen inside a tokio runtime.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::mpsc;

use crate::finder::Finder;
use crate::pred::Predicate;

/// Channel capacity between stages; the smallest tokio supports
const STAGE_CAPACITY: usize = 1;

/// Downstream went away; the producing stage should stop
#[derive(Debug)]
pub(crate) struct Cancelled;

/// Sending half handed to a producing stage
pub(crate) struct Emitter {
    tx: mpsc::Sender<Finder>,
}

impl Emitter {
    pub(crate) async fn emit(&self, finder: Finder) -> Result<(), Cancelled> {
        self.tx.send(finder).await.map_err(|_| Cancelled)
    }
}

/// Stream of finders; see the module docs for the execution model
///
/// Consuming methods take `&mut self` and leave whatever was not consumed in
/// the stream. An exhausted stream stays exhausted: further pulls yield
/// nothing.
#[derive(Debug)]
pub struct FinderStream {
    /// `None` once closed: exhausted, cancelled, or never opened
    rx: Option<mpsc::Receiver<Finder>>,
}

impl FinderStream {
    /// Stream with no items and no producer
    pub fn empty() -> Self {
        Self { rx: None }
    }

    /// Run `producer` as a new stage and return the stream it feeds
    pub(crate) fn spawn<F, Fut>(stage: &'static str, producer: F) -> Self
    where
        F: FnOnce(Emitter) -> Fut,
        Fut: Future<Output = Result<(), Cancelled>> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(STAGE_CAPACITY);
        let work = producer(Emitter { tx });

        tokio::spawn(async move {
            tracing::trace!(stage, "stage started");
            match work.await {
                Ok(()) => tracing::trace!(stage, "stage finished"),
                Err(Cancelled) => tracing::trace!(stage, "stage cancelled by consumer"),
            }
        });

        Self { rx: Some(rx) }
    }

    /// Pull one item; `None` once the stream is closed
    pub async fn next(&mut self) -> Option<Finder> {
        let rx = self.rx.as_mut()?;
        let item = rx.recv().await;
        if item.is_none() {
            self.rx = None;
        }
        item
    }

    /// Drain the stream, in emission order
    pub async fn collect(&mut self) -> Vec<Finder> {
        let mut items = Vec::new();
        while let Some(f) = self.next().await {
            items.push(f);
        }
        items
    }

    /// Head of the stream (empty finder if none); the rest stays available
    pub async fn first(&mut self) -> Finder {
        self.next().await.unwrap_or_default()
    }

    /// Drain the stream and return the final item (empty finder if none)
    pub async fn last(&mut self) -> Finder {
        let mut last = Finder::empty();
        while let Some(f) = self.next().await {
            last = f;
        }
        last
    }

    /// Skip to the first item satisfying `pred` and return it
    ///
    /// Skipped items are discarded. When nothing matches the stream ends up
    /// drained and the result is empty.
    pub async fn select(&mut self, pred: Predicate) -> Finder {
        while let Some(f) = self.next().await {
            if f.matches(&pred) {
                return f;
            }
        }
        Finder::empty()
    }

    /// Stop consuming; the producer is cancelled at its next send
    pub fn close(&mut self) {
        if self.rx.take().is_some() {
            tracing::trace!("stream closed by consumer");
        }
    }

    /// True once the stream is known to yield nothing more
    pub fn is_closed(&self) -> bool {
        self.rx.is_none()
    }

    /// Stage forwarding items whose node satisfies `pred`
    ///
    /// # Panics
    ///
    /// Outside a tokio runtime, unless the stream is already closed.
    pub fn filter(self, pred: Predicate) -> FinderStream {
        if self.is_closed() {
            return FinderStream::empty();
        }
        FinderStream::spawn("filter", move |out| async move {
            let mut upstream = self;
            while let Some(f) = upstream.next().await {
                if f.matches(&pred) {
                    out.emit(f).await?;
                }
            }
            Ok(())
        })
    }

    /// Stage forwarding the first `n` items
    ///
    /// Upstream is released as soon as `n` items went out, which cancels it.
    ///
    /// # Panics
    ///
    /// Outside a tokio runtime, unless `n` is 0 or the stream is closed.
    pub fn take_n(self, n: usize) -> FinderStream {
        if n == 0 || self.is_closed() {
            return FinderStream::empty();
        }
        FinderStream::spawn("take_n", move |out| async move {
            let mut upstream = self;
            let mut taken = 0;
            while taken < n {
                let Some(f) = upstream.next().await else {
                    break;
                };
                out.emit(f).await?;
                taken += 1;
            }
            Ok(())
        })
    }

    /// Stage skipping the first `n` items and forwarding the rest
    ///
    /// # Panics
    ///
    /// Outside a tokio runtime, unless the stream is already closed.
    pub fn drop_n(self, n: usize) -> FinderStream {
        if self.is_closed() {
            return FinderStream::empty();
        }
        FinderStream::spawn("drop_n", move |out| async move {
            let mut upstream = self;
            let mut skipped = 0;
            while let Some(f) = upstream.next().await {
                if skipped < n {
                    skipped += 1;
                    continue;
                }
                out.emit(f).await?;
            }
            Ok(())
        })
    }
}

impl Default for FinderStream {
    fn default() -> Self {
        Self::empty()
    }
}

impl futures_util::stream::Stream for FinderStream {
    type Item = Finder;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Finder>> {
        let Some(rx) = self.rx.as_mut() else {
            return Poll::Ready(None);
        };
        match rx.poll_recv(cx) {
            Poll::Ready(None) => {
                self.rx = None;
                Poll::Ready(None)
            }
            poll => poll,
        }
    }
}

/// Stream replaying `items` in order
///
/// # Panics
///
/// Outside a tokio runtime, unless `items` is empty.
pub fn inject(items: impl IntoIterator<Item = Finder>) -> FinderStream {
    let items: Vec<Finder> = items.into_iter().collect();
    if items.is_empty() {
        return FinderStream::empty();
    }
    FinderStream::spawn("inject", move |out| async move {
        for f in items {
            out.emit(f).await?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pred;
    use std::time::Duration;

    const FIVE: &str = r#"<div>
        <span id="a" class="x">1</span>
        <span id="b">2</span>
        <span id="c" class="x">3</span>
        <span id="d">4</span>
        <span id="e" class="x">5</span>
    </div>"#;

    fn ids(items: &[Finder]) -> Vec<&str> {
        items.iter().filter_map(|f| f.attr().id()).collect()
    }

    #[tokio::test]
    async fn test_empty_stream() {
        let mut s = FinderStream::empty();
        assert!(s.is_closed());
        assert!(s.first().await.is_empty());
        assert!(s.last().await.is_empty());
        assert!(s.collect().await.is_empty());
        assert!(s.select(pred::always()).await.is_empty());
        assert!(FinderStream::empty().filter(pred::always()).collect().await.is_empty());
        assert!(FinderStream::empty().take_n(3).collect().await.is_empty());
        assert!(FinderStream::empty().drop_n(3).collect().await.is_empty());
    }

    #[tokio::test]
    async fn test_collect_inject_round_trip() {
        let top = Finder::parse_html(FIVE);
        let spans = top.find_all(pred::element("span")).collect().await;
        assert_eq!(spans.len(), 5);

        let again = inject(spans.clone()).collect().await;
        assert_eq!(again, spans);
        assert!(inject(Vec::<Finder>::new()).collect().await.is_empty());
    }

    #[tokio::test]
    async fn test_first_last() {
        let top = Finder::parse_html(FIVE);

        let mut s = top.find_all(pred::element("span"));
        assert_eq!(s.first().await.attr().id(), Some("a"));
        assert_eq!(s.first().await.attr().id(), Some("b"));

        let mut s = top.find_all(pred::element("span"));
        assert_eq!(s.last().await.attr().id(), Some("e"));
        assert!(s.is_closed());
        assert!(s.first().await.is_empty());
        assert!(s.last().await.is_empty());
    }

    #[tokio::test]
    async fn test_select_keeps_cursor() {
        let top = Finder::parse_html(FIVE);
        let mut s = top.find_all(pred::element("span"));

        assert_eq!(s.select(pred::id("b")).await.attr().id(), Some("b"));
        assert_eq!(s.first().await.attr().id(), Some("c"));
        assert!(s.select(pred::id("nonexistent")).await.is_empty());
        assert!(s.next().await.is_none());
    }

    #[tokio::test]
    async fn test_filter() {
        let top = Finder::parse_html(FIVE);
        let re = regex::Regex::new("^x$").unwrap();

        let items = top
            .find_all(pred::element("span"))
            .filter(pred::class_cond(move |c| re.is_match(c)))
            .collect()
            .await;
        assert_eq!(ids(&items), vec!["a", "c", "e"]);
    }

    #[tokio::test]
    async fn test_take_and_drop() {
        let top = Finder::parse_html(FIVE);

        let first_two = top.find_all(pred::element("span")).take_n(2).collect().await;
        assert_eq!(ids(&first_two), vec!["a", "b"]);

        let rest = top.find_all(pred::element("span")).drop_n(2).collect().await;
        assert_eq!(ids(&rest), vec!["c", "d", "e"]);

        assert!(top.find_all(pred::element("span")).take_n(0).collect().await.is_empty());
        assert_eq!(top.find_all(pred::element("span")).take_n(9).collect().await.len(), 5);
        assert!(top.find_all(pred::element("span")).drop_n(9).collect().await.is_empty());
    }

    #[tokio::test]
    async fn test_take_n_does_not_wait_for_large_upstream() {
        let mut html = String::from("<div>");
        for i in 0..20_000 {
            html.push_str(&format!("<p>{i}</p>"));
        }
        html.push_str("</div>");
        let top = Finder::parse_html(&html);

        let items = tokio::time::timeout(
            Duration::from_secs(5),
            top.find_all(pred::element("p")).take_n(2).collect(),
        )
        .await
        .expect("take_n must finish without draining upstream");
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].inner_text(), "1");
    }

    #[tokio::test]
    async fn test_take_n_cancels_endless_upstream() {
        let top = Finder::parse_html(FIVE);
        let (tx, mut rx) = mpsc::channel::<usize>(1);

        // Never finishes on its own; reports how many items it handed over
        let endless = FinderStream::spawn("endless", move |out| async move {
            let mut sent = 0;
            let result = loop {
                if let Err(cancelled) = out.emit(top.clone()).await {
                    break Err(cancelled);
                }
                sent += 1;
            };
            let _ = tx.send(sent).await;
            result
        });

        let items = tokio::time::timeout(Duration::from_secs(5), endless.take_n(2).collect())
            .await
            .expect("take_n must finish over an endless upstream");
        assert_eq!(items.len(), 2);

        let sent = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("upstream must stop once take_n is done")
            .expect("upstream reports before exiting");
        // Two taken, at most one more parked in the channel
        assert!((2..=3).contains(&sent), "sent {sent}");
    }

    #[tokio::test]
    async fn test_dropping_stream_cancels_producer() {
        let top = Finder::parse_html(FIVE);
        let (tx, mut rx) = mpsc::channel::<()>(1);

        // Producer that reports when it stops
        let mut s = FinderStream::spawn("probe", move |out| async move {
            let result = loop {
                if let Err(cancelled) = out.emit(top.clone()).await {
                    break Err(cancelled);
                }
            };
            let _ = tx.send(()).await;
            result
        });

        assert!(!s.first().await.is_empty());
        s.close();
        assert!(s.first().await.is_empty());

        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("producer must stop after close");
    }

    #[test]
    fn test_stage_trace_filter() {
        // RUST_LOG-style directive used to watch stages start and stop
        let filter = tracing_subscriber::EnvFilter::new("finder=trace");
        assert_eq!(
            filter.max_level_hint(),
            Some(tracing_subscriber::filter::LevelFilter::TRACE)
        );
    }

    #[tokio::test]
    async fn test_futures_stream_impl() {
        let top = Finder::parse_html(FIVE);
        // Inherent `map`/`collect` shadow the trait's; call through the trait
        let mapped = futures_util::StreamExt::map(top.find_all(pred::element("span")), |f| {
            f.inner_text().to_string()
        });
        let texts: Vec<String> = futures_util::StreamExt::collect(mapped).await;
        assert_eq!(texts, vec!["1", "2", "3", "4", "5"]);
    }
}
