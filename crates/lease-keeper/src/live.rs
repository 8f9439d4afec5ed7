//! Push-based live values.
//!
//! A [`Subject`] holds the state of a table and fans it out to any number of subscribers, each
//! through its own unbounded queue. Every subscription first yields the state it subscribed to,
//! then one value per committed change, none skipped. Dropping the returned stream unsubscribes.

use futures::stream::{self, BoxStream, Stream, StreamExt};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;

use crate::repository::RepositoryError;

/// Live sequence emitted by a repository.
pub type LiveStream<T> = BoxStream<'static, Result<T, RepositoryError>>;

/// Live sequence emitted by an observer built on top of repository streams.
pub type Observation<T> = BoxStream<'static, Result<T, StreamError>>;

/// Failure inside a live observation. It ends the subscription that raised it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("live observation failed: {source}")]
pub struct StreamError {
    #[from]
    source: RepositoryError,
}

impl StreamError {
    pub fn cause(&self) -> &RepositoryError {
        &self.source
    }
}

/// Per-subscriber queue fed with the projection of every committed state.
trait Sink<T>: Send {
    /// Returns `false` once the receiving stream has been dropped.
    fn publish(&self, state: &T) -> bool;
    fn is_closed(&self) -> bool;
}

struct Projected<P, F> {
    sender: mpsc::UnboundedSender<P>,
    project: F,
}

impl<T, P, F> Sink<T> for Projected<P, F>
where
    P: Send,
    F: Fn(&T) -> P + Send,
{
    fn publish(&self, state: &T) -> bool {
        self.sender.send((self.project)(state)).is_ok()
    }

    fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

struct Shared<T> {
    state: T,
    sinks: Vec<Box<dyn Sink<T>>>,
}

/// Table state plus the queues of everyone watching it.
///
/// Commits are published while the lock is held, so every subscriber sees every committed state
/// in commit order, however late it polls.
pub struct Subject<T> {
    shared: Mutex<Shared<T>>,
}

impl<T> Subject<T>
where
    T: Send + 'static,
{
    pub fn new(initial: T) -> Self {
        Self {
            shared: Mutex::new(Shared {
                state: initial,
                sinks: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Shared<T>> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn read<R>(&self, inspect: impl FnOnce(&T) -> R) -> R {
        inspect(&self.lock().state)
    }

    /// Applies `mutate` atomically. Subscribers are notified only when it succeeds, and a
    /// failing mutation must leave the state untouched.
    pub fn update<R>(
        &self,
        mutate: impl FnOnce(&mut T) -> Result<R, RepositoryError>,
    ) -> Result<R, RepositoryError> {
        let mut shared = self.lock();
        let outcome = mutate(&mut shared.state)?;
        let Shared { state, sinks } = &mut *shared;
        sinks.retain(|sink| sink.publish(state));
        Ok(outcome)
    }

    /// Subscribes to the projection of every published state.
    ///
    /// The first item is the state at the time of the call, not at the time of the first poll.
    pub fn watch<P, F>(&self, project: F) -> LiveStream<P>
    where
        P: Send + 'static,
        F: Fn(&T) -> P + Send + 'static,
    {
        let (sender, receiver) = mpsc::unbounded_channel();
        let sink = Projected { sender, project };
        let mut shared = self.lock();
        if sink.publish(&shared.state) {
            shared.sinks.push(Box::new(sink));
        }
        drop(shared);

        stream::unfold(receiver, |mut receiver| async move {
            let value = receiver.recv().await?;
            Some((Ok(value), receiver))
        })
        .boxed()
    }

    pub fn subscriber_count(&self) -> usize {
        let mut shared = self.lock();
        shared.sinks.retain(|sink| !sink.is_closed());
        shared.sinks.len()
    }
}

/// Ends the stream right after its first error so that no value follows a failure.
pub fn terminate_on_error<S, T, E>(upstream: S) -> impl Stream<Item = Result<T, E>>
where
    S: Stream<Item = Result<T, E>>,
{
    upstream.scan(false, |failed, item| {
        if *failed {
            return futures::future::ready(None);
        }
        *failed = item.is_err();
        futures::future::ready(Some(item))
    })
}

/// Reads the value a live stream starts with.
pub async fn current<T>(mut live: LiveStream<T>) -> Result<T, RepositoryError> {
    live.next().await.unwrap_or_else(|| {
        Err(RepositoryError::Unavailable(
            "live stream closed before its first emission".to_string(),
        ))
    })
}

/// Reads the value an observation starts with.
pub async fn first_emission<T>(mut observation: Observation<T>) -> Result<T, StreamError> {
    observation.next().await.unwrap_or_else(|| {
        Err(StreamError::from(RepositoryError::Unavailable(
            "observation closed before its first emission".to_string(),
        )))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;

    #[tokio::test]
    async fn subscribers_receive_initial_value_then_each_change() {
        let subject = Subject::new(1_u32);
        let mut live = subject.watch(|value| *value * 10);

        assert_eq!(live.next().await, Some(Ok(10)));

        subject
            .update(|value| {
                *value = 2;
                Ok(())
            })
            .expect("update applies");
        assert_eq!(live.next().await, Some(Ok(20)));
    }

    #[tokio::test]
    async fn unpolled_subscriber_still_sees_every_commit() {
        let subject = Subject::new(1_u32);
        let live = subject.watch(|value| *value);

        for next in [2, 3] {
            subject
                .update(|value| {
                    *value = next;
                    Ok(())
                })
                .expect("update applies");
        }

        let seen: Vec<u32> = live
            .take(3)
            .map(|item| item.expect("readable"))
            .collect()
            .await;
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn failed_update_is_not_published() {
        let subject = Subject::new(5_u32);
        let result: Result<(), _> = subject.update(|_| Err(RepositoryError::Conflict));
        assert_eq!(result, Err(RepositoryError::Conflict));
        assert_eq!(subject.read(|value| *value), 5);

        let mut live = subject.watch(|value| *value);
        assert_eq!(live.next().await, Some(Ok(5)));
        let _: Result<(), _> = subject.update(|_| Err(RepositoryError::Conflict));
        assert!(live.next().now_or_never().is_none());
    }

    #[tokio::test]
    async fn dropping_the_stream_unsubscribes() {
        let subject = Subject::new(0_u8);
        let live = subject.watch(|value| *value);
        assert_eq!(subject.subscriber_count(), 1);
        drop(live);
        assert_eq!(subject.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn terminate_on_error_stops_after_failure() {
        let upstream = stream::iter(vec![
            Ok(1),
            Err(RepositoryError::Unavailable("disk".to_string())),
            Ok(2),
        ]);
        let items: Vec<Result<i32, RepositoryError>> =
            terminate_on_error(upstream).collect().await;
        assert_eq!(items.len(), 2);
        assert!(items[1].is_err());
    }
}
