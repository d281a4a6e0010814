//! Cooperative fan-out helpers: a fixed-size worker pool over a shared work
//! queue, and an uncapped concurrent map.
//!
//! Both run every future inside the calling task; concurrency comes from
//! overlapping I/O, not from extra threads.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures_util::future::join_all;
use tokio::sync::Mutex;

/// Fixed arena of pending items with an atomic cursor. Each index is handed
/// out exactly once, so no item is processed twice or skipped.
#[derive(Debug)]
pub struct WorkQueue<T> {
    items: Vec<T>,
    cursor: AtomicUsize,
}

impl<T> WorkQueue<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Takes the next item from the front of the queue.
    pub fn pop(&self) -> Option<(usize, &T)> {
        let index = self.cursor.fetch_add(1, Ordering::Relaxed);
        self.items.get(index).map(|item| (index, item))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.items
            .len()
            .saturating_sub(self.cursor.load(Ordering::Relaxed))
    }
}

/// Output of one queued item, tagged with its position in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Completed<R> {
    pub index: usize,
    pub output: R,
}

/// Drains `items` with `workers` concurrent workers.
///
/// Results are returned in completion order; use [`Completed::index`] to
/// restore input order.
pub async fn drain_bounded<T, R, F, Fut>(items: Vec<T>, workers: usize, task: F) -> Vec<Completed<R>>
where
    T: Clone,
    F: Fn(T) -> Fut,
    Fut: Future<Output = R>,
{
    let queue = WorkQueue::new(items);
    let completed = Mutex::new(Vec::with_capacity(queue.len()));
    let worker_count = workers.max(1).min(queue.len());

    let shared_queue = &queue;
    let shared_completed = &completed;
    let shared_task = &task;
    let pool = (0..worker_count).map(move |_| async move {
        while let Some((index, item)) = shared_queue.pop() {
            let output = shared_task(item.clone()).await;
            shared_completed.lock().await.push(Completed { index, output });
        }
    });
    join_all(pool).await;

    completed.into_inner()
}

/// Runs `task` for every item at once and returns outputs in input order.
pub async fn map_concurrent<T, R, F, Fut>(items: Vec<T>, task: F) -> Vec<R>
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = R>,
{
    join_all(items.into_iter().map(task)).await
}
