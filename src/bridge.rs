//! Channel bridge: run a sequence on its own worker thread and pull from it.
//!
//! The push protocol cannot advance two producers in lockstep on one thread,
//! so multi-source operators hand each source to a [`Bridge`]. The worker
//! drives the source and hands every element over a one-slot channel; a send
//! only completes once the receiver has taken the element, so the worker is
//! never more than one element ahead.
//!
//! Stopping is driven from the receiving side: closing (or dropping) the
//! bridge closes the channel, which wakes a worker parked on a send, makes its
//! consume callback return `false`, and lets its producer unwind normally.
//! The handle then joins the worker, so no bridge outlives the call that
//! created it. The async path never joins on the executor thread: it hands the
//! worker to a short-lived reaper thread and awaits the outcome instead.

use async_stream::stream;
use futures::channel::mpsc::{self, Receiver, Sender};
use futures::channel::oneshot;
use futures::executor::block_on;
use futures_util::stream::{BoxStream, StreamExt};
use futures_util::SinkExt;
use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};

use crate::error::{SeqError, SeqResult};
use crate::producer::{Flow, Producer, SingleUse};
use crate::sequence::Sequence;
use crate::sequence_configuration::BridgeConfig;

static ACTIVE_WORKERS: AtomicUsize = AtomicUsize::new(0);
static NEXT_WORKER_ID: AtomicUsize = AtomicUsize::new(0);

/// Number of bridge workers currently alive in this process
pub fn active_workers() -> usize {
    ACTIVE_WORKERS.load(Ordering::SeqCst)
}

struct WorkerGuard;

impl WorkerGuard {
    fn register() -> Self {
        ACTIVE_WORKERS.fetch_add(1, Ordering::SeqCst);
        WorkerGuard
    }
}

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        ACTIVE_WORKERS.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Receiving end of a running sequence
pub struct Bridge<T> {
    rx: Receiver<SeqResult<T>>,
    worker: Option<JoinHandle<()>>,
    finished: bool,
    name: String,
}

impl<T: Send + 'static> Bridge<T> {
    /// Start one worker thread driving `seq`
    pub fn spawn(seq: Sequence<T>, config: &BridgeConfig) -> SeqResult<Self> {
        let (tx, rx) = mpsc::channel(0);
        let id = NEXT_WORKER_ID.fetch_add(1, Ordering::Relaxed);
        let name = format!("{}-{}", config.thread_name_prefix, id);

        let mut builder = thread::Builder::new().name(name.clone());
        if let Some(size) = config.stack_size {
            builder = builder.stack_size(size);
        }

        // A failed spawn drops the closure, and the guard with it.
        let guard = WorkerGuard::register();
        let worker = builder.spawn(move || run_worker(seq, tx, guard))?;
        log::debug!("bridge worker {} started", name);

        Ok(Bridge {
            rx,
            worker: Some(worker),
            finished: false,
            name,
        })
    }

    /// Block until the next element, exhaustion (`Ok(None)`) or a forwarded error
    pub fn recv(&mut self) -> SeqResult<Option<T>> {
        if self.finished {
            return Ok(None);
        }
        let message = block_on(self.rx.next());
        self.settle(message)
    }

    /// Async counterpart of [`Bridge::recv`]
    pub async fn recv_async(&mut self) -> SeqResult<Option<T>> {
        if self.finished {
            return Ok(None);
        }
        match self.rx.next().await {
            Some(Ok(item)) => Ok(Some(item)),
            Some(Err(err)) => {
                self.finish_async().await?;
                Err(err)
            }
            None => {
                self.finish_async().await?;
                Ok(None)
            }
        }
    }

    fn settle(&mut self, message: Option<SeqResult<T>>) -> SeqResult<Option<T>> {
        match message {
            Some(Ok(item)) => Ok(Some(item)),
            Some(Err(err)) => {
                self.finish()?;
                Err(err)
            }
            None => {
                self.finish()?;
                Ok(None)
            }
        }
    }

    /// The worker has hung up; reap it and surface a panic if there was one.
    fn finish(&mut self) -> SeqResult<()> {
        self.finished = true;
        match self.worker.take() {
            Some(worker) => join_worker(worker, &self.name),
            None => Ok(()),
        }
    }

    async fn finish_async(&mut self) -> SeqResult<()> {
        self.finished = true;
        let Some(worker) = self.worker.take() else {
            return Ok(());
        };
        match reap(worker, self.name.clone()).await {
            Ok(outcome) => outcome,
            Err(oneshot::Canceled) => {
                log::warn!("reaper for bridge worker {} went away", self.name);
                Ok(())
            }
        }
    }
}

impl<T> Bridge<T> {
    /// Stop receiving, release the worker and wait for it to exit
    pub fn close(&mut self) {
        self.rx.close();
        while let Ok(Some(_)) = self.rx.try_next() {}
        self.finished = true;
        if let Some(worker) = self.worker.take() {
            log::trace!("closing bridge worker {}", self.name);
            if worker.join().is_err() {
                log::warn!("bridge worker {} panicked after close", self.name);
            }
        }
    }

    /// Stop receiving and release the worker without waiting for it.
    ///
    /// The worker is joined on a reaper thread, so this is safe to call from
    /// inside an async executor. [`active_workers`] drops once it has exited.
    pub fn close_detached(&mut self) {
        self.rx.close();
        while let Ok(Some(_)) = self.rx.try_next() {}
        self.finished = true;
        if let Some(worker) = self.worker.take() {
            log::trace!("detaching bridge worker {}", self.name);
            drop(reap(worker, self.name.clone()));
        }
    }

    /// Name of the worker thread
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T> Drop for Bridge<T> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<T: Send + 'static> Iterator for Bridge<T> {
    type Item = SeqResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.recv().transpose()
    }
}

fn run_worker<T: Send + 'static>(seq: Sequence<T>, mut tx: Sender<SeqResult<T>>, _guard: WorkerGuard) {
    // A send that completes because the receiver closed mid-flush still counts as a stop.
    let result = seq.produce(&mut |item| block_on(tx.send(Ok(item))).is_ok() && !tx.is_closed());
    match result {
        Ok(Flow::Exhausted) => log::trace!("bridged sequence exhausted"),
        Ok(Flow::Stopped) => log::trace!("bridge receiver closed"),
        Err(err) => {
            if block_on(tx.send(Err(err.clone()))).is_err() {
                log::debug!("bridge receiver closed before error could be delivered: {}", err);
            }
        }
    }
}

fn join_worker(worker: JoinHandle<()>, name: &str) -> SeqResult<()> {
    if let Err(payload) = worker.join() {
        let msg = panic_message(payload.as_ref());
        log::warn!("bridge worker {} panicked: {}", name, msg);
        return Err(SeqError::WorkerPanicked(msg));
    }
    log::debug!("bridge worker {} finished", name);
    Ok(())
}

/// Join `worker` on its own thread; the outcome arrives on the returned receiver.
fn reap(worker: JoinHandle<()>, name: String) -> oneshot::Receiver<SeqResult<()>> {
    let (done, outcome) = oneshot::channel();
    let spawned = thread::Builder::new()
        .name(format!("{}-reaper", name))
        .spawn(move || {
            // Nobody may be waiting for the outcome any more.
            let _ = done.send(join_worker(worker, &name));
        });
    // A failed spawn drops the handle, which detaches the worker.
    if let Err(err) = spawned {
        log::warn!("could not start reaper thread: {}", err);
    }
    outcome
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Single-use producer reading the remainder of a live bridge
pub(crate) struct BridgeSource<T> {
    bridge: SingleUse<Bridge<T>>,
}

impl<T> BridgeSource<T> {
    pub(crate) fn new(bridge: Bridge<T>) -> Self {
        Self {
            bridge: SingleUse::new(bridge, "bridged sequence"),
        }
    }
}

impl<T: Send + 'static> Producer<T> for BridgeSource<T> {
    fn produce(&self, consume: &mut dyn FnMut(T) -> bool) -> SeqResult<Flow> {
        // Dropping the bridge on any return path closes and joins its worker.
        let mut bridge = self.bridge.take()?;
        while let Some(item) = bridge.recv()? {
            if !consume(item) {
                return Ok(Flow::Stopped);
            }
        }
        Ok(Flow::Exhausted)
    }
}

/// Bridge owned by an async stream
struct DetachOnDrop<T>(Bridge<T>);

impl<T> Drop for DetachOnDrop<T> {
    fn drop(&mut self) {
        self.0.close_detached();
    }
}

impl<T: Send + 'static> Sequence<T> {
    /// Start driving this sequence on a worker thread and pull from it
    pub fn bridge(&self) -> SeqResult<Bridge<T>> {
        Bridge::spawn(self.clone(), &BridgeConfig::default())
    }

    pub fn bridge_with(&self, config: &BridgeConfig) -> SeqResult<Bridge<T>> {
        Bridge::spawn(self.clone(), config)
    }

    /// Expose the sequence as an async stream, driven by a bridge worker.
    ///
    /// Dropping the stream early closes the bridge without blocking the
    /// executor; the worker is reaped in the background.
    pub fn into_stream(self) -> BoxStream<'static, SeqResult<T>> {
        stream! {
            match Bridge::spawn(self, &BridgeConfig::default()) {
                Ok(bridge) => {
                    let mut bridge = DetachOnDrop(bridge);
                    while let Some(item) = bridge.0.recv_async().await.transpose() {
                        yield item;
                    }
                }
                Err(err) => yield Err(err),
            }
        }
        .boxed()
    }
}
