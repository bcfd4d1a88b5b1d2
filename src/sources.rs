//! Sequence constructors.
//!
//! Collection-, counter- and function-backed sources replay from the start on
//! every drive. Sources backed by a resource that can only be read once
//! (channels, async streams, readers, stdin) hand that resource to the first
//! traversal and fail any later one with [`SeqError::AlreadyConsumed`].

use futures::channel::mpsc::Receiver;
use futures::executor::block_on;
use futures_core::Stream;
use futures_util::stream::{BoxStream, StreamExt};
use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal};
use std::path::{Path, PathBuf};

use crate::error::{SeqError, SeqResult};
use crate::producer::{push_all, Downstream, Flow, FnProducer, Producer, SingleUse};
use crate::sequence::Sequence;
use crate::sequence_configuration::ReaderConfig;

// ================================
// Re-drivable sources
// ================================

struct IterSource<I> {
    iter: I,
}

impl<I> Producer<I::Item> for IterSource<I>
where
    I: IntoIterator + Clone + Send + Sync,
{
    fn produce(&self, consume: &mut dyn FnMut(I::Item) -> bool) -> SeqResult<Flow> {
        Ok(push_all(self.iter.clone(), consume))
    }
}

/// Create a sequence from anything that can be iterated again by cloning it
pub fn from_iter<I>(iter: I) -> Sequence<I::Item>
where
    I: IntoIterator + Clone + Send + Sync + 'static,
    I::Item: Send + 'static,
{
    Sequence::new(IterSource { iter })
}

/// Create a sequence from a vector; every drive yields clones of its elements
pub fn from_vec<T>(items: Vec<T>) -> Sequence<T>
where
    T: Clone + Send + Sync + 'static,
{
    from_iter(items)
}

/// Emit a single element
pub fn emit<T>(item: T) -> Sequence<T>
where
    T: Clone + Send + Sync + 'static,
{
    from_iter(std::iter::once(item))
}

struct Empty;

impl<T> Producer<T> for Empty {
    fn produce(&self, _consume: &mut dyn FnMut(T) -> bool) -> SeqResult<Flow> {
        Ok(Flow::Exhausted)
    }
}

/// A sequence with no elements
pub fn empty<T>() -> Sequence<T>
where
    T: Send + 'static,
{
    Sequence::new(Empty)
}

struct Counter {
    start: i64,
    end: Option<i64>,
    step: i64,
}

impl Producer<i64> for Counter {
    fn produce(&self, consume: &mut dyn FnMut(i64) -> bool) -> SeqResult<Flow> {
        if self.step == 0 {
            return Err(SeqError::InvalidArgument("step must be non-zero".to_string()));
        }
        let mut current = self.start;
        loop {
            if let Some(end) = self.end {
                let done = if self.step > 0 { current >= end } else { current <= end };
                if done {
                    return Ok(Flow::Exhausted);
                }
            }
            if !consume(current) {
                return Ok(Flow::Stopped);
            }
            current = match current.checked_add(self.step) {
                Some(next) => next,
                None => return Ok(Flow::Exhausted),
            };
        }
    }
}

/// Integers from `start` up to (excluding) `end` in increments of `step`.
///
/// A negative `step` counts down towards `end`. A zero `step` fails when driven.
pub fn range(start: i64, end: i64, step: i64) -> Sequence<i64> {
    Sequence::new(Counter {
        start,
        end: Some(end),
        step,
    })
}

/// Infinite arithmetic progression `start, start + step, start + 2 * step, ...`
pub fn count(start: i64, step: i64) -> Sequence<i64> {
    Sequence::new(Counter {
        start,
        end: None,
        step,
    })
}

struct Repeat<T> {
    item: T,
    times: Option<usize>,
}

impl<T> Producer<T> for Repeat<T>
where
    T: Clone + Send + Sync,
{
    fn produce(&self, consume: &mut dyn FnMut(T) -> bool) -> SeqResult<Flow> {
        let mut emitted = 0usize;
        while self.times.map_or(true, |n| emitted < n) {
            if !consume(self.item.clone()) {
                return Ok(Flow::Stopped);
            }
            emitted += 1;
        }
        Ok(Flow::Exhausted)
    }
}

/// Repeat a value indefinitely
pub fn repeat<T>(item: T) -> Sequence<T>
where
    T: Clone + Send + Sync + 'static,
{
    Sequence::new(Repeat { item, times: None })
}

/// Repeat a value `n` times
pub fn repeat_n<T>(item: T, n: usize) -> Sequence<T>
where
    T: Clone + Send + Sync + 'static,
{
    Sequence::new(Repeat { item, times: Some(n) })
}

/// Loop over the given items forever; an empty vector yields an empty sequence
pub fn cycle<T>(items: Vec<T>) -> Sequence<T>
where
    T: Clone + Send + Sync + 'static,
{
    from_vec(items).cycle()
}

struct Unfold<S, F> {
    seed: S,
    f: F,
}

impl<S, T, F> Producer<T> for Unfold<S, F>
where
    S: Clone + Send + Sync,
    F: Fn(S) -> Option<(T, S)> + Send + Sync,
{
    fn produce(&self, consume: &mut dyn FnMut(T) -> bool) -> SeqResult<Flow> {
        let mut state = self.seed.clone();
        while let Some((item, next)) = (self.f)(state) {
            if !consume(item) {
                return Ok(Flow::Stopped);
            }
            state = next;
        }
        Ok(Flow::Exhausted)
    }
}

/// Generate a sequence from a seed and a step function.
///
/// The function produces an element and the next state; the sequence ends
/// when it returns `None`. Every drive restarts from `seed`.
///
/// # Examples
/// ```
/// use lazy_stream::*;
///
/// let fibonacci = unfold((0u64, 1u64), |(a, b)| Some((a, (b, a + b))));
/// let result = fibonacci.take(10).to_vec().unwrap();
/// assert_eq!(result, vec![0, 1, 1, 2, 3, 5, 8, 13, 21, 34]);
/// ```
pub fn unfold<S, T, F>(seed: S, f: F) -> Sequence<T>
where
    S: Clone + Send + Sync + 'static,
    T: Send + 'static,
    F: Fn(S) -> Option<(T, S)> + Send + Sync + 'static,
{
    Sequence::new(Unfold { seed, f })
}

/// Wrap an arbitrary push-style iteration source.
///
/// `f` is handed a consume callback and must stop calling it once it returns
/// `false`. Calls made after that are ignored.
pub fn from_fn<T, F>(f: F) -> Sequence<T>
where
    T: Send + 'static,
    F: Fn(&mut dyn FnMut(T) -> bool) -> SeqResult<Flow> + Send + Sync + 'static,
{
    Sequence::new(FnProducer::new(f))
}

// ================================
// Single-use sources
// ================================

struct StreamSource<T> {
    stream: SingleUse<BoxStream<'static, T>>,
}

impl<T: Send + 'static> Producer<T> for StreamSource<T> {
    fn produce(&self, consume: &mut dyn FnMut(T) -> bool) -> SeqResult<Flow> {
        let mut stream = self.stream.take()?;
        while let Some(item) = block_on(stream.next()) {
            if !consume(item) {
                return Ok(Flow::Stopped);
            }
        }
        Ok(Flow::Exhausted)
    }
}

/// Drain an async stream, blocking the driving thread between elements
pub fn from_stream<S>(stream: S) -> Sequence<S::Item>
where
    S: Stream + Send + 'static,
    S::Item: Send + 'static,
{
    Sequence::new(StreamSource {
        stream: SingleUse::new(stream.boxed(), "stream-backed sequence"),
    })
}

/// Drain a channel receiver until every sender is gone
pub fn from_channel<T>(rx: Receiver<T>) -> Sequence<T>
where
    T: Send + 'static,
{
    Sequence::new(StreamSource {
        stream: SingleUse::new(rx.boxed(), "channel-backed sequence"),
    })
}

/// Push every line of `reader` (without its line ending) to `downstream`
fn drive_lines<R: BufRead>(
    reader: R,
    config: &ReaderConfig,
    consume: &mut dyn FnMut(String) -> bool,
) -> SeqResult<Flow> {
    let mut downstream = Downstream::new(consume);
    for line in reader.lines() {
        let line = line?;
        if config.skip_empty_lines && line.is_empty() {
            continue;
        }
        if !downstream.push(line) {
            break;
        }
    }
    Ok(downstream.flow())
}

struct ReaderSource<R> {
    reader: SingleUse<R>,
    config: ReaderConfig,
}

impl<R: BufRead + Send> Producer<String> for ReaderSource<R> {
    fn produce(&self, consume: &mut dyn FnMut(String) -> bool) -> SeqResult<Flow> {
        let reader = self.reader.take()?;
        drive_lines(reader, &self.config, consume)
    }
}

/// Lines of a buffered reader; single-use
pub fn from_reader<R>(reader: R) -> Sequence<String>
where
    R: BufRead + Send + 'static,
{
    from_reader_with(reader, ReaderConfig::default())
}

pub fn from_reader_with<R>(reader: R, config: ReaderConfig) -> Sequence<String>
where
    R: BufRead + Send + 'static,
{
    Sequence::new(ReaderSource {
        reader: SingleUse::new(reader, "reader-backed sequence"),
        config,
    })
}

struct FileSource {
    path: PathBuf,
    config: ReaderConfig,
}

impl Producer<String> for FileSource {
    fn produce(&self, consume: &mut dyn FnMut(String) -> bool) -> SeqResult<Flow> {
        let file = File::open(&self.path).map_err(|err| {
            SeqError::Resource(format!("cannot open {}: {}", self.path.display(), err))
        })?;
        log::trace!("opened {}", self.path.display());
        // The file handle is closed when the reader drops, on every return path.
        let reader = BufReader::with_capacity(self.config.buffer_capacity, file);
        drive_lines(reader, &self.config, consume)
    }
}

/// Lines of a file. The file is opened anew on every drive and closed on every
/// exit path; failures surface from the terminal call as [`SeqError::Resource`].
pub fn from_file(path: impl AsRef<Path>) -> Sequence<String> {
    from_file_with(path, ReaderConfig::default())
}

pub fn from_file_with(path: impl AsRef<Path>, config: ReaderConfig) -> Sequence<String> {
    Sequence::new(FileSource {
        path: path.as_ref().to_path_buf(),
        config,
    })
}

struct StdinSource {
    claimed: SingleUse<()>,
    config: ReaderConfig,
}

impl Producer<String> for StdinSource {
    fn produce(&self, consume: &mut dyn FnMut(String) -> bool) -> SeqResult<Flow> {
        self.claimed.take()?;
        let stdin = io::stdin();
        if stdin.is_terminal() {
            // Nothing is piped in; do not wait on an interactive terminal.
            return Ok(Flow::Exhausted);
        }
        drive_lines(stdin.lock(), &self.config, consume)
    }
}

/// Lines piped into standard input; empty when stdin is a terminal. Single-use.
pub fn from_stdin() -> Sequence<String> {
    Sequence::new(StdinSource {
        claimed: SingleUse::new((), "stdin-backed sequence"),
        config: ReaderConfig::default(),
    })
}
