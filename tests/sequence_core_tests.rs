use lazy_stream::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Infinite source that records how many elements it produced and how many
/// stop signals it received.
#[derive(Clone, Default)]
struct Tally {
    produced: Arc<AtomicUsize>,
    stops: Arc<AtomicUsize>,
}

impl Producer<i64> for Tally {
    fn produce(&self, consume: &mut dyn FnMut(i64) -> bool) -> SeqResult<Flow> {
        let mut n = 0;
        loop {
            self.produced.fetch_add(1, Ordering::SeqCst);
            if !consume(n) {
                self.stops.fetch_add(1, Ordering::SeqCst);
                return Ok(Flow::Stopped);
            }
            n += 1;
        }
    }
}

/// Finite source that keeps pushing after being told to stop
struct IgnoresStop;

impl Producer<i64> for IgnoresStop {
    fn produce(&self, consume: &mut dyn FnMut(i64) -> bool) -> SeqResult<Flow> {
        for x in 0..6 {
            consume(x);
        }
        Ok(Flow::Exhausted)
    }
}

#[test]
fn test_take_tolerates_source_ignoring_stop() {
    let result = Sequence::new(IgnoresStop).take(2).to_vec().unwrap();
    assert_eq!(result, vec![0, 1]);
}

#[test]
fn test_map_filter_take() {
    let result = from_vec(vec![1, 2, 3, 4, 5, 6])
        .map(|x| x * 10)
        .filter(|x| x % 20 == 0)
        .take(2)
        .to_vec()
        .unwrap();
    assert_eq!(result, vec![20, 40]);
}

#[test]
fn test_take_on_infinite_source_stops_after_nth_element() {
    let tally = Tally::default();
    let result = Sequence::new(tally.clone())
        .map(|x| x * x)
        .filter(|x| x % 2 == 0)
        .take(5)
        .to_vec()
        .unwrap();

    assert_eq!(result, vec![0, 4, 16, 36, 64]);
    // 0..=8 were needed to find five even squares; nothing beyond that is computed.
    assert_eq!(tally.produced.load(Ordering::SeqCst), 9);
    assert_eq!(tally.stops.load(Ordering::SeqCst), 1);
}

#[test]
fn test_no_work_before_driving() {
    let tally = Tally::default();
    let seen = Arc::new(AtomicUsize::new(0));
    let seen_clone = seen.clone();

    let seq = Sequence::new(tally.clone())
        .peek(move |_| {
            seen_clone.fetch_add(1, Ordering::SeqCst);
        })
        .map(|x| x + 1)
        .take(3);

    assert_eq!(tally.produced.load(Ordering::SeqCst), 0);
    assert_eq!(seen.load(Ordering::SeqCst), 0);

    assert_eq!(seq.to_vec().unwrap(), vec![1, 2, 3]);
    assert_eq!(seen.load(Ordering::SeqCst), 3);
}

#[test]
fn test_take_zero_does_not_drive_upstream() {
    let tally = Tally::default();
    let result = Sequence::new(tally.clone()).take(0).to_vec().unwrap();
    assert!(result.is_empty());
    assert_eq!(tally.produced.load(Ordering::SeqCst), 0);
}

#[test]
fn test_drop() {
    let seq = range(0, 10, 1);
    assert_eq!(seq.clone().drop(0).to_vec().unwrap(), (0..10).collect::<Vec<_>>());
    assert_eq!(seq.clone().drop(7).to_vec().unwrap(), vec![7, 8, 9]);
    assert!(seq.drop(20).to_vec().unwrap().is_empty());
}

#[test]
fn test_take_more_than_available() {
    assert_eq!(from_vec(vec![1, 2]).take(10).to_vec().unwrap(), vec![1, 2]);
}

#[test]
fn test_take_while_and_drop_while() {
    let seq = from_vec(vec![1, 2, 3, 10, 2, 1]);
    assert_eq!(seq.clone().take_while(|x| *x < 5).to_vec().unwrap(), vec![1, 2, 3]);
    assert_eq!(seq.drop_while(|x| *x < 5).to_vec().unwrap(), vec![10, 2, 1]);
}

#[test]
fn test_take_while_stops_infinite_source() {
    let tally = Tally::default();
    let result = Sequence::new(tally.clone()).take_while(|x| *x < 4).to_vec().unwrap();
    assert_eq!(result, vec![0, 1, 2, 3]);
    assert_eq!(tally.stops.load(Ordering::SeqCst), 1);
}

#[test]
fn test_filter_false_and_filter_map() {
    let seq = from_vec(vec!["1", "x", "3", "y"]);
    assert_eq!(seq.clone().filter_false(|s| s.parse::<i32>().is_ok()).to_vec().unwrap(), vec!["x", "y"]);
    assert_eq!(seq.filter_map(|s| s.parse::<i32>().ok()).to_vec().unwrap(), vec![1, 3]);
}

#[test]
fn test_flat_map_and_flatten() {
    let result = from_vec(vec![1, 2, 3]).flat_map(|x: i32| vec![x; x as usize]).to_vec().unwrap();
    assert_eq!(result, vec![1, 2, 2, 3, 3, 3]);

    let nested = from_vec(vec![vec![1, 2], vec![], vec![3]]);
    assert_eq!(nested.flatten().to_vec().unwrap(), vec![1, 2, 3]);
}

#[test]
fn test_flat_map_stops_inside_inner_iterable() {
    let tally = Tally::default();
    let result = Sequence::new(tally.clone())
        .flat_map(|x| vec![x, x, x])
        .take(4)
        .to_vec()
        .unwrap();
    assert_eq!(result, vec![0, 0, 0, 1]);
    assert_eq!(tally.produced.load(Ordering::SeqCst), 2);
    assert_eq!(tally.stops.load(Ordering::SeqCst), 1);
}

#[test]
fn test_try_map_surfaces_first_error() {
    let tally = Tally::default();
    let result = Sequence::new(tally.clone())
        .try_map(|x| {
            if x == 3 {
                Err(SeqError::custom("three is not allowed"))
            } else {
                Ok(x * 2)
            }
        })
        .to_vec();

    assert_eq!(result, Err(SeqError::Custom("three is not allowed".to_string())));
    assert_eq!(tally.stops.load(Ordering::SeqCst), 1);
}

#[test]
fn test_enumerate() {
    let result = from_vec(vec!["a", "b", "c"]).enumerate().to_vec().unwrap();
    assert_eq!(result, vec![(0, "a"), (1, "b"), (2, "c")]);

    let from_ten = from_vec(vec!["a", "b"]).enumerate_from(10).keys().to_vec().unwrap();
    assert_eq!(from_ten, vec![10, 11]);
}

#[test]
fn test_slice_islice_step_by() {
    let seq = range(0, 20, 1);
    assert_eq!(seq.clone().slice(2, 11, 3).to_vec().unwrap(), vec![2, 5, 8]);
    assert_eq!(seq.clone().islice(5, 8).to_vec().unwrap(), vec![5, 6, 7]);
    assert!(seq.clone().islice(8, 5).to_vec().unwrap().is_empty());
    assert_eq!(seq.step_by(7).to_vec().unwrap(), vec![0, 7, 14]);
}

#[test]
fn test_islice_stops_infinite_source_at_stop() {
    let tally = Tally::default();
    let result = Sequence::new(tally.clone()).islice(3, 6).to_vec().unwrap();
    assert_eq!(result, vec![3, 4, 5]);
    assert_eq!(tally.produced.load(Ordering::SeqCst), 6);
}

#[test]
fn test_zero_step_is_invalid_argument() {
    let result = range(0, 10, 1).step_by(0).to_vec();
    assert!(matches!(result, Err(SeqError::InvalidArgument(_))));
}

#[test]
fn test_pure_chain_is_redrivable() {
    let seq = range(0, 5, 1).map(|x| x * 3).filter(|x| x % 2 == 0);
    let first = seq.to_vec().unwrap();
    let second = seq.to_vec().unwrap();
    assert_eq!(first, vec![0, 6, 12]);
    assert_eq!(first, second);
}

#[test]
fn test_peek_sees_only_pulled_elements() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    let result = from_vec(vec![1, 2, 3, 4])
        .peek(move |x| seen_clone.lock().unwrap().push(*x))
        .take(2)
        .to_vec()
        .unwrap();
    assert_eq!(result, vec![1, 2]);
    assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
}

#[test]
fn test_from_fn_ignores_calls_after_stop() {
    let calls_after_stop = Arc::new(AtomicUsize::new(0));
    let counter = calls_after_stop.clone();
    let seq = from_fn(move |consume: &mut dyn FnMut(i32) -> bool| {
        let mut stopped = false;
        for x in 0..10 {
            if stopped {
                counter.fetch_add(1, Ordering::SeqCst);
            }
            // Deliberately keeps pushing after a stop.
            if !consume(x) {
                stopped = true;
            }
        }
        Ok(Flow::Exhausted)
    });

    let mut received = Vec::new();
    let flow = seq
        .produce(&mut |x| {
            received.push(x);
            x < 2
        })
        .unwrap();

    assert_eq!(received, vec![0, 1, 2]);
    assert_eq!(flow, Flow::Stopped);
    assert_eq!(calls_after_stop.load(Ordering::SeqCst), 7);
}

#[test]
fn test_produce_reports_flow() {
    let seq = from_vec(vec![1, 2, 3]);
    assert_eq!(seq.produce(&mut |_| true).unwrap(), Flow::Exhausted);
    assert_eq!(seq.produce(&mut |x| x < 2).unwrap(), Flow::Stopped);
    assert_eq!(seq.clone().take(2).produce(&mut |_| true).unwrap(), Flow::Exhausted);
}
