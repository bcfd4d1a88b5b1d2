use lazy_stream::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn test_chain_preserves_order() {
    let result = from_vec(vec![1, 2]).chain(from_vec(vec![3, 4])).to_vec().unwrap();
    assert_eq!(result, vec![1, 2, 3, 4]);

    let all = from_vec(vec![1])
        .chain_all(vec![empty(), from_vec(vec![2, 3]), emit(4)])
        .to_vec()
        .unwrap();
    assert_eq!(all, vec![1, 2, 3, 4]);
}

#[test]
fn test_chain_stops_before_second_part_when_first_suffices() {
    let driven = Arc::new(AtomicUsize::new(0));
    let driven_clone = driven.clone();
    let second = from_vec(vec![10, 20]).peek(move |_| {
        driven_clone.fetch_add(1, Ordering::SeqCst);
    });

    let result = from_vec(vec![1, 2, 3]).chain(second).take(2).to_vec().unwrap();
    assert_eq!(result, vec![1, 2]);
    assert_eq!(driven.load(Ordering::SeqCst), 0);
}

#[test]
fn test_concat() {
    let result = concat(vec![range(0, 2, 1), range(10, 12, 1)]).to_vec().unwrap();
    assert_eq!(result, vec![0, 1, 10, 11]);
    assert!(concat::<i32>(vec![]).to_vec().unwrap().is_empty());
}

#[test]
fn test_append_and_prepend() {
    let seq = from_vec(vec![2, 3]);
    assert_eq!(seq.clone().append(vec![4, 5]).to_vec().unwrap(), vec![2, 3, 4, 5]);
    assert_eq!(seq.prepend(vec![0, 1]).to_vec().unwrap(), vec![0, 1, 2, 3]);
}

#[test]
fn test_cycle() {
    let result = from_vec(vec![1, 2, 3]).cycle().take(7).to_vec().unwrap();
    assert_eq!(result, vec![1, 2, 3, 1, 2, 3, 1]);

    assert!(empty::<i32>().cycle().to_vec().unwrap().is_empty());
    assert_eq!(cycle(vec!['a', 'b']).take(3).to_vec().unwrap(), vec!['a', 'b', 'a']);
}

#[test]
fn test_accumulate_and_scan() {
    let totals = from_vec(vec![1, 2, 3, 4]).accumulate(|a, b| a + b).to_vec().unwrap();
    assert_eq!(totals, vec![1, 3, 6, 10]);

    let lengths = from_vec(vec!["a", "bb", "ccc"])
        .scan(0usize, |acc, s| acc + s.len())
        .to_vec()
        .unwrap();
    assert_eq!(lengths, vec![1, 3, 6]);

    assert!(empty::<i32>().accumulate(|a, b| a + b).to_vec().unwrap().is_empty());
}

#[test]
fn test_scan_restarts_on_redrive() {
    let seq = from_vec(vec![1, 1, 1]).scan(0, |acc, x| acc + x);
    assert_eq!(seq.to_vec().unwrap(), vec![1, 2, 3]);
    assert_eq!(seq.to_vec().unwrap(), vec![1, 2, 3]);
}

#[test]
fn test_batched_emits_trailing_partial_batch() {
    let result = range(0, 7, 1).batched(3).to_vec().unwrap();
    assert_eq!(result, vec![vec![0, 1, 2], vec![3, 4, 5], vec![6]]);

    let exact = range(0, 4, 1).batched(2).to_vec().unwrap();
    assert_eq!(exact, vec![vec![0, 1], vec![2, 3]]);
}

#[test]
fn test_batched_on_infinite_source() {
    let result = count(0, 1).batched(2).take(2).to_vec().unwrap();
    assert_eq!(result, vec![vec![0, 1], vec![2, 3]]);
}

#[test]
fn test_zero_sizes_are_invalid() {
    assert!(matches!(
        range(0, 3, 1).batched(0).to_vec(),
        Err(SeqError::InvalidArgument(_))
    ));
    assert!(matches!(
        range(0, 3, 1).sliding(0).to_vec(),
        Err(SeqError::InvalidArgument(_))
    ));
}

#[test]
fn test_chunked_by() {
    let lines = from_vec(vec!["# a", "1", "2", "# b", "3", "# c"]);
    let chunks = lines.chunked_by(|line| line.starts_with('#')).to_vec().unwrap();
    assert_eq!(chunks, vec![vec!["# a", "1", "2"], vec!["# b", "3"], vec!["# c"]]);

    let leading = from_vec(vec![1, 2, 10, 3]).chunked_by(|x| *x >= 10).to_vec().unwrap();
    assert_eq!(leading, vec![vec![1, 2], vec![10, 3]]);
}

#[test]
fn test_pairwise_overlaps() {
    let result = from_vec(vec![1, 2, 3, 4]).pairwise().to_vec().unwrap();
    assert_eq!(result, vec![Pair::new(1, 2), Pair::new(2, 3), Pair::new(3, 4)]);

    assert!(emit(1).pairwise().to_vec().unwrap().is_empty());
    assert!(empty::<i32>().pairwise().to_vec().unwrap().is_empty());
}

#[test]
fn test_pairs_drop_unpaired_tail() {
    let even = from_vec(vec![1, 2, 3, 4]).pairs().to_vec().unwrap();
    assert_eq!(even, vec![Pair::new(1, 2), Pair::new(3, 4)]);

    let odd = from_vec(vec![1, 2, 3]).pairs().to_vec().unwrap();
    assert_eq!(odd, vec![Pair::new(1, 2)]);
}

#[test]
fn test_sliding() {
    let result = range(0, 5, 1).sliding(3).to_vec().unwrap();
    assert_eq!(result, vec![vec![0, 1, 2], vec![1, 2, 3], vec![2, 3, 4]]);

    assert!(range(0, 2, 1).sliding(3).to_vec().unwrap().is_empty());
}

#[test]
fn test_distinct_and_distinct_by() {
    let result = from_vec(vec![3, 1, 3, 2, 1]).distinct().to_vec().unwrap();
    assert_eq!(result, vec![3, 1, 2]);

    let words = from_vec(vec!["apple", "avocado", "banana", "blueberry", "cherry"]);
    let by_initial = words.distinct_by(|w| w.chars().next()).to_vec().unwrap();
    assert_eq!(by_initial, vec!["apple", "banana", "cherry"]);
}

#[test]
fn test_distinct_forgets_between_drives() {
    let seq = from_vec(vec![1, 1, 2]).distinct();
    assert_eq!(seq.to_vec().unwrap(), vec![1, 2]);
    assert_eq!(seq.to_vec().unwrap(), vec![1, 2]);
}

#[test]
fn test_reversed_and_sorted() {
    let seq = from_vec(vec![3, 1, 2]);
    assert_eq!(seq.clone().reversed().to_vec().unwrap(), vec![2, 1, 3]);
    assert_eq!(seq.clone().sorted().to_vec().unwrap(), vec![1, 2, 3]);
    assert_eq!(seq.sorted_by(|a, b| b.cmp(a)).to_vec().unwrap(), vec![3, 2, 1]);
}

#[test]
fn test_sorted_by_key_is_stable() {
    let people = from_vec(vec![("bob", 30), ("amy", 25), ("cat", 30), ("dan", 25)]);
    let result = people.sorted_by_key(|(_, age)| *age).to_vec().unwrap();
    assert_eq!(result, vec![("amy", 25), ("dan", 25), ("bob", 30), ("cat", 30)]);
}

#[test]
fn test_group_adjacent_by() {
    let result = from_vec(vec![1, 1, 2, 2, 3, 3, 2, 1])
        .group_adjacent_by(|x| x % 2)
        .to_vec()
        .unwrap();
    assert_eq!(
        result,
        vec![
            Pair::new(1, vec![1, 1]),
            Pair::new(0, vec![2, 2]),
            Pair::new(1, vec![3, 3]),
            Pair::new(0, vec![2]),
            Pair::new(1, vec![1]),
        ]
    );
    assert!(empty::<i32>().group_adjacent_by(|x| *x).to_vec().unwrap().is_empty());
}

#[test]
fn test_group_adjacent_by_stops_early() {
    let groups = count(0, 1)
        .group_adjacent_by(|x| x / 3)
        .take(2)
        .map(|group| group.splat().1)
        .to_vec()
        .unwrap();
    assert_eq!(groups, vec![vec![0, 1, 2], vec![3, 4, 5]]);
}

#[test]
fn test_cache_replays_single_use_source() {
    let reader = std::io::Cursor::new("a\nb\nc\n");
    let cached = from_reader(reader).cache();
    assert_eq!(cached.to_vec().unwrap(), vec!["a", "b", "c"]);
    assert_eq!(cached.len().unwrap(), 3);
}

#[test]
fn test_cache_drives_upstream_once() {
    let driven = Arc::new(AtomicUsize::new(0));
    let driven_clone = driven.clone();
    let cached = range(0, 4, 1)
        .peek(move |_| {
            driven_clone.fetch_add(1, Ordering::SeqCst);
        })
        .cache();

    assert_eq!(driven.load(Ordering::SeqCst), 0);
    assert_eq!(cached.sum().unwrap(), 6);
    assert_eq!(cached.to_vec().unwrap(), vec![0, 1, 2, 3]);
    assert_eq!(driven.load(Ordering::SeqCst), 4);
}
