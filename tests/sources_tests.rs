use futures::channel::mpsc;
use lazy_stream::*;
use std::fs;
use std::io::Cursor;
use std::path::PathBuf;

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("lazy_stream_{}_{}", std::process::id(), name));
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_from_vec_round_trip() {
    let items = vec![4, 8, 15, 16, 23, 42];
    assert_eq!(from_vec(items.clone()).to_vec().unwrap(), items);
}

#[test]
fn test_from_iter_replays() {
    let seq = from_iter(1..4);
    assert_eq!(seq.to_vec().unwrap(), vec![1, 2, 3]);
    assert_eq!(seq.to_vec().unwrap(), vec![1, 2, 3]);
}

#[test]
fn test_emit_and_empty() {
    assert_eq!(emit("only").to_vec().unwrap(), vec!["only"]);
    assert!(empty::<String>().to_vec().unwrap().is_empty());
}

#[test]
fn test_range() {
    assert_eq!(range(0, 5, 1).to_vec().unwrap(), vec![0, 1, 2, 3, 4]);
    assert_eq!(range(0, 10, 4).to_vec().unwrap(), vec![0, 4, 8]);
    assert_eq!(range(5, 0, -2).to_vec().unwrap(), vec![5, 3, 1]);
    assert!(range(3, 3, 1).to_vec().unwrap().is_empty());
    assert!(range(5, 0, 1).to_vec().unwrap().is_empty());
    assert!(matches!(range(0, 5, 0).to_vec(), Err(SeqError::InvalidArgument(_))));
}

#[test]
fn test_count_is_infinite() {
    assert_eq!(count(10, 5).take(4).to_vec().unwrap(), vec![10, 15, 20, 25]);
    assert_eq!(count(0, -1).take(3).to_vec().unwrap(), vec![0, -1, -2]);
}

#[test]
fn test_count_ends_at_overflow() {
    assert_eq!(count(i64::MAX - 1, 1).to_vec().unwrap(), vec![i64::MAX - 1, i64::MAX]);
}

#[test]
fn test_repeat_and_repeat_n() {
    assert_eq!(repeat('z').take(3).to_vec().unwrap(), vec!['z', 'z', 'z']);
    assert_eq!(repeat_n(7, 2).to_vec().unwrap(), vec![7, 7]);
    assert!(repeat_n(7, 0).to_vec().unwrap().is_empty());
}

#[test]
fn test_unfold() {
    let powers = unfold(1u32, |n| if n > 100 { None } else { Some((n, n * 2)) });
    assert_eq!(powers.to_vec().unwrap(), vec![1, 2, 4, 8, 16, 32, 64]);
    // restarts from the seed on every drive
    assert_eq!(powers.head().unwrap(), 1);
}

#[test]
fn test_from_fn_wraps_external_iteration() {
    let words = vec!["alpha", "beta", "gamma"];
    let seq = from_fn(move |consume: &mut dyn FnMut(String) -> bool| {
        for w in &words {
            if !consume(w.to_uppercase()) {
                return Ok(Flow::Stopped);
            }
        }
        Ok(Flow::Exhausted)
    });
    assert_eq!(seq.to_vec().unwrap(), vec!["ALPHA", "BETA", "GAMMA"]);
    assert_eq!(seq.head().unwrap(), "ALPHA");
}

#[test]
fn test_from_reader_is_single_use() {
    let seq = from_reader(Cursor::new("one\ntwo\r\nthree"));
    assert_eq!(seq.to_vec().unwrap(), vec!["one", "two", "three"]);
    assert!(matches!(seq.to_vec(), Err(SeqError::AlreadyConsumed(_))));
}

#[test]
fn test_from_reader_with_skips_empty_lines() {
    let config = ReaderConfig {
        skip_empty_lines: true,
        ..ReaderConfig::default()
    };
    let seq = from_reader_with(Cursor::new("a\n\nb\n\n"), config);
    assert_eq!(seq.to_vec().unwrap(), vec!["a", "b"]);
}

#[test]
fn test_from_file_reads_lines_and_is_redrivable() {
    let path = temp_file("lines.txt", "first\nsecond\nthird\n");
    let seq = from_file(&path);

    assert_eq!(seq.to_vec().unwrap(), vec!["first", "second", "third"]);
    assert_eq!(seq.head().unwrap(), "first");
    assert_eq!(seq.len().unwrap(), 3);

    fs::remove_file(&path).unwrap();
}

#[test]
fn test_from_file_early_stop_releases_file() {
    let path = temp_file("early_stop.txt", "1\n2\n3\n4\n");
    let seq = from_file(&path).map(|line| line.parse::<i32>().unwrap_or(0));

    assert_eq!(seq.clone().take(2).to_vec().unwrap(), vec![1, 2]);
    // The handle is gone, so the file can be removed and re-driving now fails loudly.
    fs::remove_file(&path).unwrap();
    assert!(matches!(seq.to_vec(), Err(SeqError::Resource(_))));
}

#[test]
fn test_from_file_with_buffer_capacity() {
    let path = temp_file("small_buffer.txt", "x\n\ny\n");
    let config = ReaderConfig {
        buffer_capacity: 1,
        skip_empty_lines: true,
    };
    assert_eq!(from_file_with(&path, config).to_vec().unwrap(), vec!["x", "y"]);
    fs::remove_file(&path).unwrap();
}

#[test]
fn test_missing_file_is_resource_error_not_empty() {
    let path = std::env::temp_dir().join("lazy_stream_definitely_missing.txt");
    match from_file(&path).to_vec() {
        Err(SeqError::Resource(msg)) => assert!(msg.contains("lazy_stream_definitely_missing.txt")),
        other => panic!("expected resource error, got {:?}", other),
    }
}

#[test]
fn test_from_channel_drains_until_senders_drop() {
    let (mut tx, rx) = mpsc::channel(8);
    for i in 0..5 {
        tx.try_send(i).unwrap();
    }
    drop(tx);

    let seq = from_channel(rx);
    assert_eq!(seq.to_vec().unwrap(), vec![0, 1, 2, 3, 4]);
    assert!(matches!(seq.to_vec(), Err(SeqError::AlreadyConsumed(_))));
}

#[test]
fn test_from_channel_with_producer_thread() {
    let (mut tx, rx) = mpsc::channel(0);
    let producer = std::thread::spawn(move || {
        for i in 0..20 {
            futures::executor::block_on(futures::SinkExt::send(&mut tx, i)).unwrap();
        }
    });

    let total = from_channel(rx).sum().unwrap();
    producer.join().unwrap();
    assert_eq!(total, (0..20).sum::<i32>());
}

#[test]
fn test_from_stream() {
    let seq = from_stream(futures::stream::iter(vec!["a", "b", "c"]));
    assert_eq!(seq.make_string("").unwrap(), "abc");
    assert!(matches!(seq.head(), Err(SeqError::AlreadyConsumed(_))));
}

#[test]
fn test_single_use_failure_is_uniform_through_operators() {
    let seq = from_reader(Cursor::new("1\n2\n3")).map(|s| s.len());
    assert_eq!(seq.head().unwrap(), 1);
    // Even a partial first traversal consumes the source.
    assert!(matches!(seq.len(), Err(SeqError::AlreadyConsumed(_))));
}
