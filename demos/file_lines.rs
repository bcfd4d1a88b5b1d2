use lazy_stream::*;
use std::io::Write;

fn main() {
    let path = std::env::temp_dir().join("lazy_stream_demo_lines.txt");
    {
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "level=info msg=starting").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "level=warn msg=disk almost full").unwrap();
        writeln!(file, "level=info msg=done").unwrap();
    }

    // The file is opened on every drive, so the same sequence can be reused
    let config = ReaderConfig {
        skip_empty_lines: true,
        ..ReaderConfig::default()
    };
    let lines = from_file_with(&path, config);

    let warnings = lines.clone().filter(|line| line.contains("level=warn")).count().unwrap();
    println!("Lines: {}, warnings: {}", lines.len().unwrap(), warnings);

    let by_level = lines
        .map(|line| line.split_whitespace().next().unwrap_or("").to_string())
        .count_by_value()
        .unwrap();
    println!("By level: {:?}", by_level);

    // A missing file surfaces as an error from the terminal call
    match from_file("/no/such/file.txt").head() {
        Err(err) => println!("Expected failure: {}", err),
        Ok(line) => println!("Unexpected line: {}", line),
    }

    std::fs::remove_file(&path).unwrap();
}
