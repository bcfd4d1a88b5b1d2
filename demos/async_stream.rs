use futures_util::stream::StreamExt;
use lazy_stream::*;
use tokio::runtime::Runtime;

fn main() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        // A lazy sequence consumed from async code through a bridge worker
        let evens: Vec<i64> = range(0, 10, 1)
            .filter(|x| x % 2 == 0)
            .into_stream()
            .map(|item| item.unwrap())
            .collect()
            .await;
        println!("Evens: {:?}", evens); // [0, 2, 4, 6, 8]

        // An async channel feeding a sequence, read back as a stream
        let (mut tx, rx) = futures::channel::mpsc::channel(4);
        tokio::spawn(async move {
            for word in ["lazy", "push", "stream"] {
                futures_util::SinkExt::send(&mut tx, word.to_string()).await.unwrap();
            }
        });

        let mut upper = from_channel(rx).map(|w| w.to_uppercase()).into_stream();
        while let Some(word) = upper.next().await {
            println!("{}", word.unwrap());
        }
    });
}
