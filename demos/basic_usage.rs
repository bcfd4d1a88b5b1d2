use lazy_stream::*;

fn main() {
    // Nothing runs until a terminal action drives the chain
    let squares = count(1, 1).map(|x| x * x).filter(|x| x % 2 == 1).take(5);
    println!("Odd squares: {:?}", squares.to_vec().unwrap()); // [1, 9, 25, 49, 81]

    // zip advances both inputs in lockstep and stops at the shorter one
    let names = from_vec(vec!["ada", "grace", "barbara"]);
    let ranked = zip(count(1, 1), names).map(|rank, name| format!("{}. {}", rank, name));
    println!("{}", ranked.join("\n").unwrap());

    // uncons splits off the first element; the rest is a single-use sequence
    let (first, rest) = range(10, 15, 1).uncons().unwrap();
    println!("First: {}, rest: {:?}", first, rest.to_vec().unwrap());

    println!("Workers still running: {}", active_workers()); // 0
}
