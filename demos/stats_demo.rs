use clap::Parser;
use clustermap::Int64Map;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "capacity", default_value_t = 8)]
    capacity: usize,

    #[arg(short = 'n', long = "count", default_value_t = 10_000)]
    count: i64,

    /// Distance between consecutive keys, 1000 for timestamps sampled once
    /// per second.
    #[arg(short = 's', long = "stride", default_value_t = 1)]
    stride: i64,

    /// Remove every n-th key after filling. 0 disables removal.
    #[arg(short = 'd', long = "delete_every", default_value_t = 2)]
    delete_every: i64,
}

fn main() {
    let args = Args::parse();

    let mut map: Int64Map<i64> = Int64Map::with_capacity(args.capacity);
    println!(
        "Created Int64Map with {} buckets (capacity {})",
        map.buckets(),
        map.capacity()
    );

    for i in 1..=args.count {
        map.insert(i * args.stride, i);
    }
    println!(
        "Inserted {} keys with stride {}: {} buckets",
        map.len(),
        args.stride,
        map.buckets()
    );
    map.probe_stats().print();

    if args.delete_every > 0 {
        let mut removed = 0;
        let mut missed = 0;
        for i in (args.delete_every..=args.count).step_by(args.delete_every as usize) {
            match map.remove(i * args.stride) {
                Some(_) => removed += 1,
                None => missed += 1,
            }
        }
        println!("\nRemoved {removed} keys, {missed} removals found nothing");
        map.probe_stats().print();

        map.rehash();
        println!("\nAfter rehash:");
        map.probe_stats().print();
    }

    let reachable = (1..=args.count)
        .filter(|i| map.contains_key(i * args.stride))
        .count();
    println!("\n{reachable} of {} live keys reachable", map.len());
}
