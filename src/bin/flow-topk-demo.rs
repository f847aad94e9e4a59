use clap::Parser;
use flowstream::flowstream::generators::RandomPoolGenerator;
use flowstream::flowstream::record::netflow;
use flowstream::{
    ChannelSubscriber, CompressedSparse, FeatureMap, GraphConfig, SubscriberBus, TopK, TopKConfig,
};
use log::info;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

#[derive(Parser)]
#[command(name = "flow-topk-demo")]
#[command(about = "Drive generated flow records through the TopK operator and the temporal graph")]
#[command(version)]
struct Cli {
    /// Number of producer threads
    #[arg(long, default_value = "4")]
    threads: usize,

    /// Flow records generated per thread
    #[arg(long, default_value = "50000")]
    records: usize,

    /// Sliding window capacity N per group
    #[arg(long, default_value = "10000")]
    window_capacity: usize,

    /// Sub-window size b (must divide N)
    #[arg(long, default_value = "1000")]
    sub_window: usize,

    /// Top-k entries reported per group
    #[arg(long, default_value = "5")]
    top_k: usize,

    /// Graph bucket count
    #[arg(long, default_value = "1000")]
    graph_capacity: usize,

    /// Graph retention window in seconds
    #[arg(long, default_value = "100.0")]
    graph_window: f64,
}

fn main() -> flowstream::Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let feature_map = Arc::new(FeatureMap::new());
    let bus = Arc::new(SubscriberBus::new());
    let (subscriber, updates) = ChannelSubscriber::new();
    bus.register(Arc::new(subscriber));

    let topk = Arc::new(TopK::new(
        TopKConfig {
            window_capacity: cli.window_capacity,
            sub_window_size: cli.sub_window,
            top_k: cli.top_k,
            node_id: 0,
            operator_id: "topk0".to_string(),
            value_field: netflow::DEST_PORT,
            key_fields: vec![netflow::DEST_IP],
            arity: netflow::ARITY,
            metric_interval: 100_000,
        },
        Arc::clone(&feature_map),
        Arc::clone(&bus),
    )?);

    let graph = Arc::new(CompressedSparse::new(GraphConfig {
        capacity: cli.graph_capacity,
        window: cli.graph_window,
        source_field: netflow::SOURCE_IP,
        target_field: netflow::DEST_IP,
        time_field: netflow::TIME_SECONDS,
        duration_field: Some(netflow::DURATION_SECONDS),
        arity: netflow::ARITY,
    })?);

    info!(
        "starting {} producers, {} records each",
        cli.threads, cli.records
    );

    let next_id = Arc::new(AtomicU64::new(0));
    let mut handles = Vec::with_capacity(cli.threads);
    for thread_index in 0..cli.threads {
        let topk = Arc::clone(&topk);
        let graph = Arc::clone(&graph);
        let next_id = Arc::clone(&next_id);
        handles.push(thread::spawn(move || -> flowstream::Result<u64> {
            let mut generator = RandomPoolGenerator::new(thread_index as u64, 16, 8);
            let mut graph_work = 0u64;
            for _ in 0..cli.records {
                let record = generator.generate(next_id.fetch_add(1, Ordering::Relaxed));
                topk.consume(&record)?;
                graph_work += graph.add_edge(&record)?;
            }
            Ok(graph_work)
        }));
    }

    let mut total_work = 0u64;
    for handle in handles {
        total_work += handle.join().expect("producer thread panicked")?;
    }

    let updates_seen = updates.try_iter().count();
    println!("operator:            {}", topk.operator_id());
    println!("records consumed:    {}", topk.feed_count());
    println!("groups tracked:      {}", topk.group_count());
    println!("features published:  {}", feature_map.len());
    println!("bus updates seen:    {}", updates_seen);
    println!("graph buckets:       {}", graph.capacity());
    println!("graph window:        {}s", graph.window());
    println!("edges retained:      {}", graph.count_edges());
    println!("graph work units:    {}", total_work);

    Ok(())
}
