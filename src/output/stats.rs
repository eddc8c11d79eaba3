//! Run statistics display

use crate::crawler::CrawlStats;

/// Share of claimed pages that produced a record, as a percentage
pub fn yield_rate(stats: &CrawlStats) -> f64 {
    if stats.pages_claimed == 0 {
        return 0.0;
    }
    (stats.records_emitted as f64 / stats.pages_claimed as f64) * 100.0
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStats) {
    println!("=== Crawl Statistics ===\n");

    println!("Run:");
    println!("  Strategy: {}", stats.strategy);
    println!("  Started: {}", stats.started_at.to_rfc3339());
    println!("  Finished: {}", stats.finished_at.to_rfc3339());
    println!(
        "  Duration: {:.1}s",
        stats.elapsed().num_milliseconds() as f64 / 1000.0
    );
    println!();

    println!("Pages:");
    println!("  Claimed: {}", stats.pages_claimed);
    println!("  Records emitted: {}", stats.records_emitted);
    println!("  Without text: {}", stats.empty_pages);
    println!("  Failed extractions: {}", stats.failed_pages);
    println!();

    println!(
        "Yield: {:.1}% ({} / {} pages produced text)",
        yield_rate(stats),
        stats.records_emitted,
        stats.pages_claimed
    );
}
