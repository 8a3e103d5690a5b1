use clap::Parser;
use odds_harvester::app::render;
use odds_harvester::domain::model::flatten_events;
use odds_harvester::domain::ports::ConfigProvider;
use odds_harvester::utils::error::{ErrorSeverity, HarvestError};
use odds_harvester::utils::monitor::RunMonitor;
use odds_harvester::utils::{logger, validation::Validate};
use odds_harvester::{CliConfig, HarvestConfig, Harvester, HttpFetcher, WorkerPool};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting odds-harvester");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match cli.resolve().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };

    if cli.dry_run {
        display_plan(&config);
        return Ok(());
    }

    let monitor = RunMonitor::new(cli.monitor);
    if monitor.is_enabled() {
        tracing::info!("🔍 System monitoring enabled");
    }

    // 行程層級資源：HTTP client 與工作池
    let fetcher = match HttpFetcher::new(config.request_timeout()) {
        Ok(fetcher) => Arc::new(fetcher),
        Err(e) => exit_with(&e),
    };
    let pool = Arc::new(WorkerPool::new(config.workers()));
    let grace = config.shutdown_grace();
    let format = config.output.format;
    let harvester = Harvester::new(fetcher, Arc::clone(&pool), config);

    let result = harvester.harvest_by_sport().await;
    monitor.log_stats("Fan-out");

    if !pool.shutdown(grace).await {
        tracing::warn!("Worker pool was terminated before all tasks finished");
    }

    let harvests = match result {
        Ok(harvests) => harvests,
        Err(e) => exit_with(&e),
    };
    monitor.log_final_stats(&harvests);
    for harvest in &harvests {
        tracing::info!("📋 {}", harvest.summary());
    }

    let events = flatten_events(harvests);
    match render::render(&events, format) {
        Ok(output) => print!("{}", output),
        Err(e) => exit_with(&e),
    }

    Ok(())
}

fn exit_with(e: &HarvestError) -> ! {
    tracing::error!(
        "❌ Harvest failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

fn display_plan(config: &HarvestConfig) {
    println!("📋 Harvest Plan:");
    println!("  Origin: {}", config.origin());
    println!("  Workers: {}", config.workers());
    println!("  Top leagues per sport: {}", config.top_league_limit());
    println!("  Request timeout: {:?}", config.request_timeout());
    println!("  Output format: {:?}", config.output.format);
    if !config.extra_headers().is_empty() {
        println!("  Extra headers: {}", config.extra_headers().len());
    }
    println!();
    println!("📡 Requests:");
    for sport in config.sports() {
        println!("  {} -> {}", sport, config.endpoint_for(sport));
    }
    println!();
    println!("✅ Dry run complete, no requests were sent.");
}
