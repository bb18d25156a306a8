use clap::Parser;
use real_raise::config::toml_config::LogFormat;
use real_raise::core::ConfigProvider;
use real_raise::domain::ports::SessionStore;
use real_raise::report;
use real_raise::utils::error::ErrorSeverity;
use real_raise::utils::{logger, validation::Validate};
use real_raise::{
    CliConfig, FileSessionStore, MemorySessionStore, Orchestrator, RaiseConfig, RaiseError,
    RateCache, RateFetcher,
};
use serde::Serialize;

#[derive(Serialize)]
struct JsonOutput<'a> {
    rates: &'a real_raise::RatePair,
    input: &'a real_raise::SalaryInput,
    report: &'a real_raise::RaiseReport,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            logger::init_logger(LogFormat::default(), cli.verbose);
            exit_with(&e);
        }
    };

    logger::init_logger(config.log_format(), cli.verbose);

    tracing::info!("Starting real-raise");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        exit_with(&e);
    }

    if let Err(e) = run(&cli, &config).await {
        exit_with(&e);
    }

    Ok(())
}

async fn run(cli: &CliConfig, config: &RaiseConfig) -> real_raise::Result<()> {
    let input = cli.salary_input(config.default_inflation())?;

    let store: Box<dyn SessionStore> = match config.session_path() {
        Some(path) => {
            tracing::debug!("Using session file: {}", path);
            Box::new(FileSessionStore::new(path))
        }
        None => Box::new(MemorySessionStore::new()),
    };
    let cache = RateCache::with_key(store, config.session_key());
    let fetcher = RateFetcher::from_config(config)?;
    let orchestrator = Orchestrator::new(fetcher, cache);

    if cli.refresh {
        tracing::info!("Discarding session rates");
        orchestrator.invalidate().await?;
    }

    let rates = orchestrator.ensure_rates().await?;
    let result = orchestrator.calculate(&input)?;

    if cli.json {
        let output = JsonOutput {
            rates: &rates,
            input: &input,
            report: &result,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", report::render_rates(&rates));
        println!();
        println!("{}", report::render_report(&result, &input));
    }

    Ok(())
}

fn exit_with(e: &RaiseError) -> ! {
    tracing::error!(
        "real-raise failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
