use clap::Parser;
use geonet_etl::config::{describe_plan, LogFormat};
use geonet_etl::utils::{logger, validation::Validate};
use geonet_etl::{CliArgs, EtlEngine, EtlError, LocalStorage, NetworkPipeline};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    match args.log_format {
        LogFormat::Compact => logger::init_cli_logger(args.verbose),
        LogFormat::Json => logger::init_json_logger(),
    }

    tracing::info!("🚀 Starting geonet-etl");
    if args.verbose {
        tracing::debug!("CLI args: {:?}", args);
    }

    if let Err(e) = run(&args).await {
        tracing::error!(
            "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        std::process::exit(e.exit_code());
    }
}

async fn run(args: &CliArgs) -> Result<(), EtlError> {
    let config = args.load_config()?;
    config.validate()?;
    tracing::info!("✅ Configuration loaded and validated");

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no data files are read or written");
        print!("{}", describe_plan(&config));
        return Ok(());
    }

    let monitor_enabled = args.monitor_enabled(&config);
    if monitor_enabled {
        tracing::info!("🔍 Process monitoring enabled");
    }

    let pipeline = NetworkPipeline::new(LocalStorage::default(), config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    let written = engine.run().await?;
    println!("✅ Network written:");
    for path in written {
        println!("📁 {}", path);
    }

    Ok(())
}
