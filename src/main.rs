use clap::Parser;
use falcon_uninstall::utils::{logger, validation::Validate};
use falcon_uninstall::{CliConfig, UninstallError, UninstallRun};

fn report_fatal(e: &UninstallError) -> ! {
    tracing::error!(
        "❌ Run aborted: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting falcon-uninstall");

    let settings = match config.resolve().and_then(|s| s.validate().map(|_| s)) {
        Ok(settings) => settings,
        Err(e) => report_fatal(&e),
    };
    tracing::debug!("Run settings: {:?}", settings);

    let fail_on_error = settings.fail_on_error;
    let run = UninstallRun::new(settings);

    match run.run().await {
        Ok(summary) => {
            let exit_code = summary.exit_code(fail_on_error);
            if exit_code != 0 {
                tracing::error!(
                    "❌ {} of {} hosts failed",
                    summary.failed,
                    summary.total - summary.skipped
                );
                std::process::exit(exit_code);
            }
            tracing::info!("✅ Finished");
        }
        Err(e) => report_fatal(&e),
    }

    Ok(())
}
