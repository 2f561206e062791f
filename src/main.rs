use clap::Parser;
use listing_analytics::core::loader::load_non_empty_engine;
use listing_analytics::utils::error::ErrorSeverity;
use listing_analytics::utils::{logger, validation::Validate};
use listing_analytics::{
    CliConfig, EngineError, FileListingSource, LocalStorage, Settings, TomlConfig,
};

fn fail(e: &EngineError) -> ! {
    tracing::error!(
        "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    let file_config = match cli.config.as_deref().map(TomlConfig::from_file).transpose() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file: {}", e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };
    let settings = Settings::from_cli(&cli, file_config.as_ref());

    // 初始化日誌
    if settings.json_logs {
        logger::init_json_logger(settings.verbose);
    } else {
        logger::init_cli_logger(settings.verbose);
    }
    tracing::debug!("Effective settings: {:?}", settings);

    if let Err(e) = settings.validate() {
        fail(&e);
    }
    let format = settings.format()?;

    let source = FileListingSource::new(LocalStorage::current_dir(), settings.data_path.clone());
    let engine = match load_non_empty_engine(&source).await {
        Ok(engine) => engine,
        Err(e) => fail(&e),
    };

    match cli.command.execute(&engine, format) {
        Ok(output) => {
            print!("{}", output);
            if !output.ends_with('\n') {
                println!();
            }
        }
        Err(e) => fail(&e),
    }

    Ok(())
}
