use clap::Parser;
use uni_explorer::core::render;
use uni_explorer::core::UniversitySource;
use uni_explorer::utils::error::ErrorSeverity;
use uni_explorer::utils::{logger, validation::Validate};
use uni_explorer::{
    CliConfig, ExplorerError, FileConfig, ProxyFunction, ProxyHttpClient, SearchOrchestrator,
    SearchQuery, SearchResult,
};

#[tokio::main]
async fn main() {
    let mut config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting uni-explorer CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = run(&mut config).await {
        exit_with(e);
    }
}

async fn run(config: &mut CliConfig) -> Result<(), ExplorerError> {
    if let Some(path) = config.config.clone() {
        tracing::info!("📁 Loading configuration from: {}", path);
        let file = FileConfig::from_file(&path)?;
        file.validate()?;
        config.merge_file(&file);
    }

    // 驗證配置
    config.validate()?;

    let query = SearchQuery::new(
        config.country.clone().unwrap_or_default(),
        config.state.clone(),
    );

    let result = match &config.proxy_url {
        Some(url) => {
            tracing::info!("🌐 Using proxy at {}", url);
            let source = ProxyHttpClient::new(url.as_str(), config.client_timeout())?;
            search(source, &query).await?
        }
        None => {
            tracing::info!("🏠 Running proxy function in-process");
            let source = ProxyFunction::from_config(&*config)?;
            search(source, &query).await?
        }
    };

    if let Some(failure) = &result.failure {
        // 降級結果仍然輸出，只加上提示
        eprintln!("⚠️  {}", failure.user_message());
        tracing::warn!("Search degraded: {}", failure);
    }

    let output = render::render(&result, config.format)?;
    match &config.output {
        Some(path) => {
            std::fs::write(path, output)?;
            println!("📁 Results saved to: {}", path);
        }
        None => println!("{}", output),
    }

    Ok(())
}

async fn search<S: UniversitySource>(
    source: S,
    query: &SearchQuery,
) -> Result<SearchResult, ExplorerError> {
    let orchestrator = SearchOrchestrator::new(source);
    Ok(orchestrator.search(query).await?)
}

fn exit_with(e: ExplorerError) -> ! {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ Search failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );

    // 輸出用戶友好的錯誤信息
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
