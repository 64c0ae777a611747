#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
#[cfg(feature = "lambda")]
use uni_explorer::utils::{logger, validation::Validate};
#[cfg(feature = "lambda")]
use uni_explorer::{HipolabsClient, LambdaConfig, ProxyFunction, ProxyRequest, ProxyResponse};

#[cfg(feature = "lambda")]
async fn function_handler(
    proxy: &ProxyFunction<HipolabsClient>,
    event: LambdaEvent<ProxyRequest>,
) -> Result<ProxyResponse, Error> {
    tracing::info!(
        request_id = %event.context.request_id,
        method = %event.payload.method(),
        "Handling universities request"
    );

    // 所有失敗都已正規化成回應，這裡不會回傳錯誤
    Ok(proxy.handle(event.payload).await)
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    // 冷啟動時建立一次設定與 HTTP 客戶端
    let config = LambdaConfig::from_env()?;
    config.validate()?;
    let proxy = ProxyFunction::from_config(&config)?;
    let proxy = &proxy;

    run(service_fn(move |event: LambdaEvent<ProxyRequest>| async move {
        function_handler(proxy, event).await
    }))
    .await
}
