use nma_mock_server::MockApi;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");

    let api = MockApi::new();
    // NMA_KEYS holds the comma-separated API keys the server should accept.
    if let Ok(keys) = std::env::var("NMA_KEYS") {
        for key in keys.split(',').filter(|k| !k.is_empty()) {
            api.register_key(key);
        }
    }

    let listener = TcpListener::bind(&addr).await?;
    println!("listening on {addr}");
    nma_mock_server::run(listener, api).await
}
