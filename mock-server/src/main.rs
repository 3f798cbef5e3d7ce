use mock_server::{seed, RepoRecord};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    let db = seed(vec![
        RepoRecord {
            name: "rust-http-client".to_string(),
            html_url: "https://example.com/rust-http-client".to_string(),
        },
        RepoRecord {
            name: "tiny-search".to_string(),
            html_url: "https://example.com/tiny-search".to_string(),
        },
    ]);
    println!("listening on {addr}");
    mock_server::run(listener, db).await
}
