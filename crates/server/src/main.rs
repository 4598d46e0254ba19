#[tokio::main]
async fn main() -> anyhow::Result<()> {
    minutes_server::start().await
}
