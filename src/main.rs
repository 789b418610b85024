#[tokio::main]
async fn main() -> anyhow::Result<()> {
    algorithms_api::run_server().await
}
