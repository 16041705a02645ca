#[tokio::main]
async fn main() -> anyhow::Result<()> {
    mnemo_backend::run().await
}
