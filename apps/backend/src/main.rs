#[tokio::main]
async fn main() -> anyhow::Result<()> {
    typing_tutor_backend::run().await
}
