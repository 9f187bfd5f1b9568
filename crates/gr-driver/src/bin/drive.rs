#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    gr_driver::cli::run().await
}
