use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    growbook::cli::run().await
}
