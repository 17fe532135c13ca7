#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = academic_records::run().await {
        eprintln!("academic-records fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
