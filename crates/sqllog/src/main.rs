use sqllog::runtime::{boot, pipe};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (mut router, _config) = boot::boot()?;
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    pipe::pump(&mut router, stdin).await?;
    Ok(())
}
