use std::error::Error;

use ai_llm_service::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env file when present.
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e.into());
        }
    }

    telemetry::init("info")?;

    api::start().await?;

    Ok(())
}
