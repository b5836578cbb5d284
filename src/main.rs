#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    shopflow_gateway::run().await
}
