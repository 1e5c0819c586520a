use combat_minigame::run;
use dotenvy::from_filename;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    from_filename(".env.dev").ok(); // ładuje plik .env.dev
    run().await
}
