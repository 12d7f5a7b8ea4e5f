use anyhow::Result;
use application::{DreamNetworkApp, ImportOutcome};
use config::Config;
use domain::SlotTarget;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter("pokedream=debug,domain=debug,infrastructure=debug")
        .init();

    println!("🌙 Pokémon Dream Network storage backend");

    let config = Config::from_env();
    info!("💾 Using database: {}", config.database_path);
    info!("⏱️  Autosave window: {} ms", config.autosave_debounce_ms);

    let mut app = DreamNetworkApp::new_with_config(
        &config.database_path,
        Duration::from_millis(config.autosave_debounce_ms),
    )?;

    let trainers = app.list_trainers().await;
    if trainers.is_empty() {
        println!("📭 No save files yet");
    } else {
        println!("📦 Save files:");
        for trainer in &trainers {
            let last_played = trainer
                .last_played
                .map(|stamp| stamp.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "Never".to_string());
            println!("   • {} (last played: {})", trainer.username, last_played);
        }
    }

    app.select_trainer("Red").await?;
    println!("✅ Logged in as Red");

    // Walk the add/import flow once: convert a legacy upload and box it.
    let converted = app.convert_pokemon_file("MISSINGNO.pk1", "")?;
    let slot = app.place_pokemon(0, SlotTarget::Auto, converted.clone())?;
    println!(
        "🎁 Converted legacy entry {} (Lv. {}) -> Box 1, slot {}",
        converted.species_name,
        converted.level,
        slot + 1
    );

    let backup = app.export_save()?;
    println!(
        "📤 Backup ready: {} ({} bytes)",
        app.export_save_filename()?,
        backup.len()
    );

    match app.import_save(&backup).await? {
        ImportOutcome::ReplacedActiveSession(username) => {
            println!("📥 Re-imported backup over the active session ({})", username);
        }
        ImportOutcome::StoredInBackground(username) => {
            println!("📥 Stored backup for {}", username);
        }
    }

    app.logout().await?;
    println!("👋 Saved and logged out");

    Ok(())
}
