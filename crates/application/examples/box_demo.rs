use application::DreamNetworkApp;
use domain::{legacy, SlotTarget};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🚀 Pokémon Dream Network box demo");

    let mut app = DreamNetworkApp::new("dream_network.db")?;

    app.select_trainer("Leaf").await?;
    println!("✅ Logged in as Leaf");

    // Pretend the trainer uploaded an old cartridge entry.
    let record = legacy::simulate_legacy_record();
    let slot = app.place_pokemon(0, SlotTarget::Auto, record.clone())?;
    println!(
        "🎁 {} (Lv. {}) placed in Box 1, slot {}",
        record.species_name,
        record.level,
        slot + 1
    );

    if let Some(session) = app.session() {
        let profile = session.profile();
        println!(
            "📦 Box 1 now holds {}/{} Pokémon",
            profile.boxes[0].occupied_count(),
            profile.boxes[0].slots.len()
        );
        println!("💾 Save pending: {}", session.is_save_pending());
    }

    app.logout().await?;
    println!("🏁 Demo complete!");
    Ok(())
}
