use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine};
use sketchvar::{
    encoder, GeminiClient, GeminiConfig, GenerationConfig, Orchestrator, PromptStatus,
    SessionState, SetStatus, SourceHandle, VariationService,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    match dotenv::dotenv() {
        Ok(_) => log::info!("✅ .env file loaded successfully"),
        Err(_) => log::warn!("⚠️  No .env file found, using system environment variables"),
    }

    sketchvar::logger::init_with_config(
        sketchvar::logger::LoggerConfig::development().with_level(log::Level::Debug),
    )?;

    log::info!("🔍 Checking Gemini environment...");
    match env::var("GEMINI_API_KEY") {
        Ok(key) => {
            log::info!("✅ GEMINI_API_KEY found in environment");
            log::debug!("Key starts with: {}...", &key[..5.min(key.len())]);
        }
        Err(_) => {
            log::warn!("⚠️  GEMINI_API_KEY is not set");
            log::error!("❌ Every generation call will fail until a key is provided");
        }
    }
    if let Ok(model) = env::var("GEMINI_MODEL_ID") {
        log::info!("GEMINI_MODEL_ID: {}", model);
    }

    let mut args = env::args().skip(1);
    let sketch_path = match args.next() {
        Some(path) => PathBuf::from(path),
        None => {
            log::error!("Usage: sketchvar <sketch-file> <variation>...");
            return Ok(());
        }
    };
    let variations: Vec<String> = args.collect();
    if variations.is_empty() {
        log::error!("Describe at least one variation, e.g. \"wearing ornate plate armor\"");
        return Ok(());
    }

    log::info!("🎨 Source sketch: {}", sketch_path.display());
    log::info!("📝 {} variation prompt(s)", variations.len());

    let client = GeminiClient::new(GeminiConfig::from_env());
    let service: Arc<dyn VariationService> = Arc::new(client.image().clone());
    let orchestrator = Orchestrator::new(service);

    let mut state = SessionState::new();
    let first_id = state.prompts[0].id.clone();
    state.update_prompt_text(&first_id, variations[0].clone());
    for text in &variations[1..] {
        state.add_prompt();
        let id = state.prompts.last().map(|p| p.id.clone()).unwrap_or_default();
        state.update_prompt_text(&id, text.clone());
    }

    log::info!("🔄 Starting generation run...");
    orchestrator
        .run_session(&mut state, SourceHandle::File(sketch_path), GenerationConfig::default())
        .await;

    if let Some(message) = &state.global_error {
        log::error!("❌ Run failed: {}", message);
        return Ok(());
    }

    for prompt in &state.prompts {
        match prompt.status {
            PromptStatus::Success => log::info!("✅ {:?}", prompt.text),
            PromptStatus::Error => log::error!("❌ {:?}", prompt.text),
            _ => {}
        }
    }

    let out_dir = PathBuf::from("variations");
    fs::create_dir_all(&out_dir)?;

    for (set_index, set) in state.sets.iter().enumerate() {
        if set.status != SetStatus::Completed {
            continue;
        }
        for (image_index, image) in set.images.iter().enumerate() {
            let bytes = STANDARD.decode(encoder::strip_data_uri(&image.url))?;
            let path = out_dir.join(format!(
                "variation-{}-{}.{}",
                set_index,
                image_index,
                extension_for(&image.url)
            ));
            fs::write(&path, bytes)?;
            log::info!("💾 Wrote {}", path.display());
        }
    }

    log::info!("🏁 Done: {} set(s) generated", state.sets.len());
    Ok(())
}

fn extension_for(data_uri: &str) -> &'static str {
    let mime = data_uri
        .strip_prefix("data:")
        .and_then(|rest| rest.split(';').next())
        .unwrap_or("image/png");
    match mime {
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "png",
    }
}
