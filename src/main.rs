use anyhow::Result;
use lumina::config::{LogFormat, Settings};
use lumina::data::PhotoStore;
use lumina::gallery::Gallery;
use lumina::telemetry::{get_subscriber_file, get_subscriber_terminal, init_subscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::discover()?;
    let env_filter = settings.log_filter().to_owned();
    match settings.log_format {
        LogFormat::Pretty => {
            init_subscriber(get_subscriber_terminal(env_filter, std::io::stdout))?
        }
        LogFormat::Json => init_subscriber(get_subscriber_file(
            "lumina".into(),
            env_filter,
            std::io::stdout,
        ))?,
    }

    let store = PhotoStore::init_global(settings.store);
    let gallery = Gallery::load(store).await?;
    tracing::info!(
        "{} photos in {} groups",
        gallery.photos().len(),
        gallery.groups().len() - 1
    );
    for group in gallery.groups() {
        let count = gallery.photos().iter().filter(|p| group.filter(p)).count();
        tracing::info!("{:>12} {count}", group.label());
    }
    for photo in gallery.visible() {
        tracing::info!("{:>6} {}", photo.id, photo.name);
    }
    store.close().await?;
    Ok(())
}
