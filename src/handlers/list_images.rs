use crate::engine::{ContainerEngine, EngineError, ImageDescriptor};
use crate::reference::{short_image_id, split_repo_tag};

const HEADER: &str = "REPOSITORY\tTAG\tIMAGE ID\tCREATED\tSIZE";
const NONE: &str = "<none>";
const BYTES_PER_MB: u64 = 1024 * 1024;

/// Handle a `list_images` tool call.
///
/// One row per repository tag; untagged images get a single `<none>` row.
/// Sizes are whole megabytes, rounded down.
pub async fn handle(engine: &dyn ContainerEngine) -> Result<String, EngineError> {
    let images = engine.list_images().await?;
    Ok(render_table(&images))
}

pub fn render_table(images: &[ImageDescriptor]) -> String {
    let mut rows = Vec::new();

    for image in images {
        let id = short_image_id(&image.id);
        let size_mb = image.size / BYTES_PER_MB;

        if image.tags.is_empty() {
            rows.push(format!("{NONE}\t{NONE}\t{id}\t{}\t{size_mb}MB", image.created));
            continue;
        }

        for tag in &image.tags {
            let (repo, tag) = split_repo_tag(tag);
            rows.push(format!(
                "{repo}\t{}\t{id}\t{}\t{size_mb}MB",
                tag.unwrap_or(NONE),
                image.created
            ));
        }
    }

    format!("{HEADER}\n{}", rows.join("\n"))
}
