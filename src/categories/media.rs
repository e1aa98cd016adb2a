//! Media blocks

use serde::Deserialize;
use serde_json::Value;

use super::{choice, str_prop, BlockCategory};
use crate::core::block::{define_block, AiCapabilities, BlockError, BlockMeta, FnBlock};
use crate::core::node::Node;
use crate::core::schema::PropType;
use crate::core::Props;

/// Single image
///
/// Variants: `default`, `rounded`, `circle`.
pub fn image() -> FnBlock {
    define_block(
        BlockMeta::new("ImageBlock", "Image")
            .with_icon("image")
            .with_category(BlockCategory::Media)
            .with_variants(["default", "rounded", "circle"])
            .with_prop("src", PropType::Image)
            .with_prop("alt", PropType::String)
            .with_prop("width", PropType::Number)
            .with_prop("height", PropType::Number)
            .with_prop("variant", PropType::String)
            .with_ai(AiCapabilities {
                enhance: true,
                translate: false,
            }),
        render_image,
    )
}

fn render_image(props: &Props) -> Result<Node, BlockError> {
    let src = str_prop(props, "src").ok_or_else(|| BlockError::InvalidProps("ImageBlock needs a src".into()))?;
    let variant = choice(props, "variant", &["default", "rounded", "circle"]);

    let mut img = Node::element("img")
        .attr("class", format!("block-image image-{}", variant))
        .attr("src", src)
        .attr("alt", str_prop(props, "alt").unwrap_or_default());
    for dim in ["width", "height"] {
        if let Some(n) = props.get(dim).and_then(Value::as_u64) {
            img = img.attr(dim, n.to_string());
        }
    }
    Ok(img.into())
}

#[derive(Debug, Deserialize)]
struct GalleryImage {
    src: String,
    #[serde(default)]
    alt: String,
}

/// Image grid
///
/// `images` is a list of `{ "src", "alt" }` objects, either inline or as a
/// JSON-encoded string. Columns: 2 to 4 (default 3).
pub fn gallery() -> FnBlock {
    define_block(
        BlockMeta::new("GalleryBlock", "Gallery")
            .with_icon("gallery")
            .with_category(BlockCategory::Media)
            .with_prop("images", PropType::String)
            .with_prop("columns", PropType::Number)
            .with_prop("gap", PropType::String),
        render_gallery,
    )
}

fn gallery_images(props: &Props) -> Result<Vec<GalleryImage>, BlockError> {
    let parsed: serde_json::Result<Vec<GalleryImage>> = match props.get("images") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::String(json)) => serde_json::from_str(json),
        Some(other) => serde_json::from_value(other.clone()),
    };
    parsed.map_err(|e| BlockError::InvalidProps(format!("GalleryBlock images: {}", e)))
}

fn render_gallery(props: &Props) -> Result<Node, BlockError> {
    let columns = props
        .get("columns")
        .and_then(Value::as_u64)
        .filter(|c| (2..=4).contains(c))
        .unwrap_or(3);
    let gap = choice(props, "gap", &["md", "sm", "lg"]);

    let grid = gallery_images(props)?.into_iter().fold(
        Node::element("div").attr("class", format!("block-gallery cols-{} gap-{}", columns, gap)),
        |grid, img| grid.child(Node::element("img").attr("src", img.src).attr("alt", img.alt)),
    );
    Ok(grid.into())
}
