//! Layout blocks
//!
//! Structural blocks that frame other content. Children of a layout block
//! render as siblings after it, so these blocks only draw their own header.

use serde_json::Value;

use super::{choice, str_prop, BlockCategory};
use crate::core::block::{define_block, BlockError, BlockMeta, FnBlock};
use crate::core::node::Node;
use crate::core::schema::PropType;
use crate::core::Props;

/// Full-width section with an optional title and subtitle
///
/// Variants: `default`, `dark`, `accent`. Padding: `none`, `sm`, `md`, `lg`.
pub fn section() -> FnBlock {
    define_block(
        BlockMeta::new("SectionBlock", "Section")
            .with_icon("section")
            .with_category(BlockCategory::Layout)
            .with_variants(["default", "dark", "accent"])
            .with_prop("title", PropType::String)
            .with_prop("subtitle", PropType::String)
            .with_prop("variant", PropType::String)
            .with_prop("padding", PropType::String),
        render_section,
    )
}

fn render_section(props: &Props) -> Result<Node, BlockError> {
    let variant = choice(props, "variant", &["default", "dark", "accent"]);
    let padding = choice(props, "padding", &["md", "none", "sm", "lg"]);

    Ok(Node::element("section")
        .attr("class", format!("block-section section-{} pad-{}", variant, padding))
        .child_opt(str_prop(props, "title").map(|t| Node::element("h2").text(t)))
        .child_opt(str_prop(props, "subtitle").map(|t| Node::element("p").text(t)))
        .into())
}

/// Two-column grid
///
/// `left` and `right` are text. Ratio: `50-50`, `60-40`, `40-60`.
pub fn two_column() -> FnBlock {
    define_block(
        BlockMeta::new("TwoColumnBlock", "Two Column")
            .with_icon("columns")
            .with_category(BlockCategory::Layout)
            .with_prop("left", PropType::Text)
            .with_prop("right", PropType::Text)
            .with_prop("ratio", PropType::String)
            .with_prop("gap", PropType::String),
        render_two_column,
    )
}

fn render_two_column(props: &Props) -> Result<Node, BlockError> {
    let ratio = choice(props, "ratio", &["50-50", "60-40", "40-60"]);
    let gap = choice(props, "gap", &["md", "sm", "lg"]);
    let column = |name: &str| {
        let text = props.get(name).and_then(Value::as_str).unwrap_or_default();
        Node::element("div").attr("class", "column").text(text)
    };

    Ok(Node::element("div")
        .attr("class", format!("block-two-column ratio-{} gap-{}", ratio, gap))
        .child(column("left"))
        .child(column("right"))
        .into())
}
