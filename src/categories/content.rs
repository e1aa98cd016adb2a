//! Content blocks
//!
//! Text-bearing blocks: headings, paragraphs, heroes, buttons and cards.

use super::{choice, str_prop};
use crate::core::block::{define_block, AiCapabilities, BlockError, BlockMeta, FnBlock};
use crate::core::node::Node;
use crate::core::schema::PropType;
use crate::core::Props;

const ENHANCE: AiCapabilities = AiCapabilities {
    enhance: true,
    translate: false,
};

/// Heading at `level` 1 to 6 (default 1)
pub fn heading() -> FnBlock {
    define_block(
        BlockMeta::new("HeadingBlock", "Heading")
            .with_icon("heading")
            .with_prop("text", PropType::String)
            .with_prop("level", PropType::Number)
            .with_ai(ENHANCE),
        render_heading,
    )
}

fn render_heading(props: &Props) -> Result<Node, BlockError> {
    let level = props
        .get("level")
        .and_then(|v| v.as_u64())
        .map_or(1, |l| l.clamp(1, 6));
    let text = str_prop(props, "text").unwrap_or_default();

    Ok(Node::element(format!("h{}", level))
        .attr("class", "block-heading")
        .text(text)
        .into())
}

/// Paragraph of body text
pub fn text() -> FnBlock {
    define_block(
        BlockMeta::new("TextBlock", "Text")
            .with_icon("text")
            .with_prop("text", PropType::Text)
            .with_ai(AiCapabilities {
                enhance: true,
                translate: true,
            }),
        |props| {
            let text = str_prop(props, "text").unwrap_or_default();
            Ok(Node::element("p").attr("class", "block-text").text(text).into())
        },
    )
}

/// Banner with a large title and optional subtitle
pub fn hero() -> FnBlock {
    define_block(
        BlockMeta::new("HeroBlock", "Hero")
            .with_icon("target")
            .with_prop("title", PropType::String)
            .with_prop("subtitle", PropType::String)
            .with_ai(ENHANCE),
        |props| {
            Ok(Node::element("div")
                .attr("class", "block-hero")
                .child(Node::element("h1").text(str_prop(props, "title").unwrap_or_default()))
                .child_opt(str_prop(props, "subtitle").map(|s| Node::element("p").text(s)))
                .into())
        },
    )
}

/// Link or button
///
/// Renders an `<a>` when `href` is set, otherwise a `<button>`.
pub fn button() -> FnBlock {
    define_block(
        BlockMeta::new("ButtonBlock", "Button")
            .with_icon("button")
            .with_variants(["primary", "secondary", "ghost"])
            .with_prop("text", PropType::String)
            .with_prop("href", PropType::String)
            .with_prop("variant", PropType::String)
            .with_prop("size", PropType::String)
            .with_ai(ENHANCE),
        render_button,
    )
}

fn render_button(props: &Props) -> Result<Node, BlockError> {
    let variant = choice(props, "variant", &["primary", "secondary", "ghost"]);
    let size = choice(props, "size", &["md", "sm", "lg"]);
    let class = format!("block-button button-{} size-{}", variant, size);
    let text = str_prop(props, "text").unwrap_or_default();

    let el = match str_prop(props, "href") {
        Some(href) => Node::element("a").attr("href", href),
        None => Node::element("button").attr("type", "button"),
    };
    Ok(el.attr("class", class).text(text).into())
}

/// Card with optional image, title, subtitle and body
pub fn card() -> FnBlock {
    define_block(
        BlockMeta::new("CardBlock", "Card")
            .with_icon("card")
            .with_variants(["default", "elevated", "outlined"])
            .with_prop("title", PropType::String)
            .with_prop("subtitle", PropType::String)
            .with_prop("content", PropType::Text)
            .with_prop("image", PropType::Image)
            .with_prop("variant", PropType::String),
        render_card,
    )
}

fn render_card(props: &Props) -> Result<Node, BlockError> {
    let variant = choice(props, "variant", &["default", "elevated", "outlined"]);
    let title = str_prop(props, "title");

    let image = str_prop(props, "image").map(|src| {
        Node::element("img")
            .attr("src", src)
            .attr("alt", title.unwrap_or_default())
    });

    Ok(Node::element("div")
        .attr("class", format!("block-card card-{}", variant))
        .child_opt(image)
        .child_opt(title.map(|t| Node::element("h3").text(t)))
        .child_opt(str_prop(props, "subtitle").map(|s| Node::element("p").attr("class", "subtitle").text(s)))
        .child_opt(str_prop(props, "content").map(|c| Node::element("p").text(c)))
        .into())
}
