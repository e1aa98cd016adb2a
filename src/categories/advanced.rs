//! Advanced blocks

use super::{str_prop, BlockCategory};
use crate::core::block::{define_block, BlockError, BlockMeta, FnBlock};
use crate::core::node::Node;
use crate::core::schema::PropType;
use crate::core::Props;

/// Donation call-to-action
///
/// Links out to `paymentLinkUrl` in a new tab. Without a link the button is
/// replaced by a disabled notice.
pub fn donation() -> FnBlock {
    define_block(
        BlockMeta::new("DonationBlock", "Donation")
            .with_icon("coffee")
            .with_category(BlockCategory::Advanced)
            .with_prop("title", PropType::String)
            .with_prop("description", PropType::Text)
            .with_prop("buttonLabel", PropType::String)
            .with_prop("paymentLinkUrl", PropType::String),
        render_donation,
    )
}

fn render_donation(props: &Props) -> Result<Node, BlockError> {
    let title = str_prop(props, "title").unwrap_or("Support this project");
    let description = str_prop(props, "description")
        .unwrap_or("If this project helps you, you can support it by buying us a coffee.");
    let label = str_prop(props, "buttonLabel").unwrap_or("Buy us a coffee");
    let link = str_prop(props, "paymentLinkUrl").map(str::trim).filter(|l| !l.is_empty());

    let action = match link {
        Some(url) => Node::element("a")
            .attr("class", "donation-button")
            .attr("href", url)
            .attr("target", "_blank")
            .attr("rel", "noopener noreferrer")
            .text(label),
        None => Node::element("div")
            .attr("class", "donation-disabled")
            .text("Donation link not configured yet"),
    };

    let state = if link.is_some() { "enabled" } else { "disabled" };
    Ok(Node::element("div")
        .attr("class", format!("block-donation donation-{}", state))
        .child(Node::element("h2").text(title))
        .child(Node::element("p").text(description))
        .child(action)
        .into())
}
