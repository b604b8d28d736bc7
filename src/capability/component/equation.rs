use crate::capability::BlockComponent;
use crate::record::{Block, text};
use crate::render::RenderContext;
use crate::utils::html::{self, escape};

/// Block equation, emitted as `\[ tex \]` for client-side typesetting.
pub struct EquationBlock;

impl BlockComponent for EquationBlock {
    fn render(&self, block: &Block, _cx: &RenderContext<'_>) -> String {
        let tex = block.property("title").map(text::plain).unwrap_or_default();
        html::element(
            "div",
            &[("class", "notion-equation notion-equation-block")],
            &format!("\\[{}\\]", escape(tex.trim())),
        )
    }
}
