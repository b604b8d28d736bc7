use super::source_url;
use crate::capability::BlockComponent;
use crate::record::Block;
use crate::render::RenderContext;
use crate::utils::html;

/// Inline PDF viewer. Browser target only.
pub struct PdfViewer;

impl BlockComponent for PdfViewer {
    fn render(&self, block: &Block, _cx: &RenderContext<'_>) -> String {
        let Some(src) = source_url(block) else {
            return String::new();
        };
        let object = html::element(
            "object",
            &[
                ("data", &src),
                ("type", "application/pdf"),
                ("width", "100%"),
                ("height", "600"),
            ],
            "",
        );
        html::element(
            "div",
            &[("class", "notion-asset-wrapper notion-asset-wrapper-pdf")],
            &object,
        )
    }
}
