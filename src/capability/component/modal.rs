use crate::capability::BlockComponent;
use crate::record::Block;
use crate::render::RenderContext;
use crate::utils::html;

/// Zoom overlay trigger for images. Browser target only.
///
/// The overlay mounts on `app_element`, which the loader registers before
/// this component exists.
pub struct ModalOverlay {
    app_element: String,
}

impl ModalOverlay {
    pub fn new(app_element: String) -> Self {
        Self { app_element }
    }

    pub fn app_element(&self) -> &str {
        &self.app_element
    }
}

impl BlockComponent for ModalOverlay {
    fn render(&self, block: &Block, _cx: &RenderContext<'_>) -> String {
        html::element(
            "button",
            &[
                ("class", "notion-image-zoom"),
                ("type", "button"),
                ("aria-label", "Zoom image"),
                ("data-zoom-target", &block.id),
                ("data-app-element", &self.app_element),
            ],
            "",
        )
    }
}
