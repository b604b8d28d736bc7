//! Embedded collections, rendered as a table view.

use crate::capability::{BlockComponent, PropertyContext};
use crate::record::{Block, PropertyEntry};
use crate::render::RenderContext;
use crate::utils::html::{self, escape};

pub struct CollectionView;

impl BlockComponent for CollectionView {
    fn render(&self, block: &Block, cx: &RenderContext<'_>) -> String {
        let Some(collection) = block
            .collection_id
            .as_deref()
            .and_then(|id| cx.record.collection(id))
        else {
            return html::element("div", &[("class", "notion-collection")], "");
        };

        let mut head = String::new();
        for (_, schema) in &collection.schema {
            head.push_str(&html::element(
                "th",
                &[("class", "notion-table-th")],
                &escape(&schema.name),
            ));
        }

        let mut body = String::new();
        for row in cx.record.collection_rows(&collection.id) {
            let mut cells = String::new();
            for (id, schema) in &collection.schema {
                let cell = if schema.kind == "title" {
                    let title = cx.record.block_title(row);
                    html::element(
                        "a",
                        &[("class", "notion-page-link"), ("href", &cx.mappers.pages.map_raw(&row.id))],
                        &escape(&title),
                    )
                } else {
                    let data = row.property(id);
                    if data.is_none() && schema.kind != "last_edited_time" {
                        String::new()
                    } else {
                        let entry = PropertyEntry {
                            id,
                            schema,
                            data,
                            block: row,
                        };
                        cx.formatters.format(&PropertyContext::new(entry, false))
                    }
                };
                cells.push_str(&html::element("td", &[("class", "notion-table-cell")], &cell));
            }
            body.push_str(&html::element("tr", &[("class", "notion-table-row")], &cells));
        }

        let title = html::element(
            "div",
            &[("class", "notion-collection-header-title")],
            &escape(&collection.name),
        );
        let table = html::element(
            "table",
            &[("class", "notion-table")],
            &format!("<thead><tr>{head}</tr></thead><tbody>{body}</tbody>"),
        );

        html::element(
            "div",
            &[("class", "notion-collection"), ("data-collection-id", &collection.id)],
            &format!("<div class=\"notion-collection-header\">{title}</div>{table}"),
        )
    }
}
