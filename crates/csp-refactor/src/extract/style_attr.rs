//! `style="..."` attribute extraction
//!
//! Identical declarations (after trimming) share one synthesized class, so a
//! page that repeats `style="color:red"` forty times gets a single CSS rule.

use csp_dom::Document;

use super::Extractor;
use crate::ExtractionContext;

const MARKER: &str = "/* --- Extracted from [style] attribute --- */";

/// Replaces inline `style` attributes with synthesized classes
#[derive(Debug, Clone, Copy, Default)]
pub struct StyleAttributeExtractor;

impl Extractor for StyleAttributeExtractor {
    fn name(&self) -> &'static str {
        "style-attributes"
    }

    fn extract(&self, document: &mut Document, ctx: &mut ExtractionContext) {
        let styled = document.tree().elements_with_attr("style");
        if styled.is_empty() {
            ctx.change_log.info("No inline [style] attributes found.");
            return;
        }

        for node in styled {
            let style = match document.tree().attr(node, "style") {
                Some(value) if !value.trim().is_empty() => value.trim().to_string(),
                _ => continue,
            };

            let (class, reused) = match ctx.cached_class(&style) {
                Some(class) => (class.to_string(), true),
                None => {
                    let class = ctx.synthesize_class();
                    ctx.css.push_chunk(&css_rule(&class, &style));
                    ctx.cache_class(style, class.clone());
                    (class, false)
                }
            };

            let tree = document.tree_mut();
            tree.remove_attr(node, "style");
            tree.add_class(node, &class);

            let tag = tree.tag_name(node).unwrap_or_default();
            if reused {
                ctx.change_log
                    .success(format!("Reused class .{class} for [style] on <{tag}>"));
            } else {
                ctx.change_log
                    .success(format!("Replaced [style] on <{tag}> with new class .{class}"));
            }
        }

        tracing::debug!("{} distinct inline styles", ctx.distinct_styles());
    }
}

/// One declaration per line; a cosmetic split on `;`, not a CSS parse
fn css_rule(class: &str, style: &str) -> String {
    let body = style.replace(';', ";\n    ");
    format!("{MARKER}\n.{class} {{\n    {}\n}}", body.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::test_support::{compact, lines, run};

    #[test]
    fn test_css_rule_layout() {
        assert_eq!(
            css_rule("csp-auto-class-1", "color:red;margin:0;"),
            "/* --- Extracted from [style] attribute --- */\n\
             .csp-auto-class-1 {\n    color:red;\n    margin:0;\n}"
        );
    }

    #[test]
    fn test_no_style_attributes() {
        let (_, ctx) = run(&StyleAttributeExtractor, "<p class='x'>plain</p>");
        assert_eq!(lines(&ctx), vec!["INFO: No inline [style] attributes found."]);
    }

    #[test]
    fn test_identical_styles_share_class() {
        let html = r#"<p style="color:red">a</p><p style="  color:red ">b</p><p style="color: red">c</p>"#;
        let (doc, ctx) = run(&StyleAttributeExtractor, html);

        let classes: Vec<_> = doc
            .tree()
            .elements_by_tag("p")
            .into_iter()
            .map(|p| doc.tree().attr(p, "class").unwrap_or_default().to_string())
            .collect();
        assert_eq!(classes, vec!["csp-auto-class-1", "csp-auto-class-1", "csp-auto-class-2"]);
        assert_eq!(ctx.css.chunks(), 2);
        assert_eq!(ctx.peek_sequence(), 3);
        assert_eq!(
            lines(&ctx),
            vec![
                "SUCCESS: Replaced [style] on <p> with new class .csp-auto-class-1",
                "SUCCESS: Reused class .csp-auto-class-1 for [style] on <p>",
                "SUCCESS: Replaced [style] on <p> with new class .csp-auto-class-2",
            ]
        );
        assert!(!compact(&doc).contains("style="));
    }

    #[test]
    fn test_existing_classes_preserved() {
        let (doc, _) = run(&StyleAttributeExtractor, r#"<div class="card big" style="padding:4px"></div>"#);
        let div = doc.tree().elements_by_tag("div")[0];
        assert_eq!(doc.tree().attr(div, "class"), Some("card big csp-auto-class-1"));
    }

    #[test]
    fn test_blank_style_left_alone() {
        let (doc, ctx) = run(&StyleAttributeExtractor, r#"<div style="   "></div>"#);
        let div = doc.tree().elements_by_tag("div")[0];

        assert_eq!(doc.tree().attr(div, "style"), Some("   "));
        assert!(ctx.change_log.is_empty());
        assert!(ctx.css.is_empty());
        assert_eq!(ctx.peek_sequence(), 1);
    }
}
