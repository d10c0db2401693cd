//! Answer-widget extraction from constructor calls and markup blanks.

use once_cell::sync::Lazy;
use regex::Regex;

use super::pgml;
use super::registry::Registry;
use crate::model::{PgmlInfo, Widget, WidgetKind};
use crate::scan::{iter_calls, SourceText};

static FIRST_QUOTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^\s*['"]([^'"]+)['"]"#).expect("valid quoted-argument pattern"));

const PGML_BLANK_SOURCE: &str = "[_]";

/// Widgets in source order, plus markup statistics.
pub fn extract_widgets(source: &SourceText, registry: &Registry) -> (Vec<Widget>, PgmlInfo) {
    let names = registry.widget_names();
    let mut widgets: Vec<Widget> = iter_calls(source.stripped(), &names, source.newlines())
        .filter_map(|call| {
            let kind = registry.widget_kind(&call.name)?;
            let name = registry
                .is_named_widget(&call.name)
                .then(|| first_quoted(&call.arg_text))
                .flatten();
            Some(Widget {
                kind,
                source: call.name,
                line: call.line,
                ordinal: 0,
                name,
                offset: call.offset,
            })
        })
        .collect();

    let markup = source.markup();
    let regions = pgml::pgml_regions(markup);
    widgets.extend(
        pgml::blank_offsets(markup, &regions)
            .into_iter()
            .map(|offset| Widget {
                kind: WidgetKind::PgmlBlank,
                source: PGML_BLANK_SOURCE.to_string(),
                line: source.line_of(offset),
                ordinal: 0,
                name: None,
                offset,
            }),
    );

    widgets.sort_by_key(|w| w.offset);
    for (ordinal, widget) in widgets.iter_mut().enumerate() {
        widget.ordinal = ordinal;
    }

    let info = pgml::pgml_info(markup, source.newlines());
    (widgets, info)
}

fn first_quoted(arg_text: &str) -> Option<String> {
    FIRST_QUOTED
        .captures(arg_text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
