//! Macro-load extraction.

use once_cell::sync::Lazy;
use regex::Regex;

use super::registry::{Registry, INCLUDE_PGPROBLEM, LOAD_MACROS};
use crate::model::Macros;
use crate::scan::{iter_calls, NewlineIndex};

static FILENAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"['"]([^'"]+\.(?:pl|pg))['"]"#).expect("valid filename pattern"));

/// Quoted `.pl`/`.pg` filenames in a call's argument text, in order.
pub fn filenames(arg_text: &str) -> impl Iterator<Item = &str> {
    FILENAME
        .captures_iter(arg_text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub fn extract_macros(stripped: &str, newlines: &NewlineIndex, registry: &Registry) -> Macros {
    let mut macros = Macros::default();

    for call in iter_calls(stripped, &registry.macro_calls, newlines) {
        let target = match call.name.as_str() {
            LOAD_MACROS => &mut macros.load_macros,
            INCLUDE_PGPROBLEM => &mut macros.include_pgproblem,
            _ => continue,
        };
        for filename in filenames(&call.arg_text) {
            push_unique(target, filename);
        }
    }

    macros
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|existing| existing == value) {
        list.push(value.to_string());
    }
}
