//! Heuristic association of input widgets with evaluators.
//!
//! Named rules referenced by name are paired first. Everything else pairs by
//! position: the Nth remaining input widget with the Nth remaining evaluator.
//! The result is a soft signal for the classifier, not a claim about which
//! evaluator grades which widget.

use serde::{Deserialize, Serialize};

use crate::model::{Evaluator, Widget};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WiringMethod {
    ByName,
    ByPosition,
}

/// One widget/evaluator pairing. Indices refer to the slices given to [`wire`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WiringEntry {
    pub widget: usize,
    pub evaluator: usize,
    pub method: WiringMethod,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wiring {
    pub entries: Vec<WiringEntry>,
}

impl Wiring {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_wired(&self, widget: usize) -> bool {
        self.entries.iter().any(|e| e.widget == widget)
    }

    pub fn evaluator_for(&self, widget: usize) -> Option<usize> {
        self.entries
            .iter()
            .find(|e| e.widget == widget)
            .map(|e| e.evaluator)
    }
}

pub fn wire(widgets: &[Widget], evaluators: &[Evaluator]) -> Wiring {
    let mut entries = Vec::new();
    let mut evaluator_taken = vec![false; evaluators.len()];
    let mut widget_taken = vec![false; widgets.len()];

    for (wi, widget) in widgets.iter().enumerate() {
        let Some(name) = widget.name.as_deref().filter(|_| widget.kind.is_input()) else {
            continue;
        };
        let matched = evaluators
            .iter()
            .enumerate()
            .find(|(ei, e)| !evaluator_taken[*ei] && e.rule_name.as_deref() == Some(name));
        if let Some((ei, _)) = matched {
            evaluator_taken[ei] = true;
            widget_taken[wi] = true;
            entries.push(WiringEntry {
                widget: wi,
                evaluator: ei,
                method: WiringMethod::ByName,
            });
        }
    }

    let free_widgets = widgets
        .iter()
        .enumerate()
        .filter(|(wi, w)| w.kind.is_input() && !widget_taken[*wi])
        .map(|(wi, _)| wi);
    let free_evaluators = (0..evaluators.len()).filter(|ei| !evaluator_taken[*ei]);

    entries.extend(
        free_widgets
            .zip(free_evaluators)
            .map(|(widget, evaluator)| WiringEntry {
                widget,
                evaluator,
                method: WiringMethod::ByPosition,
            }),
    );
    entries.sort_by_key(|e| e.widget);

    Wiring { entries }
}
