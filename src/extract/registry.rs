//! Name tables that drive the extractors.
//!
//! A [`Registry`] is plain immutable data handed to each extractor, so tests
//! can build narrowed or extended tables without touching global state.

use crate::model::WidgetKind;

/// Macro-loading call whose filenames land in `loadMacros`.
pub const LOAD_MACROS: &str = "loadMacros";
/// Macro-loading call whose filenames land in `includePGproblem`.
pub const INCLUDE_PGPROBLEM: &str = "includePGproblem";

#[derive(Debug, Clone)]
pub struct Registry {
    pub macro_calls: Vec<&'static str>,
    pub evaluator_calls: Vec<&'static str>,
    pub widgets: Vec<(&'static str, WidgetKind)>,
    /// Widget constructors whose first quoted argument names the answer.
    pub named_widgets: Vec<&'static str>,
    pub answer_ctors: Vec<&'static str>,
    pub multi_answer_ctors: Vec<&'static str>,
    /// Macro files that corroborate a classification; reported as reasons.
    pub corroborating_macros: Vec<&'static str>,
}

impl Registry {
    pub fn widget_names(&self) -> Vec<&'static str> {
        self.widgets.iter().map(|(name, _)| *name).collect()
    }

    pub fn widget_kind(&self, name: &str) -> Option<WidgetKind> {
        self.widgets
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, kind)| *kind)
    }

    pub fn is_named_widget(&self, name: &str) -> bool {
        self.named_widgets.contains(&name)
    }

    pub fn is_multi_answer(&self, name: &str) -> bool {
        self.multi_answer_ctors.contains(&name)
    }
}

impl Default for Registry {
    fn default() -> Self {
        use WidgetKind::*;

        Self {
            macro_calls: vec![LOAD_MACROS, INCLUDE_PGPROBLEM],
            evaluator_calls: vec!["ANS"],
            widgets: vec![
                ("ans_rule", Blank),
                ("ans_box", Blank),
                ("ans_array", Blank),
                ("ans_array_extension", Blank),
                ("NAMED_ANS_RULE", Blank),
                ("NAMED_ANS_BOX", Blank),
                ("PopUp", Popup),
                ("DropDown", Popup),
                ("DropDownTF", Popup),
                ("pop_up_list", Popup),
                ("new_pop_up_select_list", Popup),
                ("RadioButtons", Radio),
                ("RadioMultiAnswer", Radio),
                ("new_multiple_choice", Radio),
                ("radio_buttons", Radio),
                ("ans_radio_buttons", Radio),
                ("CheckboxList", Checkbox),
                ("new_checkbox_multiple_choice", Checkbox),
                ("checkbox_buttons", Checkbox),
                ("ans_checkbox_buttons", Checkbox),
                ("new_match_list", Matching),
                ("new_select_list", Matching),
                ("Sort", Ordering),
                ("DraggableProof", Ordering),
                ("DraggableSubsets", Other),
                ("GraphTool", Other),
            ],
            named_widgets: vec!["NAMED_ANS_RULE", "NAMED_ANS_BOX"],
            answer_ctors: vec![
                "Real",
                "Formula",
                "Compute",
                "Complex",
                "List",
                "Point",
                "Vector",
                "Matrix",
                "Interval",
                "String",
                "Fraction",
                "MultiAnswer",
            ],
            multi_answer_ctors: vec!["MultiAnswer"],
            corroborating_macros: vec![
                "parserRadioButtons.pl",
                "parserPopUp.pl",
                "parserCheckboxList.pl",
                "PGchoicemacros.pl",
                "parserMultiAnswer.pl",
                "draggableProof.pl",
                "PGML.pl",
            ],
        }
    }
}
