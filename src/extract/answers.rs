//! Answer-object constructor calls (`Real(...)`, `Formula(...)`, ...).

use super::registry::Registry;
use crate::model::{AnswerCtor, Answers};
use crate::scan::{iter_calls, SourceText};

pub fn extract_answers(source: &SourceText, registry: &Registry) -> Answers {
    let ctors: Vec<AnswerCtor> = iter_calls(source.stripped(), &registry.answer_ctors, source.newlines())
        .map(|call| AnswerCtor {
            name: call.name,
            line: call.line,
        })
        .collect();
    let has_multi_answer = ctors.iter().any(|c| registry.is_multi_answer(&c.name));

    Answers {
        ctors,
        has_multi_answer,
    }
}
