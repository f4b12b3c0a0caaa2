//! Rule-based role binding over a tagged document.
//!
//! Each sentence is bound in two steps. Planning reads the document and decides
//! a [`BindingSet`]; applying writes it back. Planning is side-effect free, so a
//! whole document is planned in parallel and applied in sentence order.

pub mod automaton;
pub mod bindings;
pub mod error;
pub mod lexicon;
pub mod subjects;

use hecs::Entity;
use lexis_dispatch::Match;
use lexis_ecs::patterns::IsVerbPhrase;
use lexis_ecs::DocumentWorld;
use lexis_protocol::SentenceId;
use rayon::prelude::*;

pub use automaton::{Automaton, State, Symbol};
pub use bindings::{Binding, BindingSet};
pub use error::BindError;
pub use lexicon::VerbClass;
pub use subjects::find_subjects;

/// Decides the bindings of one sentence without touching the document.
///
/// Returns `None` for a sentence without a verb phrase.
pub fn plan_sentence(doc: &DocumentWorld, sentence: Entity) -> Result<Option<BindingSet>, BindError> {
    let phrases = doc.sentence_phrases(sentence)?;

    let mut first_verbal = None;
    for (index, phrase) in phrases.iter().enumerate() {
        Match::on(doc.construct(*phrase)).case::<IsVerbPhrase>(|_| first_verbal = Some(index));
        if first_verbal.is_some() {
            break;
        }
    }
    let Some(index) = first_verbal else {
        return Ok(None);
    };

    let subjects = find_subjects(doc, &phrases[..index]);
    let bindings = Automaton::new(doc, phrases[index], subjects, &phrases[index + 1..]).run()?;
    Ok(Some(BindingSet::new(sentence, bindings)))
}

/// Plans and applies one sentence. Returns whether anything was bound.
pub fn bind_sentence(doc: &mut DocumentWorld, sentence: Entity) -> Result<bool, BindError> {
    match plan_sentence(doc, sentence)? {
        Some(plan) => {
            plan.apply(doc)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentenceFailure {
    pub sentence: SentenceId,
    pub entity: Entity,
    pub error: BindError,
}

/// Outcome of binding a whole document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindReport {
    pub bound: usize,
    /// Sentences without a verb phrase.
    pub skipped: usize,
    pub failures: Vec<SentenceFailure>,
}

impl BindReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Binds every sentence. A failing sentence is reported and left unbound; the
/// rest of the document is still processed.
pub fn bind_document(doc: &mut DocumentWorld) -> BindReport {
    let sentences = doc.sentences().to_vec();

    let plans: Vec<_> = {
        let view: &DocumentWorld = doc;
        sentences
            .par_iter()
            .map(|sentence| plan_sentence(view, *sentence))
            .collect()
    };

    let mut report = BindReport::default();
    for (index, (sentence, plan)) in sentences.iter().zip(plans).enumerate() {
        let outcome = plan.and_then(|plan| match plan {
            Some(plan) => plan.apply(doc).map(|_| true).map_err(BindError::from),
            None => Ok(false),
        });

        match outcome {
            Ok(true) => report.bound += 1,
            Ok(false) => report.skipped += 1,
            Err(error) => {
                let id = SentenceId::new(index as u32);
                tracing::warn!(sentence = %id, %error, "sentence left unbound");
                report.failures.push(SentenceFailure { sentence: id, entity: *sentence, error });
            }
        }
    }

    tracing::debug!(
        bound = report.bound,
        skipped = report.skipped,
        failed = report.failures.len(),
        "document bound"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexis_ecs::components::Role;

    fn bound(notation: &str) -> (DocumentWorld, Vec<Entity>) {
        let mut doc = DocumentWorld::from_notation(notation).unwrap();
        let report = bind_document(&mut doc);
        assert!(report.is_clean(), "{:?}", report.failures);
        let phrases = doc.sentence_phrases(doc.sentences()[0]).unwrap();
        (doc, phrases)
    }

    #[test]
    fn test_gave_mary_a_book() {
        let (doc, p) = bound("[NP John/NNP@person] [VP gave/VBD] [NP Mary/NNP@person] [NP a/DT book/NN] .");
        let gave = doc.verbal_roles(p[1]).unwrap();

        assert_eq!(gave.subjects, vec![p[0]]);
        assert_eq!(gave.indirect_objects, vec![p[2]]);
        assert_eq!(gave.direct_objects, vec![p[3]]);
        assert_eq!(doc.entity_roles(p[0]).unwrap().subject_of, Some(p[1]));
        assert_eq!(doc.entity_roles(p[2]).unwrap().indirect_object_of, Some(p[1]));
        assert_eq!(doc.entity_roles(p[3]).unwrap().direct_object_of, Some(p[1]));

        let book = doc.construct(p[3]).phrase_words()[1];
        assert_eq!(doc.entity_roles(book).unwrap().direct_object_of, Some(p[1]));
    }

    #[test]
    fn test_conjoined_objects_form_aggregate() {
        let (doc, p) = bound(
            "[NP The/DT committee/NN] [VP approved/VBD] [NP the/DT proposal/NN] [CONJ and/CC] [NP the/DT budget/NN] .",
        );
        let approved = doc.verbal_roles(p[1]).unwrap();

        assert_eq!(approved.direct_objects, vec![p[2], p[4]]);
        assert_eq!(approved.aggregates.len(), 1);
        let (role, aggregate) = approved.aggregates[0];
        assert_eq!(role, Role::DirectObject);
        assert_eq!(doc.construct(aggregate).aggregate_members(), vec![p[2], p[4]]);
        assert_eq!(doc.entity_roles(aggregate).unwrap().direct_object_of, Some(p[1]));
        assert_eq!(doc.entity_roles(p[2]).unwrap().conjoined_with, vec![p[4]]);
        assert_eq!(doc.entity_roles(p[4]).unwrap().conjoined_with, vec![p[2]]);
    }

    #[test]
    fn test_conjoined_subjects() {
        let (doc, p) = bound("[NP Tom/NNP] [CONJ and/CC] [NP Ann/NNP] [VP left/VBD] [NP town/NN] .");
        let left = doc.verbal_roles(p[3]).unwrap();

        assert_eq!(left.subjects, vec![p[0], p[2]]);
        assert_eq!(left.aggregates.len(), 1);
        assert_eq!(left.aggregates[0].0, Role::Subject);
    }

    #[test]
    fn test_copula_aliases() {
        let (doc, p) = bound("[NP Rodents/NNS] [VP are/VBP] [NP prey/NN animals/NNS] .");

        assert_eq!(doc.entity_roles(p[0]).unwrap().aliases, vec![p[2]]);
        assert_eq!(doc.entity_roles(p[2]).unwrap().aliases, vec![p[0]]);
        assert!(doc.entity_roles(p[0]).unwrap().possessed.is_empty());
    }

    #[test]
    fn test_copula_postpositive_describes_subject() {
        let (doc, p) = bound("[NP The/DT cake/NN] [VP is/VBZ] [ADJP delicious/JJ] .");

        assert_eq!(doc.verbal_roles(p[1]).unwrap().postpositive_descriptor, Some(p[2]));
        assert_eq!(doc.entity_roles(p[0]).unwrap().described_by, vec![p[2]]);
    }

    #[test]
    fn test_have_possession() {
        let (doc, p) = bound("[NP The/DT cat/NN] [VP has/VBZ] [NP a/DT hat/NN] .");

        assert_eq!(doc.entity_roles(p[0]).unwrap().possessed, vec![p[2]]);
        assert_eq!(doc.entity_roles(p[2]).unwrap().possessor, Some(p[0]));
        assert!(doc.entity_roles(p[0]).unwrap().aliases.is_empty());
    }

    #[test]
    fn test_modality() {
        let (doc, p) = bound("[NP We/PRP] [VP will/MD have/VB] [NP tea/NN] .");
        let will = doc.construct(p[1]).phrase_words()[0];

        assert_eq!(doc.verbal_roles(p[1]).unwrap().modality, Some(will));
        assert_eq!(doc.entity_roles(p[0]).unwrap().possessed, vec![p[2]]);
    }

    #[test]
    fn test_adjective_describes_following_noun() {
        let (doc, p) = bound("[NP She/PRP] [VP baked/VBD] [ADJP fresh/JJ] [NP bread/NN] .");

        assert_eq!(doc.entity_roles(p[3]).unwrap().described_by, vec![p[2]]);
        assert_eq!(doc.verbal_roles(p[1]).unwrap().direct_objects, vec![p[3]]);
    }

    #[test]
    fn test_prepositional_attachment() {
        let (doc, p) = bound("[NP I/PRP] [VP sat/VBD] [PP on/IN] [NP the/DT bench/NN] .");
        let sat = doc.verbal_roles(p[1]).unwrap();

        assert_eq!(sat.prepositional_attachments, vec![(p[2], p[3])]);
        assert_eq!(sat.object_of_preposition, Some(p[3]));
        assert_eq!(doc.entity_roles(p[3]).unwrap().object_of_preposition, Some(p[2]));
    }

    #[test]
    fn test_adverb_modifier() {
        let (doc, p) = bound("[NP He/PRP] [VP ran/VBD] [ADVP quickly/RB] .");

        assert_eq!(doc.verbal_roles(p[1]).unwrap().adverbial_modifiers, vec![p[2]]);
    }

    #[test]
    fn test_structural_failure_is_reported() {
        let mut doc = DocumentWorld::from_notation(
            "[NP Sue/NNP] [VP sang/VBD] . [NP Good/JJ morning/NN] . [NP John/NNP] [VP ran/VBD] [CONJ and/CC] [VP jumped/VBD] .",
        )
        .unwrap();

        let report = bind_document(&mut doc);

        assert_eq!(report.bound, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failures.len(), 1);
        let failure = &report.failures[0];
        assert_eq!(failure.sentence, SentenceId::new(2));
        assert_eq!(failure.entity, doc.sentences()[2]);
        assert!(matches!(failure.error, BindError::Structural { state: State::ExpectObject, .. }));

        let ran = doc.sentence_phrases(doc.sentences()[2]).unwrap()[1];
        assert!(doc.verbal_roles(ran).unwrap().subjects.is_empty());
    }

    #[test]
    fn test_sentence_without_verb_is_skipped() {
        let mut doc = DocumentWorld::from_notation("[NP Good/JJ morning/NN] .").unwrap();
        let sentence = doc.sentences()[0];

        assert_eq!(plan_sentence(&doc, sentence).unwrap(), None);
        assert!(!bind_sentence(&mut doc, sentence).unwrap());
    }

    #[test]
    fn test_plan_matches_apply() {
        let mut doc = DocumentWorld::from_notation("[NP Ann/NNP] [VP likes/VBZ] [VP to/TO eat/VB] [NP apples/NNS] .")
            .unwrap();
        let sentence = doc.sentences()[0];
        let p = doc.sentence_phrases(sentence).unwrap();

        let plan = plan_sentence(&doc, sentence).unwrap().unwrap();
        assert_eq!(plan.filling(Role::Subject, p[2]), vec![p[0]]);
        assert_eq!(plan.filling(Role::DirectObject, p[2]), vec![p[3]]);

        assert!(bind_sentence(&mut doc, sentence).unwrap());
        assert_eq!(doc.verbal_roles(p[2]).unwrap().direct_objects, vec![p[3]]);
        // Last verbal to bind wins the subject slot.
        assert_eq!(doc.entity_roles(p[0]).unwrap().subject_of, Some(p[2]));
    }
}
