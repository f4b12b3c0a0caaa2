//! Salience propagation.
//!
//! Eight passes run in a fixed order, each a barrier for the next. A pass maps
//! the document in parallel into weight increments, then applies them on the
//! calling thread.

use std::collections::HashMap;
use std::sync::Arc;

use hecs::Entity;
use lexis_dispatch::Yield;
use lexis_ecs::patterns::{IsNoun, IsNounPhrase, IsVerb, IsVerbPhrase};
use lexis_ecs::{ConstructRef, DocumentWorld};
use lexis_protocol::{PhraseKind, WordKind};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::config::{ConfigError, PropagationConfig};
use crate::similarity::SimilarityEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pass {
    WordFrequency,
    PhraseFrequency,
    NounSynonyms,
    VerbSynonyms,
    NounPhraseSynonyms,
    VerbPhraseSynonyms,
    ProperNounEmphasis,
    Normalization,
}

impl Pass {
    /// Execution order.
    pub const ALL: [Pass; 8] = [
        Pass::WordFrequency,
        Pass::PhraseFrequency,
        Pass::NounSynonyms,
        Pass::VerbSynonyms,
        Pass::NounPhraseSynonyms,
        Pass::VerbPhraseSynonyms,
        Pass::ProperNounEmphasis,
        Pass::Normalization,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Pass::WordFrequency => "word-frequency",
            Pass::PhraseFrequency => "phrase-frequency",
            Pass::NounSynonyms => "noun-synonyms",
            Pass::VerbSynonyms => "verb-synonyms",
            Pass::NounPhraseSynonyms => "noun-phrase-synonyms",
            Pass::VerbPhraseSynonyms => "verb-phrase-synonyms",
            Pass::ProperNounEmphasis => "proper-noun-emphasis",
            Pass::Normalization => "normalization",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Category {
    Word(WordKind),
    Phrase(PhraseKind),
}

fn category(construct: ConstructRef<'_>) -> Option<Category> {
    construct
        .word()
        .map(|word| Category::Word(word.kind))
        .or_else(|| construct.phrase_kind().map(Category::Phrase))
}

// Role filters for the synonym passes.

fn noun_in_role(construct: ConstructRef<'_>) -> bool {
    Yield::on(construct)
        .case::<IsNoun>(|noun| noun.entity_roles().map_or(false, |roles| roles.in_subject_or_object_role()))
        .or_default(false)
}

fn verb_with_arguments(construct: ConstructRef<'_>) -> bool {
    Yield::on(construct)
        .case::<IsVerb>(|verb| verb.verbal_roles().map_or(false, |roles| roles.has_subject_or_object()))
        .or_default(false)
}

fn noun_phrase_in_role(construct: ConstructRef<'_>) -> bool {
    Yield::on(construct)
        .case::<IsNounPhrase>(|phrase| phrase.entity_roles().map_or(false, |roles| roles.in_subject_or_object_role()))
        .or_default(false)
}

fn verb_phrase_with_arguments(construct: ConstructRef<'_>) -> bool {
    Yield::on(construct)
        .case::<IsVerbPhrase>(|phrase| phrase.verbal_roles().map_or(false, |roles| roles.has_subject_or_object()))
        .or_default(false)
}

pub struct WeightPropagator {
    config: PropagationConfig,
    pool: ThreadPool,
}

impl WeightPropagator {
    pub fn new(config: PropagationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.parallelism.unwrap_or(0))
            .thread_name(|index| format!("lexis-propagate-{}", index))
            .build()?;
        Ok(Self { config, pool })
    }

    /// Runs every pass in order.
    pub fn propagate(&self, doc: &mut DocumentWorld, engine: &SimilarityEngine<'_>) {
        for pass in Pass::ALL {
            self.run_pass(pass, doc, engine);
        }
    }

    /// Runs one pass to completion. Returns how many weights it changed.
    pub fn run_pass(&self, pass: Pass, doc: &mut DocumentWorld, engine: &SimilarityEngine<'_>) -> usize {
        let touched = match pass {
            Pass::WordFrequency => {
                let increments = self.literal_frequency(doc, doc.words());
                accumulate(doc, increments)
            }
            Pass::PhraseFrequency => {
                let increments = self.literal_frequency(doc, doc.phrases());
                accumulate(doc, increments)
            }
            Pass::NounSynonyms => {
                let increments = self.synonym_groups(doc, engine, doc.words(), noun_in_role, self.config.noun_scale);
                accumulate(doc, increments)
            }
            Pass::VerbSynonyms => {
                let increments =
                    self.synonym_groups(doc, engine, doc.words(), verb_with_arguments, self.config.verb_scale);
                accumulate(doc, increments)
            }
            Pass::NounPhraseSynonyms => {
                let increments = self.synonym_groups(
                    doc,
                    engine,
                    doc.phrases(),
                    noun_phrase_in_role,
                    self.config.noun_phrase_scale,
                );
                accumulate(doc, increments)
            }
            Pass::VerbPhraseSynonyms => {
                let increments = self.synonym_groups(
                    doc,
                    engine,
                    doc.phrases(),
                    verb_phrase_with_arguments,
                    self.config.verb_phrase_scale,
                );
                accumulate(doc, increments)
            }
            Pass::ProperNounEmphasis => self.emphasize_proper_nouns(doc),
            Pass::Normalization => self.normalize(doc),
        };

        tracing::debug!(pass = pass.name(), touched, "propagation pass complete");
        touched
    }

    /// Every construct gains the size of its (category, folded text) group.
    fn literal_frequency(&self, doc: &DocumentWorld, constructs: &[Entity]) -> Vec<(Entity, f64)> {
        let keyed: Vec<(Entity, Option<(Category, Arc<str>)>)> = self.pool.install(|| {
            constructs
                .par_iter()
                .map(|entity| {
                    let construct = doc.construct(*entity);
                    (*entity, category(construct).zip(construct.folded()))
                })
                .collect()
        });

        let mut counts: HashMap<&(Category, Arc<str>), usize> = HashMap::new();
        for key in keyed.iter().filter_map(|(_, key)| key.as_ref()) {
            *counts.entry(key).or_default() += 1;
        }

        keyed
            .iter()
            .filter_map(|(entity, key)| {
                let count = counts.get(key.as_ref()?)?;
                Some((*entity, *count as f64))
            })
            .collect()
    }

    /// For every eligible outer construct, its group is the eligible constructs
    /// similar to it, itself included. Each group member gains `scale` times the
    /// group size.
    fn synonym_groups(
        &self,
        doc: &DocumentWorld,
        engine: &SimilarityEngine<'_>,
        constructs: &[Entity],
        eligible: fn(ConstructRef<'_>) -> bool,
        scale: f64,
    ) -> Vec<(Entity, f64)> {
        self.pool.install(|| {
            let members: Vec<Entity> = constructs
                .par_iter()
                .copied()
                .filter(|entity| eligible(doc.construct(*entity)))
                .collect();

            members
                .par_iter()
                .flat_map_iter(|outer| {
                    let outer = doc.construct(*outer);
                    let group: Vec<Entity> = members
                        .iter()
                        .copied()
                        .filter(|inner| engine.compare(outer, doc.construct(*inner)).matched)
                        .collect();
                    let bonus = scale * group.len() as f64;
                    group.into_iter().map(move |member| (member, bonus))
                })
                .collect()
        })
    }

    fn emphasize_proper_nouns(&self, doc: &mut DocumentWorld) -> usize {
        let emphasized: Vec<Entity> = self.pool.install(|| {
            doc.phrases()
                .par_iter()
                .copied()
                .filter(|entity| {
                    Yield::on(doc.construct(*entity))
                        .case::<IsNounPhrase>(|phrase| !phrase.words_where(|word| word.is_proper()).is_empty())
                        .or_default(false)
                })
                .collect()
        });

        for entity in &emphasized {
            doc.scale_weight(*entity, self.config.proper_noun_factor);
        }
        emphasized.len()
    }

    /// Rescales positive phrase weights so the heaviest equals the ceiling.
    /// Already normalized documents are left untouched.
    fn normalize(&self, doc: &mut DocumentWorld) -> usize {
        let ceiling = self.config.normalization_ceiling;
        let positive: Vec<(Entity, f64)> = self.pool.install(|| {
            doc.phrases()
                .par_iter()
                .map(|entity| (*entity, doc.weight(*entity)))
                .filter(|(_, weight)| *weight > 0.0)
                .collect()
        });

        let max = positive.iter().map(|(_, weight)| *weight).fold(0.0_f64, f64::max);
        if max <= 0.0 || max == ceiling {
            return 0;
        }

        for (entity, weight) in &positive {
            doc.set_weight(*entity, weight / max * ceiling);
        }
        positive.len()
    }
}

fn accumulate(doc: &mut DocumentWorld, increments: Vec<(Entity, f64)>) -> usize {
    let touched = increments.len();
    for (entity, delta) in increments {
        doc.add_weight(entity, delta);
    }
    touched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synonyms::SynonymGraph;
    use lexis_binder::bind_document;
    use proptest::prelude::*;

    fn bound(notation: &str) -> DocumentWorld {
        let mut doc = DocumentWorld::from_notation(notation).unwrap();
        let report = bind_document(&mut doc);
        assert!(report.is_clean());
        doc
    }

    fn propagator() -> WeightPropagator {
        WeightPropagator::new(PropagationConfig::default()).unwrap()
    }

    const TWO_DOGS: &str = "[NP The/DT dog/NN] [VP barked/VBD] . [NP The/DT dog/NN] [VP slept/VBD] .";

    #[test]
    fn test_word_frequency() {
        let mut doc = bound(TWO_DOGS);
        let graph = SynonymGraph::new();
        let engine = SimilarityEngine::new(&graph);

        propagator().run_pass(Pass::WordFrequency, &mut doc, &engine);

        let weights: Vec<f64> = doc.words().iter().map(|word| doc.weight(*word)).collect();
        // the dog barked the dog slept
        assert_eq!(weights, vec![2.0, 2.0, 1.0, 2.0, 2.0, 1.0]);
    }

    #[test]
    fn test_noun_synonym_groups() {
        let mut doc = bound(TWO_DOGS);
        let graph = SynonymGraph::new();
        let engine = SimilarityEngine::new(&graph);
        let propagator = propagator();

        propagator.run_pass(Pass::WordFrequency, &mut doc, &engine);
        let touched = propagator.run_pass(Pass::NounSynonyms, &mut doc, &engine);

        // Both outers form the group {dog, dog}; each dog gains 2 twice.
        assert_eq!(touched, 4);
        assert_eq!(doc.weight(doc.words()[1]), 6.0);
        assert_eq!(doc.weight(doc.words()[4]), 6.0);
        assert_eq!(doc.weight(doc.words()[0]), 2.0);
    }

    #[test]
    fn test_unbound_nouns_are_excluded() {
        let mut doc = DocumentWorld::from_notation("[NP dog/NN] . [NP dog/NN] .").unwrap();
        let graph = SynonymGraph::new();
        let engine = SimilarityEngine::new(&graph);

        assert_eq!(propagator().run_pass(Pass::NounSynonyms, &mut doc, &engine), 0);
    }

    #[test]
    fn test_full_propagation() {
        let mut doc = bound(TWO_DOGS);
        let graph = SynonymGraph::new();
        let engine = SimilarityEngine::new(&graph);

        propagator().propagate(&mut doc, &engine);

        let phrases = doc.phrases().to_vec();
        // The dog: 2 + 0.5 * 2 * 2 = 4. Each verb phrase: 1 + 0.5 = 1.5.
        assert_eq!(doc.weight(phrases[0]), 100.0);
        assert_eq!(doc.weight(phrases[2]), 100.0);
        assert_eq!(doc.weight(phrases[1]), 37.5);
        assert_eq!(doc.weight(phrases[3]), 37.5);

        let max = phrases.iter().map(|p| doc.weight(*p)).fold(0.0, f64::max);
        assert_eq!(max, 100.0);
    }

    #[test]
    fn test_synonyms_join_groups() {
        let mut doc = bound("[NP The/DT dog/NN] [VP barked/VBD] . [NP A/DT hound/NN] [VP howled/VBD] .");
        let synonyms = |a: &str, b: &str| a == "dog" && b == "hound";
        let engine = SimilarityEngine::new(&synonyms);

        propagator().run_pass(Pass::NounSynonyms, &mut doc, &engine);

        assert_eq!(doc.weight(doc.words()[1]), 4.0);
        assert_eq!(doc.weight(doc.words()[4]), 4.0);
    }

    #[test]
    fn test_proper_noun_emphasis() {
        let mut doc = bound("[NP John/NNP] [VP met/VBD] [NP the/DT mayor/NN] .");
        let graph = SynonymGraph::new();
        let engine = SimilarityEngine::new(&graph);
        let propagator = propagator();

        propagator.run_pass(Pass::PhraseFrequency, &mut doc, &engine);
        let touched = propagator.run_pass(Pass::ProperNounEmphasis, &mut doc, &engine);

        let phrases = doc.phrases();
        assert_eq!(touched, 1);
        assert_eq!(doc.weight(phrases[0]), 2.0);
        assert_eq!(doc.weight(phrases[2]), 1.0);
    }

    #[test]
    fn test_empty_document_is_a_no_op() {
        let mut doc = DocumentWorld::new();
        let graph = SynonymGraph::new();
        let engine = SimilarityEngine::new(&graph);
        let propagator = propagator();

        for pass in Pass::ALL {
            assert_eq!(propagator.run_pass(pass, &mut doc, &engine), 0);
        }
    }

    #[test]
    fn test_parallelism_does_not_change_weights() {
        let text = "[NP Ann/NNP] [CONJ and/CC] [NP Tom/NNP] [VP saw/VBD] [NP the/DT dog/NN] . \
                    [NP The/DT dog/NN] [VP saw/VBD] [NP Ann/NNP] .";
        let graph = SynonymGraph::new();
        let engine = SimilarityEngine::new(&graph);

        let run = |parallelism| {
            let mut doc = bound(text);
            let config = PropagationConfig { parallelism: Some(parallelism), ..Default::default() };
            WeightPropagator::new(config).unwrap().propagate(&mut doc, &engine);
            doc.phrases().iter().map(|p| doc.weight(*p)).collect::<Vec<_>>()
        };

        assert_eq!(run(1), run(4));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = PropagationConfig { parallelism: Some(0), ..Default::default() };
        assert!(WeightPropagator::new(config).is_err());
    }

    proptest! {
        #[test]
        fn test_normalization_is_idempotent(weights in prop::collection::vec(0.0f64..500.0, 1..12)) {
            let notation = (0..weights.len()).map(|i| format!("[NP w{}/NN]", i)).collect::<Vec<_>>().join(" ");
            let mut doc = DocumentWorld::from_notation(&notation).unwrap();
            let phrases = doc.phrases().to_vec();
            for (phrase, weight) in phrases.iter().zip(&weights) {
                doc.set_weight(*phrase, *weight);
            }
            let graph = SynonymGraph::new();
            let engine = SimilarityEngine::new(&graph);
            let propagator = propagator();

            propagator.run_pass(Pass::Normalization, &mut doc, &engine);
            let once: Vec<f64> = phrases.iter().map(|p| doc.weight(*p)).collect();
            propagator.run_pass(Pass::Normalization, &mut doc, &engine);
            let twice: Vec<f64> = phrases.iter().map(|p| doc.weight(*p)).collect();

            prop_assert_eq!(&once, &twice);
            if weights.iter().any(|w| *w > 0.0) {
                prop_assert_eq!(once.iter().copied().fold(0.0, f64::max), 100.0);
            }
            for (before, after) in weights.iter().zip(&once) {
                prop_assert_eq!(*before == 0.0, *after == 0.0);
            }
        }
    }
}
