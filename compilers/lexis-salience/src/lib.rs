//! Similarity judgments and salience propagation over a bound document.

pub mod config;
pub mod propagator;
pub mod report;
pub mod similarity;
pub mod synonyms;

pub use config::{ConfigError, PropagationConfig};
pub use propagator::{Pass, WeightPropagator};
pub use report::{ConstructKind, WeightEntry, WeightReport};
pub use similarity::{SimilarityEngine, SimilarityResult, NOUN_PHRASE_SIMILARITY_THRESHOLD};
pub use synonyms::{SynonymGraph, SynonymProvider, ThesaurusError};

#[cfg(test)]
mod tests {
    use super::*;
    use lexis_binder::bind_document;
    use lexis_ecs::DocumentWorld;
    use lexis_protocol::{Lexeme, LexemeId, Synset, SynsetId, Thesaurus};

    #[test]
    fn test_rodents_are_prey_animals() {
        let thesaurus = Thesaurus {
            version: 1,
            lexemes: vec![
                Lexeme { id: LexemeId(0), text: "rodents".to_string() },
                Lexeme { id: LexemeId(1), text: "rats".to_string() },
            ],
            synsets: vec![Synset { id: SynsetId(0), members: vec![LexemeId(0), LexemeId(1)] }],
        };
        let graph = SynonymGraph::from_thesaurus(&thesaurus);
        let engine = SimilarityEngine::new(&graph);

        let mut doc = DocumentWorld::from_notation(
            "[NP Rodents/NNS] [VP are/VBP] [NP prey/NN animals/NNS] . [NP Rats/NNS] [VP eat/VBP] [NP grain/NN] .",
        )
        .unwrap();
        let report = bind_document(&mut doc);
        assert_eq!(report.bound, 2);

        let propagator = WeightPropagator::new(PropagationConfig::default()).unwrap();
        propagator.propagate(&mut doc, &engine);

        let weights = WeightReport::collect(&doc);
        let rodents = &weights.phrases[0];
        let grain = &weights.phrases[5];
        assert_eq!(rodents.text, "Rodents");
        assert_eq!(rodents.weight, 100.0);
        assert!(grain.weight < rodents.weight);
        assert_eq!(weights.top_phrases(2).iter().filter(|e| e.weight == 100.0).count(), 2);
    }
}
