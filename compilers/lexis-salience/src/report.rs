use lexis_ecs::DocumentWorld;
use lexis_protocol::{PhraseKind, WordKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConstructKind {
    Word(WordKind),
    Phrase(PhraseKind),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub text: String,
    pub kind: ConstructKind,
    pub weight: f64,
}

/// Final weights of a document, in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightReport {
    pub words: Vec<WeightEntry>,
    pub phrases: Vec<WeightEntry>,
}

impl WeightReport {
    pub fn collect(doc: &DocumentWorld) -> Self {
        let entry = |entity| {
            let construct = doc.construct(entity);
            let kind = match (construct.word(), construct.phrase_kind()) {
                (Some(word), _) => ConstructKind::Word(word.kind),
                (None, Some(kind)) => ConstructKind::Phrase(kind),
                (None, None) => return None,
            };
            Some(WeightEntry {
                text: construct.text().map(|text| text.to_string()).unwrap_or_default(),
                kind,
                weight: doc.weight(entity),
            })
        };

        Self {
            words: doc.words().iter().filter_map(|word| entry(*word)).collect(),
            phrases: doc.phrases().iter().filter_map(|phrase| entry(*phrase)).collect(),
        }
    }

    /// The `n` heaviest phrases, heaviest first.
    pub fn top_phrases(&self, n: usize) -> Vec<&WeightEntry> {
        let mut phrases: Vec<&WeightEntry> = self.phrases.iter().collect();
        phrases.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        phrases.truncate(n);
        phrases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_and_rank() {
        let mut doc = DocumentWorld::from_notation("[NP Big/JJ dogs/NNS] [VP bark/VBP]").unwrap();
        let phrases = doc.phrases().to_vec();
        doc.set_weight(phrases[0], 10.0);
        doc.set_weight(phrases[1], 40.0);

        let report = WeightReport::collect(&doc);

        assert_eq!(report.words.len(), 3);
        assert_eq!(report.phrases[0].text, "Big dogs");
        assert_eq!(report.phrases[0].kind, ConstructKind::Phrase(PhraseKind::NounPhrase));
        assert_eq!(report.words[1].kind, ConstructKind::Word(WordKind::Noun));

        let top = report.top_phrases(1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].text, "bark");
    }
}
