use std::collections::HashMap;

use lexis_protocol::{LexemeId, SynsetId, Thesaurus};
use petgraph::graph::{Graph, NodeIndex};
use petgraph::Directed;
use rkyv::Deserialize;
use thiserror::Error;

/// The lexical-relatedness capability behind every synonym test.
pub trait SynonymProvider: Send + Sync {
    fn is_synonym_for(&self, word: &str, other: &str) -> bool;
}

impl<F> SynonymProvider for F
where
    F: Fn(&str, &str) -> bool + Send + Sync,
{
    fn is_synonym_for(&self, word: &str, other: &str) -> bool {
        self(word, other)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThesaurusError {
    #[error("invalid thesaurus archive: {0}")]
    InvalidArchive(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Node {
    Lexeme(LexemeId),
    Synset(SynsetId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    MemberOf,
}

/// Synonym sets as a bipartite graph: each headword points at the synsets it belongs to.
///
/// Two words are synonyms when they are the same word or share a synset. Lookup
/// folds case, so the relation is reflexive, symmetric and case-insensitive.
#[derive(Debug, Default)]
pub struct SynonymGraph {
    graph: Graph<Node, Relation, Directed>,
    by_text: HashMap<String, NodeIndex>,
    synsets: HashMap<SynsetId, NodeIndex>,
}

impl SynonymGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_thesaurus(thesaurus: &Thesaurus) -> Self {
        let mut graph = Self::new();
        let mut lexemes = HashMap::with_capacity(thesaurus.lexemes.len());

        for lexeme in &thesaurus.lexemes {
            let node = graph.add_word(lexeme.id, &lexeme.text);
            lexemes.insert(lexeme.id, node);
        }
        for synset in &thesaurus.synsets {
            let members: Vec<NodeIndex> = synset
                .members
                .iter()
                .filter_map(|member| {
                    let node = lexemes.get(member).copied();
                    if node.is_none() {
                        tracing::debug!(synset = %synset.id, lexeme = %member, "synset member without headword");
                    }
                    node
                })
                .collect();
            graph.add_synset(synset.id, &members);
        }

        tracing::debug!(
            version = thesaurus.version,
            words = graph.by_text.len(),
            synsets = graph.synsets.len(),
            "synonym graph built"
        );
        graph
    }

    /// Validates and loads a thesaurus archive written by `lexis compile-thesaurus`.
    pub fn load_archived(bytes: &[u8]) -> Result<Self, ThesaurusError> {
        let archived = rkyv::check_archived_root::<Thesaurus>(bytes)
            .map_err(|err| ThesaurusError::InvalidArchive(err.to_string()))?;
        let thesaurus: Thesaurus = match archived.deserialize(&mut rkyv::Infallible) {
            Ok(thesaurus) => thesaurus,
            Err(never) => match never {},
        };
        Ok(Self::from_thesaurus(&thesaurus))
    }

    pub fn add_word(&mut self, id: LexemeId, text: &str) -> NodeIndex {
        let key = text.to_lowercase();
        *self.by_text.entry(key).or_insert_with(|| self.graph.add_node(Node::Lexeme(id)))
    }

    pub fn add_synset(&mut self, id: SynsetId, members: &[NodeIndex]) {
        let synset = *self.synsets.entry(id).or_insert_with(|| self.graph.add_node(Node::Synset(id)));
        for member in members {
            self.graph.update_edge(*member, synset, Relation::MemberOf);
        }
    }

    pub fn word_count(&self) -> usize {
        self.by_text.len()
    }

    fn shares_synset(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.graph
            .neighbors(a)
            .any(|synset| self.graph.find_edge(b, synset).is_some())
    }
}

impl SynonymProvider for SynonymGraph {
    fn is_synonym_for(&self, word: &str, other: &str) -> bool {
        let (word, other) = (word.to_lowercase(), other.to_lowercase());
        if word == other {
            return true;
        }
        match (self.by_text.get(&word), self.by_text.get(&other)) {
            (Some(a), Some(b)) => self.shares_synset(*a, *b),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexis_protocol::{Lexeme, Synset};
    use rkyv::ser::{serializers::AllocSerializer, Serializer};

    fn thesaurus() -> Thesaurus {
        let words = ["dog", "hound", "canine", "cat", "feline", "car"];
        Thesaurus {
            version: 3,
            lexemes: words
                .iter()
                .enumerate()
                .map(|(i, text)| Lexeme { id: LexemeId(i as u32), text: text.to_string() })
                .collect(),
            synsets: vec![
                Synset { id: SynsetId(0), members: vec![LexemeId(0), LexemeId(1), LexemeId(2)] },
                Synset { id: SynsetId(1), members: vec![LexemeId(3), LexemeId(4), LexemeId(99)] },
            ],
        }
    }

    #[test]
    fn test_shared_synset() {
        let graph = SynonymGraph::from_thesaurus(&thesaurus());

        assert!(graph.is_synonym_for("dog", "hound"));
        assert!(graph.is_synonym_for("Hound", "DOG"));
        assert!(graph.is_synonym_for("feline", "cat"));
        assert!(!graph.is_synonym_for("dog", "cat"));
        assert!(!graph.is_synonym_for("car", "cat"));
        assert!(!graph.is_synonym_for("dog", "unicorn"));
        assert_eq!(graph.word_count(), 6);
    }

    #[test]
    fn test_reflexive_for_unknown_words() {
        let graph = SynonymGraph::new();
        assert!(graph.is_synonym_for("Zebra", "zebra"));
    }

    #[test]
    fn test_load_archived() {
        let mut serializer = AllocSerializer::<256>::default();
        serializer.serialize_value(&thesaurus()).unwrap();
        let bytes = serializer.into_serializer().into_inner();

        let graph = SynonymGraph::load_archived(&bytes).unwrap();
        assert!(graph.is_synonym_for("canine", "hound"));

        assert!(SynonymGraph::load_archived(&[1, 2, 3]).is_err());
    }

    #[test]
    fn test_closure_provider() {
        let provider = |a: &str, b: &str| a.len() == b.len();
        assert!(provider.is_synonym_for("abc", "xyz"));
    }
}
