use rkyv::{Archive, Deserialize, Serialize};
use crate::ids::{LexemeId, SynsetId};
use crate::lexical::{EntityKind, PhraseKind, WordFlags, WordKind};
use alloc::string::String;
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

#[derive(Debug, Clone, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct Lexeme {
    pub id: LexemeId,
    pub text: String,
}

/// Lexemes that are mutually interchangeable.
#[derive(Debug, Clone, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct Synset {
    pub id: SynsetId,
    pub members: Vec<LexemeId>,
}

/// The lexical-relatedness source behind synonym tests.
#[derive(Debug, Clone, Default, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct Thesaurus {
    pub version: u32,
    pub lexemes: Vec<Lexeme>,
    pub synsets: Vec<Synset>,
}

// Tagged documents, as handed over by the upstream tagger/chunker.

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct TaggedWord {
    pub text: String,
    pub kind: WordKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub flags: WordFlags,
    #[cfg_attr(feature = "serde", serde(default))]
    pub entity_kind: EntityKind,
}

impl TaggedWord {
    pub fn new(text: impl Into<String>, kind: WordKind) -> Self {
        Self {
            text: text.into(),
            kind,
            flags: WordFlags::empty(),
            entity_kind: EntityKind::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct TaggedPhrase {
    pub kind: PhraseKind,
    pub words: Vec<TaggedWord>,
}

#[derive(Debug, Clone, PartialEq, Default, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct TaggedClause {
    pub phrases: Vec<TaggedPhrase>,
}

#[derive(Debug, Clone, PartialEq, Default, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct TaggedSentence {
    pub clauses: Vec<TaggedClause>,
}

#[derive(Debug, Clone, PartialEq, Default, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct TaggedParagraph {
    pub sentences: Vec<TaggedSentence>,
}

#[derive(Debug, Clone, PartialEq, Default, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct TaggedDocument {
    pub paragraphs: Vec<TaggedParagraph>,
}

impl TaggedDocument {
    pub fn sentence_count(&self) -> usize {
        self.paragraphs.iter().map(|p| p.sentences.len()).sum()
    }
}
