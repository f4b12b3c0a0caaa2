use rkyv::{Archive, Deserialize, Serialize};

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

use bitflags::bitflags;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
#[repr(u8)]
pub enum WordKind {
    Noun = 0,
    ProperNoun = 1,
    Pronoun = 2,
    Verb = 3,
    Adjective = 4,
    Adverb = 5,
    Determiner = 6,
    Preposition = 7,
    Conjunction = 8,
    Particle = 9,
    Interjection = 10,
    Punctuation = 11,
    Other = 12,
}

impl WordKind {
    /// Common and proper nouns. Pronouns are nominal but not nouns.
    pub fn is_noun(self) -> bool {
        matches!(self, WordKind::Noun | WordKind::ProperNoun)
    }

    /// Words that can fill an entity slot on their own.
    pub fn is_nominal(self) -> bool {
        self.is_noun() || self == WordKind::Pronoun
    }

    /// Maps a Penn Treebank part-of-speech tag to a kind plus the flags the tag implies.
    pub fn from_tag(tag: &str) -> Option<(WordKind, WordFlags)> {
        let tagged = match tag {
            "NN" => (WordKind::Noun, WordFlags::empty()),
            "NNS" => (WordKind::Noun, WordFlags::PLURAL),
            "NNP" => (WordKind::ProperNoun, WordFlags::PROPER),
            "NNPS" => (WordKind::ProperNoun, WordFlags::PROPER | WordFlags::PLURAL),
            "PRP" | "WP" | "EX" => (WordKind::Pronoun, WordFlags::empty()),
            "PRP$" | "WP$" => (WordKind::Pronoun, WordFlags::POSSESSIVE),
            "VB" | "VBP" | "VBZ" => (WordKind::Verb, WordFlags::PRESENT),
            "VBD" => (WordKind::Verb, WordFlags::PAST),
            "VBN" => (WordKind::Verb, WordFlags::PAST | WordFlags::PARTICIPLE),
            "VBG" => (WordKind::Verb, WordFlags::PARTICIPLE),
            "MD" => (WordKind::Verb, WordFlags::MODAL),
            "JJ" => (WordKind::Adjective, WordFlags::empty()),
            "JJR" => (WordKind::Adjective, WordFlags::COMPARATIVE),
            "JJS" => (WordKind::Adjective, WordFlags::SUPERLATIVE),
            "RB" | "WRB" => (WordKind::Adverb, WordFlags::empty()),
            "RBR" => (WordKind::Adverb, WordFlags::COMPARATIVE),
            "RBS" => (WordKind::Adverb, WordFlags::SUPERLATIVE),
            "DT" | "PDT" | "WDT" => (WordKind::Determiner, WordFlags::empty()),
            "POS" => (WordKind::Particle, WordFlags::POSSESSIVE),
            "IN" | "TO" => (WordKind::Preposition, WordFlags::empty()),
            "CC" => (WordKind::Conjunction, WordFlags::empty()),
            "RP" => (WordKind::Particle, WordFlags::empty()),
            "UH" => (WordKind::Interjection, WordFlags::empty()),
            "CD" | "FW" | "SYM" | "LS" => (WordKind::Other, WordFlags::empty()),
            "." | "," | ":" => (WordKind::Punctuation, WordFlags::empty()),
            _ => return None,
        };
        Some(tagged)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
#[repr(u8)]
pub enum PhraseKind {
    NounPhrase = 0,
    VerbPhrase = 1,
    AdjectivePhrase = 2,
    AdverbPhrase = 3,
    PrepositionalPhrase = 4,
    ConjunctionPhrase = 5,
    SubordinateClauseBeginPhrase = 6,
    InterjectionPhrase = 7,
}

impl PhraseKind {
    /// Maps a chunk label (`NP`, `VP`, ...) to a phrase kind.
    pub fn from_tag(tag: &str) -> Option<PhraseKind> {
        let kind = match tag {
            "NP" => PhraseKind::NounPhrase,
            "VP" => PhraseKind::VerbPhrase,
            "ADJP" => PhraseKind::AdjectivePhrase,
            "ADVP" => PhraseKind::AdverbPhrase,
            "PP" => PhraseKind::PrepositionalPhrase,
            "CONJP" | "CONJ" => PhraseKind::ConjunctionPhrase,
            "SBAR" => PhraseKind::SubordinateClauseBeginPhrase,
            "INTJ" => PhraseKind::InterjectionPhrase,
            _ => return None,
        };
        Some(kind)
    }
}

/// Semantic category of a nominal construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
#[repr(u8)]
pub enum EntityKind {
    Person = 0,
    Place = 1,
    Organization = 2,
    Thing = 3,
    Activity = 4,
    Unknown = 5,
}

impl Default for EntityKind {
    fn default() -> Self {
        EntityKind::Unknown
    }
}

impl EntityKind {
    pub fn from_label(label: &str) -> Option<EntityKind> {
        let kind = match label {
            "person" | "per" => EntityKind::Person,
            "place" | "loc" => EntityKind::Place,
            "organization" | "org" => EntityKind::Organization,
            "thing" => EntityKind::Thing,
            "activity" => EntityKind::Activity,
            "unknown" => EntityKind::Unknown,
            _ => return None,
        };
        Some(kind)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
    pub struct WordFlags: u32 {
        // Nominal (Bits 0-2)
        const PROPER = 1;
        const PLURAL = 2;
        const POSSESSIVE = 4;

        // Verbal (Bits 3-6)
        const PRESENT = 8;
        const PAST = 16;
        const PARTICIPLE = 32;
        const MODAL = 64;

        // Degree (Bits 7-8)
        const COMPARATIVE = 128;
        const SUPERLATIVE = 256;

        const NEGATION = 512;
    }
}

// rkyv support for WordFlags
impl Archive for WordFlags {
    type Archived = u32;
    type Resolver = ();

    unsafe fn resolve(&self, _pos: usize, _resolver: Self::Resolver, out: *mut Self::Archived) {
        out.write(self.bits());
    }
}

impl<S: rkyv::Fallible + ?Sized> Serialize<S> for WordFlags {
    fn serialize(&self, _serializer: &mut S) -> Result<Self::Resolver, S::Error> {
        Ok(())
    }
}

impl<D: rkyv::Fallible + ?Sized> Deserialize<WordFlags, D> for u32 {
    fn deserialize(&self, _deserializer: &mut D) -> Result<WordFlags, D::Error> {
        Ok(WordFlags::from_bits_truncate(*self))
    }
}
