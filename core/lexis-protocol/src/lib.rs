#![no_std] // Shared with embedded/WASM consumers of the tagger output

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod ids;
pub mod lexical;

pub use ids::{LexemeId, SentenceId, SynsetId};
pub use lexical::*;

pub mod model;
pub use model::*;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;
    use rkyv::{from_bytes, to_bytes};

    #[test]
    fn test_penn_tags() {
        assert_eq!(WordKind::from_tag("NNS"), Some((WordKind::Noun, WordFlags::PLURAL)));
        assert_eq!(WordKind::from_tag("NNP"), Some((WordKind::ProperNoun, WordFlags::PROPER)));
        assert_eq!(WordKind::from_tag("MD"), Some((WordKind::Verb, WordFlags::MODAL)));
        assert_eq!(WordKind::from_tag("XYZ"), None);
        assert_eq!(PhraseKind::from_tag("SBAR"), Some(PhraseKind::SubordinateClauseBeginPhrase));
        assert!(WordKind::Pronoun.is_nominal() && !WordKind::Pronoun.is_noun());
    }

    #[test]
    fn test_thesaurus_archive() {
        let thesaurus = Thesaurus {
            version: 2,
            lexemes: vec![
                Lexeme { id: LexemeId(1), text: "dog".to_string() },
                Lexeme { id: LexemeId(2), text: "hound".to_string() },
            ],
            synsets: vec![Synset { id: SynsetId(7), members: vec![LexemeId(1), LexemeId(2)] }],
        };

        let bytes = to_bytes::<_, 256>(&thesaurus).expect("Failed to serialize Thesaurus");
        let archived = rkyv::check_archived_root::<Thesaurus>(&bytes).expect("Invalid archive");
        assert_eq!(archived.lexemes[1].text.as_str(), "hound");
        assert_eq!(archived.synsets[0].members.len(), 2);
    }

    #[test]
    fn test_flags_survive_archive() {
        let mut word = TaggedWord::new("Canadians", WordKind::ProperNoun);
        word.flags = WordFlags::PROPER | WordFlags::PLURAL;
        word.entity_kind = EntityKind::Person;

        let bytes = to_bytes::<_, 256>(&word).expect("Failed to serialize TaggedWord");
        let restored: TaggedWord = from_bytes(&bytes).expect("Failed to deserialize TaggedWord");

        assert_eq!(restored, word);
    }

    #[test]
    fn test_id_layout() {
        assert_eq!(core::mem::size_of::<LexemeId>(), 4);
        assert_eq!(LexemeId::new(3).to_string(), "LexemeId#3");
    }
}
