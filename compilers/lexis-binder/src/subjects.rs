use hecs::Entity;
use lexis_dispatch::Match;
use lexis_ecs::patterns::{IsConjunctionPhrase, IsNounPhrase, IsPrepositionalPhrase, IsSubordinateClauseBegin};
use lexis_ecs::DocumentWorld;

/// The noun phrases acting as subject of the verb phrase following `preceding`.
///
/// The nearest run of noun phrases wins. Phrases joined by a conjunction stay in
/// one run; a noun phrase right after a preposition is its object, not a subject.
pub fn find_subjects(doc: &DocumentWorld, preceding: &[Entity]) -> Vec<Entity> {
    let mut run: Vec<Entity> = Vec::new();
    let mut joined = false;
    let mut after_preposition = false;

    for phrase in preceding {
        Match::on(doc.construct(*phrase))
            .case::<IsNounPhrase>(|noun| {
                if after_preposition {
                    after_preposition = false;
                    return;
                }
                if !joined {
                    run.clear();
                }
                joined = false;
                run.push(noun.entity());
            })
            .case::<IsConjunctionPhrase>(|_| joined = !run.is_empty())
            .case::<IsPrepositionalPhrase>(|_| after_preposition = true)
            .case::<IsSubordinateClauseBegin>(|_| {
                run.clear();
                joined = false;
                after_preposition = false;
            });
    }

    run
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subjects_before_verb(notation: &str) -> (Vec<Entity>, Vec<Entity>) {
        let doc = DocumentWorld::from_notation(notation).unwrap();
        let phrases = doc.sentence_phrases(doc.sentences()[0]).unwrap();
        let verb = phrases.len() - 1;
        (find_subjects(&doc, &phrases[..verb]), phrases)
    }

    #[test]
    fn test_single_subject() {
        let (subjects, p) = subjects_before_verb("[NP The/DT dog/NN] [VP barked/VBD]");
        assert_eq!(subjects, vec![p[0]]);
    }

    #[test]
    fn test_conjoined_subjects() {
        let (subjects, p) = subjects_before_verb("[NP Tom/NNP] [CONJ and/CC] [NP Ann/NNP] [VP left/VBD]");
        assert_eq!(subjects, vec![p[0], p[2]]);
    }

    #[test]
    fn test_prepositional_object_is_not_subject() {
        let (subjects, p) = subjects_before_verb("[NP The/DT box/NN] [PP of/IN] [NP apples/NNS] [VP fell/VBD]");
        assert_eq!(subjects, vec![p[0]]);
    }

    #[test]
    fn test_nearest_run_wins() {
        let (subjects, p) = subjects_before_verb("[NP Yesterday/NN] [ADVP then/RB] [NP we/PRP] [VP left/VBD]");
        assert_eq!(subjects, vec![p[2]]);
    }

    #[test]
    fn test_subordinate_clause_resets() {
        let (subjects, _) = subjects_before_verb("[NP Rain/NN] [SBAR because/IN] [VP fell/VBD]");
        assert!(subjects.is_empty());
    }
}
