use lexis_ecs::ConstructRef;

const COPULA_FORMS: &[&str] = &["be", "am", "is", "are", "was", "were", "been", "being", "'s", "'re", "'m"];
const POSSESSIVE_FORMS: &[&str] = &["have", "has", "had", "having", "'ve"];

/// What the head verb of a verbal implies about its subject and direct object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbClass {
    /// "A is a B": the subject is classified by the object.
    Copula,
    /// "A has a B": the subject possesses the object.
    Possessive,
    Action,
}

impl VerbClass {
    pub fn of(verbal: ConstructRef<'_>) -> VerbClass {
        let Some(text) = verbal.head_verb().and_then(|verb| verb.folded()) else {
            return VerbClass::Action;
        };
        if COPULA_FORMS.contains(&text.as_ref()) {
            VerbClass::Copula
        } else if POSSESSIVE_FORMS.contains(&text.as_ref()) {
            VerbClass::Possessive
        } else {
            VerbClass::Action
        }
    }
}
