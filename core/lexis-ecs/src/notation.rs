//! Bracketed chunk notation for tagged text.
//!
//! ```text
//! [NP John/NNP@person] [VP gave/VBD] [NP Mary/NNP] [NP a/DT book/NN] .
//! ```
//!
//! Phrases are `[CHUNK word/TAG ...]` with Penn Treebank tags and an optional
//! `@label` entity kind. `.`, `!` or `?` ends a sentence, `;` separates clauses
//! and a blank line starts a new paragraph.

use nom::{
    bytes::complete::take_while1,
    character::complete::{alpha1, char, multispace0, one_of},
    combinator::{all_consuming, opt},
    multi::{many1, separated_list1},
    sequence::{delimited, pair, preceded, terminated},
    IResult,
};

use lexis_protocol::{
    EntityKind, PhraseKind, TaggedClause, TaggedDocument, TaggedParagraph, TaggedPhrase, TaggedSentence,
    TaggedWord, WordKind,
};

use crate::error::NotationError;

#[derive(Debug)]
struct RawWord<'a> {
    text: &'a str,
    tag: &'a str,
    label: Option<&'a str>,
}

#[derive(Debug)]
struct RawPhrase<'a> {
    tag: &'a str,
    words: Vec<RawWord<'a>>,
}

type RawSentence<'a> = Vec<Vec<RawPhrase<'a>>>;

fn ws<'a, O>(inner: impl FnMut(&'a str) -> IResult<&'a str, O>) -> impl FnMut(&'a str) -> IResult<&'a str, O> {
    delimited(multispace0, inner, multispace0)
}

fn word_text(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace() && !matches!(c, '/' | '[' | ']'))(input)
}

fn word_tag(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || matches!(c, '$' | '.' | ',' | ':'))(input)
}

fn raw_word(input: &str) -> IResult<&str, RawWord<'_>> {
    let (input, text) = word_text(input)?;
    let (input, _) = char('/')(input)?;
    let (input, tag) = word_tag(input)?;
    let (input, label) = opt(preceded(char('@'), alpha1))(input)?;
    Ok((input, RawWord { text, tag, label }))
}

fn raw_phrase(input: &str) -> IResult<&str, RawPhrase<'_>> {
    let (input, (tag, words)) = delimited(
        char('['),
        pair(ws(take_while1(|c: char| c.is_ascii_alphabetic())), many1(ws(raw_word))),
        char(']'),
    )(input)?;
    Ok((input, RawPhrase { tag, words }))
}

fn raw_sentence(input: &str) -> IResult<&str, RawSentence<'_>> {
    terminated(
        separated_list1(ws(char(';')), many1(ws(raw_phrase))),
        opt(ws(one_of(".!?"))),
    )(input)
}

fn raw_paragraph(input: &str) -> IResult<&str, Vec<RawSentence<'_>>> {
    all_consuming(many1(ws(raw_sentence)))(input)
}

/// Splits on blank lines.
fn paragraph_blocks(input: &str) -> Vec<(usize, &str)> {
    let mut blocks = Vec::new();
    let mut start: Option<usize> = None;
    let mut end = 0;
    let mut offset = 0;

    for line in input.split_inclusive('\n') {
        if line.trim().is_empty() {
            if let Some(begin) = start.take() {
                blocks.push((begin, &input[begin..end]));
            }
        } else {
            start.get_or_insert(offset);
            end = offset + line.len();
        }
        offset += line.len();
    }
    if let Some(begin) = start {
        blocks.push((begin, &input[begin..end]));
    }
    blocks
}

fn convert_word(raw: &RawWord<'_>) -> Result<TaggedWord, NotationError> {
    let (kind, flags) =
        WordKind::from_tag(raw.tag).ok_or_else(|| NotationError::UnknownWordTag(raw.tag.to_string()))?;
    let entity_kind = match raw.label {
        Some(label) => EntityKind::from_label(&label.to_lowercase())
            .ok_or_else(|| NotationError::UnknownEntityLabel(label.to_string()))?,
        None => EntityKind::Unknown,
    };
    Ok(TaggedWord {
        text: raw.text.to_string(),
        kind,
        flags,
        entity_kind,
    })
}

fn convert_phrase(raw: &RawPhrase<'_>) -> Result<TaggedPhrase, NotationError> {
    let kind = PhraseKind::from_tag(raw.tag).ok_or_else(|| NotationError::UnknownPhraseTag(raw.tag.to_string()))?;
    let words = raw.words.iter().map(convert_word).collect::<Result<Vec<_>, _>>()?;
    Ok(TaggedPhrase { kind, words })
}

pub fn parse_document(input: &str) -> Result<TaggedDocument, NotationError> {
    let mut document = TaggedDocument::default();

    for (block_offset, block) in paragraph_blocks(input) {
        let (_, sentences) = raw_paragraph(block).map_err(|err| {
            let rest = match &err {
                nom::Err::Error(e) | nom::Err::Failure(e) => e.input,
                nom::Err::Incomplete(_) => "",
            };
            let offset = block_offset + (block.len() - rest.len());
            NotationError::Syntax {
                offset,
                near: rest.chars().take(24).collect(),
            }
        })?;

        let mut paragraph = TaggedParagraph::default();
        for clauses in &sentences {
            let mut sentence = TaggedSentence::default();
            for phrases in clauses {
                let phrases = phrases.iter().map(convert_phrase).collect::<Result<Vec<_>, _>>()?;
                sentence.clauses.push(TaggedClause { phrases });
            }
            paragraph.sentences.push(sentence);
        }
        document.paragraphs.push(paragraph);
    }

    Ok(document)
}
