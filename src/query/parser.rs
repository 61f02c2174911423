//! The query parser (§4.6): tokenizes a raw query string into ordered
//! groups with per-group negation and a global phrase/non-phrase flag,
//! and detects command prefixes.

use crate::stopwords::is_stop_word;
use crate::tokenizer;

/// A recognised command keyword, or `None` for a plain search query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Similar,
    Df,
    Freq,
    Doc,
    Tf,
    Title,
    None,
}

impl Command {
    fn from_keyword(word: &str) -> Option<Command> {
        match word {
            "similar" => Some(Command::Similar),
            "df" => Some(Command::Df),
            "freq" => Some(Command::Freq),
            "doc" => Some(Command::Doc),
            "tf" => Some(Command::Tf),
            "title" => Some(Command::Title),
            _ => None,
        }
    }
}

/// A parsed query (§4.6).
#[derive(Debug, Clone)]
pub struct Query {
    pub groups: Vec<String>,
    pub negated_groups: Vec<bool>,
    pub phrase_search: bool,
    pub cmd: Command,
    /// Pre-stem terms, in the order encountered; also carries literal
    /// command arguments (e.g. the document id of `tf`/`doc`/`title`).
    pub raw_terms: Vec<String>,
}

/// Parse a raw query string per the algorithm in §4.6.
#[must_use]
pub fn parse(raw: &str) -> Query {
    let trimmed = raw.trim().to_lowercase();
    let mut rest: &str = &trimmed;
    let mut cmd = Command::None;
    let mut raw_terms = Vec::new();

    // Step 2: command keyword detection.
    if let Some(idx) = rest.find(char::is_whitespace) {
        let (first, remainder) = rest.split_at(idx);
        if let Some(c) = Command::from_keyword(first) {
            let remainder = remainder.trim_start();
            if !remainder.is_empty() {
                cmd = c;
                rest = remainder;
            }
        }
    }

    // Step 3: `tf` takes a literal document-id argument first.
    if cmd == Command::Tf {
        match rest.find(char::is_whitespace) {
            Some(idx) => {
                let (arg, remainder) = rest.split_at(idx);
                raw_terms.push(arg.to_string());
                rest = remainder.trim_start();
            }
            None => {
                raw_terms.push(rest.to_string());
                rest = "";
            }
        }
    }

    // Step 4: phrase detection, ignoring a leading `!`.
    let sniff = rest.strip_prefix('!').unwrap_or(rest).trim_start();
    let phrase_search = sniff.starts_with('"');

    // Step 5: split into groups.
    let mut groups_raw: Vec<(String, bool)> = Vec::new();
    if phrase_search {
        let mut negate_next = false;
        for fragment in rest.split('"') {
            let fragment = fragment.trim();
            if fragment.is_empty() {
                continue;
            }
            if fragment == "!" {
                negate_next = true;
                continue;
            }
            groups_raw.push((fragment.to_string(), negate_next));
            negate_next = false;
        }
    } else {
        for word in rest.split_whitespace() {
            let (term, negated) =
                if let Some(stripped) = word.strip_prefix('!') { (stripped, true) } else { (word, false) };
            if !term.is_empty() {
                groups_raw.push((term.to_string(), negated));
            }
        }
    }

    // Step 6: tokenize every group.
    let whitespace_only = matches!(cmd, Command::Doc | Command::Title);
    let mut groups = Vec::new();
    let mut negated_groups = Vec::new();
    for (raw_group, negated) in groups_raw {
        let words: Vec<&str> =
            if whitespace_only { raw_group.split_whitespace().collect() } else { tokenizer::split(&raw_group) };

        let mut stemmed_words = Vec::new();
        for word in words {
            let lower = word.to_lowercase();
            if lower.is_empty() || is_stop_word(&lower) {
                continue;
            }
            raw_terms.push(lower.clone());
            let stemmed = if cmd == Command::Similar { lower } else { tokenizer::stem(&lower) };
            stemmed_words.push(stemmed);
        }

        groups.push(stemmed_words.join(" "));
        negated_groups.push(negated);
    }

    Query { groups, negated_groups, phrase_search, cmd, raw_terms }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_word_is_one_unnegated_group() {
        let q = parse("cat");
        assert_eq!(q.groups, vec!["cat".to_string()]);
        assert_eq!(q.negated_groups, vec![false]);
        assert!(!q.phrase_search);
        assert_eq!(q.cmd, Command::None);
    }

    #[test]
    fn fuzzy_or_splits_on_whitespace() {
        let q = parse("cat dog rat");
        assert_eq!(q.groups.len(), 3);
    }

    #[test]
    fn phrase_query_detects_the_flag() {
        let q = parse("\"pack rat\"");
        assert!(q.phrase_search);
        assert_eq!(q.groups, vec!["pack rat".to_string()]);
    }

    #[test]
    fn negation_marks_the_group() {
        let q = parse("!foo");
        assert_eq!(q.negated_groups, vec![true]);
        assert_eq!(q.groups, vec!["foo".to_string()]);
    }

    #[test]
    fn negated_phrase_uses_the_bang_fragment() {
        let q = parse("!\"tabby cat\"");
        assert!(q.phrase_search);
        assert_eq!(q.negated_groups, vec![true]);
        assert_eq!(q.groups, vec!["tabbi cat".to_string()]);
    }

    #[test]
    fn df_command_is_recognised() {
        let q = parse("df foo");
        assert_eq!(q.cmd, Command::Df);
        assert_eq!(q.groups, vec!["foo".to_string()]);
    }

    #[test]
    fn tf_command_pops_a_literal_doc_id() {
        let q = parse("tf 4 rat");
        assert_eq!(q.cmd, Command::Tf);
        assert_eq!(q.raw_terms[0], "4");
        assert_eq!(q.groups, vec!["rat".to_string()]);
    }

    #[test]
    fn doc_command_keeps_whitespace_only_splitting() {
        let q = parse("doc 5");
        assert_eq!(q.cmd, Command::Doc);
        assert_eq!(q.groups, vec!["5".to_string()]);
    }

    #[test]
    fn command_keyword_alone_is_not_treated_as_a_command() {
        let q = parse("df");
        assert_eq!(q.cmd, Command::None);
        assert_eq!(q.groups, vec!["df".to_string()]);
    }

    #[test]
    fn similar_terms_are_not_stemmed() {
        let q = parse("similar running");
        assert_eq!(q.cmd, Command::Similar);
        assert_eq!(q.groups, vec!["running".to_string()]);
    }
}
