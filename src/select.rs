//! Model selection: ordinal parsing and the interactive prompt.
//!
//! Selection input is either the token `all` or whitespace-separated 1-based
//! ordinals into the enumerated model list. The resulting subsequence always
//! follows enumeration order and collapses duplicate ordinals, so `all` and
//! any permutation of the full index list yield the same backup set.

use std::collections::BTreeSet;
use std::io::BufRead;

use crate::catalog::ModelEntry;
use crate::utils::errors::{BackupError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    All,
    /// 1-based ordinals as entered (unvalidated until `apply`).
    Indices(Vec<usize>),
}

impl Selection {
    /// Parse user input: `all` (case-insensitive) or whitespace-separated
    /// ordinals. Empty input and non-numeric tokens are `Selection` errors.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(BackupError::Selection(
                "nothing selected; enter model numbers or \"all\"".to_string(),
            ));
        }
        if input.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }

        let mut indices = Vec::new();
        for token in input.split_whitespace() {
            let index: usize = token.parse().map_err(|_| {
                BackupError::Selection(format!(
                    "{token:?} is not a model number (expected ordinals like \"1 3\" or \"all\")"
                ))
            })?;
            indices.push(index);
        }
        Ok(Self::Indices(indices))
    }

    /// Resolve to the selected subsequence of `entries`, preserving
    /// enumeration order and collapsing duplicates. An ordinal outside
    /// `1..=entries.len()` is a `Selection` error.
    pub fn apply<'a>(&self, entries: &'a [ModelEntry]) -> Result<Vec<&'a ModelEntry>> {
        let picked: BTreeSet<usize> = match self {
            Self::All => (0..entries.len()).collect(),
            Self::Indices(indices) => {
                let mut picked = BTreeSet::new();
                for &index in indices {
                    if index == 0 || index > entries.len() {
                        return Err(BackupError::Selection(format!(
                            "model number {index} is out of range (have {} models, numbered 1-{})",
                            entries.len(),
                            entries.len()
                        )));
                    }
                    picked.insert(index - 1);
                }
                picked
            }
        };

        Ok(picked.into_iter().map(|i| &entries[i]).collect())
    }
}

/// Print the ordinal model list on stdout and read one selection line.
///
/// Uses a dialoguer prompt when attached to a terminal; otherwise falls back
/// to reading a line from stdin so the tool stays scriptable.
pub fn prompt(entries: &[ModelEntry]) -> Result<Selection> {
    println!("Available models:");
    for (i, entry) in entries.iter().enumerate() {
        println!("{:3}. {}", i + 1, entry.name);
    }

    let term = dialoguer::console::Term::stderr();
    let line = if term.is_term() {
        dialoguer::Input::<String>::new()
            .with_prompt("Models to back up (e.g. \"1 3\", or \"all\")")
            .allow_empty(true)
            .interact_text_on(&term)
            .map_err(|e| BackupError::Io(std::io::Error::other(e)))?
    } else {
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        line
    };

    Selection::parse(&line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn entries(names: &[&str]) -> Vec<ModelEntry> {
        names
            .iter()
            .map(|name| ModelEntry {
                name: (*name).to_string(),
                manifest_path: PathBuf::from("/store/manifests").join(name),
                relative_path: PathBuf::from(name),
            })
            .collect()
    }

    #[test]
    fn test_parse_all_any_case() {
        assert_eq!(Selection::parse("all").unwrap(), Selection::All);
        assert_eq!(Selection::parse(" ALL ").unwrap(), Selection::All);
    }

    #[test]
    fn test_parse_ordinals() {
        assert_eq!(
            Selection::parse("3 1 3").unwrap(),
            Selection::Indices(vec![3, 1, 3])
        );
    }

    #[test]
    fn test_parse_rejects_garbage_and_empty() {
        assert!(matches!(
            Selection::parse("1 two"),
            Err(BackupError::Selection(_))
        ));
        assert!(matches!(
            Selection::parse("   "),
            Err(BackupError::Selection(_))
        ));
    }

    #[test]
    fn test_apply_preserves_enumeration_order_and_dedupes() {
        let entries = entries(&["a", "b", "c"]);
        let picked = Selection::Indices(vec![3, 1, 3]).apply(&entries).unwrap();
        let names: Vec<&str> = picked.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn test_all_equals_explicit_full_list_in_any_order() {
        let entries = entries(&["a", "b", "c"]);
        let all = Selection::All.apply(&entries).unwrap();
        let explicit = Selection::Indices(vec![2, 3, 1]).apply(&entries).unwrap();
        assert_eq!(all, explicit);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_apply_rejects_out_of_range() {
        let entries = entries(&["a", "b", "c"]);
        for index in [0, 4, 99] {
            let result = Selection::Indices(vec![index]).apply(&entries);
            assert!(
                matches!(result, Err(BackupError::Selection(_))),
                "index {index} should be rejected"
            );
        }
    }
}
