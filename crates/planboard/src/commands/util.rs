//! Shared helpers for command handlers.

use std::io::{self, BufRead, BufReader};
use std::path::Path;

use planboard_core::EntityDomain;

use crate::cli::EntityArg;
use crate::error::CliError;

/// Accept either bare query text or a path/URL and return the query part.
///
/// Bare query text is returned untouched: `?` is legal inside a value.
/// Only a leading `?`, or a path or URL in front of the first `?`, is
/// stripped. A path with no `?` has no filters.
pub fn query_part(input: &str) -> &str {
    if let Some(query) = input.strip_prefix('?') {
        return query;
    }
    let (head, query) = input.split_once('?').unwrap_or((input, ""));
    let is_location = head.starts_with('/') || (head.contains("://") && !head.contains('='));
    if is_location { query } else { input }
}

/// Read existing identifiers, one per line, for `--from-file` flags.
/// `-` reads stdin. Blank lines are skipped.
pub fn read_names(path: &Path) -> Result<Vec<String>, CliError> {
    let reader: Box<dyn BufRead> = if path == Path::new("-") {
        Box::new(BufReader::new(io::stdin()))
    } else {
        Box::new(BufReader::new(std::fs::File::open(path)?))
    };

    let mut names = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            names.push(trimmed.to_owned());
        }
    }
    Ok(names)
}

impl From<EntityArg> for EntityDomain {
    fn from(arg: EntityArg) -> Self {
        match arg {
            EntityArg::Objects => Self::Objects,
            EntityArg::Issues => Self::Issues,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn query_part_strips_path() {
        assert_eq!(query_part("/objects?status=blocked"), "status=blocked");
        assert_eq!(query_part("?sort=aging"), "sort=aging");
        assert_eq!(query_part("status=blocked"), "status=blocked");
        assert_eq!(query_part(""), "");
    }

    #[test]
    fn query_part_keeps_question_marks_in_values() {
        assert_eq!(query_part("q=what?&status=blocked"), "q=what?&status=blocked");
        assert_eq!(query_part("?q=what?&status=blocked"), "q=what?&status=blocked");
        assert_eq!(
            query_part("https://board.example/objects?q=what?"),
            "q=what?"
        );
        assert_eq!(query_part("/objects"), "");
        assert_eq!(
            query_part("link=https://wiki.example/page?id=4"),
            "link=https://wiki.example/page?id=4"
        );
    }

    #[test]
    fn read_names_skips_blank_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "OBJ-DP-MD-001\n\n  OBJ-DP-MD-003  \n").unwrap();
        let names = read_names(file.path()).unwrap();
        assert_eq!(names, vec!["OBJ-DP-MD-001", "OBJ-DP-MD-003"]);
    }
}
