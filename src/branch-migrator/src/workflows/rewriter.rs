//! Branch filter rewriting for workflow YAML.
//!
//! The document is parsed with `serde_yaml` to find the trigger filters
//! (`on.<event>.branches` and `on.<event>.branches-ignore`) naming the source
//! branch. The edit itself is made line by line on the original text so
//! formatting and comments survive; the edited text is parsed again and must
//! differ from the original only in those filter values.

use super::error::RewriteError;
use serde_yaml::Value;

/// Keys whose values are branch filters.
const BRANCH_FILTER_KEYS: [&str; 2] = ["branches", "branches-ignore"];

/// Top-level key holding the workflow triggers.
const TRIGGERS_KEY: &str = "on";

#[derive(Debug, Clone, Copy)]
enum State {
    Normal,
    /// Inside the block sequence of a branch filter key.
    BranchList { key_indent: usize },
    /// Inside a `[ ... ]` branch filter spanning several lines.
    FlowList,
    /// Inside a `|` or `>` block scalar; its lines are never rewritten.
    BlockScalar { owner_indent: usize },
}

/// Rewrites every trigger branch filter value equal to `source` into `target`.
///
/// Returns `content` unchanged when no filter names `source`.
///
/// # Errors
///
/// Returns [`RewriteError::Parse`] for invalid YAML and
/// [`RewriteError::UnsupportedLayout`] when the filters cannot be edited in
/// place without touching anything else.
pub fn rewrite_content(
    content: &str,
    source: &str,
    target: &str,
) -> Result<String, RewriteError> {
    let mut expected: Value = serde_yaml::from_str(content)?;
    if replace_trigger_filters(&mut expected, source, target) == 0 {
        return Ok(content.to_string());
    }

    let rewritten = rewrite_text(content, source, target);
    let actual: Value = serde_yaml::from_str(&rewritten)?;
    if actual != expected {
        return Err(RewriteError::UnsupportedLayout);
    }
    Ok(rewritten)
}

/// Replaces matching filter values in the parsed document, returning how many
/// were replaced.
fn replace_trigger_filters(document: &mut Value, source: &str, target: &str) -> usize {
    let Some(Value::Mapping(events)) = document.get_mut(TRIGGERS_KEY) else {
        return 0;
    };

    let mut replaced = 0;
    for event in events.values_mut() {
        for key in BRANCH_FILTER_KEYS {
            match event.get_mut(key) {
                Some(Value::Sequence(items)) => {
                    for item in items {
                        replaced += replace_value(item, source, target);
                    }
                }
                Some(filter) => replaced += replace_value(filter, source, target),
                None => {}
            }
        }
    }
    replaced
}

fn replace_value(value: &mut Value, source: &str, target: &str) -> usize {
    if value.as_str() != Some(source) {
        return 0;
    }
    *value = Value::String(target.to_string());
    1
}

/// Text edit of the branch filters below the top-level `on:` key.
fn rewrite_text(content: &str, source: &str, target: &str) -> String {
    let mut output = String::with_capacity(content.len());
    let mut state = State::Normal;
    let mut in_triggers = false;

    for line in content.split_inclusive('\n') {
        let (body, eol) = split_line_ending(line);
        let indent = body.len() - body.trim_start_matches(' ').len();
        let trimmed = &body[indent..];
        let blank = trimmed.trim().is_empty() || trimmed.starts_with('#');

        match state {
            State::BlockScalar { owner_indent } => {
                if blank || indent > owner_indent {
                    output.push_str(line);
                    continue;
                }
                state = State::Normal;
            }
            State::FlowList => {
                let (rewritten, closed) = rewrite_flow_entries(body, source, target);
                output.push_str(&rewritten);
                output.push_str(eol);
                if closed {
                    state = State::Normal;
                }
                continue;
            }
            State::BranchList { key_indent } => {
                if blank {
                    output.push_str(line);
                    continue;
                }
                if indent >= key_indent {
                    if let Some(item) = sequence_item(trimmed) {
                        let prefix_len = body.len() - item.len();
                        output.push_str(&body[..prefix_len]);
                        match rewrite_scalar(item, source, target) {
                            Some(rewritten) => output.push_str(&rewritten),
                            None => output.push_str(item),
                        }
                        output.push_str(eol);
                        continue;
                    }
                }
                state = State::Normal;
            }
            State::Normal => {}
        }

        if indent == 0 && !blank {
            in_triggers = top_level_key(trimmed) == Some(TRIGGERS_KEY);
        }

        if let Some(value) = branch_filter_value(trimmed).filter(|_| in_triggers && indent > 0) {
            let prefix_len = body.len() - value.len();
            output.push_str(&body[..prefix_len]);
            let value_start = value.trim_start();
            if value_start.is_empty() || value_start.starts_with('#') {
                output.push_str(value);
                state = State::BranchList { key_indent: indent };
            } else if let Some(open) = value.find('[').filter(|_| value_start.starts_with('[')) {
                let (entries, closed) = rewrite_flow_entries(&value[open + 1..], source, target);
                output.push_str(&value[..=open]);
                output.push_str(&entries);
                if !closed {
                    state = State::FlowList;
                }
            } else {
                match rewrite_scalar(value, source, target) {
                    Some(rewritten) => output.push_str(&rewritten),
                    None => output.push_str(value),
                }
            }
            output.push_str(eol);
            continue;
        }

        if opens_block_scalar(trimmed) {
            state = State::BlockScalar {
                owner_indent: indent,
            };
        }
        output.push_str(line);
    }

    output
}

fn split_line_ending(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}

/// Returns the text after `- ` for a block sequence entry.
fn sequence_item(trimmed: &str) -> Option<&str> {
    trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("-\t"))
}

/// Returns the text after `branches:` when the line is a branch filter key.
fn branch_filter_value(trimmed: &str) -> Option<&str> {
    let (key, value) = trimmed.split_once(':')?;
    let key = key.trim_end();
    let key = unquote(key).map_or(key, |(_, inner)| inner);

    if !BRANCH_FILTER_KEYS.contains(&key) {
        return None;
    }
    if !value.is_empty() && !value.starts_with([' ', '\t']) {
        return None;
    }
    Some(value)
}

/// Returns true for `key: |`, `key: >-` and similar block scalar headers.
fn opens_block_scalar(trimmed: &str) -> bool {
    let Some((_, value)) = trimmed.split_once(": ") else {
        return false;
    };
    let value = strip_comment(value.trim_start()).trim_end();
    let mut chars = value.chars();
    matches!(chars.next(), Some('|' | '>'))
        && chars.all(|c| matches!(c, '+' | '-' | '0'..='9'))
}

/// Rewrites a single scalar, keeping surrounding whitespace, quotes and comments.
fn rewrite_scalar(segment: &str, source: &str, target: &str) -> Option<String> {
    let leading = &segment[..segment.len() - segment.trim_start().len()];
    let rest = &segment[leading.len()..];
    let (value, tail) = split_scalar(rest);

    let (quote, inner) = match unquote(value) {
        Some((quote, inner)) => (Some(quote), inner),
        None => (None, value),
    };
    if inner != source {
        return None;
    }

    let quote = quote.map(String::from).unwrap_or_default();
    Some(format!("{leading}{quote}{target}{quote}{tail}"))
}

/// Rewrites flow sequence entries up to the closing `]`.
///
/// Returns the rewritten segment and whether the sequence closed in it.
fn rewrite_flow_entries(segment: &str, source: &str, target: &str) -> (String, bool) {
    let (inside, rest, closed) = match segment.find(']') {
        Some(close) => (&segment[..close], &segment[close..], true),
        None => (segment, "", false),
    };

    let entries: Vec<String> = inside
        .split(',')
        .map(|entry| rewrite_scalar(entry, source, target).unwrap_or_else(|| entry.to_string()))
        .collect();
    (format!("{}{rest}", entries.join(",")), closed)
}

/// Returns the key of a top-level mapping entry.
fn top_level_key(trimmed: &str) -> Option<&str> {
    let (key, _) = trimmed.split_once(':')?;
    let key = key.trim_end();
    Some(unquote(key).map_or(key, |(_, inner)| inner))
}

/// Splits a scalar from trailing whitespace and any comment.
fn split_scalar(rest: &str) -> (&str, &str) {
    let end = match rest.chars().next() {
        Some(quote @ ('\'' | '"')) => rest[1..].find(quote).map_or(rest.len(), |i| i + 2),
        _ => strip_comment(rest).trim_end().len(),
    };
    rest.split_at(end)
}

/// Removes a trailing ` # comment` from an unquoted value.
fn strip_comment(value: &str) -> &str {
    if value.starts_with('#') {
        return "";
    }
    value
        .find(" #")
        .or_else(|| value.find("\t#"))
        .map_or(value, |i| &value[..i])
}

/// Returns the quote character and inner text of a quoted scalar.
fn unquote(value: &str) -> Option<(char, &str)> {
    ['\'', '"'].into_iter().find_map(|quote| {
        value
            .strip_prefix(quote)?
            .strip_suffix(quote)
            .map(|inner| (quote, inner))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewrite(content: &str) -> String {
        rewrite_content(content, "main", "master").unwrap()
    }

    #[test]
    fn rewrites_block_and_flow_filters() {
        let content = "on:\n  push:\n    branches:\n      - main\n      - 'release/**'\n  pull_request:\n    branches: [main, develop]\n";
        assert_eq!(
            rewrite(content),
            "on:\n  push:\n    branches:\n      - master\n      - 'release/**'\n  pull_request:\n    branches: [master, develop]\n"
        );
    }

    #[test]
    fn keeps_quotes_comments_and_line_endings() {
        let content = "on:\r\n  push:\r\n    branches: \"main\" # default\r\n    branches-ignore:\r\n      - 'main'   # old\r\n";
        assert_eq!(
            rewrite(content),
            "on:\r\n  push:\r\n    branches: \"master\" # default\r\n    branches-ignore:\r\n      - 'master'   # old\r\n"
        );
    }

    #[test]
    fn rewrites_flow_list_spanning_lines() {
        let content = "on:\n  push:\n    branches: [\n      main,\n      dev\n    ]\n";
        assert_eq!(
            rewrite(content),
            "on:\n  push:\n    branches: [\n      master,\n      dev\n    ]\n"
        );

        let content = "on:\n  push:\n    branches: [ dev, # feature work\n      \"main\" ]\njobs: {}\n";
        assert_eq!(
            rewrite(content),
            "on:\n  push:\n    branches: [ dev, # feature work\n      \"master\" ]\njobs: {}\n"
        );
    }

    #[test]
    fn leaves_filters_outside_triggers() {
        let content = "on:\n  push:\n    branches: [main]\njobs:\n  deploy:\n    with:\n      branches: main\n    steps:\n      - run: |\n          branches:\n            - main\n";
        assert_eq!(
            rewrite(content),
            "on:\n  push:\n    branches: [master]\njobs:\n  deploy:\n    with:\n      branches: main\n    steps:\n      - run: |\n          branches:\n            - main\n"
        );
    }

    #[test]
    fn unmatched_document_is_returned_as_is() {
        let content = "on: [push]\njobs:\n  build:\n    if: github.ref == 'refs/heads/main'\n";
        assert_eq!(rewrite(content), content);
        assert_eq!(rewrite(""), "");

        let prefixed = "on:\n  push:\n    branches: [mainline, 'main/*']\n";
        assert_eq!(rewrite(prefixed), prefixed);
    }

    #[test]
    fn second_rewrite_is_a_no_op() {
        let once = rewrite("on:\n  push:\n    branches:\n      - main\n");
        assert_eq!(rewrite(&once), once);
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let result = rewrite_content("on:\n  push:\n    branches: [main\n", "main", "master");
        assert!(matches!(result, Err(RewriteError::Parse(_))));
    }

    #[test]
    fn inline_trigger_mapping_is_unsupported() {
        let result = rewrite_content("on: {push: {branches: [main]}}\n", "main", "master");
        assert!(matches!(result, Err(RewriteError::UnsupportedLayout)));
    }
}
