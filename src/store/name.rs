/// Longest display name kept, in characters
pub const MAX_NAME_LEN: usize = 60;

/// Name used when the recipe text has no usable title line
pub const UNTITLED_RECIPE: &str = "Untitled Recipe";

/// Labels models like to put in front of the title
const TITLE_LABELS: &[&str] = &["recipe name:", "recipe title:", "recipe:", "title:", "name:"];

const MARKUP_CHARS: &[char] = &['#', '*', '_', '>', '`', '~', '='];

/// Derive a short display name from generated recipe text.
///
/// Takes the first line that still has text after removing markdown markup,
/// list numbering and "Recipe Name:"-style labels, then caps it at
/// [`MAX_NAME_LEN`] characters.
pub fn derive_name(recipe_text: &str) -> String {
    recipe_text
        .lines()
        .map(clean_title_line)
        .find(|line| !line.is_empty())
        .map(truncate_name)
        .unwrap_or_else(|| UNTITLED_RECIPE.to_string())
}

fn clean_title_line(line: &str) -> &str {
    let mut current = line.trim();

    loop {
        let before = current;
        current = current.trim_start_matches(MARKUP_CHARS).trim_start();
        current = strip_list_marker(current);
        current = strip_title_label(current);
        if current == before {
            break;
        }
    }

    current.trim_end_matches(MARKUP_CHARS).trim_end()
}

/// Strip "1. ", "12) ", "- " or "+ " from the start of a line.
fn strip_list_marker(line: &str) -> &str {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    let rest = if digits > 0 {
        match line[digits..].strip_prefix(['.', ')']) {
            Some(rest) => rest,
            None => return line,
        }
    } else {
        match line.strip_prefix(['-', '+']) {
            Some(rest) => rest,
            None => return line,
        }
    };

    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        rest.trim_start()
    } else {
        line
    }
}

fn strip_title_label(line: &str) -> &str {
    for label in TITLE_LABELS {
        let matches = line
            .get(..label.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(label));
        if matches {
            return line[label.len()..].trim_start();
        }
    }
    line
}

fn truncate_name(name: &str) -> String {
    match name.char_indices().nth(MAX_NAME_LEN) {
        Some((cut, _)) => name[..cut].trim_end().to_string(),
        None => name.to_string(),
    }
}
