//! The markup subset carried by explanation content.
//!
//! Content may contain only:
//!
//! * `\n` line breaks, with a blank line separating paragraphs
//! * lines starting with `- `, which are list items
//! * `**bold**` spans
//! * backslash escapes `\\`, `\*` and `\-` for a literal backslash, star or
//!   dash, so source text can carry `**` or a leading `- ` without turning
//!   into markup
//!
//! Anything else is literal text, including a backslash before any other
//! character. An unpaired `**` is kept as-is. Bold pairs never span lines.

/// Render content as an HTML fragment.
///
/// Text is escaped first, so content can never inject markup of its own.
/// Paragraphs become `<p>`, line breaks inside a paragraph `<br>`, runs of
/// list items `<ul><li>`, and bold spans `<strong>`.
pub fn to_html(content: &str) -> String {
    let mut out = String::new();
    for paragraph in paragraphs(content) {
        let mut text_lines: Vec<&str> = Vec::new();
        let mut items: Vec<&str> = Vec::new();

        for line in paragraph {
            if let Some(item) = line.strip_prefix("- ") {
                flush_text(&mut out, &mut text_lines);
                items.push(item);
            } else {
                flush_items(&mut out, &mut items);
                text_lines.push(line);
            }
        }
        flush_text(&mut out, &mut text_lines);
        flush_items(&mut out, &mut items);
    }
    out
}

/// Strip bold markers and keep everything else, for plain terminals.
pub fn to_plain(content: &str) -> String {
    content
        .lines()
        .map(|line| bold_spans(line, "", ""))
        .collect::<Vec<_>>()
        .join("\n")
}

/// HTML-escape a string.
pub fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn paragraphs(content: &str) -> Vec<Vec<&str>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    for line in content.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn flush_text(out: &mut String, lines: &mut Vec<&str>) {
    if lines.is_empty() {
        return;
    }
    let inner: Vec<String> = lines.iter().map(|l| inline_html(l)).collect();
    out.push_str("<p>");
    out.push_str(&inner.join("<br>"));
    out.push_str("</p>");
    lines.clear();
}

fn flush_items(out: &mut String, items: &mut Vec<&str>) {
    if items.is_empty() {
        return;
    }
    out.push_str("<ul>");
    for item in items.iter() {
        out.push_str("<li>");
        out.push_str(&inline_html(item));
        out.push_str("</li>");
    }
    out.push_str("</ul>");
    items.clear();
}

fn inline_html(line: &str) -> String {
    bold_spans(&escape_html(line), "<strong>", "</strong>")
}

enum Inline<'a> {
    Text(&'a str),
    Escaped(char),
    Marker,
}

fn tokenize(line: &str) -> Vec<Inline<'_>> {
    let mut tokens = Vec::new();
    let mut text_start = 0;
    let mut rest = line.char_indices().peekable();
    while let Some((i, c)) = rest.next() {
        let escaped = match (c, rest.peek()) {
            ('\\', Some(&(_, next))) if matches!(next, '\\' | '*' | '-') => {
                Some(Inline::Escaped(next))
            }
            ('*', Some(&(_, '*'))) => Some(Inline::Marker),
            _ => None,
        };
        if let Some(token) = escaped {
            if text_start < i {
                tokens.push(Inline::Text(&line[text_start..i]));
            }
            tokens.push(token);
            rest.next();
            text_start = i + 2;
        }
    }
    if text_start < line.len() {
        tokens.push(Inline::Text(&line[text_start..]));
    }
    tokens
}

/// Replace paired `**` markers with `open`/`close` and resolve escapes; a
/// trailing unpaired marker stays literal.
fn bold_spans(line: &str, open: &str, close: &str) -> String {
    let tokens = tokenize(line);
    let markers = tokens.iter().filter(|t| matches!(t, Inline::Marker)).count();
    let paired = markers - markers % 2;

    let mut seen = 0;
    let mut out = String::with_capacity(line.len());
    for token in tokens {
        match token {
            Inline::Text(text) => out.push_str(text),
            Inline::Escaped(c) => out.push(c),
            Inline::Marker => {
                out.push_str(match seen {
                    n if n >= paired => "**",
                    n if n % 2 == 0 => open,
                    _ => close,
                });
                seen += 1;
            }
        }
    }
    out
}
