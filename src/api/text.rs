/// Turn a document body into display text.
///
/// The API already strips markup, but some deployments pass HTML through;
/// that is rendered with html2text first. Whitespace runs collapse to a
/// single space either way.
pub fn plain_text(content: &str) -> String {
    let text = if looks_like_html(content) {
        html2text::from_read(content.as_bytes(), 120).unwrap_or_else(|_| content.to_string())
    } else {
        content.to_string()
    };
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn looks_like_html(content: &str) -> bool {
    content.match_indices('<').any(|(i, _)| {
        let rest = &content[i + 1..];
        rest.starts_with(|c: char| c.is_ascii_alphabetic() || c == '/' || c == '!')
            && rest.contains('>')
    })
}
