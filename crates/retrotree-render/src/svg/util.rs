// Shared number/text formatting for SVG and HTML output.

pub(crate) fn fmt(v: f64) -> String {
    // Shortest round-trippable decimal, without `-0` or float noise near integers.
    if !v.is_finite() {
        return "0".to_string();
    }

    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-9 {
        v = nearest;
    }
    let s = v.to_string();
    if s == "-0" { "0".to_string() } else { s }
}

pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Keeps characters that are safe inside a CSS value; everything else is dropped.
pub(crate) fn css_value(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '#' | '(' | ')' | ',' | '.' | '%' | ' ' | '-'))
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fmt_trims_noise_and_negative_zero() {
        assert_eq!(fmt(-0.0), "0");
        assert_eq!(fmt(3.0000000000001), "3");
        assert_eq!(fmt(547.52), "547.52");
        assert_eq!(fmt(f64::NAN), "0");
    }

    #[test]
    fn escape_xml_covers_markup_characters() {
        assert_eq!(escape_xml(r#"<a & 'b' "c">"#), "&lt;a &amp; &#39;b&#39; &quot;c&quot;&gt;");
    }

    #[test]
    fn css_value_drops_rule_breakers() {
        assert_eq!(css_value("#e74c3c"), "#e74c3c");
        assert_eq!(css_value("red;} body{display:none"), "red bodydisplaynone");
        assert_eq!(css_value("rgb(1, 2, 3)"), "rgb(1, 2, 3)");
    }
}
