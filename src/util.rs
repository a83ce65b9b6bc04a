use std::fmt;

/// Pads/truncates remaining input to a fixed-width `|...|` column for trace output.
pub fn formatter_str(c: &str) -> String {
    let s: String = c.chars().take(33).collect::<String>().escape_debug().to_string();
    let s = s.replace("\\\"", "\"");
    let s = s.replace("\\\'", "\'");
    let s: String = s.chars().take(33).collect();
    format!("{:<35}", "|".to_string() + &s + "|")
}

pub fn quote_char(c: char) -> String {
    match c {
        '\'' => "'\\''".to_string(),
        _ => format!("'{}'", c.escape_debug()),
    }
}

pub fn quote_and_escape(s: &str) -> String {
    format!("\"{}\"", s.escape_debug())
}

/// Writes `(a<separator>b...)`, the form composite parsers describe themselves in.
pub fn write_list<I>(f: &mut fmt::Formatter, items: I, separator: &str) -> fmt::Result
where
    I: IntoIterator<Item = String>,
{
    f.write_str("(")?;
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        f.write_str(&item)?;
    }
    f.write_str(")")
}
