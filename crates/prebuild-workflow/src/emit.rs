//! Minimal block-style YAML emitter.
//!
//! Only the subset a workflow file needs: ordered mappings, sequences of
//! mappings, inline flow lists, literal `|` blocks and plain scalars.
//! Key order is preserved exactly as inserted, and output is two-space
//! indented with sequence dashes indented under their key.

/// A YAML value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Empty value (`key:` with nothing after it).
    Null,
    /// Scalar text, already quoted if it needed to be.
    Scalar(String),
    /// Literal block scalar (`key: |`), one entry per line.
    Literal(Vec<String>),
    /// Inline flow sequence (`key: [ a, b ]`).
    Flow(Vec<String>),
    /// Nested mapping.
    Map(Mapping),
    /// Block sequence of mappings.
    Seq(Vec<Mapping>),
}

impl Value {
    /// A string scalar, quoted only when plain style would change its meaning.
    pub fn str(s: impl AsRef<str>) -> Self {
        Value::Scalar(scalar(s.as_ref(), false))
    }

    pub fn bool(b: bool) -> Self {
        Value::Scalar(b.to_string())
    }

    /// Flow list of string scalars.
    pub fn flow<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Value::Flow(items.into_iter().map(|s| scalar(s.as_ref(), true)).collect())
    }

    /// Literal block from lines.
    pub fn literal<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::Literal(lines.into_iter().map(Into::into).collect())
    }
}

/// An ordered YAML mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mapping {
    entries: Vec<(String, Value)>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, builder style.
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.insert(key, value);
        self
    }

    /// Append an entry.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.entries.push((key.into(), value));
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Render a mapping at the given indent, appending lines to `out`.
pub fn render_mapping(map: &Mapping, indent: usize, out: &mut Vec<String>) {
    let pad = " ".repeat(indent);
    for (key, value) in map.iter() {
        match value {
            Value::Null => out.push(format!("{pad}{key}:")),
            Value::Scalar(s) => out.push(format!("{pad}{key}: {s}")),
            Value::Flow(items) => out.push(format!("{pad}{key}: [ {} ]", items.join(", "))),
            Value::Literal(lines) => {
                out.push(format!("{pad}{key}: |"));
                for line in lines {
                    if line.is_empty() {
                        out.push(String::new());
                    } else {
                        out.push(format!("{pad}  {line}"));
                    }
                }
            }
            Value::Map(inner) => {
                out.push(format!("{pad}{key}:"));
                render_mapping(inner, indent + 2, out);
            }
            Value::Seq(items) => {
                out.push(format!("{pad}{key}:"));
                for item in items {
                    render_sequence_item(item, indent + 2, out);
                }
            }
        }
    }
}

/// Render one `- ` sequence item whose dash sits at `indent`.
pub fn render_sequence_item(map: &Mapping, indent: usize, out: &mut Vec<String>) {
    let start = out.len();
    render_mapping(map, indent + 2, out);
    if let Some(first) = out.get_mut(start) {
        let body = first[indent + 2..].to_string();
        *first = format!("{}- {body}", " ".repeat(indent));
    } else {
        out.push(format!("{}- {{}}", " ".repeat(indent)));
    }
}

/// Render a mapping to lines starting at column zero.
pub fn to_lines(map: &Mapping) -> Vec<String> {
    let mut out = Vec::new();
    render_mapping(map, 0, &mut out);
    out
}

/// Quote `s` if a plain scalar would not read back as the same string.
/// Single quotes are used unless `s` holds control characters, which only
/// survive in double-quoted style. Flow context also rules out `,[]{}`.
pub fn scalar(s: &str, flow: bool) -> String {
    if s.chars().any(char::is_control) {
        double_quoted(s)
    } else if needs_quotes(s, flow) {
        format!("'{}'", s.replace('\'', "''"))
    } else {
        s.to_string()
    }
}

fn double_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn needs_quotes(s: &str, flow: bool) -> bool {
    const KEYWORDS: &[&str] = &[
        "~", "null", "Null", "NULL", "true", "True", "TRUE", "false", "False", "FALSE", "yes",
        "Yes", "YES", "no", "No", "NO", "on", "On", "ON", "off", "Off", "OFF",
    ];

    let Some(first) = s.chars().next() else {
        return true;
    };
    if KEYWORDS.contains(&s) || s.trim() != s || looks_numeric(s) {
        return true;
    }
    if "*&!|>'\"%@`#?:[]{},".contains(first) || s.starts_with("- ") || s == "-" {
        return true;
    }
    if s.contains(": ") || s.contains(" #") || s.ends_with(':') {
        return true;
    }
    flow && s.contains([',', '[', ']', '{', '}'])
}

/// Whether a YAML 1.1 or 1.2 reader would resolve `s` as an int or float.
fn looks_numeric(s: &str) -> bool {
    let body = s.strip_prefix(['+', '-']).unwrap_or(s);
    if matches!(body, ".inf" | ".Inf" | ".INF") || matches!(s, ".nan" | ".NaN" | ".NAN") {
        return true;
    }
    if let Some(hex) = body.strip_prefix("0x") {
        return !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit() || c == '_');
    }
    if let Some(oct) = body.strip_prefix("0o") {
        return !oct.is_empty() && oct.chars().all(|c| c.is_digit(8) || c == '_');
    }

    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(i) => (&body[..i], Some(&body[i + 1..])),
        None => (body, None),
    };
    if let Some(exp) = exponent {
        let digits = exp.strip_prefix(['+', '-']).unwrap_or(exp);
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }
    }
    mantissa.chars().filter(|&c| c == '.').count() <= 1
        && mantissa.chars().any(|c| c.is_ascii_digit())
        && mantissa.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_mapping_indents_by_two() {
        let map = Mapping::new().with(
            "on",
            Value::Map(Mapping::new().with(
                "push",
                Value::Map(Mapping::new().with("branches", Value::flow(["main"]))),
            )),
        );
        assert_eq!(to_lines(&map), ["on:", "  push:", "    branches: [ main ]"]);
    }

    #[test]
    fn sequence_items_get_dashes() {
        let step = Mapping::new()
            .with("uses", Value::str("actions/checkout@v4"))
            .with("with", Value::Map(Mapping::new().with("submodules", Value::str("recursive"))));
        let map = Mapping::new().with("steps", Value::Seq(vec![step]));
        assert_eq!(
            to_lines(&map),
            [
                "steps:",
                "  - uses: actions/checkout@v4",
                "    with:",
                "      submodules: recursive",
            ]
        );
    }

    #[test]
    fn literal_block() {
        let map = Mapping::new().with("run", Value::literal(["echo a", "echo b"]));
        assert_eq!(to_lines(&map), ["run: |", "  echo a", "  echo b"]);
    }

    #[test]
    fn null_value() {
        let map = Mapping::new().with("workflow_dispatch", Value::Null);
        assert_eq!(to_lines(&map), ["workflow_dispatch:"]);
    }

    #[test]
    fn expressions_stay_plain() {
        assert_eq!(
            scalar("${{ github.workspace }}/vcpkg", false),
            "${{ github.workspace }}/vcpkg"
        );
        assert_eq!(scalar("--clean-buildtrees-after-build", false), "--clean-buildtrees-after-build");
        assert_eq!(scalar("~/.cache/vcpkg/archives", false), "~/.cache/vcpkg/archives");
    }

    #[test]
    fn ambiguous_scalars_are_quoted() {
        assert_eq!(scalar("*", true), "'*'");
        assert_eq!(scalar("true", false), "'true'");
        assert_eq!(scalar("a: b", false), "'a: b'");
        assert_eq!(scalar("it's", false), "it's");
        assert_eq!(scalar("'x'", false), "'''x'''");
        assert_eq!(scalar("", false), "''");
        assert_eq!(scalar("a,b", true), "'a,b'");
        assert_eq!(scalar("a,b", false), "a,b");
    }

    #[test]
    fn number_like_scalars_are_quoted() {
        for s in ["4.10", "1.0", "42", "-7", "+3", ".5", "1e3", "2.5E-4", "0x1F", "0o17", ".inf", "-.Inf", ".nan", "1_000"] {
            assert_eq!(scalar(s, false), format!("'{s}'"), "{s}");
        }
        assert_eq!(scalar("1.0", true), "'1.0'");
    }

    #[test]
    fn version_and_hash_strings_stay_plain() {
        for s in ["0.12.2", "4.13.0", "5c82f7e6372c9b0ea25e1fd829dd50235ef37629", "e3", "1e", "0x", "v1.0", "1.0-rc1"] {
            assert_eq!(scalar(s, false), s, "{s}");
        }
    }

    #[test]
    fn control_characters_use_double_quotes() {
        assert_eq!(scalar("a\nb", false), "\"a\\nb\"");
        assert_eq!(scalar("tab\there \"q\"", false), "\"tab\\there \\\"q\\\"\"");
        assert_eq!(scalar("bell\u{7}", true), "\"bell\\u0007\"");
    }

    #[test]
    fn mapping_preserves_insertion_order() {
        let map = Mapping::new()
            .with("name", Value::str("x"))
            .with("id", Value::str("y"))
            .with("env", Value::Null);
        let keys: Vec<_> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["name", "id", "env"]);
        assert_eq!(map.get("id"), Some(&Value::Scalar("y".into())));
    }
}
