//! DOT format helpers.

use std::fmt::Write;

/// Quote an arbitrary string as a DOT identifier.
///
/// Rendered IDs contain `:` and `.`; they are emitted as quoted strings.
pub fn quote_id(input: &str) -> String {
    format!("\"{}\"", escape_label(input))
}

/// Escape special characters for DOT labels.
pub fn escape_label(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

fn write_indent(output: &mut String, level: usize) {
    for _ in 0..level {
        output.push_str("  ");
    }
}

fn write_attrs(output: &mut String, attrs: &[(&str, &str)]) {
    output.push('[');
    for (i, (key, value)) in attrs.iter().enumerate() {
        if i > 0 {
            output.push_str(", ");
        }
        let _ = write!(output, "{key}=\"{}\"", escape_label(value));
    }
    output.push(']');
}

/// Builder for a single `digraph`.
pub struct DotBuilder {
    output: String,
    indent: usize,
}

impl DotBuilder {
    pub fn new(name: &str) -> Self {
        let mut output = String::with_capacity(4096);
        let _ = writeln!(output, "digraph {name} {{");
        Self { output, indent: 1 }
    }

    /// Add a graph attribute.
    pub fn attr(&mut self, key: &str, value: &str) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = writeln!(self.output, "{key}=\"{}\";", escape_label(value));
        self
    }

    /// Default attributes for every node.
    pub fn node_defaults(&mut self, attrs: &[(&str, &str)]) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        self.output.push_str("node ");
        write_attrs(&mut self.output, attrs);
        self.output.push_str(";\n");
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.output.push('\n');
        self
    }

    pub fn node(&mut self, id: &str, attrs: &[(&str, &str)]) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        self.output.push_str(&quote_id(id));
        write_attrs(&mut self.output, attrs);
        self.output.push_str(";\n");
        self
    }

    pub fn edge(&mut self, from: &str, to: &str, attrs: &[(&str, &str)]) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = write!(self.output, "{} -> {}", quote_id(from), quote_id(to));
        if !attrs.is_empty() {
            self.output.push(' ');
            write_attrs(&mut self.output, attrs);
        }
        self.output.push_str(";\n");
        self
    }

    /// Finish building and return the DOT string.
    pub fn build(mut self) -> String {
        self.output.push_str("}\n");
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_label() {
        assert_eq!(escape_label(r#"a "b" \ c"#), r#"a \"b\" \\ c"#);
        assert_eq!(escape_label("two\nlines"), "two\\nlines");
    }

    #[test]
    fn test_quote_id_keeps_ids_distinct() {
        assert_eq!(quote_id("host:h1"), "\"host:h1\"");
        assert_ne!(quote_id("a:b"), quote_id("a_b"));
    }

    #[test]
    fn test_builder_output() {
        let mut dot = DotBuilder::new("G");
        dot.attr("rankdir", "LR")
            .node_defaults(&[("shape", "box")])
            .blank()
            .node("a:1", &[("label", "A")])
            .edge("a:1", "b", &[])
            .edge("b", "a:1", &[("style", "dashed")]);
        assert_eq!(
            dot.build(),
            "digraph G {\n  rankdir=\"LR\";\n  node [shape=\"box\"];\n\n  \"a:1\"[label=\"A\"];\n  \"a:1\" -> \"b\";\n  \"b\" -> \"a:1\" [style=\"dashed\"];\n}\n"
        );
    }
}
