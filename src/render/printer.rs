use super::compile::LinkRules;
use super::text::{escape_latex, wrap};
use anyhow::Result;

/// Indented line writer shared by the LaTeX and DOT emitters.
pub struct Printer<'a> {
    out: &'a mut String,
    indent: String,
    rules: &'a LinkRules,
    wrap_width: usize,
}

impl<'a> Printer<'a> {
    pub fn new(out: &'a mut String, rules: &'a LinkRules, wrap_width: usize) -> Self {
        Self {
            out,
            indent: String::new(),
            rules,
            wrap_width,
        }
    }

    /// Write one line at the current indent.
    pub fn direct(&mut self, text: &str) {
        self.out.push_str(&self.indent);
        self.out.push_str(text);
        self.out.push('\n');
    }

    pub fn blank(&mut self) {
        self.direct("");
    }

    pub fn escape(&self, text: &str) -> String {
        escape_latex(text)
    }

    pub fn substitute(&self, text: &str) -> String {
        self.rules.apply(text)
    }

    /// Word-wrap `text` with `extra_indent` past the current indent.
    ///
    /// The wrapped lines already carry the indent and are then written through
    /// `direct`, so the printer indent appears twice on these lines.
    pub fn wrapped(&mut self, text: &str, extra_indent: &str) {
        let indent = format!("{}{}", self.indent, extra_indent);
        for line in wrap(text, self.wrap_width, &indent) {
            self.direct(&line);
        }
    }

    /// Write `begin`, run `body` two spaces deeper, then write `end`.
    pub fn block<F>(&mut self, begin: &str, end: &str, body: F) -> Result<()>
    where
        F: FnOnce(&mut Printer<'_>) -> Result<()>,
    {
        self.direct(begin);
        {
            let mut child = Printer {
                out: &mut *self.out,
                indent: format!("{}  ", self.indent),
                rules: self.rules,
                wrap_width: self.wrap_width,
            };
            body(&mut child)?;
        }
        self.direct(end);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_nest_indent() {
        let rules = LinkRules::default();
        let mut out = String::new();
        let mut printer = Printer::new(&mut out, &rules, 70);
        printer
            .block("{", "}", |p| {
                p.direct("a");
                p.block("[", "]", |p| {
                    p.direct("b");
                    Ok(())
                })
            })
            .expect("print");
        assert_eq!(out, "{\n  a\n  [\n    b\n  ]\n}\n");
    }

    #[test]
    fn wrapped_lines_repeat_the_indent() {
        let rules = LinkRules::default();
        let mut out = String::new();
        let mut printer = Printer::new(&mut out, &rules, 70);
        printer
            .block("<", ">", |p| {
                p.wrapped("hello world", "  ");
                p.blank();
                Ok(())
            })
            .expect("print");
        assert_eq!(out, "<\n      hello world\n  \n>\n");
    }
}
