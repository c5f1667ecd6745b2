//! Plain-text dump of an [`Analysis`], used by `--dump`.

use super::Analysis;
use std::fmt::Write;

/// Render tokens, the scope tree and diagnostics as text.
pub fn render(analysis: &Analysis) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, analysis);
    out
}

fn write_report(out: &mut String, analysis: &Analysis) -> std::fmt::Result {
    let tokens = analysis.tokens();
    writeln!(out, "Found {} tokens", tokens.len())?;
    for token in tokens {
        writeln!(out, "{}", token)?;
    }

    writeln!(out)?;
    writeln!(out, "Scope tree:")?;
    out.push_str(&analysis.scopes().render(tokens));

    writeln!(out)?;
    let diagnostics = analysis.diagnostics();
    writeln!(out, "Found {} diagnostics", diagnostics.len())?;
    for diagnostic in diagnostics {
        writeln!(out, "{}", diagnostic)?;
        if let Some(line) = analysis.line_of_token(diagnostic.token_index) {
            let text = analysis.line_text(line).unwrap_or_default();
            writeln!(out, "  line {}: {}", line + 1, text.trim())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_sections() {
        let analysis = Analysis::run("int x;\nvoid f() {\n").unwrap();
        let text = render(&analysis);
        let expected = "\
Found 8 tokens
TYPE       from 0    to 3    int
IDENTIFIER from 4    to 5    x
SYMBOL     from 5    to 6    ;
KEYWORD    from 7    to 11   void
IDENTIFIER from 12   to 13   f
SYMBOL     from 13   to 14   (
SYMBOL     from 14   to 15   )
SYMBOL     from 16   to 17   {

Scope tree:
╚═global
  ╚═)

Found 1 diagnostics
Syntax error at token 7: '{' is never closed
  line 2: void f() {
";
        assert_eq!(text, expected);
    }
}
