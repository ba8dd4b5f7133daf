//! Text rendering of diagnostics.

use colored::Colorize;
use eda_checker::ViolationKind;
use eda_common::{Diagnostic, DiagnosticCategory, LineMap};
use std::collections::HashMap;

/// Renders diagnostics against sources registered with [`Reporter::add_source`].
pub struct Reporter {
    color: bool,
    sources: HashMap<String, String>,
    line_maps: HashMap<String, LineMap>,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter {
            color,
            sources: HashMap::new(),
            line_maps: HashMap::new(),
        }
    }

    /// Register the text of `file` so locations and snippets can be shown.
    pub fn add_source(&mut self, file: impl Into<String>, source: impl Into<String>) {
        let file = file.into();
        let source = source.into();
        self.line_maps.insert(file.clone(), LineMap::build(&source));
        self.sources.insert(file, source);
    }

    pub fn render(&self, diagnostics: &[Diagnostic]) -> String {
        let mut out = String::new();
        for (index, diagnostic) in diagnostics.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&self.format_diagnostic(diagnostic));
        }
        out
    }

    pub fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let mut output = String::new();
        match self.format_location(&diagnostic.file, diagnostic.start) {
            Some(location) => output.push_str(&location),
            None if !diagnostic.file.is_empty() => output.push_str(&diagnostic.file),
            None => output.push_str("<unknown>"),
        }

        output.push_str(" - ");
        output.push_str(&self.format_category(diagnostic.category));
        let code = self.format_code(diagnostic.code);
        if !code.is_empty() {
            output.push(' ');
            output.push_str(&code);
        }
        output.push_str(": ");
        output.push_str(&diagnostic.message_text);

        let kind = ViolationKind::from_code(diagnostic.code);
        let label = kind.map(ViolationKind::label);
        if let Some(snippet) =
            self.format_snippet(&diagnostic.file, diagnostic.start, diagnostic.length, label)
        {
            output.push_str(&snippet);
        }

        if let Some(kind) = kind {
            let path = diagnostic.message_args.first().map_or("", String::as_str);
            output.push_str(&self.format_advice(kind, path));
        }

        for related in &diagnostic.related_information {
            output.push('\n');
            let location = self
                .format_location(&related.file, related.start)
                .unwrap_or_else(|| related.file.clone());
            output.push_str(&format!("  Related: {} - {}", location, related.message_text));
        }

        output
    }

    /// Source line with the span underlined, tsc style, and an optional
    /// label after the marks:
    ///   1   const key = process.env?.API_KEY;
    ///                   ~~~~~~~~~~~~~~~~~~~~ remove the optional chaining operator ('?.')
    /// Spans running past the end of the line are cut at the line end.
    fn format_snippet(
        &self,
        file: &str,
        start: u32,
        length: u32,
        label: Option<&str>,
    ) -> Option<String> {
        if length == 0 {
            return None;
        }
        let source = self.sources.get(file)?;
        let line_map = self.line_maps.get(file)?;

        let start_pos = line_map.offset_to_position(start, source);
        let end_pos = line_map.offset_to_position(start.saturating_add(length), source);
        let line_text = line_map.line_text(start_pos.line as usize, source);
        let line_chars = line_text.chars().count() as u32;

        let from = start_pos.character.min(line_chars);
        let to = if end_pos.line == start_pos.line {
            end_pos.character.min(line_chars)
        } else {
            line_chars
        };
        let width = to.saturating_sub(from).max(1) as usize;

        let mut underline = String::new();
        for ch in line_text.chars().take(from as usize) {
            underline.push(if ch == '\t' { '\t' } else { ' ' });
        }
        let marks = "~".repeat(width);
        if self.color {
            underline.push_str(&marks.red().to_string());
        } else {
            underline.push_str(&marks);
        }
        if let Some(label) = label {
            underline.push(' ');
            if self.color {
                underline.push_str(&label.red().to_string());
            } else {
                underline.push_str(label);
            }
        }

        Some(format!(
            "\n  {:>3}   {}\n        {}",
            start_pos.line + 1,
            line_text,
            underline
        ))
    }

    fn format_advice(&self, kind: ViolationKind, path: &str) -> String {
        let (note, help) = if self.color {
            ("note".cyan().bold().to_string(), "help".green().bold().to_string())
        } else {
            ("note".to_string(), "help".to_string())
        };

        let mut out = format!("\n  = {}: {}", note, kind.note());
        for (i, line) in kind.help(path).lines().enumerate() {
            if i == 0 {
                out.push_str(&format!("\n  = {}: {}", help, line));
            } else {
                out.push_str(&format!("\n          {}", line));
            }
        }
        out
    }

    fn format_location(&self, file: &str, offset: u32) -> Option<String> {
        let source = self.sources.get(file)?;
        let line_map = self.line_maps.get(file)?;
        let position = line_map.offset_to_position(offset, source);
        Some(format!(
            "{}:{}:{}",
            file,
            position.line + 1,
            position.character + 1
        ))
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = category.label();
        if !self.color {
            return label.to_string();
        }

        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
            DiagnosticCategory::Suggestion => label.blue().bold().to_string(),
            DiagnosticCategory::Message => label.cyan().bold().to_string(),
        }
    }

    fn format_code(&self, code: u32) -> String {
        if code == 0 {
            return String::new();
        }

        let label = format!("EDA{}", code);
        if self.color {
            label.bright_blue().to_string()
        } else {
            label
        }
    }
}

/// Render one diagnostic against its source, without color.
pub fn format_diagnostic(diagnostic: &Diagnostic, source: &str) -> String {
    let mut reporter = Reporter::new(false);
    reporter.add_source(diagnostic.file.clone(), source);
    reporter.format_diagnostic(diagnostic)
}
