//! Line layout for field declarations, following black's rules at the
//! configured line length: one line if it fits, then the call arguments on
//! one indented line, then one argument per line with long string literals
//! split into parenthesised concatenations.

use crate::literal::{quote, split_literal};

const INDENT: usize = 4;

/// The value half of a keyword or positional argument.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// Python source emitted verbatim.
    Code(String),
    /// Text emitted as a string literal, split when too long.
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Arg {
    pub key: Option<&'static str>,
    pub value: ArgValue,
}

impl Arg {
    pub fn positional(code: impl Into<String>) -> Self {
        Self {
            key: None,
            value: ArgValue::Code(code.into()),
        }
    }

    pub fn code(key: &'static str, code: impl Into<String>) -> Self {
        Self {
            key: Some(key),
            value: ArgValue::Code(code.into()),
        }
    }

    pub fn text(key: &'static str, text: impl Into<String>) -> Self {
        Self {
            key: Some(key),
            value: ArgValue::Text(text.into()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Layout {
    pub line_length: usize,
    pub prefer_double: bool,
    pub wrap_strings: bool,
}

fn width(line: &str) -> usize {
    line.chars().count()
}

fn pad(indent: usize) -> String {
    " ".repeat(indent)
}

impl Layout {
    fn fits(&self, line: &str) -> bool {
        width(line) <= self.line_length
    }

    fn flat(&self, arg: &Arg) -> String {
        let value = match &arg.value {
            ArgValue::Code(code) => code.clone(),
            ArgValue::Text(text) => quote(text, self.prefer_double),
        };
        match arg.key {
            Some(key) => format!("{key}={value}"),
            None => value,
        }
    }

    /// `target` or `target = value` at `indent`.
    pub fn assignment(&self, indent: usize, target: &str, value: Option<&str>) -> Vec<String> {
        match value {
            Some(value) => vec![format!("{}{target} = {value}", pad(indent))],
            None => vec![format!("{}{target}", pad(indent))],
        }
    }

    /// `target = Field(args)` at `indent`, broken over as many lines as needed.
    pub fn field_call(&self, indent: usize, target: &str, args: &[Arg]) -> Vec<String> {
        let flat_args = args.iter().map(|a| self.flat(a)).collect::<Vec<_>>().join(", ");

        let one_line = format!("{}{target} = Field({flat_args})", pad(indent));
        if self.fits(&one_line) {
            return vec![one_line];
        }

        let head = format!("{}{target} = Field(", pad(indent));
        if self.fits(&head) {
            let mut lines = vec![head];
            lines.extend(self.call_body(indent + INDENT, &flat_args, args));
            lines.push(format!("{})", pad(indent)));
            return lines;
        }

        // The annotation alone is too wide: parenthesise the whole value.
        let inner = indent + INDENT;
        let mut lines = vec![format!("{}{target} = (", pad(indent))];
        let call = format!("{}Field({flat_args})", pad(inner));
        if self.fits(&call) {
            lines.push(call);
        } else {
            lines.push(format!("{}Field(", pad(inner)));
            lines.extend(self.call_body(inner + INDENT, &flat_args, args));
            lines.push(format!("{})", pad(inner)));
        }
        lines.push(format!("{})", pad(indent)));
        lines
    }

    fn call_body(&self, indent: usize, flat_args: &str, args: &[Arg]) -> Vec<String> {
        let joined = format!("{}{flat_args}", pad(indent));
        if self.fits(&joined) {
            return vec![joined];
        }

        let mut lines = Vec::new();
        for arg in args {
            let line = format!("{}{},", pad(indent), self.flat(arg));
            match (&arg.value, arg.key) {
                (ArgValue::Text(text), Some(key)) if !self.fits(&line) && self.wrap_strings => {
                    let chunk_indent = indent + INDENT;
                    let max_width = self.line_length.saturating_sub(chunk_indent);
                    lines.push(format!("{}{key}=(", pad(indent)));
                    for chunk in split_literal(text, max_width, self.prefer_double) {
                        lines.push(format!("{}{chunk}", pad(chunk_indent)));
                    }
                    lines.push(format!("{}),", pad(indent)));
                }
                _ => lines.push(line),
            }
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUT: Layout = Layout {
        line_length: 88,
        prefer_double: true,
        wrap_strings: true,
    };

    #[test]
    fn test_single_line() {
        let lines = LAYOUT.field_call(
            4,
            "uid: Optional[str]",
            &[Arg::code("default", "None"), Arg::text("description", "Specifies the target UID.")],
        );
        assert_eq!(
            lines,
            vec![r#"    uid: Optional[str] = Field(default=None, description="Specifies the target UID.")"#]
        );
    }

    #[test]
    fn test_arguments_on_one_line() {
        let lines = LAYOUT.field_call(
            4,
            "name: Optional[str]",
            &[
                Arg::code("default", "None"),
                Arg::text("description", "Specifies the name of the extension provider."),
            ],
        );
        assert_eq!(
            lines,
            vec![
                "    name: Optional[str] = Field(",
                r#"        default=None, description="Specifies the name of the extension provider.""#,
                "    )",
            ]
        );
    }

    #[test]
    fn test_one_argument_per_line() {
        let lines = LAYOUT.field_call(
            4,
            "provider: Optional[Provider]",
            &[
                Arg::code("default", "None"),
                Arg::text("description", "Specifies detailed configuration of the CUSTOM action."),
            ],
        );
        assert_eq!(
            lines,
            vec![
                "    provider: Optional[Provider] = Field(",
                "        default=None,",
                r#"        description="Specifies detailed configuration of the CUSTOM action.","#,
                "    )",
            ]
        );
    }

    #[test]
    fn test_long_description_wrapped() {
        let lines = LAYOUT.field_call(
            4,
            "replicas: Optional[int]",
            &[
                Arg::code("default", "None"),
                Arg::text(
                    "description",
                    "replicas is the desired number of instances for the scaled object.",
                ),
            ],
        );
        assert_eq!(
            lines,
            vec![
                "    replicas: Optional[int] = Field(",
                "        default=None,",
                "        description=(",
                r#"            "replicas is the desired number of instances for the scaled object.""#,
                "        ),",
                "    )",
            ]
        );
    }

    #[test]
    fn test_wide_annotation_parenthesised() {
        let lines = LAYOUT.field_call(
            4,
            "requiredDuringSchedulingIgnoredDuringExecution: Optional[List[PodAffinityTerm]]",
            &[Arg::code("default", "None"), Arg::text("description", "Hard requirements.")],
        );
        assert_eq!(
            lines,
            vec![
                "    requiredDuringSchedulingIgnoredDuringExecution: Optional[List[PodAffinityTerm]] = (",
                r#"        Field(default=None, description="Hard requirements.")"#,
                "    )",
            ]
        );
    }

    #[test]
    fn test_no_wrapping_when_disabled() {
        let layout = Layout {
            wrap_strings: false,
            ..LAYOUT
        };
        let description = "a".repeat(90);
        let lines = layout.field_call(
            4,
            "x: str",
            &[Arg::positional("..."), Arg::text("description", description.clone())],
        );
        assert_eq!(lines[2], format!(r#"        description="{description}","#));
    }
}
