//! Java source emission
//!
//!     Turns a validated [Unit] into the text of one Java compilation unit. Emission is a pure
//!     function of the unit, its [UnitName] and the [EmitOptions]: same inputs, same bytes.
//!
//! Output Shape
//!
//!     package <pkg>;                         (omitted without a package)
//!
//!     import java.io.IOException;
//!     import <symbol>;                       (one per import directive)
//!
//!     public class <Name> extends <Super> {
//!         <one `public static class` per section, recursively>
//!         public static String render(<params>)                   compute-to-text
//!         public static void renderInto(Appendable buffer, ...)   render-into-buffer
//!         public void renderImpl(Appendable buffer, ...)          instance render body
//!         private static String toS(Object o)                     null-safe text helper
//!     }
//!
//!     `renderInto` builds a fresh instance per call; there is no held singleton. When a
//!     scope's body appends to the buffer itself (a literal or an expression) it is wrapped in
//!     a try block that turns an `IOException` from the buffer into a `RuntimeException`.
//!     Bodies made only of statements, includes and section calls are emitted bare, since
//!     `renderInto` throws no checked exception and Java rejects catching one nothing throws.
//!
//! Literal Escaping
//!
//!     Literals become single-line Java string literals: `\` and `"` are escaped, `\r\n` and
//!     `\n` become `\n`, a lone `\r` becomes `\r`, tab becomes `\t`, and any other control
//!     character becomes a `\uXXXX` escape. Nothing else changes, so every literal segment of
//!     the template can be read back out of the output byte for byte once unescaped.

use crate::bb::error::CompileError;
use crate::bb::params::{argument_list, declaration_list, Parameter};
use crate::bb::scope::{Instruction, Scope, Unit};
use std::fmt::{self, Write};

/// Default superclass of every generated class.
pub const DEFAULT_BASE_CLASS: &str = "bb.runtime.BaseBBTemplate";

/// Knobs for the emitted Java.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// Superclass used by scopes without an `extends` directive; empty means none
    pub base_class: String,
    /// One level of indentation
    pub indent: String,
}

impl Default for EmitOptions {
    fn default() -> Self {
        EmitOptions {
            base_class: DEFAULT_BASE_CLASS.to_string(),
            indent: "    ".to_string(),
        }
    }
}

/// Identity of a compilation unit, as resolved by whoever found the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitName {
    pub package: Option<String>,
    pub class_name: String,
}

impl UnitName {
    pub fn new(package: Option<&str>, class_name: impl Into<String>) -> Self {
        UnitName {
            package: package
                .filter(|package| !package.is_empty())
                .map(str::to_string),
            class_name: class_name.into(),
        }
    }

    /// Fully qualified class name.
    pub fn qualified(&self) -> String {
        match &self.package {
            Some(package) => format!("{}.{}", package, self.class_name),
            None => self.class_name.clone(),
        }
    }
}

/// Emit a unit into a fresh string.
pub fn emit(unit: &Unit, name: &UnitName, options: &EmitOptions) -> Result<String, CompileError> {
    let mut out = String::new();
    emit_into(unit, name, options, &mut out)?;
    Ok(out)
}

/// Emit a unit into any text sink. A failing sink surfaces as [CompileError::Emission].
pub fn emit_into<W: Write>(
    unit: &Unit,
    name: &UnitName,
    options: &EmitOptions,
    out: &mut W,
) -> Result<(), CompileError> {
    let mut writer = JavaWriter { out, options };
    writer.header(unit, name)?;
    writer.scope(&unit.root, 0)?;
    Ok(())
}

/// Escape a literal for use inside a Java string literal.
pub fn escape_literal(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' if chars.peek() == Some(&'\n') => {
                chars.next();
                escaped.push_str("\\n");
            }
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if c.is_control() => {
                // Chars outside the BMP are never control characters, so one unit suffices.
                escaped.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => escaped.push(c),
        }
    }
    escaped
}

struct JavaWriter<'a, W: Write> {
    out: &'a mut W,
    options: &'a EmitOptions,
}

impl<'a, W: Write> JavaWriter<'a, W> {
    fn line(&mut self, level: usize, text: &str) -> fmt::Result {
        for _ in 0..level {
            self.out.write_str(&self.options.indent)?;
        }
        self.out.write_str(text)?;
        self.out.write_char('\n')
    }

    fn blank(&mut self) -> fmt::Result {
        self.out.write_char('\n')
    }

    fn header(&mut self, unit: &Unit, name: &UnitName) -> fmt::Result {
        if let Some(package) = &name.package {
            self.line(0, &format!("package {};", package))?;
            self.blank()?;
        }
        self.line(0, "import java.io.IOException;")?;
        for symbol in &unit.imports {
            self.line(0, &format!("import {};", symbol))?;
        }
        self.blank()
    }

    fn scope(&mut self, scope: &Scope, level: usize) -> fmt::Result {
        let options = self.options;
        let superclass = scope
            .superclass
            .as_deref()
            .unwrap_or(&options.base_class);
        let modifiers = if scope.is_top_level() {
            "public class"
        } else {
            "public static class"
        };
        let declaration = if superclass.is_empty() {
            format!("{} {} {{", modifiers, scope.name)
        } else {
            format!("{} {} extends {} {{", modifiers, scope.name, superclass)
        };
        self.line(level, &declaration)?;

        let inner = level + 1;
        for child in &scope.children {
            self.blank()?;
            self.scope(child, inner)?;
        }

        self.entry_points(scope, inner)?;
        self.render_impl(scope, inner)?;

        self.blank()?;
        self.line(inner, "private static String toS(Object o) {")?;
        self.line(inner + 1, "return o == null ? \"\" : o.toString();")?;
        self.line(inner, "}")?;
        self.line(level, "}")
    }

    fn entry_points(&mut self, scope: &Scope, level: usize) -> fmt::Result {
        let params = scope.params();
        let declarations = declaration_list(params);
        let forwarded = forwarded_args(params);

        self.blank()?;
        self.line(
            level,
            &format!("public static String render({}) {{", declarations),
        )?;
        self.line(level + 1, "StringBuilder sb = new StringBuilder();")?;
        self.line(level + 1, &format!("renderInto(sb{});", forwarded))?;
        self.line(level + 1, "return sb.toString();")?;
        self.line(level, "}")?;

        self.blank()?;
        self.line(
            level,
            &format!(
                "public static void renderInto(Appendable buffer{}) {{",
                trailing_declarations(params)
            ),
        )?;
        self.line(
            level + 1,
            &format!("new {}().renderImpl(buffer{});", scope.name, forwarded),
        )?;
        self.line(level, "}")
    }

    fn render_impl(&mut self, scope: &Scope, level: usize) -> fmt::Result {
        self.blank()?;
        self.line(
            level,
            &format!(
                "public void renderImpl(Appendable buffer{}) {{",
                trailing_declarations(scope.params())
            ),
        )?;

        if scope.writes_output() {
            self.line(level + 1, "try {")?;
            for instruction in &scope.body {
                self.instruction(instruction, level + 2)?;
            }
            self.line(level + 1, "} catch (IOException e) {")?;
            self.line(level + 2, "throw new RuntimeException(e);")?;
            self.line(level + 1, "}")?;
        } else {
            for instruction in &scope.body {
                self.instruction(instruction, level + 1)?;
            }
        }

        self.line(level, "}")
    }

    fn instruction(&mut self, instruction: &Instruction, level: usize) -> fmt::Result {
        let text = match instruction {
            Instruction::Literal(text) => {
                format!("buffer.append(\"{}\");", escape_literal(text))
            }
            Instruction::Statement(code) => code.clone(),
            Instruction::Expression(expr) => format!("buffer.append(toS({}));", expr),
            Instruction::Include { template, args } => match args {
                Some(args) => format!("{}.renderInto(buffer, {});", template, args),
                None => format!("{}.renderInto(buffer);", template),
            },
            Instruction::RenderSection { name, args } => {
                let mut call = format!("{}.renderInto(buffer", name);
                for arg in args {
                    call.push_str(", ");
                    call.push_str(arg);
                }
                call.push_str(");");
                call
            }
        };
        self.line(level, &text)
    }
}

/// `, a, b` or nothing
fn forwarded_args(params: &[Parameter]) -> String {
    if params.is_empty() {
        String::new()
    } else {
        format!(", {}", argument_list(params))
    }
}

/// `, String a, int b` or nothing
fn trailing_declarations(params: &[Parameter]) -> String {
    if params.is_empty() {
        String::new()
    } else {
        format!(", {}", declaration_list(params))
    }
}
