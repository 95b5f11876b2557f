//! # sqlweave
//!
//! A compiler for parameterized SQL fragments. A template mixes SQL text
//! with typed placeholders and optional `{ ... }` blocks; compiling it
//! against an ordered argument list yields the final SQL string.
//!
//! | Token     | Meaning                                             |
//! |-----------|-----------------------------------------------------|
//! | `?`       | scalar: null, boolean, integer, float or string     |
//! | `?d`      | integer                                             |
//! | `?f`      | float                                               |
//! | `?#`      | identifier, or list of identifiers                  |
//! | `?a`      | list, or key/value list                             |
//! | `{ ... }` | block, omitted if any placeholder in it gets [`skip()`] |
//!
//! ```
//! use sqlweave::{compile, skip, Value};
//!
//! let sql = compile(
//!     "SELECT ?# FROM users WHERE name = ? {AND age > ?d}",
//!     &[Value::from(vec!["id", "name"]), Value::from("ann"), skip()],
//! )
//! .unwrap();
//! assert_eq!(sql, "SELECT `id`, `name` FROM users WHERE name = 'ann'");
//! ```
//!
//! Compilation is a pure function of the template and the arguments. It
//! never opens a connection; executing the SQL is the caller's business.
//! String escaping is textual (backslash insertion) and is not a substitute
//! for bound parameters when input is untrusted.

pub mod config;
pub mod error;
pub mod format;
pub mod template;
pub mod types;

pub use config::{CompileOptions, NumericMode};
pub use error::{CompileError, Result};
pub use template::{PlaceholderKind, Token};
pub use types::Value;

/// The two operations a database client needs from a query compiler.
pub trait QueryCompiler {
    /// Compiles `template` against `args` into SQL text.
    fn build_query(&self, template: &str, args: &[Value]) -> Result<String>;

    /// Returns the skip sentinel.
    fn skip(&self) -> Value {
        Value::Skip
    }
}

/// A template compiler configured with [`CompileOptions`].
///
/// Holds no state besides its options, so one instance can be shared
/// freely across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Compiler {
    options: CompileOptions,
}

impl Compiler {
    pub fn new(options: CompileOptions) -> Self {
        Compiler { options }
    }

    /// Get the options this compiler applies.
    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compile a template.
    ///
    /// The placeholder count is checked first, so a mismatch fails before
    /// any tokenizing or formatting happens.
    pub fn compile(&self, template: &str, args: &[Value]) -> Result<String> {
        tracing::debug!(
            template_len = template.len(),
            args = args.len(),
            "compiling template"
        );
        template::validate(template, args.len())?;
        let tokens = template::Lexer::new(template).tokenize();
        let sql = template::assemble(&tokens, args, &self.options)?;
        tracing::debug!(sql_len = sql.len(), "compiled template");
        Ok(sql)
    }
}

impl QueryCompiler for Compiler {
    fn build_query(&self, template: &str, args: &[Value]) -> Result<String> {
        self.compile(template, args)
    }
}

/// Compile a template with the default options.
pub fn compile(template: &str, args: &[Value]) -> Result<String> {
    Compiler::default().compile(template, args)
}

/// The skip sentinel. Bind it to a placeholder inside a `{ ... }` block to
/// drop the whole block from the output.
pub fn skip() -> Value {
    Value::Skip
}

/// Tokenize a template without compiling it.
pub fn tokenize(template: &str) -> Vec<Token<'_>> {
    template::Lexer::new(template).tokenize()
}
