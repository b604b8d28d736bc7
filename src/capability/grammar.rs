//! Syntax grammars for the code renderer.
//!
//! A grammar here is lexical only: keywords, comment markers and string
//! quotes. That is enough to tag tokens the way Prism themes expect.
//!
//! Grammars come from a [`GrammarSource`]. The default source reads
//! `<grammar_dir>/<name>.toml` when a directory is configured and falls
//! back to the built-in table:
//!
//! ```toml
//! keywords = ["fn", "let", "match"]
//! line_comment = "//"
//! block_comment = ["/*", "*/"]
//! quotes = "\"'"
//! ```

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;
use tokio::task::JoinSet;

use super::CapabilityError;
use crate::{debug, log};

/// Lexical definition of one language.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grammar {
    pub name: String,
    pub keywords: FxHashSet<String>,
    pub line_comment: Option<String>,
    pub block_comment: Option<(String, String)>,
    pub quotes: Vec<char>,
}

impl Grammar {
    #[inline]
    pub fn is_keyword(&self, word: &str) -> bool {
        self.keywords.contains(word)
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct GrammarFile {
    #[serde(default)]
    keywords: Vec<String>,
    line_comment: Option<String>,
    block_comment: Option<[String; 2]>,
    #[serde(default = "default_quotes")]
    quotes: String,
}

fn default_quotes() -> String {
    "\"'".to_owned()
}

impl GrammarFile {
    fn into_grammar(self, name: &str) -> Grammar {
        Grammar {
            name: name.to_owned(),
            keywords: self.keywords.into_iter().collect(),
            line_comment: self.line_comment,
            block_comment: self.block_comment.map(|[open, close]| (open, close)),
            quotes: self.quotes.chars().collect(),
        }
    }
}

// ============================================================================
// sources
// ============================================================================

pub type GrammarFuture = Pin<Box<dyn Future<Output = Result<Grammar, CapabilityError>> + Send>>;

/// Where grammar definitions are fetched from.
pub trait GrammarSource: Send + Sync {
    fn fetch(&self, name: &str) -> GrammarFuture;
}

/// The grammars compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinGrammars;

impl BuiltinGrammars {
    pub fn get(name: &str) -> Option<Grammar> {
        let (_, keywords, line, block, quotes) =
            BUILTIN.iter().find(|(grammar, ..)| *grammar == name)?;
        Some(Grammar {
            name: name.to_owned(),
            keywords: keywords.iter().map(|k| (*k).to_owned()).collect(),
            line_comment: line.map(str::to_owned),
            block_comment: block.map(|(open, close)| (open.to_owned(), close.to_owned())),
            quotes: quotes.chars().collect(),
        })
    }
}

impl GrammarSource for BuiltinGrammars {
    fn fetch(&self, name: &str) -> GrammarFuture {
        let result = Self::get(name).ok_or_else(|| CapabilityError::UnknownGrammar(name.to_owned()));
        Box::pin(async move { result })
    }
}

/// `<dir>/<name>.toml`, then the built-in table.
#[derive(Debug, Clone, Default)]
pub struct DirGrammars {
    dir: Option<PathBuf>,
}

impl DirGrammars {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }
}

impl GrammarSource for DirGrammars {
    fn fetch(&self, name: &str) -> GrammarFuture {
        let name = name.to_owned();
        let path = self.dir.as_ref().map(|dir| dir.join(format!("{name}.toml")));

        Box::pin(async move {
            let Some(path) = path else {
                return BuiltinGrammars.fetch(&name).await;
            };

            match tokio::fs::read_to_string(&path).await {
                Ok(content) => {
                    let file: GrammarFile = toml::from_str(&content)
                        .map_err(|err| CapabilityError::GrammarToml(path, err))?;
                    Ok(file.into_grammar(&name))
                }
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                    BuiltinGrammars.fetch(&name).await
                }
                Err(err) => Err(CapabilityError::GrammarIo(path, err)),
            }
        })
    }
}

// ============================================================================
// loading
// ============================================================================

/// Grammars that loaded, by name.
#[derive(Debug, Clone, Default)]
pub struct GrammarSet {
    grammars: FxHashMap<String, Arc<Grammar>>,
}

impl GrammarSet {
    pub fn len(&self) -> usize {
        self.grammars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grammars.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.grammars.contains_key(name)
    }

    /// Grammar for a Notion language label such as `"C++"` or `"Shell"`.
    pub fn for_language(&self, language: &str) -> Option<&Grammar> {
        let key = language_key(language);
        self.grammars.get(key.as_str()).map(Arc::as_ref)
    }

    fn insert(&mut self, grammar: Grammar) {
        self.grammars.insert(grammar.name.clone(), Arc::new(grammar));
    }
}

/// Fetch every grammar concurrently.
///
/// Each fetch is its own task. A failure is logged and only drops that
/// grammar.
pub async fn load_grammars(names: &[String], source: Arc<dyn GrammarSource>) -> GrammarSet {
    let mut tasks = JoinSet::new();
    for name in names {
        let name = name.clone();
        let source = Arc::clone(&source);
        tasks.spawn(async move {
            let result = source.fetch(&name).await;
            (name, result)
        });
    }

    let mut set = GrammarSet::default();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, Ok(grammar))) => set.insert(grammar),
            Ok((name, Err(err))) => log!("code"; "grammar `{}` skipped: {}", name, err),
            Err(err) => log!("code"; "grammar task aborted: {}", err),
        }
    }

    debug!("code"; "{}/{} grammars loaded", set.len(), names.len());
    set
}

/// Grammar name for a Notion language label.
fn language_key(language: &str) -> String {
    let lower = language.trim().to_ascii_lowercase();
    match lower.as_str() {
        "shell" | "sh" | "zsh" => "bash",
        "c++" => "cpp",
        "c#" => "csharp",
        "objective-c" => "objectivec",
        "javascript" | "typescript" | "js" | "ts" | "jsx" | "tsx" => "js-templates",
        "html" | "xml" | "svg" => "markup",
        "dockerfile" => "docker",
        "yml" => "yaml",
        "webassembly" => "wasm",
        "md" => "markdown",
        other => return other.to_owned(),
    }
    .to_owned()
}

type BuiltinEntry = (
    &'static str,
    &'static [&'static str],
    Option<&'static str>,
    Option<(&'static str, &'static str)>,
    &'static str,
);

const C_BLOCK: Option<(&str, &str)> = Some(("/*", "*/"));

static BUILTIN: &[BuiltinEntry] = &[
    ("markup-templating", &[], None, Some(("{{!--", "--}}")), "\"'"),
    ("markup", &[], None, Some(("<!--", "-->")), "\"'"),
    (
        "bash",
        &["if", "then", "else", "elif", "fi", "for", "while", "do", "done", "case", "esac", "function", "in", "export", "local", "return"],
        Some("#"),
        None,
        "\"'",
    ),
    (
        "c",
        &["if", "else", "for", "while", "do", "switch", "case", "break", "continue", "return", "struct", "typedef", "enum", "union", "const", "static", "void", "int", "char", "float", "double", "sizeof"],
        Some("//"),
        C_BLOCK,
        "\"'",
    ),
    (
        "cpp",
        &["if", "else", "for", "while", "switch", "case", "return", "class", "struct", "namespace", "template", "typename", "public", "private", "protected", "virtual", "const", "auto", "new", "delete", "using", "nullptr"],
        Some("//"),
        C_BLOCK,
        "\"'",
    ),
    (
        "csharp",
        &["if", "else", "for", "foreach", "while", "switch", "case", "return", "class", "struct", "interface", "namespace", "using", "public", "private", "static", "void", "var", "new", "async", "await"],
        Some("//"),
        C_BLOCK,
        "\"'",
    ),
    (
        "docker",
        &["FROM", "RUN", "CMD", "COPY", "ADD", "ENV", "ARG", "WORKDIR", "EXPOSE", "ENTRYPOINT", "VOLUME", "USER", "LABEL"],
        Some("#"),
        None,
        "\"'",
    ),
    (
        "java",
        &["if", "else", "for", "while", "switch", "case", "return", "class", "interface", "extends", "implements", "public", "private", "protected", "static", "final", "void", "new", "import", "package"],
        Some("//"),
        C_BLOCK,
        "\"'",
    ),
    (
        "js-templates",
        &["if", "else", "for", "while", "switch", "case", "return", "function", "const", "let", "var", "class", "extends", "new", "import", "export", "from", "async", "await", "typeof"],
        Some("//"),
        C_BLOCK,
        "\"'`",
    ),
    (
        "coffeescript",
        &["if", "else", "unless", "then", "for", "in", "of", "while", "return", "class", "extends", "new", "and", "or", "not", "is", "isnt"],
        Some("#"),
        Some(("###", "###")),
        "\"'",
    ),
    ("diff", &[], None, None, ""),
    ("git", &[], Some("#"), None, "\"'"),
    (
        "go",
        &["if", "else", "for", "range", "switch", "case", "return", "func", "type", "struct", "interface", "package", "import", "var", "const", "go", "defer", "chan", "map", "select"],
        Some("//"),
        C_BLOCK,
        "\"'`",
    ),
    (
        "graphql",
        &["query", "mutation", "subscription", "fragment", "on", "type", "input", "enum", "schema", "interface", "union", "scalar", "extend", "directive"],
        Some("#"),
        None,
        "\"",
    ),
    ("handlebars", &["if", "else", "each", "with", "unless", "lookup", "log"], None, Some(("{{!", "}}")), "\"'"),
    ("less", &["when", "and", "not", "important"], Some("//"), C_BLOCK, "\"'"),
    ("makefile", &["ifeq", "ifneq", "ifdef", "ifndef", "else", "endif", "include", "define", "endef", "export"], Some("#"), None, "\"'"),
    ("markdown", &[], None, Some(("<!--", "-->")), ""),
    (
        "objectivec",
        &["if", "else", "for", "while", "return", "self", "super", "nil", "YES", "NO", "id", "void", "@interface", "@implementation", "@end", "@property"],
        Some("//"),
        C_BLOCK,
        "\"'",
    ),
    (
        "ocaml",
        &["let", "in", "rec", "match", "with", "fun", "function", "if", "then", "else", "type", "of", "module", "struct", "sig", "end", "open"],
        None,
        Some(("(*", "*)")),
        "\"",
    ),
    (
        "python",
        &["def", "class", "if", "elif", "else", "for", "while", "return", "import", "from", "as", "with", "try", "except", "finally", "raise", "lambda", "yield", "async", "await", "None", "True", "False"],
        Some("#"),
        None,
        "\"'",
    ),
    (
        "reason",
        &["let", "rec", "switch", "if", "else", "type", "module", "open", "fun", "and", "mutable", "external"],
        Some("//"),
        C_BLOCK,
        "\"",
    ),
    (
        "rust",
        &["as", "async", "await", "const", "crate", "else", "enum", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "trait", "type", "unsafe", "use", "where", "while"],
        Some("//"),
        C_BLOCK,
        "\"",
    ),
    ("sass", &["@mixin", "@include", "@extend", "@import", "@if", "@else", "@each", "@for"], Some("//"), None, "\"'"),
    ("scss", &["@mixin", "@include", "@extend", "@import", "@use", "@if", "@else", "@each", "@for", "@function", "@return"], Some("//"), C_BLOCK, "\"'"),
    (
        "solidity",
        &["contract", "function", "modifier", "event", "struct", "mapping", "address", "uint", "public", "private", "external", "internal", "view", "pure", "payable", "returns", "return", "require", "emit"],
        Some("//"),
        C_BLOCK,
        "\"'",
    ),
    (
        "sql",
        &["SELECT", "FROM", "WHERE", "INSERT", "INTO", "UPDATE", "DELETE", "JOIN", "LEFT", "INNER", "ON", "GROUP", "BY", "ORDER", "HAVING", "LIMIT", "CREATE", "TABLE", "AND", "OR", "NOT", "NULL", "AS"],
        Some("--"),
        C_BLOCK,
        "'\"",
    ),
    ("stylus", &["if", "else", "unless", "for", "in", "return", "@import", "@media"], Some("//"), C_BLOCK, "\"'"),
    (
        "swift",
        &["func", "let", "var", "if", "else", "guard", "for", "in", "while", "switch", "case", "return", "class", "struct", "enum", "protocol", "extension", "import", "self", "nil"],
        Some("//"),
        C_BLOCK,
        "\"",
    ),
    (
        "wasm",
        &["module", "func", "param", "result", "local", "global", "memory", "table", "export", "import", "call", "block", "loop", "br", "br_if", "end"],
        Some(";;"),
        Some(("(;", ";)")),
        "\"",
    ),
    ("yaml", &["true", "false", "null", "yes", "no"], Some("#"), None, "\"'"),
];
