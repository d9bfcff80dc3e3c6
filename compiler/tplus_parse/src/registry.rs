//! Adapter and host-symbol registries consulted during name resolution.
//!
//! The compiler never introspects the host at compile time. Everything it
//! needs to know (which wrapper and loop-helper methods exist, which host
//! functions, classes and constants are defined) is registered up front.

use rustc_hash::{FxHashMap, FxHashSet};

/// Default class of the value-wrapper adapter.
pub const DEFAULT_WRAPPER_CLASS: &str = "TplValWrapper";
/// Default class of the loop-helper adapter.
pub const DEFAULT_LOOP_HELPER_CLASS: &str = "TplLoopHelper";

pub const DEFAULT_WRAPPER_METHODS: &[&str] = &[
    "esc", "nl2br", "toUpper", "toLower", "ucfirst", "substr", "concat",
];
pub const DEFAULT_LOOP_HELPER_METHODS: &[&str] = &["isEven", "isLast"];

/// Host functions known without configuration.
const BUILTIN_FUNCTIONS: &[&str] = &[
    "abs", "array_keys", "array_values", "ceil", "count", "date", "explode",
    "floor", "htmlspecialchars", "implode", "in_array", "is_array", "is_numeric",
    "json_encode", "max", "min", "nl2br", "number_format", "round", "sprintf",
    "str_repeat", "str_replace", "strlen", "strtolower", "strtoupper", "substr",
    "time", "trim", "ucfirst", "urlencode",
];

/// Host constants known without configuration.
const BUILTIN_CONSTANTS: &[&str] = &[
    "DIRECTORY_SEPARATOR",
    "E_ALL",
    "M_PI",
    "PHP_EOL",
    "PHP_INT_MAX",
    "PHP_VERSION",
];

/// Language constructs that look like calls but are not functions.
const CONSTRUCTS: &[&str] = &["isset", "empty"];

/// A named set of callable methods on an adapter class.
///
/// Method lookup is case-insensitive, like host method dispatch.
#[derive(Clone, Debug)]
pub struct MethodRegistry {
    class: String,
    methods: FxHashSet<String>,
}

impl MethodRegistry {
    pub fn new<I, S>(class: &str, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        MethodRegistry {
            class: class.trim_start_matches('\\').to_owned(),
            methods: methods
                .into_iter()
                .map(|m| m.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn value_wrapper() -> Self {
        Self::new(DEFAULT_WRAPPER_CLASS, DEFAULT_WRAPPER_METHODS)
    }

    pub fn loop_helper() -> Self {
        Self::new(DEFAULT_LOOP_HELPER_CLASS, DEFAULT_LOOP_HELPER_METHODS)
    }

    /// Class name without a leading namespace separator.
    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn contains(&self, method: &str) -> bool {
        self.methods.contains(&method.to_lowercase())
    }

    /// Constructor call that opens a wrapped value: `\Class::o(`.
    pub(crate) fn opener(&self) -> String {
        format!("\\{}::o(", self.class)
    }
}

/// Static methods and class constants of one host class.
#[derive(Clone, Debug, Default)]
pub struct ClassInfo {
    methods: FxHashSet<String>,
    constants: FxHashSet<String>,
}

impl ClassInfo {
    pub fn new<M, C>(methods: M, constants: C) -> Self
    where
        M: IntoIterator,
        M::Item: AsRef<str>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        ClassInfo {
            methods: methods
                .into_iter()
                .map(|m| m.as_ref().to_lowercase())
                .collect(),
            constants: constants
                .into_iter()
                .map(|c| c.as_ref().to_owned())
                .collect(),
        }
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains(&name.to_lowercase())
    }

    pub fn has_constant(&self, name: &str) -> bool {
        self.constants.contains(name)
    }
}

/// Host functions, classes and constants.
///
/// Paths are written without a leading `\` and with `\` between namespace
/// segments. Function and class names are case-insensitive, constants are
/// case-sensitive.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    functions: FxHashSet<String>,
    classes: FxHashMap<String, ClassInfo>,
    constants: FxHashSet<String>,
}

impl SymbolTable {
    /// An empty table. Not even `count` resolves.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Table seeded with common host builtins.
    pub fn with_builtins() -> Self {
        let mut table = Self::default();
        for f in BUILTIN_FUNCTIONS {
            table.define_function(f);
        }
        for c in BUILTIN_CONSTANTS {
            table.define_constant(c);
        }
        table.define_class(
            "DateTime",
            ClassInfo::new(["createFromFormat"], ["ATOM", "COOKIE", "RFC2822"]),
        );
        table
    }

    pub fn define_function(&mut self, path: &str) {
        self.functions.insert(function_key(path));
    }

    pub fn define_class(&mut self, path: &str, info: ClassInfo) {
        self.classes.insert(function_key(path), info);
    }

    pub fn define_constant(&mut self, path: &str) {
        self.constants
            .insert(path.trim_start_matches('\\').to_owned());
    }

    pub fn has_function(&self, path: &str) -> bool {
        self.functions.contains(&function_key(path))
    }

    pub fn class(&self, path: &str) -> Option<&ClassInfo> {
        self.classes.get(&function_key(path))
    }

    pub fn has_constant(&self, path: &str) -> bool {
        self.constants.contains(path.trim_start_matches('\\'))
    }

    /// `isset` and `empty` are emitted without a namespace separator.
    pub fn is_construct(name: &str) -> bool {
        CONSTRUCTS.iter().any(|c| c.eq_ignore_ascii_case(name))
    }
}

fn function_key(path: &str) -> String {
    path.trim_start_matches('\\').to_lowercase()
}

/// Everything name resolution may consult.
#[derive(Clone, Debug)]
pub struct Registry {
    pub wrapper: MethodRegistry,
    pub loop_helper: MethodRegistry,
    pub symbols: SymbolTable,
}

impl Default for Registry {
    fn default() -> Self {
        Registry {
            wrapper: MethodRegistry::value_wrapper(),
            loop_helper: MethodRegistry::loop_helper(),
            symbols: SymbolTable::with_builtins(),
        }
    }
}

#[cfg(test)]
mod tests;
