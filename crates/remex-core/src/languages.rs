//! Language catalog handling: filtering, defaults, and starter snippets.
//!
//! The judge service owns the language table; this module only filters and
//! selects from it. Names in the catalog look like `"Python (3.8.1)"` or
//! `"Java Test (OpenJDK 14.0.1, JUnit ...)"`, so matching works on the
//! normalized head of the name (the part before the first parenthesis),
//! checked against ordered, non-overlapping prefix rules. Free-text
//! substring matching is deliberately avoided: "javascript" must never be
//! mistaken for "java", nor "c#" for "c".

use crate::core_types::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageKind {
    Python,
    Java,
    Cpp,
    C,
    CSharp,
    JavaScript,
    TypeScript,
    Go,
    Ruby,
    Php,
    Swift,
    Kotlin,
    Scala,
    Rust,
    Perl,
    Haskell,
    Lua,
    R,
    Bash,
    Fortran,
    VisualBasic,
    FSharp,
    Nim,
}

/// Ordered matching rules. More specific prefixes come first so that the
/// overlapping ones ("javascript" vs "java", "c++"/"c#" vs "c") cannot
/// shadow each other.
const RULES: &[(&str, LanguageKind)] = &[
    ("javascript", LanguageKind::JavaScript),
    ("node.js", LanguageKind::JavaScript),
    ("typescript", LanguageKind::TypeScript),
    ("python", LanguageKind::Python),
    ("java", LanguageKind::Java),
    ("c++", LanguageKind::Cpp),
    ("c#", LanguageKind::CSharp),
    ("visual basic", LanguageKind::VisualBasic),
    ("vb.net", LanguageKind::VisualBasic),
    ("f#", LanguageKind::FSharp),
    ("fortran", LanguageKind::Fortran),
    ("go", LanguageKind::Go),
    ("ruby", LanguageKind::Ruby),
    ("php", LanguageKind::Php),
    ("swift", LanguageKind::Swift),
    ("kotlin", LanguageKind::Kotlin),
    ("scala", LanguageKind::Scala),
    ("rust", LanguageKind::Rust),
    ("perl", LanguageKind::Perl),
    ("haskell", LanguageKind::Haskell),
    ("lua", LanguageKind::Lua),
    ("bash", LanguageKind::Bash),
    ("nim", LanguageKind::Nim),
    ("r", LanguageKind::R),
    ("c", LanguageKind::C),
];

/// Classify a catalog language name into a known kind.
///
/// The name head is lowercased and matched against `RULES`; a rule matches
/// only on the full head or at a word boundary, never mid-token.
pub fn classify_name(name: &str) -> Option<LanguageKind> {
    let head = name
        .split('(')
        .next()
        .unwrap_or(name)
        .trim()
        .to_ascii_lowercase();
    for (prefix, kind) in RULES {
        if let Some(rest) = head.strip_prefix(prefix) {
            if rest.is_empty() || rest.starts_with(' ') {
                return Some(*kind);
            }
        }
    }
    None
}

/// Keep the languages the runner supports: Python (excluding MPI builds),
/// Java, C++ and C.
pub fn filter_catalog(catalog: &[Language]) -> Vec<Language> {
    catalog
        .iter()
        .filter(|lang| match classify_name(&lang.name) {
            Some(LanguageKind::Python) => !lang.name.to_ascii_lowercase().contains("mpi"),
            Some(LanguageKind::Java | LanguageKind::Cpp | LanguageKind::C) => true,
            _ => false,
        })
        .cloned()
        .collect()
}

/// Preferred default from a filtered catalog: Python 3.10 when available,
/// otherwise the first entry.
pub fn default_language(catalog: &[Language]) -> Option<&Language> {
    catalog
        .iter()
        .find(|lang| lang.name.to_ascii_lowercase().contains("python 3.10"))
        .or_else(|| catalog.first())
}

/// Resolve a user-supplied language query to a catalog entry: exact name
/// match first, then by classified kind, then a plain containment fallback.
pub fn select_language<'a>(catalog: &'a [Language], query: &str) -> Option<&'a Language> {
    let query = query.trim();
    if let Some(exact) = catalog.iter().find(|l| l.name.eq_ignore_ascii_case(query)) {
        return Some(exact);
    }
    if let Some(kind) = classify_name(query) {
        if let Some(by_kind) = catalog.iter().find(|l| classify_name(&l.name) == Some(kind)) {
            return Some(by_kind);
        }
    }
    let lowered = query.to_ascii_lowercase();
    catalog
        .iter()
        .find(|l| l.name.to_ascii_lowercase().contains(&lowered))
}

/// The add(1, 2) starter program shown when a language is first selected.
pub fn starter_snippet(kind: LanguageKind) -> &'static str {
    match kind {
        LanguageKind::Python => "def add(a, b):\n    return a + b\n\nprint(add(1, 2))",
        LanguageKind::Java => "public class Main {\n    public static void main(String[] args) {\n        System.out.println(add(1, 2));\n    }\n    public static int add(int a, int b) {\n        return a + b;\n    }\n}",
        LanguageKind::Cpp => "#include <iostream>\nusing namespace std;\nint add(int a, int b) { return a + b; }\nint main() { cout << add(1, 2) << endl; return 0; }",
        LanguageKind::C => "#include <stdio.h>\n\nint add(int a, int b) { return a + b; }\nint main() { printf(\"%d\\n\", add(1, 2)); return 0; }",
        LanguageKind::CSharp => "using System;\nclass Program {\n    static int Add(int a, int b) { return a + b; }\n    static void Main() { Console.WriteLine(Add(1, 2)); }\n}",
        LanguageKind::JavaScript => "function add(a, b) { return a + b; }\nconsole.log(add(1, 2));",
        LanguageKind::TypeScript => "function add(a: number, b: number): number { return a + b; }\nconsole.log(add(1, 2));",
        LanguageKind::Go => "package main\nimport \"fmt\"\nfunc add(a, b int) int { return a + b }\nfunc main() { fmt.Println(add(1, 2)) }",
        LanguageKind::Ruby => "def add(a, b)\n  a + b\nend\nputs add(1, 2)",
        LanguageKind::Php => "<?php\nfunction add($a, $b) { return $a + $b; }\necho add(1, 2);",
        LanguageKind::Swift => "func add(_ a: Int, _ b: Int) -> Int { return a + b }\nprint(add(1, 2))",
        LanguageKind::Kotlin => "fun add(a: Int, b: Int): Int = a + b\nfun main() { println(add(1, 2)) }",
        LanguageKind::Scala => "def add(a: Int, b: Int): Int = a + b\nprintln(add(1, 2))",
        LanguageKind::Rust => "fn add(a: i32, b: i32) -> i32 { a + b }\nfn main() { println!(\"{}\", add(1, 2)); }",
        LanguageKind::Perl => "sub add { $_[0] + $_[1] }\nprint add(1, 2), \"\\n\";",
        LanguageKind::Haskell => "add a b = a + b\nmain = print (add 1 2)",
        LanguageKind::Lua => "function add(a, b) return a + b end\nprint(add(1, 2))",
        LanguageKind::R => "add <- function(a, b) { a + b }\ncat(add(1, 2), \"\\n\")",
        LanguageKind::Bash => "echo $((1 + 2))",
        LanguageKind::Fortran => "program add\n  print *, 1 + 2\nend program add",
        LanguageKind::VisualBasic => "Module Module1\n    Function Add(a As Integer, b As Integer) As Integer\n        Return a + b\n    End Function\n    Sub Main()\n        Console.WriteLine(Add(1, 2))\n    End Sub\nEnd Module",
        LanguageKind::FSharp => "let add a b = a + b\nprintfn \"%d\" (add 1 2)",
        LanguageKind::Nim => "proc add(a, b: int): int = a + b\necho add(1, 2)",
    }
}
