//! Obfuscation rule vocabulary.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("Rule name must not be empty")]
    EmptyName,

    #[error("Invalid pattern for rule '{name}': {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },
}

/// A named text pattern with its plain-language explanation.
#[derive(Debug, Clone)]
pub struct ObfuscationRule {
    name: String,
    matcher: Regex,
    explanation: String,
    example: String,
}

impl ObfuscationRule {
    /// Build a rule, compiling `pattern` with the `regex` crate syntax.
    pub fn new(
        name: impl Into<String>,
        pattern: &str,
        explanation: impl Into<String>,
        example: impl Into<String>,
    ) -> Result<Self, RuleError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RuleError::EmptyName);
        }
        let matcher = Regex::new(pattern).map_err(|source| RuleError::InvalidPattern {
            name: name.clone(),
            source,
        })?;
        Ok(Self {
            name,
            matcher,
            explanation: explanation.into(),
            example: example.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn matcher(&self) -> &Regex {
        &self.matcher
    }

    /// Source text of the compiled pattern.
    pub fn pattern(&self) -> &str {
        self.matcher.as_str()
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    pub fn example(&self) -> &str {
        &self.example
    }
}

/// An ordered, immutable collection of rules. Order is reporting order.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<ObfuscationRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<ObfuscationRule>) -> Self {
        Self { rules }
    }

    /// The nine built-in rules, compiled once per process.
    pub fn builtin() -> &'static RuleSet {
        &BUILTIN
    }

    /// A copy of this set with `custom` appended after the existing rules.
    pub fn extended(&self, custom: impl IntoIterator<Item = ObfuscationRule>) -> RuleSet {
        let mut rules = self.rules.clone();
        rules.extend(custom);
        RuleSet { rules }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ObfuscationRule> {
        self.rules.iter()
    }

    pub fn get(&self, name: &str) -> Option<&ObfuscationRule> {
        self.rules.iter().find(|r| r.name == name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a ObfuscationRule;
    type IntoIter = std::slice::Iter<'a, ObfuscationRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

struct Builtin {
    name: &'static str,
    pattern: &'static str,
    explanation: &'static str,
    example: &'static str,
}

const BUILTINS: &[Builtin] = &[
    Builtin {
        name: "String Array",
        pattern: r#"var\s+(_0x[a-f0-9]+|[a-z]{1,2})\s*=\s*\[(['"][^'"]*['"],?\s*)+\]"#,
        explanation: "This is a string array used to hide text values. The developer stored all the text in an array and uses numbers to access them instead of writing the text directly in the code. This makes the code harder to read but doesn't change what it does.",
        example: "var _0x1a2b = ['hello', 'world']; // Later uses _0x1a2b[0] instead of 'hello'",
    },
    Builtin {
        name: "Hexadecimal Numbers",
        // Word boundary keeps `_0x1a2b` identifiers out.
        pattern: r"(?i)\b0x[a-f0-9]{1,4}",
        explanation: "These strange-looking numbers starting with '0x' are called hexadecimal numbers. They're just regular numbers written in a different format that computers understand. Developers use them to make code harder to read.",
        example: "0x1A is the same as the number 26 in regular counting",
    },
    Builtin {
        name: "Meaningless Variable Names",
        // String-literal arrays belong to "String Array"; other arrays stay.
        pattern: r#"var\s+(_0x[a-f0-9]+|[a-z]{1,2})\s*=\s*([^\s\[]|\[\s*[^\s'"])"#,
        explanation: "The code uses short, meaningless variable names like '_0x123abc' or single letters. Normal code uses descriptive names like 'userName' or 'totalPrice'. These random names make it hard to understand what the variables are used for.",
        example: "var _0x1a2b = 'username'; // Instead of var userName = 'username';",
    },
    Builtin {
        name: "String Concatenation",
        pattern: r#"('[^'"]*'|"[^'"]*")\s*\+\s*('[^'"]*'|"[^'"]*")"#,
        explanation: "The code breaks text into smaller pieces and joins them together with '+' signs. This is done to hide the complete text and make it harder to search for specific phrases in the code.",
        example: "'He' + 'llo' is the same as 'Hello'",
    },
    Builtin {
        name: "Eval Function",
        pattern: r"eval\s*\(",
        explanation: "The 'eval' function is a powerful but dangerous JavaScript feature that runs code contained in text. Obfuscated code often uses eval to hide its real purpose until it runs. Security experts consider eval to be risky because it can execute hidden, malicious code.",
        example: r#"eval('alert("Hello")') runs the code alert("Hello")"#,
    },
    Builtin {
        name: "Self-Executing Function",
        pattern: r"^\(function\s*\([^)]*\)\s*\{",
        explanation: "This code is wrapped in what's called a 'self-executing function' - a function that runs immediately when the page loads. This technique hides the code's variables from the rest of the program and makes it harder to understand how it connects to other code.",
        example: "(function() { alert('Hi'); })() runs immediately when loaded",
    },
    Builtin {
        name: "String.fromCharCode",
        pattern: r"String\.fromCharCode\(",
        explanation: "String.fromCharCode converts numbers into text characters. Obfuscated code often uses this to hide text by storing it as numbers instead of readable text. Each number represents a single letter or symbol.",
        example: "String.fromCharCode(72, 105) creates the text 'Hi'",
    },
    Builtin {
        name: "Encoded Unicode",
        pattern: r"(?i)\\x[0-9a-f]{2}",
        explanation: r"These strange codes like \x41 are called 'escape sequences' and represent text characters. Developers use them to hide readable text in the code. Each code represents a single letter or symbol.",
        example: r"\x48\x69 is the same as 'Hi'",
    },
    Builtin {
        name: "Array Access with Bracket Notation",
        pattern: r#"\[['"][A-Za-z0-9_]+['"]\]"#,
        explanation: "The code uses brackets with text inside ['property'] to access object properties instead of the simpler dot notation (object.property). This makes the code harder to read but doesn't change what it does.",
        example: "user['name'] is the same as user.name",
    },
];

static BUILTIN: LazyLock<RuleSet> = LazyLock::new(|| {
    RuleSet::new(
        BUILTINS
            .iter()
            .map(|b| {
                ObfuscationRule::new(b.name, b.pattern, b.explanation, b.example)
                    .expect("valid regex literal")
            })
            .collect(),
    )
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_nine_rules_in_declared_order() {
        let names: Vec<&str> = RuleSet::builtin().iter().map(|r| r.name()).collect();
        assert_eq!(
            names,
            [
                "String Array",
                "Hexadecimal Numbers",
                "Meaningless Variable Names",
                "String Concatenation",
                "Eval Function",
                "Self-Executing Function",
                "String.fromCharCode",
                "Encoded Unicode",
                "Array Access with Bracket Notation",
            ]
        );
    }

    #[test]
    fn invalid_pattern_is_rejected_with_rule_name() {
        let err = ObfuscationRule::new("Broken", "(unclosed", "x", "y").unwrap_err();
        match &err {
            RuleError::InvalidPattern { name, .. } => assert_eq!(name, "Broken"),
            other => panic!("unexpected error {other:?}"),
        }
        assert!(err.to_string().starts_with("Invalid pattern for rule 'Broken'"));
    }

    #[test]
    fn blank_name_is_rejected() {
        assert!(matches!(
            ObfuscationRule::new("  ", "x", "", ""),
            Err(RuleError::EmptyName)
        ));
    }

    #[test]
    fn extended_appends_after_builtins() {
        let atob = ObfuscationRule::new("Atob Decoding", r"atob\s*\(", "decodes base64", "atob('SGk=')")
            .unwrap();
        let set = RuleSet::builtin().extended([atob]);
        assert_eq!(set.len(), 10);
        assert_eq!(set.iter().last().unwrap().name(), "Atob Decoding");
        assert_eq!(RuleSet::builtin().len(), 9);
    }

    #[test]
    fn lookup_by_name() {
        let rule = RuleSet::builtin().get("Eval Function").unwrap();
        assert_eq!(rule.pattern(), r"eval\s*\(");
        assert!(RuleSet::builtin().get("Nope").is_none());
    }
}
