//! Identifier rules shared by the validator and the PRISM generator.

/// Reserved words of the PRISM modelling language.
pub const PRISM_KEYWORDS: &[&str] = &[
    "A",
    "bool",
    "clock",
    "const",
    "ctmc",
    "C",
    "double",
    "dtmc",
    "E",
    "endinit",
    "endinvariant",
    "endmodule",
    "endobservables",
    "endrewards",
    "endsystem",
    "false",
    "formula",
    "filter",
    "func",
    "F",
    "global",
    "G",
    "init",
    "invariant",
    "I",
    "int",
    "label",
    "max",
    "mdp",
    "min",
    "module",
    "X",
    "nondeterministic",
    "observable",
    "observables",
    "of",
    "Pmax",
    "Pmin",
    "P",
    "pomdp",
    "popta",
    "probabilistic",
    "prob",
    "pta",
    "rate",
    "rewards",
    "Rmax",
    "Rmin",
    "R",
    "S",
    "stochastic",
    "system",
    "true",
    "U",
    "W",
];

/// Flag in the output module that is true while no disclosure is pending.
pub const READY_FLAG: &str = "ready";

pub const OUTPUT_MODULE: &str = "OUTPUT";

pub fn is_reserved_keyword(name: &str) -> bool {
    PRISM_KEYWORDS.contains(&name)
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Output-module copy of the value consumed from `input`.
pub fn seen_variable(input: &str) -> String {
    format!("{input}_seen")
}

pub fn input_module_name(input: &str) -> String {
    format!("INPUT_{input}")
}

/// Synchronisation label shared by the consume and input-sync commands.
pub fn sync_label(input: &str, value: usize) -> String {
    format!("{input}_{value}")
}

/// Whether `name` is one of the identifiers the generated model introduces
/// for these inputs: the ready flag, module names, `_seen` copies or sync
/// labels.
pub fn is_generated(name: &str, inputs: &[String], input_range: usize) -> bool {
    if name == READY_FLAG || name == OUTPUT_MODULE {
        return true;
    }
    inputs.iter().any(|input| {
        name == input_module_name(input)
            || name == seen_variable(input)
            || name
                .strip_prefix(input.as_str())
                .and_then(|rest| rest.strip_prefix('_'))
                .and_then(|digits| digits.parse::<usize>().ok())
                .is_some_and(|value| value < input_range && sync_label(input, value) == name)
    })
}
