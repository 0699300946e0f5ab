//! PRISM rendering of an [`Automaton`].
//!
//! Rendering is a pure function of the records, so identical automata give
//! byte-identical text.

use crate::automaton::*;

/// Render the model as PRISM source lines, without trailing newlines.
pub fn render(automaton: &Automaton) -> Vec<String> {
    let mut lines = vec![automaton.model_type.keyword().to_string()];
    for module in &automaton.modules {
        lines.push(String::new());
        render_module(module, &mut lines);
    }
    lines
}

pub fn render_to_string(automaton: &Automaton) -> String {
    let mut out = render(automaton).join("\n");
    out.push('\n');
    out
}

fn render_module(module: &Module, lines: &mut Vec<String>) {
    lines.push(format!("module {}", module.name));
    for variable in &module.variables {
        lines.push(format!("\t{}", render_variable(variable)));
    }

    let mut previous: Option<CommandFamily> = None;
    for command in &module.commands {
        // Blank line between command groups.
        if previous != Some(command.key.family) {
            lines.push(String::new());
            previous = Some(command.key.family);
        }
        lines.push(format!("\t{}", render_command(command)));
    }
    lines.push("endmodule".to_string());
}

fn render_variable(variable: &Variable) -> String {
    match variable.domain {
        Domain::Range { low, high } => format!(
            "{} : [{low}..{high}] init {};",
            variable.name, variable.init
        ),
        Domain::Bool => format!("{} : bool init {};", variable.name, variable.init),
    }
}

fn render_command(command: &Command) -> String {
    let label = command.label.as_deref().unwrap_or("");
    format!(
        "[{label}] {} -> {};",
        render_guard(&command.guard),
        render_branches(&command.branches)
    )
}

fn render_guard(guard: &[Atom]) -> String {
    if guard.is_empty() {
        return "true".to_string();
    }
    guard
        .iter()
        .map(|a| format!("({} = {})", a.variable, a.value))
        .collect::<Vec<_>>()
        .join(" & ")
}

fn render_updates(updates: &[Assignment]) -> String {
    if updates.is_empty() {
        return "true".to_string();
    }
    updates
        .iter()
        .map(|u| format!("({}' = {})", u.variable, u.value))
        .collect::<Vec<_>>()
        .join(" & ")
}

fn render_branches(branches: &[Branch]) -> String {
    if let [only] = branches {
        if only.weight.is_certain() {
            return render_updates(&only.updates);
        }
    }
    branches
        .iter()
        .map(|b| format!("{} : {}", render_weight(b.weight), render_updates(&b.updates)))
        .collect::<Vec<_>>()
        .join(" + ")
}

/// Ratios stay exact; decimals use the shortest text that round-trips.
pub fn render_weight(weight: Weight) -> String {
    match weight {
        Weight::Ratio {
            numerator,
            denominator,
        } => format!("{numerator}/{denominator}"),
        Weight::Decimal(p) => format!("{p}"),
    }
}
