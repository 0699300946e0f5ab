//! Guarded-command generation for the progressive disclosure protocol.
//!
//! One `INPUT_<x>` module per party draws inputs uniformly and hands each
//! value to `OUTPUT` over the `<x>_<v>` label. `OUTPUT` records the value in
//! `<x>_seen`, clears `ready` and then discloses exactly one output before
//! setting `ready` again. The first output of a round follows the party's
//! marginal; every later one is conditioned on the inputs and outputs already
//! revealed, with the remaining parties summed out.

use qgrady_ir::naming;
use qgrady_ir::radix;
use qgrady_ir::DistributionTable;
use qgrady_prob::{normalised_prob, reduced_prob};
use tracing::debug;

use crate::automaton::*;
use crate::subsets;
use crate::CodegenError;

/// Subset masks are `u64`.
pub const MAX_PARTIES: usize = 63;

/// Build the model for a validated table.
pub fn generate_automaton(table: &DistributionTable) -> Result<Automaton, CodegenError> {
    check_preconditions(table)?;

    let mut modules: Vec<Module> = (0..table.party_count())
        .map(|party| input_module(table, party))
        .collect();
    modules.push(output_module(table)?);

    Ok(Automaton {
        model_type: ModelType::Dtmc,
        modules,
    })
}

fn check_preconditions(table: &DistributionTable) -> Result<(), CodegenError> {
    let violation = |reason: String| -> Result<(), CodegenError> {
        Err(CodegenError::PreconditionViolation(reason))
    };
    let parties = table.party_count();
    if table.outputs().len() != parties {
        return violation(format!(
            "{parties} inputs but {} outputs",
            table.outputs().len()
        ));
    }
    if parties == 0 {
        return violation("no parties".into());
    }
    if parties > MAX_PARTIES {
        return violation(format!(
            "{parties} parties exceed the supported maximum of {MAX_PARTIES}"
        ));
    }
    if table.input_range() == 0 || table.output_range() == 0 {
        return violation("empty input or output range".into());
    }
    let rows = radix::tuple_count(table.input_range(), parties);
    let columns = radix::tuple_count(table.output_range(), parties);
    let shaped = match (rows, columns) {
        (Some(rows), Some(columns)) => {
            table.matrix().len() == rows && table.matrix().iter().all(|r| r.len() == columns)
        }
        _ => false,
    };
    if !shaped {
        return violation("probability matrix does not match the declared ranges".into());
    }
    Ok(())
}

fn range_variable(name: impl Into<String>, range: usize) -> Variable {
    Variable {
        name: name.into(),
        domain: Domain::Range {
            low: -1,
            high: i64::try_from(range).unwrap_or(i64::MAX) - 1,
        },
        init: UNSET,
    }
}

fn input_module(table: &DistributionTable, party: usize) -> Module {
    let input = &table.inputs()[party];
    let range = table.input_range();

    let coin_toss = Command {
        key: CommandKey::new(CommandFamily::CoinToss, party, 0),
        label: None,
        guard: vec![atom(input, UNSET)],
        branches: (0..range)
            .map(|value| Branch {
                weight: Weight::Ratio {
                    numerator: 1,
                    denominator: range,
                },
                updates: vec![assign(input, int(value))],
            })
            .collect(),
    };

    let consume = (0..range).map(|value| Command {
        key: CommandKey::new(CommandFamily::Consume, party, value),
        label: Some(naming::sync_label(input, value)),
        guard: vec![atom(input, int(value))],
        branches: vec![Branch {
            weight: Weight::Ratio {
                numerator: 1,
                denominator: 1,
            },
            updates: vec![assign(input, UNSET)],
        }],
    });

    Module {
        name: naming::input_module_name(input),
        variables: vec![range_variable(input, range)],
        commands: std::iter::once(coin_toss).chain(consume).collect(),
    }
}

fn output_module(table: &DistributionTable) -> Result<Module, CodegenError> {
    let mut variables = vec![Variable {
        name: naming::READY_FLAG.to_string(),
        domain: Domain::Bool,
        init: Value::Bool(true),
    }];
    variables.extend(
        table
            .outputs()
            .iter()
            .map(|output| range_variable(output, table.output_range())),
    );
    variables.extend(
        table
            .inputs()
            .iter()
            .map(|input| range_variable(naming::seen_variable(input), table.input_range())),
    );

    let mut commands = input_sync_commands(table);
    debug!(count = commands.len(), "input-sync commands generated");
    let reduced = reduced_commands(table)?;
    debug!(count = reduced.len(), "reduced-probability commands generated");
    commands.extend(reduced);
    let normalised = normalised_commands(table)?;
    debug!(count = normalised.len(), "normalised-probability commands generated");
    commands.extend(normalised);
    commands.sort_by_key(|command| command.key);

    Ok(Module {
        name: naming::OUTPUT_MODULE.to_string(),
        variables,
        commands,
    })
}

fn input_sync_commands(table: &DistributionTable) -> Vec<Command> {
    let mut commands = Vec::new();
    for (party, input) in table.inputs().iter().enumerate() {
        let seen = naming::seen_variable(input);
        for value in 0..table.input_range() {
            commands.push(Command {
                key: CommandKey::new(CommandFamily::InputSync, party, value),
                label: Some(naming::sync_label(input, value)),
                guard: vec![
                    atom(naming::READY_FLAG, Value::Bool(true)),
                    atom(input, int(value)),
                    atom(seen.as_str(), UNSET),
                ],
                branches: vec![Branch {
                    weight: Weight::Ratio {
                        numerator: 1,
                        denominator: 1,
                    },
                    updates: vec![
                        assign(naming::READY_FLAG, Value::Bool(false)),
                        assign(seen.as_str(), int(value)),
                    ],
                }],
            });
        }
    }
    commands
}

/// Branch setting `output := value` and handing control back.
fn disclosure_branch(output: &str, value: usize, probability: f64) -> Branch {
    Branch {
        weight: Weight::Decimal(probability),
        updates: vec![
            assign(output, int(value)),
            assign(naming::READY_FLAG, Value::Bool(true)),
        ],
    }
}

fn reduced_commands(table: &DistributionTable) -> Result<Vec<Command>, CodegenError> {
    let parties = table.party_count();
    let mut commands = Vec::new();
    for party in 0..parties {
        let seen = naming::seen_variable(&table.inputs()[party]);
        let output = &table.outputs()[party];
        for input in 0..table.input_range() {
            let mut weights = Vec::new();
            for value in 0..table.output_range() {
                let p = reduced_prob(table, party, input, value)?;
                if p > 0.0 {
                    weights.push((value, p));
                }
            }
            if weights.is_empty() {
                continue;
            }
            // Rows only sum to 1 within the validation tolerance.
            let total: f64 = weights.iter().map(|&(_, p)| p).sum();
            let branches = weights
                .into_iter()
                .map(|(value, p)| disclosure_branch(output, value, p / total))
                .collect();

            let mut guard = vec![
                atom(naming::READY_FLAG, Value::Bool(false)),
                atom(seen.as_str(), int(input)),
            ];
            guard.extend(table.outputs().iter().map(|o| atom(o, UNSET)));

            let mut key = CommandKey::new(CommandFamily::Reduced, party, input);
            key.subset_size = parties;
            commands.push(Command {
                key,
                label: None,
                guard,
                branches,
            });
        }
    }
    Ok(commands)
}

fn normalised_commands(table: &DistributionTable) -> Result<Vec<Command>, CodegenError> {
    let parties = table.party_count();
    let mut commands = Vec::new();

    for mask in subsets::proper_subsets(parties) {
        let pending = subsets::members(mask, parties);
        let revealed: Vec<usize> = (0..parties).filter(|p| !pending.contains(p)).collect();
        let revealed_inputs: Vec<Vec<usize>> =
            radix::tuples(table.input_range(), revealed.len()).collect();
        let revealed_outputs: Vec<Vec<usize>> =
            radix::tuples(table.output_range(), revealed.len()).collect();

        for &candidate in &pending {
            // Candidate first, then the other pending parties ascending.
            let order: Vec<usize> = std::iter::once(candidate)
                .chain(pending.iter().copied().filter(|&p| p != candidate))
                .collect();

            for input in 0..table.input_range() {
                for (input_tuple, known_inputs) in revealed_inputs.iter().enumerate() {
                    for (output_tuple, known_outputs) in revealed_outputs.iter().enumerate() {
                        let disclosure = Disclosure {
                            revealed: &revealed,
                            known_inputs,
                            known_outputs,
                            candidate,
                            input,
                        };
                        let branches = disclosure.branches(table, &order)?;
                        if branches.is_empty() {
                            continue;
                        }
                        commands.push(Command {
                            key: CommandKey {
                                family: CommandFamily::Normalised,
                                subset_size: pending.len(),
                                subset_mask: mask,
                                party: candidate,
                                input_value: input,
                                input_tuple,
                                output_tuple,
                            },
                            label: None,
                            guard: disclosure.guard(table),
                            branches,
                        });
                    }
                }
            }
        }
    }
    Ok(commands)
}

/// One committed history: what the revealed parties saw and answered, and
/// the input the candidate is about to answer.
struct Disclosure<'a> {
    revealed: &'a [usize],
    known_inputs: &'a [usize],
    known_outputs: &'a [usize],
    candidate: usize,
    input: usize,
}

impl Disclosure<'_> {
    fn revealed_value(&self, party: usize, values: &[usize]) -> Option<usize> {
        self.revealed
            .iter()
            .position(|&p| p == party)
            .map(|slot| values[slot])
    }

    /// Full input tuple; pending non-candidates are fixed at 0.
    fn full_input(&self, parties: usize) -> Vec<usize> {
        (0..parties)
            .map(|party| {
                if party == self.candidate {
                    self.input
                } else {
                    self.revealed_value(party, self.known_inputs).unwrap_or(0)
                }
            })
            .collect()
    }

    fn full_output(&self, parties: usize, candidate_value: usize) -> Vec<usize> {
        (0..parties)
            .map(|party| {
                if party == self.candidate {
                    candidate_value
                } else {
                    self.revealed_value(party, self.known_outputs).unwrap_or(0)
                }
            })
            .collect()
    }

    fn branches(
        &self,
        table: &DistributionTable,
        order: &[usize],
    ) -> Result<Vec<Branch>, CodegenError> {
        let parties = table.party_count();
        let input = self.full_input(parties);
        let output_name = &table.outputs()[self.candidate];
        let mut branches = Vec::new();
        for value in 0..table.output_range() {
            let output = self.full_output(parties, value);
            let p = normalised_prob(table, &input, &output, order)?;
            if p > 0.0 {
                branches.push(disclosure_branch(output_name, value, p));
            }
        }
        Ok(branches)
    }

    /// `ready = false`, then `_seen` values in party order, then outputs in
    /// party order (revealed values, unset for pending parties).
    fn guard(&self, table: &DistributionTable) -> Vec<Atom> {
        let mut guard = vec![atom(naming::READY_FLAG, Value::Bool(false))];
        for (party, input) in table.inputs().iter().enumerate() {
            let value = if party == self.candidate {
                Some(self.input)
            } else {
                self.revealed_value(party, self.known_inputs)
            };
            if let Some(value) = value {
                guard.push(atom(naming::seen_variable(input), int(value)));
            }
        }
        for (party, output) in table.outputs().iter().enumerate() {
            let value = self
                .revealed_value(party, self.known_outputs)
                .map_or(UNSET, int);
            guard.push(atom(output, value));
        }
        guard
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pr_box() -> DistributionTable {
        DistributionTable::new(
            vec!["x".into(), "y".into()],
            vec!["a".into(), "b".into()],
            2,
            2,
            vec![
                vec![0.5, 0.0, 0.0, 0.5],
                vec![0.5, 0.0, 0.0, 0.5],
                vec![0.5, 0.0, 0.0, 0.5],
                vec![0.0, 0.5, 0.5, 0.0],
            ],
        )
    }

    fn family_count(module: &Module, family: CommandFamily) -> usize {
        module
            .commands
            .iter()
            .filter(|c| c.key.family == family)
            .count()
    }

    #[test]
    fn pr_box_module_layout() {
        let automaton = generate_automaton(&pr_box()).unwrap();
        let names: Vec<&str> = automaton.modules.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["INPUT_x", "INPUT_y", "OUTPUT"]);

        let output = automaton.module("OUTPUT").unwrap();
        let vars: Vec<&str> = output.variables.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(vars, vec!["ready", "a", "b", "x_seen", "y_seen"]);

        assert_eq!(family_count(output, CommandFamily::InputSync), 4);
        assert_eq!(family_count(output, CommandFamily::Reduced), 4);
        // Two singleton pending sets, two candidate inputs, 2 x 2 revealed histories.
        assert_eq!(family_count(output, CommandFamily::Normalised), 16);
    }

    #[test]
    fn input_module_tosses_and_consumes() {
        let automaton = generate_automaton(&pr_box()).unwrap();
        let input = automaton.module("INPUT_x").unwrap();
        assert_eq!(input.commands.len(), 3);
        let toss = &input.commands[0];
        assert_eq!(toss.label, None);
        assert_eq!(toss.branches.len(), 2);
        assert_eq!(
            toss.branches[0].weight,
            Weight::Ratio {
                numerator: 1,
                denominator: 2
            }
        );
        assert_eq!(input.commands[2].label.as_deref(), Some("x_1"));
    }

    #[test]
    fn pr_partner_is_determined() {
        let automaton = generate_automaton(&pr_box()).unwrap();
        let output = automaton.module("OUTPUT").unwrap();
        // y pending, x revealed with x = 1, a = 1, candidate y_seen = 1.
        let command = output
            .commands
            .iter()
            .find(|c| {
                c.key.family == CommandFamily::Normalised
                    && c.key.party == 1
                    && c.key.input_value == 1
                    && c.key.input_tuple == 1
                    && c.key.output_tuple == 1
            })
            .expect("command for x=1, a=1, y=1");
        assert_eq!(command.branches.len(), 1);
        assert_eq!(command.branches[0].weight, Weight::Decimal(1.0));
        assert_eq!(command.branches[0].updates[0], assign("b", Value::Int(0)));

        let guard: Vec<String> = command
            .guard
            .iter()
            .map(|a| format!("{}={}", a.variable, a.value))
            .collect();
        assert_eq!(guard, vec!["ready=false", "x_seen=1", "y_seen=1", "a=1", "b=-1"]);
    }

    #[test]
    fn commands_are_sorted_by_key() {
        let automaton = generate_automaton(&pr_box()).unwrap();
        for module in &automaton.modules {
            assert!(module.commands.windows(2).all(|w| w[0].key <= w[1].key));
        }
    }

    #[test]
    fn impossible_histories_are_skipped() {
        // a = x, b = y.
        let table = DistributionTable::new(
            vec!["x".into(), "y".into()],
            vec!["a".into(), "b".into()],
            2,
            2,
            vec![
                vec![1.0, 0.0, 0.0, 0.0],
                vec![0.0, 1.0, 0.0, 0.0],
                vec![0.0, 0.0, 1.0, 0.0],
                vec![0.0, 0.0, 0.0, 1.0],
            ],
        );
        let automaton = generate_automaton(&table).unwrap();
        let output = automaton.module("OUTPUT").unwrap();
        // Only histories where the revealed output equals the revealed input survive.
        assert_eq!(family_count(output, CommandFamily::Normalised), 8);
        assert_eq!(family_count(output, CommandFamily::Reduced), 4);
        for command in &output.commands {
            assert!(!command.branches.is_empty());
        }
    }

    #[test]
    fn reduced_weights_are_rescaled_to_one() {
        let table = DistributionTable::new(
            vec!["x".into()],
            vec!["a".into()],
            1,
            2,
            vec![vec![0.5, 0.45]],
        );
        let automaton = generate_automaton(&table).unwrap();
        let output = automaton.module("OUTPUT").unwrap();
        let reduced: Vec<&Command> = output
            .commands
            .iter()
            .filter(|c| c.key.family == CommandFamily::Reduced)
            .collect();
        assert_eq!(reduced.len(), 1);
        let weights: Vec<f64> = reduced[0]
            .branches
            .iter()
            .map(|b| match b.weight {
                Weight::Decimal(p) => p,
                other => panic!("unexpected weight {other:?}"),
            })
            .collect();
        assert!((weights[0] - 0.5 / 0.95).abs() < 1e-12);
        assert!((weights.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn unequal_parties_violate_preconditions() {
        let table = DistributionTable::new(
            vec!["x".into(), "y".into()],
            vec!["a".into()],
            2,
            2,
            vec![vec![0.5, 0.5]; 4],
        );
        assert!(matches!(
            generate_automaton(&table),
            Err(CodegenError::PreconditionViolation(_))
        ));
    }

    #[test]
    fn ragged_matrix_violates_preconditions() {
        let mut rows = vec![vec![0.25; 4]; 4];
        rows[2].pop();
        let table = DistributionTable::new(
            vec!["x".into(), "y".into()],
            vec!["a".into(), "b".into()],
            2,
            2,
            rows,
        );
        assert!(matches!(
            generate_automaton(&table),
            Err(CodegenError::PreconditionViolation(_))
        ));
    }
}
