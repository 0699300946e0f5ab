#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(program) = qgrady_dsl::parse(s, "fuzz.qgrady") else {
        return;
    };
    let table = qgrady_ir::lowering::lower(&program);
    // Keep validation and generation bounded.
    if table.party_count() > 3 || table.input_range() > 3 || table.output_range() > 3 {
        return;
    }
    if qgrady_ir::validate(&table).is_err() {
        return;
    }
    // A validated table must always generate.
    qgrady_codegen::generate_prism(&table).expect("validated box failed to generate");
});
