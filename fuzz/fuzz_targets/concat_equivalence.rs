#![no_main]

use cordyceps_edit_tree::model::ConcatEquivalenceInput;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: ConcatEquivalenceInput| {
    cordyceps_edit_tree::model::run_concat_equivalence(input);
});
