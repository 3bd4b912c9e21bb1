//! Fuzzing target for formula compilation
//!
//! Arbitrary text must either compile or return a `FormulaError`, and a
//! compiled formula must evaluate without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use unitconv_core::Expression;

fuzz_target!(|data: &[u8]| {
    let Ok(formula) = std::str::from_utf8(data) else {
        return;
    };

    match Expression::compile(formula) {
        Ok(expression) => {
            for magnitude in [0.0, -1.0, 1.0, 2.54, 1e300, -1e-300, f64::MAX] {
                let _ = expression.evaluate(magnitude);
            }
            // Compiled formulas keep their source verbatim
            assert_eq!(expression.source(), formula);
        }
        Err(error) => {
            let _ = error.detailed_message(formula);
        }
    }
});
