//! Macros for determinism testing.

/// Generates a test that evaluates an expression several times and checks
/// the outputs are byte-identical. The expression must produce something
/// implementing `AsRef<[u8]>`, such as the `json` of a compile result.
///
/// # Example
///
/// ```rust,ignore
/// use notecircuit_spec::Note;
/// use notecircuit_tests::test_determinism;
///
/// test_determinism!(single_note, {
///     notecircuit_backend_circuit::compile(&[Note::new(0, 20, 12)]).unwrap().json
/// });
///
/// test_determinism!(long_note, runs = 5, {
///     notecircuit_backend_circuit::compile(&[Note::new(3000, 5000, 7)]).unwrap().json
/// });
/// ```
#[macro_export]
macro_rules! test_determinism {
    ($name:ident, runs = $runs:expr, $generate:expr) => {
        #[test]
        fn $name() {
            $crate::determinism::assert_deterministic($runs, || $generate);
        }
    };

    ($name:ident, $generate:expr) => {
        $crate::test_determinism!($name, runs = 3, $generate);
    };
}
