#[test]
fn skc_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/skc_error_pass.rs");
    t.pass("tests/ui/skc_error_cfg_variant.rs");
}
