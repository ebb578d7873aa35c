//! End-to-end tests: cell table in, payloads out

use std::io::Write;

use pretty_assertions::assert_eq;
use xlm_fill::prelude::*;
use xlm_fill::{CsvError, FORMULA_PREFIX};

const SCENARIO: &str = "\
Cell,Formula,Value
A1,\"SET.VALUE(B1,61)\",
A2,\"SET.VALUE(B2,0)\",
A3,\"SET.VALUE(C1,GET.CELL(50,A9))\",
A4,\"SET.VALUE(C2,64)\",
A5,\"FORMULA(CHAR(B1+B2)&CHAR(C1+C2),A20)\",
";

fn load(csv: &str) -> Deobfuscator {
    Deobfuscator::from_reader(csv.as_bytes(), &CellTableOptions::default()).unwrap()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_expected_fragment_resolves_chain() {
    let mut d = load(SCENARIO);
    assert_eq!(d.payloads(), vec!["= "]);
    assert_eq!(
        d.store().get("C1"),
        &CellValue::Candidates(strings(&["1.0", "2.0", "3.0", "4.0"]))
    );

    let report = d.solve(&SolveOptions::default().with_expected(["=C"])).clone();

    assert_eq!(d.payloads(), vec!["=C"]);
    assert_eq!(d.store().get("C1"), &CellValue::resolved("3.0"));
    assert_eq!(report.records, 5);
    assert_eq!(report.set_values, 4);
    assert_eq!(report.brute_forced, 1);
    assert_eq!(report.chains, 1);
    assert_eq!(report.narrowed, 1);
    assert_eq!(report.resolved_chains, 1);
    // One pass narrows, the next one finds nothing left to do
    assert_eq!(report.passes, 2);
}

#[test]
fn test_impossible_fragment_is_noop() {
    let mut d = load(SCENARIO);
    let report = d
        .solve(
            &SolveOptions::default()
                .without_builtin_fragments()
                .with_expected(["=Z"]),
        )
        .clone();

    assert_eq!(d.payloads(), vec!["= "]);
    assert_eq!(
        d.store().get("C1"),
        &CellValue::Candidates(strings(&["1.0", "2.0", "3.0", "4.0"]))
    );
    assert_eq!(report.narrowed, 0);
    assert_eq!(report.resolved_chains, 0);
    assert_eq!(report.passes, 1);
}

#[test]
fn test_deobfuscate_one_shot() {
    let payloads = deobfuscate(
        SCENARIO.as_bytes(),
        &CellTableOptions::default(),
        &SolveOptions::default().with_expected(["=C"]),
    )
    .unwrap();
    assert_eq!(payloads, vec!["=C"]);
}

#[test]
fn test_unknown_info_type_uses_full_byte_domain() {
    let d = load("Cell,Formula,Value\nA1,\"SET.VALUE(C1,GET.CELL(77,A9))\",\n");
    let candidates = d.store().get("C1").as_candidates().unwrap();
    assert_eq!(candidates.len(), 256);
    assert_eq!(candidates.first().unwrap(), "0.0");
    assert_eq!(candidates.last().unwrap(), "255.0");
}

#[test]
fn test_narrowing_is_monotonic_across_fragments() {
    let mut d = load(
        "Cell,Formula,Value
A1,\"SET.VALUE(B1,61)\",
A2,\"SET.VALUE(B2,0)\",
A3,\"SET.VALUE(C1,GET.CELL(8,A9))\",
A4,\"SET.VALUE(C2,2)\",
A5,\"SET.VALUE(C3,62)\",
A6,\"FORMULA(CHAR(B1+B2)&CHAR(C1/C2),A20)\",
A7,\"FORMULA(CHAR(B1+B2)&CHAR(C1+C3),A21)\",
",
    );
    assert_eq!(d.store().get("C1").as_candidates().map(|c| c.len()), Some(7));

    // C1/2 truncates to 1 for C1 in {2, 3}
    assert_eq!(d.apply_expected("=\u{1}"), 1);
    assert_eq!(
        d.store().get("C1"),
        &CellValue::Candidates(strings(&["2.0", "3.0"]))
    );

    // C1+62 is 'A' (65) only for C1 = 3
    assert_eq!(d.apply_expected("=A"), 1);
    assert_eq!(d.store().get("C1"), &CellValue::resolved("3.0"));
    assert_eq!(d.payloads(), vec!["=\u{1}", "=A"]);

    // Nothing can widen or overwrite a resolved cell
    assert_eq!(d.apply_expected("=B"), 0);
    assert_eq!(d.store().get("C1"), &CellValue::resolved("3.0"));
}

#[test]
fn test_r1c1_sheet() {
    let mut d = load(
        "Sheet,Cell,Formula,Value
Macro1,R1C1,\"SET.VALUE(R1C2,61)\",
Macro1,R2C1,\"SET.VALUE(R1C3,0)\",
Macro1,R3C1,\"SET.VALUE(R2C2,GET.CELL(19,R9C9))\",
Macro1,R4C1,\"SET.VALUE(R2C3,40)\",
Macro1,R5C1,\"FORMULA.FILL(CHAR(R1C2+R1C3)&CHAR(R2C2+R2C3),R20C1:R20C2)\",
",
    );
    assert_eq!(d.store().reference_style(), ReferenceStyle::R1C1);
    assert_eq!(d.chains()[0].destination(), "R20C1:R20C2");

    d.solve(&SolveOptions::default().with_expected(["=Z"]));
    assert_eq!(d.payloads(), vec!["=Z"]);
    assert_eq!(d.store().get("R2C2"), &CellValue::resolved("50.0"));
}

#[test]
fn test_prefix_seed_narrows_first_position() {
    let mut d = load(
        "Cell,Formula,Value
A1,\"SET.VALUE(B1,GET.CELL(24,A9)+40)\",
A2,\"SET.VALUE(B2,21)\",
A3,\"FORMULA(CHAR(B1-B2),A20)\",
",
    );
    d.solve(&SolveOptions::default().without_builtin_fragments());
    assert_eq!(d.payloads(), vec![FORMULA_PREFIX.to_string()]);
    assert_eq!(d.store().get("B1"), &CellValue::resolved("82.0"));
}

#[test]
fn test_row_format_error() {
    let err = Deobfuscator::from_reader(
        "Cell,Formula,Value\nA1,\"SET.VALUE(B1,61)\",\nA2,oops\n".as_bytes(),
        &CellTableOptions::default(),
    )
    .unwrap_err();
    assert!(
        matches!(
            err,
            Error::Csv(CsvError::Core(xlm_fill_core::Error::RowFormat { row: 3, fields: 2 }))
        ),
        "{:?}",
        err
    );
}

#[test]
fn test_unknown_reference_style_error() {
    let err = Deobfuscator::from_reader(
        "Cell,Formula,Value\nfoo,\"SET.VALUE(B1,61)\",\n".as_bytes(),
        &CellTableOptions::default(),
    )
    .unwrap_err();
    assert!(
        matches!(&err, Error::Core(xlm_fill_core::Error::UnknownReferenceStyle(r)) if r == "foo"),
        "{:?}",
        err
    );
}

#[test]
fn test_bad_chain_is_skipped() {
    let mut d = load(&format!(
        "{}A6,\"FORMULA(CHAR(B1+B2)&\"\"x\"\",A21)\",\n",
        SCENARIO
    ));
    assert_eq!(d.report().skipped_chains, 1);
    assert_eq!(d.chains().len(), 1);

    d.solve(&SolveOptions::default().with_expected(["=C"]));
    assert_eq!(d.payloads(), vec!["=C"]);
}

#[test]
fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SCENARIO.as_bytes()).unwrap();
    file.flush().unwrap();

    let mut d = Deobfuscator::from_file(file.path(), &CellTableOptions::default()).unwrap();
    d.solve(&SolveOptions::default().with_expected(["=C"]));
    assert_eq!(d.payloads(), vec!["=C"]);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Deobfuscator::from_file(dir.path().join("missing.csv"), &CellTableOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::Csv(CsvError::Io(_))), "{:?}", err);
}
