use std::path::Path;

use painel_catalog::{CatalogError, load_builtin_catalog, load_catalog, parse_catalog};
use painel_model::{ControlDefault, FilterMode, FilterValue};

const MINIMAL: &str = r#"
[[dashboards]]
id = "compras"
title = "Compras"
subject = "Compras"

[dashboards.source]
location = "compras.csv"

[dashboards.schema]
required_columns = ["Fornecedor"]
currency_columns = ["Valor"]

[[dashboards.controls]]
id = "fornecedor"
label = "Fornecedor"
column = "Fornecedor"
mode = "contains"

[[dashboards.aggregates]]
id = "total"
label = "Total"
kind = "sum"
column = "Valor"
"#;

#[test]
fn diarias_defaults_year_to_2025() {
    let catalog = load_builtin_catalog().unwrap();
    let diarias = catalog.get("diarias").unwrap();
    let ano = diarias.control("ano").unwrap();
    assert_eq!(
        ano.default,
        ControlDefault::Value {
            value: FilterValue::text("2025")
        }
    );
    assert_eq!(
        catalog.get("compras").unwrap().control("ano").unwrap().default,
        ControlDefault::CurrentYear
    );
}

#[test]
fn orcamento_reads_semicolon_sheet_with_banner() {
    let catalog = load_builtin_catalog().unwrap();
    let orcamento = catalog.get("orcamento").unwrap();
    assert_eq!(orcamento.source.delimiter, ';');
    assert_eq!(orcamento.source.skip_rows, 2);
    assert_eq!(orcamento.schema.code_width("Natureza de Despesa"), Some(8));
}

#[test]
fn loads_user_catalog_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("painel.toml");
    std::fs::write(&path, MINIMAL).unwrap();

    let catalog = load_catalog(&path).unwrap();
    assert_eq!(catalog.ids(), vec!["compras"]);
    let control = catalog.get("compras").unwrap().control("fornecedor").unwrap();
    assert_eq!(control.mode, FilterMode::Contains);
    assert!(catalog.get("contratos").is_none());
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let error = load_catalog(&dir.path().join("nada.toml")).unwrap_err();
    assert!(matches!(error, CatalogError::Io { .. }));
}

#[test]
fn malformed_toml_names_the_file() {
    let error = parse_catalog("[[dashboards]\nid =", Path::new("quebrado.toml")).unwrap_err();
    assert!(matches!(error, CatalogError::Toml { .. }));
    assert!(error.to_string().starts_with("failed to parse TOML catalog quebrado.toml"));
}

#[test]
fn rejects_duplicate_dashboards() {
    let doubled = format!("{MINIMAL}\n{MINIMAL}");
    let error = parse_catalog(&doubled, Path::new("dup.toml")).unwrap_err();
    assert_eq!(
        error.to_string(),
        "invalid catalog: duplicate dashboard id: compras"
    );
}

#[test]
fn rejects_undeclared_columns() {
    let text = MINIMAL.replace("column = \"Valor\"", "column = \"Valor Pago\"");
    let error = parse_catalog(&text, Path::new("x.toml")).unwrap_err();
    assert_eq!(
        error.to_string(),
        "invalid catalog: compras: column \"Valor Pago\" is used but not declared by the schema"
    );
}

#[test]
fn rejects_duplicate_controls() {
    let text = format!(
        "{MINIMAL}\n[[dashboards.controls]]\n\
         id = \"fornecedor\"\nlabel = \"F\"\ncolumn = \"Fornecedor\"\n"
    );
    let error = parse_catalog(&text, Path::new("x.toml")).unwrap_err();
    assert!(matches!(
        error,
        CatalogError::Invalid { message } if message.contains("duplicate control id")
    ));
}
