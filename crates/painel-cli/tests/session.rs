use std::fs;

use chrono::{NaiveDate, NaiveDateTime};
use tempfile::TempDir;

use painel_cli::session::{load_catalog_from, parse_filter_arg, run_dashboard};
use painel_core::{AggregateValue, DashboardView};

const CONTRATOS: &str = "\
Contrato,Setor,Fornecedor,Objeto,Modalidade,Data Início,Data Fim,Valor Total
001/2025,Saúde,Alfa Ltda,Limpeza,Pregão,02/01/2025,20/10/2025,\"R$ 1.000,00\"
002/2025,Obras,Beta SA,Reforma,Concorrência,15/03/2025,01/01/2026,\"R$ 500,50\"
003/2024,Saúde,Gama,Vigilância,Pregão,10/06/2024,01/09/2025,\"R$ 250,00\"
";

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 10, 16)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

fn data_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("contratos.csv"), CONTRATOS).unwrap();
    dir
}

fn filters(args: &[&str]) -> Vec<(String, String)> {
    args.iter().map(|arg| parse_filter_arg(arg).unwrap()).collect()
}

#[test]
fn filter_args_split_on_first_equals() {
    assert_eq!(
        parse_filter_arg("setor=Saúde, Obras"),
        Ok(("setor".to_string(), "Saúde, Obras".to_string()))
    );
    assert_eq!(
        parse_filter_arg("objeto=a=b"),
        Ok(("objeto".to_string(), "a=b".to_string()))
    );
    assert_eq!(parse_filter_arg("ano="), Ok(("ano".to_string(), String::new())));
    assert!(parse_filter_arg("setor").is_err());
    assert!(parse_filter_arg("=Saúde").is_err());
}

#[test]
fn runs_builtin_dashboard_over_data_dir() {
    let dir = data_dir();
    let catalog = load_catalog_from(None).unwrap();
    let outcome = run_dashboard(
        &catalog,
        "contratos",
        dir.path(),
        &filters(&["setor=Saúde", "ano=2025"]),
        now(),
        false,
    )
    .unwrap();

    let run = outcome.view.run().unwrap();
    assert_eq!(run.view.height(), 1);
    assert_eq!(
        run.aggregate("quantidade").map(|result| result.value.clone()),
        Some(AggregateValue::Count(1))
    );
    assert_eq!(run.options["ano"], vec!["2024", "2025"]);
    assert_eq!(run.options["setor"], vec!["Obras", "Saúde"]);

    let report = outcome.report.unwrap();
    assert_eq!(report.filename, "relatorio_contratos.pdf");
    assert_eq!(report.row_count, 1);
    assert!(report.filter_summary.contains("Setor: Saúde"));
    assert!(report.to_json().unwrap().contains("\"001/2025\""));
}

#[test]
fn missing_source_is_unavailable_without_report() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = load_catalog_from(None).unwrap();
    let outcome = run_dashboard(&catalog, "atas", dir.path(), &[], now(), true).unwrap();

    assert!(!outcome.is_available());
    assert!(outcome.report.is_none());
    let DashboardView::Unavailable { message } = &outcome.view else {
        panic!("atas should be unavailable");
    };
    assert!(message.starts_with("Erro ao carregar dados de atas.csv: "));
}

#[test]
fn unknown_dashboard_and_control_are_errors() {
    let dir = data_dir();
    let catalog = load_catalog_from(None).unwrap();

    let error = run_dashboard(&catalog, "licitacoes", dir.path(), &[], now(), false).unwrap_err();
    assert!(error.to_string().contains("available: contratos, atas"));

    let error = run_dashboard(
        &catalog,
        "contratos",
        dir.path(),
        &filters(&["cargo=Analista"]),
        now(),
        false,
    )
    .unwrap_err();
    assert!(error.to_string().contains("cargo"));
}

#[test]
fn user_catalog_replaces_builtin() {
    let dir = data_dir();
    let catalog_path = dir.path().join("painel.toml");
    fs::write(
        &catalog_path,
        r#"
[[dashboards]]
id = "setores"
title = "Contratos por setor"
subject = "Setores"

[dashboards.source]
location = "contratos.csv"

[dashboards.schema]
required_columns = ["Setor"]

[[dashboards.controls]]
id = "setor"
label = "Setor"
column = "Setor"
cascading = true

[[dashboards.aggregates]]
id = "quantidade"
label = "Contratos"
kind = "count"
"#,
    )
    .unwrap();

    let catalog = load_catalog_from(Some(&catalog_path)).unwrap();
    assert_eq!(catalog.ids(), vec!["setores"]);

    let outcome = run_dashboard(&catalog, "setores", dir.path(), &[], now(), true).unwrap();
    let run = outcome.view.run().unwrap();
    assert_eq!(run.options["setor"], vec!["Obras", "Saúde"]);
    let report = outcome.report.unwrap();
    assert_eq!(report.generated_at.as_deref(), Some("16/10/2025 08:00"));
    assert_eq!(report.filename, "relatorio_setores_20251016_0800.pdf");
}

#[test]
fn unreadable_catalog_path_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let error = load_catalog_from(Some(&dir.path().join("nada.toml"))).unwrap_err();
    assert!(error.to_string().contains("nada.toml"));
}
