//! Tests for painel-model types.

use painel_model::{
    AggregateKind, ColumnFormat, ControlDefault, DashboardSpec, DerivedColumn, FilterMode,
    FilterValue, Placeholder, Status,
};

const SPEC: &str = r#"
id = "contratos"
title = "Contratos"
subject = "Contratos"

[source]
location = "contratos.csv"
skip_rows = 1

[schema]
currency_columns = ["Valor"]
date_columns = ["Término da Execução"]

[[schema.renames]]
from = "Fim Vigência"
to = "Término da Execução"

[[schema.derived]]
kind = "status"
from = "Término da Execução"
into = "Status"

[[controls]]
id = "status"
label = "Status"
column = "Status"
mode = "one_of"
multi = true

[[controls]]
id = "ano"
label = "Ano"
column = "Ano"
default = { kind = "current_year" }
placeholder = "Todos"

[[aggregates]]
id = "total"
label = "Valor total"
kind = "sum"
column = "Valor"

[[aggregates]]
id = "por_setor"
label = "Valor por setor"
kind = "group_sum"
group = "Setor"
value = "Valor"

[[report.columns]]
column = "Valor"
format = "currency"
"#;

#[test]
fn dashboard_spec_deserializes_from_toml() {
    let spec: DashboardSpec = toml::from_str(SPEC).expect("parse spec");
    assert_eq!(spec.id, "contratos");
    assert_eq!(spec.source.skip_rows, 1);
    assert_eq!(spec.source.delimiter, ',');
    assert!(spec.schema.day_first);

    let status = spec.control("status").expect("status control");
    assert_eq!(status.mode, FilterMode::Exact);
    assert!(status.multi);
    assert_eq!(status.default, ControlDefault::None);

    let ano = spec.control("ano").expect("ano control");
    assert_eq!(ano.default, ControlDefault::CurrentYear);
    assert_eq!(ano.placeholder, Placeholder::Todos);

    assert_eq!(
        spec.schema.derived,
        vec![DerivedColumn::Status {
            from: "Término da Execução".to_string(),
            into: "Status".to_string(),
            window_days: 10,
        }]
    );
    assert_eq!(
        spec.aggregates[1].kind,
        AggregateKind::GroupSum {
            group: "Setor".to_string(),
            value: "Valor".to_string(),
        }
    );
    assert_eq!(spec.report.columns[0].format, ColumnFormat::Currency);
    assert_eq!(spec.report.columns[0].header(), "Valor");
}

#[test]
fn referenced_columns_cover_controls_aggregates_and_report() {
    let spec: DashboardSpec = toml::from_str(SPEC).expect("parse spec");
    let columns = spec.referenced_columns();
    for name in ["Status", "Ano", "Valor", "Setor"] {
        assert!(columns.contains(name), "missing {name}");
    }
}

#[test]
fn filter_value_deserializes_untagged() {
    let number: FilterValue = serde_json::from_str("2025").expect("number");
    assert_eq!(number, FilterValue::Number(2025.0));
    let text: FilterValue = serde_json::from_str("\"A\"").expect("text");
    assert_eq!(text, FilterValue::text("A"));
    let list: FilterValue = serde_json::from_str("[\"A\",\"B\"]").expect("list");
    assert_eq!(list, FilterValue::list(["A", "B"]));
}

#[test]
fn status_parses_case_insensitively() {
    assert_eq!("vencido".parse::<Status>().ok(), Some(Status::Vencido));
    assert!("Encerrado".parse::<Status>().is_err());
}
