use serde::Deserialize;

/// Which columns get which treatment, keyed by normalized header names.
///
/// The defaults describe the "despesas por favorecido" extract; another month
/// of the same dataset uses the same plan.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColumnPlan {
    /// Normalized name of "Ano e mês do lançamento".
    pub date_source: String,
    /// Key the date column is renamed to.
    pub date_column: String,
    /// Monetary column in `1.234,56` notation.
    pub value_column: String,
    /// Identifier columns coerced to nullable integers.
    pub integer_columns: Vec<String>,
    /// Free-text columns that get trimmed.
    pub text_columns: Vec<String>,
    /// Exported columns, in output order.
    pub output_columns: Vec<String>,
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl Default for ColumnPlan {
    fn default() -> Self {
        Self {
            date_source: "Anoemesdolancamento".into(),
            date_column: "DataLancamento".into(),
            value_column: "ValorRecebido".into(),
            integer_columns: owned(&["CodigoOrgaoSuperior", "CodigoOrgao", "CodigoUnidadeGestora"]),
            text_columns: owned(&[
                "CodigoFavorecido",
                "NomeFavorecido",
                "SiglaUF",
                "NomeMunicipio",
                "NomeOrgaoSuperior",
                "NomeOrgao",
                "NomeUnidadeGestora",
            ]),
            output_columns: owned(&[
                "DataLancamento",
                "ValorRecebido",
                "CodigoFavorecido",
                "NomeFavorecido",
                "SiglaUF",
                "NomeMunicipio",
                "CodigoOrgaoSuperior",
                "NomeOrgaoSuperior",
                "CodigoOrgao",
                "NomeOrgao",
                "CodigoUnidadeGestora",
                "NomeUnidadeGestora",
            ]),
        }
    }
}
