use std::collections::BTreeMap;

use thiserror::Error;

use super::enums::user_fields::UserField;

pub const USERS_TABLE: &str = "users";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("table `{table}` was not found (or is not readable) in schema `public`")]
    TableNotFound { table: String },

    #[error("no column for `{field}` in `users` (tried: {})", candidates.join(", "))]
    ColumnUnresolved {
        field: UserField,
        candidates: Vec<String>,
    },
}

/// Logical `users` fields resolved against the live table.
///
/// Built once per process by the schema detector. Optional fields with no
/// matching column stay unresolved and are selected as `NULL`; only the
/// telegram id column is mandatory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    resolved: BTreeMap<UserField, String>,
    columns: Vec<String>,
}

impl ColumnMapping {
    pub fn resolve(columns: Vec<String>) -> Result<Self, SchemaError> {
        if columns.is_empty() {
            return Err(SchemaError::TableNotFound {
                table: USERS_TABLE.to_string(),
            });
        }

        let mut resolved = BTreeMap::new();

        for field in UserField::ALL {
            match find_column(&columns, field.aliases()) {
                Some(column) => {
                    resolved.insert(field, column.to_string());
                }
                None if field.is_required() => {
                    return Err(SchemaError::ColumnUnresolved {
                        field,
                        candidates: field.aliases().iter().map(|a| a.to_string()).collect(),
                    });
                }
                None => {}
            }
        }

        Ok(Self { resolved, columns })
    }

    pub fn column(&self, field: UserField) -> Option<&str> {
        self.resolved.get(&field).map(String::as_str)
    }

    pub fn require(&self, field: UserField) -> Result<&str, SchemaError> {
        self.column(field).ok_or_else(|| SchemaError::ColumnUnresolved {
            field,
            candidates: field.aliases().iter().map(|a| a.to_string()).collect(),
        })
    }

    pub fn unresolved_fields(&self) -> Vec<UserField> {
        UserField::ALL
            .into_iter()
            .filter(|field| !self.resolved.contains_key(field))
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|column| column == name)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// `balance_rub` holds rubles; every other known balance column holds kopeks.
    pub fn balance_in_rubles(&self) -> bool {
        self.column(UserField::Balance) == Some("balance_rub")
    }

    /// `CAST(u."col" AS TEXT) AS field`, or `NULL::TEXT AS field` when unresolved.
    pub fn select_expr(&self, field: UserField, table_alias: &str) -> String {
        match self.column(field) {
            Some(column) => format!(
                "CAST({}.{} AS TEXT) AS {}",
                table_alias,
                quote_ident(column),
                field.as_str()
            ),
            None => format!("NULL::TEXT AS {}", field.as_str()),
        }
    }

    /// Every logical field, aliased to its logical name.
    pub fn user_select_list(&self, table_alias: &str) -> String {
        UserField::ALL
            .iter()
            .map(|field| self.select_expr(*field, table_alias))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Qualified, quoted column reference such as `u."tg_id"`.
    pub fn qualified(&self, field: UserField, table_alias: &str) -> Result<String, SchemaError> {
        Ok(format!("{}.{}", table_alias, quote_ident(self.require(field)?)))
    }
}

fn find_column<'a>(columns: &'a [String], aliases: &[&str]) -> Option<&'a str> {
    aliases
        .iter()
        .find_map(|alias| columns.iter().find(|column| column == alias))
        .map(String::as_str)
}

pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
