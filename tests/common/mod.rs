//! Installer packages built in memory for tests.

#![allow(dead_code)]

use std::{fs, io::Cursor, path::PathBuf};

use msi::{Column, Insert, Package, PackageType, Value};
use tempfile::TempDir;

/// The usual Property table layout.
pub fn property_columns() -> Vec<Column> {
    vec![
        Column::build("Property").primary_key().id_string(72),
        Column::build("Value").nullable().text_string(0),
    ]
}

/// Package whose Property table holds `rows` as name/value strings.
pub fn package(rows: &[(&str, &str)]) -> Vec<u8> {
    let rows = rows
        .iter()
        .map(|(k, v)| vec![Value::from(*k), Value::from(*v)])
        .collect();
    package_with(property_columns(), rows)
}

/// Package whose Property table has the given layout and raw rows.
pub fn package_with(columns: Vec<Column>, rows: Vec<Vec<Value>>) -> Vec<u8> {
    build(Some((columns, rows)))
}

/// Package without a Property table.
pub fn bare_package() -> Vec<u8> {
    build(None)
}

fn build(table: Option<(Vec<Column>, Vec<Vec<Value>>)>) -> Vec<u8> {
    let mut package = Package::create(PackageType::Installer, Cursor::new(Vec::new())).unwrap();
    if let Some((columns, rows)) = table {
        package.create_table("Property", columns).unwrap();
        if !rows.is_empty() {
            let query = rows
                .into_iter()
                .fold(Insert::into("Property"), |q, row| q.row(row));
            package.insert_rows(query).unwrap();
        }
    }
    package.into_inner().unwrap().into_inner()
}

pub fn write(dir: &TempDir, name: &str, bytes: Vec<u8>) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, bytes).unwrap();
    path
}
