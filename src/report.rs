//! Console rendering of a [`PropertySet`].

use std::io::{self, Write};

use crate::PropertySet;

/// Properties shown in the summary block, with their labels.
pub const KEY_PROPERTIES: [(&str, &str); 4] = [
    ("ProductName", "ProductName"),
    ("ProductCode", "ProductCode"),
    ("ProductVersion", "ProductVersion"),
    ("Manufacturer", "Manufacturer"),
];

pub const MISSING_VALUE: &str = "не указано";

const LABEL_WIDTH: usize = 14;

pub fn write_key_properties<W: Write>(out: &mut W, properties: &PropertySet) -> io::Result<()> {
    writeln!(out, "=== Основная информация о продукте ===")?;
    for (key, label) in KEY_PROPERTIES {
        let value = properties.get(key).unwrap_or(MISSING_VALUE);
        writeln!(out, "{label:<LABEL_WIDTH$}: {value}")?;
    }
    writeln!(out)
}

pub fn write_all_properties<W: Write>(out: &mut W, properties: &PropertySet) -> io::Result<()> {
    writeln!(out, "=== Все свойства MSI (таблица Property) ===")?;
    for (name, value) in properties.sorted() {
        writeln!(out, "{name} = {value}")?;
    }
    Ok(())
}

pub fn write_report<W: Write>(out: &mut W, properties: &PropertySet) -> io::Result<()> {
    write_key_properties(out, properties)?;
    write_all_properties(out, properties)
}
