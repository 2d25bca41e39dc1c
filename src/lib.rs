use std::{
    collections::HashMap,
    fs::File,
    io::{self, Read, Seek, SeekFrom},
    path::{Path, PathBuf},
};

use msi::{Package, Select, Value};
use tracing::{debug, info};

pub mod report;

pub const PROPERTY_TABLE: &str = "Property";

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("file {} not found or is not a regular file", .0.display())]
    NotFound(PathBuf),
    #[error("not a structured storage file: {0}")]
    NotStorage(#[source] io::Error),
    #[error("cannot read installer database: {0}")]
    Database(#[source] io::Error),
    #[error("package has no Property table")]
    MissingTable,
    #[error("Property table has {0} column(s), need name and value")]
    TooFewColumns(usize),
    #[error("Property table has no rows")]
    EmptyTable,
}

impl Error {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::NotFound(_) => 1,
            Error::NotStorage(_)
            | Error::Database(_)
            | Error::MissingTable
            | Error::TooFewColumns(_)
            | Error::EmptyTable => 2,
        }
    }
}

/// Fails with [`Error::NotFound`] unless `path` names an existing regular file.
pub fn check_path<P: AsRef<Path>>(path: P) -> Result<(), Error> {
    let path = path.as_ref();
    match path.metadata() {
        Ok(meta) if meta.is_file() => Ok(()),
        _ => Err(Error::NotFound(path.to_owned())),
    }
}

/// Name to value mapping read from a package's Property table.
///
/// Entries keep the order in which names were first seen; a repeated name
/// replaces the value in place.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PropertySet {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl PropertySet {
    pub fn from_reader<F>(mut reader: F) -> Result<Self, Error>
    where
        F: Read + Seek,
    {
        // msi reports a bad container and a bad database the same way, so
        // probe the container first to tell them apart.
        cfb::CompoundFile::open(&mut reader).map_err(Error::NotStorage)?;
        reader
            .seek(SeekFrom::Start(0))
            .map_err(Error::NotStorage)?;

        let mut package = Package::open(reader).map_err(Error::Database)?;
        debug!(package_type = ?package.package_type(), "opened installer database");
        Self::from_package(&mut package)
    }

    pub fn from_path<P>(path: P) -> Result<Self, Error>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening package");
        let reader = File::open(path).map_err(Error::Database)?;
        Self::from_reader(reader)
    }

    fn from_package<F>(package: &mut Package<F>) -> Result<Self, Error>
    where
        F: Read + Seek,
    {
        let table = package
            .get_table(PROPERTY_TABLE)
            .ok_or(Error::MissingTable)?;
        // name and value are the first two columns, whatever they are called
        let width = table.columns().len();
        if width < 2 {
            return Err(Error::TooFewColumns(width));
        }

        let mut properties = Self::default();
        for r in package
            .select_rows(Select::table(PROPERTY_TABLE))
            .map_err(Error::Database)?
        {
            properties.insert(cell_text(&r[0]), cell_text(&r[1]));
        }
        info!(count = properties.len(), "read {PROPERTY_TABLE} table");

        Ok(properties)
    }

    fn insert(&mut self, name: String, value: String) {
        match self.index.get(&name) {
            Some(&i) => self.entries[i].1 = value,
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, value));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.index.get(name).map(|&i| self.entries[i].1.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ordered by name ignoring case. Names that differ only in case
    /// keep table order.
    pub fn sorted(&self) -> Vec<(&str, &str)> {
        let mut out: Vec<(&str, &str)> = self
            .entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        out.sort_by_cached_key(|(k, _)| k.to_lowercase());
        out
    }
}

impl<K, V> FromIterator<(K, V)> for PropertySet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut properties = Self::default();
        for (k, v) in iter {
            properties.insert(k.into(), v.into());
        }
        properties
    }
}

/// Cell as text: NULL is empty, integers are decimal.
fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Int(n) => n.to_string(),
        Value::Str(s) => s.clone(),
    }
}
