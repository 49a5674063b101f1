//! Per-kind object analysis
//!
//! The folded sub-object of each file kind goes through one analyzer. Tables,
//! functions and data scripts read their latest file and parse it; every
//! other kind is kept as the folded record.

use std::path::Path;

use tracing::warn;

use super::data_parser::parse_data;
use super::function_parser::parse_function;
use super::simplify::simplify_for_analysis;
use super::table_parser::parse_table;
use crate::model::{
    DatabaseData, DatabaseFunction, DatabaseObjectEntry, DatabaseSubObject, DatabaseTable,
};
use crate::release::DatabaseFileType;
use crate::source::SourceReader;

/// Analyzer selected by file kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectAnalyzer {
    Table,
    Function,
    Data,
    Generic,
}

impl ObjectAnalyzer {
    pub fn for_file_type(file_type: DatabaseFileType) -> Self {
        match file_type {
            DatabaseFileType::Table | DatabaseFileType::LocalTables => ObjectAnalyzer::Table,
            DatabaseFileType::Function => ObjectAnalyzer::Function,
            DatabaseFileType::Data => ObjectAnalyzer::Data,
            _ => ObjectAnalyzer::Generic,
        }
    }

    /// Analyze `object` from the text of its latest file.
    ///
    /// A file that cannot be read is logged and produces the typed record
    /// with only the fold data, so one broken file never aborts a read.
    pub fn analyze(
        self,
        object: DatabaseSubObject,
        reader: &dyn SourceReader,
    ) -> DatabaseObjectEntry {
        if self == ObjectAnalyzer::Generic {
            return DatabaseObjectEntry::Generic(object);
        }

        let sql = match reader.read_source(Path::new(&object.latest_file)) {
            Ok(text) => simplify_for_analysis(&text),
            Err(e) => {
                warn!(
                    object = %object.name,
                    file = %object.latest_file,
                    error = %e,
                    "Could not read object file, keeping fold data only"
                );
                return self.empty(object);
            }
        };

        match self {
            ObjectAnalyzer::Table => DatabaseObjectEntry::Table(parse_table(object, &sql)),
            ObjectAnalyzer::Function => {
                DatabaseObjectEntry::Function(parse_function(object, &sql))
            }
            ObjectAnalyzer::Data => DatabaseObjectEntry::Data(parse_data(object, &sql)),
            ObjectAnalyzer::Generic => DatabaseObjectEntry::Generic(object),
        }
    }

    fn empty(self, object: DatabaseSubObject) -> DatabaseObjectEntry {
        match self {
            ObjectAnalyzer::Table => {
                DatabaseObjectEntry::Table(DatabaseTable::from_sub_object(object))
            }
            ObjectAnalyzer::Function => {
                DatabaseObjectEntry::Function(DatabaseFunction::from_sub_object(object))
            }
            ObjectAnalyzer::Data => DatabaseObjectEntry::Data(DatabaseData::from_sub_object(object)),
            ObjectAnalyzer::Generic => DatabaseObjectEntry::Generic(object),
        }
    }
}
