//! File kind classification by release path segment

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of a file listed in a version manifest.
///
/// Each kind is one bucket of the aggregated model. Declaration order is the
/// bucket order in serialized output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DatabaseFileType {
    Setup,
    Table,
    Type,
    Function,
    Data,
    Sequence,
    Index,
    View,
    Trigger,
    ForeignServers,
    UserMappings,
    LocalTables,
    ForeignTables,
    SourceSpecificAppSetup,
    DataTransfers,
    ExternalSystemIntegrations,
    DataExchange,
    UsersRolesPermissions,
    FullTextCatalogues,
    Unknown,
}

/// Path segment that marks each kind, tested in this order.
///
/// `0q-types` is the literal folder name used by existing repositories.
const SEGMENTS: &[(&str, DatabaseFileType)] = &[
    ("00-database-setup", DatabaseFileType::Setup),
    ("03-tables", DatabaseFileType::Table),
    ("0q-types", DatabaseFileType::Type),
    ("07-functions", DatabaseFileType::Function),
    ("09-data", DatabaseFileType::Data),
    ("04-sequences", DatabaseFileType::Sequence),
    ("05-indexes", DatabaseFileType::Index),
    ("06-views", DatabaseFileType::View),
    ("08-triggers", DatabaseFileType::Trigger),
    ("00-foreign-servers", DatabaseFileType::ForeignServers),
    ("01-user-mappings", DatabaseFileType::UserMappings),
    ("02-local-tables", DatabaseFileType::LocalTables),
    ("03-foreign-tables", DatabaseFileType::ForeignTables),
    (
        "04-source-specific-app-setup",
        DatabaseFileType::SourceSpecificAppSetup,
    ),
    ("01-data-transfers", DatabaseFileType::DataTransfers),
    (
        "02-external-system-integrations",
        DatabaseFileType::ExternalSystemIntegrations,
    ),
    ("03-data-exchange", DatabaseFileType::DataExchange),
    (
        "10-users-roles-permissions",
        DatabaseFileType::UsersRolesPermissions,
    ),
    ("11-full-text-catalogues", DatabaseFileType::FullTextCatalogues),
];

impl DatabaseFileType {
    /// Every kind that owns a bucket in the aggregated model.
    pub const BUCKETS: [DatabaseFileType; 19] = [
        DatabaseFileType::Setup,
        DatabaseFileType::Table,
        DatabaseFileType::Type,
        DatabaseFileType::Function,
        DatabaseFileType::Data,
        DatabaseFileType::Sequence,
        DatabaseFileType::Index,
        DatabaseFileType::View,
        DatabaseFileType::Trigger,
        DatabaseFileType::ForeignServers,
        DatabaseFileType::UserMappings,
        DatabaseFileType::LocalTables,
        DatabaseFileType::ForeignTables,
        DatabaseFileType::SourceSpecificAppSetup,
        DatabaseFileType::DataTransfers,
        DatabaseFileType::ExternalSystemIntegrations,
        DatabaseFileType::DataExchange,
        DatabaseFileType::UsersRolesPermissions,
        DatabaseFileType::FullTextCatalogues,
    ];

    /// Classify a manifest entry by the first known segment its path contains.
    pub fn classify(path: &str) -> Self {
        let normalized = path.replace('\\', "/");
        SEGMENTS
            .iter()
            .find(|(segment, _)| normalized.contains(segment))
            .map(|(_, kind)| *kind)
            .unwrap_or(DatabaseFileType::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseFileType::Setup => "setup",
            DatabaseFileType::Table => "table",
            DatabaseFileType::Type => "type",
            DatabaseFileType::Function => "function",
            DatabaseFileType::Data => "data",
            DatabaseFileType::Sequence => "sequence",
            DatabaseFileType::Index => "index",
            DatabaseFileType::View => "view",
            DatabaseFileType::Trigger => "trigger",
            DatabaseFileType::ForeignServers => "foreign-servers",
            DatabaseFileType::UserMappings => "user-mappings",
            DatabaseFileType::LocalTables => "local-tables",
            DatabaseFileType::ForeignTables => "foreign-tables",
            DatabaseFileType::SourceSpecificAppSetup => "source-specific-app-setup",
            DatabaseFileType::DataTransfers => "data-transfers",
            DatabaseFileType::ExternalSystemIntegrations => "external-system-integrations",
            DatabaseFileType::DataExchange => "data-exchange",
            DatabaseFileType::UsersRolesPermissions => "users-roles-permissions",
            DatabaseFileType::FullTextCatalogues => "full-text-catalogues",
            DatabaseFileType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DatabaseFileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatabaseFileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DatabaseFileType::BUCKETS
            .iter()
            .chain(std::iter::once(&DatabaseFileType::Unknown))
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("unknown file type: {}", s))
    }
}
