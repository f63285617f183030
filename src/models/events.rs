use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event categories, matching what the audit log groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogCategory {
    Connect,
    Poll,
    Interface,
    Vlan,
    Poe,
    Config,
    Command,
}

/// Action codes. The numeric value is what gets persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogAction {
    ProbeFailed,
    PhaseFailed,
    OidParseWarning,
    VlanIndexUnresolved,
    LacpConflict,
    PoeFault,
    PoeUnmapped,
    ClientDataSkipped,
    ChangeDescription,
    ChangeAdminStatus,
    ChangePoeStatus,
    ChangeVlan,
    SaveConfig,
    RunCommand,
    WriteFailed,
}

impl LogAction {
    pub fn code(&self) -> u16 {
        match self {
            LogAction::ProbeFailed => 100,
            LogAction::PhaseFailed => 101,
            LogAction::OidParseWarning => 110,
            LogAction::VlanIndexUnresolved => 111,
            LogAction::LacpConflict => 112,
            LogAction::PoeFault => 120,
            LogAction::PoeUnmapped => 121,
            LogAction::ClientDataSkipped => 130,
            LogAction::ChangeDescription => 200,
            LogAction::ChangeAdminStatus => 201,
            LogAction::ChangePoeStatus => 202,
            LogAction::ChangeVlan => 203,
            LogAction::SaveConfig => 210,
            LogAction::RunCommand => 220,
            LogAction::WriteFailed => 290,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

/// Structured event handed to the (external) activity log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    pub category: LogCategory,
    pub action: LogAction,
    pub level: LogLevel,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

impl LogEvent {
    pub fn new(
        level: LogLevel,
        category: LogCategory,
        action: LogAction,
        description: impl Into<String>,
    ) -> Self {
        Self {
            category,
            action,
            level,
            description: description.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn info(category: LogCategory, action: LogAction, description: impl Into<String>) -> Self {
        Self::new(LogLevel::Info, category, action, description)
    }

    pub fn warning(category: LogCategory, action: LogAction, description: impl Into<String>) -> Self {
        Self::new(LogLevel::Warning, category, action, description)
    }

    pub fn error(category: LogCategory, action: LogAction, description: impl Into<String>) -> Self {
        Self::new(LogLevel::Error, category, action, description)
    }

    /// (category, action-code, description) as persisted by the log writer.
    pub fn as_tuple(&self) -> (LogCategory, u16, &str) {
        (self.category, self.action.code(), &self.description)
    }
}
