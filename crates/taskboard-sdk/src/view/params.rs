//! View parameters and their URL query-string form

use crate::error::{Result, SdkError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task list filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TaskFilter {
    /// Everything, archived tasks included
    #[default]
    All,
    Todo,
    InProgress,
    Done,
    /// Archived tasks only
    Achieved,
    /// High priority
    High,
    /// Unrecognised key; filters nothing out
    Other(String),
}

impl TaskFilter {
    pub fn parse(s: &str) -> Self {
        match s {
            "all" => TaskFilter::All,
            "todo" => TaskFilter::Todo,
            "inprogress" => TaskFilter::InProgress,
            "done" => TaskFilter::Done,
            "achieved" => TaskFilter::Achieved,
            "high" => TaskFilter::High,
            other => TaskFilter::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TaskFilter::All => "all",
            TaskFilter::Todo => "todo",
            TaskFilter::InProgress => "inprogress",
            TaskFilter::Done => "done",
            TaskFilter::Achieved => "achieved",
            TaskFilter::High => "high",
            TaskFilter::Other(raw) => raw,
        }
    }
}

impl fmt::Display for TaskFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Due-date ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Earliest first
    Asc,
    /// Latest first
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// Unknown values fall back to the default
    pub fn parse(s: &str) -> Self {
        match s {
            "asc" => SortDirection::Asc,
            _ => SortDirection::Desc,
        }
    }
}

/// Grouping applied after filtering and sorting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    /// Board columns by task status
    Status,
}

/// Filter, search, sort and grouping of a task list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewParams {
    pub filter: TaskFilter,
    pub search: String,
    pub sort: SortDirection,
    pub group_by: Option<GroupBy>,
}

#[derive(Deserialize)]
struct RawQuery {
    filter: Option<String>,
    sort: Option<String>,
    search: Option<String>,
    group: Option<String>,
}

#[derive(Serialize)]
struct QueryForm<'a> {
    filter: &'a str,
    sort: &'a str,
    #[serde(skip_serializing_if = "is_blank")]
    search: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    group: Option<&'a str>,
}

fn is_blank(s: &&str) -> bool {
    s.is_empty()
}

impl ViewParams {
    /// Parse `filter=…&sort=…&search=…&group=status`, with or without a
    /// leading `?`. Missing parameters take their defaults.
    pub fn from_query(query: &str) -> Result<Self> {
        let raw: RawQuery = serde_urlencoded::from_str(query.trim_start_matches('?'))
            .map_err(|e| SdkError::Serialization(format!("view query: {}", e)))?;

        Ok(Self {
            filter: raw.filter.as_deref().map(TaskFilter::parse).unwrap_or_default(),
            search: raw.search.unwrap_or_default(),
            sort: raw.sort.as_deref().map(SortDirection::parse).unwrap_or_default(),
            group_by: match raw.group.as_deref() {
                Some("status") => Some(GroupBy::Status),
                _ => None,
            },
        })
    }

    /// Query-string form, without the leading `?`
    pub fn to_query(&self) -> Result<String> {
        let form = QueryForm {
            filter: self.filter.as_str(),
            sort: self.sort.as_str(),
            search: &self.search,
            group: self.group_by.map(|GroupBy::Status| "status"),
        };
        serde_urlencoded::to_string(&form)
            .map_err(|e| SdkError::Serialization(format!("view query: {}", e)))
    }
}
