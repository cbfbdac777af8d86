use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::ParseError;

/// Branch the pipeline list is filtered to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Branch {
    #[default]
    #[serde(rename = "main")]
    Main,
    #[serde(rename = "develop")]
    Develop,
    /// Any `feature/` branch.
    #[serde(rename = "feature/*")]
    Feature,
}

impl Branch {
    pub const ALL: [Branch; 3] = [Branch::Main, Branch::Develop, Branch::Feature];

    pub fn as_str(&self) -> &'static str {
        match self {
            Branch::Main => "main",
            Branch::Develop => "develop",
            Branch::Feature => "feature/*",
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Branch {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Branch::ALL
            .into_iter()
            .find(|b| b.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseError::UnknownBranch {
                value: s.to_string(),
            })
    }
}

/// Build configuration tag selectable through the checkbox group.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum BuildConfiguration {
    Debug,
    Release,
}

impl BuildConfiguration {
    pub const ALL: [BuildConfiguration; 2] = [BuildConfiguration::Debug, BuildConfiguration::Release];

    pub fn as_str(&self) -> &'static str {
        match self {
            BuildConfiguration::Debug => "Debug",
            BuildConfiguration::Release => "Release",
        }
    }
}

impl fmt::Display for BuildConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildConfiguration {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BuildConfiguration::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseError::UnknownConfiguration {
                value: s.to_string(),
            })
    }
}

/// Kind of pipeline job shown in the list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobType {
    #[default]
    Build,
    Test,
    Package,
}

impl JobType {
    pub const ALL: [JobType; 3] = [JobType::Build, JobType::Test, JobType::Package];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::Build => "Build",
            JobType::Test => "Test",
            JobType::Package => "Package",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobType::ALL
            .into_iter()
            .find(|j| j.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseError::UnknownJobType {
                value: s.to_string(),
            })
    }
}

/// Form values of the filter panel.
///
/// `Default` is the one and only reset snapshot: initial mount, the clear
/// button and the external reset all go through it. No ordering is
/// enforced between `start_date` and `end_date`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterModel {
    pub branch: Branch,
    pub configurations: BTreeSet<BuildConfiguration>,
    pub job_type: JobType,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl FilterModel {
    /// Insert `tag` if absent, remove it if present.
    ///
    /// Returns whether the tag is selected afterwards.
    pub fn toggle_configuration(&mut self, tag: BuildConfiguration) -> bool {
        if self.configurations.remove(&tag) {
            false
        } else {
            self.configurations.insert(tag);
            true
        }
    }

    pub fn is_default(&self) -> bool {
        *self == FilterModel::default()
    }
}
