//! Production workflow tracking.
//!
//! Every order carries a map of production stage → status, stored as JSON.
//! The map is typed over a closed stage vocabulary and validated on read;
//! a malformed stored value is an error the repository logs, never a silent
//! empty default.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// The six production stages, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductionStage {
    /// Customer selects photos for the album.
    PhotoSelection,
    /// Album layout design.
    AlbumDesign,
    /// Album printing and binding.
    AlbumPrinting,
    /// Traditional/candid video editing.
    VideoEditing,
    /// Outdoor/post-wedding shoot.
    OutdoorShoot,
    /// Final album delivery to the customer.
    AlbumDelivery,
}

impl ProductionStage {
    /// All stages in pipeline order.
    pub const ALL: [Self; 6] = [
        Self::PhotoSelection,
        Self::AlbumDesign,
        Self::AlbumPrinting,
        Self::VideoEditing,
        Self::OutdoorShoot,
        Self::AlbumDelivery,
    ];

    /// Returns the storage key for this stage.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PhotoSelection => "photo_selection",
            Self::AlbumDesign => "album_design",
            Self::AlbumPrinting => "album_printing",
            Self::VideoEditing => "video_editing",
            Self::OutdoorShoot => "outdoor_shoot",
            Self::AlbumDelivery => "album_delivery",
        }
    }

    /// Returns the display label for this stage.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::PhotoSelection => "Photo Selection",
            Self::AlbumDesign => "Album Design",
            Self::AlbumPrinting => "Album Printing",
            Self::VideoEditing => "Video Editing",
            Self::OutdoorShoot => "Outdoor Shoot",
            Self::AlbumDelivery => "Album Delivery",
        }
    }

    /// Parses a stage from its storage key.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "photo_selection" => Some(Self::PhotoSelection),
            "album_design" => Some(Self::AlbumDesign),
            "album_printing" => Some(Self::AlbumPrinting),
            "video_editing" => Some(Self::VideoEditing),
            "outdoor_shoot" => Some(Self::OutdoorShoot),
            "album_delivery" => Some(Self::AlbumDelivery),
            _ => None,
        }
    }
}

impl fmt::Display for ProductionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of one production stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// Not started.
    No,
    /// Done.
    Yes,
    /// Not applicable to this order.
    NotNeeded,
}

impl StageStatus {
    /// Returns the storage representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::No => "no",
            Self::Yes => "yes",
            Self::NotNeeded => "not_needed",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "no" => Some(Self::No),
            "yes" => Some(Self::Yes),
            "not_needed" => Some(Self::NotNeeded),
            _ => None,
        }
    }

    /// Returns true if this status counts toward workflow completion.
    #[must_use]
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Yes | Self::NotNeeded)
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error parsing a stored workflow map.
#[derive(Debug, Error)]
pub enum WorkflowParseError {
    /// The stored value is not a JSON object.
    #[error("Workflow status is not a JSON object")]
    NotAnObject,
    /// The map contains a key outside the stage vocabulary.
    #[error("Unknown production stage: {0}")]
    UnknownStage(String),
    /// A stage maps to an unknown status value.
    #[error("Unknown stage status for {stage}: {value}")]
    UnknownStatus {
        /// The stage key.
        stage: String,
        /// The offending value.
        value: String,
    },
}

/// Per-order map of production stage → status.
///
/// Stages missing from the stored map read as [`StageStatus::No`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowStatus(BTreeMap<ProductionStage, StageStatus>);

impl Default for WorkflowStatus {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowStatus {
    /// Creates a fresh map with every stage at `No`.
    #[must_use]
    pub fn new() -> Self {
        Self(
            ProductionStage::ALL
                .into_iter()
                .map(|stage| (stage, StageStatus::No))
                .collect(),
        )
    }

    /// Returns the status of one stage.
    #[must_use]
    pub fn get(&self, stage: ProductionStage) -> StageStatus {
        self.0.get(&stage).copied().unwrap_or(StageStatus::No)
    }

    /// Overwrites the status of one stage.
    pub fn set(&mut self, stage: ProductionStage, status: StageStatus) {
        self.0.insert(stage, status);
    }

    /// Resets every stage back to `No`.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Number of stages that are done (`Yes` or `NotNeeded`).
    #[must_use]
    pub fn completion_count(&self) -> usize {
        self.0.values().filter(|s| s.is_done()).count()
    }

    /// Total number of stages in the vocabulary.
    #[must_use]
    pub const fn stage_count() -> usize {
        ProductionStage::ALL.len()
    }

    /// True when every stage is done.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completion_count() == Self::stage_count()
    }

    /// Completion of each stage, in pipeline order.
    #[must_use]
    pub fn entries(&self) -> Vec<(ProductionStage, StageStatus)> {
        ProductionStage::ALL
            .into_iter()
            .map(|stage| (stage, self.get(stage)))
            .collect()
    }

    /// Serializes the map for storage.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .entries()
            .into_iter()
            .map(|(stage, status)| {
                (
                    stage.as_str().to_string(),
                    serde_json::Value::String(status.as_str().to_string()),
                )
            })
            .collect();
        serde_json::Value::Object(map)
    }

    /// Parses a stored workflow map, validating every key and value.
    ///
    /// `null` reads as a fresh all-`No` map (the stage vocabulary predates
    /// some stored orders); anything else must be an object over known
    /// stages and statuses.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, WorkflowParseError> {
        if value.is_null() {
            return Ok(Self::new());
        }

        let object = value.as_object().ok_or(WorkflowParseError::NotAnObject)?;

        let mut workflow = Self::new();
        for (key, raw) in object {
            let stage = ProductionStage::parse(key)
                .ok_or_else(|| WorkflowParseError::UnknownStage(key.clone()))?;
            let status = raw
                .as_str()
                .and_then(StageStatus::parse)
                .ok_or_else(|| WorkflowParseError::UnknownStatus {
                    stage: key.clone(),
                    value: raw.to_string(),
                })?;
            workflow.set(stage, status);
        }

        Ok(workflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_map_is_all_no() {
        let workflow = WorkflowStatus::new();
        assert_eq!(workflow.completion_count(), 0);
        for stage in ProductionStage::ALL {
            assert_eq!(workflow.get(stage), StageStatus::No);
        }
    }

    #[test]
    fn test_completion_counts_yes_and_not_needed() {
        let mut workflow = WorkflowStatus::new();
        workflow.set(ProductionStage::PhotoSelection, StageStatus::Yes);
        workflow.set(ProductionStage::OutdoorShoot, StageStatus::NotNeeded);
        assert_eq!(workflow.completion_count(), 2);
        assert!(!workflow.is_complete());
    }

    #[test]
    fn test_all_stages_done_is_complete() {
        let mut workflow = WorkflowStatus::new();
        for stage in ProductionStage::ALL {
            workflow.set(stage, StageStatus::Yes);
        }
        assert_eq!(workflow.completion_count(), WorkflowStatus::stage_count());
        assert!(workflow.is_complete());
    }

    #[test]
    fn test_reset_clears_progress() {
        let mut workflow = WorkflowStatus::new();
        workflow.set(ProductionStage::AlbumDesign, StageStatus::Yes);
        workflow.reset();
        assert_eq!(workflow.completion_count(), 0);
    }

    #[test]
    fn test_json_round_trip() {
        let mut workflow = WorkflowStatus::new();
        workflow.set(ProductionStage::VideoEditing, StageStatus::NotNeeded);
        let parsed = WorkflowStatus::from_json(&workflow.to_json()).unwrap();
        assert_eq!(parsed, workflow);
    }

    #[test]
    fn test_null_reads_as_fresh_map() {
        let workflow = WorkflowStatus::from_json(&serde_json::Value::Null).unwrap();
        assert_eq!(workflow.completion_count(), 0);
    }

    #[test]
    fn test_partial_map_defaults_missing_stages() {
        let workflow =
            WorkflowStatus::from_json(&json!({ "album_design": "yes" })).unwrap();
        assert_eq!(workflow.get(ProductionStage::AlbumDesign), StageStatus::Yes);
        assert_eq!(
            workflow.get(ProductionStage::PhotoSelection),
            StageStatus::No
        );
        assert_eq!(workflow.completion_count(), 1);
    }

    #[test]
    fn test_unknown_stage_is_an_error() {
        let result = WorkflowStatus::from_json(&json!({ "drone_footage": "yes" }));
        assert!(matches!(result, Err(WorkflowParseError::UnknownStage(_))));
    }

    #[test]
    fn test_unknown_status_is_an_error() {
        let result = WorkflowStatus::from_json(&json!({ "album_design": "maybe" }));
        assert!(matches!(
            result,
            Err(WorkflowParseError::UnknownStatus { .. })
        ));
    }

    #[test]
    fn test_non_object_is_an_error() {
        let result = WorkflowStatus::from_json(&json!("all done"));
        assert!(matches!(result, Err(WorkflowParseError::NotAnObject)));
    }
}
