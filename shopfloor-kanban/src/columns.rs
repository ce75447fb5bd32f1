//! Status-to-column categorization for the kanban board.
//!
//! Fine-grained job statuses are grouped into a handful of display columns.
//! Each status also carries a badge so the board can show which sub-category
//! a card belongs to inside a shared column. The table is fixed at compile
//! time and never mutated.

use crate::error::KanbanError;
use crate::types::JobStatus;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A display column on the kanban board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KanbanColumn {
    PreProduction,
    InProduction,
    OnHold,
    Special,
    Finished,
    Archived,
}

/// Static description of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnDef {
    pub id: KanbanColumn,
    pub title: &'static str,
    pub colour: &'static str,
    pub statuses: &'static [JobStatus],
}

/// Sub-category badge shown on a job card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    pub label: &'static str,
    pub colour: &'static str,
}

const COLUMNS: [ColumnDef; 6] = [
    ColumnDef {
        id: KanbanColumn::PreProduction,
        title: "Pre-Production",
        colour: "blue",
        statuses: &[
            JobStatus::Quoting,
            JobStatus::AcceptedQuote,
            JobStatus::AwaitingMaterials,
            JobStatus::AwaitingStaff,
            JobStatus::AwaitingSiteAvailability,
        ],
    },
    ColumnDef {
        id: KanbanColumn::InProduction,
        title: "In Production",
        colour: "green",
        statuses: &[JobStatus::InProgress],
    },
    ColumnDef {
        id: KanbanColumn::OnHold,
        title: "On Hold",
        colour: "orange",
        statuses: &[JobStatus::OnHold],
    },
    ColumnDef {
        id: KanbanColumn::Special,
        title: "Special",
        colour: "purple",
        statuses: &[JobStatus::Special],
    },
    ColumnDef {
        id: KanbanColumn::Finished,
        title: "Finished",
        colour: "emerald",
        statuses: &[
            JobStatus::RecentlyCompleted,
            JobStatus::Completed,
            JobStatus::Rejected,
        ],
    },
    ColumnDef {
        id: KanbanColumn::Archived,
        title: "Archived",
        colour: "gray",
        statuses: &[JobStatus::Archived],
    },
];

impl KanbanColumn {
    /// Every column, in board order
    pub const ALL: [KanbanColumn; 6] = [
        KanbanColumn::PreProduction,
        KanbanColumn::InProduction,
        KanbanColumn::OnHold,
        KanbanColumn::Special,
        KanbanColumn::Finished,
        KanbanColumn::Archived,
    ];

    /// The column a status is displayed in
    pub fn for_status(status: JobStatus) -> KanbanColumn {
        match status {
            JobStatus::Quoting
            | JobStatus::AcceptedQuote
            | JobStatus::AwaitingMaterials
            | JobStatus::AwaitingStaff
            | JobStatus::AwaitingSiteAvailability => KanbanColumn::PreProduction,
            JobStatus::InProgress => KanbanColumn::InProduction,
            JobStatus::OnHold => KanbanColumn::OnHold,
            JobStatus::Special => KanbanColumn::Special,
            JobStatus::RecentlyCompleted | JobStatus::Completed | JobStatus::Rejected => {
                KanbanColumn::Finished
            }
            JobStatus::Archived => KanbanColumn::Archived,
        }
    }

    /// Static definition of this column
    pub fn definition(&self) -> &'static ColumnDef {
        // COLUMNS is laid out in declaration order of the enum
        &COLUMNS[*self as usize]
    }

    /// Statuses grouped in this column
    pub fn statuses(&self) -> &'static [JobStatus] {
        self.definition().statuses
    }

    /// Column title for display
    pub fn title(&self) -> &'static str {
        self.definition().title
    }

    /// The storage key of this column
    pub fn as_str(&self) -> &'static str {
        match self {
            KanbanColumn::PreProduction => "pre_production",
            KanbanColumn::InProduction => "in_production",
            KanbanColumn::OnHold => "on_hold",
            KanbanColumn::Special => "special",
            KanbanColumn::Finished => "finished",
            KanbanColumn::Archived => "archived",
        }
    }
}

impl fmt::Display for KanbanColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KanbanColumn {
    type Err = KanbanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        KanbanColumn::ALL
            .iter()
            .copied()
            .find(|column| column.as_str() == normalized)
            .ok_or_else(|| KanbanError::ColumnNotFound { id: s.to_string() })
    }
}

impl JobStatus {
    /// The column this status is displayed in
    pub fn column(&self) -> KanbanColumn {
        KanbanColumn::for_status(*self)
    }

    /// The sub-category badge for cards in this status
    pub fn badge(&self) -> StatusBadge {
        let (label, colour) = match self {
            JobStatus::Quoting => ("Quoting", "yellow"),
            JobStatus::AcceptedQuote => ("Accepted Quote", "green"),
            JobStatus::AwaitingMaterials => ("Awaiting Materials", "orange"),
            JobStatus::AwaitingStaff => ("Awaiting Staff", "red"),
            JobStatus::AwaitingSiteAvailability => ("Awaiting Site", "amber"),
            JobStatus::InProgress => ("In Progress", "blue"),
            JobStatus::OnHold => ("On Hold", "orange"),
            JobStatus::Special => ("Special", "purple"),
            JobStatus::RecentlyCompleted => ("Recently Completed", "emerald"),
            JobStatus::Completed => ("Completed", "green"),
            JobStatus::Rejected => ("Rejected", "red"),
            JobStatus::Archived => ("Archived", "gray"),
        };
        StatusBadge { label, colour }
    }
}

/// All column definitions, in board order
pub fn all_columns() -> &'static [ColumnDef] {
    &COLUMNS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_status_belongs_to_exactly_one_column() {
        for status in JobStatus::ALL {
            let owners: Vec<_> = all_columns()
                .iter()
                .filter(|def| def.statuses.contains(&status))
                .collect();
            assert_eq!(owners.len(), 1, "status {status} must map to one column");
            assert_eq!(owners[0].id, KanbanColumn::for_status(status));
        }
    }

    #[test]
    fn test_definitions_line_up_with_enum_order() {
        for column in KanbanColumn::ALL {
            assert_eq!(column.definition().id, column);
        }
    }

    #[test]
    fn test_parse_column() {
        assert_eq!(
            "pre-production".parse::<KanbanColumn>().unwrap(),
            KanbanColumn::PreProduction
        );
        assert!(matches!(
            "backlog".parse::<KanbanColumn>(),
            Err(KanbanError::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn test_badges() {
        assert_eq!(JobStatus::AwaitingStaff.badge().label, "Awaiting Staff");
        assert_eq!(JobStatus::Archived.column(), KanbanColumn::Archived);
        assert_eq!(KanbanColumn::Finished.title(), "Finished");
    }
}
