//! Input validation for timetabling catalogs.
//!
//! Checks structural integrity of subjects, divisions, faculty, rooms
//! and allocations before scheduling. Detects:
//! - Duplicate IDs
//! - Allocation and batch-choice references to unknown entities
//! - Divisions without batches that owe practical hours
//! - Elective options on subjects that are not electives
//! - Batch choices that name an option the subject does not offer
//!
//! Every problem is collected; validation never stops at the first.

use std::collections::HashSet;

use crate::models::{AudienceGranularity, Catalog};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities of the same kind share an ID.
    DuplicateId,
    /// A reference points to an entity that doesn't exist.
    InvalidReference,
    /// A division owes practicals but has no batches to hold them.
    MissingBatches,
    /// A core or lab subject lists elective options.
    UnexpectedElectives,
    /// A batch picked an option the subject doesn't offer.
    InvalidElectiveChoice,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a catalog.
///
/// Checks:
/// 1. No duplicate subject, division, batch, faculty, room or allocation IDs
/// 2. Divisions owing core/lab practical hours have batches
/// 3. Only elective and minor subjects list options
/// 4. Batch choices name existing subjects and offered options
/// 5. Allocations reference existing subjects, faculty, divisions and batches
///
/// Faculty qualifications naming a deleted subject are not errors; see
/// [`unknown_qualifications`].
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(catalog: &Catalog) -> ValidationResult {
    let mut errors = Vec::new();

    check_unique(&mut errors, "subject", catalog.subjects.iter().map(|s| s.id.as_str()));
    check_unique(&mut errors, "division", catalog.divisions.iter().map(|d| d.id.as_str()));
    check_unique(
        &mut errors,
        "batch",
        catalog
            .divisions
            .iter()
            .flat_map(|d| d.batches.iter().map(|b| b.id.as_str())),
    );
    check_unique(&mut errors, "faculty", catalog.faculty.iter().map(|f| f.id.as_str()));
    check_unique(&mut errors, "room", catalog.rooms.iter().map(|r| r.id.as_str()));
    check_unique(
        &mut errors,
        "allocation",
        catalog.allocations.iter().map(|a| a.id.as_str()),
    );

    for subject in &catalog.subjects {
        let whole_division = subject.profile().audience == AudienceGranularity::WholeDivision;
        if whole_division && !subject.electives.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnexpectedElectives,
                format!(
                    "Subject '{}' is {:?} but lists elective options",
                    subject.id, subject.subject_type
                ),
            ));
        }
    }

    for division in &catalog.divisions {
        if division.batches.is_empty() {
            let owing = catalog.subjects.iter().find(|s| {
                s.is_offered_to(&division.department, division.year)
                    && s.profile().audience == AudienceGranularity::WholeDivision
                    && s.practical_hours > 0
            });
            if let Some(subject) = owing {
                errors.push(ValidationError::new(
                    ValidationErrorKind::MissingBatches,
                    format!(
                        "Division '{}' has no batches but subject '{}' has practical hours",
                        division.id, subject.id
                    ),
                ));
            }
        }

        for batch in &division.batches {
            for (subject_id, choice) in &batch.elective_choices {
                let Some(subject) = catalog.subject(subject_id) else {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::InvalidReference,
                        format!("Batch '{}' has a choice for unknown subject '{}'", batch.id, subject_id),
                    ));
                    continue;
                };
                if !subject.electives.is_empty() && !subject.electives.contains(choice) {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::InvalidElectiveChoice,
                        format!(
                            "Batch '{}' chose '{}', which subject '{}' does not offer",
                            batch.id, choice, subject_id
                        ),
                    ));
                }
            }
        }
    }

    for alloc in &catalog.allocations {
        let mut missing = Vec::new();
        if catalog.subject(&alloc.subject_id).is_none() {
            missing.push(format!("subject '{}'", alloc.subject_id));
        }
        if catalog.faculty_member(&alloc.faculty_id).is_none() {
            missing.push(format!("faculty '{}'", alloc.faculty_id));
        }
        match catalog.division(&alloc.division_id) {
            None => missing.push(format!("division '{}'", alloc.division_id)),
            Some(division) => {
                if let Some(batch_id) = &alloc.batch_id {
                    if division.batch(batch_id).is_none() {
                        missing.push(format!("batch '{batch_id}'"));
                    }
                }
            }
        }
        for what in missing {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidReference,
                format!("Allocation '{}' references unknown {}", alloc.id, what),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// `(faculty id, subject id)` pairs where a qualification names no
/// subject of the catalog.
///
/// Deleting a subject leaves faculty lists untouched, so these are
/// tolerated: the reference can never match and is skipped.
pub fn unknown_qualifications(catalog: &Catalog) -> Vec<(&str, &str)> {
    catalog
        .faculty
        .iter()
        .flat_map(|f| f.subjects.iter().map(move |s| (f.id.as_str(), s.as_str())))
        .filter(|&(_, subject_id)| catalog.subject(subject_id).is_none())
        .collect()
}

fn check_unique<'a>(
    errors: &mut Vec<ValidationError>,
    what: &str,
    ids: impl Iterator<Item = &'a str>,
) {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate {what} ID: {id}"),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Batch, Division, Faculty, Room, SessionType, Subject, SubjectAllocation, SubjectType, Year,
    };

    fn sample_catalog() -> Catalog {
        Catalog::new()
            .with_subject(
                Subject::new("OS", "COMP", Year::TE, SubjectType::Core)
                    .with_theory_hours(3)
                    .with_practical_hours(2),
            )
            .with_subject(
                Subject::new("ML", "COMP", Year::TE, SubjectType::Dlo)
                    .with_theory_hours(3)
                    .with_elective("ML")
                    .with_elective("NLP"),
            )
            .with_division(
                Division::new("D1", "COMP", Year::TE, "A")
                    .with_batch(Batch::new("B1", "A1").with_choice("ML", "NLP"))
                    .with_batch(Batch::new("B2", "A2")),
            )
            .with_faculty(Faculty::new("F1", "Asha Rao", 18).with_subject("OS"))
            .with_room(Room::classroom("R1"))
            .with_room(Room::lab("L1"))
            .with_allocation(SubjectAllocation::new("A1", "OS", "F1", "D1", SessionType::Theory, 3))
    }

    fn kinds(catalog: &Catalog) -> Vec<ValidationErrorKind> {
        validate_input(catalog)
            .unwrap_err()
            .into_iter()
            .map(|e| e.kind)
            .collect()
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_input(&sample_catalog()).is_ok());
    }

    #[test]
    fn test_duplicate_room_id() {
        let catalog = sample_catalog().with_room(Room::classroom("R1"));
        let errors = validate_input(&catalog).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("room")));
    }

    #[test]
    fn test_duplicate_batch_across_divisions() {
        let catalog = sample_catalog()
            .with_division(Division::new("D2", "COMP", Year::TE, "B").with_batch(Batch::new("B1", "B1")));
        assert_eq!(kinds(&catalog), vec![ValidationErrorKind::DuplicateId]);
    }

    #[test]
    fn test_unknown_qualification_tolerated() {
        let catalog = sample_catalog().with_faculty(
            Faculty::new("F2", "Bina Shah", 18)
                .with_subject("OS")
                .with_subject("XX"),
        );
        assert!(validate_input(&catalog).is_ok());
        assert_eq!(unknown_qualifications(&catalog), vec![("F2", "XX")]);
        assert!(unknown_qualifications(&sample_catalog()).is_empty());
    }

    #[test]
    fn test_missing_batches() {
        let catalog = sample_catalog().with_division(Division::new("D2", "COMP", Year::TE, "B"));
        assert_eq!(kinds(&catalog), vec![ValidationErrorKind::MissingBatches]);

        // Theory-only load needs no batches
        let catalog = Catalog::new()
            .with_subject(Subject::new("M", "COMP", Year::FE, SubjectType::Core).with_theory_hours(4))
            .with_division(Division::new("D1", "COMP", Year::FE, "A"));
        assert!(validate_input(&catalog).is_ok());
    }

    #[test]
    fn test_electives_on_core_subject() {
        let catalog = sample_catalog().with_subject(
            Subject::new("CN", "COMP", Year::TE, SubjectType::Core).with_elective("X"),
        );
        assert_eq!(kinds(&catalog), vec![ValidationErrorKind::UnexpectedElectives]);
    }

    #[test]
    fn test_invalid_elective_choice() {
        let catalog = sample_catalog().with_division(
            Division::new("D2", "COMP", Year::TE, "B")
                .with_batch(Batch::new("B3", "B1").with_choice("ML", "Robotics")),
        );
        assert_eq!(kinds(&catalog), vec![ValidationErrorKind::InvalidElectiveChoice]);
    }

    #[test]
    fn test_allocation_references() {
        let catalog = sample_catalog().with_allocation(
            SubjectAllocation::new("A2", "OS", "F9", "D1", SessionType::Practical, 2).with_batch("B9"),
        );
        let errors = validate_input(&catalog).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.message.contains("faculty 'F9'")));
        assert!(errors.iter().any(|e| e.message.contains("batch 'B9'")));
    }

    #[test]
    fn test_multiple_errors() {
        let catalog = sample_catalog()
            .with_room(Room::lab("L1"))
            .with_faculty(Faculty::new("F1", "Dup", 10));
        let errors = validate_input(&catalog).unwrap_err();
        assert!(errors.len() >= 2);
    }
}
