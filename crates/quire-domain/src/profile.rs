//! Subject profile accumulated across an analysis run
//!
//! A profile has two kinds of attributes. Scalar fields hold one value and
//! are overwritten by any later non-empty value (last writer wins). Multi-valued
//! fields collect distinct candidates in first-seen order; a value already
//! present (exact, case-sensitive match) is not added again.

use serde::Serialize;
use std::fmt;

/// Single-valued profile attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarField {
    /// Identifying name of the subject
    Name,
    /// Sex of the subject
    Sex,
    /// Date of birth, `yyyy-MM-dd` text
    DateOfBirth,
    /// Weight, free text as reported
    Weight,
    /// Height, free text as reported
    Height,
    /// Coat or body color
    Color,
}

impl ScalarField {
    /// All scalar fields, in display order
    pub const ALL: [ScalarField; 6] = [
        ScalarField::Name,
        ScalarField::Sex,
        ScalarField::DateOfBirth,
        ScalarField::Weight,
        ScalarField::Height,
        ScalarField::Color,
    ];

    /// Key used for this field in oracle payloads and snapshots
    pub fn key(&self) -> &'static str {
        match self {
            ScalarField::Name => "name",
            ScalarField::Sex => "sex",
            ScalarField::DateOfBirth => "date_of_birth",
            ScalarField::Weight => "weight",
            ScalarField::Height => "height",
            ScalarField::Color => "color",
        }
    }
}

impl fmt::Display for ScalarField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Multi-valued profile attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MultiField {
    /// Candidate species
    PossibleSpecies,
    /// Candidate breeds
    PossibleBreed,
}

impl MultiField {
    /// All multi-valued fields, in display order
    pub const ALL: [MultiField; 2] = [MultiField::PossibleSpecies, MultiField::PossibleBreed];

    /// Key used for this field in oracle payloads and snapshots
    pub fn key(&self) -> &'static str {
        match self {
            MultiField::PossibleSpecies => "possibleSpecies",
            MultiField::PossibleBreed => "possibleBreed",
        }
    }
}

impl fmt::Display for MultiField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Consolidated record of the entity the documents pertain to
///
/// Created empty at the start of a run and mutated only through
/// [`SubjectProfile::set_scalar`] and [`SubjectProfile::add_candidate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubjectProfile {
    /// Identifying name
    pub name: Option<String>,

    /// Candidate species, first-seen order
    #[serde(rename = "possibleSpecies")]
    pub possible_species: Vec<String>,

    /// Candidate breeds, first-seen order
    #[serde(rename = "possibleBreed")]
    pub possible_breed: Vec<String>,

    /// Sex
    pub sex: Option<String>,

    /// Date of birth
    pub date_of_birth: Option<String>,

    /// Weight
    pub weight: Option<String>,

    /// Height
    pub height: Option<String>,

    /// Color
    pub color: Option<String>,
}

impl SubjectProfile {
    /// Create an empty profile
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a scalar field
    pub fn get(&self, field: ScalarField) -> Option<&str> {
        self.scalar_slot(field).as_deref()
    }

    /// Current candidates of a multi-valued field
    pub fn candidates(&self, field: MultiField) -> &[String] {
        match field {
            MultiField::PossibleSpecies => &self.possible_species,
            MultiField::PossibleBreed => &self.possible_breed,
        }
    }

    /// Overwrite a scalar field with a non-empty value
    ///
    /// Blank values are ignored so an earlier answer is never erased.
    /// Returns `true` when the stored value changed.
    pub fn set_scalar(&mut self, field: ScalarField, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }

        let slot = self.scalar_slot_mut(field);
        if slot.as_deref() == Some(value) {
            return false;
        }
        *slot = Some(value.to_string());
        true
    }

    /// Append a candidate to a multi-valued field if it is new
    ///
    /// Returns `true` when the candidate was appended.
    pub fn add_candidate(&mut self, field: MultiField, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }

        let values = match field {
            MultiField::PossibleSpecies => &mut self.possible_species,
            MultiField::PossibleBreed => &mut self.possible_breed,
        };
        if values.iter().any(|existing| existing == value) {
            return false;
        }
        values.push(value.to_string());
        true
    }

    /// Whether no field has been filled in yet
    pub fn is_empty(&self) -> bool {
        ScalarField::ALL.iter().all(|f| self.get(*f).is_none())
            && MultiField::ALL.iter().all(|f| self.candidates(*f).is_empty())
    }

    fn scalar_slot(&self, field: ScalarField) -> &Option<String> {
        match field {
            ScalarField::Name => &self.name,
            ScalarField::Sex => &self.sex,
            ScalarField::DateOfBirth => &self.date_of_birth,
            ScalarField::Weight => &self.weight,
            ScalarField::Height => &self.height,
            ScalarField::Color => &self.color,
        }
    }

    fn scalar_slot_mut(&mut self, field: ScalarField) -> &mut Option<String> {
        match field {
            ScalarField::Name => &mut self.name,
            ScalarField::Sex => &mut self.sex,
            ScalarField::DateOfBirth => &mut self.date_of_birth,
            ScalarField::Weight => &mut self.weight,
            ScalarField::Height => &mut self.height,
            ScalarField::Color => &mut self.color,
        }
    }
}
