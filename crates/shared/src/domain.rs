use std::{fmt, ops::RangeInclusive, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::FieldError;

macro_rules! choice_enum {
    (
        $name:ident, $field:literal, $expected:literal,
        { $($variant:ident => ($wire:literal, $label:literal)),+ $(,)? }
    ) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = FieldError;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                let wanted = raw.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|choice| choice.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| FieldError::InvalidChoice {
                        field: $field,
                        value: raw.to_string(),
                        expected: $expected,
                    })
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassLocation {
    Left,
    #[default]
    Middle,
    Right,
}

choice_enum!(PassLocation, "pass_location", "left/middle/right", {
    Left => ("left", "Left"),
    Middle => ("middle", "Middle"),
    Right => ("right", "Right"),
});

/// `None` means no pass length applies to the play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassLength {
    #[default]
    Short,
    Deep,
    None,
}

choice_enum!(PassLength, "pass_length", "short/deep/none", {
    Short => ("short", "Short"),
    Deep => ("deep", "Deep"),
    None => ("none", "None"),
});

/// Integer-valued fields of [`PlaySituation`], in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericField {
    Down,
    YardsToGo,
    Yardline100,
    Quarter,
    MinutesLeft,
    SecondsLeft,
    PossessionScore,
    DefenseScore,
}

impl NumericField {
    pub const ALL: [NumericField; 8] = [
        NumericField::Down,
        NumericField::YardsToGo,
        NumericField::Yardline100,
        NumericField::Quarter,
        NumericField::MinutesLeft,
        NumericField::SecondsLeft,
        NumericField::PossessionScore,
        NumericField::DefenseScore,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            NumericField::Down => "down",
            NumericField::YardsToGo => "ydstogo",
            NumericField::Yardline100 => "yardline_100",
            NumericField::Quarter => "qtr",
            NumericField::MinutesLeft => "min_left",
            NumericField::SecondsLeft => "sec_left",
            NumericField::PossessionScore => "posteam_score",
            NumericField::DefenseScore => "defteam_score",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NumericField::Down => "Down",
            NumericField::YardsToGo => "Yards to Go",
            NumericField::Yardline100 => "Yardline to Endzone",
            NumericField::Quarter => "Quarter",
            NumericField::MinutesLeft => "Min Left",
            NumericField::SecondsLeft => "Sec Left",
            NumericField::PossessionScore => "Your Score",
            NumericField::DefenseScore => "Opp Score",
        }
    }

    /// Advisory range shown next to the input. Edits outside it are still accepted.
    pub fn range(self) -> RangeInclusive<i64> {
        match self {
            NumericField::Down | NumericField::Quarter => 1..=4,
            NumericField::YardsToGo | NumericField::Yardline100 => 1..=99,
            NumericField::MinutesLeft => 0..=15,
            NumericField::SecondsLeft => 0..=59,
            NumericField::PossessionScore | NumericField::DefenseScore => 0..=100,
        }
    }

    pub fn hint(self) -> String {
        let range = self.range();
        format!("{}–{}", range.start(), range.end())
    }

    fn from_wire_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.wire_name() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormationFlag {
    Shotgun,
    NoHuddle,
}

impl FormationFlag {
    pub const ALL: [FormationFlag; 2] = [FormationFlag::Shotgun, FormationFlag::NoHuddle];

    pub fn wire_name(self) -> &'static str {
        match self {
            FormationFlag::Shotgun => "shotgun",
            FormationFlag::NoHuddle => "no_huddle",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormationFlag::Shotgun => "Shotgun",
            FormationFlag::NoHuddle => "No Huddle",
        }
    }

    fn from_wire_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|flag| flag.wire_name() == name)
    }
}

/// The game state the user fills in before asking for a prediction.
///
/// Field order matches the JSON body sent to `POST /predict`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaySituation {
    pub down: i64,
    pub ydstogo: i64,
    pub yardline_100: i64,
    pub qtr: i64,
    pub min_left: i64,
    pub sec_left: i64,
    pub posteam_score: i64,
    pub defteam_score: i64,
    pub pass_location: PassLocation,
    pub pass_length: PassLength,
    pub shotgun: bool,
    pub no_huddle: bool,
}

impl Default for PlaySituation {
    fn default() -> Self {
        Self {
            down: 1,
            ydstogo: 10,
            yardline_100: 50,
            qtr: 1,
            min_left: 15,
            sec_left: 0,
            posteam_score: 0,
            defteam_score: 0,
            pass_location: PassLocation::Middle,
            pass_length: PassLength::Short,
            shotgun: false,
            no_huddle: false,
        }
    }
}

impl PlaySituation {
    pub fn numeric(&self, field: NumericField) -> i64 {
        match field {
            NumericField::Down => self.down,
            NumericField::YardsToGo => self.ydstogo,
            NumericField::Yardline100 => self.yardline_100,
            NumericField::Quarter => self.qtr,
            NumericField::MinutesLeft => self.min_left,
            NumericField::SecondsLeft => self.sec_left,
            NumericField::PossessionScore => self.posteam_score,
            NumericField::DefenseScore => self.defteam_score,
        }
    }

    pub fn flag(&self, flag: FormationFlag) -> bool {
        match flag {
            FormationFlag::Shotgun => self.shotgun,
            FormationFlag::NoHuddle => self.no_huddle,
        }
    }

    /// Replaces exactly the field named by `edit`.
    pub fn apply(&mut self, edit: FieldEdit) {
        match edit {
            FieldEdit::Numeric(field, value) => {
                let slot = match field {
                    NumericField::Down => &mut self.down,
                    NumericField::YardsToGo => &mut self.ydstogo,
                    NumericField::Yardline100 => &mut self.yardline_100,
                    NumericField::Quarter => &mut self.qtr,
                    NumericField::MinutesLeft => &mut self.min_left,
                    NumericField::SecondsLeft => &mut self.sec_left,
                    NumericField::PossessionScore => &mut self.posteam_score,
                    NumericField::DefenseScore => &mut self.defteam_score,
                };
                *slot = value;
            }
            FieldEdit::PassLocation(location) => self.pass_location = location,
            FieldEdit::PassLength(length) => self.pass_length = length,
            FieldEdit::Flag(FormationFlag::Shotgun, value) => self.shotgun = value,
            FieldEdit::Flag(FormationFlag::NoHuddle, value) => self.no_huddle = value,
        }
    }
}

/// A single-field change to a [`PlaySituation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEdit {
    Numeric(NumericField, i64),
    PassLocation(PassLocation),
    PassLength(PassLength),
    Flag(FormationFlag, bool),
}

impl FieldEdit {
    /// Builds an edit from a wire field name and its textual value.
    pub fn parse(name: &str, value: &str) -> Result<Self, FieldError> {
        let name = name.trim();
        if let Some(field) = NumericField::from_wire_name(name) {
            let parsed =
                value
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| FieldError::InvalidInteger {
                        field: field.wire_name(),
                        value: value.to_string(),
                    })?;
            return Ok(FieldEdit::Numeric(field, parsed));
        }
        if let Some(flag) = FormationFlag::from_wire_name(name) {
            return parse_flag(flag.wire_name(), value).map(|v| FieldEdit::Flag(flag, v));
        }
        match name {
            "pass_location" => value.parse().map(FieldEdit::PassLocation),
            "pass_length" => value.parse().map(FieldEdit::PassLength),
            other => Err(FieldError::UnknownField(other.to_string())),
        }
    }

    pub fn field_name(&self) -> &'static str {
        match self {
            FieldEdit::Numeric(field, _) => field.wire_name(),
            FieldEdit::PassLocation(_) => "pass_location",
            FieldEdit::PassLength(_) => "pass_length",
            FieldEdit::Flag(flag, _) => flag.wire_name(),
        }
    }
}

/// Parses `name=value`, as accepted by `--set` on the command line.
impl FromStr for FieldEdit {
    type Err = FieldError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (name, value) = raw
            .split_once('=')
            .ok_or_else(|| FieldError::MissingAssignment(raw.to_string()))?;
        FieldEdit::parse(name, value)
    }
}

pub fn parse_flag(field: &'static str, value: &str) -> Result<bool, FieldError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" => Ok(false),
        _ => Err(FieldError::InvalidFlag {
            field,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
