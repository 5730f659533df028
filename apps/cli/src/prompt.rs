//! Interactive, line-by-line entry of a play situation.
//!
//! Unlike the form, this mode re-asks until each answer is inside the field's
//! advisory range.

use std::{
    fmt::Display,
    io::{BufRead, Write},
    str::FromStr,
};

use anyhow::{bail, Result};
use shared::domain::{
    parse_flag, FieldEdit, FormationFlag, NumericField, PassLength, PassLocation, PlaySituation,
};

pub fn collect_play_situation(
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<PlaySituation> {
    writeln!(out, "\n=== BlitzWatch: Manual Pre-Snap Predictor ===\n")?;

    let mut record = PlaySituation::default();
    for field in NumericField::ALL {
        let value = prompt_int(input, out, field)?;
        record.apply(FieldEdit::Numeric(field, value));
    }

    let location = prompt_choice(input, out, "Pass Location", PassLocation::ALL)?;
    record.apply(FieldEdit::PassLocation(location));
    let length = prompt_choice(input, out, "Pass Length", PassLength::ALL)?;
    record.apply(FieldEdit::PassLength(length));

    for flag in FormationFlag::ALL {
        let value = prompt_yes_no(input, out, flag)?;
        record.apply(FieldEdit::Flag(flag, value));
    }

    Ok(record)
}

fn read_answer(input: &mut impl BufRead, out: &mut impl Write, prompt: &str) -> Result<String> {
    write!(out, "{prompt}: ")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("input closed before every field was entered");
    }
    Ok(line.trim().to_string())
}

fn prompt_int(input: &mut impl BufRead, out: &mut impl Write, field: NumericField) -> Result<i64> {
    let range = field.range();
    let prompt = format!("{} ({})", field.label(), field.hint());
    loop {
        let answer = read_answer(input, out, &prompt)?;
        match answer.parse::<i64>() {
            Ok(value) if range.contains(&value) => return Ok(value),
            Ok(_) => writeln!(
                out,
                " → Please enter an integer between {} and {}.",
                range.start(),
                range.end()
            )?,
            Err(_) => writeln!(out, " → Invalid integer. Try again.")?,
        }
    }
}

fn prompt_choice<T>(
    input: &mut impl BufRead,
    out: &mut impl Write,
    label: &str,
    options: &[T],
) -> Result<T>
where
    T: FromStr + Display,
{
    let listed = options
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("/");
    let prompt = format!("{label} ({listed})");
    loop {
        let answer = read_answer(input, out, &prompt)?;
        if let Ok(choice) = answer.parse::<T>() {
            return Ok(choice);
        }
        writeln!(out, " → Choose one of: {listed}")?;
    }
}

fn prompt_yes_no(
    input: &mut impl BufRead,
    out: &mut impl Write,
    flag: FormationFlag,
) -> Result<bool> {
    let prompt = format!("{}? (yes/no)", flag.label());
    loop {
        let answer = read_answer(input, out, &prompt)?;
        match parse_flag(flag.wire_name(), &answer) {
            Ok(value) => return Ok(value),
            Err(_) => writeln!(out, " → Choose one of: yes/no")?,
        }
    }
}
